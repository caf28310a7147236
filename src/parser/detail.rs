use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::RawFighterRecord;

pub const NAME_NOT_FOUND: &str = "Nome não encontrado";
pub const RECORD_NOT_FOUND: &str = "Recorde não encontrado";

static NAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.b-content__title-highlight").unwrap());
static RECORD_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.b-content__title-record").unwrap());
static STAT_ITEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.b-list__box-list-item").unwrap());

/// Parse a fighter-details page into a raw record.
///
/// Missing name or record fall back to sentinels; list items without a
/// `Label: Value` shape are dropped.
pub fn parse_fighter_page(html: &str) -> RawFighterRecord {
    let doc = Html::parse_document(html);

    let name = doc
        .select(&NAME_SEL)
        .next()
        .map(element_text)
        .unwrap_or_else(|| NAME_NOT_FOUND.to_string());

    let record_text = doc
        .select(&RECORD_SEL)
        .next()
        .map(element_text)
        .unwrap_or_else(|| RECORD_NOT_FOUND.to_string());
    let record = record_text
        .strip_prefix("Record:")
        .unwrap_or(&record_text)
        .trim()
        .to_string();

    let mut fighter = RawFighterRecord::new(name, record);
    for item in doc.select(&STAT_ITEM_SEL) {
        if let Some((label, value)) = split_stat(&element_text(item)) {
            fighter.insert_stat(label, value);
        }
    }
    fighter
}

/// `"Height:  5' 11\""` → `("Height", "5' 11\"")`
///
/// Splits at the first colon only; an item with several colons keeps the
/// rest in its value instead of being dropped.
fn split_stat(text: &str) -> Option<(&str, &str)> {
    let (label, value) = text.split_once(':')?;
    Some((label.trim(), value.trim()))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatLabel;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn full_profile() {
        let f = parse_fighter_page(&fixture("fighter_details"));
        assert_eq!(f.name, "Charles Oliveira");
        assert_eq!(f.record, "34-10-0 (1 NC)");
        assert_eq!(f.stats.get(StatLabel::Height), Some("5' 10\""));
        assert_eq!(f.stats.get(StatLabel::Weight), Some("155 lbs."));
        assert_eq!(f.stats.get(StatLabel::Reach), Some("74\""));
        assert_eq!(f.stats.get(StatLabel::Stance), Some("Orthodox"));
        assert_eq!(f.stats.get(StatLabel::Dob), Some("Oct 17, 1989"));
        assert_eq!(f.stats.get(StatLabel::Slpm), Some("3.41"));
        assert_eq!(f.stats.get(StatLabel::StrAcc), Some("53%"));
        assert_eq!(f.stats.get(StatLabel::StrDef), Some("51%"));
        assert_eq!(f.stats.get(StatLabel::TdDef), Some("58%"));
        assert_eq!(f.stats.get(StatLabel::SubAvg), Some("2.5"));
        assert!(f.extras.is_empty());
    }

    #[test]
    fn sparse_profile_uses_sentinels() {
        let f = parse_fighter_page(&fixture("fighter_details_sparse"));
        assert_eq!(f.name, NAME_NOT_FOUND);
        assert_eq!(f.record, RECORD_NOT_FOUND);
        assert_eq!(f.stats.get(StatLabel::Height), Some("--"));
        assert_eq!(f.stats.get(StatLabel::Reach), None);
        assert_eq!(f.extras.get("Nickname").map(String::as_str), Some("The Ghost"));
    }

    #[test]
    fn items_without_colon_are_skipped() {
        let html = r#"<ul>
            <li class="b-list__box-list-item">   </li>
            <li class="b-list__box-list-item">Career statistics</li>
            <li class="b-list__box-list-item">SLpM: 4.10</li>
        </ul>"#;
        let f = parse_fighter_page(html);
        assert_eq!(f.stats.get(StatLabel::Slpm), Some("4.10"));
        assert!(f.extras.is_empty());
    }

    #[test]
    fn split_keeps_text_after_first_colon() {
        assert_eq!(split_stat("DOB: 10:30"), Some(("DOB", "10:30")));
        assert_eq!(split_stat("no colon here"), None);
    }
}
