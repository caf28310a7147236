use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{
    NormalizedFighterRecord, NormalizedTable, NumericColumn, RawFighterRecord, RawTable, StatLabel,
    DRAWS_COLUMN, HEIGHT_INCHES_COLUMN, LOSSES_COLUMN, NAME_COLUMN, RECORD_COLUMN, WINS_COLUMN,
};
use crate::parser::record::parse_number;

// ── Raw table ──

pub fn write_raw(path: &Path, table: &RawTable) -> Result<()> {
    let file = create(path)?;
    write_raw_to(file, table).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn read_raw(path: &Path) -> Result<RawTable> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_raw_from(file).with_context(|| format!("Failed to read {}", path.display()))
}

/// Columns: `Nome`, `Recorde`, every known stat seen in the table, then
/// unrecognized labels in sorted order. Missing values are empty cells.
pub fn write_raw_to<W: Write>(writer: W, table: &RawTable) -> Result<()> {
    let known = table.known_labels();
    let extras = table.extra_labels();

    let mut wtr = csv::Writer::from_writer(writer);
    let header: Vec<&str> = [NAME_COLUMN, RECORD_COLUMN]
        .into_iter()
        .chain(known.iter().map(|l| l.label()))
        .chain(extras.iter().copied())
        .collect();
    wtr.write_record(&header)?;

    for row in &table.rows {
        let cells: Vec<&str> = [row.name.as_str(), row.record.as_str()]
            .into_iter()
            .chain(known.iter().map(|&l| row.stats.get(l).unwrap_or("")))
            .chain(extras.iter().map(|k| row.extras.get(*k).map_or("", String::as_str)))
            .collect();
        wtr.write_record(&cells)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Unrecognized header labels are kept on the table even when every cell
/// under them is empty, so they still pass through the transform.
pub fn read_raw_from<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let extra_columns: BTreeSet<String> = headers
        .iter()
        .filter(|c| ![NAME_COLUMN, RECORD_COLUMN].contains(c) && StatLabel::from_label(c).is_none())
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut fighter = RawFighterRecord::default();
        for (column, value) in headers.iter().zip(record.iter()) {
            match column {
                NAME_COLUMN => fighter.name = value.to_string(),
                RECORD_COLUMN => fighter.record = value.to_string(),
                _ if value.is_empty() => {}
                label => fighter.insert_stat(label, value),
            }
        }
        rows.push(fighter);
    }
    Ok(RawTable::with_extra_columns(rows, extra_columns))
}

// ── Normalized table ──

/// Column order of the normalized file, minus the unrecognized labels
/// that sit between `Sub. Avg.` and `Height_in_inches`.
const LEADING_COLUMNS: [&str; 13] = [
    NAME_COLUMN,
    "Weight",
    "Reach",
    "STANCE",
    "DOB",
    "SLpM",
    "Str. Acc.",
    "SApM",
    "Str. Def",
    "TD Avg.",
    "TD Acc.",
    "TD Def.",
    "Sub. Avg.",
];
const TRAILING_COLUMNS: [&str; 4] = [HEIGHT_INCHES_COLUMN, WINS_COLUMN, LOSSES_COLUMN, DRAWS_COLUMN];

pub fn write_normalized(path: &Path, table: &NormalizedTable) -> Result<()> {
    let file = create(path)?;
    write_normalized_to(file, table).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn read_normalized(path: &Path) -> Result<NormalizedTable> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_normalized_from(file).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_normalized_to<W: Write>(writer: W, table: &NormalizedTable) -> Result<()> {
    let extras = table.extra_labels();

    let mut wtr = csv::Writer::from_writer(writer);
    let header: Vec<&str> = LEADING_COLUMNS
        .into_iter()
        .chain(extras.iter().copied())
        .chain(TRAILING_COLUMNS)
        .collect();
    wtr.write_record(&header)?;

    for row in &table.rows {
        let num = |c: NumericColumn| format_float(row.numeric(c));
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        let mut cells = vec![
            row.name.clone(),
            num(NumericColumn::Weight),
            num(NumericColumn::Reach),
            text(&row.stance),
            text(&row.dob),
            num(NumericColumn::Slpm),
            num(NumericColumn::StrAcc),
            num(NumericColumn::Sapm),
            num(NumericColumn::StrDef),
            num(NumericColumn::TdAvg),
            num(NumericColumn::TdAcc),
            num(NumericColumn::TdDef),
            num(NumericColumn::SubAvg),
        ];
        cells.extend(extras.iter().map(|k| row.extras.get(*k).cloned().unwrap_or_default()));
        cells.extend([
            num(NumericColumn::HeightInInches),
            row.wins.to_string(),
            row.losses.to_string(),
            row.draws.to_string(),
        ]);
        wtr.write_record(&cells)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_normalized_from<R: Read>(reader: R) -> Result<NormalizedTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let extra_columns: BTreeSet<String> = headers
        .iter()
        .filter(|c| !LEADING_COLUMNS.contains(c) && !TRAILING_COLUMNS.contains(c))
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut fighter = NormalizedFighterRecord::default();
        for (column, value) in headers.iter().zip(record.iter()) {
            let count = || value.trim().parse::<u32>().unwrap_or(0);
            let text = || Some(value.to_string()).filter(|v| !v.is_empty());
            match column {
                NAME_COLUMN => fighter.name = value.to_string(),
                WINS_COLUMN => fighter.wins = count(),
                LOSSES_COLUMN => fighter.losses = count(),
                DRAWS_COLUMN => fighter.draws = count(),
                c if c == StatLabel::Stance.label() => fighter.stance = text(),
                c if c == StatLabel::Dob.label() => fighter.dob = text(),
                c => match NumericColumn::from_label(c) {
                    Some(numeric) => fighter.set_numeric(numeric, parse_number(value)),
                    None if value.is_empty() => {}
                    None => {
                        fighter.extras.insert(c.to_string(), value.to_string());
                    }
                },
            }
        }
        rows.push(fighter);
    }
    Ok(NormalizedTable::with_extra_columns(rows, extra_columns))
}

/// Shortest round-trip form, always with a decimal point (`71.0`).
fn format_float(v: Option<f64>) -> String {
    v.map(|v| format!("{:?}", v)).unwrap_or_default()
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform;

    fn raw_table() -> RawTable {
        RawTable::new(vec![
            RawFighterRecord::new("A Fighter", "10-2-0")
                .with_stat("Height", "5' 11\"")
                .with_stat("Weight", "155 lbs.")
                .with_stat("Reach", "70\"")
                .with_stat("Str. Acc.", "45%"),
            RawFighterRecord::new("B, Fighter", "3-1-0")
                .with_stat("STANCE", "Switch")
                .with_stat("Nickname", "Comma"),
        ])
    }

    #[test]
    fn raw_header_is_union_of_seen_labels() {
        let mut out = Vec::new();
        write_raw_to(&mut out, &raw_table()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "Nome,Recorde,Height,Weight,Reach,STANCE,Str. Acc.,Nickname");
        assert!(text.contains("\"B, Fighter\""));
    }

    #[test]
    fn raw_table_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("raw.csv");
        write_raw(&path, &raw_table()).unwrap();
        assert_eq!(read_raw(&path).unwrap(), raw_table());
    }

    #[test]
    fn normalized_file_layout() {
        let mut out = Vec::new();
        let table = transform(&RawTable::new(vec![raw_table().rows[0].clone()]));
        write_normalized_to(&mut out, &table).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Nome,Weight,Reach,STANCE,DOB,SLpM,Str. Acc.,SApM,Str. Def,TD Avg.,TD Acc.,TD Def.,Sub. Avg.,Height_in_inches,Wins,Losses,Draws\n\
             A Fighter,155.0,70.0,,,,0.45,,,,,,,71.0,10,2,0\n"
        );
    }

    #[test]
    fn normalized_reads_back_with_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.csv");
        let table = transform(&raw_table());
        write_normalized(&path, &table).unwrap();

        let loaded = read_normalized(&path).unwrap();
        assert_eq!(loaded, table);
        assert_eq!(loaded.rows[1].weight, None);
        assert_eq!(loaded.rows[1].stance.as_deref(), Some("Switch"));
    }

    #[test]
    fn empty_unknown_column_passes_through_to_clean_file() {
        let csv = "Nome,Recorde,Weight,Nickname\nA,1-0-0,155 lbs.,\nB,2-0-0,145 lbs.,\n";
        let raw = read_raw_from(csv.as_bytes()).unwrap();
        assert!(raw.rows.iter().all(|r| r.extras.is_empty()));

        let mut out = Vec::new();
        write_normalized_to(&mut out, &transform(&raw)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Nome,Weight,Reach,STANCE,DOB,SLpM,Str. Acc.,SApM,Str. Def,TD Avg.,TD Acc.,TD Def.,Sub. Avg.,Nickname,Height_in_inches,Wins,Losses,Draws"
        );
        assert_eq!(lines.next().unwrap(), "A,155.0,,,,,,,,,,,,,,1,0,0");

        let clean = read_normalized_from(text.as_bytes()).unwrap();
        assert_eq!(clean.extra_labels(), BTreeSet::from(["Nickname"]));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_raw(&dir.path().join("absent.csv")).is_err());
    }
}
