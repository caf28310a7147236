//! Terminal views over the normalized table: fighter comparison, weight
//! class listing and column coverage.
//!
//! Missing numbers are shown as zero here and nowhere else.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::models::{NormalizedFighterRecord, NormalizedTable, NumericColumn};
use crate::table::read_normalized;

pub enum Loaded {
    Table(NormalizedTable),
    Missing(PathBuf),
}

/// A missing file is a normal state (nothing collected yet), not an error.
pub fn load_clean(path: &Path) -> Result<Loaded> {
    if !path.exists() {
        return Ok(Loaded::Missing(path.to_path_buf()));
    }
    Ok(Loaded::Table(read_normalized(path)?))
}

pub fn missing_file_message(path: &Path) -> String {
    format!(
        "Error: '{}' not found. Run 'collect' and 'transform' (or 'run') first.",
        path.display()
    )
}

// ── Weight classes ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WeightClass {
    All,
    Heavyweight,
    LightHeavyweight,
    Middleweight,
    Welterweight,
    Lightweight,
    Featherweight,
    Bantamweight,
    Flyweight,
    Strawweight,
}

impl WeightClass {
    pub fn label(self) -> &'static str {
        match self {
            WeightClass::All => "All",
            WeightClass::Heavyweight => "Heavyweight (265 lbs)",
            WeightClass::LightHeavyweight => "Light Heavyweight (205 lbs)",
            WeightClass::Middleweight => "Middleweight (185 lbs)",
            WeightClass::Welterweight => "Welterweight (170 lbs)",
            WeightClass::Lightweight => "Lightweight (155 lbs)",
            WeightClass::Featherweight => "Featherweight (145 lbs)",
            WeightClass::Bantamweight => "Bantamweight (135 lbs)",
            WeightClass::Flyweight => "Flyweight (125 lbs)",
            WeightClass::Strawweight => "Women's Strawweight (115 lbs)",
        }
    }

    /// Listed weight in pounds; 0 for `All`.
    pub fn pounds(self) -> u32 {
        match self {
            WeightClass::All => 0,
            WeightClass::Heavyweight => 265,
            WeightClass::LightHeavyweight => 205,
            WeightClass::Middleweight => 185,
            WeightClass::Welterweight => 170,
            WeightClass::Lightweight => 155,
            WeightClass::Featherweight => 145,
            WeightClass::Bantamweight => 135,
            WeightClass::Flyweight => 125,
            WeightClass::Strawweight => 115,
        }
    }
}

/// Fighters at exactly the class weight, most wins first, then SLpM.
pub fn filter_division(table: &NormalizedTable, class: WeightClass) -> Vec<&NormalizedFighterRecord> {
    let mut fighters: Vec<&NormalizedFighterRecord> = table
        .rows
        .iter()
        .filter(|r| {
            class == WeightClass::All
                || r.display_value(NumericColumn::Weight) == f64::from(class.pounds())
        })
        .collect();

    fighters.sort_by(|a, b| {
        b.wins.cmp(&a.wins).then_with(|| {
            b.display_value(NumericColumn::Slpm)
                .partial_cmp(&a.display_value(NumericColumn::Slpm))
                .unwrap_or(Ordering::Equal)
        })
    });
    fighters
}

pub fn render_division(class: WeightClass, fighters: &[&NormalizedFighterRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Fighters found: {} ({})\n", fighters.len(), class.label());
    let _ = writeln!(
        out,
        "{:<28} | {:>4} | {:>6} | {:>6} | {:<12} | {:>5} | {:>9} | {:>7} | {:>7}",
        "Nome", "Wins", "Losses", "Weight", "STANCE", "SLpM", "Str. Acc.", "TD Avg.", "TD Def."
    );
    let _ = writeln!(out, "{}", "-".repeat(108));

    for f in fighters {
        let _ = writeln!(
            out,
            "{:<28} | {:>4} | {:>6} | {:>6.0} | {:<12} | {:>5.2} | {:>9.2} | {:>7.2} | {:>7.2}",
            truncate(&f.name, 28),
            f.wins,
            f.losses,
            f.display_value(NumericColumn::Weight),
            truncate(f.stance.as_deref().unwrap_or(""), 12),
            f.display_value(NumericColumn::Slpm),
            f.display_value(NumericColumn::StrAcc),
            f.display_value(NumericColumn::TdAvg),
            f.display_value(NumericColumn::TdDef),
        );
    }
    out
}

// ── Comparison ──

/// Side-by-side view of two fighters, or an error naming who is unknown.
pub fn render_comparison(table: &NormalizedTable, a: &str, b: &str) -> Result<String, String> {
    let (fa, fb) = match (table.find(a), table.find(b)) {
        (Some(fa), Some(fb)) => (fa, fb),
        (None, _) => return Err(format!("Fighter not found: {}", a)),
        (_, None) => return Err(format!("Fighter not found: {}", b)),
    };

    let rows: Vec<(&str, String, String)> = vec![
        ("Record", record_line(fa), record_line(fb)),
        (
            "Height (in)",
            format!("{:.1}", fa.display_value(NumericColumn::HeightInInches)),
            format!("{:.1}", fb.display_value(NumericColumn::HeightInInches)),
        ),
        (
            "Weight (lbs)",
            format!("{}", fa.display_value(NumericColumn::Weight) as i64),
            format!("{}", fb.display_value(NumericColumn::Weight) as i64),
        ),
        (
            "Stance",
            fa.stance.clone().unwrap_or_default(),
            fb.stance.clone().unwrap_or_default(),
        ),
        numeric_row("SLpM", fa, fb, NumericColumn::Slpm),
        percent_row("Str. Acc.", fa, fb, NumericColumn::StrAcc),
        percent_row("Str. Def", fa, fb, NumericColumn::StrDef),
        numeric_row("TD Avg.", fa, fb, NumericColumn::TdAvg),
        percent_row("TD Acc.", fa, fb, NumericColumn::TdAcc),
        percent_row("TD Def.", fa, fb, NumericColumn::TdDef),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "Comparing {} vs {}\n", fa.name, fb.name);
    let _ = writeln!(out, "{:<14} | {:>24} | {:>24}", "", truncate(&fa.name, 24), truncate(&fb.name, 24));
    let _ = writeln!(out, "{}", "-".repeat(68));
    for (label, left, right) in rows {
        let _ = writeln!(out, "{:<14} | {:>24} | {:>24}", label, left, right);
    }
    Ok(out)
}

fn record_line(f: &NormalizedFighterRecord) -> String {
    format!("{} - {} - {}", f.wins, f.losses, f.draws)
}

fn numeric_row<'a>(
    label: &'a str,
    a: &NormalizedFighterRecord,
    b: &NormalizedFighterRecord,
    column: NumericColumn,
) -> (&'a str, String, String) {
    (
        label,
        format!("{:.2}", a.display_value(column)),
        format!("{:.2}", b.display_value(column)),
    )
}

fn percent_row<'a>(
    label: &'a str,
    a: &NormalizedFighterRecord,
    b: &NormalizedFighterRecord,
    column: NumericColumn,
) -> (&'a str, String, String) {
    (
        label,
        format!("{:.0}%", a.display_value(column) * 100.0),
        format!("{:.0}%", b.display_value(column) * 100.0),
    )
}

// ── Coverage ──

/// Row count plus how many cells each numeric column is missing.
pub fn render_coverage(table: &NormalizedTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Fighters:  {}", table.len());
    let _ = writeln!(out, "Missing values per column:");
    for column in NumericColumn::ALL {
        let missing = table.rows.iter().filter(|r| r.numeric(column).is_none()).count();
        let _ = writeln!(out, "  {:<18} {}", column.label(), missing);
    }
    let no_stance = table.rows.iter().filter(|r| r.stance.is_none()).count();
    let _ = writeln!(out, "  {:<18} {}", "STANCE", no_stance);
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
