use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static FIGHTER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/fighter-details/([0-9A-Za-z]+)").unwrap());

pub const NAME_COLUMN: &str = "Nome";
pub const RECORD_COLUMN: &str = "Recorde";
pub const HEIGHT_INCHES_COLUMN: &str = "Height_in_inches";
pub const WINS_COLUMN: &str = "Wins";
pub const LOSSES_COLUMN: &str = "Losses";
pub const DRAWS_COLUMN: &str = "Draws";

// ── Locators ──

/// URL of one fighter-details page. Compared by exact string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FighterLocator(String);

impl FighterLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The opaque id segment after `/fighter-details/`, if the URL has one.
    pub fn fighter_id(&self) -> Option<&str> {
        FIGHTER_ID_RE
            .captures(&self.0)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

impl fmt::Display for FighterLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of locators.
#[derive(Debug, Clone, Default)]
pub struct LocatorSet {
    order: Vec<FighterLocator>,
    seen: HashSet<FighterLocator>,
}

impl LocatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the locator was already present.
    pub fn insert(&mut self, locator: FighterLocator) -> bool {
        if self.contains(&locator) {
            return false;
        }
        self.seen.insert(locator.clone());
        self.order.push(locator);
        true
    }

    /// Adds every locator from `other`, returning how many were new.
    pub fn merge(&mut self, other: LocatorSet) -> usize {
        other
            .order
            .into_iter()
            .filter(|l| self.insert(l.clone()))
            .count()
    }

    pub fn contains(&self, locator: &FighterLocator) -> bool {
        self.seen.contains(locator)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FighterLocator> {
        self.order.iter()
    }
}

impl FromIterator<FighterLocator> for LocatorSet {
    fn from_iter<I: IntoIterator<Item = FighterLocator>>(iter: I) -> Self {
        let mut set = LocatorSet::new();
        for locator in iter {
            set.insert(locator);
        }
        set
    }
}

// ── Stat labels ──

/// Stat labels as ufcstats prints them on a fighter page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatLabel {
    Height,
    Weight,
    Reach,
    Stance,
    Dob,
    Slpm,
    StrAcc,
    Sapm,
    StrDef,
    TdAvg,
    TdAcc,
    TdDef,
    SubAvg,
}

impl StatLabel {
    pub const ALL: [StatLabel; 13] = [
        StatLabel::Height,
        StatLabel::Weight,
        StatLabel::Reach,
        StatLabel::Stance,
        StatLabel::Dob,
        StatLabel::Slpm,
        StatLabel::StrAcc,
        StatLabel::Sapm,
        StatLabel::StrDef,
        StatLabel::TdAvg,
        StatLabel::TdAcc,
        StatLabel::TdDef,
        StatLabel::SubAvg,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatLabel::Height => "Height",
            StatLabel::Weight => "Weight",
            StatLabel::Reach => "Reach",
            StatLabel::Stance => "STANCE",
            StatLabel::Dob => "DOB",
            StatLabel::Slpm => "SLpM",
            StatLabel::StrAcc => "Str. Acc.",
            StatLabel::Sapm => "SApM",
            StatLabel::StrDef => "Str. Def",
            StatLabel::TdAvg => "TD Avg.",
            StatLabel::TdAcc => "TD Acc.",
            StatLabel::TdDef => "TD Def.",
            StatLabel::SubAvg => "Sub. Avg.",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

// ── Raw table ──

/// Stat values exactly as printed, one slot per known label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStats {
    pub height: Option<String>,
    pub weight: Option<String>,
    pub reach: Option<String>,
    pub stance: Option<String>,
    pub dob: Option<String>,
    pub slpm: Option<String>,
    pub str_acc: Option<String>,
    pub sapm: Option<String>,
    pub str_def: Option<String>,
    pub td_avg: Option<String>,
    pub td_acc: Option<String>,
    pub td_def: Option<String>,
    pub sub_avg: Option<String>,
}

impl RawStats {
    pub fn get(&self, label: StatLabel) -> Option<&str> {
        let slot = match label {
            StatLabel::Height => &self.height,
            StatLabel::Weight => &self.weight,
            StatLabel::Reach => &self.reach,
            StatLabel::Stance => &self.stance,
            StatLabel::Dob => &self.dob,
            StatLabel::Slpm => &self.slpm,
            StatLabel::StrAcc => &self.str_acc,
            StatLabel::Sapm => &self.sapm,
            StatLabel::StrDef => &self.str_def,
            StatLabel::TdAvg => &self.td_avg,
            StatLabel::TdAcc => &self.td_acc,
            StatLabel::TdDef => &self.td_def,
            StatLabel::SubAvg => &self.sub_avg,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, label: StatLabel) -> &mut Option<String> {
        match label {
            StatLabel::Height => &mut self.height,
            StatLabel::Weight => &mut self.weight,
            StatLabel::Reach => &mut self.reach,
            StatLabel::Stance => &mut self.stance,
            StatLabel::Dob => &mut self.dob,
            StatLabel::Slpm => &mut self.slpm,
            StatLabel::StrAcc => &mut self.str_acc,
            StatLabel::Sapm => &mut self.sapm,
            StatLabel::StrDef => &mut self.str_def,
            StatLabel::TdAvg => &mut self.td_avg,
            StatLabel::TdAcc => &mut self.td_acc,
            StatLabel::TdDef => &mut self.td_def,
            StatLabel::SubAvg => &mut self.sub_avg,
        }
    }

    pub fn set(&mut self, label: StatLabel, value: String) {
        *self.slot_mut(label) = Some(value);
    }
}

/// One fighter as scraped, before any numeric coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFighterRecord {
    pub name: String,
    pub record: String,
    pub stats: RawStats,
    /// Labels the page listed that are not in [`StatLabel::ALL`].
    pub extras: BTreeMap<String, String>,
}

impl RawFighterRecord {
    pub fn new(name: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record: record.into(),
            ..Default::default()
        }
    }

    /// Stores a `label: value` pair, routing unknown labels to `extras`.
    pub fn insert_stat(&mut self, label: &str, value: impl Into<String>) {
        match StatLabel::from_label(label) {
            Some(known) => self.stats.set(known, value.into()),
            None => {
                self.extras.insert(label.to_string(), value.into());
            }
        }
    }

    #[cfg(test)]
    pub fn with_stat(mut self, label: &str, value: impl Into<String>) -> Self {
        self.insert_stat(label, value);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<RawFighterRecord>,
    /// Unrecognized columns, including ones that are empty in every row.
    pub extra_columns: BTreeSet<String>,
}

impl RawTable {
    pub fn new(rows: Vec<RawFighterRecord>) -> Self {
        Self::with_extra_columns(rows, BTreeSet::new())
    }

    /// `columns` is merged with every extras key the rows carry.
    pub fn with_extra_columns(rows: Vec<RawFighterRecord>, mut columns: BTreeSet<String>) -> Self {
        columns.extend(rows.iter().flat_map(|r| r.extras.keys().cloned()));
        Self {
            rows,
            extra_columns: columns,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Known labels present in at least one row, in canonical order.
    pub fn known_labels(&self) -> Vec<StatLabel> {
        StatLabel::ALL
            .into_iter()
            .filter(|&l| self.rows.iter().any(|r| r.stats.get(l).is_some()))
            .collect()
    }

    pub fn extra_labels(&self) -> BTreeSet<&str> {
        self.extra_columns
            .iter()
            .map(String::as_str)
            .chain(self.rows.iter().flat_map(|r| r.extras.keys().map(String::as_str)))
            .collect()
    }
}

// ── Normalized table ──

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFighterRecord {
    pub name: String,
    pub weight: Option<f64>,
    pub reach: Option<f64>,
    pub stance: Option<String>,
    pub dob: Option<String>,
    pub slpm: Option<f64>,
    pub str_acc: Option<f64>,
    pub sapm: Option<f64>,
    pub str_def: Option<f64>,
    pub td_avg: Option<f64>,
    pub td_acc: Option<f64>,
    pub td_def: Option<f64>,
    pub sub_avg: Option<f64>,
    pub extras: BTreeMap<String, String>,
    pub height_in_inches: Option<f64>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

/// Numeric columns of the normalized table, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Weight,
    Reach,
    Slpm,
    StrAcc,
    Sapm,
    StrDef,
    TdAvg,
    TdAcc,
    TdDef,
    SubAvg,
    HeightInInches,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 11] = [
        NumericColumn::Weight,
        NumericColumn::Reach,
        NumericColumn::Slpm,
        NumericColumn::StrAcc,
        NumericColumn::Sapm,
        NumericColumn::StrDef,
        NumericColumn::TdAvg,
        NumericColumn::TdAcc,
        NumericColumn::TdDef,
        NumericColumn::SubAvg,
        NumericColumn::HeightInInches,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NumericColumn::Weight => StatLabel::Weight.label(),
            NumericColumn::Reach => StatLabel::Reach.label(),
            NumericColumn::Slpm => StatLabel::Slpm.label(),
            NumericColumn::StrAcc => StatLabel::StrAcc.label(),
            NumericColumn::Sapm => StatLabel::Sapm.label(),
            NumericColumn::StrDef => StatLabel::StrDef.label(),
            NumericColumn::TdAvg => StatLabel::TdAvg.label(),
            NumericColumn::TdAcc => StatLabel::TdAcc.label(),
            NumericColumn::TdDef => StatLabel::TdDef.label(),
            NumericColumn::SubAvg => StatLabel::SubAvg.label(),
            NumericColumn::HeightInInches => HEIGHT_INCHES_COLUMN,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl NormalizedFighterRecord {
    pub fn numeric(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::Weight => self.weight,
            NumericColumn::Reach => self.reach,
            NumericColumn::Slpm => self.slpm,
            NumericColumn::StrAcc => self.str_acc,
            NumericColumn::Sapm => self.sapm,
            NumericColumn::StrDef => self.str_def,
            NumericColumn::TdAvg => self.td_avg,
            NumericColumn::TdAcc => self.td_acc,
            NumericColumn::TdDef => self.td_def,
            NumericColumn::SubAvg => self.sub_avg,
            NumericColumn::HeightInInches => self.height_in_inches,
        }
    }

    pub fn set_numeric(&mut self, column: NumericColumn, value: Option<f64>) {
        let slot = match column {
            NumericColumn::Weight => &mut self.weight,
            NumericColumn::Reach => &mut self.reach,
            NumericColumn::Slpm => &mut self.slpm,
            NumericColumn::StrAcc => &mut self.str_acc,
            NumericColumn::Sapm => &mut self.sapm,
            NumericColumn::StrDef => &mut self.str_def,
            NumericColumn::TdAvg => &mut self.td_avg,
            NumericColumn::TdAcc => &mut self.td_acc,
            NumericColumn::TdDef => &mut self.td_def,
            NumericColumn::SubAvg => &mut self.sub_avg,
            NumericColumn::HeightInInches => &mut self.height_in_inches,
        };
        *slot = value;
    }

    /// Value shown to users: missing numbers read as zero.
    pub fn display_value(&self, column: NumericColumn) -> f64 {
        self.numeric(column).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    pub rows: Vec<NormalizedFighterRecord>,
    pub extra_columns: BTreeSet<String>,
}

impl NormalizedTable {
    pub fn new(rows: Vec<NormalizedFighterRecord>) -> Self {
        Self::with_extra_columns(rows, BTreeSet::new())
    }

    pub fn with_extra_columns(rows: Vec<NormalizedFighterRecord>, mut columns: BTreeSet<String>) -> Self {
        columns.extend(rows.iter().flat_map(|r| r.extras.keys().cloned()));
        Self {
            rows,
            extra_columns: columns,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn extra_labels(&self) -> BTreeSet<&str> {
        self.extra_columns
            .iter()
            .map(String::as_str)
            .chain(self.rows.iter().flat_map(|r| r.extras.keys().map(String::as_str)))
            .collect()
    }

    /// First row whose name matches exactly.
    pub fn find(&self, name: &str) -> Option<&NormalizedFighterRecord> {
        self.rows.iter().find(|r| r.name == name)
    }
}
