//! Field-level coercions from the strings ufcstats prints to numbers.
//!
//! Every parser is total: bad input gives `None`, never an error.

/// Parses a plain number, treating `NaN` as missing.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// `"45%"` → `0.45`. Out-of-range values are kept as-is.
pub fn parse_percentage(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix('%').unwrap_or(s);
    parse_number(s).map(|v| v / 100.0)
}

/// `"185 lbs."` → `185.0`
pub fn parse_weight(s: &str) -> Option<f64> {
    let s = s.trim();
    parse_number(s.strip_suffix(" lbs.").unwrap_or(s))
}

/// `"72\""` → `72.0`
pub fn parse_reach(s: &str) -> Option<f64> {
    parse_number(&s.replace('"', ""))
}

/// `"5' 7\""` → `67.0` inches.
pub fn parse_height(s: Option<&str>) -> Option<f64> {
    let s = s?;
    if s.contains("N/A") || s.contains("None") {
        return None;
    }
    let cleaned = s.replace('"', "");
    let (feet, inches) = cleaned.split_once('\'')?;
    let feet = parse_number(feet)?;
    let inches = parse_number(inches)?;
    Some(feet * 12.0 + inches)
}

/// Wins, losses, draws from a `W-L-D` string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinLossDraw {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

/// Splits on `-`; absent or non-integer components count as 0, so
/// `"24-3"` reads as 24-3-0.
pub fn parse_record(s: &str) -> WinLossDraw {
    let mut parts = s.split('-').map(|p| p.trim().parse::<u32>().unwrap_or(0));
    WinLossDraw {
        wins: parts.next().unwrap_or(0),
        losses: parts.next().unwrap_or(0),
        draws: parts.next().unwrap_or(0),
    }
}
