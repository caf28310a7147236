use rayon::prelude::*;
use tracing::info;

use crate::models::{NormalizedFighterRecord, NormalizedTable, RawFighterRecord, RawTable, StatLabel};
use crate::parser::record::{
    parse_height, parse_number, parse_percentage, parse_reach, parse_record, parse_weight,
};

/// Raw table → normalized table. Row order is preserved.
pub fn transform(raw: &RawTable) -> NormalizedTable {
    let rows: Vec<NormalizedFighterRecord> = raw.rows.par_iter().map(normalize).collect();
    info!(rows = rows.len(), "Transformed fighter table");
    NormalizedTable::with_extra_columns(rows, raw.extra_columns.clone())
}

pub fn normalize(raw: &RawFighterRecord) -> NormalizedFighterRecord {
    let stat = |label: StatLabel| raw.stats.get(label);
    let record = parse_record(&raw.record);

    NormalizedFighterRecord {
        name: raw.name.clone(),
        weight: stat(StatLabel::Weight).and_then(parse_weight),
        reach: stat(StatLabel::Reach).and_then(parse_reach),
        stance: stat(StatLabel::Stance).map(str::to_string),
        dob: stat(StatLabel::Dob).map(str::to_string),
        slpm: stat(StatLabel::Slpm).and_then(parse_number),
        str_acc: stat(StatLabel::StrAcc).and_then(parse_percentage),
        sapm: stat(StatLabel::Sapm).and_then(parse_number),
        str_def: stat(StatLabel::StrDef).and_then(parse_percentage),
        td_avg: stat(StatLabel::TdAvg).and_then(parse_number),
        td_acc: stat(StatLabel::TdAcc).and_then(parse_percentage),
        td_def: stat(StatLabel::TdDef).and_then(parse_percentage),
        sub_avg: stat(StatLabel::SubAvg).and_then(parse_number),
        extras: raw.extras.clone(),
        height_in_inches: parse_height(stat(StatLabel::Height)),
        wins: record.wins,
        losses: record.losses,
        draws: record.draws,
    }
}
