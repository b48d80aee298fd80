// 🏆 Leaderboard Ranker
//
// Top: the store narrows to the `limit` characters with most wins, then the
// candidates are re-sorted by win ratio (stable, so equal ratios keep the
// store order). Bottom: most losses first, no ratio.

use crate::db::{self, Column, Filter, Order};
use crate::entities::Character;
use crate::error::{Result, ValidationError};
use rusqlite::Connection;
use std::collections::BTreeMap;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1000;

/// Field name → case-insensitive exact value
pub type Filters = BTreeMap<String, String>;

pub fn top_ranked(conn: &Connection, filters: &Filters, limit: Option<usize>) -> Result<Vec<Character>> {
    let filter = build_filter(filters)?;
    let mut candidates = db::find_characters(conn, &filter, Order::WinsDesc, clamp_limit(limit), 0)?;

    // sort_by is stable
    candidates.sort_by(|a, b| b.win_ratio().total_cmp(&a.win_ratio()));

    Ok(candidates)
}

pub fn bottom_ranked(conn: &Connection, limit: Option<usize>) -> Result<Vec<Character>> {
    db::find_characters(conn, &Filter::new(), Order::LossesDesc, clamp_limit(limit), 0)
}

pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

fn build_filter(filters: &Filters) -> Result<Filter> {
    let mut filter = Filter::new();

    for (field, value) in filters {
        let column = match field.to_ascii_lowercase().as_str() {
            "race" => Column::Race,
            "bloodline" => Column::Bloodline,
            "gender" => Column::Gender,
            _ => return Err(ValidationError::UnknownFilter(field.clone()).into()),
        };
        if value.trim().is_empty() {
            continue;
        }
        filter = filter.equals_ignore_case(column, value.trim());
    }

    Ok(filter)
}
