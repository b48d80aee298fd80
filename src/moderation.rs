// 🚩 Moderation Counter - report a character, remove it past the threshold

use crate::db;
use crate::error::{Error, Result, ValidationError};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use tracing::info;

/// A character is removed once its report count exceeds this value
pub const REPORT_THRESHOLD: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reports")]
pub enum ReportOutcome {
    Reported(u32),
    Deleted,
}

pub fn report_character(conn: &mut Connection, character_id: &str) -> Result<ReportOutcome> {
    let character_id = character_id.trim();
    if character_id.is_empty() {
        return Err(ValidationError::MissingOperand.into());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let reports = db::increment_reports(&tx, character_id)?
        .ok_or_else(|| Error::NotFound(character_id.to_string()))?;

    let outcome = if reports > REPORT_THRESHOLD {
        db::delete_character(&tx, character_id)?;
        ReportOutcome::Deleted
    } else {
        ReportOutcome::Reported(reports)
    };

    tx.commit()?;

    if outcome == ReportOutcome::Deleted {
        info!(character_id, reports, "character removed after reports");
    }

    Ok(outcome)
}
