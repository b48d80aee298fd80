// 🗳️ Vote Processor - apply one head-to-head result
//
// Validation runs before any write. Both tally updates happen inside one
// IMMEDIATE transaction and are conditional on voted = 0, so a matchup
// submitted twice (or raced by two clients) is counted at most once.

use crate::db;
use crate::error::{Error, Result, ValidationError};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// Winner +1 win, loser +1 loss, both consumed for this round
    Recorded,
    /// One side was already consumed; nothing changed
    AlreadyVoted,
}

pub fn apply_vote(conn: &mut Connection, winner_id: &str, loser_id: &str) -> Result<VoteOutcome> {
    let (winner_id, loser_id) = validate_operands(winner_id, loser_id)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let winner = db::find_character(&tx, winner_id)?
        .ok_or_else(|| Error::NotFound(winner_id.to_string()))?;
    let loser = db::find_character(&tx, loser_id)?
        .ok_or_else(|| Error::NotFound(loser_id.to_string()))?;

    if winner.voted || loser.voted {
        debug!(winner = winner_id, loser = loser_id, "vote ignored, matchup already consumed");
        return Ok(VoteOutcome::AlreadyVoted);
    }

    // Dropping tx without commit rolls back the winner update
    if !db::record_win(&tx, winner_id)? || !db::record_loss(&tx, loser_id)? {
        debug!(winner = winner_id, loser = loser_id, "vote lost the race, rolled back");
        return Ok(VoteOutcome::AlreadyVoted);
    }

    tx.commit()?;
    debug!(winner = winner_id, loser = loser_id, "vote recorded");

    Ok(VoteOutcome::Recorded)
}

fn validate_operands<'a>(winner_id: &'a str, loser_id: &'a str) -> Result<(&'a str, &'a str)> {
    let winner_id = winner_id.trim();
    let loser_id = loser_id.trim();

    if winner_id.is_empty() || loser_id.is_empty() {
        return Err(ValidationError::MissingOperand.into());
    }
    if winner_id == loser_id {
        return Err(ValidationError::SelfVote.into());
    }

    Ok((winner_id, loser_id))
}
