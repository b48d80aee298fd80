// 🎲 Matchup Selector - two distinct, same-gender, not-yet-voted characters
//
// Sampling uses a uniform random offset into the unvoted subset of one
// gender. Two distinct offsets are drawn, so the pair is always distinct.
// When neither gender has two unvoted characters the round is over:
// every character is released (tallies kept) and no matchup is returned.

use crate::db::{self, Filter, Order};
use crate::entities::{Character, Gender};
use crate::error::Result;
use rand::seq::index;
use rand::Rng;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matchup {
    pub first: Character,
    pub second: Character,
}

impl Matchup {
    pub fn into_pair(self) -> [Character; 2] {
        [self.first, self.second]
    }
}

pub fn select_matchup(conn: &mut Connection) -> Result<Option<Matchup>> {
    select_matchup_with(conn, &mut rand::thread_rng())
}

pub fn select_matchup_with<R: Rng + ?Sized>(
    conn: &mut Connection,
    rng: &mut R,
) -> Result<Option<Matchup>> {
    // Write lock up front: a round reset must not race a vote
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let preferred = if rng.gen_bool(0.5) {
        Gender::Female
    } else {
        Gender::Male
    };

    for gender in [preferred, preferred.other()] {
        if let Some(matchup) = sample_pair(&tx, gender, rng)? {
            tx.commit()?;
            debug!(
                gender = %gender,
                first = %matchup.first.character_id,
                second = %matchup.second.character_id,
                "matchup selected"
            );
            return Ok(Some(matchup));
        }
    }

    let released = db::reset_voted(&tx)?;
    tx.commit()?;
    debug!(released, "round exhausted, voted flags reset");

    Ok(None)
}

fn sample_pair<R: Rng + ?Sized>(
    conn: &Connection,
    gender: Gender,
    rng: &mut R,
) -> Result<Option<Matchup>> {
    let unvoted = Filter::new().gender(gender).voted(false);
    let available = db::count_characters(conn, &unvoted)? as usize;
    if available < 2 {
        return Ok(None);
    }

    let picks = index::sample(rng, available, 2);
    let first = nth(conn, &unvoted, picks.index(0))?;
    let second = nth(conn, &unvoted, picks.index(1))?;

    Ok(first.zip(second).map(|(first, second)| Matchup { first, second }))
}

fn nth(conn: &Connection, filter: &Filter, offset: usize) -> Result<Option<Character>> {
    Ok(db::find_characters(conn, filter, Order::Inserted, 1, offset)?
        .into_iter()
        .next())
}
