// 📊 Aggregate Reporter - population counts and leading race/bloodline
//
// All sub-queries run inside one read transaction so the numbers describe
// a single snapshot. Leading values are taken from the top 100 by wins;
// equal counts resolve to the alphabetically first name.

use crate::db::{self, Filter, Order};
use crate::entities::{Bloodline, Gender, Race};
use crate::error::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

const LEADER_POOL: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader<T> {
    pub value: T,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_count: u64,
    pub race_counts: BTreeMap<Race, u64>,
    pub gender_counts: BTreeMap<Gender, u64>,
    /// Each vote adds exactly one win
    pub total_votes: u64,
    pub leading_race: Option<Leader<Race>>,
    pub leading_bloodline: Option<Leader<Bloodline>>,
}

pub fn compute_stats(conn: &mut Connection) -> Result<Stats> {
    let tx = conn.transaction()?;

    let total_count = db::count_characters(&tx, &Filter::new())?;

    let mut race_counts = BTreeMap::new();
    for race in Race::ALL {
        let filter = Filter::new().equals_ignore_case(db::Column::Race, race.as_str());
        race_counts.insert(race, db::count_characters(&tx, &filter)?);
    }

    let mut gender_counts = BTreeMap::new();
    for gender in Gender::ALL {
        gender_counts.insert(gender, db::count_characters(&tx, &Filter::new().gender(gender))?);
    }

    let total_votes = db::sum_wins(&tx)?;

    let pool = db::find_characters(&tx, &Filter::new(), Order::WinsDesc, LEADER_POOL, 0)?;
    let leading_race = leading(pool.iter().map(|c| c.race), |r| r.as_str());
    let leading_bloodline = leading(pool.iter().map(|c| c.bloodline), |b| b.as_str());

    tx.commit()?;

    Ok(Stats {
        total_count,
        race_counts,
        gender_counts,
        total_votes,
        leading_race,
        leading_bloodline,
    })
}

/// Most frequent value; ties go to the alphabetically first label
fn leading<T, I, F>(values: I, label: F) -> Option<Leader<T>>
where
    T: Copy + Eq + Hash,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &'static str,
{
    let mut counts: HashMap<T, u64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, count_a), (b, count_b)| {
            count_a.cmp(count_b).then_with(|| label(b).cmp(label(a)))
        })
        .map(|(value, count)| Leader { value, count })
}
