// 🗄️ Character Store - SQLite (WAL) behind a small query contract
//
// find_character / find_characters / count_characters / sum_wins
// conditional tally updates / reset_voted / delete_character
//
// rowid order is insertion order and is the tie-breaker for every listing.

use crate::entities::{Character, Gender, ValidCharacter};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;

const CHARACTER_COLUMNS: &str =
    "character_id, name, race, bloodline, gender, wins, losses, reports, voted, created_at";

pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Concurrent connections wait on the write lock instead of failing
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS characters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            character_id TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            race TEXT NOT NULL,
            bloodline TEXT NOT NULL,
            gender TEXT NOT NULL,
            wins INTEGER NOT NULL DEFAULT 0 CHECK (wins >= 0),
            losses INTEGER NOT NULL DEFAULT 0 CHECK (losses >= 0),
            reports INTEGER NOT NULL DEFAULT 0 CHECK (reports >= 0),
            voted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_gender_voted ON characters(gender, voted)",
        [],
    )?;

    conn.execute("CREATE INDEX IF NOT EXISTS idx_wins ON characters(wins)", [])?;

    conn.execute("CREATE INDEX IF NOT EXISTS idx_losses ON characters(losses)", [])?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_name ON characters(name COLLATE NOCASE)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// FILTER / ORDER
// ============================================================================

/// Columns a caller may constrain with a case-insensitive string match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Race,
    Bloodline,
    Gender,
}

impl Column {
    fn as_sql(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Race => "race",
            Column::Bloodline => "bloodline",
            Column::Gender => "gender",
        }
    }
}

/// Conjunction of predicates over the characters table
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gender(self, gender: Gender) -> Self {
        self.push("gender = ?", Value::Text(gender.as_str().to_string()))
    }

    pub fn voted(self, voted: bool) -> Self {
        self.push("voted = ?", Value::Integer(i64::from(voted)))
    }

    pub fn equals_ignore_case(self, column: Column, value: &str) -> Self {
        let clause = format!("{} = ? COLLATE NOCASE", column.as_sql());
        self.push(&clause, Value::Text(value.to_string()))
    }

    fn push(mut self, clause: &str, param: Value) -> Self {
        self.clauses.push(clause.to_string());
        self.params.push(param);
        self
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Inserted,
    WinsDesc,
    LossesDesc,
}

impl Order {
    fn as_sql(&self) -> &'static str {
        match self {
            Order::Inserted => " ORDER BY id ASC",
            Order::WinsDesc => " ORDER BY wins DESC, id ASC",
            Order::LossesDesc => " ORDER BY losses DESC, id ASC",
        }
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn character_from_row(row: &Row) -> rusqlite::Result<Character> {
    let race: String = row.get(2)?;
    let bloodline: String = row.get(3)?;
    let gender: String = row.get(4)?;
    let created_at: String = row.get(9)?;

    Ok(Character {
        character_id: row.get(0)?,
        name: row.get(1)?,
        race: race.parse().map_err(|e| conversion_error(2, e))?,
        bloodline: bloodline.parse().map_err(|e| conversion_error(3, e))?,
        gender: gender.parse().map_err(|e| conversion_error(4, e))?,
        wins: row.get(5)?,
        losses: row.get(6)?,
        reports: row.get(7)?,
        voted: row.get(8)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| conversion_error(9, e))?
            .with_timezone(&Utc),
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

// ============================================================================
// QUERIES
// ============================================================================

/// Insert a validated character with zero tallies
pub fn insert_character(conn: &Connection, character: &ValidCharacter) -> Result<Character> {
    let created_at = Utc::now();

    let result = conn.execute(
        "INSERT INTO characters (character_id, name, race, bloodline, gender, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            character.character_id,
            character.name,
            character.race.as_str(),
            character.bloodline.as_str(),
            character.gender.as_str(),
            created_at.to_rfc3339(),
        ],
    );

    match result {
        Ok(_) => Ok(Character {
            character_id: character.character_id.clone(),
            name: character.name.clone(),
            race: character.race,
            bloodline: character.bloodline,
            gender: character.gender,
            wins: 0,
            losses: 0,
            reports: 0,
            voted: false,
            created_at,
        }),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(Error::Conflict(character.character_id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn find_character(conn: &Connection, character_id: &str) -> Result<Option<Character>> {
    let sql = format!("SELECT {CHARACTER_COLUMNS} FROM characters WHERE character_id = ?1");
    let character = conn
        .query_row(&sql, [character_id], character_from_row)
        .optional()?;
    Ok(character)
}

pub fn find_characters(
    conn: &Connection,
    filter: &Filter,
    order: Order,
    limit: usize,
    offset: usize,
) -> Result<Vec<Character>> {
    let sql = format!(
        "SELECT {CHARACTER_COLUMNS} FROM characters{}{} LIMIT {} OFFSET {}",
        filter.where_sql(),
        order.as_sql(),
        limit,
        offset
    );

    let mut stmt = conn.prepare(&sql)?;
    let characters = stmt
        .query_map(params_from_iter(filter.params.iter()), character_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(characters)
}

pub fn count_characters(conn: &Connection, filter: &Filter) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM characters{}", filter.where_sql());
    let count: i64 = conn.query_row(&sql, params_from_iter(filter.params.iter()), |row| {
        row.get(0)
    })?;
    Ok(count.max(0) as u64)
}

/// Sum of wins across the population (one per recorded vote)
pub fn sum_wins(conn: &Connection) -> Result<u64> {
    let total: i64 = conn.query_row("SELECT COALESCE(SUM(wins), 0) FROM characters", [], |row| {
        row.get(0)
    })?;
    Ok(total.max(0) as u64)
}

/// Add a win and consume the character for this round, only if still unvoted
pub fn record_win(conn: &Connection, character_id: &str) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE characters SET wins = wins + 1, voted = 1
         WHERE character_id = ?1 AND voted = 0",
        [character_id],
    )?;
    Ok(updated == 1)
}

/// Add a loss and consume the character for this round, only if still unvoted
pub fn record_loss(conn: &Connection, character_id: &str) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE characters SET losses = losses + 1, voted = 1
         WHERE character_id = ?1 AND voted = 0",
        [character_id],
    )?;
    Ok(updated == 1)
}

/// Start a new round; tallies are untouched
pub fn reset_voted(conn: &Connection) -> Result<usize> {
    let updated = conn.execute("UPDATE characters SET voted = 0 WHERE voted = 1", [])?;
    Ok(updated)
}

/// Atomically bump the report counter, returning the new value
pub fn increment_reports(conn: &Connection, character_id: &str) -> Result<Option<u32>> {
    let reports = conn
        .query_row(
            "UPDATE characters SET reports = reports + 1
             WHERE character_id = ?1
             RETURNING reports",
            [character_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(reports)
}

pub fn delete_character(conn: &Connection, character_id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM characters WHERE character_id = ?1", [character_id])?;
    Ok(deleted == 1)
}
