// 📥 Ingestion - add characters one at a time or in bulk from CSV
//
// Each row goes through the same pipeline: validate → insert.
// Bulk import is idempotent: re-importing a file skips existing ids.

use crate::db::{self, Filter};
use crate::entities::{Character, NewCharacter};
use crate::error::{Error, Result, ValidationError};
use rusqlite::Connection;
use std::io;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

/// Validate and store a single character
pub fn add_character(conn: &Connection, input: &NewCharacter) -> Result<Character> {
    let valid = input.validate()?;
    let character = db::insert_character(conn, &valid)?;
    debug!(character_id = %character.character_id, name = %character.name, "character added");
    Ok(character)
}

/// Parse CSV with headers character_id,name,race,bloodline,gender
///
/// Rows are validated up front so a bad file is rejected before any insert.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<NewCharacter>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize::<NewCharacter>() {
        let row = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            ValidationError::InvalidRow {
                line,
                reason: e.to_string(),
            }
        })?;
        rows.push(row);
    }

    for (index, row) in rows.iter().enumerate() {
        // header is line 1
        let line = index as u64 + 2;
        row.validate().map_err(|e| ValidationError::InvalidRow {
            line,
            reason: e.to_string(),
        })?;
    }

    Ok(rows)
}

/// Insert all rows in one transaction, skipping ids that already exist
pub fn import_characters(conn: &mut Connection, rows: &[NewCharacter]) -> Result<ImportSummary> {
    let tx = conn.transaction()?;
    let mut summary = ImportSummary::default();

    for row in rows {
        match add_character(&tx, row) {
            Ok(_) => summary.inserted += 1,
            Err(Error::Conflict(_)) => summary.duplicates += 1,
            Err(e) => return Err(e),
        }
    }

    tx.commit()?;

    info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        "import finished"
    );
    Ok(summary)
}

pub fn get_character(conn: &Connection, character_id: &str) -> Result<Character> {
    db::find_character(conn, character_id)?
        .ok_or_else(|| Error::NotFound(character_id.to_string()))
}

pub fn total_characters(conn: &Connection) -> Result<u64> {
    db::count_characters(conn, &Filter::new())
}

/// Case-insensitive exact name lookup; the earliest inserted match wins
pub fn search_by_name(conn: &Connection, name: &str) -> Result<Character> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_field("name", name));
    }

    let filter = Filter::new().equals_ignore_case(db::Column::Name, name);
    db::find_characters(conn, &filter, db::Order::Inserted, 1, 0)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(name.to_string()))
}
