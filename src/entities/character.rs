// 👤 Character Entity - the votable unit
//
// Identity: character_id (externally sourced, never changes)
// Classification: race, bloodline, gender (immutable)
// Tallies: wins, losses, reports (monotonic), voted (reset per round)

use super::classification::{Bloodline, Gender, Race};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CHARACTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub character_id: String,
    pub name: String,
    pub race: Race,
    pub bloodline: Bloodline,
    pub gender: Gender,

    pub wins: u32,
    pub losses: u32,
    pub reports: u32,

    /// Already shown in the current round
    pub voted: bool,

    pub created_at: DateTime<Utc>,
}

impl Character {
    /// Widened so two saturated u32 tallies still add up
    pub fn total_votes(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }

    /// wins / (wins + losses), 0.0 when the character has never been voted on
    pub fn win_ratio(&self) -> f64 {
        let total = self.total_votes();
        if total == 0 {
            0.0
        } else {
            f64::from(self.wins) / total as f64
        }
    }
}

// ============================================================================
// NEW CHARACTER (ingestion input)
// ============================================================================

/// Unvalidated ingestion payload, as read from CSV or a request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCharacter {
    #[serde(alias = "character_id")]
    pub character_id: String,
    pub name: String,
    pub race: String,
    pub bloodline: String,
    pub gender: String,
}

/// Ingestion payload after every field has been checked
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCharacter {
    pub character_id: String,
    pub name: String,
    pub race: Race,
    pub bloodline: Bloodline,
    pub gender: Gender,
}

impl NewCharacter {
    pub fn validate(&self) -> Result<ValidCharacter> {
        let character_id = required("characterId", &self.character_id)?;
        let name = required("name", &self.name)?;
        let race: Race = self.race.parse()?;
        let bloodline: Bloodline = self.bloodline.parse()?;
        let gender: Gender = self.gender.parse()?;
        bloodline.check_race(race)?;

        Ok(ValidCharacter {
            character_id,
            name,
            race,
            bloodline,
            gender,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_field(field, value));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn sample(race: &str, bloodline: &str) -> NewCharacter {
        NewCharacter {
            character_id: "90000001".to_string(),
            name: " Kira Aurelius ".to_string(),
            race: race.to_string(),
            bloodline: bloodline.to_string(),
            gender: "female".to_string(),
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let valid = sample("gallente", "intaki").validate().unwrap();
        assert_eq!(valid.name, "Kira Aurelius");
        assert_eq!(valid.race, Race::Gallente);
        assert_eq!(valid.bloodline, Bloodline::Intaki);
        assert_eq!(valid.gender, Gender::Female);
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let mut input = sample("Caldari", "Deteis");
        input.character_id = "  ".to_string();
        assert!(matches!(
            input.validate(),
            Err(Error::Validation(ValidationError::InvalidField { ref field, .. })) if field == "characterId"
        ));
    }

    #[test]
    fn test_validate_rejects_foreign_bloodline() {
        assert!(matches!(
            sample("Caldari", "Brutor").validate(),
            Err(Error::Validation(ValidationError::BloodlineMismatch { .. }))
        ));
    }

    #[test]
    fn test_win_ratio_handles_zero_votes() {
        let mut character = Character {
            character_id: "1".to_string(),
            name: "A".to_string(),
            race: Race::Amarr,
            bloodline: Bloodline::Khanid,
            gender: Gender::Male,
            wins: 0,
            losses: 0,
            reports: 0,
            voted: false,
            created_at: Utc::now(),
        };
        assert_eq!(character.win_ratio(), 0.0);

        character.wins = 3;
        character.losses = 1;
        assert_eq!(character.win_ratio(), 0.75);
    }

    #[test]
    fn test_total_votes_does_not_overflow_at_max_tallies() {
        let character = Character {
            character_id: "2".to_string(),
            name: "B".to_string(),
            race: Race::Minmatar,
            bloodline: Bloodline::Vherokior,
            gender: Gender::Female,
            wins: u32::MAX,
            losses: u32::MAX,
            reports: 0,
            voted: false,
            created_at: Utc::now(),
        };
        assert_eq!(character.total_votes(), 2 * u64::from(u32::MAX));
        assert_eq!(character.win_ratio(), 0.5);
    }
}
