// 🏷️ Classification - fixed race / bloodline / gender values
//
// These fields are immutable once a character is ingested.
// Gender is the matchup group, race and bloodline drive the statistics.

use crate::error::{Error, Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RACE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Race {
    Amarr,
    Caldari,
    Gallente,
    Minmatar,
}

impl Race {
    pub const ALL: [Race; 4] = [Race::Amarr, Race::Caldari, Race::Gallente, Race::Minmatar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Race::Amarr => "Amarr",
            Race::Caldari => "Caldari",
            Race::Gallente => "Gallente",
            Race::Minmatar => "Minmatar",
        }
    }
}

impl FromStr for Race {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Race::ALL
            .into_iter()
            .find(|race| race.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_field("race", s))
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BLOODLINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bloodline {
    Amarr,
    #[serde(rename = "Ni-Kunni")]
    NiKunni,
    Khanid,
    Civire,
    Deteis,
    Achura,
    Gallente,
    Intaki,
    #[serde(rename = "Jin-Mei")]
    JinMei,
    Brutor,
    Sebiestor,
    Vherokior,
}

impl Bloodline {
    pub const ALL: [Bloodline; 12] = [
        Bloodline::Amarr,
        Bloodline::NiKunni,
        Bloodline::Khanid,
        Bloodline::Civire,
        Bloodline::Deteis,
        Bloodline::Achura,
        Bloodline::Gallente,
        Bloodline::Intaki,
        Bloodline::JinMei,
        Bloodline::Brutor,
        Bloodline::Sebiestor,
        Bloodline::Vherokior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bloodline::Amarr => "Amarr",
            Bloodline::NiKunni => "Ni-Kunni",
            Bloodline::Khanid => "Khanid",
            Bloodline::Civire => "Civire",
            Bloodline::Deteis => "Deteis",
            Bloodline::Achura => "Achura",
            Bloodline::Gallente => "Gallente",
            Bloodline::Intaki => "Intaki",
            Bloodline::JinMei => "Jin-Mei",
            Bloodline::Brutor => "Brutor",
            Bloodline::Sebiestor => "Sebiestor",
            Bloodline::Vherokior => "Vherokior",
        }
    }

    pub fn race(&self) -> Race {
        match self {
            Bloodline::Amarr | Bloodline::NiKunni | Bloodline::Khanid => Race::Amarr,
            Bloodline::Civire | Bloodline::Deteis | Bloodline::Achura => Race::Caldari,
            Bloodline::Gallente | Bloodline::Intaki | Bloodline::JinMei => Race::Gallente,
            Bloodline::Brutor | Bloodline::Sebiestor | Bloodline::Vherokior => Race::Minmatar,
        }
    }

    /// Ensure this bloodline belongs to `race`
    pub fn check_race(&self, race: Race) -> Result<()> {
        if self.race() == race {
            Ok(())
        } else {
            Err(ValidationError::BloodlineMismatch {
                bloodline: self.as_str().to_string(),
                race: race.as_str().to_string(),
            }
            .into())
        }
    }
}

impl FromStr for Bloodline {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Bloodline::ALL
            .into_iter()
            .find(|bloodline| bloodline.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_field("bloodline", s))
    }
}

impl fmt::Display for Bloodline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// GENDER (matchup group)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }

    pub fn other(&self) -> Gender {
        match self {
            Gender::Female => Gender::Male,
            Gender::Male => Gender::Female,
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_field("gender", s))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
