// Entity Models
//
// Character is the only votable entity; its classification fields are
// fixed enumerations so matchups and statistics never see free-form values.

pub mod character;
pub mod classification;

pub use character::{Character, NewCharacter, ValidCharacter};
pub use classification::{Bloodline, Gender, Race};
