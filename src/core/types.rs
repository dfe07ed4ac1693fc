//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for units
///
/// Assigned sequentially by the battlefield at creation so that recorded
/// action sequences stay valid across replays of the same roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Team color assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    #[default]
    None,
    Blue,
    Red,
}

/// Battlefield placement: a unit stands either in the front or the back
/// line of its side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Location {
    #[default]
    None,
    Back,
    Front,
}

impl Location {
    /// The other line of the same side
    pub fn flipped(self) -> Location {
        match self {
            Location::Front => Location::Back,
            Location::Back => Location::Front,
            Location::None => Location::None,
        }
    }
}

/// Shape of thing an ability targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetType {
    #[default]
    None,
    Unit,
    Area,
    Side,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_flipped() {
        assert_eq!(Location::Front.flipped(), Location::Back);
        assert_eq!(Location::Back.flipped(), Location::Front);
        assert_eq!(Location::None.flipped(), Location::None);
    }

    #[test]
    fn test_unit_id_equality() {
        assert_eq!(UnitId(3), UnitId(3));
        assert_ne!(UnitId(3), UnitId(4));
    }

    #[test]
    fn test_team_deserialize_uppercase() {
        let team: Team = serde_json::from_str("\"BLUE\"").unwrap();
        assert_eq!(team, Team::Blue);
    }
}
