//! Static game data: ability, class, and die-face tables
//!
//! Loaded once from JSON before any battle, then shared immutably. The
//! combat engine consumes these rows read-only and never mutates them.

pub mod loader;
pub mod schema;

pub use loader::Catalog;
pub use schema::{
    AbilityDef, AbilityType, AbilityUsage, ClassDef, FaceDef, TargetLocation, TargetTeam,
};
