//! Combat resolution engine
//!
//! The battle state machine drives rounds and turns; units spend rolled
//! dice on die-backed abilities whose effects mutate the battlefield.
//! Action legality is checked by three gates (resources, usability,
//! target) before anything is applied.

pub mod actions;
pub mod battlefield;
pub mod character;
pub mod dice;
pub mod effects;
pub mod execution;
pub mod players;
pub mod targets;
pub mod units;

// Re-exports for convenient access
pub use actions::{BattleAction, BattleActionKind};
pub use battlefield::{Area, Battlefield, Side};
pub use character::Character;
pub use dice::{Die, DieFace};
pub use effects::{Effect, EffectKind};
pub use execution::{Battle, BattleSignature, BattleState};
pub use players::{ActionSource, RandomPlayer};
pub use targets::Target;
pub use units::{Unit, UnitSetup};
