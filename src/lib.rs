//! Redice - Turn-Based Tactical Dice Combat Engine
//!
//! Two teams of units fight on a battlefield split into front and back
//! lines. Each unit owns six-sided class dice whose faces invoke abilities;
//! a battle advances one validated action at a time through a small state
//! machine until one side has no survivors or a safety limit trips.

pub mod battle;
pub mod catalog;
pub mod core;
