//! Combatants: instances of characters placed on the battlefield

use rand::Rng;

use crate::battle::character::Character;
use crate::battle::dice::Die;
use crate::catalog::Catalog;
use crate::core::error::Result;
use crate::core::types::{Location, Team, UnitId};

/// Blueprint for spawning a unit: everything a battlefield needs to build
/// it, captured independently of any battle instance
#[derive(Debug, Clone)]
pub struct UnitSetup {
    pub character: Character,
    pub team: Team,
    pub location: Location,
    pub label: String,
}

impl UnitSetup {
    pub fn new(character: Character, team: Team, location: Location, label: &str) -> Self {
        Self {
            character,
            team,
            location,
            label: label.to_string(),
        }
    }
}

/// A living combatant
///
/// Health and initiative are tracked here; container membership (side,
/// area, roster, turn order) is tracked by the battlefield and must stay
/// in sync with `location`, which is why `location` is only mutated
/// through [`Battlefield::move_unit`](crate::battle::Battlefield).
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub label: String,
    pub character: Character,
    pub team: Team,
    pub(crate) location: Location,
    pub current_health: i32,
    /// Primary turn-order sort key
    pub total_init: f32,
    /// Tiebreak sort key, drawn at battle start to eliminate ties
    pub prec_init: f32,
    pub dice: Vec<Die>,
}

impl Unit {
    pub(crate) fn new(catalog: &Catalog, id: UnitId, setup: &UnitSetup) -> Result<Unit> {
        let mut dice = Vec::with_capacity(setup.character.total_levels() as usize);
        for (class_id, level) in setup.character.class_levels() {
            for _ in 0..*level {
                dice.push(Die::from_class(catalog, class_id)?);
            }
        }
        Ok(Unit {
            id,
            label: setup.label.clone(),
            character: setup.character.clone(),
            team: setup.team,
            location: setup.location,
            current_health: setup.character.max_health,
            total_init: setup.character.base_init,
            prec_init: 0.0,
            dice,
        })
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_dead(&self) -> bool {
        self.current_health <= 0
    }

    pub fn percent_health(&self) -> f32 {
        if self.character.max_health > 0 {
            self.current_health as f32 / self.character.max_health as f32
        } else {
            0.0
        }
    }

    pub fn die(&self, die_index: usize) -> Option<&Die> {
        self.dice.get(die_index)
    }

    pub(crate) fn roll_all_dice(&mut self, rng: &mut impl Rng) {
        for die in &mut self.dice {
            die.roll(rng);
        }
    }

    pub fn details(&self) -> String {
        format!(
            "{}: {}\n{}/{} HP",
            self.label, self.character.name, self.current_health, self.character.max_health
        )
    }

    /// All dice rendered one per line, rolled faces marked
    pub fn formatted_dice(&self) -> String {
        let mut ret = String::new();
        for (i, die) in self.dice.iter().enumerate() {
            ret.push_str(&format!("DICE {}: {}\n", i, die.details()));
        }
        ret
    }
}
