//! Target shapes for abilities
//!
//! Four shapes can receive an effect list: a single unit, one line, a
//! whole side, or the whole battlefield. Applying to a container forwards
//! the full effect list to every unit it holds, in container order.

use crate::battle::battlefield::Battlefield;
use crate::battle::effects::Effect;
use crate::core::types::{Location, Team, TargetType, UnitId};

/// A concrete thing an action is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Unit(UnitId),
    Area(Team, Location),
    Side(Team),
    Field,
}

impl Target {
    pub fn target_type(&self) -> TargetType {
        match self {
            Target::Unit(_) => TargetType::Unit,
            Target::Area(_, _) => TargetType::Area,
            Target::Side(_) => TargetType::Side,
            Target::Field => TargetType::None,
        }
    }

    /// Team this target belongs to; `Team::None` for the whole battlefield
    /// or a stale unit reference
    pub fn team(&self, field: &Battlefield) -> Team {
        match self {
            Target::Unit(id) => field.unit(*id).map(|unit| unit.team).unwrap_or(Team::None),
            Target::Area(team, _) => *team,
            Target::Side(team) => *team,
            Target::Field => Team::None,
        }
    }

    /// Line this target stands in; containers other than areas have no line
    pub fn location(&self, field: &Battlefield) -> Location {
        match self {
            Target::Unit(id) => field
                .unit(*id)
                .map(|unit| unit.location())
                .unwrap_or(Location::None),
            Target::Area(_, location) => *location,
            Target::Side(_) => Location::None,
            Target::Field => Location::None,
        }
    }

    /// Every live unit this target transitively contains
    pub fn contained_units(&self, field: &Battlefield) -> Vec<UnitId> {
        match self {
            Target::Unit(id) => vec![*id],
            Target::Area(team, location) => field
                .area(*team, *location)
                .map(|area| area.units().to_vec())
                .unwrap_or_default(),
            Target::Side(team) => field
                .side(*team)
                .map(|side| side.units().to_vec())
                .unwrap_or_default(),
            Target::Field => field.live_units().to_vec(),
        }
    }

    /// Apply an effect list, scaled by `x`, to every contained unit
    pub(crate) fn apply_effects(
        &self,
        field: &mut Battlefield,
        source: UnitId,
        effects: &[Effect],
        x: i32,
    ) {
        for unit in self.contained_units(field) {
            for effect in effects {
                effect.apply(field, source, unit, x);
            }
        }
    }
}
