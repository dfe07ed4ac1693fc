//! Battle actions and their legality gates
//!
//! Every action answers the same three questions, checked in order by the
//! state machine: does the actor have the resource (a rolled, unspent
//! die), is the action usable from the actor's position, and is the
//! supplied target legal for the ability. Stale unit ids, spent dice, and
//! out-of-range die indices fail the relevant gate instead of erroring.

use crate::battle::battlefield::Battlefield;
use crate::battle::effects::{Effect, EffectKind};
use crate::battle::targets::Target;
use crate::catalog::schema::{AbilityDef, AbilityUsage, TargetLocation, TargetTeam};
use crate::catalog::Catalog;
use crate::core::types::{Team, TargetType, UnitId};

/// Discriminant of a battle action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleActionKind {
    /// Spend a die to invoke the ability on its rolled face
    Primary,
    /// Spend a die to swap between the front and back line
    Move,
    /// End the unit's turn
    End,
}

/// One unit's choice for (part of) its turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleAction {
    Primary {
        actor: UnitId,
        die_index: usize,
        target: Option<Target>,
    },
    Move {
        actor: UnitId,
        die_index: usize,
    },
    End {
        actor: UnitId,
    },
}

impl BattleAction {
    pub fn kind(&self) -> BattleActionKind {
        match self {
            BattleAction::Primary { .. } => BattleActionKind::Primary,
            BattleAction::Move { .. } => BattleActionKind::Move,
            BattleAction::End { .. } => BattleActionKind::End,
        }
    }

    pub fn actor(&self) -> UnitId {
        match self {
            BattleAction::Primary { actor, .. }
            | BattleAction::Move { actor, .. }
            | BattleAction::End { actor } => *actor,
        }
    }

    /// Gate 1: does the actor hold a rolled, unspent die for this action?
    pub fn can_use_resources(&self, field: &Battlefield, _catalog: &Catalog) -> bool {
        match self {
            BattleAction::Primary {
                actor, die_index, ..
            }
            | BattleAction::Move { actor, die_index } => has_rolled_die(field, *actor, *die_index),
            BattleAction::End { .. } => true,
        }
    }

    /// Gate 2: is the action legal given the actor's own state, target
    /// aside? Melee abilities require the actor to stand in the frontmost
    /// occupied line of its team.
    pub fn can_be_used(&self, field: &Battlefield, catalog: &Catalog) -> bool {
        match self {
            BattleAction::Primary {
                actor, die_index, ..
            } => {
                let Some((ability, _)) = rolled_ability(field, catalog, *actor, *die_index) else {
                    return false;
                };
                if ability.usage != AbilityUsage::Melee {
                    return true;
                }
                let Some(unit) = field.unit(*actor) else {
                    return false;
                };
                match field.frontmost_line(unit.team) {
                    Some(line) => unit.location() == line.location(),
                    None => false,
                }
            }
            BattleAction::Move { .. } | BattleAction::End { .. } => true,
        }
    }

    /// Gate 3: is the supplied target of the right shape, on the right
    /// team, and standing in the required line?
    pub fn can_apply_to_target(&self, field: &Battlefield, catalog: &Catalog) -> bool {
        let BattleAction::Primary {
            actor,
            die_index,
            target,
        } = self
        else {
            return true;
        };
        let Some((ability, _)) = rolled_ability(field, catalog, *actor, *die_index) else {
            return false;
        };

        // Target must match the ability's target shape
        if ability.target_type == TargetType::None {
            return target.is_none();
        }
        let Some(target) = target else {
            return false;
        };
        if target.target_type() != ability.target_type {
            return false;
        }
        if let Target::Unit(id) = target {
            if field.unit(*id).is_none() {
                return false;
            }
        }

        // Team affiliation requirement
        let actor_team = field
            .unit(*actor)
            .map(|unit| unit.team)
            .unwrap_or(Team::None);
        match ability.target_team {
            TargetTeam::Ally => {
                if actor_team != target.team(field) {
                    return false;
                }
            }
            TargetTeam::Enemy => {
                if actor_team == target.team(field) {
                    return false;
                }
            }
            TargetTeam::None => {}
        }

        // Line requirement on the target's position
        match ability.target_location {
            TargetLocation::Frontmost => match field.frontmost_line(target.team(field)) {
                Some(line) => target.location(field) == line.location(),
                None => false,
            },
            TargetLocation::Backmost => match field.backmost_line(target.team(field)) {
                Some(line) => target.location(field) == line.location(),
                None => false,
            },
            TargetLocation::None => true,
        }
    }

    /// Perform the action. Callers are expected to have run the three
    /// gates first; a spent die at this point is a warned no-op.
    pub(crate) fn execute(&self, field: &mut Battlefield, catalog: &Catalog) {
        match self {
            BattleAction::Primary {
                actor,
                die_index,
                target,
            } => {
                let Some((ability, x)) = rolled_ability(field, catalog, *actor, *die_index) else {
                    tracing::warn!("Unable to act - die is not rolled");
                    return;
                };
                if let Some(target) = target {
                    target.apply_effects(field, *actor, &ability.effects, x);
                }
                reset_die(field, *actor, *die_index);
            }
            BattleAction::Move { actor, die_index } => {
                // An unconditional move effect, not subject to targeting
                Effect::new(EffectKind::Move, 0, 0).apply(field, *actor, *actor, 0);
                reset_die(field, *actor, *die_index);
            }
            BattleAction::End { .. } => {}
        }
    }
}

fn has_rolled_die(field: &Battlefield, actor: UnitId, die_index: usize) -> bool {
    field
        .unit(actor)
        .and_then(|unit| unit.die(die_index))
        .and_then(|die| die.rolled_face())
        .is_some()
}

/// Resolve the ability behind the rolled face of the actor's die, along
/// with the face scalar `x`
fn rolled_ability<'a>(
    field: &Battlefield,
    catalog: &'a Catalog,
    actor: UnitId,
    die_index: usize,
) -> Option<(&'a AbilityDef, i32)> {
    let unit = field.unit(actor)?;
    let face = unit.die(die_index)?.rolled_face()?;
    let face_def = catalog.face(&face.face_id)?;
    let ability = catalog.ability(&face_def.ability_id)?;
    Some((ability, face.x))
}

fn reset_die(field: &mut Battlefield, actor: UnitId, die_index: usize) {
    if let Some(unit) = field.unit_mut(actor) {
        if let Some(die) = unit.dice.get_mut(die_index) {
            die.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::character::Character;
    use crate::battle::units::UnitSetup;
    use crate::core::types::Location;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const FIXTURE: &str = r#"{
        "Abilities": {
            "strike": {
                "uid": "strike", "name": "Strike", "type": "ATTACK", "usage": "MELEE",
                "target_type": "UNIT", "target_team": "ENEMY",
                "target_location": "NONE", "keys": "DAMAGE 3"
            },
            "volley": {
                "uid": "volley", "name": "Volley", "type": "ATTACK", "usage": "RANGED",
                "target_type": "AREA", "target_team": "ENEMY",
                "target_location": "NONE", "keys": "DAMAGE 1"
            },
            "snipe": {
                "uid": "snipe", "name": "Snipe", "type": "ATTACK", "usage": "RANGED",
                "target_type": "UNIT", "target_team": "ENEMY",
                "target_location": "FRONTMOST", "keys": "DAMAGE 2"
            }
        },
        "Classes": {
            "bruiser": {
                "uid": "bruiser", "index": 1, "name": "Bruiser",
                "health": 10, "init": 3, "tier": 1,
                "face_1": "strike_0", "face_2": "strike_0", "face_3": "strike_0",
                "face_4": "strike_0", "face_5": "strike_0", "face_6": "strike_0"
            },
            "archer": {
                "uid": "archer", "index": 2, "name": "Archer",
                "health": 6, "init": 5, "tier": 1,
                "face_1": "snipe_0", "face_2": "snipe_0", "face_3": "snipe_0",
                "face_4": "volley_0", "face_5": "volley_0", "face_6": "volley_0"
            }
        },
        "Faces": {
            "strike_0": { "uid": "strike_0", "index": 1, "ability_id": "strike", "base_x": 0 },
            "snipe_0": { "uid": "snipe_0", "index": 2, "ability_id": "snipe", "base_x": 0 },
            "volley_0": { "uid": "volley_0", "index": 3, "ability_id": "volley", "base_x": 0 }
        }
    }"#;

    fn catalog() -> Catalog {
        Catalog::from_json(FIXTURE).unwrap()
    }

    fn field(catalog: &Catalog) -> Battlefield {
        let setups = [
            ("P1", "bruiser", Team::Blue, Location::Front),
            ("P2", "bruiser", Team::Blue, Location::Back),
            ("E1", "bruiser", Team::Red, Location::Front),
            ("E2", "archer", Team::Red, Location::Back),
        ]
        .map(|(label, class, team, location)| {
            let character = Character::new(catalog, label, &[class]).unwrap();
            UnitSetup::new(character, team, location, label)
        });
        Battlefield::new(catalog, &setups).unwrap()
    }

    fn roll_all(field: &mut Battlefield) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let ids = field.live_units().to_vec();
        for id in ids {
            if let Some(unit) = field.unit_mut(id) {
                unit.roll_all_dice(&mut rng);
            }
        }
    }

    #[test]
    fn test_resource_gate_requires_rolled_die() {
        let catalog = catalog();
        let mut field = field(&catalog);
        let p1 = field.unit_by_label("P1").unwrap();
        let e1 = field.unit_by_label("E1").unwrap();
        let action = BattleAction::Primary {
            actor: p1,
            die_index: 0,
            target: Some(Target::Unit(e1)),
        };
        assert!(!action.can_use_resources(&field, &catalog));
        roll_all(&mut field);
        assert!(action.can_use_resources(&field, &catalog));
    }

    #[test]
    fn test_resource_gate_bad_die_index() {
        let catalog = catalog();
        let mut field = field(&catalog);
        roll_all(&mut field);
        let p1 = field.unit_by_label("P1").unwrap();
        let action = BattleAction::Move {
            actor: p1,
            die_index: 5,
        };
        assert!(!action.can_use_resources(&field, &catalog));
    }

    #[test]
    fn test_melee_usable_only_from_frontmost_line() {
        let catalog = catalog();
        let mut field = field(&catalog);
        roll_all(&mut field);
        let p1 = field.unit_by_label("P1").unwrap();
        let p2 = field.unit_by_label("P2").unwrap();
        let e1 = field.unit_by_label("E1").unwrap();

        let front_attack = BattleAction::Primary {
            actor: p1,
            die_index: 0,
            target: Some(Target::Unit(e1)),
        };
        assert!(front_attack.can_be_used(&field, &catalog));

        let back_attack = BattleAction::Primary {
            actor: p2,
            die_index: 0,
            target: Some(Target::Unit(e1)),
        };
        assert!(!back_attack.can_be_used(&field, &catalog));

        // Once the front line empties, the back line becomes frontmost
        field.remove_unit(p1);
        assert!(back_attack.can_be_used(&field, &catalog));
    }

    #[test]
    fn test_target_gate_shape_mismatch() {
        let catalog = catalog();
        let mut field = field(&catalog);
        roll_all(&mut field);
        let p1 = field.unit_by_label("P1").unwrap();

        let side_target = BattleAction::Primary {
            actor: p1,
            die_index: 0,
            target: Some(Target::Side(Team::Red)),
        };
        assert!(!side_target.can_apply_to_target(&field, &catalog));

        let no_target = BattleAction::Primary {
            actor: p1,
            die_index: 0,
            target: None,
        };
        assert!(!no_target.can_apply_to_target(&field, &catalog));
    }

    #[test]
    fn test_target_gate_enemy_constraint() {
        let catalog = catalog();
        let mut field = field(&catalog);
        roll_all(&mut field);
        let p1 = field.unit_by_label("P1").unwrap();
        let p2 = field.unit_by_label("P2").unwrap();
        let e1 = field.unit_by_label("E1").unwrap();

        let hit_enemy = BattleAction::Primary {
            actor: p1,
            die_index: 0,
            target: Some(Target::Unit(e1)),
        };
        assert!(hit_enemy.can_apply_to_target(&field, &catalog));

        let hit_ally = BattleAction::Primary {
            actor: p1,
            die_index: 0,
            target: Some(Target::Unit(p2)),
        };
        assert!(!hit_ally.can_apply_to_target(&field, &catalog));
    }

    #[test]
    fn test_target_gate_stale_unit() {
        let catalog = catalog();
        let mut field = field(&catalog);
        roll_all(&mut field);
        let p1 = field.unit_by_label("P1").unwrap();
        let action = BattleAction::Primary {
            actor: p1,
            die_index: 0,
            target: Some(Target::Unit(UnitId(99))),
        };
        assert!(!action.can_apply_to_target(&field, &catalog));
    }

    #[test]
    fn test_target_gate_frontmost_constraint() {
        let catalog = catalog();
        let mut field = field(&catalog);
        let e2 = field.unit_by_label("E2").unwrap();
        // Force E2's first die onto a snipe face (its faces 0-2 are snipe)
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        loop {
            if let Some(unit) = field.unit_mut(e2) {
                unit.roll_all_dice(&mut rng);
                let face = unit.dice[0].rolled_face().unwrap();
                if face.face_id == "snipe_0" {
                    break;
                }
            }
        }
        let p1 = field.unit_by_label("P1").unwrap();
        let p2 = field.unit_by_label("P2").unwrap();

        let snipe_front = BattleAction::Primary {
            actor: e2,
            die_index: 0,
            target: Some(Target::Unit(p1)),
        };
        assert!(snipe_front.can_apply_to_target(&field, &catalog));

        let snipe_back = BattleAction::Primary {
            actor: e2,
            die_index: 0,
            target: Some(Target::Unit(p2)),
        };
        assert!(!snipe_back.can_apply_to_target(&field, &catalog));
    }

    #[test]
    fn test_execute_primary_applies_damage_and_spends_die() {
        let catalog = catalog();
        let mut field = field(&catalog);
        roll_all(&mut field);
        let p1 = field.unit_by_label("P1").unwrap();
        let e1 = field.unit_by_label("E1").unwrap();
        let action = BattleAction::Primary {
            actor: p1,
            die_index: 0,
            target: Some(Target::Unit(e1)),
        };
        action.execute(&mut field, &catalog);
        assert_eq!(field.unit(e1).unwrap().current_health, 7);
        assert!(!field.unit(p1).unwrap().dice[0].is_rolled());
    }

    #[test]
    fn test_execute_move_swaps_line_and_spends_die() {
        let catalog = catalog();
        let mut field = field(&catalog);
        roll_all(&mut field);
        let p1 = field.unit_by_label("P1").unwrap();
        let action = BattleAction::Move {
            actor: p1,
            die_index: 0,
        };
        assert!(action.can_use_resources(&field, &catalog));
        assert!(action.can_be_used(&field, &catalog));
        assert!(action.can_apply_to_target(&field, &catalog));
        action.execute(&mut field, &catalog);
        assert_eq!(field.unit(p1).unwrap().location(), Location::Back);
        assert!(!field.unit(p1).unwrap().dice[0].is_rolled());
    }

    #[test]
    fn test_end_action_always_legal() {
        let catalog = catalog();
        let field = field(&catalog);
        let p1 = field.unit_by_label("P1").unwrap();
        let action = BattleAction::End { actor: p1 };
        assert!(action.can_use_resources(&field, &catalog));
        assert!(action.can_be_used(&field, &catalog));
        assert!(action.can_apply_to_target(&field, &catalog));
        assert_eq!(action.kind(), BattleActionKind::End);
    }
}
