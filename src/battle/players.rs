//! Action sources: the decision layers that feed actions into a battle
//!
//! The engine never decides anything; an action source observes the
//! battle read-only and submits a `BattleAction` for the unit whose turn
//! it is. The learning agent and console adapter live outside the engine
//! behind this same trait.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::battle::actions::BattleAction;
use crate::battle::execution::Battle;
use crate::battle::targets::Target;
use crate::catalog::AbilityUsage;
use crate::core::types::{Location, Team, TargetType};

/// Something that can pick an action for the current unit of a battle
pub trait ActionSource {
    fn team(&self) -> Team;

    /// Choose an action for the unit whose turn it is, or `None` to let
    /// the turn stall (which the battle counts as invalid)
    fn select_action(&mut self, battle: &Battle) -> Option<BattleAction>;
}

/// Simple, predictable opponent: walk the dice in order, collect every
/// legal way to use the first usable die, pick one at random. Steps
/// forward when a melee die is stuck in the back line, ends the turn when
/// nothing is legal.
pub struct RandomPlayer {
    team: Team,
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(team: Team, rng: ChaCha8Rng) -> Self {
        Self { team, rng }
    }
}

impl ActionSource for RandomPlayer {
    fn team(&self) -> Team {
        self.team
    }

    fn select_action(&mut self, battle: &Battle) -> Option<BattleAction> {
        let field = battle.battlefield();
        let catalog = battle.catalog();
        let actor = battle.current_turn_unit()?;
        let unit = field.unit(actor)?;
        if unit.team != self.team {
            tracing::warn!(
                "Not {:?}'s turn: {} is on team {:?}",
                self.team,
                unit.label,
                unit.team
            );
            return None;
        }

        let mut candidates: Vec<BattleAction> = Vec::new();
        for die_index in 0..unit.dice.len() {
            let Some(face) = unit.dice[die_index].rolled_face() else {
                continue;
            };
            let Some(face_def) = catalog.face(&face.face_id) else {
                continue;
            };
            let Some(ability) = catalog.ability(&face_def.ability_id) else {
                continue;
            };

            let probe = BattleAction::Primary {
                actor,
                die_index,
                target: None,
            };
            if !probe.can_use_resources(field, catalog) {
                continue;
            }
            if !probe.can_be_used(field, catalog) {
                // A melee die stuck in the back line is worth a move forward
                if ability.usage == AbilityUsage::Melee {
                    let step_forward = BattleAction::Move { actor, die_index };
                    if step_forward.can_use_resources(field, catalog)
                        && step_forward.can_be_used(field, catalog)
                        && step_forward.can_apply_to_target(field, catalog)
                    {
                        candidates.push(step_forward);
                        break;
                    }
                }
                continue;
            }

            let mut potential_targets: Vec<Option<Target>> = Vec::new();
            match ability.target_type {
                TargetType::Unit => {
                    for id in field.live_units() {
                        potential_targets.push(Some(Target::Unit(*id)));
                    }
                }
                TargetType::Area => {
                    potential_targets.push(Some(Target::Area(Team::Blue, Location::Front)));
                    potential_targets.push(Some(Target::Area(Team::Blue, Location::Back)));
                    potential_targets.push(Some(Target::Area(Team::Red, Location::Front)));
                    potential_targets.push(Some(Target::Area(Team::Red, Location::Back)));
                }
                TargetType::Side => {
                    potential_targets.push(Some(Target::Side(Team::Blue)));
                    potential_targets.push(Some(Target::Side(Team::Red)));
                }
                TargetType::None => potential_targets.push(None),
            }

            for target in potential_targets {
                let action = BattleAction::Primary {
                    actor,
                    die_index,
                    target,
                };
                if action.can_use_resources(field, catalog)
                    && action.can_be_used(field, catalog)
                    && action.can_apply_to_target(field, catalog)
                {
                    candidates.push(action);
                }
            }

            // The first die with any legal use is the one we spend
            if !candidates.is_empty() {
                break;
            }
        }

        if candidates.is_empty() {
            Some(BattleAction::End { actor })
        } else {
            candidates.choose(&mut self.rng).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::character::Character;
    use crate::battle::execution::BattleState;
    use crate::battle::units::UnitSetup;
    use crate::catalog::Catalog;
    use crate::core::config::BattleConfig;
    use rand::SeedableRng;
    use std::sync::Arc;

    const FIXTURE: &str = r#"{
        "Abilities": {
            "strike": {
                "uid": "strike", "name": "Strike", "type": "ATTACK", "usage": "MELEE",
                "target_type": "UNIT", "target_team": "ENEMY",
                "target_location": "NONE", "keys": "DAMAGE 3"
            }
        },
        "Classes": {
            "bruiser": {
                "uid": "bruiser", "index": 1, "name": "Bruiser",
                "health": 10, "init": 3, "tier": 1,
                "face_1": "strike_0", "face_2": "strike_0", "face_3": "strike_0",
                "face_4": "strike_0", "face_5": "strike_0", "face_6": "strike_0"
            },
            "dummy": {
                "uid": "dummy", "index": 2, "name": "Dummy",
                "health": 30, "init": 0, "tier": 0,
                "face_1": "strike_0", "face_2": "strike_0", "face_3": "strike_0",
                "face_4": "strike_0", "face_5": "strike_0", "face_6": "strike_0"
            }
        },
        "Faces": {
            "strike_0": { "uid": "strike_0", "index": 1, "ability_id": "strike", "base_x": 0 }
        }
    }"#;

    fn battle() -> Battle {
        let catalog = Arc::new(Catalog::from_json(FIXTURE).unwrap());
        let roster = [
            ("P1", "bruiser", Team::Blue, Location::Front),
            ("E1", "dummy", Team::Red, Location::Front),
            ("E2", "dummy", Team::Red, Location::Back),
        ]
        .map(|(label, class, team, location)| {
            let character = Character::new(&catalog, label, &[class]).unwrap();
            UnitSetup::new(character, team, location, label)
        })
        .to_vec();
        Battle::new(
            catalog,
            roster,
            BattleConfig::default(),
            ChaCha8Rng::seed_from_u64(5),
        )
        .unwrap()
    }

    #[test]
    fn test_random_player_picks_a_legal_action() {
        let mut battle = battle();
        battle.step(None);
        battle.step(None);
        assert_eq!(battle.state(), BattleState::MainPhase);
        // P1 (init 3) acts first
        let mut player = RandomPlayer::new(Team::Blue, ChaCha8Rng::seed_from_u64(9));
        let action = player.select_action(&battle).unwrap();
        assert!(action.can_use_resources(battle.battlefield(), battle.catalog()));
        assert!(action.can_be_used(battle.battlefield(), battle.catalog()));
        assert!(action.can_apply_to_target(battle.battlefield(), battle.catalog()));
        // With only melee strike faces, the legal choice is hitting a red unit
        match action {
            BattleAction::Primary { target, .. } => {
                let target = target.unwrap();
                assert_eq!(target.team(battle.battlefield()), Team::Red);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_random_player_rejects_wrong_turn() {
        let mut battle = battle();
        battle.step(None);
        battle.step(None);
        let mut player = RandomPlayer::new(Team::Red, ChaCha8Rng::seed_from_u64(9));
        assert!(player.select_action(&battle).is_none());
    }

    #[test]
    fn test_random_player_ends_turn_with_spent_dice() {
        let mut battle = battle();
        battle.step(None);
        battle.step(None);
        let actor = battle.current_turn_unit().unwrap();
        if let Some(unit) = battle.battlefield_mut().unit_mut(actor) {
            for die in &mut unit.dice {
                die.reset();
            }
        }
        let mut player = RandomPlayer::new(Team::Blue, ChaCha8Rng::seed_from_u64(9));
        let action = player.select_action(&battle).unwrap();
        assert_eq!(action, BattleAction::End { actor });
    }
}
