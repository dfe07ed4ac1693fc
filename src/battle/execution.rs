//! Battle state machine: rounds, turns, and action resolution
//!
//! Each `step` performs exactly one update-then-transition pair. The
//! caller owns decision making; the machine owns legality, bookkeeping,
//! and termination. A rejected or absent action is a counted no-op, never
//! an error.

use std::cmp::Reverse;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::battle::actions::{BattleAction, BattleActionKind};
use crate::battle::battlefield::Battlefield;
use crate::battle::targets::Target;
use crate::battle::units::UnitSetup;
use crate::catalog::Catalog;
use crate::core::config::BattleConfig;
use crate::core::error::Result;
use crate::core::types::{Location, Team, TargetType, UnitId};

/// Phases of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattleState {
    #[default]
    NotStarted,
    StartPhase,
    MainPhase,
    EndPhase,
    Finished,
}

/// Snapshot of the roster a battle was constructed with, kept so `reset`
/// can re-derive a fresh battlefield
#[derive(Debug, Clone)]
pub struct BattleSignature {
    roster: Vec<UnitSetup>,
}

impl BattleSignature {
    pub fn roster(&self) -> &[UnitSetup] {
        &self.roster
    }
}

/// A single combat encounter between two teams
#[derive(Debug)]
pub struct Battle {
    catalog: Arc<Catalog>,
    config: BattleConfig,
    rng: ChaCha8Rng,
    battlefield: Battlefield,
    signature: BattleSignature,
    round: u32,
    /// Number of turns which have passed across all rounds
    turn: u32,
    /// Units ordered by initiative for the current round
    turn_order: Vec<UnitId>,
    /// Position of the acting unit within the turn order
    turn_index: usize,
    state: BattleState,
    invalid_actions: u32,
}

impl Battle {
    pub fn new(
        catalog: Arc<Catalog>,
        roster: Vec<UnitSetup>,
        config: BattleConfig,
        rng: ChaCha8Rng,
    ) -> Result<Battle> {
        let battlefield = Battlefield::new(&catalog, &roster)?;
        Ok(Battle {
            catalog,
            config,
            rng,
            battlefield,
            signature: BattleSignature { roster },
            round: 0,
            turn: 0,
            turn_order: Vec::new(),
            turn_index: 0,
            state: BattleState::NotStarted,
            invalid_actions: 0,
        })
    }

    /// Rebuild the battlefield from the signature and return to the
    /// not-started state. The RNG keeps its stream, so consecutive
    /// episodes from one seed stay reproducible as a sequence.
    pub fn reset(&mut self) -> Result<()> {
        self.battlefield = Battlefield::new(&self.catalog, &self.signature.roster)?;
        self.round = 0;
        self.turn = 0;
        self.turn_order.clear();
        self.turn_index = 0;
        self.state = BattleState::NotStarted;
        self.invalid_actions = 0;
        Ok(())
    }

    /// Advance the machine by one update-then-transition pair.
    ///
    /// `None` means "no action offered" and counts as invalid during the
    /// main phase. Returns true once the battle is finished; callers must
    /// stop stepping at that point.
    pub fn step(&mut self, action: Option<BattleAction>) -> bool {
        self.step_update(action.as_ref());
        self.step_transition(action.as_ref());
        self.log_status();
        self.state == BattleState::Finished
    }

    fn step_update(&mut self, action: Option<&BattleAction>) {
        match self.state {
            BattleState::NotStarted => self.start_battle(),
            BattleState::StartPhase => {
                self.start_turn();
                self.check_and_clear_invalid_units();
            }
            BattleState::MainPhase => {
                match action {
                    Some(action) => self.run_action(action),
                    None => self.invalid_actions += 1,
                }
                self.check_and_clear_invalid_units();
            }
            BattleState::EndPhase => {
                self.end_turn();
                self.check_and_clear_invalid_units();
            }
            BattleState::Finished => {
                tracing::warn!("Unknown update for battle state {:?}", self.state);
            }
        }
    }

    fn step_transition(&mut self, action: Option<&BattleAction>) {
        match self.state {
            BattleState::NotStarted => self.state = BattleState::StartPhase,
            BattleState::StartPhase => {
                if self.check_if_battle_over() {
                    self.state = BattleState::Finished;
                } else {
                    self.state = BattleState::MainPhase;
                }
            }
            BattleState::MainPhase => {
                if self.check_if_battle_over() {
                    self.state = BattleState::Finished;
                } else if matches!(action, Some(a) if a.kind() == BattleActionKind::End) {
                    self.state = BattleState::EndPhase;
                }
            }
            BattleState::EndPhase => {
                if self.check_if_battle_over() {
                    self.state = BattleState::Finished;
                } else {
                    self.state = BattleState::StartPhase;
                }
            }
            BattleState::Finished => {
                tracing::warn!("Unknown transition for battle state {:?}", self.state);
            }
        }
    }

    /// Run an offered action through the three gates; execute it on
    /// success, otherwise count it invalid
    fn run_action(&mut self, action: &BattleAction) {
        let label = self
            .battlefield
            .unit(action.actor())
            .map(|unit| unit.label.clone())
            .unwrap_or_else(|| "?".into());
        if !action.can_use_resources(&self.battlefield, &self.catalog) {
            tracing::warn!("Cannot spend resources to act: {}", label);
            self.invalid_actions += 1;
        } else if !action.can_be_used(&self.battlefield, &self.catalog) {
            tracing::warn!("Action can not be used: {}", label);
            self.invalid_actions += 1;
        } else if !action.can_apply_to_target(&self.battlefield, &self.catalog) {
            tracing::warn!("Action can not apply to target: {}", label);
            self.invalid_actions += 1;
        } else {
            action.execute(&mut self.battlefield, &self.catalog);
        }
    }

    fn start_battle(&mut self) {
        tracing::info!("Battle begins");
        self.round = 0;
        self.turn = 0;
        self.turn_index = 0;
        // Tiebreak initiative is drawn once per battle
        let ids = self.battlefield.live_units().to_vec();
        for id in ids {
            let prec: f32 = self.rng.gen();
            if let Some(unit) = self.battlefield.unit_mut(id) {
                unit.prec_init = prec;
            }
        }
    }

    fn start_round(&mut self) {
        tracing::info!("Round {} begins", self.round);
        let mut order = self.battlefield.live_units().to_vec();
        let field = &self.battlefield;
        order.sort_by_key(|id| {
            let (total, prec) = field
                .unit(*id)
                .map(|unit| (unit.total_init, unit.prec_init))
                .unwrap_or((0.0, 0.0));
            (Reverse(OrderedFloat(total)), Reverse(OrderedFloat(prec)))
        });
        self.turn_order = order;
    }

    fn start_turn(&mut self) {
        if self.turn_index == 0 {
            self.start_round();
        }

        tracing::info!("Turn {} begins", self.turn);
        match self.current_turn_unit() {
            Some(id) => {
                let rng = &mut self.rng;
                if let Some(unit) = self.battlefield.unit_mut(id) {
                    unit.roll_all_dice(rng);
                }
            }
            None => {
                tracing::warn!(
                    "Invalid turn index {} for turn order of {}",
                    self.turn_index,
                    self.turn_order.len()
                );
            }
        }
    }

    fn end_turn(&mut self) {
        tracing::info!("Turn {} ends", self.turn);
        self.turn += 1;
        self.turn_index += 1;
        if self.turn_index >= self.turn_order.len() {
            self.end_round();
        }
    }

    fn end_round(&mut self) {
        tracing::info!("Round {} ends", self.round);
        self.turn_index = 0;
        self.round += 1;
    }

    /// Prune units whose health reached zero from every tracked list
    fn check_and_clear_invalid_units(&mut self) {
        let dead: Vec<UnitId> = self
            .battlefield
            .live_units()
            .iter()
            .copied()
            .filter(|id| {
                self.battlefield
                    .unit(*id)
                    .is_some_and(|unit| unit.is_dead())
            })
            .collect();
        for id in dead {
            self.clear_unit(id);
        }
    }

    fn clear_unit(&mut self, id: UnitId) {
        self.battlefield.remove_unit(id);
        self.battlefield.add_to_dead_list(id);

        if let Some(pos) = self.turn_order.iter().position(|u| *u == id) {
            self.turn_order.remove(pos);
            // Keep the pointer on the same unit when an earlier slot vanishes
            if self.turn_index > pos {
                self.turn_index -= 1;
            }
        }
    }

    fn check_if_battle_over(&self) -> bool {
        if self.is_past_turn_limit() {
            return true;
        }
        if self.invalid_actions > self.config.invalid_action_limit {
            return true;
        }
        let blue_count = self.battlefield.live_count(Team::Blue);
        let red_count = self.battlefield.live_count(Team::Red);
        blue_count == 0 || red_count == 0
    }

    pub fn is_past_turn_limit(&self) -> bool {
        self.turn >= self.config.turn_limit
    }

    pub fn is_finished(&self) -> bool {
        self.state == BattleState::Finished
    }

    /// The side with survivors once the other has none; `Team::None`
    /// covers simultaneous elimination and limit-triggered termination
    pub fn winning_team(&self) -> Team {
        let blue_count = self.battlefield.live_count(Team::Blue);
        let red_count = self.battlefield.live_count(Team::Red);
        if blue_count > 0 && red_count == 0 {
            Team::Blue
        } else if blue_count == 0 && red_count > 0 {
            Team::Red
        } else {
            Team::None
        }
    }

    /// The unit whose turn it is, when the turn index is in range
    pub fn current_turn_unit(&self) -> Option<UnitId> {
        self.turn_order.get(self.turn_index).copied()
    }

    /// Resolve an externally-supplied (target kind, index) pair to a
    /// concrete target. Out-of-range indices resolve to `None`.
    pub fn resolve_target(&self, target_type: TargetType, target_index: usize) -> Option<Target> {
        match target_type {
            TargetType::Unit => self.battlefield.unit_by_index(target_index).map(Target::Unit),
            TargetType::Side => match target_index {
                0 => Some(Target::Side(Team::Blue)),
                1 => Some(Target::Side(Team::Red)),
                _ => None,
            },
            TargetType::Area => match target_index {
                0 => Some(Target::Area(Team::Blue, Location::Front)),
                1 => Some(Target::Area(Team::Blue, Location::Back)),
                2 => Some(Target::Area(Team::Red, Location::Front)),
                3 => Some(Target::Area(Team::Red, Location::Back)),
                _ => None,
            },
            TargetType::None => None,
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_order(&self) -> &[UnitId] {
        &self.turn_order
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn invalid_actions(&self) -> u32 {
        self.invalid_actions
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    /// Mutable battlefield access for scenario setup and external drivers.
    /// Container membership must still only change through the battlefield
    /// operations, never by writing unit fields directly.
    pub fn battlefield_mut(&mut self) -> &mut Battlefield {
        &mut self.battlefield
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn signature(&self) -> &BattleSignature {
        &self.signature
    }

    fn log_status(&self) {
        tracing::debug!("\n{}", self.battlefield.format_map());
        tracing::debug!("\n{}", self.battlefield.format_units());

        if self.turn_order.is_empty() {
            return;
        }

        let labels: Vec<String> = self
            .turn_order
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let label = self
                    .battlefield
                    .unit(*id)
                    .map(|unit| unit.label.clone())
                    .unwrap_or_else(|| "?".into());
                if i == self.turn_index {
                    format!("*{}*", label)
                } else {
                    label
                }
            })
            .collect();
        tracing::debug!("Turn order: {}", labels.join(" "));

        if let Some(unit) = self.current_turn_unit().and_then(|id| self.battlefield.unit(id)) {
            tracing::debug!("{} to act:\n{}", unit.label, unit.formatted_dice());
        }
        tracing::debug!(
            "State {:?} round {} turn {} invalid {}",
            self.state,
            self.round,
            self.turn,
            self.invalid_actions
        );
    }
}
