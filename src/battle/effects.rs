//! Effects: the state-mutation rules behind every ability
//!
//! An effect is a linear rule `value = m*x + c` where `x` is the scalar of
//! the die face that invoked it. Only damage and move are implemented;
//! heal and buff are declared in the data grammar but their semantics are
//! open work and applying one is a warned no-op.

use crate::battle::battlefield::Battlefield;
use crate::core::types::UnitId;

/// Kinds of game-state change an effect can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Damage,
    Move,
    Heal,
    Buff,
}

impl EffectKind {
    /// Parse the kind component of an effect key
    pub(crate) fn from_key(key: &str) -> Option<EffectKind> {
        match key {
            "DAMAGE" => Some(EffectKind::Damage),
            "MOVE" => Some(EffectKind::Move),
            "HEAL" => Some(EffectKind::Heal),
            "BUFF" => Some(EffectKind::Buff),
            _ => None,
        }
    }
}

/// A single state-mutation rule, parametrized as `m*x + c`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub kind: EffectKind,
    pub m: i32,
    pub c: i32,
}

impl Effect {
    pub fn new(kind: EffectKind, m: i32, c: i32) -> Self {
        Self { kind, m, c }
    }

    /// The effect magnitude for a given die scalar
    pub fn value(&self, x: i32) -> i32 {
        self.m * x + self.c
    }

    /// Apply this effect from `source` to the unit `target`
    pub(crate) fn apply(&self, field: &mut Battlefield, source: UnitId, target: UnitId, x: i32) {
        let source_label = field
            .unit(source)
            .map(|unit| unit.label.clone())
            .unwrap_or_else(|| "?".into());

        match self.kind {
            EffectKind::Damage => {
                let Some(unit) = field.unit_mut(target) else {
                    return;
                };
                // Damage is never negative and never takes health below zero
                let amount = self.value(x).max(0).min(unit.current_health);
                unit.current_health -= amount;
                tracing::info!("{} deals {} damage to {}", source_label, amount, unit.label);
            }
            EffectKind::Move => {
                field.move_unit(target);
                if let Some(unit) = field.unit(target) {
                    tracing::info!(
                        "{} moves {} to {:?}",
                        source_label,
                        unit.label,
                        unit.location()
                    );
                }
            }
            EffectKind::Heal | EffectKind::Buff => {
                tracing::warn!("Effect kind {:?} is not implemented - skipped", self.kind);
            }
        }
    }
}
