//! Catalog row types and the effect-key grammar
//!
//! Rows arrive as loosely-typed JSON objects; the raw structs here mirror
//! that wire shape, and the `*Def` structs are the validated forms handed
//! to the engine.

use serde::Deserialize;

use crate::battle::effects::{Effect, EffectKind};
use crate::core::config::NUM_DIE_FACES;
use crate::core::types::TargetType;

/// Ability categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AbilityType {
    Attack,
    Support,
    Spell,
    Skill,
}

/// How the ability is used and the positional requirement that goes with it
/// (melee requires the actor to stand in the frontmost occupied line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AbilityUsage {
    None,
    Melee,
    Ranged,
}

/// Team affiliation requirement between actor and target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetTeam {
    None,
    Enemy,
    Ally,
}

/// Line requirement on the target's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetLocation {
    None,
    Frontmost,
    Backmost,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAbility {
    pub uid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ability_type: AbilityType,
    pub usage: AbilityUsage,
    pub target_type: TargetType,
    pub target_team: TargetTeam,
    pub target_location: TargetLocation,
    pub keys: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawClass {
    pub uid: String,
    pub index: u32,
    pub name: String,
    pub health: i32,
    pub init: i32,
    pub tier: u32,
    pub face_1: String,
    pub face_2: String,
    pub face_3: String,
    pub face_4: String,
    pub face_5: String,
    pub face_6: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFace {
    pub uid: String,
    pub index: u32,
    pub ability_id: String,
    pub base_x: i32,
}

/// Game data defining an ability
#[derive(Debug, Clone)]
pub struct AbilityDef {
    pub uid: String,
    pub name: String,
    pub ability_type: AbilityType,
    pub usage: AbilityUsage,
    pub target_type: TargetType,
    pub target_team: TargetTeam,
    pub target_location: TargetLocation,
    pub effects: Vec<Effect>,
}

impl AbilityDef {
    pub(crate) fn from_raw(raw: RawAbility) -> Self {
        let effects = parse_effect_keys(&raw.uid, &raw.keys);
        Self {
            uid: raw.uid,
            name: raw.name,
            ability_type: raw.ability_type,
            usage: raw.usage,
            target_type: raw.target_type,
            target_team: raw.target_team,
            target_location: raw.target_location,
            effects,
        }
    }
}

/// Game data defining a class
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub uid: String,
    pub index: u32,
    pub name: String,
    pub health: i32,
    pub init: i32,
    pub tier: u32,
    /// Face row ids, one per die side
    pub faces: [String; NUM_DIE_FACES],
}

impl ClassDef {
    pub(crate) fn from_raw(raw: RawClass) -> Self {
        Self {
            uid: raw.uid,
            index: raw.index,
            name: raw.name,
            health: raw.health,
            init: raw.init,
            tier: raw.tier,
            faces: [
                raw.face_1, raw.face_2, raw.face_3, raw.face_4, raw.face_5, raw.face_6,
            ],
        }
    }
}

/// Game data defining one side of a die
#[derive(Debug, Clone)]
pub struct FaceDef {
    pub uid: String,
    pub index: u32,
    pub ability_id: String,
    pub base_x: i32,
}

impl FaceDef {
    pub(crate) fn from_raw(raw: RawFace) -> Self {
        Self {
            uid: raw.uid,
            index: raw.index,
            ability_id: raw.ability_id,
            base_x: raw.base_x,
        }
    }
}

/// Parse a semicolon-delimited effect-key string into effects.
///
/// Grammar per key: `KIND` alone sets c=1; `KIND <int>` sets c=<int>;
/// `KIND X` (case-insensitive) sets m=1 so the value scales with the die.
/// Unknown kinds and unparseable scalars are warned about and dropped, as
/// are kinds whose application is not implemented yet.
pub(crate) fn parse_effect_keys(ability_uid: &str, keys: &str) -> Vec<Effect> {
    let mut effects = Vec::new();
    for key in keys.split(';') {
        let mut components = key.split_whitespace();
        let Some(kind_str) = components.next() else {
            continue;
        };
        let Some(kind) = EffectKind::from_key(kind_str) else {
            tracing::warn!(
                "Unknown effect kind `{}` for ability `{}` - dropped",
                kind_str,
                ability_uid
            );
            continue;
        };

        let mut m = 0;
        let mut c = 0;
        match components.next() {
            // No value component defaults the constant to 1
            None => c = 1,
            Some(value) if value.eq_ignore_ascii_case("x") => m = 1,
            Some(value) => match value.parse::<i32>() {
                Ok(parsed) => c = parsed,
                Err(_) => {
                    tracing::warn!(
                        "`{}` cannot be converted to int for ability `{}` - dropped",
                        value,
                        ability_uid
                    );
                    continue;
                }
            },
        }

        match kind {
            EffectKind::Damage | EffectKind::Move => effects.push(Effect::new(kind, m, c)),
            EffectKind::Heal | EffectKind::Buff => {
                tracing::warn!(
                    "Effect kind {:?} is not implemented for ability `{}` - dropped",
                    kind,
                    ability_uid
                );
            }
        }
    }
    effects
}
