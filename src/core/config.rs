//! Battle configuration with documented constants

/// Number of sides on every die
pub const NUM_DIE_FACES: usize = 6;

/// Default maximum number of turns in a battle
pub const DEFAULT_TURN_LIMIT: u32 = 100;

/// Default number of accepted invalid actions before the battle terminates
pub const DEFAULT_INVALID_ACTION_LIMIT: u32 = 10_000;

/// Safety limits for a single battle
///
/// Neither limit changes legal play; both exist to force a terminal state
/// when an action source stalls or floods the engine with illegal actions.
#[derive(Debug, Clone, Copy)]
pub struct BattleConfig {
    /// Maximum number of turns before the battle is forced to end
    ///
    /// Counted per unit turn, not per round. A battle that reaches this
    /// limit finishes with no winning team.
    pub turn_limit: u32,

    /// Number of accepted invalid actions before the battle terminates
    ///
    /// Rejected and absent actions both count. The high default tolerates
    /// exploratory action sources that probe the legality gates.
    pub invalid_action_limit: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            turn_limit: DEFAULT_TURN_LIMIT,
            invalid_action_limit: DEFAULT_INVALID_ACTION_LIMIT,
        }
    }
}
