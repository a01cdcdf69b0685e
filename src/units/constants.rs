//! Combat rule constants - all tunable values in one place

// Morale
pub const MAX_MORALE: f64 = 1.0;
pub const MIN_MORALE: f64 = -1.0;
pub const MORALE_BALANCE_STEP: f64 = 0.05; // Drift toward zero per turn
pub const MORALE_LOSS_PER_CASUALTY: f64 = 0.01; // Per creature lost in one hit
pub const MORALE_KILL_BONUS: f64 = 0.25;

// Leader progression
pub const UPGRADE_XP_COST: f64 = 50.0;
pub const UPGRADE_KNOWLEDGE_GAIN: f64 = 10.0;
pub const FIRST_ENERGY_CHARGE: f64 = 10.0; // Accumulating from empty

// Leader reach (cells per axis)
pub const LEADER_MOVE_RADIUS: i32 = 1;
pub const LEADER_ATTACK_REACH: i32 = 1;

// Troop AI: close in until the target is within this many turns of movement
pub const CHASE_RANGE_FACTOR: i32 = 2;

// Resurrection draw: success probability of the geometric distribution
pub const RESURRECTION_CHANCE: f64 = 0.5;
