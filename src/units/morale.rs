//! Morale-capable troop
//!
//! Morale lives in [-1, 1]. Casualties lower it, kills raise it, and each turn
//! it drifts back toward zero. Outgoing damage is scaled by (1 + morale).

use crate::units::constants::{
    MAX_MORALE, MIN_MORALE, MORALE_BALANCE_STEP, MORALE_KILL_BONUS, MORALE_LOSS_PER_CASUALTY,
};
use crate::units::descriptor::UnitDescriptor;
use crate::units::troop::Troop;

#[derive(Debug, Clone, PartialEq)]
pub struct MoraleTroop {
    pub troop: Troop,
    morale: f64,
}

impl MoraleTroop {
    pub fn new(descriptor: UnitDescriptor) -> Self {
        let morale = descriptor.morality.unwrap_or(0.0).clamp(MIN_MORALE, MAX_MORALE);
        Self {
            troop: Troop::new(descriptor),
            morale,
        }
    }

    pub fn morale(&self) -> f64 {
        self.morale
    }

    pub fn set_morale(&mut self, morale: f64) {
        self.morale = morale.clamp(MIN_MORALE, MAX_MORALE);
    }

    pub fn increase_morality(&mut self, delta: f64) {
        self.morale = (self.morale + delta).min(MAX_MORALE);
    }

    pub fn decrease_morality(&mut self, delta: f64) {
        self.morale = (self.morale - delta).max(MIN_MORALE);
    }

    /// Move morale one step toward zero, landing exactly on zero instead of crossing it
    pub fn balance_morality(&mut self) {
        if self.morale < 0.0 {
            if self.morale + MORALE_BALANCE_STEP > 0.0 {
                self.morale = 0.0;
            } else {
                self.increase_morality(MORALE_BALANCE_STEP);
            }
        } else if self.morale > 0.0 {
            if self.morale - MORALE_BALANCE_STEP < 0.0 {
                self.morale = 0.0;
            } else {
                self.decrease_morality(MORALE_BALANCE_STEP);
            }
        }
    }

    /// Take damage and lose morale for every creature that fell
    pub fn take_damage(&mut self, damage: f64) {
        let before = self.troop.amount();
        self.troop.take_damage(damage);
        let lost = before.saturating_sub(self.troop.amount());
        self.decrease_morality(lost as f64 * MORALE_LOSS_PER_CASUALTY);
    }

    /// Damage multiplier from the current morale
    pub fn morale_factor(&self) -> f64 {
        1.0 + self.morale
    }

    pub fn on_kill(&mut self) {
        self.increase_morality(MORALE_KILL_BONUS);
    }
}
