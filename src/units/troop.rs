//! Plain troop: a group of identical creatures sharing one HP pool

use crate::core::types::GridPos;
use crate::units::descriptor::UnitDescriptor;

/// State shared by every troop variant
#[derive(Debug, Clone, PartialEq)]
pub struct Troop {
    pub descriptor: UnitDescriptor,
    pub position: GridPos,
    current_hp: f64,
}

impl Troop {
    /// Full-strength troop, not yet deployed
    pub fn new(descriptor: UnitDescriptor) -> Self {
        let current_hp = descriptor.max_hp();
        Self {
            descriptor,
            position: GridPos::default(),
            current_hp,
        }
    }

    pub fn current_hp(&self) -> f64 {
        self.current_hp
    }

    pub fn set_current_hp(&mut self, hp: f64) {
        self.current_hp = hp;
    }

    /// Creatures left: ceil(hp / entity_hp), never negative
    ///
    /// Always derived from the HP pool, so it is current after any HP change.
    pub fn amount(&self) -> u32 {
        if self.current_hp <= 0.0 || self.descriptor.entity_hp <= 0.0 {
            return 0;
        }
        (self.current_hp / self.descriptor.entity_hp).ceil() as u32
    }

    /// Creatures missing from a full group
    pub fn deficit(&self) -> u32 {
        self.descriptor.max_amount.saturating_sub(self.amount())
    }

    /// Subtract damage; HP may go negative until the death sweep
    pub fn take_damage(&mut self, damage: f64) {
        self.current_hp -= damage;
    }

    /// Restore `count` whole creatures
    pub fn restore(&mut self, count: u32) {
        self.current_hp += self.descriptor.entity_hp * count as f64;
    }
}
