//! Resurrecting troop: wraps an inner troop and revives fallen creatures
//!
//! The wrapper owns its inner troop and forwards every combat and position
//! accessor to it. Only partial losses are restored; a troop removed by the
//! death sweep never comes back.

use rand::Rng;
use rand_distr::{Distribution, Geometric};

use crate::units::constants::RESURRECTION_CHANCE;
use crate::units::descriptor::UnitDescriptor;
use crate::units::morale::MoraleTroop;
use crate::units::troop::Troop;

/// The troop a resurrecting wrapper delegates to
#[derive(Debug, Clone, PartialEq)]
pub enum InnerTroop {
    Plain(Troop),
    Morale(MoraleTroop),
}

impl InnerTroop {
    pub fn troop(&self) -> &Troop {
        match self {
            InnerTroop::Plain(troop) => troop,
            InnerTroop::Morale(unit) => &unit.troop,
        }
    }

    pub fn troop_mut(&mut self) -> &mut Troop {
        match self {
            InnerTroop::Plain(troop) => troop,
            InnerTroop::Morale(unit) => &mut unit.troop,
        }
    }

    pub fn take_damage(&mut self, damage: f64) {
        match self {
            InnerTroop::Plain(troop) => troop.take_damage(damage),
            InnerTroop::Morale(unit) => unit.take_damage(damage),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResurrectingTroop {
    pub inner: InnerTroop,
}

impl ResurrectingTroop {
    /// Inner troop is morale-capable iff the descriptor carries a morality baseline
    pub fn new(descriptor: UnitDescriptor) -> Self {
        let inner = if descriptor.is_morale_capable() {
            InnerTroop::Morale(MoraleTroop::new(descriptor))
        } else {
            InnerTroop::Plain(Troop::new(descriptor))
        };
        Self { inner }
    }

    /// Revive some of the fallen creatures; returns how many came back
    ///
    /// The count is drawn from a geometric distribution and redrawn while it
    /// exceeds the current deficit, so the group never grows past max_amount.
    pub fn try_to_resurrect<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let deficit = self.inner.troop().deficit();
        if deficit == 0 {
            return 0;
        }
        let distribution = match Geometric::new(RESURRECTION_CHANCE) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Resurrection distribution unavailable: {:?}", e);
                return 0;
            }
        };

        let revived = loop {
            let draw = distribution.sample(rng);
            if draw <= deficit as u64 {
                break draw as u32;
            }
        };
        self.inner.troop_mut().restore(revived);
        revived
    }
}
