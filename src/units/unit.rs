//! Polymorphic combat entity
//!
//! A closed tagged union over the five variants. Shared troop behaviour is
//! implemented once on `Troop`; each variant specializes by matching here.

use crate::core::types::{GridPos, UnitId};
use crate::knowledge::SchoolsTable;
use crate::units::area::AreaTroop;
use crate::units::constants::LEADER_MOVE_RADIUS;
use crate::units::morale::MoraleTroop;
use crate::units::resurrection::{InnerTroop, ResurrectingTroop};
use crate::units::summoner::Summoner;
use crate::units::troop::Troop;

#[derive(Debug, Clone, PartialEq)]
pub enum UnitKind {
    Plain(Troop),
    Morale(MoraleTroop),
    Resurrecting(ResurrectingTroop),
    Area(AreaTroop),
    Leader(Summoner),
}

/// A unit on (or about to be deployed onto) the field
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
}

impl Unit {
    pub fn new(kind: UnitKind) -> Self {
        Self {
            id: UnitId::new(),
            kind,
        }
    }

    /// Core troop state for non-leaders
    pub fn troop(&self) -> Option<&Troop> {
        match &self.kind {
            UnitKind::Plain(troop) => Some(troop),
            UnitKind::Morale(unit) => Some(&unit.troop),
            UnitKind::Resurrecting(unit) => Some(unit.inner.troop()),
            UnitKind::Area(unit) => Some(&unit.troop),
            UnitKind::Leader(_) => None,
        }
    }

    pub fn troop_mut(&mut self) -> Option<&mut Troop> {
        match &mut self.kind {
            UnitKind::Plain(troop) => Some(troop),
            UnitKind::Morale(unit) => Some(&mut unit.troop),
            UnitKind::Resurrecting(unit) => Some(unit.inner.troop_mut()),
            UnitKind::Area(unit) => Some(&mut unit.troop),
            UnitKind::Leader(_) => None,
        }
    }

    pub fn as_summoner(&self) -> Option<&Summoner> {
        match &self.kind {
            UnitKind::Leader(summoner) => Some(summoner),
            _ => None,
        }
    }

    pub fn as_summoner_mut(&mut self) -> Option<&mut Summoner> {
        match &mut self.kind {
            UnitKind::Leader(summoner) => Some(summoner),
            _ => None,
        }
    }

    /// Morale-capable part of this unit, if any (including a wrapped one)
    pub fn morale_troop(&self) -> Option<&MoraleTroop> {
        match &self.kind {
            UnitKind::Morale(unit) => Some(unit),
            UnitKind::Resurrecting(ResurrectingTroop {
                inner: InnerTroop::Morale(unit),
            }) => Some(unit),
            _ => None,
        }
    }

    pub fn morale_troop_mut(&mut self) -> Option<&mut MoraleTroop> {
        match &mut self.kind {
            UnitKind::Morale(unit) => Some(unit),
            UnitKind::Resurrecting(ResurrectingTroop {
                inner: InnerTroop::Morale(unit),
            }) => Some(unit),
            _ => None,
        }
    }

    pub fn is_leader(&self) -> bool {
        matches!(self.kind, UnitKind::Leader(_))
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            UnitKind::Leader(summoner) => &summoner.descriptor.name,
            _ => self.troop().map_or("", |t| t.descriptor.name.as_str()),
        }
    }

    /// School the unit fights for; leaders belong to none
    pub fn school(&self) -> Option<&str> {
        self.troop().map(|t| t.descriptor.school.as_str())
    }

    pub fn position(&self) -> GridPos {
        match &self.kind {
            UnitKind::Leader(summoner) => summoner.position,
            _ => self.troop().map(|t| t.position).unwrap_or_default(),
        }
    }

    pub fn set_position(&mut self, position: GridPos) {
        if let Some(summoner) = self.as_summoner_mut() {
            summoner.position = position;
        } else if let Some(troop) = self.troop_mut() {
            troop.position = position;
        }
    }

    pub fn initiative(&self) -> f64 {
        match &self.kind {
            UnitKind::Leader(summoner) => summoner.descriptor.initiative,
            _ => self.troop().map_or(0.0, |t| t.descriptor.initiative),
        }
    }

    pub fn current_hp(&self) -> f64 {
        match &self.kind {
            UnitKind::Leader(summoner) => summoner.current_hp(),
            _ => self.troop().map_or(0.0, |t| t.current_hp()),
        }
    }

    /// Overwrite HP directly (save loading, death)
    pub fn set_current_hp(&mut self, hp: f64) {
        if let Some(summoner) = self.as_summoner_mut() {
            summoner.set_current_hp(hp);
        } else if let Some(troop) = self.troop_mut() {
            troop.set_current_hp(hp);
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp() > 0.0
    }

    /// Creatures remaining; a leader always counts as one
    pub fn amount(&self) -> u32 {
        match &self.kind {
            UnitKind::Leader(_) => 1,
            _ => self.troop().map_or(0, |t| t.amount()),
        }
    }

    pub fn max_amount(&self) -> u32 {
        match &self.kind {
            UnitKind::Leader(_) => 1,
            _ => self.troop().map_or(0, |t| t.descriptor.max_amount),
        }
    }

    /// Flat damage per attack, before any multiplier
    pub fn damage(&self) -> f64 {
        match &self.kind {
            UnitKind::Leader(summoner) => summoner.descriptor.damage,
            _ => self.troop().map_or(0.0, |t| t.descriptor.damage),
        }
    }

    pub fn xp_for_destroy(&self) -> f64 {
        self.troop().map_or(0.0, |t| t.descriptor.xp_for_destroy)
    }

    /// Cells the unit may move per axis in one action
    pub fn step_budget(&self) -> i32 {
        match &self.kind {
            UnitKind::Leader(_) => LEADER_MOVE_RADIUS,
            _ => self.troop().map_or(0, |t| t.descriptor.speed),
        }
    }

    pub fn morale(&self) -> Option<f64> {
        self.morale_troop().map(|m| m.morale())
    }

    pub fn take_damage(&mut self, damage: f64) {
        match &mut self.kind {
            UnitKind::Plain(troop) => troop.take_damage(damage),
            UnitKind::Morale(unit) => unit.take_damage(damage),
            UnitKind::Resurrecting(unit) => unit.inner.take_damage(damage),
            UnitKind::Area(unit) => unit.troop.take_damage(damage),
            UnitKind::Leader(summoner) => summoner.take_damage(damage),
        }
    }

    /// Force HP to zero; the death sweep removes the unit at tick end
    pub fn death(&mut self) {
        self.set_current_hp(0.0);
    }

    /// Multiplier this unit gets against `defender`
    ///
    /// Leaders ignore dominance, and dominance only applies between troops.
    pub fn damage_coefficient(&self, schools: &SchoolsTable, defender: &Unit) -> f64 {
        match (self.school(), defender.school()) {
            (Some(own), Some(other)) => schools.combat_multiplier(own, other),
            _ => 1.0,
        }
    }

    /// Damage this unit deals to `defender` in one attack
    ///
    /// Morale troops use their own coefficient scaled by morale. Every other
    /// troop takes the coefficient from the defender's side of the pairing,
    /// which for two troops compares the defender's school with itself.
    pub fn attack_damage(&self, schools: &SchoolsTable, defender: &Unit) -> f64 {
        match &self.kind {
            UnitKind::Leader(summoner) => summoner.descriptor.damage,
            _ => match self.morale_troop() {
                Some(unit) => {
                    self.damage_coefficient(schools, defender) * unit.morale_factor() * self.damage()
                }
                None => defender.damage_coefficient(schools, defender) * self.damage(),
            },
        }
    }

    /// Attack `defender`; returns true if the hit destroyed it
    pub fn make_damage(&mut self, schools: &SchoolsTable, defender: &mut Unit) -> bool {
        let damage = self.attack_damage(schools, defender);
        defender.take_damage(damage);
        if defender.current_hp() > 0.0 {
            return false;
        }
        defender.death();
        if let Some(unit) = self.morale_troop_mut() {
            unit.on_kill();
        }
        true
    }
}
