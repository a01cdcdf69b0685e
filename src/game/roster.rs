//! Per-side unit list kept in descending initiative order

use crate::core::types::{Side, UnitId};
use crate::units::Unit;

#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    side: Side,
    units: Vec<Unit>,
}

impl Roster {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            units: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Mutable view for in-place updates; the slice cannot be resized
    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn living(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Insert after every unit with greater or equal initiative; returns the index
    pub fn insert_sorted(&mut self, unit: Unit) -> usize {
        let initiative = unit.initiative();
        let index = self.units.partition_point(|u| u.initiative() >= initiative);
        self.units.insert(index, unit);
        index
    }

    /// Append without keeping order
    #[cfg(test)]
    pub(crate) fn push(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    /// Stable sort by descending initiative
    pub fn sort_by_initiative(&mut self) {
        self.units
            .sort_by(|a, b| b.initiative().total_cmp(&a.initiative()));
    }

    pub fn is_sorted(&self) -> bool {
        self.units
            .windows(2)
            .all(|pair| pair[0].initiative() >= pair[1].initiative())
    }

    pub fn index_of(&self, id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Unit> {
        self.units.get_mut(index)
    }

    /// Remove and return every unit with HP at or below zero, keeping order
    pub fn drain_dead(&mut self) -> Vec<Unit> {
        let (alive, dead): (Vec<Unit>, Vec<Unit>) =
            std::mem::take(&mut self.units).into_iter().partition(|u| u.is_alive());
        self.units = alive;
        dead
    }

    /// First leader in the roster
    pub fn leader(&self) -> Option<&Unit> {
        self.units.iter().find(|u| u.is_leader())
    }

    /// Snapshot of (id, initiative) in turn order
    pub fn turn_order(&self) -> Vec<(UnitId, f64)> {
        self.units.iter().map(|u| (u.id, u.initiative())).collect()
    }
}
