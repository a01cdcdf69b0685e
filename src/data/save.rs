//! Match save files
//!
//! A save is a flat list of units: the player roster then the enemy roster,
//! each in turn order. Leaders also carry their XP.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::{DuelError, Result, SaveError};
use crate::core::types::{GridPos, Side};
use crate::game::Game;
use crate::knowledge::Production;
use crate::units::{create_unit, Unit, UnitDescriptor, UnitKind};

/// Variant tag of a saved unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveKind {
    Summoner,
    Moral,
    Amoral,
    #[serde(rename = "Ressurection")]
    Resurrection,
    Kamikaze,
}

impl SaveKind {
    pub fn of(unit: &Unit) -> Self {
        match &unit.kind {
            UnitKind::Plain(_) => SaveKind::Amoral,
            UnitKind::Morale(_) => SaveKind::Moral,
            UnitKind::Resurrecting(_) => SaveKind::Resurrection,
            UnitKind::Area(_) => SaveKind::Kamikaze,
            UnitKind::Leader(_) => SaveKind::Summoner,
        }
    }

    /// Production rule that rebuilds this variant; leaders have none
    pub fn production(self) -> Option<Production> {
        match self {
            SaveKind::Summoner => None,
            SaveKind::Moral => Some(Production::Moral),
            SaveKind::Amoral => Some(Production::Amoral),
            SaveKind::Resurrection => Some(Production::Resurrection),
            SaveKind::Kamikaze => Some(Production::Kamikaze),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEntry {
    #[serde(rename = "type")]
    pub kind: SaveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<f64>,
    pub name: String,
    pub hp: f64,
    pub team: Side,
    pub x: i32,
    pub y: i32,
}

impl SaveEntry {
    pub fn from_unit(unit: &Unit, team: Side) -> Self {
        let pos = unit.position();
        Self {
            kind: SaveKind::of(unit),
            xp: unit.as_summoner().map(|s| s.xp()),
            name: unit.name().to_string(),
            hp: unit.current_hp(),
            team,
            x: pos.x,
            y: pos.y,
        }
    }

    pub fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub units: Vec<SaveEntry>,
}

impl SaveFile {
    /// Snapshot both rosters, player first
    ///
    /// Troops killed earlier in an unfinished tick are left out; leaders are
    /// always written.
    pub fn from_game(game: &Game) -> Self {
        let units = [Side::Player, Side::Enemy]
            .into_iter()
            .flat_map(|side| {
                game.roster(side)
                    .iter()
                    .filter(|unit| unit.is_leader() || unit.is_alive())
                    .map(move |unit| SaveEntry::from_unit(unit, side))
            })
            .collect();
        Self { units }
    }

    pub fn to_json(&self) -> std::result::Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, SaveError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn write(&self, path: &Path) -> std::result::Result<(), SaveError> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Saved {} units to {}", self.units.len(), path.display());
        Ok(())
    }

    pub fn read(path: &Path) -> std::result::Result<Self, SaveError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

impl Game {
    pub fn write_save(&self, path: &Path) -> Result<()> {
        SaveFile::from_game(self).write(path)?;
        Ok(())
    }

    /// Restore a save on top of a freshly set-up match
    ///
    /// Leader entries overwrite the leader at index 0 of their side's roster
    /// in place; every other entry is rebuilt from its unit template and
    /// deployed. Leaders are restored first so they free their start cells.
    /// A leader saved off the field, on an obstacle, or on the other leader's
    /// cell aborts the load.
    pub fn load_save(&mut self, save: &SaveFile, units: &BTreeMap<String, UnitDescriptor>) -> Result<()> {
        for entry in save.units.iter().filter(|e| e.kind == SaveKind::Summoner) {
            let pos = entry.position();
            if !self.field.in_bounds(pos) || self.field.is_obstacle(pos) {
                return Err(placement_error(
                    &entry.name,
                    DuelError::CellUnavailable { x: pos.x, y: pos.y },
                ));
            }
            let leader = self
                .roster_mut(entry.team)
                .at_mut(0)
                .and_then(|unit| unit.as_summoner_mut())
                .ok_or(SaveError::LeaderNotFirst(entry.team))?;
            leader.set_current_hp(entry.hp);
            leader.position = entry.position();
            leader.set_xp(entry.xp.unwrap_or(0.0));
        }
        if let (Some(player), Some(enemy)) = (self.leader(Side::Player), self.leader(Side::Enemy)) {
            let pos = player.position();
            if player.is_alive() && enemy.is_alive() && pos == enemy.position() {
                return Err(placement_error(
                    enemy.name(),
                    DuelError::CellUnavailable { x: pos.x, y: pos.y },
                ));
            }
        }

        for entry in &save.units {
            let Some(production) = entry.kind.production() else {
                continue;
            };
            let descriptor = units
                .get(&entry.name)
                .ok_or_else(|| SaveError::UnknownUnit(entry.name.clone()))?;
            let mut unit = create_unit(production, descriptor);
            unit.set_current_hp(entry.hp);
            self.deploy_unit(entry.position(), unit, entry.team)
                .map_err(|e| placement_error(&entry.name, e))?;
        }

        tracing::info!(
            "Loaded save: {} player units, {} enemy units",
            self.roster(Side::Player).len(),
            self.roster(Side::Enemy).len()
        );
        Ok(())
    }
}

fn placement_error(name: &str, error: DuelError) -> DuelError {
    DuelError::Save(SaveError::Placement {
        name: name.to_string(),
        reason: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::knowledge::SchoolsTable;
    use crate::spatial::Field;
    use crate::units::descriptor::fixtures::{calculus, commission, leader};
    use crate::units::{create_kamikaze, create_moral_unit, create_summoner};

    fn catalog_units() -> BTreeMap<String, UnitDescriptor> {
        [calculus(), commission()]
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect()
    }

    fn fresh_game() -> Game {
        let mut game = Game::new(Field::new(20, 20), SchoolsTable::new(), SimulationConfig::default());
        game.deploy_leader(&leader(Side::Player, 30.0, &[]), GridPos::new(5, 10))
            .unwrap();
        game.deploy_leader(&leader(Side::Enemy, 20.0, &[]), GridPos::new(15, 10))
            .unwrap();
        game
    }

    #[test]
    fn test_entry_shape() {
        let mut unit = create_summoner(&leader(Side::Player, 30.0, &[]));
        unit.as_summoner_mut().unwrap().set_xp(4.0);
        unit.set_position(GridPos::new(1, 2));
        let json = serde_json::to_string(&SaveEntry::from_unit(&unit, Side::Player)).unwrap();
        assert_eq!(
            json,
            r#"{"type":"Summoner","xp":4.0,"name":"player leader","hp":30.0,"team":"player","x":1,"y":2}"#
        );

        let troop = create_kamikaze(&calculus());
        let entry = SaveEntry::from_unit(&troop, Side::Enemy);
        assert_eq!(entry.kind, SaveKind::Kamikaze);
        assert!(!serde_json::to_string(&entry).unwrap().contains("xp"));
    }

    #[test]
    fn test_load_restores_leaders_and_troops() {
        let mut original = fresh_game();
        let leader_id = original.leader(Side::Player).unwrap().id;
        original.summoner_mut(leader_id).unwrap().set_xp(12.0);
        original.unit_mut(leader_id).unwrap().set_current_hp(17.5);
        let mut troop = create_moral_unit(&commission());
        troop.set_current_hp(3.0);
        original.deploy_unit(GridPos::new(7, 7), troop, Side::Player).unwrap();
        let save = SaveFile::from_game(&original);

        let mut restored = fresh_game();
        restored.load_save(&save, &catalog_units()).unwrap();

        let leader = restored.leader(Side::Player).unwrap();
        assert_eq!(leader.current_hp(), 17.5);
        assert_eq!(leader.as_summoner().unwrap().xp(), 12.0);
        let troop = restored.find_unit_at(GridPos::new(7, 7)).unwrap();
        assert_eq!(troop.amount(), 2);
        assert_eq!(SaveKind::of(troop), SaveKind::Moral);
    }

    #[test]
    fn test_load_fails_without_leader_first() {
        let mut game = Game::new(Field::new(20, 20), SchoolsTable::new(), SimulationConfig::default());
        let save = SaveFile {
            units: vec![SaveEntry {
                kind: SaveKind::Summoner,
                xp: Some(0.0),
                name: "enemy leader".into(),
                hp: 5.0,
                team: Side::Enemy,
                x: 1,
                y: 1,
            }],
        };
        assert!(matches!(
            game.load_save(&save, &catalog_units()),
            Err(DuelError::Save(SaveError::LeaderNotFirst(Side::Enemy)))
        ));
    }

    fn leader_entry(team: Side, x: i32, y: i32) -> SaveEntry {
        SaveEntry {
            kind: SaveKind::Summoner,
            xp: Some(0.0),
            name: format!("{} leader", team),
            hp: 10.0,
            team,
            x,
            y,
        }
    }

    #[test]
    fn test_load_rejects_illegal_leader_cells() {
        let mut game = fresh_game();
        game.field.place_obstacle(GridPos::new(3, 3));

        let cases = [
            vec![leader_entry(Side::Player, 3, 3)],
            vec![leader_entry(Side::Enemy, 99, -4)],
            vec![leader_entry(Side::Player, 8, 8), leader_entry(Side::Enemy, 8, 8)],
        ];
        for units in cases {
            let save = SaveFile { units };
            let mut game = game.clone();
            assert!(matches!(
                game.load_save(&save, &catalog_units()),
                Err(DuelError::Save(SaveError::Placement { .. }))
            ));
        }

        let save = SaveFile {
            units: vec![leader_entry(Side::Player, 15, 10), leader_entry(Side::Enemy, 5, 10)],
        };
        game.load_save(&save, &catalog_units()).unwrap();
        assert_eq!(game.leader(Side::Player).unwrap().position(), GridPos::new(15, 10));
        assert_eq!(game.leader(Side::Enemy).unwrap().position(), GridPos::new(5, 10));
    }

    #[test]
    fn test_load_rejects_unknown_unit() {
        let mut game = fresh_game();
        let save = SaveFile {
            units: vec![SaveEntry {
                kind: SaveKind::Amoral,
                xp: None,
                name: "Ghost".into(),
                hp: 1.0,
                team: Side::Player,
                x: 3,
                y: 3,
            }],
        };
        assert!(matches!(
            game.load_save(&save, &catalog_units()),
            Err(DuelError::Save(SaveError::UnknownUnit(_)))
        ));
    }
}
