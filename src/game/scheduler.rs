//! Tick scheduler
//!
//! Each tick: snapshot both rosters -> interleave turns by initiative ->
//! death sweep -> win check. A player save-and-exit cuts the tick short.

use crate::core::error::{DuelError, Result};
use crate::core::types::{Side, UnitId};
use crate::game::actions::ActionSelector;
use crate::game::engine::Game;
use crate::game::state::{Casualty, MatchState, TickReport};
use crate::units::area::{damage_all, shard_count};
use crate::units::constants::CHASE_RANGE_FACTOR;
use crate::units::UnitKind;

/// Which turn routine a unit runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnKind {
    Troop { morale: bool },
    Resurrecting { morale: bool },
    Area,
    Leader,
}

impl Game {
    /// Run one full round of turns
    ///
    /// Turn order is fixed at the start of the tick: units deployed during
    /// the tick wait for the next one, and units that die mid-tick skip
    /// their remaining turn. On exact initiative ties the player side acts
    /// first.
    pub fn tick(&mut self, selector: &mut dyn ActionSelector) -> Result<TickReport> {
        if !self.state.is_running() {
            return Err(DuelError::MatchOver);
        }
        self.tick += 1;
        let mut report = TickReport::new(self.tick);

        let player_order = self.player.turn_order();
        let enemy_order = self.enemy.turn_order();
        let (mut p, mut e) = (0, 0);

        loop {
            let (id, side) = match (player_order.get(p), enemy_order.get(e)) {
                (Some(&(id, ip)), Some(&(_, ie))) if ip >= ie => {
                    p += 1;
                    (id, Side::Player)
                }
                (_, Some(&(id, _))) => {
                    e += 1;
                    (id, Side::Enemy)
                }
                (Some(&(id, _)), None) => {
                    p += 1;
                    (id, Side::Player)
                }
                (None, None) => break,
            };
            if self.take_turn(id, side, selector)? {
                report.units_acted += 1;
            }
            if self.state == MatchState::Stopped {
                report.state = self.state;
                return Ok(report);
            }
        }

        self.death_sweep(&mut report);
        report.state = self.state;
        Ok(report)
    }

    /// One unit's action; false if the unit is gone or already dead
    fn take_turn(&mut self, id: UnitId, side: Side, selector: &mut dyn ActionSelector) -> Result<bool> {
        let Some(unit) = self.roster(side).get(id) else {
            return Ok(false);
        };
        if !unit.is_alive() {
            return Ok(false);
        }
        let kind = match &unit.kind {
            UnitKind::Plain(_) => TurnKind::Troop { morale: false },
            UnitKind::Morale(_) => TurnKind::Troop { morale: true },
            UnitKind::Resurrecting(_) => TurnKind::Resurrecting {
                morale: unit.morale_troop().is_some(),
            },
            UnitKind::Area(_) => TurnKind::Area,
            UnitKind::Leader(_) => TurnKind::Leader,
        };

        match kind {
            TurnKind::Troop { morale } => {
                self.troop_turn(id, side)?;
                if morale {
                    self.balance_morale(id)?;
                }
            }
            TurnKind::Resurrecting { morale } => {
                self.resurrect(id, side)?;
                self.troop_turn(id, side)?;
                if morale {
                    self.balance_morale(id)?;
                }
            }
            TurnKind::Area => self.area_turn(id, side)?,
            TurnKind::Leader => self.leader_turn(id, side, selector)?,
        }
        Ok(true)
    }

    /// Chase the nearest enemy, or hit it once close enough
    ///
    /// The unit steps its full speed along x while the gap there is wider
    /// than twice its speed, then along y. A blocked step falls back to the
    /// first free cell within speed; with none free the unit waits.
    fn troop_turn(&mut self, id: UnitId, side: Side) -> Result<()> {
        let Some(target) = self.find_closest_enemy(id) else {
            return Ok(());
        };
        let (target_id, target_pos) = (target.id, target.position());
        let unit = self.unit(id)?;
        let pos = unit.position();
        let speed = unit.step_budget();
        let chase = CHASE_RANGE_FACTOR * speed;

        let dx = target_pos.x - pos.x;
        let dy = target_pos.y - pos.y;
        let step = if dx.abs() > chase {
            pos.offset(speed * dx.signum(), 0)
        } else if dy.abs() > chase {
            pos.offset(0, speed * dy.signum())
        } else {
            self.strike(id, target_id)?;
            return Ok(());
        };

        let destination = self.field.clamp(step);
        if self.move_unit(id, destination).is_ok() {
            return Ok(());
        }
        match self.free_cell_near(pos, speed) {
            Some(cell) => self.move_unit(id, cell),
            None => {
                tracing::debug!("{} unit at {} is boxed in", side, pos);
                Ok(())
            }
        }
    }

    fn balance_morale(&mut self, id: UnitId) -> Result<()> {
        if let Some(unit) = self.unit_mut(id)?.morale_troop_mut() {
            unit.balance_morality();
        }
        Ok(())
    }

    fn resurrect(&mut self, id: UnitId, side: Side) -> Result<()> {
        let rng = &mut self.rng;
        let roster = match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        };
        let unit = roster.get_mut(id).ok_or(DuelError::UnitNotFound(id))?;
        if unit.amount() >= unit.max_amount() {
            return Ok(());
        }
        if let UnitKind::Resurrecting(troop) = &mut unit.kind {
            let revived = troop.try_to_resurrect(rng);
            if revived > 0 {
                tracing::debug!("{} revived {} creatures", troop.inner.troop().descriptor.name, revived);
            }
        }
        Ok(())
    }

    /// Hit the whole opposing roster, then self-destruct
    fn area_turn(&mut self, id: UnitId, side: Side) -> Result<()> {
        let unit = self.unit(id)?;
        let damage = unit.damage();
        let name = unit.name().to_string();
        let shards = shard_count(self.config.area_damage_fallback_shards);

        let targets = self.roster_mut(side.opponent()).units_mut();
        let hit = damage_all(targets, damage, shards);
        tracing::debug!("{} hit {} units for {}", name, hit, damage);

        self.unit_mut(id)?.death();
        Ok(())
    }

    /// Remove dead units, pool XP for fallen enemies, and check for a fallen leader
    ///
    /// The player leader is checked first, so if both leaders fall in the
    /// same tick the enemy wins.
    fn death_sweep(&mut self, report: &mut TickReport) {
        let fallen_player = self.player.drain_dead();
        let fallen_enemy = self.enemy.drain_dead();

        let xp: f64 = fallen_enemy.iter().map(|u| u.xp_for_destroy()).sum();
        if xp > 0.0 {
            self.add_xp(xp);
            report.xp_pooled = xp;
        }

        let mut winner = None;
        for (side, fallen) in [(Side::Player, &fallen_player), (Side::Enemy, &fallen_enemy)] {
            for unit in fallen.iter() {
                tracing::debug!("{} {} removed at {}", side, unit.name(), unit.position());
                if unit.is_leader() && winner.is_none() {
                    winner = Some(side.opponent());
                }
                report.removed.push(Casualty {
                    id: unit.id,
                    name: unit.name().to_string(),
                    side,
                    leader: unit.is_leader(),
                });
            }
        }
        if !report.removed.is_empty() {
            tracing::info!(
                "Tick {}: {} units removed, {} XP pooled",
                self.tick,
                report.removed.len(),
                xp
            );
        }

        if let Some(winner) = winner {
            self.state = MatchState::Ended { winner };
            tracing::info!("Match over at tick {}: {} wins", self.tick, winner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::GridPos;
    use crate::game::actions::{AutoPilot, PlayerAction, Scripted};
    use crate::knowledge::{Production, School, SchoolsTable, Skill};
    use crate::spatial::Field;
    use crate::units::descriptor::fixtures::{calculus, commission, leader};
    use crate::units::{create_amoral_unit, create_kamikaze, create_moral_unit, create_resurrection_unit};

    fn arena() -> Game {
        let mut schools = SchoolsTable::new();
        schools.add_school(
            School::new("MSU").with_skill(Skill::new("Classes", calculus(), Production::Amoral, 0.0, 1.0)),
        );
        schools.add_school(School::new("MEPhI").with_dominance(["MSU"]));
        Game::new(Field::new(20, 20), schools, SimulationConfig::default())
    }

    fn with_leaders(game: &mut Game, player_hp: f64, enemy_hp: f64) -> (UnitId, UnitId) {
        let p = game
            .deploy_leader(&leader(Side::Player, player_hp, &[]), GridPos::new(0, 0))
            .unwrap();
        let e = game
            .deploy_leader(&leader(Side::Enemy, enemy_hp, &[]), GridPos::new(19, 19))
            .unwrap();
        (p, e)
    }

    #[test]
    fn test_troop_chases_along_x_first() {
        let mut game = arena();
        with_leaders(&mut game, 100.0, 100.0);
        let id = game
            .deploy_unit(GridPos::new(2, 2), create_amoral_unit(&calculus()), Side::Player)
            .unwrap();
        game.deploy_unit(GridPos::new(15, 10), create_amoral_unit(&calculus()), Side::Enemy)
            .unwrap();

        game.troop_turn(id, Side::Player).unwrap();
        assert_eq!(game.unit(id).unwrap().position(), GridPos::new(5, 2));
    }

    #[test]
    fn test_troop_attacks_within_chase_range() {
        let mut game = arena();
        with_leaders(&mut game, 100.0, 100.0);
        let id = game
            .deploy_unit(GridPos::new(5, 5), create_amoral_unit(&calculus()), Side::Player)
            .unwrap();
        let target = game
            .deploy_unit(GridPos::new(10, 8), create_amoral_unit(&calculus()), Side::Enemy)
            .unwrap();

        game.troop_turn(id, Side::Player).unwrap();
        assert_eq!(game.unit(id).unwrap().position(), GridPos::new(5, 5));
        assert_eq!(game.unit(target).unwrap().current_hp(), 6.0);
    }

    #[test]
    fn test_blocked_step_falls_back_to_nearby_cell() {
        let mut game = arena();
        with_leaders(&mut game, 100.0, 100.0);
        let id = game
            .deploy_unit(GridPos::new(2, 2), create_amoral_unit(&calculus()), Side::Player)
            .unwrap();
        game.field.place_obstacle(GridPos::new(5, 2));
        game.deploy_unit(GridPos::new(15, 2), create_amoral_unit(&calculus()), Side::Enemy)
            .unwrap();

        game.troop_turn(id, Side::Player).unwrap();
        assert_eq!(game.unit(id).unwrap().position(), GridPos::new(2, 3));
    }

    #[test]
    fn test_area_troop_hits_every_enemy_and_dies() {
        let mut game = arena();
        let (player_leader, enemy_leader) = with_leaders(&mut game, 100.0, 100.0);
        let bomb = game
            .deploy_unit(GridPos::new(1, 1), create_kamikaze(&calculus()), Side::Player)
            .unwrap();
        let ally = game
            .deploy_unit(GridPos::new(3, 1), create_moral_unit(&commission()), Side::Player)
            .unwrap();
        let a = game
            .deploy_unit(GridPos::new(10, 10), create_amoral_unit(&calculus()), Side::Enemy)
            .unwrap();
        let b = game
            .deploy_unit(GridPos::new(12, 3), create_moral_unit(&commission()), Side::Enemy)
            .unwrap();

        game.area_turn(bomb, Side::Player).unwrap();
        assert_eq!(game.unit(a).unwrap().current_hp(), 6.0);
        assert_eq!(game.unit(b).unwrap().current_hp(), 6.0);
        assert_eq!(game.unit(enemy_leader).unwrap().current_hp(), 98.0);
        assert!(!game.unit(bomb).unwrap().is_alive());
        // own side is untouched
        assert_eq!(game.unit(player_leader).unwrap().current_hp(), 100.0);
        assert_eq!(game.unit(ally).unwrap().current_hp(), 8.0);
    }

    #[test]
    fn test_tick_sweeps_dead_and_pools_enemy_xp() {
        let mut game = arena();
        let (player_leader, _) = with_leaders(&mut game, 100.0, 100.0);
        game.deploy_unit(GridPos::new(1, 1), create_kamikaze(&calculus()), Side::Player)
            .unwrap();
        let mut weak = create_amoral_unit(&calculus());
        weak.set_current_hp(1.0);
        game.deploy_unit(GridPos::new(10, 10), weak, Side::Enemy).unwrap();

        let report = game.tick(&mut Scripted::new([])).unwrap();
        assert_eq!(report.removed.len(), 2);
        assert_eq!(report.xp_pooled, 2.0);
        assert_eq!(game.roster(Side::Player).len(), 1);
        assert_eq!(game.roster(Side::Enemy).len(), 1);
        assert_eq!(game.summoner(player_leader).unwrap().xp(), 0.0);

        game.tick(&mut Scripted::new([])).unwrap();
        assert_eq!(game.summoner(player_leader).unwrap().xp(), 2.0);
    }

    #[test]
    fn test_save_and_exit_cuts_tick_short() {
        let mut game = arena();
        with_leaders(&mut game, 100.0, 100.0);
        let troop = game
            .deploy_unit(GridPos::new(2, 2), create_amoral_unit(&calculus()), Side::Player)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.json");

        let mut selector = Scripted::new([PlayerAction::SaveAndExit(path.clone())]);
        let report = game.tick(&mut selector).unwrap();

        assert_eq!(report.state, MatchState::Stopped);
        assert_eq!(report.units_acted, 1);
        assert_eq!(game.unit(troop).unwrap().position(), GridPos::new(2, 2));
        assert_eq!(game.roster(Side::Enemy).len(), 1);
        assert!(path.exists());
        assert!(matches!(game.tick(&mut AutoPilot::new()), Err(DuelError::MatchOver)));
    }

    #[test]
    fn test_leader_death_ends_match() {
        let mut game = arena();
        with_leaders(&mut game, 100.0, 1.0);
        game.deploy_unit(GridPos::new(1, 1), create_kamikaze(&calculus()), Side::Player)
            .unwrap();

        let report = game.tick(&mut AutoPilot::new()).unwrap();
        assert_eq!(report.state, MatchState::Ended { winner: Side::Player });
        assert!(report.removed.iter().any(|c| c.leader && c.side == Side::Enemy));
        assert!(matches!(game.tick(&mut AutoPilot::new()), Err(DuelError::MatchOver)));
    }

    #[test]
    fn test_both_leaders_falling_favours_enemy() {
        let mut game = arena();
        with_leaders(&mut game, 1.0, 1.0);
        game.deploy_unit(GridPos::new(1, 1), create_kamikaze(&calculus()), Side::Player)
            .unwrap();
        game.deploy_unit(GridPos::new(18, 18), create_kamikaze(&calculus()), Side::Enemy)
            .unwrap();

        let report = game.tick(&mut AutoPilot::new()).unwrap();
        assert_eq!(report.state, MatchState::Ended { winner: Side::Enemy });
    }

    #[test]
    fn test_units_summoned_mid_tick_wait() {
        let mut game = arena();
        game.deploy_leader(&leader(Side::Player, 100.0, &[]), GridPos::new(0, 0))
            .unwrap();
        game.deploy_leader(&leader(Side::Enemy, 100.0, &[("MSU", 10.0)]), GridPos::new(19, 19))
            .unwrap();

        let mut selector = Scripted::new([PlayerAction::AccumulateEnergy]);
        let report = game.tick(&mut selector).unwrap();
        assert_eq!(report.units_acted, 2);

        let summoned = game.roster(Side::Enemy).at(1).unwrap();
        assert_eq!(summoned.name(), "Calculus");
        assert_eq!(summoned.position(), GridPos::new(19, 18));
        assert_eq!(game.summoner(game.leader(Side::Enemy).unwrap().id).unwrap().energy(), 9.0);
    }

    #[test]
    fn test_player_wins_initiative_ties() {
        let mut game = arena();
        with_leaders(&mut game, 100.0, 100.0);
        let mut fast = calculus();
        fast.initiative = 1.0;
        let player = game
            .deploy_unit(GridPos::new(5, 5), create_amoral_unit(&fast), Side::Player)
            .unwrap();
        let mut fragile = fast.clone();
        fragile.damage = 100.0;
        let enemy = game
            .deploy_unit(GridPos::new(6, 5), create_amoral_unit(&fragile), Side::Enemy)
            .unwrap();
        game.unit_mut(enemy).unwrap().set_current_hp(2.0);

        game.tick(&mut Scripted::new([])).unwrap();
        assert!(game.unit(player).is_ok());
        assert!(game.unit(enemy).is_err());
    }

    #[test]
    fn test_resurrecting_troop_never_exceeds_max() {
        let mut game = arena();
        with_leaders(&mut game, 100.0, 100.0);
        let id = game
            .deploy_unit(GridPos::new(5, 5), create_resurrection_unit(&commission()), Side::Player)
            .unwrap();
        for _ in 0..20 {
            game.unit_mut(id).unwrap().take_damage(3.0);
            game.resurrect(id, Side::Player).unwrap();
            let unit = game.unit(id).unwrap();
            assert!(unit.amount() <= unit.max_amount());
            assert!(unit.current_hp() <= 8.0);
            game.unit_mut(id).unwrap().set_current_hp(8.0);
        }
    }
}
