//! Leader actions and the leader's turn

use crate::core::error::{DuelError, Result};
use crate::core::types::{GridPos, Side, UnitId};
use crate::game::actions::{ActionSelector, PlayerAction};
use crate::game::engine::Game;
use crate::game::state::MatchState;
use crate::units::constants::{LEADER_ATTACK_REACH, LEADER_MOVE_RADIUS};

impl Game {
    /// Summon a troop from a skill onto a free cell, paying its energy cost
    ///
    /// Nothing is spent unless the unit is actually deployed.
    pub fn summon_unit(
        &mut self,
        leader: UnitId,
        school: &str,
        skill: &str,
        pos: GridPos,
    ) -> Result<UnitId> {
        let (side, _) = self.locate(leader).ok_or(DuelError::UnitNotFound(leader))?;
        let summoner = self.summoner(leader)?;
        let template = self.schools.get_skill(school, skill)?;
        summoner.check_summon(template)?;
        let unit = template.create();
        let cost = template.required_energy;

        let id = self.deploy_unit(pos, unit, side)?;
        self.summoner_mut(leader)?.spend_energy(cost);
        tracing::info!("{} leader summoned {}/{} at {}", side, school, skill, pos);
        Ok(id)
    }

    /// Spend XP on knowledge in an existing school
    pub fn upgrade_school(&mut self, leader: UnitId, school: &str) -> Result<()> {
        if !self.schools.contains_school(school) {
            return Err(DuelError::NoSuchSchool(school.to_string()));
        }
        let summoner = self.summoner_mut(leader)?;
        summoner.upgrade_school(school)?;
        tracing::info!(
            "{} leader upgraded {} to {}",
            summoner.side(),
            school,
            summoner.knowledge(school)
        );
        Ok(())
    }

    pub fn accumulate_energy(&mut self, leader: UnitId) -> Result<()> {
        let summoner = self.summoner_mut(leader)?;
        summoner.accumulate_energy();
        tracing::debug!("{} leader energy now {}", summoner.side(), summoner.energy());
        Ok(())
    }

    /// Leader hits an opposing unit on a cell within reach
    pub fn leader_attack(&mut self, leader: UnitId, target: GridPos) -> Result<bool> {
        let unit = self.unit(leader)?;
        if !unit.is_leader() {
            return Err(DuelError::NotALeader(leader));
        }
        if unit.position().axis_distance(&target) > LEADER_ATTACK_REACH {
            return Err(DuelError::OutOfReach {
                x: target.x,
                y: target.y,
            });
        }
        let (side, _) = self.locate(leader).ok_or(DuelError::UnitNotFound(leader))?;
        let defender = self
            .find_enemy_at(side, target)
            .map(|u| u.id)
            .ok_or(DuelError::NoUnitAt {
                x: target.x,
                y: target.y,
            })?;
        self.strike(leader, defender)
    }

    /// Carry out one leader action
    pub fn apply_action(&mut self, leader: UnitId, action: &PlayerAction) -> Result<()> {
        if !self.state.is_running() {
            return Err(DuelError::MatchOver);
        }
        match action {
            PlayerAction::Summon {
                school,
                skill,
                x,
                y,
            } => self
                .summon_unit(leader, school, skill, GridPos::new(*x, *y))
                .map(|_| ()),
            PlayerAction::Move { x, y } => {
                self.summoner(leader)?;
                self.move_unit(leader, GridPos::new(*x, *y))
            }
            PlayerAction::Attack { x, y } => self
                .leader_attack(leader, GridPos::new(*x, *y))
                .map(|_| ()),
            PlayerAction::UpgradeSchool(school) => self.upgrade_school(leader, school),
            PlayerAction::AccumulateEnergy => self.accumulate_energy(leader),
            PlayerAction::EndTurn => Ok(()),
            PlayerAction::SaveAndExit(path) => {
                self.summoner(leader)?;
                self.write_save(path)?;
                self.state = MatchState::Stopped;
                tracing::info!("Match stopped at tick {}, saved to {}", self.tick, path.display());
                Ok(())
            }
        }
    }

    /// Summon the strongest affordable skill next to the leader, else charge energy
    ///
    /// Ends the turn when a skill is affordable but every adjacent cell is taken.
    pub fn greedy_action(&self, leader: UnitId) -> PlayerAction {
        let Ok(summoner) = self.summoner(leader) else {
            return PlayerAction::EndTurn;
        };
        let Some((school, skill)) = summoner.preferred_skill(&self.schools) else {
            return PlayerAction::AccumulateEnergy;
        };
        match self.free_cell_near(summoner.position, LEADER_MOVE_RADIUS) {
            Some(pos) => PlayerAction::Summon {
                school,
                skill,
                x: pos.x,
                y: pos.y,
            },
            None => PlayerAction::EndTurn,
        }
    }

    /// Collect the XP pool, then act once
    pub(crate) fn leader_turn(
        &mut self,
        leader: UnitId,
        side: Side,
        selector: &mut dyn ActionSelector,
    ) -> Result<()> {
        let xp = self.take_pending_xp();
        if xp > 0.0 {
            self.summoner_mut(leader)?.collect_xp(xp);
            tracing::debug!("{} leader collected {} XP", side, xp);
        }

        match side {
            Side::Player => self.player_leader_turn(leader, selector),
            Side::Enemy => {
                let action = self.greedy_action(leader);
                if let Err(e) = self.apply_action(leader, &action) {
                    tracing::warn!("Enemy leader action {:?} failed: {}", action, e);
                }
                Ok(())
            }
        }
    }

    fn player_leader_turn(&mut self, leader: UnitId, selector: &mut dyn ActionSelector) -> Result<()> {
        loop {
            let action = selector.select(self, leader);
            if action == PlayerAction::EndTurn {
                return Ok(());
            }
            match self.apply_action(leader, &action) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!("Player action {:?} rejected: {}", action, e);
                    selector.rejected(&action, &e);
                }
            }
        }
    }
}
