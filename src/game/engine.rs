//! The match orchestrator
//!
//! Owns both rosters, the field, the schools table and the match RNG.
//! Every mutation of unit position or HP that crosses unit boundaries goes
//! through here so occupancy and ordering invariants hold.

use ordered_float::OrderedFloat;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{DuelError, Result};
use crate::core::types::{GridPos, Side, Tick, UnitId};
use crate::game::roster::Roster;
use crate::game::state::MatchState;
use crate::knowledge::SchoolsTable;
use crate::spatial::Field;
use crate::units::{create_summoner, Summoner, SummonerDescriptor, Unit};

#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) player: Roster,
    pub(crate) enemy: Roster,
    pub(crate) field: Field,
    pub(crate) schools: SchoolsTable,
    pub(crate) config: SimulationConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) pending_xp: f64,
    pub(crate) state: MatchState,
    pub(crate) tick: Tick,
}

impl Game {
    /// Empty match on the given field; no units deployed yet
    pub fn new(field: Field, schools: SchoolsTable, config: SimulationConfig) -> Self {
        Self {
            player: Roster::new(Side::Player),
            enemy: Roster::new(Side::Enemy),
            field,
            schools,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            pending_xp: 0.0,
            state: MatchState::Running,
            tick: 0,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn schools(&self) -> &SchoolsTable {
        &self.schools
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn pending_xp(&self) -> f64 {
        self.pending_xp
    }

    pub fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub(crate) fn roster_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Side and roster index of a unit
    pub fn locate(&self, id: UnitId) -> Option<(Side, usize)> {
        self.player
            .index_of(id)
            .map(|i| (Side::Player, i))
            .or_else(|| self.enemy.index_of(id).map(|i| (Side::Enemy, i)))
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit> {
        self.player
            .get(id)
            .or_else(|| self.enemy.get(id))
            .ok_or(DuelError::UnitNotFound(id))
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit> {
        match self.locate(id) {
            Some((side, index)) => self
                .roster_mut(side)
                .at_mut(index)
                .ok_or(DuelError::UnitNotFound(id)),
            None => Err(DuelError::UnitNotFound(id)),
        }
    }

    pub fn summoner(&self, id: UnitId) -> Result<&Summoner> {
        self.unit(id)?.as_summoner().ok_or(DuelError::NotALeader(id))
    }

    pub fn summoner_mut(&mut self, id: UnitId) -> Result<&mut Summoner> {
        self.unit_mut(id)?
            .as_summoner_mut()
            .ok_or(DuelError::NotALeader(id))
    }

    /// The side's leader, if it is still on the field
    pub fn leader(&self, side: Side) -> Option<&Unit> {
        self.roster(side).leader()
    }

    /// Obstacle or a living unit of either side
    pub fn occupied(&self, pos: GridPos) -> bool {
        self.field.is_obstacle(pos) || self.find_unit_at(pos).is_some()
    }

    /// A unit could be placed here right now
    pub fn is_available(&self, pos: GridPos) -> bool {
        self.field.in_bounds(pos) && !self.occupied(pos)
    }

    /// Living unit of either side on the cell
    pub fn find_unit_at(&self, pos: GridPos) -> Option<&Unit> {
        self.player
            .living()
            .chain(self.enemy.living())
            .find(|u| u.position() == pos)
    }

    /// Living unit on the cell that fights against `side`
    pub fn find_enemy_at(&self, side: Side, pos: GridPos) -> Option<&Unit> {
        self.roster(side.opponent())
            .living()
            .find(|u| u.position() == pos)
    }

    /// Nearest living opposing unit by straight-line distance
    ///
    /// Ties go to the opposing unit that comes first in turn order.
    pub fn find_closest_enemy(&self, id: UnitId) -> Option<&Unit> {
        let (side, _) = self.locate(id)?;
        let origin = self.unit(id).ok()?.position();
        self.roster(side.opponent())
            .living()
            .min_by_key(|u| OrderedFloat(origin.distance(&u.position())))
    }

    /// First free cell around `center` within `radius` per axis
    ///
    /// Scans offsets (i, j) for i, j in 0..=radius, trying the cell ahead of
    /// `center` before the mirrored one behind it.
    pub fn free_cell_near(&self, center: GridPos, radius: i32) -> Option<GridPos> {
        for i in 0..=radius {
            for j in 0..=radius {
                if i == 0 && j == 0 {
                    continue;
                }
                for candidate in [center.offset(i, j), center.offset(-i, -j)] {
                    if self.is_available(candidate) {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }

    /// Place a unit on a free cell and slot it into its roster by initiative
    pub fn deploy_unit(&mut self, pos: GridPos, mut unit: Unit, side: Side) -> Result<UnitId> {
        if !self.is_available(pos) {
            return Err(DuelError::CellUnavailable { x: pos.x, y: pos.y });
        }
        unit.set_position(pos);
        let id = unit.id;
        tracing::debug!("Deployed {} for {} at {}", unit.name(), side, pos);
        self.roster_mut(side).insert_sorted(unit);
        Ok(id)
    }

    /// Build and deploy a leader from its template
    pub fn deploy_leader(&mut self, descriptor: &SummonerDescriptor, pos: GridPos) -> Result<UnitId> {
        self.deploy_unit(pos, create_summoner(descriptor), descriptor.team)
    }

    /// Start cell of a side's leader: `leader_offset` in from its own edge, middle row
    pub fn leader_start(&self, side: Side) -> GridPos {
        let width = self.field.width() as i32;
        let y = self.field.height() as i32 / 2;
        let x = match side {
            Side::Player => self.config.leader_offset,
            Side::Enemy => width - self.config.leader_offset,
        };
        self.field.clamp(GridPos::new(x, y))
    }

    /// Re-sort both rosters by initiative before the first tick
    pub fn game_start(&mut self) {
        self.player.sort_by_initiative();
        self.enemy.sort_by_initiative();
        tracing::info!(
            "Match started: {} player units, {} enemy units",
            self.player.len(),
            self.enemy.len()
        );
    }

    /// Move a unit, at most its step budget along each axis
    pub fn move_unit(&mut self, id: UnitId, target: GridPos) -> Result<()> {
        let unit = self.unit(id)?;
        let distance = unit.position().axis_distance(&target);
        let budget = unit.step_budget();
        if distance > budget {
            return Err(DuelError::SpeedExceeded { distance, budget });
        }
        if !self.is_available(target) {
            return Err(DuelError::CellUnavailable {
                x: target.x,
                y: target.y,
            });
        }
        self.unit_mut(id)?.set_position(target);
        Ok(())
    }

    /// One attack from `attacker` on an opposing `defender`; true on a kill
    pub fn strike(&mut self, attacker: UnitId, defender: UnitId) -> Result<bool> {
        let (attacker_side, attacker_index) =
            self.locate(attacker).ok_or(DuelError::UnitNotFound(attacker))?;
        let (defender_side, defender_index) =
            self.locate(defender).ok_or(DuelError::UnitNotFound(defender))?;
        if attacker_side == defender_side {
            return Err(DuelError::UnitNotFound(defender));
        }

        let schools = &self.schools;
        let (attacking, defending) = match attacker_side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        };
        let hitter = attacking
            .at_mut(attacker_index)
            .ok_or(DuelError::UnitNotFound(attacker))?;
        let target = defending
            .at_mut(defender_index)
            .ok_or(DuelError::UnitNotFound(defender))?;

        let killed = hitter.make_damage(schools, target);
        if killed {
            tracing::debug!("{} destroyed {}", hitter.name(), target.name());
        }
        Ok(killed)
    }

    /// Add XP to the shared pool collected by the next acting leader
    pub fn add_xp(&mut self, xp: f64) {
        self.pending_xp += xp;
    }

    /// Empty the pool, returning what it held
    pub fn take_pending_xp(&mut self) -> f64 {
        std::mem::take(&mut self.pending_xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::School;
    use crate::units::create_amoral_unit;
    use crate::units::descriptor::fixtures::{calculus, leader};

    fn empty_game() -> Game {
        let mut schools = SchoolsTable::new();
        schools.add_school(School::new("MSU"));
        Game::new(Field::new(10, 10), schools, SimulationConfig::default())
    }

    fn troop_with_initiative(initiative: f64) -> Unit {
        let mut descriptor = calculus();
        descriptor.initiative = initiative;
        create_amoral_unit(&descriptor)
    }

    #[test]
    fn test_deploy_rejects_unavailable_cells() {
        let mut game = empty_game();
        game.field.place_obstacle(GridPos::new(2, 2));
        assert!(game.deploy_unit(GridPos::new(1, 1), troop_with_initiative(1.0), Side::Player).is_ok());

        for pos in [GridPos::new(1, 1), GridPos::new(2, 2), GridPos::new(-1, 0), GridPos::new(10, 3)] {
            let result = game.deploy_unit(pos, troop_with_initiative(1.0), Side::Enemy);
            assert!(matches!(result, Err(DuelError::CellUnavailable { .. })));
        }
        assert_eq!(game.roster(Side::Enemy).len(), 0);
    }

    #[test]
    fn test_dead_units_do_not_occupy() {
        let mut game = empty_game();
        let id = game
            .deploy_unit(GridPos::new(3, 3), troop_with_initiative(1.0), Side::Player)
            .unwrap();
        assert!(game.occupied(GridPos::new(3, 3)));
        game.unit_mut(id).unwrap().death();
        assert!(!game.occupied(GridPos::new(3, 3)));
        assert!(game.is_available(GridPos::new(3, 3)));
    }

    #[test]
    fn test_out_of_order_deploys_sort_and_insert_first() {
        let mut game = empty_game();
        for (x, initiative) in [(0, 2.0), (1, 4.0), (2, 1.0), (3, 3.0)] {
            let mut unit = troop_with_initiative(initiative);
            unit.set_position(GridPos::new(x, 0));
            game.player.push(unit);
        }
        game.game_start();
        let order: Vec<f64> = game.roster(Side::Player).iter().map(|u| u.initiative()).collect();
        assert_eq!(order, vec![4.0, 3.0, 2.0, 1.0]);

        game.deploy_unit(GridPos::new(5, 5), troop_with_initiative(5.0), Side::Player)
            .unwrap();
        assert_eq!(game.roster(Side::Player).at(0).unwrap().initiative(), 5.0);
    }

    #[test]
    fn test_move_respects_budget_and_occupancy() {
        let mut game = empty_game();
        let leader_id = game
            .deploy_leader(&leader(Side::Player, 30.0, &[]), GridPos::new(0, 0))
            .unwrap();
        assert!(game.move_unit(leader_id, GridPos::new(1, 1)).is_ok());
        assert!(matches!(
            game.move_unit(leader_id, GridPos::new(3, 1)),
            Err(DuelError::SpeedExceeded { distance: 2, budget: 1 })
        ));

        game.deploy_unit(GridPos::new(2, 2), troop_with_initiative(1.0), Side::Enemy)
            .unwrap();
        assert!(matches!(
            game.move_unit(leader_id, GridPos::new(2, 2)),
            Err(DuelError::CellUnavailable { x: 2, y: 2 })
        ));
        assert_eq!(game.unit(leader_id).unwrap().position(), GridPos::new(1, 1));
    }

    #[test]
    fn test_closest_enemy_ignores_dead_and_friends() {
        let mut game = empty_game();
        let me = game
            .deploy_unit(GridPos::new(0, 0), troop_with_initiative(1.0), Side::Player)
            .unwrap();
        game.deploy_unit(GridPos::new(1, 0), troop_with_initiative(1.0), Side::Player)
            .unwrap();
        let near = game
            .deploy_unit(GridPos::new(2, 1), troop_with_initiative(1.0), Side::Enemy)
            .unwrap();
        let far = game
            .deploy_unit(GridPos::new(6, 6), troop_with_initiative(1.0), Side::Enemy)
            .unwrap();

        assert_eq!(game.find_closest_enemy(me).unwrap().id, near);
        game.unit_mut(near).unwrap().death();
        assert_eq!(game.find_closest_enemy(me).unwrap().id, far);
    }

    #[test]
    fn test_free_cell_near_tries_forward_then_back() {
        let mut game = empty_game();
        let center = GridPos::new(5, 5);
        assert_eq!(game.free_cell_near(center, 1), Some(GridPos::new(5, 6)));
        game.field.place_obstacle(GridPos::new(5, 6));
        assert_eq!(game.free_cell_near(center, 1), Some(GridPos::new(5, 4)));
        assert_eq!(game.free_cell_near(GridPos::new(0, 0), 0), None);
    }

    #[test]
    fn test_strike_between_sides() {
        let mut game = empty_game();
        let a = game
            .deploy_unit(GridPos::new(0, 0), troop_with_initiative(1.0), Side::Player)
            .unwrap();
        let b = game
            .deploy_unit(GridPos::new(1, 0), troop_with_initiative(1.0), Side::Enemy)
            .unwrap();
        let c = game
            .deploy_unit(GridPos::new(2, 0), troop_with_initiative(1.0), Side::Player)
            .unwrap();

        assert!(!game.strike(a, b).unwrap());
        assert_eq!(game.unit(b).unwrap().current_hp(), 6.0);
        assert!(game.strike(a, c).is_err());
    }

    #[test]
    fn test_leader_start_positions() {
        let game = Game::new(Field::new(40, 40), SchoolsTable::new(), SimulationConfig::default());
        assert_eq!(game.leader_start(Side::Player), GridPos::new(10, 20));
        assert_eq!(game.leader_start(Side::Enemy), GridPos::new(30, 20));
    }

    #[test]
    fn test_xp_pool_is_taken_once() {
        let mut game = empty_game();
        game.add_xp(2.0);
        game.add_xp(3.0);
        assert_eq!(game.take_pending_xp(), 5.0);
        assert_eq!(game.take_pending_xp(), 0.0);
    }
}
