//! Single-use area-damage troop
//!
//! On its turn it hits every living unit of the opposing roster for its flat
//! damage, then destroys itself. The hits are independent per-unit HP
//! reductions, so the roster is split into disjoint contiguous shards and
//! processed in parallel.

use rayon::prelude::*;

use crate::units::troop::Troop;
use crate::units::Unit;

#[derive(Debug, Clone, PartialEq)]
pub struct AreaTroop {
    pub troop: Troop,
}

impl AreaTroop {
    pub fn new(troop: Troop) -> Self {
        Self { troop }
    }
}

/// Number of shards for a fan-out: hardware parallelism, or `fallback` if unknown
pub fn shard_count(fallback: usize) -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(fallback)
        .max(1)
}

/// Hit every living target for `damage`, ignoring school dominance
///
/// Each shard only touches its own units. Returns once every shard is done.
/// The caller must not insert or remove roster entries while this runs,
/// which the `&mut [Unit]` borrow enforces.
pub fn damage_all(targets: &mut [Unit], damage: f64, shards: usize) -> usize {
    if targets.is_empty() {
        return 0;
    }
    let chunk_len = targets.len().div_ceil(shards.max(1));

    targets
        .par_chunks_mut(chunk_len)
        .map(|shard| {
            let mut hit = 0;
            for unit in shard.iter_mut().filter(|u| u.is_alive()) {
                unit.take_damage(damage);
                hit += 1;
            }
            hit
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::descriptor::fixtures::{calculus, commission};
    use crate::units::factory::{create_amoral_unit, create_moral_unit};

    #[test]
    fn test_every_living_target_takes_exact_damage() {
        let mut targets: Vec<Unit> = (0..100).map(|_| create_amoral_unit(&calculus())).collect();
        let hit = damage_all(&mut targets, 2.0, 7);
        assert_eq!(hit, 100);
        assert!(targets.iter().all(|u| u.current_hp() == 6.0));
    }

    #[test]
    fn test_dead_targets_are_skipped() {
        let mut targets = vec![create_amoral_unit(&calculus()), create_moral_unit(&commission())];
        targets[0].death();
        let hit = damage_all(&mut targets, 1.5, 12);
        assert_eq!(hit, 1);
        assert_eq!(targets[0].current_hp(), 0.0);
        assert_eq!(targets[1].current_hp(), 6.5);
    }

    #[test]
    fn test_more_shards_than_targets() {
        let mut targets = vec![create_amoral_unit(&calculus())];
        assert_eq!(damage_all(&mut targets, 1.0, 64), 1);
        assert_eq!(damage_all(&mut [], 1.0, 4), 0);
    }

    #[test]
    fn test_shard_count_is_positive() {
        assert!(shard_count(0) >= 1);
        assert!(shard_count(12) >= 1);
    }
}
