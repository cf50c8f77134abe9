//! Time-driven wave spawner
//!
//! Each wave ramps its regular and elite counts in linearly over `spawn_ramp`
//! seconds from its start time. Every tick spawns the difference between the
//! expected cumulative count and what has already been spawned.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::EnemyKind;
use crate::Tuning;
use crate::tuning::Wave;

/// One enemy the world should create this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: EnemyKind,
    pub pos: Vec2,
}

/// Spawns requested this tick plus wave bookkeeping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnBatch {
    pub spawns: Vec<SpawnRequest>,
    /// Index of a wave whose start time was reached this tick
    pub wave_started: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    wave_index: usize,
    started: bool,
    spawned_regular: u32,
    spawned_elite: u32,
}

/// Cumulative (regular, elite) count the wave should have reached at `time`
pub fn expected_counts(wave: &Wave, time: f32, ramp: f32) -> (u32, u32) {
    let progress = if ramp > 0.0 {
        ((time - wave.start_time) / ramp).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let scale = |count: u32| ((progress * count as f32).floor() as u32).min(count);
    (scale(wave.enemy_count), scale(wave.elite_count))
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn wave_index(&self) -> usize {
        self.wave_index
    }

    /// Enemies spawned so far in the current wave (regular, elite)
    #[inline]
    pub fn spawned(&self) -> (u32, u32) {
        (self.spawned_regular, self.spawned_elite)
    }

    /// All scheduled waves have completed
    pub fn finished(&self, tuning: &Tuning) -> bool {
        self.wave_index >= tuning.waves.len()
    }

    /// Advance the schedule to `time` and produce this tick's spawns
    pub fn update(
        &mut self,
        time: f32,
        player_pos: Vec2,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) -> SpawnBatch {
        let mut batch = SpawnBatch::default();
        let Some(wave) = tuning.waves.get(self.wave_index).copied() else {
            return batch;
        };
        if time < wave.start_time {
            return batch;
        }
        if !self.started {
            self.started = true;
            batch.wave_started = Some(self.wave_index);
            log::info!(
                "Wave {} started: {} enemies, {} elites",
                self.wave_index + 1,
                wave.enemy_count,
                wave.elite_count
            );
        }

        let (want_regular, want_elite) = expected_counts(&wave, time, tuning.spawn_ramp);
        for _ in self.spawned_regular..want_regular {
            let Some(req) = spawn_request(&tuning.regular_kinds, player_pos, tuning, rng) else {
                break;
            };
            batch.spawns.push(req);
            self.spawned_regular += 1;
        }
        for _ in self.spawned_elite..want_elite {
            let Some(req) = spawn_request(&tuning.elite_kinds, player_pos, tuning, rng) else {
                break;
            };
            batch.spawns.push(req);
            self.spawned_elite += 1;
        }

        let complete = self.spawned_regular >= wave.enemy_count
            && self.spawned_elite >= wave.elite_count
            && time >= wave.start_time + tuning.spawn_ramp;
        if complete {
            log::debug!("Wave {} complete", self.wave_index + 1);
            self.wave_index += 1;
            self.started = false;
            self.spawned_regular = 0;
            self.spawned_elite = 0;
        }
        batch
    }
}

fn spawn_request(
    kinds: &[EnemyKind],
    player_pos: Vec2,
    tuning: &Tuning,
    rng: &mut Pcg32,
) -> Option<SpawnRequest> {
    if kinds.is_empty() {
        log::debug!("no enemy kinds configured for spawn");
        return None;
    }
    let pos = sample_spawn_position(player_pos, tuning, rng)?;
    let kind = kinds[rng.random_range(0..kinds.len())];
    Some(SpawnRequest { kind, pos })
}

/// Rejection-sample a point at least one screen diagonal from the player.
/// Gives up after `spawn_attempts` tries.
pub fn sample_spawn_position(player_pos: Vec2, tuning: &Tuning, rng: &mut Pcg32) -> Option<Vec2> {
    let clearance = tuning.spawn_clearance();
    for _ in 0..tuning.spawn_attempts {
        let candidate = Vec2::new(
            rng.random_range(0.0..tuning.world_w),
            rng.random_range(0.0..tuning.world_h),
        );
        if candidate.distance(player_pos) >= clearance {
            return Some(candidate);
        }
    }
    log::debug!("spawn placement exhausted after {} attempts", tuning.spawn_attempts);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn small_screen(waves: Vec<Wave>) -> Tuning {
        Tuning {
            screen_w: 60.0,
            screen_h: 80.0,
            waves,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_expected_counts_ramp() {
        let wave = Wave::new(10.0, 50, 4);
        assert_eq!(expected_counts(&wave, 5.0, 10.0), (0, 0));
        assert_eq!(expected_counts(&wave, 15.0, 10.0), (25, 2));
        assert_eq!(expected_counts(&wave, 30.0, 10.0), (50, 4));
    }

    #[test]
    fn test_half_ramp_spawns_half_the_wave() {
        let tuning = small_screen(vec![Wave::new(10.0, 50, 0)]);
        let mut spawner = Spawner::new();
        let mut rng = Pcg32::seed_from_u64(7);
        let player = Vec2::new(tuning.world_w / 2.0, tuning.world_h / 2.0);

        let mut total = 0usize;
        let dt = 1.0 / 60.0;
        let mut t = 0.0f32;
        while t < 15.0 - dt / 2.0 {
            t += dt;
            total += spawner.update(t, player, &tuning, &mut rng).spawns.len();
        }
        assert!((24..=26).contains(&total), "spawned {total}");
    }

    #[test]
    fn test_spawns_respect_clearance() {
        let tuning = Tuning {
            waves: vec![Wave::new(0.0, 40, 2)],
            ..Tuning::default()
        };
        let mut spawner = Spawner::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let player = Vec2::new(100.0, 100.0);
        let batch = spawner.update(20.0, player, &tuning, &mut rng);

        assert_eq!(batch.wave_started, Some(0));
        for s in &batch.spawns {
            assert!(s.pos.distance(player) >= tuning.spawn_clearance());
            assert!(s.pos.x >= 0.0 && s.pos.x < tuning.world_w);
        }
        let elites = batch.spawns.iter().filter(|s| s.kind.is_elite()).count();
        assert_eq!(elites, 2);
        assert_eq!(batch.spawns.len(), 42);
    }

    #[test]
    fn test_exhaustion_skips_without_counting() {
        // Screen diagonal larger than the world: no valid point exists
        let tuning = Tuning {
            world_w: 100.0,
            world_h: 100.0,
            waves: vec![Wave::new(0.0, 5, 0)],
            ..Tuning::default()
        };
        let mut spawner = Spawner::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let batch = spawner.update(20.0, Vec2::new(50.0, 50.0), &tuning, &mut rng);
        assert!(batch.spawns.is_empty());
        assert_eq!(spawner.spawned(), (0, 0));
        assert_eq!(spawner.wave_index(), 0);
    }

    #[test]
    fn test_waves_advance_in_order() {
        let tuning = small_screen(vec![Wave::new(0.0, 3, 0), Wave::new(5.0, 2, 1)]);
        let mut spawner = Spawner::new();
        let mut rng = Pcg32::seed_from_u64(11);
        let player = Vec2::ZERO;

        let first = spawner.update(10.0, player, &tuning, &mut rng);
        assert_eq!(first.spawns.len(), 3);
        assert_eq!(spawner.wave_index(), 1);

        let second = spawner.update(20.0, player, &tuning, &mut rng);
        assert_eq!(second.wave_started, Some(1));
        assert_eq!(second.spawns.len(), 3);
        assert!(spawner.finished(&tuning));

        assert!(spawner.update(30.0, player, &tuning, &mut rng).spawns.is_empty());
    }
}
