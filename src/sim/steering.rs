//! Enemy steering: seek the player, repel from nearby scenery, and slide around
//! anything the step would collide with.
//!
//! Candidate order when the primary step is blocked:
//! 1. Tangent slide along the average scenery offset rotated 90° (+ then −).
//!    Skipped when only other enemies block the step.
//! 2. Seek direction rotated by each configured angle, in order
//! 3. Stay put

use glam::Vec2;

use super::collision::{Placed, overlap};
use super::entity::{Enemy, Obstacle};
use super::grid::{GridEntry, SpatialGrid};
use crate::{Tuning, rotate_deg};

/// Something a candidate step would collide with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blocker {
    Obstacle(Vec2),
    Enemy(Vec2),
}

/// Which candidate the resolver committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepChoice {
    Primary,
    /// Slide along the tangent; +1.0 or −1.0
    Tangent(f32),
    /// Seek direction rotated by this many degrees
    Angle(f32),
    Stuck,
}

/// Outcome of one steering step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub choice: StepChoice,
    pub pos: Vec2,
}

/// Pick the first unblocked candidate step.
///
/// `blocked_by(candidate)` returns everything that would block a mover
/// standing at `candidate` (empty when clear). `primary` is the full
/// displacement; fallbacks use the same length.
pub fn resolve_step(
    origin: Vec2,
    primary: Vec2,
    seek_dir: Vec2,
    angles: &[f32],
    mut blocked_by: impl FnMut(Vec2) -> Vec<Blocker>,
) -> Step {
    let step_len = primary.length();
    if step_len <= 0.0 {
        return Step {
            choice: StepChoice::Stuck,
            pos: origin,
        };
    }

    let candidate = origin + primary;
    let blockers = blocked_by(candidate);
    if blockers.is_empty() {
        return Step {
            choice: StepChoice::Primary,
            pos: candidate,
        };
    }

    // Average offset from blocking scenery toward us, turned sideways
    let scenery: Vec<Vec2> = blockers
        .iter()
        .filter_map(|b| match b {
            Blocker::Obstacle(pos) => Some(*pos),
            Blocker::Enemy(_) => None,
        })
        .collect();
    let away = if scenery.is_empty() {
        Vec2::ZERO
    } else {
        scenery.iter().map(|p| origin - *p).sum::<Vec2>() / scenery.len() as f32
    };
    if let Some(away) = away.try_normalize() {
        let tangent = away.perp();
        for sign in [1.0f32, -1.0] {
            let candidate = origin + tangent * sign * step_len;
            if blocked_by(candidate).is_empty() {
                return Step {
                    choice: StepChoice::Tangent(sign),
                    pos: candidate,
                };
            }
        }
    }

    let base = seek_dir
        .try_normalize()
        .unwrap_or_else(|| primary / step_len);
    for &deg in angles {
        let candidate = origin + rotate_deg(base, deg) * step_len;
        if blocked_by(candidate).is_empty() {
            return Step {
                choice: StepChoice::Angle(deg),
                pos: candidate,
            };
        }
    }

    Step {
        choice: StepChoice::Stuck,
        pos: origin,
    }
}

/// Repulsion from scenery within `tuning.avoid_radius`
pub fn avoidance(pos: Vec2, nearby: &[&Obstacle], tuning: &Tuning) -> Vec2 {
    let radius = tuning.avoid_radius;
    nearby
        .iter()
        .filter_map(|obstacle| {
            let offset = pos - obstacle.pos;
            let d = offset.length();
            if d <= 0.0 || d > radius {
                return None;
            }
            Some(offset / d * (tuning.avoid_strength * (radius - d) / radius))
        })
        .sum()
}

/// Scenery sharing the enemy's 3×3 cell neighbourhood
fn nearby_obstacles<'a>(
    pos: Vec2,
    obstacles: &'a [Obstacle],
    grid: &SpatialGrid,
) -> Vec<&'a Obstacle> {
    grid.neighborhood(pos, 1)
        .filter_map(|entry| match entry {
            GridEntry::Obstacle(i) => obstacles.get(*i),
            GridEntry::Pickup(_) => None,
        })
        .filter(|o| o.kind.blocks_movers())
        .collect()
}

/// Everything blocking `mover` if it stood at `candidate`.
///
/// Scenery is tested base against base. Other live enemies first pass a
/// squared-distance check against their mean sprite width, then a full mask
/// test. That prefilter is approximate for non-square sprites.
fn blockers_at(
    candidate: Vec2,
    mover: usize,
    enemies: &[Enemy],
    scenery: &[&Obstacle],
) -> Vec<Blocker> {
    let me = &enemies[mover];
    let mut hits: Vec<Blocker> = scenery
        .iter()
        .filter(|o| {
            overlap(
                Placed::bottom_third(&o.shape, o.pos),
                Placed::bottom_third(&me.shape, candidate),
            )
            .blocks()
        })
        .map(|o| Blocker::Obstacle(o.pos))
        .collect();

    let my_w = me.shape.width() as f32;
    for (j, other) in enemies.iter().enumerate() {
        if j == mover || other.is_dead() {
            continue;
        }
        let reach = (my_w + other.shape.width() as f32) / 2.0;
        if other.pos.distance_squared(candidate) > reach * reach {
            continue;
        }
        if overlap(
            Placed::full(&me.shape, candidate),
            Placed::full(&other.shape, other.pos),
        )
        .blocks()
        {
            hits.push(Blocker::Enemy(other.pos));
        }
    }
    hits
}

/// Steering step for `enemies[index]` this frame. Dead enemies never move.
pub fn plan_enemy_move(
    index: usize,
    enemies: &[Enemy],
    player_pos: Vec2,
    obstacles: &[Obstacle],
    grid: &SpatialGrid,
    tuning: &Tuning,
    dt: f32,
) -> Step {
    let Some(enemy) = enemies.get(index) else {
        return Step {
            choice: StepChoice::Stuck,
            pos: Vec2::ZERO,
        };
    };
    let stay = Step {
        choice: StepChoice::Stuck,
        pos: enemy.pos,
    };
    if enemy.is_dead() {
        return stay;
    }

    let seek_dir = (player_pos - enemy.pos).normalize_or_zero();
    let scenery = nearby_obstacles(enemy.pos, obstacles, grid);
    let steer = seek_dir * enemy.speed + avoidance(enemy.pos, &scenery, tuning);
    let Some(dir) = steer.try_normalize() else {
        return stay;
    };

    resolve_step(
        enemy.pos,
        dir * enemy.speed * dt,
        seek_dir,
        &tuning.steer_angles,
        |candidate| blockers_at(candidate, index, enemies, &scenery),
    )
}
