//! Per-frame simulation tick
//!
//! Order: spawner, player movement and pickups, weapon fire and updates,
//! combat resolution, enemy steering, then removal of dead entities.

use glam::Vec2;

use super::collision::{Placed, overlap};
use super::combat;
use super::entity::PickupKind;
use super::grid::GridEntry;
use super::state::{GameEvent, GamePhase, GameState};
use super::steering::plan_enemy_move;
use super::weapon::Shot;
use crate::consts::PIE_HEAL;

/// Input intent for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (any length; zero = stand still)
    pub move_dir: Vec2,
    /// Manual attack trigger
    pub fire: bool,
    /// Aim for the manual attack (falls back to the last aim)
    pub fire_dir: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time += dt;

    run_spawner(state);
    move_player(state, input.move_dir, dt);
    collect_pickups(state);
    fire_weapons(state, input, dt);

    let anchor = state.player.pos;
    for projectile in &mut state.projectiles {
        projectile.update(dt);
    }
    for weapon in &mut state.radius_weapons {
        weapon.update(dt, anchor);
    }

    combat::resolve_projectiles(&mut state.projectiles, &mut state.enemies, &mut state.events);
    combat::resolve_radius_weapons(
        &mut state.radius_weapons,
        &mut state.enemies,
        &mut state.events,
    );
    if combat::resolve_contact(
        &mut state.enemies,
        &mut state.player,
        state.time,
        &mut state.events,
    ) {
        log::info!("Player died at {:.1}s", state.time);
        state.phase = GamePhase::GameOver;
    }

    steer_enemies(state, dt);

    state.enemies.retain(|e| !e.is_dead());
    state.projectiles.retain(|p| !p.dead);
    state.radius_weapons.retain(|w| !w.dead);
}

fn run_spawner(state: &mut GameState) {
    let batch = state.spawner.update(
        state.time,
        state.player.pos,
        &state.tuning,
        &mut state.rng,
    );
    if let Some(index) = batch.wave_started {
        state.events.push(GameEvent::WaveStarted { index });
    }
    for req in batch.spawns {
        state.spawn_enemy(req.kind, req.pos);
    }
}

/// Direct movement; a blocked step is rejected outright
fn move_player(state: &mut GameState, move_dir: Vec2, dt: f32) {
    let player = &state.player;
    if player.is_dead() {
        return;
    }
    let dir = move_dir.normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }

    let bounds = Vec2::new(state.tuning.world_w, state.tuning.world_h);
    let target = (player.pos + dir * player.speed * dt).clamp(Vec2::ZERO, bounds);
    let blocked = state
        .grid
        .neighborhood(target, 1)
        .filter_map(|entry| match entry {
            GridEntry::Obstacle(i) => state.obstacles.get(*i),
            GridEntry::Pickup(_) => None,
        })
        .filter(|o| o.kind.blocks_movers())
        .any(|o| {
            let (obstacle_part, player_part) = o.kind.player_rule();
            overlap(
                Placed {
                    shape: &o.shape,
                    pos: o.pos,
                    part: obstacle_part,
                },
                Placed {
                    shape: &player.shape,
                    pos: target,
                    part: player_part,
                },
            )
            .blocks()
        });

    let player = &mut state.player;
    if dir.x != 0.0 {
        player.facing_left = dir.x < 0.0;
    }
    if !blocked {
        player.pos = target;
    }
}

fn collect_pickups(state: &mut GameState) {
    if state.player.is_dead() {
        return;
    }
    let player_pos = state.player.pos;
    let radius = state.tuning.pickup_radius;
    let nearby: Vec<usize> = state
        .grid
        .neighborhood(player_pos, 1)
        .filter_map(|entry| match entry {
            GridEntry::Pickup(i) => Some(*i),
            GridEntry::Obstacle(_) => None,
        })
        .collect();

    for i in nearby {
        let Some(pickup) = state.pickups.get_mut(i) else {
            continue;
        };
        if pickup.picked || !pickup.in_reach(player_pos, radius) {
            continue;
        }
        let player = &mut state.player;
        let collected = match &pickup.kind {
            PickupKind::Xp(value) => {
                player.xp += value;
                true
            }
            PickupKind::Money(amount) => {
                player.money += amount;
                true
            }
            PickupKind::Pie => {
                player.health.heal(PIE_HEAL);
                true
            }
            PickupKind::Ground(item) => match player.equip(item.clone(), &state.tuning) {
                Ok(()) => true,
                Err(err) => {
                    log::debug!("left {} on the ground: {err}", item.name);
                    false
                }
            },
        };
        if collected {
            pickup.picked = true;
            state.events.push(GameEvent::PickupCollected {
                kind: pickup.kind.clone(),
                pos: pickup.pos,
            });
        }
    }
}

fn fire_weapons(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    if player.is_dead() {
        return;
    }

    player.update_attack_timer(dt);
    if input.fire && player.try_attack(state.tuning.attack.cooldown) {
        let aim = input.fire_dir.unwrap_or(Vec2::ZERO);
        state
            .projectiles
            .push(player.fire_projectile(aim, &state.tuning));
        state.events.push(GameEvent::WeaponFired { weapon: None });
    }

    let origin = player.pos;
    let fallback_dir = player.last_attack_direction;
    for weapon in &mut player.active_weapons {
        weapon.update(dt);
        let Some(shot) = weapon.try_fire(origin, fallback_dir, &state.enemies) else {
            continue;
        };
        match shot {
            Shot::Projectile(p) => state.projectiles.push(p),
            Shot::Radius(r) => state.radius_weapons.push(r),
        }
        state.events.push(GameEvent::WeaponFired {
            weapon: Some(weapon.kind),
        });
    }
}

/// Enemies move one at a time, each seeing the others' updated positions
fn steer_enemies(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    for i in 0..state.enemies.len() {
        let step = plan_enemy_move(
            i,
            &state.enemies,
            player_pos,
            &state.obstacles,
            &state.grid,
            &state.tuning,
            dt,
        );
        state.enemies[i].pos = step.pos;
    }
}
