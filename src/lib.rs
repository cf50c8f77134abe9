//! Paper Trail - A top-down wave survival game core
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (collision, steering, combat, spawning)
//! - `renderer`: Render collaborator surface (sprite instances, camera, draw order)
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Default tuning constants (overridable through [`Tuning`])
pub mod consts {
    /// Screen size used for spawn distance and the camera viewport
    pub const SCREEN_W: f32 = 1920.0;
    pub const SCREEN_H: f32 = 1080.0;

    /// World is three screens in each direction
    pub const WORLD_W: f32 = SCREEN_W * 3.0;
    pub const WORLD_H: f32 = SCREEN_H * 3.0;

    /// Spatial grid cell edge (world units)
    pub const CELL_SIZE: f32 = 256.0;

    /// Enemy steering
    pub const AVOID_RADIUS: f32 = 80.0;
    pub const AVOID_STRENGTH: f32 = 250.0;
    /// Escape angles tried in order once the tangent slide fails (degrees)
    pub const STEER_ANGLES: [f32; 8] = [15.0, -15.0, 30.0, -30.0, 60.0, -60.0, 90.0, -90.0];

    /// Waves ramp their spawns in over this many seconds
    pub const SPAWN_RAMP: f32 = 10.0;
    /// Placement attempts per spawn before giving up for this tick
    pub const SPAWN_ATTEMPTS: u32 = 50;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;

    /// Manual attack (click to fire)
    pub const ATTACK_COOLDOWN: f32 = 0.2;
    pub const ATTACK_SPEED: f32 = 500.0;
    pub const ATTACK_DAMAGE: f32 = 10.0;
    pub const ATTACK_LIFETIME: f32 = 5.0;
    pub const ATTACK_RADIUS: f32 = 8.0;

    /// Placeholder sprite diameter when a sprite cannot be resolved
    pub const PLACEHOLDER_DIAMETER: u32 = 32;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 30.0;
    pub const PIE_HEAL: f32 = 10.0;

    /// Speed multiplier per equipped Quicks (stacks)
    pub const QUICKS_MULTIPLIER: f32 = 1.2;

    /// Inventory slot counts
    pub const WEAPON_SLOTS: usize = 5;
    pub const EQUIPMENT_SLOTS: usize = 5;
    pub const RELIC_SLOTS: usize = 3;

    /// World generation
    pub const TILE_SIZE: f32 = 512.0;
    pub const TREE_DENSITY: f32 = 0.20;
    pub const BUSH_DENSITY: f32 = 0.15;
    pub const TILE_INSET: f32 = 10.0;
    /// Per-tile pickup chances
    pub const XP_DENSITY: f32 = 0.10;
    pub const MONEY_DENSITY: f32 = 0.05;
    pub const PIE_DENSITY: f32 = 0.03;
    pub const ITEM_DENSITY: f32 = 0.02;

    /// Static content within this many cells of the camera is drawn
    pub const DRAW_CELL_RADIUS: i32 = 5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}
