//! Data-driven game balance
//!
//! Every constant the simulation consumes lives here. Defaults reproduce the
//! shipped game; a JSON file can override any subset of fields.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::entity::{CharacterKind, EnemyKind};
use crate::sim::inventory::WeaponKind;
use crate::sim::weapon::{Delivery, WeaponStats};

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// One scheduled wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// Seconds since the run started
    pub start_time: f32,
    /// Regular enemies spawned over the ramp
    pub enemy_count: u32,
    /// Mini-bosses spawned over the ramp
    pub elite_count: u32,
}

impl Wave {
    pub const fn new(start_time: f32, enemy_count: u32, elite_count: u32) -> Self {
        Self {
            start_time,
            enemy_count,
            elite_count,
        }
    }
}

/// Per enemy kind stat preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub speed: f32,
    pub max_health: f32,
    pub contact_damage: f32,
    /// Seconds between contact hits from the same enemy
    pub contact_cooldown: f32,
}

impl EnemyStats {
    pub fn preset(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Minion => Self {
                speed: 140.0,
                max_health: 2.0,
                contact_damage: 1.0,
                contact_cooldown: 0.7,
            },
            EnemyKind::AttackRobot => Self {
                speed: 90.0,
                max_health: 2.0,
                contact_damage: 1.0,
                contact_cooldown: 0.7,
            },
            EnemyKind::Starficer | EnemyKind::Illuminawty | EnemyKind::RobotBoss => Self {
                speed: 150.0,
                max_health: 50.0,
                contact_damage: 10.0,
                contact_cooldown: 0.5,
            },
        }
    }
}

/// Per playable character stat preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub radius: f32,
    pub speed: f32,
    pub max_health: f32,
    pub starting_weapon: Option<WeaponKind>,
}

impl CharacterStats {
    pub fn preset(kind: CharacterKind) -> Self {
        let starting_weapon = match kind {
            CharacterKind::CircleNinja => None,
            CharacterKind::Ninjircle => Some(WeaponKind::NinjaStars),
            CharacterKind::TriangleWizard => Some(WeaponKind::WizardConfetti),
            CharacterKind::Sqwerewolf => Some(WeaponKind::SquirrelBurst),
        };
        Self {
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            max_health: PLAYER_MAX_HEALTH,
            starting_weapon,
        }
    }
}

/// Manual (click) attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackStats {
    pub cooldown: f32,
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub radius: f32,
}

impl Default for AttackStats {
    fn default() -> Self {
        Self {
            cooldown: ATTACK_COOLDOWN,
            speed: ATTACK_SPEED,
            damage: ATTACK_DAMAGE,
            lifetime: ATTACK_LIFETIME,
            radius: ATTACK_RADIUS,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_w: f32,
    pub world_h: f32,
    /// Viewport size (spawn clearance and camera)
    pub screen_w: f32,
    pub screen_h: f32,
    pub cell_size: f32,

    // === Steering ===
    pub avoid_radius: f32,
    pub avoid_strength: f32,
    /// Escape angles in tie-break order (degrees)
    pub steer_angles: Vec<f32>,

    // === Spawning ===
    pub spawn_ramp: f32,
    pub spawn_attempts: u32,
    pub waves: Vec<Wave>,
    /// Kinds drawn for regular spawns
    pub regular_kinds: Vec<EnemyKind>,
    /// Kinds drawn for elite spawns
    pub elite_kinds: Vec<EnemyKind>,

    // === Stat tables ===
    pub weapons: BTreeMap<WeaponKind, WeaponStats>,
    pub enemies: BTreeMap<EnemyKind, EnemyStats>,
    pub characters: BTreeMap<CharacterKind, CharacterStats>,
    pub attack: AttackStats,

    // === World generation ===
    pub tile_size: f32,
    pub tree_density: f32,
    pub bush_density: f32,
    pub xp_density: f32,
    pub money_density: f32,
    pub pie_density: f32,
    /// Chance per tile of a ground item
    pub item_density: f32,

    // === Pickups ===
    pub pickup_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_w: WORLD_W,
            world_h: WORLD_H,
            screen_w: SCREEN_W,
            screen_h: SCREEN_H,
            cell_size: CELL_SIZE,

            avoid_radius: AVOID_RADIUS,
            avoid_strength: AVOID_STRENGTH,
            steer_angles: STEER_ANGLES.to_vec(),

            spawn_ramp: SPAWN_RAMP,
            spawn_attempts: SPAWN_ATTEMPTS,
            waves: vec![
                Wave::new(0.0, 30, 0),
                Wave::new(30.0, 50, 1),
                Wave::new(60.0, 80, 2),
                Wave::new(100.0, 120, 3),
            ],
            regular_kinds: vec![EnemyKind::Minion, EnemyKind::AttackRobot],
            elite_kinds: vec![
                EnemyKind::Starficer,
                EnemyKind::Illuminawty,
                EnemyKind::RobotBoss,
            ],

            weapons: WeaponKind::ALL
                .iter()
                .map(|&k| (k, WeaponStats::preset(k)))
                .collect(),
            enemies: EnemyKind::ALL
                .iter()
                .map(|&k| (k, EnemyStats::preset(k)))
                .collect(),
            characters: CharacterKind::ALL
                .iter()
                .map(|&k| (k, CharacterStats::preset(k)))
                .collect(),
            attack: AttackStats::default(),

            tile_size: TILE_SIZE,
            tree_density: TREE_DENSITY,
            bush_density: BUSH_DENSITY,
            xp_density: XP_DENSITY,
            money_density: MONEY_DENSITY,
            pie_density: PIE_DENSITY,
            item_density: ITEM_DENSITY,

            pickup_radius: PICKUP_RADIUS,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.world_w <= 0.0 || self.world_h <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "world size must be positive, got {}x{}",
                self.world_w, self.world_h
            )));
        }
        if self.cell_size <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.spawn_ramp <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "spawn_ramp must be positive, got {}",
                self.spawn_ramp
            )));
        }
        if self.tile_size <= 0.0 {
            return Err(TuningError::Invalid(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        if self
            .waves
            .windows(2)
            .any(|w| w[1].start_time < w[0].start_time)
        {
            return Err(TuningError::Invalid(
                "waves must be sorted by start_time".to_string(),
            ));
        }
        Ok(())
    }

    /// Minimum spawn distance from the player: one screen diagonal
    pub fn spawn_clearance(&self) -> f32 {
        (self.screen_w * self.screen_w + self.screen_h * self.screen_h).sqrt()
    }

    pub fn weapon(&self, kind: WeaponKind) -> WeaponStats {
        self.weapons
            .get(&kind)
            .copied()
            .unwrap_or_else(|| WeaponStats::preset(kind))
    }

    pub fn enemy(&self, kind: EnemyKind) -> EnemyStats {
        self.enemies
            .get(&kind)
            .copied()
            .unwrap_or_else(|| EnemyStats::preset(kind))
    }

    pub fn character(&self, kind: CharacterKind) -> CharacterStats {
        self.characters
            .get(&kind)
            .copied()
            .unwrap_or_else(|| CharacterStats::preset(kind))
    }

    /// Whether a weapon fires orbiting objects rather than projectiles
    pub fn is_orbit_weapon(&self, kind: WeaponKind) -> bool {
        matches!(self.weapon(kind).delivery, Delivery::Orbit { .. })
    }
}
