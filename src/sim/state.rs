//! Game state and world ownership
//!
//! The world owns every entity in flat lists. Static content is addressed by
//! index from the spatial grid; movers carry stable ids.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{
    CharacterKind, EnemyKind, Enemy, EntityId, Obstacle, Pickup, PickupKind, Player,
};
use super::grid::{GridEntry, SpatialGrid};
use super::inventory::WeaponKind;
use super::mask::{PlaceholderShapes, ShapeProvider};
use super::spawner::Spawner;
use super::weapon::{Projectile, RadiusWeapon};
use super::worldgen::{Placement, generate_world};
use crate::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused; nothing advances
    Paused,
    /// Player died
    GameOver,
}

/// Things that happened during the last tick, for UI/audio collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemySpawned { id: EntityId, kind: EnemyKind },
    EnemyKilled { id: EntityId, kind: EnemyKind, pos: Vec2 },
    PlayerDamaged { by: EntityId, amount: f32 },
    PlayerDied,
    WaveStarted { index: usize },
    PickupCollected { kind: PickupKind, pos: Vec2 },
    /// `None` for the manual attack
    WeaponFired { weapon: Option<WeaponKind> },
}

/// Complete world state
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Seconds of unpaused play
    pub time: f32,
    pub phase: GamePhase,
    pub player: Player,
    /// Live enemies (dead ones are dropped at the end of each tick)
    pub enemies: Vec<Enemy>,
    /// Immutable scenery, indexed by the grid
    pub obstacles: Vec<Obstacle>,
    /// Indexed by the grid; collected pickups stay flagged, never removed
    pub pickups: Vec<Pickup>,
    pub grid: SpatialGrid,
    pub projectiles: Vec<Projectile>,
    pub radius_weapons: Vec<RadiusWeapon>,
    pub spawner: Spawner,
    pub rng: Pcg32,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    shapes: Box<dyn ShapeProvider>,
    next_id: EntityId,
}

impl GameState {
    /// Generate a world for `seed` and place the player at its centre
    pub fn new(
        seed: u64,
        character: CharacterKind,
        tuning: Tuning,
        shapes: Box<dyn ShapeProvider>,
    ) -> Self {
        let center = Vec2::new(tuning.world_w / 2.0, tuning.world_h / 2.0);
        let player = Player::new(character, center, &tuning, shapes.as_ref());
        let grid = SpatialGrid::new(tuning.world_w, tuning.world_h, tuning.cell_size);

        let mut state = Self {
            seed,
            time: 0.0,
            phase: GamePhase::Playing,
            player,
            enemies: Vec::new(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            grid,
            projectiles: Vec::new(),
            radius_weapons: Vec::new(),
            spawner: Spawner::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            shapes,
            next_id: 1,
            tuning,
        };

        let placements = generate_world(seed, &state.tuning);
        state.populate(placements);
        log::info!(
            "World generated: {} obstacles, {} pickups ({} cells)",
            state.obstacles.len(),
            state.pickups.len(),
            state.grid.cols() * state.grid.rows()
        );
        state
    }

    /// World backed by procedural placeholder shapes
    pub fn with_placeholders(seed: u64, character: CharacterKind, tuning: Tuning) -> Self {
        Self::new(seed, character, tuning, Box::new(PlaceholderShapes))
    }

    /// Feed generated content into the world lists and the grid
    pub fn populate(&mut self, placements: impl IntoIterator<Item = Placement>) {
        for placement in placements {
            match placement {
                Placement::Obstacle { kind, pos } => {
                    let obstacle = Obstacle::new(kind, pos, self.shapes.as_ref());
                    self.add_obstacle(obstacle);
                }
                Placement::Pickup { kind, pos } => self.add_pickup(Pickup::new(kind, pos)),
            }
        }
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.grid
            .insert(GridEntry::Obstacle(self.obstacles.len()), obstacle.pos);
        self.obstacles.push(obstacle);
    }

    pub fn add_pickup(&mut self, pickup: Pickup) {
        self.grid
            .insert(GridEntry::Pickup(self.pickups.len()), pickup.pos);
        self.pickups.push(pickup);
    }

    /// Remove all static content (tests and custom layouts)
    pub fn clear_static(&mut self) {
        self.grid.clear();
        self.obstacles.clear();
        self.pickups.clear();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create an enemy with its configured stats
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let enemy = Enemy::new(id, kind, pos, &self.tuning, self.shapes.as_ref());
        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned { id, kind });
        id
    }

    pub fn shapes(&self) -> &dyn ShapeProvider {
        self.shapes.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
