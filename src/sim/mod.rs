//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - Single-threaded; one tick per frame with a variable `dt`
//! - Seeded RNG only (spawner and world generation)
//! - Entity lists are mutated in a fixed order, dead entries removed after resolution
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod entity;
pub mod grid;
pub mod inventory;
pub mod mask;
pub mod spawner;
pub mod state;
pub mod steering;
pub mod tick;
pub mod weapon;
pub mod worldgen;

pub use collision::{Overlap, Placed, ShapePart, overlap};
pub use entity::{
    CharacterKind, DamageOutcome, Enemy, EnemyKind, EntityId, Health, Obstacle, ObstacleKind,
    Pickup, PickupKind, Player,
};
pub use grid::{GridEntry, SpatialGrid};
pub use inventory::{Inventory, InventoryError, Item, ItemCategory, ItemKind, WeaponKind};
pub use mask::{
    PlaceholderShapes, Shape, ShapeError, ShapeMask, ShapeProvider, ShapeSource, SpriteKey,
};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use weapon::{ActiveWeapon, Projectile, RadiusWeapon, WeaponStats};
