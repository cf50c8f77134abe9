//! Render collaborator surface
//!
//! Turns world state into a depth-sorted list of sprite instances. Static content
//! is culled through the spatial grid around the camera; movers are always listed.
//! No pixels are drawn here.

pub mod camera;
pub mod instance;

pub use camera::Camera;
pub use instance::{SpriteInstance, flags};

use glam::Vec2;

use crate::consts::DRAW_CELL_RADIUS;
use crate::sim::entity::{Enemy, Obstacle, Pickup, PickupKind, Player};
use crate::sim::grid::GridEntry;
use crate::sim::mask::SpriteKey;
use crate::sim::state::GameState;
use crate::sim::weapon::{Projectile, RadiusWeapon};

/// Ground pickups are drawn at a fixed icon size
const PICKUP_DRAW_SIZE: f32 = 30.0;

/// Anything the draw list can place
pub trait Renderable {
    fn sprite(&self) -> SpriteKey;
    fn world_pos(&self) -> Vec2;
    fn size(&self) -> Vec2;
    fn flags(&self) -> u32 {
        0
    }

    fn instance(&self, camera: &Camera) -> SpriteInstance {
        let pos = self.world_pos();
        SpriteInstance::new(
            camera.world_to_screen(pos),
            self.size(),
            pos.y,
            self.sprite(),
            self.flags(),
        )
    }
}

impl Renderable for Player {
    fn sprite(&self) -> SpriteKey {
        SpriteKey::Player(self.character)
    }
    fn world_pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        Vec2::new(self.shape.width() as f32, self.shape.height() as f32)
    }
    fn flags(&self) -> u32 {
        if self.facing_left { flags::FLIP_X } else { 0 }
    }
}

impl Renderable for Enemy {
    fn sprite(&self) -> SpriteKey {
        SpriteKey::Enemy(self.kind)
    }
    fn world_pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        Vec2::new(self.shape.width() as f32, self.shape.height() as f32)
    }
}

impl Renderable for Obstacle {
    fn sprite(&self) -> SpriteKey {
        SpriteKey::Obstacle(self.kind)
    }
    fn world_pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        Vec2::new(self.shape.width() as f32, self.shape.height() as f32)
    }
}

impl Renderable for Pickup {
    fn sprite(&self) -> SpriteKey {
        match &self.kind {
            PickupKind::Ground(item) => item.icon(),
            other => SpriteKey::Pickup(other.sprite()),
        }
    }
    fn world_pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        Vec2::splat(PICKUP_DRAW_SIZE)
    }
}

impl Renderable for Projectile {
    fn sprite(&self) -> SpriteKey {
        self.sprite
    }
    fn world_pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }
    fn flags(&self) -> u32 {
        flags::EFFECT
    }
}

impl Renderable for RadiusWeapon {
    fn sprite(&self) -> SpriteKey {
        SpriteKey::Weapon(Some(self.kind))
    }
    fn world_pos(&self) -> Vec2 {
        self.pos()
    }
    fn size(&self) -> Vec2 {
        Vec2::splat(self.object_size)
    }
    fn flags(&self) -> u32 {
        flags::EFFECT
    }
}

/// Every visible sprite, sorted back to front by `bottom_y`
pub fn build_draw_list(state: &GameState, camera: &Camera) -> Vec<SpriteInstance> {
    let mut list = Vec::new();

    for entry in state.grid.neighborhood(camera.center(), DRAW_CELL_RADIUS) {
        match *entry {
            GridEntry::Obstacle(i) => {
                if let Some(o) = state.obstacles.get(i) {
                    list.push(o.instance(camera));
                }
            }
            GridEntry::Pickup(i) => {
                if let Some(p) = state.pickups.get(i).filter(|p| !p.picked) {
                    list.push(p.instance(camera));
                }
            }
        }
    }

    list.push(state.player.instance(camera));
    list.extend(
        state
            .enemies
            .iter()
            .filter(|e| !e.is_dead())
            .map(|e| e.instance(camera)),
    );
    list.extend(
        state
            .projectiles
            .iter()
            .filter(|p| !p.dead)
            .map(|p| p.instance(camera)),
    );
    // Hidden while cooling down
    list.extend(
        state
            .radius_weapons
            .iter()
            .filter(|w| w.is_active())
            .map(|w| w.instance(camera)),
    );

    list.sort_by(|a, b| a.bottom_y.total_cmp(&b.bottom_y));
    list
}

/// Raw bytes for an instance buffer upload
pub fn instance_bytes(instances: &[SpriteInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
