//! GPU-ready per-sprite instance data

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::sim::mask::SpriteKey;

/// Instance flag bits
pub mod flags {
    /// Mirror horizontally (player facing left)
    pub const FLIP_X: u32 = 1;
    /// Orbiting weapon or projectile
    pub const EFFECT: u32 = 1 << 1;
}

/// One drawable sprite, laid out for a vertex instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Sprite centre in screen space
    pub position: [f32; 2],
    pub size: [f32; 2],
    /// Paint order key: sprite bottom edge in world space
    pub bottom_y: f32,
    pub sprite_id: u32,
    pub flags: u32,
    pub _pad: u32,
}

impl SpriteInstance {
    pub fn new(screen_pos: Vec2, size: Vec2, world_y: f32, sprite: SpriteKey, flags: u32) -> Self {
        Self {
            position: screen_pos.to_array(),
            size: size.to_array(),
            bottom_y: world_y + size.y / 2.0,
            sprite_id: sprite.id(),
            flags,
            _pad: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::ObstacleKind;

    #[test]
    fn test_bottom_y_is_lower_edge() {
        let inst = SpriteInstance::new(
            Vec2::new(10.0, 20.0),
            Vec2::new(64.0, 96.0),
            500.0,
            SpriteKey::Obstacle(ObstacleKind::Tree),
            0,
        );
        assert_eq!(inst.bottom_y, 548.0);
        assert_eq!(inst.sprite_id, 300);
    }

    #[test]
    fn test_instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 32);
        let insts = [SpriteInstance::zeroed(); 3];
        assert_eq!(bytemuck::cast_slice::<_, u8>(&insts).len(), 96);
    }
}
