//! Screen-space camera that follows the player

use glam::Vec2;

/// Top-left viewport offset in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub screen: Vec2,
    pub world: Vec2,
    pub offset: Vec2,
}

impl Camera {
    pub fn new(screen: Vec2, world: Vec2) -> Self {
        Self {
            screen,
            world,
            offset: Vec2::ZERO,
        }
    }

    /// Centre on `target`, never showing outside the world
    pub fn follow(&mut self, target: Vec2) {
        let max = (self.world - self.screen).max(Vec2::ZERO);
        self.offset = (target - self.screen / 2.0).clamp(Vec2::ZERO, max);
    }

    #[inline]
    pub fn world_to_screen(&self, pos: Vec2) -> Vec2 {
        pos - self.offset
    }

    /// World position at the middle of the viewport
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.offset + self.screen / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_centres_inside_world() {
        let mut cam = Camera::new(Vec2::new(100.0, 50.0), Vec2::new(1000.0, 500.0));
        cam.follow(Vec2::new(500.0, 250.0));
        assert_eq!(cam.offset, Vec2::new(450.0, 225.0));
        assert_eq!(cam.world_to_screen(Vec2::new(500.0, 250.0)), Vec2::new(50.0, 25.0));
        assert_eq!(cam.center(), Vec2::new(500.0, 250.0));
    }

    #[test]
    fn test_follow_clamps_at_edges() {
        let mut cam = Camera::new(Vec2::new(100.0, 50.0), Vec2::new(1000.0, 500.0));
        cam.follow(Vec2::new(10.0, 10.0));
        assert_eq!(cam.offset, Vec2::ZERO);
        cam.follow(Vec2::new(990.0, 490.0));
        assert_eq!(cam.offset, Vec2::new(900.0, 450.0));
    }
}
