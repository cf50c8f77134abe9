//! Shape overlap tests
//!
//! Two placed shapes are first compared by their integer pixel rectangles, then
//! by their opacity masks at the rectangles' relative offset. Either side may use
//! its bottom-third mask so tall scenery only blocks movement near its base.

use glam::Vec2;

use super::mask::Shape;

/// Which part of a sprite takes part in the test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapePart {
    Full,
    /// Bottom third of the sprite (tree trunks, character feet)
    BottomThird,
}

/// Outcome of an overlap test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// Rectangles or masks are disjoint
    Clear,
    /// At least one pixel is opaque in both masks
    Hit,
    /// Rectangles intersect but a mask was unavailable
    Degraded,
}

impl Overlap {
    /// Movement checks fail closed: a degraded test still blocks
    #[inline]
    pub fn blocks(self) -> bool {
        matches!(self, Overlap::Hit | Overlap::Degraded)
    }

    /// Exact hit only
    #[inline]
    pub fn is_hit(self) -> bool {
        self == Overlap::Hit
    }
}

/// Integer pixel rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Strict intersection; touching edges and empty rects never collide
    pub fn intersects(&self, other: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// A shape anchored at a world position
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub shape: &'a Shape,
    pub pos: Vec2,
    pub part: ShapePart,
}

impl<'a> Placed<'a> {
    pub fn full(shape: &'a Shape, pos: Vec2) -> Self {
        Self {
            shape,
            pos,
            part: ShapePart::Full,
        }
    }

    pub fn bottom_third(shape: &'a Shape, pos: Vec2) -> Self {
        Self {
            shape,
            pos,
            part: ShapePart::BottomThird,
        }
    }

    /// Sprite rectangle centred on the position; the bottom-third rectangle is
    /// pushed down by a third of the sprite height
    pub fn rect(&self) -> Rect {
        let w = self.shape.width() as i32;
        let h = self.shape.height() as i32;
        let cx = self.pos.x.floor() as i32;
        let cy = self.pos.y.floor() as i32;
        let x = cx - w / 2;
        match self.part {
            ShapePart::Full => Rect { x, y: cy - h / 2, w, h },
            ShapePart::BottomThird => Rect {
                x,
                y: (self.pos.y + self.shape.height() as f32 / 3.0).floor() as i32,
                w,
                h: self.shape.partial_height() as i32,
            },
        }
    }
}

/// Test two placed shapes for overlap
pub fn overlap(a: Placed<'_>, b: Placed<'_>) -> Overlap {
    let rect_a = a.rect();
    let rect_b = b.rect();
    if !rect_a.intersects(&rect_b) {
        return Overlap::Clear;
    }

    let mask_a = match a.part {
        ShapePart::Full => a.shape.mask(),
        ShapePart::BottomThird => a.shape.partial_mask(),
    };
    let mask_b = match b.part {
        ShapePart::Full => b.shape.mask(),
        ShapePart::BottomThird => b.shape.partial_mask(),
    };

    match (mask_a, mask_b) {
        (Some(ma), Some(mb)) => {
            if ma.overlaps(mb, rect_b.x - rect_a.x, rect_b.y - rect_a.y) {
                Overlap::Hit
            } else {
                Overlap::Clear
            }
        }
        _ => Overlap::Degraded,
    }
}

/// Centre-distance test between a circle and a sprite's bounding circle
#[inline]
pub fn circle_hits_shape(center: Vec2, radius: f32, shape: &Shape, shape_pos: Vec2) -> bool {
    center.distance(shape_pos) < radius + shape.bounding_radius()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mask::{ShapeMask, ShapeSource};
    use proptest::prelude::*;

    fn disc(d: u32) -> Shape {
        Shape::from_mask(ShapeMask::filled_circle(d))
    }

    #[test]
    fn test_rect_reject_far_apart() {
        let a = disc(32);
        let b = disc(32);
        let result = overlap(
            Placed::full(&a, Vec2::new(0.0, 0.0)),
            Placed::full(&b, Vec2::new(100.0, 0.0)),
        );
        assert_eq!(result, Overlap::Clear);
    }

    #[test]
    fn test_discs_overlap_when_close() {
        let a = disc(32);
        let b = disc(32);
        let result = overlap(
            Placed::full(&a, Vec2::new(50.0, 50.0)),
            Placed::full(&b, Vec2::new(70.0, 50.0)),
        );
        assert_eq!(result, Overlap::Hit);
    }

    #[test]
    fn test_diagonal_corners_do_not_hit() {
        let a = disc(32);
        let b = disc(32);
        // Boxes overlap by 4px in each axis, only transparent corners meet
        let result = overlap(
            Placed::full(&a, Vec2::new(100.0, 100.0)),
            Placed::full(&b, Vec2::new(128.0, 128.0)),
        );
        assert_eq!(result, Overlap::Clear);
    }

    #[test]
    fn test_partial_ignores_upper_sprite() {
        // 30x30 solid block: bottom third rect is y in [pos.y + 10, pos.y + 20)
        let tree = Shape::from_mask(ShapeMask::filled_rect(30, 30));
        let mover = disc(8);
        let tree_pos = Vec2::new(100.0, 100.0);

        // Mover over the top of the sprite: full hit, partial clear
        let above = Vec2::new(100.0, 90.0);
        assert_eq!(
            overlap(Placed::full(&tree, tree_pos), Placed::full(&mover, above)),
            Overlap::Hit
        );
        assert_eq!(
            overlap(Placed::bottom_third(&tree, tree_pos), Placed::full(&mover, above)),
            Overlap::Clear
        );

        // Mover at the base: both hit
        let base = Vec2::new(100.0, 114.0);
        assert_eq!(
            overlap(Placed::bottom_third(&tree, tree_pos), Placed::full(&mover, base)),
            Overlap::Hit
        );
    }

    #[test]
    fn test_malformed_mask_degrades_only_when_rects_meet() {
        let broken = Shape::from_source(&ShapeSource::Bitmap {
            width: 20,
            height: 20,
            alpha: vec![0; 5],
        });
        let other = disc(20);

        let near = overlap(
            Placed::full(&broken, Vec2::new(0.0, 0.0)),
            Placed::full(&other, Vec2::new(5.0, 5.0)),
        );
        assert_eq!(near, Overlap::Degraded);
        assert!(near.blocks());
        assert!(!near.is_hit());

        let far = overlap(
            Placed::full(&broken, Vec2::new(0.0, 0.0)),
            Placed::full(&other, Vec2::new(500.0, 5.0)),
        );
        assert_eq!(far, Overlap::Clear);
    }

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = Rect { x: 0, y: 0, w: 10, h: 10 };
        let b = Rect { x: 10, y: 0, w: 10, h: 10 };
        assert!(!a.intersects(&b));
        let empty = Rect { x: 2, y: 2, w: 0, h: 5 };
        assert!(!a.intersects(&empty));
    }

    #[test]
    fn test_circle_hits_shape_uses_longer_side() {
        let tall = Shape::from_mask(ShapeMask::filled_rect(10, 40));
        // Bounding radius 20, projectile radius 5
        assert!(circle_hits_shape(Vec2::new(0.0, 24.0), 5.0, &tall, Vec2::ZERO));
        assert!(!circle_hits_shape(Vec2::new(0.0, 25.0), 5.0, &tall, Vec2::ZERO));
    }

    proptest! {
        #[test]
        fn prop_full_overlap_is_symmetric(
            da in 4u32..48,
            db in 4u32..48,
            ax in -100.0f32..100.0,
            ay in -100.0f32..100.0,
            bx in -100.0f32..100.0,
            by in -100.0f32..100.0,
        ) {
            let a = disc(da);
            let b = disc(db);
            let pa = Vec2::new(ax, ay);
            let pb = Vec2::new(bx, by);
            prop_assert_eq!(
                overlap(Placed::full(&a, pa), Placed::full(&b, pb)),
                overlap(Placed::full(&b, pb), Placed::full(&a, pa))
            );
        }
    }
}
