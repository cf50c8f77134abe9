//! Per-pixel opacity masks and the per-entity shapes built from them
//!
//! A [`ShapeMask`] is a packed bitmap, one `u64` word per 64 pixels of a row. Bits
//! past the mask width are always zero, which lets overlap tests AND whole words.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::PLACEHOLDER_DIAMETER;

/// Alpha values above this count as opaque
pub const ALPHA_THRESHOLD: u8 = 127;

/// Fraction of the sprite height kept by a partial mask
pub const PARTIAL_FRACTION: f32 = 1.0 / 3.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("sprite has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("alpha buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Packed opacity bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl ShapeMask {
    /// Fully transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Build from a row-major alpha channel
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Result<Self, ShapeError> {
        if width == 0 || height == 0 {
            return Err(ShapeError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(ShapeError::BufferSize {
                expected,
                actual: alpha.len(),
            });
        }
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if alpha[(y * width + x) as usize] > ALPHA_THRESHOLD {
                    mask.set(x, y, true);
                }
            }
        }
        Ok(mask)
    }

    /// Solid rectangle
    pub fn filled_rect(width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, true);
            }
        }
        mask
    }

    /// Filled disc inscribed in a `diameter`×`diameter` square
    pub fn filled_circle(diameter: u32) -> Self {
        let mut mask = Self::new(diameter, diameter);
        let r = diameter as f32 / 2.0;
        for y in 0..diameter {
            for x in 0..diameter {
                let dx = x as f32 + 0.5 - r;
                let dy = y as f32 + 0.5 - r;
                if dx * dx + dy * dy <= r * r {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn row(&self, y: u32) -> &[u64] {
        let start = y as usize * self.words_per_row;
        &self.bits[start..start + self.words_per_row]
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.row(y)[(x / 64) as usize];
        word & (1u64 << (x % 64)) != 0
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.words_per_row + (x / 64) as usize;
        let bit = 1u64 << (x % 64);
        if opaque {
            self.bits[idx] |= bit;
        } else {
            self.bits[idx] &= !bit;
        }
    }

    /// Number of opaque pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Bottom `fraction` of the rows (at least one row), copied into a new mask.
    /// A mask with no rows yields another empty mask.
    pub fn bottom_fraction(&self, fraction: f32) -> Self {
        if self.height == 0 {
            return Self::new(self.width, 0);
        }
        let part_h = ((self.height as f32 * fraction) as u32).clamp(1, self.height.max(1));
        let mut partial = Self::new(self.width, part_h);
        let src_start = self.height - part_h;
        for y in 0..part_h {
            let src = self.row(src_start + y);
            let dst_start = y as usize * partial.words_per_row;
            partial.bits[dst_start..dst_start + partial.words_per_row].copy_from_slice(src);
        }
        partial
    }

    /// True when any pixel is opaque in both masks, with `other` placed at
    /// (`dx`, `dy`) relative to this mask's top-left corner.
    pub fn overlaps(&self, other: &ShapeMask, dx: i32, dy: i32) -> bool {
        let y_lo = dy.max(0);
        let y_hi = (dy + other.height as i32).min(self.height as i32);
        if y_lo >= y_hi {
            return false;
        }
        if dx >= self.width as i32 || dx + other.width as i32 <= 0 {
            return false;
        }

        for y in y_lo..y_hi {
            let row_a = self.row(y as u32);
            let row_b = other.row((y - dy) as u32);
            if rows_overlap(row_a, row_b, dx) {
                return true;
            }
        }
        false
    }
}

/// AND a row of `b` shifted right by `dx` bits against a row of `a`
fn rows_overlap(row_a: &[u64], row_b: &[u64], dx: i32) -> bool {
    let len_a = row_a.len() as i64;
    for (wb, &word) in row_b.iter().enumerate() {
        if word == 0 {
            continue;
        }
        let start = wb as i64 * 64 + dx as i64;
        let wa = start.div_euclid(64);
        let shift = start.rem_euclid(64) as u32;

        if (0..len_a).contains(&wa) && row_a[wa as usize] & (word << shift) != 0 {
            return true;
        }
        if shift > 0 {
            let next = wa + 1;
            if (0..len_a).contains(&next) && row_a[next as usize] & (word >> (64 - shift)) != 0 {
                return true;
            }
        }
    }
    false
}

/// Where an entity's sprite comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeSource {
    /// Decoded sprite alpha channel
    Bitmap {
        width: u32,
        height: u32,
        alpha: Vec<u8>,
    },
    /// Procedural filled disc
    Circle { diameter: u32 },
    /// Procedural filled rectangle
    Rect { width: u32, height: u32 },
    /// Sprite could not be resolved
    Missing,
}

/// An entity's collision shape: sprite bounds plus its full and partial masks.
///
/// The full mask is built once at construction; the partial (bottom third) mask is
/// derived on first use and kept for the entity's lifetime.
#[derive(Debug, Clone)]
pub struct Shape {
    width: u32,
    height: u32,
    /// `None` when the sprite data was malformed; overlaps then degrade
    full: Option<ShapeMask>,
    partial: OnceCell<Option<ShapeMask>>,
}

impl Shape {
    /// Wrap a mask. A zero-sized mask becomes the placeholder.
    pub fn from_mask(mask: ShapeMask) -> Self {
        if mask.width() == 0 || mask.height() == 0 {
            log::warn!(
                "sprite has zero size ({}x{}); using placeholder shape",
                mask.width(),
                mask.height()
            );
            return Self::placeholder();
        }
        Self {
            width: mask.width(),
            height: mask.height(),
            full: Some(mask),
            partial: OnceCell::new(),
        }
    }

    /// Fixed-size filled circle used when a sprite is unavailable
    pub fn placeholder() -> Self {
        Self::from_mask(ShapeMask::filled_circle(PLACEHOLDER_DIAMETER))
    }

    /// Resolve a sprite source. Never fails: missing sprites become the
    /// placeholder, malformed bitmaps keep their bounds without a mask.
    pub fn from_source(source: &ShapeSource) -> Self {
        match source {
            ShapeSource::Bitmap {
                width,
                height,
                alpha,
            } => match ShapeMask::from_alpha(*width, *height, alpha) {
                Ok(mask) => Self::from_mask(mask),
                Err(err @ ShapeError::Empty { .. }) => {
                    log::warn!("{err}; using placeholder shape");
                    Self::placeholder()
                }
                Err(err) => {
                    log::warn!("{err}; collisions with this shape fail closed");
                    Self {
                        width: *width,
                        height: *height,
                        full: None,
                        partial: OnceCell::new(),
                    }
                }
            },
            ShapeSource::Circle { diameter } if *diameter > 0 => {
                Self::from_mask(ShapeMask::filled_circle(*diameter))
            }
            ShapeSource::Rect { width, height } if *width > 0 && *height > 0 => {
                Self::from_mask(ShapeMask::filled_rect(*width, *height))
            }
            ShapeSource::Missing => {
                log::warn!("sprite missing; using placeholder shape");
                Self::placeholder()
            }
            other => {
                log::warn!("degenerate sprite {other:?}; using placeholder shape");
                Self::placeholder()
            }
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Radius of the circle bounding the sprite box on its longer side
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.width.max(self.height) as f32 / 2.0
    }

    /// Full-sprite mask, if the sprite data was usable
    pub fn mask(&self) -> Option<&ShapeMask> {
        self.full.as_ref()
    }

    /// Bottom-third mask, derived once
    pub fn partial_mask(&self) -> Option<&ShapeMask> {
        self.partial
            .get_or_init(|| self.full.as_ref().map(|m| m.bottom_fraction(PARTIAL_FRACTION)))
            .as_ref()
    }

    /// Height of the bottom-third region
    pub fn partial_height(&self) -> u32 {
        ((self.height as f32 * PARTIAL_FRACTION) as u32).clamp(1, self.height.max(1))
    }
}

/// Sprite handle for each kind of drawable thing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    Player(super::entity::CharacterKind),
    Enemy(super::entity::EnemyKind),
    Obstacle(super::entity::ObstacleKind),
    Pickup(super::entity::PickupSprite),
    /// Weapon shot or orbiting object (`None` = manual attack)
    Weapon(Option<super::inventory::WeaponKind>),
}

impl SpriteKey {
    /// Stable numeric id for instance buffers
    pub fn id(&self) -> u32 {
        use super::entity::{CharacterKind, EnemyKind, ObstacleKind, PickupSprite};
        use super::inventory::WeaponKind;
        match *self {
            SpriteKey::Player(c) => {
                100 + match c {
                    CharacterKind::CircleNinja => 0,
                    CharacterKind::Ninjircle => 1,
                    CharacterKind::TriangleWizard => 2,
                    CharacterKind::Sqwerewolf => 3,
                }
            }
            SpriteKey::Enemy(e) => {
                200 + match e {
                    EnemyKind::Minion => 0,
                    EnemyKind::AttackRobot => 1,
                    EnemyKind::Starficer => 2,
                    EnemyKind::Illuminawty => 3,
                    EnemyKind::RobotBoss => 4,
                }
            }
            SpriteKey::Obstacle(o) => {
                300 + match o {
                    ObstacleKind::Tree => 0,
                    ObstacleKind::Bush => 1,
                }
            }
            SpriteKey::Pickup(p) => {
                400 + match p {
                    PickupSprite::Xp => 0,
                    PickupSprite::Money => 1,
                    PickupSprite::Pie => 2,
                    PickupSprite::Item => 3,
                }
            }
            SpriteKey::Weapon(w) => {
                500 + match w {
                    None => 0,
                    Some(WeaponKind::WizardConfetti) => 1,
                    Some(WeaponKind::NinjaStars) => 2,
                    Some(WeaponKind::SquirrelBurst) => 3,
                }
            }
        }
    }
}

/// Asset collaborator: resolves a sprite handle to its shape source
pub trait ShapeProvider {
    fn source(&self, sprite: SpriteKey) -> ShapeSource;

    fn shape(&self, sprite: SpriteKey) -> Shape {
        Shape::from_source(&self.source(sprite))
    }
}

/// Procedural shapes sized like the game's sprites, for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderShapes;

impl ShapeProvider for PlaceholderShapes {
    fn source(&self, sprite: SpriteKey) -> ShapeSource {
        use super::entity::{EnemyKind, ObstacleKind};
        match sprite {
            SpriteKey::Player(_) => ShapeSource::Circle { diameter: 80 },
            SpriteKey::Enemy(EnemyKind::RobotBoss) => ShapeSource::Circle { diameter: 48 },
            SpriteKey::Enemy(kind) if kind.is_elite() => ShapeSource::Circle { diameter: 40 },
            SpriteKey::Enemy(_) => ShapeSource::Circle { diameter: 32 },
            SpriteKey::Obstacle(ObstacleKind::Tree) => ShapeSource::Bitmap {
                width: 64,
                height: 96,
                alpha: tree_alpha(64, 96),
            },
            SpriteKey::Obstacle(ObstacleKind::Bush) => ShapeSource::Circle { diameter: 40 },
            SpriteKey::Pickup(_) => ShapeSource::Circle { diameter: 24 },
            SpriteKey::Weapon(_) => ShapeSource::Circle { diameter: 16 },
        }
    }
}

/// Canopy disc over a trunk, so the bottom third is narrower than the top
fn tree_alpha(width: u32, height: u32) -> Vec<u8> {
    let mut alpha = vec![0u8; (width * height) as usize];
    let r = width as f32 / 2.0;
    let trunk_half = width as f32 / 8.0;
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 + 0.5;
            let fy = y as f32 + 0.5;
            let canopy = (fx - r).powi(2) + (fy - r).powi(2) <= r * r;
            let trunk = fy > r && (fx - r).abs() <= trunk_half;
            if canopy || trunk {
                alpha[(y * width + x) as usize] = 255;
            }
        }
    }
    alpha
}
