//! Seeded world generation
//!
//! The world is cut into square tiles. Each tile gets its own RNG derived from the
//! run seed and the tile coordinates, so any tile regenerates identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{ObstacleKind, PickupKind};
use super::inventory::{EquipmentKind, Item, RelicKind, WeaponKind};
use crate::Tuning;
use crate::consts::TILE_INSET;

/// One generated piece of static content
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Obstacle { kind: ObstacleKind, pos: Vec2 },
    Pickup { kind: PickupKind, pos: Vec2 },
}

impl Placement {
    pub fn pos(&self) -> Vec2 {
        match self {
            Placement::Obstacle { pos, .. } | Placement::Pickup { pos, .. } => *pos,
        }
    }
}

const XP_VALUES: [u32; 3] = [10, 50, 100];

/// Seed for one tile, mixed from the run seed and tile coordinates
fn tile_seed(seed: u64, tile_x: u32, tile_y: u32) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add((tile_x as u64).wrapping_mul(2654435761))
        .wrapping_add((tile_y as u64).wrapping_mul(40503).rotate_left(32))
}

/// Uniform position inside the tile, inset from its edges and kept in the world
fn inset_point(rng: &mut Pcg32, origin: Vec2, tuning: &Tuning) -> Option<Vec2> {
    let lo = origin + Vec2::splat(TILE_INSET);
    let hi = Vec2::new(
        (origin.x + tuning.tile_size).min(tuning.world_w),
        (origin.y + tuning.tile_size).min(tuning.world_h),
    ) - Vec2::splat(TILE_INSET);
    if hi.x <= lo.x || hi.y <= lo.y {
        return None;
    }
    Some(Vec2::new(
        rng.random_range(lo.x..hi.x),
        rng.random_range(lo.y..hi.y),
    ))
}

fn ground_item(rng: &mut Pcg32) -> Item {
    match rng.random_range(0..5) {
        0 => Item::weapon(WeaponKind::WizardConfetti),
        1 => Item::weapon(WeaponKind::NinjaStars),
        2 => Item::weapon(WeaponKind::SquirrelBurst),
        3 => Item::relic(RelicKind::PaperCrown),
        _ => Item::equipment(EquipmentKind::Quicks),
    }
}

/// Content for a single tile: at most one of each obstacle and pickup kind
pub fn generate_tile(seed: u64, tile_x: u32, tile_y: u32, tuning: &Tuning) -> Vec<Placement> {
    let mut rng = Pcg32::seed_from_u64(tile_seed(seed, tile_x, tile_y));
    let origin = Vec2::new(tile_x as f32, tile_y as f32) * tuning.tile_size;
    let mut out = Vec::new();

    for (kind, density) in [
        (ObstacleKind::Tree, tuning.tree_density),
        (ObstacleKind::Bush, tuning.bush_density),
    ] {
        if rng.random::<f32>() < density {
            if let Some(pos) = inset_point(&mut rng, origin, tuning) {
                out.push(Placement::Obstacle { kind, pos });
            }
        }
    }

    if rng.random::<f32>() < tuning.xp_density {
        let value = XP_VALUES[rng.random_range(0..XP_VALUES.len())];
        if let Some(pos) = inset_point(&mut rng, origin, tuning) {
            out.push(Placement::Pickup {
                kind: PickupKind::Xp(value),
                pos,
            });
        }
    }
    if rng.random::<f32>() < tuning.money_density {
        if let Some(pos) = inset_point(&mut rng, origin, tuning) {
            out.push(Placement::Pickup {
                kind: PickupKind::Money(1),
                pos,
            });
        }
    }
    if rng.random::<f32>() < tuning.pie_density {
        if let Some(pos) = inset_point(&mut rng, origin, tuning) {
            out.push(Placement::Pickup {
                kind: PickupKind::Pie,
                pos,
            });
        }
    }
    if rng.random::<f32>() < tuning.item_density {
        let item = ground_item(&mut rng);
        if let Some(pos) = inset_point(&mut rng, origin, tuning) {
            out.push(Placement::Pickup {
                kind: PickupKind::Ground(item),
                pos,
            });
        }
    }
    out
}

/// Content for every tile overlapping the world, row by row
pub fn generate_world(seed: u64, tuning: &Tuning) -> Vec<Placement> {
    let tiles_x = (tuning.world_w / tuning.tile_size).ceil() as u32;
    let tiles_y = (tuning.world_h / tuning.tile_size).ceil() as u32;
    let mut out = Vec::new();
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            out.extend(generate_tile(seed, tx, ty, tuning));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let tuning = Tuning::default();
        assert_eq!(generate_world(42, &tuning), generate_world(42, &tuning));
        assert_eq!(generate_tile(42, 3, 2, &tuning), generate_tile(42, 3, 2, &tuning));
    }

    #[test]
    fn test_placements_inside_tile_inset() {
        let tuning = Tuning::default();
        for ty in 0..4u32 {
            for tx in 0..4u32 {
                let origin = Vec2::new(tx as f32, ty as f32) * tuning.tile_size;
                for p in generate_tile(9, tx, ty, &tuning) {
                    let local = p.pos() - origin;
                    assert!(local.x >= TILE_INSET && local.x < tuning.tile_size - TILE_INSET);
                    assert!(local.y >= TILE_INSET && local.y < tuning.tile_size - TILE_INSET);
                }
            }
        }
    }

    #[test]
    fn test_density_bounds_counts() {
        let none = Tuning {
            tree_density: 0.0,
            bush_density: 0.0,
            xp_density: 0.0,
            money_density: 0.0,
            pie_density: 0.0,
            item_density: 0.0,
            ..Tuning::default()
        };
        assert!(generate_world(1, &none).is_empty());

        let all = Tuning {
            tree_density: 1.0,
            bush_density: 1.0,
            xp_density: 0.0,
            money_density: 0.0,
            pie_density: 0.0,
            item_density: 0.0,
            ..Tuning::default()
        };
        let tiles = (all.world_w / all.tile_size).ceil() * (all.world_h / all.tile_size).ceil();
        let placed = generate_world(1, &all);
        // Every tile gets one tree and one bush unless it is too thin after clipping
        assert!(placed.len() <= 2 * tiles as usize);
        assert!(placed.len() >= 2 * (tiles as usize - 20));
        for p in &placed {
            let pos = p.pos();
            assert!(pos.x < all.world_w && pos.y < all.world_h);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let tuning = Tuning::default();
        assert_ne!(generate_world(1, &tuning), generate_world(2, &tuning));
    }
}
