//! Weapons: auto-fire timers, projectiles and orbiting melee attacks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circle_hits_shape;
use super::entity::{Enemy, EntityId};
use super::inventory::WeaponKind;
use super::mask::SpriteKey;
use crate::{normalize_angle, polar_to_cartesian};

/// How a weapon delivers damage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Delivery {
    /// Straight-line projectile aimed at the nearest enemy
    Projectile { speed: f32, size: f32 },
    /// Object orbiting the player for `duration`, then hidden for `cooldown`
    Orbit {
        radius: f32,
        object_size: f32,
        angular_speed: f32,
        duration: f32,
        cooldown: f32,
    },
}

/// Weapon stat block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Shots per second
    pub fire_rate: f32,
    pub damage: f32,
    pub range: f32,
    /// Only target enemies closer than this (None = any distance)
    #[serde(default)]
    pub target_range: Option<f32>,
    pub delivery: Delivery,
}

impl WeaponStats {
    pub fn preset(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::WizardConfetti => Self {
                fire_rate: 1.0,
                damage: 12.0,
                range: 500.0,
                target_range: None,
                delivery: Delivery::Projectile {
                    speed: 600.0,
                    size: 10.0,
                },
            },
            WeaponKind::NinjaStars => Self {
                fire_rate: 1.5,
                damage: 8.0,
                range: 400.0,
                target_range: None,
                delivery: Delivery::Projectile {
                    speed: 700.0,
                    size: 6.0,
                },
            },
            WeaponKind::SquirrelBurst => Self {
                fire_rate: 0.3,
                damage: 15.0,
                range: 450.0,
                target_range: None,
                delivery: Delivery::Orbit {
                    radius: 90.0,
                    object_size: 50.0,
                    angular_speed: 4.0,
                    duration: 3.0,
                    cooldown: 0.7,
                },
            },
        }
    }

    /// Seconds a projectile survives to cover `range`
    pub fn projectile_lifetime(&self, speed: f32) -> f32 {
        if speed <= 0.0 {
            return 0.1;
        }
        (self.range / speed).max(0.1)
    }
}

/// Something a weapon spawned this frame
#[derive(Debug, Clone)]
pub enum Shot {
    Projectile(Projectile),
    Radius(RadiusWeapon),
}

/// A weapon in the player's active set with its own fire timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveWeapon {
    pub kind: WeaponKind,
    pub stats: WeaponStats,
    /// Seconds since this weapon last fired
    pub since_fire: f32,
}

impl ActiveWeapon {
    pub fn new(kind: WeaponKind, stats: WeaponStats) -> Self {
        Self {
            kind,
            stats,
            since_fire: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.since_fire += dt;
    }

    pub fn can_fire(&self) -> bool {
        self.stats.fire_rate > 0.0 && self.since_fire >= 1.0 / self.stats.fire_rate
    }

    /// Fire if ready. Projectile weapons need a live target; orbit weapons don't.
    /// A target sitting exactly on `origin` is shot along `fallback_dir`.
    /// The timer resets only when something was fired.
    pub fn try_fire(
        &mut self,
        origin: Vec2,
        fallback_dir: Vec2,
        enemies: &[Enemy],
    ) -> Option<Shot> {
        if !self.can_fire() {
            return None;
        }
        let shot = match self.stats.delivery {
            Delivery::Projectile { speed, size } => {
                let target = nearest_live_enemy(origin, enemies, self.stats.target_range)?;
                let aim = (target.pos - origin)
                    .try_normalize()
                    .unwrap_or(fallback_dir);
                Shot::Projectile(Projectile::new(
                    origin,
                    aim,
                    speed,
                    self.stats.projectile_lifetime(speed),
                    self.stats.damage,
                    size,
                    SpriteKey::Weapon(Some(self.kind)),
                ))
            }
            Delivery::Orbit {
                radius,
                object_size,
                angular_speed,
                duration,
                cooldown,
            } => Shot::Radius(RadiusWeapon::new(
                self.kind,
                origin,
                self.stats.damage,
                radius,
                object_size,
                angular_speed,
                duration,
                cooldown,
            )),
        };
        self.since_fire = 0.0;
        Some(shot)
    }
}

/// Closest live enemy to `origin`, optionally within `max_range`
pub fn nearest_live_enemy(
    origin: Vec2,
    enemies: &[Enemy],
    max_range: Option<f32>,
) -> Option<&Enemy> {
    enemies
        .iter()
        .filter(|e| !e.is_dead())
        .map(|e| (e, e.pos.distance_squared(origin)))
        .filter(|(_, d2)| max_range.is_none_or(|r| *d2 <= r * r))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

/// Straight-line projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    /// Unit direction
    pub direction: Vec2,
    pub speed: f32,
    pub lifetime: f32,
    pub age: f32,
    pub damage: f32,
    pub radius: f32,
    pub dead: bool,
    pub sprite: SpriteKey,
}

impl Projectile {
    pub fn new(
        pos: Vec2,
        direction: Vec2,
        speed: f32,
        lifetime: f32,
        damage: f32,
        radius: f32,
        sprite: SpriteKey,
    ) -> Self {
        let direction = direction.try_normalize().unwrap_or(Vec2::X);
        Self {
            pos,
            direction,
            speed,
            lifetime,
            age: 0.0,
            damage,
            radius,
            dead: false,
            sprite,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        self.pos += self.direction * self.speed * dt;
        self.age += dt;
        if self.age >= self.lifetime {
            self.dead = true;
        }
    }

    pub fn hits(&self, enemy: &Enemy) -> bool {
        !self.dead && circle_hits_shape(self.pos, self.radius, &enemy.shape, enemy.pos)
    }

    /// Mark as spent; never revived
    pub fn kill(&mut self) {
        self.dead = true;
    }
}

/// Orbit lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitPhase {
    Active,
    CoolingDown,
}

/// Orbiting melee attack. Position is derived from the anchor and angle.
#[derive(Debug, Clone)]
pub struct RadiusWeapon {
    pub kind: WeaponKind,
    pub anchor: Vec2,
    pub orbit_radius: f32,
    pub object_size: f32,
    /// Radians per second
    pub angular_speed: f32,
    pub duration: f32,
    pub cooldown: f32,
    pub phase: OrbitPhase,
    /// Seconds spent in the current phase
    pub age: f32,
    pub angle: f32,
    pub damage: f32,
    pub dead: bool,
    /// Enemies already struck during this activation
    hit_ids: Vec<EntityId>,
}

impl RadiusWeapon {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: WeaponKind,
        anchor: Vec2,
        damage: f32,
        orbit_radius: f32,
        object_size: f32,
        angular_speed: f32,
        duration: f32,
        cooldown: f32,
    ) -> Self {
        Self {
            kind,
            anchor,
            orbit_radius,
            object_size,
            angular_speed,
            duration,
            cooldown,
            phase: OrbitPhase::Active,
            age: 0.0,
            angle: 0.0,
            damage,
            dead: false,
            hit_ids: Vec::new(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.anchor + polar_to_cartesian(self.orbit_radius, self.angle)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.dead && self.phase == OrbitPhase::Active
    }

    /// Follow the anchor and advance the orbit / phase timers
    pub fn update(&mut self, dt: f32, anchor: Vec2) {
        if self.dead {
            return;
        }
        self.anchor = anchor;
        self.age += dt;
        match self.phase {
            OrbitPhase::Active => {
                self.angle = normalize_angle(self.angle + self.angular_speed * dt);
                if self.age >= self.duration {
                    self.phase = OrbitPhase::CoolingDown;
                    self.age = 0.0;
                }
            }
            OrbitPhase::CoolingDown => {
                if self.age >= self.cooldown {
                    self.dead = true;
                }
            }
        }
    }

    /// Circular test against the enemy's bounding circle, active phase only
    pub fn hits(&self, enemy: &Enemy) -> bool {
        self.is_active()
            && circle_hits_shape(self.pos(), self.object_size / 2.0, &enemy.shape, enemy.pos)
    }

    /// True the first time `id` is struck this activation
    pub fn register_hit(&mut self, id: EntityId) -> bool {
        if self.hit_ids.contains(&id) {
            false
        } else {
            self.hit_ids.push(id);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::entity::EnemyKind;
    use crate::sim::mask::PlaceholderShapes;

    fn minion_at(id: EntityId, pos: Vec2) -> Enemy {
        Enemy::new(id, EnemyKind::Minion, pos, &Tuning::default(), &PlaceholderShapes)
    }

    fn shot(direction: Vec2, speed: f32, lifetime: f32) -> Projectile {
        Projectile::new(Vec2::ZERO, direction, speed, lifetime, 1.0, 4.0, SpriteKey::Weapon(None))
    }

    fn orbit() -> RadiusWeapon {
        RadiusWeapon::new(WeaponKind::SquirrelBurst, Vec2::ZERO, 15.0, 90.0, 50.0, 4.0, 1.0, 0.5)
    }

    fn weapon(kind: WeaponKind) -> ActiveWeapon {
        ActiveWeapon::new(kind, WeaponStats::preset(kind))
    }

    #[test]
    fn test_projectile_expires_after_lifetime() {
        let mut p = shot(Vec2::X, 100.0, 0.5);
        p.update(0.25);
        assert!(!p.dead);
        assert!((p.pos.x - 25.0).abs() < 1e-4);
        p.update(0.25);
        assert!(p.dead);
        // Dead projectiles stay put
        let before = p.pos;
        p.update(1.0);
        assert_eq!(p.pos, before);
    }

    #[test]
    fn test_zero_direction_defaults_to_x() {
        let p = shot(Vec2::ZERO, 1.0, 1.0);
        assert_eq!(p.direction, Vec2::X);
    }

    #[test]
    fn test_projectile_weapon_needs_target() {
        let mut w = weapon(WeaponKind::NinjaStars);
        w.update(1.0);
        assert!(w.can_fire());
        assert!(w.try_fire(Vec2::ZERO, Vec2::X, &[]).is_none());
        // Timer keeps accumulating while idle
        assert!(w.since_fire >= 1.0);

        let enemies = vec![
            minion_at(1, Vec2::new(0.0, 300.0)),
            minion_at(2, Vec2::new(100.0, 0.0)),
        ];
        match w.try_fire(Vec2::ZERO, Vec2::NEG_Y, &enemies) {
            Some(Shot::Projectile(p)) => {
                assert_eq!(p.direction, Vec2::X);
                assert_eq!(p.damage, 8.0);
                assert!((p.lifetime - 400.0 / 700.0).abs() < 1e-5);
            }
            other => panic!("expected projectile, got {other:?}"),
        }
        assert_eq!(w.since_fire, 0.0);
        assert!(!w.can_fire());
    }

    #[test]
    fn test_target_on_origin_uses_fallback_direction() {
        let mut w = weapon(WeaponKind::NinjaStars);
        w.update(1.0);
        let origin = Vec2::new(40.0, 40.0);
        let enemies = vec![minion_at(1, origin)];
        match w.try_fire(origin, Vec2::NEG_Y, &enemies) {
            Some(Shot::Projectile(p)) => assert_eq!(p.direction, Vec2::NEG_Y),
            other => panic!("expected projectile, got {other:?}"),
        }
    }

    #[test]
    fn test_nearest_skips_dead_and_out_of_range() {
        let mut near = minion_at(1, Vec2::new(10.0, 0.0));
        near.take_damage(100.0);
        let enemies = vec![
            near,
            minion_at(2, Vec2::new(50.0, 0.0)),
            minion_at(3, Vec2::new(500.0, 0.0)),
        ];
        assert_eq!(nearest_live_enemy(Vec2::ZERO, &enemies, None).map(|e| e.id), Some(2));
        assert!(nearest_live_enemy(Vec2::ZERO, &enemies, Some(20.0)).is_none());
    }

    #[test]
    fn test_orbit_weapon_fires_without_target() {
        let mut w = weapon(WeaponKind::SquirrelBurst);
        w.update(3.4);
        assert!(matches!(w.try_fire(Vec2::ZERO, Vec2::X, &[]), Some(Shot::Radius(_))));
    }

    #[test]
    fn test_radius_weapon_lifecycle() {
        let mut r = orbit();
        assert!((r.pos() - Vec2::new(90.0, 0.0)).length() < 1e-4);

        r.update(0.5, Vec2::new(10.0, 0.0));
        assert!(r.is_active());
        assert_eq!(r.anchor, Vec2::new(10.0, 0.0));
        assert!((r.angle - 2.0).abs() < 1e-5);

        r.update(0.5, Vec2::ZERO);
        assert_eq!(r.phase, OrbitPhase::CoolingDown);
        let enemy = minion_at(1, r.pos());
        assert!(!r.hits(&enemy));

        r.update(0.5, Vec2::ZERO);
        assert!(r.dead);
    }

    #[test]
    fn test_radius_weapon_hits_once_per_enemy() {
        let mut r = orbit();
        let enemy = minion_at(7, Vec2::new(90.0, 0.0));
        assert!(r.hits(&enemy));
        assert!(r.register_hit(7));
        assert!(!r.register_hit(7));
        assert!(r.register_hit(8));
    }
}
