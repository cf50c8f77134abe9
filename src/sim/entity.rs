//! Entity data model: health, player, enemies, static obstacles and pickups
//!
//! Stat presets come from [`Tuning`] tables indexed by a closed kind enum, so every
//! instance carries its own configured stats.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Overlap, Placed, overlap};
use super::inventory::{Inventory, InventoryError, Item, ItemCategory, ItemKind};
use super::mask::{Shape, ShapeProvider, SpriteKey};
use super::weapon::{ActiveWeapon, Projectile};
use crate::Tuning;
use crate::consts::QUICKS_MULTIPLIER;

/// Stable entity identifier (allocated by the world)
pub type EntityId = u32;

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health dropped but stayed positive
    Survived,
    /// This hit took health to zero
    Killed,
    /// Target was already dead; nothing changed
    AlreadyDead,
}

/// Health pool. `current <= max` always; reaching zero is permanent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            dead: max <= 0.0,
        }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtract `amount`, clamping at zero. No overkill carry-over.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::AlreadyDead;
        }
        self.current = (self.current - amount.max(0.0)).max(0.0);
        if self.current <= 0.0 {
            self.dead = true;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Survived
        }
    }

    /// Restore up to max. Dead pools stay dead.
    pub fn heal(&mut self, amount: f32) {
        if !self.dead {
            self.current = (self.current + amount.max(0.0)).min(self.max);
        }
    }
}

/// Playable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterKind {
    CircleNinja,
    Ninjircle,
    /// Tridolf
    TriangleWizard,
    Sqwerewolf,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 4] = [
        CharacterKind::CircleNinja,
        CharacterKind::Ninjircle,
        CharacterKind::TriangleWizard,
        CharacterKind::Sqwerewolf,
    ];
}

/// Enemy variants; the last three are mini-bosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    Minion,
    AttackRobot,
    Starficer,
    Illuminawty,
    RobotBoss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Minion,
        EnemyKind::AttackRobot,
        EnemyKind::Starficer,
        EnemyKind::Illuminawty,
        EnemyKind::RobotBoss,
    ];

    pub fn is_elite(self) -> bool {
        matches!(
            self,
            EnemyKind::Starficer | EnemyKind::Illuminawty | EnemyKind::RobotBoss
        )
    }
}

/// Static scenery that blocks movers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Bush,
}

impl ObstacleKind {
    pub fn blocks_movers(self) -> bool {
        match self {
            ObstacleKind::Tree | ObstacleKind::Bush => true,
        }
    }

    /// Which parts collide when the player walks into this obstacle:
    /// (obstacle part, player part)
    pub fn player_rule(self) -> (super::collision::ShapePart, super::collision::ShapePart) {
        use super::collision::ShapePart;
        match self {
            ObstacleKind::Tree => (ShapePart::BottomThird, ShapePart::BottomThird),
            ObstacleKind::Bush => (ShapePart::Full, ShapePart::Full),
        }
    }
}

/// The local player
#[derive(Debug, Clone)]
pub struct Player {
    pub character: CharacterKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Speed before equipment
    pub base_speed: f32,
    /// Effective speed (base × equipment multipliers)
    pub speed: f32,
    pub health: Health,
    pub inventory: Inventory,
    /// Weapons currently auto-firing
    pub active_weapons: Vec<ActiveWeapon>,
    pub facing_left: bool,
    /// Fallback aim when no direction is supplied
    pub last_attack_direction: Vec2,
    /// Seconds since the last manual attack
    pub since_attack: f32,
    pub xp: u32,
    pub money: u32,
    pub shape: Shape,
}

impl Player {
    pub fn new(
        character: CharacterKind,
        pos: Vec2,
        tuning: &Tuning,
        shapes: &dyn ShapeProvider,
    ) -> Self {
        let stats = tuning.character(character);
        let mut player = Self {
            character,
            pos,
            radius: stats.radius,
            base_speed: stats.speed,
            speed: stats.speed,
            health: Health::new(stats.max_health),
            inventory: Inventory::new(),
            active_weapons: Vec::new(),
            facing_left: false,
            last_attack_direction: Vec2::X,
            since_attack: 0.0,
            xp: 0,
            money: 0,
            shape: shapes.shape(SpriteKey::Player(character)),
        };

        if let Some(weapon) = stats.starting_weapon {
            if let Err(err) = player.equip(Item::weapon(weapon), tuning) {
                log::warn!("starting weapon {weapon:?} not equipped: {err}");
            }
        }
        player
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        self.health.apply_damage(amount)
    }

    /// Add an item to the inventory and apply its effect
    pub fn equip(&mut self, item: Item, tuning: &Tuning) -> Result<(), InventoryError> {
        let kind = item.kind;
        self.inventory.add_item(item)?;
        match kind {
            ItemKind::Weapon(weapon) => {
                if !self.active_weapons.iter().any(|w| w.kind == weapon) {
                    self.active_weapons
                        .push(ActiveWeapon::new(weapon, tuning.weapon(weapon)));
                }
            }
            ItemKind::Equipment(_) => self.update_speed_from_equipment(),
            ItemKind::Relic(_) => {}
        }
        Ok(())
    }

    /// Remove an inventory slot and undo its effect
    pub fn unequip(&mut self, category: ItemCategory, slot: usize) -> Option<Item> {
        let item = self.inventory.remove_item(category, slot)?;
        match item.kind {
            ItemKind::Weapon(weapon) => {
                // Another copy may still be held
                if !self.inventory.holds_weapon(weapon) {
                    self.active_weapons.retain(|w| w.kind != weapon);
                }
            }
            ItemKind::Equipment(_) => self.update_speed_from_equipment(),
            ItemKind::Relic(_) => {}
        }
        Some(item)
    }

    /// Recompute speed from base and every equipped speed item
    pub fn update_speed_from_equipment(&mut self) {
        let quicks = self.inventory.quicks_count();
        self.speed = self.base_speed * QUICKS_MULTIPLIER.powi(quicks as i32);
    }

    pub fn update_attack_timer(&mut self, dt: f32) {
        self.since_attack += dt;
    }

    /// Manual attack: ready once the cooldown elapsed; firing resets the timer
    pub fn try_attack(&mut self, cooldown: f32) -> bool {
        if self.since_attack >= cooldown {
            self.since_attack = 0.0;
            true
        } else {
            false
        }
    }

    /// Basic projectile toward `direction` (or the last aim if zero)
    pub fn fire_projectile(&mut self, direction: Vec2, tuning: &Tuning) -> Projectile {
        let dir = direction.normalize_or_zero();
        if dir != Vec2::ZERO {
            self.last_attack_direction = dir;
        }
        let a = tuning.attack;
        Projectile::new(
            self.pos,
            self.last_attack_direction,
            a.speed,
            a.lifetime,
            a.damage,
            a.radius,
            SpriteKey::Weapon(None),
        )
    }
}

/// A hostile mover
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub speed: f32,
    pub health: Health,
    pub contact_damage: f32,
    pub contact_cooldown: f32,
    /// World time of the last successful contact hit (never moves backwards)
    last_contact: Option<f32>,
    pub shape: Shape,
}

impl Enemy {
    pub fn new(
        id: EntityId,
        kind: EnemyKind,
        pos: Vec2,
        tuning: &Tuning,
        shapes: &dyn ShapeProvider,
    ) -> Self {
        let stats = tuning.enemy(kind);
        Self {
            id,
            kind,
            pos,
            speed: stats.speed,
            health: Health::new(stats.max_health),
            contact_damage: stats.contact_damage,
            contact_cooldown: stats.contact_cooldown,
            last_contact: None,
            shape: shapes.shape(SpriteKey::Enemy(kind)),
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        self.health.apply_damage(amount)
    }

    pub fn last_contact(&self) -> Option<f32> {
        self.last_contact
    }

    /// True when a contact hit is allowed at time `now`
    pub fn contact_ready(&self, now: f32) -> bool {
        match self.last_contact {
            None => true,
            Some(t) => now - t >= self.contact_cooldown,
        }
    }

    /// Record a contact hit; the timestamp only advances
    pub fn mark_contact(&mut self, now: f32) {
        self.last_contact = Some(self.last_contact.map_or(now, |t| t.max(now)));
    }

    /// Full-sprite overlap with the player at its current position
    pub fn touches(&self, player: &Player) -> Overlap {
        overlap(
            Placed::full(&self.shape, self.pos),
            Placed::full(&player.shape, player.pos),
        )
    }
}

/// Immutable scenery placed at world generation
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub shape: Shape,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, pos: Vec2, shapes: &dyn ShapeProvider) -> Self {
        Self {
            kind,
            pos,
            shape: shapes.shape(SpriteKey::Obstacle(kind)),
        }
    }
}

/// Pickup payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PickupKind {
    Xp(u32),
    Money(u32),
    /// Heals a fixed amount
    Pie,
    /// Inventory item lying on the ground
    Ground(Item),
}

/// Sprite family for pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupSprite {
    Xp,
    Money,
    Pie,
    Item,
}

impl PickupKind {
    pub fn sprite(&self) -> PickupSprite {
        match self {
            PickupKind::Xp(_) => PickupSprite::Xp,
            PickupKind::Money(_) => PickupSprite::Money,
            PickupKind::Pie => PickupSprite::Pie,
            PickupKind::Ground(_) => PickupSprite::Item,
        }
    }
}

/// Collectible placed at world generation; flagged once collected
#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub picked: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            picked: false,
        }
    }

    pub fn in_reach(&self, player_pos: Vec2, radius: f32) -> bool {
        self.pos.distance(player_pos) <= radius
    }
}
