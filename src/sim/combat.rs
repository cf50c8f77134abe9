//! Combat resolution
//!
//! Runs after projectiles and weapons moved and before enemies steer:
//! projectiles, then orbiting weapons, then contact damage on the player.
//! Enemies killed here stay in the list, flagged dead, until the tick ends.

use super::entity::{DamageOutcome, Enemy, Player};
use super::state::GameEvent;
use super::weapon::{Projectile, RadiusWeapon};

fn damage_enemy(enemy: &mut Enemy, amount: f32, events: &mut Vec<GameEvent>) {
    if enemy.take_damage(amount) == DamageOutcome::Killed {
        log::debug!("enemy {} ({:?}) killed", enemy.id, enemy.kind);
        events.push(GameEvent::EnemyKilled {
            id: enemy.id,
            kind: enemy.kind,
            pos: enemy.pos,
        });
    }
}

/// Each live projectile damages the first live enemy it touches and is spent
pub fn resolve_projectiles(
    projectiles: &mut [Projectile],
    enemies: &mut [Enemy],
    events: &mut Vec<GameEvent>,
) {
    for projectile in projectiles.iter_mut().filter(|p| !p.dead) {
        let target = enemies
            .iter_mut()
            .find(|e| !e.is_dead() && projectile.hits(e));
        if let Some(enemy) = target {
            damage_enemy(enemy, projectile.damage, events);
            projectile.kill();
        }
    }
}

/// Active orbiting weapons damage every enemy they touch, once per activation
pub fn resolve_radius_weapons(
    weapons: &mut [RadiusWeapon],
    enemies: &mut [Enemy],
    events: &mut Vec<GameEvent>,
) {
    for weapon in weapons.iter_mut().filter(|w| w.is_active()) {
        for enemy in enemies.iter_mut() {
            if enemy.is_dead() || !weapon.hits(enemy) {
                continue;
            }
            if weapon.register_hit(enemy.id) {
                damage_enemy(enemy, weapon.damage, events);
            }
        }
    }
}

/// Contact damage from every overlapping enemy whose own cooldown elapsed.
/// Only exact mask hits count. Returns true if the player died this call.
pub fn resolve_contact(
    enemies: &mut [Enemy],
    player: &mut Player,
    now: f32,
    events: &mut Vec<GameEvent>,
) -> bool {
    if player.is_dead() {
        return false;
    }
    for enemy in enemies.iter_mut().filter(|e| !e.is_dead()) {
        if !enemy.contact_ready(now) || !enemy.touches(player).is_hit() {
            continue;
        }
        enemy.mark_contact(now);
        let outcome = player.take_damage(enemy.contact_damage);
        events.push(GameEvent::PlayerDamaged {
            by: enemy.id,
            amount: enemy.contact_damage,
        });
        if outcome == DamageOutcome::Killed {
            events.push(GameEvent::PlayerDied);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::entity::{CharacterKind, EnemyKind};
    use crate::sim::inventory::WeaponKind;
    use crate::sim::mask::{PlaceholderShapes, SpriteKey};
    use glam::Vec2;

    fn enemy(id: u32, kind: EnemyKind, pos: Vec2) -> Enemy {
        Enemy::new(id, kind, pos, &Tuning::default(), &PlaceholderShapes)
    }

    fn player_at(pos: Vec2) -> Player {
        Player::new(CharacterKind::CircleNinja, pos, &Tuning::default(), &PlaceholderShapes)
    }

    fn shot(pos: Vec2, damage: f32) -> Projectile {
        Projectile::new(pos, Vec2::X, 0.0, 1.0, damage, 4.0, SpriteKey::Weapon(None))
    }

    #[test]
    fn test_projectile_hits_first_enemy_only() {
        let mut enemies = vec![
            enemy(1, EnemyKind::Starficer, Vec2::new(100.0, 100.0)),
            enemy(2, EnemyKind::Starficer, Vec2::new(105.0, 100.0)),
        ];
        let mut projectiles = vec![shot(Vec2::new(102.0, 100.0), 5.0)];
        let mut events = Vec::new();
        resolve_projectiles(&mut projectiles, &mut enemies, &mut events);

        assert!(projectiles[0].dead);
        assert_eq!(enemies[0].health.current(), 45.0);
        assert_eq!(enemies[1].health.current(), 50.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_projectile_skips_dead_enemy() {
        let mut dead = enemy(1, EnemyKind::Minion, Vec2::new(100.0, 100.0));
        dead.take_damage(5.0);
        let mut enemies = vec![dead, enemy(2, EnemyKind::Minion, Vec2::new(100.0, 100.0))];
        let mut projectiles = vec![shot(Vec2::new(100.0, 100.0), 2.0)];
        let mut events = Vec::new();
        resolve_projectiles(&mut projectiles, &mut enemies, &mut events);

        assert!(enemies[1].is_dead());
        assert_eq!(
            events,
            vec![GameEvent::EnemyKilled {
                id: 2,
                kind: EnemyKind::Minion,
                pos: Vec2::new(100.0, 100.0)
            }]
        );
    }

    #[test]
    fn test_radius_weapon_hits_many_but_each_once() {
        let mut weapons = vec![RadiusWeapon::new(
            WeaponKind::SquirrelBurst,
            Vec2::ZERO,
            15.0,
            90.0,
            50.0,
            4.0,
            3.0,
            0.7,
        )];
        let mut enemies = vec![
            enemy(1, EnemyKind::RobotBoss, Vec2::new(90.0, 0.0)),
            enemy(2, EnemyKind::RobotBoss, Vec2::new(95.0, 10.0)),
            enemy(3, EnemyKind::RobotBoss, Vec2::new(-90.0, 0.0)),
        ];
        let mut events = Vec::new();
        resolve_radius_weapons(&mut weapons, &mut enemies, &mut events);
        resolve_radius_weapons(&mut weapons, &mut enemies, &mut events);

        assert_eq!(enemies[0].health.current(), 35.0);
        assert_eq!(enemies[1].health.current(), 35.0);
        assert_eq!(enemies[2].health.current(), 50.0);
        assert!(!weapons[0].dead);
    }

    #[test]
    fn test_contact_cooldown_per_enemy() {
        let mut player = player_at(Vec2::new(500.0, 500.0));
        let mut enemies = vec![enemy(1, EnemyKind::Minion, Vec2::new(510.0, 500.0))];
        let mut events = Vec::new();
        let t0 = 3.0;

        resolve_contact(&mut enemies, &mut player, t0, &mut events);
        assert_eq!(player.health.current(), 99.0);

        resolve_contact(&mut enemies, &mut player, t0 + 0.5, &mut events);
        assert_eq!(player.health.current(), 99.0);

        resolve_contact(&mut enemies, &mut player, t0 + 0.8, &mut events);
        assert_eq!(player.health.current(), 98.0);
        assert_eq!(enemies[0].last_contact(), Some(t0 + 0.8));

        let damaged = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerDamaged { .. }))
            .count();
        assert_eq!(damaged, 2);
    }

    #[test]
    fn test_independent_contact_timers() {
        let mut player = player_at(Vec2::new(500.0, 500.0));
        let mut enemies = vec![
            enemy(1, EnemyKind::Minion, Vec2::new(510.0, 500.0)),
            enemy(2, EnemyKind::Minion, Vec2::new(490.0, 500.0)),
        ];
        enemies[0].mark_contact(0.0);
        let mut events = Vec::new();
        resolve_contact(&mut enemies, &mut player, 0.3, &mut events);
        // Only the second enemy is off cooldown
        assert_eq!(player.health.current(), 99.0);
        assert_eq!(enemies[1].last_contact(), Some(0.3));
    }

    #[test]
    fn test_contact_kills_player_once() {
        let mut player = player_at(Vec2::new(500.0, 500.0));
        player.take_damage(95.0);
        let mut enemies = vec![
            enemy(1, EnemyKind::Starficer, Vec2::new(510.0, 500.0)),
            enemy(2, EnemyKind::Starficer, Vec2::new(490.0, 500.0)),
        ];
        let mut events = Vec::new();
        assert!(resolve_contact(&mut enemies, &mut player, 1.0, &mut events));
        assert!(player.is_dead());
        assert_eq!(events.last(), Some(&GameEvent::PlayerDied));
        // Second enemy never got its hit in
        assert_eq!(enemies[1].last_contact(), None);
        assert!(!resolve_contact(&mut enemies, &mut player, 5.0, &mut events));
    }

    #[test]
    fn test_no_contact_when_apart() {
        let mut player = player_at(Vec2::new(500.0, 500.0));
        let mut enemies = vec![enemy(1, EnemyKind::Minion, Vec2::new(600.0, 500.0))];
        let mut events = Vec::new();
        resolve_contact(&mut enemies, &mut player, 1.0, &mut events);
        assert_eq!(player.health.current(), 100.0);
        assert!(events.is_empty());
    }
}
