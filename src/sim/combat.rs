//! Combat resolution
//!
//! Runs after all movement for the tick. Removals are marked first and
//! compacted once per collection, so several hits in one pass never shift
//! indices under the loops.

use serde::{Deserialize, Serialize};

use super::collision::overlaps;
use super::state::{Bullet, BulletOwner, Enemy, Player};

/// What damaged the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCause {
    EnemyBullet,
    /// Direct contact with an enemy body
    EnemyContact,
}

/// Outcome of one collision, consumed by the score/lives tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A player bullet destroyed an enemy worth `points` (base * level)
    Hit { points: f64, row: u32, col: u32 },
    PlayerHit { cause: HitCause },
}

/// Resolve all collisions for this tick
///
/// - Each player bullet destroys at most one enemy (the first it overlaps).
/// - Enemy bullets that touch the player are consumed.
/// - Enemy bodies touching the player hurt it but stay alive.
pub fn resolve(
    player: &Player,
    enemies: &mut Vec<Enemy>,
    bullets: &mut Vec<Bullet>,
    base_points: f64,
    level: u32,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let mut bullet_dead = vec![false; bullets.len()];
    let mut enemy_dead = vec![false; enemies.len()];
    let points = base_points * level as f64;

    for (bi, bullet) in bullets.iter().enumerate() {
        match bullet.owner {
            BulletOwner::Player => {
                let target = enemies
                    .iter()
                    .enumerate()
                    .find(|(ei, enemy)| !enemy_dead[*ei] && overlaps(&bullet.bounds, &enemy.bounds));
                if let Some((ei, enemy)) = target {
                    bullet_dead[bi] = true;
                    enemy_dead[ei] = true;
                    events.push(CombatEvent::Hit {
                        points,
                        row: enemy.row,
                        col: enemy.col,
                    });
                }
            }
            BulletOwner::Enemy => {
                if overlaps(&bullet.bounds, &player.bounds) {
                    bullet_dead[bi] = true;
                    events.push(CombatEvent::PlayerHit {
                        cause: HitCause::EnemyBullet,
                    });
                }
            }
        }
    }

    // Enemy bodies are not removed on contact
    for (ei, enemy) in enemies.iter().enumerate() {
        if !enemy_dead[ei] && overlaps(&enemy.bounds, &player.bounds) {
            events.push(CombatEvent::PlayerHit {
                cause: HitCause::EnemyContact,
            });
        }
    }

    compact(bullets, &bullet_dead);
    compact(enemies, &enemy_dead);

    events
}

/// Drop every element whose flag is set, preserving order
fn compact<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut flags = dead.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Aabb;
    use crate::sim::state::Direction;
    use crate::tuning::Tuning;

    fn enemy(x: f32, y: f32, col: u32) -> Enemy {
        Enemy {
            bounds: Aabb::new(x, y, 40.0, 30.0),
            speed: 1.0,
            row: 0,
            col,
        }
    }

    fn bullet(x: f32, y: f32, owner: BulletOwner) -> Bullet {
        Bullet {
            bounds: Aabb::new(x, y, 4.0, 10.0),
            speed: 7.0,
            direction: match owner {
                BulletOwner::Player => Direction::Up,
                BulletOwner::Enemy => Direction::Down,
            },
            owner,
        }
    }

    fn player() -> Player {
        Player::new(&Tuning::default())
    }

    #[test]
    fn test_bullet_kills_one_enemy() {
        // Two overlapping enemies under one bullet: only the first dies
        let mut enemies = vec![enemy(100.0, 100.0, 0), enemy(110.0, 100.0, 1)];
        let mut bullets = vec![bullet(120.0, 110.0, BulletOwner::Player)];

        let events = resolve(&player(), &mut enemies, &mut bullets, 10.0, 2);

        assert_eq!(
            events,
            vec![CombatEvent::Hit {
                points: 20.0,
                row: 0,
                col: 0
            }]
        );
        assert!(bullets.is_empty());
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].col, 1);
    }

    #[test]
    fn test_two_bullets_two_enemies_same_tick() {
        let mut enemies = vec![
            enemy(100.0, 100.0, 0),
            enemy(200.0, 100.0, 1),
            enemy(300.0, 100.0, 2),
        ];
        let mut bullets = vec![
            bullet(310.0, 110.0, BulletOwner::Player),
            bullet(500.0, 300.0, BulletOwner::Player),
            bullet(110.0, 110.0, BulletOwner::Player),
        ];

        let events = resolve(&player(), &mut enemies, &mut bullets, 10.0, 1);

        assert_eq!(events.len(), 2);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].col, 1);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].bounds.x, 500.0);
    }

    #[test]
    fn test_second_bullet_skips_dead_enemy() {
        let mut enemies = vec![enemy(100.0, 100.0, 0)];
        let mut bullets = vec![
            bullet(110.0, 110.0, BulletOwner::Player),
            bullet(120.0, 110.0, BulletOwner::Player),
        ];
        let events = resolve(&player(), &mut enemies, &mut bullets, 10.0, 1);
        assert_eq!(events.len(), 1);
        assert!(enemies.is_empty());
        // The second bullet survives to keep flying
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].bounds.x, 120.0);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let p = player();
        let center = p.bounds.center();
        let mut enemies = Vec::new();
        let mut bullets = vec![
            bullet(center.x, center.y, BulletOwner::Enemy),
            // Player bullets never hurt the player
            bullet(center.x, center.y, BulletOwner::Player),
        ];

        let events = resolve(&p, &mut enemies, &mut bullets, 10.0, 1);

        assert_eq!(
            events,
            vec![CombatEvent::PlayerHit {
                cause: HitCause::EnemyBullet
            }]
        );
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].owner, BulletOwner::Player);
    }

    #[test]
    fn test_enemy_contact_keeps_enemy() {
        let p = player();
        let mut enemies = vec![enemy(p.bounds.x, p.bounds.y, 0)];
        let mut bullets = Vec::new();

        let events = resolve(&p, &mut enemies, &mut bullets, 10.0, 1);

        assert_eq!(
            events,
            vec![CombatEvent::PlayerHit {
                cause: HitCause::EnemyContact
            }]
        );
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn test_enemy_bullets_ignore_enemies() {
        let mut enemies = vec![enemy(100.0, 100.0, 0)];
        let mut bullets = vec![bullet(110.0, 110.0, BulletOwner::Enemy)];
        let events = resolve(&player(), &mut enemies, &mut bullets, 10.0, 1);
        assert!(events.is_empty());
        assert_eq!(enemies.len(), 1);
        assert_eq!(bullets.len(), 1);
    }
}
