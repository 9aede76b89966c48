//! Collision detection and response
//!
//! Everything is axis-aligned boxes. The player's box comes from
//! `player_hitbox`, the only place the duck pose is turned into geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::Frame;
use super::scoring;
use super::state::{GameEvent, PlayerState, Session};
use crate::consts::*;

/// Axis-aligned bounding box (screen space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap; touching edges do not collide
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Current player hitbox.
///
/// Ducking swaps in a shorter, wider box pinned to the ground, whatever the
/// vertical position is.
pub fn player_hitbox(player: &PlayerState) -> Aabb {
    if player.ducking {
        let x = PLAYER_X + (PLAYER_WIDTH - DUCK_WIDTH) / 2.0;
        Aabb::from_pos_size(
            Vec2::new(x, GROUND_LINE - DUCK_HEIGHT),
            Vec2::new(DUCK_WIDTH, DUCK_HEIGHT),
        )
    } else {
        Aabb::from_pos_size(
            Vec2::new(PLAYER_X, player.y),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        )
    }
}

/// Resolve collisions for this tick.
///
/// Obstacles first: a lethal hit ends the run and nothing else is resolved.
/// Coins and power-ups are collected regardless of invulnerability.
pub fn resolve(session: &mut Session, frame: Frame, events: &mut Vec<GameEvent>) {
    let hitbox = player_hitbox(&session.player);

    for i in 0..session.obstacles.len() {
        if session.is_invulnerable(frame.now_ms) {
            break;
        }
        if !hitbox.intersects(&session.obstacles[i].hitbox()) {
            continue;
        }

        if session.player.powered_up {
            session.player.powered_up = false;
            session.grant_invulnerability(frame.now_ms, SHIELD_HIT_INVULNERABILITY_MS);
            log::info!("Shield absorbed hit from obstacle #{}", session.obstacles[i].id);
            events.push(GameEvent::PowerLost);
        } else {
            events.push(session.end_game());
            return;
        }
    }

    let mut bonus = 0;
    for coin in &mut session.coins {
        if !coin.collected && hitbox.intersects(&coin.hitbox()) {
            coin.collected = true;
            bonus += 1;
            events.push(GameEvent::CoinCollected { id: coin.id });
        }
    }
    session.coins.retain(|c| !c.collected);

    for power_up in &mut session.power_ups {
        if !power_up.collected && hitbox.intersects(&power_up.hitbox()) {
            power_up.collected = true;
            session.player.powered_up = true;
            events.push(GameEvent::PowerUpCollected { id: power_up.id });
        }
    }
    session.power_ups.retain(|p| !p.collected);

    for _ in 0..bonus {
        scoring::add_score(session, COIN_BONUS, frame.now_ms, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Coin, Obstacle, ObstacleKind, PowerUp, PowerUpKind, SessionPhase};
    use proptest::prelude::*;

    fn live_session() -> Session {
        let mut session = Session::new(1);
        session.phase = SessionPhase::Playing;
        session
    }

    /// An obstacle sitting right on the player
    fn cactus_on_player(id: u32) -> Obstacle {
        Obstacle {
            id,
            kind: ObstacleKind::Cactus,
            pos: Vec2::new(PLAYER_X + 5.0, GROUND_LINE - 50.0),
            size: Vec2::new(30.0, 50.0),
        }
    }

    #[test]
    fn test_strict_overlap() {
        let a = Aabb::from_pos_size(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::from_pos_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let overlapping = Aabb::from_pos_size(Vec2::new(9.9, 9.9), Vec2::splat(10.0));
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
    }

    #[test]
    fn test_duck_hitbox_is_smaller_and_grounded() {
        let mut player = PlayerState::default();
        let standing = player_hitbox(&player);
        player.ducking = true;
        let ducking = player_hitbox(&player);

        assert!(ducking.size().y < standing.size().y);
        assert_eq!(ducking.max.y, GROUND_LINE);
        assert!((ducking.center().x - standing.center().x).abs() < 1e-4);

        // Duck box ignores the vertical position
        player.y = GROUND_Y - 50.0;
        assert_eq!(player_hitbox(&player), ducking);
    }

    #[test]
    fn test_ducking_clears_a_bat() {
        let bat = Aabb::from_pos_size(Vec2::new(PLAYER_X, 285.0), Vec2::new(40.0, 24.0));
        let mut player = PlayerState::default();
        assert!(player_hitbox(&player).intersects(&bat));
        player.ducking = true;
        assert!(!player_hitbox(&player).intersects(&bat));
    }

    #[test]
    fn test_hit_without_shield_ends_run() {
        let mut session = live_session();
        session.score = 457;
        session.obstacles.push(cactus_on_player(1));
        let mut events = Vec::new();
        resolve(&mut session, Frame::nominal(100.0), &mut events);

        assert_eq!(session.phase, SessionPhase::GameOver);
        let summary = session.summary().unwrap();
        assert_eq!(summary.final_score, 457);
        assert_eq!(summary.derived_xp, 45);
        assert!(matches!(events.last(), Some(GameEvent::GameOver(_))));
    }

    #[test]
    fn test_hit_with_shield_consumes_it() {
        let mut session = live_session();
        session.player.powered_up = true;
        session.obstacles.push(cactus_on_player(1));
        session.obstacles.push(cactus_on_player(2));
        let mut events = Vec::new();
        resolve(&mut session, Frame::nominal(1_000.0), &mut events);

        assert_eq!(session.phase, SessionPhase::Playing);
        assert!(!session.player.powered_up);
        assert_eq!(
            session.invulnerable_until_ms,
            1_000.0 + SHIELD_HIT_INVULNERABILITY_MS
        );
        // The second overlapping obstacle falls inside the new window
        assert_eq!(events, vec![GameEvent::PowerLost]);
    }

    #[test]
    fn test_invulnerable_ignores_obstacles() {
        let mut session = live_session();
        session.invulnerable_until_ms = 5_000.0;
        session.obstacles.push(cactus_on_player(1));
        let mut events = Vec::new();
        resolve(&mut session, Frame::nominal(4_999.0), &mut events);
        assert_eq!(session.phase, SessionPhase::Playing);
        assert!(events.is_empty());
    }

    #[test]
    fn test_coin_adds_fifty_and_disappears() {
        let mut session = live_session();
        session.score = 10;
        session.coins.push(Coin {
            id: 7,
            pos: Vec2::new(PLAYER_X, GROUND_Y + 10.0),
            size: Vec2::splat(COIN_SIZE),
            collected: false,
        });
        session.coins.push(Coin {
            id: 8,
            pos: Vec2::new(600.0, 100.0),
            size: Vec2::splat(COIN_SIZE),
            collected: false,
        });
        // Collectibles work during invulnerability
        session.invulnerable_until_ms = 10_000.0;
        let mut events = Vec::new();
        resolve(&mut session, Frame::nominal(0.0), &mut events);

        assert_eq!(session.score, 10 + COIN_BONUS);
        assert_eq!(session.coins.len(), 1);
        assert_eq!(session.coins[0].id, 8);
        assert_eq!(events, vec![GameEvent::CoinCollected { id: 7 }]);
    }

    #[test]
    fn test_power_up_grants_shield() {
        let mut session = live_session();
        session.power_ups.push(PowerUp {
            id: 3,
            kind: PowerUpKind::Grow,
            pos: Vec2::new(PLAYER_X + 4.0, GROUND_Y + 4.0),
            size: Vec2::splat(POWER_UP_SIZE),
            collected: false,
        });
        let mut events = Vec::new();
        resolve(&mut session, Frame::nominal(0.0), &mut events);
        assert!(session.player.powered_up);
        assert!(session.power_ups.is_empty());
        assert_eq!(events, vec![GameEvent::PowerUpCollected { id: 3 }]);
    }

    proptest! {
        #[test]
        fn prop_intersects_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, aw in 0.1f32..200.0, ah in 0.1f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, bw in 0.1f32..200.0, bh in 0.1f32..200.0
        ) {
            let a = Aabb::from_pos_size(Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = Aabb::from_pos_size(Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn prop_no_state_change_while_invulnerable(
            x in -100.0f32..300.0, y in 0.0f32..400.0, now in 0.0f64..9_999.0, shield in any::<bool>()
        ) {
            let mut session = live_session();
            session.invulnerable_until_ms = 10_000.0;
            session.player.powered_up = shield;
            session.obstacles.push(Obstacle {
                id: 1,
                kind: ObstacleKind::Boulder,
                pos: Vec2::new(x, y),
                size: Vec2::new(44.0, 34.0),
            });
            let mut events = Vec::new();
            resolve(&mut session, Frame::nominal(now), &mut events);
            prop_assert_eq!(session.phase, SessionPhase::Playing);
            prop_assert_eq!(session.player.powered_up, shield);
            prop_assert_eq!(session.invulnerable_until_ms, 10_000.0);
        }
    }
}
