//! Horizontal scrolling, flying-obstacle bobbing and off-screen pruning

use super::clock::Frame;
use super::state::Session;
use crate::consts::PRUNE_X;

/// Scroll every entity left and drop the ones past `PRUNE_X`
pub fn advance(session: &mut Session, frame: Frame) {
    let dx = session.scroll_speed * frame.multiplier;
    let t_secs = frame.now_ms / 1000.0;

    for obstacle in &mut session.obstacles {
        obstacle.pos.x -= dx;
        if let Some(osc) = obstacle.kind.oscillation() {
            obstacle.pos.y = osc.y_at(t_secs);
        }
    }
    for coin in &mut session.coins {
        coin.pos.x -= dx;
    }
    for power_up in &mut session.power_ups {
        power_up.pos.x -= dx;
    }

    session.obstacles.retain(|o| o.pos.x >= PRUNE_X);
    session.coins.retain(|c| c.pos.x >= PRUNE_X);
    session.power_ups.retain(|p| p.pos.x >= PRUNE_X);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::spawn::Oscillation;
    use crate::sim::state::{Coin, Obstacle, ObstacleKind};
    use glam::Vec2;

    fn bat_at(x: f32) -> Obstacle {
        Obstacle {
            id: 1,
            kind: ObstacleKind::Bat(Oscillation {
                base_y: 250.0,
                amplitude: 20.0,
                angular_speed: 3.0,
                phase: 0.0,
                min_y: 200.0,
                max_y: 300.0,
            }),
            pos: Vec2::new(x, 250.0),
            size: Vec2::new(40.0, 24.0),
        }
    }

    #[test]
    fn test_scrolls_by_speed_times_multiplier() {
        let mut session = Session::new(1);
        session.scroll_speed = 6.0;
        session.coins.push(Coin {
            id: 1,
            pos: Vec2::new(400.0, 200.0),
            size: Vec2::splat(COIN_SIZE),
            collected: false,
        });
        advance(&mut session, Frame { now_ms: 0.0, multiplier: 2.0 });
        assert_eq!(session.coins[0].pos.x, 388.0);
    }

    #[test]
    fn test_oscillation_follows_wall_clock() {
        let mut session = Session::new(1);
        session.scroll_speed = 0.0;
        session.obstacles.push(bat_at(500.0));

        let t = 0.5;
        advance(&mut session, Frame { now_ms: t * 1000.0, multiplier: 1.0 });
        let expected = 250.0 + (t * 3.0).sin() as f32 * 20.0;
        assert!((session.obstacles[0].pos.y - expected).abs() < 1e-3);

        // Same time, different multiplier: same height
        let mut other = Session::new(1);
        other.scroll_speed = 0.0;
        other.obstacles.push(bat_at(500.0));
        advance(&mut other, Frame { now_ms: t * 1000.0, multiplier: 4.0 });
        assert_eq!(other.obstacles[0].pos.y, session.obstacles[0].pos.y);
    }

    #[test]
    fn test_oscillation_is_clamped_to_band() {
        let osc = Oscillation {
            base_y: 290.0,
            amplitude: 50.0,
            angular_speed: 1.0,
            phase: 0.0,
            min_y: 260.0,
            max_y: 300.0,
        };
        for i in 0..100 {
            let y = osc.y_at(i as f64 * 0.1);
            assert!((260.0..=300.0).contains(&y));
        }
    }

    #[test]
    fn test_entities_past_left_edge_are_pruned() {
        let mut session = Session::new(1);
        session.scroll_speed = 10.0;
        session.obstacles.push(bat_at(PRUNE_X + 5.0));
        session.obstacles.push(bat_at(100.0));
        advance(&mut session, Frame::nominal(0.0));
        assert_eq!(session.obstacles.len(), 1);
        assert_eq!(session.obstacles[0].pos.x, 90.0);
    }
}
