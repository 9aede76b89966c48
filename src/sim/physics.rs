//! Player physics: gravity, jumps, fast-fall and ducking
//!
//! All per-frame quantities are scaled by the frame multiplier.

use super::clock::Frame;
use super::state::{GameEvent, PlayerState};
use super::tick::TickInput;
use crate::consts::*;

/// Which impulse a jump request produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    First,
    Double,
}

impl PlayerState {
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.y >= GROUND_Y
    }

    /// Jump if any of the two jumps are left
    pub fn jump(&mut self) -> Option<Jump> {
        if self.jump_count >= MAX_JUMPS {
            return None;
        }
        let jump = if self.jump_count == 0 {
            self.vy = JUMP_IMPULSE;
            Jump::First
        } else {
            self.vy = DOUBLE_JUMP_IMPULSE;
            Jump::Double
        };
        self.jump_count += 1;
        self.jumping = true;
        self.ducking = false;
        Some(jump)
    }

    /// Ground slam. Only airborne.
    pub fn slam(&mut self) -> bool {
        if self.is_grounded() {
            return false;
        }
        self.vy = SLAM_IMPULSE;
        self.ducking = false;
        true
    }

    /// Hold or release the duck pose. Only grounded players can duck.
    pub fn set_ducking(&mut self, held: bool) {
        self.ducking = held && self.is_grounded();
    }

    /// Apply gravity and integrate position, landing on the ground
    pub fn integrate(&mut self, multiplier: f32) {
        self.vy += GRAVITY * multiplier;
        self.y += self.vy * multiplier;

        if self.y >= GROUND_Y {
            self.y = GROUND_Y;
            self.vy = 0.0;
            self.jump_count = 0;
            self.jumping = false;
        } else {
            self.ducking = false;
        }
    }
}

/// Apply this tick's input, then integrate
pub fn step(player: &mut PlayerState, input: &TickInput, frame: Frame, events: &mut Vec<GameEvent>) {
    if input.jump {
        match player.jump() {
            Some(Jump::First) => events.push(GameEvent::Jumped),
            Some(Jump::Double) => events.push(GameEvent::DoubleJumped),
            None => {}
        }
    }
    if input.slam && player.slam() {
        events.push(GameEvent::Slammed);
    }
    if !input.jump {
        player.set_ducking(input.duck);
    }

    player.integrate(frame.multiplier);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ticks(player: &mut PlayerState, n: usize) {
        for _ in 0..n {
            player.integrate(1.0);
        }
    }

    #[test]
    fn test_jump_and_land() {
        let mut player = PlayerState::default();
        assert_eq!(player.jump(), Some(Jump::First));
        assert_eq!(player.vy, JUMP_IMPULSE);
        player.integrate(1.0);
        assert!(player.y < GROUND_Y);
        assert_eq!(player.jump_count, 1);

        ticks(&mut player, 200);
        assert_eq!(player.y, GROUND_Y);
        assert_eq!(player.jump_count, 0);
        assert!(!player.jumping);
    }

    #[test]
    fn test_double_jump_is_weaker_and_limited() {
        let mut player = PlayerState::default();
        player.jump();
        player.integrate(1.0);
        assert_eq!(player.jump(), Some(Jump::Double));
        assert_eq!(player.vy, DOUBLE_JUMP_IMPULSE);
        assert!(DOUBLE_JUMP_IMPULSE > JUMP_IMPULSE);
        player.integrate(1.0);
        assert_eq!(player.jump(), None);
        assert_eq!(player.jump_count, 2);
    }

    #[test]
    fn test_slam_only_airborne() {
        let mut player = PlayerState::default();
        assert!(!player.slam());
        player.jump();
        player.integrate(1.0);
        assert!(player.slam());
        assert_eq!(player.vy, SLAM_IMPULSE);
        player.integrate(1.0);
        player.integrate(1.0);
        // A slam from a low jump lands quickly
        ticks(&mut player, 10);
        assert!(player.is_grounded());
    }

    #[test]
    fn test_duck_only_grounded() {
        let mut player = PlayerState::default();
        player.set_ducking(true);
        assert!(player.ducking);
        player.set_ducking(false);
        assert!(!player.ducking);

        player.jump();
        player.integrate(1.0);
        player.set_ducking(true);
        assert!(!player.ducking);
    }

    #[test]
    fn test_jump_cancels_duck() {
        let mut player = PlayerState::default();
        player.set_ducking(true);
        player.jump();
        assert!(!player.ducking);
    }

    #[test]
    fn test_step_emits_events() {
        let mut player = PlayerState::default();
        let mut events = Vec::new();
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        step(&mut player, &input, Frame::nominal(0.0), &mut events);
        step(&mut player, &input, Frame::nominal(16.0), &mut events);
        step(&mut player, &input, Frame::nominal(32.0), &mut events);
        assert_eq!(events, vec![GameEvent::Jumped, GameEvent::DoubleJumped]);
    }

    #[test]
    fn test_jump_height_independent_of_frame_rate() {
        // Same wall time, 60 Hz vs 120 Hz callbacks
        let apex = |multiplier: f32, steps: usize| {
            let mut player = PlayerState::default();
            player.jump();
            let mut min_y = GROUND_Y;
            for _ in 0..steps {
                player.integrate(multiplier);
                min_y = min_y.min(player.y);
            }
            min_y
        };
        let at_60 = apex(1.0, 60);
        let at_120 = apex(0.5, 120);
        assert!((at_60 - at_120).abs() < 8.0, "{at_60} vs {at_120}");
    }

    proptest! {
        #[test]
        fn prop_jump_count_and_ground_invariants(
            actions in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), 0.05f32..6.0), 1..300)
        ) {
            let mut player = PlayerState::default();
            let mut events = Vec::new();
            for (jump, duck, slam, multiplier) in actions {
                let input = TickInput { jump, duck, slam };
                step(&mut player, &input, Frame { now_ms: 0.0, multiplier }, &mut events);
                prop_assert!(player.jump_count <= MAX_JUMPS);
                prop_assert!(player.y <= GROUND_Y);
                if player.y == GROUND_Y {
                    prop_assert_eq!(player.jump_count, 0);
                }
                if player.ducking {
                    prop_assert!(player.is_grounded());
                }
            }
        }
    }
}
