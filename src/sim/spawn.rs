//! Procedural spawning of obstacles, coins and the per-level power-up
//!
//! Every entity class has its own frame counter and randomized interval.
//! Parameters are drawn per spawn from variant ranges and clamped to the
//! variant's band, so nothing out of range can ever be created.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::Frame;
use super::state::{Coin, Obstacle, ObstacleKind, PowerUp, PowerUpKind, Session};
use crate::consts::*;

/// Obstacle species, in unlock order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Cactus,
    Boulder,
    Bat,
    Drone,
    Comet,
}

pub const ALL_SPECIES: [Species; 5] = [
    Species::Cactus,
    Species::Boulder,
    Species::Bat,
    Species::Drone,
    Species::Comet,
];

/// Airspace a flying species keeps to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightProfile {
    /// Highest allowed top edge
    pub ceiling: f32,
    /// Lowest allowed bottom edge
    pub floor: f32,
    pub amplitude: (f32, f32),
    /// Radians per second
    pub angular_speed: (f32, f32),
}

const BAT_FLIGHT: FlightProfile = FlightProfile {
    ceiling: 200.0,
    floor: 330.0,
    amplitude: (8.0, 24.0),
    angular_speed: (2.0, 4.0),
};

const DRONE_FLIGHT: FlightProfile = FlightProfile {
    ceiling: 140.0,
    floor: 300.0,
    amplitude: (15.0, 40.0),
    angular_speed: (3.0, 5.0),
};

const COMET_FLIGHT: FlightProfile = FlightProfile {
    ceiling: 40.0,
    floor: 260.0,
    amplitude: (30.0, 70.0),
    angular_speed: (4.0, 7.0),
};

impl Species {
    /// First level this species appears on
    pub fn unlock_level(self) -> u32 {
        match self {
            Species::Cactus | Species::Boulder => 1,
            Species::Bat => 2,
            Species::Drone => 3,
            Species::Comet => 4,
        }
    }

    pub fn base_size(self) -> Vec2 {
        match self {
            Species::Cactus => Vec2::new(30.0, 50.0),
            Species::Boulder => Vec2::new(44.0, 34.0),
            Species::Bat => Vec2::new(40.0, 24.0),
            Species::Drone => Vec2::new(50.0, 30.0),
            Species::Comet => Vec2::new(34.0, 34.0),
        }
    }

    /// Size multiplier range
    pub fn scale_range(self) -> (f32, f32) {
        match self {
            Species::Cactus => (0.8, 1.3),
            Species::Boulder => (0.8, 1.2),
            Species::Bat => (0.9, 1.2),
            Species::Drone => (0.8, 1.1),
            Species::Comet => (0.8, 1.3),
        }
    }

    pub fn flight(self) -> Option<&'static FlightProfile> {
        match self {
            Species::Cactus | Species::Boulder => None,
            Species::Bat => Some(&BAT_FLIGHT),
            Species::Drone => Some(&DRONE_FLIGHT),
            Species::Comet => Some(&COMET_FLIGHT),
        }
    }

    /// Species available on `level` (never empty)
    pub fn pool(level: u32) -> Vec<Species> {
        let level = level.max(1);
        ALL_SPECIES
            .into_iter()
            .filter(|s| s.unlock_level() <= level)
            .collect()
    }
}

/// Vertical bobbing of a flying obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub base_y: f32,
    pub amplitude: f32,
    /// Radians per second
    pub angular_speed: f32,
    pub phase: f32,
    /// Band the top edge is clamped to
    pub min_y: f32,
    pub max_y: f32,
}

impl Oscillation {
    /// Draw random parameters for a body of `height` inside `profile`
    pub fn draw(profile: &FlightProfile, height: f32, rng: &mut impl Rng) -> Self {
        let min_y = profile.ceiling;
        let max_y = (profile.floor - height).max(min_y);
        Self {
            base_y: rng.random_range(min_y..=max_y),
            amplitude: rng.random_range(profile.amplitude.0..=profile.amplitude.1),
            angular_speed: rng.random_range(profile.angular_speed.0..=profile.angular_speed.1),
            phase: rng.random_range(0.0..=TAU),
            min_y,
            max_y,
        }
    }

    /// Top edge at wall-clock time `t_secs`
    pub fn y_at(&self, t_secs: f64) -> f32 {
        let angle = t_secs * self.angular_speed as f64 + self.phase as f64;
        let y = self.base_y + angle.sin() as f32 * self.amplitude;
        y.clamp(self.min_y, self.max_y)
    }
}

/// Interval tuning for one entity class, in normalized frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    pub base: f32,
    pub shrink_per_level: f32,
    pub floor: f32,
    pub jitter: f32,
}

pub const OBSTACLE_CADENCE: Cadence = Cadence {
    base: 110.0,
    shrink_per_level: 10.0,
    floor: 45.0,
    jitter: 20.0,
};

pub const COIN_CADENCE: Cadence = Cadence {
    base: 140.0,
    shrink_per_level: 0.0,
    floor: 140.0,
    jitter: 40.0,
};

pub const POWER_UP_CADENCE: Cadence = Cadence {
    base: 600.0,
    shrink_per_level: 0.0,
    floor: 600.0,
    jitter: 120.0,
};

impl Cadence {
    /// Randomized interval for `level`
    pub fn interval(&self, level: u32, rng: &mut impl Rng) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        let base = (self.base - self.shrink_per_level * steps).max(self.floor);
        (base + rng.random_range(-self.jitter..=self.jitter)).max(1.0)
    }
}

/// Frames elapsed toward the next spawn
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnCounter {
    pub elapsed: f32,
    pub interval: f32,
}

impl SpawnCounter {
    fn armed(cadence: &Cadence, level: u32, rng: &mut impl Rng) -> Self {
        Self {
            elapsed: 0.0,
            interval: cadence.interval(level, rng),
        }
    }

    /// Count `frames`; true once the interval is exceeded
    pub fn advance(&mut self, frames: f32) -> bool {
        self.elapsed += frames;
        self.elapsed > self.interval
    }

    fn rearm(&mut self, cadence: &Cadence, level: u32, rng: &mut impl Rng) {
        *self = Self::armed(cadence, level, rng);
    }
}

/// Independent counters per entity class
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    pub obstacles: SpawnCounter,
    pub coins: SpawnCounter,
    pub power_up: SpawnCounter,
}

impl Spawner {
    pub fn new(level: u32, rng: &mut impl Rng) -> Self {
        Self {
            obstacles: SpawnCounter::armed(&OBSTACLE_CADENCE, level, rng),
            coins: SpawnCounter::armed(&COIN_CADENCE, level, rng),
            power_up: SpawnCounter::armed(&POWER_UP_CADENCE, level, rng),
        }
    }

    /// Restart every counter for a new level
    pub fn rearm(&mut self, level: u32, rng: &mut impl Rng) {
        *self = Self::new(level, rng);
    }
}

/// Build an obstacle at the right edge of the field
pub fn spawn_obstacle(id: u32, level: u32, now_ms: f64, rng: &mut impl Rng) -> Obstacle {
    let pool = Species::pool(level);
    let species = pool[rng.random_range(0..pool.len())];
    let (lo, hi) = species.scale_range();
    let size = species.base_size() * rng.random_range(lo..=hi);

    let oscillation = species
        .flight()
        .map(|profile| Oscillation::draw(profile, size.y, rng));

    let kind = match (species, oscillation) {
        (Species::Bat, Some(osc)) => ObstacleKind::Bat(osc),
        (Species::Drone, Some(osc)) => ObstacleKind::Drone(osc),
        (Species::Comet, Some(osc)) => ObstacleKind::Comet(osc),
        (Species::Boulder, _) => ObstacleKind::Boulder,
        _ => ObstacleKind::Cactus,
    };
    let y = match kind.oscillation() {
        Some(osc) => osc.y_at(now_ms / 1000.0),
        None => GROUND_LINE - size.y,
    };

    Obstacle {
        id,
        kind,
        pos: Vec2::new(FIELD_WIDTH, y),
        size,
    }
}

/// Build a coin at a reachable height
pub fn spawn_coin(id: u32, rng: &mut impl Rng) -> Coin {
    let y = rng.random_range(150.0..=GROUND_LINE - COIN_SIZE - 6.0);
    Coin {
        id,
        pos: Vec2::new(FIELD_WIDTH, y),
        size: Vec2::splat(COIN_SIZE),
        collected: false,
    }
}

pub fn spawn_power_up(id: u32, rng: &mut impl Rng) -> PowerUp {
    let y = rng.random_range(170.0..=GROUND_LINE - POWER_UP_SIZE - 20.0);
    PowerUp {
        id,
        kind: PowerUpKind::Grow,
        pos: Vec2::new(FIELD_WIDTH, y),
        size: Vec2::splat(POWER_UP_SIZE),
        collected: false,
    }
}

/// Advance spawn counters and create whatever is due.
///
/// All counters hold while invulnerable.
pub fn step(session: &mut Session, frame: Frame) {
    if session.is_invulnerable(frame.now_ms) {
        return;
    }
    let frames = frame.multiplier;
    let level = session.level;

    if session.spawner.obstacles.advance(frames) {
        session
            .spawner
            .obstacles
            .rearm(&OBSTACLE_CADENCE, level, &mut session.rng);
        let id = session.next_entity_id();
        let obstacle = spawn_obstacle(id, level, frame.now_ms, &mut session.rng);
        log::debug!(
            "Spawned {:?} #{} ({:.0}x{:.0})",
            obstacle.kind.species(),
            id,
            obstacle.size.x,
            obstacle.size.y
        );
        session.obstacles.push(obstacle);
    }

    if session.spawner.coins.advance(frames) {
        session
            .spawner
            .coins
            .rearm(&COIN_CADENCE, level, &mut session.rng);
        let id = session.next_entity_id();
        let coin = spawn_coin(id, &mut session.rng);
        session.coins.push(coin);
    }

    if !session.power_up_spawned && session.spawner.power_up.advance(frames) {
        session
            .spawner
            .power_up
            .rearm(&POWER_UP_CADENCE, level, &mut session.rng);
        let id = session.next_entity_id();
        let power_up = spawn_power_up(id, &mut session.rng);
        log::debug!("Spawned power-up #{} for level {}", id, level);
        session.power_ups.push(power_up);
        session.power_up_spawned = true;
    }
}
