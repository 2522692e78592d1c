//! The playfield simulation: ship, bullets, rocks and saucers on an
//! 800x600 torus, advanced one frame at a time.
//!
//! [`Game`] owns every entity. Input is applied with [`Game::steer`],
//! [`Game::hyperspace`] and [`Game::restart`]; [`Game::step`] runs one frame.
//! Sound effects the frame produced are collected as [`Cue`]s and drained by
//! the caller.

pub mod asteroid;
pub mod body;
pub mod bullet;
pub mod ship;
pub mod ufo;
pub mod vector;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use crate::scores::ScoreStore;
use asteroid::{Asteroid, AsteroidSize};
use body::Collider;
use bullet::Bullet;
use ship::Ship;
use ufo::{Ufo, UfoSize};
use vector::Vec2;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const FPS: u32 = 60;
/// Simulated milliseconds per frame
pub const FRAME_MS: f32 = 16.67;

pub const ACCELERATION: f32 = 0.05;
pub const SHIP_MAX_SPEED: f32 = 5.0;
pub const ROTATION_STEP: f32 = 5.0;
pub const STARTING_LIVES: u32 = 3;
pub const SHOT_COOLDOWN_FRAMES: u32 = 10;
pub const INVINCIBILITY_FRAMES: u32 = 180;
pub const HYPERSPACE_RISK: f64 = 1.0 / 6.0;

pub const BULLET_SPEED: f32 = 10.0;
pub const BULLET_LIFETIME_MS: f32 = 1000.0;

pub const ASTEROID_SPEED_RANGE: (f32, f32) = (0.5, 2.0);
pub const INITIAL_ASTEROIDS: u32 = 4;
/// New rocks never appear closer than this to the ship
pub const SAFE_SPAWN_DISTANCE: f32 = 200.0;

pub const UFO_SPAWN_CHANCE: f64 = 0.002;
pub const SMALL_UFO_CHANCE: f64 = 0.4;
pub const UFO_SHOOT_INTERVAL_MS: f32 = 2000.0;

/// One-shot sound effects raised during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Fire,
    Explosion,
    Hyperspace,
}

/// Held controls for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    pub fire: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

pub struct Game {
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub ufos: Vec<Ufo>,
    phase: Phase,
    rng: StdRng,
    cues: Vec<Cue>,
    store: Box<dyn ScoreStore>,
}

impl Game {
    pub fn new(rng: StdRng, store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.load();
        info!(high_score, "loaded high score");
        let mut game = Self {
            score: 0,
            high_score,
            level: 1,
            ship: Ship::new(Ship::centre()),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            ufos: Vec::new(),
            phase: Phase::Playing,
            rng,
            cues: Vec::new(),
            store,
        };
        game.reset();
        game
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Thrust loop should be audible
    pub fn thrust_active(&self) -> bool {
        self.phase == Phase::Playing && self.ship.thrusting
    }

    /// Saucer loop should be audible
    pub fn saucer_active(&self) -> bool {
        self.phase == Phase::Playing && !self.ufos.is_empty()
    }

    pub fn drain_cues(&mut self) -> impl Iterator<Item = Cue> + '_ {
        self.cues.drain(..)
    }

    /// Apply held controls: rotate, thrust and fire.
    pub fn steer(&mut self, controls: Controls) {
        if self.is_over() {
            return;
        }
        if controls.rotate_left {
            self.ship.rotate(-ROTATION_STEP);
        }
        if controls.rotate_right {
            self.ship.rotate(ROTATION_STEP);
        }
        self.ship.thrusting = controls.thrust;
        if controls.fire {
            if let Some(bullet) = self.ship.shoot() {
                self.bullets.push(bullet);
                self.cues.push(Cue::Fire);
            }
        }
    }

    pub fn hyperspace(&mut self) {
        if self.is_over() {
            return;
        }
        self.cues.push(Cue::Hyperspace);
        if self.ship.hyperspace(&mut self.rng) {
            debug!("ship lost in hyperspace");
            self.ship_destroyed();
        }
    }

    /// Start a new game; ignored unless the current one is over.
    pub fn restart(&mut self) {
        if self.is_over() {
            self.reset();
        }
    }

    /// Advance the whole playfield by one frame.
    pub fn step(&mut self) {
        if self.is_over() {
            return;
        }

        self.ship.update();

        for bullet in &mut self.bullets {
            bullet.update();
        }
        self.bullets.retain(|b| !b.is_expired());

        if self.resolve_asteroids() || self.resolve_ufos() || self.resolve_enemy_fire() {
            return;
        }

        if self.rng.gen_bool(UFO_SPAWN_CHANCE) && self.ufos.is_empty() {
            let size = if self.rng.gen_bool(SMALL_UFO_CHANCE) {
                UfoSize::Small
            } else {
                UfoSize::Large
            };
            let ufo = Ufo::new(size, &mut self.rng);
            debug!(?size, y = ufo.body.position.y, "saucer incoming");
            self.ufos.push(ufo);
        }

        if self.asteroids.is_empty() {
            self.level += 1;
            info!(level = self.level, score = self.score, "field cleared");
            self.create_asteroids(INITIAL_ASTEROIDS + self.level);
        }
    }

    /// Move rocks and test them against the ship and player bullets.
    /// Returns true when the game ended this frame.
    fn resolve_asteroids(&mut self) -> bool {
        let mut spent = vec![false; self.bullets.len()];
        let mut destroyed = Vec::new();
        let mut ship_hit = false;

        for (ai, asteroid) in self.asteroids.iter_mut().enumerate() {
            asteroid.update();

            if !self.ship.invincible && asteroid.collides_with(&self.ship) {
                ship_hit = true;
                break;
            }

            // One bullet per rock, one rock per bullet
            let hit = (0..self.bullets.len()).find(|&bi| {
                !spent[bi] && !self.bullets[bi].from_ufo && asteroid.collides_with(&self.bullets[bi])
            });
            if let Some(bi) = hit {
                spent[bi] = true;
                destroyed.push(ai);
            }
        }

        remove_flagged(&mut self.bullets, &spent);
        // Highest index first so the remaining indices stay valid
        for &ai in destroyed.iter().rev() {
            self.destroy_asteroid(ai);
        }

        ship_hit && self.ship_destroyed()
    }

    /// Move saucers, let them shoot, and test them against the ship and
    /// player bullets. Returns true when the game ended this frame.
    fn resolve_ufos(&mut self) -> bool {
        let target = self.ship.body.position;
        let mut spent = vec![false; self.bullets.len()];
        let mut gone = vec![false; self.ufos.len()];
        let mut fired = Vec::new();
        let mut ship_hit = false;

        for (ui, ufo) in self.ufos.iter_mut().enumerate() {
            if !ufo.update(&mut self.rng) {
                debug!(size = ?ufo.size, "saucer left the field");
                gone[ui] = true;
                continue;
            }

            if let Some(bullet) = ufo.shoot(target, &mut self.rng) {
                fired.push(bullet);
                self.cues.push(Cue::Fire);
            }

            if !self.ship.invincible && ufo.collides_with(&self.ship) {
                gone[ui] = true;
                ship_hit = true;
                break;
            }

            let hit = (0..self.bullets.len()).find(|&bi| {
                !spent[bi] && !self.bullets[bi].from_ufo && ufo.collides_with(&self.bullets[bi])
            });
            if let Some(bi) = hit {
                spent[bi] = true;
                gone[ui] = true;
                self.score += ufo.score;
                self.cues.push(Cue::Explosion);
                debug!(size = ?ufo.size, score = self.score, "saucer destroyed");
            }
        }

        remove_flagged(&mut self.bullets, &spent);
        remove_flagged(&mut self.ufos, &gone);
        self.bullets.extend(fired);

        ship_hit && self.ship_destroyed()
    }

    /// Saucer bullets against the ship. Returns true when the game ended.
    fn resolve_enemy_fire(&mut self) -> bool {
        if self.ship.invincible {
            return false;
        }
        let ship = &self.ship;
        let hit = self
            .bullets
            .iter()
            .position(|b| b.from_ufo && b.collides_with(ship));
        match hit {
            Some(i) => {
                self.bullets.remove(i);
                self.ship_destroyed()
            }
            None => false,
        }
    }

    /// Score the rock at `index`, remove it and add its fragments.
    fn destroy_asteroid(&mut self, index: usize) {
        let asteroid = self.asteroids.remove(index);
        self.score += asteroid.score;
        self.cues.push(Cue::Explosion);
        let fragments = asteroid.split(&mut self.rng);
        debug!(
            size = ?asteroid.size,
            fragments = fragments.len(),
            score = self.score,
            "asteroid destroyed"
        );
        self.asteroids.extend(fragments);
    }

    /// Lose a life. On the last one the game ends and the high score is
    /// committed; otherwise the ship respawns invincible on a clean field
    /// (bullets and saucers cleared). Returns true when the game is over.
    pub fn ship_destroyed(&mut self) -> bool {
        self.cues.push(Cue::Explosion);
        self.ship.lives = self.ship.lives.saturating_sub(1);

        if self.ship.lives == 0 {
            self.phase = Phase::GameOver;
            self.ship.thrusting = false;
            info!(score = self.score, level = self.level, "game over");
            self.commit_high_score();
            return true;
        }

        debug!(lives = self.ship.lives, "ship destroyed");
        self.ship.respawn();
        self.bullets.clear();
        self.ufos.clear();
        false
    }

    /// Fresh ship, empty field, score zeroed, first wave spawned.
    pub fn reset(&mut self) {
        self.commit_high_score();
        self.ship = Ship::new(Ship::centre());
        self.asteroids.clear();
        self.bullets.clear();
        self.ufos.clear();
        self.cues.clear();
        self.score = 0;
        self.level = 1;
        self.phase = Phase::Playing;
        self.create_asteroids(INITIAL_ASTEROIDS);
        info!(high_score = self.high_score, "new game");
    }

    /// Save the high score on the way out if this run beat it.
    pub fn shutdown(&mut self) {
        self.commit_high_score();
    }

    fn commit_high_score(&mut self) {
        if self.score > self.high_score {
            info!(previous = self.high_score, score = self.score, "new high score");
            self.high_score = self.score;
            self.store.save(self.high_score);
        }
    }

    /// Large rocks at random spots outside the ship's safe zone.
    pub fn create_asteroids(&mut self, count: u32) {
        let ship = self.ship.body.position;
        for _ in 0..count {
            let position = loop {
                let candidate =
                    Vec2::new(self.rng.gen_range(0.0..WIDTH), self.rng.gen_range(0.0..HEIGHT));
                if candidate.distance_to(ship) > SAFE_SPAWN_DISTANCE {
                    break candidate;
                }
            };
            self.asteroids
                .push(Asteroid::new(position, AsteroidSize::Large, &mut self.rng));
        }
        debug!(count, level = self.level, "asteroids spawned");
    }
}

/// Drop every element whose flag is set. `flags` is indexed like `items`.
fn remove_flagged<T>(items: &mut Vec<T>, flags: &[bool]) {
    let mut i = 0;
    items.retain(|_| {
        let keep = !flags.get(i).copied().unwrap_or(false);
        i += 1;
        keep
    });
}
