use std::f32::consts::TAU;

use rand::Rng;

use super::body::{Body, Collider};
use super::vector::Vec2;
use super::{ASTEROID_SPEED_RANGE, HEIGHT, WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn radius(&self) -> f32 {
        match self {
            AsteroidSize::Large => 40.0,
            AsteroidSize::Medium => 20.0,
            AsteroidSize::Small => 10.0,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    /// Size of the fragments and where they land relative to the parent
    fn fragments(&self) -> Option<(AsteroidSize, [Vec2; 2])> {
        match self {
            AsteroidSize::Large => Some((
                AsteroidSize::Medium,
                [Vec2::new(5.0, 5.0), Vec2::new(-5.0, -5.0)],
            )),
            AsteroidSize::Medium => Some((
                AsteroidSize::Small,
                [Vec2::new(5.0, 0.0), Vec2::new(0.0, 5.0)],
            )),
            AsteroidSize::Small => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub body: Body,
    pub size: AsteroidSize,
    pub rotation_speed: f32,
    pub score: u32,
}

impl Asteroid {
    pub fn new<R: Rng>(position: Vec2, size: AsteroidSize, rng: &mut R) -> Self {
        let (min_speed, max_speed) = ASTEROID_SPEED_RANGE;
        let speed = rng.gen_range(min_speed..max_speed);
        let heading = rng.gen_range(0.0..TAU);
        let velocity = Vec2::from_angle(heading) * speed;
        let rotation = rng.gen_range(0.0..360.0);

        let body = Body::new(position.wrapped(WIDTH, HEIGHT), velocity, rotation, size.radius())
            .with_outline(jagged_outline(size.radius(), rng));

        Self {
            body,
            size,
            rotation_speed: rng.gen_range(-2.0..=2.0),
            score: size.points(),
        }
    }

    pub fn update(&mut self) {
        self.body.advance();
        self.body.rotation += self.rotation_speed;
    }

    /// Two fresh rocks of the next size down, or nothing for the smallest.
    pub fn split<R: Rng>(&self, rng: &mut R) -> Vec<Asteroid> {
        match self.size.fragments() {
            Some((size, offsets)) => offsets
                .iter()
                .map(|&offset| Asteroid::new(self.body.position + offset, size, rng))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Collider for Asteroid {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// 7 to 12 vertices evenly spaced by angle, each pushed in or out by up to 20%.
fn jagged_outline<R: Rng>(radius: f32, rng: &mut R) -> Vec<Vec2> {
    let n = rng.gen_range(7..=12);
    (0..n)
        .map(|i| {
            let angle = i as f32 * (TAU / n as f32);
            let jitter: f32 = rng.gen_range(0.8..=1.2);
            Vec2::from_angle(angle) * (radius * jitter)
        })
        .collect()
}
