use rand::Rng;

use super::body::{Body, Collider};
use super::bullet::Bullet;
use super::vector::{wrap_axis, Vec2};
use super::{FRAME_MS, HEIGHT, UFO_SHOOT_INTERVAL_MS, WIDTH};

/// Distance a saucer travels past the edge before it is gone
const EXIT_MARGIN: f32 = 20.0;
/// Saucers steer back when this close to the top or bottom
const VERTICAL_MARGIN: f32 = 50.0;
const WANDER_CHANCE: f64 = 0.02;
const LARGE_SPREAD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UfoSize {
    Small,
    Large,
}

impl UfoSize {
    pub fn radius(&self) -> f32 {
        match self {
            UfoSize::Small => 15.0,
            UfoSize::Large => 30.0,
        }
    }

    /// The small saucer is worth more: it is harder to hit.
    pub fn points(&self) -> u32 {
        match self {
            UfoSize::Small => 1000,
            UfoSize::Large => 200,
        }
    }

    fn outline(&self) -> Vec<Vec2> {
        let scale = match self {
            UfoSize::Small => 1.0,
            UfoSize::Large => 2.0,
        };
        [
            (-5.0, -2.0),
            (5.0, -2.0),
            (8.0, 0.0),
            (5.0, 2.0),
            (-5.0, 2.0),
            (-8.0, 0.0),
            (-5.0, -2.0),
            (-3.0, -4.0),
            (3.0, -4.0),
            (5.0, -2.0),
        ]
        .iter()
        .map(|&(x, y)| Vec2::new(x * scale, y * scale))
        .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Ufo {
    pub body: Body,
    pub size: UfoSize,
    pub score: u32,
    pub ms_since_last_shot: f32,
}

impl Ufo {
    /// Enter from a random side edge heading inward.
    pub fn new<R: Rng>(size: UfoSize, rng: &mut R) -> Self {
        let speed = rng.gen_range(1.0..=2.0);
        let (x, vx) = if rng.gen_bool(0.5) {
            (0.0, speed)
        } else {
            (WIDTH, -speed)
        };
        let y = rng.gen_range(VERTICAL_MARGIN as i32..=(HEIGHT - VERTICAL_MARGIN) as i32) as f32;

        Self {
            body: Body::new(Vec2::new(x, y), Vec2::new(vx, 0.0), 0.0, size.radius())
                .with_outline(size.outline()),
            size,
            score: size.points(),
            ms_since_last_shot: UFO_SHOOT_INTERVAL_MS,
        }
    }

    /// Move one tick. Returns false once the saucer has left the playfield.
    ///
    /// Saucers wrap vertically but not horizontally: they cross the screen
    /// once and leave by the opposite edge.
    pub fn update<R: Rng>(&mut self, rng: &mut R) -> bool {
        let body = &mut self.body;
        body.position.x += body.velocity.x;
        body.position.y = wrap_axis(body.position.y + body.velocity.y, HEIGHT);
        self.ms_since_last_shot += FRAME_MS;

        let heading_right = body.velocity.x > 0.0;
        if (heading_right && body.position.x > WIDTH + EXIT_MARGIN)
            || (!heading_right && body.position.x < -EXIT_MARGIN)
        {
            return false;
        }

        if rng.gen_bool(WANDER_CHANCE) {
            body.velocity.y = rng.gen_range(-1.0..=1.0);
        }

        if body.position.y < VERTICAL_MARGIN {
            body.velocity.y = body.velocity.y.abs();
        } else if body.position.y > HEIGHT - VERTICAL_MARGIN {
            body.velocity.y = -body.velocity.y.abs();
        }

        true
    }

    /// Aim at `target`, at most once per shot interval.
    pub fn shoot<R: Rng>(&mut self, target: Vec2, rng: &mut R) -> Option<Bullet> {
        if self.ms_since_last_shot < UFO_SHOOT_INTERVAL_MS {
            return None;
        }
        self.ms_since_last_shot = 0.0;

        let mut direction = (target - self.body.position).normalize();
        if self.size == UfoSize::Large {
            direction = direction.rotate(rng.gen_range(-LARGE_SPREAD..=LARGE_SPREAD));
        }

        Some(Bullet::new(self.body.position, direction, self.body.velocity, true))
    }
}

impl Collider for Ufo {
    fn body(&self) -> &Body {
        &self.body
    }
}
