use super::body::{Body, Collider};
use super::vector::Vec2;
use super::{BULLET_LIFETIME_MS, BULLET_SPEED, FRAME_MS};

#[derive(Debug, Clone)]
pub struct Bullet {
    pub body: Body,
    pub lifetime_ms: f32,
    pub from_ufo: bool,
}

impl Bullet {
    /// Fired along `direction` on top of the shooter's own velocity.
    pub fn new(position: Vec2, direction: Vec2, shooter_velocity: Vec2, from_ufo: bool) -> Self {
        let velocity = shooter_velocity + direction * BULLET_SPEED;
        Self {
            body: Body::new(position, velocity, 0.0, 1.0)
                .with_outline(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)]),
            lifetime_ms: BULLET_LIFETIME_MS,
            from_ufo,
        }
    }

    pub fn update(&mut self) {
        self.body.advance();
        self.lifetime_ms -= FRAME_MS;
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime_ms <= 0.0
    }
}

impl Collider for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_inherits_shooter() {
        let b = Bullet::new(Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 2.0), false);
        assert_eq!(b.body.velocity, Vec2::new(BULLET_SPEED, 2.0));
    }

    #[test]
    fn test_expires_after_about_a_second() {
        let mut b = Bullet::new(Vec2::new(400.0, 300.0), Vec2::new(0.0, -1.0), Vec2::ZERO, false);
        let mut frames = 0;
        while !b.is_expired() {
            b.update();
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(frames, 60);
    }
}
