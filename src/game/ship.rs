use rand::Rng;

use super::body::{Body, Collider};
use super::bullet::Bullet;
use super::vector::Vec2;
use super::{
    ACCELERATION, HEIGHT, HYPERSPACE_RISK, INVINCIBILITY_FRAMES, SHIP_MAX_SPEED, SHOT_COOLDOWN_FRAMES, STARTING_LIVES,
    WIDTH,
};

const NOSE: Vec2 = Vec2::new(0.0, -20.0);
const BLINK_PERIOD: u32 = 10;

fn hull() -> Vec<Vec2> {
    vec![
        NOSE,
        Vec2::new(-12.0, 12.0),
        Vec2::new(0.0, 6.0),
        Vec2::new(12.0, 12.0),
    ]
}

/// Flame polygon drawn behind the ship while thrusting.
pub const THRUSTER: [Vec2; 3] = [
    Vec2::new(-6.0, 12.0),
    Vec2::new(0.0, 20.0),
    Vec2::new(6.0, 12.0),
];

#[derive(Debug, Clone)]
pub struct Ship {
    pub body: Body,
    pub direction: Vec2,
    pub thrusting: bool,
    pub shot_cooldown: u32,
    pub lives: u32,
    pub invincible: bool,
    pub invincible_frames: u32,
    pub blink: u32,
}

impl Ship {
    pub fn new(position: Vec2) -> Self {
        Self {
            body: Body::new(position, Vec2::ZERO, 0.0, 15.0).with_outline(hull()),
            direction: Vec2::heading(0.0),
            thrusting: false,
            shot_cooldown: 0,
            lives: STARTING_LIVES,
            invincible: false,
            invincible_frames: 0,
            blink: 0,
        }
    }

    pub fn centre() -> Vec2 {
        Vec2::new(WIDTH / 2.0, HEIGHT / 2.0)
    }

    pub fn update(&mut self) {
        self.direction = Vec2::heading(self.body.rotation);

        if self.thrusting {
            self.body.velocity += self.direction * ACCELERATION;
            self.body.velocity = self.body.velocity.clamp_length(SHIP_MAX_SPEED);
        }

        self.shot_cooldown = self.shot_cooldown.saturating_sub(1);

        if self.invincible {
            self.blink = (self.blink + 1) % BLINK_PERIOD;
            // The window covers INVINCIBILITY_FRAMES full updates after respawn
            if self.invincible_frames == 0 {
                self.invincible = false;
            } else {
                self.invincible_frames -= 1;
            }
        }

        self.body.advance();
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.body.rotation += degrees;
    }

    /// Fire from the nose, or `None` while the gun is cooling down.
    pub fn shoot(&mut self) -> Option<Bullet> {
        if self.shot_cooldown > 0 {
            return None;
        }
        self.shot_cooldown = SHOT_COOLDOWN_FRAMES;

        let muzzle = self.body.to_world(NOSE);
        let direction = Vec2::heading(self.body.rotation);
        Some(Bullet::new(muzzle, direction, self.body.velocity, false))
    }

    /// Jump to a random spot. Returns true when the jump destroyed the ship.
    pub fn hyperspace<R: Rng>(&mut self, rng: &mut R) -> bool {
        self.body.position = Vec2::new(rng.gen_range(0.0..WIDTH), rng.gen_range(0.0..HEIGHT));
        self.body.velocity = Vec2::ZERO;
        rng.gen_bool(HYPERSPACE_RISK)
    }

    pub fn respawn(&mut self) {
        self.body.position = Self::centre();
        self.body.velocity = Vec2::ZERO;
        self.body.rotation = 0.0;
        self.direction = Vec2::heading(0.0);
        self.invincible = true;
        self.invincible_frames = INVINCIBILITY_FRAMES;
        self.blink = 0;
    }

    /// Blink: hidden for half of each period while invincible.
    pub fn is_visible(&self) -> bool {
        !(self.invincible && self.blink < BLINK_PERIOD / 2)
    }

    pub fn speed(&self) -> f32 {
        self.body.velocity.length()
    }
}

impl Collider for Ship {
    fn body(&self) -> &Body {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BULLET_SPEED;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_speed_never_exceeds_max() {
        let mut ship = Ship::new(Ship::centre());
        ship.thrusting = true;
        for i in 0..2000 {
            if i % 37 == 0 {
                ship.rotate(23.0);
            }
            ship.update();
            assert!(ship.speed() <= SHIP_MAX_SPEED + 1e-4, "speed {}", ship.speed());
        }

        // Held on one heading the ship settles at the cap
        for _ in 0..400 {
            ship.update();
        }
        assert!((ship.speed() - SHIP_MAX_SPEED).abs() < 1e-3, "speed {}", ship.speed());
    }

    #[test]
    fn test_thrust_accelerates_along_heading() {
        let mut ship = Ship::new(Ship::centre());
        ship.thrusting = true;
        ship.update();
        assert!(ship.body.velocity.approx_eq(Vec2::new(0.0, -ACCELERATION), 1e-6));
    }

    #[test]
    fn test_cooldown_gates_shots() {
        let mut ship = Ship::new(Ship::centre());
        assert!(ship.shoot().is_some());
        ship.update();
        assert!(ship.shoot().is_none());
        for _ in 0..9 {
            ship.update();
        }
        assert!(ship.shoot().is_some());
    }

    #[test]
    fn test_bullet_leaves_from_nose() {
        let mut ship = Ship::new(Vec2::new(100.0, 100.0));
        ship.rotate(90.0);
        let bullet = ship.shoot().unwrap();
        assert!(bullet.body.position.approx_eq(Vec2::new(120.0, 100.0), 1e-4));
        assert!(bullet.body.velocity.approx_eq(Vec2::new(BULLET_SPEED, 0.0), 1e-4));
        assert!(!bullet.from_ufo);
        assert_eq!(ship.body.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_hyperspace_destroys_about_one_in_six() {
        let mut rng = StdRng::seed_from_u64(0xA57E);
        let mut ship = Ship::new(Ship::centre());
        let trials = 100_000;
        let mut destroyed = 0;
        for _ in 0..trials {
            ship.body.velocity = Vec2::new(3.0, 3.0);
            if ship.hyperspace(&mut rng) {
                destroyed += 1;
            }
            assert_eq!(ship.body.velocity, Vec2::ZERO);
            assert!(ship.body.position.x >= 0.0 && ship.body.position.x < WIDTH);
            assert!(ship.body.position.y >= 0.0 && ship.body.position.y < HEIGHT);
        }
        let fraction = destroyed as f64 / trials as f64;
        assert!((fraction - 1.0 / 6.0).abs() < 0.01, "fraction {fraction}");
    }

    #[test]
    fn test_invincibility_lasts_full_window_and_blinks() {
        let mut ship = Ship::new(Ship::centre());
        ship.respawn();
        let mut hidden = 0;
        for _ in 0..INVINCIBILITY_FRAMES {
            ship.update();
            assert!(ship.invincible);
            if !ship.is_visible() {
                hidden += 1;
            }
        }
        ship.update();
        assert!(!ship.invincible);
        assert!(ship.is_visible());
        assert_eq!(hidden, INVINCIBILITY_FRAMES / 2);
    }
}
