use super::vector::Vec2;
use super::{HEIGHT, WIDTH};

/// Motion and shape shared by every entity on the playfield.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees, clockwise on screen
    pub rotation: f32,
    /// Local-space outline, drawn as a closed polyline
    pub outline: Vec<Vec2>,
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, rotation: f32, radius: f32) -> Self {
        Self {
            position,
            velocity,
            rotation,
            outline: Vec::new(),
            radius,
        }
    }

    pub fn with_outline(mut self, outline: Vec<Vec2>) -> Self {
        self.outline = outline;
        self
    }

    /// One tick of motion with toroidal wrap on both axes.
    pub fn advance(&mut self) {
        self.position = (self.position + self.velocity).wrapped(WIDTH, HEIGHT);
    }

    /// Circle-circle overlap of the collision radii.
    pub fn collides(&self, other: &Body) -> bool {
        self.position.distance_to(other.position) < self.radius + other.radius
    }

    /// Local point rotated by `rotation` then translated to `position`.
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        local.rotate(self.rotation.to_radians()) + self.position
    }

    pub fn world_outline(&self) -> Vec<Vec2> {
        self.outline.iter().map(|&p| self.to_world(p)).collect()
    }
}

/// Anything the controller tests for overlap.
pub trait Collider {
    fn body(&self) -> &Body;

    fn collides_with<T: Collider>(&self, other: &T) -> bool {
        self.body().collides(other.body())
    }
}

impl Collider for Body {
    fn body(&self) -> &Body {
        self
    }
}
