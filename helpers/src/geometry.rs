use crate::general::lerp;
use approx::ulps_eq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn as_vector2d(&self) -> Vector2d {
        Vector2d {
            dx: self.x,
            dy: self.y,
        }
    }
    /// vector_to returns the vector pointing from this point to the other point.
    pub fn vector_to(&self, other: &Point2d) -> Vector2d {
        other.as_vector2d().sub(&self.as_vector2d())
    }
    pub fn dist(&self, other: &Point2d) -> f64 {
        self.vector_to(other).abs()
    }
    /// lerp returns the point at fraction t on the straight line from this point to the other.
    pub fn lerp(&self, other: &Point2d, t: f64) -> Point2d {
        Point2d {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
        }
    }
}

impl PartialEq for Point2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.x, other.x) && ulps_eq!(self.y, other.y)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Vector2d {
    pub dx: f64,
    pub dy: f64,
}

impl Vector2d {
    pub fn sub(&self, other: &Self) -> Vector2d {
        Vector2d {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
        }
    }
    pub fn abs(&self) -> f64 {
        (self.dx.powf(2.0) + self.dy.powf(2.0)).sqrt()
    }
    /// angle returns the direction of the vector in radians, range (-pi, pi].
    pub fn angle(&self) -> f64 {
        self.dy.atan2(self.dx)
    }
}

impl PartialEq for Vector2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.dx, other.dx) && ulps_eq!(self.dy, other.dy)
    }
}
