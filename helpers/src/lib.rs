pub mod buffer;
pub mod general;
pub mod geometry;


#[cfg(test)]
mod general_tests {
    use crate::general::{kmh_to_mps, lerp};
    use approx::assert_ulps_eq;

    #[test]
    fn test_lerp_1() {
        assert_ulps_eq!(lerp(1.0, 3.0, 0.25), 1.5);
    }
    #[test]
    fn test_lerp_2() {
        assert_ulps_eq!(lerp(100.0, 0.0, 0.5), 50.0);
    }
    #[test]
    fn test_kmh_to_mps() {
        assert_ulps_eq!(kmh_to_mps(36.0), 10.0);
    }
}

#[cfg(test)]
mod geometry_tests {
    use crate::geometry::{Point2d, Vector2d};
    use approx::assert_ulps_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_vector2d_sub() {
        let v1: Vector2d = Vector2d { dx: 5.0, dy: 5.0 };
        let v2: Vector2d = Vector2d { dx: 2.0, dy: -1.0 };
        assert_eq!(v1.sub(&v2), Vector2d { dx: 3.0, dy: 6.0 });
    }
    #[test]
    fn test_vector2d_abs() {
        let v1: Vector2d = Vector2d { dx: 5.0, dy: 5.0 };
        assert_ulps_eq!(v1.abs(), 50.0_f64.sqrt());
    }
    #[test]
    fn test_vector2d_angle() {
        assert_ulps_eq!(Vector2d { dx: 1.0, dy: 0.0 }.angle(), 0.0);
        assert_ulps_eq!(Vector2d { dx: 0.0, dy: 1.0 }.angle(), FRAC_PI_2);
        assert_ulps_eq!(Vector2d { dx: -1.0, dy: 0.0 }.angle(), PI);
    }
    #[test]
    fn test_point2d_lerp() {
        let p1 = Point2d { x: 0.0, y: 100.0 };
        let p2 = Point2d { x: 100.0, y: 0.0 };
        assert_eq!(p1.lerp(&p2, 0.25), Point2d { x: 25.0, y: 75.0 });
    }
    #[test]
    fn test_point2d_dist() {
        let p1 = Point2d { x: 1.0, y: 1.0 };
        let p2 = Point2d { x: 4.0, y: 5.0 };
        assert_ulps_eq!(p1.dist(&p2), 5.0);
    }
    #[test]
    fn test_point2d_vector_to() {
        let p1 = Point2d { x: 1.0, y: 1.0 };
        let p2 = Point2d { x: 4.0, y: -1.0 };
        assert_eq!(p1.vector_to(&p2), Vector2d { dx: 3.0, dy: -2.0 });
    }
}
