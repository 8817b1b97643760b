use crate::core::track::{Segment, Track};
use crate::interfaces::render_interface::RgbColor;
use helpers::general::kmh_to_mps;
use helpers::geometry::Point2d;
use serde::{Deserialize, Serialize};

/// * `max_change_base` - (km/h) Maximum speed change per tick for a gain of 1.0 (calibrated for
/// 60 ticks per second, not scaled with the timestep size)
/// * `smoothing_factor` - Fraction of the remaining speed difference that is closed per tick
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PhysicsPars {
    pub max_change_base: f64,
    pub smoothing_factor: f64,
}

impl Default for PhysicsPars {
    fn default() -> Self {
        PhysicsPars {
            max_change_base: 20.0,
            smoothing_factor: 0.1,
        }
    }
}

/// A Vehicle follows the track waypoints. Its position is the normalized track position, i.e.
/// the covered fraction of the track length in [0, 1). Coordinates, heading, and target speed
/// are derived from the position and are refreshed in every call of `advance`.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub is_player: bool,
    pub color: RgbColor,
    pub position: f64,
    pub speed: f64,
    pub target_speed: f64,
    pub coords: Point2d,
    pub angle: f64,
    pub segment_idx: usize,
    start_position: f64,
    start_speed: f64,
}

impl Vehicle {
    pub fn new(
        is_player: bool,
        color: RgbColor,
        start_position: f64,
        start_speed: f64,
        track: &Track,
    ) -> Vehicle {
        let mut vehicle = Vehicle {
            is_player,
            color,
            position: start_position,
            speed: start_speed,
            target_speed: 0.0,
            coords: Point2d::default(),
            angle: 0.0,
            segment_idx: 0,
            start_position,
            start_speed,
        };
        vehicle.update_pose(track);
        vehicle
    }

    /// The method puts the vehicle back to its start position and speed.
    pub fn reset(&mut self, track: &Track) {
        self.position = self.start_position;
        self.speed = self.start_speed;
        self.update_pose(track);
    }

    /// The method derives coordinates, heading, and target speed from the current position. The
    /// heading is constant within a segment and jumps at the waypoints.
    fn update_pose<'a>(&mut self, track: &'a Track) -> Segment<'a> {
        let seg = track.segment_at(self.position);

        self.coords = seg.start.coords.lerp(&seg.end.coords, seg.local_t);
        self.angle = seg.start.coords.vector_to(&seg.end.coords).angle();
        self.target_speed = seg.start.target_speed;
        self.segment_idx = seg.idx;

        seg
    }

    /// The method advances the vehicle by one tick. Execution order:
    /// 1. Derive coordinates, heading, and target speed from the position at the beginning of
    /// the tick (the start waypoint of the current segment governs the target speed).
    /// 2. Move the speed towards the target speed. The change is the speed difference scaled by
    /// the smoothing factor, limited per tick to gain * max_change_base, where the gain is the
    /// acceleration or braking factor of the start waypoint.
    /// 3. Convert the new speed into a displacement for the timestep and update the position. A
    /// timestep <= 0 does not move the vehicle.
    /// 4. Wrap the position if the vehicle crossed the finish line.
    ///
    /// The method returns true if the vehicle completed a lap in this tick.
    pub fn advance(
        &mut self,
        track: &Track,
        timestep_size: f64,
        physics_pars: &PhysicsPars,
    ) -> bool {
        let seg = self.update_pose(track);

        // speed update
        let speed_diff = self.target_speed - self.speed;
        let gain = if speed_diff > 0.0 {
            seg.start.accel_factor
        } else {
            seg.start.brake_factor
        };
        let max_change = gain * physics_pars.max_change_base;
        let speed_change =
            (speed_diff * physics_pars.smoothing_factor).clamp(-max_change, max_change);

        self.speed += speed_change;

        // displacement
        if timestep_size > 0.0 {
            let dist = kmh_to_mps(self.speed) * timestep_size;
            self.position += dist / track.total_length();
        }

        // lap wrap (a single subtraction suffices since a tick covers much less than a lap)
        if self.position >= 1.0 {
            self.position -= 1.0;
            return true;
        }
        false
    }
}
