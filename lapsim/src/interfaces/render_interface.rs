use crate::core::aggregator::Aggregate;
use serde::Serialize;

pub const MAX_FRAME_UPDATE_FREQUENCY: f64 = 60.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// VehicleState contains everything a renderer needs to draw a vehicle.
///
/// * `x`, `y` - (m) Current coordinates
/// * `angle` - (rad) Heading in (-pi, pi]
/// * `speed` - (km/h) Current speed
/// * `segment_idx` - Index of the waypoint at the start of the current segment
#[derive(Debug, Clone, Default, Serialize)]
pub struct VehicleState {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub speed: f64,
    pub is_player: bool,
    pub color: RgbColor,
    pub segment_idx: usize,
}

/// FrameState is published by the real-time simulation loop.
#[derive(Debug, Clone)]
pub struct FrameState {
    pub vehicle_states: Vec<VehicleState>,
    pub lap_count: u32,
    pub elapsed_time: f64,
    pub waypoint_name: String,
    pub waypoint_description: String,
    pub aggregate: Option<Aggregate>,
}
