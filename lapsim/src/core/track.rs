use anyhow::Context;
use helpers::general::ConfigurationError;
use helpers::geometry::Point2d;
use serde::{Deserialize, Serialize};

/// * `x` - (m) x coordinate of the waypoint
/// * `y` - (m) y coordinate of the waypoint
/// * `target_speed` - (km/h) Target speed on the segment that starts at this waypoint
/// * `accel_factor` - Gain in [0, 1] applied if the vehicle is slower than the target speed
/// * `brake_factor` - Gain in [0, 1] applied if the vehicle is faster than the target speed
/// * `name` - Display name, e.g. Turn 1
/// * `description` - Free text shown next to the name
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WaypointPars {
    pub x: f64,
    pub y: f64,
    pub target_speed: f64,
    pub accel_factor: f64,
    pub brake_factor: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// * `name` - Track name
/// * `waypoints` - Waypoints in driving order, the last one is connected to the first one
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrackPars {
    pub name: String,
    pub waypoints: Vec<WaypointPars>,
}

#[derive(Debug, Clone)]
pub struct Waypoint {
    pub coords: Point2d,
    pub target_speed: f64,
    pub accel_factor: f64,
    pub brake_factor: f64,
    pub name: String,
    pub description: String,
}

/// Segment is the result of a track lookup: the waypoints at the start and at the end of the
/// segment that contains the looked-up position and the fractional progress within it.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub idx: usize,
    pub start: &'a Waypoint,
    pub end: &'a Waypoint,
    pub local_t: f64,
}

/// The Track is a closed loop of waypoints, i.e. segment i runs from waypoint i to waypoint
/// (i + 1) % n. It is immutable after construction.
#[derive(Debug)]
pub struct Track {
    pub name: String,
    waypoints: Vec<Waypoint>,
    length: f64,
}

impl Track {
    pub fn new(track_pars: &TrackPars) -> anyhow::Result<Track> {
        // check input
        if track_pars.waypoints.len() < 2 {
            return Err(ConfigurationError).context(format!(
                "Track {} must contain at least 2 waypoints, but contains {}!",
                track_pars.name,
                track_pars.waypoints.len()
            ));
        }

        for (i, wp) in track_pars.waypoints.iter().enumerate() {
            if !(wp.x.is_finite() && wp.y.is_finite()) {
                return Err(ConfigurationError)
                    .context(format!("Coordinates of waypoint {} are not finite!", i));
            }
            if !wp.target_speed.is_finite() || wp.target_speed < 0.0 {
                return Err(ConfigurationError).context(format!(
                    "Target speed of waypoint {} must be finite and non-negative, but is {}!",
                    i, wp.target_speed
                ));
            }
            if !(0.0..=1.0).contains(&wp.accel_factor) || !(0.0..=1.0).contains(&wp.brake_factor)
            {
                return Err(ConfigurationError).context(format!(
                    "Acceleration and braking factors of waypoint {} must be within [0.0, 1.0]!",
                    i
                ));
            }
        }

        // create waypoints
        let waypoints: Vec<Waypoint> = track_pars
            .waypoints
            .iter()
            .map(|wp| Waypoint {
                coords: Point2d { x: wp.x, y: wp.y },
                target_speed: wp.target_speed,
                accel_factor: wp.accel_factor,
                brake_factor: wp.brake_factor,
                name: wp.name.to_owned(),
                description: wp.description.to_owned(),
            })
            .collect();

        // calculate segment lengths (closing segment included)
        let no_wps = waypoints.len();
        let seg_lengths: Vec<f64> = (0..no_wps)
            .map(|i| waypoints[i].coords.dist(&waypoints[(i + 1) % no_wps].coords))
            .collect();
        let length: f64 = seg_lengths.iter().sum();

        if !(length > 0.0 && length.is_finite()) {
            return Err(ConfigurationError).context(format!(
                "Total length of track {} must be positive and finite, but is {}!",
                track_pars.name, length
            ));
        }

        Ok(Track {
            name: track_pars.name.to_owned(),
            waypoints,
            length,
        })
    }

    /// The method returns the segment that belongs to the inserted normalized track position as
    /// well as the progress within that segment. The position is wrapped into [0, 1) first. All
    /// segments cover the same share of the normalized position, independent of their length.
    pub fn segment_at(&self, position: f64) -> Segment<'_> {
        let no_segs = self.waypoints.len();
        let mut progress = position.rem_euclid(1.0);

        // rem_euclid returns exactly 1.0 for tiny negative inputs
        if progress >= 1.0 {
            progress = 0.0
        }

        let scaled = progress * no_segs as f64;
        let idx = (scaled.floor() as usize).min(no_segs - 1);

        Segment {
            idx,
            start: &self.waypoints[idx],
            end: &self.waypoints[(idx + 1) % no_segs],
            local_t: (scaled - idx as f64).clamp(0.0, 1.0 - f64::EPSILON),
        }
    }

    pub fn total_length(&self) -> f64 {
        self.length
    }

    /// The method returns the display name of the waypoint at the inserted index, falling back
    /// to a generic label if the waypoint is unnamed.
    pub fn get_waypoint_name(&self, idx: usize) -> String {
        match self.waypoints.get(idx) {
            Some(wp) if !wp.name.is_empty() => wp.name.to_owned(),
            _ => format!("WP{}", idx + 1),
        }
    }

    /// The method returns the description of the waypoint at the inserted index (empty if there
    /// is none).
    pub fn get_waypoint_description(&self, idx: usize) -> String {
        self.waypoints
            .get(idx)
            .map_or_else(String::new, |wp| wp.description.to_owned())
    }
}
