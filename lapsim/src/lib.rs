pub mod core;
pub mod interfaces;
pub mod post;
pub mod pre;

#[cfg(test)]
mod test_helpers {
    use crate::core::simulation::{FleetPars, HistoryPars, Simulation};
    use crate::core::track::{TrackPars, WaypointPars};
    use crate::core::vehicle::PhysicsPars;

    pub fn waypoint(x: f64, y: f64, target_speed: f64, factor: f64) -> WaypointPars {
        WaypointPars {
            x,
            y,
            target_speed,
            accel_factor: factor,
            brake_factor: factor,
            name: String::new(),
            description: String::new(),
        }
    }

    /// square track with an edge length of 100m (total length 400m)
    pub fn square_track_pars(target_speed: f64, factor: f64) -> TrackPars {
        TrackPars {
            name: String::from("Square"),
            waypoints: vec![
                waypoint(0.0, 0.0, target_speed, factor),
                waypoint(100.0, 0.0, target_speed, factor),
                waypoint(100.0, 100.0, target_speed, factor),
                waypoint(0.0, 100.0, target_speed, factor),
            ],
        }
    }

    pub fn fleet_pars(no_autonomous: u32, start_speed: f64) -> FleetPars {
        FleetPars {
            no_autonomous,
            start_speed,
            ..FleetPars::default()
        }
    }

    pub fn running_sim(no_autonomous: u32, start_speed: f64) -> Simulation {
        let mut sim = Simulation::new(
            &square_track_pars(100.0, 1.0),
            &fleet_pars(no_autonomous, start_speed),
            &PhysicsPars::default(),
            &HistoryPars::default(),
        )
        .unwrap();
        sim.start();
        sim
    }
}


#[cfg(test)]
mod vehicle_tests {
    use crate::core::track::{Track, TrackPars};
    use crate::core::vehicle::{PhysicsPars, Vehicle};
    use crate::interfaces::render_interface::RgbColor;
    use crate::test_helpers::{square_track_pars, waypoint};
    use approx::{assert_abs_diff_eq, assert_ulps_eq};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_vehicle_pose_on_creation() {
        let track = Track::new(&square_track_pars(100.0, 1.0)).unwrap();
        let vehicle = Vehicle::new(false, RgbColor::default(), 0.3, 0.0, &track);
        assert_abs_diff_eq!(vehicle.coords.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vehicle.coords.y, 20.0, epsilon = 1e-9);
        assert_ulps_eq!(vehicle.angle, FRAC_PI_2);
        assert_eq!(vehicle.segment_idx, 1);
    }
    #[test]
    fn test_vehicle_pose_is_resolved_before_moving() {
        let track = Track::new(&square_track_pars(100.0, 1.0)).unwrap();
        let mut vehicle = Vehicle::new(true, RgbColor::default(), 0.125, 100.0, &track);
        vehicle.advance(&track, 1.0, &PhysicsPars::default());
        assert_abs_diff_eq!(vehicle.coords.x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vehicle.coords.y, 0.0, epsilon = 1e-9);
        assert!(vehicle.position > 0.125);
    }
    #[test]
    fn test_vehicle_heading_is_piecewise_constant() {
        let track = Track::new(&square_track_pars(100.0, 1.0)).unwrap();
        let early = Vehicle::new(false, RgbColor::default(), 0.51, 0.0, &track);
        let late = Vehicle::new(false, RgbColor::default(), 0.74, 0.0, &track);
        let next = Vehicle::new(false, RgbColor::default(), 0.76, 0.0, &track);
        assert_ulps_eq!(early.angle, late.angle);
        assert_ulps_eq!(early.angle, std::f64::consts::PI);
        assert_ulps_eq!(next.angle, -FRAC_PI_2);
    }
    #[test]
    fn test_vehicle_target_speed_from_start_waypoint() {
        let track_pars = TrackPars {
            name: String::from("Line"),
            waypoints: vec![waypoint(0.0, 0.0, 50.0, 1.0), waypoint(100.0, 0.0, 200.0, 1.0)],
        };
        let track = Track::new(&track_pars).unwrap();
        let mut vehicle = Vehicle::new(false, RgbColor::default(), 0.45, 0.0, &track);
        vehicle.advance(&track, 0.0, &PhysicsPars::default());
        assert_ulps_eq!(vehicle.target_speed, 50.0);
        assert_ulps_eq!(vehicle.speed, 5.0);
    }
    #[test]
    fn test_vehicle_zero_timestep_does_not_move() {
        let track = Track::new(&square_track_pars(100.0, 1.0)).unwrap();
        let mut vehicle = Vehicle::new(false, RgbColor::default(), 0.2, 50.0, &track);
        assert!(!vehicle.advance(&track, 0.0, &PhysicsPars::default()));
        assert!(!vehicle.advance(&track, -0.5, &PhysicsPars::default()));
        assert_ulps_eq!(vehicle.position, 0.2);
    }
    #[test]
    fn test_vehicle_speed_change_bound() {
        let track_pars = TrackPars {
            name: String::from("Chicane"),
            waypoints: vec![
                waypoint(0.0, 0.0, 250.0, 0.5),
                waypoint(200.0, 0.0, 30.0, 0.25),
                waypoint(200.0, 50.0, 180.0, 0.8),
                waypoint(0.0, 50.0, 60.0, 0.1),
            ],
        };
        let track = Track::new(&track_pars).unwrap();
        let physics_pars = PhysicsPars::default();
        let mut vehicle = Vehicle::new(true, RgbColor::default(), 0.0, 0.0, &track);

        for _ in 0..2000 {
            let seg = track.segment_at(vehicle.position);
            let gain = if seg.start.target_speed > vehicle.speed {
                seg.start.accel_factor
            } else {
                seg.start.brake_factor
            };
            let speed_before = vehicle.speed;
            vehicle.advance(&track, 1.0 / 60.0, &physics_pars);
            assert!((vehicle.speed - speed_before).abs() <= gain * 20.0 + 1e-9);
        }
    }
    #[test]
    fn test_vehicle_speed_approaches_target() {
        let track = Track::new(&square_track_pars(100.0, 1.0)).unwrap();
        let physics_pars = PhysicsPars::default();
        let mut vehicle = Vehicle::new(true, RgbColor::default(), 0.0, 0.0, &track);

        for _ in 0..60 {
            vehicle.advance(&track, 1.0, &physics_pars);
            assert!(vehicle.speed <= 100.0 + 1e-9);
        }
        assert!((vehicle.speed - 100.0).abs() < 1.0);
    }
    #[test]
    fn test_vehicle_per_tick_cap() {
        let track = Track::new(&square_track_pars(300.0, 1.0)).unwrap();
        let mut vehicle = Vehicle::new(true, RgbColor::default(), 0.0, 0.0, &track);
        // the raw change of 30km/h is capped to 20km/h, independent of the timestep size
        vehicle.advance(&track, 0.001, &PhysicsPars::default());
        assert_ulps_eq!(vehicle.speed, 20.0);
    }
    #[test]
    fn test_vehicle_lap_wrap() {
        let track = Track::new(&square_track_pars(100.0, 1.0)).unwrap();
        let mut vehicle = Vehicle::new(true, RgbColor::default(), 0.99, 100.0, &track);
        // 100km/h for 1s covers 27.78m, i.e. about 0.069 laps
        assert!(vehicle.advance(&track, 1.0, &PhysicsPars::default()));
        assert!(vehicle.position >= 0.0 && vehicle.position < 1.0);
        assert_abs_diff_eq!(vehicle.position, 0.99 + 100.0 / 3.6 / 400.0 - 1.0, epsilon = 1e-12);
    }
    #[test]
    fn test_vehicle_reset() {
        let track = Track::new(&square_track_pars(100.0, 1.0)).unwrap();
        let mut vehicle = Vehicle::new(false, RgbColor::default(), 0.5, 10.0, &track);
        for _ in 0..10 {
            vehicle.advance(&track, 0.1, &PhysicsPars::default());
        }
        vehicle.reset(&track);
        assert_ulps_eq!(vehicle.position, 0.5);
        assert_ulps_eq!(vehicle.speed, 10.0);
        assert_ulps_eq!(vehicle.coords.x, 100.0);
        assert_ulps_eq!(vehicle.coords.y, 100.0);
    }
}



#[cfg(test)]
mod handle_sim_tests {
    use crate::core::handle_sim::{handle_sim, AggregateThrottle};
    use crate::pre::read_sim_pars::SimPars;
    use crate::test_helpers::{fleet_pars, square_track_pars};
    use approx::assert_abs_diff_eq;

    fn sim_pars() -> SimPars {
        SimPars {
            track_pars: square_track_pars(100.0, 1.0),
            fleet_pars: fleet_pars(2, 0.0),
            physics_pars: Default::default(),
            history_pars: Default::default(),
        }
    }

    #[test]
    fn test_aggregate_throttle() {
        let mut throttle = AggregateThrottle::new(0.5);
        let mut no_due = 0;
        for i in 1..=120 {
            if throttle.is_due(i as f64 / 60.0) {
                no_due += 1;
            }
        }
        assert_eq!(no_due, 4);
    }
    #[test]
    fn test_handle_sim_headless() {
        let result = handle_sim(&sim_pars(), 0.1, 10.0, None, 1.0).unwrap();
        assert_abs_diff_eq!(result.elapsed_time, 10.0, epsilon = 1e-9);
        assert_eq!(result.no_samples, 100);
        assert_eq!(result.vehicle_states.len(), 3);
        assert!(result.get_scatter_trace().is_some());
        assert!(result.get_bucket_table().contains("km/h"));
    }
    #[test]
    fn test_handle_sim_too_short_for_aggregation() {
        let result = handle_sim(&sim_pars(), 0.1, 0.5, None, 1.0).unwrap();
        assert!(result.aggregate.is_insufficient());
        assert!(result.get_scatter_trace().is_none());
        assert!(result.get_bucket_table().contains("insufficient data"));
    }
    #[test]
    fn test_handle_sim_realtime_publishes_frames() {
        let (tx, rx) = flume::unbounded();
        let result = handle_sim(&sim_pars(), 0.1, 1.5, Some(&tx), 100.0).unwrap();
        let frames: Vec<_> = rx.try_iter().collect();
        assert_eq!(frames.len(), 15);
        assert_eq!(frames[0].vehicle_states.len(), 3);
        assert!(frames.last().unwrap().aggregate.is_some());
        assert_abs_diff_eq!(result.elapsed_time, 1.5, epsilon = 1e-9);
    }
    #[test]
    fn test_handle_sim_invalid_pars() {
        let mut sim_pars = sim_pars();
        sim_pars.track_pars.waypoints.truncate(1);
        assert!(handle_sim(&sim_pars, 0.1, 1.0, None, 1.0).is_err());
    }
}
