use crate::core::aggregator::{aggregate, Aggregate, Sample};
use crate::core::clock::SimClock;
use crate::core::track::{Track, TrackPars};
use crate::core::vehicle::{PhysicsPars, Vehicle};
use crate::interfaces::render_interface::{RgbColor, VehicleState};
use anyhow::Context;
use helpers::buffer::RingBuffer;
use helpers::general::{kmh_to_mps, ConfigurationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// * `no_autonomous` - Number of autonomous vehicles driving next to the player vehicle
/// * `start_speed` - (km/h) Speed of all vehicles at the simulation start
/// * `player_color` - CSS color of the player vehicle, e.g. #e10600
/// * `autonomous_colors` - CSS colors of the autonomous vehicles (cycled if there are more
/// vehicles than colors)
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FleetPars {
    pub no_autonomous: u32,
    pub start_speed: f64,
    pub player_color: String,
    pub autonomous_colors: Vec<String>,
}

impl Default for FleetPars {
    fn default() -> Self {
        FleetPars {
            no_autonomous: 3,
            start_speed: 0.0,
            player_color: String::from("#e10600"),
            autonomous_colors: vec![
                String::from("#00d2be"),
                String::from("#0600ef"),
                String::from("#ff8700"),
            ],
        }
    }
}

/// * `buffer_capacity` - Maximum number of samples kept in the history
/// * `bucket_size` - (km/h) Width of the speed buckets used for the aggregation
/// * `aggregate_interval` - (s) Simulated time between two aggregations in the simulation loop
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HistoryPars {
    pub buffer_capacity: usize,
    pub bucket_size: f64,
    pub aggregate_interval: f64,
}

impl Default for HistoryPars {
    fn default() -> Self {
        HistoryPars {
            buffer_capacity: 1000,
            bucket_size: 10.0,
            aggregate_interval: 0.5,
        }
    }
}

/// The Simulation owns the track, the vehicles, the clock, and the sample history. The player
/// vehicle is always the first entry of the vehicles list.
#[derive(Debug)]
pub struct Simulation {
    pub track: Track,
    vehicles: Vec<Vehicle>,
    clock: SimClock,
    samples: RingBuffer<Sample>,
    physics_pars: PhysicsPars,
    bucket_size: f64,
}

impl Simulation {
    pub fn new(
        track_pars: &TrackPars,
        fleet_pars: &FleetPars,
        physics_pars: &PhysicsPars,
        history_pars: &HistoryPars,
    ) -> anyhow::Result<Simulation> {
        // check input
        if !(physics_pars.max_change_base >= 0.0 && physics_pars.max_change_base.is_finite()) {
            return Err(ConfigurationError).context(format!(
                "max_change_base must be finite and non-negative, but is {}!",
                physics_pars.max_change_base
            ));
        }
        if !(0.0 < physics_pars.smoothing_factor && physics_pars.smoothing_factor <= 1.0) {
            return Err(ConfigurationError).context(format!(
                "smoothing_factor is {}, which is not within the required range (0.0, 1.0]!",
                physics_pars.smoothing_factor
            ));
        }
        if !(history_pars.bucket_size > 0.0 && history_pars.bucket_size.is_finite()) {
            return Err(ConfigurationError).context(format!(
                "bucket_size must be positive, but is {}!",
                history_pars.bucket_size
            ));
        }
        if !(fleet_pars.start_speed >= 0.0 && fleet_pars.start_speed.is_finite()) {
            return Err(ConfigurationError).context(format!(
                "start_speed must be finite and non-negative, but is {}!",
                fleet_pars.start_speed
            ));
        }

        // create track and sample history
        let track = Track::new(track_pars)?;
        let samples = RingBuffer::new(history_pars.buffer_capacity).context(format!(
            "buffer_capacity must be at least one, but is {}!",
            history_pars.buffer_capacity
        ))?;

        // create vehicles, the player starts at the finish line and the autonomous vehicles are
        // spread evenly over the track
        let no_vehicles = fleet_pars.no_autonomous as usize + 1;
        let mut vehicles: Vec<Vehicle> = Vec::with_capacity(no_vehicles);

        vehicles.push(Vehicle::new(
            true,
            parse_color(&fleet_pars.player_color)?,
            0.0,
            fleet_pars.start_speed,
            &track,
        ));

        for i in 0..fleet_pars.no_autonomous as usize {
            let color = match fleet_pars.autonomous_colors.len() {
                0 => RgbColor {
                    r: 255,
                    g: 255,
                    b: 255,
                },
                n => parse_color(&fleet_pars.autonomous_colors[i % n])?,
            };

            vehicles.push(Vehicle::new(
                false,
                color,
                (i + 1) as f64 / no_vehicles as f64,
                fleet_pars.start_speed,
                &track,
            ));
        }

        Ok(Simulation {
            track,
            vehicles,
            clock: SimClock::default(),
            samples,
            physics_pars: physics_pars.to_owned(),
            bucket_size: history_pars.bucket_size,
        })
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method simulates one tick. Execution order:
    /// 1. Increment the simulated time (timesteps <= 0 do not change it).
    /// 2. Advance the player vehicle and count the lap if it crossed the finish line.
    /// 3. Advance the autonomous vehicles (they do not interact with each other).
    /// 4. Calculate the acceleration of the player vehicle with respect to the most recent sample
    /// and push the new sample to the history.
    ///
    /// Ticks are ignored while the clock is stopped.
    pub fn tick(&mut self, timestep_size: f64) {
        if !self.clock.is_running() {
            return;
        }

        // increment discretization variable
        self.clock.advance(timestep_size);

        // advance vehicles
        for vehicle in self.vehicles.iter_mut() {
            let new_lap = vehicle.advance(&self.track, timestep_size, &self.physics_pars);

            if new_lap && vehicle.is_player {
                self.clock.increment_lap_count();
                info!(
                    "Player completed lap {} after {:.3}s",
                    self.clock.get_lap_count(),
                    self.clock.get_elapsed_time()
                );
            }
        }

        // record sample of the player vehicle
        let speed = self.vehicles[0].speed;
        let speed_prev = self.samples.last().map_or(0.0, |sample| sample.speed);
        let acceleration = if timestep_size > 0.0 {
            kmh_to_mps(speed - speed_prev) / timestep_size
        } else {
            0.0
        };

        self.samples.push(Sample {
            speed,
            acceleration,
        });
    }

    // ---------------------------------------------------------------------------------------------
    // STATE HANDLING ------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn start(&mut self) {
        if !self.clock.is_running() {
            info!("Simulation started at {:.3}s", self.clock.get_elapsed_time());
        }
        self.clock.start()
    }

    pub fn stop(&mut self) {
        if self.clock.is_running() {
            info!("Simulation stopped at {:.3}s", self.clock.get_elapsed_time());
        }
        self.clock.stop()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// The method puts all vehicles back to their start configuration, zeroes time and lap count,
    /// and clears the sample history. It does not start or stop the simulation.
    pub fn reset(&mut self) {
        for vehicle in self.vehicles.iter_mut() {
            vehicle.reset(&self.track)
        }
        self.clock.reset();
        self.samples.clear();
        info!("Simulation reset");
    }

    // ---------------------------------------------------------------------------------------------
    // QUERIES -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn get_vehicle_states(&self) -> Vec<VehicleState> {
        self.vehicles
            .iter()
            .map(|vehicle| VehicleState {
                x: vehicle.coords.x,
                y: vehicle.coords.y,
                angle: vehicle.angle,
                speed: vehicle.speed,
                is_player: vehicle.is_player,
                color: vehicle.color,
                segment_idx: vehicle.segment_idx,
            })
            .collect()
    }

    pub fn get_player(&self) -> &Vehicle {
        &self.vehicles[0]
    }

    pub fn get_lap_count(&self) -> u32 {
        self.clock.get_lap_count()
    }

    pub fn get_elapsed_time(&self) -> f64 {
        self.clock.get_elapsed_time()
    }

    pub fn get_no_samples(&self) -> usize {
        self.samples.len()
    }

    /// The method returns a copy of the sample history (oldest sample first).
    pub fn get_samples(&self) -> Vec<Sample> {
        self.samples.snapshot()
    }

    /// The method aggregates a snapshot of the sample history using the configured bucket size.
    pub fn request_aggregate(&self) -> Aggregate {
        self.aggregate_history(self.bucket_size)
    }

    /// The method aggregates a snapshot of the sample history using the inserted bucket size,
    /// which must be positive and finite.
    pub fn request_aggregate_with(&self, bucket_size: f64) -> anyhow::Result<Aggregate> {
        if !(bucket_size > 0.0 && bucket_size.is_finite()) {
            return Err(ConfigurationError).context(format!(
                "bucket_size must be positive and finite, but is {}!",
                bucket_size
            ));
        }
        Ok(self.aggregate_history(bucket_size))
    }

    fn aggregate_history(&self, bucket_size: f64) -> Aggregate {
        let snapshot = self.samples.snapshot();
        let agg = aggregate(&snapshot, bucket_size);

        match agg.buckets() {
            Some(buckets) => debug!(
                "Aggregated {} samples into {} buckets",
                snapshot.len(),
                buckets.len()
            ),
            None => debug!("Not enough samples to aggregate ({})", snapshot.len()),
        }

        agg
    }
}

/// parse_color converts a CSS color string, e.g. a hex code, into an RGB color.
fn parse_color(color: &str) -> anyhow::Result<RgbColor> {
    let tmp_color = color
        .parse::<css_color_parser::Color>()
        .map_err(|_| ConfigurationError)
        .context(format!("Could not parse color {}!", color))?;

    Ok(RgbColor {
        r: tmp_color.r,
        g: tmp_color.g,
        b: tmp_color.b,
    })
}
