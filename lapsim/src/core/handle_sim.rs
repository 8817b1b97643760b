use crate::core::aggregator::Aggregate;
use crate::core::simulation::Simulation;
use crate::interfaces::render_interface::{FrameState, MAX_FRAME_UPDATE_FREQUENCY};
use crate::post::sim_result::SimResult;
use crate::pre::read_sim_pars::SimPars;
use anyhow::Context;
use flume::Sender;
use helpers::buffer::RingBuffer;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// AggregateThrottle limits how often the sample history is aggregated: it fires at most once
/// per interval of simulated time.
#[derive(Debug)]
pub struct AggregateThrottle {
    interval: f64,
    t_prev: Option<f64>,
}

impl AggregateThrottle {
    pub fn new(interval: f64) -> AggregateThrottle {
        AggregateThrottle {
            interval,
            t_prev: None,
        }
    }

    /// The method returns true if at least one interval passed since it last returned true.
    /// A small tolerance compensates for accumulated timestep rounding.
    pub fn is_due(&mut self, elapsed_time: f64) -> bool {
        let due = match self.t_prev {
            Some(t_prev) => elapsed_time >= t_prev + self.interval - 1e-9,
            None => elapsed_time >= self.interval - 1e-9,
        };

        if due {
            self.t_prev = Some(elapsed_time)
        }
        due
    }
}

/// handle_sim creates a simulation on the basis of the inserted parameters, drives it for the
/// inserted simulated duration, and returns the result for post-processing. If a sender is
/// inserted, the simulation is executed in real time and frame states are published through it.
pub fn handle_sim(
    sim_pars: &SimPars,
    timestep_size: f64,
    duration: f64,
    tx: Option<&Sender<FrameState>>,
    realtime_factor: f64,
) -> anyhow::Result<SimResult> {
    // create the simulation
    let mut sim = Simulation::new(
        &sim_pars.track_pars,
        &sim_pars.fleet_pars,
        &sim_pars.physics_pars,
        &sim_pars.history_pars,
    )?;

    let no_steps = (duration / timestep_size).round() as u64;

    sim.start();

    match tx {
        None => {
            // NORMAL SIMULATION -------------------------------------------------------------------
            for _ in 0..no_steps {
                sim.tick(timestep_size);
            }
        }
        Some(tx) => {
            // REAL-TIME SIMULATION ----------------------------------------------------------------
            let mut t_sim_update_log = 0.0;
            let mut t_sim_update_frame = f64::NEG_INFINITY;
            let mut step_durations: RingBuffer<u32> = RingBuffer::new(60)?;
            let mut throttle = AggregateThrottle::new(sim_pars.history_pars.aggregate_interval);
            let mut latest_aggregate: Option<Aggregate> = None;
            let mut no_aggregations: u32 = 0;

            for _ in 0..no_steps {
                let t_start = Instant::now();

                // simulate time step
                sim.tick(timestep_size);

                if throttle.is_due(sim.get_elapsed_time()) {
                    latest_aggregate = Some(sim.request_aggregate());
                    no_aggregations += 1;
                }

                // log status (with a maximum of 1 Hz)
                if sim.get_elapsed_time() > t_sim_update_log + 0.9999 {
                    info!(
                        "Simulating... Current time is {:.3}s, current lap is {}, mean step \
                        duration is {:.1}ms",
                        sim.get_elapsed_time(),
                        sim.get_lap_count() + 1,
                        step_durations.get_avg().unwrap_or(0.0)
                    );
                    t_sim_update_log = sim.get_elapsed_time();
                }

                // publish frame state
                if sim.get_elapsed_time()
                    > t_sim_update_frame + 1.0 / MAX_FRAME_UPDATE_FREQUENCY - 0.001
                {
                    let frame_state = FrameState {
                        vehicle_states: sim.get_vehicle_states(),
                        lap_count: sim.get_lap_count(),
                        elapsed_time: sim.get_elapsed_time(),
                        waypoint_name: sim
                            .track
                            .get_waypoint_name(sim.get_player().segment_idx),
                        waypoint_description: sim
                            .track
                            .get_waypoint_description(sim.get_player().segment_idx),
                        aggregate: latest_aggregate.to_owned(),
                    };

                    tx.send(frame_state)
                        .context("Failed to send frame state to HUD!")?;
                    t_sim_update_frame = sim.get_elapsed_time();
                }

                // sleep until time step is finished in real-time as well (calculation in ms)
                let t_sleep = (timestep_size * 1000.0 / realtime_factor) as i64
                    - t_start.elapsed().as_millis() as i64;

                step_durations.push(t_start.elapsed().as_millis() as u32);

                if t_sleep > 0 {
                    sleep(Duration::from_millis(t_sleep as u64));
                } else if t_sleep < 0 {
                    warn!("Could not keep up with real-time!")
                }
            }

            debug!("Performed {} aggregations for the HUD", no_aggregations);
        }
    }

    sim.stop();

    // the final result always contains an aggregate of the complete history
    let final_aggregate = sim.request_aggregate();

    Ok(SimResult {
        track_name: sim.track.name.to_owned(),
        timestep_size,
        lap_count: sim.get_lap_count(),
        elapsed_time: sim.get_elapsed_time(),
        vehicle_states: sim.get_vehicle_states(),
        no_samples: sim.get_no_samples(),
        aggregate: final_aggregate,
    })
}
