use crate::core::aggregator::{Aggregate, ScatterTrace};
use crate::interfaces::render_interface::VehicleState;
use anyhow::Context;
use serde::Serialize;
use std::fmt::Write;
use std::fs::File;
use std::path::Path;

/// SimResult contains all simulation information that is required for post-processing.
#[derive(Debug, Clone)]
pub struct SimResult {
    pub track_name: String,
    pub timestep_size: f64,
    pub lap_count: u32,
    pub elapsed_time: f64,
    pub vehicle_states: Vec<VehicleState>,
    pub no_samples: usize,
    pub aggregate: Aggregate,
}

/// TraceExport is the JSON document that is written for an external 3D scatter chart.
#[derive(Debug, Serialize)]
struct TraceExport<'a> {
    track_name: &'a str,
    elapsed_time: f64,
    no_samples: usize,
    trace: ScatterTrace,
}

impl SimResult {
    /// get_scatter_trace returns the visualization-ready trace, if enough samples were recorded.
    pub fn get_scatter_trace(&self) -> Option<ScatterTrace> {
        self.aggregate.buckets().map(ScatterTrace::from_buckets)
    }

    /// get_bucket_table returns the speed buckets as a formatted table.
    pub fn get_bucket_table(&self) -> String {
        let mut tmp_string = String::new();

        match &self.aggregate {
            Aggregate::Buckets(buckets) => {
                writeln!(&mut tmp_string, "speed bucket, mean acc., count").unwrap();
                for bucket in buckets.iter() {
                    writeln!(
                        &mut tmp_string,
                        "{:8.1}km/h, {:7.3}m/s^2, {:5}",
                        bucket.speed_bucket_floor, bucket.avg_acceleration, bucket.count
                    )
                    .unwrap();
                }
            }
            Aggregate::InsufficientData {
                available,
                required,
            } => {
                writeln!(
                    &mut tmp_string,
                    "insufficient data ({} of {} required samples)",
                    available, required
                )
                .unwrap();
            }
        }

        tmp_string
    }

    /// print_summary prints laps, time, final vehicle states, and the speed buckets to the
    /// console output.
    pub fn print_summary(&self) {
        // create string with vehicle info
        let mut tmp_string_vehicles = String::from("vehicle, x, y, heading, speed\n");

        for (i, vehicle_state) in self.vehicle_states.iter().enumerate() {
            let label = if vehicle_state.is_player {
                String::from("player")
            } else {
                format!("auto {}", i)
            };
            writeln!(
                &mut tmp_string_vehicles,
                "{:>7}, {:8.2}m, {:8.2}m, {:6.1}deg, {:6.1}km/h",
                label,
                vehicle_state.x,
                vehicle_state.y,
                vehicle_state.angle.to_degrees(),
                vehicle_state.speed
            )
            .unwrap();
        }

        // print everything to the console
        println!(
            "RESULT: {} laps on {} in {:.3}s (timestep size {:.4}s)",
            self.lap_count, self.track_name, self.elapsed_time, self.timestep_size
        );
        println!("RESULT: Vehicles");
        println!("{}", tmp_string_vehicles);
        println!("RESULT: Speed buckets of the last {} samples", self.no_samples);
        println!("{}", self.get_bucket_table());
    }

    /// write_trace writes the scatter trace to a JSON file.
    pub fn write_trace(&self, filepath: &Path) -> anyhow::Result<()> {
        let export = TraceExport {
            track_name: &self.track_name,
            elapsed_time: self.elapsed_time,
            no_samples: self.no_samples,
            trace: self.get_scatter_trace().unwrap_or_default(),
        };

        let fh = File::create(filepath).context(format!(
            "Failed to create trace file {}!",
            filepath.display()
        ))?;
        serde_json::to_writer_pretty(fh, &export).context(format!(
            "Failed to write trace file {}!",
            filepath.display()
        ))?;
        Ok(())
    }
}

/// print_sweep_summary prints a comparison of simulation results that were obtained with
/// different timestep sizes.
pub fn print_sweep_summary(sim_results: &[SimResult]) {
    let mut tmp_string =
        String::from("timestep size, laps, time, player x, player y, player speed, buckets\n");

    for sim_result in sim_results.iter() {
        let player_state = sim_result
            .vehicle_states
            .iter()
            .find(|vehicle_state| vehicle_state.is_player)
            .cloned()
            .unwrap_or_default();

        writeln!(
            &mut tmp_string,
            "{:12.4}s, {:4}, {:8.3}s, {:8.2}m, {:8.2}m, {:8.2}km/h, {:7}",
            sim_result.timestep_size,
            sim_result.lap_count,
            sim_result.elapsed_time,
            player_state.x,
            player_state.y,
            player_state.speed,
            sim_result.aggregate.buckets().map_or(0, |buckets| buckets.len())
        )
        .unwrap();
    }

    println!("RESULT: Timestep sweep");
    println!("{}", tmp_string);
}
