use crate::core::simulation::{FleetPars, HistoryPars};
use crate::core::track::{TrackPars, WaypointPars};
use crate::core::vehicle::PhysicsPars;
use anyhow::Context;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// SimPars is used to store all other parameter structs. Only the track parameters are
/// mandatory.
#[derive(Debug, Deserialize, Clone)]
pub struct SimPars {
    pub track_pars: TrackPars,
    #[serde(default)]
    pub fleet_pars: FleetPars,
    #[serde(default)]
    pub physics_pars: PhysicsPars,
    #[serde(default)]
    pub history_pars: HistoryPars,
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;

    // read and parse parameter file content
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}

/// read_waypoints_csv reads waypoints from a CSV file with the header
/// `x,y,target_speed,accel_factor,brake_factor,name,description`. The name and description
/// columns may be left empty.
pub fn read_waypoints_csv(filepath: &Path) -> anyhow::Result<Vec<WaypointPars>> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!("Failed to open track file {}!", filepath.display()))?;

    // read and parse csv track data
    let mut csv_reader = csv::Reader::from_reader(&fh);
    let mut waypoints: Vec<WaypointPars> = vec![];

    for (i, result) in csv_reader.deserialize().enumerate() {
        let waypoint: WaypointPars = result.context(format!(
            "Failed to parse row {} of track file {}!",
            i + 1,
            filepath.display()
        ))?;
        waypoints.push(waypoint);
    }

    Ok(waypoints)
}
