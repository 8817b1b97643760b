use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "lapsim",
    about = "A kinematic multi-vehicle lap simulator with speed history aggregation"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Simulate in real time and show the text HUD (uses the inserted real-time factor)
    #[clap(short = 'R', long, conflicts_with = "sweep")]
    pub realtime: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the simulation parameter file
    #[clap(short, long)]
    pub parfile_path: PathBuf,

    /// Set path to a CSV file with waypoints that replace the waypoints of the parameter file
    #[clap(long)]
    pub trackfile_path: Option<PathBuf>,

    /// Set simulated duration in seconds
    #[clap(long, default_value = "60.0")]
    pub duration: f64,

    /// Set real-time factor (only relevant in case of real-time simulation)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set simulation timestep size in seconds, should be in the range (0.0, 1.0]
    #[clap(short, long, default_value = "0.016666666666666666")]
    pub timestep_size: f64,

    /// Compare several timestep sizes (comma separated), each simulated in parallel
    #[clap(long, value_delimiter = ',')]
    pub sweep: Vec<f64>,

    /// Set path of a JSON file the final scatter trace is written to
    #[clap(long)]
    pub trace_path: Option<PathBuf>,
}
