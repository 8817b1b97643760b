mod hud;

use clap::Parser;
use hud::{render_frame, SimInterface};
use lapsim::core::handle_sim::handle_sim;
use lapsim::post::sim_result::{print_sweep_summary, SimResult};
use lapsim::pre::check_sim_opts_pars::check_sim_opts_pars;
use lapsim::pre::read_sim_pars::{read_sim_pars, read_waypoints_csv};
use lapsim::pre::sim_opts::SimOpts;
use rayon::prelude::*;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

// refresh rate of the text HUD
const HUD_UPDATE_PERIOD: Duration = Duration::from_millis(250);

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments and set up logging
    let sim_opts: SimOpts = SimOpts::parse();

    let default_filter = if sim_opts.debug {
        "lapsim=debug,cli=debug"
    } else {
        "lapsim=info,cli=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // read simulation parameters (waypoints of a track file replace the ones of the parameter
    // file)
    let mut sim_pars = read_sim_pars(sim_opts.parfile_path.as_path())?;

    if let Some(trackfile_path) = &sim_opts.trackfile_path {
        sim_pars.track_pars.waypoints = read_waypoints_csv(trackfile_path.as_path())?;
    }

    // check simulation options and parameters
    check_sim_opts_pars(&sim_opts, &sim_pars)?;

    info!(
        "Simulating {} ({} waypoints, {} autonomous vehicles) for {:.1}s",
        sim_pars.track_pars.name,
        sim_pars.track_pars.waypoints.len(),
        sim_pars.fleet_pars.no_autonomous,
        sim_opts.duration
    );

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();

    let sim_result: SimResult = if !sim_opts.sweep.is_empty() {
        // TIMESTEP SWEEP (PARALLEL) ---------------------------------------------------------------
        let sim_results = sim_opts
            .sweep
            .par_iter()
            .map(|&timestep_size| {
                handle_sim(&sim_pars, timestep_size, sim_opts.duration, None, 1.0)
            })
            .collect::<anyhow::Result<Vec<SimResult>>>()?;

        info!(
            "Execution time (total): {}ms",
            t_start.elapsed().as_millis()
        );
        print_sweep_summary(&sim_results);

        // the finest timestep is used for the detailed result
        sim_results
            .into_iter()
            .min_by(|a, b| a.timestep_size.total_cmp(&b.timestep_size))
            .ok_or_else(|| anyhow::anyhow!("Timestep sweep did not return any result!"))?
    } else if sim_opts.realtime {
        // REAL-TIME SIMULATION WITH HUD -----------------------------------------------------------
        // create channel for communication between HUD and simulation
        let (tx, rx) = flume::unbounded();

        // the simulation runs in a separate thread, sim_opts and sim_pars are copied for it
        let sim_opts_thread = sim_opts.clone();
        let sim_pars_thread = sim_pars.clone();

        let sim_thread = thread::spawn(move || {
            handle_sim(
                &sim_pars_thread,
                sim_opts_thread.timestep_size,
                sim_opts_thread.duration,
                Some(&tx),
                sim_opts_thread.realtime_factor,
            )
        });

        // show the HUD in the main thread until the simulation thread drops the sender
        let mut sim_interface = SimInterface::new(rx);

        while sim_interface.is_connected {
            if sim_interface.update() {
                if let Some(frame_state) = &sim_interface.frame_state {
                    print!("{}", render_frame(frame_state));
                }
            }
            thread::sleep(HUD_UPDATE_PERIOD);
        }

        sim_thread
            .join()
            .map_err(|_| anyhow::anyhow!("Simulation thread panicked!"))??
    } else {
        // HEADLESS SIMULATION ---------------------------------------------------------------------
        let sim_result = handle_sim(
            &sim_pars,
            sim_opts.timestep_size,
            sim_opts.duration,
            None,
            1.0,
        )?;

        info!(
            "Execution time (total): {}ms",
            t_start.elapsed().as_millis()
        );
        sim_result
    };

    // POST-PROCESSING -----------------------------------------------------------------------------
    sim_result.print_summary();

    if let Some(trace_path) = &sim_opts.trace_path {
        sim_result.write_trace(trace_path.as_path())?;
        info!("Scatter trace written to {}", trace_path.display());
    }

    Ok(())
}
