use crate::core::aggregator::MIN_NO_SAMPLES;
use crate::pre::read_sim_pars::SimPars;
use crate::pre::sim_opts::SimOpts;
use anyhow::Context;
use helpers::general::ConfigurationError;
use tracing::warn;

/// check_sim_opts_pars assures that the inserted options and parameters are within reasonable
/// limits and raises an error if not.
pub fn check_sim_opts_pars(sim_opts: &SimOpts, sim_pars: &SimPars) -> anyhow::Result<()> {
    // PART 1: SIMULATION OPTIONS
    if !(0.0 < sim_opts.timestep_size && sim_opts.timestep_size <= 1.0) {
        return Err(ConfigurationError).context(format!(
            "timestep_size is {:.3}s, which is not within the reasonable range of (0.0, 1.0]s!",
            sim_opts.timestep_size
        ));
    }

    if !(sim_opts.duration > 0.0 && sim_opts.duration.is_finite()) {
        return Err(ConfigurationError).context(format!(
            "duration must be positive, but is {:.3}s!",
            sim_opts.duration
        ));
    }

    if sim_opts.realtime
        && !(0.1 <= sim_opts.realtime_factor && sim_opts.realtime_factor <= 100.0)
    {
        return Err(ConfigurationError).context(format!(
            "realtime_factor is {:.3}, which is not within the reasonable range of [0.1, 100.0]!",
            sim_opts.realtime_factor
        ));
    }

    if sim_opts.realtime && !sim_opts.sweep.is_empty() {
        return Err(ConfigurationError)
            .context("A timestep sweep cannot be simulated in real time!");
    }

    if sim_opts
        .sweep
        .iter()
        .any(|&timestep_size| !(0.0 < timestep_size && timestep_size <= 1.0))
    {
        return Err(ConfigurationError).context(
            "A timestep size of the sweep is not within the reasonable range of (0.0, 1.0]s!",
        );
    }

    // PART 2: SIMULATION PARAMETERS
    // TRACK ---------------------------------------------------------------------------------------
    if sim_pars.track_pars.waypoints.len() < 2 {
        return Err(ConfigurationError).context(format!(
            "Track {} must contain at least 2 waypoints!",
            sim_pars.track_pars.name
        ));
    }
    if sim_pars.track_pars.waypoints.iter().any(|wp| {
        !(0.0..=1.0).contains(&wp.accel_factor) || !(0.0..=1.0).contains(&wp.brake_factor)
    }) {
        return Err(ConfigurationError).context(
            "An acceleration or braking factor is not within the required range [0.0, 1.0]!",
        );
    }

    // PHYSICS -------------------------------------------------------------------------------------
    if sim_pars.physics_pars.max_change_base < 0.0 {
        return Err(ConfigurationError).context("max_change_base must not be negative!");
    }
    if !(0.0 < sim_pars.physics_pars.smoothing_factor
        && sim_pars.physics_pars.smoothing_factor <= 1.0)
    {
        return Err(ConfigurationError)
            .context("smoothing_factor is not within the required range (0.0, 1.0]!");
    }

    // HISTORY -------------------------------------------------------------------------------------
    if sim_pars.history_pars.buffer_capacity < 1 {
        return Err(ConfigurationError).context("buffer_capacity must be at least one!");
    }
    if !(sim_pars.history_pars.bucket_size > 0.0) {
        return Err(ConfigurationError).context("bucket_size must be positive!");
    }
    if !(sim_pars.history_pars.aggregate_interval > 0.0) {
        return Err(ConfigurationError).context("aggregate_interval must be positive!");
    }

    // a history that is smaller than the aggregation minimum can never be aggregated
    if sim_pars.history_pars.buffer_capacity < MIN_NO_SAMPLES {
        warn!(
            "buffer_capacity {} is below the aggregation minimum of {} samples!",
            sim_pars.history_pars.buffer_capacity,
            MIN_NO_SAMPLES
        );
    }

    Ok(())
}
