#[derive(Debug, Clone, Copy, PartialEq)]
enum ClockState {
    Stopped,
    Running,
}

impl Default for ClockState {
    fn default() -> Self {
        ClockState::Stopped
    }
}

/// The SimClock keeps track of the simulated time and of the laps completed by the player
/// vehicle. Possible states:
/// * `Stopped` -> initial state, ticks are ignored
/// * `Running` -> ticks advance the simulated time
///
/// Switching between the states never touches time or lap count, only `reset` does.
#[derive(Debug, Default)]
pub struct SimClock {
    state: ClockState,
    elapsed_time: f64,
    lap_count: u32,
}

impl SimClock {
    pub fn start(&mut self) {
        self.state = ClockState::Running
    }

    pub fn stop(&mut self) {
        self.state = ClockState::Stopped
    }

    pub fn reset(&mut self) {
        self.elapsed_time = 0.0;
        self.lap_count = 0;
    }

    /// advance increments the simulated time. Negative timesteps are treated as zero such that
    /// the time is monotonic.
    pub fn advance(&mut self, timestep_size: f64) {
        if timestep_size > 0.0 {
            self.elapsed_time += timestep_size
        }
    }

    pub fn increment_lap_count(&mut self) {
        self.lap_count += 1
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running)
    }

    pub fn get_elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn get_lap_count(&self) -> u32 {
        self.lap_count
    }
}
