pub mod aggregator;
pub mod clock;
pub mod handle_sim;
pub mod simulation;
pub mod track;
pub mod vehicle;
