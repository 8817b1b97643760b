pub mod check_sim_opts_pars;
pub mod read_sim_pars;
pub mod sim_opts;
