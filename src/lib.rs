mod error;
mod infiltration;
mod potential;
mod retention;
mod soil_hydra;

pub use error::{Result, SoilError};
pub use infiltration::{
    GreenAmptParams, InfiltrationSample, InfiltrationSeries, MAX_STEP_COUNT,
    cumulative_infiltration, get_inf, infiltration_series, step_count,
};
pub use potential::{PSI_Z_FACTOR, calc_kf, get_psi_h, get_psi_z};
pub use retention::{
    RetentionCurve, Segment, SoilTable, build_interpolant, calc_psi_m, clean_column, get_pf,
};
pub use soil_hydra::{DEFAULT_CONFIG_FILE, RetentionTableConfig, SoilConfig, VanGenuchtenParams};
