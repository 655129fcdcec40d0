pub mod config;
pub mod numeric;
pub mod shapelet;
pub mod timeseries;
