//! Port traits separating the analysis from storage and rendering.

pub mod config_port;
pub mod data_port;
pub mod report_port;
