//! Core domain types and analysis.

pub mod value;
pub mod table;
pub mod cleaning;
pub mod stats;
pub mod outliers;
pub mod rules;
pub mod turnover;
pub mod series;
pub mod summary;
pub mod correlation;
pub mod distribution;
pub mod config;
pub mod error;
