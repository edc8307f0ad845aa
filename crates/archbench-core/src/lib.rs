pub mod comparison;
pub mod config;
pub mod error;
pub mod generate;
pub mod io;
pub mod lookup;
pub mod metrics;
pub mod report;
pub mod stats;

pub use error::ReportError;
