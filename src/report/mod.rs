//! Report module - console reports and result export

pub mod heatmap;
pub mod regression_report;
pub mod results_export;
pub mod summary;

pub use heatmap::*;
pub use regression_report::*;
pub use results_export::*;
pub use summary::*;
