//! Pipeline module - encoding, correlation and regression stages

pub mod correlation;
pub mod encoder;
pub mod legend;
pub mod loader;
pub mod missing;
pub mod regression;
pub mod stats;

pub use correlation::*;
pub use encoder::*;
pub use legend::*;
pub use loader::*;
pub use missing::*;
pub use regression::*;
pub use stats::*;
