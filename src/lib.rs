//! smsurvey: social media survey analysis library
//!
//! Encodes categorical survey responses into numeric codes with a per-column
//! legend, renders correlation heatmaps, and fits OLS regression models on
//! the encoded data.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
