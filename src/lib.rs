//! Equity bubble risk scoring.
//!
//! Market indicators are percentile-normalized against historical ranges,
//! averaged per category, weighted into a composite score in [0, 100] and
//! labelled on a fixed risk scale. The `report` module turns scores and
//! fixture tables into JSON, SVG and LaTeX artifacts.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod market;
pub mod output;
pub mod report;

pub use error::{BubbleError, Result};
