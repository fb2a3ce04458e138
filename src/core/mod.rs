//! Core building blocks shared by every other layer.

pub mod error;
pub mod logging;
mod perf_timer;
pub mod vector;

pub use error::{ConfigError, ConfigResult, StoreError, StoreResult};
pub(crate) use perf_timer::PerfTimer;
pub use vector::Vector;
