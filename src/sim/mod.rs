//! Hourly dispatch simulation of the wind-to-ammonia chain.
//!
//! [`design`] derives absolute plant parameters from the configuration,
//! the controller modules ([`electrolyzer`], [`haber_bosch`], [`water`],
//! [`parasitics`], [`shipping`]) each dispatch one subsystem for one hour,
//! and [`engine`] sequences them over the wind profile.

pub mod design;
pub mod electrolyzer;
pub mod engine;
pub mod haber_bosch;
pub mod kpi;
pub mod parasitics;
pub mod shipping;
pub mod types;
pub mod water;

pub use design::PlantDesign;
pub use engine::{Engine, RunOptions};
pub use kpi::KpiReport;
pub use types::{HourRecord, SimOutput, SimState};
