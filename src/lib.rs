//! Hourly dispatch simulator for a wind-powered hydrogen-to-ammonia export plant.
//!
//! Wind power feeds an electrolyzer producing hydrogen, hydrogen is buffered
//! in cryogenic storage and consumed by a Haber-Bosch reactor producing
//! ammonia, ammonia is buffered in refrigerated storage and withdrawn in
//! discrete ship cargoes. Desalinated water supplies the electrolyzer through
//! a reverse-osmosis unit and a buffer tank.

pub mod config;
pub mod io;
pub mod profile;
/// Dispatch engine, controllers, state, and KPI modules.
pub mod sim;
