//! Periodic ship-loading scheduler with a failure-tolerant withdrawal policy.

use super::design::PlantDesign;

/// Slack on the firing comparison so accumulated float drift in the schedule
/// cannot shift a pickup by one hour.
const FIRING_EPS: f64 = 1e-9;

/// Outcome of one ship loading.
#[derive(Debug, Clone, Copy)]
pub struct ShipEvent {
    /// Mass actually withdrawn (t); the full cargo or whatever was left.
    pub loaded_t: f64,
    /// Whether the inventory could not cover the full cargo.
    pub failed: bool,
    /// Updated ammonia inventory (t).
    pub nh3_soc_t: f64,
    /// Storage discharge draw for the withdrawn mass (MW), bookkeeping only.
    pub discharge_mw: f64,
}

/// Fixed-interval ship schedule.
#[derive(Debug, Clone, Copy)]
pub struct ShipSchedule {
    /// Hours between scheduled pickups.
    pub interval_h: f64,
    /// Target cargo per pickup (t).
    pub cargo_t: f64,
    /// Storage discharge energy (kWh/t).
    discharge_kwh_per_t: f64,
}

impl ShipSchedule {
    /// Builds the schedule from the plant design.
    pub fn new(design: &PlantDesign) -> Self {
        Self {
            interval_h: design.ship_interval_h,
            cargo_t: design.ship_cargo_t,
            discharge_kwh_per_t: design.nh3_discharge_kwh_per_t,
        }
    }

    /// Returns `true` when a pickup is due at the given hour number
    /// (1-based: hour number `n` is the end of hour index `n - 1`).
    pub fn is_due(hour_number: f64, next_ship_time_h: f64) -> bool {
        hour_number >= next_ship_time_h - FIRING_EPS
    }

    /// Executes a scheduled pickup against the current inventory.
    ///
    /// A ship is never refused: if the inventory cannot cover the cargo the
    /// ship takes what is there (possibly nothing), the tank is emptied, and
    /// the event is marked failed. Loading is never gated by power; the
    /// discharge draw is bookkeeping only.
    pub fn load(&self, nh3_soc_t: f64) -> ShipEvent {
        let (loaded_t, failed, nh3_after) = if nh3_soc_t >= self.cargo_t {
            (self.cargo_t, false, nh3_soc_t - self.cargo_t)
        } else {
            (nh3_soc_t, true, 0.0)
        };

        ShipEvent {
            loaded_t,
            failed,
            nh3_soc_t: nh3_after,
            discharge_mw: loaded_t * self.discharge_kwh_per_t / 1000.0,
        }
    }
}
