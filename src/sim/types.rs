//! Mutable simulation state and per-hour trace records.

use std::fmt;

use super::design::PlantDesign;
use super::kpi::KpiReport;

/// All persistent per-hour state of one simulation run.
///
/// Created once at simulation start, mutated exactly once per hour by the
/// engine, and finalized into a [`KpiReport`] at the end of the horizon.
/// Controllers never touch this struct directly; they receive the values they
/// need and return updated ones.
#[derive(Debug, Clone)]
pub struct SimState {
    /// Hydrogen inventory (kg).
    pub h2_soc_kg: f64,
    /// Ammonia inventory (t).
    pub nh3_soc_t: f64,
    /// Water tank inventory (m3).
    pub water_soc_m3: f64,

    /// Hysteresis flag of the electrolyzer hydrogen-level gate.
    pub el_allowed: bool,
    /// Last realized stack power, the electrolyzer ramp memory (MW).
    pub p_stack_prev_mw: f64,
    /// Last realized Haber-Bosch rate, the reactor ramp memory (t/h).
    pub nh3_hb_prev_t: f64,
    /// Hour number of the next scheduled ship withdrawal.
    pub next_ship_time_h: f64,

    // Running energy sums (MWh over the horizon so far).
    pub el_energy_mwh: f64,
    pub hb_energy_mwh: f64,
    pub n2_energy_mwh: f64,
    pub ro_energy_mwh: f64,
    pub h2_store_in_mwh: f64,
    pub h2_store_out_mwh: f64,
    pub nh3_store_in_mwh: f64,
    pub nh3_store_out_mwh: f64,
    pub h2_reliq_mwh: f64,
    pub nh3_cooling_mwh: f64,
    pub curtailed_mwh: f64,

    // Running mass sums.
    pub nh3_produced_t: f64,
    pub nh3_spill_t: f64,
    pub h2_spill_kg: f64,
    pub ship_out_t: f64,

    // Ship bookkeeping.
    pub ship_count: usize,
    pub ships_failed: usize,

    // Storage maxima reached so far.
    pub h2_soc_max_kg: f64,
    pub nh3_soc_max_t: f64,
    pub water_soc_max_m3: f64,

    // Water balance sums (m3).
    pub water_need_m3: f64,
    pub ro_make_m3: f64,
    pub water_short_m3: f64,
}

impl SimState {
    /// Creates the initial state: empty storages apart from the startup
    /// ammonia buffer, electrolyzer released, first ship one interval out.
    pub fn new(design: &PlantDesign) -> Self {
        Self {
            h2_soc_kg: 0.0,
            nh3_soc_t: design.nh3_startup_t,
            water_soc_m3: 0.0,

            el_allowed: true,
            p_stack_prev_mw: 0.0,
            nh3_hb_prev_t: 0.0,
            next_ship_time_h: design.ship_interval_h,

            el_energy_mwh: 0.0,
            hb_energy_mwh: 0.0,
            n2_energy_mwh: 0.0,
            ro_energy_mwh: 0.0,
            h2_store_in_mwh: 0.0,
            h2_store_out_mwh: 0.0,
            nh3_store_in_mwh: 0.0,
            nh3_store_out_mwh: 0.0,
            h2_reliq_mwh: 0.0,
            nh3_cooling_mwh: 0.0,
            curtailed_mwh: 0.0,

            nh3_produced_t: 0.0,
            nh3_spill_t: 0.0,
            h2_spill_kg: 0.0,
            ship_out_t: 0.0,

            ship_count: 0,
            ships_failed: 0,

            h2_soc_max_kg: 0.0,
            nh3_soc_max_t: design.nh3_startup_t,
            water_soc_max_m3: 0.0,

            water_need_m3: 0.0,
            ro_make_m3: 0.0,
            water_short_m3: 0.0,
        }
    }
}

/// Complete record of one simulated hour.
#[derive(Debug, Clone)]
pub struct HourRecord {
    /// Hour index from simulation start.
    pub timestep: usize,
    /// Simulation time in hours.
    pub time_hr: f64,
    /// Scaled wind power offered this hour (MW).
    pub wind_mw: f64,
    /// Boil-off reliquefaction draw (MW).
    pub reliq_mw: f64,
    /// Ammonia tank refrigeration draw (MW).
    pub cooling_mw: f64,
    /// Haber-Bosch chain draw, both passes (MW).
    pub hb_chain_mw: f64,
    /// Desalination draw, coupled and remainder steps (MW).
    pub ro_mw: f64,
    /// Realized electrolyzer stack power (MW).
    pub el_stack_mw: f64,
    /// Total power used by all subsystems (MW).
    pub used_mw: f64,
    /// Unused wind power this hour (MWh).
    pub curtailed_mwh: f64,
    /// Hydrogen inventory after this hour (kg).
    pub h2_soc_kg: f64,
    /// Ammonia inventory after this hour (t).
    pub nh3_soc_t: f64,
    /// Water tank inventory after this hour (m3).
    pub water_soc_m3: f64,
    /// Ammonia produced this hour (t).
    pub nh3_prod_t: f64,
    /// Cargo withdrawn this hour, zero on non-firing hours (t).
    pub ship_loaded_t: f64,
    /// Hydrogen clipped at storage capacity this hour (kg).
    pub h2_spill_kg: f64,
    /// Desalination make-up flow this hour (m3).
    pub ro_make_m3: f64,
    /// Electrolyzer feed water demand this hour (m3).
    pub water_need_m3: f64,
    /// Unmet water demand this hour (m3).
    pub water_short_m3: f64,
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>6} | wind={:>8.2} MW  used={:>8.2} MW  curt={:>8.2} MWh | \
             el={:>7.2}  hb={:>7.2}  ro={:>6.2}  reliq={:>5.2}  cool={:>5.2} | \
             H2={:>9.1} kg  NH3={:>9.1} t  H2O={:>7.1} m3 | ship={:>8.1} t",
            self.timestep,
            self.wind_mw,
            self.used_mw,
            self.curtailed_mwh,
            self.el_stack_mw,
            self.hb_chain_mw,
            self.ro_mw,
            self.reliq_mw,
            self.cooling_mw,
            self.h2_soc_kg,
            self.nh3_soc_t,
            self.water_soc_m3,
            self.ship_loaded_t,
        )
    }
}

/// Result of one complete simulation run.
pub struct SimOutput {
    /// Per-hour trace, present when the run was started with trace retention.
    pub trace: Option<Vec<HourRecord>>,
    /// Summary KPI record.
    pub kpi: KpiReport,
}
