//! End-of-run KPI summary.

use std::fmt;

use super::design::{HOURS_PER_YEAR, PlantDesign};
use super::types::SimState;

/// Summary record finalized from the run state after the last hour.
#[derive(Debug, Clone)]
pub struct KpiReport {
    /// Highest hydrogen inventory reached (t).
    pub h2_storage_max_t: f64,
    /// Highest ammonia inventory reached (t).
    pub nh3_storage_max_t: f64,
    /// Highest water tank inventory reached (m3).
    pub water_storage_max_m3: f64,
    /// Ammonia storage capacity the run was sized with (t).
    pub nh3_storage_capacity_t: f64,

    /// Wind energy offered but not used (GWh).
    pub curtailed_gwh: f64,

    /// Scheduled pickups executed.
    pub ship_count: usize,
    /// Pickups that could not take a full cargo.
    pub ships_failed: usize,
    /// Whether any pickup failed.
    pub any_ship_failed: bool,

    /// Electrolyzer stack energy (MWh).
    pub el_energy_mwh: f64,
    /// Haber-Bosch reaction energy (MWh).
    pub hb_energy_mwh: f64,
    /// Nitrogen supply energy (MWh).
    pub n2_energy_mwh: f64,
    /// Desalination energy (MWh).
    pub ro_energy_mwh: f64,
    /// Hydrogen storage charging energy (MWh).
    pub h2_store_in_mwh: f64,
    /// Hydrogen storage discharging energy (MWh).
    pub h2_store_out_mwh: f64,
    /// Ammonia storage charging energy (MWh).
    pub nh3_store_in_mwh: f64,
    /// Ammonia storage discharging energy (MWh).
    pub nh3_store_out_mwh: f64,
    /// Boil-off reliquefaction energy (MWh).
    pub h2_reliq_mwh: f64,
    /// Ammonia tank refrigeration energy (MWh).
    pub nh3_cooling_mwh: f64,

    /// Total ammonia produced (t).
    pub nh3_produced_t: f64,
    /// Lifetime production target of the horizon (t).
    pub nh3_target_t: f64,
    /// Ammonia clipped at storage capacity (t).
    pub nh3_spill_t: f64,
    /// Hydrogen clipped at storage capacity (kg).
    pub h2_spill_kg: f64,
    /// Total mass shipped out (t).
    pub ship_out_t: f64,

    /// Feed water demanded by the electrolyzer (m3).
    pub water_need_m3: f64,
    /// Desalinated make-up water produced (m3).
    pub ro_make_m3: f64,
    /// Unmet water demand (m3).
    pub water_short_m3: f64,

    /// Simulated horizon in profile years.
    pub sim_years: f64,

    /// Hydrogen inventory at the end of the horizon (t).
    pub h2_end_t: f64,
    /// Ammonia inventory at the end of the horizon (t).
    pub nh3_end_t: f64,
    /// Water tank inventory at the end of the horizon (m3).
    pub water_end_m3: f64,
}

impl KpiReport {
    /// Finalizes the KPI record from the run state.
    pub fn from_state(state: &SimState, design: &PlantDesign, sim_hours: usize) -> Self {
        Self {
            h2_storage_max_t: state.h2_soc_max_kg / 1000.0,
            nh3_storage_max_t: state.nh3_soc_max_t,
            water_storage_max_m3: state.water_soc_max_m3,
            nh3_storage_capacity_t: design.nh3_capacity_t,

            curtailed_gwh: state.curtailed_mwh / 1000.0,

            ship_count: state.ship_count,
            ships_failed: state.ships_failed,
            any_ship_failed: state.ships_failed > 0,

            el_energy_mwh: state.el_energy_mwh,
            hb_energy_mwh: state.hb_energy_mwh,
            n2_energy_mwh: state.n2_energy_mwh,
            ro_energy_mwh: state.ro_energy_mwh,
            h2_store_in_mwh: state.h2_store_in_mwh,
            h2_store_out_mwh: state.h2_store_out_mwh,
            nh3_store_in_mwh: state.nh3_store_in_mwh,
            nh3_store_out_mwh: state.nh3_store_out_mwh,
            h2_reliq_mwh: state.h2_reliq_mwh,
            nh3_cooling_mwh: state.nh3_cooling_mwh,

            nh3_produced_t: state.nh3_produced_t,
            nh3_target_t: design.lifetime_nh3_target_t(sim_hours),
            nh3_spill_t: state.nh3_spill_t,
            h2_spill_kg: state.h2_spill_kg,
            ship_out_t: state.ship_out_t,

            water_need_m3: state.water_need_m3,
            ro_make_m3: state.ro_make_m3,
            water_short_m3: state.water_short_m3,

            sim_years: sim_hours as f64 / HOURS_PER_YEAR,

            h2_end_t: state.h2_soc_kg / 1000.0,
            nh3_end_t: state.nh3_soc_t,
            water_end_m3: state.water_soc_m3,
        }
    }

    /// Grouped electrical energy totals (MWh): production, storage handling,
    /// and parasitic refrigeration.
    pub fn energy_breakdown_mwh(&self) -> (f64, f64, f64) {
        let production = self.el_energy_mwh + self.ro_energy_mwh + self.hb_energy_mwh
            + self.n2_energy_mwh;
        let storage = self.h2_store_in_mwh
            + self.h2_store_out_mwh
            + self.nh3_store_in_mwh
            + self.nh3_store_out_mwh;
        let parasitic = self.h2_reliq_mwh + self.nh3_cooling_mwh;
        (production, storage, parasitic)
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation summary ({:.2} profile years) ===", self.sim_years)?;
        writeln!(
            f,
            "NH3 produced       {:>14.1} t   (target {:>14.1} t, {:>6.1} %)",
            self.nh3_produced_t,
            self.nh3_target_t,
            if self.nh3_target_t > 0.0 {
                100.0 * self.nh3_produced_t / self.nh3_target_t
            } else {
                0.0
            }
        )?;
        writeln!(f, "NH3 shipped        {:>14.1} t", self.ship_out_t)?;
        writeln!(
            f,
            "Ships              {:>8} executed, {:>4} failed",
            self.ship_count, self.ships_failed
        )?;
        writeln!(
            f,
            "Storage maxima     H2 {:>10.1} t | NH3 {:>11.1} t (cap {:.1}) | H2O {:>9.1} m3",
            self.h2_storage_max_t, self.nh3_storage_max_t, self.nh3_storage_capacity_t,
            self.water_storage_max_m3
        )?;
        writeln!(
            f,
            "End inventories    H2 {:>10.1} t | NH3 {:>11.1} t | H2O {:>9.1} m3",
            self.h2_end_t, self.nh3_end_t, self.water_end_m3
        )?;
        writeln!(f, "Curtailment        {:>14.3} GWh", self.curtailed_gwh)?;
        let (production, storage, parasitic) = self.energy_breakdown_mwh();
        writeln!(
            f,
            "Energy             production {:>12.0} MWh | storage {:>10.0} MWh | \
             refrigeration {:>10.0} MWh",
            production, storage, parasitic
        )?;
        writeln!(
            f,
            "  electrolyzer {:>12.0} MWh | desalination {:>9.0} MWh | \
             synthesis {:>10.0} MWh | nitrogen {:>9.0} MWh",
            self.el_energy_mwh, self.ro_energy_mwh, self.hb_energy_mwh, self.n2_energy_mwh
        )?;
        writeln!(
            f,
            "Spillage           NH3 {:>10.1} t | H2 {:>10.1} kg",
            self.nh3_spill_t, self.h2_spill_kg
        )?;
        write!(
            f,
            "Water              need {:>12.1} m3 | made {:>12.1} m3 | short {:>10.1} m3",
            self.water_need_m3, self.ro_make_m3, self.water_short_m3
        )
    }
}
