//! Hourly dispatch engine orchestrating parasitics, controllers, and shipping.

use crate::config::ScenarioConfig;
use crate::profile::WindProfile;

use super::design::{H2_KG_PER_KG_NH3, N2_KG_PER_KG_NH3, PlantDesign};
use super::electrolyzer::{self, ElInput};
use super::haber_bosch::{self, HbInput};
use super::kpi::KpiReport;
use super::parasitics::parasitic_loads;
use super::shipping::ShipSchedule;
use super::types::{HourRecord, SimOutput, SimState};
use super::water::fill_tank_with_remainder;

/// Per-run options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Retain the full per-hour trace (memory/time tradeoff).
    pub keep_trace: bool,
    /// Print every hour record while running.
    pub debug: bool,
}

/// Simulation engine owning the plant design and all mutable run state.
///
/// Execution is strictly sequential: each hour depends on the state the
/// previous hour produced, so a run has exactly one writer. The design is
/// immutable and may be shared across independent runs.
pub struct Engine {
    design: PlantDesign,
    schedule: ShipSchedule,
    wind_scale: f64,
    state: SimState,
    lifetime_target_t: f64,
}

impl Engine {
    /// Creates an engine from a validated configuration.
    pub fn new(config: &ScenarioConfig) -> Self {
        let design = PlantDesign::from_config(config);
        let schedule = ShipSchedule::new(&design);
        let state = SimState::new(&design);
        Self {
            design,
            schedule,
            wind_scale: config.simulation.wind_scale,
            state,
            lifetime_target_t: 0.0,
        }
    }

    /// Returns the derived plant design.
    pub fn design(&self) -> &PlantDesign {
        &self.design
    }

    /// Returns the current run state (for inspection between steps in tests).
    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Runs the full horizon over `profile` and returns the KPI summary and,
    /// if requested, the per-hour trace. Resets all run state first, so the
    /// same engine always produces identical output for identical inputs.
    pub fn run(&mut self, profile: &WindProfile, opts: &RunOptions) -> SimOutput {
        self.state = SimState::new(&self.design);
        self.lifetime_target_t = self.design.lifetime_nh3_target_t(profile.len());

        if opts.debug {
            println!(
                "nh3 level band: low {:.1} t, target {:.1} t, high {:.1} t, capacity {:.1} t",
                self.design.nh3_low_t,
                self.design.nh3_target_t,
                self.design.nh3_high_t,
                self.design.nh3_capacity_t
            );
        }

        let mut trace = opts.keep_trace.then(|| Vec::with_capacity(profile.len()));

        for (t, &p_wind_mw) in profile.hours().iter().enumerate() {
            let record = self.step(t, p_wind_mw);
            if opts.debug {
                println!("{record}");
            }
            if let Some(rows) = trace.as_mut() {
                rows.push(record);
            }
        }

        SimOutput {
            trace,
            kpi: KpiReport::from_state(&self.state, &self.design, profile.len()),
        }
    }

    /// Advances the simulation by one hour.
    fn step(&mut self, t: usize, p_wind_base_mw: f64) -> HourRecord {
        let design = &self.design;
        let state = &mut self.state;

        let p_wind_mw = p_wind_base_mw * self.wind_scale;

        // 1. Water tank standing loss.
        if design.water_loss_frac_per_hour > 0.0 {
            state.water_soc_m3 *= 1.0 - design.water_loss_frac_per_hour;
        }

        // 2. Parasitic loads come off the wind budget before anything else,
        //    and boil-off leaves storage regardless of power availability.
        let par = parasitic_loads(design, state.h2_soc_kg, state.nh3_soc_t);
        state.h2_soc_kg = par.h2_soc_kg;
        state.h2_reliq_mwh += par.reliq_mw;
        state.nh3_cooling_mwh += par.cooling_mw;

        let mut p_rem_mw = (p_wind_mw - par.reliq_mw - par.cooling_mw).max(0.0);

        // 3. Haber-Bosch pass 1: drain hydrogen produced in previous hours.
        let hb1 = haber_bosch::dispatch(
            design,
            &HbInput {
                available_mw: p_rem_mw,
                h2_limited_t: nh3_from_stored_h2_t(design, state.h2_soc_kg),
                nh3_soc_t: state.nh3_soc_t,
                produced_total_t: state.nh3_produced_t,
                lifetime_target_t: self.lifetime_target_t,
                ramp_memory_t: state.nh3_hb_prev_t,
            },
        );
        state.nh3_hb_prev_t = hb1.ramp_memory_t;
        let mut nh3_hb_t = hb1.nh3_t;
        let mut p_hbchain_mw = hb1.power_mw;
        p_rem_mw = (p_rem_mw - hb1.power_mw).max(0.0);

        // 4. Electrolyzer + coupled desalination + tank.
        let el = electrolyzer::dispatch(
            design,
            &ElInput {
                available_mw: p_rem_mw,
                water_soc_m3: state.water_soc_m3,
                h2_soc_kg: state.h2_soc_kg,
                ramp_memory_mw: state.p_stack_prev_mw,
                el_allowed: state.el_allowed,
            },
        );
        state.h2_soc_kg = el.h2_soc_kg;
        state.water_soc_m3 = el.water_soc_m3;
        state.p_stack_prev_mw = el.ramp_memory_mw;
        state.el_allowed = el.el_allowed;
        let mut p_ro_mw = el.ro_mw;
        let mut ro_make_m3 = el.ro_make_m3;
        p_rem_mw = el.remaining_mw;

        // 5. Remainder desalination fill.
        let fill = fill_tank_with_remainder(design, p_rem_mw, state.water_soc_m3);
        state.water_soc_m3 = fill.water_soc_m3;
        p_ro_mw += fill.ro_mw;
        ro_make_m3 += fill.ro_make_m3;
        p_rem_mw = (p_rem_mw - fill.ro_mw).max(0.0);

        // 6. Haber-Bosch pass 2: react to the hour's fresh hydrogen. The ramp
        //    memory carries over from pass 1 within the hour.
        let hb2 = haber_bosch::dispatch(
            design,
            &HbInput {
                available_mw: p_rem_mw,
                h2_limited_t: nh3_from_stored_h2_t(design, state.h2_soc_kg),
                nh3_soc_t: state.nh3_soc_t,
                produced_total_t: state.nh3_produced_t,
                lifetime_target_t: self.lifetime_target_t,
                ramp_memory_t: state.nh3_hb_prev_t,
            },
        );
        state.nh3_hb_prev_t = hb2.ramp_memory_t;
        nh3_hb_t += hb2.nh3_t;
        p_hbchain_mw += hb2.power_mw;

        // 7. Material and energy bookkeeping of the hour's reactor output.
        if nh3_hb_t > 0.0 {
            let h2_cons_kg = nh3_hb_t * 1000.0 * H2_KG_PER_KG_NH3;
            state.h2_soc_kg = (state.h2_soc_kg - h2_cons_kg / design.h2_eta_out).max(0.0);

            state.nh3_soc_t += nh3_hb_t;
            state.nh3_produced_t += nh3_hb_t;
            if state.nh3_soc_t > design.nh3_capacity_t {
                state.nh3_spill_t += state.nh3_soc_t - design.nh3_capacity_t;
                state.nh3_soc_t = design.nh3_capacity_t;
            }

            state.hb_energy_mwh += nh3_hb_t * design.hb_spec_kwh_per_kg_nh3;
            let n2_need_kg = nh3_hb_t * 1000.0 * N2_KG_PER_KG_NH3;
            state.n2_energy_mwh += n2_need_kg * design.n2_spec_kwh_per_kg / 1000.0;
            state.h2_store_out_mwh += h2_cons_kg * design.h2_discharge_kwh_per_kg / 1000.0;
            state.nh3_store_in_mwh += nh3_hb_t * design.nh3_charge_kwh_per_t / 1000.0;
        }

        state.el_energy_mwh += el.p_stack_mw;
        state.h2_store_in_mwh += el.p_charge_mw;
        state.ro_energy_mwh += p_ro_mw;

        state.water_need_m3 += el.water_need_m3;
        state.ro_make_m3 += ro_make_m3;
        state.water_short_m3 += el.water_short_m3;
        state.h2_spill_kg += el.h2_spill_kg;

        // 8. Ship loading, independent of the power cascade.
        let mut ship_loaded_t = 0.0;
        let mut p_ship_mw = 0.0;
        let hour_number = (t + 1) as f64;
        if ShipSchedule::is_due(hour_number, state.next_ship_time_h) {
            state.ship_count += 1;
            let event = self.schedule.load(state.nh3_soc_t);
            if event.failed {
                state.ships_failed += 1;
            }
            state.nh3_soc_t = event.nh3_soc_t;
            ship_loaded_t = event.loaded_t;
            state.ship_out_t += event.loaded_t;
            p_ship_mw = event.discharge_mw;
            state.nh3_store_out_mwh += event.discharge_mw;
            state.next_ship_time_h += self.schedule.interval_h;
        }

        // 9. Curtailment and storage maxima.
        let used_mw = par.reliq_mw
            + par.cooling_mw
            + p_hbchain_mw
            + p_ro_mw
            + el.p_el_total_mw
            + p_ship_mw;
        let curtailed_mwh = (p_wind_mw - used_mw).max(0.0);
        state.curtailed_mwh += curtailed_mwh;

        state.h2_soc_max_kg = state.h2_soc_max_kg.max(state.h2_soc_kg);
        state.nh3_soc_max_t = state.nh3_soc_max_t.max(state.nh3_soc_t);
        state.water_soc_max_m3 = state.water_soc_max_m3.max(state.water_soc_m3);

        HourRecord {
            timestep: t,
            time_hr: t as f64,
            wind_mw: p_wind_mw,
            reliq_mw: par.reliq_mw,
            cooling_mw: par.cooling_mw,
            hb_chain_mw: p_hbchain_mw,
            ro_mw: p_ro_mw,
            el_stack_mw: el.p_stack_mw,
            used_mw,
            curtailed_mwh,
            h2_soc_kg: state.h2_soc_kg,
            nh3_soc_t: state.nh3_soc_t,
            water_soc_m3: state.water_soc_m3,
            nh3_prod_t: nh3_hb_t,
            ship_loaded_t,
            h2_spill_kg: el.h2_spill_kg,
            ro_make_m3,
            water_need_m3: el.water_need_m3,
            water_short_m3: el.water_short_m3,
        }
    }
}

/// Ammonia producible from the given hydrogen inventory after discharge
/// losses (t).
fn nh3_from_stored_h2_t(design: &PlantDesign, h2_soc_kg: f64) -> f64 {
    h2_soc_kg * design.h2_eta_out / H2_KG_PER_KG_NH3 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::profile::WindProfile;

    fn run_constant(cfg: &ScenarioConfig, p_mw: f64, hours: usize) -> SimOutput {
        let mut engine = Engine::new(cfg);
        let profile = WindProfile::constant(p_mw, hours);
        engine.run(
            &profile,
            &RunOptions {
                keep_trace: true,
                debug: false,
            },
        )
    }

    #[test]
    fn trace_has_one_row_per_hour() {
        let out = run_constant(&ScenarioConfig::ael(), 1500.0, 48);
        assert_eq!(out.trace.as_ref().map(Vec::len), Some(48));
    }

    #[test]
    fn trace_is_omitted_unless_requested() {
        let cfg = ScenarioConfig::ael();
        let mut engine = Engine::new(&cfg);
        let profile = WindProfile::constant(1500.0, 24);
        let out = engine.run(&profile, &RunOptions::default());
        assert!(out.trace.is_none());
    }

    #[test]
    fn storages_stay_within_bounds() {
        let out = run_constant(&ScenarioConfig::ael(), 2400.0, 2000);
        let design = PlantDesign::from_config(&ScenarioConfig::ael());
        for r in out.trace.as_deref().unwrap_or(&[]) {
            assert!(r.h2_soc_kg >= 0.0 && r.h2_soc_kg <= design.h2_capacity_kg + 1e-6);
            assert!(r.nh3_soc_t >= 0.0 && r.nh3_soc_t <= design.nh3_capacity_t + 1e-6);
            assert!(r.water_soc_m3 >= 0.0 && r.water_soc_m3 <= design.water_tank_m3 + 1e-6);
        }
    }

    #[test]
    fn power_is_conserved_every_hour() {
        let out = run_constant(&ScenarioConfig::ael(), 1800.0, 1000);
        for r in out.trace.as_deref().unwrap_or(&[]) {
            assert!(r.curtailed_mwh >= 0.0);
            assert!(
                (r.used_mw + r.curtailed_mwh - r.wind_mw).abs() < 1e-6,
                "hour {}: used {} + curtailed {} != wind {}",
                r.timestep,
                r.used_mw,
                r.curtailed_mwh,
                r.wind_mw
            );
        }
    }

    #[test]
    fn wind_scale_multiplies_the_profile() {
        let mut cfg = ScenarioConfig::ael();
        cfg.simulation.wind_scale = 0.5;
        let out = run_constant(&cfg, 1000.0, 10);
        for r in out.trace.as_deref().unwrap_or(&[]) {
            assert!((r.wind_mw - 500.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rerun_resets_state() {
        let cfg = ScenarioConfig::ael();
        let mut engine = Engine::new(&cfg);
        let profile = WindProfile::constant(1500.0, 200);
        let opts = RunOptions {
            keep_trace: false,
            debug: false,
        };
        let a = engine.run(&profile, &opts);
        let b = engine.run(&profile, &opts);
        assert_eq!(a.kpi.nh3_produced_t, b.kpi.nh3_produced_t);
        assert_eq!(a.kpi.curtailed_gwh, b.kpi.curtailed_gwh);
        assert_eq!(a.kpi.el_energy_mwh, b.kpi.el_energy_mwh);
    }
}
