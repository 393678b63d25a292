//! Integration tests for run-wide physical invariants.

mod common;

use p2a_sim::profile::WindProfile;
use p2a_sim::sim::PlantDesign;

#[test]
fn storages_stay_within_bounds_over_a_synthetic_year() {
    let cfg = common::default_config();
    let design = common::default_design();
    let profile = WindProfile::synthetic(2200.0, 8760, cfg.simulation.seed);
    let out = common::run_traced(&cfg, &profile);

    for r in out.trace.as_deref().unwrap_or(&[]) {
        assert!(
            r.h2_soc_kg >= 0.0 && r.h2_soc_kg <= design.h2_capacity_kg + 1e-6,
            "hour {}: H2 {} kg out of bounds",
            r.timestep,
            r.h2_soc_kg
        );
        assert!(
            r.nh3_soc_t >= 0.0 && r.nh3_soc_t <= design.nh3_capacity_t + 1e-6,
            "hour {}: NH3 {} t out of bounds",
            r.timestep,
            r.nh3_soc_t
        );
        assert!(
            r.water_soc_m3 >= 0.0 && r.water_soc_m3 <= design.water_tank_m3 + 1e-6,
            "hour {}: water {} m3 out of bounds",
            r.timestep,
            r.water_soc_m3
        );
    }
}

#[test]
fn power_accounting_balances_under_constant_wind() {
    let cfg = common::default_config();
    let out = common::run_constant(&cfg, 1800.0, 2000);

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
fn curtailment_never_negative_under_variable_wind() {
    let cfg = common::default_config();
    let profile = WindProfile::synthetic(2200.0, 4000, 7);
    let out = common::run_traced(&cfg, &profile);

    for r in out.trace.as_deref().unwrap_or(&[]) {
        assert!(r.curtailed_mwh >= 0.0);
    }
}

#[test]
fn identical_runs_produce_identical_traces() {
    let cfg = common::default_config();
    let profile = WindProfile::synthetic(2200.0, 2000, cfg.simulation.seed);

    let a = common::run_traced(&cfg, &profile);
    let b = common::run_traced(&cfg, &profile);

    let ta = a.trace.as_deref().unwrap_or(&[]);
    let tb = b.trace.as_deref().unwrap_or(&[]);
    assert_eq!(ta.len(), tb.len());
    for (ra, rb) in ta.iter().zip(tb) {
        assert_eq!(ra.el_stack_mw, rb.el_stack_mw);
        assert_eq!(ra.h2_soc_kg, rb.h2_soc_kg);
        assert_eq!(ra.nh3_soc_t, rb.nh3_soc_t);
        assert_eq!(ra.nh3_prod_t, rb.nh3_prod_t);
        assert_eq!(ra.curtailed_mwh, rb.curtailed_mwh);
    }
    assert_eq!(a.kpi.nh3_produced_t, b.kpi.nh3_produced_t);
    assert_eq!(a.kpi.el_energy_mwh, b.kpi.el_energy_mwh);
    assert_eq!(a.kpi.curtailed_gwh, b.kpi.curtailed_gwh);
}

#[test]
fn stack_power_rises_at_most_one_ramp_step_per_hour() {
    let cfg = common::default_config();
    let design = common::default_design();
    let profile = WindProfile::synthetic(2200.0, 4000, cfg.simulation.seed);
    let out = common::run_traced(&cfg, &profile);

    let mut prev = 0.0;
    for r in out.trace.as_deref().unwrap_or(&[]) {
        assert!(
            r.el_stack_mw - prev <= design.el_ramp_step_mw + 1e-6,
            "hour {}: stack rose {} MW, limit {}",
            r.timestep,
            r.el_stack_mw - prev,
            design.el_ramp_step_mw
        );
        prev = r.el_stack_mw;
    }
}

#[test]
fn hourly_ammonia_production_never_exceeds_two_reactor_passes() {
    let cfg = common::default_config();
    let design = common::default_design();
    let profile = WindProfile::synthetic(2200.0, 4000, cfg.simulation.seed);
    let out = common::run_traced(&cfg, &profile);

    for r in out.trace.as_deref().unwrap_or(&[]) {
        assert!(
            r.nh3_prod_t <= 2.0 * design.hb_capacity_t_per_h + 1e-6,
            "hour {}: produced {} t, per-pass cap {}",
            r.timestep,
            r.nh3_prod_t,
            design.hb_capacity_t_per_h
        );
    }
}

#[test]
fn full_hydrogen_storage_blocks_the_stack_until_it_drains() {
    // Tiny storage with the reactor held off: the first hour fills the
    // store past the stop threshold and the stack must stay blocked for
    // the remainder of the run.
    let mut cfg = common::default_config();
    cfg.h2_storage.capacity_t = 2.0;
    cfg.nh3_storage.target_level_ships = 0.0;
    cfg.nh3_storage.deadband_ships = 0.0;
    let design = PlantDesign::from_config(&cfg);

    let out = common::run_constant(&cfg, 3000.0, 48);
    let trace = out.trace.as_deref().unwrap_or(&[]);

    assert!(trace[0].el_stack_mw > 0.0);
    assert!(trace[0].h2_soc_kg >= design.h2_stop_kg);
    for r in &trace[1..] {
        assert_eq!(r.el_stack_mw, 0.0, "hour {}: stack ran while blocked", r.timestep);
    }
    assert_eq!(out.kpi.nh3_produced_t, 0.0);
}

#[test]
fn water_balance_sums_are_consistent() {
    let cfg = common::default_config();
    let out = common::run_constant(&cfg, 1800.0, 2000);
    let kpi = &out.kpi;

    assert!(kpi.water_need_m3 > 0.0);
    assert!(kpi.ro_make_m3 > 0.0);
    assert!(kpi.water_short_m3 >= 0.0);
    // demand is covered by tank draw plus make-up; shortfall stays small
    // once the tank is primed
    assert!(kpi.water_short_m3 < kpi.water_need_m3);
}
