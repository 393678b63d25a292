//! Derived plant design: absolute capacities, thresholds, and chain energies.

use crate::config::ScenarioConfig;

/// Mass of hydrogen bound per kilogram of ammonia (NH3 stoichiometry).
pub const H2_KG_PER_KG_NH3: f64 = 6.0 / 34.0;
/// Mass of nitrogen bound per kilogram of ammonia.
pub const N2_KG_PER_KG_NH3: f64 = 28.0 / 34.0;
/// Hours in one profile year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Immutable plant design derived once from a [`ScenarioConfig`].
///
/// Converts the fractional configuration (SOC fractions, cargo counts, ramp
/// fractions) into the absolute units the dispatch loop works in, so the
/// hourly code never re-derives anything.
#[derive(Debug, Clone)]
pub struct PlantDesign {
    /// Rated electrolyzer stack power (MW).
    pub p_el_max_mw: f64,
    /// Minimum-load stack power; below it the stack is forced off (MW).
    pub p_el_min_mw: f64,
    /// Hydrogen yield per MWh of stack energy (kg/MWh).
    pub h2_kg_per_mwh: f64,
    /// Maximum stack power change per hour (MW).
    pub el_ramp_step_mw: f64,
    /// Combined factor converting available power into stack power, accounting
    /// for the storage-charging overhead of the produced hydrogen.
    pub el_charge_factor: f64,

    /// Hydrogen storage capacity (kg).
    pub h2_capacity_kg: f64,
    /// Hydrogen SOC above which the electrolyzer is blocked (kg).
    pub h2_stop_kg: f64,
    /// Hydrogen SOC below which the electrolyzer is released (kg).
    pub h2_start_kg: f64,
    /// Hydrogen storage charge efficiency.
    pub h2_eta_in: f64,
    /// Hydrogen storage discharge efficiency.
    pub h2_eta_out: f64,
    /// Boil-off loss fraction per hour.
    pub h2_boiloff_frac_per_hour: f64,
    /// Liquefaction energy on charge (kWh/kg).
    pub h2_charge_kwh_per_kg: f64,
    /// Regasification energy on discharge (kWh/kg).
    pub h2_discharge_kwh_per_kg: f64,
    /// Reliquefaction energy for recovered boil-off (kWh/kg).
    pub h2_reliq_kwh_per_kg: f64,
    /// Fraction of boil-off gas that is reliquefied.
    pub h2_reliq_frac: f64,

    /// Rated Haber-Bosch production (t NH3 per hour).
    pub hb_capacity_t_per_h: f64,
    /// Minimum-on production rate (t/h).
    pub hb_min_t_per_h: f64,
    /// Maximum production rate change per hour (t/h).
    pub hb_ramp_step_t: f64,
    /// Specific energy of one tonne of ammonia through the whole chain:
    /// reaction + nitrogen supply + hydrogen withdrawal + ammonia charging
    /// (kWh/t).
    pub chain_kwh_per_t: f64,
    /// Reaction-only specific energy (kWh/kg NH3).
    pub hb_spec_kwh_per_kg_nh3: f64,
    /// Nitrogen specific energy (kWh/kg N2).
    pub n2_spec_kwh_per_kg: f64,

    /// Ammonia storage capacity (t).
    pub nh3_capacity_t: f64,
    /// Level-control per-hour fill target (t).
    pub nh3_target_t: f64,
    /// Level-control high threshold; at or above it the reactor stops (t).
    pub nh3_high_t: f64,
    /// Level-control low threshold (t).
    pub nh3_low_t: f64,
    /// Ammonia storage charge energy (kWh/t).
    pub nh3_charge_kwh_per_t: f64,
    /// Ammonia storage discharge energy (kWh/t).
    pub nh3_discharge_kwh_per_t: f64,
    /// Tank refrigeration energy (kWh per t per day).
    pub nh3_cooling_kwh_per_t_per_day: f64,

    /// Feed water demand (kg water per kg H2).
    pub water_kg_per_kg_h2: f64,
    /// Desalination specific energy (kWh/m3).
    pub ro_spec_kwh_per_m3: f64,
    /// Water tank capacity (m3).
    pub water_tank_m3: f64,
    /// Water tank standing loss fraction per hour.
    pub water_loss_frac_per_hour: f64,

    /// Annual ammonia production target (t/a).
    pub annual_nh3_t: f64,
    /// Mass withdrawn per scheduled ship (t).
    pub ship_cargo_t: f64,
    /// Hours between scheduled ships.
    pub ship_interval_h: f64,
    /// Initial ammonia inventory (t).
    pub nh3_startup_t: f64,
}

impl PlantDesign {
    /// Derives the plant design from a validated configuration.
    pub fn from_config(cfg: &ScenarioConfig) -> Self {
        let el = &cfg.electrolyzer;
        let h2s = &cfg.h2_storage;
        let hb = &cfg.haber_bosch;
        let nh3s = &cfg.nh3_storage;
        let w = &cfg.water;
        let sh = &cfg.shipping;

        let h2_kg_per_mwh = if el.spec_kwh_per_kg_h2 > 0.0 {
            1000.0 / el.spec_kwh_per_kg_h2
        } else {
            0.0
        };
        let h2_capacity_kg = h2s.capacity_t * 1000.0;

        // NH3 mass is 17/3 times the hydrogen mass feeding it.
        let annual_nh3_t = cfg.production.annual_h2_target_t * 17.0 / 3.0;
        let hb_capacity_t_per_h = annual_nh3_t / hb.availability / 365.0 / 24.0;

        let chain_kwh_per_t = hb.spec_kwh_per_kg_nh3 * 1000.0
            + N2_KG_PER_KG_NH3 * 1000.0 * cfg.nitrogen.spec_kwh_per_kg
            + H2_KG_PER_KG_NH3 * 1000.0 * h2s.discharge_kwh_per_kg
            + nh3s.charge_kwh_per_t;

        let ship_cargo_t = annual_nh3_t / sh.ships_per_year;
        // Sizing floor: the startup buffer must fit with one cargo of headroom.
        let capacity_ships_eff = nh3s.capacity_ships.max(sh.startup_buffer_ships + 1.0);
        let nh3_capacity_t = capacity_ships_eff * ship_cargo_t;

        let nh3_target_t = (nh3s.target_level_ships * ship_cargo_t).min(nh3_capacity_t);
        let nh3_high_t =
            ((nh3s.target_level_ships + nh3s.deadband_ships) * ship_cargo_t).min(nh3_capacity_t);
        let nh3_low_t = ((nh3s.target_level_ships - nh3s.deadband_ships).max(0.0) * ship_cargo_t)
            .min(nh3_capacity_t);

        Self {
            p_el_max_mw: el.p_max_mw,
            p_el_min_mw: el.min_load_frac * el.p_max_mw,
            h2_kg_per_mwh,
            el_ramp_step_mw: el.ramp_frac_per_h * el.p_max_mw,
            el_charge_factor: 1.0 + h2_kg_per_mwh * h2s.eta_in * h2s.charge_kwh_per_kg / 1000.0,

            h2_capacity_kg,
            h2_stop_kg: el.h2_stop_frac * h2_capacity_kg,
            h2_start_kg: el.h2_start_frac * h2_capacity_kg,
            h2_eta_in: h2s.eta_in,
            h2_eta_out: h2s.eta_out,
            h2_boiloff_frac_per_hour: h2s.boiloff_frac_per_hour,
            h2_charge_kwh_per_kg: h2s.charge_kwh_per_kg,
            h2_discharge_kwh_per_kg: h2s.discharge_kwh_per_kg,
            h2_reliq_kwh_per_kg: h2s.reliq_kwh_per_kg,
            h2_reliq_frac: h2s.reliq_frac,

            hb_capacity_t_per_h,
            hb_min_t_per_h: hb.min_load_frac * hb_capacity_t_per_h,
            hb_ramp_step_t: hb.ramp_frac_per_h * hb_capacity_t_per_h,
            chain_kwh_per_t,
            hb_spec_kwh_per_kg_nh3: hb.spec_kwh_per_kg_nh3,
            n2_spec_kwh_per_kg: cfg.nitrogen.spec_kwh_per_kg,

            nh3_capacity_t,
            nh3_target_t,
            nh3_high_t,
            nh3_low_t,
            nh3_charge_kwh_per_t: nh3s.charge_kwh_per_t,
            nh3_discharge_kwh_per_t: nh3s.discharge_kwh_per_t,
            nh3_cooling_kwh_per_t_per_day: nh3s.cooling_kwh_per_t_per_day,

            water_kg_per_kg_h2: w.kg_per_kg_h2,
            ro_spec_kwh_per_m3: w.ro_spec_kwh_per_m3,
            water_tank_m3: w.tank_capacity_m3,
            water_loss_frac_per_hour: w.tank_loss_frac_per_hour,

            annual_nh3_t,
            ship_cargo_t,
            ship_interval_h: HOURS_PER_YEAR / sh.ships_per_year,
            nh3_startup_t: (sh.startup_buffer_ships * ship_cargo_t).min(nh3_capacity_t),
        }
    }

    /// Lifetime ammonia production target for a horizon of `sim_hours` hours.
    pub fn lifetime_nh3_target_t(&self, sim_hours: usize) -> f64 {
        sim_hours as f64 / HOURS_PER_YEAR * self.annual_nh3_t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    #[test]
    fn annual_nh3_follows_stoichiometry() {
        let cfg = ScenarioConfig::ael();
        let d = PlantDesign::from_config(&cfg);
        let expected = cfg.production.annual_h2_target_t * 17.0 / 3.0;
        assert!((d.annual_nh3_t - expected).abs() < 1e-9);
    }

    #[test]
    fn hb_capacity_uses_availability() {
        let cfg = ScenarioConfig::ael();
        let d = PlantDesign::from_config(&cfg);
        let expected = d.annual_nh3_t / 0.94 / 365.0 / 24.0;
        assert!((d.hb_capacity_t_per_h - expected).abs() < 1e-9);
    }

    #[test]
    fn ship_cargo_and_interval() {
        let cfg = ScenarioConfig::ael();
        let d = PlantDesign::from_config(&cfg);
        assert!((d.ship_cargo_t - d.annual_nh3_t / 12.0).abs() < 1e-9);
        assert!((d.ship_interval_h - 730.0).abs() < 1e-9);
    }

    #[test]
    fn band_levels_capped_at_capacity() {
        let mut cfg = ScenarioConfig::ael();
        cfg.nh3_storage.capacity_ships = 1.0;
        cfg.nh3_storage.target_level_ships = 1.2;
        cfg.nh3_storage.deadband_ships = 1.1;
        let d = PlantDesign::from_config(&cfg);
        assert!((d.nh3_target_t - d.nh3_capacity_t).abs() < 1e-9);
        assert!((d.nh3_high_t - d.nh3_capacity_t).abs() < 1e-9);
        assert!((d.nh3_low_t - 0.1 * d.ship_cargo_t).abs() < 1e-6);
    }

    #[test]
    fn band_levels_are_ordered() {
        let d = PlantDesign::from_config(&ScenarioConfig::ael());
        assert!(d.nh3_low_t <= d.nh3_target_t);
        assert!(d.nh3_target_t <= d.nh3_high_t);
        assert!(d.nh3_high_t <= d.nh3_capacity_t);
    }

    #[test]
    fn startup_buffer_floors_capacity() {
        let mut cfg = ScenarioConfig::ael();
        cfg.shipping.startup_buffer_ships = 2.0;
        cfg.nh3_storage.capacity_ships = 1.5;
        let d = PlantDesign::from_config(&cfg);
        // sized to startup + 1 cargoes, not the smaller configured value
        assert!((d.nh3_capacity_t - 3.0 * d.ship_cargo_t).abs() < 1e-6);
        assert!((d.nh3_startup_t - 2.0 * d.ship_cargo_t).abs() < 1e-6);
    }

    #[test]
    fn chain_energy_sums_all_links() {
        let cfg = ScenarioConfig::ael();
        let d = PlantDesign::from_config(&cfg);
        let expected = 0.55 * 1000.0
            + 28.0 / 34.0 * 1000.0 * 0.33
            + 6.0 / 34.0 * 1000.0 * 0.06
            + 1.0;
        assert!((d.chain_kwh_per_t - expected).abs() < 1e-9);
    }

    #[test]
    fn lifetime_target_scales_with_hours() {
        let cfg = ScenarioConfig::ael();
        let d = PlantDesign::from_config(&cfg);
        assert!((d.lifetime_nh3_target_t(8760) - d.annual_nh3_t).abs() < 1e-6);
        assert!((d.lifetime_nh3_target_t(17520) - 2.0 * d.annual_nh3_t).abs() < 1e-6);
    }

    #[test]
    fn zero_spec_energy_yields_zero_production_rate() {
        let mut cfg = ScenarioConfig::ael();
        cfg.electrolyzer.spec_kwh_per_kg_h2 = 0.0;
        let d = PlantDesign::from_config(&cfg);
        assert_eq!(d.h2_kg_per_mwh, 0.0);
    }
}
