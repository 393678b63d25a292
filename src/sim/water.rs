//! Reverse-osmosis power/flow conversions and the remainder tank fill.

use super::design::PlantDesign;

/// Desalinated water flow producible from `p_mw` of power (m3/h).
///
/// A zero specific energy means no desalination capability, not infinite
/// flow.
pub fn ro_flow_from_power(design: &PlantDesign, p_mw: f64) -> f64 {
    if design.ro_spec_kwh_per_m3 <= 0.0 {
        return 0.0;
    }
    (p_mw * 1000.0 / design.ro_spec_kwh_per_m3).max(0.0)
}

/// Power needed to desalinate `m3` of water (MW).
pub fn ro_power_from_flow(design: &PlantDesign, m3: f64) -> f64 {
    (m3 * design.ro_spec_kwh_per_m3 / 1000.0).max(0.0)
}

/// Outcome of the remainder desalination fill step.
#[derive(Debug, Clone, Copy)]
pub struct TankFill {
    /// Desalination draw (MW).
    pub ro_mw: f64,
    /// Water produced into the tank (m3).
    pub ro_make_m3: f64,
    /// Updated tank inventory (m3).
    pub water_soc_m3: f64,
}

/// Greedily fills the water tank with whatever power is left in the hour.
///
/// Bounded by tank headroom and the flow the available power can drive; no
/// ramp or hysteresis logic.
pub fn fill_tank_with_remainder(
    design: &PlantDesign,
    available_mw: f64,
    water_soc_m3: f64,
) -> TankFill {
    let idle = TankFill {
        ro_mw: 0.0,
        ro_make_m3: 0.0,
        water_soc_m3,
    };

    let tank_cap = design.water_tank_m3.max(0.0);
    if tank_cap <= 0.0 || available_mw <= 0.0 {
        return idle;
    }
    let headroom = (tank_cap - water_soc_m3).max(0.0);
    if headroom <= 0.0 {
        return idle;
    }

    let ro_make_m3 = headroom.min(ro_flow_from_power(design, available_mw));
    TankFill {
        ro_mw: ro_power_from_flow(design, ro_make_m3),
        ro_make_m3,
        water_soc_m3: water_soc_m3 + ro_make_m3,
    }
}
