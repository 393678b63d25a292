//! Electrolyzer + desalination + water-tank controller.
//!
//! Converts available power into hydrogen under a hydrogen-level hysteresis
//! gate, a minimum-load floor, ramp limiting, storage headroom protection,
//! and a water-availability feedback with a coupled desalination step.

use super::design::PlantDesign;
use super::water::{ro_flow_from_power, ro_power_from_flow};

/// Comparison slack for the two corrective scalings.
const SCALE_EPS: f64 = 1e-12;

/// Inputs of one electrolyzer step.
#[derive(Debug, Clone, Copy)]
pub struct ElInput {
    /// Power still available in the cascade (MW).
    pub available_mw: f64,
    /// Current water tank inventory (m3).
    pub water_soc_m3: f64,
    /// Current hydrogen inventory (kg).
    pub h2_soc_kg: f64,
    /// Previous realized stack power, the ramp memory (MW).
    pub ramp_memory_mw: f64,
    /// Hysteresis flag carried from the previous hour.
    pub el_allowed: bool,
}

/// Outcome of one electrolyzer step. Every state effect is visible here;
/// nothing is mutated through shared structures.
#[derive(Debug, Clone, Copy)]
pub struct ElStep {
    /// Realized stack power (MW).
    pub p_stack_mw: f64,
    /// Hydrogen storage charging power (MW).
    pub p_charge_mw: f64,
    /// Stack plus charging power (MW).
    pub p_el_total_mw: f64,
    /// Updated hydrogen inventory (kg).
    pub h2_soc_kg: f64,
    /// Hydrogen clipped at storage capacity (kg).
    pub h2_spill_kg: f64,
    /// Desalination power used by this step (MW).
    pub ro_mw: f64,
    /// Desalination make-up flow of this step (m3).
    pub ro_make_m3: f64,
    /// Feed water demand of the realized production (m3).
    pub water_need_m3: f64,
    /// Updated water tank inventory (m3).
    pub water_soc_m3: f64,
    /// Unmet water demand after both corrective scalings (m3).
    pub water_short_m3: f64,
    /// Power left for the rest of the cascade (MW).
    pub remaining_mw: f64,
    /// Updated ramp memory (MW).
    pub ramp_memory_mw: f64,
    /// Updated hysteresis flag.
    pub el_allowed: bool,
}

fn idle(input: &ElInput, el_allowed: bool) -> ElStep {
    ElStep {
        p_stack_mw: 0.0,
        p_charge_mw: 0.0,
        p_el_total_mw: 0.0,
        h2_soc_kg: input.h2_soc_kg,
        h2_spill_kg: 0.0,
        ro_mw: 0.0,
        ro_make_m3: 0.0,
        water_need_m3: 0.0,
        water_soc_m3: input.water_soc_m3,
        water_short_m3: 0.0,
        remaining_mw: input.available_mw,
        ramp_memory_mw: 0.0,
        el_allowed,
    }
}

/// Dispatches one electrolyzer step.
///
/// Order of operations: hysteresis gate, joint stack/charging power solve
/// with the minimum-load floor, ramp clamp, then at most two corrective
/// scalings (hydrogen storage headroom first, water availability second).
/// The water pass only ever scales the stack down, so it cannot re-violate
/// the headroom bound.
pub fn dispatch(design: &PlantDesign, input: &ElInput) -> ElStep {
    // Hydrogen-level hysteresis (Schmitt trigger on SOC).
    let el_allowed = if input.h2_soc_kg >= design.h2_stop_kg {
        false
    } else if input.h2_soc_kg <= design.h2_start_kg {
        true
    } else {
        input.el_allowed
    };

    if !el_allowed || input.available_mw <= 0.0 {
        return idle(input, el_allowed);
    }

    // Target stack power: solve power and its storage-charging overhead
    // jointly, then apply the binary minimum-load floor.
    let p_candidate = design
        .p_el_max_mw
        .min(input.available_mw / design.el_charge_factor);
    let p_target = if p_candidate < design.p_el_min_mw {
        0.0
    } else {
        p_candidate
    };
    if p_target <= 0.0 {
        return idle(input, el_allowed);
    }

    // Symmetric ramp clamp against the previous realized stack power.
    let step = design.el_ramp_step_mw;
    let mut p_stack = (input.ramp_memory_mw + step)
        .min(p_target.max(input.ramp_memory_mw - step))
        .max(0.0);
    if p_stack < design.p_el_min_mw {
        p_stack = 0.0;
    }
    if p_stack <= 0.0 {
        return idle(input, el_allowed);
    }

    let mut h2_prod_kg = p_stack * design.h2_kg_per_mwh;
    let mut water_need_m3 = h2_prod_kg * design.water_kg_per_kg_h2 / 1000.0;

    let tank_cap = design.water_tank_m3.max(0.0);
    let mut water_from_tank = input.water_soc_m3.max(0.0).min(water_need_m3);
    let mut missing_m3 = (water_need_m3 - water_from_tank).max(0.0);

    let mut h2_in_kg = h2_prod_kg * design.h2_eta_in;

    // First corrective pass: hydrogen storage headroom.
    let headroom_kg = (design.h2_capacity_kg - input.h2_soc_kg).max(0.0);
    if h2_in_kg > headroom_kg + SCALE_EPS && h2_in_kg > 0.0 {
        let scale = (headroom_kg / h2_in_kg).clamp(0.0, 1.0);
        p_stack *= scale;
        h2_prod_kg = p_stack * design.h2_kg_per_mwh;
        water_need_m3 = h2_prod_kg * design.water_kg_per_kg_h2 / 1000.0;
        water_from_tank = input.water_soc_m3.max(0.0).min(water_need_m3);
        missing_m3 = (water_need_m3 - water_from_tank).max(0.0);
        h2_in_kg = h2_prod_kg * design.h2_eta_in;
    }

    let mut p_charge = h2_in_kg * design.h2_charge_kwh_per_kg / 1000.0;
    let mut p_el_total = p_stack + p_charge;

    // Coupled desalination with whatever the stack left over.
    let p_left_for_ro = (input.available_mw - p_el_total).max(0.0);
    let ro_possible_m3 = ro_flow_from_power(design, p_left_for_ro);
    let ro_make_m3 = missing_m3.min(ro_possible_m3);
    let ro_mw = ro_power_from_flow(design, ro_make_m3);

    let water_available_m3 = water_from_tank + ro_make_m3;

    // Second corrective pass: water availability. Tank draw and make-up stay
    // as computed; the scaled need equals the available water by
    // construction, and any residual gap is the reported shortfall.
    let mut water_short_m3 = 0.0;
    if water_need_m3 > water_available_m3 + SCALE_EPS && water_need_m3 > 0.0 {
        let scale = (water_available_m3 / water_need_m3).clamp(0.0, 1.0);
        p_stack *= scale;
        h2_prod_kg = p_stack * design.h2_kg_per_mwh;
        water_need_m3 = h2_prod_kg * design.water_kg_per_kg_h2 / 1000.0;
        h2_in_kg = h2_prod_kg * design.h2_eta_in;
        p_charge = h2_in_kg * design.h2_charge_kwh_per_kg / 1000.0;
        p_el_total = p_stack + p_charge;
        if water_need_m3 > water_available_m3 + SCALE_EPS {
            water_short_m3 = water_need_m3 - water_available_m3;
        }
    }

    let water_soc_m3 = if tank_cap > 0.0 {
        (input.water_soc_m3 - water_from_tank + ro_make_m3).min(tank_cap)
    } else {
        0.0
    };

    let h2_soc_kg = (input.h2_soc_kg + h2_in_kg).min(design.h2_capacity_kg);
    let h2_spill_kg = (input.h2_soc_kg + h2_in_kg - design.h2_capacity_kg).max(0.0);

    ElStep {
        p_stack_mw: p_stack,
        p_charge_mw: p_charge,
        p_el_total_mw: p_el_total,
        h2_soc_kg,
        h2_spill_kg,
        ro_mw,
        ro_make_m3,
        water_need_m3,
        water_soc_m3,
        water_short_m3,
        remaining_mw: (input.available_mw - (p_el_total + ro_mw)).max(0.0),
        ramp_memory_mw: p_stack,
        el_allowed,
    }
}
