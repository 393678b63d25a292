//! Haber-Bosch reactor controller: level control, minimum-on floor, ramp clamp.

use super::design::PlantDesign;

/// Completion tolerance on the lifetime production target (t).
const TARGET_EPS_T: f64 = 1e-9;

/// Inputs of one reactor invocation. The controller is invoked twice per
/// hour, before and after the electrolyzer step; `h2_limited_t` reflects the
/// hydrogen inventory at the respective point in the hour.
#[derive(Debug, Clone, Copy)]
pub struct HbInput {
    /// Power still available in the cascade (MW).
    pub available_mw: f64,
    /// Ammonia producible from stored hydrogen after discharge losses (t).
    pub h2_limited_t: f64,
    /// Current ammonia inventory (t).
    pub nh3_soc_t: f64,
    /// Cumulative ammonia produced so far (t).
    pub produced_total_t: f64,
    /// Lifetime production target for the horizon (t).
    pub lifetime_target_t: f64,
    /// Previous realized production rate, the ramp memory (t/h).
    pub ramp_memory_t: f64,
}

/// Outcome of one reactor invocation.
#[derive(Debug, Clone, Copy)]
pub struct HbStep {
    /// Realized production rate this invocation (t).
    pub nh3_t: f64,
    /// Power consumed by the full chain: reaction, nitrogen, hydrogen
    /// withdrawal, ammonia charging (MW).
    pub power_mw: f64,
    /// Updated ramp memory (t/h).
    pub ramp_memory_t: f64,
}

impl HbStep {
    fn off() -> Self {
        Self {
            nh3_t: 0.0,
            power_mw: 0.0,
            ramp_memory_t: 0.0,
        }
    }
}

/// Dispatches one reactor invocation.
///
/// Stopping conditions, checked in order, each forcing zero output and
/// resetting the ramp memory: lifetime target met, ammonia level at or above
/// the high threshold, no hydrogen or zero capacity, and no room left below
/// the per-hour fill target. Otherwise the candidate rate is the minimum of
/// the rated, hydrogen-limited, power-limited, level-room and lifetime-room
/// rates, forced to zero below the minimum-on floor, then ramp-clamped
/// against the previous realized rate.
pub fn dispatch(design: &PlantDesign, input: &HbInput) -> HbStep {
    if input.produced_total_t >= input.lifetime_target_t - TARGET_EPS_T {
        return HbStep::off();
    }
    if input.nh3_soc_t >= design.nh3_high_t {
        return HbStep::off();
    }
    if input.h2_limited_t <= 0.0 || design.hb_capacity_t_per_h <= 0.0 {
        return HbStep::off();
    }
    let level_room_t = (design.nh3_target_t - input.nh3_soc_t).max(0.0);
    if level_room_t <= 0.0 {
        return HbStep::off();
    }

    let power_limit_t = if design.chain_kwh_per_t > 0.0 {
        input.available_mw * 1000.0 / design.chain_kwh_per_t
    } else {
        design.hb_capacity_t_per_h
    };
    let lifetime_room_t = (input.lifetime_target_t - input.produced_total_t).max(0.0);

    let candidate_t = design
        .hb_capacity_t_per_h
        .min(input.h2_limited_t)
        .min(power_limit_t)
        .min(level_room_t)
        .min(lifetime_room_t);

    // Minimum-on floor, checked before the ramp clamp.
    if candidate_t > 0.0 && candidate_t < design.hb_min_t_per_h {
        return HbStep::off();
    }

    let step = design.hb_ramp_step_t;
    let nh3_t = (input.ramp_memory_t + step)
        .min(candidate_t.max(input.ramp_memory_t - step))
        .max(0.0);

    HbStep {
        nh3_t,
        power_mw: nh3_t * design.chain_kwh_per_t / 1000.0,
        ramp_memory_t: nh3_t,
    }
}
