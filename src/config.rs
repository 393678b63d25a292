//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the reference plant. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::ael`] /
/// [`ScenarioConfig::pem`] for the built-in technology presets.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation horizon and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Annual production targets.
    #[serde(default)]
    pub production: ProductionConfig,
    /// Electrolyzer stack parameters and hydrogen-level hysteresis.
    #[serde(default)]
    pub electrolyzer: ElectrolyzerConfig,
    /// Cryogenic hydrogen storage parameters.
    #[serde(default)]
    pub h2_storage: H2StorageConfig,
    /// Haber-Bosch reactor parameters.
    #[serde(default)]
    pub haber_bosch: HaberBoschConfig,
    /// Nitrogen supply parameters.
    #[serde(default)]
    pub nitrogen: NitrogenConfig,
    /// Refrigerated ammonia storage parameters and target band.
    #[serde(default)]
    pub nh3_storage: Nh3StorageConfig,
    /// Reverse osmosis and water tank parameters.
    #[serde(default)]
    pub water: WaterConfig,
    /// Ship-loading schedule parameters.
    #[serde(default)]
    pub shipping: ShippingConfig,
}

/// Simulation horizon and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of profile years to simulate (must be > 0).
    pub years: usize,
    /// Scalar applied to every profile value before dispatch.
    pub wind_scale: f64,
    /// Seed for the synthetic wind profile generator.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            years: 1,
            wind_scale: 1.0,
            seed: 42,
        }
    }
}

/// Annual production targets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductionConfig {
    /// Annual hydrogen production target (t/a). The annual ammonia target is
    /// derived via the 17/3 mass ratio.
    pub annual_h2_target_t: f64,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            annual_h2_target_t: 120_799.0,
        }
    }
}

/// Electrolyzer stack parameters and hydrogen-level hysteresis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectrolyzerConfig {
    /// Rated stack power (MW).
    pub p_max_mw: f64,
    /// Specific energy (kWh per kg H2).
    pub spec_kwh_per_kg_h2: f64,
    /// Minimum-load fraction of rated power; below it the stack is forced off.
    pub min_load_frac: f64,
    /// Fraction of rated power the stack may change per hour.
    pub ramp_frac_per_h: f64,
    /// H2 SOC fraction at which the stack is blocked (hysteresis stop).
    pub h2_stop_frac: f64,
    /// H2 SOC fraction at which the stack is released again (hysteresis start).
    pub h2_start_frac: f64,
}

impl Default for ElectrolyzerConfig {
    fn default() -> Self {
        Self {
            p_max_mw: 1100.0,
            spec_kwh_per_kg_h2: 48.0,
            min_load_frac: 0.20,
            ramp_frac_per_h: 0.80,
            h2_stop_frac: 0.95,
            h2_start_frac: 0.30,
        }
    }
}

/// Cryogenic hydrogen storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct H2StorageConfig {
    /// Storage capacity (t H2).
    pub capacity_t: f64,
    /// Charge efficiency (0..1].
    pub eta_in: f64,
    /// Discharge efficiency (0..1].
    pub eta_out: f64,
    /// Boil-off loss fraction per hour.
    pub boiloff_frac_per_hour: f64,
    /// Liquefaction energy on charge (kWh per kg).
    pub charge_kwh_per_kg: f64,
    /// Regasification energy on discharge (kWh per kg).
    pub discharge_kwh_per_kg: f64,
    /// Reliquefaction energy for recovered boil-off gas (kWh per kg).
    pub reliq_kwh_per_kg: f64,
    /// Fraction of boil-off gas that is reliquefied.
    pub reliq_frac: f64,
}

impl Default for H2StorageConfig {
    fn default() -> Self {
        Self {
            capacity_t: 331.0,
            eta_in: 0.995,
            eta_out: 0.995,
            // 0.05 % per day
            boiloff_frac_per_hour: 0.0005 / 24.0,
            charge_kwh_per_kg: 11.0,
            discharge_kwh_per_kg: 0.06,
            reliq_kwh_per_kg: 11.0,
            reliq_frac: 1.0,
        }
    }
}

/// Haber-Bosch reactor parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HaberBoschConfig {
    /// Plant availability factor used to size the reactor from the annual target.
    pub availability: f64,
    /// Reaction specific energy (kWh per kg NH3).
    pub spec_kwh_per_kg_nh3: f64,
    /// Minimum-on fraction of rated capacity; below it the reactor is forced off.
    pub min_load_frac: f64,
    /// Fraction of rated capacity the production rate may change per hour.
    pub ramp_frac_per_h: f64,
}

impl Default for HaberBoschConfig {
    fn default() -> Self {
        Self {
            availability: 0.94,
            spec_kwh_per_kg_nh3: 0.55,
            min_load_frac: 0.40,
            ramp_frac_per_h: 0.10,
        }
    }
}

/// Nitrogen supply parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NitrogenConfig {
    /// Air-separation specific energy (kWh per kg N2).
    pub spec_kwh_per_kg: f64,
}

impl Default for NitrogenConfig {
    fn default() -> Self {
        Self { spec_kwh_per_kg: 0.33 }
    }
}

/// Refrigerated ammonia storage parameters and target band.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Nh3StorageConfig {
    /// Storage capacity expressed in ship cargoes.
    pub capacity_ships: f64,
    /// Charge energy (kWh per t NH3).
    pub charge_kwh_per_t: f64,
    /// Discharge energy (kWh per t NH3).
    pub discharge_kwh_per_t: f64,
    /// Refrigeration energy (kWh per t NH3 per day).
    pub cooling_kwh_per_t_per_day: f64,
    /// Level-control target expressed in ship cargoes.
    pub target_level_ships: f64,
    /// Half-width of the level-control band in ship cargoes.
    pub deadband_ships: f64,
}

impl Default for Nh3StorageConfig {
    fn default() -> Self {
        Self {
            capacity_ships: 1.5,
            charge_kwh_per_t: 1.0,
            discharge_kwh_per_t: 1.0,
            cooling_kwh_per_t_per_day: 40.0,
            target_level_ships: 1.2,
            deadband_ships: 1.1,
        }
    }
}

/// Reverse osmosis and water tank parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaterConfig {
    /// Feed water demand (kg water per kg H2).
    pub kg_per_kg_h2: f64,
    /// Desalination specific energy (kWh per m3).
    pub ro_spec_kwh_per_m3: f64,
    /// Water tank capacity (m3).
    pub tank_capacity_m3: f64,
    /// Tank standing loss fraction per hour.
    pub tank_loss_frac_per_hour: f64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            kg_per_kg_h2: 10.0,
            ro_spec_kwh_per_m3: 4.0,
            tank_capacity_m3: 2500.0,
            tank_loss_frac_per_hour: 0.001,
        }
    }
}

/// Ship-loading schedule parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShippingConfig {
    /// Scheduled pickups per year.
    pub ships_per_year: f64,
    /// Initial ammonia inventory expressed in ship cargoes.
    pub startup_buffer_ships: f64,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            ships_per_year: 12.0,
            startup_buffer_ships: 0.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"electrolyzer.min_load_frac"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the alkaline-electrolyzer reference plant.
    pub fn ael() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            production: ProductionConfig::default(),
            electrolyzer: ElectrolyzerConfig::default(),
            h2_storage: H2StorageConfig::default(),
            haber_bosch: HaberBoschConfig::default(),
            nitrogen: NitrogenConfig::default(),
            nh3_storage: Nh3StorageConfig::default(),
            water: WaterConfig::default(),
            shipping: ShippingConfig::default(),
        }
    }

    /// Returns the PEM-electrolyzer variant: same plant, lower minimum load.
    pub fn pem() -> Self {
        Self {
            electrolyzer: ElectrolyzerConfig {
                min_load_frac: 0.05,
                ..ElectrolyzerConfig::default()
            },
            ..Self::ael()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["ael", "pem"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "ael" => Ok(Self::ael()),
            "pem" => Ok(Self::pem()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let push = |errors: &mut Vec<ConfigError>, field: &str, message: &str| {
            errors.push(ConfigError {
                field: field.into(),
                message: message.into(),
            });
        };

        if self.simulation.years == 0 {
            push(&mut errors, "simulation.years", "must be > 0");
        }
        if self.simulation.wind_scale < 0.0 {
            push(&mut errors, "simulation.wind_scale", "must be >= 0");
        }

        if self.production.annual_h2_target_t <= 0.0 {
            push(&mut errors, "production.annual_h2_target_t", "must be > 0");
        }

        let el = &self.electrolyzer;
        if el.p_max_mw < 0.0 {
            push(&mut errors, "electrolyzer.p_max_mw", "must be >= 0");
        }
        if el.spec_kwh_per_kg_h2 <= 0.0 {
            push(&mut errors, "electrolyzer.spec_kwh_per_kg_h2", "must be > 0");
        }
        if !(0.0..=1.0).contains(&el.min_load_frac) {
            push(&mut errors, "electrolyzer.min_load_frac", "must be in [0.0, 1.0]");
        }
        if el.ramp_frac_per_h <= 0.0 {
            push(&mut errors, "electrolyzer.ramp_frac_per_h", "must be > 0");
        }
        if el.h2_start_frac >= el.h2_stop_frac {
            push(
                &mut errors,
                "electrolyzer.h2_start_frac",
                "must be < electrolyzer.h2_stop_frac",
            );
        }

        let h2s = &self.h2_storage;
        if h2s.capacity_t < 0.0 {
            push(&mut errors, "h2_storage.capacity_t", "must be >= 0");
        }
        if !(0.0 < h2s.eta_in && h2s.eta_in <= 1.0) {
            push(&mut errors, "h2_storage.eta_in", "must be in (0.0, 1.0]");
        }
        if !(0.0 < h2s.eta_out && h2s.eta_out <= 1.0) {
            push(&mut errors, "h2_storage.eta_out", "must be in (0.0, 1.0]");
        }
        if !(0.0..1.0).contains(&h2s.boiloff_frac_per_hour) {
            push(&mut errors, "h2_storage.boiloff_frac_per_hour", "must be in [0.0, 1.0)");
        }
        if !(0.0..=1.0).contains(&h2s.reliq_frac) {
            push(&mut errors, "h2_storage.reliq_frac", "must be in [0.0, 1.0]");
        }

        let hb = &self.haber_bosch;
        if !(0.0 < hb.availability && hb.availability <= 1.0) {
            push(&mut errors, "haber_bosch.availability", "must be in (0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&hb.min_load_frac) {
            push(&mut errors, "haber_bosch.min_load_frac", "must be in [0.0, 1.0]");
        }
        if hb.ramp_frac_per_h <= 0.0 {
            push(&mut errors, "haber_bosch.ramp_frac_per_h", "must be > 0");
        }

        let nh3s = &self.nh3_storage;
        if nh3s.capacity_ships <= 0.0 {
            push(&mut errors, "nh3_storage.capacity_ships", "must be > 0");
        }
        if nh3s.target_level_ships < 0.0 {
            push(&mut errors, "nh3_storage.target_level_ships", "must be >= 0");
        }
        if nh3s.deadband_ships < 0.0 {
            push(&mut errors, "nh3_storage.deadband_ships", "must be >= 0");
        }

        let w = &self.water;
        if w.kg_per_kg_h2 <= 0.0 {
            push(&mut errors, "water.kg_per_kg_h2", "must be > 0");
        }
        if w.tank_capacity_m3 < 0.0 {
            push(&mut errors, "water.tank_capacity_m3", "must be >= 0");
        }
        if !(0.0..1.0).contains(&w.tank_loss_frac_per_hour) {
            push(&mut errors, "water.tank_loss_frac_per_hour", "must be in [0.0, 1.0)");
        }

        let sh = &self.shipping;
        if sh.ships_per_year <= 0.0 {
            push(&mut errors, "shipping.ships_per_year", "must be > 0");
        }
        if sh.startup_buffer_ships < 0.0 {
            push(&mut errors, "shipping.startup_buffer_ships", "must be >= 0");
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ael_preset_valid() {
        let cfg = ScenarioConfig::ael();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "ael should be valid: {errors:?}");
    }

    #[test]
    fn pem_preset_valid_and_lower_floor() {
        let cfg = ScenarioConfig::from_preset("pem");
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert!(cfg.as_ref().map(|c| c.validate().is_empty()).unwrap_or(false));
        assert_eq!(cfg.as_ref().map(|c| c.electrolyzer.min_load_frac), Some(0.05));
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("milp");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
years = 20
wind_scale = 0.97
seed = 7

[production]
annual_h2_target_t = 120799.0

[electrolyzer]
p_max_mw = 1050.0
spec_kwh_per_kg_h2 = 48.0
min_load_frac = 0.05
ramp_frac_per_h = 0.8
h2_stop_frac = 0.95
h2_start_frac = 0.30

[h2_storage]
capacity_t = 662.0

[nh3_storage]
capacity_ships = 1.25

[water]
tank_capacity_m3 = 4500.0

[shipping]
ships_per_year = 12.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.years), Some(20));
        assert_eq!(cfg.as_ref().map(|c| c.h2_storage.capacity_t), Some(662.0));
        assert_eq!(cfg.as_ref().map(|c| c.water.tank_capacity_m3), Some(4500.0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[electrolyzer]
p_max_mw = 1000.0
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
years = 3
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.years), Some(3));
        // everything else keeps defaults
        assert_eq!(cfg.as_ref().map(|c| c.electrolyzer.spec_kwh_per_kg_h2), Some(48.0));
        assert_eq!(cfg.as_ref().map(|c| c.shipping.ships_per_year), Some(12.0));
    }

    #[test]
    fn validation_catches_zero_years() {
        let mut cfg = ScenarioConfig::ael();
        cfg.simulation.years = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.years"));
    }

    #[test]
    fn validation_catches_inverted_hysteresis() {
        let mut cfg = ScenarioConfig::ael();
        cfg.electrolyzer.h2_start_frac = 0.95;
        cfg.electrolyzer.h2_stop_frac = 0.30;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "electrolyzer.h2_start_frac"));
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut cfg = ScenarioConfig::ael();
        cfg.h2_storage.eta_out = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "h2_storage.eta_out"));
    }

    #[test]
    fn validation_catches_zero_ships() {
        let mut cfg = ScenarioConfig::ael();
        cfg.shipping.ships_per_year = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "shipping.ships_per_year"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }
}
