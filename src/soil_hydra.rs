use crate::error::{Result, SoilError};
use crate::infiltration::GreenAmptParams;
use crate::potential::calc_kf;
use crate::retention::{SoilTable, calc_psi_m};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "soil_parameters.toml";
const FALLBACK_SOIL: &str = "loam";

fn default_l() -> f64 {
    0.5
}

// Soil hydraulic parameters (van Genuchten-Mualem model)
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct VanGenuchtenParams {
    pub alpha: f64, // van Genuchten parameter [1/cm]
    pub ks: f64,    // Saturated hydraulic conductivity [cm/day]
    pub n: f64,     // van Genuchten parameter [-]
    #[serde(default = "default_l")]
    pub l: f64, // Pore connectivity [-], Mualem's 0.5 if omitted
}

impl VanGenuchtenParams {
    pub fn new(alpha: f64, ks: f64, n: f64, l: f64) -> Self {
        VanGenuchtenParams { alpha, ks, n, l }
    }

    // Unsaturated conductivity at matric potential psi_m [cm]
    pub fn kf(&self, psi_m: f64) -> f64 {
        calc_kf(self.alpha, self.ks, self.n, self.l, psi_m)
    }

    // Unsaturated conductivity at a water content, psiM taken from the soil's pF curve
    pub fn kf_at(&self, soil: usize, water_content: f64, soil_data: &SoilTable) -> Result<f64> {
        Ok(self.kf(calc_psi_m(soil, water_content, soil_data)?))
    }
}

// pF calibration table as stored in the parameter file, `nan` marks missing points
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RetentionTableConfig {
    #[serde(default)]
    pub soils: Vec<String>, // Names of columns 1..N
    pub rows: Vec<Vec<f64>>, // [water content, pF soil 1, ..., pF soil N]
}

impl RetentionTableConfig {
    pub fn to_table(&self) -> Result<SoilTable> {
        SoilTable::from_rows(&self.rows)
    }

    // Column index of a named soil, column 0 being water content
    pub fn soil_index(&self, name: &str) -> Result<usize> {
        self.soils
            .iter()
            .position(|s| s.eq_ignore_ascii_case(name))
            .map(|i| i + 1)
            .ok_or_else(|| SoilError::UnknownSoil(name.to_string()))
    }
}

// Contents of a soil parameter file
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SoilConfig {
    pub green_ampt: Option<GreenAmptParams>,
    #[serde(default)]
    pub van_genuchten: HashMap<String, VanGenuchtenParams>,
    pub retention: Option<RetentionTableConfig>,
}

impl SoilConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let toml_str = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    /**
    van Genuchten parameters of a named soil.

    Names are matched case-insensitively. An empty name selects loam, and an unknown
    name falls back to loam with a warning when the file defines it.

    # Errors
    `UnknownSoil` if neither the soil nor loam is defined.
    */
    pub fn van_genuchten(&self, soil_name: &str) -> Result<&VanGenuchtenParams> {
        let wanted = if soil_name.is_empty() {
            FALLBACK_SOIL
        } else {
            soil_name
        };

        if let Some(params) = self.lookup(wanted) {
            return Ok(params);
        }

        match self.lookup(FALLBACK_SOIL) {
            Some(params) => {
                log::warn!("soil '{soil_name}' not found, using {FALLBACK_SOIL} parameters");
                Ok(params)
            }
            None => Err(SoilError::UnknownSoil(soil_name.to_string())),
        }
    }

    fn lookup(&self, name: &str) -> Option<&VanGenuchtenParams> {
        self.van_genuchten
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, params)| params)
    }

    pub fn retention_table(&self) -> Result<SoilTable> {
        match &self.retention {
            Some(retention) => retention.to_table(),
            None => Err(SoilError::EmptyTable),
        }
    }
}
