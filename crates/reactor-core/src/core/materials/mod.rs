//! Material property catalog for plasma-facing, breeding and structural components.
//!
//! A static table of common fusion materials is compiled in; a [`MaterialCatalog`] may layer
//! additional or overriding entries on top of it, loaded from a TOML file.

use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const DEFAULT_MAX_DPA: f64 = 100.0;

fn default_max_dpa() -> f64 {
    DEFAULT_MAX_DPA
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Material {
    pub name: Cow<'static, str>,
    /// kg/m³
    pub density: f64,
    /// W/(m·K)
    pub thermal_conductivity: f64,
    /// J/(kg·K)
    pub specific_heat: f64,
    /// K
    pub melting_point: f64,
    /// K
    pub max_operating_temp: f64,
    /// barn
    pub neutron_absorption_cross_section: f64,
    pub tritium_breeding_ratio: f64,
    #[serde(default = "default_max_dpa")]
    pub max_dpa: f64,
}

impl Material {
    pub fn breeds_tritium(&self) -> bool {
        self.tritium_breeding_ratio > 0.0
    }
}

static BUILTIN_MATERIALS: Map<&'static str, Material> = phf_map! {
    "tungsten" => Material {
        name: Cow::Borrowed("Tungsten"),
        density: 19250.0,
        thermal_conductivity: 173.0,
        specific_heat: 132.0,
        melting_point: 3695.0,
        max_operating_temp: 1500.0,
        neutron_absorption_cross_section: 18.3,
        tritium_breeding_ratio: 0.0,
        max_dpa: DEFAULT_MAX_DPA,
    },
    "beryllium" => Material {
        name: Cow::Borrowed("Beryllium"),
        density: 1848.0,
        thermal_conductivity: 190.0,
        specific_heat: 1825.0,
        melting_point: 1560.0,
        max_operating_temp: 800.0,
        neutron_absorption_cross_section: 0.0092,
        tritium_breeding_ratio: 0.0,
        max_dpa: DEFAULT_MAX_DPA,
    },
    "lithium" => Material {
        name: Cow::Borrowed("Lithium"),
        density: 534.0,
        thermal_conductivity: 84.8,
        specific_heat: 3570.0,
        melting_point: 453.7,
        max_operating_temp: 1000.0,
        neutron_absorption_cross_section: 70.5,
        tritium_breeding_ratio: 1.0,
        max_dpa: DEFAULT_MAX_DPA,
    },
    "lithium_lead" => Material {
        name: Cow::Borrowed("Lithium-Lead"),
        density: 10500.0,
        thermal_conductivity: 15.0,
        specific_heat: 195.0,
        melting_point: 508.0,
        max_operating_temp: 800.0,
        neutron_absorption_cross_section: 45.0,
        tritium_breeding_ratio: 1.2,
        max_dpa: DEFAULT_MAX_DPA,
    },
    "eurofer97" => Material {
        name: Cow::Borrowed("EUROFER97"),
        density: 7850.0,
        thermal_conductivity: 28.0,
        specific_heat: 500.0,
        melting_point: 1800.0,
        max_operating_temp: 550.0,
        neutron_absorption_cross_section: 2.6,
        tritium_breeding_ratio: 0.0,
        max_dpa: DEFAULT_MAX_DPA,
    },
    "helium" => Material {
        name: Cow::Borrowed("Helium"),
        density: 0.1785,
        thermal_conductivity: 0.1513,
        specific_heat: 5193.0,
        melting_point: 0.95,
        max_operating_temp: 1000.0,
        neutron_absorption_cross_section: 0.0,
        tritium_breeding_ratio: 0.0,
        max_dpa: DEFAULT_MAX_DPA,
    },
    "water" => Material {
        name: Cow::Borrowed("Water"),
        density: 1000.0,
        thermal_conductivity: 0.6,
        specific_heat: 4180.0,
        melting_point: 273.15,
        max_operating_temp: 600.0,
        neutron_absorption_cross_section: 0.66,
        tritium_breeding_ratio: 0.0,
        max_dpa: DEFAULT_MAX_DPA,
    },
    "tungsten_copper" => Material {
        name: Cow::Borrowed("Tungsten-Copper Composite"),
        density: 15000.0,
        thermal_conductivity: 200.0,
        specific_heat: 200.0,
        melting_point: 1500.0,
        max_operating_temp: 1500.0,
        neutron_absorption_cross_section: 18.3,
        tritium_breeding_ratio: 0.0,
        max_dpa: DEFAULT_MAX_DPA,
    },
    "hts_magnet" => Material {
        name: Cow::Borrowed("HTS Magnet"),
        density: 8000.0,
        thermal_conductivity: 50.0,
        specific_heat: 200.0,
        melting_point: 2000.0,
        max_operating_temp: 77.0,
        neutron_absorption_cross_section: 0.0,
        tritium_breeding_ratio: 0.0,
        max_dpa: DEFAULT_MAX_DPA,
    },
};

#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("Unknown material identifier: '{0}'")]
    Unknown(String),
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    custom: HashMap<String, Material>,
}

impl MaterialCatalog {
    /// A catalog containing only the built-in materials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads additional materials from a TOML table keyed by identifier. Entries with the
    /// same identifier as a built-in material replace it.
    pub fn load(path: &Path) -> Result<Self, MaterialError> {
        let content = std::fs::read_to_string(path).map_err(|e| MaterialError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let custom: HashMap<String, Material> =
            toml::from_str(&content).map_err(|e| MaterialError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        Ok(Self { custom })
    }

    pub fn insert(&mut self, id: impl Into<String>, material: Material) {
        self.custom.insert(id.into(), material);
    }

    pub fn lookup(&self, id: &str) -> Result<&Material, MaterialError> {
        self.custom
            .get(id)
            .or_else(|| BUILTIN_MATERIALS.get(id))
            .ok_or_else(|| MaterialError::Unknown(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_ok()
    }

    /// All known identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = BUILTIN_MATERIALS
            .keys()
            .copied()
            .chain(self.custom.keys().map(String::as_str))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn builtin_lookup_returns_expected_limits() {
        let catalog = MaterialCatalog::new();
        let tungsten = catalog.lookup("tungsten").unwrap();
        assert_eq!(tungsten.melting_point, 3695.0);
        assert_eq!(tungsten.max_operating_temp, 1500.0);
        assert_eq!(tungsten.max_dpa, 100.0);
        assert!(!tungsten.breeds_tritium());
        assert!(catalog.lookup("lithium_lead").unwrap().breeds_tritium());
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let catalog = MaterialCatalog::new();
        assert!(matches!(
            catalog.lookup("unobtainium"),
            Err(MaterialError::Unknown(id)) if id == "unobtainium"
        ));
    }

    #[test]
    fn identifiers_lists_all_builtins_sorted() {
        let catalog = MaterialCatalog::new();
        let ids = catalog.identifiers();
        assert_eq!(ids.len(), 9);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.contains(&"hts_magnet"));
    }

    #[test]
    fn loaded_entries_extend_and_override_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("materials.toml");
        fs::write(
            &path,
            r#"
[tungsten]
name = "Irradiated Tungsten"
density = 19250.0
thermal_conductivity = 120.0
specific_heat = 132.0
melting_point = 3695.0
max_operating_temp = 1400.0
neutron_absorption_cross_section = 18.3
tritium_breeding_ratio = 0.0
max_dpa = 20.0

[vanadium_alloy]
name = "V-4Cr-4Ti"
density = 6100.0
thermal_conductivity = 31.0
specific_heat = 575.0
melting_point = 2183.0
max_operating_temp = 973.0
neutron_absorption_cross_section = 5.0
tritium_breeding_ratio = 0.0
"#,
        )
        .unwrap();

        let catalog = MaterialCatalog::load(&path).unwrap();
        assert_eq!(catalog.lookup("tungsten").unwrap().max_dpa, 20.0);
        let vanadium = catalog.lookup("vanadium_alloy").unwrap();
        assert_eq!(vanadium.max_dpa, 100.0);
        assert_eq!(vanadium.name, "V-4Cr-4Ti");
        assert_eq!(catalog.identifiers().len(), 10);
    }

    #[test]
    fn malformed_catalog_reports_toml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[tungsten]\ndensity = \"heavy\"\n").unwrap();
        assert!(matches!(
            MaterialCatalog::load(&path),
            Err(MaterialError::Toml { .. })
        ));
    }

    #[test]
    fn missing_catalog_file_reports_io_error() {
        let result = MaterialCatalog::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(MaterialError::Io { .. })));
    }
}
