use anyhow::{Context, Result};
use dp_filter::{DataType, Operator, OperatorRegistry};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Optional `dpf` configuration file.
///
/// ```toml
/// [operators]
/// number = ["equals", "between", "is_null"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Operator lists per data type; data types not listed keep the built-in set
    #[serde(default)]
    pub operators: BTreeMap<String, Vec<String>>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs_err::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn registry(&self) -> Result<OperatorRegistry> {
        let mut registry = OperatorRegistry::default();
        for (data_type, names) in &self.operators {
            let data_type: DataType = data_type
                .parse()
                .context("Invalid data type in [operators]")?;
            let operators = names
                .iter()
                .map(|name| name.parse::<Operator>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Invalid operator for {} in [operators]", data_type))?;
            registry = registry.with_operators(data_type, operators);
        }
        Ok(registry)
    }
}
