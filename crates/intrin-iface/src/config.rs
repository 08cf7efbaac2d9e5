use std::fs;
use std::path::Path;
use std::sync::Arc;

use intrin_core::{ErrorInfo, IntrinError, Value};
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::interface::Interface;
use crate::resources::ResourceSeed;

/// Declarative description of an interface, typically read from TOML:
///
/// ```toml
/// name = "TestInterface"
/// resources = { resource_A = 5, resource_B = 1 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,
}

impl InterfaceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: None,
        }
    }

    pub fn with_resources(mut self, resources: Value) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn validate(&self) -> Result<(), IntrinError> {
        if self.name.trim().is_empty() {
            return Err(IntrinError::Serde(ErrorInfo::new(
                "config.interface_name",
                "interface config missing name",
            )));
        }
        if let Some(resources) = &self.resources {
            ResourceSeed::from_value(resources)?;
        }
        Ok(())
    }
}

pub fn load_interface_config(path: &Path) -> Result<InterfaceConfig, IntrinError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        IntrinError::Serde(
            ErrorInfo::new(
                "config.read",
                format!("failed to read interface config: {err}"),
            )
            .with_context("path", path.display().to_string()),
        )
    })?;
    toml::from_str(&contents).map_err(|err| {
        IntrinError::Serde(
            ErrorInfo::new("config.parse", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}

/// Builds an owned interface from its declarative description.
pub fn create_interface(
    config: &InterfaceConfig,
    backend: Arc<dyn Backend>,
) -> Result<Interface, IntrinError> {
    config.validate()?;
    match &config.resources {
        Some(resources) => {
            let seed = ResourceSeed::from_value(resources)?;
            Ok(Interface::with_resources(
                config.name.clone(),
                &seed,
                backend,
            ))
        }
        None => Ok(Interface::new(config.name.clone(), backend)),
    }
}
