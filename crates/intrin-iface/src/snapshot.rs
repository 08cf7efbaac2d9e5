use std::collections::BTreeMap;

use intrin_core::{to_canonical_json_bytes, IntrinError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::declaration::{IntrinsicDeclaration, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSummary {
    pub name: String,
    pub specification: String,
    pub implementation: String,
    #[serde(default)]
    pub consumes: Vec<Resource>,
}

impl DeclarationSummary {
    pub fn from_declaration(declaration: &IntrinsicDeclaration) -> Self {
        Self {
            name: declaration.name().to_string(),
            specification: declaration.specification().type_name().to_string(),
            implementation: declaration.implementation().type_name().to_string(),
            consumes: declaration.consumes().to_vec(),
        }
    }
}

/// Serializable view of an interface at one point in time. Declarations are
/// sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub interface: String,
    pub declarations: Vec<DeclarationSummary>,
    #[serde(default)]
    pub resources: BTreeMap<String, u64>,
}

pub fn snapshot_hash(snapshot: &RegistrySnapshot) -> Result<String, IntrinError> {
    let bytes = to_canonical_json_bytes(snapshot)?;
    Ok(hex::encode(Sha256::digest(bytes)))
}
