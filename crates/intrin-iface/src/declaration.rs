use intrin_core::IntrinError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::artifact::Artifact;
use crate::backend::Backend;
use crate::producer::Producer;

/// One unit of consumption of a named resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub count: u64,
}

impl Resource {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// A registered intrinsic. Immutable once built.
#[derive(Debug, Clone)]
pub struct IntrinsicDeclaration {
    name: String,
    specification: Artifact,
    implementation: Artifact,
    consumes: Vec<Resource>,
}

impl IntrinsicDeclaration {
    pub(crate) fn new(
        name: String,
        specification: Artifact,
        implementation: Artifact,
        consumes: Vec<Resource>,
    ) -> Self {
        Self {
            name,
            specification,
            implementation,
            consumes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specification(&self) -> &Artifact {
        &self.specification
    }

    pub fn implementation(&self) -> &Artifact {
        &self.implementation
    }

    pub fn consumes(&self) -> &[Resource] {
        &self.consumes
    }

    /// Total count declared for `resource`, duplicates included.
    pub fn consumed(&self, resource: &str) -> u64 {
        self.consumes
            .iter()
            .filter(|entry| entry.name == resource)
            .map(|entry| entry.count)
            .sum()
    }
}

/// Registers a producer with the backend without any interface, under
/// `name` or the producer's natural name.
pub fn declare(
    backend: &dyn Backend,
    producer: &dyn Producer,
    name: Option<&str>,
) -> Result<IntrinsicDeclaration, IntrinError> {
    let name = name.unwrap_or_else(|| producer.natural_name()).to_string();
    let (specification, implementation) = producer.produce()?;
    backend.register(&name, &specification, &implementation)?;
    debug!(name = %name, "standalone intrinsic declared");
    Ok(IntrinsicDeclaration::new(
        name,
        specification,
        implementation,
        producer.resources().to_vec(),
    ))
}
