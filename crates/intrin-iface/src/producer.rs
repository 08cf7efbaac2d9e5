use intrin_core::IntrinError;

use crate::artifact::Artifact;
use crate::declaration::Resource;

/// Source of a specification/implementation pair plus the resources the
/// resulting intrinsic consumes.
pub trait Producer {
    /// Name used when the registration does not supply one.
    fn natural_name(&self) -> &str;

    fn produce(&self) -> Result<(Artifact, Artifact), IntrinError>;

    /// Consumption markers, in the order they were attached.
    fn resources(&self) -> &[Resource];
}

/// Producer backed by a closure that builds the artifact pair on demand.
pub struct FnProducer<F> {
    name: String,
    body: F,
    consumes: Vec<Resource>,
}

impl<F> FnProducer<F>
where
    F: Fn() -> (Artifact, Artifact),
{
    pub fn new(name: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            body,
            consumes: Vec::new(),
        }
    }

    /// Records consumption of `count` units of `resource`. Markers
    /// accumulate; repeating one adds another entry.
    pub fn consumes(mut self, resource: impl Into<String>, count: u64) -> Self {
        self.consumes.push(Resource::new(resource, count));
        self
    }

    /// Shorthand for a single unit of `resource`.
    pub fn consumes_one(self, resource: impl Into<String>) -> Self {
        self.consumes(resource, 1)
    }
}

impl<F> Producer for FnProducer<F>
where
    F: Fn() -> (Artifact, Artifact),
{
    fn natural_name(&self) -> &str {
        &self.name
    }

    fn produce(&self) -> Result<(Artifact, Artifact), IntrinError> {
        Ok((self.body)())
    }

    fn resources(&self) -> &[Resource] {
        &self.consumes
    }
}

/// Producer whose artifacts already exist as fields.
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    pub name: String,
    pub specification: Artifact,
    pub implementation: Artifact,
    pub consumes: Vec<Resource>,
}

impl ArtifactRecord {
    pub fn new(name: impl Into<String>, specification: Artifact, implementation: Artifact) -> Self {
        Self {
            name: name.into(),
            specification,
            implementation,
            consumes: Vec::new(),
        }
    }

    pub fn consumes(mut self, resource: impl Into<String>, count: u64) -> Self {
        self.consumes.push(Resource::new(resource, count));
        self
    }

    pub fn consumes_one(self, resource: impl Into<String>) -> Self {
        self.consumes(resource, 1)
    }
}

impl Producer for ArtifactRecord {
    fn natural_name(&self) -> &str {
        &self.name
    }

    fn produce(&self) -> Result<(Artifact, Artifact), IntrinError> {
        Ok((self.specification.clone(), self.implementation.clone()))
    }

    fn resources(&self) -> &[Resource] {
        &self.consumes
    }
}
