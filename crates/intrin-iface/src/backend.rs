use intrin_core::IntrinError;
use parking_lot::Mutex;

use crate::artifact::Artifact;

/// Registration hook of the code generator that consumes intrinsics.
///
/// Called exactly once per successful registration and never retried; an
/// error aborts the registration and is returned unchanged to the caller.
pub trait Backend: Send + Sync {
    fn register(
        &self,
        name: &str,
        specification: &Artifact,
        implementation: &Artifact,
    ) -> Result<(), IntrinError>;
}

impl<F> Backend for F
where
    F: Fn(&str, &Artifact, &Artifact) -> Result<(), IntrinError> + Send + Sync,
{
    fn register(
        &self,
        name: &str,
        specification: &Artifact,
        implementation: &Artifact,
    ) -> Result<(), IntrinError> {
        self(name, specification, implementation)
    }
}

/// Accepts every registration and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl Backend for NullBackend {
    fn register(&self, _: &str, _: &Artifact, _: &Artifact) -> Result<(), IntrinError> {
        Ok(())
    }
}

/// Keeps the names it was asked to register, in call order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    names: Mutex<Vec<String>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        self.names.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.names.lock().len()
    }
}

impl Backend for RecordingBackend {
    fn register(&self, name: &str, _: &Artifact, _: &Artifact) -> Result<(), IntrinError> {
        self.names.lock().push(name.to_string());
        Ok(())
    }
}
