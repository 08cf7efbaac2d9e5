use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// Opaque specification or implementation payload handed to the backend.
///
/// The registry never looks inside; callers recover their own type with
/// [`Artifact::downcast_ref`].
#[derive(Clone)]
pub struct Artifact {
    type_name: &'static str,
    body: Arc<dyn Any + Send + Sync>,
}

impl Artifact {
    pub fn new<T: Any + Send + Sync>(body: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            body: Arc::new(body),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.body.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True when both handles share the same payload allocation.
    pub fn ptr_eq(&self, other: &Artifact) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Artifact<{}>", self.type_name)
    }
}
