use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use intrin_core::{codes, ErrorInfo, IntrinError};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::declaration::IntrinsicDeclaration;
use crate::generation::GenerationContext;
use crate::producer::Producer;
use crate::resources::{ResourceLedger, ResourceSeed, ResourceUsage};
use crate::snapshot::{DeclarationSummary, RegistrySnapshot};

/// How a single registration resolves its name.
#[derive(Debug, Clone)]
pub struct RegisterOptions<'a> {
    pub name: Option<String>,
    pub apply_name_prefix: bool,
    pub generation: Option<&'a GenerationContext>,
}

impl Default for RegisterOptions<'_> {
    fn default() -> Self {
        Self {
            name: None,
            apply_name_prefix: true,
            generation: None,
        }
    }
}

impl<'a> RegisterOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Options for a registration made from inside a generator template.
    pub fn generated(ctx: &'a GenerationContext) -> Self {
        Self {
            generation: Some(ctx),
            ..Self::default()
        }
    }

    pub fn without_prefix(mut self) -> Self {
        self.apply_name_prefix = false;
        self
    }

    pub fn with_generation(mut self, ctx: &'a GenerationContext) -> Self {
        self.generation = Some(ctx);
        self
    }
}

#[derive(Debug, Default)]
struct InterfaceState {
    registry: BTreeMap<String, Arc<IntrinsicDeclaration>>,
    ledger: ResourceLedger,
    // summed consumption over `registry`, kept in step with every insert
    consumed: BTreeMap<String, u64>,
}

/// A named registry of intrinsic declarations plus the resource ledger that
/// describes what those intrinsics may consume.
///
/// The name check, the backend call and the insertion happen under one lock,
/// so producers and backends must not call back into the same interface.
pub struct Interface {
    name: String,
    backend: Arc<dyn Backend>,
    state: Mutex<InterfaceState>,
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Interface")
            .field("name", &self.name)
            .field("declarations", &state.registry.keys().collect::<Vec<_>>())
            .field("resources", state.ledger.capacities())
            .finish()
    }
}

impl Interface {
    pub fn new(name: impl Into<String>, backend: Arc<dyn Backend>) -> Self {
        let name = name.into();
        info!(interface = %name, "interface created");
        Self {
            name,
            backend,
            state: Mutex::new(InterfaceState::default()),
        }
    }

    /// Creates an interface whose ledger starts from `seed`. Malformed
    /// entries inside the seed are dropped.
    pub fn with_resources(
        name: impl Into<String>,
        seed: &ResourceSeed,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let interface = Self::new(name, backend);
        let kept = interface.state.lock().ledger.apply_seed(seed);
        debug!(interface = %interface.name, kept, "resources seeded");
        interface
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn resolve_name(&self, natural: &str, options: &RegisterOptions<'_>) -> String {
        let mut name = match &options.name {
            Some(explicit) => explicit.clone(),
            None => format!("{}_{natural}", self.name),
        };
        if options.apply_name_prefix && !name.starts_with(&self.name) {
            name = format!("{}_{name}", self.name);
        }
        match options.generation {
            Some(ctx) => ctx.qualify(&name),
            None => name,
        }
    }

    /// Registers the producer's artifacts under a resolved name.
    pub fn register(
        &self,
        producer: &dyn Producer,
        options: RegisterOptions<'_>,
    ) -> Result<Arc<IntrinsicDeclaration>, IntrinError> {
        let name = self.resolve_name(producer.natural_name(), &options);
        let mut state = self.state.lock();
        if state.registry.contains_key(&name) {
            return Err(IntrinError::Registry(
                ErrorInfo::new(
                    codes::DUPLICATE_NAME,
                    format!("intrinsic {name} is already registered"),
                )
                .with_context("interface", self.name.clone())
                .with_context("name", name.clone())
                .with_hint("pass an explicit name or vary the generator parameters"),
            ));
        }
        let (specification, implementation) = producer.produce()?;
        self.backend
            .register(&name, &specification, &implementation)?;
        let declaration = Arc::new(IntrinsicDeclaration::new(
            name.clone(),
            specification,
            implementation,
            producer.resources().to_vec(),
        ));
        state.registry.insert(name.clone(), Arc::clone(&declaration));
        debug!(
            interface = %self.name,
            name = %name,
            consumes = declaration.consumes().len(),
            "intrinsic registered"
        );
        let mut touched = BTreeSet::new();
        for resource in declaration.consumes() {
            *state.consumed.entry(resource.name.clone()).or_default() += resource.count;
            if resource.count > 0 {
                touched.insert(resource.name.as_str());
            }
        }
        for resource in touched {
            let total = state.consumed.get(resource).copied().unwrap_or_default();
            let usage = state.ledger.usage_of(resource, total);
            if usage.over_capacity {
                warn!(
                    interface = %self.name,
                    resource = %usage.name,
                    capacity = ?usage.capacity,
                    consumed = usage.consumed,
                    "declared consumption exceeds capacity"
                );
            }
        }
        Ok(declaration)
    }

    pub fn set_capacity(&self, name: impl Into<String>, count: u64) {
        self.state.lock().ledger.set_capacity(name, count);
    }

    /// Bulk upsert from dynamic data; see
    /// [`ResourceLedger::set_capacities_from_mapping`].
    pub fn set_capacities_from_mapping<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (intrin_core::Value, intrin_core::Value)>,
    {
        self.state.lock().ledger.set_capacities_from_mapping(entries)
    }

    pub fn get(&self, name: &str) -> Option<Arc<IntrinsicDeclaration>> {
        self.state.lock().registry.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.lock().registry.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.state.lock().registry.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().registry.is_empty()
    }

    pub fn declarations(&self) -> Vec<Arc<IntrinsicDeclaration>> {
        self.state.lock().registry.values().cloned().collect()
    }

    pub fn capacity(&self, resource: &str) -> Option<u64> {
        self.state.lock().ledger.capacity(resource)
    }

    pub fn capacities(&self) -> BTreeMap<String, u64> {
        self.state.lock().ledger.capacities().clone()
    }

    pub fn resource_usage(&self) -> Vec<ResourceUsage> {
        let state = self.state.lock();
        state.ledger.usage(state.registry.values().map(Arc::as_ref))
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.lock();
        RegistrySnapshot {
            interface: self.name.clone(),
            declarations: state
                .registry
                .values()
                .map(|decl| DeclarationSummary::from_declaration(decl))
                .collect(),
            resources: state.ledger.capacities().clone(),
        }
    }
}
