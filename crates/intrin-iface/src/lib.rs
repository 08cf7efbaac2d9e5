//! Intrinsic interfaces.
//!
//! An [`Interface`] owns a registry of [`IntrinsicDeclaration`]s keyed by
//! unique name and a [`ResourceLedger`] of declared capacities. Every
//! successful registration is forwarded exactly once to a [`Backend`].

pub mod artifact;
pub mod backend;
pub mod config;
pub mod declaration;
pub mod generation;
pub mod interface;
pub mod producer;
pub mod resources;
pub mod snapshot;

pub use artifact::Artifact;
pub use backend::{Backend, NullBackend, RecordingBackend};
pub use config::{create_interface, load_interface_config, InterfaceConfig};
pub use declaration::{declare, IntrinsicDeclaration, Resource};
pub use generation::GenerationContext;
pub use interface::{Interface, RegisterOptions};
pub use producer::{ArtifactRecord, FnProducer, Producer};
pub use resources::{ResourceLedger, ResourceSeed, ResourceUsage};
pub use snapshot::{snapshot_hash, DeclarationSummary, RegistrySnapshot};
