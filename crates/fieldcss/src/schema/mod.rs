//! Field schemas: descriptors, visibility conditions and the registry.

pub mod condition;
pub mod descriptor;
pub mod registry;

pub use condition::{Condition, ConditionScope};
pub use descriptor::{CompositeKind, Field, FieldDescriptor, FieldKind};
pub use registry::{RegistryBuilder, Schema, SchemaRegistry};
