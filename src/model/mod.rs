//! Program model: arena codebase, items, annotations, type references.
//!
//! Entities are created by the front-end through [`CodebaseBuilder`], flags
//! are mutated only by the analysis passes during one compute run, and the
//! model is read-only thereafter. Synthesized members (default constructors,
//! inherited method stubs) persist in the arenas for later emission.

mod annotations;
mod builder;
mod codebase;
mod item;
mod types;

pub use annotations::{
    Annotation, AnnotationClassifier, AnnotationRole, NeutralClassifier, Showability,
};
pub use builder::{CodebaseBuilder, ModelError};
pub use codebase::Codebase;
pub use item::{Class, Field, ItemFlags, Method, Package, Parameter, Property, TypeParameter};
pub use types::TypeRef;
