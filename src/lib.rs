//! # apiface-base
//!
//! Core library for computing a public API surface from a raw program model:
//! packages, classes, and members annotated with visibility and inclusion
//! markers. Produces filtered views of the computed surface for downstream
//! emitters (signature writers, stub generators).
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! views      → filtered read-only projections for emitters
//!   ↓
//! analyzer   → propagation, synthesis, reachability closure
//!   ↓
//! predicate  → inclusion predicate + surface membership
//!   ↓
//! model      → arena codebase, items, annotations, type references
//!   ↓
//! base       → primitives (typed ids, visibility, origin, class kind)
//! ```
//!
//! `config` and `diagnostics` are cross-cutting: explicit configuration
//! structs threaded into each component, and the issue-kind taxonomy with a
//! reporter seam for embedders.
//!
//! The required pass order is Propagate → Synthesize-Constructors →
//! Synthesize-Inherited-Members → (emit) → Closure-Check;
//! [`analyzer::ApiAnalyzer`] drives exactly that sequence. After synthesis
//! the model is read-only, and the closure calculator and view layer may be
//! invoked repeatedly.

// ============================================================================
// MODULES (dependency order: base → model → predicate → analyzer → views)
// ============================================================================

/// Foundation types: typed ids, visibility, origin, class kind
pub mod base;

/// Program model: arena codebase, items, annotations, type references
pub mod model;

/// Pipeline configuration structs
pub mod config;

/// Issue taxonomy and the reporter seam
pub mod diagnostics;

/// Inclusion predicate and surface membership
pub mod predicate;

/// Analysis passes: propagation, synthesis, reachability closure
pub mod analyzer;

/// Filtering view layer for emitters
pub mod views;

// Re-export foundation types
pub use base::{
    ClassId, ClassKind, FieldId, ItemId, MethodId, Origin, PackageId, PropertyId, Visibility,
};

// Re-export the main entry points
pub use analyzer::ApiAnalyzer;
pub use config::ApiConfig;
pub use diagnostics::{CollectingReporter, IssueKind, Reporter};
pub use model::{
    AnnotationClassifier, AnnotationRole, Codebase, CodebaseBuilder, ModelError, Showability,
};
pub use predicate::{ApiPredicate, PredicateConfig, SurfaceMembership};
pub use views::{ApiFilters, FilteredCodebase, InterfaceOrder};
