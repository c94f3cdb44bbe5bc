//! Analysis passes.
//!
//! [`ApiAnalyzer`] drives the required sequencing over a sealed model:
//!
//! ```text
//! Propagate → Synthesize-Constructors → Synthesize-Inherited-Members
//!     → (emit) → Closure-Check
//! ```
//!
//! The model is mutated in place only by the propagator and the two
//! synthesizers; the closure calculator is read-only apart from append-only
//! diagnostics and may be invoked repeatedly.

mod constructors;
mod inherited;
mod propagate;
mod stripping;

pub use constructors::add_constructors;
pub use inherited::generate_inherited_stubs;
pub use propagate::Propagator;
pub use stripping::{PermissionLookup, check_permission_coverage, handle_stripping};

use indexmap::IndexSet;

use crate::base::ClassId;
use crate::config::ApiConfig;
use crate::diagnostics::Reporter;
use crate::model::Codebase;
use crate::predicate::ApiPredicate;

/// The one-pass "compute API" driver.
pub struct ApiAnalyzer<'a> {
    config: &'a ApiConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> ApiAnalyzer<'a> {
    pub fn new(config: &'a ApiConfig, reporter: &'a dyn Reporter) -> Self {
        Self { config, reporter }
    }

    /// Run propagation and both synthesizers in their required order.
    /// `filter_emit` selects what emitters will write; `filter_reference`
    /// selects what emitted code may reference.
    pub fn analyze(
        &self,
        cb: &mut Codebase,
        filter_emit: &ApiPredicate,
        filter_reference: &ApiPredicate,
    ) {
        Propagator::new(self.config, self.reporter).propagate(cb);
        add_constructors(cb, filter_emit, self.config.pre_filtered);
        generate_inherited_stubs(cb, filter_emit, filter_reference);
    }

    /// Compute the not-strippable closure and report consistency issues.
    /// Read-only; callable any number of times after [`Self::analyze`].
    pub fn handle_stripping(
        &self,
        cb: &Codebase,
        filter: &ApiPredicate,
    ) -> IndexSet<ClassId> {
        handle_stripping(cb, filter, self.reporter)
    }

    /// Report permission-coverage gaps for privileged surface APIs.
    pub fn check_permission_coverage(
        &self,
        cb: &Codebase,
        filter: &ApiPredicate,
        lookup: &dyn PermissionLookup,
    ) {
        check_permission_coverage(cb, filter, lookup, self.reporter);
    }
}

#[cfg(test)]
mod tests;
