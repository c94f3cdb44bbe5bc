//! Pipeline configuration.
//!
//! Explicit structs threaded into each component's constructor; nothing here
//! is process-wide. The predicate's own knobs live in
//! [`PredicateConfig`](crate::predicate::PredicateConfig).

/// Package-level configuration for the propagator and synthesizers.
#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    /// Packages forced hidden, by qualified name. Takes precedence over the
    /// package's own annotations.
    pub hide_packages: Vec<String>,
    /// Packages whose top-level classes keep their flags but are not written
    /// by emitters.
    pub skip_emit_packages: Vec<String>,
    /// Packages hidden from the surface but retained so generated stubs can
    /// import from them.
    pub stub_import_packages: Vec<String>,
    /// The input model is already a filtered surface: superclass walking in
    /// views passes through unmodified, and constructor synthesis does not
    /// require a pre-existing concrete constructor.
    pub pre_filtered: bool,
}

impl ApiConfig {
    pub fn hides_package(&self, qualified_name: &str) -> bool {
        self.hide_packages.iter().any(|p| p == qualified_name)
    }

    pub fn skips_emit(&self, qualified_name: &str) -> bool {
        self.skip_emit_packages.iter().any(|p| p == qualified_name)
    }

    pub fn is_stub_import(&self, qualified_name: &str) -> bool {
        self.stub_import_packages.iter().any(|p| p == qualified_name)
    }
}
