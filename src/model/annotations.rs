//! Annotations and their surface effect.
//!
//! The model stores raw annotations (qualified name + attributes); what an
//! annotation *means* for surface membership is decided by an external
//! [`AnnotationClassifier`] oracle. The combined effect of all annotations on
//! one item is a [`Showability`], cached per item by the codebase.

use std::sync::Arc;

use smol_str::SmolStr;

/// A raw annotation as supplied by the front-end.
///
/// Attributes are kept as name/value string pairs; this subsystem never
/// interprets them itself (the permission-coverage check hands them to an
/// external oracle).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub qualified_name: Arc<str>,
    pub attributes: Vec<(SmolStr, String)>,
}

impl Annotation {
    pub fn new(qualified_name: impl Into<Arc<str>>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// The value of the given attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// How a single annotation affects surface membership.
///
/// Classification is by qualified name only and is treated as an opaque
/// oracle; the classifier is supplied at model-build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationRole {
    /// Forces the annotated item (and its contents) into the surface.
    Show,
    /// Forces inclusion, but only for stub generation purposes.
    ShowForStub,
    /// Forces inclusion of the annotated item alone, without cascading to
    /// its members.
    ShowSingle,
    /// Forces the annotated item out of the surface.
    Hide,
    /// Reverts an earlier show/hide decision. Revert resolution happens
    /// upstream; by the time this subsystem runs a revert has no effect of
    /// its own.
    Revert,
    /// No effect on surface membership.
    Neither,
}

/// Classifies annotation qualified names into surface roles.
pub trait AnnotationClassifier {
    fn classify(&self, qualified_name: &str) -> AnnotationRole;
}

/// A classifier that treats every annotation as [`AnnotationRole::Neither`].
///
/// Useful for models that drive visibility purely through flags.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeutralClassifier;

impl AnnotationClassifier for NeutralClassifier {
    fn classify(&self, _qualified_name: &str) -> AnnotationRole {
        AnnotationRole::Neither
    }
}

/// The combined surface effect of all annotations on one item.
///
/// Derived once per item and cached by the codebase. A hide annotation wins
/// over any show annotation on the same item; among show annotations, the
/// result is recursive if any show is recursive, and for-stubs-only if every
/// show is classified [`AnnotationRole::ShowForStub`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Showability {
    /// No annotation affects membership.
    NoEffect,
    /// Explicitly excluded.
    Hide,
    /// Explicitly included.
    Show {
        /// Whether the show cascades into contained items. A non-recursive
        /// (single) show unhides only the annotated item itself.
        recursive: bool,
        /// Whether the item belongs only to the stub surface, not the base
        /// API surface.
        for_stubs_only: bool,
    },
}

impl Showability {
    /// Combine the annotations of one item into a single showability.
    pub fn of(annotations: &[Annotation], classifier: &dyn AnnotationClassifier) -> Self {
        let mut shows = 0u32;
        let mut recursive = false;
        let mut all_for_stubs = true;
        let mut hides = false;
        for annotation in annotations {
            match classifier.classify(&annotation.qualified_name) {
                AnnotationRole::Show => {
                    shows += 1;
                    recursive = true;
                    all_for_stubs = false;
                }
                AnnotationRole::ShowForStub => {
                    shows += 1;
                    recursive = true;
                }
                AnnotationRole::ShowSingle => {
                    shows += 1;
                    all_for_stubs = false;
                }
                AnnotationRole::Hide => hides = true,
                AnnotationRole::Revert | AnnotationRole::Neither => {}
            }
        }
        if hides {
            Showability::Hide
        } else if shows > 0 {
            Showability::Show {
                recursive,
                for_stubs_only: all_for_stubs,
            }
        } else {
            Showability::NoEffect
        }
    }

    pub fn shows(self) -> bool {
        matches!(self, Showability::Show { .. })
    }

    pub fn hides(self) -> bool {
        matches!(self, Showability::Hide)
    }

    /// True for a show that cascades into contained items.
    pub fn is_recursive(self) -> bool {
        matches!(self, Showability::Show { recursive: true, .. })
    }

    /// True when the item is included only for stub generation.
    pub fn for_stubs_only(self) -> bool {
        matches!(
            self,
            Showability::Show {
                for_stubs_only: true,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PrefixClassifier;

    impl AnnotationClassifier for PrefixClassifier {
        fn classify(&self, qualified_name: &str) -> AnnotationRole {
            match qualified_name {
                "api.Show" => AnnotationRole::Show,
                "api.ShowForStub" => AnnotationRole::ShowForStub,
                "api.ShowSingle" => AnnotationRole::ShowSingle,
                "api.Hide" => AnnotationRole::Hide,
                "api.Revert" => AnnotationRole::Revert,
                _ => AnnotationRole::Neither,
            }
        }
    }

    fn anns(names: &[&str]) -> Vec<Annotation> {
        names.iter().map(|n| Annotation::new(*n)).collect()
    }

    #[test]
    fn hide_wins_over_show() {
        let s = Showability::of(&anns(&["api.Show", "api.Hide"]), &PrefixClassifier);
        assert_eq!(s, Showability::Hide);
    }

    #[test]
    fn single_show_is_not_recursive() {
        let s = Showability::of(&anns(&["api.ShowSingle"]), &PrefixClassifier);
        assert!(s.shows());
        assert!(!s.is_recursive());
        assert!(!s.for_stubs_only());
    }

    #[test]
    fn all_stub_shows_are_for_stubs_only() {
        let s = Showability::of(&anns(&["api.ShowForStub"]), &PrefixClassifier);
        assert!(s.for_stubs_only());
        // A plain show alongside widens membership to the base surface.
        let s = Showability::of(&anns(&["api.ShowForStub", "api.Show"]), &PrefixClassifier);
        assert!(s.shows());
        assert!(!s.for_stubs_only());
    }

    #[test]
    fn revert_and_unknown_have_no_effect() {
        let s = Showability::of(&anns(&["api.Revert", "other.Thing"]), &PrefixClassifier);
        assert_eq!(s, Showability::NoEffect);
    }
}
