//! The inclusion predicate.
//!
//! [`ApiPredicate::test`] decides whether one item belongs to the surface
//! being emitted, combining declared visibility, show/hide annotation state,
//! hidden/doc-only/removed flags, classpath-origin exclusion, and
//! override-based annotation inheritance for methods. Downstream emitters
//! consume the model exclusively through this predicate and the view layer.
//!
//! The propagator must have run before any flags are read here.

use crate::base::{ItemId, Origin, Visibility};
use crate::model::Codebase;

/// Which surface an item belongs to, ordered by breadth.
///
/// `Base` covers items carrying only for-stub-purposes show annotations;
/// `Current` covers items shown into the API proper. Method membership takes
/// the maximum over overridden methods, since annotations need not be
/// repeated on overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SurfaceMembership {
    None,
    Base,
    Current,
}

/// Configuration for one predicate instance. All knobs default to off.
#[derive(Clone, Copy, Debug, Default)]
pub struct PredicateConfig {
    /// Treat every item's removed state as false.
    pub ignore_removed: bool,
    /// The removed state an item must have to be included (used to emit the
    /// removed-API surface).
    pub match_removed: bool,
    /// Include doc-only items.
    pub include_doc_only: bool,
    /// Include items whose membership is for-stub-purposes only.
    pub include_apis_for_stub_purposes: bool,
    /// Treat every item as carrying a show annotation.
    pub ignore_shown: bool,
    /// Allow classes resolved from the dependency classpath.
    pub allow_classes_from_classpath: bool,
    /// Treat overrides of current-surface methods as emittable even when
    /// their own emit bit is unset.
    pub add_additional_overrides: bool,
}

/// The inclusion predicate. Stateless apart from its configuration; the
/// codebase is passed per call so mutating passes can hold the model
/// exclusively between tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApiPredicate {
    pub config: PredicateConfig,
}

impl ApiPredicate {
    pub fn new(config: PredicateConfig) -> Self {
        Self { config }
    }

    /// Does `item` belong to the surface this predicate describes?
    pub fn test(&self, cb: &Codebase, item: ItemId) -> bool {
        // Non-selectable items are governed by their owner.
        if item.is_non_selectable() {
            return true;
        }

        if item.is_member() && !cb.flags(item).emit && !self.rescued_as_override(cb, item) {
            return false;
        }

        if !self.config.allow_classes_from_classpath
            && cb.origin_of(item) == Origin::Classpath
        {
            return false;
        }

        if !self.config.include_apis_for_stub_purposes
            && self.membership(cb, item) == SurfaceMembership::Base
        {
            return false;
        }

        // Aggregate visibility and flags over the item and its containing
        // classes.
        let own = cb.flags(item);
        let mut visible = self.level_visible(cb, item);
        let mut has_show = self.config.ignore_shown || cb.has_show_annotation(item);
        let mut hidden = own.hidden;
        let mut doc_only = own.doc_only;
        let mut removed = own.removed;

        let mut outer = match item {
            ItemId::Class(id) => cb.class(id).containing_class,
            _ => cb.owning_class(item),
        };
        while let Some(class) = outer {
            let class_item = ItemId::Class(class);
            let flags = cb.flags(class_item);
            visible = visible && self.level_visible(cb, class_item);
            has_show = has_show || self.config.ignore_shown || cb.has_show_annotation(class_item);
            hidden = hidden || flags.hidden;
            doc_only = doc_only || flags.doc_only;
            removed = removed || flags.removed;
            outer = cb.class(class).containing_class;
        }

        // Hidden rejection precedes the shown-superclass force-include, so a
        // member left hidden by a non-recursive unhide stays excluded even
        // under a shown superclass.
        if hidden {
            return false;
        }

        let removed = if self.config.ignore_removed { false } else { removed };

        if let Some(owner) = cb.owning_class(item) {
            if let Some(sup) = cb.class(owner).super_class_id() {
                let sh = cb.showability(ItemId::Class(sup));
                if sh.shows() && !sh.for_stubs_only() {
                    return removed == self.config.match_removed;
                }
            }
        }

        if removed != self.config.match_removed {
            return false;
        }
        if doc_only && !self.config.include_doc_only {
            return false;
        }

        visible && has_show
    }

    /// Where the item's annotations place it: no surface, the stub-only base
    /// surface, or the current API surface. Walks to the nearest ancestor
    /// with explicit membership; an explicit hide stops the walk.
    pub fn membership(&self, cb: &Codebase, item: ItemId) -> SurfaceMembership {
        let mut membership = Self::direct_membership(cb, item);
        if let ItemId::Method(method) = item {
            for overridden in cb.overridden_methods(method) {
                membership =
                    membership.max(Self::direct_membership(cb, ItemId::Method(overridden)));
            }
        }
        membership
    }

    fn direct_membership(cb: &Codebase, item: ItemId) -> SurfaceMembership {
        let mut cur = Some(item);
        while let Some(i) = cur {
            let sh = cb.showability(i);
            if sh.hides() {
                return SurfaceMembership::None;
            }
            if sh.shows() {
                return if sh.for_stubs_only() {
                    SurfaceMembership::Base
                } else {
                    SurfaceMembership::Current
                };
            }
            cur = cb.container_of(i);
        }
        SurfaceMembership::None
    }

    /// With `add_additional_overrides`, a method overriding a method in the
    /// current surface is emittable even when nothing set its own emit bit.
    fn rescued_as_override(&self, cb: &Codebase, item: ItemId) -> bool {
        if !self.config.add_additional_overrides {
            return false;
        }
        let ItemId::Method(method) = item else {
            return false;
        };
        cb.overridden_methods(method)
            .into_iter()
            .any(|overridden| {
                Self::direct_membership(cb, ItemId::Method(overridden))
                    == SurfaceMembership::Current
            })
    }

    fn level_visible(&self, cb: &Codebase, item: ItemId) -> bool {
        let visibility = cb.visibility_of(item);
        visibility.is_public_or_protected()
            || (visibility == Visibility::PackagePrivate && cb.has_show_annotation(item))
    }
}
