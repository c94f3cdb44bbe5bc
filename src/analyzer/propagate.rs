//! Visibility/removal propagation.
//!
//! One top-down pass over packages in containment order, then over top-level
//! classes depth-first into members. Overrides flow downward only; this is
//! not a fixed point. The pass is idempotent: original flag values are
//! snapshotted on the first run and every run recomputes from them.
//!
//! Must complete before the predicate or the closure calculator reads flags.

use tracing::{debug, trace};

use crate::base::{ClassId, ItemId, PackageId};
use crate::config::ApiConfig;
use crate::diagnostics::{IssueKind, Reporter};
use crate::model::Codebase;

pub struct Propagator<'a> {
    config: &'a ApiConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> Propagator<'a> {
    pub fn new(config: &'a ApiConfig, reporter: &'a dyn Reporter) -> Self {
        Self { config, reporter }
    }

    /// Run the full propagation pass.
    pub fn propagate(&self, cb: &mut Codebase) {
        cb.snapshot_original_flags();
        cb.reset_flags_to_original();
        debug!(
            "[PROPAGATE] {} packages, {} classes",
            cb.package_ids().count(),
            cb.class_ids().count()
        );

        // Package ids are in containment order: a parent always precedes its
        // children, so inherited flags are final by the time they are read.
        for package in cb.package_ids().collect::<Vec<_>>() {
            self.propagate_package(cb, package);
        }
        for package in cb.package_ids().collect::<Vec<_>>() {
            for class in cb.package(package).top_level_classes.clone() {
                self.propagate_class(cb, class);
            }
        }

        // A shown class drags its containing package back into the surface.
        // Deferred until after the class walk so unannotated siblings still
        // inherit the package's hidden state regardless of declaration
        // order.
        for class in cb.class_ids().collect::<Vec<_>>() {
            if cb.showability(ItemId::Class(class)).shows() {
                let package = cb.class(class).containing_package;
                cb.flags_mut(ItemId::Package(package)).hidden = false;
            }
        }
    }

    fn propagate_package(&self, cb: &mut Codebase, package: PackageId) {
        let qname = cb.package(package).qualified_name.clone();
        let item = ItemId::Package(package);

        if self.config.hides_package(&qname) {
            trace!("[PROPAGATE] package {qname} hidden by hide list");
            cb.flags_mut(item).hidden = true;
        } else if self.config.is_stub_import(&qname) {
            cb.flags_mut(item).hidden = true;
            cb.package_mut(package).stub_import = true;
        } else {
            let sh = cb.showability(item);
            if sh.shows() {
                cb.flags_mut(item).hidden = false;
                if !sh.is_recursive() && cb.flags(item).originally_hidden {
                    cb.flags_mut(item).unhidden_by_single_show = true;
                }
            } else if sh.hides() {
                cb.flags_mut(item).hidden = true;
            } else if let Some(parent) = cb.package(package).containing_package {
                // The unnamed root neither gives nor takes flags.
                if !cb.package(parent).qualified_name.is_empty() {
                    let parent_flags = cb.flags(ItemId::Package(parent)).clone();
                    let flags = cb.flags_mut(item);
                    flags.hidden = flags.hidden || parent_flags.hidden;
                    flags.doc_only = flags.doc_only || parent_flags.doc_only;
                    flags.removed = flags.removed || parent_flags.removed;
                }
            }
        }

        if self.config.skips_emit(&qname) {
            for class in cb.package(package).top_level_classes.clone() {
                cb.flags_mut(ItemId::Class(class)).emit = false;
            }
        }
    }

    fn propagate_class(&self, cb: &mut Codebase, class: ClassId) {
        let item = ItemId::Class(class);
        let container = match cb.class(class).containing_class {
            Some(outer) => ItemId::Class(outer),
            None => ItemId::Package(cb.class(class).containing_package),
        };
        self.apply_overrides(cb, item, container);

        for method in cb.class(class).methods.clone() {
            self.apply_overrides(cb, ItemId::Method(method), item);
        }
        for ctor in cb.class(class).constructors.clone() {
            self.apply_overrides(cb, ItemId::Method(ctor), item);
        }
        for field in cb.class(class).fields.clone() {
            self.apply_overrides(cb, ItemId::Field(field), item);
        }
        for property in cb.class(class).properties.clone() {
            self.apply_overrides(cb, ItemId::Property(property), item);
        }
        for nested in cb.class(class).nested_classes.clone() {
            self.propagate_class(cb, nested);
        }
    }

    /// The class/member step: own show annotation unhides, own hide
    /// annotation hides, otherwise hidden/doc-only/removed are inherited
    /// from the container.
    fn apply_overrides(&self, cb: &mut Codebase, item: ItemId, container: ItemId) {
        let sh = cb.showability(item);
        if sh.shows() {
            let flags = cb.flags_mut(item);
            let was_hidden = flags.originally_hidden;
            flags.hidden = false;
            if !sh.is_recursive() && was_hidden {
                flags.unhidden_by_single_show = true;
            }
            // An unhidden item nested in a hidden class without a
            // compatible annotation of its own is inconsistent. A shown
            // top-level class in a hidden package is fine: it unhides the
            // package instead.
            if matches!(container, ItemId::Class(_))
                && cb.flags(container).hidden
                && !cb.showability(container).shows()
            {
                self.reporter.report(
                    IssueKind::InconsistentShowNesting,
                    item,
                    &format!(
                        "{} {} is shown but its containing {} {} is hidden",
                        item.kind_name(),
                        cb.describe(item),
                        container.kind_name(),
                        cb.describe(container),
                    ),
                );
            }
        } else if sh.hides() {
            cb.flags_mut(item).hidden = true;
        } else {
            let container_flags = cb.flags(container).clone();
            // A container unhidden by a non-recursive show does not cascade
            // its unhiding: unannotated contents stay hidden.
            let inherited_hidden =
                container_flags.hidden || container_flags.unhidden_by_single_show;
            let flags = cb.flags_mut(item);
            flags.hidden = flags.hidden || inherited_hidden;
            flags.doc_only = flags.doc_only || container_flags.doc_only;
            flags.removed = flags.removed || container_flags.removed;
            if inherited_hidden {
                trace!("[PROPAGATE] {} inherits hidden", cb.describe(item));
            }
        }
    }
}
