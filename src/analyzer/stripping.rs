//! Reachability closure over the surface.
//!
//! Starting from every surface-root top-level class, walks all type
//! references (fields, parameters, returns, throws, bounds, supertypes,
//! nesting) and collects the classes that must be retained, the
//! "not-strippable" set. Along the way it reports the self-consistency
//! problems of the emitted surface: references to excluded classes, hidden
//! abstract methods on constructible classes, deprecation asymmetries.
//!
//! The reference graph is implicit, unbounded and possibly cyclic;
//! termination comes from the already-visited short-circuit. The walk is
//! read-only and may be repeated.

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::base::{ClassId, ItemId, Visibility};
use crate::diagnostics::{IssueKind, Reporter};
use crate::model::{Annotation, Codebase, TypeRef};
use crate::predicate::ApiPredicate;

/// Where a type reference appears, for diagnostic selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypePosition {
    /// The outermost type of a method return or parameter.
    Signature,
    /// A generic argument at any depth.
    Argument,
    /// Any other reference (field type, thrown type, bound, supertype).
    Reference,
}

/// Compute the not-strippable set and report surface-consistency issues.
pub fn handle_stripping(
    cb: &Codebase,
    filter: &ApiPredicate,
    reporter: &dyn Reporter,
) -> IndexSet<ClassId> {
    let mut not_strippable = IndexSet::new();
    for package in cb.package_ids() {
        for &class in &cb.package(package).top_level_classes {
            let flags = cb.flags(ItemId::Class(class));
            if flags.emit && !flags.hidden && filter.test(cb, ItemId::Class(class)) {
                visit_class(cb, class, filter, reporter, &mut not_strippable);
            }
        }
    }
    debug!("[STRIPPING] {} classes not strippable", not_strippable.len());
    not_strippable
}

fn visit_class(
    cb: &Codebase,
    class: ClassId,
    filter: &ApiPredicate,
    reporter: &dyn Reporter,
    set: &mut IndexSet<ClassId>,
) {
    // Re-visits are no-ops; this is what terminates cycles.
    if !set.insert(class) {
        return;
    }
    let item = ItemId::Class(class);
    trace!("[STRIPPING] visiting {}", cb.class(class).qualified_name);

    // Supertype consistency.
    if let Some(super_ref) = &cb.class(class).super_class {
        check_supertype(cb, item, super_ref, "superclass", filter, reporter);
    }
    for iface in &cb.class(class).interfaces {
        check_supertype(cb, item, iface, "interface", filter, reporter);
    }

    // A publicly constructible class with a hidden abstract method cannot be
    // implemented outside the surface.
    if publicly_constructible(cb, class) {
        for &method in &cb.class(class).methods {
            let m = cb.method(method);
            if m.is_abstract && m.flags.hidden {
                reporter.report(
                    IssueKind::HiddenAbstractMethod,
                    ItemId::Method(method),
                    &format!(
                        "{} is abstract and hidden but {} is publicly constructible",
                        cb.describe(ItemId::Method(method)),
                        cb.class(class).qualified_name
                    ),
                );
            }
        }
    }

    // Containment, both directions.
    if let Some(outer) = cb.class(class).containing_class {
        visit_class(cb, outer, filter, reporter, set);
    }
    for &nested in &cb.class(class).nested_classes {
        visit_class(cb, nested, filter, reporter, set);
    }

    // Member type references.
    for &field in &cb.class(class).fields {
        if filter.test(cb, ItemId::Field(field)) {
            visit_type(
                cb,
                ItemId::Field(field),
                &cb.field(field).ty,
                TypePosition::Reference,
                filter,
                reporter,
                set,
            );
        }
    }
    for &property in &cb.class(class).properties {
        if filter.test(cb, ItemId::Property(property)) {
            visit_type(
                cb,
                ItemId::Property(property),
                &cb.property(property).ty,
                TypePosition::Reference,
                filter,
                reporter,
                set,
            );
        }
    }
    for &method in cb
        .class(class)
        .methods
        .iter()
        .chain(&cb.class(class).constructors)
    {
        if !filter.test(cb, ItemId::Method(method)) {
            continue;
        }
        let item = ItemId::Method(method);
        let m = cb.method(method);
        visit_type(cb, item, &m.return_type, TypePosition::Signature, filter, reporter, set);
        for parameter in &m.parameters {
            visit_type(cb, item, &parameter.ty, TypePosition::Signature, filter, reporter, set);
        }
        for thrown in &m.throws {
            visit_type(cb, item, thrown, TypePosition::Reference, filter, reporter, set);
        }
    }

    // Type-parameter bounds.
    for type_param in &cb.class(class).type_params {
        for bound in &type_param.bounds {
            visit_type(cb, item, bound, TypePosition::Reference, filter, reporter, set);
        }
    }

    // The transitive supertype set is always retained.
    for sup in cb.super_chain(class) {
        visit_class(cb, sup, filter, reporter, set);
    }
    for iface in cb.reachable_interfaces(class) {
        visit_class(cb, iface, filter, reporter, set);
    }
}

fn check_supertype(
    cb: &Codebase,
    from: ItemId,
    super_ref: &TypeRef,
    relation: &str,
    filter: &ApiPredicate,
    reporter: &dyn Reporter,
) {
    let Some(sup) = super_ref.class_id() else {
        return;
    };
    if cb.class(sup).visibility == Visibility::Private {
        reporter.report(
            IssueKind::PrivateSuperclass,
            from,
            &format!(
                "{} extends private {} {}",
                cb.describe(from),
                relation,
                cb.class(sup).qualified_name
            ),
        );
    } else if excluded(cb, sup, filter) {
        reporter.report(
            IssueKind::HiddenSuperclass,
            from,
            &format!(
                "{} extends hidden {} {}",
                cb.describe(from),
                relation,
                cb.class(sup).qualified_name
            ),
        );
    }
}

fn visit_type(
    cb: &Codebase,
    from: ItemId,
    ty: &TypeRef,
    position: TypePosition,
    filter: &ApiPredicate,
    reporter: &dyn Reporter,
    set: &mut IndexSet<ClassId>,
) {
    let TypeRef::Class { class, arguments, .. } = ty else {
        return;
    };
    let referenced = *class;
    if excluded(cb, referenced, filter) {
        let issue = match position {
            TypePosition::Signature => IssueKind::UnavailableSymbol,
            TypePosition::Argument => IssueKind::HiddenTypeArgument,
            TypePosition::Reference => IssueKind::ReferencesHidden,
        };
        reporter.report(
            issue,
            from,
            &format!(
                "{} references hidden class {}",
                cb.describe(from),
                cb.class(referenced).qualified_name
            ),
        );
    }
    if cb.effectively_deprecated(ItemId::Class(referenced)) && !cb.effectively_deprecated(from) {
        reporter.report(
            IssueKind::ReferencesDeprecated,
            from,
            &format!(
                "{} references deprecated class {}",
                cb.describe(from),
                cb.class(referenced).qualified_name
            ),
        );
    }
    // Unavoidable references are still part of the must-keep closure.
    visit_class(cb, referenced, filter, reporter, set);
    for argument in arguments {
        visit_type(cb, from, argument, TypePosition::Argument, filter, reporter, set);
    }
}

fn excluded(cb: &Codebase, class: ClassId, filter: &ApiPredicate) -> bool {
    cb.flags(ItemId::Class(class)).hidden || !filter.test(cb, ItemId::Class(class))
}

fn publicly_constructible(cb: &Codebase, class: ClassId) -> bool {
    !cb.class(class).is_abstract
        && cb.class(class).kind.has_constructors()
        && cb.class(class).constructors.iter().any(|&ctor| {
            let m = cb.method(ctor);
            m.visibility.is_public_or_protected() && !m.flags.hidden
        })
}

// ============================================================================
// PERMISSION COVERAGE
// ============================================================================

/// External oracle for permission requirements. Manifest lookup itself is
/// out of scope; this subsystem only traverses and reports.
pub trait PermissionLookup {
    /// Permission names the given annotation requires, empty when the
    /// annotation is not permission-related.
    fn required_permissions(&self, annotation: &Annotation) -> Vec<Arc<str>>;

    /// Whether a permission name is defined by the platform/manifest.
    fn is_defined(&self, permission: &str) -> bool;
}

/// Report surface methods requiring permissions the oracle cannot find.
pub fn check_permission_coverage(
    cb: &Codebase,
    filter: &ApiPredicate,
    lookup: &dyn PermissionLookup,
    reporter: &dyn Reporter,
) {
    for class in cb.class_ids() {
        if !filter.test(cb, ItemId::Class(class)) {
            continue;
        }
        for &method in &cb.class(class).methods {
            if !filter.test(cb, ItemId::Method(method)) {
                continue;
            }
            for annotation in &cb.method(method).annotations {
                for permission in lookup.required_permissions(annotation) {
                    if !lookup.is_defined(&permission) {
                        reporter.report(
                            IssueKind::MissingPermission,
                            ItemId::Method(method),
                            &format!(
                                "{} requires undefined permission {}",
                                cb.describe(ItemId::Method(method)),
                                permission
                            ),
                        );
                    }
                }
            }
        }
    }
}
