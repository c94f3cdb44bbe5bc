#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use crate::analyzer::{check_permission_coverage, handle_stripping, PermissionLookup};
use crate::base::{ClassKind, ItemId, Visibility};
use crate::diagnostics::{CollectingReporter, IssueKind, NullReporter};
use crate::model::{Annotation, TypeRef};

use super::fixtures::{neutral_builder, open_predicate};

#[test]
fn closure_follows_field_and_signature_references() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let root = b.add_class(p, "Root", ClassKind::Class).unwrap();
    let via_field = b.add_class(p, "ViaField", ClassKind::Class).unwrap();
    let via_return = b.add_class(p, "ViaReturn", ClassKind::Class).unwrap();
    let via_arg = b.add_class(p, "ViaArg", ClassKind::Class).unwrap();
    let list = b.add_class(p, "List", ClassKind::Class).unwrap();
    b.add_field(root, "f", TypeRef::class(via_field)).unwrap();
    let m = b.add_method(root, "m").unwrap();
    b.method_mut(m).return_type = TypeRef::class(via_return);
    b.add_parameter(
        m,
        "xs",
        TypeRef::parameterized(list, vec![TypeRef::class(via_arg)]),
    );
    // Unreferenced, so strippable.
    let orphan = b.add_class(p, "Orphan", ClassKind::Class).unwrap();
    b.class_mut(orphan).flags.emit = false;
    let cb = b.finish();

    let kept = handle_stripping(&cb, &open_predicate(), &NullReporter);
    assert!(kept.contains(&root));
    assert!(kept.contains(&via_field));
    assert!(kept.contains(&via_return));
    assert!(kept.contains(&via_arg));
    assert!(kept.contains(&list));
    assert!(!kept.contains(&orphan));
}

#[test]
fn cyclic_references_terminate() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let a = b.add_class(p, "A", ClassKind::Class).unwrap();
    let c = b.add_class(p, "B", ClassKind::Class).unwrap();
    b.add_field(a, "b", TypeRef::class(c)).unwrap();
    b.add_field(c, "a", TypeRef::class(a)).unwrap();
    let cb = b.finish();

    let kept = handle_stripping(&cb, &open_predicate(), &NullReporter);
    assert!(kept.contains(&a));
    assert!(kept.contains(&c));
}

#[test]
fn supertypes_and_containment_are_retained() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let base = b.add_class(p, "Base", ClassKind::Class).unwrap();
    let iface = b.add_class(p, "I", ClassKind::Interface).unwrap();
    let outer = b.add_class(p, "Outer", ClassKind::Class).unwrap();
    let inner = b.add_nested_class(outer, "Inner", ClassKind::Class).unwrap();
    b.set_super_class(outer, base);
    b.add_interface(outer, iface);
    let cb = b.finish();

    let kept = handle_stripping(&cb, &open_predicate(), &NullReporter);
    assert!(kept.contains(&base));
    assert!(kept.contains(&iface));
    assert!(kept.contains(&inner));
}

#[test]
fn position_selects_the_reported_issue() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let root = b.add_class(p, "Root", ClassKind::Class).unwrap();
    let hidden = b.add_class(p, "Hidden", ClassKind::Class).unwrap();
    b.class_mut(hidden).flags.hidden = true;
    let list = b.add_class(p, "List", ClassKind::Class).unwrap();
    let m = b.add_method(root, "m").unwrap();
    b.method_mut(m).return_type = TypeRef::class(hidden);
    b.add_parameter(
        m,
        "xs",
        TypeRef::parameterized(list, vec![TypeRef::class(hidden)]),
    );
    b.add_field(root, "f", TypeRef::class(hidden)).unwrap();
    let cb = b.finish();

    let reporter = CollectingReporter::default();
    handle_stripping(&cb, &open_predicate(), &reporter);
    assert_eq!(reporter.count_of(IssueKind::UnavailableSymbol), 1);
    assert_eq!(reporter.count_of(IssueKind::HiddenTypeArgument), 1);
    assert_eq!(reporter.count_of(IssueKind::ReferencesHidden), 1);
}

#[test]
fn hidden_and_private_supertypes_are_reported() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let hidden_base = b.add_class(p, "HiddenBase", ClassKind::Class).unwrap();
    b.class_mut(hidden_base).flags.hidden = true;
    let private_iface = b.add_class(p, "P", ClassKind::Interface).unwrap();
    b.class_mut(private_iface).visibility = Visibility::Private;
    let root = b.add_class(p, "Root", ClassKind::Class).unwrap();
    b.set_super_class(root, hidden_base);
    b.add_interface(root, private_iface);
    let cb = b.finish();

    let reporter = CollectingReporter::default();
    handle_stripping(&cb, &open_predicate(), &reporter);
    assert_eq!(reporter.count_of(IssueKind::HiddenSuperclass), 1);
    assert_eq!(reporter.count_of(IssueKind::PrivateSuperclass), 1);
}

#[test]
fn hidden_abstract_method_needs_a_constructible_class() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let root = b.add_class(p, "Root", ClassKind::Class).unwrap();
    b.add_constructor(root).unwrap();
    let m = b.add_method(root, "impossible").unwrap();
    b.method_mut(m).is_abstract = true;
    b.method_mut(m).flags.hidden = true;
    let cb = b.finish();

    let reporter = CollectingReporter::default();
    handle_stripping(&cb, &open_predicate(), &reporter);
    assert_eq!(reporter.count_of(IssueKind::HiddenAbstractMethod), 1);

    // The same shape on an abstract class is fine.
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let root = b.add_class(p, "Root", ClassKind::Class).unwrap();
    b.class_mut(root).is_abstract = true;
    b.add_constructor(root).unwrap();
    let m = b.add_method(root, "impossible").unwrap();
    b.method_mut(m).is_abstract = true;
    b.method_mut(m).flags.hidden = true;
    let cb = b.finish();

    let reporter = CollectingReporter::default();
    handle_stripping(&cb, &open_predicate(), &reporter);
    assert_eq!(reporter.count_of(IssueKind::HiddenAbstractMethod), 0);
}

#[test]
fn deprecated_references_from_live_items_are_reported() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let old = b.add_class(p, "Old", ClassKind::Class).unwrap();
    b.class_mut(old).flags.deprecated = true;
    let root = b.add_class(p, "Root", ClassKind::Class).unwrap();
    b.add_field(root, "f", TypeRef::class(old)).unwrap();
    // A deprecated referrer is symmetric, so silent.
    let also_old = b.add_class(p, "AlsoOld", ClassKind::Class).unwrap();
    b.class_mut(also_old).flags.deprecated = true;
    b.add_field(also_old, "f", TypeRef::class(old)).unwrap();
    let cb = b.finish();

    let reporter = CollectingReporter::default();
    handle_stripping(&cb, &open_predicate(), &reporter);
    assert_eq!(reporter.count_of(IssueKind::ReferencesDeprecated), 1);
}

#[test]
fn stripping_is_read_only_and_repeatable() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let root = b.add_class(p, "Root", ClassKind::Class).unwrap();
    let other = b.add_class(p, "Other", ClassKind::Class).unwrap();
    b.add_field(root, "f", TypeRef::class(other)).unwrap();
    let cb = b.finish();

    let first = handle_stripping(&cb, &open_predicate(), &NullReporter);
    let second = handle_stripping(&cb, &open_predicate(), &NullReporter);
    assert_eq!(
        first.iter().collect::<Vec<_>>(),
        second.iter().collect::<Vec<_>>()
    );
}

struct FixedPermissions;

impl PermissionLookup for FixedPermissions {
    fn required_permissions(&self, annotation: &Annotation) -> Vec<Arc<str>> {
        if annotation.qualified_name.as_ref() == "api.RequiresPermission" {
            annotation
                .attribute("value")
                .map(|v| vec![Arc::from(v)])
                .unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    fn is_defined(&self, permission: &str) -> bool {
        permission == "perm.KNOWN"
    }
}

#[test]
fn undefined_permissions_are_reported_per_use() {
    let mut b = neutral_builder();
    let p = b.add_package("p", None).unwrap();
    let root = b.add_class(p, "Root", ClassKind::Class).unwrap();
    let ok = b.add_method(root, "ok").unwrap();
    b.annotate_method(
        ok,
        Annotation::new("api.RequiresPermission").with_attribute("value", "perm.KNOWN"),
    );
    let bad = b.add_method(root, "bad").unwrap();
    b.annotate_method(
        bad,
        Annotation::new("api.RequiresPermission").with_attribute("value", "perm.MISSING"),
    );
    let cb = b.finish();

    let reporter = CollectingReporter::default();
    check_permission_coverage(&cb, &open_predicate(), &FixedPermissions, &reporter);
    assert_eq!(reporter.count_of(IssueKind::MissingPermission), 1);
    let entries = reporter.entries();
    assert_eq!(entries.len(), 1);
    assert!(matches!(entries[0].item, ItemId::Method(m) if m == bad));
}
