#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use crate::base::{ClassId, ClassKind};
use crate::model::{Annotation, CodebaseBuilder, NeutralClassifier, TypeRef};
use crate::predicate::{ApiPredicate, PredicateConfig};

use super::{ApiFilters, FilteredCodebase, InterfaceOrder};

fn builder() -> CodebaseBuilder {
    CodebaseBuilder::new(Arc::new(NeutralClassifier))
}

fn open_predicate() -> ApiPredicate {
    ApiPredicate::new(PredicateConfig {
        ignore_shown: true,
        ..Default::default()
    })
}

fn open_filters() -> ApiFilters {
    ApiFilters::new(open_predicate(), open_predicate())
}

#[test]
fn interfaces_are_filtered_by_the_reference_predicate() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let visible = b.add_class(p, "Visible", ClassKind::Interface).unwrap();
    let hidden = b.add_class(p, "Hidden", ClassKind::Interface).unwrap();
    b.class_mut(hidden).flags.hidden = true;
    let c = b.add_class(p, "C", ClassKind::Class).unwrap();
    b.add_interface(c, visible);
    b.add_interface(c, hidden);
    let cb = b.finish();

    let filtered = FilteredCodebase::new(&cb, open_filters());
    let interfaces = filtered.class(c).interfaces();
    assert_eq!(interfaces.len(), 1);
    assert_eq!(interfaces[0].class_id(), Some(visible));
}

#[test]
fn comparator_orders_the_interface_list() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let ia = b.add_class(p, "A", ClassKind::Interface).unwrap();
    let ib = b.add_class(p, "B", ClassKind::Interface).unwrap();
    let c = b.add_class(p, "C", ClassKind::Class).unwrap();
    b.add_interface(c, ib);
    b.add_interface(c, ia);
    let cb = b.finish();

    let mut filters = open_filters();
    filters.interface_order = InterfaceOrder::Comparator(Box::new(|a, b| {
        a.class_id()
            .map(ClassId::index)
            .cmp(&b.class_id().map(ClassId::index))
    }));
    let filtered = FilteredCodebase::new(&cb, filters);
    let interfaces = filtered.class(c).interfaces();
    assert_eq!(interfaces[0].class_id(), Some(ia));
    assert_eq!(interfaces[1].class_id(), Some(ib));
}

#[test]
fn sorter_never_touches_single_element_lists() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let ia = b.add_class(p, "A", ClassKind::Interface).unwrap();
    let ib = b.add_class(p, "B", ClassKind::Interface).unwrap();
    let one = b.add_class(p, "One", ClassKind::Class).unwrap();
    b.add_interface(one, ia);
    let two = b.add_class(p, "Two", ClassKind::Class).unwrap();
    b.add_interface(two, ia);
    b.add_interface(two, ib);
    let cb = b.finish();

    let mut filters = open_filters();
    filters.interface_order = InterfaceOrder::Sorter(Box::new(|list: &mut Vec<TypeRef>| {
        list.reverse();
    }));
    let filtered = FilteredCodebase::new(&cb, filters);
    assert_eq!(filtered.class(one).interfaces().len(), 1);
    assert_eq!(
        filtered.class(two).interfaces()[0].class_id(),
        Some(ib),
        "two-element lists go through the sorter"
    );
}

#[test]
fn super_class_walks_to_the_nearest_visible_ancestor() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let string = b.add_class(p, "String", ClassKind::Class).unwrap();
    let visible = b.add_class(p, "Visible", ClassKind::Class).unwrap();
    b.add_type_parameter(visible, "T", Vec::new());
    let hidden = b.add_class(p, "Hidden", ClassKind::Class).unwrap();
    b.class_mut(hidden).flags.hidden = true;
    b.add_type_parameter(hidden, "U", Vec::new());
    b.class_mut(hidden).super_class =
        Some(TypeRef::parameterized(visible, vec![TypeRef::variable("U")]));
    let sub = b.add_class(p, "Sub", ClassKind::Class).unwrap();
    b.class_mut(sub).super_class =
        Some(TypeRef::parameterized(hidden, vec![TypeRef::class(string)]));
    let cb = b.finish();

    let filtered = FilteredCodebase::new(&cb, open_filters());
    let sup = filtered.class(sub).super_class().expect("visible ancestor");
    assert_eq!(sup.class_id(), Some(visible));
    assert_eq!(sup.arguments()[0].class_id(), Some(string));
}

#[test]
fn super_class_terminates_on_hidden_superclass_cycles() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let a = b.add_class(p, "A", ClassKind::Class).unwrap();
    b.class_mut(a).flags.hidden = true;
    let c = b.add_class(p, "B", ClassKind::Class).unwrap();
    b.class_mut(c).flags.hidden = true;
    b.set_super_class(a, c);
    b.set_super_class(c, a);
    let sub = b.add_class(p, "Sub", ClassKind::Class).unwrap();
    b.set_super_class(sub, a);
    let cb = b.finish();

    let filtered = FilteredCodebase::new(&cb, open_filters());
    assert_eq!(filtered.class(sub).super_class(), None);
}

#[test]
fn pre_filtered_models_keep_the_declared_superclass() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let hidden = b.add_class(p, "Hidden", ClassKind::Class).unwrap();
    b.class_mut(hidden).flags.hidden = true;
    let sub = b.add_class(p, "Sub", ClassKind::Class).unwrap();
    b.set_super_class(sub, hidden);
    let cb = b.finish();

    let mut filters = open_filters();
    filters.pre_filtered = true;
    let filtered = FilteredCodebase::new(&cb, filters);
    let sup = filtered.class(sub).super_class().expect("passed through");
    assert_eq!(sup.class_id(), Some(hidden));

    // Without pre-filtering the all-hidden chain yields no superclass.
    let filtered = FilteredCodebase::new(&cb, open_filters());
    assert!(filtered.class(sub).super_class().is_none());
}

#[test]
fn member_accessors_filter_by_emit_and_switch_to_reference() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let c = b.add_class(p, "C", ClassKind::Class).unwrap();
    let live = b.add_method(c, "live").unwrap();
    let removed = b.add_method(c, "removed").unwrap();
    b.method_mut(removed).flags.removed = true;
    let cb = b.finish();

    // The reference predicate is broader here: it ignores removal.
    let reference = ApiPredicate::new(PredicateConfig {
        ignore_shown: true,
        ignore_removed: true,
        ..Default::default()
    });
    let filtered = FilteredCodebase::new(&cb, ApiFilters::new(open_predicate(), reference));

    let emitted: Vec<_> = filtered.class(c).methods().iter().map(|m| m.id()).collect();
    assert_eq!(emitted, vec![live]);

    let referable: Vec<_> = filtered
        .class(c)
        .for_reference()
        .methods()
        .iter()
        .map(|m| m.id())
        .collect();
    assert_eq!(referable, vec![live, removed]);
}

#[test]
fn package_view_lists_emitted_top_level_classes() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let shown = b.add_class(p, "Shown", ClassKind::Class).unwrap();
    let hidden = b.add_class(p, "Hidden", ClassKind::Class).unwrap();
    b.class_mut(hidden).flags.hidden = true;
    let cb = b.finish();

    let filtered = FilteredCodebase::new(&cb, open_filters());
    let classes: Vec<_> = filtered.package(p).classes().iter().map(|c| c.id()).collect();
    assert_eq!(classes, vec![shown]);
}

#[test]
fn type_use_annotations_of_excluded_classes_are_stripped() {
    let mut b = builder();
    let p = b.add_package("anno", None).unwrap();
    let hidden_anno = b.add_class(p, "Hidden", ClassKind::Annotation).unwrap();
    b.class_mut(hidden_anno).flags.hidden = true;
    let q = b.add_package("q", None).unwrap();
    let string = b.add_class(q, "String", ClassKind::Class).unwrap();
    let c = b.add_class(q, "C", ClassKind::Class).unwrap();
    let ty = TypeRef::class(string)
        .with_annotation(Annotation::new("anno.Hidden"))
        .with_annotation(Annotation::new("anno.Unknown"));
    let f = b.add_field(c, "f", ty).unwrap();
    let cb = b.finish();

    let filtered = FilteredCodebase::new(&cb, open_filters());
    let fields = filtered.class(c).fields();
    assert_eq!(fields[0].id(), f);
    let annotations = fields[0].ty().annotations().to_vec();
    // The annotation declared by a hidden class goes; the one the model
    // does not know stays.
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].qualified_name.as_ref(), "anno.Unknown");
}

#[test]
fn class_stack_tracks_nested_emission() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let outer = b.add_class(p, "Outer", ClassKind::Class).unwrap();
    let inner = b.add_nested_class(outer, "Inner", ClassKind::Class).unwrap();
    let cb = b.finish();

    let mut filtered = FilteredCodebase::new(&cb, open_filters());
    assert_eq!(filtered.current_class(), None);
    filtered.enter_class(outer);
    filtered.enter_class(inner);
    assert_eq!(filtered.current_class(), Some(inner));
    filtered.exit_class(inner);
    assert_eq!(filtered.current_class(), Some(outer));
    filtered.exit_class(outer);
    assert_eq!(filtered.current_class(), None);
}

#[test]
#[should_panic(expected = "does not match current class")]
fn mismatched_exit_panics() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let a = b.add_class(p, "A", ClassKind::Class).unwrap();
    let other = b.add_class(p, "B", ClassKind::Class).unwrap();
    let cb = b.finish();

    let mut filtered = FilteredCodebase::new(&cb, open_filters());
    filtered.enter_class(a);
    filtered.exit_class(other);
}

#[test]
#[should_panic(expected = "without a matching enter_class")]
fn exit_without_enter_panics() {
    let mut b = builder();
    let p = b.add_package("p", None).unwrap();
    let a = b.add_class(p, "A", ClassKind::Class).unwrap();
    let cb = b.finish();

    let mut filtered = FilteredCodebase::new(&cb, open_filters());
    filtered.exit_class(a);
}

#[test]
fn interface_type_use_annotations_are_stripped() {
    let mut b = builder();
    let p = b.add_package("anno", None).unwrap();
    let hidden_anno = b.add_class(p, "Hidden", ClassKind::Annotation).unwrap();
    b.class_mut(hidden_anno).flags.hidden = true;
    let q = b.add_package("q", None).unwrap();
    let iface = b.add_class(q, "I", ClassKind::Interface).unwrap();
    let c = b.add_class(q, "C", ClassKind::Class).unwrap();
    b.class_mut(c)
        .interfaces
        .push(TypeRef::class(iface).with_annotation(Annotation::new("anno.Hidden")));
    let cb = b.finish();

    let filtered = FilteredCodebase::new(&cb, open_filters());
    let interfaces = filtered.class(c).interfaces();
    assert!(interfaces[0].annotations().is_empty());
}
