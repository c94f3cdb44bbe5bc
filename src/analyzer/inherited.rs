//! Inherited-member stub synthesis.
//!
//! Downstream emitters see only surface-visible classes. A visible class
//! whose ancestor chain contains excluded classes would therefore appear to
//! omit methods its interfaces mandate, breaking compilability of generated
//! output. This pass clones those otherwise-unreachable inherited methods
//! into the visible class, and lifts interfaces implemented only by hidden
//! superclasses onto it.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::base::{ClassId, ItemId, MethodId, Origin, Visibility};
use crate::model::{Codebase, ItemFlags, TypeRef};
use crate::predicate::ApiPredicate;

/// Synthesize inherited method stubs and lifted interfaces for every class
/// `filter_emit` selects whose superclass chain crosses classes excluded by
/// `filter_reference`.
pub fn generate_inherited_stubs(
    cb: &mut Codebase,
    filter_emit: &ApiPredicate,
    filter_reference: &ApiPredicate,
) {
    let mut visited = FxHashSet::default();
    for class in cb.class_ids().collect::<Vec<_>>() {
        if !visited.insert(class) {
            continue;
        }
        if !filter_emit.test(cb, ItemId::Class(class)) {
            continue;
        }
        if let Some(plan) = plan_for_class(cb, class, filter_reference) {
            apply_plan(cb, class, plan);
        }
    }
}

/// Everything to graft onto one class, computed read-only before mutation.
struct StubPlan {
    /// (method to clone, hidden class that declared it), closest declaration
    /// first.
    methods: Vec<(MethodId, ClassId)>,
    /// Interfaces implemented by hidden superclasses but absent from the
    /// class's own list, with type variables already substituted.
    interfaces: Vec<TypeRef>,
}

fn plan_for_class(cb: &Codebase, class: ClassId, fr: &ApiPredicate) -> Option<StubPlan> {
    let chain = cb.super_chain(class);
    let hidden: Vec<ClassId> = chain
        .iter()
        .copied()
        .filter(|&c| !fr.test(cb, ItemId::Class(c)))
        .collect();
    if hidden.is_empty() {
        return None;
    }
    trace!(
        "[INHERITED] {} has {} hidden ancestors",
        cb.class(class).qualified_name,
        hidden.len()
    );

    // Candidate slots: the signatures the class must still appear to
    // provide once its hidden ancestors are stripped away.
    let mut slots: IndexMap<SmolStr, Vec<MethodId>> = IndexMap::new();
    let mut add_slot = |cb: &Codebase, method: MethodId| {
        slots
            .entry(cb.method(method).name.clone())
            .or_default()
            .push(method);
    };

    // (a) methods on reference-visible interfaces reachable from the class.
    for iface in cb.reachable_interfaces(class) {
        if !fr.test(cb, ItemId::Class(iface)) {
            continue;
        }
        for &method in &cb.class(iface).methods {
            add_slot(cb, method);
        }
    }
    // (b) abstract public/protected methods on reference-visible
    // superclasses.
    for &sup in &chain {
        if !fr.test(cb, ItemId::Class(sup)) {
            continue;
        }
        for &method in &cb.class(sup).methods {
            let m = cb.method(method);
            if m.is_abstract && m.visibility.is_public_or_protected() {
                add_slot(cb, method);
            }
        }
    }
    // (c) concrete public methods with no hidden-type signature, declared on
    // the hidden segment below the nearest visible ancestor.
    for &sup in chain
        .iter()
        .take_while(|&&c| !fr.test(cb, ItemId::Class(c)))
    {
        for &method in &cb.class(sup).methods {
            let m = cb.method(method);
            if !m.is_abstract
                && m.visibility == Visibility::Public
                && !signature_mentions_excluded(cb, method, fr)
            {
                add_slot(cb, method);
            }
        }
    }

    // Implementations: concrete non-private methods on hidden ancestors
    // matching a slot. Iterating nearest-first means a closer hidden
    // implementation shadows a farther one.
    let mut methods: Vec<(MethodId, ClassId)> = Vec::new();
    for &sup in &hidden {
        for &method in &cb.class(sup).methods {
            let m = cb.method(method);
            if m.visibility == Visibility::Private || m.is_abstract {
                continue;
            }
            let Some(candidates) = slots.get(&m.name) else {
                continue;
            };
            if !candidates
                .iter()
                .any(|&slot| cb.method(slot).signature_matches(m))
            {
                continue;
            }
            // Already overridden by a method the class itself declares.
            if cb
                .class(class)
                .methods
                .iter()
                .any(|&own| cb.method(own).signature_matches(m))
            {
                continue;
            }
            // Overridden by a closer hidden-ancestor implementation.
            if methods
                .iter()
                .any(|&(chosen, _)| cb.method(chosen).signature_matches(m))
            {
                continue;
            }
            methods.push((method, sup));
        }
    }

    // Interfaces implemented by hidden superclasses but missing from the
    // class's own list.
    let own_interfaces: FxHashSet<ClassId> = cb
        .class(class)
        .interfaces
        .iter()
        .filter_map(TypeRef::class_id)
        .collect();
    let mut lifted_ids = FxHashSet::default();
    let mut interfaces = Vec::new();
    for &sup in &hidden {
        let bindings = cb.type_variable_bindings(class, sup);
        for iface in &cb.class(sup).interfaces {
            let Some(id) = iface.class_id() else { continue };
            if own_interfaces.contains(&id) || !lifted_ids.insert(id) {
                continue;
            }
            interfaces.push(iface.substitute(&bindings));
        }
    }

    Some(StubPlan {
        methods,
        interfaces,
    })
}

fn apply_plan(cb: &mut Codebase, class: ClassId, plan: StubPlan) {
    for (source, declaring) in plan.methods {
        // Non-duplication: an equivalent may already exist, e.g. from an
        // earlier run of this pass.
        let already = cb
            .class(class)
            .methods
            .iter()
            .any(|&own| cb.method(own).signature_matches(cb.method(source)));
        if already {
            continue;
        }
        let bindings = cb.type_variable_bindings(class, declaring);
        let mut clone = cb.method(source).clone();
        clone.containing_class = class;
        clone.inherited = true;
        clone.inherited_from = Some(declaring);
        clone.origin = Origin::Synthetic;
        // The source lived in a hidden class; the clone belongs to the
        // surface, keeping only deprecation.
        clone.flags = ItemFlags {
            deprecated: clone.flags.deprecated,
            ..ItemFlags::new()
        };
        clone.return_type = clone.return_type.substitute(&bindings);
        for parameter in &mut clone.parameters {
            parameter.ty = parameter.ty.substitute(&bindings);
        }
        for thrown in &mut clone.throws {
            *thrown = thrown.substitute(&bindings);
        }
        clone.source_order =
            (cb.class(class).methods.len() + cb.class(class).constructors.len()) as u32;
        debug!(
            "[INHERITED] cloning {} into {}",
            cb.describe(ItemId::Method(source)),
            cb.class(class).qualified_name
        );
        let id = cb.push_method(clone);
        cb.class_mut(class).methods.push(id);
    }
    for iface in plan.interfaces {
        cb.class_mut(class).interfaces.push(iface);
    }
}

/// True when any class mentioned in the method's parameter or return types
/// is excluded by the reference filter.
fn signature_mentions_excluded(cb: &Codebase, method: MethodId, fr: &ApiPredicate) -> bool {
    let m = cb.method(method);
    let mut excluded = |id: ClassId| !fr.test(cb, ItemId::Class(id));
    m.return_type.mentions_class_where(&mut excluded)
        || m.parameters
            .iter()
            .any(|p| p.ty.mentions_class_where(&mut excluded))
}
