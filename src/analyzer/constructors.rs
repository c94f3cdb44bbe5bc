//! Default-constructor selection and synthesis.
//!
//! Emitted stubs must be able to call a superclass constructor from every
//! constructor they contain. This pass designates one default constructor
//! per class, threading the superclass's choice onto every subclass
//! constructor, and synthesizes a package-private zero-parameter constructor
//! for classes with no surface-visible one.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::base::{ClassId, ClassKind, ItemId, MethodId, MethodKind, Origin, Visibility};
use crate::model::{Codebase, ItemFlags, Method, TypeRef};
use crate::predicate::ApiPredicate;

/// Designate default constructors across the whole codebase.
///
/// `pre_filtered` marks models that are already a filtered surface; such
/// models synthesize a default constructor even for classes that declare no
/// concrete constructor at all.
pub fn add_constructors(cb: &mut Codebase, filter: &ApiPredicate, pre_filtered: bool) {
    let mut visited = FxHashSet::default();
    for class in cb.class_ids().collect::<Vec<_>>() {
        add_constructors_for(cb, class, filter, pre_filtered, &mut visited);
    }
}

fn add_constructors_for(
    cb: &mut Codebase,
    class: ClassId,
    filter: &ApiPredicate,
    pre_filtered: bool,
    visited: &mut FxHashSet<ClassId>,
) {
    // The visited set both guards re-entrancy and defends against
    // superclass cycles in malformed models.
    if !visited.insert(class) {
        return;
    }
    if cb.class(class).kind != ClassKind::Class {
        return;
    }

    // Superclass first, so its designated constructor exists to thread.
    let super_id = cb.class(class).super_class_id();
    if let Some(sup) = super_id {
        add_constructors_for(cb, sup, filter, pre_filtered, visited);
    }
    let super_default = super_id.and_then(|s| cb.class(s).stub_constructor);

    let mut best: Option<MethodId> = None;
    for &ctor in &cb.class(class).constructors {
        if !filter.test(cb, ItemId::Method(ctor)) {
            continue;
        }
        best = Some(match best {
            None => ctor,
            Some(current) => pick_better(cb, current, ctor),
        });
    }

    let chosen = match best {
        Some(ctor) => {
            trace!(
                "[CONSTRUCTORS] {} uses {}",
                cb.class(class).qualified_name,
                cb.describe(ItemId::Method(ctor))
            );
            Some(ctor)
        }
        None if !cb.class(class).constructors.is_empty() || pre_filtered => {
            // Reuse a previously synthesized default so re-running the pass
            // never duplicates it.
            let existing = cb.class(class).constructors.iter().copied().find(|&c| {
                cb.method(c).origin == Origin::Synthetic && cb.method(c).parameters.is_empty()
            });
            Some(existing.unwrap_or_else(|| synthesize_default(cb, class, super_default)))
        }
        None => None,
    };

    cb.class_mut(class).stub_constructor = chosen;
    for ctor in cb.class(class).constructors.clone() {
        cb.method_mut(ctor).super_constructor = super_default;
    }
}

/// The deterministic tie-break: fewest thrown types, then fewest parameters,
/// then earliest source order.
fn pick_better(cb: &Codebase, a: MethodId, b: MethodId) -> MethodId {
    let (ma, mb) = (cb.method(a), cb.method(b));
    let key_a = (ma.throws.len(), ma.parameters.len(), ma.source_order);
    let key_b = (mb.throws.len(), mb.parameters.len(), mb.source_order);
    if key_b < key_a { b } else { a }
}

fn synthesize_default(
    cb: &mut Codebase,
    class: ClassId,
    super_default: Option<MethodId>,
) -> MethodId {
    debug!(
        "[CONSTRUCTORS] synthesizing default constructor for {}",
        cb.class(class).qualified_name
    );
    let name = cb.class(class).name.clone();
    let source_order =
        (cb.class(class).methods.len() + cb.class(class).constructors.len()) as u32;
    let id = cb.push_method(Method {
        name: SmolStr::new(name),
        kind: MethodKind::Constructor,
        origin: Origin::Synthetic,
        visibility: Visibility::PackagePrivate,
        is_abstract: false,
        is_static: false,
        is_final: false,
        containing_class: class,
        parameters: Vec::new(),
        return_type: TypeRef::void(),
        throws: Vec::new(),
        annotations: Vec::new(),
        flags: ItemFlags::new(),
        super_constructor: super_default,
        inherited: false,
        inherited_from: None,
        source_order,
    });
    cb.class_mut(class).constructors.push(id);
    id
}
