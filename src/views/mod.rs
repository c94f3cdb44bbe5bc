//! Filtered projections for emitters.
//!
//! Emitters never walk the raw model directly; they see it through small
//! per-kind view structs that compute filtered or reordered results on
//! demand, without mutating or copying the wrapped items. The shared
//! [`ApiFilters`] carries the emit and reference predicates, and
//! [`FilteredCodebase`] carries the current-class context stack for nested
//! emission callbacks.

use std::cmp::Ordering;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::base::{ClassId, FieldId, ItemId, MethodId, PackageId, PropertyId};
use crate::model::{Codebase, TypeRef};
use crate::predicate::ApiPredicate;

// ============================================================================
// FILTER SET
// ============================================================================

/// How a filtered interface list is ordered.
///
/// A sorter rearranges the whole list at once; a comparator orders elements
/// pairwise. The enum makes the two mutually exclusive by construction.
/// Lists of one element or fewer are never reordered.
#[derive(Default)]
pub enum InterfaceOrder {
    #[default]
    Unsorted,
    Sorter(Box<dyn Fn(&mut Vec<TypeRef>)>),
    Comparator(Box<dyn Fn(&TypeRef, &TypeRef) -> Ordering>),
}

impl InterfaceOrder {
    fn apply(&self, list: &mut Vec<TypeRef>) {
        if list.len() <= 1 {
            return;
        }
        match self {
            InterfaceOrder::Unsorted => {}
            InterfaceOrder::Sorter(sorter) => sorter(list),
            InterfaceOrder::Comparator(compare) => list.sort_by(|a, b| compare(a, b)),
        }
    }
}

/// The filter set shared by every view of one emission run.
pub struct ApiFilters {
    /// Selects what emitters write.
    pub emit: ApiPredicate,
    /// Selects what emitted code may reference.
    pub reference: ApiPredicate,
    /// The model is already a filtered surface; superclasses pass through
    /// unmodified.
    pub pre_filtered: bool,
    pub interface_order: InterfaceOrder,
}

impl ApiFilters {
    pub fn new(emit: ApiPredicate, reference: ApiPredicate) -> Self {
        Self {
            emit,
            reference,
            pre_filtered: false,
            interface_order: InterfaceOrder::Unsorted,
        }
    }

    /// A copy of `ty` with every type-use annotation whose declaring class
    /// fails the reference predicate removed. Annotations with no declaring
    /// class in the model are kept.
    fn strip(&self, cb: &Codebase, ty: &TypeRef) -> TypeRef {
        ty.retain_annotations(&mut |annotation| {
            match cb.class_by_qualified_name(&annotation.qualified_name) {
                Some(declaring) => self.reference.test(cb, ItemId::Class(declaring)),
                None => true,
            }
        })
    }
}

// ============================================================================
// FILTERED CODEBASE
// ============================================================================

/// The entry point emitters traverse a computed surface through.
///
/// Wraps a sealed, analyzed model together with one [`ApiFilters`]; hands
/// out per-kind views and tracks the class whose members a nested callback
/// is currently emitting.
pub struct FilteredCodebase<'a> {
    cb: &'a Codebase,
    filters: ApiFilters,
    class_stack: Vec<ClassId>,
}

impl<'a> FilteredCodebase<'a> {
    pub fn new(cb: &'a Codebase, filters: ApiFilters) -> Self {
        Self {
            cb,
            filters,
            class_stack: Vec::new(),
        }
    }

    pub fn codebase(&self) -> &'a Codebase {
        self.cb
    }

    pub fn filters(&self) -> &ApiFilters {
        &self.filters
    }

    pub fn package(&self, id: PackageId) -> PackageView<'_> {
        PackageView {
            cb: self.cb,
            filters: &self.filters,
            id,
        }
    }

    pub fn class(&self, id: ClassId) -> ClassView<'_> {
        ClassView {
            cb: self.cb,
            filters: &self.filters,
            id,
            members_by_reference: false,
        }
    }

    /// Push the class whose members a nested callback is about to visit.
    pub fn enter_class(&mut self, class: ClassId) {
        trace!("[VIEWS] enter {}", self.cb.class(class).qualified_name);
        self.class_stack.push(class);
    }

    /// Pop the current class.
    ///
    /// Panics when `class` does not match the top of the stack; an
    /// unbalanced enter/exit pair is a programming error in the emitter,
    /// not a property of the model.
    pub fn exit_class(&mut self, class: ClassId) {
        match self.class_stack.pop() {
            Some(top) if top == class => {
                trace!("[VIEWS] exit {}", self.cb.class(class).qualified_name);
            }
            Some(top) => panic!(
                "exit_class({}) does not match current class {}",
                self.cb.class(class).qualified_name,
                self.cb.class(top).qualified_name
            ),
            None => panic!(
                "exit_class({}) without a matching enter_class",
                self.cb.class(class).qualified_name
            ),
        }
    }

    /// The class most recently entered and not yet exited.
    pub fn current_class(&self) -> Option<ClassId> {
        self.class_stack.last().copied()
    }
}

// ============================================================================
// PER-KIND VIEWS
// ============================================================================

/// A filtered view of one package.
pub struct PackageView<'a> {
    cb: &'a Codebase,
    filters: &'a ApiFilters,
    id: PackageId,
}

impl<'a> PackageView<'a> {
    pub fn id(&self) -> PackageId {
        self.id
    }

    /// Top-level classes the emit predicate selects.
    pub fn classes(&self) -> Vec<ClassView<'a>> {
        self.cb
            .package(self.id)
            .top_level_classes
            .iter()
            .copied()
            .filter(|&class| self.filters.emit.test(self.cb, ItemId::Class(class)))
            .map(|class| ClassView {
                cb: self.cb,
                filters: self.filters,
                id: class,
                members_by_reference: false,
            })
            .collect()
    }
}

/// A filtered view of one class.
///
/// Member accessors filter by the emit predicate, the outward traversal an
/// emitter performs. [`ClassView::for_reference`] switches them to the
/// reference predicate for inward lookups, such as resolving a type the
/// surface mentions.
pub struct ClassView<'a> {
    cb: &'a Codebase,
    filters: &'a ApiFilters,
    id: ClassId,
    members_by_reference: bool,
}

impl<'a> ClassView<'a> {
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn for_reference(mut self) -> Self {
        self.members_by_reference = true;
        self
    }

    fn member_filter(&self) -> &'a ApiPredicate {
        if self.members_by_reference {
            &self.filters.reference
        } else {
            &self.filters.emit
        }
    }

    /// Implemented interfaces the reference predicate allows, in the
    /// configured order.
    pub fn interfaces(&self) -> Vec<TypeRef> {
        let mut list: Vec<TypeRef> = self
            .cb
            .class(self.id)
            .interfaces
            .iter()
            .filter(|iface| match iface.class_id() {
                Some(id) => self.filters.reference.test(self.cb, ItemId::Class(id)),
                None => true,
            })
            .map(|iface| self.filters.strip(self.cb, iface))
            .collect();
        self.filters.interface_order.apply(&mut list);
        list
    }

    /// The superclass as emitted code may name it: walked up to the nearest
    /// reference-visible ancestor with type variables substituted along the
    /// way, or the declared superclass unmodified when the model is
    /// pre-filtered. `None` when every ancestor is outside the surface.
    /// Terminates on superclass cycles.
    pub fn super_class(&self) -> Option<TypeRef> {
        let declared = self.cb.class(self.id).super_class.clone()?;
        if self.filters.pre_filtered {
            return Some(self.filters.strip(self.cb, &declared));
        }
        let mut seen = FxHashSet::default();
        seen.insert(self.id);
        let mut current = declared;
        loop {
            let Some(sup) = current.class_id() else {
                return Some(current);
            };
            if !seen.insert(sup) {
                return None;
            }
            if self.filters.reference.test(self.cb, ItemId::Class(sup)) {
                return Some(self.filters.strip(self.cb, &current));
            }
            trace!(
                "[VIEWS] {} skips hidden superclass {}",
                self.cb.class(self.id).qualified_name,
                self.cb.class(sup).qualified_name
            );
            // Bind the hidden class's type parameters to the arguments
            // observed at this point in the walk, then step past it.
            let mut bindings = FxHashMap::default();
            for (param, argument) in self
                .cb
                .class(sup)
                .type_params
                .iter()
                .zip(current.arguments())
            {
                bindings.insert(param.name.clone(), argument.clone());
            }
            let next = self.cb.class(sup).super_class.clone()?;
            current = next.substitute(&bindings);
        }
    }

    pub fn constructors(&self) -> Vec<MethodView<'a>> {
        self.members(&self.cb.class(self.id).constructors)
    }

    pub fn methods(&self) -> Vec<MethodView<'a>> {
        self.members(&self.cb.class(self.id).methods)
    }

    fn members(&self, ids: &[MethodId]) -> Vec<MethodView<'a>> {
        let filter = self.member_filter();
        ids.iter()
            .copied()
            .filter(|&m| filter.test(self.cb, ItemId::Method(m)))
            .map(|m| MethodView {
                cb: self.cb,
                filters: self.filters,
                id: m,
            })
            .collect()
    }

    pub fn fields(&self) -> Vec<FieldView<'a>> {
        let filter = self.member_filter();
        self.cb
            .class(self.id)
            .fields
            .iter()
            .copied()
            .filter(|&f| filter.test(self.cb, ItemId::Field(f)))
            .map(|f| FieldView {
                cb: self.cb,
                filters: self.filters,
                id: f,
            })
            .collect()
    }

    pub fn properties(&self) -> Vec<PropertyView<'a>> {
        let filter = self.member_filter();
        self.cb
            .class(self.id)
            .properties
            .iter()
            .copied()
            .filter(|&p| filter.test(self.cb, ItemId::Property(p)))
            .map(|p| PropertyView {
                cb: self.cb,
                filters: self.filters,
                id: p,
            })
            .collect()
    }
}

/// A filtered view of one method or constructor.
pub struct MethodView<'a> {
    cb: &'a Codebase,
    filters: &'a ApiFilters,
    id: MethodId,
}

impl MethodView<'_> {
    pub fn id(&self) -> MethodId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.cb.method(self.id).name
    }

    pub fn return_type(&self) -> TypeRef {
        self.filters.strip(self.cb, &self.cb.method(self.id).return_type)
    }

    pub fn parameter_types(&self) -> Vec<TypeRef> {
        self.cb
            .method(self.id)
            .parameters
            .iter()
            .map(|p| self.filters.strip(self.cb, &p.ty))
            .collect()
    }

    pub fn throws(&self) -> Vec<TypeRef> {
        self.cb
            .method(self.id)
            .throws
            .iter()
            .map(|t| self.filters.strip(self.cb, t))
            .collect()
    }
}

/// A filtered view of one field.
pub struct FieldView<'a> {
    cb: &'a Codebase,
    filters: &'a ApiFilters,
    id: FieldId,
}

impl FieldView<'_> {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.cb.field(self.id).name
    }

    pub fn ty(&self) -> TypeRef {
        self.filters.strip(self.cb, &self.cb.field(self.id).ty)
    }
}

/// A filtered view of one property.
pub struct PropertyView<'a> {
    cb: &'a Codebase,
    filters: &'a ApiFilters,
    id: PropertyId,
}

impl PropertyView<'_> {
    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.cb.property(self.id).name
    }

    pub fn ty(&self) -> TypeRef {
        self.filters.strip(self.cb, &self.cb.property(self.id).ty)
    }
}

#[cfg(test)]
mod tests;
