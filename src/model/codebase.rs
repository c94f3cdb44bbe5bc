//! The codebase arena.
//!
//! Single source of truth for all model entities. Packages, classes and
//! members live in flat vectors; every cross-reference is a typed id, so
//! back-references (member → class, class → package) are plain lookups and
//! identity is id-stable for the life of the model.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::{ClassId, FieldId, ItemId, MethodId, PackageId, PropertyId, Visibility};

use super::annotations::{Annotation, AnnotationClassifier, Showability};
use super::item::{Class, Field, ItemFlags, Method, Package, Property};

/// The root of the model: arena storage for every entity plus the
/// annotation-classification oracle and the per-item showability cache.
pub struct Codebase {
    pub(super) packages: Vec<Package>,
    pub(super) classes: Vec<Class>,
    pub(super) methods: Vec<Method>,
    pub(super) fields: Vec<Field>,
    pub(super) properties: Vec<Property>,
    pub(super) classes_by_qname: FxHashMap<Arc<str>, ClassId>,
    pub(super) classifier: Arc<dyn AnnotationClassifier + Send + Sync>,
    /// Cached per-item showability; annotations are immutable after build,
    /// so an entry never goes stale.
    showability: Mutex<FxHashMap<ItemId, Showability>>,
    /// Whether original flag values have been captured. Set by the
    /// propagator's first run.
    pub(crate) flags_snapshotted: bool,
}

impl Codebase {
    pub(super) fn new(classifier: Arc<dyn AnnotationClassifier + Send + Sync>) -> Self {
        Self {
            packages: Vec::new(),
            classes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            classes_by_qname: FxHashMap::default(),
            classifier,
            showability: Mutex::new(FxHashMap::default()),
            flags_snapshotted: false,
        }
    }

    // ========================================================================
    // ARENA ACCESS
    // ========================================================================

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.index()]
    }

    pub(crate) fn package_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id.index()]
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.index()]
    }

    pub(crate) fn method_mut(&mut self, id: MethodId) -> &mut Method {
        &mut self.methods[id.index()]
    }

    pub(crate) fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.fields[id.index()]
    }

    pub(crate) fn property_mut(&mut self, id: PropertyId) -> &mut Property {
        &mut self.properties[id.index()]
    }

    /// Append a synthesized method to the arena. Used by the synthesizers;
    /// wiring it into its class is the caller's job.
    pub(crate) fn push_method(&mut self, method: Method) -> MethodId {
        let id = MethodId::new(self.methods.len());
        self.methods.push(method);
        id
    }

    /// Package ids in containment order (parents precede children; the
    /// builder only accepts a parent that already exists).
    pub fn package_ids(&self) -> impl Iterator<Item = PackageId> + use<> {
        (0..self.packages.len()).map(PackageId::new)
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + use<> {
        (0..self.classes.len()).map(ClassId::new)
    }

    pub fn class_by_qualified_name(&self, qualified_name: &str) -> Option<ClassId> {
        self.classes_by_qname.get(qualified_name).copied()
    }

    // ========================================================================
    // ITEM-GENERIC ACCESS
    // ========================================================================

    /// The flags of any addressable item. Parameters and type parameters
    /// answer with their owner's flags.
    pub fn flags(&self, item: ItemId) -> &ItemFlags {
        match item {
            ItemId::Package(id) => &self.package(id).flags,
            ItemId::Class(id) => &self.class(id).flags,
            ItemId::Method(id) => &self.method(id).flags,
            ItemId::Field(id) => &self.field(id).flags,
            ItemId::Property(id) => &self.property(id).flags,
            ItemId::Parameter(id, _) => &self.method(id).flags,
            ItemId::TypeParameter(id, _) => &self.class(id).flags,
        }
    }

    pub(crate) fn flags_mut(&mut self, item: ItemId) -> &mut ItemFlags {
        match item {
            ItemId::Package(id) => &mut self.package_mut(id).flags,
            ItemId::Class(id) => &mut self.class_mut(id).flags,
            ItemId::Method(id) => &mut self.method_mut(id).flags,
            ItemId::Field(id) => &mut self.field_mut(id).flags,
            ItemId::Property(id) => &mut self.property_mut(id).flags,
            ItemId::Parameter(id, _) => &mut self.method_mut(id).flags,
            ItemId::TypeParameter(id, _) => &mut self.class_mut(id).flags,
        }
    }

    pub fn annotations_of(&self, item: ItemId) -> &[Annotation] {
        match item {
            ItemId::Package(id) => &self.package(id).annotations,
            ItemId::Class(id) => &self.class(id).annotations,
            ItemId::Method(id) => &self.method(id).annotations,
            ItemId::Field(id) => &self.field(id).annotations,
            ItemId::Property(id) => &self.property(id).annotations,
            ItemId::Parameter(..) | ItemId::TypeParameter(..) => &[],
        }
    }

    /// Declared visibility; packages answer public (package inclusion is a
    /// flag matter, not a visibility one).
    pub fn visibility_of(&self, item: ItemId) -> Visibility {
        match item {
            ItemId::Package(_) => Visibility::Public,
            ItemId::Class(id) => self.class(id).visibility,
            ItemId::Method(id) => self.method(id).visibility,
            ItemId::Field(id) => self.field(id).visibility,
            ItemId::Property(id) => self.property(id).visibility,
            ItemId::Parameter(id, _) => self.method(id).visibility,
            ItemId::TypeParameter(id, _) => self.class(id).visibility,
        }
    }

    pub fn origin_of(&self, item: ItemId) -> crate::base::Origin {
        match item {
            ItemId::Package(_) => crate::base::Origin::Source,
            ItemId::Class(id) => self.class(id).origin,
            ItemId::Method(id) => self.method(id).origin,
            ItemId::Field(id) => self.field(id).origin,
            ItemId::Property(id) => self.property(id).origin,
            ItemId::Parameter(id, _) => self.method(id).origin,
            ItemId::TypeParameter(id, _) => self.class(id).origin,
        }
    }

    /// A human-readable qualified name for diagnostics.
    pub fn describe(&self, item: ItemId) -> String {
        match item {
            ItemId::Package(id) => self.package(id).qualified_name.to_string(),
            ItemId::Class(id) => self.class(id).qualified_name.to_string(),
            ItemId::Method(id) => {
                let m = self.method(id);
                format!(
                    "{}.{}({} params)",
                    self.class(m.containing_class).qualified_name,
                    m.name,
                    m.parameters.len()
                )
            }
            ItemId::Field(id) => {
                let f = self.field(id);
                format!("{}.{}", self.class(f.containing_class).qualified_name, f.name)
            }
            ItemId::Property(id) => {
                let p = self.property(id);
                format!("{}.{}", self.class(p.containing_class).qualified_name, p.name)
            }
            ItemId::Parameter(id, index) => {
                format!("parameter {index} of {}", self.describe(ItemId::Method(id)))
            }
            ItemId::TypeParameter(id, index) => {
                format!(
                    "type parameter {index} of {}",
                    self.describe(ItemId::Class(id))
                )
            }
        }
    }

    /// The class that owns an item: members answer their containing class, a
    /// class answers itself.
    pub fn owning_class(&self, item: ItemId) -> Option<ClassId> {
        match item {
            ItemId::Class(id) => Some(id),
            ItemId::Method(id) | ItemId::Parameter(id, _) => {
                Some(self.method(id).containing_class)
            }
            ItemId::Field(id) => Some(self.field(id).containing_class),
            ItemId::Property(id) => Some(self.property(id).containing_class),
            ItemId::TypeParameter(id, _) => Some(id),
            ItemId::Package(_) => None,
        }
    }

    /// The immediate container: member → class, nested class → class,
    /// top-level class → package, package → parent package.
    pub fn container_of(&self, item: ItemId) -> Option<ItemId> {
        match item {
            ItemId::Package(id) => self.package(id).containing_package.map(ItemId::Package),
            ItemId::Class(id) => {
                let class = self.class(id);
                match class.containing_class {
                    Some(outer) => Some(ItemId::Class(outer)),
                    None => Some(ItemId::Package(class.containing_package)),
                }
            }
            ItemId::Method(id) | ItemId::Parameter(id, _) => {
                Some(ItemId::Class(self.method(id).containing_class))
            }
            ItemId::Field(id) => Some(ItemId::Class(self.field(id).containing_class)),
            ItemId::Property(id) => Some(ItemId::Class(self.property(id).containing_class)),
            ItemId::TypeParameter(id, _) => Some(ItemId::Class(id)),
        }
    }

    // ========================================================================
    // DERIVED QUERIES
    // ========================================================================

    /// The cached showability of an item's own annotations.
    pub fn showability(&self, item: ItemId) -> Showability {
        if let Some(cached) = self.showability.lock().get(&item) {
            return *cached;
        }
        let computed = Showability::of(self.annotations_of(item), &*self.classifier);
        self.showability.lock().insert(item, computed);
        computed
    }

    pub fn has_show_annotation(&self, item: ItemId) -> bool {
        self.showability(item).shows()
    }

    /// Effective deprecation: an item is effectively deprecated if it or any
    /// direct non-package container is deprecated. Answered bottom-up on
    /// demand; the propagator does not write deprecation.
    pub fn effectively_deprecated(&self, item: ItemId) -> bool {
        let mut cur = Some(item);
        while let Some(i) = cur {
            if matches!(i, ItemId::Package(_)) {
                return false;
            }
            if self.flags(i).deprecated {
                return true;
            }
            cur = self.container_of(i);
        }
        false
    }

    /// The superclass chain of a class, nearest first, excluding the class
    /// itself. Terminates on cycles.
    pub fn super_chain(&self, class: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(class);
        let mut cur = self.class(class).super_class_id();
        while let Some(sup) = cur {
            if !seen.insert(sup) {
                break;
            }
            chain.push(sup);
            cur = self.class(sup).super_class_id();
        }
        chain
    }

    /// Every interface class reachable from `class`: its own interface list,
    /// those of its superclasses, and interface super-interfaces,
    /// transitively.
    pub fn reachable_interfaces(&self, class: ClassId) -> Vec<ClassId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut stack: Vec<ClassId> = vec![class];
        stack.extend(self.super_chain(class));
        let mut visited_owners = FxHashSet::default();
        while let Some(owner) = stack.pop() {
            if !visited_owners.insert(owner) {
                continue;
            }
            for iface in &self.class(owner).interfaces {
                if let Some(id) = iface.class_id() {
                    if seen.insert(id) {
                        out.push(id);
                        stack.push(id);
                    }
                }
            }
        }
        out
    }

    /// All methods this method transitively overrides, walking the
    /// superclass chain and reachable interfaces of its containing class.
    pub fn overridden_methods(&self, method: MethodId) -> Vec<MethodId> {
        let m = self.method(method);
        if m.is_constructor() {
            return Vec::new();
        }
        let class = m.containing_class;
        let mut out = Vec::new();
        let mut owners = self.super_chain(class);
        owners.extend(self.reachable_interfaces(class));
        for owner in owners {
            for &candidate in &self.class(owner).methods {
                if candidate != method && m.signature_matches(self.method(candidate)) {
                    out.push(candidate);
                }
            }
        }
        out
    }

    /// The type-variable bindings seen when viewing `ancestor` through
    /// `class`'s superclass chain. Empty when `ancestor` is not on the chain
    /// or nothing is parameterized.
    pub fn type_variable_bindings(
        &self,
        class: ClassId,
        ancestor: ClassId,
    ) -> FxHashMap<SmolStr, TypeBinding> {
        let mut bindings: FxHashMap<SmolStr, TypeBinding> = FxHashMap::default();
        let mut cur = class;
        let mut guard = FxHashSet::default();
        while guard.insert(cur) {
            let Some(super_ref) = self.class(cur).super_class.clone() else {
                break;
            };
            let Some(sup) = super_ref.class_id() else {
                break;
            };
            // Arguments as written on `cur`, mapped through bindings
            // accumulated so far.
            let mut next: FxHashMap<SmolStr, TypeBinding> = FxHashMap::default();
            let params = &self.class(sup).type_params;
            for (param, argument) in params.iter().zip(super_ref.arguments()) {
                next.insert(param.name.clone(), argument.substitute(&bindings));
            }
            bindings = next;
            if sup == ancestor {
                return bindings;
            }
            cur = sup;
        }
        FxHashMap::default()
    }

    // ========================================================================
    // FLAG SNAPSHOTS
    // ========================================================================

    /// Capture original hidden/doc-only/removed values once, before the
    /// first propagation run.
    pub(crate) fn snapshot_original_flags(&mut self) {
        if self.flags_snapshotted {
            return;
        }
        for flags in self
            .packages
            .iter_mut()
            .map(|p| &mut p.flags)
            .chain(self.classes.iter_mut().map(|c| &mut c.flags))
            .chain(self.methods.iter_mut().map(|m| &mut m.flags))
            .chain(self.fields.iter_mut().map(|f| &mut f.flags))
            .chain(self.properties.iter_mut().map(|p| &mut p.flags))
        {
            flags.originally_hidden = flags.hidden;
            flags.originally_doc_only = flags.doc_only;
            flags.originally_removed = flags.removed;
        }
        self.flags_snapshotted = true;
    }

    /// Reset effective flags to their snapshot so re-propagation recomputes
    /// from the same starting point.
    pub(crate) fn reset_flags_to_original(&mut self) {
        for flags in self
            .packages
            .iter_mut()
            .map(|p| &mut p.flags)
            .chain(self.classes.iter_mut().map(|c| &mut c.flags))
            .chain(self.methods.iter_mut().map(|m| &mut m.flags))
            .chain(self.fields.iter_mut().map(|f| &mut f.flags))
            .chain(self.properties.iter_mut().map(|p| &mut p.flags))
        {
            flags.hidden = flags.originally_hidden;
            flags.doc_only = flags.originally_doc_only;
            flags.removed = flags.originally_removed;
            flags.unhidden_by_single_show = false;
        }
    }
}

/// A type bound to a type variable through a superclass chain.
pub type TypeBinding = super::types::TypeRef;
