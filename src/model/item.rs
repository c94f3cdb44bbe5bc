//! Model entities: packages, classes, and members.
//!
//! All entities live in the [`Codebase`](super::Codebase) arenas and refer to
//! each other by typed ids only. Flags are mutated exclusively by the
//! propagator and the synthesizers during one compute pass; everything else
//! treats them as read-only.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{ClassId, ClassKind, FieldId, MethodId, MethodKind, Origin, PackageId,
    PropertyId, Visibility};

use super::annotations::Annotation;
use super::types::TypeRef;

/// Inclusion-relevant status bits shared by every item kind.
///
/// The `originally_*` copies are snapshots taken on the propagator's first
/// run; re-running propagation starts over from them, which is what makes
/// the pass idempotent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemFlags {
    pub hidden: bool,
    pub doc_only: bool,
    pub removed: bool,
    pub deprecated: bool,
    /// Whether downstream emitters should write this item. Defaults to true;
    /// cleared for classes in skip-emit packages.
    pub emit: bool,
    pub originally_hidden: bool,
    pub originally_doc_only: bool,
    pub originally_removed: bool,
    /// Set when an originally hidden container was unhidden by a
    /// non-recursive (single) show annotation. Contained items without their
    /// own annotation must then stay hidden.
    pub unhidden_by_single_show: bool,
}

impl ItemFlags {
    pub fn new() -> Self {
        Self {
            emit: true,
            ..Self::default()
        }
    }
}

/// A package. The root (unnamed) package has an empty qualified name and no
/// containing package; it neither inherits nor contributes flags.
#[derive(Clone, Debug)]
pub struct Package {
    pub name: SmolStr,
    pub qualified_name: Arc<str>,
    pub containing_package: Option<PackageId>,
    pub top_level_classes: Vec<ClassId>,
    pub annotations: Vec<Annotation>,
    pub flags: ItemFlags,
    /// Retained for stub imports even though hidden from the surface.
    pub stub_import: bool,
}

/// A class-like declaration (class, interface, enum, annotation type).
#[derive(Clone, Debug)]
pub struct Class {
    pub name: SmolStr,
    pub qualified_name: Arc<str>,
    pub kind: ClassKind,
    pub origin: Origin,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub containing_package: PackageId,
    pub containing_class: Option<ClassId>,
    pub nested_classes: Vec<ClassId>,
    pub super_class: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub type_params: Vec<TypeParameter>,
    pub methods: Vec<MethodId>,
    pub constructors: Vec<MethodId>,
    pub fields: Vec<FieldId>,
    pub properties: Vec<PropertyId>,
    /// The designated default/stub constructor, at most one per class,
    /// chosen or synthesized by the constructor synthesizer.
    pub stub_constructor: Option<MethodId>,
    pub annotations: Vec<Annotation>,
    pub flags: ItemFlags,
}

impl Class {
    /// The outermost class id of the superclass reference, if any.
    pub fn super_class_id(&self) -> Option<ClassId> {
        self.super_class.as_ref().and_then(TypeRef::class_id)
    }
}

/// A declared type parameter with its upper bounds.
#[derive(Clone, Debug)]
pub struct TypeParameter {
    pub name: SmolStr,
    pub bounds: Vec<TypeRef>,
}

/// A method or constructor.
#[derive(Clone, Debug)]
pub struct Method {
    pub name: SmolStr,
    pub kind: MethodKind,
    pub origin: Origin,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub is_static: bool,
    pub is_final: bool,
    pub containing_class: ClassId,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    pub throws: Vec<TypeRef>,
    pub annotations: Vec<Annotation>,
    pub flags: ItemFlags,
    /// For constructors: the superclass constructor this one delegates to in
    /// generated stubs. Threaded by the constructor synthesizer.
    pub super_constructor: Option<MethodId>,
    /// True for method stubs cloned down from an excluded superclass.
    pub inherited: bool,
    /// The class that originally declared an inherited stub.
    pub inherited_from: Option<ClassId>,
    /// Declaration order within the containing class; the final constructor
    /// tie-break.
    pub source_order: u32,
}

impl Method {
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    /// Name plus parameter erasure match; the relation used for override
    /// detection and stub deduplication.
    pub fn signature_matches(&self, other: &Method) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.ty.same_erasure(&b.ty))
    }
}

/// A method parameter.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: SmolStr,
    pub ty: TypeRef,
}

/// A field.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: SmolStr,
    pub visibility: Visibility,
    pub origin: Origin,
    pub containing_class: ClassId,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
    pub flags: ItemFlags,
}

/// A property (accessor pair surfaced as one declaration).
#[derive(Clone, Debug)]
pub struct Property {
    pub name: SmolStr,
    pub visibility: Visibility,
    pub origin: Origin,
    pub containing_class: ClassId,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
    pub flags: ItemFlags,
}
