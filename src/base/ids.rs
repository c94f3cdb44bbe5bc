//! Typed arena indices.
//!
//! All cross-references in the model are ids into the [`Codebase`] arenas,
//! never owning pointers, so back-references (member → class, class →
//! package) cannot form ownership cycles. Ids are identity: visited sets and
//! caches key on them directly.
//!
//! [`Codebase`]: crate::model::Codebase

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Index of a package in the codebase arena.
    PackageId
);
arena_id!(
    /// Index of a class in the codebase arena.
    ClassId
);
arena_id!(
    /// Index of a method or constructor in the codebase arena.
    MethodId
);
arena_id!(
    /// Index of a field in the codebase arena.
    FieldId
);
arena_id!(
    /// Index of a property in the codebase arena.
    PropertyId
);

/// An addressable item of any kind.
///
/// A closed sum over the fixed set of item kinds; every component that
/// dispatches on "what is this item" (the inclusion predicate, the
/// propagator, diagnostics) matches over this enum rather than relying on
/// open subclassing.
///
/// Parameters and type parameters are positions on their owning method or
/// class, not arena entries of their own: they are never independently
/// selectable for a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemId {
    Package(PackageId),
    Class(ClassId),
    Method(MethodId),
    Field(FieldId),
    Property(PropertyId),
    /// The `index`-th parameter of a method.
    Parameter(MethodId, u32),
    /// The `index`-th type parameter of a class.
    TypeParameter(ClassId, u32),
}

impl ItemId {
    /// Returns true for item kinds that are never independently selectable
    /// for a surface (inclusion is governed by their owner).
    pub fn is_non_selectable(self) -> bool {
        matches!(self, ItemId::Parameter(..) | ItemId::TypeParameter(..))
    }

    /// Returns true for members of a class (methods, fields, properties).
    pub fn is_member(self) -> bool {
        matches!(
            self,
            ItemId::Method(_) | ItemId::Field(_) | ItemId::Property(_)
        )
    }

    /// A display label for diagnostics.
    pub fn kind_name(self) -> &'static str {
        match self {
            ItemId::Package(_) => "package",
            ItemId::Class(_) => "class",
            ItemId::Method(_) => "method",
            ItemId::Field(_) => "field",
            ItemId::Property(_) => "property",
            ItemId::Parameter(..) => "parameter",
            ItemId::TypeParameter(..) => "type parameter",
        }
    }
}

impl From<PackageId> for ItemId {
    fn from(id: PackageId) -> Self {
        ItemId::Package(id)
    }
}

impl From<ClassId> for ItemId {
    fn from(id: ClassId) -> Self {
        ItemId::Class(id)
    }
}

impl From<MethodId> for ItemId {
    fn from(id: MethodId) -> Self {
        ItemId::Method(id)
    }
}

impl From<FieldId> for ItemId {
    fn from(id: FieldId) -> Self {
        ItemId::Field(id)
    }
}

impl From<PropertyId> for ItemId {
    fn from(id: PropertyId) -> Self {
        ItemId::Property(id)
    }
}
