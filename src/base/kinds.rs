//! Modifier primitives shared by the whole model.

/// Declared visibility of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Private,
    /// Package-private / internal: visible only inside the declaring package.
    PackagePrivate,
    Protected,
    Public,
}

impl Visibility {
    /// True for visibility levels that can contribute to an API surface
    /// without a show annotation.
    pub fn is_public_or_protected(self) -> bool {
        matches!(self, Visibility::Public | Visibility::Protected)
    }
}

/// Provenance of a class.
///
/// The front-end must tag every class before analysis runs; classpath-origin
/// items are excluded from surfaces unless explicitly allowed, and synthetic
/// items are the ones this subsystem creates itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Declared in the sources under analysis.
    Source,
    /// Resolved from a dependency classpath.
    Classpath,
    /// Synthesized by an analysis pass (default constructors, inherited
    /// method stubs).
    Synthetic,
}

/// The kind of a class-like declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    /// An annotation type declaration.
    Annotation,
}

impl ClassKind {
    /// True for kinds that can own constructors.
    pub fn has_constructors(self) -> bool {
        matches!(self, ClassKind::Class)
    }
}

/// Whether a method arena entry is an ordinary method or a constructor.
///
/// Constructors share the method arena: they carry parameters, throws and
/// annotations exactly like methods, and the synthesizers clone and thread
/// them the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Method,
    Constructor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_ordering() {
        assert!(Visibility::Private < Visibility::PackagePrivate);
        assert!(Visibility::PackagePrivate < Visibility::Protected);
        assert!(Visibility::Protected < Visibility::Public);
        assert!(Visibility::Public.is_public_or_protected());
        assert!(Visibility::Protected.is_public_or_protected());
        assert!(!Visibility::PackagePrivate.is_public_or_protected());
    }

    #[test]
    fn class_kinds_with_constructors() {
        assert!(ClassKind::Class.has_constructors());
        assert!(!ClassKind::Interface.has_constructors());
        assert!(!ClassKind::Enum.has_constructors());
        assert!(!ClassKind::Annotation.has_constructors());
    }
}
