//! Type references.
//!
//! A [`TypeRef`] is the closed set of type shapes the analyzer traverses:
//! class types (with generic arguments), type variables, and primitives.
//! Each carries its own type-use annotations so the view layer can strip
//! annotations whose declaring class is outside the surface.

use smol_str::SmolStr;

use crate::base::ClassId;
use rustc_hash::FxHashMap;

use super::annotations::Annotation;

/// A reference to a type, as it appears in a signature position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    /// A class or interface type, possibly parameterized.
    Class {
        class: ClassId,
        arguments: Vec<TypeRef>,
        annotations: Vec<Annotation>,
    },
    /// A type variable, resolved against the declaring scope's type
    /// parameters.
    Variable {
        name: SmolStr,
        annotations: Vec<Annotation>,
    },
    /// A primitive (or `void`), identified by name.
    Primitive {
        name: SmolStr,
        annotations: Vec<Annotation>,
    },
}

impl TypeRef {
    pub fn class(class: ClassId) -> Self {
        TypeRef::Class {
            class,
            arguments: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn parameterized(class: ClassId, arguments: Vec<TypeRef>) -> Self {
        TypeRef::Class {
            class,
            arguments,
            annotations: Vec::new(),
        }
    }

    pub fn variable(name: impl Into<SmolStr>) -> Self {
        TypeRef::Variable {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn primitive(name: impl Into<SmolStr>) -> Self {
        TypeRef::Primitive {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn void() -> Self {
        Self::primitive("void")
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations_mut().push(annotation);
        self
    }

    pub fn annotations(&self) -> &[Annotation] {
        match self {
            TypeRef::Class { annotations, .. }
            | TypeRef::Variable { annotations, .. }
            | TypeRef::Primitive { annotations, .. } => annotations,
        }
    }

    fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        match self {
            TypeRef::Class { annotations, .. }
            | TypeRef::Variable { annotations, .. }
            | TypeRef::Primitive { annotations, .. } => annotations,
        }
    }

    /// The outermost class id, if this is a class type.
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            TypeRef::Class { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Generic arguments of a class type; empty otherwise.
    pub fn arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Class { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Invoke `f` for every class id referenced by this type, outermost
    /// first, recursing through generic arguments.
    pub fn for_each_class(&self, f: &mut impl FnMut(ClassId)) {
        if let TypeRef::Class { class, arguments, .. } = self {
            f(*class);
            for argument in arguments {
                argument.for_each_class(f);
            }
        }
    }

    /// True if any class id in this type (outermost or nested) satisfies
    /// `pred`.
    pub fn mentions_class_where(&self, pred: &mut impl FnMut(ClassId) -> bool) -> bool {
        let mut found = false;
        self.for_each_class(&mut |id| found = found || pred(id));
        found
    }

    /// Structural equality ignoring type-use annotations.
    ///
    /// This is the signature-matching relation used for override detection
    /// and inherited-stub deduplication.
    pub fn same_erasure(&self, other: &TypeRef) -> bool {
        match (self, other) {
            (
                TypeRef::Class {
                    class: a,
                    arguments: aa,
                    ..
                },
                TypeRef::Class {
                    class: b,
                    arguments: ba,
                    ..
                },
            ) => {
                a == b
                    && aa.len() == ba.len()
                    && aa.iter().zip(ba).all(|(x, y)| x.same_erasure(y))
            }
            (TypeRef::Variable { name: a, .. }, TypeRef::Variable { name: b, .. }) => a == b,
            (TypeRef::Primitive { name: a, .. }, TypeRef::Primitive { name: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Replace type variables per `bindings`, leaving unbound variables as
    /// they are. Used when lifting a hidden superclass's interface onto a
    /// visible subclass.
    pub fn substitute(&self, bindings: &FxHashMap<SmolStr, TypeRef>) -> TypeRef {
        match self {
            TypeRef::Variable { name, annotations } => match bindings.get(name) {
                Some(bound) => bound.clone(),
                None => TypeRef::Variable {
                    name: name.clone(),
                    annotations: annotations.clone(),
                },
            },
            TypeRef::Class {
                class,
                arguments,
                annotations,
            } => TypeRef::Class {
                class: *class,
                arguments: arguments.iter().map(|a| a.substitute(bindings)).collect(),
                annotations: annotations.clone(),
            },
            TypeRef::Primitive { .. } => self.clone(),
        }
    }

    /// A copy of this type with every type-use annotation failing `keep`
    /// removed, recursively.
    pub fn retain_annotations(&self, keep: &mut impl FnMut(&Annotation) -> bool) -> TypeRef {
        match self {
            TypeRef::Class {
                class,
                arguments,
                annotations,
            } => TypeRef::Class {
                class: *class,
                arguments: arguments
                    .iter()
                    .map(|a| a.retain_annotations(keep))
                    .collect(),
                annotations: annotations.iter().filter(|a| keep(a)).cloned().collect(),
            },
            TypeRef::Variable { name, annotations } => TypeRef::Variable {
                name: name.clone(),
                annotations: annotations.iter().filter(|a| keep(a)).cloned().collect(),
            },
            TypeRef::Primitive { name, annotations } => TypeRef::Primitive {
                name: name.clone(),
                annotations: annotations.iter().filter(|a| keep(a)).cloned().collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erasure_ignores_annotations() {
        let a = TypeRef::class(ClassId::new(3));
        let b = TypeRef::class(ClassId::new(3)).with_annotation(Annotation::new("api.NonNull"));
        assert!(a.same_erasure(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn substitute_binds_variables_recursively() {
        let mut bindings = FxHashMap::default();
        bindings.insert(SmolStr::new("T"), TypeRef::class(ClassId::new(7)));
        let list_of_t =
            TypeRef::parameterized(ClassId::new(1), vec![TypeRef::variable("T")]);
        let substituted = list_of_t.substitute(&bindings);
        assert_eq!(substituted.arguments()[0].class_id(), Some(ClassId::new(7)));
        // Unbound variables pass through.
        let unbound = TypeRef::variable("U").substitute(&bindings);
        assert!(matches!(unbound, TypeRef::Variable { ref name, .. } if name == "U"));
    }

    #[test]
    fn for_each_class_walks_arguments() {
        let ty = TypeRef::parameterized(
            ClassId::new(1),
            vec![TypeRef::parameterized(
                ClassId::new(2),
                vec![TypeRef::class(ClassId::new(3))],
            )],
        );
        let mut seen = Vec::new();
        ty.for_each_class(&mut |id| seen.push(id.index()));
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
