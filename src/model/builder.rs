//! Model construction.
//!
//! The builder is the front-end seam: an external source-model provider
//! creates packages, classes and members here, with origin tags and raw
//! annotations, then calls [`CodebaseBuilder::finish`] to seal the model for
//! analysis. Construction is the only fallible part of the subsystem;
//! everything after `finish` reports through diagnostics instead of errors.

use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{
    ClassId, ClassKind, FieldId, MethodId, MethodKind, Origin, PackageId, PropertyId, Visibility,
};

use super::annotations::{Annotation, AnnotationClassifier};
use super::codebase::Codebase;
use super::item::{Class, Field, ItemFlags, Method, Package, Parameter, Property, TypeParameter};
use super::types::TypeRef;

/// Errors raised while constructing a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A class with this qualified name already exists.
    #[error("duplicate class: {0}")]
    DuplicateClass(Arc<str>),

    /// A package with this qualified name already exists.
    #[error("duplicate package: {0}")]
    DuplicatePackage(Arc<str>),

    /// A constructor was added to a kind that cannot declare one.
    #[error("constructor on {kind:?} type {name}")]
    ConstructorOnNonClass { kind: ClassKind, name: Arc<str> },

    /// An id referred to an entity that does not exist.
    #[error("unknown {0} id")]
    UnknownId(&'static str),
}

/// Incrementally builds a [`Codebase`].
///
/// The unnamed root package exists from the start at [`PackageId`] 0; named
/// packages default to it as their parent, so package ids are always in
/// containment order.
pub struct CodebaseBuilder {
    codebase: Codebase,
    package_qnames: rustc_hash::FxHashMap<Arc<str>, PackageId>,
}

impl CodebaseBuilder {
    pub fn new(classifier: Arc<dyn AnnotationClassifier + Send + Sync>) -> Self {
        let mut codebase = Codebase::new(classifier);
        codebase.packages.push(Package {
            name: SmolStr::default(),
            qualified_name: Arc::from(""),
            containing_package: None,
            top_level_classes: Vec::new(),
            annotations: Vec::new(),
            flags: ItemFlags::new(),
            stub_import: false,
        });
        let mut package_qnames = rustc_hash::FxHashMap::default();
        package_qnames.insert(Arc::from(""), PackageId::new(0));
        Self {
            codebase,
            package_qnames,
        }
    }

    /// The unnamed root package.
    pub fn root_package(&self) -> PackageId {
        PackageId::new(0)
    }

    pub fn add_package(
        &mut self,
        qualified_name: &str,
        containing_package: Option<PackageId>,
    ) -> Result<PackageId, ModelError> {
        let qname: Arc<str> = Arc::from(qualified_name);
        if self.package_qnames.contains_key(&qname) {
            return Err(ModelError::DuplicatePackage(qname));
        }
        let parent = containing_package.unwrap_or_else(|| self.root_package());
        if parent.index() >= self.codebase.packages.len() {
            return Err(ModelError::UnknownId("package"));
        }
        let id = PackageId::new(self.codebase.packages.len());
        let name = qualified_name.rsplit('.').next().unwrap_or(qualified_name);
        self.codebase.packages.push(Package {
            name: SmolStr::new(name),
            qualified_name: qname.clone(),
            containing_package: Some(parent),
            top_level_classes: Vec::new(),
            annotations: Vec::new(),
            flags: ItemFlags::new(),
            stub_import: false,
        });
        self.package_qnames.insert(qname, id);
        Ok(id)
    }

    pub fn add_class(
        &mut self,
        package: PackageId,
        name: &str,
        kind: ClassKind,
    ) -> Result<ClassId, ModelError> {
        if package.index() >= self.codebase.packages.len() {
            return Err(ModelError::UnknownId("package"));
        }
        let package_qname = &self.codebase.packages[package.index()].qualified_name;
        let qname: Arc<str> = if package_qname.is_empty() {
            Arc::from(name)
        } else {
            Arc::from(format!("{package_qname}.{name}"))
        };
        self.insert_class(qname, name, package, None, kind)
    }

    /// Add a class nested inside `outer`.
    pub fn add_nested_class(
        &mut self,
        outer: ClassId,
        name: &str,
        kind: ClassKind,
    ) -> Result<ClassId, ModelError> {
        if outer.index() >= self.codebase.classes.len() {
            return Err(ModelError::UnknownId("class"));
        }
        let outer_class = &self.codebase.classes[outer.index()];
        let qname: Arc<str> = Arc::from(format!("{}.{name}", outer_class.qualified_name));
        let package = outer_class.containing_package;
        let id = self.insert_class(qname, name, package, Some(outer), kind)?;
        self.codebase.classes[outer.index()].nested_classes.push(id);
        Ok(id)
    }

    fn insert_class(
        &mut self,
        qname: Arc<str>,
        name: &str,
        package: PackageId,
        containing_class: Option<ClassId>,
        kind: ClassKind,
    ) -> Result<ClassId, ModelError> {
        if self.codebase.classes_by_qname.contains_key(&qname) {
            return Err(ModelError::DuplicateClass(qname));
        }
        let id = ClassId::new(self.codebase.classes.len());
        self.codebase.classes.push(Class {
            name: SmolStr::new(name),
            qualified_name: qname.clone(),
            kind,
            origin: Origin::Source,
            visibility: Visibility::Public,
            is_abstract: false,
            containing_package: package,
            containing_class,
            nested_classes: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            stub_constructor: None,
            annotations: Vec::new(),
            flags: ItemFlags::new(),
        });
        if containing_class.is_none() {
            self.codebase.packages[package.index()]
                .top_level_classes
                .push(id);
        }
        self.codebase.classes_by_qname.insert(qname, id);
        Ok(id)
    }

    pub fn add_method(&mut self, class: ClassId, name: &str) -> Result<MethodId, ModelError> {
        self.insert_method(class, name, MethodKind::Method)
    }

    pub fn add_constructor(&mut self, class: ClassId) -> Result<MethodId, ModelError> {
        if class.index() >= self.codebase.classes.len() {
            return Err(ModelError::UnknownId("class"));
        }
        let c = &self.codebase.classes[class.index()];
        if matches!(c.kind, ClassKind::Interface | ClassKind::Annotation) {
            return Err(ModelError::ConstructorOnNonClass {
                kind: c.kind,
                name: c.qualified_name.clone(),
            });
        }
        let name = c.name.clone();
        self.insert_method(class, &name, MethodKind::Constructor)
    }

    fn insert_method(
        &mut self,
        class: ClassId,
        name: &str,
        kind: MethodKind,
    ) -> Result<MethodId, ModelError> {
        if class.index() >= self.codebase.classes.len() {
            return Err(ModelError::UnknownId("class"));
        }
        let owner = &mut self.codebase.classes[class.index()];
        let source_order = (owner.methods.len() + owner.constructors.len()) as u32;
        let id = MethodId::new(self.codebase.methods.len());
        match kind {
            MethodKind::Method => owner.methods.push(id),
            MethodKind::Constructor => owner.constructors.push(id),
        }
        self.codebase.methods.push(Method {
            name: SmolStr::new(name),
            kind,
            origin: Origin::Source,
            visibility: Visibility::Public,
            is_abstract: false,
            is_static: false,
            is_final: false,
            containing_class: class,
            parameters: Vec::new(),
            return_type: TypeRef::void(),
            throws: Vec::new(),
            annotations: Vec::new(),
            flags: ItemFlags::new(),
            super_constructor: None,
            inherited: false,
            inherited_from: None,
            source_order,
        });
        Ok(id)
    }

    pub fn add_field(&mut self, class: ClassId, name: &str, ty: TypeRef) -> Result<FieldId, ModelError> {
        if class.index() >= self.codebase.classes.len() {
            return Err(ModelError::UnknownId("class"));
        }
        let id = FieldId::new(self.codebase.fields.len());
        self.codebase.classes[class.index()].fields.push(id);
        self.codebase.fields.push(Field {
            name: SmolStr::new(name),
            visibility: Visibility::Public,
            origin: Origin::Source,
            containing_class: class,
            ty,
            annotations: Vec::new(),
            flags: ItemFlags::new(),
        });
        Ok(id)
    }

    pub fn add_property(
        &mut self,
        class: ClassId,
        name: &str,
        ty: TypeRef,
    ) -> Result<PropertyId, ModelError> {
        if class.index() >= self.codebase.classes.len() {
            return Err(ModelError::UnknownId("class"));
        }
        let id = PropertyId::new(self.codebase.properties.len());
        self.codebase.classes[class.index()].properties.push(id);
        self.codebase.properties.push(Property {
            name: SmolStr::new(name),
            visibility: Visibility::Public,
            origin: Origin::Source,
            containing_class: class,
            ty,
            annotations: Vec::new(),
            flags: ItemFlags::new(),
        });
        Ok(id)
    }

    // ========================================================================
    // IN-PLACE TWEAKS (pre-finish only; finish consumes the builder)
    // ========================================================================

    pub fn package_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.codebase.packages[id.index()]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.codebase.classes[id.index()]
    }

    pub fn method_mut(&mut self, id: MethodId) -> &mut Method {
        &mut self.codebase.methods[id.index()]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.codebase.fields[id.index()]
    }

    pub fn property_mut(&mut self, id: PropertyId) -> &mut Property {
        &mut self.codebase.properties[id.index()]
    }

    /// Convenience: set a superclass by id without generics.
    pub fn set_super_class(&mut self, class: ClassId, super_class: ClassId) {
        self.codebase.classes[class.index()].super_class = Some(TypeRef::class(super_class));
    }

    /// Convenience: add an implemented interface by id without generics.
    pub fn add_interface(&mut self, class: ClassId, interface: ClassId) {
        self.codebase.classes[class.index()]
            .interfaces
            .push(TypeRef::class(interface));
    }

    /// Convenience: declare a type parameter on a class.
    pub fn add_type_parameter(&mut self, class: ClassId, name: &str, bounds: Vec<TypeRef>) {
        self.codebase.classes[class.index()].type_params.push(TypeParameter {
            name: SmolStr::new(name),
            bounds,
        });
    }

    /// Convenience: append a parameter to a method.
    pub fn add_parameter(&mut self, method: MethodId, name: &str, ty: TypeRef) {
        self.codebase.methods[method.index()].parameters.push(Parameter {
            name: SmolStr::new(name),
            ty,
        });
    }

    /// Convenience: annotate any declaration.
    pub fn annotate_class(&mut self, class: ClassId, annotation: Annotation) {
        self.codebase.classes[class.index()].annotations.push(annotation);
    }

    pub fn annotate_package(&mut self, package: PackageId, annotation: Annotation) {
        self.codebase.packages[package.index()].annotations.push(annotation);
    }

    pub fn annotate_method(&mut self, method: MethodId, annotation: Annotation) {
        self.codebase.methods[method.index()].annotations.push(annotation);
    }

    /// Seal the model. After this, flags are mutated only by the analysis
    /// passes.
    pub fn finish(self) -> Codebase {
        self.codebase
    }
}
