//! Shared fixtures for the end-to-end surface tests.
//!
//! One small library model is reused across the pipeline and view tests:
//! a public `lib` package whose widget class extends an implementation
//! class in a hidden `lib.internal` package.

#![allow(dead_code)]

use std::sync::Arc;

use apiface::model::AnnotationClassifier;
use apiface::{
    AnnotationRole, ApiConfig, ApiPredicate, ClassId, ClassKind, Codebase, CodebaseBuilder,
    MethodId, PackageId, PredicateConfig, Visibility,
};
use apiface::model::Annotation;

/// Classifies the `api.*` marker annotations the fixtures use.
pub struct MarkerClassifier;

impl AnnotationClassifier for MarkerClassifier {
    fn classify(&self, qualified_name: &str) -> AnnotationRole {
        match qualified_name {
            "api.Show" => AnnotationRole::Show,
            "api.ShowForStub" => AnnotationRole::ShowForStub,
            "api.ShowSingle" => AnnotationRole::ShowSingle,
            "api.Hide" => AnnotationRole::Hide,
            _ => AnnotationRole::Neither,
        }
    }
}

pub fn builder() -> CodebaseBuilder {
    CodebaseBuilder::new(Arc::new(MarkerClassifier))
}

/// The predicate an emitter of the current API surface uses.
pub fn current_api() -> ApiPredicate {
    ApiPredicate::new(PredicateConfig::default())
}

/// Hides `lib.internal` by configuration.
pub fn library_config() -> ApiConfig {
    ApiConfig {
        hide_packages: vec!["lib.internal".to_string()],
        ..ApiConfig::default()
    }
}

/// Ids of everything the library model declares.
pub struct Library {
    pub lib: PackageId,
    pub internal: PackageId,
    pub base: ClassId,
    pub base_ctor: MethodId,
    pub base_render: MethodId,
    pub listener: ClassId,
    pub listener_on_event: MethodId,
    pub widget: ClassId,
    pub widget_ctor_plain: MethodId,
    pub widget_ctor_int: MethodId,
    pub base_impl: ClassId,
    pub base_impl_ctor: MethodId,
    pub base_impl_on_event: MethodId,
    pub base_impl_render: MethodId,
}

/// Builds:
///
/// ```text
/// package lib                       @api.Show on each class
///     abstract class Base           { Base(); abstract protected render() }
///     interface Listener            { onEvent() }
///     class Widget extends lib.internal.BaseImpl
///                                   { Widget(); Widget(int) }
/// package lib.internal              hidden by configuration
///     class BaseImpl extends Base implements Listener
///                                   { BaseImpl(); onEvent(); render() }
/// ```
pub fn library() -> (Codebase, Library) {
    let mut b = builder();
    let lib = b.add_package("lib", None).expect("fresh package");
    let internal = b
        .add_package("lib.internal", Some(lib))
        .expect("fresh package");

    let base = b.add_class(lib, "Base", ClassKind::Class).expect("Base");
    b.class_mut(base).is_abstract = true;
    b.annotate_class(base, Annotation::new("api.Show"));
    let base_ctor = b.add_constructor(base).expect("Base()");
    let base_render = b.add_method(base, "render").expect("render");
    b.method_mut(base_render).is_abstract = true;
    b.method_mut(base_render).visibility = Visibility::Protected;

    let listener = b
        .add_class(lib, "Listener", ClassKind::Interface)
        .expect("Listener");
    b.annotate_class(listener, Annotation::new("api.Show"));
    let listener_on_event = b.add_method(listener, "onEvent").expect("onEvent");
    b.method_mut(listener_on_event).is_abstract = true;

    let base_impl = b
        .add_class(internal, "BaseImpl", ClassKind::Class)
        .expect("BaseImpl");
    b.set_super_class(base_impl, base);
    b.add_interface(base_impl, listener);
    let base_impl_ctor = b.add_constructor(base_impl).expect("BaseImpl()");
    b.method_mut(base_impl_ctor).visibility = Visibility::Protected;
    let base_impl_on_event = b.add_method(base_impl, "onEvent").expect("onEvent impl");
    let base_impl_render = b.add_method(base_impl, "render").expect("render impl");

    let widget = b.add_class(lib, "Widget", ClassKind::Class).expect("Widget");
    b.annotate_class(widget, Annotation::new("api.Show"));
    b.set_super_class(widget, base_impl);
    let widget_ctor_int = b.add_constructor(widget).expect("Widget(int)");
    b.add_parameter(
        widget_ctor_int,
        "size",
        apiface::model::TypeRef::primitive("int"),
    );
    let widget_ctor_plain = b.add_constructor(widget).expect("Widget()");

    (
        b.finish(),
        Library {
            lib,
            internal,
            base,
            base_ctor,
            base_render,
            listener,
            listener_on_event,
            widget,
            widget_ctor_plain,
            widget_ctor_int,
            base_impl,
            base_impl_ctor,
            base_impl_on_event,
            base_impl_render,
        },
    )
}
