//! Foundation types for the apiface toolchain.
//!
//! This module provides fundamental types used throughout the analyzer:
//! - [`PackageId`], [`ClassId`], [`MethodId`], [`FieldId`], [`PropertyId`] -
//!   typed arena indices
//! - [`ItemId`] - closed tagged variant over every addressable item kind
//! - [`Visibility`], [`Origin`], [`ClassKind`], [`MethodKind`] - modifier
//!   primitives
//!
//! This module has NO dependencies on other apiface modules.

mod ids;
mod kinds;

pub use ids::{ClassId, FieldId, ItemId, MethodId, PackageId, PropertyId};
pub use kinds::{ClassKind, MethodKind, Origin, Visibility};
