#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for pkgtree
//!
//! This crate provides the shared vocabulary of the resolver: version
//! requirements, resolved package descriptors, and the serde models of the
//! registry metadata documents.

pub mod package;
pub mod registry;
pub mod requirement;

pub use package::{Manifest, PackageType};
pub use registry::{MetaDocument, VersionDocument};
pub use requirement::{select_highest, Requirement};

// Re-export commonly used external types
pub use semver::{Version, VersionReq};
