#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Registry access for pkgtree
//!
//! This crate talks to the package registry and keeps a process-wide
//! metadata cache in front of it. The cache coalesces concurrent requests
//! for the same package name onto a single in-flight fetch and revalidates
//! expired entries with conditional requests.

mod cache;
mod client;

pub use cache::MetaCache;
pub use client::{FetchOutcome, RegistryClient, RegistryConfig};
