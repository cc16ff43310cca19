//! Build descriptors, archive naming, retrieval, and extraction.
//!
//! # Sub-modules
//!
//! - [`error`] — Validation error types for build descriptors.
//! - [`platform`] — Architecture and operating system enums (`Arch`, `Os`).
//! - [`distro`] — Distribution tag newtype (`Distro`).
//! - [`release`] — Release numbers, modifiers, editions, and bounds.
//! - [`version`] — The validated build descriptor (`Version`).
//! - [`format`] — Archive container formats (`ArchiveFormat`).
//! - [`naming`] — Build to download location (`Location`, `Hosts`).
//! - [`filename`] — Archive name back to build (`to_version`).
//! - [`download`] — Archive retrieval trait and HTTP implementation.
//! - [`extraction`] — Archive expansion with mode and timestamp restoration.

pub mod distro;
pub mod download;
pub mod error;
pub mod extraction;
pub mod filename;
pub mod format;
pub mod naming;
pub mod platform;
pub mod release;
pub mod version;
