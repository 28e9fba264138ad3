//! Utilities shared by Turin tests.
//!
//! Class files are synthesized in-process with [`ClassFileBuilder`] so tests
//! never need a Java toolchain, and [`fixtures`] writes them out as jars or
//! class directories.

mod classfile;
pub mod fixtures;

pub use classfile::ClassFileBuilder;
pub use fixtures::{write_class_dir, write_jar};
