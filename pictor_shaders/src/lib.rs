// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic assembly of the renderer's GLSL sources.
//!
//! Backends stitch shaders together at run time: built-in snippets are
//! parameterized by `#define`s and, where a snippet reads data packed by
//! `pictor_encoding`, its addressing code is generated for the data
//! store's scalar alignment. [`ShaderSource`] records definitions and
//! snippets in order; the builders in [`code`] produce ready-made sources
//! for the snippets that need generation.

#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]

// Suppress the unused_crate_dependencies lint in unit test builds; the
// dev-dependency is exercised by the integration tests.
#[cfg(test)]
use pictor_encoding as _;

pub mod code;
pub mod resources;
mod source;

pub use source::{MacroValue, ShaderSource, SourceError, SourceKind};
