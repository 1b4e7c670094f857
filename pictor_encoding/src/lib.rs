// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU-side preparation of GPU vertex data.
//!
//! This crate turns triangulated filled paths and dashed stroking
//! parameters into the packed attribute, index and data-store buffers the
//! renderer uploads. Buffers are split into chunks, independently
//! drawable sub-ranges, so a single upload can serve every fill rule and
//! winding number of a path.

#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]

mod attribute;
mod dash;
mod fill;
mod shader_data;

pub use attribute::{Attribute, PointKind};
pub use dash::{DashElement, DashInterval, DashedStrokeParams};
pub use fill::{
    index_chunk_from_winding, winding_from_index_chunk, ChunkRange, FillChunkBuilder,
    FillChunkSizes, FillRule, FilledPath,
};
pub use shader_data::ShaderData;
