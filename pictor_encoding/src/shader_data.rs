// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing of shader parameter blocks into the renderer's data store.

/// A parameter block that can be packed into the GPU data store.
///
/// The store is an array of 32-bit words fetched by shaders in groups of
/// `alignment` scalars, where `alignment` is between 1 and 4. Sizes are
/// reported and buffers filled in whole words; float fields are stored by
/// bit pattern.
pub trait ShaderData {
    /// Number of words the packed block occupies at the given alignment.
    ///
    /// Always a multiple of `alignment`, so consecutive blocks in the
    /// store stay fetchable.
    fn data_size(&self, alignment: usize) -> usize;

    /// Packs the block into `dst`.
    ///
    /// `dst.len()` must equal [`Self::data_size`] for the same alignment.
    fn pack_data(&self, alignment: usize, dst: &mut [u32]);
}
