// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builders for the shader snippets whose text depends on how the CPU
//! packed the data they read.
//!
//! The data store backing these snippets is fetched in groups of
//! `alignment` scalars, with `alignment` between 1 and 4. Loader code
//! addressing a packed field must therefore know the alignment: the field
//! at word offset `o` lives in lane `o % alignment` of fetched group
//! `o / alignment`. The builders here emit that addressing, which is why
//! they, and not static resources, exist.

use crate::source::{ShaderSource, SourceKind};

/// Field order of a packed curve pair geometry entry.
///
/// A field's position in this table is its word offset within the entry;
/// the glyph geometry packer and the loader macro emitted by
/// [`curvepair_compute_pseudo_distance`] must agree on it exactly.
pub const CURVE_GEOMETRY_FIELDS: [&str; 14] = [
    "p_x",
    "p_y",
    "zeta",
    "combine_rule",
    "curve0_m0",
    "curve0_m1",
    "curve0_q_x",
    "curve0_q_y",
    "curve0_quad_coeff",
    "curve1_m0",
    "curve1_m1",
    "curve1_q_x",
    "curve1_q_y",
    "curve1_quad_coeff",
];

const LANE_NAMES: [&str; 4] = ["r", "g", "b", "a"];
const FETCH_SWIZZLES: [&str; 4] = ["r", "rg", "rgb", "rgba"];
const TEMP_TYPES: [&str; 4] = ["float", "vec2", "vec3", "vec4"];

/// Emits the macro loading one curve pair geometry entry into the field
/// variables named by [`CURVE_GEOMETRY_FIELDS`].
///
/// The entry's location is itself two-level: `geometry_offset` addresses
/// the glyph's geometry block and the glyph texel value selects the entry,
/// biased by the two reserved texel values below the first real entry.
fn curve_geometry_loader_macro(alignment: usize, geometry_store_fetch: &str) -> String {
    debug_assert!((1..=4).contains(&alignment));
    let entry_blocks = CURVE_GEOMETRY_FIELDS.len().div_ceil(alignment);

    let mut text = String::new();
    text.push_str("\n#define PICTOR_LOAD_CURVE_GEOMETRY(geometry_offset, texel_value) { \\\n");

    text.push_str(&format!("\t{} ", TEMP_TYPES[alignment - 1]));
    for block in 0..entry_blocks {
        if block != 0 {
            text.push_str(", ");
        }
        text.push_str(&format!("temp{block}"));
    }
    text.push_str(";\\\n");
    text.push_str("\tint start_offset;\\\n");
    text.push_str(&format!(
        "\tstart_offset = int(geometry_offset) + (int(texel_value) - 2) * int({entry_blocks});\\\n"
    ));

    for block in 0..entry_blocks {
        text.push_str(&format!(
            "\ttemp{block} = {geometry_store_fetch}(start_offset + {block}).{};\\\n",
            FETCH_SWIZZLES[alignment - 1]
        ));
    }

    for (offset, field) in CURVE_GEOMETRY_FIELDS.iter().enumerate() {
        let row = offset / alignment;
        if alignment > 1 {
            let lane = LANE_NAMES[offset % alignment];
            text.push_str(&format!("\t{field} = temp{row}.{lane};\\\n"));
        } else {
            text.push_str(&format!("\t{field} = temp{row};\\\n"));
        }
    }

    text.push_str("\\\n}\n");
    text
}

/// Source computing the pseudo distance to a curve pair glyph.
///
/// The emitted function is named `function_name` and loads glyph geometry
/// through `geometry_store_fetch`, a function or macro the backend
/// provides for fetching one aligned group of the geometry store.
/// `alignment` must match the store's scalar alignment, 1 to 4. With
/// `derivative_function` set, the variant also computing screen-space
/// derivatives is produced.
pub fn curvepair_compute_pseudo_distance(
    alignment: usize,
    function_name: &str,
    geometry_store_fetch: &str,
    derivative_function: bool,
) -> ShaderSource {
    let resource = if derivative_function {
        "pictor_curvepair_glyph_derivative.frag.glsl"
    } else {
        "pictor_curvepair_glyph.frag.glsl"
    };

    let mut source = ShaderSource::new();
    source
        .add_macro("PICTOR_CURVEPAIR_COMPUTE_NAME", function_name)
        .add_source(
            &curve_geometry_loader_macro(alignment, geometry_store_fetch),
            SourceKind::String,
        )
        .add_source(resource, SourceKind::Resource)
        .add_source("#undef PICTOR_LOAD_CURVE_GEOMETRY\n", SourceKind::String)
        .remove_macro("PICTOR_CURVEPAIR_COMPUTE_NAME");
    source
}

/// Source computing dash interval coverage for a dashed stroke.
///
/// The emitted function is named `function_name`. Each store alignment
/// has its own resource because both the packed header layout and the
/// parity of cumulative pattern entries per fetch differ; `data_alignment`
/// is clamped into 1 to 4.
pub fn dashed_stroking_compute(function_name: &str, data_alignment: usize) -> ShaderSource {
    const VARIANTS: [&str; 4] = [
        "pictor_compute_dash_stroke_alignment_1.glsl",
        "pictor_compute_dash_stroke_alignment_2.glsl",
        "pictor_compute_dash_stroke_alignment_3.glsl",
        "pictor_compute_dash_stroke_alignment_4.glsl",
    ];
    let data_alignment = data_alignment.clamp(1, 4);

    let mut source = ShaderSource::new();
    source
        .add_macro("PICTOR_COMPUTE_DASH_STROKE", function_name)
        .add_source(VARIANTS[data_alignment - 1], SourceKind::Resource)
        .remove_macro("PICTOR_COMPUTE_DASH_STROKE");
    source
}

/// Source computing the color atlas coordinate of an image texel by
/// walking `index_tile_size`-sized tiles of the index atlas bound at
/// `index_texture`.
pub fn image_atlas_compute_coord(
    function_name: &str,
    index_texture: &str,
    index_tile_size: u32,
    color_tile_size: u32,
) -> ShaderSource {
    let mut source = ShaderSource::new();
    source
        .add_macro("PICTOR_INDEX_TILE_SIZE", index_tile_size)
        .add_macro("PICTOR_COLOR_TILE_SIZE", color_tile_size)
        .add_macro("PICTOR_INDEX_ATLAS", index_texture)
        .add_macro("PICTOR_ATLAS_COMPUTE_COORD", function_name)
        .add_source("pictor_atlas_image_fetch.glsl", SourceKind::Resource)
        .remove_macro("PICTOR_INDEX_TILE_SIZE")
        .remove_macro("PICTOR_COLOR_TILE_SIZE")
        .remove_macro("PICTOR_INDEX_ATLAS")
        .remove_macro("PICTOR_ATLAS_COMPUTE_COORD");
    source
}
