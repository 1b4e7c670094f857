// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The GLSL snippets shipped with the crate.

use std::collections::HashMap;

/// Registry of built-in snippets, keyed by the names the builders in
/// [`crate::code`] reference.
pub fn builtin() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        (
            "pictor_compute_dash_stroke_alignment_1.glsl",
            include_str!("../shader/pictor_compute_dash_stroke_alignment_1.glsl"),
        ),
        (
            "pictor_compute_dash_stroke_alignment_2.glsl",
            include_str!("../shader/pictor_compute_dash_stroke_alignment_2.glsl"),
        ),
        (
            "pictor_compute_dash_stroke_alignment_3.glsl",
            include_str!("../shader/pictor_compute_dash_stroke_alignment_3.glsl"),
        ),
        (
            "pictor_compute_dash_stroke_alignment_4.glsl",
            include_str!("../shader/pictor_compute_dash_stroke_alignment_4.glsl"),
        ),
        (
            "pictor_curvepair_glyph.frag.glsl",
            include_str!("../shader/pictor_curvepair_glyph.frag.glsl"),
        ),
        (
            "pictor_curvepair_glyph_derivative.frag.glsl",
            include_str!("../shader/pictor_curvepair_glyph_derivative.frag.glsl"),
        ),
        (
            "pictor_atlas_image_fetch.glsl",
            include_str!("../shader/pictor_atlas_image_fetch.glsl"),
        ),
    ])
}
