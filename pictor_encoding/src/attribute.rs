// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The packed per-vertex record consumed by the renderer's vertex shaders.

use bytemuck::{Pod, Zeroable};

/// Role of a stroked-path vertex, stored in the low bits of its flags word.
///
/// The stroke tessellator labels every vertex it emits; the dash pass uses
/// the label to decide which vertices it may move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PointKind {
    /// Vertex shared between an edge and the geometry around it.
    SharedWithEdge = 0,
    /// Vertex on the boundary of a stroked edge.
    Edge = 1,
    /// Vertex fanning out a rounded join.
    RoundedJoin = 2,
    /// Tip vertex of a miter join.
    MiterJoin = 3,
    /// Vertex fanning out a rounded cap.
    RoundedCap = 4,
    /// Corner vertex of a square cap.
    SquareCap = 5,
    /// Cap vertex on the side where the contour enters a join.
    CapEnteringJoin = 6,
    /// Cap vertex on the side where the contour leaves a join.
    CapLeavingJoin = 7,
}

impl PointKind {
    fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0 => Self::SharedWithEdge,
            1 => Self::Edge,
            2 => Self::RoundedJoin,
            3 => Self::MiterJoin,
            4 => Self::RoundedCap,
            5 => Self::SquareCap,
            6 => Self::CapEnteringJoin,
            7 => Self::CapLeavingJoin,
            _ => return None,
        })
    }
}

/// One GPU vertex record: three four-lane words of bit-packed fields.
///
/// Floats are stored by bit pattern so the record stays [`Pod`] and can be
/// uploaded byte-for-byte. Lane assignments must be kept in sync with the
/// vertex shaders:
///
/// - `attrib0.xy`: position
/// - `attrib1.xy`: pre/post join distances from the contour start (`d0`, `d1`)
/// - `attrib1.zw`: auxiliary offset direction, unit length or zero
/// - `attrib2.x`: [`PointKind`] bits plus the [`Self::ADJUSTED_BIT`] flag
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Attribute {
    pub attrib0: [u32; 4],
    pub attrib1: [u32; 4],
    pub attrib2: [u32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<Attribute>(), 48);

impl Attribute {
    /// Mask of the [`PointKind`] bits in `attrib2.x`.
    pub const KIND_MASK: u32 = 0xf;

    /// Set in `attrib2.x` once a cap/join adjustment pass has visited the
    /// attribute.
    pub const ADJUSTED_BIT: u32 = 1 << 31;

    /// Creates an attribute carrying only a position.
    ///
    /// Fill pipelines need nothing else from the vertex; the remaining
    /// lanes stay zero.
    pub fn from_fill_point(position: [f32; 2]) -> Self {
        let mut attribute = Self::default();
        attribute.set_position(position);
        attribute
    }

    pub fn position(&self) -> [f32; 2] {
        [
            f32::from_bits(self.attrib0[0]),
            f32::from_bits(self.attrib0[1]),
        ]
    }

    pub fn set_position(&mut self, position: [f32; 2]) {
        self.attrib0[0] = position[0].to_bits();
        self.attrib0[1] = position[1].to_bits();
    }

    /// Distances from the contour start on either side of the vertex.
    pub fn distances(&self) -> [f32; 2] {
        [
            f32::from_bits(self.attrib1[0]),
            f32::from_bits(self.attrib1[1]),
        ]
    }

    pub fn set_distances(&mut self, distances: [f32; 2]) {
        self.attrib1[0] = distances[0].to_bits();
        self.attrib1[1] = distances[1].to_bits();
    }

    /// The arc length distance the dash pass evaluates for this vertex.
    ///
    /// The stroke tessellator stores it in the `d1` lane.
    pub fn distance_from_contour_start(&self) -> f32 {
        f32::from_bits(self.attrib1[1])
    }

    /// Direction along which a cap vertex may be slid, unit length or zero.
    pub fn aux_direction(&self) -> [f32; 2] {
        [
            f32::from_bits(self.attrib1[2]),
            f32::from_bits(self.attrib1[3]),
        ]
    }

    pub fn set_aux_direction(&mut self, direction: [f32; 2]) {
        self.attrib1[2] = direction[0].to_bits();
        self.attrib1[3] = direction[1].to_bits();
    }

    /// The vertex role, or `None` if the kind bits hold an unknown value.
    pub fn kind(&self) -> Option<PointKind> {
        PointKind::from_bits(self.attrib2[0] & Self::KIND_MASK)
    }

    pub fn set_kind(&mut self, kind: PointKind) {
        self.attrib2[0] = (self.attrib2[0] & !Self::KIND_MASK) | kind as u32;
    }

    pub fn is_adjusted(&self) -> bool {
        self.attrib2[0] & Self::ADJUSTED_BIT != 0
    }

    pub fn mark_adjusted(&mut self) {
        self.attrib2[0] |= Self::ADJUSTED_BIT;
    }
}
