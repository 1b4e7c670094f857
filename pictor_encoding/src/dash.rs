// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dashed stroking parameters: pattern normalization, GPU packing and the
//! CPU-side interval queries used to adjust cap and join geometry.

use smallvec::SmallVec;

use crate::attribute::{Attribute, PointKind};
use crate::shader_data::ShaderData;

/// One drawn-then-skipped pair of a dash pattern, in arc length units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DashElement {
    pub draw_length: f32,
    pub space_length: f32,
}

impl DashElement {
    pub fn new(draw_length: f32, space_length: f32) -> Self {
        Self {
            draw_length,
            space_length,
        }
    }
}

/// The dash interval bracketing a queried arc length distance.
///
/// `begin..end` are distances along the contour, not reduced to a single
/// pattern period; `drawn` tells whether the interval is a drawn run or a
/// skip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashInterval {
    pub begin: f32,
    pub end: f32,
    pub drawn: bool,
}

/// Parameters of a dashed stroke.
///
/// The dash pattern is held in sanitized form (see
/// [`Self::set_dash_pattern`]) together with two derived values:
///
/// - `total_length`: the period of the pattern, the sum of all draw and
///   space lengths.
/// - `first_interval_start`: where the interval containing distance zero
///   begins. Zero unless the pattern boundary at distance zero joins two
///   runs of the same flavor across the period wrap, in which case it is
///   negative and reaches back into the cycle's tail: if the pattern ends
///   mid-draw and begins with a draw, the tail draw continues the head
///   draw; likewise for a tail space before a leading space.
#[derive(Clone, Debug, PartialEq)]
pub struct DashedStrokeParams {
    miter_limit: f32,
    width: f32,
    dash_offset: f32,
    total_length: f32,
    first_interval_start: f32,
    pattern: SmallVec<[DashElement; 4]>,
}

static_assertions::assert_impl_all!(DashedStrokeParams: Send, Sync);

impl Default for DashedStrokeParams {
    fn default() -> Self {
        Self {
            miter_limit: 15.0,
            width: 2.0,
            dash_offset: 0.0,
            total_length: 0.0,
            first_interval_start: 0.0,
            pattern: SmallVec::new(),
        }
    }
}

impl DashedStrokeParams {
    /// Word offset of the miter limit in the packed header.
    pub const MITER_LIMIT_OFFSET: usize = 0;
    /// Word offset of the stroke width in the packed header.
    pub const WIDTH_OFFSET: usize = 1;
    /// Word offset of the dash offset in the packed header.
    pub const DASH_OFFSET_OFFSET: usize = 2;
    /// Word offset of the pattern's total length in the packed header.
    pub const TOTAL_LENGTH_OFFSET: usize = 3;
    /// Word offset of the first interval start in the packed header.
    pub const FIRST_INTERVAL_START_OFFSET: usize = 4;
    /// Number of scalar header words preceding the packed pattern.
    pub const HEADER_SIZE: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn miter_limit(&self) -> f32 {
        self.miter_limit
    }

    pub fn set_miter_limit(&mut self, miter_limit: f32) -> &mut Self {
        self.miter_limit = miter_limit;
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) -> &mut Self {
        self.width = width;
        self
    }

    /// Phase added to every queried distance before pattern lookup.
    pub fn dash_offset(&self) -> f32 {
        self.dash_offset
    }

    pub fn set_dash_offset(&mut self, dash_offset: f32) -> &mut Self {
        self.dash_offset = dash_offset;
        self
    }

    /// The sanitized dash pattern.
    pub fn dash_pattern(&self) -> &[DashElement] {
        &self.pattern
    }

    /// The pattern period: the sum of all draw and space lengths.
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Start of the interval containing distance zero, zero or negative.
    pub fn first_interval_start(&self) -> f32 {
        self.first_interval_start
    }

    /// Replaces the dash pattern, sanitizing it and recomputing the
    /// derived lengths.
    ///
    /// Sanitizing drops leading elements whose lengths are both
    /// non-positive, clamps negative lengths to zero, and merges runs
    /// separated by a zero length so that only the first element may keep
    /// a zero draw length. A zero leading draw length means the pattern
    /// starts inside a skip.
    pub fn set_dash_pattern(&mut self, pattern: &[DashElement]) -> &mut Self {
        self.pattern = sanitize_pattern(pattern);
        // Draw then space in run order, matching the interval walk and
        // the packed cumulative entries bit for bit.
        self.total_length = self
            .pattern
            .iter()
            .fold(0.0, |total, element| total + element.draw_length + element.space_length);
        self.first_interval_start = match (self.pattern.first(), self.pattern.last()) {
            // The pattern ends mid-draw and begins drawing: the interval
            // containing zero started back in the tail draw.
            (Some(first), Some(last))
                if last.space_length <= 0.0 && first.draw_length > 0.0 =>
            {
                -last.draw_length
            }
            // The pattern ends with a skip and begins inside one.
            (Some(first), Some(last))
                if last.space_length > 0.0 && first.draw_length <= 0.0 =>
            {
                -last.space_length
            }
            _ => 0.0,
        };
        self
    }

    /// Finds the dash interval containing `distance`.
    ///
    /// The distance is reduced into the pattern period by truncation, so
    /// the returned bounds land in the same period as `distance` and can
    /// be compared against other distances along the contour directly.
    /// An empty pattern yields the degenerate skip `0..0`.
    pub fn compute_dash_interval(&self, distance: f32) -> DashInterval {
        if self.total_length <= 0.0 {
            return DashInterval {
                begin: 0.0,
                end: 0.0,
                drawn: false,
            };
        }

        let cycles = distance / self.total_length;
        let in_period = cycles.fract() * self.total_length;
        let period_base = cycles.trunc() * self.total_length;

        let mut begin = 0.0_f32;
        for element in &self.pattern {
            let from_begin = in_period - begin;
            if from_begin <= element.draw_length {
                let begin = begin + period_base;
                return DashInterval {
                    begin,
                    end: begin + element.draw_length,
                    drawn: true,
                };
            }
            begin += element.draw_length;
            if from_begin - element.draw_length <= element.space_length {
                let begin = begin + period_base;
                return DashInterval {
                    begin,
                    end: begin + element.space_length,
                    drawn: false,
                };
            }
            begin += element.space_length;
        }

        // Rounding in the period reduction can step past the final entry;
        // report an empty skip at the pattern-local period end.
        DashInterval {
            begin,
            end: begin,
            drawn: false,
        }
    }

    /// Adjusts cap geometry at a join for the dash interval that covers
    /// the join, and marks every attribute in `attributes` as visited.
    ///
    /// `interval` must be the dash interval containing `distance`, the
    /// arc length position of the join. Cap vertices whose cap would
    /// poke past the drawn interval's boundary, grown by half the stroke
    /// width, are slid along their auxiliary direction onto that boundary
    /// and demoted to plain shared-edge vertices.
    ///
    /// Every attribute gets [`Attribute::ADJUSTED_BIT`], cap vertex or
    /// not, so a batch never straddles visited and unvisited records.
    pub fn adjust_cap_joins(
        &self,
        attributes: &mut [Attribute],
        interval: DashInterval,
        distance: f32,
    ) {
        let radius = 0.5 * self.width;
        for attribute in attributes.iter_mut() {
            match attribute.kind() {
                Some(PointKind::CapEnteringJoin) => {
                    let delta = ((interval.begin + radius) - distance).max(0.0);
                    Self::repack_cap_join(attribute, delta);
                }
                Some(PointKind::CapLeavingJoin) => {
                    let delta = (distance - (interval.end - radius)).max(0.0);
                    Self::repack_cap_join(attribute, delta);
                }
                _ => {}
            }
            attribute.mark_adjusted();
        }
    }

    /// Slides a cap vertex by `delta` along its auxiliary direction and
    /// reclassifies it as shared edge geometry.
    fn repack_cap_join(attribute: &mut Attribute, delta: f32) {
        let length = delta.abs();
        let position = attribute.position();
        let direction = attribute.aux_direction();
        let distances = attribute.distances();

        attribute.set_position([
            position[0] + length * direction[0],
            position[1] + length * direction[1],
        ]);
        attribute.set_distances([distances[0] + delta, distances[1] + delta]);
        // The moved vertex no longer fans a cap; its direction is spent.
        attribute.set_kind(PointKind::SharedWithEdge);
        attribute.set_aux_direction([0.0, 0.0]);
    }
}

impl ShaderData for DashedStrokeParams {
    fn data_size(&self, alignment: usize) -> usize {
        debug_assert!((1..=4).contains(&alignment));
        Self::HEADER_SIZE.next_multiple_of(alignment)
            + (2 * self.pattern.len()).next_multiple_of(alignment)
    }

    fn pack_data(&self, alignment: usize, dst: &mut [u32]) {
        assert_eq!(dst.len(), self.data_size(alignment));

        dst[Self::MITER_LIMIT_OFFSET] = self.miter_limit.to_bits();
        dst[Self::WIDTH_OFFSET] = self.width.to_bits();
        dst[Self::DASH_OFFSET_OFFSET] = self.dash_offset.to_bits();
        dst[Self::TOTAL_LENGTH_OFFSET] = self.total_length.to_bits();
        dst[Self::FIRST_INTERVAL_START_OFFSET] = self.first_interval_start.to_bits();

        if self.pattern.is_empty() {
            return;
        }

        // The pattern packs as the running sum of its lengths: each
        // element contributes the cumulative distance at which its draw
        // ends, then the one at which its skip ends.
        let pattern = &mut dst[Self::HEADER_SIZE.next_multiple_of(alignment)..];
        let mut total = 0.0_f32;
        let mut written = 0;
        for element in &self.pattern {
            total += element.draw_length;
            pattern[written] = total.to_bits();
            total += element.space_length;
            pattern[written + 1] = total.to_bits();
            written += 2;
        }

        // Alignment padding reads as past-the-end: strictly larger than
        // any real cumulative length, so shaders walking the array stop
        // on a real entry.
        let sentinel = ((total + 1.0) * 2.0).to_bits();
        for slot in &mut pattern[written..] {
            *slot = sentinel;
        }
    }
}

/// Sanitized copy of `pattern` per the [`DashedStrokeParams::set_dash_pattern`]
/// rules.
fn sanitize_pattern(pattern: &[DashElement]) -> SmallVec<[DashElement; 4]> {
    let mut out = SmallVec::new();
    let mut elements = pattern
        .iter()
        .skip_while(|element| element.draw_length <= 0.0 && element.space_length <= 0.0);
    let Some(first) = elements.next() else {
        return out;
    };

    let mut current = DashElement::new(
        first.draw_length.max(0.0),
        first.space_length.max(0.0),
    );
    for element in elements {
        if current.space_length <= 0.0 {
            // No skip yet: the next draw continues the current one.
            current.draw_length += element.draw_length.max(0.0);
            current.space_length = element.space_length.max(0.0);
        } else if element.draw_length <= 0.0 {
            // Nothing drawn: the next skip extends the current one.
            current.space_length += element.space_length.max(0.0);
        } else {
            out.push(current);
            current = DashElement::new(
                element.draw_length.max(0.0),
                element.space_length.max(0.0),
            );
        }
    }
    out.push(current);
    out
}
