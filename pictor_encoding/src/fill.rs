// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute and index chunk generation for triangulated filled paths.

use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use peniko::kurbo::Point;

use crate::attribute::Attribute;

/// Fill rules with a precomputed index list.
///
/// Each rule reserves one index chunk slot; the discriminant is the slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum FillRule {
    /// Regions with odd winding number.
    OddEven = 0,
    /// Regions with non-zero winding number.
    Nonzero = 1,
    /// Regions with even winding number, including zero.
    ComplementOddEven = 2,
    /// Regions with zero winding number.
    ComplementNonzero = 3,
}

impl FillRule {
    /// Number of index chunk slots reserved for fill rules.
    pub const COUNT: u32 = 4;

    /// The reserved index chunk slot of this rule.
    pub fn chunk(self) -> u32 {
        self as u32
    }
}

/// Index chunk slot holding the triangles of one winding number.
///
/// Non-zero winding numbers enumerate `+1, -1, +2, -2, ...` onto the slots
/// after the reserved [`FillRule`] slots. Winding zero has no slot of its
/// own; it aliases the complement-nonzero rule, whose region it is.
pub fn index_chunk_from_winding(winding: i32) -> u32 {
    if winding == 0 {
        return FillRule::ComplementNonzero.chunk();
    }
    let sign_bit = (winding < 0) as u32;
    FillRule::COUNT + sign_bit + 2 * (winding.unsigned_abs() - 1)
}

/// Inverse of [`index_chunk_from_winding`].
pub fn winding_from_index_chunk(chunk: u32) -> i32 {
    if chunk == FillRule::ComplementNonzero.chunk() {
        return 0;
    }
    debug_assert!(chunk >= FillRule::COUNT, "chunk {chunk} is a fill rule slot");
    let offset = chunk - FillRule::COUNT;
    let winding = (1 + offset / 2) as i32;
    if offset & 1 == 0 {
        winding
    } else {
        -winding
    }
}

/// An independently drawable sub-range of a caller-owned buffer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ChunkRange {
    pub start: u32,
    pub end: u32,
}

impl ChunkRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.end == self.start
    }

    /// The chunk's elements within its buffer.
    pub fn slice<T>(self, data: &[T]) -> &[T] {
        &data[self.start as usize..self.end as usize]
    }
}

/// A triangulated filled path.
///
/// Holds the shared point set, one triangle index list per winding number
/// present in the triangulation, and index lists for the four [`FillRule`]s
/// derived at construction by concatenating the per-winding lists in
/// ascending winding order.
pub struct FilledPath {
    points: Vec<Point>,
    winding_indices: BTreeMap<i32, Vec<u32>>,
    odd_indices: Vec<u32>,
    nonzero_indices: Vec<u32>,
    even_indices: Vec<u32>,
    zero_indices: Vec<u32>,
}

static_assertions::assert_impl_all!(FilledPath: Send, Sync);

impl FilledPath {
    /// Builds the path from triangulator output: the shared points and the
    /// triangle indices of every winding number region.
    pub fn new(points: Vec<Point>, winding_indices: BTreeMap<i32, Vec<u32>>) -> Self {
        let mut odd_indices = Vec::new();
        let mut nonzero_indices = Vec::new();
        let mut even_indices = Vec::new();
        let mut zero_indices = Vec::new();
        for (&winding, indices) in &winding_indices {
            if winding % 2 != 0 {
                odd_indices.extend_from_slice(indices);
            } else {
                even_indices.extend_from_slice(indices);
            }
            if winding != 0 {
                nonzero_indices.extend_from_slice(indices);
            } else {
                zero_indices.extend_from_slice(indices);
            }
        }
        Self {
            points,
            winding_indices,
            odd_indices,
            nonzero_indices,
            even_indices,
            zero_indices,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Winding numbers present in the triangulation, ascending.
    pub fn winding_numbers(&self) -> impl Iterator<Item = i32> + '_ {
        self.winding_indices.keys().copied()
    }

    /// Triangle indices of the region with the given winding number.
    pub fn indices(&self, winding: i32) -> &[u32] {
        self.winding_indices
            .get(&winding)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn odd_winding_indices(&self) -> &[u32] {
        &self.odd_indices
    }

    pub fn nonzero_winding_indices(&self) -> &[u32] {
        &self.nonzero_indices
    }

    pub fn even_winding_indices(&self) -> &[u32] {
        &self.even_indices
    }

    pub fn zero_winding_indices(&self) -> &[u32] {
        &self.zero_indices
    }
}

/// Buffer sizes reported by [`FillChunkBuilder::compute_sizes`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FillChunkSizes {
    pub n_attributes: usize,
    pub n_indices: usize,
    pub n_attribute_chunks: usize,
    pub n_index_chunks: usize,
}

/// Fills attribute and index buffers from a [`FilledPath`], one index
/// chunk per fill rule and per winding number.
pub struct FillChunkBuilder<'a> {
    path: &'a FilledPath,
}

impl<'a> FillChunkBuilder<'a> {
    pub fn new(path: &'a FilledPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &'a FilledPath {
        self.path
    }

    /// Sizes of the buffers [`Self::fill_data`] expects.
    ///
    /// An index is counted once per fill rule list it appears in plus
    /// once for its winding number's own chunk, so the index buffer holds
    /// every region's triangles several times over.
    pub fn compute_sizes(&self) -> FillChunkSizes {
        let path = self.path;
        let (Some(&smallest), Some(&largest)) = (
            path.winding_indices.keys().next(),
            path.winding_indices.keys().next_back(),
        ) else {
            return FillChunkSizes::default();
        };

        let mut n_indices = path.odd_indices.len()
            + path.nonzero_indices.len()
            + path.even_indices.len()
            + path.zero_indices.len();
        for (&winding, indices) in &path.winding_indices {
            // Winding zero is covered by the complement-nonzero list.
            if winding != 0 {
                n_indices += indices.len();
            }
        }

        // The slot enumeration interleaves signs, so either extreme
        // winding may own the largest slot.
        let largest_chunk = index_chunk_from_winding(largest)
            .max(index_chunk_from_winding(smallest));

        FillChunkSizes {
            n_attributes: path.points.len(),
            n_indices,
            n_attribute_chunks: 1,
            n_index_chunks: 1 + largest_chunk as usize,
        }
    }

    /// Writes the attribute buffer, the index buffer and the chunk tables.
    ///
    /// All four slices must be sized per [`Self::compute_sizes`]; the
    /// attribute buffer and chunk table sizes are asserted. Index chunk
    /// slots that correspond to no winding number are left empty.
    pub fn fill_data(
        &self,
        attributes: &mut [Attribute],
        index_data: &mut [u32],
        attribute_chunks: &mut [ChunkRange],
        index_chunks: &mut [ChunkRange],
    ) {
        let path = self.path;
        if path.winding_indices.is_empty() {
            return;
        }

        assert_eq!(attributes.len(), path.points.len());
        assert_eq!(attribute_chunks.len(), 1);

        for (attribute, point) in attributes.iter_mut().zip(&path.points) {
            *attribute = Attribute::from_fill_point([point.x as f32, point.y as f32]);
        }
        attribute_chunks[0] = ChunkRange::new(0, attributes.len() as u32);

        // Slots between the used ones belong to absent winding numbers;
        // they must read back empty rather than stale.
        index_chunks.fill(ChunkRange::default());

        fn write_chunk(
            indices: &[u32],
            slot: u32,
            cursor: &mut u32,
            index_data: &mut [u32],
            index_chunks: &mut [ChunkRange],
        ) {
            let start = *cursor;
            let end = start + indices.len() as u32;
            index_data[start as usize..end as usize].copy_from_slice(indices);
            index_chunks[slot as usize] = ChunkRange::new(start, end);
            *cursor = end;
        }

        let mut cursor = 0;
        write_chunk(
            &path.odd_indices,
            FillRule::OddEven.chunk(),
            &mut cursor,
            index_data,
            index_chunks,
        );
        write_chunk(
            &path.nonzero_indices,
            FillRule::Nonzero.chunk(),
            &mut cursor,
            index_data,
            index_chunks,
        );
        write_chunk(
            &path.even_indices,
            FillRule::ComplementOddEven.chunk(),
            &mut cursor,
            index_data,
            index_chunks,
        );
        write_chunk(
            &path.zero_indices,
            FillRule::ComplementNonzero.chunk(),
            &mut cursor,
            index_data,
            index_chunks,
        );

        for (&winding, indices) in &path.winding_indices {
            // Winding zero's slot is the complement-nonzero chunk written
            // above; packing it again would alias the slot.
            if winding == 0 {
                continue;
            }
            let chunk = index_chunk_from_winding(winding);
            debug_assert_eq!(winding_from_index_chunk(chunk), winding);
            write_chunk(indices, chunk, &mut cursor, index_data, index_chunks);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use peniko::kurbo::Point;

    use super::{
        index_chunk_from_winding, winding_from_index_chunk, ChunkRange, FillChunkBuilder,
        FillChunkSizes, FillRule, FilledPath,
    };

    /// Two overlapping squares drawn so every winding in -2..=2 appears.
    fn overlapping_squares() -> FilledPath {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let winding_indices = BTreeMap::from([
            (-2, vec![0, 1, 3]),
            (-1, vec![0, 2, 1]),
            (0, vec![3, 2, 1]),
            (1, vec![0, 1, 2, 0, 2, 3]),
            (2, vec![1, 2, 3]),
        ]);
        FilledPath::new(points, winding_indices)
    }

    #[test]
    fn winding_chunk_mapping_round_trips() {
        for winding in -64..=64 {
            let chunk = index_chunk_from_winding(winding);
            assert_eq!(
                winding_from_index_chunk(chunk),
                winding,
                "winding {winding} mapped through chunk {chunk}"
            );
        }
    }

    #[test]
    fn winding_chunks_enumerate_without_collision() {
        assert_eq!(index_chunk_from_winding(1), 4);
        assert_eq!(index_chunk_from_winding(-1), 5);
        assert_eq!(index_chunk_from_winding(2), 6);
        assert_eq!(index_chunk_from_winding(-2), 7);
        assert_eq!(index_chunk_from_winding(3), 8);

        let mut seen = std::collections::BTreeSet::new();
        for winding in -64..=64 {
            if winding == 0 {
                continue;
            }
            let chunk = index_chunk_from_winding(winding);
            assert!(chunk >= FillRule::COUNT);
            assert!(seen.insert(chunk), "chunk {chunk} assigned twice");
        }
    }

    #[test]
    fn winding_zero_aliases_complement_nonzero() {
        assert_eq!(
            index_chunk_from_winding(0),
            FillRule::ComplementNonzero.chunk()
        );
        assert_eq!(winding_from_index_chunk(FillRule::ComplementNonzero.chunk()), 0);
    }

    #[test]
    fn rule_lists_concatenate_ascending() {
        let path = overlapping_squares();
        // Odd windings are -1 and 1, in that order.
        let odd: Vec<u32> = [path.indices(-1), path.indices(1)].concat();
        assert_eq!(path.odd_winding_indices(), odd);
        // Even windings include zero.
        let even: Vec<u32> = [path.indices(-2), path.indices(0), path.indices(2)].concat();
        assert_eq!(path.even_winding_indices(), even);
        let nonzero: Vec<u32> = [
            path.indices(-2),
            path.indices(-1),
            path.indices(1),
            path.indices(2),
        ]
        .concat();
        assert_eq!(path.nonzero_winding_indices(), nonzero);
        assert_eq!(path.zero_winding_indices(), path.indices(0));
    }

    #[test]
    fn sizes_count_rule_lists_and_windings_once() {
        let path = overlapping_squares();
        let sizes = FillChunkBuilder::new(&path).compute_sizes();

        // 9 odd + 15 nonzero + 9 even + 3 zero, plus the per-winding
        // chunks of the four non-zero windings.
        assert_eq!(
            sizes,
            FillChunkSizes {
                n_attributes: 4,
                n_indices: 36 + 15,
                n_attribute_chunks: 1,
                n_index_chunks: 1 + 7,
            }
        );
    }

    #[test]
    fn sizes_of_empty_triangulation() {
        let path = FilledPath::new(Vec::new(), BTreeMap::new());
        assert_eq!(
            FillChunkBuilder::new(&path).compute_sizes(),
            FillChunkSizes::default()
        );
    }

    #[test]
    fn fill_data_lays_out_rule_then_winding_chunks() {
        let path = overlapping_squares();
        let builder = FillChunkBuilder::new(&path);
        let sizes = builder.compute_sizes();

        let mut attributes = vec![Default::default(); sizes.n_attributes];
        let mut index_data = vec![0_u32; sizes.n_indices];
        let mut attribute_chunks = vec![ChunkRange::default(); sizes.n_attribute_chunks];
        let mut index_chunks = vec![ChunkRange::default(); sizes.n_index_chunks];
        builder.fill_data(
            &mut attributes,
            &mut index_data,
            &mut attribute_chunks,
            &mut index_chunks,
        );

        assert_eq!(attribute_chunks[0], ChunkRange::new(0, 4));
        for (attribute, point) in attributes.iter().zip(path.points()) {
            assert_eq!(
                attribute.position(),
                [point.x as f32, point.y as f32]
            );
        }

        let rule_chunks = [
            (FillRule::OddEven, path.odd_winding_indices()),
            (FillRule::Nonzero, path.nonzero_winding_indices()),
            (FillRule::ComplementOddEven, path.even_winding_indices()),
            (FillRule::ComplementNonzero, path.zero_winding_indices()),
        ];
        for (rule, expected) in rule_chunks {
            let chunk = index_chunks[rule.chunk() as usize];
            assert_eq!(chunk.slice(&index_data), expected, "rule {rule:?}");
        }

        for winding in path.winding_numbers() {
            if winding == 0 {
                continue;
            }
            let chunk = index_chunks[index_chunk_from_winding(winding) as usize];
            assert_eq!(chunk.slice(&index_data), path.indices(winding), "winding {winding}");
        }

        // The chunks tile the index buffer exactly.
        let written: u32 = index_chunks.iter().map(|chunk| chunk.len()).sum();
        assert_eq!(written as usize, sizes.n_indices);
    }

    #[test]
    fn absent_windings_leave_empty_chunks() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, 2.0),
        ];
        let winding_indices = BTreeMap::from([(1, vec![0, 1, 2]), (3, vec![2, 1, 0])]);
        let path = FilledPath::new(points, winding_indices);
        let builder = FillChunkBuilder::new(&path);
        let sizes = builder.compute_sizes();
        // Winding 3 owns slot 8.
        assert_eq!(sizes.n_index_chunks, 9);

        let mut attributes = vec![Default::default(); sizes.n_attributes];
        let mut index_data = vec![0_u32; sizes.n_indices];
        let mut attribute_chunks = vec![ChunkRange::default(); 1];
        // Seed the table with garbage to check unused slots are reset.
        let mut index_chunks = vec![ChunkRange::new(3, 9); sizes.n_index_chunks];
        builder.fill_data(
            &mut attributes,
            &mut index_data,
            &mut attribute_chunks,
            &mut index_chunks,
        );

        for slot in [5, 6, 7] {
            assert!(
                index_chunks[slot].is_empty(),
                "slot {slot} should hold no indices"
            );
        }
        assert_eq!(index_chunks[4].slice(&index_data), path.indices(1));
        assert_eq!(index_chunks[8].slice(&index_data), path.indices(3));
        // No zero winding region: the complement-nonzero chunk is empty.
        assert!(index_chunks[FillRule::ComplementNonzero.chunk() as usize].is_empty());
    }

    #[test]
    #[should_panic(expected = "assertion `left == right` failed")]
    fn fill_data_rejects_undersized_attribute_buffer() {
        let path = overlapping_squares();
        let builder = FillChunkBuilder::new(&path);
        let sizes = builder.compute_sizes();

        let mut attributes = vec![Default::default(); sizes.n_attributes - 1];
        let mut index_data = vec![0_u32; sizes.n_indices];
        let mut attribute_chunks = vec![ChunkRange::default(); 1];
        let mut index_chunks = vec![ChunkRange::default(); sizes.n_index_chunks];
        builder.fill_data(
            &mut attributes,
            &mut index_data,
            &mut attribute_chunks,
            &mut index_chunks,
        );
    }
}
