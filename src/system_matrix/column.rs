use std::collections::TryReserveError;

use binrw::binrw;

/// One non-zero element of a column: the index of the ray and its weight.
/// Stored in exactly the layout in which it is written to disk.
#[binrw]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    pub index: i32,
    pub value: f32,
}

/// Append-only sparse column, holding the rays which see a single voxel
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseColumn(Vec<Entry>);

impl SparseColumn {

    pub fn new() -> Self { Self(Vec::new()) }

    /// Panics if `index` is not greater than that of the last entry: rays must
    /// be appended in strictly increasing order.
    pub fn push(&mut self, index: i32, value: f32) -> Result<(), TryReserveError> {
        if let Some(last) = self.0.last() {
            assert!(index > last.index,
                    "ray indices must strictly increase within a column: {index} appended after {}", last.index);
        }
        self.0.try_reserve(1)?;
        self.0.push(Entry { index, value });
        Ok(())
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<Entry> { self.0.iter() }
    pub fn last_index(&self) -> Option<i32> { self.0.last().map(|e| e.index) }
}

impl AsRef<[Entry]> for SparseColumn {
    fn as_ref(&self) -> &[Entry] { &self.0 }
}
