//! Summary statistics of a system matrix, for sanity-checking generated files

use itertools::{Itertools, MinMaxResult};

use crate::system_matrix::Entry;
use crate::utils::group_digits;

#[derive(Clone, Debug, PartialEq)]
pub struct MatrixStats {
    pub columns: usize,
    pub entries: usize,
    pub empty_columns: usize,
    /// Smallest and largest weight, if there are any entries
    pub weight_range: Option<(f32, f32)>,
    pub weight_sum: f64,
    /// Every column's ray indices are strictly increasing
    pub ascending: bool,
    /// Number of entries whose ray index is negative or not below the number
    /// of rays, when that is known
    pub out_of_range: usize,
}

impl MatrixStats {

    pub fn of_columns<C>(columns: &[C], n_rays: Option<usize>) -> Self
    where
        C: AsRef<[Entry]>,
    {
        let in_range = |e: &Entry| e.index >= 0 && n_rays.map_or(true, |n| (e.index as usize) < n);

        let all = || columns.iter().flat_map(|c| c.as_ref().iter());
        let weight_range = match all().map(|e| e.value).minmax_by(f32::total_cmp) {
            MinMaxResult::NoElements       => None,
            MinMaxResult::OneElement(w)    => Some((w, w)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        };

        Self {
            columns: columns.len(),
            entries: all().count(),
            empty_columns: columns.iter().filter(|c| c.as_ref().is_empty()).count(),
            weight_range,
            weight_sum: all().map(|e| e.value as f64).sum(),
            ascending: columns.iter().all(|c| c.as_ref().iter().tuple_windows().all(|(a, b)| a.index < b.index)),
            out_of_range: all().filter(|e| !in_range(*e)).count(),
        }
    }

    /// The checks a freshly generated matrix must pass
    pub fn is_consistent(&self) -> bool { self.ascending && self.out_of_range == 0 }
}

impl std::fmt::Display for MatrixStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "columns:        {}", group_digits(self.columns))?;
        writeln!(f, "empty columns:  {}", group_digits(self.empty_columns))?;
        writeln!(f, "entries:        {}", group_digits(self.entries))?;
        match self.weight_range {
            Some((min, max)) => writeln!(f, "weights:        {min} .. {max}")?,
            None             => writeln!(f, "weights:        none")?,
        }
        writeln!(f, "sum of weights: {:.6}", self.weight_sum)?;
        writeln!(f, "ascending:      {}", self.ascending)?;
        write!  (f, "out of range:   {}", group_digits(self.out_of_range))
    }
}
