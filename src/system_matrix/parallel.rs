//! Projecting views concurrently.
//!
//! Each view is projected independently into its own buffer of contributions.
//! The buffers of a batch are merged into the matrix by the calling thread in
//! ascending view order, so the columns see exactly the same sequence of
//! appends as in sequential generation.

use rayon::prelude::*;
use tracing::{debug, info};
use units::todo::Weightf32;

use super::{project_view, SystemMatrix};
use crate::error::Result;
use crate::ffs::{Deflection, FfsMode};
use crate::index::{Index1_u, RayIndex};
use crate::projector::SystemMatrixRow;
use crate::progress::ViewProgress;
use crate::scan::ScanGeometry;
use crate::utils::group_digits;

/// Everything one view adds to the matrix, in the order it was produced
struct ViewContributions(Vec<(RayIndex, Index1_u, Weightf32)>);

impl ViewContributions {

    fn project(geometry: &ScanGeometry, deflection: &Deflection, mode: FfsMode, view: usize) -> Result<Self> {
        let mut row = SystemMatrixRow::buffers(&geometry.grid);
        let mut contributions = vec![];
        project_view(geometry, deflection, mode, view, &mut row, |ray, row| {
            contributions.extend(row.iter().map(|&(voxel, weight)| (ray, voxel, weight)));
            Ok(())
        })?;
        Ok(Self(contributions))
    }
}

impl SystemMatrix {

    /// Like `generate`, but projecting `batch` views at a time on the current
    /// rayon thread pool. Larger batches keep more threads busy at the cost of
    /// holding more unmerged contributions in memory.
    pub fn generate_parallel(
        geometry: &ScanGeometry,
        mode: FfsMode,
        progress: &impl ViewProgress,
        batch: usize,
    ) -> Result<Self> {
        let mut matrix = Self::new(geometry)?;
        let deflection = Deflection::from_geometry(geometry);
        matrix.log_start(&deflection, mode);

        let batch = batch.max(1);
        let views = geometry.views;
        for first in (0..views).step_by(batch) {
            let last = (first + batch).min(views);
            let projected = (first..last)
                .into_par_iter()
                .map(|view| ViewContributions::project(geometry, &deflection, mode, view))
                .collect::<Result<Vec<_>>>()?;

            for ViewContributions(contributions) in projected {
                for (ray, voxel, weight) in contributions {
                    matrix.append(voxel, ray, weight)?;
                }
            }
            debug!(views = ?(first..last), "merged batch");
            progress.update(last, views);
        }
        progress.finish();

        info!(entries = %group_digits(matrix.n_entries()), "system matrix generated");
        Ok(matrix)
    }
}
