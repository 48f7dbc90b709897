//! The sparse system matrix: one column per transaxial voxel, listing the
//! rays which pass through that voxel's footprint and with what weight.
//!
//! Columns are filled by visiting views, channels and rows in nested order,
//! which makes the ray index of every appended element strictly greater than
//! any already present in the column.

mod column;
mod parallel;

pub use column::{Entry, SparseColumn};

use std::path::PathBuf;

use tracing::{debug, info};
use units::todo::Weightf32;

use crate::config::Config;
use crate::error::{MatrixError, Result, WithPath};
use crate::ffs::{Deflection, FfsMode};
use crate::index::{Index1_u, RayIndex};
use crate::projector::{project_ray, SystemMatrixRow};
use crate::progress::ViewProgress;
use crate::ray::RayBuilder;
use crate::scan::{ScanGeometry, VoxelGrid};
use crate::utils::group_digits;
use crate::view::View;

#[derive(Debug)]
pub struct SystemMatrix {
    grid: VoxelGrid,
    /// Logical dimension of every column
    n_rays: usize,
    columns: Vec<SparseColumn>,
}

impl SystemMatrix {

    /// An empty matrix with one column per voxel of `geometry`'s grid. Fails
    /// if the rays cannot be numbered with the `i32`s of the file format.
    pub fn new(geometry: &ScanGeometry) -> Result<Self> {
        let n_rays = geometry.n_rays();
        if n_rays > i32::MAX as usize + 1 {
            return Err(MatrixError::Configuration(format!(
                "{} rays ({} views x {} channels x {} rows) cannot be indexed by 32-bit integers",
                group_digits(n_rays), geometry.views, geometry.detector.channels, geometry.detector.rows,
            )));
        }
        let grid = geometry.grid;
        let columns = (0..grid.n_voxels()).map(|_| SparseColumn::new()).collect();
        Ok(Self { grid, n_rays, columns })
    }

    pub fn grid(&self) -> &VoxelGrid { &self.grid }
    pub fn n_rays(&self) -> usize { self.n_rays }
    pub fn n_columns(&self) -> usize { self.columns.len() }
    pub fn columns(&self) -> &[SparseColumn] { &self.columns }
    pub fn into_columns(self) -> Vec<SparseColumn> { self.columns }
    pub fn n_entries(&self) -> usize { self.columns.iter().map(SparseColumn::len).sum() }

    /// Record that `ray` passes through `voxel` with `weight`
    pub fn append(&mut self, voxel: Index1_u, ray: RayIndex, weight: Weightf32) -> Result<()> {
        assert!(ray < self.n_rays, "ray {ray} lies beyond the {} rays of the scan", self.n_rays);
        let column = &mut self.columns[voxel];
        column.push(ray as i32, weight)
            .map_err(|source| MatrixError::Allocation { column: voxel, entries: column.len(), source })
    }

    /// Record all the voxels coupled to `ray`
    pub fn append_row(&mut self, ray: RayIndex, row: &SystemMatrixRow) -> Result<()> {
        for (voxel, weight) in row {
            self.append(voxel, ray, weight)?;
        }
        Ok(())
    }

    /// Project every ray of the scan, one view after another
    pub fn generate(geometry: &ScanGeometry, mode: FfsMode, progress: &impl ViewProgress) -> Result<Self> {
        let mut matrix = Self::new(geometry)?;
        let deflection = Deflection::from_geometry(geometry);
        matrix.log_start(&deflection, mode);

        let mut row = SystemMatrixRow::buffers(&geometry.grid);
        for view in 0..geometry.views {
            project_view(geometry, &deflection, mode, view, &mut row, |ray, row| matrix.append_row(ray, row))?;
            progress.update(view + 1, geometry.views);
        }
        progress.finish();

        info!(entries = %group_digits(matrix.n_entries()), "system matrix generated");
        Ok(matrix)
    }

    fn log_start(&self, deflection: &Deflection, mode: FfsMode) {
        info!(voxels = %group_digits(self.n_columns()),
              rays   = %group_digits(self.n_rays),
              ?mode,
              "generating system matrix");
        debug!(dr = deflection.dr, da = deflection.da, "focal spot deflections [mm]");
    }
}

/// Build the rays of `view` and project each one, passing its voxels to `sink`
/// in ascending ray order.
fn project_view(
    geometry: &ScanGeometry,
    deflection: &Deflection,
    mode: FfsMode,
    view: usize,
    row: &mut SystemMatrixRow,
    mut sink: impl FnMut(RayIndex, &SystemMatrixRow) -> Result<()>,
) -> Result<()> {
    let frame = View::new(view, geometry);
    let rays = RayBuilder::new(geometry, frame, deflection.offset(mode, view));
    for ray in rays.rays() {
        project_ray(&ray, &geometry.grid, row);
        sink(ray.index, row)?;
    }
    Ok(())
}

/// Generate the system matrix described by `config` and write it to
/// `matrix.bin` in the configured output directory, returning the path of the
/// file.
///
/// With `batch = Some(n)`, `n` views at a time are projected on the current
/// rayon thread pool. The result does not depend on the choice.
pub fn make_system_matrix(config: &Config, batch: Option<usize>, progress: &impl ViewProgress) -> Result<PathBuf> {
    // Before any work or any file is touched
    let mode = FfsMode::try_from(config.ffs)?;
    let geometry = ScanGeometry::from(config);

    let matrix = match batch {
        None        => SystemMatrix::generate         (&geometry, mode, progress)?,
        Some(batch) => SystemMatrix::generate_parallel(&geometry, mode, progress, batch)?,
    };

    let dir = &config.output_dir;
    std::fs::create_dir_all(dir).with_path(dir)?;
    crate::io::matrix::write(matrix, dir)
}
