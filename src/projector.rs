//! Find the weights and indices of the voxels coupled to a single ray.
//!
//! The ray is swept through the voxel grid one voxel line at a time, along
//! whichever transaxial axis its direction is most closely aligned with. This
//! keeps the slopes used to extrapolate the ray between lines bounded by 1,
//! so rays nearly parallel to an axis never cause a division by a vanishing
//! direction component.
//!
//! At each line the ray's crossing point is split bilinearly between the two
//! neighbouring voxels across the sweep, and between the two axial planes
//! `k = -1` and `k = 0` of its axial footprint. The weight is the length of
//! the ray within one voxel line, `voxel_size / |direction component|`.

use units::todo::Weightf32;

use crate::index::Index1_u;
use crate::ray::Ray;
use crate::scan::VoxelGrid;

// ----- Storage of system matrix elements. Only one ray is relevant at any single time ------
pub type SystemMatrixElement = (Index1_u, Weightf32);

pub struct SystemMatrixRow(pub Vec<SystemMatrixElement>);

impl SystemMatrixRow {

    // Allocating these anew for each ray had a noticeable runtime cost, so
    // create them up-front and reuse them.
    pub fn buffers(grid: &VoxelGrid) -> Self {
        let max_number_of_coupled_voxels_possible = 2 * grid.n[0].max(grid.n[1]);
        Self(Vec::with_capacity(max_number_of_coupled_voxels_possible))
    }

    pub fn iter(&self) -> std::slice::Iter<SystemMatrixElement> { self.0.iter() }
    pub fn clear(&mut self) { self.0.clear(); }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<'a> IntoIterator for &'a SystemMatrixRow {
    type Item = SystemMatrixElement;
    type IntoIter = std::iter::Cloned<std::slice::Iter<'a, Self::Item>>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().cloned()
    }
}

/// The voxel axis along which a ray is swept
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sweep { X, Y }

impl Sweep {

    pub fn for_ray(ray: &Ray) -> Self {
        let d = ray.direction;
        if d.x.abs() > d.y.abs() { Self::X } else { Self::Y }
    }

    /// `(along, across)` axis indices
    fn axes(self) -> (usize, usize) {
        match self {
            Self::X => (0, 1),
            Self::Y => (1, 0),
        }
    }
}

/// For a single ray, place the indices and weights of the coupled voxels in
/// the `system_matrix_row` output parameter, replacing its previous contents.
/// Using an output parameter, because this is called once per ray, hundreds
/// of millions of times.
pub fn project_ray(ray: &Ray, grid: &VoxelGrid, system_matrix_row: &mut SystemMatrixRow) {
    // Throw away previous ray's values
    system_matrix_row.clear();

    let sweep = Sweep::for_ray(ray);
    let (along, across) = sweep.axes();
    let (s, d) = (ray.source, ray.direction);

    let scale = grid.size[along] / d[along].abs();
    let across_slope = d[across] / d[along];
    let axial_slope  = d[2]      / d[along];

    for a in 0..grid.n[along] {
        // Distance, along the sweep axis, from source to this voxel line
        let travel = grid.position(along, a) - s[along];

        let across_hat = grid.fractional_index(across, s[across] + across_slope * travel);
        let      k_hat = grid.fractional_index(2     , s[2]      + axial_slope  * travel);

        let Some(c) = lower_neighbour(across_hat, grid.n[across]) else { continue };
        let Some(axial) = axial_fraction(k_hat) else { continue };
        let frac = across_hat - c as f64;

        let (near, far) = match sweep {
            Sweep::X => (grid.index1(a, c), grid.index1(a, c + 1)),
            Sweep::Y => (grid.index1(c, a), grid.index1(c + 1, a)),
        };
        system_matrix_row.0.push((near, (scale * axial * (1.0 - frac)) as Weightf32));
        system_matrix_row.0.push((far , (scale * axial *        frac ) as Weightf32));
    }
}

/// Index of the lower of the two voxels straddling fractional index `hat`, if
/// both lie inside `0..n`
#[inline]
fn lower_neighbour(hat: f64, n: usize) -> Option<usize> {
    let lower = hat.floor();
    // NaN fails both comparisons
    if lower >= 0.0 && lower <= n as f64 - 2.0 { Some(lower as usize) }
    else { None }
}

/// Share of the ray's contribution which falls on the reference plane, given
/// its fractional axial index. Only the planes `k = -1` and `k = 0` are
/// considered.
#[inline]
fn axial_fraction(k_hat: f64) -> Option<f64> {
    let k = k_hat.floor();
    let frac = k_hat - k;
    if      k == -1.0 { Some(frac) }
    else if k ==  0.0 { Some(1.0 - frac) }
    else              { None }
}
