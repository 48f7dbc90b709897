//! Flat indices of voxels and rays

use std::ops::{Add, Div, Mul, Rem};

/// Position of a voxel column in the matrix: `x + nx * y`
#[allow(non_camel_case_types)] pub type Index1_u = usize;
/// Transaxial voxel coordinates `[x, y]`
#[allow(non_camel_case_types)] pub type Index2_u = [usize; 2];
#[allow(non_camel_case_types)] pub type BoxDim_u = [usize; 2];

/// Ray identifier: `row + rows * channel + rows * channels * view`. Strictly
/// increasing when views, channels and rows are visited in nested order.
pub type RayIndex = usize;

pub fn index2_to_1<T>([ix, iy]: [T; 2], [nx, _ny]: [T; 2]) -> T
where
    T: Mul<Output = T> + Add<Output = T>
{
    ix + iy * nx
}

pub fn index1_to_2<T>(i: T, [nx, _ny]: [T; 2]) -> [T; 2]
where
    T: Div<Output = T> +
       Rem<Output = T> +
       Copy
{
    [i % nx, i / nx]
}

/// Flatten `(view, channel, row)` into a `RayIndex`
#[inline]
pub fn ray_index(view: usize, channel: usize, row: usize, [channels, rows]: [usize; 2]) -> RayIndex {
    row + rows * channel + rows * channels * view
}
