//! In-plane penalties for iterative reconstruction with the system matrix.
//!
//! Each penalty computes the update of a single voxel of a 2-D image from its
//! 8 nearest neighbours. Images are `ndarray`s indexed `[y, x]`, so that in
//! standard layout voxel `(x, y)` lives at `x + nx * y`, exactly like the
//! columns of the system matrix.

use ndarray::{Array2, ArrayView2};

use crate::index::Index2_u;

const MAX_BISECTION_STEPS: usize = 1_000_000;
const BISECTION_TOLERANCE: f64 = 1e-8;

/// `(dx, dy)` of the neighbours, row by row
const OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Neighbour weights: `1/√2` across corners, `1` across edges
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbourhood {
    pub weights: [f64; 8],
    /// Sum of the weights
    pub scale: f64,
}

impl Neighbourhood {

    pub fn in_plane() -> Self {
        use std::f64::consts::FRAC_1_SQRT_2 as D;
        let weights = [D, 1.0, D, 1.0, 1.0, D, 1.0, D];
        Self { weights, scale: weights.iter().sum() }
    }

    /// `u_n - u` for each neighbour `n` of `voxel`, or `None` if `voxel` lies
    /// on the border of the image
    fn differences(image: ArrayView2<f64>, [x, y]: Index2_u) -> Option<[f64; 8]> {
        let (ny, nx) = image.dim();
        if x == 0 || y == 0 || x + 1 >= nx || y + 1 >= ny { return None }
        let u = image[[y, x]];
        Some(OFFSETS.map(|(dx, dy)| {
            image[[y.wrapping_add_signed(dy), x.wrapping_add_signed(dx)]] - u
        }))
    }
}

impl Default for Neighbourhood {
    fn default() -> Self { Self::in_plane() }
}

/// Parameters of a single voxel update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateParams {
    /// Curvature of the data term
    pub alpha: f64,
    /// Gradient of the data term
    pub beta: f64,
    /// Strength of the penalty
    pub lambda: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prior {
    Quadratic,
    /// Quadratic for neighbour differences well below `delta`, approximately
    /// linear above it
    EdgePreserving { delta: f64 },
}

impl Prior {

    /// Amount by which `voxel` should change; `None` on the border of the image
    pub fn update(&self, image: ArrayView2<f64>, voxel: Index2_u, params: &UpdateParams) -> Option<f64> {
        match *self {
            Self::Quadratic                => quadratic      (image, voxel, params),
            Self::EdgePreserving { delta } => edge_preserving(image, voxel, params, delta),
        }
    }

    /// Updates of every voxel in `image`
    pub fn updates(&self, image: ArrayView2<f64>, params: &UpdateParams) -> Array2<Option<f64>> {
        Array2::from_shape_fn(image.dim(), |(y, x)| self.update(image, [x, y], params))
    }
}

/// Closed-form update under a quadratic penalty
pub fn quadratic(image: ArrayView2<f64>, voxel: Index2_u, params: &UpdateParams) -> Option<f64> {
    let &UpdateParams { alpha, beta, lambda } = params;
    let Neighbourhood { weights, scale } = Neighbourhood::in_plane();
    let diffs = Neighbourhood::differences(image, voxel)?;
    let sum: f64 = weights.iter().zip(diffs).map(|(w, d)| w * d).sum();
    Some((beta + lambda * sum) / (alpha + lambda * scale))
}

/// Update under the edge-preserving penalty, found by bisection.
///
/// The root is bracketed by `beta / alpha` and the neighbour differences.
/// Returns 0 when `alpha` is 0.
pub fn edge_preserving(image: ArrayView2<f64>, voxel: Index2_u, params: &UpdateParams, delta: f64) -> Option<f64> {
    let &UpdateParams { alpha, beta, lambda } = params;
    let Neighbourhood { weights, .. } = Neighbourhood::in_plane();
    let diffs = Neighbourhood::differences(image, voxel)?;

    if alpha == 0.0 { return Some(0.0) }

    let objective_gradient = |du: f64| {
        let sum: f64 = weights.iter().zip(diffs).map(|(w, d)| {
            let t = du - d;
            let magnitude = w * (1.0 - 1.0 / (1.0 + (t / delta).abs()));
            if t >= 0.0 { magnitude } else { -magnitude }
        }).sum();
        2.0 * alpha * du - 2.0 * beta + lambda * sum
    };

    let start = beta / alpha;
    let (mut a, mut b) = diffs.iter().fold((start, start), |(lo, hi), &d| (lo.min(d), hi.max(d)));

    let mut c = (a + b) / 2.0;
    for _ in 0..MAX_BISECTION_STEPS {
        c = (a + b) / 2.0;
        let f_c = objective_gradient(c);
        if f_c == 0.0 || (b - a) / 2.0 < BISECTION_TOLERANCE { return Some(c) }
        if same_sign(f_c, objective_gradient(a)) { a = c } else { b = c }
    }
    Some(c)
}

/// Zero counts as positive
fn same_sign(a: f64, b: f64) -> bool { (a < 0.0) == (b < 0.0) }
