//! The rotating frame of the gantry at a single view

use geometry::{Point, Vector};
use units::todo::Anglef64;

use crate::scan::ScanGeometry;

/// Orthonormal basis rotating with the gantry, and the position the focal
/// spot would have in the absence of any flying focal spot deflection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub index: usize,
    pub tube_angle: Anglef64,
    /// Radial: from the axis of rotation towards the source
    pub e_w: Vector,
    /// Tangential
    pub e_u: Vector,
    /// Axial
    pub e_z: Vector,
    pub nominal_source: Point,
}

impl View {

    pub fn new(index: usize, geometry: &ScanGeometry) -> Self {
        // Views are numbered symmetrically about the middle of the scan
        let from_middle = index as f64 - 0.5 * geometry.views as f64;
        let tube_angle = from_middle * geometry.tube_angle_increment;
        let (sin, cos) = tube_angle.sin_cos();

        let e_w = Vector::new( cos, sin, 0.0);
        let e_u = Vector::new(-sin, cos, 0.0);
        let e_z = Vector::new(0.0, 0.0, 1.0);

        let table_position = geometry.table_direction * from_middle * geometry.z_increment;
        let nominal_source = Point::from(e_w * geometry.focal_spot_radius + e_z * table_position);

        Self { index, tube_angle, e_w, e_u, e_z, nominal_source }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::test_geometry::small_scanner;
    use float_eq::assert_float_eq;
    use geometry::Dot;
    use rstest::rstest;

    #[rstest(view, case(0), case(1), case(7), case(8), case(15))]
    fn frame_is_right_handed_and_orthonormal(view: usize) {
        let g = small_scanner(16, 1, 1, [2, 2]);
        let View { e_w, e_u, e_z, .. } = View::new(view, &g);
        let tol = 1e-15;
        assert_float_eq!(e_w.dot(e_w), 1.0, abs <= tol);
        assert_float_eq!(e_u.dot(e_u), 1.0, abs <= tol);
        assert_float_eq!(e_w.dot(e_u), 0.0, abs <= tol);
        assert_float_eq!(e_w.dot(e_z), 0.0, abs <= tol);
        // e_w x e_u = e_z
        assert_float_eq!(e_w.x * e_u.y - e_w.y * e_u.x, 1.0, abs <= tol);
    }

    #[test]
    fn middle_view_has_zero_tube_angle() {
        let g = small_scanner(16, 1, 1, [2, 2]);
        let view = View::new(8, &g);
        assert_eq!(view.tube_angle, 0.0);
        assert_eq!(view.e_w, Vector::new(1.0, 0.0, 0.0));
        assert_eq!(view.nominal_source, Point::new(500.0, 0.0, 0.0));
    }

    #[test]
    fn source_moves_with_table_feed() {
        let mut g = small_scanner(4, 1, 1, [2, 2]);
        g.z_increment = 0.5;
        g.table_direction = -1.0;
        // Views 0..4 lie at -2, -1, 0, 1 increments from the middle
        let z: Vec<f64> = (0..4).map(|i| View::new(i, &g).nominal_source.z).collect();
        assert_eq!(z, vec![1.0, 0.5, 0.0, -0.5]);
        let r = View::new(1, &g).nominal_source;
        assert_float_eq!(r.x.hypot(r.y), 500.0, abs <= 1e-12);
    }
}
