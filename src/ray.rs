//! Rays from the (deflected) focal spot to the centres of the detector cells

use geometry::{Dot, Point, Vector};
use itertools::iproduct;

use crate::index::RayIndex;
use crate::scan::ScanGeometry;
use crate::view::View;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub index: RayIndex,
    /// True focal spot position, including the FFS deflection
    pub source: Point,
    /// Direction cosines
    pub direction: Vector,
}

/// Produces the rays of a single view
pub struct RayBuilder<'g> {
    geometry: &'g ScanGeometry,
    view: View,
    source: Point,
}

impl<'g> RayBuilder<'g> {

    /// `offset` is the focal spot deflection in the rotating source frame
    pub fn new(geometry: &'g ScanGeometry, view: View, offset: Vector) -> Self {
        // The axial component is unaffected by the gantry rotation
        let offset = Vector::new(offset.dot(view.e_w), offset.dot(view.e_u), offset.z);
        let source = view.nominal_source + offset;
        Self { geometry, view, source }
    }

    pub fn source(&self) -> Point { self.source }

    pub fn ray(&self, channel: usize, row: usize) -> Ray {
        let g = self.geometry;
        let det = &g.detector;
        let d = g.source_detector_distance;
        let View { e_w, e_u, e_z, index, .. } = self.view;

        let transaxial_angle = (channel as f64 - det.centre_channel) * det.channel_spacing / d;
        let axial_position   = (row     as f64 - det.centre_row    ) * det.row_spacing;
        let (sin, cos) = transaxial_angle.sin_cos();

        // The transaxial part has length `d`, so this is the exact norm
        let norm = (axial_position * axial_position + d * d).sqrt();
        let direction = (e_w * (-d * cos) - e_u * (d * sin) - e_z * axial_position) / norm;

        Ray {
            index: g.ray_index(index, channel, row),
            source: self.source,
            direction,
        }
    }

    /// All rays of this view, in ascending `RayIndex`
    pub fn rays(&self) -> impl Iterator<Item = Ray> + '_ {
        let det = &self.geometry.detector;
        iproduct!(0..det.channels, 0..det.rows)
            .map(move |(channel, row)| self.ray(channel, row))
    }
}
