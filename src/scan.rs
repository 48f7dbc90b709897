//! Scan geometry in plain `f64`s (millimetres and radians), extracted once
//! from the dimensioned `Config` for use in the projection kernel.

use units::{mm_, radian_};
use units::todo::{Anglef64, Lengthf64};

use crate::config::Config;
use crate::index::{index2_to_1, ray_index, BoxDim_u, Index1_u, RayIndex};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanGeometry {
    pub source_detector_distance: Lengthf64,
    pub focal_spot_radius: Lengthf64,
    pub anode_angle: Anglef64,
    pub fan_angle_increment: Anglef64,
    pub slice_width: Lengthf64,
    pub detector: DetectorLayout,
    pub grid: VoxelGrid,
    pub views: usize,
    pub tube_angle_increment: Anglef64,
    pub table_direction: f64,
    pub z_increment: Lengthf64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorLayout {
    pub channels: usize,
    pub rows: usize,
    pub channel_spacing: Lengthf64,
    pub row_spacing: Lengthf64,
    pub centre_channel: f64,
    pub centre_row: f64,
}

/// The reconstruction grid. Transaxially it is `n[0] x n[1]` voxels; axially
/// only the voxel size and the position of the centre are needed, because
/// each ray is projected onto a two-plane neighbourhood.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelGrid {
    pub n: BoxDim_u,
    pub size: [Lengthf64; 3],
    pub centre: [f64; 3],
}

impl VoxelGrid {

    pub fn n_voxels(&self) -> usize { self.n[0] * self.n[1] }

    #[inline]
    pub fn index1(&self, ix: usize, iy: usize) -> Index1_u { index2_to_1([ix, iy], self.n) }

    /// Position of the voxel with integer index `i` along `axis`
    #[inline]
    pub fn position(&self, axis: usize, i: usize) -> Lengthf64 {
        (i as f64 - self.centre[axis]) * self.size[axis]
    }

    /// Fractional voxel index of position `p` along `axis`
    #[inline]
    pub fn fractional_index(&self, axis: usize, p: Lengthf64) -> f64 {
        p / self.size[axis] + self.centre[axis]
    }
}

impl ScanGeometry {

    /// Total number of rays (the dimension of each matrix column)
    pub fn n_rays(&self) -> usize {
        self.views * self.detector.channels * self.detector.rows
    }

    pub fn ray_index(&self, view: usize, channel: usize, row: usize) -> RayIndex {
        ray_index(view, channel, row, [self.detector.channels, self.detector.rows])
    }
}

impl From<&Config> for ScanGeometry {
    fn from(config: &Config) -> Self {
        let Config { scanner, detector, voxels, trajectory, .. } = config;
        let (sx, sy, sz) = voxels.size;
        let (cx, cy, cz) = voxels.centre;
        Self {
            source_detector_distance: mm_(scanner.source_detector_distance),
            focal_spot_radius:        mm_(scanner.focal_spot_radius),
            anode_angle:          radian_(scanner.anode_angle),
            fan_angle_increment:  radian_(scanner.fan_angle_increment),
            slice_width:              mm_(scanner.collimated_slice_width),
            detector: DetectorLayout {
                channels:            detector.channels,
                rows:                detector.rows,
                channel_spacing: mm_(detector.channel_spacing),
                row_spacing:     mm_(detector.row_spacing),
                centre_channel:      detector.centre_channel,
                centre_row:          detector.centre_row,
            },
            grid: VoxelGrid {
                n: [voxels.n.0, voxels.n.1],
                size: [mm_(sx), mm_(sy), mm_(sz)],
                centre: [cx, cy, cz],
            },
            views:                    trajectory.views,
            tube_angle_increment: radian_(trajectory.tube_angle_increment),
            table_direction:          trajectory.table_direction as f64,
            z_increment:              mm_(trajectory.z_increment),
        }
    }
}
