//! Flying focal spot deflections.
//!
//! The focal spot jumps between two (or four) positions on alternate views:
//! tangentially (Phi FFS), radially along the anode surface which also moves
//! it axially (Z FFS), or both. Offsets are expressed in the rotating source
//! frame as `(radial, tangential, axial)`.

use geometry::Vector;
use units::todo::{Anglef64, Lengthf64};

use crate::config::scanner::Ffs;
use crate::error::{MatrixError, Result};
use crate::scan::ScanGeometry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfsMode {
    /// Tangential deflection only
    Phi,
    /// Radial (and therefore axial) deflection only
    Z,
    /// Both, cycling through four focal spot positions
    ZPhi,
}

impl FfsMode {

    pub fn from_flags(z: bool, phi: bool) -> Result<Self> {
        match (z, phi) {
            (false, true ) => Ok(Self::Phi),
            (true , false) => Ok(Self::Z),
            (true , true ) => Ok(Self::ZPhi),
            (false, false) => Err(MatrixError::Configuration(
                "no flying focal spot selected: enable at least one of `ffs.z` and `ffs.phi`".into()
            )),
        }
    }

    /// Number of views after which the deflection pattern repeats
    pub fn period(self) -> usize {
        match self {
            Self::Phi | Self::Z => 2,
            Self::ZPhi          => 4,
        }
    }
}

impl TryFrom<Ffs> for FfsMode {
    type Error = MatrixError;
    fn try_from(Ffs { z, phi }: Ffs) -> Result<Self> { Self::from_flags(z, phi) }
}

/// Magnitudes of the focal spot deflections, derived once per run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deflection {
    /// Radial
    pub dr: Lengthf64,
    /// Tangential
    pub da: Lengthf64,
    pub tan_anode: f64,
}

impl Deflection {

    pub fn new(dr: Lengthf64, da: Lengthf64, anode_angle: Anglef64) -> Self {
        Self { dr, da, tan_anode: anode_angle.tan() }
    }

    /// Deflections which shift the ray sampling by a quarter of the detector
    /// pitch at the isocentre: axially for `dr`, transaxially for `da`.
    pub fn from_geometry(g: &ScanGeometry) -> Self {
        let d = g.source_detector_distance;
        let r = g.focal_spot_radius;
        let dr = d * g.slice_width / (4.0 * (d - r) * g.anode_angle.tan());
        let da = d * r * g.fan_angle_increment.sin() / (4.0 * (d - r));
        Self::new(dr, da, g.anode_angle)
    }

    /// Offset of the focal spot at `view`, in the rotating source frame
    pub fn offset(&self, mode: FfsMode, view: usize) -> Vector {
        let Self { dr, da, tan_anode } = *self;
        let radial = |dr: f64| Vector::new(dr, 0.0, dr * tan_anode);
        match mode {
            FfsMode::Phi => match view % 2 {
                0 => Vector::new(0.0,  da, 0.0),
                _ => Vector::new(0.0, -da, 0.0),
            },
            FfsMode::Z => match view % 2 {
                0 => radial(-dr),
                _ => radial( dr),
            },
            FfsMode::ZPhi => {
                let Vector { x, z, .. } = radial(if view % 4 < 2 { -dr } else { dr });
                let y = if view % 2 == 0 { da } else { -da };
                Vector::new(x, y, z)
            },
        }
    }
}

/// Focal spot offset for `view`, with the mode given as the two configuration
/// flags. Fails if neither flag is set.
pub fn focal_spot_offset(view: usize, da: Lengthf64, dr: Lengthf64, anode_angle: Anglef64, zffs: bool, phiffs: bool) -> Result<Vector> {
    let mode = FfsMode::from_flags(zffs, phiffs)?;
    Ok(Deflection::new(dr, da, anode_angle).offset(mode, view))
}
