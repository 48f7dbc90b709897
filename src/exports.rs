pub use geometry::{Point, Vector};

pub use crate::config::Config;
pub use crate::error::{MatrixError, Result};
pub use crate::ffs::{FfsMode, focal_spot_offset};
pub use crate::index::{BoxDim_u, Index1_u, RayIndex};
pub use crate::scan::{ScanGeometry, VoxelGrid};
pub use crate::system_matrix::{make_system_matrix, SystemMatrix};
