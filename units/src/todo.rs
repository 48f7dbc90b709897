/// Units which are simply type aliases for plain floats rather than having an
/// implementation as a `uom` `Quantity`.
///
/// These are used in the projection kernel, where every ray is evaluated
/// hundreds of times per view and the values are extracted from the
/// configuration's `uom` quantities once, up front. The aliases still give
/// some clues in the source as to what the numbers represent.

/// Millimetres
pub type Lengthf64 = f64;
/// Radians
pub type Anglef64  = f64;
pub type Ratiof64  = f64;
/// Path length of a ray through a voxel footprint, in millimetres
pub type Weightf32 = f32; // TODO uom Weight
