use std::ops::{Add, Index, Sub};
use units::todo::Lengthf64;
use crate::Vector;

/// Position in the scanner's fixed frame, in millimetres. The origin lies on
/// the axis of rotation.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: Lengthf64,
    pub y: Lengthf64,
    pub z: Lengthf64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }
    pub const fn origin() -> Self { Self::new(0.0, 0.0, 0.0) }
}

impl Sub for Point {
    type Output = Vector;
    fn sub(self, rhs: Self) -> Self::Output {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add<Vector> for Point {
    type Output = Self;
    fn add(self, rhs: Vector) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<Vector> for Point {
    fn from(Vector { x, y, z }: Vector) -> Self { Self { x, y, z } }
}

impl Index<usize> for Point {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("index {index} is out of bounds [0,2]")
        }
    }
}
