use std::ops::{Add, Div, Index, Mul, Neg, Sub};
use units::todo::Lengthf64;

/// Displacement or direction in the scanner's fixed (world) frame, or in the
/// rotating frame of the X-ray source. Components are in millimetres, or
/// dimensionless for direction cosines.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vector {
    pub x: Lengthf64,
    pub y: Lengthf64,
    pub z: Lengthf64,
}

pub trait Dot<Rhs = Self> {
    type Output;
    fn dot(self, rhs: Rhs) -> Self::Output;
}

impl Dot for Vector {
    type Output = f64;
    fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Vector {

    pub const fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }

    pub const fn zero() -> Self { Self::new(0.0, 0.0, 0.0) }

    pub fn norm(self) -> f64 { self.dot(self).sqrt() }

    pub fn normalize(self) -> Self { self / self.norm() }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    pub fn to_array(self) -> [f64; 3] { [self.x, self.y, self.z] }

}

impl From<[f64; 3]> for Vector {
    fn from([x, y, z]: [f64; 3]) -> Self { Self::new(x, y, z) }
}

impl Add for Vector {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self::Output { Self::new(-self.x, -self.y, -self.z) }
}

impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(rhs * self.x, rhs * self.y, rhs * self.z)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;
    fn mul(self, rhs: Vector) -> Self::Output { rhs * self }
}

impl Div<f64> for Vector {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Index<usize> for Vector {
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
