//! Dimensioned quantities used in scanner configurations.
//!
//! Quantities are stored in a millimetre-based system, so that `mm_` is a
//! no-op conversion on the hot path where plain `f64`s are extracted for the
//! numerical kernel.

pub use uom;
pub use uom::si::Quantity;

pub mod todo;

pub mod mmrad {

  use uom::si::{
    length::millimeter,
    mass::kilogram,
    time::second,
    electric_current::ampere,
    thermodynamic_temperature::kelvin,
    amount_of_substance::mole,
    luminous_intensity::candela,
  };

  pub mod f64 {
    use uom::{ISQ, system, si::Quantity};
    ISQ!(uom::si, f64, (millimeter, kilogram, second, ampere, kelvin, mole, candela));
  }

}

pub use mmrad::f64::{Angle, Length, Ratio};

mod units {
  pub use uom::si::{length::{millimeter, centimeter},
                    ratio ::ratio,
                    angle ::{radian, degree},
  };
}

// Making values from float literals is very long-winded in uom, so provide
// some pithily-named convenience constructors.

/// Generate a function called NAME which returns QUANTITY by interpreting its
/// argument as UNIT
///
/// wrap!(NAME QUANTITY UNIT);
macro_rules! wrap {
  ($name:ident $quantity:ident $unit:ident ) => {
    pub fn $name(x: f64) -> $quantity { $quantity::new::<units::$unit>(x) }
  };
}

wrap!(mm     Length  millimeter);
wrap!(cm     Length  centimeter);
wrap!(ratio  Ratio        ratio);
wrap!(radian Angle       radian);
wrap!(degree Angle       degree);

// Reverse direction of the above
pub fn mm_    (x: Length) -> f64 { x.get::<units::millimeter>() }
pub fn ratio_ (x: Ratio ) -> f64 { x.get::<units::ratio>() }
pub fn radian_(x: Angle ) -> f64 { x.get::<units::radian>() }
pub fn degree_(x: Angle ) -> f64 { x.get::<units::degree>() }

#[macro_export]
macro_rules! in_base_unit {
  ($value:expr) => {
    $crate::Quantity {
      dimension: std::marker::PhantomData,
      units: std::marker::PhantomData,
      value: $value,
    }
  };
}

#[macro_export]
macro_rules! assert_uom_eq {
  ($unit:ident, $lhs:expr, $rhs:expr, $algo:ident <= $tol:expr) => {
    float_eq::assert_float_eq!($lhs.get::<$unit>(), $rhs.get::<$unit>(), $algo <= $tol)
  };
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::units::{millimeter, radian};

  #[test]
  fn sum_of_mixed_lengths() {
    let v = vec![mm(1.0), cm(1.0)];
    let total: Length = v.into_iter().sum();
    assert_uom_eq!(millimeter, total, mm(11.0), ulps <= 1);
  }

  #[test]
  fn millimetre_is_base_unit() {
    let l: Length = in_base_unit!(42.0);
    assert_eq!(mm_(l), 42.0);
    float_eq::assert_float_eq!(cm(3.0).value, 30.0, ulps <= 2);
  }

  #[test]
  fn degrees_are_converted_to_radians() {
    assert_uom_eq!(radian, degree(180.0), super::radian(std::f64::consts::PI), ulps <= 1);
    float_eq::assert_float_eq!(degree_(super::radian(std::f64::consts::FRAC_PI_2)), 90.0, ulps <= 1);
  }

  // Configuration files spell out units, which are parsed via uom's `FromStr`
  #[test]
  fn parse_with_units() -> Result<(), Box<dyn std::error::Error>> {
    let l: Length = "2 cm".parse()?;
    assert_uom_eq!(millimeter, l, mm(20.0), ulps <= 1);

    let a: Angle = "0.25 rad".parse()?;
    assert_uom_eq!(radian, a, super::radian(0.25), ulps <= 1);

    let a: Angle = "7 degrees".parse()?;
    assert_uom_eq!(radian, a, degree(7.0), ulps <= 1);
    Ok(())
  }

  #[test]
  fn parse_rejects_unknown_unit() {
    assert!("3 parsecs".parse::<Angle>().is_err());
  }
}
