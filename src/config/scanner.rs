//! Configuration file parser for system matrix generation

use std::fs;
use std::str::FromStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, de};

use units::{Angle, Length};

use crate::error::{MatrixError, Result};

fn deserialize_uom<'d, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    String::deserialize(deserializer)?
        .parse::<T>()
        .map_err(de::Error::custom)
}

fn deserialize_uom_3d<'d, D, T>(deserializer: D) -> std::result::Result<(T, T, T), D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let (x, y, z) = <(String, String, String)>::deserialize(deserializer)?;
    tr_tup_res((x.parse(), y.parse(), z.parse()))
        .map_err(de::Error::custom)
}

/// Transpose 3-tuple of `Result`
///
/// `Ok` if all elements `Ok`; if any element is an `Err` return the first one.
///
/// # Examples
/// `(Ok(a),  Ok(b),  Ok(c)) -> Ok((a, b, c))`
/// `(Ok(a), Err(b),  Ok(c)) -> Err(b)`
/// `(Ok(a), Err(b), Err(c)) -> Err(b)`
fn tr_tup_res<O, E>((x,y,z): (std::result::Result<O, E>, std::result::Result<O, E>, std::result::Result<O, E>))
                    -> std::result::Result<(O, O, O), E> {
    Ok((x?, y?, z?))
}

/// Everything needed to generate a system matrix. Read-only for the duration
/// of a run.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Directory in which `matrix.bin` is written
    pub output_dir: PathBuf,

    pub scanner: Scanner,
    pub detector: Detector,
    pub voxels: Voxels,
    pub trajectory: Trajectory,

    #[serde(default)]
    pub ffs: Ffs,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Scanner {

    #[serde(deserialize_with = "deserialize_uom")]
    pub source_detector_distance: Length,

    /// Distance of the (undeflected) focal spot from the axis of rotation
    #[serde(deserialize_with = "deserialize_uom")]
    pub focal_spot_radius: Length,

    #[serde(deserialize_with = "deserialize_uom")]
    pub anode_angle: Angle,

    #[serde(deserialize_with = "deserialize_uom")]
    pub fan_angle_increment: Angle,

    #[serde(deserialize_with = "deserialize_uom")]
    pub collimated_slice_width: Length,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Detector {
    pub channels: usize,
    pub rows: usize,

    /// Transaxial spacing of channels, at the detector
    #[serde(deserialize_with = "deserialize_uom")]
    pub channel_spacing: Length,

    /// Axial spacing of rows, at the detector
    #[serde(deserialize_with = "deserialize_uom")]
    pub row_spacing: Length,

    /// Fractional channel index hit by the central ray
    pub centre_channel: f64,

    /// Fractional row index hit by the central ray
    pub centre_row: f64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Voxels {

    /// Number of voxels in the transaxial plane: `[x, y]`
    pub n: (usize, usize),

    #[serde(deserialize_with = "deserialize_uom_3d")]
    pub size: (Length, Length, Length),

    /// Fractional voxel index of the isocentre, per axis
    pub centre: (f64, f64, f64),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Trajectory {
    pub views: usize,

    #[serde(deserialize_with = "deserialize_uom")]
    pub tube_angle_increment: Angle,

    /// +1 or -1
    #[serde(default = "default_table_direction")]
    pub table_direction: i32,

    /// Table feed per view
    #[serde(deserialize_with = "deserialize_uom")]
    pub z_increment: Length,
}

/// Which flying focal spots are active. At least one must be.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Ffs {
    #[serde(default)] pub z: bool,
    #[serde(default)] pub phi: bool,
}

fn default_table_direction() -> i32 { 1 }

pub fn read_config_file(path: &Path) -> Result<Config> {
    let config: String = fs::read_to_string(path)
        .map_err(|e| MatrixError::Configuration(format!("Couldn't read config file `{path:?}`: {e}")))?;
    parse_config(&config)
        .map_err(|e| MatrixError::Configuration(format!("Couldn't parse config file `{path:?}`: {e}")))
}

pub fn parse_config(text: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(text)
}


#[cfg(test)]
mod tests {
    use super::*;
    use units::{cm, mm, degree, radian, assert_uom_eq};
    use units::uom::si::{length::millimeter, angle::radian as rad};

    // ----- Test an example on-disk config file -----------------------------------------
    #[test]
    fn test_config_file() -> Result<()> {
        let config = read_config_file("ffs-config.toml".as_ref())?;
        assert_eq!(config.output_dir, PathBuf::from("data/out"));
        assert_eq!(config.detector.channels, 736);
        assert_eq!(config.detector.rows, 32);
        assert_eq!(config.voxels.n, (512, 512));
        assert_eq!(config.trajectory.views, 2304);
        assert_eq!(config.trajectory.table_direction, 1);
        assert_eq!(config.ffs, Ffs { z: true, phi: true });
        assert_uom_eq!(millimeter, config.scanner.source_detector_distance, mm(1085.6), ulps <= 1);
        assert_uom_eq!(rad, config.scanner.anode_angle, degree(7.0), ulps <= 1);
        Ok(())
    }

    #[test]
    fn missing_config_file_is_a_configuration_error() {
        let err = read_config_file("no/such/file.toml".as_ref()).unwrap_err();
        assert!(err.is_configuration());
    }

    // ----- Some helpers to make the tests more concise ---------------------------------
    //  ---  Parse string as TOML  -------------------------
    fn parse<'d, D: Deserialize<'d>>(input: &'d str) -> D {
        toml::from_str(input).unwrap()
    }
    //  ---  Macro for concise assertions about values of parsed fields -------------------
    macro_rules! check {
        ($type:ident($text:expr).$field:ident = $expected:expr) => {
            let config: $type = parse::<$type>($text);
            println!("DESERIALIZED: {config:?}");
            assert_eq!(config.$field, $expected);
        };
        ($type:ident($text:expr) fields: $($field:ident = $expected:expr);+$(;)?) => {
            let config: $type = parse::<$type>($text);
            println!("DESERIALIZED: {config:?}");
            $(assert_eq!(config.$field, $expected);)*
        }
    }

    // ----- Test deserializing of individual sections ---------------------------------
    #[test]
    fn config_ffs() {
        check!{Ffs("z = true") fields: z = true; phi = false}
        check!{Ffs("phi = true") fields: z = false; phi = true}
        check!{Ffs("") fields: z = false; phi = false}
    }

    #[test]
    fn config_voxels() {
        check!{Voxels(r#"
                     n = [10, 20]
                     size = ["1 mm", "2 mm", "1 cm"]
                     centre = [4.5, 9.5, 0.0]
               "#)
        fields:
               n      = (10, 20);
               size   = (mm(1.0), mm(2.0), cm(1.0));
               centre = (4.5, 9.5, 0.0);
        }
    }

    #[test]
    fn config_trajectory_with_default_table_direction() {
        let t: Trajectory = parse(r#"
              views = 1152
              tube_angle_increment = "0.005454 rad"
              z_increment = "0.0 mm"
        "#);
        assert_eq!(t.views, 1152);
        assert_eq!(t.table_direction, 1);
        assert_uom_eq!(rad, t.tube_angle_increment, radian(0.005454), ulps <= 1);
    }

    #[test]
    fn config_detector() {
        let d: Detector = parse(r#"
              channels = 736
              rows = 16
              channel_spacing = "1.4 mm"
              row_spacing = "1 mm"
              centre_channel = 366.25
              centre_row = 7.5
        "#);
        assert_eq!((d.channels, d.rows), (736, 16));
        assert_eq!((d.centre_channel, d.centre_row), (366.25, 7.5));
        assert_uom_eq!(millimeter, d.channel_spacing, mm(1.4), ulps <= 1);
    }

    // ----- Make sure that unknown fields are not accepted -----------------------------
    #[test]
    #[should_panic]
    fn config_reject_unknown_field() {
        check!{Ffs("wobble = true").z = false}
    }

    // ----- Quantities without units must be rejected: they defeat the point of uom ----
    #[test]
    fn config_reject_bare_number_for_quantity() {
        #[derive(Deserialize, Debug)]
        struct X {
            #[serde(deserialize_with = "deserialize_uom")]
            a: Length,
        }
        assert!(toml::from_str::<X>("a = 2.0").is_err());
        assert!(toml::from_str::<X>(r#"a = "2.0 furlongs""#).is_err());
        check!(X(r#"a = "20 mm""#).a = mm(20.0));
    }

    #[test]
    fn transpose_tuple_of_results() {
        let ok: std::result::Result<(u8, u8, u8), &str> = tr_tup_res((Ok(1), Ok(2), Ok(3)));
        assert_eq!(ok, Ok((1, 2, 3)));
        let err: std::result::Result<(u8, u8, u8), &str> = tr_tup_res((Ok(1), Err("b"), Err("c")));
        assert_eq!(err, Err("b"));
    }
}
