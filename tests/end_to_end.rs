//! Generate whole matrices from configuration text, write them to disk and
//! inspect the files.

use std::fs;
use std::path::Path;

use float_eq::assert_float_eq;
#[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};
use rstest::rstest;
use tempfile::tempdir;

use ffsmat::config::parse_config;
use ffsmat::io::matrix::{read_columns, MATRIX_FILE_NAME};
use ffsmat::progress::NoProgress;
use ffsmat::stats::MatrixStats;
use ffsmat::{make_system_matrix, Config, ScanGeometry};

/// 2 x 2 voxels of 1 mm, a single detector cell, 4 views at 90 degree
/// intervals, Phi FFS with a tangential deflection of 0.1 mm
const TINY: &str = r#"
output_dir = "unused"

[scanner]
source_detector_distance = "1000 mm"
focal_spot_radius        = "500 mm"
anode_angle              = "7 degrees"
fan_angle_increment      = "0.0004 rad"
collimated_slice_width   = "1 mm"

[detector]
channels        = 1
rows            = 1
channel_spacing = "1 mm"
row_spacing     = "1 mm"
centre_channel  = 0.0
centre_row      = 0.0

[voxels]
n      = [2, 2]
size   = ["1 mm", "1 mm", "1 mm"]
centre = [0.5, 0.5, 0.5]

[trajectory]
views                = 4
tube_angle_increment = "90 degrees"
z_increment          = "0 mm"

[ffs]
phi = true
"#;

/// Something less trivial: oblique rays, several rows, all FFS modes
fn small(z: bool, phi: bool) -> String {
    format!(r#"
output_dir = "unused"

[scanner]
source_detector_distance = "1000 mm"
focal_spot_radius        = "500 mm"
anode_angle              = "7 degrees"
fan_angle_increment      = "0.004 rad"
collimated_slice_width   = "1 mm"

[detector]
channels        = 9
rows            = 3
channel_spacing = "4 mm"
row_spacing     = "0.5 mm"
centre_channel  = 4.25
centre_row      = 1.0

[voxels]
n      = [8, 6]
size   = ["2 mm", "2 mm", "1 mm"]
centre = [3.5, 2.5, 0.5]

[trajectory]
views                = 12
tube_angle_increment = "30 degrees"
table_direction      = -1
z_increment          = "0.01 mm"

[ffs]
z   = {z}
phi = {phi}
"#)
}

fn config(text: &str, dir: &Path) -> Config {
    let mut config = parse_config(text).unwrap();
    config.output_dir = dir.join("out");
    config
}

#[test]
fn tiny_matrix_by_hand() -> ffsmat::Result<()> {
    let dir = tempdir().unwrap();
    let path = make_system_matrix(&config(TINY, dir.path()), None, &NoProgress)?;
    assert_eq!(path, dir.path().join("out").join(MATRIX_FILE_NAME));

    // 8 bytes of count per column, 8 bytes per entry: 4 columns of 4 entries
    assert_eq!(fs::metadata(&path).unwrap().len(), 4 * 8 + 16 * 8);

    // Every ray is parallel to an axis and crosses 2 voxel lines, 0.1 mm off
    // the centre of the grid. The rays lie at z = 0, which is half-way through
    // the plane k = 0, so each voxel line receives half of its 1 mm path,
    // split 0.3 : 0.2 between the neighbours.
    let expected: [[f32; 4]; 4] = [
        // view: 0    1    2    3
        [0.3, 0.2, 0.2, 0.3], // voxel (0, 0)
        [0.3, 0.3, 0.2, 0.2], // voxel (1, 0)
        [0.2, 0.2, 0.3, 0.3], // voxel (0, 1)
        [0.2, 0.3, 0.3, 0.2], // voxel (1, 1)
    ];
    let columns = read_columns(&path, 4)?;
    for (column, weights) in columns.iter().zip(expected) {
        let indices: Vec<i32> = column.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        for (entry, weight) in column.iter().zip(weights) {
            assert_float_eq!(entry.value, weight, abs <= 1e-6);
        }
    }
    let stats = MatrixStats::of_columns(&columns, Some(4));
    assert_eq!(stats.entries, 16);
    assert_float_eq!(stats.weight_sum, 4.0, abs <= 1e-5);
    Ok(())
}

#[rstest(/**/ z    , phi  ,
         case(false, true ),
         case(true , false),
         case(true , true ),
)]
fn generation_is_deterministic(z: bool, phi: bool) -> ffsmat::Result<()> {
    let (a, b) = (tempdir().unwrap(), tempdir().unwrap());
    let text = small(z, phi);
    let path_a = make_system_matrix(&config(&text, a.path()), None, &NoProgress)?;
    let path_b = make_system_matrix(&config(&text, b.path()), None, &NoProgress)?;
    assert_eq!(fs::read(path_a).unwrap(), fs::read(path_b).unwrap());
    Ok(())
}

#[rstest(batch, case(1), case(5), case(12))]
fn parallel_output_is_identical(batch: usize) -> ffsmat::Result<()> {
    let (a, b) = (tempdir().unwrap(), tempdir().unwrap());
    let text = small(true, true);
    let sequential = make_system_matrix(&config(&text, a.path()), None, &NoProgress)?;
    let pool = rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap();
    let parallel = pool.install(|| make_system_matrix(&config(&text, b.path()), Some(batch), &NoProgress))?;
    assert_eq!(fs::read(sequential).unwrap(), fs::read(parallel).unwrap());
    Ok(())
}

#[rstest(/**/ z    , phi  ,
         case(false, true ),
         case(true , false),
         case(true , true ),
)]
fn written_matrix_is_consistent(z: bool, phi: bool) -> ffsmat::Result<()> {
    let dir = tempdir().unwrap();
    let config = config(&small(z, phi), dir.path());
    let geometry = ScanGeometry::from(&config);
    let path = make_system_matrix(&config, None, &NoProgress)?;
    let columns = read_columns(&path, geometry.grid.n_voxels())?;
    let stats = MatrixStats::of_columns(&columns, Some(geometry.n_rays()));
    assert!(stats.entries > 0);
    assert!(stats.ascending);
    assert_eq!(stats.out_of_range, 0);
    let (min, _) = stats.weight_range.unwrap();
    assert!(min >= 0.0);
    Ok(())
}

#[test]
fn no_ffs_fails_before_any_output_exists() {
    let dir = tempdir().unwrap();
    let config = config(&small(false, false), dir.path());
    let err = make_system_matrix(&config, None, &NoProgress).unwrap_err();
    assert!(err.is_configuration());
    assert!(!config.output_dir.exists());
}

#[test]
fn missing_ffs_section_means_no_ffs() {
    let text = TINY.replace("[ffs]\nphi = true\n", "");
    let dir = tempdir().unwrap();
    let err = make_system_matrix(&config(&text, dir.path()), None, &NoProgress).unwrap_err();
    assert!(err.is_configuration());
}
