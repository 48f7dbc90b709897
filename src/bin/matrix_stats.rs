/// Summarize a `matrix.bin` file and check that it is well formed
#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "matrix_stats", about = "Report statistics of a system matrix file")]
pub struct Cli {

    /// The matrix file to inspect
    pub matrix: PathBuf,

    /// Number of voxels along x and y (the file has one column per voxel)
    #[clap(long, num_args = 2, value_names = ["NX", "NY"], required = true)]
    pub voxels: Vec<usize>,

    /// Total number of rays, to check that every ray index is in range
    #[clap(long)]
    pub rays: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {

    let Cli { matrix, voxels, rays } = Cli::parse();
    init_tracing();

    let n_columns: usize = voxels.iter().product();
    let mut progress = Progress::new();

    progress.start(&format!("Reading {} columns from {}", group_digits(n_columns), matrix.display()));
    let columns = read_columns(&matrix, n_columns)?;
    progress.done();

    let stats = MatrixStats::of_columns(&columns, rays);
    println!("{stats}");
    if !stats.is_consistent() {
        return Err(format!("{} is not a valid system matrix", matrix.display()).into());
    }
    Ok(())
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use ffsmat::{
    io::matrix::read_columns,
    stats::MatrixStats,
    utils::{group_digits, init_tracing, timing::Progress},
};
