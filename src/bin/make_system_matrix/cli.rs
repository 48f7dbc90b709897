/// Command line interface for `make_system_matrix` executable
#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "make_system_matrix", about = "Generate the CT system matrix for a flying focal spot scan")]
pub struct Cli {

    /// TOML file describing scanner, detector, voxel grid, trajectory and FFS mode
    pub config: PathBuf,

    /// Directory in which to write `matrix.bin`, overriding `output_dir` in the config
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of rayon threads. With 1, views are projected sequentially
    #[clap(short = 'j', long, default_value = "1")]
    pub n_threads: usize,

    /// Number of views to project concurrently between merges [default: n_threads]
    #[clap(long)]
    pub batch: Option<usize>,

    /// Do not display a progress bar
    #[clap(short, long)]
    pub quiet: bool,
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::path::PathBuf;
