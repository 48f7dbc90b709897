mod cli;
use cli::*;

fn main() -> Result<(), Box<dyn Error>> {

    let Cli { config, output_dir, n_threads, batch, quiet } = Cli::parse();
    init_tracing();

    let mut progress = Progress::new();

    progress.start(&format!("Reading configuration {}", config.display()));
    let mut config = read_config_file(&config)?;
    if let Some(dir) = output_dir { config.output_dir = dir; }
    progress.done();

    let views = ScanGeometry::from(&config).views;
    let bar = if quiet { ViewBar::hidden() } else { ViewBar::new(views) };

    let batch = (n_threads > 1).then(|| batch.unwrap_or(n_threads));
    let pool = rayon::ThreadPoolBuilder::new().num_threads(n_threads).build()?;

    progress.startln(&format!("Projecting {} views", group_digits(views)));
    let path = pool.install(|| make_system_matrix(&config, batch, &bar))?;
    progress.done_with_message(&format!("Wrote {}", path.display()));
    Ok(())
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::error::Error;

use clap::Parser;

use ffsmat::{
    config::read_config_file,
    make_system_matrix,
    progress::ViewBar,
    utils::{group_digits, init_tracing, timing::Progress},
    ScanGeometry,
};
