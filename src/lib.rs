mod exports;
pub use exports::*;

pub mod config;
pub mod error;
pub mod ffs;
pub mod index;
pub mod io;
pub mod penalty;
pub mod progress;
pub mod projector;
pub mod ray;
pub mod scan;
pub mod stats;
pub mod system_matrix;
pub mod utils;
pub mod view;
