pub mod scanner;

pub use scanner::{Config, read_config_file, parse_config};
