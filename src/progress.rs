//! Reporting progress through the views of a scan.
//!
//! The generators only ever talk to a `ViewProgress`; whether anything is
//! displayed has no influence on the matrix that is produced.

use indicatif::{ProgressBar, ProgressStyle};

pub trait ViewProgress: Sync {
    /// `current` views out of `total` have been projected
    fn update(&self, current: usize, total: usize);
    fn finish(&self) {}
}

/// Reports nothing
pub struct NoProgress;

impl ViewProgress for NoProgress {
    fn update(&self, _current: usize, _total: usize) {}
}

/// Console progress bar over views
pub struct ViewBar(ProgressBar);

impl ViewBar {

    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(ProgressStyle::default_bar()
                      .template("Projecting views\n[{elapsed_precise}] {wide_bar} {pos}/{len} ({eta_precise})")
                      .unwrap_or_else(|_| ProgressStyle::default_bar())
        );
        bar.tick();
        Self(bar)
    }

    /// A bar which is never drawn, for when stdout is not wanted
    pub fn hidden() -> Self { Self(ProgressBar::hidden()) }
}

impl ViewProgress for ViewBar {

    fn update(&self, current: usize, total: usize) {
        self.0.set_length(total as u64);
        self.0.set_position(current as u64);
    }

    fn finish(&self) { self.0.finish(); }
}
