//! Terminal progress over the origins of a batch

use indicatif::{ProgressBar, ProgressStyle};
use walkshed_core::ProgressObserver;

const BAR_TEMPLATE: &str =
    "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}";

/// Progress bar advanced once per finished origin
#[derive(Clone)]
pub struct OriginProgress {
    bar: ProgressBar,
}

impl OriginProgress {
    pub fn new(origins: usize) -> Self {
        let bar = ProgressBar::new(origins as u64);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }

    /// Tracks progress without drawing anything
    pub fn hidden(origins: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(origins as u64);
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for OriginProgress {
    fn origin_done(&self) {
        self.bar.inc(1);
    }
}
