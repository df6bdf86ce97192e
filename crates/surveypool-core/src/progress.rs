//! Progress reporting for TTY and non-TTY environments.
//!
//! TTY mode: one indicatif status line per country plus a summary spinner.
//! Non-TTY mode: hidden bars; log lines are the only progress indicator.

use std::io::IsTerminal;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

fn country_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:<8} {wide_msg:.dim}")
        .expect("invalid template")
}

/// Central progress context managing multi-progress bars.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressContext {
    /// Create new context, detecting TTY automatically.
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty: std::io::stderr().is_terminal(),
        }
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }

    /// Status line for one country's processing pass.
    ///
    /// Update with `pb.set_message(...)`, stop with `pb.finish_with_message(...)`.
    /// Hidden (no-op) when stderr is not a terminal.
    pub fn country_line(&self, code: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(country_style());
        pb.set_prefix(code.to_string());
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_bar_when_not_tty() {
        let ctx = ProgressContext {
            multi: MultiProgress::new(),
            is_tty: false,
        };
        let pb = ctx.country_line("IN");
        assert!(pb.is_hidden());
    }
}
