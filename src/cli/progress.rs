//! Pending-state spinner for the terminal surface
//!
//! Shown while the dataset loads and while a route request is in flight.
//! indicatif hides it automatically when stderr is not a terminal.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a spinner for CLI display
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Spinner around one pending operation
pub struct Spinner {
    pub pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        Self {
            pb: create_spinner(message),
        }
    }

    /// Stop the spinner and erase it
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner_template() {
        let pb = create_spinner("Routing");
        assert_eq!(pb.message(), "Routing");
        pb.finish_and_clear();
        assert!(pb.is_finished());
    }

    #[test]
    fn test_spinner_clear() {
        let spinner = Spinner::new("Loading cells");
        spinner.clear();
        assert!(spinner.pb.is_finished());
    }
}
