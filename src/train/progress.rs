//! Progress display for the epoch loop
//!
//! Purely cosmetic: the selected mode never changes which batches run or
//! the losses they produce.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TERMINAL_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";
const NOTEBOOK_TEMPLATE: &str = "{pos}/{len} [{elapsed_precise}<{eta}] {msg}";

/// How batch progress is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Nothing is drawn
    #[default]
    Hidden,
    /// Animated bar on stderr
    Terminal,
    /// Plain text lines on stdout, redrawn at most once per second
    Notebook,
}

impl ProgressMode {
    /// Mode selected by the epoch flags; `notebook` only matters when the bar is enabled
    pub fn from_flags(progress_bar: bool, notebook: bool) -> Self {
        match (progress_bar, notebook) {
            (false, _) => Self::Hidden,
            (true, false) => Self::Terminal,
            (true, true) => Self::Notebook,
        }
    }

    /// Build a bar over `len` batches
    pub fn bar(self, len: u64) -> ProgressBar {
        match self {
            Self::Hidden => ProgressBar::hidden(),
            Self::Terminal => {
                let bar = ProgressBar::new(len);
                bar.set_style(style(TERMINAL_TEMPLATE).progress_chars("#>-"));
                bar
            }
            Self::Notebook => {
                let target = ProgressDrawTarget::stdout_with_hz(1);
                let bar = ProgressBar::with_draw_target(Some(len), target);
                bar.set_style(style(NOTEBOOK_TEMPLATE));
                bar
            }
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(ProgressMode::from_flags(false, false), ProgressMode::Hidden);
        assert_eq!(ProgressMode::from_flags(false, true), ProgressMode::Hidden);
        assert_eq!(
            ProgressMode::from_flags(true, false),
            ProgressMode::Terminal
        );
        assert_eq!(
            ProgressMode::from_flags(true, true),
            ProgressMode::Notebook
        );
    }

    #[test]
    fn test_hidden_bar() {
        let bar = ProgressMode::Hidden.bar(10);
        assert!(bar.is_hidden());
        bar.inc(3);
        assert_eq!(bar.position(), 3);
    }

    #[test]
    fn test_bars_track_length() {
        for mode in [ProgressMode::Terminal, ProgressMode::Notebook] {
            let bar = mode.bar(7);
            assert_eq!(bar.length(), Some(7));
            bar.finish_and_clear();
        }
    }

    #[test]
    fn test_templates_parse() {
        for template in [TERMINAL_TEMPLATE, NOTEBOOK_TEMPLATE] {
            assert!(ProgressStyle::default_bar().template(template).is_ok());
        }
    }
}
