//! Terminal styling for command output

use owo_colors::{OwoColorize, Stream, Style};

/// Success mark
pub const CHECK: &str = "✓";
/// Failure mark
pub const CROSS: &str = "✗";

/// Semantic styles, applied only when the stream supports color
pub trait Stylize: std::fmt::Display + Sized {
    /// Secondary information
    fn muted(&self) -> String {
        self.styled(Style::new().dimmed())
    }

    /// Headings and names
    fn emphasis(&self) -> String {
        self.styled(Style::new().bold())
    }

    /// Values worth spotting (URLs, numbers, branch names)
    fn accent(&self) -> String {
        self.styled(Style::new().cyan())
    }

    /// Completed actions
    fn success(&self) -> String {
        self.styled(Style::new().green())
    }

    /// Failures and blockers
    fn error(&self) -> String {
        self.styled(Style::new().red().bold())
    }

    /// Render with `style` if stdout supports color
    fn styled(&self, style: Style) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.style(style))
            .to_string()
    }
}

impl<T: std::fmt::Display> Stylize for T {}
