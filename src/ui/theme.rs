//! Visual theme and styling.

use console::Style;

/// Terminal theme.
#[derive(Debug, Clone)]
pub struct FimsTheme {
    /// Success messages (green).
    pub success: Style,
    /// Warnings (orange).
    pub warning: Style,
    /// Errors (red bold).
    pub error: Style,
    /// Secondary text.
    pub dim: Style,
    /// Form and step titles (cyan bold).
    pub header: Style,
    /// Field labels in summaries (bold).
    pub key: Style,
    /// Field values in summaries.
    pub value: Style,
    /// Status badges.
    pub draft: Style,
    pub submitted: Style,
}

impl Default for FimsTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl FimsTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            key: Style::new().bold(),
            value: Style::new(),
            draft: Style::new().yellow(),
            submitted: Style::new().green(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            key: Style::new(),
            value: Style::new(),
            draft: Style::new(),
            submitted: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("▌{}", title)))
    }

    /// A `label: value` summary line.
    pub fn format_field(&self, label: &str, value: &str) -> String {
        let value = if value.is_empty() { "-" } else { value };
        format!("  {} {}", self.key.apply_to(format!("{}:", label)), self.value.apply_to(value))
    }

    /// A status badge, colored by status name.
    pub fn format_status(&self, status: &str) -> String {
        let style = if status == "submitted" {
            &self.submitted
        } else {
            &self.draft
        };
        format!("{}", style.apply_to(status))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_formats_messages() {
        let theme = FimsTheme::plain();
        assert_eq!(theme.format_success("Saved"), "✓ Saved");
        assert_eq!(theme.format_warning("Careful"), "⚠ Careful");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
        assert_eq!(theme.format_header("Photos"), "▌Photos");
    }

    #[test]
    fn empty_field_values_show_a_dash() {
        let theme = FimsTheme::plain();
        assert_eq!(theme.format_field("Address", ""), "  Address: -");
        assert_eq!(theme.format_field("Score", "19"), "  Score: 19");
    }

    #[test]
    fn status_badge_keeps_text() {
        let theme = FimsTheme::new();
        assert!(theme.format_status("draft").contains("draft"));
    }
}
