use std::sync::Arc;

use playground::ErrorOverlay;
use winit::window::Window;

/// Longest diagnostic excerpt shown in the title bar.
const TITLE_EXCERPT_CHARS: usize = 120;

/// Shows compile diagnostics in the window title and the log.
///
/// The title only carries the first meaningful line; the full diagnostic goes
/// to `tracing` at error level.
pub struct TitleOverlay {
    window: Arc<Window>,
    base_title: String,
    diagnostic: Option<String>,
}

impl TitleOverlay {
    pub fn new(window: Arc<Window>, base_title: impl Into<String>) -> Self {
        Self {
            window,
            base_title: base_title.into(),
            diagnostic: None,
        }
    }
}

impl ErrorOverlay for TitleOverlay {
    fn show(&mut self, diagnostic: &str) {
        tracing::error!("shader compile error:\n{diagnostic}");
        self.window
            .set_title(&error_title(&self.base_title, diagnostic));
        self.diagnostic = Some(diagnostic.to_string());
    }

    fn hide(&mut self) {
        if self.diagnostic.take().is_some() {
            self.window.set_title(&self.base_title);
        }
    }

    fn is_visible(&self) -> bool {
        self.diagnostic.is_some()
    }
}

pub(crate) fn error_title(base: &str, diagnostic: &str) -> String {
    let headline = diagnostic
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("shader failed to compile");
    let mut excerpt: String = headline.chars().take(TITLE_EXCERPT_CHARS).collect();
    if headline.chars().count() > TITLE_EXCERPT_CHARS {
        excerpt.push('…');
    }
    format!("{base} [compile error] {excerpt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_uses_first_non_blank_line() {
        let title = error_title("fragpad", "\n  error: expected ';'\n  ┌─ glsl:20:5\n");
        assert_eq!(title, "fragpad [compile error] error: expected ';'");
    }

    #[test]
    fn long_headlines_are_truncated() {
        let long = "x".repeat(500);
        let title = error_title("fragpad", &long);
        assert!(title.ends_with('…'));
        assert_eq!(
            title.chars().count(),
            "fragpad [compile error] ".len() + TITLE_EXCERPT_CHARS + 1
        );
    }

    #[test]
    fn empty_diagnostic_still_flags_the_error() {
        assert_eq!(
            error_title("pad", ""),
            "pad [compile error] shader failed to compile"
        );
    }
}
