//! Colored terminal output for build and watch summaries.

use std::path::Path;

use console::{Style, Term};

/// Terminal output formatter. Everything goes to stderr.
pub(crate) struct Output {
    term: Term,
    green: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a section title (cyan bold).
    pub(crate) fn title(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print `paths` as an indented list, relative to `root` where possible.
    pub(crate) fn paths<'p>(&self, root: &Path, paths: impl IntoIterator<Item = &'p Path>) {
        for path in paths {
            let shown = path.strip_prefix(root).unwrap_or(path).display().to_string();
            let _ = self
                .term
                .write_line(&format!("  {}", self.dim.apply_to(shown)));
        }
    }
}
