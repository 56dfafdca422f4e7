//! Diagnostic console - the log sink for ancestor chains and style dumps
//!
//! Lines are kept so a host can display or inspect them, and mirrored to
//! `tracing` under the `domkit::console` target.

#[derive(Debug, Clone, Default)]
pub struct Console {
    lines: Vec<String>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::info!(target: "domkit::console", "{}", line);
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        tracing::debug!(target: "domkit::console", "cleared {} lines", self.lines.len());
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
