use std::collections::VecDeque;

use geoscreen_location::Coordinate;

/// Text shown when the provider has no cached fix.
pub const MISSING_COORDINATE: &str = "null, null";

/// Scrollable coordinate log, newest line first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLog {
    lines: VecDeque<String>,
}

impl DisplayLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a line for `coordinate`.
    pub fn push_coordinate(&mut self, coordinate: Coordinate) {
        self.push_line(coordinate.to_string());
    }

    /// Prepend the missing-fix line.
    pub fn push_missing(&mut self) {
        self.push_line(MISSING_COORDINATE);
    }

    fn push_line(&mut self, text: impl Into<String>) {
        let mut line = text.into();
        line.push('\n');
        self.lines.push_front(line);
    }

    /// The most recent line, without its terminator.
    #[must_use]
    pub fn newest(&self) -> Option<&str> {
        self.lines.front().map(|line| line.trim_end_matches('\n'))
    }

    /// Lines from newest to oldest, without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.trim_end_matches('\n'))
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The whole log as displayed.
    #[must_use]
    pub fn render(&self) -> String {
        self.lines.iter().map(String::as_str).collect()
    }
}
