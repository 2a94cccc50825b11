//! Live console output.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::observability::level::Severity;

/// Level name wrapped in its ANSI colour.
///
/// DEBUG cyan, INFO green, WARNING yellow, ERROR red, CRITICAL magenta.
pub fn colored_level(level: Severity) -> String {
    let name = level.name();
    match level {
        Severity::Debug => name.cyan().to_string(),
        Severity::Info => name.green().to_string(),
        Severity::Warning => name.yellow().to_string(),
        Severity::Error => name.red().to_string(),
        Severity::Critical => name.magenta().to_string(),
    }
}

/// Writes formatted lines to a stream, stdout by default.
pub struct ConsoleSink {
    colored: bool,
    out: Box<dyn Write + Send>,
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("colored", &self.colored)
            .finish_non_exhaustive()
    }
}

impl ConsoleSink {
    pub fn stdout(colored: bool) -> Self {
        Self::with_writer(colored, Box::new(io::stdout()))
    }

    pub fn with_writer(colored: bool, out: Box<dyn Write + Send>) -> Self {
        Self { colored, out }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// Level name as this sink displays it.
    pub fn level_name(&self, level: Severity) -> String {
        if self.colored {
            colored_level(level)
        } else {
            level.name().to_string()
        }
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}
