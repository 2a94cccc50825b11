//! Severity levels.

/// Ordered severity: `Debug < Info < Warning < Error < Critical`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug = 10,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Resolve a configured level name, case-insensitively.
    ///
    /// Unrecognized names fall back to [`Severity::Info`].
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or(Severity::Info)
    }

    /// Exact resolution; `None` for unrecognized names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEBUG" | "TRACE" => Some(Severity::Debug),
            "INFO" => Some(Severity::Info),
            "WARNING" | "WARN" => Some(Severity::Warning),
            "ERROR" => Some(Severity::Error),
            "CRITICAL" | "FATAL" => Some(Severity::Critical),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl From<u8> for Severity {
    fn from(val: u8) -> Self {
        match val {
            10 => Severity::Debug,
            30 => Severity::Warning,
            40 => Severity::Error,
            50 => Severity::Critical,
            _ => Severity::Info,
        }
    }
}

impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Severity::from_name("debug"), Severity::Debug);
        assert_eq!(Severity::from_name("WARN"), Severity::Warning);
        assert_eq!(Severity::from_name(" Critical "), Severity::Critical);
        assert_eq!(Severity::from_name("verbose"), Severity::Info);
        assert_eq!(Severity::parse("verbose"), None);
    }

    #[test]
    fn test_u8_round_trip() {
        for severity in Severity::ALL {
            assert_eq!(Severity::from(severity as u8), severity);
        }
    }
}
