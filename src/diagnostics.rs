use std::fmt;

use tracing::{info, warn};

/// Severity of a non-fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
}

/// What a diagnostic refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// The loop as a whole.
    Loop,
    /// A vertex index within the loop being processed.
    Vertex(usize),
    /// A ring index (0-based) within a ring stack.
    Ring(usize),
    /// A configured shape, by name.
    Shape(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loop => write!(f, "loop"),
            Self::Vertex(i) => write!(f, "vertex {i}"),
            Self::Ring(i) => write!(f, "ring {}", i + 1),
            Self::Shape(name) => write!(f, "shape '{name}'"),
        }
    }
}

/// A best-effort condition reported alongside a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub subject: Subject,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Diagnostics collected during one operation.
///
/// Every entry is also emitted as a `tracing` event, so callers that install
/// a subscriber see the same stream without inspecting the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<Diagnostic>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an informational diagnostic.
    pub fn info(&mut self, subject: Subject, message: impl Into<String>) {
        let message = message.into();
        info!(%subject, "{message}");
        self.entries.push(Diagnostic {
            level: Level::Info,
            subject,
            message,
        });
    }

    /// Records a warning.
    pub fn warn(&mut self, subject: Subject, message: impl Into<String>) {
        let message = message.into();
        warn!(%subject, "{message}");
        self.entries.push(Diagnostic {
            level: Level::Warning,
            subject,
            message,
        });
    }

    /// Appends all entries of `other`, re-scoping loop-level and vertex-level
    /// entries to `scope` when given.
    pub fn absorb(&mut self, other: Report, scope: Option<&Subject>) {
        for mut d in other.entries {
            if let Some(scope) = scope {
                if matches!(d.subject, Subject::Loop | Subject::Vertex(_)) {
                    d.message = format!("{}: {}", d.subject, d.message);
                    d.subject = scope.clone();
                }
            }
            self.entries.push(d);
        }
    }

    /// All recorded diagnostics in order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Iterates over warnings only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.level == Level::Warning)
    }

    /// Returns `true` if any warning was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
