//! Scenario verdicts and schema-lint findings.
//!
//! Both are immutable once produced; the report layer only reads them.

use crate::protocol::Response;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The outcome of one named scenario against one server subprocess.
#[derive(Debug, Clone)]
pub struct Verdict {
    /// Scenario name, e.g. "List Tools" or "Call Tool: find".
    pub name: String,
    /// Whether the pass condition held.
    pub passed: bool,
    /// Human-readable diagnostic.
    pub message: String,
    /// Wall-clock time spent in the session exchange.
    pub elapsed: Duration,
    /// The response the verdict was judged on, if one was recovered.
    pub response: Option<Response>,
}

impl Verdict {
    /// A passing verdict.
    #[must_use]
    pub fn pass(
        name: impl Into<String>,
        message: impl Into<String>,
        elapsed: Duration,
        response: Option<Response>,
    ) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            elapsed,
            response,
        }
    }

    /// A failing verdict.
    #[must_use]
    pub fn fail(
        name: impl Into<String>,
        message: impl Into<String>,
        elapsed: Duration,
        response: Option<Response>,
    ) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            elapsed,
            response,
        }
    }
}

/// Aggregate outcome of a full scenario run.
#[derive(Debug, Default)]
pub struct SuiteReport {
    /// Verdicts in declared scenario order.
    pub verdicts: Vec<Verdict>,
}

impl SuiteReport {
    /// Number of passing scenarios.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.passed).count()
    }

    /// Number of scenarios run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.verdicts.len()
    }

    /// True iff every scenario passed. Drives the process exit status.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.verdicts.iter().all(|v| v.passed)
    }

    /// The failing verdicts, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.passed)
    }

    /// Total wall-clock time across all scenarios.
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.verdicts.iter().map(|v| v.elapsed).sum()
    }
}

/// How badly a schema defect is expected to affect the downstream client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Stylistically undesirable, but not expected to break compatibility.
    Advisory,
    /// Expected to cause the client to reject or disable the server.
    Blocking,
}

/// One schema defect, attributed to a single capability entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Defect severity.
    pub severity: Severity,
    /// The entry the finding is about: a tool/prompt name or a resource uri.
    pub subject: String,
    /// Property path within the entry, when the defect is field-level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Human-readable description of the defect.
    pub message: String,
}

impl Finding {
    /// A blocking finding on an entry.
    #[must_use]
    pub fn blocking(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Blocking,
            subject: subject.into(),
            path: None,
            message: message.into(),
        }
    }

    /// An advisory finding on an entry.
    #[must_use]
    pub fn advisory(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Advisory,
            subject: subject.into(),
            path: None,
            message: message.into(),
        }
    }

    /// Attach a property path to the finding.
    #[must_use]
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// "subject" or "subject.path", for rendering.
    #[must_use]
    pub fn location(&self) -> String {
        match &self.path {
            Some(path) => format!("{}.{}", self.subject, path),
            None => self.subject.clone(),
        }
    }
}

/// Aggregate outcome of a schema-lint run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintReport {
    /// Findings in evaluation order (entries in list order, rules in table order).
    pub findings: Vec<Finding>,
}

impl LintReport {
    /// True iff at least one blocking finding exists. Drives exit status 1.
    #[must_use]
    pub fn has_blocking(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == Severity::Blocking)
    }

    /// Number of blocking findings.
    #[must_use]
    pub fn blocking_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Blocking)
            .count()
    }

    /// Number of advisory findings.
    #[must_use]
    pub fn advisory_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Advisory)
            .count()
    }
}
