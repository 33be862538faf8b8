//! Text rendering of suite and lint outcomes.
//!
//! Everything here writes to a caller-supplied stream so the layout is
//! testable without capturing process stdout.

use mcpvet_core::capability::CapabilitySnapshot;
use mcpvet_core::report::{LintReport, Severity, SuiteReport};
use std::io::{self, Write};
use std::time::Duration;

const RULE: &str = "============================================================";

fn seconds(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64()
}

/// Render the scenario-suite report: banner, one block per verdict in run
/// order, summary counts, and the failure list when there is one.
pub fn render_suite(
    out: &mut impl Write,
    target: &str,
    timeout: Duration,
    report: &SuiteReport,
    verbose: bool,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "  MCP Server - Stdio Mode Test Suite")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;
    writeln!(out, "Testing: {target}")?;
    writeln!(out, "Timeout: {}s per test", timeout.as_secs())?;
    writeln!(out)?;

    let total = report.total();
    for (index, verdict) in report.verdicts.iter().enumerate() {
        writeln!(out, "[{}/{total}] {}", index + 1, verdict.name)?;
        let status = if verdict.passed { "PASS" } else { "FAIL" };
        writeln!(
            out,
            "      {status} - {} ({:.2}s)",
            verdict.message,
            seconds(verdict.elapsed)
        )?;
        if verbose {
            if let Some(response) = &verdict.response {
                let raw = serde_json::to_string(response).unwrap_or_default();
                writeln!(out, "      Response: {}", truncate(&raw, 200))?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "{RULE}")?;
    writeln!(out, "  Test Results")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;
    writeln!(out, "Total tests:  {total}")?;
    writeln!(out, "Passed:       {}", report.passed())?;
    writeln!(out, "Failed:       {}", total - report.passed())?;
    writeln!(out)?;
    writeln!(out, "Total time:   {:.2}s", seconds(report.total_elapsed()))?;
    writeln!(out)?;

    if report.all_passed() {
        writeln!(out, "All tests passed.")?;
    } else {
        writeln!(out, "Some tests failed:")?;
        for verdict in report.failures() {
            writeln!(out, "  - {}: {}", verdict.name, verdict.message)?;
        }
    }
    Ok(())
}

/// Render the schema-lint report: one section per capability list, then the
/// blocking/advisory summary.
pub fn render_lint(
    out: &mut impl Write,
    target: &str,
    snapshot: &CapabilitySnapshot,
    report: &LintReport,
) -> io::Result<()> {
    writeln!(out, "Validating MCP schemas for: {target}")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;

    render_section(out, "tools", snapshot.tools.len(), report, |f| {
        !f.subject.starts_with("Prompt ") && !f.subject.starts_with("Resource ")
    })?;
    render_section(out, "prompts", snapshot.prompts.len(), report, |f| {
        f.subject.starts_with("Prompt ")
    })?;
    render_section(out, "resources", snapshot.resources.len(), report, |f| {
        f.subject.starts_with("Resource ")
    })?;

    writeln!(out, "{RULE}")?;
    let blocking = report.blocking_count();
    let advisory = report.advisory_count();
    if blocking > 0 {
        writeln!(out, "Found {blocking} blocking issue(s), {advisory} advisory")?;
        writeln!(out)?;
        writeln!(
            out,
            "Blocking issues are expected to make the client disable this server."
        )?;
    } else if advisory > 0 {
        writeln!(out, "Found {advisory} advisory issue(s), nothing blocking")?;
    } else {
        writeln!(out, "All schemas are valid.")?;
    }
    Ok(())
}

fn render_section(
    out: &mut impl Write,
    what: &str,
    count: usize,
    report: &LintReport,
    belongs: impl Fn(&mcpvet_core::report::Finding) -> bool,
) -> io::Result<()> {
    writeln!(out, "Validating {count} {what}...")?;
    let mut clean = true;
    for finding in report.findings.iter().filter(|f| belongs(f)) {
        clean = false;
        let tag = match finding.severity {
            Severity::Blocking => "blocking",
            Severity::Advisory => "advisory",
        };
        writeln!(out, "  [{tag}] {}: {}", finding.location(), finding.message)?;
    }
    if clean {
        writeln!(out, "  All {what} valid")?;
    }
    writeln!(out)?;
    Ok(())
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpvet_core::report::{Finding, Verdict};

    fn sample_suite() -> SuiteReport {
        SuiteReport {
            verdicts: vec![
                Verdict::pass(
                    "MCP Initialize",
                    "Protocol version: 2024-11-05",
                    Duration::from_millis(520),
                    None,
                ),
                Verdict::fail(
                    "List Tools",
                    "No response to tools/list",
                    Duration::from_millis(300),
                    None,
                ),
            ],
        }
    }

    #[test]
    fn suite_rendering_includes_counts_and_failures() {
        let mut out = Vec::new();
        render_suite(
            &mut out,
            "hgnc-mcp:latest",
            Duration::from_secs(30),
            &sample_suite(),
            false,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Testing: hgnc-mcp:latest"));
        assert!(text.contains("[1/2] MCP Initialize"));
        assert!(text.contains("PASS - Protocol version: 2024-11-05"));
        assert!(text.contains("Passed:       1"));
        assert!(text.contains("Failed:       1"));
        assert!(text.contains("  - List Tools: No response to tools/list"));
    }

    #[test]
    fn lint_rendering_sections_findings_by_list() {
        let snapshot = CapabilitySnapshot::default();
        let report = LintReport {
            findings: vec![
                Finding::advisory("normalize", "'default' is an empty array").at("symbols"),
                Finding::blocking("Resource hgnc://info", "required field is missing")
                    .at("mimeType"),
            ],
        };
        let mut out = Vec::new();
        render_lint(&mut out, "hgnc-mcp:latest", &snapshot, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[advisory] normalize.symbols"));
        assert!(text.contains("[blocking] Resource hgnc://info.mimeType"));
        assert!(text.contains("Found 1 blocking issue(s), 1 advisory"));
        // The tools section lists the tool finding, not the resource one.
        let tools_section = text.split("Validating 0 prompts").next().unwrap();
        assert!(!tools_section.contains("mimeType"));
    }

    #[test]
    fn clean_lint_says_so() {
        let mut out = Vec::new();
        render_lint(
            &mut out,
            "img",
            &CapabilitySnapshot::default(),
            &LintReport::default(),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("All schemas are valid."));
        assert!(text.contains("All tools valid"));
    }
}
