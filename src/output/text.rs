//! Human-readable worker summary

use super::format_duration_human;
use crate::dispatcher::{ChunkOutcome, DispatchReport};
use log::{info, warn};

/// Summary lines for one worker
pub fn summary_lines(report: &DispatchReport) -> Vec<String> {
    let stats = &report.stats;
    let mut lines = vec![
        format!(
            "{} on {}: {} of {} chunks assigned",
            report.identity, report.host, stats.assigned, report.total_chunks
        ),
        format!(
            "  Dispatched: {} (succeeded {}, failed {})",
            stats.dispatched, stats.succeeded, stats.failed
        ),
    ];

    if stats.skipped > 0 {
        lines.push(format!("  Skipped malformed: {}", stats.skipped));
    }
    if let Some(ref aborted) = report.aborted {
        lines.push(format!(
            "  Aborted at chunk {} ({:?}): {}",
            aborted.index, aborted.line, aborted.reason
        ));
    }

    let failed: Vec<String> = report
        .records
        .iter()
        .filter_map(|r| match (&r.outcome, &r.start, &r.end) {
            (ChunkOutcome::Ran(status), Some(start), Some(end)) if !status.is_success() => {
                Some(format!("    chunk {} [{} {}]: {}", r.index, start, end, status))
            }
            _ => None,
        })
        .collect();
    if !failed.is_empty() {
        lines.push("  Failed chunks:".to_string());
        lines.extend(failed);
    }

    lines.push(format!("  Elapsed: {}", format_duration_human(report.elapsed)));
    lines
}

/// Log the summary; at warn level when anything went wrong
pub fn log_summary(report: &DispatchReport) {
    let troubled = report.stats.failed > 0 || report.stats.skipped > 0 || report.aborted.is_some();
    for line in summary_lines(report) {
        if troubled {
            warn!("{}", line);
        } else {
            info!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collective::WorkerIdentity;
    use crate::dispatcher::{AbortReason, ChunkRecord, DispatchStats};
    use crate::runner::ToolStatus;
    use chrono::Utc;
    use std::time::Duration;

    fn report() -> DispatchReport {
        DispatchReport {
            identity: WorkerIdentity::new(1, 4).unwrap(),
            host: "node07".to_string(),
            total_chunks: 9,
            started: Utc::now(),
            finished: Utc::now(),
            elapsed: Duration::from_secs(95),
            stats: DispatchStats {
                assigned: 2,
                dispatched: 2,
                succeeded: 1,
                failed: 1,
                skipped: 0,
            },
            records: vec![
                ChunkRecord {
                    index: 1,
                    start: Some("1".to_string()),
                    end: Some("5000000".to_string()),
                    output: None,
                    outcome: ChunkOutcome::Ran(ToolStatus::Success),
                    elapsed: Duration::from_secs(40),
                },
                ChunkRecord {
                    index: 5,
                    start: Some("5000001".to_string()),
                    end: Some("10000000".to_string()),
                    output: None,
                    outcome: ChunkOutcome::Ran(ToolStatus::exit_code(1)),
                    elapsed: Duration::from_secs(55),
                },
            ],
            aborted: None,
        }
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&report());
        assert_eq!(lines[0], "rank 1/4 on node07: 2 of 9 chunks assigned");
        assert_eq!(lines[1], "  Dispatched: 2 (succeeded 1, failed 1)");
        assert!(lines.iter().any(|l| l == "    chunk 5 [5000001 10000000]: exit code 1"));
        assert_eq!(lines.last().unwrap(), "  Elapsed: 1.58m");
    }

    #[test]
    fn test_summary_aborted() {
        let mut report = report();
        report.aborted = Some(AbortReason {
            index: 9,
            line: "x".to_string(),
            reason: "expected 2 whitespace-separated tokens, found 1".to_string(),
        });
        let lines = summary_lines(&report);
        assert!(lines.iter().any(|l| l.starts_with("  Aborted at chunk 9")));
    }
}
