use crate::model::TrendRow;
use crate::runner::{QuestionStatus, RunSummary};
use crate::trends::TREND_METRICS;

const RESET: &str = "\x1b[0m";

fn shorten(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

pub fn print_summary(summary: &RunSummary) {
    eprintln!("\nSuite '{}': {} questions", summary.suite, summary.reports.len());

    for report in &summary.reports {
        let q = shorten(&report.question, 40);
        match &report.status {
            QuestionStatus::Passed => {
                eprintln!("✅ {:<43} ({:.2}s)", q, report.rag_time_sec);
            }
            QuestionStatus::Failed { reason } => {
                eprintln!("❌ {:<43} ({:.2}s)", q, report.rag_time_sec);
                if let Some(reason) = reason {
                    eprintln!("    {}", reason);
                }
            }
            QuestionStatus::Skipped { reason } => {
                eprintln!("⏭️  {:<43} SKIPPED", q);
                eprintln!("    {}", reason);
                continue;
            }
        }
        for (name, outcome) in &report.metrics {
            let mark = if outcome.passed { "✓" } else { "✗" };
            eprintln!("    {} {:<18} {:.2}", mark, name, outcome.score);
            if !outcome.passed {
                eprintln!("      reason: {}", outcome.reason);
            }
        }
    }

    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!(
        "Summary: {} passed, {} failed, {} skipped",
        summary.passed(),
        summary.failed(),
        summary.skipped()
    );
}

/// Aligned trend table on stderr, one row per question, colored by delta
/// direction. This text table is the visualization surface; chart images
/// are out of scope.
pub fn print_trends(rows: &[TrendRow]) {
    if rows.is_empty() {
        eprintln!("no trends yet: need at least two runs per question");
        return;
    }

    eprint!("{:<43}", "Question");
    for (metric, _) in TREND_METRICS {
        eprint!(" {:>14}", format!("{} Δ", metric_label(metric)));
    }
    eprintln!();

    for row in rows {
        eprint!("{:<43}", shorten(&row.question, 40));
        for delta in &row.deltas {
            eprint!(
                " {}{:>14}{}",
                delta.direction.ansi(),
                delta.delta,
                RESET
            );
        }
        eprintln!();
    }
}

fn metric_label(metric: &str) -> &str {
    match metric {
        "rag_time_sec" => "rag time",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_keeps_short_text() {
        assert_eq!(shorten("hi", 40), "hi");
    }

    #[test]
    fn shorten_truncates_with_ellipsis() {
        let long = "a question that keeps going well past the column width";
        let short = shorten(long, 20);
        assert!(short.ends_with("..."));
        assert!(short.chars().count() <= 20);
    }
}
