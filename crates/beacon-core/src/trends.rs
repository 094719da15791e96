use crate::model::{Direction, EvaluationRecord, MetricDelta, TrendRow};
use std::collections::HashMap;

/// How many trailing records per question feed the trend computation.
pub const TREND_WINDOW: usize = 3;

/// Metric columns in display order. The bool marks metrics where lower is
/// better, which flips the delta classification.
pub const TREND_METRICS: [(&str, bool); 5] = [
    ("relevancy", false),
    ("bias", false),
    ("faithfulness", false),
    ("hallucination", false),
    ("rag_time_sec", true),
];

/// Percent change between two runs of one metric, with the raw sign rule:
/// positive is Improvement, negative Regression. Callers invert the
/// direction for lower-is-better metrics.
pub fn format_percent_change(current: f64, previous: f64) -> (String, Direction) {
    if previous == 0.0 {
        return ("N/A".to_string(), Direction::Neutral);
    }
    let delta = ((current - previous) / previous) * 100.0;
    let direction = if delta > 0.0 {
        Direction::Improvement
    } else if delta < 0.0 {
        Direction::Regression
    } else {
        Direction::Neutral
    };
    let symbol = if delta > 0.0 { "+" } else { "" };
    (format!("{}{:.1}%", symbol, delta), direction)
}

/// Absent optional metrics count as zero on both sides of the delta.
fn metric_value(record: &EvaluationRecord, metric: &str) -> f64 {
    match metric {
        "relevancy" => record.relevancy,
        "bias" => record.bias,
        "faithfulness" => record.faithfulness.unwrap_or(0.0),
        "hallucination" => record.hallucination.unwrap_or(0.0),
        "rag_time_sec" => record.rag_time_sec,
        _ => 0.0,
    }
}

/// Groups records by question (preserving first-seen order), takes the
/// last `TREND_WINDOW` entries per group and compares the most recent two.
/// Questions with a single data point emit no row.
pub fn compute_trends(records: &[EvaluationRecord]) -> Vec<TrendRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&EvaluationRecord>> = HashMap::new();
    for r in records {
        let entry = groups.entry(r.question.as_str()).or_default();
        if entry.is_empty() {
            order.push(r.question.as_str());
        }
        entry.push(r);
    }

    let mut rows = Vec::new();
    for question in order {
        let group = &groups[question];
        let tail = &group[group.len().saturating_sub(TREND_WINDOW)..];
        if tail.len() < 2 {
            continue;
        }
        let latest = tail[tail.len() - 1];
        let previous = tail[tail.len() - 2];

        let deltas = TREND_METRICS
            .iter()
            .map(|&(metric, lower_is_better)| {
                let (delta, mut direction) =
                    format_percent_change(metric_value(latest, metric), metric_value(previous, metric));
                if lower_is_better {
                    direction = direction.invert();
                }
                MetricDelta {
                    metric,
                    delta,
                    direction,
                }
            })
            .collect();

        rows.push(TrendRow {
            question: question.to_string(),
            deltas,
        });
    }
    rows
}
