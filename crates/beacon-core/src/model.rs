use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One decoded `data:`-framed line of the answer stream.
///
/// Lines carrying an unknown `event` value fail to decode and are skipped by
/// the collector; they never abort the stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StreamEvent {
    Token { data: TokenData },
    End,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenData {
    pub token: String,
}

/// Why a collection produced no answer. The two variants are handled
/// differently downstream: a missing credential fails the question, while a
/// transport problem only skips its scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerFailure {
    /// The endpoint requires authentication and no credential is configured.
    MissingCredential(String),
    /// Connection error, timeout, non-2xx status, or interrupted stream.
    Transport(String),
}

impl AnswerFailure {
    pub fn message(&self) -> &str {
        match self {
            AnswerFailure::MissingCredential(m) | AnswerFailure::Transport(m) => m,
        }
    }
}

/// Outcome of one streamed answer collection.
///
/// `elapsed_sec == 0.0` is the persisted "request failed" sentinel; callers
/// branch on `failure` rather than the sentinel to tell a failed request from
/// a (theoretical) instantaneous one.
#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub text: String,
    pub elapsed_sec: f64,
    pub failure: Option<AnswerFailure>,
}

impl RagAnswer {
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            text: message.clone(),
            elapsed_sec: 0.0,
            failure: Some(AnswerFailure::Transport(message)),
        }
    }

    pub fn missing_credential(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            text: message.clone(),
            elapsed_sec: 0.0,
            failure: Some(AnswerFailure::MissingCredential(message)),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// One row per (question, run) in the append-only history log.
///
/// `faithfulness`/`hallucination` are `None` when the question carried no
/// reference context. `timestamp` is assigned by the store at append time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub question: String,
    pub relevancy: f64,
    pub bias: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faithfulness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hallucination: Option<f64>,
    pub rag_time_sec: f64,
    pub duration_sec: f64,
    #[serde(default)]
    pub timestamp: String,
    /// Optional general-quality scores, keyed by metric name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Improvement,
    Regression,
    Neutral,
}

impl Direction {
    /// Flips the sign classification for metrics where lower is better.
    pub fn invert(self) -> Self {
        match self {
            Direction::Improvement => Direction::Regression,
            Direction::Regression => Direction::Improvement,
            Direction::Neutral => Direction::Neutral,
        }
    }

    pub fn ansi(self) -> &'static str {
        match self {
            Direction::Improvement => "\x1b[32m",
            Direction::Regression => "\x1b[31m",
            Direction::Neutral => "\x1b[90m",
        }
    }
}

/// Per-question trend summary, derived fresh on every read of the history.
#[derive(Debug, Clone, Serialize)]
pub struct TrendRow {
    pub question: String,
    pub deltas: Vec<MetricDelta>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricDelta {
    pub metric: &'static str,
    pub delta: String,
    pub direction: Direction,
}

/// Uniform result of every evaluator.
#[derive(Debug, Clone, Serialize)]
pub struct MetricOutcome {
    pub score: f64,
    pub reason: String,
    pub passed: bool,
}

/// Input handed to the scoring oracle for one question.
#[derive(Debug, Clone)]
pub struct EvalCase {
    pub input: String,
    pub actual_output: String,
    pub context: Option<Vec<String>>,
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_event_decodes_token_and_end() {
        let ev: StreamEvent =
            serde_json::from_str(r#"{"event":"token","data":{"token":"Hi"}}"#).unwrap();
        match ev {
            StreamEvent::Token { data } => assert_eq!(data.token, "Hi"),
            StreamEvent::End => panic!("expected token event"),
        }

        let ev: StreamEvent = serde_json::from_str(r#"{"event":"end"}"#).unwrap();
        assert!(matches!(ev, StreamEvent::End));
    }

    #[test]
    fn stream_event_rejects_unknown_kind() {
        assert!(serde_json::from_str::<StreamEvent>(r#"{"event":"heartbeat"}"#).is_err());
    }

    #[test]
    fn record_roundtrips_with_absent_metrics() {
        let rec = EvaluationRecord {
            question: "hi".into(),
            relevancy: 0.9,
            bias: 0.1,
            faithfulness: None,
            hallucination: None,
            rag_time_sec: 1.25,
            duration_sec: 4.5,
            timestamp: "2025-01-01T00:00:00+00:00".into(),
            extras: BTreeMap::new(),
        };
        let line = serde_json::to_string(&rec).unwrap();
        assert!(!line.contains("faithfulness"));
        let back: EvaluationRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn failed_answer_carries_sentinel() {
        let a = RagAnswer::failed("connection refused");
        assert!(a.is_failure());
        assert_eq!(a.elapsed_sec, 0.0);
        assert_eq!(a.text, "connection refused");
        assert!(matches!(a.failure, Some(AnswerFailure::Transport(_))));
    }

    #[test]
    fn credential_failure_is_distinct_from_transport() {
        let a = RagAnswer::missing_credential("no bearer token");
        assert!(a.is_failure());
        match a.failure {
            Some(AnswerFailure::MissingCredential(m)) => assert_eq!(m, "no bearer token"),
            other => panic!("unexpected failure kind: {:?}", other),
        }
    }
}
