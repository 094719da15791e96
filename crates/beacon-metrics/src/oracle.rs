use async_trait::async_trait;
use beacon_core::model::EvalCase;
use serde::Deserialize;
use std::collections::HashMap;

/// Raw judgement returned by the scoring oracle for one metric.
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeVerdict {
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}

/// Opaque scoring oracle: given a metric's rubric and a case, produce a
/// score in [0,1] and an explanation. One call per metric kind.
#[async_trait]
pub trait JudgeOracle: Send + Sync {
    async fn judge(
        &self,
        metric: &str,
        rubric: &str,
        case: &EvalCase,
    ) -> anyhow::Result<JudgeVerdict>;
}

/// Deterministic oracle for tests and dry runs: fixed score per metric
/// name with a fallback default.
pub struct FakeOracle {
    pub scores: HashMap<String, f64>,
    pub default_score: f64,
}

impl FakeOracle {
    pub fn uniform(score: f64) -> Self {
        Self {
            scores: HashMap::new(),
            default_score: score,
        }
    }

    /// Scores that pass every default threshold: high for
    /// higher-is-better metrics, zero for bias and hallucination.
    pub fn passing() -> Self {
        let mut scores = HashMap::new();
        scores.insert("bias".to_string(), 0.0);
        scores.insert("hallucination".to_string(), 0.0);
        scores.insert("glitch_detection".to_string(), 0.0);
        Self {
            scores,
            default_score: 0.9,
        }
    }

    pub fn with_score(mut self, metric: &str, score: f64) -> Self {
        self.scores.insert(metric.to_string(), score);
        self
    }
}

#[async_trait]
impl JudgeOracle for FakeOracle {
    async fn judge(
        &self,
        metric: &str,
        _rubric: &str,
        _case: &EvalCase,
    ) -> anyhow::Result<JudgeVerdict> {
        let score = self.scores.get(metric).copied().unwrap_or(self.default_score);
        Ok(JudgeVerdict {
            score,
            reason: format!("fake judgement for {}", metric),
        })
    }
}
