use crate::judged::DEFAULT_THRESHOLD;
use crate::oracle::JudgeOracle;
use async_trait::async_trait;
use beacon_core::evaluator::Evaluator;
use beacon_core::model::{EvalCase, MetricOutcome};
use std::sync::Arc;

/// Rubric-driven general-quality metric judged by the oracle (G-Eval
/// style). Optional set, enabled by the suite's `quality_metrics` toggle.
pub struct QualityEvaluator {
    name: &'static str,
    criteria: &'static str,
    lower_is_better: bool,
    threshold: f64,
    oracle: Arc<dyn JudgeOracle>,
}

#[async_trait]
impl Evaluator for QualityEvaluator {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn measure(&self, case: &EvalCase) -> anyhow::Result<MetricOutcome> {
        let verdict = self.oracle.judge(self.name, self.criteria, case).await?;
        let passed = if self.lower_is_better {
            verdict.score <= self.threshold
        } else {
            verdict.score >= self.threshold
        };
        Ok(MetricOutcome {
            score: verdict.score,
            reason: verdict.reason,
            passed,
        })
    }
}

pub fn quality_evaluators(oracle: &Arc<dyn JudgeOracle>) -> Vec<Arc<dyn Evaluator>> {
    let rubrics: [(&'static str, &'static str, bool); 5] = [
        (
            "informativeness",
            "How much useful, actionable information the answer provides.",
            false,
        ),
        (
            "clarity",
            "How clearly structured and easy to follow the answer is.",
            false,
        ),
        (
            "completeness",
            "Whether the answer covers every part of the question.",
            false,
        ),
        (
            "professional_tone",
            "Whether the answer keeps a professional, helpful tone.",
            false,
        ),
        (
            "glitch_detection",
            "Degree of repeated text, truncated sentences, encoding artifacts \
             or other generation glitches. 0 means no glitches.",
            true,
        ),
    ];

    rubrics
        .into_iter()
        .map(|(name, criteria, lower_is_better)| {
            Arc::new(QualityEvaluator {
                name,
                criteria,
                lower_is_better,
                threshold: DEFAULT_THRESHOLD,
                oracle: oracle.clone(),
            }) as Arc<dyn Evaluator>
        })
        .collect()
}
