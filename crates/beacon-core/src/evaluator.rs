use crate::model::{EvalCase, MetricOutcome};
use async_trait::async_trait;

/// Uniform interface over the scoring oracle, one implementation per
/// metric kind. The runner iterates a `Vec<Arc<dyn Evaluator>>` generically
/// instead of special-casing metrics by name.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the metric is meaningful only when reference context exists.
    /// Context-gated evaluators are skipped for questions without context
    /// and their score is recorded as absent.
    fn needs_context(&self) -> bool {
        false
    }

    async fn measure(&self, case: &EvalCase) -> anyhow::Result<MetricOutcome>;
}
