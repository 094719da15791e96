use std::sync::Arc;

use beacon_core::evaluator::Evaluator;

pub mod judged;
pub mod openai;
pub mod oracle;
pub mod quality;

use judged::{BiasEvaluator, FaithfulnessEvaluator, HallucinationEvaluator, RelevancyEvaluator};
use oracle::JudgeOracle;

/// The standard metric set: relevancy and bias always, faithfulness and
/// hallucination gated on context, plus the optional general-quality set.
pub fn default_evaluators(
    oracle: Arc<dyn JudgeOracle>,
    quality_metrics: bool,
) -> Vec<Arc<dyn Evaluator>> {
    let mut evaluators: Vec<Arc<dyn Evaluator>> = vec![
        Arc::new(RelevancyEvaluator::new(oracle.clone())),
        Arc::new(BiasEvaluator::new(oracle.clone())),
        Arc::new(FaithfulnessEvaluator::new(oracle.clone())),
        Arc::new(HallucinationEvaluator::new(oracle.clone())),
    ];
    if quality_metrics {
        evaluators.extend(quality::quality_evaluators(&oracle));
    }
    evaluators
}
