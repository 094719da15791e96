use crate::collector;
use crate::config::{EndpointConfig, QuestionSpec, SuiteConfig};
use crate::evaluator::Evaluator;
use crate::model::{round2, AnswerFailure, EvalCase, EvaluationRecord, MetricOutcome};
use crate::session::Session;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionStatus {
    Passed,
    /// At least one metric failed, or a required credential was missing.
    /// The optional reason covers non-metric failures.
    Failed { reason: Option<String> },
    /// Transport failure during collection; the question is excluded from
    /// scoring and never counted as a run failure.
    Skipped { reason: String },
}

#[derive(Debug, Clone)]
pub struct QuestionReport {
    pub question: String,
    pub status: QuestionStatus,
    pub rag_time_sec: f64,
    pub metrics: Vec<(String, MetricOutcome)>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub suite: String,
    pub reports: Vec<QuestionReport>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, QuestionStatus::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, QuestionStatus::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, QuestionStatus::Skipped { .. }))
    }

    pub fn any_failed(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&QuestionStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.status)).count()
    }
}

/// Sequential driver: one question is processed end-to-end (collection,
/// scoring, recording) before the next begins. One question's failure
/// never stops the run.
pub struct Runner {
    pub endpoint: EndpointConfig,
    pub evaluators: Vec<Arc<dyn Evaluator>>,
}

impl Runner {
    pub fn new(endpoint: EndpointConfig, evaluators: Vec<Arc<dyn Evaluator>>) -> Self {
        Self {
            endpoint,
            evaluators,
        }
    }

    pub async fn run_suite(
        &self,
        cfg: &SuiteConfig,
        session: &mut Session,
    ) -> RunSummary {
        let mut reports = Vec::with_capacity(cfg.questions.len());
        for question in &cfg.questions {
            reports.push(self.run_question(question, session).await);
        }
        RunSummary {
            suite: cfg.suite.clone(),
            reports,
        }
    }

    async fn run_question(&self, spec: &QuestionSpec, session: &mut Session) -> QuestionReport {
        let started = Instant::now();
        let answer = collector::collect(&spec.text, &self.endpoint).await;

        match answer.failure {
            // an unconfigured credential is an operator error, so the
            // question fails instead of quietly dropping out of the run
            Some(AnswerFailure::MissingCredential(reason)) => {
                return QuestionReport {
                    question: spec.text.clone(),
                    status: QuestionStatus::Failed {
                        reason: Some(reason),
                    },
                    rag_time_sec: 0.0,
                    metrics: Vec::new(),
                };
            }
            Some(AnswerFailure::Transport(reason)) => {
                return QuestionReport {
                    question: spec.text.clone(),
                    status: QuestionStatus::Skipped { reason },
                    rag_time_sec: 0.0,
                    metrics: Vec::new(),
                };
            }
            None => {}
        }
        info!(
            question = %spec.text,
            rag_time_sec = answer.elapsed_sec,
            "collected streamed answer"
        );

        let case = EvalCase {
            input: spec.text.clone(),
            actual_output: answer.text.clone(),
            context: spec.context_opt(),
        };

        let mut metrics: Vec<(String, MetricOutcome)> = Vec::new();
        let mut any_metric_failed = false;
        let mut relevancy = 0.0;
        let mut bias = 0.0;
        let mut faithfulness = None;
        let mut hallucination = None;
        let mut extras = BTreeMap::new();

        for evaluator in &self.evaluators {
            if evaluator.needs_context() && case.context.is_none() {
                continue;
            }
            // each metric is judged independently; one failure does not
            // suppress the next metric's report
            let outcome = match evaluator.measure(&case).await {
                Ok(outcome) => outcome,
                Err(e) => MetricOutcome {
                    score: 0.0,
                    reason: format!("evaluator error: {}", e),
                    passed: false,
                },
            };
            if !outcome.passed {
                any_metric_failed = true;
            }
            match evaluator.name() {
                "relevancy" => relevancy = outcome.score,
                "bias" => bias = outcome.score,
                "faithfulness" => faithfulness = Some(outcome.score),
                "hallucination" => hallucination = Some(outcome.score),
                other => {
                    extras.insert(other.to_string(), outcome.score);
                }
            }
            metrics.push((evaluator.name().to_string(), outcome));
        }

        session.push(EvaluationRecord {
            question: spec.text.clone(),
            relevancy,
            bias,
            faithfulness,
            hallucination,
            rag_time_sec: answer.elapsed_sec,
            duration_sec: round2(started.elapsed().as_secs_f64()),
            timestamp: String::new(),
            extras,
        });

        QuestionReport {
            question: spec.text.clone(),
            status: if any_metric_failed {
                QuestionStatus::Failed { reason: None }
            } else {
                QuestionStatus::Passed
            },
            rag_time_sec: answer.elapsed_sec,
            metrics,
        }
    }
}
