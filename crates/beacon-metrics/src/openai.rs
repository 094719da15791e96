use crate::oracle::{JudgeOracle, JudgeVerdict};
use async_trait::async_trait;
use beacon_core::model::EvalCase;
use serde_json::json;

/// LLM-backed scoring oracle over an OpenAI-style chat completions API.
/// The model is asked for a strict JSON verdict `{"score": .., "reason": ..}`.
pub struct OpenAiOracle {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    client: reqwest::Client,
}

impl OpenAiOracle {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            temperature: 0.0,
            client: reqwest::Client::new(),
        }
    }

    fn build_prompt(metric: &str, rubric: &str, case: &EvalCase) -> String {
        let mut prompt = format!(
            "You are scoring an assistant's answer on the '{}' dimension.\n\
             Rubric: {}\n\n\
             Question: {}\n\
             Answer: {}\n",
            metric, rubric, case.input, case.actual_output
        );
        if let Some(context) = &case.context {
            prompt.push_str("Reference context:\n");
            for fact in context {
                prompt.push_str("- ");
                prompt.push_str(fact);
                prompt.push('\n');
            }
        }
        prompt.push_str(
            "\nRespond with only a JSON object: {\"score\": <float 0..1>, \"reason\": <string>}",
        );
        prompt
    }
}

#[async_trait]
impl JudgeOracle for OpenAiOracle {
    async fn judge(
        &self,
        metric: &str,
        rubric: &str,
        case: &EvalCase,
    ) -> anyhow::Result<JudgeVerdict> {
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": Self::build_prompt(metric, rubric, case),
            }],
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
        });

        let resp = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("judge API error ({}): {}", status, error_text);
        }

        let json: serde_json::Value = resp.json().await?;
        let content = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("judge API response missing content"))?;

        let verdict: JudgeVerdict = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("judge returned malformed verdict: {} ({})", e, content))?;
        anyhow::ensure!(
            (0.0..=1.0).contains(&verdict.score),
            "judge score {} outside [0,1] for metric {}",
            verdict.score,
            metric
        );
        Ok(verdict)
    }
}
