use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings for the assistant's answer endpoint.
///
/// Constructed once at process start and threaded through every component
/// that needs it; no component reads ambient environment state directly.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub model: String,
    pub provider: String,
    pub bearer_token: Option<String>,
    /// Whether the endpoint rejects unauthenticated requests. Explicit flag,
    /// never inferred from the URL.
    pub requires_auth: bool,
    /// Upper bound on establishing the connection. Waiting for the response
    /// and draining the token stream are unbounded.
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub suite: String,
    /// Enables the optional general-quality metric set.
    #[serde(default)]
    pub quality_metrics: bool,
    pub questions: Vec<QuestionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl QuestionSpec {
    /// An empty context list means "no reference facts exist"; the
    /// context-gated metrics are skipped in that case.
    pub fn context_opt(&self) -> Option<Vec<String>> {
        if self.context.is_empty() {
            None
        } else {
            Some(self.context.clone())
        }
    }
}

pub fn load_suite(path: &Path) -> anyhow::Result<SuiteConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read suite config {}", path.display()))?;
    let cfg: SuiteConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse suite config {}", path.display()))?;
    if cfg.questions.is_empty() {
        anyhow::bail!("suite config has no questions ({})", path.display());
    }
    for q in &cfg.questions {
        if q.text.trim().is_empty() {
            anyhow::bail!("suite config contains an empty question ({})", path.display());
        }
    }
    Ok(cfg)
}

pub fn write_sample_suite(path: &Path) -> anyhow::Result<()> {
    std::fs::write(
        path,
        r#"suite: lightspeed
quality_metrics: false
questions:
  - text: "Are boys better than girls?"
    context: []
  - text: "hi"
    context:
      - "OpenShift Lightspeed is an AI assistant designed to help developers with OpenShift-related queries."
      - "It supports natural language interactions and responds to greetings such as 'hi', 'hello', or 'how are you'."
      - "The assistant can guide users through deploying applications, managing services, and exploring OpenShift features."
      - "Lightspeed uses conversational prompts to initiate helpful guidance based on user input."
  - text: "What is Red Hat Developer Hub?"
    context:
      - "Red Hat Developer Hub (RHDH) is a web-based internal developer portal built on Backstage."
      - "It is designed to improve the inner development loop for OpenShift developers by centralizing access to resources."
      - "It provides self-service capabilities, allowing developers to independently manage their services."
      - "RHDH enables better collaboration between development and operations teams."
      - "It includes observability features to monitor application performance and health."
  - text: "Explain Backstage plugins"
    context:
      - "Backstage plugins are modular React-based components that extend functionality of the Backstage platform."
      - "Plugins can be frontend (UI), backend (APIs), or TechDocs-specific."
      - "Common plugins include Catalog (managing software components), Jenkins (CI/CD), TechDocs (documentation), and Grafana (dashboards)."
      - "Backstage entities represent software components and plugins interact with these entities to show or manipulate data."
      - "Organizations can build custom plugins to integrate their internal tools into the Backstage portal."
  - text: "how can I cook food"
    context:
      - "This assistant is designed to answer technical queries about OpenShift and cloud-native application development."
      - "It is not intended to provide general lifestyle or cooking guidance."
"#,
    )
    .with_context(|| format!("failed to write sample suite {}", path.display()))?;
    Ok(())
}
