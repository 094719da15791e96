use crate::config::EndpointConfig;
use crate::model::{round2, RagAnswer, StreamEvent};
use futures_util::StreamExt;
use std::time::{Duration, Instant};
use tracing::warn;

const DATA_PREFIX: &str = "data: ";

/// Issues the streaming answer request for one question and drains the
/// token stream into a final answer string.
///
/// Every failure mode collapses into the `RagAnswer` failure sentinel; the
/// raw transport error is never propagated to the caller. A missing
/// credential is flagged as its own failure kind so the runner can fail the
/// question instead of skipping it.
pub async fn collect(question: &str, endpoint: &EndpointConfig) -> RagAnswer {
    let start = Instant::now();

    if endpoint.requires_auth && endpoint.bearer_token.is_none() {
        return RagAnswer::missing_credential(
            "no bearer token configured for authenticated endpoint",
        );
    }

    let client = match reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(endpoint.timeout_secs))
        .build()
    {
        Ok(c) => c,
        Err(e) => return RagAnswer::failed(format!("failed to build http client: {}", e)),
    };

    let mut req = client.post(&endpoint.base_url).json(&serde_json::json!({
        "model": endpoint.model,
        "provider": endpoint.provider,
        "query": question,
        "attachments": [],
    }));
    if let Some(token) = &endpoint.bearer_token {
        req = req.header("Authorization", format!("Bearer {}", token));
    }

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "rag request failed");
            return RagAnswer::failed(format!("rag request error: {}", e));
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return RagAnswer::failed(format!(
            "rag request failed with status {}: {}",
            status, body
        ));
    }

    let mut assembler = Assembler::new();
    let mut ended = false;
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "rag stream interrupted");
                return RagAnswer::failed(format!("rag stream error: {}", e));
            }
        };
        if assembler.push(&chunk) {
            ended = true;
            break;
        }
    }
    if !ended {
        assembler.flush();
    }

    RagAnswer {
        text: assembler.into_answer(),
        elapsed_sec: round2(start.elapsed().as_secs_f64()),
        failure: None,
    }
}

/// Incremental line splitter and event decoder for the answer stream.
///
/// Chunk boundaries do not align with lines, so a carry buffer holds any
/// trailing partial line between chunks. The carry stays raw bytes and a
/// line is only decoded once its newline has arrived, so a multi-byte
/// character split across two chunks reassembles intact.
#[derive(Debug, Default)]
pub struct Assembler {
    carry: Vec<u8>,
    answer: String,
    done: bool,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk of the response body. Returns true once the end
    /// event has been seen; everything after it is discarded.
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        if self.done {
            return true;
        }
        self.carry.extend_from_slice(chunk);
        while let Some(pos) = self.carry.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.carry.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.apply_line(line.trim());
            if self.done {
                return true;
            }
        }
        false
    }

    /// Applies a trailing line that arrived without a final newline.
    pub fn flush(&mut self) {
        if self.done || self.carry.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.carry);
        let line = String::from_utf8_lossy(&line);
        self.apply_line(line.trim());
    }

    fn apply_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            // heartbeats and other non-data lines are not an error
            return;
        };
        match serde_json::from_str::<StreamEvent>(payload) {
            Ok(StreamEvent::Token { data }) => self.answer.push_str(&data.token),
            Ok(StreamEvent::End) => self.done = true,
            Err(e) => warn!(line, error = %e, "skipping unparseable stream line"),
        }
    }

    pub fn ended(&self) -> bool {
        self.done
    }

    pub fn into_answer(self) -> String {
        self.answer
    }
}
