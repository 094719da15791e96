use anyhow::Context;
use std::path::PathBuf;

/// Source of the bearer credential for the answer endpoint. The capture
/// itself (driving a browser through the login UI) is an external tool;
/// the harness only consumes what it produced.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> anyhow::Result<String>;
}

pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn token(&self) -> anyhow::Result<String> {
        anyhow::ensure!(!self.0.trim().is_empty(), "configured bearer token is empty");
        Ok(self.0.trim().to_string())
    }
}

/// Reads the token a capture tool persisted to disk.
pub struct TokenFile {
    pub path: PathBuf,
}

impl TokenSource for TokenFile {
    fn token(&self) -> anyhow::Result<String> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read token file {}", self.path.display()))?;
        let token = raw.trim();
        anyhow::ensure!(
            !token.is_empty(),
            "token file {} is empty",
            self.path.display()
        );
        Ok(token.to_string())
    }
}
