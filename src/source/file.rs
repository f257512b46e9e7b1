//! Local file (or stdin) entity source

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::debug;

use super::traits::EntitySource;

/// Reads a JSON document from disk; the path `-` reads stdin
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

#[async_trait]
impl EntitySource for FileSource {
    fn describe(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }

    async fn load(&self) -> anyhow::Result<Value> {
        let content = if self.is_stdin() {
            let mut content = String::new();
            tokio::io::stdin().read_to_string(&mut content).await?;
            content
        } else {
            tokio::fs::read_to_string(&self.path)
                .await
                .with_context(|| format!("Failed to read {}", self.path.display()))?
        };

        debug!("Read {} bytes from {}", content.len(), self.describe());
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", self.describe()))
    }
}
