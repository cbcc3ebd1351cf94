//! 输出写入

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 输出目标，接收拼接完成的译文
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn persist(&self, document: &str) -> Result<()>;
}

/// 以UTF-8写入本地文件，覆盖已有内容
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OutputSink for FileSink {
    async fn persist(&self, document: &str) -> Result<()> {
        tokio::fs::write(&self.path, document).await?;
        tracing::debug!("wrote {} bytes to {}", document.len(), self.path.display());
        Ok(())
    }
}
