//! 源文档获取

use crate::error::{Result, TranslationError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// 源文档来源
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// 获取完整文档；非200状态码返回 [`TranslationError::Fetch`]
    async fn fetch(&self) -> Result<String>;
}

/// 通过 HTTP GET 获取文档
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// 创建HTTP来源
    ///
    /// # 参数
    ///
    /// * `url` - 源文档地址
    /// * `timeout` - 请求超时
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("readme-translator/0.1")
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to create HTTP client: {}, using default", e);
                Client::new()
            });

        Self { client, url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        tracing::debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TranslationError::Fetch { status: status.as_u16(), url: self.url.clone() });
        }

        Ok(response.text().await?)
    }
}
