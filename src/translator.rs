//! 翻译客户端模块
//!
//! 负责单个正文分片的翻译：构造提示词、调用AI网关、固定间隔重试，
//! 重试耗尽后回退为原文。

use crate::error::{Result, TranslationError};
use crate::types::{GenerateRequest, GenerateResponse, RetryConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

pub(crate) const PROMPT_PREAMBLE: &str = "请将以下GitHub仓库README.md内容翻译成中文。这是free-for-dev仓库，收录了对开发者免费的服务列表。

翻译规则：
1. 所有链接、代码和标记符号保持原样
2. 专业术语和专有名词保留原文，首次出现时可以在括号中附上中文解释
3. Markdown格式保持不变
4. 译文准确、专业、通顺
5. 不添加原文中没有的内容

需要翻译的内容如下：

";

/// 构造翻译提示词
///
/// 提示词要求保留链接、代码、标记符号和专有名词，保持Markdown格式，且不添加原文没有的内容。
pub fn build_prompt(text: &str) -> String {
    format!("{}{}\n", PROMPT_PREAMBLE, text)
}

/// 生成式网关的一次调用
///
/// 实现方只负责单次请求，重试与回退由 [`TranslationService`] 处理。
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// 基于 reqwest 的AI网关客户端
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    url: String,
}

impl GatewayClient {
    /// 创建网关客户端
    ///
    /// # 参数
    ///
    /// * `url` - 网关地址，通常来自 `AI_GATEWAY_URL`
    /// * `timeout` - 单次请求超时
    ///
    /// HTTP客户端构建失败时退回默认客户端并记录警告。
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
impl GenerationBackend for GatewayClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!("发送翻译请求到: {}，提示词长度: {} 字符", self.url, prompt.chars().count());

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(TranslationError::ApiError { code: status.as_u16(), message: body });
        }

        parse_generated_text(&body)
    }
}

/// 从网关响应正文中取出 `candidates[0].content.parts[0].text`
pub fn parse_generated_text(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| TranslationError::ParseError(format!("无法解析JSON响应: {}", e)))?;

    response
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| TranslationError::ParseError(format!("响应中缺少候选文本: {}", body)))
}

/// 固定间隔重试
///
/// 失败后等待 `config.delay` 再试，最后一次失败直接返回错误，不再等待。
///
/// # 参数
///
/// * `operation` - 要执行的异步操作，参数为从1开始的尝试序号
/// * `config` - 重试配置
///
/// # 返回
///
/// * `Ok(T)` - 任一次尝试成功的结果
/// * `Err(TranslationError)` - 最后一次尝试的错误
///
/// # 示例
///
/// ```rust
/// use readme_translator::{retry_with_fixed_delay, RetryConfig, TranslationError};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let config = RetryConfig { max_attempts: 3, delay: Duration::ZERO };
/// let result = retry_with_fixed_delay(
///     |attempt| async move {
///         if attempt < 2 {
///             Err(TranslationError::ParseError("truncated".to_string()))
///         } else {
///             Ok(attempt)
///         }
///     },
///     &config,
/// )
/// .await;
///
/// assert_eq!(result.unwrap(), 2);
/// # });
/// ```
pub async fn retry_with_fixed_delay<F, Fut, T>(mut operation: F, config: &RetryConfig) -> Result<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(result) => return Ok(result),
            Err(e) => {
                match &e {
                    TranslationError::ApiError { code, message } => tracing::warn!(
                        "API request failed with status code {} (attempt {}/{}): {}",
                        code,
                        attempt,
                        max_attempts,
                        message
                    ),
                    other => tracing::warn!(
                        "Error during API request (attempt {}/{}): {}",
                        attempt,
                        max_attempts,
                        other
                    ),
                }

                if attempt >= max_attempts {
                    return Err(e);
                }
                sleep(config.delay).await;
                attempt += 1;
            }
        }
    }
}

/// 相邻请求之间的固定间隔
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

/// 单个分片的翻译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// 网关返回的译文
    Translated(String),
    /// 重试耗尽后保留的原文
    Fallback(String),
}

impl TranslationOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TranslationOutcome::Fallback(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            TranslationOutcome::Translated(text) | TranslationOutcome::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Translated(text) | TranslationOutcome::Fallback(text) => text,
        }
    }
}

/// 翻译服务
///
/// 持有网关后端和重试参数，不在两次调用之间保留任何状态。
///
/// ```rust,no_run
/// use readme_translator::{GatewayClient, RetryConfig, TranslationService};
/// use std::time::Duration;
///
/// # async fn demo() {
/// let backend = GatewayClient::new("http://localhost:8787/generate", Duration::from_secs(120));
/// let service = TranslationService::new(backend, RetryConfig::default());
///
/// let outcome = service.translate_segment("## Table of Contents", 0, 1).await;
/// println!("{}", outcome.as_str());
/// # }
/// ```
pub struct TranslationService<B> {
    backend: B,
    retry: RetryConfig,
}

impl<B: GenerationBackend> TranslationService<B> {
    /// 创建翻译服务
    ///
    /// # 参数
    ///
    /// * `backend` - 执行单次请求的网关后端
    /// * `retry` - 每个分片的重试配置
    pub fn new(backend: B, retry: RetryConfig) -> Self {
        Self { backend, retry }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// 翻译一个正文分片
    ///
    /// # 参数
    ///
    /// * `text` - 分片原文
    /// * `index` - 分片序号，从0开始，只用于日志
    /// * `total` - 分片总数，只用于日志
    ///
    /// # 返回
    ///
    /// 该方法不会失败：成功时返回 [`TranslationOutcome::Translated`]，
    /// 重试耗尽时返回内容为原文的 [`TranslationOutcome::Fallback`]。
    pub async fn translate_segment(&self, text: &str, index: usize, total: usize) -> TranslationOutcome {
        tracing::info!(
            "Translating chunk {}/{} ({} characters)...",
            index + 1,
            total,
            text.chars().count()
        );

        let full_prompt = build_prompt(text);
        let prompt = full_prompt.as_str();
        let backend = &self.backend;
        let result = retry_with_fixed_delay(
            move |attempt| {
                tracing::debug!("chunk {} attempt {}", index + 1, attempt);
                backend.generate(prompt)
            },
            &self.retry,
        )
        .await;

        match result {
            Ok(translated) => TranslationOutcome::Translated(translated),
            Err(e) => {
                tracing::error!(
                    "Failed to translate chunk {} after {} attempts, keeping original text: {}",
                    index + 1,
                    self.retry.max_attempts.max(1),
                    e
                );
                TranslationOutcome::Fallback(text.to_string())
            }
        }
    }
}
