//! # README Translator
//!
//! 获取一份Markdown文档，按固定字符数分片，逐片发送到AI网关翻译，再按原顺序拼接写入本地文件。
//!
//! ## 主要特性
//!
//! - **头部保留**: 目录标记（`## Table of Contents` 或 `## 目录`）之前的内容原样保留
//! - **定长分片**: 按字符数切割，分片拼接后与原文完全一致
//! - **固定间隔重试**: 每个分片最多请求3次，失败后等待5秒
//! - **失败回退**: 重试耗尽时保留原文，不中断整体运行
//! - **串行限速**: 每次翻译请求后固定等待2秒
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use readme_translator::{Orchestrator, TranslatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslatorConfig::load()?;
//!     let report = Orchestrator::from_config(&config.translation).run().await?;
//!     println!("translated {} chunks", report.translated);
//!     Ok(())
//! }
//! ```
//!
//! ## 配置文件支持
//!
//! ```toml
//! [translation]
//! source_url = "https://raw.githubusercontent.com/ripienaar/free-for-dev/master/README.md"
//! output_path = "README.md"
//! chunk_size = 10000
//! max_attempts = 3
//! retry_delay_secs = 5
//! request_delay_secs = 2
//! ```
//!
//! 网关地址通过环境变量 `AI_GATEWAY_URL` 提供。

pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
#[doc(hidden)]
pub mod mock;
pub mod pipeline;
pub mod segmenter;
pub mod sink;
pub mod source;
pub mod translator;
pub mod types;

#[cfg(test)]
mod test_server;

pub use config::TranslatorConfig;
pub use error::{Result, TranslationError};
pub use pipeline::{Orchestrator, RunReport};
pub use segmenter::split_document;
pub use sink::{FileSink, OutputSink};
pub use source::{DocumentSource, HttpSource};
pub use translator::{
    build_prompt, retry_with_fixed_delay, GatewayClient, GenerationBackend, RateLimiter,
    TranslationOutcome, TranslationService,
};
pub use types::{RetryConfig, SegmentKind, TextSegment, TranslationConfig};
