//! 类型定义模块
//!
//! 定义翻译流程中使用的配置、重试参数、分片以及网关请求/响应结构。

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认源文档地址
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/ripienaar/free-for-dev/master/README.md";

/// 默认输出文件
pub const DEFAULT_OUTPUT_PATH: &str = "README.md";

/// 网关地址的环境变量名
pub const GATEWAY_URL_ENV: &str = "AI_GATEWAY_URL";

/// 翻译配置
///
/// # 字段说明
///
/// * `source_url` - 源文档地址
/// * `gateway_url` - 翻译网关地址，运行时由 `AI_GATEWAY_URL` 提供
/// * `output_path` - 输出文件路径
/// * `chunk_size` - 单个分片的最大字符数
/// * `header_markers` - 目录标记，首个标记之前的内容不翻译
/// * `max_attempts` - 每个分片的最大请求次数
/// * `retry_delay_secs` - 失败后重试前的等待秒数
/// * `request_delay_secs` - 相邻两次翻译请求之间的间隔秒数
/// * `request_timeout_secs` - 单次网关请求超时
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub source_url: String,
    /// 只能通过 `AI_GATEWAY_URL` 设置，不从配置文件读写
    #[serde(skip)]
    pub gateway_url: String,
    pub output_path: String,
    pub chunk_size: usize,
    pub header_markers: Vec<String>,
    pub max_attempts: usize,
    pub retry_delay_secs: u64,
    pub request_delay_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            gateway_url: String::new(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            chunk_size: 10_000,
            header_markers: vec!["## Table of Contents".to_string(), "## 目录".to_string()],
            max_attempts: 3,
            retry_delay_secs: 5,
            request_delay_secs: 2,
            request_timeout_secs: 120,
        }
    }
}

impl TranslationConfig {
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 固定间隔的重试参数
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// 总尝试次数（包括第一次）
    pub max_attempts: usize,
    /// 两次尝试之间的固定等待时间
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// 分片类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// 目录标记之前的内容，原样保留
    Header,
    /// 需要翻译的正文分片
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub content: String,
    pub kind: SegmentKind,
}

impl TextSegment {
    pub fn header(content: impl Into<String>) -> Self {
        Self { content: content.into(), kind: SegmentKind::Header }
    }

    pub fn body(content: impl Into<String>) -> Self {
        Self { content: content.into(), kind: SegmentKind::Body }
    }

    pub fn is_header(&self) -> bool {
        self.kind == SegmentKind::Header
    }
}

/// 网关请求体：`{"contents": [{"parts": [{"text": ...}]}]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content { parts: vec![Part { text: prompt.into() }] }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// 网关响应体，只关心 `candidates[0].content.parts[0].text`
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

impl GenerateResponse {
    /// 取第一个候选的第一段文本
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
    }
}
