//! 错误处理模块
//!
//! 定义翻译流程中使用的错误类型。致命错误（配置缺失、源文档获取失败、写入失败）
//! 会终止整个运行；单个分片的请求错误只在重试循环内部出现，不会传播给调用方。

use thiserror::Error;

/// 翻译错误类型
///
/// # 变体说明
///
/// * `Config` - 配置错误，例如缺少网关地址
/// * `Fetch` - 源文档获取失败（非200状态码）
/// * `Http` - HTTP传输错误
/// * `ApiError` - 网关返回非200状态码，包含状态码和响应正文
/// * `ParseError` - 响应结构无法解析
/// * `Io` - 输出文件写入失败
/// * `Toml` - 配置文件解析失败
#[derive(Error, Debug)]
pub enum TranslationError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 源文档获取失败
    #[error("Failed to fetch source document {url}: status {status}")]
    Fetch {
        /// HTTP状态码
        status: u16,
        /// 请求的地址
        url: String,
    },

    /// HTTP请求错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API响应错误
    #[error("API error {code}: {message}")]
    ApiError {
        /// 状态码
        code: u16,
        /// 响应正文
        message: String,
    },

    /// 解析错误
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl TranslationError {
    /// 是否应当终止整个运行
    ///
    /// 传输、状态码和解析错误只影响单次请求，由重试策略处理。
    pub fn is_fatal(&self) -> bool {
        match self {
            TranslationError::Config(_)
            | TranslationError::Fetch { .. }
            | TranslationError::Io(_)
            | TranslationError::Toml(_) => true,
            TranslationError::Http(_)
            | TranslationError::ApiError { .. }
            | TranslationError::ParseError(_) => false,
        }
    }
}

/// 翻译结果类型别名
///
/// ```rust
/// use readme_translator::{Result, TranslationError};
///
/// fn require_url(url: &str) -> Result<&str> {
///     if url.is_empty() {
///         return Err(TranslationError::Config("empty url".to_string()));
///     }
///     Ok(url)
/// }
///
/// assert!(require_url("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, TranslationError>;
