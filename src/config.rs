//! 配置管理模块
//!
//! 提供TOML配置文件的读取、写入和自动发现，`.env` 文件加载，以及环境变量覆盖。
//! 网关地址只能来自环境变量，缺失时在任何请求之前报错退出。

use crate::error::{Result, TranslationError};
use crate::types::{TranslationConfig, GATEWAY_URL_ENV};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const CONFIG_PATHS: [&str; 2] = ["translator.toml", ".translator.toml"];
const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// 配置文件结构
///
/// ```toml
/// [translation]
/// chunk_size = 10000
/// max_attempts = 3
/// retry_delay_secs = 5
/// request_delay_secs = 2
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// 翻译配置
    #[serde(default)]
    pub translation: TranslationConfig,
}

impl TranslatorConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: TranslatorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TranslationError::Config(format!("序列化配置失败: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from the first existing default location
    pub fn load_from_default_locations() -> Self {
        for path in &CONFIG_PATHS {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        tracing::info!("加载配置文件: {}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("配置文件 {} 加载失败，使用默认配置: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Self::default()
    }

    /// 加载 .env 文件
    pub fn load_dotenv() {
        for env_file in &ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 用进程环境变量覆盖配置
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| env::var(name).ok());
    }

    /// 变量来源可替换，便于测试时不修改进程环境
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let translation = &mut self.translation;
        if let Some(url) = lookup(GATEWAY_URL_ENV) {
            translation.gateway_url = url.trim().to_string();
        }
        if let Some(url) = lookup("TRANSLATOR_SOURCE_URL") {
            translation.source_url = url;
        }
        if let Some(path) = lookup("TRANSLATOR_OUTPUT_PATH") {
            translation.output_path = path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let translation = &self.translation;
        if translation.gateway_url.is_empty() {
            return Err(TranslationError::Config(format!(
                "{} not found in environment variables",
                GATEWAY_URL_ENV
            )));
        }
        if translation.chunk_size == 0 {
            return Err(TranslationError::Config("chunk_size must be greater than 0".to_string()));
        }
        if translation.max_attempts == 0 {
            return Err(TranslationError::Config("max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }

    /// 完整加载流程：配置文件 → `.env` → 环境变量 → 校验
    pub fn load() -> Result<Self> {
        Self::load_dotenv();
        let mut config = Self::load_from_default_locations();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }
}
