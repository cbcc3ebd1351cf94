//! 测试替身
//!
//! - `MockBackend` - 按脚本返回译文、错误状态码或无法解析的响应，并记录调用次数
//! - `MockSource` - 返回固定文档或固定错误状态码
//! - `MemorySink` - 将输出保存在内存中

use crate::error::{Result, TranslationError};
use crate::sink::OutputSink;
use crate::source::DocumentSource;
use crate::translator::{parse_generated_text, GenerationBackend, PROMPT_PREAMBLE};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 单次调用的模拟结果
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// 成功返回的文本
    Text(String),
    /// 非200状态码及响应正文
    Status(u16, String),
    /// 200状态码但正文无法解析
    Malformed(String),
    /// 回显分片并加上 `[zh]` 前缀
    Echo,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 从提示词中还原出原始分片
pub fn segment_from_prompt(prompt: &str) -> &str {
    let body = prompt.strip_prefix(PROMPT_PREAMBLE).unwrap_or(prompt);
    body.strip_suffix('\n').unwrap_or(body)
}

/// 回显模式下的“译文”
pub fn echo_translation(segment: &str) -> String {
    format!("[zh]{}", segment)
}

#[derive(Debug)]
pub struct MockBackend {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    /// 依次使用 `script` 中的结果，用完后重复 `fallback`
    pub fn new(script: Vec<MockReply>, fallback: MockReply) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: MockReply) -> Self {
        Self::new(Vec::new(), reply)
    }

    pub fn echo() -> Self {
        Self::always(MockReply::Echo)
    }

    /// 脚本用完后回显
    pub fn scripted(script: Vec<MockReply>) -> Self {
        Self::new(script, MockReply::Echo)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.prompts).push(prompt.to_string());

        let reply = lock(&self.script).pop_front().unwrap_or_else(|| self.fallback.clone());
        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Status(code, message) => Err(TranslationError::ApiError { code, message }),
            MockReply::Malformed(body) => parse_generated_text(&body),
            MockReply::Echo => Ok(echo_translation(segment_from_prompt(prompt))),
        }
    }
}

#[derive(Debug)]
pub struct MockSource {
    status: u16,
    document: String,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn document(document: impl Into<String>) -> Self {
        Self { status: 200, document: document.into(), calls: AtomicUsize::new(0) }
    }

    pub fn status(status: u16) -> Self {
        Self { status, document: String::new(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for MockSource {
    async fn fetch(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.status != 200 {
            return Err(TranslationError::Fetch { status: self.status, url: "mock://source".to_string() });
        }
        Ok(self.document.clone())
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    written: Mutex<Option<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近一次写入的内容；从未写入则为 `None`
    pub fn written(&self) -> Option<String> {
        lock(&self.written).clone()
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn persist(&self, document: &str) -> Result<()> {
        *lock(&self.written) = Some(document.to_string());
        Ok(())
    }
}
