//! 翻译流程编排
//!
//! 获取源文档 → 分片 → 按顺序逐个翻译 → 拼接 → 写入输出。
//! 全流程串行执行，每次翻译请求之后固定等待一段时间以避免触发网关限流。

use crate::error::Result;
use crate::segmenter::split_document;
use crate::sink::{FileSink, OutputSink};
use crate::source::{DocumentSource, HttpSource};
use crate::translator::{GatewayClient, GenerationBackend, RateLimiter, TranslationService};
use crate::types::TranslationConfig;

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// 分片总数，包括头部
    pub segments: usize,
    /// 成功翻译的正文分片数
    pub translated: usize,
    /// 回退为原文的正文分片数
    pub fallbacks: usize,
    pub source_chars: usize,
    pub output_chars: usize,
}

/// 翻译流程
///
/// 持有文档来源、翻译服务和输出目标三个协作者。分片在单一任务中按顺序翻译，
/// 结果只追加到本次运行的输出字符串中。
///
/// # 示例
///
/// ```rust,no_run
/// use readme_translator::{Orchestrator, TranslationConfig};
///
/// # async fn demo() -> readme_translator::Result<()> {
/// let config = TranslationConfig {
///     gateway_url: "http://localhost:8787/generate".to_string(),
///     ..Default::default()
/// };
///
/// let report = Orchestrator::from_config(&config).run().await?;
/// println!("{} chunks kept original text", report.fallbacks);
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<S, B, K> {
    source: S,
    translator: TranslationService<B>,
    sink: K,
    limiter: RateLimiter,
    chunk_size: usize,
    header_markers: Vec<String>,
}

impl Orchestrator<HttpSource, GatewayClient, FileSink> {
    /// 按配置创建基于HTTP和本地文件的流程
    pub fn from_config(config: &TranslationConfig) -> Self {
        let timeout = config.request_timeout();
        Self::new(
            HttpSource::new(&config.source_url, timeout),
            TranslationService::new(GatewayClient::new(&config.gateway_url, timeout), config.retry_config()),
            FileSink::new(&config.output_path),
            config,
        )
    }
}

impl<S, B, K> Orchestrator<S, B, K>
where
    S: DocumentSource,
    B: GenerationBackend,
    K: OutputSink,
{
    /// 组装流程
    ///
    /// # 参数
    ///
    /// * `source` - 文档来源
    /// * `translator` - 翻译服务
    /// * `sink` - 输出目标
    /// * `config` - 提供分片大小、目录标记和请求间隔
    pub fn new(source: S, translator: TranslationService<B>, sink: K, config: &TranslationConfig) -> Self {
        Self {
            source,
            translator,
            sink,
            limiter: RateLimiter::new(config.request_delay()),
            chunk_size: config.chunk_size,
            header_markers: config.header_markers.clone(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn translator(&self) -> &TranslationService<B> {
        &self.translator
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// 完整运行
    ///
    /// # 返回
    ///
    /// * `Ok(RunReport)` - 输出已写入
    /// * `Err(TranslationError)` - 源文档获取失败或写入失败，获取失败时不会产生任何输出
    ///
    /// 单个分片翻译失败不会中断运行。
    pub async fn run(&self) -> Result<RunReport> {
        let document = match self.source.fetch().await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Failed to fetch source document: {}", e);
                return Err(e);
            }
        };
        tracing::info!("Successfully fetched source document: {} characters", document.chars().count());

        let (output, report) = self.translate_document(&document).await;

        self.sink.persist(&output).await?;
        tracing::info!(
            "Translation completed: {} chunks translated, {} kept original, {} characters written",
            report.translated,
            report.fallbacks,
            report.output_chars
        );

        Ok(report)
    }

    /// 翻译已获取的文档，返回输出文本和统计
    pub async fn translate_document(&self, document: &str) -> (String, RunReport) {
        let segments = split_document(document, &self.header_markers, self.chunk_size);
        tracing::info!("Split content into {} chunks", segments.len());

        let mut report = RunReport {
            segments: segments.len(),
            source_chars: document.chars().count(),
            ..Default::default()
        };

        let mut output = String::with_capacity(document.len());
        let total = segments.len();

        for (index, segment) in segments.iter().enumerate() {
            if segment.is_header() {
                output.push_str(&segment.content);
                continue;
            }

            let outcome = self.translator.translate_segment(&segment.content, index, total).await;
            if outcome.is_fallback() {
                report.fallbacks += 1;
            } else {
                report.translated += 1;
            }
            output.push_str(outcome.as_str());

            self.limiter.wait().await;
        }

        report.output_chars = output.chars().count();
        (output, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslationError;
    use crate::mock::{echo_translation, MemorySink, MockBackend, MockReply, MockSource};
    use crate::types::RetryConfig;
    use std::time::Duration;
    use tokio::time::Instant;

    fn config(chunk_size: usize) -> TranslationConfig {
        TranslationConfig {
            gateway_url: "mock://gateway".to_string(),
            chunk_size,
            ..Default::default()
        }
    }

    fn orchestrator(
        source: MockSource,
        backend: MockBackend,
        config: &TranslationConfig,
    ) -> Orchestrator<MockSource, MockBackend, MemorySink> {
        let translator = TranslationService::new(backend, config.retry_config());
        Orchestrator::new(source, translator, MemorySink::new(), config)
    }

    #[tokio::test(start_paused = true)]
    async fn header_is_kept_and_body_translated() {
        let config = config(10_000);
        let pipeline = orchestrator(
            MockSource::document("HEADER\n## Table of Contents\nBODY"),
            MockBackend::echo(),
            &config,
        );

        let report = pipeline.run().await.unwrap();

        let expected = format!("HEADER\n{}", echo_translation("## Table of Contents\nBODY"));
        assert_eq!(pipeline.sink().written(), Some(expected));
        assert_eq!(report.segments, 2);
        assert_eq!(report.translated, 1);
        assert_eq!(pipeline.translator().backend().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_stops_before_translation() {
        let config = config(10_000);
        let pipeline = orchestrator(MockSource::status(404), MockBackend::echo(), &config);

        let err = pipeline.run().await.unwrap_err();

        assert!(matches!(err, TranslationError::Fetch { status: 404, .. }));
        assert_eq!(pipeline.translator().backend().calls(), 0);
        assert_eq!(pipeline.sink().written(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_after_every_translated_chunk() {
        let config = config(4);
        let pipeline = orchestrator(MockSource::document(""), MockBackend::echo(), &config);
        let started = Instant::now();

        // 无目录标记：头部为空，12个字符分成3片
        let (_, report) = pipeline.translate_document("abcdefghijkl").await;

        assert_eq!(report.translated, 3);
        assert_eq!(started.elapsed(), config.request_delay() * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn header_only_document_makes_no_calls() {
        let config = config(10_000);
        let pipeline = orchestrator(MockSource::document(""), MockBackend::echo(), &config);
        let started = Instant::now();

        let (output, report) = pipeline.translate_document("").await;

        assert_eq!(output, "");
        assert_eq!(report.segments, 1);
        assert_eq!(pipeline.translator().backend().calls(), 0);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_chunk_keeps_original_and_run_continues() {
        let mut config = config(3);
        config.max_attempts = 3;
        let backend = MockBackend::scripted(vec![
            MockReply::Status(500, "a".to_string()),
            MockReply::Status(500, "b".to_string()),
            MockReply::Status(500, "c".to_string()),
        ]);
        let pipeline = orchestrator(MockSource::document(""), backend, &config);

        let (output, report) = pipeline.translate_document("abcdef").await;

        assert_eq!(output, format!("abc{}", echo_translation("def")));
        assert_eq!(report.fallbacks, 1);
        assert_eq!(report.translated, 1);
        assert_eq!(pipeline.translator().backend().calls(), 4);
        assert_eq!(pipeline.translator().retry_config(), &RetryConfig {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        });
    }
}
