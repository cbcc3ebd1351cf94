//! 文档分片
//!
//! 将源文档拆成一个不翻译的头部和若干定长正文分片。分片按字符数切割，
//! 不考虑句子或Markdown语法边界；所有分片按顺序拼接后与原文完全一致。

use crate::types::TextSegment;

/// 查找头部边界：任一目录标记最早出现的字节位置
pub fn find_header_boundary(document: &str, markers: &[String]) -> Option<usize> {
    markers
        .iter()
        .filter(|marker| !marker.is_empty())
        .filter_map(|marker| document.find(marker.as_str()))
        .min()
}

/// 按字符数切割文本，不会切断多字节字符
pub fn chunk_by_chars(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == chunk_size {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

/// 拆分文档
///
/// 返回值的第一个元素始终是头部（可能为空），其后是按原文顺序排列的正文分片。
///
/// ```rust
/// use readme_translator::segmenter::split_document;
///
/// let markers = vec!["## Table of Contents".to_string()];
/// let segments = split_document("Intro\n## Table of Contents\nabcdef", &markers, 4);
///
/// assert_eq!(segments[0].content, "Intro\n");
/// assert_eq!(segments.len(), 1 + 7);
/// ```
pub fn split_document(document: &str, markers: &[String], chunk_size: usize) -> Vec<TextSegment> {
    let boundary = find_header_boundary(document, markers).unwrap_or(0);
    let (header, remainder) = document.split_at(boundary);

    let mut segments = vec![TextSegment::header(header)];
    segments.extend(chunk_by_chars(remainder, chunk_size).into_iter().map(TextSegment::body));
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SegmentKind;

    fn markers() -> Vec<String> {
        vec!["## Table of Contents".to_string(), "## 目录".to_string()]
    }

    fn joined(segments: &[TextSegment]) -> String {
        segments.iter().map(|s| s.content.as_str()).collect()
    }

    #[test]
    fn concatenation_reproduces_document() {
        let documents = [
            String::new(),
            "no marker here at all".to_string(),
            "# Title\n\n## Table of Contents\n- [A](#a)\n\n## A\ntext".to_string(),
            "前言\n## 目录\n- 条目\n".repeat(5),
            "x".repeat(25_001),
            format!("header\n## Table of Contents\n{}", "é🚀".repeat(7_777)),
        ];

        for document in &documents {
            for chunk_size in [1, 3, 64, 10_000] {
                let segments = split_document(document, &markers(), chunk_size);
                assert_eq!(&joined(&segments), document, "chunk_size {}", chunk_size);
            }
        }
    }

    #[test]
    fn header_is_text_before_marker() {
        let document = "# free-for-dev\nintro\n## Table of Contents\n- item";
        let p = document.find("## Table of Contents").unwrap();
        let segments = split_document(document, &markers(), 10_000);

        assert_eq!(segments[0].kind, SegmentKind::Header);
        assert_eq!(segments[0].content, &document[..p]);
        assert!(segments[1].content.starts_with("## Table of Contents"));
    }

    #[test]
    fn localized_marker_is_recognized() {
        let segments = split_document("标题\n## 目录\n内容", &markers(), 10_000);
        assert_eq!(segments[0].content, "标题\n");
        assert_eq!(segments[1].content, "## 目录\n内容");
    }

    #[test]
    fn earliest_marker_wins() {
        let document = "a\n## 目录\nb\n## Table of Contents\nc";
        let segments = split_document(document, &markers(), 10_000);
        assert_eq!(segments[0].content, "a\n");
    }

    #[test]
    fn missing_marker_gives_empty_header() {
        let document = "just a body";
        let segments = split_document(document, &markers(), 4);

        assert!(segments[0].is_header());
        assert_eq!(segments[0].content, "");
        assert_eq!(segments[1].content, "just");
        assert_eq!(segments[1].kind, SegmentKind::Body);
    }

    #[test]
    fn empty_document_has_only_empty_header() {
        let segments = split_document("", &markers(), 10_000);
        assert_eq!(segments, vec![TextSegment::header("")]);
    }

    #[test]
    fn short_document_is_a_single_body() {
        let segments = split_document("HEADER\n## Table of Contents\nBODY", &markers(), 10_000);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].content, "## Table of Contents\nBODY");
    }

    #[test]
    fn chunks_are_full_except_last() {
        let document = format!("h\n## Table of Contents\n{}", "ab中".repeat(1_000));
        let chunk_size = 128;
        let segments = split_document(&document, &markers(), chunk_size);
        let bodies: Vec<_> = segments.iter().skip(1).collect();
        let (last, full) = bodies.split_last().unwrap();

        for body in full {
            assert_eq!(body.content.chars().count(), chunk_size);
        }
        assert!(last.content.chars().count() <= chunk_size);
        assert!(!last.content.is_empty());
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let chunks = chunk_by_chars("abcdef", 3);
        assert_eq!(chunks, vec!["abc", "def"]);
    }

    #[test]
    fn empty_markers_are_ignored() {
        assert_eq!(find_header_boundary("abc", &[String::new()]), None);
        assert_eq!(find_header_boundary("abc", &[]), None);
    }
}
