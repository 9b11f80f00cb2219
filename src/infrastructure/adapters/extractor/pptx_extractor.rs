//! PPTX Text Extractor - 从 .pptx 文档提取文本
//!
//! 实现 TextExtractorPort trait
//!
//! .pptx 是一个 ZIP 包，内部是 OOXML 文档：
//! - `ppt/_rels/presentation.xml.rels` 列出所有幻灯片部件
//! - `ppt/slides/slideN.xml` 中形状（sp）→ 文本框（txBody）→ 段落（a:p）
//!   → 文本 run（a:r）→ 文本（a:t）
//!
//! 文本按文档顺序逐 run 收集，无分隔符拼接，最后去除首尾空白。

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use crate::application::ports::{ExtractError, TextExtractorPort};

/// PPTX 文本提取器
pub struct PptxTextExtractor;

impl PptxTextExtractor {
    /// 创建新的 PPTX 提取器
    pub fn new() -> Self {
        Self
    }

    /// 从任意 Read + Seek 数据源提取文本
    pub fn extract_from_reader<R: Read + Seek>(&self, reader: R) -> Result<String, ExtractError> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| ExtractError::OpenFailed(format!("Failed to open ZIP: {}", e)))?;

        let slide_paths = slide_order(&mut archive)?;

        let mut text = String::new();
        for slide_path in &slide_paths {
            let content = read_file_from_archive(&mut archive, slide_path)?;
            collect_run_text(&content, &mut text)?;
        }

        Ok(text.trim().to_string())
    }
}

impl Default for PptxTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractorPort for PptxTextExtractor {
    async fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ExtractError::OpenFailed(format!("Cannot open {:?}: {}", path, e)))?;

        let text = self.extract_from_reader(file)?;

        tracing::debug!(
            path = %path.display(),
            text_len = text.len(),
            "PPTX text extracted"
        );

        Ok(text)
    }
}

/// 从 presentation 关系文件得到按编号排序的幻灯片部件路径
fn slide_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>, ExtractError> {
    let rels_content = read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;

    let mut slides: Vec<(String, Option<usize>)> = Vec::new();
    let mut reader = Reader::from_str(&rels_content);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                // 只要幻灯片本体，排除 slideLayout / slideMaster / notesSlide
                if rel_type.ends_with("/slide") {
                    let order_num =
                        extract_slide_number(&target).or_else(|| extract_slide_number(&id));
                    let full_path = if let Some(stripped) = target.strip_prefix('/') {
                        stripped.to_string()
                    } else {
                        format!("ppt/{}", target)
                    };
                    slides.push((full_path, order_num));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Malformed(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    // 按幻灯片编号排序，无编号的排在最后
    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    Ok(slides.into_iter().map(|(path, _)| path).collect())
}

/// 收集单张幻灯片 XML 中所有文本 run 的内容
///
/// 只取 txBody 里 a:r 下的 a:t 文本，与文档顺序一致；
/// 字段（a:fld）和换行（a:br）不计入。
fn collect_run_text(xml_content: &str, out: &mut String) -> Result<(), ExtractError> {
    let mut reader = Reader::from_str(xml_content);

    let mut in_text_body = false;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"txBody" => in_text_body = true,
                b"r" if in_text_body => in_run = true,
                b"t" if in_run => in_text = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().unwrap_or_default();
                    out.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"txBody" => in_text_body = false,
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Malformed(format!(
                    "Error parsing slide XML: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

/// 从 ZIP 包中读取一个文件的内容
fn read_file_from_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String, ExtractError> {
    let mut file = archive.by_name(path).map_err(|e| {
        ExtractError::Malformed(format!("File not found in archive '{}': {}", path, e))
    })?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| ExtractError::Malformed(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// 去掉 XML 元素名的命名空间前缀
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// 从 "slide3.xml" 或 "rId3" 这类字符串末尾提取编号
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
