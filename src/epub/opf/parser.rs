//! OPF解析器模块
//!
//! 提供OPF（Open Packaging Format）文件的XML解析功能。

use crate::epub::error::Result;
use crate::epub::opf::{manifest::Manifest, manifest::ManifestItem, spine::SpineItem};
use crate::epub::xml::{attr_value, text_content};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// OPF文件中当前所处的区段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Metadata,
    Manifest,
    Spine,
}

/// OPF文件解析结果
#[derive(Debug, Clone)]
pub struct Opf {
    /// EPUB版本
    pub version: String,
    /// 元数据中第一个标题元素的文本（已去除首尾空白）
    pub title: Option<String>,
    /// 清单项(文件列表)，保留声明顺序
    pub manifest: Manifest,
    /// 脊柱(阅读顺序)
    pub spine: Vec<SpineItem>,
    /// 脊柱的目录引用（NCX的清单ID）
    pub spine_toc: Option<String>,
}

impl Opf {
    /// 解析OPF文件内容
    ///
    /// # 参数
    /// * `xml_content` - OPF文件的XML内容
    ///
    /// # 返回值
    /// * `Result<Opf, EpubError>` - 解析后的OPF信息
    pub fn parse_xml(xml_content: &str) -> Result<Opf> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut version = String::new();
        let mut title: Option<String> = None;
        let mut manifest = Manifest::new();
        let mut spine = Vec::new();
        let mut spine_toc = None;

        let mut buf = Vec::new();
        let mut section = Section::None;
        // 正在读取的标题文本；只收集第一个title元素
        let mut title_text: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"package" => {
                        version = attr_value(e, b"version")?.unwrap_or_default();
                    }
                    b"metadata" => section = Section::Metadata,
                    b"manifest" => section = Section::Manifest,
                    b"spine" => {
                        section = Section::Spine;
                        spine_toc = attr_value(e, b"toc")?.filter(|toc| !toc.is_empty());
                    }
                    b"title" if section == Section::Metadata && title.is_none() => {
                        title_text = Some(String::new());
                    }
                    b"item" if section == Section::Manifest => {
                        if let Some(item) = Self::parse_manifest_item(e)? {
                            manifest.insert(item);
                        }
                    }
                    b"itemref" if section == Section::Spine => {
                        if let Some(idref) = attr_value(e, b"idref")?.filter(|id| !id.is_empty()) {
                            spine.push(SpineItem::new(idref));
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"metadata" | b"manifest" | b"spine" => section = Section::None,
                    b"title" => {
                        if let Some(text) = title_text.take() {
                            title = Some(text.trim().to_string());
                        }
                    }
                    _ => {}
                },
                Event::Text(ref e) => {
                    if let Some(text) = title_text.as_mut() {
                        text.push_str(&text_content(e));
                    }
                }
                Event::CData(ref e) => {
                    if let Some(text) = title_text.as_mut() {
                        text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Opf {
            version,
            title,
            manifest,
            spine,
            spine_toc,
        })
    }

    /// 解析清单项，缺少id或href时返回None
    fn parse_manifest_item(e: &BytesStart) -> Result<Option<ManifestItem>> {
        let id = attr_value(e, b"id")?.unwrap_or_default();
        let href = attr_value(e, b"href")?.unwrap_or_default();
        if id.is_empty() || href.is_empty() {
            return Ok(None);
        }

        let media_type = attr_value(e, b"media-type")?.unwrap_or_default();
        Ok(Some(ManifestItem::new(id, href, media_type)))
    }

    /// 按阅读顺序返回能在清单中找到的条目，无法解析的引用被跳过
    pub fn reading_order(&self) -> Vec<ManifestItem> {
        self.spine
            .iter()
            .filter_map(|spine_item| {
                let item = self.manifest.get(&spine_item.idref);
                if item.is_none() {
                    log::debug!("脊柱引用了不存在的清单项: {}", spine_item.idref);
                }
                item.cloned()
            })
            .collect()
    }
}
