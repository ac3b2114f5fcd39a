//! 章节切分
//!
//! 按阅读顺序处理每个内容文件：目录中有多个锚点指向同一文件时按锚点切成多个章节，
//! 否则整个文件作为一个章节。

use crate::epub::book::Chapter;
use crate::epub::config::ParseOptions;
use crate::epub::content::extract::{extract_range, extract_text};
use crate::epub::content::title::{find_chapter_title, is_book_title};
use crate::epub::error::{Degrade, EpubError, Result};
use crate::epub::markup;
use crate::epub::opf::ManifestItem;
use crate::epub::package::Package;
use crate::epub::source::PackageSource;
use crate::epub::toc::{TocEntry, TocMap};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("valid body selector"));

/// 按阅读顺序生成章节列表
///
/// 单个文件的读取或解析失败只会让该文件不产生章节。
pub fn segment_chapters<S: PackageSource + ?Sized>(
    source: &mut S,
    package: &Package,
    toc: &TocMap,
    options: &ParseOptions,
) -> Vec<Chapter> {
    let mut chapters = Vec::new();

    for item in &package.reading_order {
        let Some(document) = load_document(source, package, item).or_degrade("跳过内容文件") else {
            continue;
        };

        let file_entries = toc.entries_for(&item.href);
        let fragment_entries: Vec<&TocEntry> =
            file_entries.iter().filter(|entry| entry.fragment.is_some()).collect();

        if fragment_entries.len() > 1 {
            let split = split_by_fragments(&document, &fragment_entries, &package.title);
            log::debug!("{} 按锚点切分为 {} 个章节", item.href, split.len());
            chapters.extend(split);
            continue;
        }

        let Some(body) = document.select(&BODY_SELECTOR).next() else {
            continue;
        };
        let content = extract_text(body);
        if content.is_empty() {
            log::debug!("{} 没有正文，丢弃", item.href);
            continue;
        }

        let title = match file_entries.first() {
            Some(entry) if !is_book_title(&entry.label, &package.title) => entry.label.clone(),
            _ => find_chapter_title(&document, &package.title, chapters.len() + 1, options),
        };
        chapters.push(Chapter::new(title, content));
    }

    chapters
}

/// 读取并解析一个阅读顺序条目
fn load_document<S: PackageSource + ?Sized>(
    source: &mut S,
    package: &Package,
    item: &ManifestItem,
) -> Result<Html> {
    let path = package.resolve_path(&item.href);
    let skipped = |reason: String| EpubError::SkippedContent {
        path: path.clone(),
        reason,
    };

    if !item.is_markup() {
        return Err(skipped(format!("媒体类型不是标记文档: {}", item.media_type)));
    }

    let content = source
        .read_text_lossy(&path)
        .map_err(|e| skipped(e.to_string()))?
        .ok_or_else(|| skipped("文件不存在".to_string()))?;

    Ok(markup::parse_xhtml(&content))
}

/// 按目录锚点把一个文档切成多个章节
///
/// 每个章节从锚点元素之前开始，到下一个锚点元素之前（或正文末尾）结束。
/// 找不到的锚点和标签等于书名的锚点都会被忽略，只有空白的范围不产生章节。
pub fn split_by_fragments(document: &Html, entries: &[&TocEntry], book_title: &str) -> Vec<Chapter> {
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return Vec::new();
    };

    let ids = index_ids(document);
    let markers: Vec<(&str, ElementRef<'_>)> = entries
        .iter()
        .filter_map(|entry| {
            let fragment = entry.fragment.as_deref()?;
            let element = ids.get(fragment).copied();
            if element.is_none() {
                log::debug!("锚点 #{} 不存在", fragment);
            }
            Some((entry.label.as_str(), element?))
        })
        .filter(|(label, _)| !is_book_title(label, book_title))
        .collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(i, &(label, start))| {
            let end = markers.get(i + 1).map(|&(_, element)| element);
            let content = extract_range(body, start, end);
            if content.is_empty() {
                log::debug!("锚点章节 \"{}\" 没有正文，丢弃", label);
                return None;
            }
            Some(Chapter::new(label, content))
        })
        .collect()
}

/// 建立 id → 元素 的索引；重复的id以文档中第一次出现的为准
fn index_ids(document: &Html) -> HashMap<&str, ElementRef<'_>> {
    let mut ids = HashMap::new();
    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        if let Some(id) = element.value().id() {
            ids.entry(id).or_insert(element);
        }
    }
    ids
}
