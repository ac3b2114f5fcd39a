//! EPUB3 导航文档解析

use crate::epub::markup;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static NAV_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("nav").expect("valid nav selector"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid link selector"));

/// 目录导航的标记属性
const TOC_MARKERS: [&str; 2] = [r#"epub:type="toc""#, "epub:type='toc'"];

/// 导航文档中的一个链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// 链接文本（已去除首尾空白）
    pub label: String,
    /// href属性，可能带 `#锚点`
    pub href: String,
}

/// 解析前的快速检查：文本中是否出现目录导航标记
pub fn has_toc_marker(content: &str) -> bool {
    TOC_MARKERS.iter().any(|marker| content.contains(marker))
}

/// 解析导航文档，返回目录导航中标签和目标都存在的链接
///
/// 优先使用带 `epub:type="toc"` 的元素，没有时退回到第一个 `nav` 元素。
pub fn parse_nav_links(html: &str) -> Vec<NavLink> {
    let document = markup::parse_xhtml(html);

    let Some(toc) = find_toc_container(&document) else {
        return Vec::new();
    };

    toc.select(&LINK_SELECTOR)
        .filter_map(|link| {
            let label = link.text().collect::<String>().trim().to_string();
            let href = link.value().attr("href").unwrap_or_default().to_string();
            (!label.is_empty() && !href.is_empty()).then_some(NavLink { label, href })
        })
        .collect()
}

/// 查找目录导航容器
fn find_toc_container(document: &Html) -> Option<ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| is_toc_element(*element))
        .or_else(|| document.select(&NAV_SELECTOR).next())
}

/// `epub:type` 属性（空格分隔的列表）中是否包含 "toc"
fn is_toc_element(element: ElementRef<'_>) -> bool {
    element
        .value()
        .attrs()
        .any(|(name, value)| name == "epub:type" && value.split_whitespace().any(|t| t == "toc"))
}
