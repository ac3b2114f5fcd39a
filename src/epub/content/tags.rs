//! 标签处理方式表
//!
//! 文本提取和标题启发式共用同一张表。

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// 标签在文本提取时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagTreatment {
    /// 连同子树一起丢弃
    Drop,
    /// 块级元素，前后插入段落分隔
    Block,
    /// 行内元素，直接递归
    Inline,
}

static TAG_TABLE: Lazy<HashMap<&'static str, TagTreatment>> = Lazy::new(|| {
    let drop = ["script", "style", "nav", "header", "footer"];
    let block = [
        "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "br",
    ];

    drop.into_iter()
        .map(|tag| (tag, TagTreatment::Drop))
        .chain(block.into_iter().map(|tag| (tag, TagTreatment::Block)))
        .collect()
});

/// 标题启发式依次尝试的标题级别
pub const TITLE_HEADINGS: [&str; 3] = ["h1", "h2", "h3"];

/// 查询标签的处理方式，未登记的标签按行内处理
pub fn treatment(tag: &str) -> TagTreatment {
    if let Some(&treatment) = TAG_TABLE.get(tag) {
        return treatment;
    }
    TAG_TABLE
        .get(tag.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(TagTreatment::Inline)
}
