//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义。

use std::collections::HashMap;

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型，缺失时为空字符串
    pub media_type: String,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: impl Into<String>, href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
        }
    }

    /// 是否为可提取文本的标记内容（媒体类型包含 "html" 或 "xml"）
    pub fn is_markup(&self) -> bool {
        self.media_type.contains("html") || self.media_type.contains("xml")
    }

    /// 是否为HTML类文档（可能是导航文档的候选）
    pub fn is_html(&self) -> bool {
        self.media_type.contains("html")
    }
}

/// 清单，保留声明顺序并支持按ID查找
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    items: Vec<ManifestItem>,
    index: HashMap<String, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入清单项；ID重复时替换旧值但保留其原有位置
    pub fn insert(&mut self, item: ManifestItem) {
        match self.index.get(&item.id) {
            Some(&pos) => self.items[pos] = item,
            None => {
                self.index.insert(item.id.clone(), self.items.len());
                self.items.push(item);
            }
        }
    }

    /// 根据ID获取清单项
    pub fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    /// 按声明顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ManifestItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_detection() {
        assert!(ManifestItem::new("a", "a.xhtml", "application/xhtml+xml").is_markup());
        assert!(ManifestItem::new("b", "b.html", "text/html").is_markup());
        assert!(ManifestItem::new("n", "toc.ncx", "application/x-dtbncx+xml").is_markup());
        assert!(!ManifestItem::new("c", "c.css", "text/css").is_markup());
        assert!(!ManifestItem::new("i", "i.jpg", "image/jpeg").is_markup());
        assert!(!ManifestItem::new("x", "x", "").is_markup());
    }

    #[test]
    fn test_duplicate_id_keeps_position() {
        let mut manifest = Manifest::new();
        manifest.insert(ManifestItem::new("a", "a1.xhtml", "text/html"));
        manifest.insert(ManifestItem::new("b", "b.xhtml", "text/html"));
        manifest.insert(ManifestItem::new("a", "a2.xhtml", "text/html"));

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("a").unwrap().href, "a2.xhtml");
        let order: Vec<&str> = manifest.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }
}
