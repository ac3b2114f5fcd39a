//! 解析结果：书籍与章节

use crate::typing::normalize_text;
use serde::{Deserialize, Serialize};

/// 单个章节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 章节标题，永远非空
    pub title: String,
    /// 纯文本内容，已去除首尾空白且非空，段落之间以空行分隔
    pub content: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// 内容的字符数
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// 解析完成的书籍
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// 书名
    pub title: String,
    /// 按阅读顺序排列的章节
    pub chapters: Vec<Chapter>,
}

impl Book {
    pub fn new(title: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            title: title.into(),
            chapters,
        }
    }

    /// 书籍内容的哈希，用作保存阅读进度的键
    ///
    /// 对所有章节 `标题 + 内容` 的UTF-16编码单元做 `h = h * 31 + c` 的32位滚动哈希，
    /// 结果以带符号的小写十六进制表示（例如 `-1a2b`）。
    pub fn content_hash(&self) -> String {
        let hash = self
            .chapters
            .iter()
            .flat_map(|chapter| chapter.title.encode_utf16().chain(chapter.content.encode_utf16()))
            .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));

        if hash < 0 {
            format!("-{:x}", hash.unsigned_abs())
        } else {
            format!("{:x}", hash)
        }
    }

    /// 所有章节内容都转换为键盘可输入字符后的副本
    pub fn normalized_for_typing(&self) -> Book {
        Book {
            title: self.title.clone(),
            chapters: self
                .chapters
                .iter()
                .map(|chapter| Chapter::new(chapter.title.clone(), normalize_text(&chapter.content)))
                .collect(),
        }
    }

    /// 全书总字符数
    pub fn total_chars(&self) -> usize {
        self.chapters.iter().map(Chapter::char_count).sum()
    }
}
