//! 打字练习辅助
//!
//! 把章节内容转换为键盘可直接输入的字符，并跳过版权页、目录这类前置内容。
//! 这些函数只消费解析结果，不参与解析流程。

use crate::epub::book::Chapter;
use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n+").expect("valid paragraph break pattern"));
static MULTIPLE_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"  +").expect("valid space run pattern"));

/// 段落分隔在打字文本中的表示（需要按回车输入）
pub const PARAGRAPH_MARK: char = '¶';

/// 以这些标题（可带 "the " 前缀）开头的章节视为前置内容
const FRONT_MATTER_TITLES: &[&str] = &[
    "cover",
    "copyright",
    "rights",
    "license",
    "legal notice",
    "table of contents",
    "contents",
    "toc",
    "dedication",
    "epigraph",
    "frontispiece",
    "preface",
    "foreword",
    "prologue",
    "acknowledgments",
    "acknowledgements",
    "about the author",
    "front matter",
    "title page",
];

/// 正文中出现这些短语的章节视为版权声明
const FRONT_MATTER_PHRASES: &[&str] = &[
    "public domain",
    "project gutenberg",
    "all rights reserved",
    "copyright ©",
];

/// 短于该字符数的章节视为标题页之类的前置内容
const MIN_CONTENT_CHARS: usize = 300;

/// 把排版字符替换为键盘字符
///
/// 段落分隔替换为 `¶`，其余换行替换为空格，连续空格合并为一个。
pub fn normalize_text(text: &str) -> String {
    let mut mapped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '«' | '»' | '″' => mapped.push('"'),
            '\u{2018}' | '\u{2019}' | '‹' | '›' | '′' => mapped.push('\''),
            '—' | '–' => mapped.push('-'),
            '…' => mapped.push_str("..."),
            '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' => mapped.push(' '),
            '×' => mapped.push('x'),
            other => mapped.push(other),
        }
    }

    let paragraphs = PARAGRAPH_BREAK.replace_all(&mapped, PARAGRAPH_MARK.to_string().as_str());
    let joined = paragraphs.replace('\n', " ");
    MULTIPLE_SPACES.replace_all(&joined, " ").into_owned()
}

/// 判断章节是否像前置内容（封面、版权页、目录等）
pub fn is_front_matter(chapter: &Chapter) -> bool {
    let title = chapter.title.trim().to_lowercase();
    let is_listed_title = FRONT_MATTER_TITLES.iter().any(|skip| {
        title == *skip || title.strip_prefix("the ").is_some_and(|rest| rest == *skip)
    });
    if is_listed_title {
        return true;
    }

    // 按UTF-16长度比较，与保存的进度数据保持一致
    if chapter.content.encode_utf16().count() < MIN_CONTENT_CHARS {
        return true;
    }

    let content = chapter.content.to_lowercase();
    FRONT_MATTER_PHRASES.iter().any(|phrase| content.contains(phrase))
}

/// 第一个不是前置内容的章节下标；全部都是前置内容时返回0
pub fn starting_chapter(chapters: &[Chapter]) -> usize {
    chapters
        .iter()
        .position(|chapter| !is_front_matter(chapter))
        .unwrap_or(0)
}
