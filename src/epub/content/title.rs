//! 章节标题启发式
//!
//! 目录没有可用标签时，按固定优先级尝试多种策略，第一个成功的策略胜出。

use crate::epub::config::ParseOptions;
use crate::epub::content::extract::extract_text;
use crate::epub::content::tags::TITLE_HEADINGS;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static HEADING_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    TITLE_HEADINGS
        .iter()
        .map(|tag| Selector::parse(tag).expect("valid heading selector"))
        .collect()
});
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("valid body selector"));
static CHAPTER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^chapter\s+[0-9ivxlc]+").expect("valid chapter line pattern"));

/// 编号行与副标题之间的连接符
const TITLE_JOINER: &str = " — ";

/// 与书名比较（忽略大小写的完全相等）
pub fn is_book_title(text: &str, book_title: &str) -> bool {
    text.to_lowercase() == book_title.to_lowercase()
}

/// 为单章节文件寻找最合适的标题
///
/// # 参数
/// * `document` - 已解析的内容文档
/// * `book_title` - 书名，与之相同的候选会被跳过
/// * `fallback_number` - 兜底标题使用的编号（从1开始）
/// * `options` - 解析选项
///
/// # 返回值
/// * `String` - 永远非空的章节标题
pub fn find_chapter_title(
    document: &Html,
    book_title: &str,
    fallback_number: usize,
    options: &ParseOptions,
) -> String {
    let accept = |text: String| -> Option<String> {
        let text = text.trim().to_string();
        (!text.is_empty()
            && text.chars().count() < options.title_max_chars
            && !is_book_title(&text, book_title))
        .then_some(text)
    };

    // 1. 各级标题，每级只看第一个
    for selector in HEADING_SELECTORS.iter() {
        if let Some(title) = document.select(selector).next().map(element_text).and_then(accept) {
            return title;
        }
    }

    // 2. class或id带有标题提示的第一个元素
    if let Some(title) = find_hinted_element(document, &options.title_hints)
        .map(element_text)
        .and_then(accept)
    {
        return title;
    }

    // 3. 文档的<title>
    if let Some(title) = document.select(&TITLE_SELECTOR).next().map(element_text).and_then(accept) {
        return title;
    }

    // 4/5. 正文开头几行
    if let Some(title) = title_from_leading_lines(document, book_title, options) {
        return title;
    }

    options.fallback_title(fallback_number)
}

/// 元素的全部文本，空白合并为单个空格
fn element_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// 按文档顺序查找class或id包含任一提示子串的第一个元素（区分大小写）
fn find_hinted_element<'a>(document: &'a Html, hints: &[String]) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| {
            let value = element.value();
            [value.attr("class"), value.attr("id")]
                .into_iter()
                .flatten()
                .any(|attr| hints.iter().any(|hint| attr.contains(hint.as_str())))
        })
}

/// 根据正文前两行非空文本推断标题
fn title_from_leading_lines(document: &Html, book_title: &str, options: &ParseOptions) -> Option<String> {
    let body = document.select(&BODY_SELECTOR).next()?;
    let text = extract_text(body);
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    let first = lines.next()?;
    let short_line = |line: &str| line.chars().count() < options.line_title_max_chars && !line.contains('.');

    if CHAPTER_LINE.is_match(first) {
        if let Some(second) = lines.next().filter(|line| short_line(line)) {
            return Some(format!("{}{}{}", first, TITLE_JOINER, second));
        }
    }

    (short_line(first) && !is_book_title(first, book_title)).then(|| first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(html: &str, book_title: &str) -> String {
        let document = Html::parse_document(html);
        find_chapter_title(&document, book_title, 4, &ParseOptions::default())
    }

    #[test]
    fn test_heading_wins_over_class_hint() {
        let html = r#"<html><body><p class="chapter-title">From class</p><h2>From heading</h2></body></html>"#;
        assert_eq!(title_of(html, "Book"), "From heading");
    }

    #[test]
    fn test_heading_levels_in_priority_order() {
        let html = "<html><body><h3>Third</h3><h2>Second</h2></body></html>";
        assert_eq!(title_of(html, "Book"), "Second");
    }

    #[test]
    fn test_heading_matching_book_title_is_skipped() {
        let html = "<html><body><h1>THE BOOK</h1><h2>  The\n  Real   Chapter </h2></body></html>";
        assert_eq!(title_of(html, "The Book"), "The Real Chapter");
    }

    #[test]
    fn test_class_and_id_hints() {
        let by_class = r#"<html><body><div class="titlepage">Opening</div><p>Text.</p></body></html>"#;
        assert_eq!(title_of(by_class, "Book"), "Opening");

        let by_id = r#"<html><body><span id="chapter-7">Seven</span><p>Text.</p></body></html>"#;
        assert_eq!(title_of(by_id, "Book"), "Seven");

        // 区分大小写
        let upper = r#"<html><body><span class="TITLE">Loud.</span><p>Some text here.</p></body></html>"#;
        assert_eq!(title_of(upper, "Book"), "Chapter 4");
    }

    #[test]
    fn test_title_element() {
        let html = "<html><head><title>Head Title</title></head><body><p>Plain text here.</p></body></html>";
        assert_eq!(title_of(html, "Book"), "Head Title");
    }

    #[test]
    fn test_title_element_matching_book_title_is_skipped() {
        let html = "<html><head><title>Book</title></head><body><p>A Quiet Morning</p><p>It rained.</p></body></html>";
        assert_eq!(title_of(html, "Book"), "A Quiet Morning");
    }

    #[test]
    fn test_chapter_number_with_subtitle() {
        let html = "<html><body><p>Chapter III</p><p>The Departure</p><p>They left at dawn.</p></body></html>";
        assert_eq!(title_of(html, "Book"), "Chapter III — The Departure");
    }

    #[test]
    fn test_chapter_number_with_long_second_line() {
        let html = "<html><body><p>CHAPTER 12</p><p>It was a long day. Nobody came.</p></body></html>";
        assert_eq!(title_of(html, "Book"), "CHAPTER 12");
    }

    #[test]
    fn test_first_line_matching_book_title_falls_back() {
        let html = "<html><body><p>book</p><p>Text.</p></body></html>";
        assert_eq!(title_of(html, "Book"), "Chapter 4");
    }

    #[test]
    fn test_fallback_when_nothing_fits() {
        let html = "<html><body><p>It was a dark and stormy night.</p></body></html>";
        assert_eq!(title_of(html, "Book"), "Chapter 4");
    }

    #[test]
    fn test_overlong_candidates_rejected() {
        let long = "x".repeat(200);
        let html = format!("<html><body><h1>{}</h1><p>Ends with a period.</p></body></html>", long);
        assert_eq!(title_of(&html, "Book"), "Chapter 4");
    }

    #[test]
    fn test_is_book_title() {
        assert!(is_book_title("The Book", "the book"));
        assert!(!is_book_title("The Book ", "the book"));
    }
}
