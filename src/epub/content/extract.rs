//! 纯文本提取
//!
//! 深度优先遍历元素的子节点，在块级元素边界插入段落分隔（空行），
//! 丢弃非内容元素，最后统一规范化空白。

use crate::epub::content::tags::{TagTreatment, treatment};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use scraper::node::Node;

static HORIZONTAL_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("valid whitespace pattern"));
static SPACE_AROUND_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?\n ?").expect("valid newline pattern"));
static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline run pattern"));

/// 遍历阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// 尚未到达范围起点
    Before,
    /// 位于范围内，收集文本
    Inside,
    /// 已越过范围终点
    Done,
}

/// 按文档顺序推进的范围游标
///
/// 范围从 `start` 元素之前开始，到 `end` 元素之前结束；
/// 没有 `end` 时一直延续到被遍历元素的最后一个子节点之后。
#[derive(Debug, Clone, Copy)]
struct RangeCursor<'a> {
    start: Option<ElementRef<'a>>,
    end: Option<ElementRef<'a>>,
    phase: Phase,
}

impl<'a> RangeCursor<'a> {
    fn whole() -> Self {
        Self {
            start: None,
            end: None,
            phase: Phase::Inside,
        }
    }

    fn between(start: ElementRef<'a>, end: Option<ElementRef<'a>>) -> Self {
        Self {
            start: Some(start),
            end,
            phase: Phase::Before,
        }
    }

    fn inside(&self) -> bool {
        self.phase == Phase::Inside
    }
}

/// 提取元素全部子节点的纯文本
pub fn extract_text(element: ElementRef<'_>) -> String {
    let mut cursor = RangeCursor::whole();
    normalize_whitespace(&collect(element, &mut cursor))
}

/// 提取 `root` 内从 `start` 之前到 `end` 之前（或 `root` 末尾）的纯文本
///
/// `end` 在文档中位于 `start` 之前时范围为空。
pub fn extract_range<'a>(root: ElementRef<'a>, start: ElementRef<'a>, end: Option<ElementRef<'a>>) -> String {
    let mut cursor = RangeCursor::between(start, end);
    normalize_whitespace(&collect(root, &mut cursor))
}

/// 递归收集子树文本，返回新字符串，由调用方拼接
fn collect<'a>(element: ElementRef<'a>, cursor: &mut RangeCursor<'a>) -> String {
    let mut text = String::new();

    for node in element.children() {
        if cursor.phase == Phase::Done {
            break;
        }

        match node.value() {
            Node::Text(content) => {
                if cursor.inside() {
                    text.push_str(content);
                }
            }
            Node::Element(child) => {
                let Some(child_element) = ElementRef::wrap(node) else {
                    continue;
                };

                if cursor.end == Some(child_element) {
                    cursor.phase = Phase::Done;
                    break;
                }
                if cursor.start == Some(child_element) {
                    cursor.phase = Phase::Inside;
                }

                let kind = treatment(child.name());
                let was_inside = cursor.inside();

                if kind == TagTreatment::Block && was_inside && !text.is_empty() && !text.ends_with('\n') {
                    text.push_str("\n\n");
                }

                // 丢弃的子树仍需遍历，范围边界可能位于其中
                let inner = collect(child_element, cursor);
                if kind == TagTreatment::Drop {
                    continue;
                }
                text.push_str(&inner);

                if kind == TagTreatment::Block && (was_inside || !inner.is_empty()) && !text.ends_with('\n') {
                    text.push_str("\n\n");
                }
            }
            _ => {}
        }
    }

    text
}

/// 规范化空白：合并水平空白，去掉换行两侧的空格，
/// 把三个及以上的连续换行压缩为两个，并去除首尾空白
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = HORIZONTAL_WHITESPACE.replace_all(text, " ");
    let tightened = SPACE_AROUND_NEWLINE.replace_all(&collapsed, "\n");
    EXCESS_NEWLINES.replace_all(&tightened, "\n\n").trim().to_string()
}
