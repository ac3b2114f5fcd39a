//! XHTML预处理
//!
//! EPUB的内容文档是XHTML，但scraper按HTML5规则解析。HTML5不认识非空元素的自闭合写法：
//! `<title/>` 会让分词器进入RCDATA状态，`<script src="x.js"/>` 会进入原始文本状态，
//! 后面的正文全部被当成这个元素的文本吞掉。解析前把这类标签展开成成对的开闭标签。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::Html;
use std::borrow::Cow;

static SELF_CLOSING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z][A-Za-z0-9:_.-]*)(\s[^<>]*?)?\s*/>").expect("valid self-closing regex")
});

/// HTML5空元素，本身没有结束标签
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name))
}

/// 把非空元素的自闭合标签改写成开闭标签对，空元素保持原样
pub fn expand_self_closing(content: &str) -> Cow<'_, str> {
    SELF_CLOSING.replace_all(content, |caps: &Captures| {
        let name = &caps[1];
        if is_void(name) {
            return caps[0].to_string();
        }
        let attrs = caps.get(2).map_or("", |m| m.as_str());
        format!("<{}{}></{}>", name, attrs, name)
    })
}

/// 解析一个XHTML文档
pub fn parse_xhtml(content: &str) -> Html {
    Html::parse_document(&expand_self_closing(content))
}
