//! NCX（Navigation Control file for XML）解析
//!
//! 只提取章节切分需要的信息：每个导航点的标签和目标。
//! 导航点按文档顺序（先序，包括嵌套的子导航点）输出，不按playOrder重排。
//!
//! 标签和目标都在导航点的全部后代中查找：取文档顺序的第一个 `navLabel/text` 和第一个 `content`。
//! 自身缺少标签或目标的父导航点因此会继承第一个子导航点的值。

use crate::epub::error::Result;
use crate::epub::xml::{attr_value, text_content};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// 导航点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    /// 导航标签文本（已去除首尾空白）
    pub label: String,
    /// content元素的src属性，可能带 `#锚点`
    pub src: String,
}

/// 解析过程中尚未闭合的导航点
///
/// `Some` 表示已经遇到第一个匹配的后代元素，即使其值为空也不再改变。
#[derive(Debug, Default)]
struct PendingPoint {
    label: Option<String>,
    src: Option<String>,
}

/// 给栈中所有还没有值的导航点填上同一个值
fn fill_open_points(
    points: &mut [PendingPoint],
    stack: &[usize],
    value: &str,
    field: fn(&mut PendingPoint) -> &mut Option<String>,
) {
    for &index in stack {
        let slot = field(&mut points[index]);
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }
}

/// 解析NCX文件内容，返回标签和目标都存在的导航点
///
/// # 参数
/// * `xml_content` - NCX文件的XML内容
///
/// # 返回值
/// * `Result<Vec<NavPoint>>` - 文档顺序的导航点；XML格式错误时返回错误
pub fn parse_nav_points(xml_content: &str) -> Result<Vec<NavPoint>> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);
    reader.config_mut().expand_empty_elements = true;

    let mut buf = Vec::new();
    // 按开始标签的顺序记录所有导航点，栈中保存未闭合导航点的下标
    let mut points: Vec<PendingPoint> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut in_nav_label = false;
    let mut label_text: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"navPoint" => {
                    stack.push(points.len());
                    points.push(PendingPoint::default());
                    in_nav_label = false;
                }
                b"navLabel" if !stack.is_empty() => {
                    in_nav_label = true;
                }
                b"text" if in_nav_label => {
                    label_text = Some(String::new());
                }
                b"content" if !stack.is_empty() => {
                    let src = attr_value(e, b"src")?.unwrap_or_default();
                    fill_open_points(&mut points, &stack, &src, |point| &mut point.src);
                }
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"navPoint" => {
                    stack.pop();
                    in_nav_label = false;
                }
                b"navLabel" => {
                    in_nav_label = false;
                }
                b"text" => {
                    if let Some(text) = label_text.take() {
                        fill_open_points(&mut points, &stack, text.trim(), |point| &mut point.label);
                    }
                }
                _ => {}
            },
            Event::Text(ref e) => {
                if let Some(text) = label_text.as_mut() {
                    text.push_str(&text_content(e));
                }
            }
            Event::CData(ref e) => {
                if let Some(text) = label_text.as_mut() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(points
        .into_iter()
        .filter_map(|point| match (point.label, point.src) {
            (Some(label), Some(src)) if !label.is_empty() && !src.is_empty() => {
                Some(NavPoint { label, src })
            }
            _ => None,
        })
        .collect())
}
