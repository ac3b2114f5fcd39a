//! quick-xml 事件读取的公共辅助函数

use crate::epub::error::{EpubError, Result};
use quick_xml::events::{BytesStart, BytesText};

/// 读取元素上指定本地名称的属性值（忽略命名空间前缀）
pub(crate) fn attr_value(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|err| EpubError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(String::from_utf8_lossy(&attr.value).to_string()));
        }
    }
    Ok(None)
}

/// 取出文本节点内容
///
/// 遇到无法识别的实体（如XHTML的 `&nbsp;`）时退回原始文本，而不是让整个文档失败。
pub(crate) fn text_content(e: &BytesText) -> String {
    match e.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(e).to_string(),
    }
}
