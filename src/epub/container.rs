//! 入口描述文件（META-INF/container.xml）解析

use crate::epub::error::{EpubError, Result};
use crate::epub::xml::attr_value;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// 入口描述文件在包内的固定位置
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone)]
pub struct RootFile {
    pub full_path: String,
}

/// Container.xml的解析结果
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 解析container.xml内容
    ///
    /// # 参数
    /// * `xml_content` - container.xml的文件内容
    ///
    /// # 返回值
    /// * `Result<Container, EpubError>` - 解析后的Container信息，
    ///   没有任何带 `full-path` 的rootfile时返回 `MalformedPackage`
    pub fn parse_xml(xml_content: &str) -> Result<Container> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf);
            match event.map_err(|e| {
                EpubError::MalformedPackage(format!("container.xml格式错误: {}", e))
            })? {
                Event::Start(ref e) if e.local_name().as_ref() == b"rootfile" => {
                    if let Some(full_path) = attr_value(e, b"full-path")?.filter(|path| !path.is_empty()) {
                        rootfiles.push(RootFile { full_path });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::MalformedPackage(
                "container.xml中没有找到带full-path的rootfile".to_string(),
            ));
        }

        Ok(Container { rootfiles })
    }

    /// 获取根描述文件（OPF）的路径
    ///
    /// 取文档顺序中第一个rootfile。
    pub fn get_opf_path(&self) -> Option<&str> {
        self.rootfiles.first().map(|rf| rf.full_path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_container_xml() {
        let container_xml = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
        <rootfile full-path="OEBPS/alt.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

        let container = Container::parse_xml(container_xml).unwrap();
        assert_eq!(container.rootfiles.len(), 2);
        assert_eq!(container.get_opf_path(), Some("OEBPS/content.opf"));
    }

    #[test]
    fn test_rootfile_without_media_type() {
        let container_xml = r#"<container><rootfiles><rootfile full-path="content.opf"/></rootfiles></container>"#;

        let container = Container::parse_xml(container_xml).unwrap();
        assert_eq!(container.get_opf_path(), Some("content.opf"));
    }

    #[test]
    fn test_missing_full_path_is_malformed() {
        let container_xml = r#"<container><rootfiles><rootfile media-type="application/oebps-package+xml"/></rootfiles></container>"#;

        let result = Container::parse_xml(container_xml);
        assert!(matches!(result, Err(EpubError::MalformedPackage(_))));
    }
}
