//! 包解析模块
//!
//! 从入口描述文件（container.xml）定位根描述文件（OPF），
//! 并解析出书名、清单、阅读顺序、目录前缀和NCX引用。

use crate::epub::config::ParseOptions;
use crate::epub::container::{CONTAINER_PATH, Container};
use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{Manifest, ManifestItem, Opf};
use crate::epub::source::PackageSource;

/// 解析完成的包结构
///
/// 要么完整得到，要么整体失败，不存在部分结果。
#[derive(Debug, Clone)]
pub struct Package {
    /// 书名（缺失或为空时使用占位标题）
    pub title: String,
    /// package元素上声明的EPUB版本，未声明时为空
    pub version: String,
    /// 清单
    pub manifest: Manifest,
    /// 阅读顺序，只包含能在清单中解析的条目
    pub reading_order: Vec<ManifestItem>,
    /// OPF所在目录，带结尾的 `/`；OPF位于包根目录时为空
    pub directory_prefix: String,
    /// 脊柱上声明的NCX清单ID
    pub legacy_toc_id: Option<String>,
}

impl Package {
    /// 解析包结构
    ///
    /// # 返回值
    /// * `Result<Package>` - 入口描述文件缺失、缺少OPF路径或OPF不可读时返回 `MalformedPackage`
    pub fn resolve<S: PackageSource + ?Sized>(source: &mut S, options: &ParseOptions) -> Result<Package> {
        let container_xml = source
            .read_text(CONTAINER_PATH)
            .map_err(|e| EpubError::MalformedPackage(format!("无法读取{}: {}", CONTAINER_PATH, e)))?
            .ok_or_else(|| EpubError::MalformedPackage(format!("缺少{}", CONTAINER_PATH)))?;

        let container = Container::parse_xml(&container_xml)?;
        let opf_path = container
            .get_opf_path()
            .ok_or_else(|| EpubError::MalformedPackage("container.xml中没有OPF路径".to_string()))?
            .to_string();

        let opf_content = source
            .read_text(&opf_path)
            .map_err(|e| EpubError::MalformedPackage(format!("无法读取OPF文件 {}: {}", opf_path, e)))?
            .ok_or_else(|| EpubError::MalformedPackage(format!("OPF文件不存在: {}", opf_path)))?;

        let opf = Opf::parse_xml(&opf_content)
            .map_err(|e| EpubError::MalformedPackage(format!("OPF文件 {} 解析失败: {}", opf_path, e)))?;

        let title = opf
            .title
            .clone()
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| options.untitled_title.clone());
        let reading_order = opf.reading_order();

        log::debug!(
            "解析OPF {}: 清单 {} 项, 阅读顺序 {} 项",
            opf_path,
            opf.manifest.len(),
            reading_order.len()
        );

        Ok(Package {
            title,
            version: opf.version,
            reading_order,
            directory_prefix: directory_prefix(&opf_path),
            legacy_toc_id: opf.spine_toc,
            manifest: opf.manifest,
        })
    }

    /// 把相对于OPF的路径转换为包内完整路径
    pub fn resolve_path(&self, href: &str) -> String {
        format!("{}{}", self.directory_prefix, href)
    }
}

/// 计算路径的目录前缀（保留结尾的 `/`）
fn directory_prefix(path: &str) -> String {
    match path.rfind('/') {
        Some(pos) => path[..=pos].to_string(),
        None => String::new(),
    }
}
