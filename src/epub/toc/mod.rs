//! 目录解析模块
//!
//! 生成“内容文件路径 → 目录条目列表”的映射。
//! 先尝试EPUB2的NCX文件，只有NCX没有产生任何条目时才尝试EPUB3的导航文档，两者从不合并。

pub mod nav;
pub mod ncx;

use crate::epub::error::{Degrade, EpubError, Result};
use crate::epub::package::Package;
use crate::epub::source::PackageSource;
use std::collections::HashMap;

/// 单个目录条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// 显示标签
    pub label: String,
    /// 文件内锚点（`#` 之后的部分），指向整个文件时为None
    pub fragment: Option<String>,
}

/// 按基础路径分组的目录条目，组内保持解析时遇到的顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocMap {
    entries: HashMap<String, Vec<TocEntry>>,
}

impl TocMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个目标为 `target` 的条目，`target` 可以带 `#锚点`
    pub fn add_entry(&mut self, target: &str, label: impl Into<String>) {
        let (base, fragment) = match target.split_once('#') {
            Some((base, rest)) => {
                let fragment = rest.split('#').next().unwrap_or_default();
                (base, (!fragment.is_empty()).then(|| fragment.to_string()))
            }
            None => (target, None),
        };

        self.entries.entry(base.to_string()).or_default().push(TocEntry {
            label: label.into(),
            fragment,
        });
    }

    /// 获取指向某个文件的全部条目
    pub fn entries_for(&self, base: &str) -> &[TocEntry] {
        self.entries.get(base).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 不同基础路径的数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 条目总数
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// 目录解析结果，标明来自哪种格式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocSource {
    /// EPUB2 NCX
    Legacy(TocMap),
    /// EPUB3 导航文档
    Modern(TocMap),
    /// 两种策略都没有产生条目
    None,
}

impl TocSource {
    /// 依次尝试两种策略，得到目录映射
    ///
    /// 任何加载或解析失败都只会让对应策略“没有结果”，不会向外传播。
    pub fn resolve<S: PackageSource + ?Sized>(source: &mut S, package: &Package) -> TocSource {
        if let Some(map) = resolve_legacy(source, package)
            .or_degrade("NCX目录不可用")
            .filter(|map| !map.is_empty())
        {
            log::debug!("使用NCX目录: {} 个文件, {} 个条目", map.len(), map.entry_count());
            return TocSource::Legacy(map);
        }

        let map = resolve_modern(source, package);
        if map.is_empty() {
            log::debug!("没有可用的目录，全部使用启发式标题");
            TocSource::None
        } else {
            log::debug!("使用导航文档目录: {} 个文件, {} 个条目", map.len(), map.entry_count());
            TocSource::Modern(map)
        }
    }

    /// 取出目录映射；没有目录时返回空映射
    pub fn into_map(self) -> TocMap {
        match self {
            TocSource::Legacy(map) | TocSource::Modern(map) => map,
            TocSource::None => TocMap::new(),
        }
    }

    /// 格式名称
    pub fn kind(&self) -> &'static str {
        match self {
            TocSource::Legacy(_) => "ncx",
            TocSource::Modern(_) => "nav",
            TocSource::None => "none",
        }
    }
}

/// 策略A：脊柱toc属性引用的NCX文件
fn resolve_legacy<S: PackageSource + ?Sized>(source: &mut S, package: &Package) -> Result<TocMap> {
    let mut map = TocMap::new();

    let Some(item) = package
        .legacy_toc_id
        .as_deref()
        .and_then(|id| package.manifest.get(id))
    else {
        return Ok(map);
    };

    let ncx_path = package.resolve_path(&item.href);
    let ncx_content = source
        .read_text_lossy(&ncx_path)?
        .ok_or_else(|| EpubError::DegradedToc(format!("NCX文件不存在: {}", ncx_path)))?;

    for point in ncx::parse_nav_points(&ncx_content)? {
        map.add_entry(&point.src, point.label);
    }

    Ok(map)
}

/// 策略B：清单中第一个带 `epub:type="toc"` 标记并产生条目的HTML文档
fn resolve_modern<S: PackageSource + ?Sized>(source: &mut S, package: &Package) -> TocMap {
    let mut map = TocMap::new();

    for item in package.manifest.iter().filter(|item| item.is_html()) {
        let path = package.resolve_path(&item.href);
        let Some(content) = source
            .read_text_lossy(&path)
            .or_degrade("无法读取导航文档候选")
            .flatten()
        else {
            continue;
        };

        if !nav::has_toc_marker(&content) {
            continue;
        }

        for link in nav::parse_nav_links(&content) {
            map.add_entry(&link.href, link.label);
        }

        if !map.is_empty() {
            log::debug!("导航文档: {}", path);
            break;
        }
    }

    map
}
