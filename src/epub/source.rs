//! 包成员访问模块
//!
//! 核心流水线只需要一种能力：按名称读取包内成员的文本。
//! 这里把这种能力抽象为 `PackageSource`，并为zip归档和内存映射提供实现。

use crate::epub::error::{EpubError, Result};
use log::warn;
use std::collections::HashMap;
use std::io::{self, Read, Seek};
use zip::ZipArchive;
use zip::result::ZipError;

/// 可以按名称读取成员文本的包
pub trait PackageSource {
    /// 读取指定成员的文本内容
    ///
    /// # 返回值
    /// * `Ok(Some(text))` - 成员存在且可读
    /// * `Ok(None)` - 成员不存在
    /// * `Err(..)` - 成员存在但无法读取（损坏、非UTF-8等）
    fn read_text(&mut self, name: &str) -> Result<Option<String>>;

    /// 读取指定成员的文本，非法UTF-8字节替换为U+FFFD
    ///
    /// 用于章节和导航文档：个别坏字节不应让整个文件作废。
    /// 入口描述文件和OPF仍然走严格的 `read_text`。
    fn read_text_lossy(&mut self, name: &str) -> Result<Option<String>> {
        self.read_text(name)
    }
}

/// 读取zip成员的原始字节，成员不存在时返回 `None`
fn read_zip_bytes<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(EpubError::Zip(e)),
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

impl<R: Read + Seek> PackageSource for ZipArchive<R> {
    fn read_text(&mut self, name: &str) -> Result<Option<String>> {
        match read_zip_bytes(self, name)? {
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn read_text_lossy(&mut self, name: &str) -> Result<Option<String>> {
        Ok(read_zip_bytes(self, name)?.map(|bytes| match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} 含有非法UTF-8字节，已替换", name);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        }))
    }
}

impl<S: PackageSource + ?Sized> PackageSource for &mut S {
    fn read_text(&mut self, name: &str) -> Result<Option<String>> {
        (**self).read_text(name)
    }

    fn read_text_lossy(&mut self, name: &str) -> Result<Option<String>> {
        (**self).read_text_lossy(name)
    }
}

/// 内存中的包，成员名到文本的映射
#[derive(Debug, Clone, Default)]
pub struct MemoryPackage {
    members: HashMap<String, String>,
}

impl MemoryPackage {
    /// 创建空的内存包
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加成员，返回自身以便链式调用
    pub fn with_member(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    /// 添加或替换成员
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.members.insert(name.into(), content.into());
    }

    /// 成员数量
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl PackageSource for MemoryPackage {
    fn read_text(&mut self, name: &str) -> Result<Option<String>> {
        Ok(self.members.get(name).cloned())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryPackage {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut package = MemoryPackage::new();
        for (name, content) in iter {
            package.insert(name, content);
        }
        package
    }
}
