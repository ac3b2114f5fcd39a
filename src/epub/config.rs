//! 解析选项配置模块
//!
//! 提供章节提取时使用的可调参数，支持从YAML文件加载和保存配置。

use crate::epub::error::{EpubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 章节提取选项
///
/// 默认值即标准行为，一般无需修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// 书名缺失时使用的占位标题
    pub untitled_title: String,
    /// 兜底章节标题的前缀，生成形如 "Chapter 3" 的标题
    pub fallback_title_prefix: String,
    /// 标题候选允许的最大字符数（不含）
    pub title_max_chars: usize,
    /// 正文首行作为标题时允许的最大字符数（不含）
    pub line_title_max_chars: usize,
    /// class或id中包含这些子串的元素被视为标题候选
    pub title_hints: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            untitled_title: "Untitled".to_string(),
            fallback_title_prefix: "Chapter".to_string(),
            title_max_chars: 200,
            line_title_max_chars: 80,
            title_hints: vec![
                "title".to_string(),
                "chapter".to_string(),
                "heading".to_string(),
            ],
        }
    }
}

impl ParseOptions {
    /// 从YAML文件加载配置，未出现的字段使用默认值
    ///
    /// # 示例
    ///
    /// ```rust,no_run
    /// use chapterforge::ParseOptions;
    /// let options = ParseOptions::from_file("chapterforge.yaml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// 从YAML文本解析配置
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 序列化为YAML文本
    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self)
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))
    }

    /// 把默认配置写入指定路径
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = Self::default().to_yaml()?;

        let content_with_header = format!(
            "# chapterforge 解析选项\n# 未列出的字段使用默认值\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))
    }

    /// 生成兜底章节标题
    pub fn fallback_title(&self, number: usize) -> String {
        format!("{} {}", self.fallback_title_prefix, number)
    }
}
