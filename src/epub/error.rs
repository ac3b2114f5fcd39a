use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// Epub相关的错误类型
///
/// 只有 `MalformedPackage`（以及底层的IO/Zip错误）会让整本书的解析失败，
/// 其余错误都在流水线内部被吸收，最终只体现为章节列表的形状。
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML解析错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("文件不是有效的EPUB包: {0}")]
    MalformedPackage(String),

    #[error("目录解析失败: {0}")]
    DegradedToc(String),

    #[error("跳过内容文件 {path}: {reason}")]
    SkippedContent { path: String, reason: String },

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}

impl EpubError {
    /// 是否为致命错误（会中止整本书的解析）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EpubError::MalformedPackage(_) | EpubError::Io(_) | EpubError::Zip(_)
        )
    }
}

/// 把可失败的操作显式降级为“跳过”
///
/// 用于目录策略和单个内容文件这类允许失败的位置：失败时记录日志并返回 `None`。
pub trait Degrade<T> {
    fn or_degrade(self, context: &str) -> Option<T>;
}

impl<T> Degrade<T> for Result<T> {
    fn or_degrade(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e @ EpubError::SkippedContent { .. }) => {
                log::debug!("{}: {}", context, e);
                None
            }
            Err(e) => {
                log::warn!("{}: {}", context, e);
                None
            }
        }
    }
}
