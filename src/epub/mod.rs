pub mod book;
pub mod config;
pub mod container;
pub mod content;
pub mod error;
pub mod markup;
pub mod opf;
pub mod package;
pub mod reader;
pub mod source;
pub mod toc;
mod xml;

// 重新导出错误处理
pub use error::{Degrade, EpubError, Result};

// 重新导出解析结果
pub use book::{Book, Chapter};

// 重新导出EPUB读取器和解析入口
pub use reader::{Epub, parse_book, parse_book_with_options};

// 重新导出配置
pub use config::ParseOptions;

// 重新导出包结构相关
pub use container::{Container, RootFile};
pub use opf::{Manifest, ManifestItem, Opf, SpineItem};
pub use package::Package;
pub use source::{MemoryPackage, PackageSource};

// 重新导出目录相关
pub use toc::{TocEntry, TocMap, TocSource};
