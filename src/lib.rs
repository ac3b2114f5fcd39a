pub mod epub;
pub mod typing;

// === 核心API重新导出 ===

/// EPUB文件读取器（主要接口）
pub use epub::Epub;

/// 解析入口
pub use epub::{parse_book, parse_book_with_options};

/// 错误处理
pub use epub::{EpubError, Result};

// === 数据结构 ===

/// 书籍与章节
pub use epub::{Book, Chapter};

/// 解析选项
pub use epub::ParseOptions;

// === 底层组件（高级用法） ===

/// 包成员访问
pub use epub::{MemoryPackage, PackageSource};

/// 包结构组件
pub use epub::{Container, Manifest, ManifestItem, Opf, Package, RootFile, SpineItem};

/// 目录组件
pub use epub::{TocEntry, TocMap, TocSource};

// === 库信息 ===

/// ChapterForge库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// ChapterForge库的描述
pub const DESCRIPTION: &str = "从EPUB文件中提取按阅读顺序排列的纯文本章节";

// === 便捷函数 ===

/// 快速打开EPUB文件
///
/// 这是 `Epub::open` 的便捷包装函数。
///
/// # 示例
///
/// ```rust,no_run
/// let mut epub = chapterforge::open("book.epub")?;
/// let book = epub.parse_book()?;
/// println!("书名: {}", book.title);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Epub> {
    Epub::open(path)
}

/// 打开并解析EPUB文件
///
/// # 示例
///
/// ```rust,no_run
/// let book = chapterforge::parse_file("book.epub")?;
/// for chapter in &book.chapters {
///     println!("{}: {} 字", chapter.title, chapter.char_count());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> Result<Book> {
    open(path)?.parse_book()
}
