//! 内容处理模块
//!
//! 章节切分、标题启发式和纯文本提取。

pub mod extract;
pub mod segment;
pub mod tags;
pub mod title;

pub use extract::{extract_range, extract_text};
pub use segment::segment_chapters;
pub use title::find_chapter_title;
