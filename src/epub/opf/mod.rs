//! OPF（Open Packaging Format）文件解析模块
//!
//! 此模块提供EPUB文件中OPF包文件的解析功能，包括书名、清单、脊柱等信息的提取。

mod manifest;
mod parser;
mod spine;

pub use manifest::{Manifest, ManifestItem};
pub use parser::Opf;
pub use spine::SpineItem;
