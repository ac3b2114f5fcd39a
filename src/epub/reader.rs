use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use crate::epub::book::Book;
use crate::epub::config::ParseOptions;
use crate::epub::content::segment_chapters;
use crate::epub::error::Result;
use crate::epub::package::Package;
use crate::epub::source::PackageSource;
use crate::epub::toc::TocSource;

/// 表示一个EPUB文件
pub struct Epub<R = File> {
    archive: ZipArchive<R>,
}

impl Epub<File> {
    /// 从文件路径创建Epub实例
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    ///
    /// # 返回值
    /// * `Result<Epub>` - 文件无法打开或不是zip归档时返回错误
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Epub> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl Epub<Cursor<Vec<u8>>> {
    /// 从内存中的字节创建Epub实例
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> Epub<R> {
    /// 从任意可随机读取的数据源创建Epub实例
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Epub { archive })
    }

    /// 列出EPUB文件中的所有条目
    pub fn list_files(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// 使用默认选项解析整本书
    pub fn parse_book(&mut self) -> Result<Book> {
        parse_book(self)
    }

    /// 使用指定选项解析整本书
    pub fn parse_book_with_options(&mut self, options: &ParseOptions) -> Result<Book> {
        parse_book_with_options(self, options)
    }
}

impl<R: Read + Seek> PackageSource for Epub<R> {
    fn read_text(&mut self, name: &str) -> Result<Option<String>> {
        self.archive.read_text(name)
    }

    fn read_text_lossy(&mut self, name: &str) -> Result<Option<String>> {
        self.archive.read_text_lossy(name)
    }
}

/// 使用默认选项解析一个包
pub fn parse_book<S: PackageSource + ?Sized>(source: &mut S) -> Result<Book> {
    parse_book_with_options(source, &ParseOptions::default())
}

/// 解析一个包，得到书名和按阅读顺序排列的章节
///
/// 流程：包结构 → 目录 → 章节切分。
/// 只有包结构解析失败会返回错误；目录和单个内容文件的问题只会让结果中的章节变少。
pub fn parse_book_with_options<S: PackageSource + ?Sized>(source: &mut S, options: &ParseOptions) -> Result<Book> {
    let package = Package::resolve(source, options)?;
    let toc = TocSource::resolve(source, &package);
    let toc_kind = toc.kind();
    let toc_map = toc.into_map();

    let chapters = segment_chapters(source, &package, &toc_map, options);

    log::info!(
        "解析完成: 《{}》(EPUB {}), 目录来源 {}, 阅读顺序 {} 项, 章节 {} 个",
        package.title,
        package.version,
        toc_kind,
        package.reading_order.len(),
        chapters.len()
    );

    Ok(Book::new(package.title, chapters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::book::Chapter;
    use crate::epub::container::CONTAINER_PATH;
    use crate::epub::error::EpubError;
    use crate::epub::source::MemoryPackage;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

    /// 在内存中打包成员，返回zip字节
    fn build_epub(members: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in members {
            zip.start_file(*name, FileOptions::<()>::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn xhtml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><meta charset="utf-8"/></head>
<body>{}</body>
</html>"#,
            body
        )
    }

    fn single_chapter_opf(title: &str, spine_attrs: &str, extra_items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="2.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">{}</metadata>
    <manifest>
        <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
        {}
    </manifest>
    <spine {}>
        <itemref idref="ch1"/>
    </spine>
</package>"#,
            title, extra_items, spine_attrs
        )
    }

    #[test]
    fn test_minimal_package_round_trip() {
        let opf = single_chapter_opf("", "", "");
        let chapter = xhtml("<h1>Intro</h1><p>Hello world.</p>");
        let bytes = build_epub(&[
            ("mimetype", "application/epub+zip"),
            (CONTAINER_PATH, CONTAINER),
            ("OEBPS/content.opf", &opf),
            ("OEBPS/ch1.xhtml", &chapter),
        ]);

        let book = Epub::from_bytes(bytes).unwrap().parse_book().unwrap();
        assert_eq!(book.title, "Untitled");
        assert_eq!(book.chapters, vec![Chapter::new("Intro", "Intro\n\nHello world.")]);
    }

    #[test]
    fn test_invalid_utf8_byte_keeps_chapter() {
        let opf = single_chapter_opf("<dc:title>Menu</dc:title>", "", "");
        let mut chapter = xhtml("<h1>Caf\u{0}</h1><p>Order here.</p>").into_bytes();
        // 把占位的NUL换成Latin-1编码的é
        let nul = chapter.iter().position(|&b| b == 0).unwrap();
        chapter[nul] = 0xE9;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in [
            (CONTAINER_PATH, CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("OEBPS/ch1.xhtml", chapter.as_slice()),
        ] {
            zip.start_file(name, FileOptions::<()>::default()).unwrap();
            zip.write_all(bytes).unwrap();
        }
        let bytes = zip.finish().unwrap().into_inner();

        let book = Epub::from_bytes(bytes).unwrap().parse_book().unwrap();
        assert_eq!(
            book.chapters,
            vec![Chapter::new("Caf\u{FFFD}", "Caf\u{FFFD}\n\nOrder here.")]
        );
    }

    #[test]
    fn test_ncx_fragments_split_one_file() {
        let opf = single_chapter_opf(
            "<dc:title>Stories</dc:title>",
            r#"toc="ncx""#,
            r#"<item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>"#,
        );
        let ncx = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap>
    <navPoint id="n1" playOrder="1"><navLabel><text>First Story</text></navLabel><content src="ch1.xhtml#a"/></navPoint>
    <navPoint id="n2" playOrder="2"><navLabel><text>Second Story</text></navLabel><content src="ch1.xhtml#b"/></navPoint>
  </navMap>
</ncx>"#;
        let chapter = xhtml(
            r#"<h2 id="a">One</h2><p>Once upon a time.</p><h2 id="b">Two</h2><p>The end.</p>"#,
        );
        let bytes = build_epub(&[
            (CONTAINER_PATH, CONTAINER),
            ("OEBPS/content.opf", &opf),
            ("OEBPS/toc.ncx", ncx),
            ("OEBPS/ch1.xhtml", &chapter),
        ]);

        let book = Epub::from_bytes(bytes).unwrap().parse_book().unwrap();
        assert_eq!(book.title, "Stories");
        assert_eq!(
            book.chapters,
            vec![
                Chapter::new("First Story", "One\n\nOnce upon a time."),
                Chapter::new("Second Story", "Two\n\nThe end."),
            ]
        );
    }

    #[test]
    fn test_nav_document_titles() {
        let opf = r#"<package version="3.0">
<metadata><dc:title xmlns:dc="http://purl.org/dc/elements/1.1/">Modern</dc:title></metadata>
<manifest>
  <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
  <item id="c1" href="text/c1.xhtml" media-type="application/xhtml+xml"/>
  <item id="c2" href="text/c2.xhtml" media-type="application/xhtml+xml"/>
</manifest>
<spine><itemref idref="c1"/><itemref idref="c2"/></spine>
</package>"#;
        let nav = r#"<html xmlns:epub="http://www.idpf.org/2007/ops"><body>
<nav epub:type="toc"><ol><li><a href="text/c1.xhtml">Arrival</a></li></ol></nav>
</body></html>"#;
        let c1 = xhtml("<p>They arrived.</p>");
        let c2 = xhtml("<p>A Quiet Morning</p><p>Nothing happened.</p>");

        let mut source = MemoryPackage::new()
            .with_member(CONTAINER_PATH, CONTAINER)
            .with_member("OEBPS/content.opf", opf)
            .with_member("OEBPS/nav.xhtml", nav)
            .with_member("OEBPS/text/c1.xhtml", c1)
            .with_member("OEBPS/text/c2.xhtml", c2);

        let book = parse_book(&mut source).unwrap();
        let titles: Vec<&str> = book.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Arrival", "A Quiet Morning"]);
    }

    #[test]
    fn test_chapter_pattern_title_without_toc() {
        let opf = single_chapter_opf("<dc:title>Journeys</dc:title>", "", "");
        let mut source = MemoryPackage::new()
            .with_member(CONTAINER_PATH, CONTAINER)
            .with_member("OEBPS/content.opf", opf)
            .with_member(
                "OEBPS/ch1.xhtml",
                xhtml("<p>Chapter III</p><p>The Departure</p><p>We left before dawn.</p>"),
            );

        let book = parse_book(&mut source).unwrap();
        assert_eq!(book.chapters[0].title, "Chapter III — The Departure");
    }

    #[test]
    fn test_custom_options() {
        let opf = single_chapter_opf("", "", "");
        let mut source = MemoryPackage::new()
            .with_member(CONTAINER_PATH, CONTAINER)
            .with_member("OEBPS/content.opf", opf)
            .with_member("OEBPS/ch1.xhtml", xhtml("<p>Plain sentence.</p>"));

        let options = ParseOptions {
            untitled_title: "无题".to_string(),
            fallback_title_prefix: "Section".to_string(),
            ..ParseOptions::default()
        };
        let book = parse_book_with_options(&mut source, &options).unwrap();
        assert_eq!(book.title, "无题");
        assert_eq!(book.chapters[0].title, "Section 1");
    }

    #[test]
    fn test_package_without_container_fails() {
        let bytes = build_epub(&[("OEBPS/content.opf", "<package/>")]);
        let result = Epub::from_bytes(bytes).unwrap().parse_book();
        assert!(matches!(result, Err(EpubError::MalformedPackage(_))));
    }

    #[test]
    fn test_container_without_rootfile_fails() {
        let bytes = build_epub(&[(CONTAINER_PATH, "<container><rootfiles/></container>")]);
        let result = Epub::from_bytes(bytes).unwrap().parse_book();
        assert!(matches!(result, Err(EpubError::MalformedPackage(_))));
    }

    #[test]
    fn test_not_a_zip_archive() {
        let result = Epub::from_bytes(b"definitely not a zip".to_vec());
        assert!(matches!(result, Err(EpubError::Zip(_))));
    }

    #[test]
    fn test_empty_reading_order_is_a_valid_book() {
        let opf = r#"<package><metadata/><manifest/><spine/></package>"#;
        let mut source = MemoryPackage::new()
            .with_member(CONTAINER_PATH, CONTAINER)
            .with_member("OEBPS/content.opf", opf);

        let book = parse_book(&mut source).unwrap();
        assert_eq!(book.title, "Untitled");
        assert!(book.chapters.is_empty());
    }

    #[test]
    fn test_open_from_path_and_list_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        let opf = single_chapter_opf("<dc:title>On Disk</dc:title>", "", "");
        let chapter = xhtml("<h1>Only</h1><p>Saved to a file.</p>");
        std::fs::write(
            &path,
            build_epub(&[
                (CONTAINER_PATH, CONTAINER),
                ("OEBPS/content.opf", &opf),
                ("OEBPS/ch1.xhtml", &chapter),
            ]),
        )
        .unwrap();

        let mut epub = Epub::open(&path).unwrap();
        let mut files = epub.list_files();
        files.sort();
        assert_eq!(files, vec![CONTAINER_PATH, "OEBPS/ch1.xhtml", "OEBPS/content.opf"]);

        let book = epub.parse_book().unwrap();
        assert_eq!(book.title, "On Disk");
        assert_eq!(book.chapters[0].title, "Only");
    }
}
