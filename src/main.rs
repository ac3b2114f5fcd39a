use chapterforge::typing::{is_front_matter, starting_chapter};
use chapterforge::{Book, Epub, ParseOptions, Result};
use clap::Parser;

/// 📚 ChapterForge - EPUB章节提取工具
#[derive(Parser)]
#[command(name = "chapterforge")]
#[command(about = "从EPUB文件中提取按阅读顺序排列的纯文本章节")]
#[command(version)]
struct Args {
    /// EPUB文件路径
    #[arg(help = "要处理的EPUB文件路径")]
    epub_file: String,

    /// 详细输出模式
    #[arg(short, long, help = "显示详细信息和调试日志")]
    verbose: bool,

    /// 列出章节
    #[arg(short, long, help = "列出所有章节的标题和长度")]
    list: bool,

    /// 显示指定章节内容
    #[arg(short, long, help = "显示指定章节的内容（从1开始）")]
    chapter: Option<usize>,

    /// 输出格式
    #[arg(long, value_enum, default_value = "text", help = "输出格式")]
    format: OutputFormat,

    /// 章节内容最大显示长度
    #[arg(long, default_value = "2000", help = "章节内容最大显示字符数（0表示不限制）")]
    max_length: usize,

    /// 转换为打字练习文本
    #[arg(long, help = "把内容转换为键盘可输入的字符")]
    typing: bool,

    /// 解析选项配置文件
    #[arg(long, help = "YAML格式的解析选项文件")]
    config: Option<String>,
}

/// 输出格式
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// 人类可读的摘要
    Text,
    /// 完整的YAML结构
    Yaml,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(&args) {
        // 致命错误表示文件本身不可用，其余是使用方式上的问题
        if e.is_fatal() {
            eprintln!("❌ 无法解析EPUB: {}", e);
            std::process::exit(1);
        }
        eprintln!("❌ 错误: {}", e);
        std::process::exit(2);
    }
}

fn run(args: &Args) -> Result<()> {
    let options = match &args.config {
        Some(path) => ParseOptions::from_file(path)?,
        None => ParseOptions::default(),
    };

    let mut epub = Epub::open(&args.epub_file)?;
    if args.verbose {
        log::debug!("包内共有 {} 个文件", epub.list_files().len());
    }

    let mut book = epub.parse_book_with_options(&options)?;
    let hash = book.content_hash();
    if args.typing {
        book = book.normalized_for_typing();
    }

    match args.format {
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&book)
                .map_err(|e| chapterforge::EpubError::ConfigError(format!("序列化失败: {}", e)))?;
            println!("{}", yaml);
        }
        OutputFormat::Text => display_book(&book, &hash, args),
    }

    Ok(())
}

/// 显示书籍摘要、章节列表和指定章节
fn display_book(book: &Book, hash: &str, args: &Args) {
    println!("📚 书名: {}", book.title);
    println!("  章节数: {}", book.chapters.len());
    println!("  总字符数: {}", book.total_chars());
    println!("  内容哈希: {}", hash);

    if book.chapters.is_empty() {
        println!("  ⚠️  没有提取到任何章节");
        return;
    }

    let start = starting_chapter(&book.chapters);
    if args.typing {
        println!("  ⌨️  建议从第 {} 章开始练习", start + 1);
    }

    if args.list {
        println!("\n📖 章节列表:");
        for (i, chapter) in book.chapters.iter().enumerate() {
            let marker = if is_front_matter(chapter) { " [前置内容]" } else { "" };
            println!("  {}. {} ({} 字符){}", i + 1, chapter.title, chapter.char_count(), marker);
        }
    }

    if let Some(index) = args.chapter {
        display_chapter(book, index, args.max_length);
    }
}

/// 显示指定章节的内容
fn display_chapter(book: &Book, chapter_index: usize, max_length: usize) {
    // 检查章节索引是否有效（用户输入从1开始）
    if chapter_index == 0 || chapter_index > book.chapters.len() {
        println!("\n  ❌ 无效的章节索引: {}。可用范围: 1-{}", chapter_index, book.chapters.len());
        return;
    }

    let chapter = &book.chapters[chapter_index - 1];
    let total = chapter.char_count();

    println!("\n📄 章节 {}: {}", chapter_index, chapter.title);
    println!("  📏 内容长度: {} 字符", total);

    let truncated = max_length > 0 && total > max_length;
    let display_content: String = if truncated {
        chapter.content.chars().take(max_length).collect()
    } else {
        chapter.content.clone()
    };

    let rule = "━".repeat(40);
    println!("{}", rule);
    println!("{}", display_content);
    println!("{}", rule);

    if truncated {
        println!(
            "  💡 提示: 还有 {} 个字符未显示。使用 --max-length 0 显示完整内容。",
            total - max_length
        );
    }
}
