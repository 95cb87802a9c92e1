//! reflow CLI - reading-ordered text from PDFs

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use reflow::render::{bionic_split, split_paragraphs};
use reflow::{ExtractionStats, LayoutConfig, LoadedPdf, MimeType, Reflow};

#[derive(Parser)]
#[command(name = "reflow")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Turn PDFs into clean, reading-ordered text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract reading-ordered text
    Text {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Convert several files, writing one .txt per input
    Convert {
        /// Input PDF or text files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Dump the positioned fragments of a PDF as JSON
    Fragments {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only this page (1-indexed)
        #[arg(long)]
        page: Option<u32>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print text one paragraph at a time
    Paragraphs {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Embolden the start of each word
        #[arg(long)]
        bionic: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show document information
    Info {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// Reconstruct pages on the calling thread
    #[arg(long)]
    sequential: bool,

    /// Fail when the document has no extractable text
    #[arg(long)]
    strict: bool,

    /// Max baseline distance for fragments on one line
    #[arg(long, env = "REFLOW_LINE_TOLERANCE")]
    line_tolerance: Option<f32>,

    /// Vertical gap that starts a new line
    #[arg(long, env = "REFLOW_LINE_BREAK")]
    line_break: Option<f32>,

    /// Vertical gap that starts a new paragraph
    #[arg(long, env = "REFLOW_PARAGRAPH_BREAK")]
    paragraph_break: Option<f32>,

    /// Horizontal gap that becomes a space
    #[arg(long, env = "REFLOW_SPACE")]
    space: Option<f32>,
}

impl ExtractArgs {
    fn layout(&self) -> LayoutConfig {
        let mut layout = LayoutConfig::default();
        if let Some(v) = self.line_tolerance {
            layout = layout.with_line_tolerance(v);
        }
        if let Some(v) = self.line_break {
            layout = layout.with_line_break_threshold(v);
        }
        if let Some(v) = self.paragraph_break {
            layout = layout.with_paragraph_break_threshold(v);
        }
        if let Some(v) = self.space {
            layout = layout.with_space_threshold(v);
        }
        layout
    }

    fn reflow(&self) -> Reflow {
        let mut reflow = Reflow::new().with_layout(self.layout());
        if self.sequential {
            reflow = reflow.sequential();
        }
        if self.strict {
            reflow = reflow.reject_empty();
        }
        reflow
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Text {
            input,
            output,
            extract,
        } => cmd_text(&input, output.as_deref(), &extract),
        Commands::Convert {
            inputs,
            output,
            extract,
        } => cmd_convert(&inputs, &output, &extract),
        Commands::Fragments {
            input,
            page,
            compact,
        } => cmd_fragments(&input, page, compact),
        Commands::Paragraphs {
            input,
            bionic,
            extract,
        } => cmd_paragraphs(&input, bionic, &extract),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_text(input: &Path, output: Option<&Path>, extract: &ExtractArgs) -> CmdResult {
    let text = extract.reflow().convert_file(input)?.content;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_convert(inputs: &[PathBuf], output_dir: &Path, extract: &ExtractArgs) -> CmdResult {
    fs::create_dir_all(output_dir)?;
    let reflow = extract.reflow();

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failed = 0;
    for input in inputs {
        pb.set_message(input.display().to_string());
        match reflow.convert_file(input) {
            Ok(result) => {
                let path = output_path(input, output_dir);
                fs::write(&path, &result.content)?;
                log::debug!("Wrote {} chars to {}", result.content.len(), path.display());
            }
            Err(e) => {
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} converted, {} failed",
        "Done!".green().bold(),
        inputs.len() - failed,
        failed
    );
    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn cmd_fragments(input: &Path, page: Option<u32>, compact: bool) -> CmdResult {
    let data = fs::read(input)?;
    let pdf = LoadedPdf::load(&data)?;

    let pages = match page {
        Some(number) => vec![pdf.extract_page(number)?],
        None => pdf.extract_all()?,
    };

    let json = if compact {
        serde_json::to_string(&pages)?
    } else {
        serde_json::to_string_pretty(&pages)?
    };
    println!("{}", json);

    Ok(())
}

fn cmd_paragraphs(input: &Path, bionic: bool, extract: &ExtractArgs) -> CmdResult {
    let text = extract.reflow().convert_file(input)?.content;

    for (i, paragraph) in split_paragraphs(&text)
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .enumerate()
    {
        if i > 0 {
            println!();
        }
        if bionic {
            println!("{}", render_bionic(paragraph));
        } else {
            println!("{}", paragraph);
        }
    }

    Ok(())
}

/// What `info` reports about one file.
struct DocumentSummary {
    mime: MimeType,
    /// PDF header version; `None` for text files
    version: Option<String>,
    stats: ExtractionStats,
}

/// Read and parse `input` once, collecting metadata and statistics.
fn summarize(input: &Path) -> reflow::Result<DocumentSummary> {
    let mime = MimeType::from_path(input)?;
    let data = fs::read(input)?;

    if mime == MimeType::Pdf {
        let pdf = LoadedPdf::load(&data)?;
        let pages = pdf.extract_all()?;
        let mut stats = ExtractionStats::from_pages(&pages);
        stats.count_text(&reflow::reconstruct_text(&pages));
        return Ok(DocumentSummary {
            mime,
            version: Some(pdf.version().to_string()),
            stats,
        });
    }

    let result = Reflow::new().convert_bytes(&data, mime.as_str())?;
    Ok(DocumentSummary {
        mime,
        version: None,
        stats: result.stats,
    })
}

fn cmd_info(input: &Path) -> CmdResult {
    let summary = summarize(input)?;
    let stats = &summary.stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Type".bold(), summary.mime);
    if let Some(version) = &summary.version {
        println!("{}: {}", "Version".bold(), version);
        println!("{}: {}", "Pages".bold(), stats.page_count);
        println!("{}: {}", "Pages with text".bold(), stats.pages_with_text);
        println!("{}: {}", "Fragments".bold(), stats.fragment_count);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

/// `dir/<stem>.txt` for an input path.
fn output_path(input: &Path, dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    dir.join(format!("{}.txt", stem))
}

fn render_bionic(paragraph: &str) -> String {
    paragraph
        .split(' ')
        .map(|word| {
            let split = bionic_split(word);
            format!("{}{}", split.bold.bold(), split.normal)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(Path::new("/data/report.v2.pdf"), dir.path());
        assert_eq!(path, dir.path().join("report.v2.txt"));
    }

    #[test]
    fn test_render_bionic_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(render_bionic("Reading is fun"), "Reading is fun");
    }

    /// One page with "Hello world" in Helvetica.
    fn hello_pdf() -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("Hello world")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_summarize_pdf_matches_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.pdf");
        fs::write(&path, hello_pdf()).unwrap();

        let summary = summarize(&path).unwrap();
        assert_eq!(summary.mime, MimeType::Pdf);
        assert_eq!(summary.version.as_deref(), Some("1.4"));
        assert_eq!(summary.stats.page_count, 1);
        assert_eq!(summary.stats.fragment_count, 1);
        assert_eq!(summary.stats.word_count, 2);

        let converted = Reflow::new().convert_file(&path).unwrap().stats;
        assert_eq!(summary.stats, converted);
    }

    #[test]
    fn test_summarize_text_has_no_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "one two\r\n\r\nthree").unwrap();

        let summary = summarize(&path).unwrap();
        assert_eq!(summary.mime, MimeType::PlainText);
        assert!(summary.version.is_none());
        assert_eq!(summary.stats.word_count, 3);
        assert_eq!(summary.stats.paragraph_count, 2);
    }

    #[test]
    fn test_summarize_bad_pdf_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"not a pdf").unwrap();

        assert!(matches!(
            summarize(&path),
            Err(reflow::Error::DocumentParse { .. })
        ));
    }

    #[test]
    fn test_layout_from_args() {
        let cli = Cli::parse_from(["reflow", "text", "a.pdf", "--space", "2", "--strict"]);
        match cli.command {
            Commands::Text { extract, .. } => {
                assert_eq!(extract.layout().space_threshold, 2.0);
                assert_eq!(extract.layout().line_tolerance, 5.0);
                assert!(extract.strict);
            }
            _ => panic!("expected text command"),
        }
    }
}
