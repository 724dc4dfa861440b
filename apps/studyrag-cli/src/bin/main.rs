//! One-shot study CLI: point a command at a directory of PDFs, the index is
//! built in memory for that invocation (nothing persists across runs).

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use studyrag_core::citation::pretty_source;
use studyrag_core::config::{expand_path, Config, RetrievalSettings};
use studyrag_core::types::{DocumentText, Evidence, RetrievalMethod};
use studyrag_index::{compose_answer, RagIndex};
use studyrag_pdf::read_pdf_file;

const USAGE: &str = "Usage: studyrag <command> <pdf-dir> [args] [options]\n\
  stats  <pdf-dir>                 corpus counters and settings\n\
  docs   <pdf-dir>                 sorted document list\n\
  chunks <pdf-dir> <doc-name>      chunk ids and citations for one document\n\
  search <pdf-dir> <query>         ranked evidence for a query\n\
  ask    <pdf-dir> <question>      retrieve evidence and compose an answer\n\
Options:\n\
  --method <lexical-overlap|tfidf-cosine>\n\
  --top-k <1-10>\n\
  --chunk-size <400-2400>   --overlap <0-800>\n\
  --sentences <n>           (ask; default 6)\n\
  --json                    (search; emit evidence as JSON)";

struct Cli {
    command: String,
    dir: PathBuf,
    positional: Vec<String>,
    settings: RetrievalSettings,
    sentences: usize,
    json: bool,
}

fn parse_args(defaults: RetrievalSettings) -> Result<Cli> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        bail!("{USAGE}");
    }
    let mut settings = defaults;
    let mut sentences = 6;
    let mut json = false;
    let mut positional = Vec::new();
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--method" => {
                settings.method = next_value(&args, &mut i, "--method")?.parse()?;
            }
            "--top-k" => {
                settings.top_k = next_value(&args, &mut i, "--top-k")?.parse()?;
            }
            "--chunk-size" => {
                settings.chunk_size = next_value(&args, &mut i, "--chunk-size")?.parse()?;
            }
            "--overlap" => {
                settings.chunk_overlap = next_value(&args, &mut i, "--overlap")?.parse()?;
            }
            "--sentences" => {
                sentences = next_value(&args, &mut i, "--sentences")?.parse()?;
            }
            "--json" => json = true,
            other if other.starts_with('-') => bail!("Unknown option: {other}\n{USAGE}"),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }
    settings.validate()?;
    Ok(Cli {
        command: args[0].clone(),
        dir: expand_path(&args[1]),
        positional,
        settings,
        sentences,
        json,
    })
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))
}

fn collect_pdfs(dir: &PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn build_index(dir: &PathBuf, settings: &RetrievalSettings) -> Result<RagIndex> {
    let files = collect_pdfs(dir);
    if files.is_empty() {
        bail!("No PDF files found under {}", dir.display());
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message("Extracting");

    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        match read_pdf_file(path) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                // An unreadable file still joins the corpus as an empty
                // document; it shows up as zero chunks, not as a failure.
                tracing::warn!("could not read {}: {e}", path.display());
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                documents.push(DocumentText::new(name, vec![String::new()]));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let mut index = RagIndex::new(settings.chunk_size, settings.chunk_overlap);
    index.add_documents(documents);
    index.build();
    let stats = index.stats();
    println!("📚 Indexed {} PDFs • {} chunks", stats.documents, stats.chunks);
    Ok(index)
}

fn print_evidence(hits: &[Evidence], query: &str, method: RetrievalMethod) {
    let terms = informative_terms(query);
    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "Rank {} • {} • {}={:.3}",
            rank + 1,
            pretty_source(&hit.source, hit.page),
            method.score_label(),
            hit.score
        );
        println!("  {}", highlight(&hit.text, &terms));
        println!("  {}", hit.citation);
        println!();
    }
}

/// Up to ten informative query terms, in query order, stop words and very
/// short words dropped.
fn informative_terms(query: &str) -> Vec<String> {
    const STOP: &[&str] = &[
        "the", "a", "an", "and", "or", "to", "of", "in", "on", "for", "is", "are", "be", "that",
        "this", "do", "does", "mean", "explain", "how", "what", "which", "where", "used", "use",
        "typically", "function", "functions",
    ];
    let mut out: Vec<String> = Vec::new();
    for term in studyrag_core::tokenize::tokenize(query) {
        if term.len() < 3 || STOP.contains(&term.as_str()) || out.contains(&term) {
            continue;
        }
        out.push(term);
        if out.len() >= 10 {
            break;
        }
    }
    out
}

/// Bold every occurrence of an informative term (whole-word, any case).
fn highlight(text: &str, terms: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for ch in text.chars().chain(std::iter::once('\0')) {
        if ch.is_ascii_alphabetic() {
            word.push(ch);
            continue;
        }
        if !word.is_empty() {
            if terms.iter().any(|t| t.eq_ignore_ascii_case(&word)) {
                out.push_str("\x1b[1m");
                out.push_str(&word);
                out.push_str("\x1b[0m");
            } else {
                out.push_str(&word);
            }
            word.clear();
        }
        if ch != '\0' {
            out.push(ch);
        }
    }
    out
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let cli = parse_args(config.retrieval()?)?;

    match cli.command.as_str() {
        "stats" => {
            let index = build_index(&cli.dir, &cli.settings)?;
            let stats = index.stats();
            println!("Documents:     {}", stats.documents);
            println!("Chunks:        {}", stats.chunks);
            println!("Chunk size:    {} chars", stats.chunk_size);
            println!("Chunk overlap: {} chars", stats.chunk_overlap);
        }
        "docs" => {
            let index = build_index(&cli.dir, &cli.settings)?;
            for name in index.list_documents() {
                println!("{name}");
            }
        }
        "chunks" => {
            let Some(doc_name) = cli.positional.first() else {
                bail!("chunks needs a document name\n{USAGE}");
            };
            let index = build_index(&cli.dir, &cli.settings)?;
            let chunks = index.get_chunks_for_document(doc_name);
            if chunks.is_empty() {
                bail!("No chunks for '{doc_name}' (is the name exact? try `studyrag docs`)");
            }
            for chunk in chunks {
                let page = chunk.page.map_or("—".to_string(), |p| format!("p.{p}"));
                println!("{} • {}", chunk.chunk_id, page);
                println!("  {}", chunk.text);
                println!("  {}", chunk.citation);
                println!();
            }
        }
        "search" => {
            let Some(query) = cli.positional.first() else {
                bail!("search needs a query\n{USAGE}");
            };
            let index = build_index(&cli.dir, &cli.settings)?;
            let hits = index.search(query, cli.settings.top_k, cli.settings.method)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else if hits.is_empty() {
                println!("No evidence found for this query.");
            } else {
                print_evidence(&hits, query, cli.settings.method);
            }
        }
        "ask" => {
            let Some(question) = cli.positional.first() else {
                bail!("ask needs a question\n{USAGE}");
            };
            let index = build_index(&cli.dir, &cli.settings)?;
            let hits = index.search(question, cli.settings.top_k, cli.settings.method)?;
            print_evidence(&hits, question, cli.settings.method);
            println!("{}", compose_answer(question, &hits, cli.sentences));
        }
        other => bail!("Unknown command: {other}\n{USAGE}"),
    }
    Ok(())
}
