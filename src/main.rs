use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corpus_search::config::{self, AppConfig, OutputFormat};
use corpus_search::{export, history, Oracle, SearchMode, SearchRecord, SearchState, Searcher};

#[derive(Parser, Debug)]
#[command(
    name = "corpus-search",
    version,
    long_version = env!("LONG_VERSION"),
    about = "Search subtitle and document collections, expanding Korean inflections"
)]
struct Args {
    /// File or directory to search
    #[arg(required_unless_present = "show_history")]
    path: Option<PathBuf>,
    /// Keyword, phrase (idiom mode) or pattern (--regex)
    #[arg(required_unless_present = "show_history")]
    keyword: Option<String>,
    /// korean_word | korean_idiom | english
    #[arg(long, short)]
    mode: Option<SearchMode>,
    /// English only
    #[arg(long)]
    case_sensitive: bool,
    /// Compile the keyword as a regular expression
    #[arg(long)]
    regex: bool,
    /// Accepted for compatibility; matching is substring containment anyway
    #[arg(long)]
    fuzzy: bool,
    /// A "quoted" keyword is matched literally
    #[arg(long)]
    exact: bool,
    /// Analyser backend: lindera (default) | rule
    #[arg(long)]
    analyzer: Option<String>,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// HTML report path (html format only)
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Config file, defaults to ./config.json
    #[arg(long)]
    config: Option<PathBuf>,
    /// Do not record this query
    #[arg(long)]
    no_history: bool,
    /// Print recorded queries and exit
    #[arg(long)]
    show_history: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corpus_search=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Load configuration / 加载配置
    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .map_err(anyhow::Error::msg)?;
    config::init_config(loaded).map_err(anyhow::Error::msg)?;
    let app_config = config::config();

    if args.show_history {
        return print_history(&app_config);
    }

    let (Some(path), Some(keyword)) = (args.path.as_ref(), args.keyword.as_deref()) else {
        anyhow::bail!("PATH and KEYWORD are required");
    };

    let mode = args.mode.unwrap_or(app_config.search.mode);
    let mut options = app_config.search.options();
    options.case_sensitive |= args.case_sensitive;
    options.regex_enabled |= args.regex;
    options.fuzzy_match |= args.fuzzy;
    options.exact_match |= args.exact;

    let backend = args.analyzer.as_deref().unwrap_or(&app_config.search.analyzer);
    let oracle = Oracle::from_backend(backend)?;
    tracing::debug!("Using {} analyser", oracle.backend());

    let state = Arc::new(SearchState::new());
    let record = Searcher::new(oracle).search_with(path, keyword, mode, &options, state, |processed, total| {
        tracing::debug!("Progress {}/{}", processed, total);
    })?;

    match args.format.unwrap_or(app_config.output.format) {
        OutputFormat::Text => print_text(&record),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Html => {
            let out = args.output.clone().unwrap_or_else(|| app_config.get_html_path());
            export::write_html(&record, &out)
                .with_context(|| format!("writing report to {}", out.display()))?;
            println!("{}", record.summary());
            println!("Report: {}", out.display());
        }
    }

    if !args.no_history {
        if let Some(history_path) = app_config.get_history_path() {
            let entry = history::HistoryEntry::from_record(path, &record);
            if let Err(e) = history::append(&history_path, &entry) {
                tracing::warn!("Failed to record query history: {}", e);
            }
        }
    }

    Ok(())
}

fn print_text(record: &SearchRecord) {
    for m in &record.search_results {
        let location = match m.page {
            Some(page) => format!("{}:{} (p.{})", m.file_path, m.line_no, page),
            None => format!("{}:{}", m.file_path, m.line_no),
        };
        println!(
            "{}\t[{}] {}\t{}\t<{}>",
            location,
            m.episode,
            m.time_axis,
            m.content.replace('\n', " / "),
            m.matched_keyword
        );
    }
    println!("{}", record.summary());
    if !record.actual_variant_set.is_empty() {
        println!("Variants found: {}", record.actual_variant_set.join(", "));
    }
}

fn print_history(app_config: &AppConfig) -> anyhow::Result<()> {
    let Some(path) = app_config.get_history_path() else {
        println!("Query history is disabled");
        return Ok(());
    };
    for entry in history::load(&path)? {
        println!(
            "{}\t{:?}\t{} → {}\t{} matches\t{}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.mode,
            entry.keyword,
            entry.lemma,
            entry.matches,
            entry.root
        );
    }
    Ok(())
}
