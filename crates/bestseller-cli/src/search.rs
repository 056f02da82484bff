//! `search` command: build queries from flags, run them, print the ranking.
//!
//! Progress goes to stderr and results to stdout, so `--format json` output
//! can be piped. Ctrl-C sets the run's stop signal; whatever was gathered up
//! to that point is still printed.

use std::path::PathBuf;

use anyhow::Context;
use bestseller_core::{
    parse_category_id, parse_domain, parse_keyword_lines, parse_price_bound, parse_shop_id,
    AppConfig, ProductRecord, QueryDescriptor, SearchFilters, StopSignal,
};
use bestseller_scraper::{
    spawn_acquisition, AcquisitionReport, MarketplaceClient, Progress, RunStatus,
};
use clap::{Args, ValueEnum};

const TITLE_WIDTH: usize = 48;
const SHOP_WIDTH: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Keyword to search; repeat for a batch run
    #[arg(long = "keyword", short = 'k')]
    pub keywords: Vec<String>,

    /// File with one keyword per line; blank lines are ignored
    #[arg(long)]
    pub keywords_file: Option<PathBuf>,

    /// Search one shop's catalog instead, by id or shop URL
    #[arg(
        long,
        conflicts_with_all = ["keywords", "keywords_file", "price_min", "price_max", "category"]
    )]
    pub shop: Option<String>,

    /// Pages to fetch per query
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub pages: u32,

    /// Drop products with fewer units sold than this
    #[arg(long, default_value_t = 0)]
    pub min_sold: u64,

    /// Items requested per page
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: u32,

    /// Lower price bound, whole currency units
    #[arg(long)]
    pub price_min: Option<String>,

    /// Upper price bound, whole currency units
    #[arg(long)]
    pub price_max: Option<String>,

    /// Category id or category page URL
    #[arg(long)]
    pub category: Option<String>,

    /// Skip shop-name lookups
    #[arg(long)]
    pub no_shop_names: bool,

    /// Storefront host (e.g. shopee.sg); overrides BESTSELLER_DOMAIN
    #[arg(long)]
    pub domain: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Maximum rows to print
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Turns parsed flags into validated query descriptors.
///
/// # Errors
///
/// Returns an error when no keyword or shop is given, the keywords file
/// cannot be read, or any id, price, or descriptor is invalid.
pub(crate) fn build_queries(args: &SearchArgs) -> anyhow::Result<Vec<QueryDescriptor>> {
    let queries = if let Some(shop) = &args.shop {
        vec![apply_limits(QueryDescriptor::shop(parse_shop_id(shop)?), args)]
    } else {
        let mut keywords: Vec<String> = args
            .keywords
            .iter()
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty())
            .collect();
        if let Some(path) = &args.keywords_file {
            let block = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read keywords file {}", path.display()))?;
            keywords.extend(parse_keyword_lines(&block));
        }
        if keywords.is_empty() {
            anyhow::bail!("nothing to search: pass --keyword, --keywords-file, or --shop");
        }

        let filters = SearchFilters {
            price_min: optional(args.price_min.as_deref(), parse_price_bound)?,
            price_max: optional(args.price_max.as_deref(), parse_price_bound)?,
            category_id: optional(args.category.as_deref(), parse_category_id)?,
        };
        keywords
            .into_iter()
            .map(|keyword| apply_limits(QueryDescriptor::keyword(keyword, filters.clone()), args))
            .collect()
    };

    for query in &queries {
        query.validate()?;
    }
    Ok(queries)
}

fn apply_limits(query: QueryDescriptor, args: &SearchArgs) -> QueryDescriptor {
    query
        .with_max_pages(args.pages)
        .with_page_size(args.page_size)
        .with_min_sold(args.min_sold)
        .with_shop_names(!args.no_shop_names)
}

fn optional<E>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> Result<Option<u64>, E>,
) -> Result<Option<u64>, E> {
    raw.map_or(Ok(None), parse)
}

/// Runs the `search` command end to end.
///
/// # Errors
///
/// Returns an error for invalid flags, a client that cannot be built, or a
/// run that fails on the network. A run stopped with Ctrl-C is not an error.
pub(crate) async fn run_search(mut config: AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let queries = build_queries(&args)?;
    if let Some(domain) = &args.domain {
        config.domain = parse_domain(domain)?;
        if !config.is_known_domain() {
            tracing::warn!(domain = %config.domain, "domain is not a known storefront");
        }
    }

    let client = MarketplaceClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build marketplace client: {e}"))?;

    let stop = StopSignal::new();
    let ctrl_c_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("stopping after the current request...");
            ctrl_c_stop.stop();
        }
    });

    tracing::info!(
        domain = %config.domain,
        queries = queries.len(),
        "starting acquisition"
    );
    let (handle, mut progress) = spawn_acquisition(client, queries, stop);
    while let Some(event) = progress.recv().await {
        eprintln!("{}", progress_line(&event));
    }
    let mut report = handle.await.context("acquisition task panicked")??;

    if report.status == RunStatus::Stopped {
        eprintln!(
            "stopped: {} queries completed, {} products kept",
            report.queries_run,
            report.records.len()
        );
    }

    if let Some(limit) = args.limit {
        report.records.truncate(limit);
    }
    match args.format {
        OutputFormat::Table => print_table(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

pub(crate) fn progress_line(event: &Progress) -> String {
    let percent = event.fraction_complete() * 100.0;
    match event {
        Progress::QueryStarted {
            index,
            total,
            label,
        } => format!("[{:>3.0}%] ({}/{total}) searching \"{label}\"", percent, index + 1),
        Progress::QueryFinished {
            index,
            total,
            label,
            records,
        } => format!(
            "[{:>3.0}%] ({}/{total}) \"{label}\": {records} products",
            percent,
            index + 1
        ),
    }
}

fn print_table(report: &AcquisitionReport) {
    if report.records.is_empty() {
        println!("no products found");
        return;
    }

    println!(
        "{:<6}{:>10}{:>9}  {:<24}{:<22}{:<w$}  TITLE",
        "RANK",
        "SOLD",
        "RECENT",
        "PRICE",
        "RATING",
        "SHOP",
        w = SHOP_WIDTH
    );
    for (i, record) in report.records.iter().enumerate() {
        println!("{}", table_row(i + 1, record));
    }
}

pub(crate) fn table_row(rank: usize, record: &ProductRecord) -> String {
    let recent = record
        .recent_sold
        .map_or_else(|| "\u{2014}".to_string(), |n| n.to_string());
    let shop = record.shop_name.as_deref().unwrap_or("\u{2014}");
    format!(
        "{:<6}{:>10}{:>9}  {:<24}{:<22}{:<w$}  {}\n      {}",
        rank,
        record.historical_sold,
        recent,
        record.price_display(),
        record.rating_display(),
        truncate(shop, SHOP_WIDTH - 2),
        truncate(&record.title, TITLE_WIDTH),
        record.url,
        w = SHOP_WIDTH
    )
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}
