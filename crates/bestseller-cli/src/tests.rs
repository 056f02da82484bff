use std::io::Write;

use bestseller_core::{ProductRecord, QueryTarget};
use bestseller_scraper::Progress;

use super::*;
use crate::search::{build_queries, progress_line, table_row, truncate, OutputFormat};

fn search_args(args: &[&str]) -> SearchArgs {
    let mut argv = vec!["bestseller", "search"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("expected valid cli args");
    match cli.command {
        Some(Commands::Search(args)) => args,
        None => panic!("expected search command"),
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["bestseller"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn search_defaults() {
    let args = search_args(&["--keyword", "phone case"]);
    assert_eq!(args.keywords, vec!["phone case".to_owned()]);
    assert_eq!(args.pages, 3);
    assert_eq!(args.page_size, 60);
    assert_eq!(args.min_sold, 0);
    assert!(!args.no_shop_names);
    assert_eq!(args.format, OutputFormat::Table);
    assert!(args.limit.is_none());
}

#[test]
fn repeated_keyword_is_batch() {
    let args = search_args(&["-k", "lamp", "--keyword", "desk", "--format", "json"]);
    assert_eq!(args.keywords, vec!["lamp".to_owned(), "desk".to_owned()]);
    assert_eq!(args.format, OutputFormat::Json);
}

#[test]
fn pages_out_of_range_is_rejected() {
    assert!(Cli::try_parse_from(["bestseller", "search", "-k", "x", "--pages", "0"]).is_err());
    assert!(Cli::try_parse_from(["bestseller", "search", "-k", "x", "--pages", "51"]).is_err());
    assert!(Cli::try_parse_from(["bestseller", "search", "-k", "x", "--pages", "50"]).is_ok());
}

#[test]
fn shop_conflicts_with_keyword_and_filters() {
    assert!(Cli::try_parse_from(["bestseller", "search", "--shop", "1", "-k", "x"]).is_err());
    assert!(
        Cli::try_parse_from(["bestseller", "search", "--shop", "1", "--price-min", "5"]).is_err()
    );
    assert!(
        Cli::try_parse_from(["bestseller", "search", "--shop", "1", "--category", "9"]).is_err()
    );
}

#[test]
fn build_queries_from_keywords_carries_filters_and_limits() {
    let args = search_args(&[
        "-k",
        " lamp ",
        "-k",
        "desk",
        "--pages",
        "5",
        "--min-sold",
        "100",
        "--price-min",
        "200",
        "--price-max",
        "900",
        "--category",
        "https://shopee.co.th/Home-cat.11044945",
        "--no-shop-names",
    ]);
    let queries = build_queries(&args).unwrap();

    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].label, "lamp");
    assert_eq!(queries[1].label, "desk");
    for query in &queries {
        assert_eq!(query.max_pages, 5);
        assert_eq!(query.min_sold, 100);
        assert!(!query.resolve_shop_names);
        match &query.target {
            QueryTarget::Keyword { filters, .. } => {
                assert_eq!(filters.price_min, Some(200));
                assert_eq!(filters.price_max, Some(900));
                assert_eq!(filters.category_id, Some(11_044_945));
            }
            QueryTarget::Shop { .. } => panic!("expected keyword query"),
        }
    }
}

#[test]
fn build_queries_from_shop_url() {
    let args = search_args(&["--shop", "https://shopee.co.th/shop/123456"]);
    let queries = build_queries(&args).unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].target, QueryTarget::Shop { shop_id: 123_456 });
    assert_eq!(queries[0].label, "shop:123456");
}

#[test]
fn build_queries_reads_keywords_file() {
    let mut path = std::env::temp_dir();
    path.push(format!("bestseller-keywords-{}.txt", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "lamp\n\n  desk  \n").unwrap();
    }

    let path_arg = path.to_string_lossy().into_owned();
    let args = search_args(&["-k", "chair", "--keywords-file", &path_arg]);
    let queries = build_queries(&args).unwrap();
    std::fs::remove_file(&path).ok();

    let labels: Vec<&str> = queries.iter().map(|q| q.label.as_str()).collect();
    assert_eq!(labels, vec!["chair", "lamp", "desk"]);
}

#[test]
fn build_queries_without_input_is_an_error() {
    let args = search_args(&[]);
    let err = build_queries(&args).unwrap_err();
    assert!(err.to_string().contains("nothing to search"), "got: {err}");
}

#[test]
fn build_queries_rejects_inverted_price_range() {
    let args = search_args(&["-k", "lamp", "--price-min", "900", "--price-max", "100"]);
    assert!(build_queries(&args).is_err());
}

#[test]
fn build_queries_rejects_non_numeric_price() {
    let args = search_args(&["-k", "lamp", "--price-min", "cheap"]);
    assert!(build_queries(&args).is_err());
}

#[test]
fn progress_line_shows_position_and_percent() {
    let line = progress_line(&Progress::QueryFinished {
        index: 0,
        total: 4,
        label: "lamp".to_owned(),
        records: 12,
    });
    assert_eq!(line, "[ 25%] (1/4) \"lamp\": 12 products");
}

#[test]
fn truncate_counts_characters_not_bytes() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("abcdefghij", 5), "abcd\u{2026}");
    assert_eq!(truncate("เคสโทรศัพท์", 4), "เคส\u{2026}");
}

#[test]
fn table_row_shows_placeholders_for_missing_values() {
    let record = ProductRecord {
        title: "Desk Lamp".to_owned(),
        item_id: 2,
        shop_id: 1,
        shop_name: None,
        price: "159".parse().unwrap(),
        price_min: "159".parse().unwrap(),
        price_max: "159".parse().unwrap(),
        currency: "THB".to_owned(),
        historical_sold: 1200,
        recent_sold: None,
        rating: 4.5,
        rating_count: 0,
        stock: 3,
        url: "https://shopee.co.th/product/1/2".to_owned(),
        query_label: "lamp".to_owned(),
    };
    let row = table_row(1, &record);
    assert!(row.starts_with("1     "), "got: {row}");
    assert!(row.contains("159.00 THB"));
    assert!(row.contains("Desk Lamp"));
    assert!(row.contains('\u{2014}'));
    assert!(row.ends_with("https://shopee.co.th/product/1/2"));
}
