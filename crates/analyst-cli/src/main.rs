//! Command-line interface for the AI stock analyst
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="..."
//! export NEWS_API_KEY="..."    # optional, needed for `news`
//!
//! analyst search 삼성전자
//! analyst news AAPL
//! analyst recommend --level beginner
//! analyst fx --pair KRW=X --period 3mo
//! analyst audio "https://youtube.com/watch?v=..."
//! ```

use analyst_core::analyst::{bootstrap_listing, DEFAULT_CHART_RANGE};
use analyst_core::api::yahoo::{change_summary, window_return};
use analyst_core::listing::ListingStore;
use analyst_core::recommend::{group_cards, Recommendation, StockCard};
use analyst_core::{
    Analyst, AnalystConfig, GeminiClient, KrxListingClient, Market, SessionState, SkillLevel,
};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use std::env;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "analyst")]
#[command(about = "AI stock analyst: lookup, news reports and recommendations", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path of the KRX listing snapshot
    #[arg(long, default_value = "krx_listing.json")]
    listing_path: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a stock by name or ticker and show its recent move
    Search {
        /// Company name (Korean or English) or uppercase ticker
        query: String,
        /// Trailing chart range, e.g. 1mo, 3mo, 6mo
        #[arg(long, default_value = DEFAULT_CHART_RANGE)]
        range: String,
    },
    /// Resolve a stock, search recent news and write an AI report
    News { query: String },
    /// Ask the model for six stock picks and show them as cards
    Recommend {
        #[arg(long, value_enum, default_value_t = Level::Beginner)]
        level: Level,
    },
    /// Exchange-rate snapshot over a trailing window
    Fx {
        /// Yahoo FX symbol, e.g. KRW=X (USD/KRW)
        #[arg(long, default_value = "KRW=X")]
        pair: String,
        #[arg(long, default_value = "3mo")]
        period: String,
    },
    /// Summarize a stock video from its audio track
    Audio { url: String },
    /// Force a wholesale rebuild of the KRX listing snapshot
    RebuildListing,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Level {
    Beginner,
    Expert,
}

impl From<Level> for SkillLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Beginner => SkillLevel::Beginner,
            Level::Expert => SkillLevel::Expert,
        }
    }
}

fn market_label(market: Market) -> &'static str {
    match market {
        Market::Domestic => "🇰🇷 국내",
        Market::Foreign => "🇺🇸 해외",
    }
}

fn print_record(state: &SessionState) {
    println!(
        "{} | {} ({})",
        market_label(state.record.market),
        state.record.name,
        state.record.symbol
    );
}

async fn print_cards(analyst: &Analyst, cards: Vec<StockCard>) {
    let grouped = group_cards(cards);
    for (label, group) in [("국내 종목", grouped.domestic), ("미국 종목", grouped.foreign)] {
        if group.is_empty() {
            continue;
        }
        println!("\n■ {label}");
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["종목", "티커", "1개월", "요약", "리스크", "난이도"]);
        for card in group {
            // Mini-chart stand-in: one-month return, best effort
            let ret = match analyst.history(&card.ticker, "1mo").await {
                Ok(quotes) => window_return(&quotes)
                    .map(|r| format!("{r:+.1}%"))
                    .unwrap_or_else(|| "-".to_string()),
                Err(_) => "-".to_string(),
            };
            table.add_row(vec![
                card.name,
                card.ticker,
                ret,
                card.summary,
                card.risk,
                card.stars,
            ]);
        }
        println!("{table}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,analyst_core=info".to_string()),
        )
        .init();

    let args = Args::parse();

    let config = AnalystConfig::builder()
        .listing_path(&args.listing_path)
        .with_env_news_key()
        .build()?;

    // Explicit startup initialization of the local listing table
    let provider = KrxListingClient::new()?;

    if matches!(&args.command, Command::RebuildListing) {
        let store = ListingStore::new(&config.listing_path);
        let table = store.rebuild(&provider).await?;
        println!("listing rebuilt: {} entries", table.len());
        return Ok(());
    }

    let table = bootstrap_listing(&config, &provider).await?;
    info!(entries = table.len(), "listing table ready");

    let analyst = Analyst::new(config, GeminiClient::from_env()?, table);

    match args.command {
        Command::Search { query, range } => {
            let Some(state) = analyst.search(&query).await? else {
                println!("종목을 찾을 수 없습니다: {query}");
                return Ok(());
            };
            print_record(&state);

            let quotes = analyst.history(&state.record.symbol, &range).await?;
            match change_summary(&quotes) {
                Some(s) => println!(
                    "종가 {:.2} ({:+.2}, {:+.2}%) · {range} 구간 {}개 봉",
                    s.last,
                    s.change,
                    s.percent,
                    quotes.len()
                ),
                None => println!("차트 데이터 없음"),
            }
        },
        Command::News { query } => {
            let Some(state) = analyst.search(&query).await? else {
                println!("종목을 찾을 수 없습니다: {query}");
                return Ok(());
            };
            print_record(&state);

            match analyst.news_report(&state).await? {
                Some(enriched) => {
                    if let Some(news) = &enriched.news {
                        println!("\n{}\n", news.report);
                        println!("참고 기사:");
                        for article in &news.articles {
                            println!("  - {} ({})", article.title, article.url);
                        }
                    }
                },
                None => println!("검색된 뉴스가 없습니다."),
            }
        },
        Command::Recommend { level } => {
            match analyst.recommend(level.into()).await? {
                Recommendation::Cards(cards) => print_cards(&analyst, cards).await,
                // Model ignored the format; show its answer as-is
                Recommendation::Raw(text) => println!("{text}"),
            }
        },
        Command::Fx { pair, period } => {
            let quotes = analyst.history(&pair, &period).await?;
            match change_summary(&quotes) {
                Some(s) => println!(
                    "{pair}: {:.2} ({:+.2}, {:+.2}%) · {period}",
                    s.last, s.change, s.percent
                ),
                None => println!("환율 데이터 없음"),
            }
        },
        Command::Audio { url } => {
            let brief = analyst.audio_brief(&url).await?;
            println!("{brief}");
        },
        Command::RebuildListing => {},
    }

    Ok(())
}
