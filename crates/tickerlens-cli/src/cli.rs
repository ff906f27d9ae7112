//! CLI argument definitions for tickerlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Key statistics, moving averages, RSI, news and an optional answer |
//! | `news` | Latest headlines for a symbol |
//! | `ask` | Answer a question grounded on the symbol's statistics and news |
//! | `presets` | List the curated symbols per market |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Use deterministic offline data |
//! | `--timeout-ms` | from config | Per-request HTTP timeout |
//! | `--env-file` | `.env` | Explicit dotenv file |
//!
//! # Examples
//!
//! ```bash
//! tickerlens analyze RELIANCE
//! tickerlens analyze AAPL --market us --question "Is the trend still up?"
//! tickerlens news INFY.BO --format json --pretty
//! tickerlens presets --market foreign
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickerlens_core::Market;

/// 📈 tickerlens - equity dashboard in the terminal
///
/// One year of weekly prices, key statistics, moving averages and RSI for
/// Indian (NSE/BSE) and US equities, with recent news and model-backed answers.
#[derive(Debug, Parser)]
#[command(
    name = "tickerlens",
    author,
    version,
    about = "Equity dashboard for Indian and US stocks",
    long_about = "tickerlens fetches one year of weekly price history for a stock and derives \
key statistics, moving averages and RSI. It also lists recent news and can answer questions \
about the stock using a language model (requires GROQ_API_KEY).\n\
\n\
Use 'tickerlens <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve deterministic offline data instead of calling providers.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// HTTP timeout in milliseconds, overriding TICKERLENS_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Load configuration from this dotenv file instead of ./.env.
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sections for terminal display.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 📊 Analyze a stock: statistics, moving averages, RSI and news.
    ///
    /// # Examples
    ///
    ///   tickerlens analyze
    ///   tickerlens analyze TCS --question "How volatile was the last quarter?"
    ///   tickerlens analyze MSFT --market us --no-news
    Analyze(AnalyzeArgs),

    /// 📰 Show the latest news for a stock.
    News(NewsArgs),

    /// 💬 Ask a question about a stock.
    ///
    /// Requires GROQ_API_KEY unless --mock is set.
    Ask(AskArgs),

    /// 📋 List preset symbols per market.
    Presets(PresetsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct MarketArg {
    /// Market: domestic (in, india) or foreign (us).
    #[arg(long, short, value_parser = parse_market, default_value = "domestic")]
    pub market: Market,
}

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Symbol to analyze; defaults to the market's first preset.
    pub symbol: Option<String>,

    #[command(flatten)]
    pub market: MarketArg,

    /// Question to answer about the stock.
    #[arg(long, short)]
    pub question: Option<String>,

    /// Skip the news search.
    #[arg(long, default_value_t = false)]
    pub no_news: bool,
}

#[derive(Debug, Clone, Args)]
pub struct NewsArgs {
    /// Symbol to search news for; defaults to the market's first preset.
    pub symbol: Option<String>,

    #[command(flatten)]
    pub market: MarketArg,
}

#[derive(Debug, Clone, Args)]
pub struct AskArgs {
    /// Question to answer.
    pub question: String,

    /// Symbol the question is about; defaults to the market's first preset.
    #[arg(long, short)]
    pub symbol: Option<String>,

    #[command(flatten)]
    pub market: MarketArg,
}

#[derive(Debug, Clone, Args)]
pub struct PresetsArgs {
    /// Only list this market.
    #[arg(long, short, value_parser = parse_market)]
    pub market: Option<Market>,
}

fn parse_market(value: &str) -> Result<Market, tickerlens_core::ValidationError> {
    value.parse()
}
