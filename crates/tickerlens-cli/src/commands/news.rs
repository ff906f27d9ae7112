use serde::Serialize;
use tickerlens_core::{Article, CanonicalSymbol};

use crate::cli::NewsArgs;
use crate::error::CliError;

use super::{symbol_or_default, CommandContext, CommandResult, Report};

#[derive(Debug, Serialize)]
pub struct NewsReport {
    pub symbol: CanonicalSymbol,
    pub query: String,
    pub articles: Vec<Article>,
}

pub async fn run(args: &NewsArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let market = args.market.market;
    let analyzer = context.analyzer();

    // The company name for the query comes from the series metadata.
    let analysis = analyzer
        .analyze(&symbol_or_default(args.symbol.as_deref(), market), market)
        .await?;
    let articles = analyzer.news(&analysis).await?;

    let report = NewsReport {
        symbol: analysis.symbol.clone(),
        query: analysis.news_query().to_owned(),
        articles,
    };
    let data = serde_json::to_value(&report)?;
    let providers = vec![analyzer.series_provider(), analyzer.news_provider()];

    Ok(CommandResult::ok(Report::News(report), data, providers))
}
