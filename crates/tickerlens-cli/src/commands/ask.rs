use serde::Serialize;
use tickerlens_core::{CanonicalSymbol, EnvelopeError, ValidationError};
use tracing::warn;

use crate::cli::AskArgs;
use crate::error::CliError;

use super::{symbol_or_default, CommandContext, CommandResult, Report};

#[derive(Debug, Serialize)]
pub struct AnswerReport {
    pub symbol: CanonicalSymbol,
    pub question: String,
    pub headlines: usize,
    pub answer: String,
}

pub async fn run(args: &AskArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let question = args.question.trim();
    if question.is_empty() {
        return Err(ValidationError::EmptyQuestion.into());
    }

    let market = args.market.market;
    let analyzer = context.answering_analyzer()?;
    let analysis = analyzer
        .analyze(&symbol_or_default(args.symbol.as_deref(), market), market)
        .await?;

    let mut errors = Vec::new();
    let articles = match analyzer.news(&analysis).await {
        Ok(articles) => articles,
        Err(error) => {
            warn!(error = %error, "answering without headlines");
            errors.push(
                EnvelopeError::new(error.code(), error.to_string())?
                    .with_section("news")
                    .with_retryable(error.retryable()),
            );
            Vec::new()
        }
    };

    let answer = analyzer.ask(&analysis, &articles, question).await?;

    let report = AnswerReport {
        symbol: analysis.symbol.clone(),
        question: question.to_owned(),
        headlines: articles.len(),
        answer,
    };
    let data = serde_json::to_value(&report)?;
    let mut providers = vec![analyzer.series_provider(), analyzer.news_provider()];
    providers.extend(analyzer.completion_provider());

    Ok(CommandResult::ok(Report::Answer(report), data, providers).with_errors(errors))
}
