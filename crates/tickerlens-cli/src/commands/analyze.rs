use tickerlens_core::{DashboardRequest, LONG_SMA_WINDOW};

use crate::cli::AnalyzeArgs;
use crate::error::CliError;

use super::{section_errors, symbol_or_default, CommandContext, CommandResult, Report};

pub async fn run(args: &AnalyzeArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let market = args.market.market;
    let question = args
        .question
        .as_deref()
        .map(str::trim)
        .filter(|question| !question.is_empty());

    // Build the completion client first so a missing key fails before any fetch.
    let analyzer = match question {
        Some(_) => context.answering_analyzer()?,
        None => context.analyzer(),
    };

    let mut request = DashboardRequest::new(symbol_or_default(args.symbol.as_deref(), market), market);
    if let Some(question) = question {
        request = request.with_question(question);
    }
    if args.no_news {
        request = request.without_news();
    }

    let dashboard = analyzer.dashboard(&request).await?;
    let errors = section_errors(&dashboard)?;
    let data = serde_json::to_value(&dashboard)?;
    let providers = dashboard.providers.clone();

    let bars = dashboard.analysis.series.len();
    let mut result = CommandResult::ok(Report::Analyze(Box::new(dashboard)), data, providers)
        .with_errors(errors);
    if bars < LONG_SMA_WINDOW {
        result = result.with_warning(format!(
            "{LONG_SMA_WINDOW}-period MA omitted: only {bars} weekly bars available"
        ));
    }
    Ok(result)
}
