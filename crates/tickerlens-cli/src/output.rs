use std::io::{self, Write};

use tickerlens_core::{Article, Dashboard, Section, NOT_AVAILABLE};

use crate::cli::OutputFormat;
use crate::commands::{AnswerReport, CommandOutput, NewsReport, PresetGroup, Report};
use crate::error::CliError;

/// Weekly bars and RSI points shown in the table view.
const RECENT_ROWS: usize = 12;

const NO_ARTICLES: &str = "No news articles found.";

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_output(&mut out, output, format, pretty)?;
    out.flush()?;

    Ok(())
}

fn write_output<W: Write>(
    out: &mut W,
    output: &CommandOutput,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let written = if pretty {
                serde_json::to_writer_pretty(&mut *out, &output.envelope)
            } else {
                serde_json::to_writer(&mut *out, &output.envelope)
            };
            written.map_err(|error| {
                if error.is_io() {
                    CliError::Io(error.into())
                } else {
                    CliError::Serialization(error)
                }
            })?;
            writeln!(out)?;
        }
        OutputFormat::Table => render_table(out, output)?,
    }

    Ok(())
}

fn render_table<W: Write>(out: &mut W, output: &CommandOutput) -> io::Result<()> {
    let meta = &output.envelope.meta;

    writeln!(out, "request_id  : {}", meta.request_id)?;
    writeln!(out, "schema      : {}", meta.schema_version)?;
    writeln!(out, "generated_at: {}", meta.generated_at)?;
    writeln!(
        out,
        "providers   : {}",
        meta.providers
            .iter()
            .map(|provider| provider.as_str())
            .collect::<Vec<_>>()
            .join(",")
    )?;
    writeln!(out, "latency_ms  : {}", meta.latency_ms)?;

    if !meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }
    writeln!(out)?;

    match &output.report {
        Report::Analyze(dashboard) => write_dashboard(out, dashboard)?,
        Report::News(report) => write_news_report(out, report)?,
        Report::Answer(report) => write_answer_report(out, report)?,
        Report::Presets(groups) => write_presets(out, groups)?,
    }

    if !output.envelope.errors.is_empty() {
        writeln!(out, "\nerrors:")?;
        for error in &output.envelope.errors {
            match &error.section {
                Some(section) => {
                    writeln!(out, "  - [{section}] {}: {}", error.code, error.message)?;
                }
                None => {
                    writeln!(out, "  - {}: {}", error.code, error.message)?;
                }
            }
        }
    }

    Ok(())
}

fn write_dashboard<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let analysis = &dashboard.analysis;
    let summary = &analysis.summary;

    let title = analysis
        .display_name
        .as_deref()
        .map(|name| format!("{name} ({})", analysis.symbol))
        .unwrap_or_else(|| analysis.symbol.to_string());
    writeln!(out, "{title} | {}", analysis.market.label())?;

    writeln!(out, "\nKey Statistics")?;
    writeln!(
        out,
        "  Current Price : {} ({})",
        summary.latest_price, summary.change_percent
    )?;
    writeln!(out, "  52-Week High  : {}", summary.period_high)?;
    writeln!(out, "  52-Week Low   : {}", summary.period_low)?;
    writeln!(out, "  Avg Volume    : {}", summary.mean_volume)?;

    writeln!(out, "\nMoving Averages")?;
    let moving_averages = [
        (analysis.indicators.sma_short, &summary.sma_short),
        (analysis.indicators.sma_long, &summary.sma_long),
    ];
    let mut shown = 0;
    for (average, formatted) in moving_averages {
        if let (Some(average), Some(formatted)) = (average, formatted) {
            writeln!(out, "  {}-period MA : {formatted}", average.window)?;
            shown += 1;
        }
    }
    if shown == 0 {
        writeln!(out, "  not enough history")?;
    }

    writeln!(out, "\nRecent Weekly Bars")?;
    writeln!(
        out,
        "  {:<10}  {:>12}  {:>12}  {:>12}  {:>12}  {:>14}",
        "date", "open", "high", "low", "close", "volume"
    )?;
    let bars = analysis.series.bars();
    for bar in &bars[bars.len().saturating_sub(RECENT_ROWS)..] {
        writeln!(
            out,
            "  {:<10}  {:>12.2}  {:>12.2}  {:>12.2}  {:>12.2}  {:>14}",
            bar.ts.format_date(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        )?;
    }

    writeln!(out, "\nRSI(14)")?;
    let rsi = &analysis.indicators.rsi;
    if rsi.is_empty() {
        writeln!(out, "  {NOT_AVAILABLE}")?;
    }
    for point in &rsi[rsi.len().saturating_sub(RECENT_ROWS)..] {
        writeln!(out, "  {}  {:>6.2}", point.ts.format_date(), point.value)?;
    }

    match &dashboard.news {
        Section::Ready(articles) => {
            writeln!(out, "\nLatest News")?;
            write_articles(out, articles)?;
        }
        Section::Failed(failure) => {
            writeln!(out, "\nLatest News")?;
            writeln!(out, "  unavailable: {}", failure.message)?;
        }
        Section::Skipped => {}
    }

    match &dashboard.answer {
        Section::Ready(answer) => {
            writeln!(out, "\nAnswer")?;
            write_indented(out, answer)?;
        }
        Section::Failed(failure) => {
            writeln!(out, "\nAnswer")?;
            writeln!(out, "  unavailable: {}", failure.message)?;
        }
        Section::Skipped => {}
    }

    Ok(())
}

fn write_articles<W: Write>(out: &mut W, articles: &[Article]) -> io::Result<()> {
    if articles.is_empty() {
        return writeln!(out, "  {NO_ARTICLES}");
    }

    for (index, article) in articles.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        let published = article
            .date
            .map(|date| date.format_date())
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned());
        writeln!(out, "  {}", article.title)?;
        writeln!(out, "  {}", article.url)?;
        writeln!(
            out,
            "  Source: {} | Published at: {published}",
            article.source_or_unknown()
        )?;
        writeln!(out, "  Image: {}", article.image_or_placeholder())?;
        writeln!(out, "  {}", article.body_or_placeholder())?;
    }

    Ok(())
}

fn write_news_report<W: Write>(out: &mut W, report: &NewsReport) -> io::Result<()> {
    writeln!(out, "News for {} (query: {})", report.symbol, report.query)?;
    write_articles(out, &report.articles)
}

fn write_answer_report<W: Write>(out: &mut W, report: &AnswerReport) -> io::Result<()> {
    writeln!(out, "{}: {}", report.symbol, report.question)?;
    writeln!(out, "headlines used: {}\n", report.headlines)?;
    write_indented(out, &report.answer)
}

fn write_presets<W: Write>(out: &mut W, groups: &[PresetGroup]) -> io::Result<()> {
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{} ({})", group.label, group.currency.code())?;
        writeln!(out, "  {}", group.symbols.join(", "))?;
        if let Some(help) = group.help {
            writeln!(out, "  {help}")?;
        }
    }

    Ok(())
}

fn write_indented<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    for line in text.lines() {
        writeln!(out, "  {line}")?;
    }

    Ok(())
}
