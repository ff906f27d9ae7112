mod analyze;
mod ask;
mod news;
mod presets;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tickerlens_core::{
    Analyzer, CompletionClient, Dashboard, DuckDuckGoAdapter, Envelope, EnvelopeError,
    FixtureCompletionClient, FixtureNewsSource, FixtureSeriesFetcher, GroqAdapter, Market,
    ProviderId, ServiceConfig, YahooAdapter,
};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub use ask::AnswerReport;
pub use news::NewsReport;
pub use presets::PresetGroup;

/// Command-specific payload kept alongside the envelope for table rendering.
#[derive(Debug)]
pub enum Report {
    Analyze(Box<Dashboard>),
    News(NewsReport),
    Answer(AnswerReport),
    Presets(Vec<PresetGroup>),
}

pub struct CommandResult {
    pub report: Report,
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub providers: Vec<ProviderId>,
}

impl CommandResult {
    pub fn ok(report: Report, data: Value, providers: Vec<ProviderId>) -> Self {
        Self {
            report,
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            providers,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Rendered command: the machine-readable envelope plus its report.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub report: Report,
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Analyze(args) => analyze::run(args, &CommandContext::load(cli)?).await?,
        Command::News(args) => news::run(args, &CommandContext::load(cli)?).await?,
        Command::Ask(args) => ask::run(args, &CommandContext::load(cli)?).await?,
        Command::Presets(args) => presets::run(args)?,
    };

    let CommandResult {
        report,
        data,
        mut warnings,
        errors,
        providers,
    } = command_result;

    if cli.mock && !matches!(report, Report::Presets(_)) {
        warnings.push(String::from("--mock: showing deterministic offline data"));
    }

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut metadata = Metadata::new(providers, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let envelope = Envelope::with_errors(metadata.into_envelope_meta()?, data, errors)?;
    Ok(CommandOutput { envelope, report })
}

/// Collaborator wiring shared by the data commands.
pub struct CommandContext {
    mock: bool,
    config: ServiceConfig,
}

impl CommandContext {
    pub fn new(mock: bool, config: ServiceConfig) -> Self {
        Self { mock, config }
    }

    /// Read configuration once; `--timeout-ms` overrides the environment.
    fn load(cli: &Cli) -> Result<Self, CliError> {
        let config = match &cli.env_file {
            Some(path) => ServiceConfig::from_env_file(path)?,
            None => ServiceConfig::from_env()?,
        };
        let config = match cli.timeout_ms {
            Some(timeout_ms) => config.with_timeout_ms(timeout_ms),
            None => config,
        };
        debug!(?config, mock = cli.mock, "configuration loaded");
        Ok(Self::new(cli.mock, config))
    }

    /// Analyzer without a completion client.
    pub fn analyzer(&self) -> Analyzer {
        if self.mock {
            Analyzer::new(
                Arc::new(FixtureSeriesFetcher::new()),
                Arc::new(FixtureNewsSource),
                &self.config,
            )
        } else {
            Analyzer::new(
                Arc::new(YahooAdapter::new(&self.config)),
                Arc::new(DuckDuckGoAdapter::new(&self.config)),
                &self.config,
            )
        }
    }

    /// Analyzer able to answer questions.
    ///
    /// Fails before any provider is contacted when the API key is missing.
    pub fn answering_analyzer(&self) -> Result<Analyzer, CliError> {
        let completion: Arc<dyn CompletionClient> = if self.mock {
            Arc::new(FixtureCompletionClient)
        } else {
            Arc::new(GroqAdapter::new(&self.config)?)
        };
        Ok(self.analyzer().with_completion(completion))
    }
}

/// The requested symbol, or the market's default preset.
fn symbol_or_default(symbol: Option<&str>, market: Market) -> String {
    symbol
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .unwrap_or(market.default_symbol())
        .to_owned()
}

/// Envelope errors for each degraded dashboard section.
fn section_errors(dashboard: &Dashboard) -> Result<Vec<EnvelopeError>, CliError> {
    dashboard
        .degraded()
        .into_iter()
        .map(|(section, failure)| {
            Ok(EnvelopeError::new(failure.code.as_str(), failure.message.as_str())?
                .with_section(section)
                .with_retryable(failure.retryable))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_symbol_falls_back_to_first_preset() {
        assert_eq!(symbol_or_default(None, Market::Domestic), "RELIANCE.NS");
        assert_eq!(symbol_or_default(Some("  "), Market::Foreign), "AAPL");
        assert_eq!(symbol_or_default(Some(" tcs "), Market::Domestic), "tcs");
    }

    #[test]
    fn missing_key_fails_before_fetching() {
        let context = CommandContext::new(false, ServiceConfig::default());
        let error = context.answering_analyzer().err().expect("no key configured");
        assert_eq!(error.exit_code(), 6);
    }

    #[test]
    fn mock_mode_needs_no_key() {
        let context = CommandContext::new(true, ServiceConfig::default());
        assert!(context.answering_analyzer().is_ok());
    }
}
