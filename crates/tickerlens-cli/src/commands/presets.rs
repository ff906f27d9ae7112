use serde::Serialize;
use tickerlens_core::{CurrencyContext, Market};

use crate::cli::PresetsArgs;
use crate::error::CliError;

use super::{CommandResult, Report};

const DOMESTIC_HELP: &str =
    "Add .NS for NSE stocks (e.g. RELIANCE.NS) or .BO for BSE stocks (e.g. RELIANCE.BO); bare symbols get .NS";

#[derive(Debug, Serialize)]
pub struct PresetGroup {
    pub market: Market,
    pub label: &'static str,
    pub currency: CurrencyContext,
    pub symbols: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

impl PresetGroup {
    fn for_market(market: Market) -> Self {
        Self {
            market,
            label: market.label(),
            currency: market.currency(),
            symbols: market.presets(),
            help: (market == Market::Domestic).then_some(DOMESTIC_HELP),
        }
    }
}

pub fn run(args: &PresetsArgs) -> Result<CommandResult, CliError> {
    let groups = match args.market {
        Some(market) => vec![PresetGroup::for_market(market)],
        None => Market::ALL.into_iter().map(PresetGroup::for_market).collect(),
    };
    let data = serde_json::to_value(&groups)?;

    Ok(CommandResult::ok(Report::Presets(groups), data, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_both_markets_by_default() {
        let result = run(&PresetsArgs { market: None }).expect("presets");
        assert_eq!(result.data[0]["label"], "Indian Stocks");
        assert_eq!(result.data[0]["symbols"][0], "RELIANCE.NS");
        assert_eq!(result.data[1]["symbols"][9], "V");
        assert!(result.data[1].get("help").is_none());
    }

    #[test]
    fn filters_by_market() {
        let result = run(&PresetsArgs {
            market: Some(Market::Foreign),
        })
        .expect("presets");
        assert_eq!(result.data.as_array().map(Vec::len), Some(1));
        assert_eq!(result.data[0]["currency"], "dollar");
    }
}
