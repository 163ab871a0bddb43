use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

use engine::{ConverterConfig, ConverterView};
use query::{PersistedState, QueryField};

#[derive(Debug, Parser)]
#[clap(name = "converter", version)]
pub struct Cli {
    /// Currency to convert from (e.g. USD)
    #[clap(long)]
    pub from: Option<String>,

    /// Currency to convert to (e.g. ETH)
    #[clap(long)]
    pub to: Option<String>,

    /// Amount of `--from` currency
    #[clap(long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Shared link query string to start from, e.g. "amount=5&currencyFrom=ETH&currencyTo=USD"
    #[clap(long)]
    pub link: Option<String>,

    /// Price feed endpoint (overrides FEED_URL)
    #[clap(long)]
    pub feed_url: Option<String>,

    /// Input debounce in milliseconds (overrides DEBOUNCE_MS)
    #[clap(long)]
    pub debounce_ms: Option<u64>,

    /// Result settle delay in milliseconds (overrides SETTLE_MS)
    #[clap(long)]
    pub settle_ms: Option<u64>,

    /// Read commands from stdin instead of converting once
    #[clap(long)]
    pub interactive: bool,

    /// Emit logs as JSON lines
    #[clap(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub(crate) fn config(&self) -> ConverterConfig {
        let mut cfg = ConverterConfig::from_env();

        if let Some(url) = &self.feed_url {
            cfg.feed_url = url.clone();
        }
        if let Some(ms) = self.debounce_ms {
            cfg.debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = self.settle_ms {
            cfg.settle = Duration::from_millis(ms);
        }

        cfg
    }

    /// Initial query state: the link first, explicit flags on top.
    pub(crate) fn seed_state(&self) -> PersistedState {
        let mut state = self
            .link
            .as_deref()
            .map(PersistedState::from_query_string)
            .unwrap_or_default();

        let flags = [
            (QueryField::CurrencyFrom, &self.from),
            (QueryField::CurrencyTo, &self.to),
            (QueryField::Amount, &self.amount),
        ];
        for (field, value) in flags {
            if let Some(v) = value {
                state.set(field.as_str(), v.clone());
            }
        }

        state
    }
}

/// Interactive command read from stdin.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Amount(String),
    From(String),
    To(String),
    Swap,
    Back,
    Show,
    Link,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        bail!("empty command");
    };
    let arg = parts.next().map(str::to_string);

    let cmd = match (verb.to_lowercase().as_str(), arg) {
        ("amount", Some(v)) => Command::Amount(v),
        ("amount", None) => Command::Amount(String::new()),
        ("from", Some(c)) => Command::From(c),
        ("to", Some(c)) => Command::To(c),
        ("from" | "to", None) => bail!("{verb} needs a currency code"),
        ("swap", _) => Command::Swap,
        ("back", _) => Command::Back,
        ("show", _) => Command::Show,
        ("link", _) => Command::Link,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => bail!("unknown command {other:?} (amount, from, to, swap, back, show, link, quit)"),
    };

    Ok(cmd)
}

/// One-line rendering of the converter view.
pub(crate) fn render(view: &ConverterView) -> String {
    if view.is_fetching_feed {
        return "loading prices...".to_string();
    }

    let pair = format!(
        "{} {} -> {}",
        view.form.amount, view.form.currency_from, view.form.currency_to
    );

    match (view.displayed_result, view.is_calculating) {
        (Some(result), false) => format!("{pair} = {result} {}", view.form.currency_to),
        (Some(result), true) => format!("{pair} = {result} (calculating...)"),
        (None, true) => format!("{pair} (calculating...)"),
        (None, false) => format!("{pair}: nothing to do..."),
    }
}
