pub mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use cli::{Cli, Command, parse_command, render};
use common::logger::{init_json_logger, init_logger};
use engine::{ConverterHandle, ConverterService};
use feed::FeedClient;
use query::{InMemoryQueryStore, QueryStore};

/// Convert once: wait for prices, then for the result to settle.
async fn run_once(handle: &ConverterHandle) -> Result<()> {
    let view = handle.wait_for(|v| !v.is_fetching_feed).await?;

    if view.currency_options.is_empty() {
        anyhow::bail!("price feed unavailable; nothing to convert with");
    }

    let view = if view.is_calculating {
        handle.wait_for(|v| !v.is_calculating).await?
    } else {
        view
    };

    println!("{}", render(&view));

    if view.displayed_result.is_none() {
        println!("available currencies: {}", view.currency_options.join(", "));
    }

    Ok(())
}

/// Print the view whenever the displayed result or the calculating flag changes.
fn spawn_renderer(handle: &ConverterHandle) -> tokio::task::JoinHandle<()> {
    let mut rx = handle.subscribe();

    tokio::spawn(async move {
        let mut last = None;

        while rx.changed().await.is_ok() {
            let view = rx.borrow_and_update().clone();
            let key = (view.displayed_result.map(f64::to_bits), view.is_calculating);

            if last != Some(key) && !view.is_fetching_feed {
                last = Some(key);
                println!("{}", render(&view));
            }
        }
    })
}

async fn run_interactive(handle: &ConverterHandle, store: &InMemoryQueryStore) -> Result<()> {
    let renderer = spawn_renderer(handle);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("commands: amount <x>, from <code>, to <code>, swap, back, show, link, quit");

    while let Some(line) = lines.next_line().await.context("read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match cmd {
            Command::Amount(v) => handle.on_amount_change(v).await?,
            Command::From(c) => handle.on_currency_from_change(c).await?,
            Command::To(c) => handle.on_currency_to_change(c).await?,
            Command::Swap => handle.on_swap().await?,
            Command::Back => {
                if !store.back() {
                    println!("no earlier state");
                }
            }
            Command::Show => {
                let view = handle.view();
                println!("{}", render(&view));
                println!("currencies: {}", view.currency_options.join(", "));
            }
            Command::Link => println!("?{}", store.snapshot()?.to_query_string()),
            Command::Quit => break,
        }
    }

    renderer.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        init_json_logger("converter");
    } else {
        init_logger("converter");
    }

    let cfg = cli.config();
    info!(feed_url = %cfg.feed_url, debounce_ms = cfg.debounce.as_millis() as u64, settle_ms = cfg.settle.as_millis() as u64, "starting converter");

    let client = FeedClient::new(cfg.feed_url.clone(), cfg.feed_timeout)
        .context("build price feed client")?;
    let store = Arc::new(InMemoryQueryStore::new(cli.seed_state()));

    let (handle, task) = ConverterService::spawn(&cfg, Arc::new(client), store.clone());

    let outcome = if cli.interactive {
        run_interactive(&handle, &store).await
    } else {
        run_once(&handle).await
    };

    if let Err(e) = handle.shutdown().await {
        warn!(error = %e, "converter already stopped");
    }
    task.await.context("converter task panicked")?;

    outcome?;

    println!("link: ?{}", store.snapshot()?.to_query_string());
    Ok(())
}
