use std::sync::Arc;

use anyhow::{bail, Context};
use related_view_core::{ErrorDetail, ParentKey};
use related_view_engine::{LocalChannel, RelatedView, ReqwestFetcher, ViewDeps};
use tokio::io::{AsyncBufReadExt, BufReader};
use view_logging::{view_debug, view_info, view_warn};

use crate::config::AppConfig;
use crate::feed::{parse_command, Command};
use crate::render::{render, TerminalToasts};

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    if config.parent_key.trim().is_empty() {
        bail!("no parent_key configured");
    }

    let fetcher = ReqwestFetcher::new(&config.base_url, config.fetch_settings())
        .with_context(|| format!("invalid base_url {}", config.base_url))?;
    let channel = Arc::new(LocalChannel::new());
    let mut deps = ViewDeps::new(Arc::new(fetcher), channel.clone(), Arc::new(TerminalToasts));
    deps.topic = config.channel.clone();

    let view = RelatedView::mount(deps, ParentKey::new(config.parent_key.trim()));
    let mut view_rx = view.watch();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    view_info!("Related view running; reading commands from stdin");

    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let model = view_rx.borrow_and_update().clone();
                for line in render(&model) {
                    println!("{line}");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Publish(payload)) => {
                        let delivered = channel.publish(&config.channel, &payload);
                        view_debug!("Published change event to {} subscriber(s)", delivered);
                    }
                    Ok(Command::SetParent(parent_key)) => view.set_parent_key(parent_key),
                    Ok(Command::TransportError(message)) => {
                        channel.report_error(ErrorDetail::new(message));
                    }
                    Ok(Command::Quit) => break,
                    Ok(Command::Empty) => {}
                    Err(err) => {
                        view_warn!("Ignoring input line: {}", err);
                        eprintln!("{err}");
                    }
                }
            }
        }
    }

    view.unmount().await;
    view_info!("Related view stopped");
    Ok(())
}
