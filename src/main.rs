//! Main entry point for cyberthum CLI

use anyhow::Context;
use clap::{CommandFactory, Parser};
use cyberthum::cli::args::VerbosityLevel;
use cyberthum::cli::output::OutputFormatter;
use cyberthum::cli::Args;
use cyberthum::core::{
    update, AppState, Availability, Command, DownloadStatus, Downloader, Message, Progress,
    QueueMessage,
};
use cyberthum::ThumbError;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Events sent back by running downloads
enum DownloadEvent {
    Progress(String, Progress),
    Finished(String, Result<PathBuf, ThumbError>),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbosity_level())?;

    debug!("Starting cyberthum with args: {:?}", args);

    if args.urls.is_empty() {
        Args::command().print_help()?;
        return Ok(());
    }

    let downloader = build_downloader(&args)?;
    let mut formatter =
        OutputFormatter::new(args.verbosity_level()).with_progress(!args.no_progress);

    let ok = run(&args, &downloader, &mut formatter).await?;
    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

/// Configure a downloader from the command line
fn build_downloader(args: &Args) -> anyhow::Result<Downloader> {
    let mut downloader = Downloader::new().with_streaming(!args.no_stream);

    if let Some(output) = &args.output {
        downloader = downloader.with_output_path(output);
    }
    if let Some(timeout) = args.timeout_duration() {
        downloader = downloader.with_timeout(timeout);
    }
    if let Some(user_agent) = &args.user_agent {
        downloader = downloader.with_user_agent(user_agent);
    }
    if let Some(proxy) = &args.proxy {
        downloader = downloader.with_proxy(proxy);
    }
    if let Some(host) = &args.thumbnail_host {
        url::Url::parse(host)
            .map_err(ThumbError::from)
            .with_context(|| format!("invalid thumbnail host: {}", host))?;
        downloader = downloader.with_thumbnail_host(host);
    }

    // Fail on a bad proxy before any input is processed
    downloader.client()?;

    Ok(downloader)
}

/// Process every input, wait for the downloads and report.
///
/// Returns `false` when an input was rejected or a download failed.
async fn run(
    args: &Args,
    downloader: &Downloader,
    formatter: &mut OutputFormatter,
) -> anyhow::Result<bool> {
    let start_time = Instant::now();
    let mut state =
        AppState::new().with_thumbnail_host(downloader.options().thumbnail_host.clone());
    let (tx, mut rx) = mpsc::unbounded_channel::<DownloadEvent>();
    let mut rejected = 0usize;
    let mut json_items = Vec::new();

    for input in &args.urls {
        update(&mut state, Message::InputChanged(input.clone()));
        let Some(Command::Verify(set)) = update(&mut state, Message::Fetch) else {
            if let Some(error) = &state.error {
                formatter.print_fetch_error(input, error);
            }
            rejected += 1;
            continue;
        };

        if args.print_urls {
            formatter.print_urls(&set);
            continue;
        }

        let availability = if args.no_verify {
            Availability::all()
        } else {
            let spinner = formatter.verifying(set.video_id());
            let availability = downloader.verify(&set).await?;
            spinner.finish_and_clear();
            availability
        };
        update(&mut state, Message::Verified(availability));

        let mut tier_missing = false;
        if let Some(tier) = args.tier {
            update(&mut state, Message::SelectTier(tier));
            if args.is_tier_missing(state.selected) {
                formatter.warning(&format!(
                    "{} is not available for {}",
                    tier.label(),
                    set.video_id()
                ));
                tier_missing = true;
                rejected += 1;
            }
        }

        if args.json {
            json_items.push(serde_json::json!({
                "thumbnails": set,
                "availability": availability,
                "selected": state.selected,
            }));
            continue;
        }

        formatter.print_thumbnail_table(&set, state.availability().as_ref(), state.selected);
        if args.is_dry_run() || tier_missing {
            continue;
        }

        let Some(Command::Download { id, url, file_name }) =
            update(&mut state, Message::RequestDownload)
        else {
            continue;
        };

        if let Some(entry) = state.queue.get(&id) {
            formatter.start_download(entry, &file_name);
        }
        info!("Queued download {} for {}", id, url);

        let thumbnails = downloader.thumbnail_downloader()?;
        let tx = tx.clone();
        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let progress_id = id.clone();
            let result = thumbnails
                .download_with_progress(&url, &file_name, move |progress| {
                    let _ = progress_tx.send(DownloadEvent::Progress(progress_id.clone(), progress));
                })
                .await;
            let _ = tx.send(DownloadEvent::Finished(id, result));
        });
    }
    drop(tx);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    }

    let mut completed = 0usize;
    let mut failed = 0usize;
    while let Some(event) = rx.recv().await {
        match event {
            DownloadEvent::Progress(id, progress) => {
                formatter.update_download(&id, &progress);
                update(
                    &mut state,
                    Message::Queue(QueueMessage::from_progress(&id, &progress)),
                );
            }
            DownloadEvent::Finished(id, Ok(path)) => {
                completed += 1;
                formatter.finish_download(
                    &id,
                    DownloadStatus::Completed,
                    &format!("Saved {}", path.display()),
                );
            }
            DownloadEvent::Finished(id, Err(e)) => {
                failed += 1;
                update(&mut state, Message::Queue(QueueMessage::Failed { id: id.clone() }));
                formatter.finish_download(
                    &id,
                    DownloadStatus::Failed,
                    &format!("[{}] {}", e.code(), e),
                );
            }
        }
    }

    if completed + failed > 0 {
        formatter.print_queue(&state.queue);
        formatter.print_summary(completed, failed, start_time.elapsed());
    }

    Ok(rejected == 0 && failed == 0)
}

/// Initialize logging system
fn init_logging(verbosity: VerbosityLevel) -> anyhow::Result<()> {
    // RUST_LOG wins over the verbosity flags
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
