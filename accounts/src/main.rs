//! A terminal front end for creating, updating and logging into an account

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

use accounts_core::{api, session::FileSession};
use app::{App, Effect, EffectContext, MountId};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::{io, process::ExitCode, sync::Arc};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
    time,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // the terminal belongs to the UI, so logs go to a file instead
    let _guard = match init_logging(&config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("could not set up logging: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let api = match api::Client::new(&config.api_url) {
        Ok(api) => api,
        Err(err) => {
            tracing::error!(?err, api_url = %config.api_url, "bad API URL");
            eprintln!("could not use {} as the API URL: {err}", config.api_url);
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::info!(api_url = %api.base_url(), "starting");

    let session = FileSession::new(config.session_path());
    tracing::debug!(path = ?session.path(), "using session file");
    let ctx = Arc::new(EffectContext::new(api));

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let res = run(terminal, App::new(Arc::new(session)), ctx).await;
    ratatui::restore();

    if let Err(err) = &res {
        tracing::error!(?err, "exiting with an error");
    }
    res
}

/// Send log lines to `accounts.log` in the data directory.
fn init_logging(config: &config::Config) -> Result<WorkerGuard, LoggingError> {
    std::fs::create_dir_all(config.data_dir())?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("accounts.log")
        .build(config.data_dir())?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter)?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(guard)
}

/// Reasons we couldn't get a log file going.
#[derive(Debug, thiserror::Error)]
enum LoggingError {
    #[error("could not create the data directory: {0}")]
    DataDir(#[from] io::Error),

    #[error("could not open the log file: {0}")]
    File(#[from] tracing_appender::rolling::InitError),

    #[error("bad log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("{0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Manage the lifecycle of the app
async fn run(
    mut terminal: DefaultTerminal,
    mut app: App,
    ctx: Arc<EffectContext>,
) -> io::Result<ExitCode> {
    // We expect side-effectful behaviors (network calls and timers) to take
    // place via async tasks. Once those tasks are done, we read their results
    // off of a channel. We keep track of outstanding effects, and which page
    // visit started them, so we can abort them when that page goes away.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects: Vec<(MountId, JoinHandle<()>)> = Vec::with_capacity(2);

    for effect in app.init() {
        dispatch(effect, &effect_tx, &ctx, &mut outstanding_effects);
    }
    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    let mut ticks = time::interval(time::Duration::from_secs(1));

    loop {
        // Wait for either external input or the async result of an effect.
        // Not every piece of external input matters to us, hence the `Option`.
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => {
                        Some(app::Action::Key(key_event))
                    }
                    Some(Err(err)) => {
                        Some(app::Action::Problem(err.to_string()))
                    }
                    _ => None,
                }
            },

            _ = ticks.tick() => {
                Some(app::Action::TimePassed)
            },

            effect_opt = effect_rx.recv() => {
                effect_opt.flatten()
            }
        };

        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                dispatch(effect, &effect_tx, &ctx, &mut outstanding_effects);
            }
        }

        terminal.draw(|frame| app.render(frame))?;

        // This list is never long (we prune on every pass) so a full scan is fine.
        outstanding_effects.retain(|(_, handle)| !handle.is_finished());

        // Nothing we have in flight needs to finish for a clean exit, and
        // network calls have no timeout, so we abort instead of waiting.
        if let Some(code) = app.should_exit() {
            for (_, handle) in outstanding_effects.drain(..) {
                handle.abort();
            }

            return Ok(code);
        }
    }
}

/// Either spawn an effect or, for cancellation, abort the tasks it names.
fn dispatch(
    effect: Effect,
    effect_tx: &UnboundedSender<Option<app::Action>>,
    ctx: &Arc<EffectContext>,
    outstanding_effects: &mut Vec<(MountId, JoinHandle<()>)>,
) {
    match effect.mount() {
        Some(mount) => {
            tracing::debug!(effect = effect.name(), ?mount, "spawning effect");
            outstanding_effects.push((
                mount,
                spawn_effect_task(effect_tx.clone(), Arc::clone(ctx), effect),
            ));
        }
        None => {
            if let Effect::Cancel(cancelled) = effect {
                let before = outstanding_effects.len();
                outstanding_effects.retain(|(mount, handle)| {
                    if *mount == cancelled {
                        handle.abort();
                        false
                    } else {
                        true
                    }
                });
                tracing::debug!(
                    mount = ?cancelled,
                    aborted = before - outstanding_effects.len(),
                    "cancelled effects"
                );
            }
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<Option<app::Action>>,
    ctx: Arc<EffectContext>,
    effect: Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let next_action = effect.run(&ctx).await;

        // A closed channel means the loop is gone and we're shutting down,
        // so the action has nowhere to go anyway.
        let _ = effect_tx.send(next_action);
    })
}
