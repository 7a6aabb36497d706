use std::{future::IntoFuture as _, io, rc::Rc, sync::OnceLock};

use common::{operations::Start, Handler as _};
use roster::{Args, Config, Console, Gate, Service};
use service::{
    gate::Routes,
    infra::{
        documents,
        identity::{self, Changes},
        local_store,
    },
    task::{Background, SessionGate},
};
use tokio::io::BufReader;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        client,
        storage,
        documents,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let documents = match documents.path {
        Some(path) => {
            documents::Memory::from_json_file(&path).map_err(|e| {
                log::error!(
                    "failed to load students from `{}`: {e}",
                    path.display(),
                );
            })?
        }
        None => documents::Memory::default(),
    };
    log::info!("serving {} students", documents.len());

    let local_store =
        local_store::File::open(&storage.path).map_err(|e| {
            log::error!(
                "failed to open local store at `{}`: {e}",
                storage.path.display(),
            );
        })?;

    let locale = client.locale;
    let service = Service::new(
        client.into(),
        identity::Emulator::new(),
        documents,
        local_store,
    );

    let (navigator, routes) = Routes::new();
    let gate: Rc<Gate> =
        Rc::new(SessionGate::new(service.clone(), navigator));

    let mut background = Background::default();
    background.spawn("session gate", {
        let gate = Rc::clone(&gate);
        async move { gate.execute(Start(Changes)).await }
    });

    let console = Console::new(service, gate, locale, io::stdout());
    let input = BufReader::new(tokio::io::stdin());

    tokio::select! {
        res = console.run(input, routes) => res.map_err(|e| {
            log::error!("console failed: {e}");
        }),
        res = background.into_future() => res.map_err(|e| {
            log::error!("background task failed: {e}");
        }),
    }
}
