//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;

use super::utils::{format_utc_datetime, format_utc_time, log_dir, log_file_path, prune_logs, strip_ansi};

/// Target for section headers on the console.
pub const STAGE_TARGET: &str = "bethini::stage";
/// Target for changes that were not written because of `--dry-run`.
pub const DRY_RUN_TARGET: &str = "bethini::dry_run";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to a log file
/// with timestamps and ANSI codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Create the log file at `path`, write a run header, and return a layer
    /// appending to it. Returns `None` if the file cannot be created.
    pub(super) fn new(path: &Path) -> Option<Self> {
        let version =
            option_env!("BETHINI_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let header = format!(
            "==========================================\n\
             Bethini {version} {}\n\
             ==========================================\n",
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = strip_ansi(&extractor.message);
        let ts = format_utc_time();

        let line = match (level, target) {
            (tracing::Level::INFO, STAGE_TARGET) => format!("[{ts}] ==> {msg}"),
            (tracing::Level::INFO, DRY_RUN_TARGET) => format!("[{ts}]     [dry run] {msg}"),
            (tracing::Level::ERROR, _) => format!("[{ts}]     [error] {msg}"),
            (tracing::Level::WARN, _) => format!("[{ts}]     [warn] {msg}"),
            (tracing::Level::DEBUG | tracing::Level::TRACE, _) => {
                format!("[{ts}]     [debug] {target}: {msg}")
            }
            _ => format!("[{ts}]     {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] for console output.
struct BethiniFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for BethiniFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = &extractor.message;

        match level {
            tracing::Level::ERROR => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::WARN => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::INFO if target == STAGE_TARGET => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            tracing::Level::INFO if target == DRY_RUN_TARGET => {
                writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}")
            }
            tracing::Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// How the global subscriber should be set up.
#[derive(Debug, Clone, Copy)]
pub struct LogSettings<'a> {
    /// Console verbosity.
    pub level: LevelFilter,
    /// Application directory; log files go to `<root>/logs/`. `None`
    /// disables the file log.
    pub root: Option<&'a Path>,
    /// Command name used in the log file name.
    pub command: &'a str,
    /// Log files to keep, including this run's; `-1` keeps all.
    pub max_logs: i32,
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console events go to stdout (`INFO` and below) and stderr (`WARN` and
/// above). Unless disabled, every event at `DEBUG` and above is also written
/// to a new file under `<root>/logs/`, and older files beyond
/// [`LogSettings::max_logs`] are removed.
/// Must be called once at program startup, before any logging.
///
/// Returns the path of this run's log file, if one was created.
#[must_use]
pub fn init_subscriber(settings: &LogSettings<'_>) -> Option<PathBuf> {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(BethiniFormatter)
        .with_writer(make_writer)
        .with_filter(settings.level);

    let log_path = settings
        .root
        .filter(|_| settings.max_logs != 0)
        .and_then(log_dir)
        .map(|dir| log_file_path(&dir, settings.command));
    let file_layer = log_path
        .as_deref()
        .and_then(FileLayer::new)
        .map(|l| l.with_filter(LevelFilter::DEBUG));
    let log_path = log_path.filter(|_| file_layer.is_some());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_path.as_deref().and_then(Path::parent) {
        let removed = prune_logs(dir, settings.max_logs);
        if removed > 0 {
            tracing::debug!("removed {removed} old log file(s)");
        }
    }
    log_path
}
