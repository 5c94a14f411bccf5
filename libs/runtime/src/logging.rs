//! Logging bootstrap: console output per subsystem plus JSON files with
//! size-based rotation.
//!
//! Config keys other than `default` name a subsystem by target prefix
//! (`companies`, `api_ingress`, `tower_http`); `default` covers everything else.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::{FilterFn, Targets};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

/// `None` means the output is switched off.
fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" | "" => None,
        _ => Some(Level::INFO),
    }
}

/// True if `target` is `prefix` itself or one of its `::` children.
fn target_matches(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// -------- rotating file writers --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl RotatingFile {
    /// Open `path` (creating parent directories), rotating at `max_bytes`
    /// and keeping at most `max_backups` old files.
    fn open(path: &Path, max_bytes: usize, max_backups: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rot = FileRotate::new(
            path,
            AppendTimestamp::default(FileLimit::MaxFiles(max_backups)),
            ContentLimit::BytesSurpassed(max_bytes),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rot))))
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

/// Writer that drops everything when no file is configured for a record.
struct MaybeFile(Option<RotatingFile>);

impl Write for MaybeFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

/// Picks the log file of the subsystem owning a record's target.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    subsystems: Vec<(String, RotatingFile)>,
}

impl FileRouter {
    fn route(&self, target: &str) -> Option<RotatingFile> {
        self.subsystems
            .iter()
            .find(|(prefix, _)| target_matches(target, prefix))
            .map(|(_, f)| f.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.subsystems.is_empty()
    }
}

impl<'a> MakeWriter<'a> for FileRouter {
    type Writer = MaybeFile;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeFile(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeFile(self.route(meta.target()))
    }
}

// -------- plan: what goes where at which level --------

/// Level choices extracted from the config, independent of any I/O.
struct LogPlan {
    /// Explicit subsystem console levels.
    console: Targets,
    /// Explicit subsystem file levels (only for subsystems with a file).
    file: Targets,
    /// Level for records of no explicit subsystem.
    default_console: Option<Level>,
    default_file: Option<Level>,
    subsystems: Vec<String>,
}

impl LogPlan {
    fn from_config(cfg: &LoggingConfig) -> Self {
        let mut console = Targets::new().with_default(LevelFilter::OFF);
        let mut file = Targets::new().with_default(LevelFilter::OFF);
        let mut subsystems = Vec::new();

        for (name, section) in cfg.iter().filter(|(k, _)| k.as_str() != DEFAULT_SECTION) {
            subsystems.push(name.clone());
            if let Some(level) = parse_level(&section.console_level) {
                console = console.with_target(name.clone(), level);
            }
            if has_file(section) {
                if let Some(level) = parse_level(&section.file_level) {
                    file = file.with_target(name.clone(), level);
                }
            }
        }

        let default = cfg.get(DEFAULT_SECTION);
        Self {
            console,
            file,
            default_console: default.and_then(|s| parse_level(&s.console_level)),
            default_file: default
                .filter(|s| has_file(s))
                .and_then(|s| parse_level(&s.file_level)),
            subsystems,
        }
    }

    /// Filter for records that belong to no explicit subsystem.
    fn default_filter(&self, max: Level) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool> {
        let subsystems = self.subsystems.clone();
        FilterFn::new(move |meta: &tracing::Metadata<'_>| {
            meta.level() <= &max
                && !subsystems
                    .iter()
                    .any(|prefix| target_matches(meta.target(), prefix))
        })
    }
}

fn has_file(section: &Section) -> bool {
    !section.file.trim().is_empty()
}

/// Relative log paths live under `base_dir` (the server home dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if !has_file(section) {
        return None;
    }
    let path = resolve_log_path(&section.file, base_dir);
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let max_backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    match RotatingFile::open(&path, max_bytes as usize, max_backups) {
        Ok(f) => Some(f),
        Err(e) => {
            // The subscriber is not installed yet.
            eprintln!(
                "Failed to open log file for '{}' at {}: {}",
                name,
                path.display(),
                e
            );
            None
        }
    }
}

fn build_file_router(cfg: &LoggingConfig, base_dir: &Path) -> FileRouter {
    let mut router = FileRouter::default();
    for (name, section) in cfg {
        let Some(file) = open_section_file(name, section, base_dir) else {
            continue;
        };
        if name == DEFAULT_SECTION {
            router.default = Some(file);
        } else {
            router.subsystems.push((name.clone(), file));
        }
    }
    router
}

// -------- public init --------

/// Install the global subscriber described by `cfg`.
///
/// `base_dir` resolves relative log file paths (normally `server.home_dir`).
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let plan = LogPlan::from_config(cfg);
    let files = build_file_router(cfg, base_dir);
    let ansi = io::stdout().is_terminal();

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(plan.console.clone())
            .boxed(),
    );

    if let Some(level) = plan.default_console {
        layers.push(
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(plan.default_filter(level))
                .boxed(),
        );
    }

    if !files.is_empty() {
        layers.push(json_file_layer(files.clone()).with_filter(plan.file.clone()).boxed());
        if let Some(level) = plan.default_file {
            layers.push(
                json_file_layer(files)
                    .with_filter(plan.default_filter(level))
                    .boxed(),
            );
        }
    }

    let _ = Registry::default().with(layers).try_init();
}

fn json_file_layer<S>(files: FileRouter) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(files)
}
