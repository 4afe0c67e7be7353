use crate::{
    config::LogSettings,
    log::{log_level::LogLevel, log_record::LogRecord, logger_handle::LoggerHandle},
};

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, TrySendError},
    thread::{self, JoinHandle},
    time::{SystemTime, UNIX_EPOCH},
};

/// Flush every 100 lines when debugging, so a crash leaves a useful tail.
#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u32 = 100;

#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u32 = 1_000;

/// Report dropped UI lines once this many have piled up.
const UI_DROP_REPORT: usize = 10;

/// Bounded, non-blocking logger writing one file per process.
///
/// Producers enqueue through [`LoggerHandle`]; a `logger-worker` thread
/// drains the queue into `<dir>/<app>-<YYYYMMDD_HHMMSS>-pid<N>.log`. Warn and
/// Error lines are flushed immediately. A sample of the stream (every Warn and
/// Error, one in `sample_every` of the rest) is mirrored onto a second bounded
/// channel for on-screen display.
pub struct Logger {
    handle: LoggerHandle,
    ui_rx: Receiver<String>,
    worker: Option<JoinHandle<()>>,
    file_path: PathBuf,
}

impl Logger {
    /// Start a logger configured by `[Logging]` settings.
    ///
    /// Without a configured directory the file goes to `logs/` next to the
    /// executable.
    #[must_use]
    pub fn start(
        app_name: &str,
        settings: &LogSettings,
        cap: usize,
        ui_cap: usize,
        sample_every: u32,
    ) -> Self {
        let dir = settings
            .dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| exe_dir_fallback_cwd().join("logs"));
        let name = settings.file_name.as_deref().unwrap_or(app_name);
        Self::start_in_dir(dir, name, settings.min_level, cap, ui_cap, sample_every)
    }

    /// Start a logger writing under `dir`, creating it if missing.
    pub fn start_in_dir<D: AsRef<Path>>(
        dir: D,
        app_name: &str,
        min_level: LogLevel,
        cap: usize,
        ui_cap: usize,
        sample_every: u32,
    ) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let sample_every = sample_every.max(1);
        let file_path = dir.join(format!(
            "{app_name}-{}-pid{}.log",
            timestamp_for_filename(SystemTime::now()),
            std::process::id()
        ));

        let (tx, rx) = mpsc::sync_channel::<LogRecord>(cap.max(1));
        let (ui_tx, ui_rx) = mpsc::sync_channel::<String>(ui_cap.max(1));

        let path = file_path.clone();
        let worker = thread::Builder::new()
            .name("logger-worker".into())
            .spawn(move || write_loop(&path, &rx, &ui_tx, sample_every))
            .ok();

        Self {
            handle: LoggerHandle { tx, min_level },
            ui_rx,
            worker,
            file_path,
        }
    }

    /// Enqueue a line without blocking; see [`LoggerHandle::try_log`].
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), TrySendError<LogRecord>> {
        self.handle.try_log(level, text, target)
    }

    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    /// One sampled line for on-screen display, if any is waiting.
    #[must_use]
    pub fn try_recv_ui(&self) -> Option<String> {
        self.ui_rx.try_recv().ok()
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Drop this logger's handle and wait for the writer to drain.
    ///
    /// Returns once every other [`LoggerHandle`] clone is gone too; callers
    /// drop their sinks first.
    pub fn finish(mut self) {
        let worker = self.worker.take();
        drop(self);
        if let Some(worker) = worker {
            let _ = worker.join();
        }
    }
}

fn write_loop(
    path: &Path,
    rx: &Receiver<LogRecord>,
    ui_tx: &mpsc::SyncSender<String>,
    sample_every: u32,
) {
    // Target file, then a temp fallback, then nowhere. Never panic.
    let opened = OpenOptions::new().create(true).append(true).open(path);
    let writer: Box<dyn Write + Send> = match opened {
        Ok(f) => Box::new(f),
        Err(_) => {
            let fallback = std::env::temp_dir().join("tcpcapture-fallback.log");
            match OpenOptions::new().create(true).append(true).open(fallback) {
                Ok(f) => Box::new(f),
                Err(_) => Box::new(io::sink()),
            }
        }
    };
    let mut out = BufWriter::new(writer);

    let mut sampled: u32 = 0;
    let mut written: u32 = 0;
    let mut dropped_to_ui: usize = 0;

    while let Ok(rec) = rx.recv() {
        let _ = writeln!(out, "{}", rec.file_line());
        written = written.wrapping_add(1);
        if rec.level.is_problem() || written.is_multiple_of(FLUSH_BATCH_SIZE) {
            let _ = out.flush();
        }

        let forward = rec.level.is_problem() || {
            sampled = sampled.wrapping_add(1);
            sampled.is_multiple_of(sample_every)
        };
        if forward && ui_tx.try_send(format!("[{}] {}", rec.level, rec.text)).is_err() {
            dropped_to_ui += 1;
        }
        if dropped_to_ui >= UI_DROP_REPORT
            && ui_tx
                .try_send(format!("(logger) UI log queue dropped {dropped_to_ui} lines"))
                .is_ok()
        {
            dropped_to_ui = 0;
        }
    }

    let _ = out.flush();
}

/// `logs/` sits next to the executable (target/{debug,release}); fall back
/// to the working directory.
fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(path),
    };
    let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) else {
        return PathBuf::from(path);
    };
    let mut out = PathBuf::from(home);
    let rest = rest.trim_start_matches(['/', '\\']);
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

/// `YYYYMMDD_HHMMSS` in UTC, or `unix_<secs>` if the date is out of range.
fn timestamp_for_filename(now: SystemTime) -> String {
    let secs = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    match civil_from_unix(secs) {
        Some((y, mo, d)) => {
            let tod = secs % 86_400;
            format!(
                "{y:04}{mo:02}{d:02}_{:02}{:02}{:02}",
                tod / 3_600,
                (tod / 60) % 60,
                tod % 60
            )
        }
        None => format!("unix_{secs}"),
    }
}

/// Gregorian (year, month, day) for a Unix timestamp, so we need no date crate.
fn civil_from_unix(secs: u64) -> Option<(i32, u32, u32)> {
    let z = i64::try_from(secs / 86_400).ok()? + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    Some((
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    ))
}
