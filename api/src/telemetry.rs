// ============================================================================
// LOGGING - Console output plus a non-blocking file sink
// ============================================================================
// Code logs through the `tracing` macros. The file layer never touches the
// disk itself: formatted lines go over a bounded channel to one writer
// thread. When that channel is full the line is dropped, so logging can
// never stall a request or a like worker.

use crate::config::Config;
use crossbeam_channel::{Receiver, Sender, bounded, select};
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
    thread::{self, JoinHandle},
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

const SINK_CAPACITY: usize = 1024;
const DEFAULT_FILTER: &str = "info,microblog_api=debug,tower_http=debug";

/// Install the global subscriber.
///
/// Returns the file sink's guard when a log file is configured; call
/// [`LogGuard::shutdown`] before exiting so buffered lines reach the file.
pub fn init_tracing(config: &Config) -> io::Result<Option<LogGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let (sink, guard) = LogSink::open(path, SINK_CAPACITY)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(sink);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Writer half of the file sink, cloned into every log call
#[derive(Clone)]
pub struct LogSink {
    lines: Sender<Vec<u8>>,
}

impl LogSink {
    /// Open `path` for appending and start the writer thread.
    pub fn open(path: &Path, capacity: usize) -> io::Result<(Self, LogGuard)> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (lines_tx, lines_rx) = bounded(capacity);
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let (done_tx, done_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("log-writer".into())
            .spawn(move || {
                write_loop(file, lines_rx, shutdown_rx);
                let _ = done_tx.send(());
            })?;

        Ok((
            Self { lines: lines_tx },
            LogGuard {
                shutdown: shutdown_tx,
                done: done_rx,
                handle: Some(handle),
            },
        ))
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Full or gone: drop the line rather than block the caller
        let _ = self.lines.try_send(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn write_loop(mut file: File, lines: Receiver<Vec<u8>>, shutdown: Receiver<()>) {
    loop {
        select! {
            recv(lines) -> line => match line {
                Ok(line) => write_line(&mut file, &line),
                Err(_) => break,
            },
            recv(shutdown) -> _ => {
                while let Ok(line) = lines.try_recv() {
                    write_line(&mut file, &line);
                }
                break;
            }
        }
    }
    let _ = file.flush();
}

fn write_line(file: &mut File, line: &[u8]) {
    if let Err(e) = file.write_all(line) {
        // The subscriber may be the thing that's broken, so go straight to stderr
        eprintln!("log sink write failed: {e}");
    }
}

/// Keeps the writer thread joinable until shutdown
pub struct LogGuard {
    shutdown: Sender<()>,
    done: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl LogGuard {
    /// Flush pending lines, waiting at most `grace`.
    ///
    /// Returns `false` if the writer did not finish in time; whatever it had
    /// not written yet is lost.
    pub fn shutdown(mut self, grace: Duration) -> bool {
        let _ = self.shutdown.try_send(());
        match self.done.recv_timeout(grace) {
            Ok(()) => {
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                true
            }
            Err(_) => false,
        }
    }
}
