// Line input on a dedicated OS thread.
// tokio's stdin parks a blocking read on the runtime's blocking pool, and runtime
// shutdown waits for that read to return. A detached thread does not hold shutdown up.

use std::io::BufRead;
use tokio::sync::mpsc;

/// Buffered lines between the reader thread and the command loop.
pub const LINE_CHANNEL_CAPACITY: usize = 32;

/// Reads `reader` line by line on its own thread and forwards each line.
///
/// The channel closes after EOF or the first read error (which is forwarded).
/// Dropping the receiver stops the thread after its next line.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
    let spawned = std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
            tracing::debug!(operation = "read_lines", "line reader finished");
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, operation = "read_lines", "failed to start line reader");
    }
    rx
}

/// Reader for the process's standard input.
pub fn stdin_lines() -> mpsc::Receiver<std::io::Result<String>> {
    spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
}
