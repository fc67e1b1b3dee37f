use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tokio::sync::mpsc as tokio_mpsc;

use super::types::PathRequest;
use crate::error::Result;

/// Fallback poll interval when no change notification arrives
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watches a JSON-lines file for new path requests and sends them to a channel
pub struct RequestWatcher {
    _watcher: RecommendedWatcher,
    file_path: PathBuf,
    start_position: u64,
}

impl RequestWatcher {
    /// Create a watcher that forwards requests appended after this call.
    ///
    /// The file is created if it does not exist yet. Lines already present
    /// are available through [`RequestWatcher::read_existing`].
    pub fn new(path: impl AsRef<Path>, request_tx: tokio_mpsc::Sender<PathRequest>) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        if !file_path.exists() {
            std::fs::write(&file_path, "")?;
        }

        let initial_position = std::fs::metadata(&file_path)
            .map(|m| m.len())
            .unwrap_or(0);

        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            Config::default(),
        )?;
        watcher.watch(&file_path, RecursiveMode::NonRecursive)?;

        log::info!("Watching {} for path requests", file_path.display());

        let watch_path = file_path.clone();
        let mut last_pos = initial_position;

        tokio::task::spawn_blocking(move || loop {
            // Either a change notification or the poll timeout triggers a read
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(_) | Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => return,
            }

            match read_new_lines(&watch_path, &mut last_pos) {
                Ok(requests) => {
                    for request in requests {
                        if request_tx.blocking_send(request).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => log::warn!("Failed to read {}: {}", watch_path.display(), e),
            }
        });

        Ok(Self {
            _watcher: watcher,
            file_path,
            start_position: initial_position,
        })
    }

    /// Read the requests that were in the file before watching started.
    ///
    /// Only lines that were complete when the watcher was created are
    /// returned; anything after that is forwarded by the watch task.
    pub fn read_existing(&self) -> Vec<PathRequest> {
        let mut position = 0;
        match read_lines_between(&self.file_path, &mut position, self.start_position) {
            Ok(requests) => requests,
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.file_path.display(), e);
                Vec::new()
            }
        }
    }
}

fn parse_line(line: &str) -> Option<PathRequest> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<PathRequest>(line) {
        Ok(request) => Some(request),
        Err(e) => {
            log::warn!("Failed to parse request: {} - Line: {}", e, line);
            None
        }
    }
}

/// Read new lines from the file starting at the given position
fn read_new_lines(path: &Path, last_position: &mut u64) -> std::io::Result<Vec<PathRequest>> {
    let current_size = std::fs::metadata(path)?.len();

    // Truncated: start over
    if current_size < *last_position {
        *last_position = 0;
    }

    read_lines_between(path, last_position, u64::MAX)
}

/// Parse the complete lines starting at `position` that end at or before
/// byte `limit`, advancing `position` by the bytes actually consumed.
///
/// Offsets come from `read_line`, so `\r\n` endings are counted in full.
fn read_lines_between(path: &Path, position: &mut u64, limit: u64) -> std::io::Result<Vec<PathRequest>> {
    let mut requests = Vec::new();

    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(*position))?;

    let mut reader = BufReader::new(file);
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        // Stop at EOF, at a line still being written, or past the limit
        if n == 0 || !line.ends_with('\n') || *position + n as u64 > limit {
            break;
        }
        *position += n as u64;

        if let Some(request) = parse_line(line.trim_end()) {
            requests.push(request);
        }
    }

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("junktion-{}-{}.jsonl", name, std::process::id()))
    }

    const REQUEST: &str =
        r#"{"id": "car-1", "start": {"x": 0, "y": 0, "theta": 0}, "end": {"x": 4, "y": 0, "theta": 0}}"#;

    #[test]
    fn test_read_new_lines_advances_position() {
        let path = temp_file("advance");
        std::fs::write(&path, format!("{}\n\nnot json\n{}\n", REQUEST, REQUEST)).unwrap();

        let mut pos = 0;
        let requests = read_new_lines(&path, &mut pos).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(pos, std::fs::metadata(&path).unwrap().len());

        // Nothing new
        assert!(read_new_lines(&path, &mut pos).unwrap().is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_new_lines_waits_for_complete_line() {
        let path = temp_file("partial");
        std::fs::write(&path, &REQUEST[..20]).unwrap();

        let mut pos = 0;
        assert!(read_new_lines(&path, &mut pos).unwrap().is_empty());
        assert_eq!(pos, 0);

        std::fs::write(&path, format!("{}\n", REQUEST)).unwrap();
        assert_eq!(read_new_lines(&path, &mut pos).unwrap().len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_new_lines_restarts_after_truncation() {
        let path = temp_file("truncate");
        std::fs::write(&path, format!("{}\n{}\n", REQUEST, REQUEST)).unwrap();

        let mut pos = 0;
        assert_eq!(read_new_lines(&path, &mut pos).unwrap().len(), 2);

        std::fs::write(&path, format!("{}\n", REQUEST)).unwrap();
        assert_eq!(read_new_lines(&path, &mut pos).unwrap().len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_crlf_lines_stop_at_limit() {
        let path = temp_file("crlf");
        let existing = format!("{}\r\n{}\r\n", REQUEST, REQUEST);
        let appended = REQUEST.replace("car-1", "car-9");
        std::fs::write(&path, format!("{}{}\r\n", existing, appended)).unwrap();

        let limit = existing.len() as u64;
        let mut pos = 0;
        let requests = read_lines_between(&path, &mut pos, limit).unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.id == "car-1"));
        assert_eq!(pos, limit);

        // The rest is picked up from exactly where the first read stopped
        let rest = read_new_lines(&path, &mut pos).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, "car-9");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_read_existing_ignores_lines_appended_after_start() {
        let path = temp_file("existing-crlf");
        std::fs::write(&path, format!("{}\r\n{}\r\n", REQUEST, REQUEST)).unwrap();

        let (tx, _rx) = tokio_mpsc::channel(16);
        let watcher = RequestWatcher::new(&path, tx).unwrap();

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "{}\r\n", REQUEST.replace("car-1", "car-2")).unwrap();
        drop(file);

        let existing = watcher.read_existing();
        assert_eq!(existing.len(), 2);
        assert!(existing.iter().all(|r| r.id == "car-1"));

        drop(watcher);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_watcher_forwards_appended_requests() {
        let path = temp_file("watch");
        std::fs::write(&path, format!("{}\n", REQUEST)).unwrap();

        let (tx, mut rx) = tokio_mpsc::channel(16);
        let watcher = RequestWatcher::new(&path, tx).unwrap();
        assert_eq!(watcher.read_existing().len(), 1);

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{}", REQUEST.replace("car-1", "car-2")).unwrap();
        drop(file);

        let request = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.id, "car-2");

        drop(watcher);
        std::fs::remove_file(&path).unwrap();
    }
}
