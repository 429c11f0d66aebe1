//! Parallel extraction pipeline
//!
//! Paths are fed through a [`WorkQueue`] to a fixed set of worker threads.
//! Each worker reads from the [`ArchiveSource`] and hands the bytes to the
//! [`OutputWriter`]. Misses and write failures are counted, never fatal.

use crate::config::ExtractConfig;
use crate::output::OutputWriter;
use crate::queue::WorkQueue;
use crate::storage::ArchiveSource;
use serde::Serialize;
use std::ops::AddAssign;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};
use wowex_formats::LocaleFlags;

enum Task {
    Extract(String),
    Stop,
}

/// Counters for one extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    /// Files written
    pub extracted: usize,
    /// Paths with no entry for the locale, or unreadable content
    pub missing: usize,
    /// Files read but not written
    pub failed: usize,
    /// Bytes written
    pub bytes: u64,
}

impl ExtractReport {
    /// Paths processed
    pub const fn total(&self) -> usize {
        self.extracted + self.missing + self.failed
    }
}

impl AddAssign for ExtractReport {
    fn add_assign(&mut self, other: Self) {
        self.extracted += other.extracted;
        self.missing += other.missing;
        self.failed += other.failed;
        self.bytes += other.bytes;
    }
}

/// Extracts files from a source with a pool of worker threads
pub struct Extractor<S> {
    source: S,
    writer: OutputWriter,
    locale: LocaleFlags,
    threads: usize,
    queue: Arc<WorkQueue<Task>>,
}

impl<S: ArchiveSource + Sync> Extractor<S> {
    /// Create an extractor
    pub fn new(source: S, writer: OutputWriter, locale: LocaleFlags, threads: usize) -> Self {
        Self {
            source,
            writer,
            locale,
            threads: threads.max(1),
            queue: Arc::new(WorkQueue::new()),
        }
    }

    /// Create an extractor from a configuration
    pub fn from_config(source: S, config: &ExtractConfig) -> Self {
        Self::new(
            source,
            OutputWriter::new(&config.output_path),
            config.locale.flags(),
            config.threads,
        )
    }

    /// Abort a running [`Self::run`]; pending paths are dropped
    pub fn cancel(&self) {
        self.queue.cancel();
    }

    /// Whether the extractor has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.queue.is_cancelled()
    }

    /// Extract every path, returning once all workers have finished
    pub fn run<I, P>(&self, paths: I) -> ExtractReport
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        info!("Extracting with {} workers", self.threads);
        let report = thread::scope(|scope| {
            let workers: Vec<_> = (0..self.threads)
                .map(|_| scope.spawn(move || self.worker()))
                .collect();

            for path in paths {
                if self.queue.is_cancelled() {
                    break;
                }
                self.queue.push(Task::Extract(path.into()));
            }
            if !self.queue.is_cancelled() {
                for _ in 0..self.threads {
                    self.queue.push(Task::Stop);
                }
            }

            let mut report = ExtractReport::default();
            for worker in workers {
                match worker.join() {
                    Ok(part) => report += part,
                    Err(_) => warn!("Extraction worker panicked"),
                }
            }
            report
        });

        info!(
            "Extraction finished: {} written, {} missing, {} failed ({} bytes)",
            report.extracted, report.missing, report.failed, report.bytes
        );
        report
    }

    fn worker(&self) -> ExtractReport {
        let mut report = ExtractReport::default();
        while let Some(Task::Extract(path)) = self.queue.wait_and_pop() {
            self.extract_one(&path, &mut report);
        }
        report
    }

    fn extract_one(&self, path: &str, report: &mut ExtractReport) {
        let Some(data) = self.source.read_file(path, self.locale) else {
            debug!("Not found for locale {}: {}", self.locale, path);
            report.missing += 1;
            return;
        };

        match self.writer.write(path, &data) {
            Ok(_) => {
                report.extracted += 1;
                report.bytes += data.len() as u64;
            }
            Err(e) => {
                warn!("Failed to write {}: {}", path, e);
                report.failed += 1;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct MemorySource(HashMap<String, Vec<u8>>);

    impl ArchiveSource for MemorySource {
        fn read_file(&self, path: &str, _locale: LocaleFlags) -> Option<Vec<u8>> {
            self.0.get(path).cloned()
        }
    }

    #[test]
    fn counts_every_outcome() {
        let dir = TempDir::new().unwrap();
        let source = MemorySource(
            [
                ("a\\one.txt".to_string(), b"1".to_vec()),
                ("b\\two.txt".to_string(), b"22".to_vec()),
                ("..\\evil".to_string(), b"x".to_vec()),
            ]
            .into_iter()
            .collect(),
        );
        let extractor = Extractor::new(source, OutputWriter::new(dir.path()), LocaleFlags::ENUS, 3);

        let report = extractor.run(["a\\one.txt", "b\\two.txt", "missing.txt", "..\\evil"]);
        assert_eq!(
            report,
            ExtractReport {
                extracted: 2,
                missing: 1,
                failed: 1,
                bytes: 3,
            }
        );
        assert_eq!(std::fs::read(dir.path().join("b/two.txt")).unwrap(), b"22");
    }

    #[test]
    fn empty_run_terminates() {
        let dir = TempDir::new().unwrap();
        let extractor = Extractor::new(
            MemorySource(HashMap::new()),
            OutputWriter::new(dir.path()),
            LocaleFlags::ENUS,
            4,
        );
        assert_eq!(extractor.run(Vec::<String>::new()).total(), 0);
    }

    #[test]
    fn cancelled_extractor_does_nothing() {
        let dir = TempDir::new().unwrap();
        let extractor = Extractor::new(
            MemorySource(HashMap::new()),
            OutputWriter::new(dir.path()),
            LocaleFlags::ENUS,
            2,
        );
        extractor.cancel();
        assert!(extractor.is_cancelled());
        assert_eq!(extractor.run(["x"]).total(), 0);
    }
}
