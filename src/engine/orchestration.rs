//! Module focusing on the way the files of one trigger event are orchestrated between worker threads

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, sync_channel},
    },
    thread::{Scope, ScopedJoinHandle},
};

use tracing::{info, info_span, warn};

use crate::{
    config::Config,
    domain::{Location, RunStatistics, TriggerEvent},
    engine::{Cancellation, process_file},
    error::{FileError, LineFailure, SourceError},
    ports::{ContentSource, RecordSink},
};

/// What happened to one file of a trigger event.
#[derive(Debug)]
pub enum FileOutcome {
    /// All lines were handled
    Completed(RunStatistics),
    /// The content could not be read; no line was processed
    SourceFailed(SourceError),
    /// The host cancelled the invocation while the file was processed
    Cancelled(RunStatistics),
    /// The file was not started because of cancellation or an earlier failure with fail-fast on
    NotAttempted,
}

impl FileOutcome {
    pub fn statistics(&self) -> Option<RunStatistics> {
        match self {
            FileOutcome::Completed(stats) | FileOutcome::Cancelled(stats) => Some(*stats),
            FileOutcome::SourceFailed(_) | FileOutcome::NotAttempted => None,
        }
    }

    pub fn is_source_failure(&self) -> bool {
        matches!(self, FileOutcome::SourceFailed(_))
    }
}

impl From<Result<RunStatistics, FileError>> for FileOutcome {
    fn from(result: Result<RunStatistics, FileError>) -> Self {
        match result {
            Ok(stats) => FileOutcome::Completed(stats),
            Err(FileError::Source(err)) => FileOutcome::SourceFailed(err),
            Err(FileError::Cancelled { partial }) => FileOutcome::Cancelled(partial),
        }
    }
}

#[derive(Debug)]
pub struct FileReport {
    pub location: Location,
    pub outcome: FileOutcome,
}

///
/// Processes every file of the trigger event and returns one report per file, in the order of
/// the event.
///
/// With `config.workers == 1` the files are processed one after the other. Otherwise they are
/// distributed over that many worker threads; each file still gets its own tally and its lines
/// are processed in order by a single thread.
///
/// A file whose content cannot be read does not stop the others, unless `config.fail_fast` is set.
///
pub fn process_event<S, K, F>(
    source: &S,
    sink: &K,
    event: &TriggerEvent,
    config: &Config,
    cancel: &Cancellation,
    on_error: F,
) -> Vec<FileReport>
where
    S: ContentSource + Sync,
    K: RecordSink + Sync,
    F: Fn(&Location, LineFailure) + Sync,
{
    let _span = info_span!("event", files = event.locations.len()).entered();

    let num_workers = config.workers.get().min(event.locations.len());
    let gate = Gate {
        cancel,
        fail_fast: config.fail_fast,
        source_failed: AtomicBool::new(false),
    };
    let runner = FileRunner {
        source,
        sink,
        config,
        gate: &gate,
        on_error: &on_error,
    };

    let reports = if num_workers <= 1 {
        event
            .locations
            .iter()
            .map(|location| runner.run(location))
            .collect()
    } else {
        process_parallel(&runner, &event.locations, num_workers)
    };

    let failed = reports
        .iter()
        .filter(|r| r.outcome.is_source_failure())
        .count();
    info!(files = reports.len(), failed, "event processed");

    reports
}

/// Decides whether a file may still be started.
struct Gate<'a> {
    cancel: &'a Cancellation,
    fail_fast: bool,
    source_failed: AtomicBool,
}

impl Gate<'_> {
    fn is_open(&self) -> bool {
        let stopped_by_failure = self.fail_fast && self.source_failed.load(Ordering::Relaxed);
        !self.cancel.is_cancelled() && !stopped_by_failure
    }
}

struct FileRunner<'a, S, K, F> {
    source: &'a S,
    sink: &'a K,
    config: &'a Config,
    gate: &'a Gate<'a>,
    on_error: &'a F,
}

impl<S, K, F> FileRunner<'_, S, K, F>
where
    S: ContentSource,
    K: RecordSink,
    F: Fn(&Location, LineFailure),
{
    fn run(&self, location: &Location) -> FileReport {
        let outcome = if self.gate.is_open() {
            let result = process_file(
                self.source,
                self.sink,
                location,
                self.config,
                self.gate.cancel,
                |failure| (self.on_error)(location, failure),
            );
            FileOutcome::from(result)
        } else {
            warn!(%location, "file not attempted");
            FileOutcome::NotAttempted
        };

        if outcome.is_source_failure() {
            self.gate.source_failed.store(true, Ordering::Relaxed);
        }

        FileReport {
            location: location.clone(),
            outcome,
        }
    }
}

fn process_parallel<S, K, F>(
    runner: &FileRunner<'_, S, K, F>,
    locations: &[Location],
    num_workers: usize,
) -> Vec<FileReport>
where
    S: ContentSource + Sync,
    K: RecordSink + Sync,
    F: Fn(&Location, LineFailure) + Sync,
{
    std::thread::scope(|s| {
        let mut worker_senders = Vec::with_capacity(num_workers);
        let mut worker_handles = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (file_tx, file_rx) = sync_channel::<(usize, &Location)>(locations.len());
            worker_senders.push(file_tx);
            worker_handles.push(spawn_worker(s, runner, file_rx));
        }

        // Files are sharded round-robin over the workers
        for (idx, location) in locations.iter().enumerate() {
            // Send fails only if the worker panicked; the join() below will surface that panic.
            let _ = worker_senders[idx % num_workers].send((idx, location));
        }

        // Signal EOF: workers drain their queue and exit
        drop(worker_senders);

        let mut indexed: Vec<(usize, FileReport)> = Vec::with_capacity(locations.len());
        for handle in worker_handles {
            let partition = handle
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
            indexed.extend(partition);
        }

        indexed.sort_by_key(|(idx, _)| *idx);
        indexed.into_iter().map(|(_, report)| report).collect()
    })
}

fn spawn_worker<'scope, 'env, S, K, F>(
    s: &'scope Scope<'scope, 'env>,
    runner: &'scope FileRunner<'scope, S, K, F>,
    files: Receiver<(usize, &'scope Location)>,
) -> ScopedJoinHandle<'scope, Vec<(usize, FileReport)>>
where
    S: ContentSource + Sync,
    K: RecordSink + Sync,
    F: Fn(&Location, LineFailure) + Sync,
{
    s.spawn(move || {
        files
            .into_iter()
            .map(|(idx, location)| (idx, runner.run(location)))
            .collect()
    })
}
