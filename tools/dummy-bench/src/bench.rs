///
/// Benchmark Workload
///
/// The workload is a list of byte chunks, read from a file in 1 MiB pieces
/// or generated synthetically. Chunks sit in a shared queue; each worker
/// pops until the queue is empty, appends the suffix to every chunk, and
/// checks the length of the result.
///

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use dummy_strings::{concatenate_bytes, CatError};
use thiserror::Error;

pub const READ_CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Concat(#[from] CatError),

    #[error("result has {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("a worker thread panicked")]
    WorkerPanicked,
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Worker count; 0 means one per available core
    pub threads: usize,
    pub input: Option<PathBuf>,
    pub chunks: usize,
    pub chunk_size: usize,
    pub suffix: Vec<u8>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            input: None,
            chunks: 64,
            chunk_size: READ_CHUNK_SIZE,
            suffix: b"!".to_vec(),
        }
    }
}

impl BenchConfig {
    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        thread::available_parallelism().map_or(1, |n| n.get())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchReport {
    pub threads: usize,
    pub chunks: usize,
    pub bytes_in: usize,
    pub bytes_out: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Default, Clone, Copy)]
struct WorkerStats {
    chunks: usize,
    bytes_in: usize,
    bytes_out: usize,
}

/// Queue of pending chunks shared by all workers
#[derive(Debug, Default)]
pub struct ChunkQueue {
    chunks: Mutex<VecDeque<Vec<u8>>>,
}

impl ChunkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, chunk: Vec<u8>) {
        let mut chunks = self.chunks.lock().unwrap_or_else(PoisonError::into_inner);
        chunks.push_back(chunk);
    }

    /// Non-blocking pop; `None` once the queue is drained.
    pub fn pop(&self) -> Option<Vec<u8>> {
        let mut chunks = self.chunks.lock().unwrap_or_else(PoisonError::into_inner);
        chunks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.chunks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_chunks(path: &Path, queue: &ChunkQueue) -> Result<(), BenchError> {
    let io_err = |source| BenchError::Io { path: path.to_path_buf(), source };
    let mut reader = BufReader::new(File::open(path).map_err(io_err)?);
    loop {
        let mut chunk = Vec::with_capacity(READ_CHUNK_SIZE);
        let read = (&mut reader)
            .take(READ_CHUNK_SIZE as u64)
            .read_to_end(&mut chunk)
            .map_err(io_err)?;
        if read == 0 {
            return Ok(());
        }
        queue.push(chunk);
    }
}

/// Build the workload described by `config`.
pub fn load_chunks(config: &BenchConfig) -> Result<ChunkQueue, BenchError> {
    let queue = ChunkQueue::new();
    match &config.input {
        Some(path) => read_chunks(path, &queue)?,
        None => {
            for i in 0..config.chunks {
                let fill = b'a' + (i % 26) as u8;
                queue.push(vec![fill; config.chunk_size]);
            }
        }
    }
    tracing::info!(chunks = queue.len(), "workload loaded");
    Ok(queue)
}

fn worker(queue: &ChunkQueue, suffix: &[u8]) -> Result<WorkerStats, BenchError> {
    let mut stats = WorkerStats::default();
    while let Some(chunk) = queue.pop() {
        let out = concatenate_bytes(&chunk, suffix)?;
        let expected = chunk.len() + suffix.len();
        if out.len() != expected || !out.starts_with(&chunk) || !out.ends_with(suffix) {
            return Err(BenchError::LengthMismatch { expected, actual: out.len() });
        }
        stats.chunks += 1;
        stats.bytes_in += chunk.len();
        stats.bytes_out += out.len();
    }
    Ok(stats)
}

/// Load the workload and drain it with the configured number of workers.
pub fn run(config: &BenchConfig) -> Result<BenchReport, BenchError> {
    let threads = config.worker_count();
    let start = Instant::now();
    let queue = load_chunks(config)?;

    tracing::info!(threads, "starting workers");
    let results: Vec<Result<WorkerStats, BenchError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| scope.spawn(|| worker(&queue, &config.suffix)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(Err(BenchError::WorkerPanicked)))
            .collect()
    });

    let mut report = BenchReport {
        threads,
        chunks: 0,
        bytes_in: 0,
        bytes_out: 0,
        elapsed: Duration::ZERO,
    };
    for stats in results {
        let stats = stats?;
        report.chunks += stats.chunks;
        report.bytes_in += stats.bytes_in;
        report.bytes_out += stats.bytes_out;
    }
    report.elapsed = start.elapsed();
    tracing::debug!(?report, "benchmark finished");
    Ok(report)
}
