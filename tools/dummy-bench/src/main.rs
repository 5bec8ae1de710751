///
/// dummy-bench - Multithreaded concatenation benchmark
///
/// Usage:
/// - dummy-bench: 64 synthetic 1 MiB chunks, one worker per core
/// - dummy-bench --threads 4 --input random.bin: four workers over a file's contents
///

mod bench;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::Level;

use bench::{BenchConfig, READ_CHUNK_SIZE};

#[derive(Parser)]
#[command(name = "dummy-bench")]
#[command(author, version, about = "Concatenate chunks from many threads and time it", long_about = None)]
struct Cli {
    /// Number of worker threads (0 = one per core)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Read the workload from this file in 1 MiB chunks
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Number of synthetic chunks when no input file is given
    #[arg(long, default_value_t = 64)]
    chunks: usize,

    /// Size in bytes of each synthetic chunk
    #[arg(long, default_value_t = READ_CHUNK_SIZE)]
    chunk_size: usize,

    /// Text appended to every chunk
    #[arg(long, default_value = "!")]
    suffix: String,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = BenchConfig {
        threads: cli.threads,
        input: cli.input,
        chunks: cli.chunks,
        chunk_size: cli.chunk_size,
        suffix: cli.suffix.into_bytes(),
    };

    match bench::run(&config) {
        Ok(report) => {
            println!("Time taken: {}", report.elapsed.as_secs_f64());
            println!(
                "{} chunks, {} bytes in, {} bytes out, {} threads",
                report.chunks, report.bytes_in, report.bytes_out, report.threads
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
