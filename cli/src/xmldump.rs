use std::{collections::HashMap, fs::File, process::ExitCode};

use log::{debug, error, info};
use pull_xml::{Config, Event, Parser};

use crate::std_io::StdReader;

mod std_io;

/// Stream XML files through the pull tokenizer and report what it finds.
#[derive(argh::FromArgs)]
struct Args {
    /// bytes handed to the parser per append
    #[argh(option, short = 'c', default = "4096")]
    chunk_size: usize,

    /// bytes of recent input quoted in error reports
    #[argh(option, default = "Config::DEFAULT_ERROR_CONTEXT")]
    error_context: usize,

    /// only log the summary, not every event
    #[argh(switch, short = 'q')]
    quiet: bool,

    /// files to parse
    #[argh(positional)]
    paths: Vec<String>,
}

#[derive(Default)]
struct Summary {
    counts: HashMap<String, usize>,
    events: usize,
    text_size: usize,
    max_level: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    if args.chunk_size == 0 {
        error!("Chunk size must not be 0");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for path in &args.paths {
        if !dump_file(path, &args) {
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn dump_file(path: &str, args: &Args) -> bool {
    info!("Parsing {path}");
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to open {path}: {e}");
            return false;
        }
    };

    let mut reader = StdReader::new(file);
    let mut chunk = vec![0u8; args.chunk_size];
    let mut parser = Parser::with_config(Config::default().with_error_context(args.error_context));
    let mut summary = Summary::default();

    loop {
        let read = match parser.read_from(&mut reader, &mut chunk) {
            Ok(read) => read,
            Err(e) => {
                error!("Failed to read {path}: {e}");
                return false;
            }
        };
        while let Some(event) = parser.next_event() {
            if !args.quiet {
                debug!("{:indent$}{event:?}", "", indent = parser.level() * 2);
            }
            record(&mut summary, &event, parser.level());
        }
        if read == 0 || parser.error().is_some() {
            break;
        }
    }

    info!("Element counts: {:?}", summary.counts);
    info!(
        "{} events, {} bytes of text, max depth {}",
        summary.events, summary.text_size, summary.max_level
    );

    if let Some(e) = parser.error() {
        error!("{path}: {e}");
        return false;
    }
    if !parser.is_finished() {
        error!("{path}: document ended before the root element was closed");
        return false;
    }
    true
}

fn record(summary: &mut Summary, event: &Event, level: usize) {
    summary.events += 1;
    summary.max_level = summary.max_level.max(level);
    match event {
        Event::StartTag { name, .. } => *summary.counts.entry(name.clone()).or_insert(0) += 1,
        Event::Text { content } => summary.text_size += content.len(),
        _ => {}
    }
}
