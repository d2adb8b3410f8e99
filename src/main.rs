mod error;
mod lesson;
mod logging;
mod parser;
mod serialiser;
mod sync;
mod timeline;
mod transport;

use crate::lesson::{Catalog, LessonAddress, BOOKS};
use crate::parser::Parser;
use crate::sync::{HighlightChange, Synchronizer};
use crate::timeline::Timeline;
use crate::transport::SimulatedTransport;

use std::io::{self, Read};

use anyhow::{anyhow, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use tracing::{info, warn};

/// Track length assumed after the last cue when `--length` is not given.
const DEFAULT_TAIL: f64 = 5.0;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Parse timed bilingual transcripts and sync them to audio playback")]
struct Cli {
    #[arg(short, long, global = true, help = "Log debug output to stderr.")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the metadata and sentence timeline of a transcript.
    Show {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The transcript to read. If not supplied, it will be read from standard input.",
            default_value = "-"
        )]
        input: String,
        #[arg(long, help = "Print the parsed transcript as JSON.")]
        json: bool,
    },
    /// Simulate replaying a single sentence and print each highlight change.
    Replay {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "A transcript to replay. Repeat to replay several lessons in turn. If not supplied, it will be read from standard input.",
            default_value = "-"
        )]
        input: Vec<String>,
        #[arg(short, long, help = "Index of the sentence to play, starting at 0.")]
        sentence: usize,
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "Interval between position samples.",
            default_value_t = 0.25
        )]
        tick: f64,
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "Length of each simulated audio track. Defaults to a few seconds past the last cue."
        )]
        length: Option<f64>,
    },
    /// Print the lesson links of a catalog.
    Catalog {
        #[arg(short, long, value_name = "FILE", help = "The catalog JSON file.")]
        catalog: String,
        #[arg(short, long, help = "The book to list, e.g. 'NCE2' or '2'. Lists all books if omitted.")]
        book: Option<String>,
    },
    /// Print the resource locations derived from a lesson id such as 'NCE1/001&002'.
    Locate { id: String },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Show { input, json } => show(&input, json),
        Command::Replay {
            input,
            sentence,
            tick,
            length,
        } => replay(&input, sentence, tick, length),
        Command::Catalog { catalog, book } => catalog_links(&catalog, book.as_deref()),
        Command::Locate { id } => locate(&id),
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input).context(format!("Failed to open input file: '{}'", input))
    }
}

fn show(input: &str, json: bool) -> Result<()> {
    let data = read_input(input)?;
    let transcript = Parser::new()?.parse(&data);
    if !transcript.diagnostics.is_empty() {
        warn!(
            count = transcript.diagnostics.len(),
            "Some lines were not understood"
        );
    }

    if json {
        serialiser::serialise_json(&transcript, io::stdout())
    } else {
        serialiser::serialise(&transcript.timeline, io::stdout())
    }
}

fn replay(inputs: &[String], sentence: usize, tick: f64, length: Option<f64>) -> Result<()> {
    let parser = Parser::new()?;
    let mut sync = Synchronizer::new(
        Timeline::default(),
        SimulatedTransport::new(0.0),
        Vec::<HighlightChange>::new(),
    );

    for input in inputs {
        let data = read_input(input)?;
        let timeline = parser.parse(&data).timeline;
        if timeline.is_empty() {
            return Err(anyhow!(
                "You appear to have supplied an empty transcript: '{}'",
                input
            ));
        }
        let track_length = length
            .or_else(|| timeline.last_start().map(|start| start + DEFAULT_TAIL))
            .unwrap_or(DEFAULT_TAIL);

        sync.load(timeline);
        sync.transport_mut().load_track(track_length);
        let seen = sync.highlighter().len();

        info!(input = %input, sentence, tick, length = track_length, "Replaying sentence");
        let stopped_at = transport::replay_sentence(&mut sync, sentence, tick)
            .context(format!("Failed to replay sentence {} of '{}'", sentence, input))?;

        println!("{}", input);
        for change in &sync.highlighter()[seen..] {
            let text = sync
                .timeline()
                .get(change.current)
                .map(|s| s.primary_text.as_str())
                .unwrap_or("");
            println!("  highlight {:>3}  {}", change.current, text);
        }
        println!("  paused at {:.2}s", stopped_at);
    }
    Ok(())
}

fn catalog_links(path: &str, book: Option<&str>) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .context(format!("Failed to open catalog file: '{}'", path))?;
    let catalog = Catalog::from_json(&json)?;

    let books = match book {
        Some(token) => vec![lesson::book_number(token)?],
        None => BOOKS.to_vec(),
    };
    for book in books {
        let links = match catalog.lessons(book) {
            Ok(links) => links,
            Err(err) => {
                warn!(book, "{}", err);
                continue;
            }
        };
        println!("Book {}", book);
        for link in links {
            println!("  {:>3}  {}  ({})", link.number, link.title, link.href);
        }
    }
    Ok(())
}

fn locate(id: &str) -> Result<()> {
    let address = LessonAddress::parse(id)?;
    println!("lesson:     {} (book {})", address.id(), address.book());
    println!("audio:      {}", address.audio());
    println!("transcript: {}", address.timed_text());
    println!("cover:      {}", address.cover());
    println!("book page:  {}", address.book_page());
    Ok(())
}
