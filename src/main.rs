use std::error::Error;
use std::io::{self, stdin};
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use wpm::app::{self, App, DEFAULT_TICK_MS};
use wpm::corpus::{Corpus, CorpusError};
use wpm::runtime::CrosstermKeySource;

/// terminal typing speed test with live wpm and per-character feedback
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing speed test: type a randomly chosen passage, watch your words-per-minute update live, and see each character marked correct or incorrect as you go."
)]
pub struct Cli {
    /// file with one candidate passage per line
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// fixed passage to type instead of a random pick
    #[clap(short = 'p', long)]
    passage: Option<String>,

    /// typing loop tick interval in milliseconds
    #[clap(short = 't', long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,
}

impl Cli {
    /// Resolve the passage source: an explicit passage beats a corpus file
    /// beats the embedded corpus.
    fn corpus(&self) -> Result<Corpus, CorpusError> {
        if let Some(ref passage) = self.passage {
            Corpus::from_passage(passage)
        } else if let Some(ref file) = self.file {
            Corpus::from_file(file)
        } else {
            Corpus::embedded()
        }
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // Fail before touching the terminal if there is nothing to type.
    let corpus = cli.corpus()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let keys = CrosstermKeySource::new(cli.tick());
    let mut app = App::new(corpus);
    let result = app::run(&mut terminal, &keys, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
