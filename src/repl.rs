//! Interactive read-eval-print loop
//!
//! Reads commands line by line, normalises them with [`clean_input`] and
//! dispatches them to the handlers on [`Session`]. Command errors are printed
//! and the loop carries on; only I/O errors on the terminal end it early.

use std::io::Write;

use rand::rngs::StdRng;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::api::{ApiError, LocationPage, PokeApiClient};
use crate::pokedex::{attempt_catch, Pokedex};

/// Prompt printed before each line of input
pub const PROMPT: &str = "Pokedex > ";

/// Errors that can end a command
#[derive(Debug, Error)]
pub enum ReplError {
    /// PokeAPI request or decoding failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Writing to the terminal or reading input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Commands understood by the REPL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
}

impl Command {
    /// Every command, in the order `help` lists them
    pub const ALL: [Command; 8] = [
        Command::Help,
        Command::Exit,
        Command::Map,
        Command::MapBack,
        Command::Explore,
        Command::Catch,
        Command::Inspect,
        Command::Pokedex,
    ];

    /// Looks up a command by the word typed at the prompt
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == s)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Exit => "exit",
            Command::Map => "map",
            Command::MapBack => "mapb",
            Command::Explore => "explore",
            Command::Catch => "catch",
            Command::Inspect => "inspect",
            Command::Pokedex => "pokedex",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Help => "Displays a help message",
            Command::Exit => "Exit the Pokedex",
            Command::Map => "Show next 20 location-areas",
            Command::MapBack => "Show previous 20 location-areas",
            Command::Explore => "List Pokémon in an area",
            Command::Catch => "Attempt to catch a Pokémon",
            Command::Inspect => "Show details of a caught Pokémon",
            Command::Pokedex => "List all caught Pokémon",
        }
    }
}

/// Lowercases a line of input and splits it on whitespace
pub fn clean_input(input: &str) -> Vec<String> {
    input
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// State carried between commands
pub struct Session {
    client: PokeApiClient,
    pokedex: Pokedex,
    /// Link to the page `map` shows next
    next: Option<String>,
    /// Link to the page `mapb` shows next
    previous: Option<String>,
    rng: StdRng,
}

impl Session {
    pub fn new(client: PokeApiClient, rng: StdRng) -> Self {
        Self {
            client,
            pokedex: Pokedex::new(),
            next: None,
            previous: None,
            rng,
        }
    }

    pub fn pokedex(&self) -> &Pokedex {
        &self.pokedex
    }

    /// Runs one line of input
    ///
    /// # Returns
    /// * `Ok(Flow::Exit)` after `exit`
    /// * `Ok(Flow::Continue)` otherwise, including blank and unknown input
    /// * `Err(ReplError)` if the command failed
    pub async fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, ReplError> {
        let words = clean_input(line);
        let Some((first, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        let Some(command) = Command::from_str(first) else {
            writeln!(out, "Unknown command: {first}")?;
            return Ok(Flow::Continue);
        };

        debug!(command = command.name(), ?args, "Dispatching command");
        match command {
            Command::Help => self.help(out),
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                Ok(Flow::Exit)
            }
            Command::Map => self.map(out).await,
            Command::MapBack => self.map_back(out).await,
            Command::Explore => self.explore(args, out).await,
            Command::Catch => self.catch(args, out).await,
            Command::Inspect => self.inspect(args, out),
            Command::Pokedex => self.list_pokedex(out),
        }
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<Flow, ReplError> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for command in Command::ALL {
            writeln!(out, "{}: {}", command.name(), command.description())?;
        }
        Ok(Flow::Continue)
    }

    async fn map<W: Write>(&mut self, out: &mut W) -> Result<Flow, ReplError> {
        // Past the last page `next` is empty and the listing starts over
        let page = self.client.location_areas(self.next.as_deref()).await?;
        self.show_page(page, out)
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<Flow, ReplError> {
        let Some(previous) = self.previous.clone() else {
            writeln!(out, "you're on the first page")?;
            return Ok(Flow::Continue);
        };
        let page = self.client.location_areas(Some(previous.as_str())).await?;
        self.show_page(page, out)
    }

    fn show_page<W: Write>(
        &mut self,
        page: LocationPage,
        out: &mut W,
    ) -> Result<Flow, ReplError> {
        for name in &page.names {
            writeln!(out, "{name}")?;
        }
        self.next = page.next;
        self.previous = page.previous;
        Ok(Flow::Continue)
    }

    async fn explore<W: Write>(&mut self, args: &[String], out: &mut W) -> Result<Flow, ReplError> {
        let Some(area_name) = args.first() else {
            writeln!(out, "usage: explore <location-area>")?;
            return Ok(Flow::Continue);
        };

        writeln!(out, "Exploring {area_name}...")?;
        let area = self.client.location_area(area_name).await?;
        if area.pokemon.is_empty() {
            writeln!(out, "No Pokémon found in {area_name}")?;
            return Ok(Flow::Continue);
        }

        writeln!(out, "Pokémon found in {area_name}:")?;
        for pokemon in &area.pokemon {
            writeln!(out, " - {pokemon}")?;
        }
        Ok(Flow::Continue)
    }

    async fn catch<W: Write>(&mut self, args: &[String], out: &mut W) -> Result<Flow, ReplError> {
        let Some(name) = args.first() else {
            writeln!(out, "usage: catch <pokemon>")?;
            return Ok(Flow::Continue);
        };

        if self.pokedex.contains(name) {
            writeln!(out, "{name} is already in your Pokedex!")?;
            return Ok(Flow::Continue);
        }

        writeln!(out, "Throwing a Pokeball at {name}...")?;
        let pokemon = match self.client.pokemon(name).await {
            Ok(pokemon) => pokemon,
            Err(ApiError::Status(status)) => {
                debug!(%status, name = %name, "Pokemon lookup rejected");
                writeln!(out, "{name} doesn't seem to exist.")?;
                return Ok(Flow::Continue);
            }
            Err(e) => return Err(e.into()),
        };

        if !attempt_catch(&mut self.rng, pokemon.base_experience) {
            writeln!(out, "{} escaped!", pokemon.name)?;
            return Ok(Flow::Continue);
        }

        let entry = self.pokedex.record(pokemon);
        writeln!(out, "{} was caught!", entry.pokemon.name)?;
        writeln!(out, "You may now inspect it with the inspect command.")?;
        Ok(Flow::Continue)
    }

    fn inspect<W: Write>(&self, args: &[String], out: &mut W) -> Result<Flow, ReplError> {
        let Some(name) = args.first() else {
            writeln!(out, "usage: inspect <pokemon>")?;
            return Ok(Flow::Continue);
        };

        let Some(entry) = self.pokedex.get(name) else {
            writeln!(out, "you have not caught that pokemon")?;
            return Ok(Flow::Continue);
        };

        let pokemon = &entry.pokemon;
        writeln!(out, "Name: {}", pokemon.name)?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "  -{}: {}", stat.name, stat.base)?;
        }
        writeln!(out, "Types:")?;
        for kind in &pokemon.types {
            writeln!(out, "  - {kind}")?;
        }
        writeln!(out, "Caught at: {}", entry.caught_at.format("%Y-%m-%d %H:%M:%S"))?;
        Ok(Flow::Continue)
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> Result<Flow, ReplError> {
        if self.pokedex.is_empty() {
            writeln!(out, "Your Pokedex is empty. Go catch some Pokémon first!")?;
            return Ok(Flow::Continue);
        }

        writeln!(out, "Your Pokedex:")?;
        for name in self.pokedex.names() {
            writeln!(out, " - {name}")?;
        }
        Ok(Flow::Continue)
    }
}

/// Runs the loop until `exit` or end of input
///
/// # Arguments
/// * `session` - Session state; kept by the caller so it can be inspected afterwards
/// * `input` - Source of command lines (stdin in the binary)
/// * `out` - Where prompts and command output go
///
/// # Returns
/// * `Err(ReplError::Io)` if reading input or writing output fails; input
///   that is not valid UTF-8 is not an error
pub async fn run<R, W>(session: &mut Session, mut input: R, out: &mut W) -> Result<(), ReplError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buf = Vec::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            debug!("End of input");
            break;
        }
        // Invalid UTF-8 becomes U+FFFD and falls through to `Unknown command`
        let line = String::from_utf8_lossy(&buf);

        match session.execute(&line, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(ReplError::Io(e)) => return Err(ReplError::Io(e)),
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }
    Ok(())
}
