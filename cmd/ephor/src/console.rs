//! Interactive console.
//!
//! Reads one command per line and applies it to the session until `exit`
//! or end of input. Failures of a single command are reported and the
//! console keeps going.

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::error::AppError;
use crate::search;
use crate::session::Session;
use crate::util::print_error;

/// Console prompt.
pub const PROMPT: &str = "ephor > ";

/// Help listing printed for `help` and for any unrecognized input.
pub const HELP: &str = "\
Ephor Console Commands:
 config filename     Reloads the console with the specified config file.
 exit                Exits the Ephor console.
 file filename       Writes the output to the specified file.
 help                Prints this help message.
 output filetype     Changes the output file type to the specified type (XML/JSON/CSV).
 port number         Changes the port used to make a connection.
 query querystring   Runs the specified query and outputs the results.
 status              Prints out the current configuration information.
";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Config(PathBuf),
    Exit,
    File(PathBuf),
    Help,
    Output(String),
    Port(String),
    Query(String),
    Status,
}

impl Command {
    /// Parses a line. Unknown commands and wrong argument counts yield
    /// [`Command::Help`].
    pub fn parse(line: &str) -> Command {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["config", path] => Command::Config(PathBuf::from(path)),
            ["exit"] => Command::Exit,
            ["file", path] => Command::File(PathBuf::from(path)),
            ["output", kind] => Command::Output(kind.to_string()),
            ["port", port] => Command::Port(port.to_string()),
            ["query", rest @ ..] if !rest.is_empty() => Command::Query(rest.join(" ")),
            ["status"] => Command::Status,
            _ => Command::Help,
        }
    }
}

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive console bound to a session and an output stream.
pub struct Console<'a, W> {
    session: &'a mut Session,
    out: W,
}

impl<'a, W: Write> Console<'a, W> {
    pub fn new(session: &'a mut Session, out: W) -> Self {
        Self { session, out }
    }

    /// Runs the read loop until `exit` or end of input.
    ///
    /// A final line without a line terminator counts as end of input and is
    /// reported as ignored. Only failures of the console streams themselves
    /// are returned.
    pub async fn run<R>(&mut self, mut input: R) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line = String::new();
        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            line.clear();
            let n = input.read_line(&mut line).await?;
            if n == 0 || !line.ends_with('\n') {
                debug!("end of input");
                writeln!(self.out)?;
                let partial = line.trim();
                if !partial.is_empty() {
                    writeln!(self.out, "Ignoring unterminated final line '{}'.", partial)?;
                }
                self.out.flush()?;
                return Ok(());
            }

            let command = Command::parse(line.trim_end_matches(['\r', '\n']));
            if self.dispatch(command).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<Flow, AppError> {
        debug!(?command, "console command");
        match command {
            Command::Config(path) => {
                write!(self.out, "Reloading config info from '{}' ", path.display())?;
                match self.session.reload(&path) {
                    Ok(()) => writeln!(self.out, "done.")?,
                    Err(e) => {
                        writeln!(self.out, "failed. Config info was not changed.")?;
                        print_error(&e.to_string());
                    }
                }
            }
            Command::Exit => return Ok(Flow::Exit),
            Command::File(path) => {
                writeln!(self.out, "Data will now be output to '{}'.", path.display())?;
                self.session.set_destination(path);
            }
            Command::Help => self.out.write_all(HELP.as_bytes())?,
            Command::Output(kind) => match self.session.set_output(&kind) {
                Ok(mode) => writeln!(self.out, "Data will now be output as {}.", mode)?,
                Err(_) => self.out.write_all(HELP.as_bytes())?,
            },
            Command::Port(port) => match self.session.set_port(&port) {
                Ok(port) => writeln!(
                    self.out,
                    "Now using port {} to connect to '{}'.",
                    port,
                    self.session.address()
                )?,
                Err(e) => writeln!(self.out, "{}", e)?,
            },
            Command::Query(query) => {
                self.session.set_query(query);
                if let Err(e) = search::execute(self.session, &mut self.out).await {
                    print_error(&e.to_string());
                }
            }
            Command::Status => self.out.write_all(self.session.status().as_bytes())?,
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }
}
