//! Picking a replacement name when an incoming entry collides with one already
//! in the destination config.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;

use console::style;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Cluster,
    User,
    Context,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Cluster => "Cluster",
            EntityKind::User => "User",
            EntityKind::Context => "Context",
        })
    }
}

/// A name that is already taken, and what kind of entry it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision<'a> {
    pub kind: EntityKind,
    pub name: &'a str,
}

impl Collision<'_> {
    fn question(&self, name: impl fmt::Display) -> String {
        format!(
            "{} name '{}' already exists. Please provide a new name: ",
            self.kind, name
        )
    }
}

impl fmt::Display for Collision<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.question(self.name))
    }
}

/// Source of replacement names.
pub trait NamePrompter {
    /// Returns one raw line of input, trailing newline included if there was one.
    fn ask(&mut self, collision: &Collision<'_>) -> io::Result<String>;
}

impl<P: NamePrompter + ?Sized> NamePrompter for &mut P {
    fn ask(&mut self, collision: &Collision<'_>) -> io::Result<String> {
        (**self).ask(collision)
    }
}

/// Asks on `output`, answers come from `input` one line at a time.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
    highlight: bool,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            highlight: false,
        }
    }
}

impl LinePrompter<io::StdinLock<'static>, io::Stderr> {
    pub fn terminal() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stderr(),
            highlight: true,
        }
    }
}

impl LinePrompter<io::BufReader<File>, io::Stderr> {
    /// Reads answers from the controlling terminal, leaving stdin free to carry
    /// a config.
    pub fn tty() -> io::Result<Self> {
        Self::open("/dev/tty")
    }

    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            input: io::BufReader::new(File::open(path)?),
            output: io::stderr(),
            highlight: true,
        })
    }
}

impl<R: BufRead, W: Write> NamePrompter for LinePrompter<R, W> {
    fn ask(&mut self, collision: &Collision<'_>) -> io::Result<String> {
        let question = if self.highlight {
            collision.question(style(collision.name).yellow().bold().for_stderr())
        } else {
            collision.to_string()
        };
        self.output.write_all(question.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for a name",
            ));
        }
        Ok(line)
    }
}

/// Answers from a fixed list, for tests and unattended runs.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Every question asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl NamePrompter for ScriptedPrompter {
    fn ask(&mut self, collision: &Collision<'_>) -> io::Result<String> {
        self.asked.push(collision.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answers left")
        })
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no replacement name for {kind} '{name}'")]
    Prompt {
        kind: EntityKind,
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Returns `candidate` if it isn't in `known`, otherwise keeps asking until the
/// answer is neither blank nor already in `known`.
///
/// The caller records the result in `known`.
pub fn resolve<P>(
    kind: EntityKind,
    candidate: &str,
    known: &HashSet<String>,
    prompter: &mut P,
) -> Result<String, ResolveError>
where
    P: NamePrompter + ?Sized,
{
    let mut name = candidate.to_owned();
    while known.contains(&name) {
        debug!(%kind, %name, "name collision");
        name = ask_non_blank(kind, &name, prompter)?;
    }
    Ok(name)
}

fn ask_non_blank<P>(
    kind: EntityKind,
    name: &str,
    prompter: &mut P,
) -> Result<String, ResolveError>
where
    P: NamePrompter + ?Sized,
{
    let collision = Collision { kind, name };
    loop {
        let line = prompter
            .ask(&collision)
            .map_err(|source| ResolveError::Prompt {
                kind,
                name: name.to_owned(),
                source,
            })?;
        let answer = line.trim_end_matches(&['\n', '\r'][..]);
        if answer.trim().is_empty() {
            debug!(%kind, %name, "blank name rejected");
            continue;
        }
        return Ok(answer.to_owned());
    }
}
