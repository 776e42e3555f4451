use std::path::PathBuf;

use memhex::harness::{DEFAULT_ARCH, INIT_DUMP};
use memhex::TestKind;

use super::error::ParseArgError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clean the simulation memory image in place.
    Init { path: PathBuf },
    /// Clean a reference-model signature log in place.
    Reference { path: PathBuf },
    /// Print discovered test sources.
    List {
        root: PathBuf,
        arch: String,
        kind: String,
        filter: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub verbose: bool,
    pub quiet: bool,
    pub command: Command,
}

impl Args {
    pub fn parse() -> Result<Self, ParseArgError> {
        Self::parse_from(std::env::args().skip(1).collect())
    }

    pub fn parse_from(args: Vec<String>) -> Result<Self, ParseArgError> {
        let mut verbose = false;
        let mut quiet = false;
        let mut iter = args.into_iter().peekable();

        while let Some(arg) = iter.next_if(|a| a.starts_with('-')) {
            match arg.as_str() {
                "-v" | "--verbose" => verbose = true,
                "-q" | "--quiet" => quiet = true,
                _ => return Err(ParseArgError::InvalidOption(arg)),
            }
        }

        let command = match iter.next().as_deref() {
            None => return Err(ParseArgError::MissingCommand),
            Some("init") => {
                let path = iter.next().unwrap_or_else(|| format!("./{INIT_DUMP}"));
                Command::Init {
                    path: PathBuf::from(path),
                }
            }
            Some("reference") => {
                let path = iter
                    .next()
                    .ok_or_else(|| ParseArgError::MissingPath("reference".to_string()))?;
                Command::Reference {
                    path: PathBuf::from(path),
                }
            }
            Some("list") => parse_list(&mut iter)?,
            Some(other) => return Err(ParseArgError::UnknownCommand(other.to_string())),
        };

        if let Some(extra) = iter.next() {
            return Err(ParseArgError::UnexpectedArgument(extra));
        }

        Ok(Self {
            verbose,
            quiet,
            command,
        })
    }
}

fn parse_list(iter: &mut impl Iterator<Item = String>) -> Result<Command, ParseArgError> {
    let mut root = PathBuf::from(".");
    let mut arch = DEFAULT_ARCH.to_string();
    let mut kind = TestKind::default().as_str().to_string();
    let mut filter = None;

    while let Some(arg) = iter.next() {
        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => {
                (name.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| iter.next())
                .ok_or_else(|| ParseArgError::MissingValue(name.clone()))
        };
        match name.as_str() {
            "-a" | "--arch" => arch = value()?,
            "-t" | "--test" => kind = value()?,
            "--root" => root = PathBuf::from(value()?),
            _ if name.starts_with('-') => return Err(ParseArgError::InvalidOption(arg)),
            _ if filter.is_none() => filter = Some(arg),
            _ => return Err(ParseArgError::UnexpectedArgument(arg)),
        }
    }

    Ok(Command::List {
        root,
        arch,
        kind,
        filter,
    })
}
