//! Inbound commands to the application service.
//!
//! The host hands the engine a single argument string per invocation.
//! An empty string is a scheduler resume tick; anything else is parsed
//! into an [`AppCommand`] that the
//! [`AirlockService`](super::service::AirlockService) acts upon.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// What the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Pressurize,
    Depressurize,
    /// Pressurize, then leave every door open.
    AtmoReady,
    /// Depressurize, then leave the outer doors closed but operable.
    SpaceReady,
    EnableDemoMode,
    DisableDemoMode,
}

impl Verb {
    pub const ALL: [Self; 6] = [
        Self::Pressurize,
        Self::Depressurize,
        Self::AtmoReady,
        Self::SpaceReady,
        Self::EnableDemoMode,
        Self::DisableDemoMode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pressurize => "Pressurize",
            Self::Depressurize => "Depressurize",
            Self::AtmoReady => "AtmoReady",
            Self::SpaceReady => "SpaceReady",
            Self::EnableDemoMode => "EnableDemoMode",
            Self::DisableDemoMode => "DisableDemoMode",
        }
    }

    /// `true` when the sequence drives the chamber toward pressure.
    pub fn is_pressurizing(self) -> bool {
        matches!(self, Self::Pressurize | Self::AtmoReady)
    }

    /// Demo-mode verbs flip a flag and never start a sequence.
    pub fn is_demo_toggle(self) -> bool {
        matches!(self, Self::EnableDemoMode | Self::DisableDemoMode)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = Error;

    /// Exact, case-sensitive match on the verb name.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::InvalidCommand("Invalid verb on the command line".into()))
    }
}

/// Commands the outside world can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Scheduler resume tick (empty argument).
    Resume,

    /// Set or clear demo mode.
    SetDemoMode(bool),

    /// Start a sequence on the named group, replacing any running one.
    Sequence { verb: Verb, group: String },
}

/// Parse one invocation argument.
///
/// `configured_group` is the statically configured airlock name; when
/// present the command is just the verb and any group token is ignored.
///
/// ```
/// use airlock::app::commands::{parse_command, AppCommand, Verb};
///
/// assert_eq!(parse_command("", None), Ok(AppCommand::Resume));
/// assert_eq!(
///     parse_command("Pressurize \"Hangar Lock\"", None),
///     Ok(AppCommand::Sequence { verb: Verb::Pressurize, group: "Hangar Lock".into() })
/// );
/// assert_eq!(
///     parse_command("SpaceReady", Some("Lock 1")),
///     Ok(AppCommand::Sequence { verb: Verb::SpaceReady, group: "Lock 1".into() })
/// );
/// assert!(parse_command("Pressurize", None).is_err());
/// ```
pub fn parse_command(argument: &str, configured_group: Option<&str>) -> Result<AppCommand> {
    let args = tokenize(argument)?;
    let Some(first) = args.first() else {
        return Ok(AppCommand::Resume);
    };

    let verb: Verb = first.parse()?;
    match verb {
        Verb::EnableDemoMode => return Ok(AppCommand::SetDemoMode(true)),
        Verb::DisableDemoMode => return Ok(AppCommand::SetDemoMode(false)),
        _ => {}
    }

    let group = match configured_group {
        Some(name) => name.to_owned(),
        None => args
            .get(1)
            .cloned()
            .ok_or_else(|| Error::InvalidCommand("Invalid command line".into()))?,
    };

    Ok(AppCommand::Sequence { verb, group })
}

/// Split on whitespace; a double-quoted run is one token and may contain
/// spaces.  Empty quotes yield an empty token.
pub fn tokenize(argument: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in argument.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    args.push(core::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(Error::InvalidCommand("Unterminated quote".into()));
    }
    if in_token {
        args.push(current);
    }
    Ok(args)
}
