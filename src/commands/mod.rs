//! REPL commands
//!
//! Lines whose first word names a registered command go to its handler;
//! anything else is evaluated as a pattern expression.

pub mod analysis;
pub mod general;

use crate::session::Session;
use rhythm_core::{ParseError, Pattern};

/// Outcome of one REPL line
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Handled, nothing to print
    Success,
    Message(String),
    Exit,
    /// No command matched; evaluate the line as an expression
    NotACommand,
    Error(String),
    /// Start watching this pattern file
    Watch(String),
}

/// State the handlers share
pub struct CommandContext {
    pub session: Session,
}

impl CommandContext {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// A stored pattern or a freshly parsed expression
    pub fn eval(&mut self, input: &str) -> Result<Pattern, ParseError> {
        self.session.resolve(input)
    }
}

pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

#[derive(Default)]
pub struct CommandRegistry {
    /// Longest prefix first, so "analyze json" beats "analyze"
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by_key(|(p, _)| std::cmp::Reverse(p.len()));
    }

    /// Dispatch `input` to the first matching prefix. A prefix only matches
    /// a whole word, so `exits` is an expression, not `exit`.
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        let matched = self.commands.iter().find_map(|(prefix, handler)| {
            let rest = input.strip_prefix(prefix.as_str())?;
            (rest.is_empty() || rest.starts_with(' ')).then(|| (rest.trim(), handler))
        });
        match matched {
            Some((args, handler)) => handler(args, ctx),
            None => CommandResult::NotACommand,
        }
    }

    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

/// Registry with every built-in REPL command
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register("analyze", analysis::cmd_analyze);
    registry.register("convert", analysis::cmd_convert);
    registry.register("patterns", analysis::cmd_patterns);

    registry.register("seed", general::cmd_seed);
    registry.register("bits", general::cmd_bits);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);
    registry.register("watch", general::cmd_watch);

    registry
}
