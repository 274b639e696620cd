//! Pattern commands (analyze, convert, patterns)

use crate::commands::{CommandContext, CommandResult};
use crate::report::render_analysis;
use colored::*;
use rhythm_core::LiteralFormat;

/// Handle `analyze <expr>` command
pub fn cmd_analyze(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: analyze <expr>".to_string());
    }
    match ctx.eval(args) {
        Ok(pattern) => {
            let record = ctx.session.analyze(&pattern);
            CommandResult::Message(format!(
                "{}\n{}",
                ctx.session.compact(&pattern),
                render_analysis(&record)
            ))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `convert <format> <expr>` command
pub fn cmd_convert(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let Some((format, expr)) = args.split_once(char::is_whitespace) else {
        return CommandResult::Error(
            "Usage: convert <binary|hex|octal|decimal|onsets> <expr>".to_string(),
        );
    };
    let format = match LiteralFormat::from_name(format) {
        Some(LiteralFormat::Morse) | None => {
            return CommandResult::Error(format!("Cannot convert to '{}'", format))
        }
        Some(format) => format,
    };

    match ctx.eval(expr) {
        Ok(pattern) => match ctx.session.encode(&pattern, format) {
            Some(text) => CommandResult::Message(text.cyan().to_string()),
            None => CommandResult::Error(format!(
                "No {} encoding for a {}-step pattern",
                format.name(),
                pattern.step_count()
            )),
        },
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `patterns` command
pub fn cmd_patterns(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let lines: Vec<String> = ctx
        .session
        .patterns()
        .map(|(name, pattern)| {
            format!("  {} = {}", name.bright_green(), ctx.session.compact(pattern))
        })
        .collect();
    if lines.is_empty() {
        CommandResult::Message("No named patterns. Define one with name=expr".to_string())
    } else {
        CommandResult::Message(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use rhythm_core::EngineConfig;

    fn ctx() -> CommandContext {
        colored::control::set_override(false);
        CommandContext::new(Session::new(EngineConfig::new()))
    }

    #[test]
    fn test_convert() {
        let mut ctx = ctx();
        assert_eq!(
            cmd_convert("hex tresillo", &mut ctx),
            CommandResult::Message("0x49".to_string())
        );
        assert_eq!(
            cmd_convert("onsets E(3,8)", &mut ctx),
            CommandResult::Message("[0,3,6]:8".to_string())
        );
        assert!(matches!(cmd_convert("morse tri", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_convert("hex", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_analyze_uses_library() {
        let mut ctx = ctx();
        ctx.session.evaluate("clave = E(3,8)").unwrap();
        match cmd_analyze("clave", &mut ctx) {
            CommandResult::Message(text) => assert!(text.contains("antibacchic"), "{}", text),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(cmd_analyze("zzz", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_patterns_listing() {
        let mut ctx = ctx();
        assert!(matches!(cmd_patterns("", &mut ctx), CommandResult::Message(m) if m.starts_with("No named")));
        ctx.session.evaluate("a = tri").unwrap();
        match cmd_patterns("", &mut ctx) {
            CommandResult::Message(text) => assert_eq!(text, "  a = b111 | 0x7:3 | 0o7 | d7 | 3/3 [polygon, balanced]"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
