//! General REPL commands (help, quit, seed, bits, watch)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `seed [n]` command
pub fn cmd_seed(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(match ctx.session.config().default_random_seed {
            Some(seed) => format!("Random seed: {}", seed),
            None => "Random seed: entropy".to_string(),
        });
    }

    match args.parse::<u64>() {
        Ok(seed) => {
            ctx.session.set_seed(seed);
            CommandResult::Message(format!("Random seed set to {}", seed).bright_green().to_string())
        }
        Err(_) => CommandResult::Error(format!("Invalid seed '{}'", args)),
    }
}

/// Handle `bits [rhythm|raw]` command
pub fn cmd_bits(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let reverse = match args.to_lowercase().as_str() {
        "" => {
            let order = if ctx.session.config().reverse_for_rhythm {
                "rhythm (first step = bit 0)"
            } else {
                "raw (first step = most significant bit)"
            };
            return CommandResult::Message(format!("Bit order: {}", order));
        }
        "rhythm" | "reversed" => true,
        "raw" | "standard" => false,
        other => {
            return CommandResult::Error(format!(
                "Unknown bit order '{}'. Use 'rhythm' or 'raw'",
                other
            ))
        }
    };
    ctx.session.set_reverse_for_rhythm(reverse);
    CommandResult::Message(
        format!("Bit order set to {}", if reverse { "rhythm" } else { "raw" })
            .bright_green()
            .to_string(),
    )
}

/// Handle `watch [file]` command
pub fn cmd_watch(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: watch <file>".to_string());
    }
    CommandResult::Watch(args.to_string())
}

/// Print help information
fn print_help() {
    println!("{}", "Rhythm Pattern Help".bold());
    println!("{}", "===================".bold());
    println!();
    println!("{}", "Generators:".green());
    println!("  {}        - Euclidean: 3 onsets spread over 8 steps", "E(3,8)".cyan());
    println!("  {}      - Euclidean rotated by 2", "E(3,8,2)".cyan());
    println!("  {}        - Polygon: 3 vertices, offset 0", "P(3,0)".cyan());
    println!("  {}      - Polygon with expansion 2 (6 steps)", "P(3,0,2)".cyan());
    println!("  {}  - Random: 4 onsets, or a random count", "R(4,16) R(r,16)".cyan());
    println!(
        "  {} - Barlow / Wolrab / Dilcue",
        "B(3,8) W(3,8) D(3,8)".cyan()
    );
    println!(
        "  {} - Shorthands",
        "tri square pent hex hept oct tresillo cinquillo".cyan()
    );
    println!();
    println!("{}", "Literals:".green());
    println!("  {}     - Binary (also b1001, 0b1001:8)", "10010010".cyan());
    println!("  {}         - Hex, downbeat in bit 0 (see 'bits')", "0x49".cyan());
    println!("  {}  - Octal and decimal", "0o111:8 d73:8".cyan());
    println!("  {}    - Onset positions", "[0,3,6]:8".cyan());
    println!("  {}  - Morse text and raw Morse", "M:SOS ...---...".cyan());
    println!();
    println!("{}", "Transformations:".green());
    println!("  {}  - Invert onsets and rests", "~E(3,8) inv E(3,8)".cyan());
    println!("  {}    - Retrograde", "rev E(3,8)".cyan());
    println!("  {}   - Euclidean complement", "comp E(3,8)".cyan());
    println!("  {}      - Rotate by 2 steps", "E(3,8)@2".cyan());
    println!("  {} - Durations short=1 long=2", "D:1,2 E(3,8)".cyan());
    println!("  {}  - Stretch / squeeze", "S:2 tri  Q:2 E(4,8)".cyan());
    println!();
    println!("{}", "Combining:".green());
    println!("  {}  - Union on the LCM of the step counts", "P(3,0)+P(5,1)".cyan());
    println!("  {}        - Remove onsets", "E(5,8)-E(2,8)".cyan());
    println!("  {}     - Play patterns back to back", "E(3,8) P(3,0)".cyan());
    println!("  {}   - Quantize to 16 steps (;-16 counter-clockwise)", "E(3,8);16".cyan());
    println!("  {}  - Name a pattern", "clave=E(3,8)".cyan());
    println!("  {}    - Attach an accent layer", "E(3,8){100}".cyan());
    println!();
    println!("{}", "Commands:".green());
    println!("  {}     - Full analysis", "analyze <expr>".cyan());
    println!("  {} - Re-encode (binary, hex, octal, decimal, onsets)", "convert <fmt> <expr>".cyan());
    println!("  {}           - List named patterns", "patterns".cyan());
    println!("  {}           - Show or set the random seed", "seed [n]".cyan());
    println!("  {}   - Show or set the bit order", "bits [rhythm|raw]".cyan());
    println!("  {}       - Evaluate a file on every change", "watch <file>".cyan());
    println!("  {}          - Leave", "quit, exit".cyan());
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
    fn test_seed() {
        let mut ctx = ctx();
        assert_eq!(
            cmd_seed("", &mut ctx),
            CommandResult::Message("Random seed: entropy".to_string())
        );
        assert_eq!(
            cmd_seed("12", &mut ctx),
            CommandResult::Message("Random seed set to 12".to_string())
        );
        assert_eq!(ctx.session.config().default_random_seed, Some(12));
        assert!(matches!(cmd_seed("x", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_bits() {
        let mut ctx = ctx();
        assert!(matches!(cmd_bits("RAW", &mut ctx), CommandResult::Message(_)));
        assert!(!ctx.session.config().reverse_for_rhythm);
        assert!(matches!(cmd_bits("sideways", &mut ctx), CommandResult::Error(_)));
        cmd_bits("rhythm", &mut ctx);
        assert!(ctx.session.config().reverse_for_rhythm);
    }

    #[test]
    fn test_watch_needs_a_path() {
        let mut ctx = ctx();
        assert!(matches!(cmd_watch("", &mut ctx), CommandResult::Error(_)));
        assert_eq!(
            cmd_watch("grooves.txt", &mut ctx),
            CommandResult::Watch("grooves.txt".to_string())
        );
    }
}
