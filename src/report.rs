//! Terminal rendering of parse results and analyses.

use crate::session::{ScriptLine, Session};
use colored::*;
use rhythm_core::analysis::AnalysisRecord;
use rhythm_core::{ParsedPattern, QuantizationReport};

/// Step grid with a `|` before every stringed part
fn grid(parsed: &ParsedPattern) -> String {
    let dividers = parsed.dividers();
    let mut cells = Vec::new();
    for (i, &on) in parsed.pattern().steps().iter().enumerate() {
        if dividers.contains(&i) {
            cells.push("|".bright_blue().to_string());
        }
        cells.push(if on {
            "x".bright_yellow().bold().to_string()
        } else {
            ".".bright_black().to_string()
        });
    }
    cells.join(" ")
}

fn quantization(parsed: &ParsedPattern) -> Option<&QuantizationReport> {
    match parsed {
        ParsedPattern::Quantized { report, .. } => Some(report),
        ParsedPattern::Named { inner, .. } | ParsedPattern::Accented { inner, .. } => {
            quantization(inner)
        }
        _ => None,
    }
}

/// Compact line, step grid and whatever the wrappers added
pub fn render_parsed(session: &Session, parsed: &ParsedPattern) -> String {
    let mut lines = Vec::new();
    let compact = session.compact(parsed.pattern());
    lines.push(match parsed.name() {
        Some(name) => format!("{} = {}", name.bright_green().bold(), compact),
        None => compact,
    });
    lines.push(format!("  {}", grid(parsed)));

    if let Some(accent) = parsed.accent() {
        lines.push(format!(
            "  {} b{}",
            "accent:".green(),
            accent.to_binary_string().cyan()
        ));
    }
    if let Some(report) = quantization(parsed) {
        let direction = if report.clockwise {
            "clockwise"
        } else {
            "counter-clockwise"
        };
        let mut line = format!(
            "  {} {} -> {} steps ({})",
            "quantized:".green(),
            report.original_steps,
            report.quantized_steps,
            direction
        );
        if report.lost_onsets() > 0 {
            line.push_str(&format!(
                ", {}",
                format!("{} onsets merged", report.lost_onsets()).yellow()
            ));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<18} {}", format!("{}:", label).green(), value)
}

pub fn render_analysis(record: &AnalysisRecord) -> String {
    let mut lines = vec![
        field(
            "Steps",
            format!(
                "{} ({} onsets, density {:.3})",
                record.step_count, record.onset_count, record.density
            ),
        ),
        field("Binary", format!("b{}", record.binary).cyan()),
        field(
            "Numeric",
            format!(
                "{}  {}  {}",
                record.hex,
                record.octal,
                record.decimal.as_deref().unwrap_or("d-")
            )
            .cyan(),
        ),
        field("Onsets", format!("{:?}", record.onsets)),
        field(
            "Balance",
            format!(
                "{:.3} normalized {:.3} ({})",
                record.balance.magnitude, record.balance.normalized_magnitude, record.balance.score
            ),
        ),
    ];

    let cog = &record.center_of_gravity;
    lines.push(field(
        "Center of gravity",
        format!(
            "({:.3}, {:.3}) |{:.3}| at {:.1} deg ({})",
            cog.x, cog.y, cog.magnitude, cog.angle_degrees, cog.score
        ),
    ));

    lines.push(field(
        "Repetition",
        match &record.repetition {
            Some(r) => format!("{} x {}", r.unit_pattern, r.count),
            None => "none".to_string(),
        },
    ));
    lines.push(field(
        "Euclidean",
        match &record.euclidean {
            Some(e) => e.formula().bright_magenta().to_string(),
            None => "none".to_string(),
        },
    ));

    let prosody = &record.prosody;
    lines.push(field(
        "Prosody",
        format!(
            "{} {} {}",
            prosody.sequence,
            prosody.notation,
            prosody.foot.bright_cyan()
        ),
    ));

    let s = &record.syncopation;
    lines.push(field(
        "Syncopation",
        format!("{:.3} ({})", s.composite, s.level.to_string().bold()),
    ));
    lines.push(format!(
        "    note-to-beat {:.3}, off-beat {:.3}, expectancy {:.3}, displacement {:.3}, cross-rhythm {:.3}, barlow {:.3}",
        s.note_to_beat, s.off_beat_ratio, s.expectancy_violation, s.displacement, s.cross_rhythmic, s.barlow
    ));
    lines.join("\n")
}

pub fn analysis_json(record: &AnalysisRecord) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// `line N: <result>` for file mode
pub fn render_script_line(session: &Session, line: &ScriptLine) -> String {
    let prefix = format!("{:>4} |", line.line).bright_black();
    match &line.result {
        Ok(parsed) => format!("{} {}", prefix, render_parsed(session, parsed)),
        Err(e) => format!(
            "{} {} {} {}",
            prefix,
            line.source,
            "Error:".bright_red().bold(),
            e.to_string().red()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhythm_core::EngineConfig;

    fn plain() -> Session {
        colored::control::set_override(false);
        Session::new(EngineConfig::new())
    }

    #[test]
    fn test_stringed_grid_marks_parts() {
        let mut s = plain();
        let parsed = s.evaluate("groove = E(3,8) tri").unwrap();
        let out = render_parsed(&s, &parsed);
        assert!(out.starts_with("groove = b10010010111 |"), "{}", out);
        assert!(out.contains("x . . x . . x . | x x x"), "{}", out);
    }

    #[test]
    fn test_quantization_note() {
        let mut s = plain();
        let parsed = s.evaluate("11110000;2").unwrap();
        let out = render_parsed(&s, &parsed);
        assert!(out.contains("quantized: 8 -> 2 steps (clockwise), 2 onsets merged"), "{}", out);
    }

    #[test]
    fn test_raw_bits_compact_line() {
        let mut s = plain();
        s.set_reverse_for_rhythm(false);
        let parsed = s.evaluate("E(3,8)").unwrap();
        let out = render_parsed(&s, &parsed);
        assert!(out.starts_with("b10010010 | 0x92 | 0o222:8 | d146 | 3/8"), "{}", out);
    }

    #[test]
    fn test_analysis_lines() {
        let mut s = plain();
        let p = s.resolve("tresillo").unwrap();
        let out = render_analysis(&s.analyze(&p));
        assert!(out.contains("E(3,8,0)"), "{}", out);
        assert!(out.contains("LLS --. antibacchic"), "{}", out);
        assert!(out.contains("0x49  0o111:8  d73:8"), "{}", out);
    }

    #[test]
    fn test_json_fields() {
        let mut s = plain();
        let p = s.resolve("E(5,8)").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&analysis_json(&s.analyze(&p)).unwrap()).unwrap();
        assert_eq!(json["onset_count"], 5);
        assert_eq!(json["euclidean"]["beats"], 5);
        assert_eq!(json["prosody"]["sequence"], "LSLSL");
    }
}
