//! Evaluation state shared by the REPL, file mode and one-shot commands:
//! the parser, the engine configuration and the named-pattern library.

use rhythm_core::analysis::AnalysisRecord;
use rhythm_core::{
    codec, format_compact_with, Analyzer, EngineConfig, LiteralFormat, ParseError, ParsedPattern,
    Parser, Pattern,
};
use std::collections::BTreeMap;

/// One evaluated line of a pattern file
#[derive(Debug)]
pub struct ScriptLine {
    /// 1-based line number
    pub line: usize,
    pub source: String,
    pub result: Result<ParsedPattern, ParseError>,
}

pub struct Session {
    config: EngineConfig,
    parser: Parser,
    library: BTreeMap<String, Pattern>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            parser: Parser::new(&config),
            config,
            library: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Restart the random stream from `seed`
    pub fn set_seed(&mut self, seed: u64) {
        self.config = self.config.with_random_seed(seed);
        self.parser = Parser::new(&self.config);
    }

    /// Switch the numeric bit order. The random stream is left alone.
    pub fn set_reverse_for_rhythm(&mut self, reverse: bool) {
        self.config = self.config.with_reverse_for_rhythm(reverse);
        self.parser.set_config(&self.config);
    }

    /// Parse one expression; `name=expr` also stores the result
    pub fn evaluate(&mut self, input: &str) -> Result<ParsedPattern, ParseError> {
        let parsed = self.parser.parse(input)?;
        if let Some(name) = parsed.name() {
            tracing::debug!(name, "stored pattern");
            self.library.insert(name.to_string(), parsed.pattern().clone());
        }
        Ok(parsed)
    }

    /// A stored pattern by name, or the parsed expression
    pub fn resolve(&mut self, input: &str) -> Result<Pattern, ParseError> {
        match self.library.get(input.trim()) {
            Some(pattern) => Ok(pattern.clone()),
            None => self.evaluate(input).map(ParsedPattern::into_pattern),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Pattern> {
        self.library.get(name)
    }

    /// Stored patterns, sorted by name
    pub fn patterns(&self) -> impl Iterator<Item = (&str, &Pattern)> {
        self.library.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn analyze(&self, pattern: &Pattern) -> AnalysisRecord {
        Analyzer::new(&self.config).analyze(pattern)
    }

    /// Encode in the session's bit order; `None` where the format has no
    /// encoding for this pattern
    pub fn encode(&self, pattern: &Pattern, format: LiteralFormat) -> Option<String> {
        let reverse = self.config.reverse_for_rhythm && pattern.reads_reversed();
        codec::encode(pattern, format, reverse)
    }

    /// One-line summary with numeric fields in the session's bit order
    pub fn compact(&self, pattern: &Pattern) -> String {
        format_compact_with(pattern, self.config.reverse_for_rhythm && pattern.reads_reversed())
    }

    /// Evaluate every non-empty line that is not a `#` comment
    pub fn run_script(&mut self, source: &str) -> Vec<ScriptLine> {
        source
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(line, text)| ScriptLine {
                line,
                source: text.to_string(),
                result: self.evaluate(text),
            })
            .collect()
    }
}
