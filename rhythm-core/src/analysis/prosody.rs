//! Long-short reading of the inter-onset intervals, matched against the
//! classical metrical feet.

use crate::types::Pattern;

/// Prosodic feet by their short/long shape
const FEET: &[(&str, &str)] = &[
    ("SS", "pyrrhic"),
    ("SL", "iambic"),
    ("LS", "trochaic"),
    ("LL", "spondaic"),
    ("SSS", "tribrach"),
    ("LSS", "dactylic"),
    ("SLS", "amphibrachic"),
    ("SSL", "anapestic"),
    ("SLL", "bacchic"),
    ("LLS", "antibacchic"),
    ("LSL", "cretic"),
    ("LLL", "molossus"),
    ("SSSS", "proceleusmatic"),
    ("LSSS", "first paeon"),
    ("SLSS", "second paeon"),
    ("SSLS", "third paeon"),
    ("SSSL", "fourth paeon"),
    ("SSLL", "ionic minor"),
    ("LLSS", "ionic major"),
    ("LSSL", "choriambic"),
    ("SLLS", "antispastic"),
    ("SLSL", "diiambic"),
    ("LSLS", "ditrochaic"),
    ("LLLL", "dispondaic"),
    ("SLLL", "first epitrite"),
    ("LSLL", "second epitrite"),
    ("LLSL", "third epitrite"),
    ("LLLS", "fourth epitrite"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntervalClass {
    Short,
    Long,
    /// Every interval in the pattern has the same length
    Equal,
}

impl IntervalClass {
    pub fn letter(&self) -> char {
        match self {
            IntervalClass::Short => 'S',
            IntervalClass::Long => 'L',
            IntervalClass::Equal => 'E',
        }
    }

    /// Dot for short, dash for long
    pub fn symbol(&self) -> char {
        match self {
            IntervalClass::Long => '-',
            IntervalClass::Short | IntervalClass::Equal => '.',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProsodyAnalysis {
    pub intervals: Vec<usize>,
    pub classes: Vec<IntervalClass>,
    /// `.`/`-` per interval
    pub notation: String,
    /// `S`/`L` per interval
    pub sequence: String,
    pub foot: String,
}

/// Distances from each onset to the next one, wrapping at the end of the
/// cycle. Empty for a silent pattern.
pub fn onset_intervals(pattern: &Pattern) -> Vec<usize> {
    let onsets = pattern.onsets();
    let n = pattern.step_count();
    match (onsets.first(), onsets.last()) {
        (Some(&first), Some(&last)) => {
            let mut intervals: Vec<usize> = onsets.windows(2).map(|w| w[1] - w[0]).collect();
            intervals.push(first + n - last);
            intervals
        }
        _ => Vec::new(),
    }
}

/// Short when nearer the smallest interval than the largest; ties are long
pub fn classify_intervals(intervals: &[usize]) -> Vec<IntervalClass> {
    let (Some(&min), Some(&max)) = (intervals.iter().min(), intervals.iter().max()) else {
        return Vec::new();
    };
    if min == max {
        return vec![IntervalClass::Equal; intervals.len()];
    }
    intervals
        .iter()
        .map(|&i| {
            if i - min < max - i {
                IntervalClass::Short
            } else {
                IntervalClass::Long
            }
        })
        .collect()
}

fn foot_name(sequence: &str) -> Option<&'static str> {
    FEET.iter()
        .find(|(shape, _)| *shape == sequence)
        .map(|&(_, name)| name)
}

/// Shortest prefix that repeats to fill the whole sequence
fn repeating_unit(sequence: &str) -> &str {
    let len = sequence.len();
    (1..len)
        .filter(|u| len % u == 0)
        .find(|&u| sequence.as_bytes().chunks(u).all(|c| c == &sequence.as_bytes()[..u]))
        .map(|u| &sequence[..u])
        .unwrap_or(sequence)
}

fn classify_foot(classes: &[IntervalClass], sequence: &str) -> String {
    if classes.is_empty() {
        return "empty".to_string();
    }
    if classes.iter().all(|c| *c == IntervalClass::Equal) {
        return "equal".to_string();
    }
    if let Some(name) = foot_name(sequence).or_else(|| foot_name(repeating_unit(sequence))) {
        return name.to_string();
    }

    let long = classes.iter().filter(|c| **c == IntervalClass::Long).count();
    let ratio = long as f64 / classes.len() as f64;
    if ratio >= 0.7 {
        "predominantly long".to_string()
    } else if ratio <= 0.3 {
        "predominantly short".to_string()
    } else {
        "complex".to_string()
    }
}

pub fn analyze_prosody(pattern: &Pattern) -> ProsodyAnalysis {
    let intervals = onset_intervals(pattern);
    let classes = classify_intervals(&intervals);
    let notation = classes.iter().map(IntervalClass::symbol).collect();
    let sequence: String = classes.iter().map(IntervalClass::letter).collect();
    let foot = classify_foot(&classes, &sequence);

    ProsodyAnalysis {
        intervals,
        classes,
        notation,
        sequence,
        foot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prosody(bits: &str) -> ProsodyAnalysis {
        analyze_prosody(&Pattern::from_binary(bits).unwrap())
    }

    #[test]
    fn test_tresillo_is_antibacchic() {
        let a = prosody("10010010");
        assert_eq!(a.intervals, vec![3, 3, 2]);
        assert_eq!(a.sequence, "LLS");
        assert_eq!(a.notation, "--.");
        assert_eq!(a.foot, "antibacchic");
    }

    #[test]
    fn test_intervals_wrap_around() {
        assert_eq!(prosody("0100100").intervals, vec![3, 4]);
        assert_eq!(prosody("0010").intervals, vec![4]);
    }

    #[test]
    fn test_repeating_unit_matches_foot() {
        // SL SL SL
        let a = prosody("110110110");
        assert_eq!(a.sequence, "SLSLSL");
        assert_eq!(a.foot, "iambic");
    }

    #[test]
    fn test_ties_go_long() {
        let classes = classify_intervals(&[1, 2, 3]);
        assert_eq!(
            classes,
            vec![IntervalClass::Short, IntervalClass::Long, IntervalClass::Long]
        );
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(prosody("1010").foot, "equal");
        assert_eq!(prosody("0000").foot, "empty");
        // intervals 2,1,2,1,2 -> LSLSL
        assert_eq!(prosody("10110110").foot, "complex");
        // S S S S L -> ratio 0.2
        assert_eq!(prosody("1111100").foot, "predominantly short");
    }
}
