use regex::Regex;

/// Built-in filler patterns, matched against lower-cased, trimmed text
const DEFAULT_PATTERNS: &[&str] = &[
    // Greetings
    r"^(good\s+(morning|afternoon|evening|day))",
    // Single-word fillers
    r"^(hello|hi|hey|ok|yes|no|dear|sir|maam|everyone)\.?$",
    // Thanks and closings
    r"^(thank\s+you|thanks|welcome|bye|goodbye)",
    r"^(can\s+you\s+hear\s+me\??)",
    r"^(shall\s+we\s+begin\??)",
    // Acknowledgements
    r"^(i am aware|i know|noted|understood|i see|certainly|of course|sure|absolutely)(\s+.*)?\.?$",
];

/// Fast deterministic filter for greetings, thanks and acknowledgements
///
/// Runs before the classifier, so obvious filler never reaches it, and again
/// during routing so filler the classifier mislabeled is still discarded.
#[derive(Debug, Clone)]
pub struct NoiseSentinel {
    patterns: Vec<Regex>,
}

impl NoiseSentinel {
    /// Build a sentinel from an ordered set of patterns
    ///
    /// Patterns see lower-cased input and should be written in lower case.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Index of the first pattern matching `text`, if any
    pub fn matching_pattern(&self, text: &str) -> Option<usize> {
        let text = text.trim().to_lowercase();
        self.patterns.iter().position(|p| p.is_match(&text))
    }

    pub fn is_noise(&self, text: &str) -> bool {
        self.matching_pattern(text).is_some()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for NoiseSentinel {
    fn default() -> Self {
        Self::with_patterns(DEFAULT_PATTERNS).expect("built-in noise patterns are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greetings_and_closings() {
        let sentinel = NoiseSentinel::default();
        assert!(sentinel.is_noise("Good morning everyone."));
        assert!(sentinel.is_noise("Thank you, that concludes the meeting."));
        assert!(sentinel.is_noise("Thanks"));
        assert!(sentinel.is_noise("Can you hear me?"));
        assert!(sentinel.is_noise("Shall we begin?"));
    }

    #[test]
    fn test_single_word_fillers_only_when_alone() {
        let sentinel = NoiseSentinel::default();
        assert!(sentinel.is_noise("Ok."));
        assert!(sentinel.is_noise("  YES  "));
        assert!(!sentinel.is_noise("Yes, the contractor has been notified."));
    }

    #[test]
    fn test_acknowledgements() {
        let sentinel = NoiseSentinel::default();
        assert!(sentinel.is_noise("Noted."));
        assert!(sentinel.is_noise("Of course we can look at it."));
        assert!(sentinel.is_noise("I see"));
    }

    #[test]
    fn test_substantive_sentences_pass() {
        let sentinel = NoiseSentinel::default();
        assert!(!sentinel.is_noise("I will fix this by Friday."));
        assert!(!sentinel.is_noise("Could you check the status?"));
        assert!(!sentinel.is_noise("The ward has a population of 45,000."));
    }

    #[test]
    fn test_matching_pattern_reports_first_match() {
        let sentinel = NoiseSentinel::default();
        assert_eq!(sentinel.matching_pattern("Good day"), Some(0));
        assert_eq!(sentinel.matching_pattern("goodbye"), Some(2));
        assert_eq!(sentinel.pattern_count(), 6);
    }

    #[test]
    fn test_custom_patterns() {
        let sentinel = NoiseSentinel::with_patterns(["^namaste"]).unwrap();
        assert!(sentinel.is_noise("Namaste ji"));
        assert!(!sentinel.is_noise("Good morning"));
        assert!(NoiseSentinel::with_patterns(["("]).is_err());
    }
}
