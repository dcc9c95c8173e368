use regex::{Regex, RegexBuilder};

/// Configuration for transcript speaker handling
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Role names that mark the first real transcript line
    pub speaker_roles: Vec<String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            speaker_roles: vec![
                "User".to_string(),
                "Person".to_string(),
                "Staff".to_string(),
                "MLA".to_string(),
                "Commissioner".to_string(),
                "Councillor".to_string(),
            ],
        }
    }
}

/// Matches lines that open with a known conversational role, e.g. `Staff 2:`
#[derive(Debug, Clone)]
pub struct RoleLinePattern {
    pattern: Regex,
}

impl RoleLinePattern {
    pub fn new(roles: &[String]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = roles.iter().map(|r| regex::escape(r.trim())).collect();
        let pattern = RegexBuilder::new(&format!(r"^(?:{})\s*\d*\s*:", alternatives.join("|")))
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    /// Whether the raw line opens with a role; indented lines do not count
    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Index of the first line that opens with a known role
    ///
    /// Lines before it are transcript metadata (dates, titles). `None` when
    /// no line matches, in which case nothing should be dropped.
    pub fn first_match(&self, lines: &[&str]) -> Option<usize> {
        lines.iter().position(|line| self.is_match(line))
    }
}

/// Split a `Name: text` line into speaker and clean text
///
/// The name is everything before the first colon. A line without a colon,
/// or with nothing but whitespace before it, has no speaker.
pub fn detect_speaker(text: &str) -> (Option<String>, String) {
    if let Some((name, rest)) = text.split_once(':') {
        let name = name.trim();
        if !name.is_empty() {
            return (Some(name.to_string()), rest.trim().to_string());
        }
    }
    (None, text.to_string())
}

/// Case-insensitive comparison of a speaker against the primary user
pub fn is_primary_user(speaker: Option<&str>, primary_user: &str) -> bool {
    speaker.is_some_and(|s| s.to_lowercase() == primary_user.to_lowercase())
}
