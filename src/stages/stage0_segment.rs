use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::heuristics::{detect_speaker, RoleLinePattern, SentenceSplitter};

/// Perform Stage 0: split a raw transcript into speaker-tagged sentences
///
/// This stage:
/// 1. Drops metadata lines that precede the first known-role line
/// 2. Detects a `Name:` prefix on every remaining line
/// 3. Splits each line's text into sentences
/// 4. Re-attaches the line's speaker to each of its sentences
pub fn segment(
    text: &str,
    splitter: &dyn SentenceSplitter,
    roles: &RoleLinePattern,
) -> Result<Vec<String>> {
    let lines: Vec<&str> = text.lines().collect();
    let start = roles.first_match(&lines).unwrap_or(0);
    if start > 0 {
        debug!("Dropping {} metadata lines before first speaker", start);
    }

    let mut sentences = Vec::new();

    for (line_no, line) in lines.iter().enumerate().skip(start) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (speaker, clean_text) = detect_speaker(line);
        let parts = splitter
            .split(&clean_text)
            .map_err(|source| PipelineError::SegmentationFailure {
                line: line_no,
                source,
            })?;

        for part in parts {
            match &speaker {
                Some(name) => sentences.push(format!("{}: {}", name, part)),
                None => sentences.push(part),
            }
        }
    }

    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapabilityError;
    use crate::heuristics::{PunctuationSplitter, SegmenterConfig};

    fn roles() -> RoleLinePattern {
        RoleLinePattern::new(&SegmenterConfig::default().speaker_roles).unwrap()
    }

    #[test]
    fn test_segment_tags_every_sentence_with_speaker() {
        let text = "User: I will fix the drains. Send me the report.\nStaff: Noted.";
        let sentences = segment(text, &PunctuationSplitter, &roles()).unwrap();
        assert_eq!(
            sentences,
            vec![
                "User: I will fix the drains.",
                "User: Send me the report.",
                "Staff: Noted.",
            ]
        );
    }

    #[test]
    fn test_segment_drops_metadata_header() {
        let text = "Ward 12 Review\nDate: 3 March\n\nMLA: Let us begin.\nStaff 2: The budget is pending.";
        let sentences = segment(text, &PunctuationSplitter, &roles()).unwrap();
        assert_eq!(
            sentences,
            vec!["MLA: Let us begin.", "Staff 2: The budget is pending."]
        );
    }

    #[test]
    fn test_segment_without_role_lines_keeps_everything() {
        let text = "Date: 3 March\nCould you check the status? It is late.";
        let sentences = segment(text, &PunctuationSplitter, &roles()).unwrap();
        assert_eq!(
            sentences,
            vec![
                "Date: 3 March",
                "Could you check the status?",
                "It is late.",
            ]
        );
    }

    #[test]
    fn test_indented_role_line_is_not_a_header_boundary() {
        let text = "Ward 12 Review\n  Staff: Indented opening line.\nUser: Let us begin.";
        let sentences = segment(text, &PunctuationSplitter, &roles()).unwrap();
        assert_eq!(sentences, vec!["User: Let us begin."]);
    }

    #[test]
    fn test_segment_empty_input() {
        assert!(segment("", &PunctuationSplitter, &roles()).unwrap().is_empty());
        assert!(segment("\n   \n", &PunctuationSplitter, &roles()).unwrap().is_empty());
    }

    struct FailingSplitter;

    impl SentenceSplitter for FailingSplitter {
        fn split(&self, _text: &str) -> std::result::Result<Vec<String>, CapabilityError> {
            Err("model not loaded".into())
        }
    }

    #[test]
    fn test_splitter_failure_aborts() {
        let err = segment("Header\nUser: hello there", &FailingSplitter, &roles()).unwrap_err();
        assert!(matches!(err, PipelineError::SegmentationFailure { line: 1, .. }));
    }
}
