use crate::models::Chunk;

/// Perform Stage 1: wrap every sentence in a three-sentence context window
pub fn build_chunks(sentences: &[String]) -> Vec<Chunk> {
    (0..sentences.len())
        .map(|index| Chunk {
            index,
            original: sentences[index].clone(),
            context_window: context_window(sentences, index),
        })
        .collect()
}

/// Previous, current and next sentence joined with spaces and trimmed
pub fn context_window(sentences: &[String], index: usize) -> String {
    let prev = index
        .checked_sub(1)
        .and_then(|i| sentences.get(i))
        .map(String::as_str)
        .unwrap_or("");
    let curr = sentences.get(index).map(String::as_str).unwrap_or("");
    let next = sentences.get(index + 1).map(String::as_str).unwrap_or("");

    format!("{} {} {}", prev, curr, next).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_window_at_boundaries() {
        let s = sentences(&["A.", "B.", "C."]);
        assert_eq!(context_window(&s, 0), "A. B.");
        assert_eq!(context_window(&s, 1), "A. B. C.");
        assert_eq!(context_window(&s, 2), "B. C.");
    }

    #[test]
    fn test_single_sentence_window() {
        let s = sentences(&["Only one."]);
        assert_eq!(context_window(&s, 0), "Only one.");
    }

    #[test]
    fn test_build_chunks_preserves_order() {
        let s = sentences(&["User: First.", "Staff: Second."]);
        let chunks = build_chunks(&s);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[1].original, "Staff: Second.");
        assert_eq!(chunks[1].context_window, "User: First. Staff: Second.");
        assert!(build_chunks(&[]).is_empty());
    }
}
