/// Example prompts offered before the conversation has started.
pub static SUGGESTED_QUERIES: [&str; 4] = [
    "What programs does CUTM offer?",
    "Tell me about research opportunities at CUTM",
    "What are the admission requirements?",
    "How can I contact the faculty?",
];

/// Looks up a suggestion by its 0-based position.
pub fn suggested_query(index: usize) -> Option<&'static str> {
    SUGGESTED_QUERIES.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_query_lookup() {
        assert_eq!(suggested_query(0), Some("What programs does CUTM offer?"));
        assert_eq!(suggested_query(3), Some("How can I contact the faculty?"));
        assert_eq!(suggested_query(4), None);
    }
}
