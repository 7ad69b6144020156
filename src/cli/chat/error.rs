use thiserror::Error;

/// Errors raised by the conversation core.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("no suggested query at position {0}")]
    UnknownSuggestion(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::UnknownSuggestion(7).to_string(),
            "no suggested query at position 7"
        );
    }
}
