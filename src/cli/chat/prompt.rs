use rustyline::{Config, Editor, Result};

pub const PROMPT: &str = "you> ";

pub fn rl() -> Result<Editor<()>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .build();
    Editor::with_config(config)
}

/// Reads one line, pre-filling the editor with `initial` when it holds text.
pub fn read_line(rl: &mut Editor<()>, initial: &str) -> Result<String> {
    if initial.trim().is_empty() {
        rl.readline(PROMPT)
    } else {
        rl.readline_with_initial(PROMPT, (initial, ""))
    }
}
