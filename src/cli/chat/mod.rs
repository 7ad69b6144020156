pub mod controller;
pub mod conversation_state;
pub mod error;
pub mod prompt;
pub mod suggestions;

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use color_print::cformat;
use controller::{ConversationController, SubmitOutcome, TurnOutcome};
use conversation_state::{Message, Role};
use error::ChatError;
use crossterm::{cursor, execute, terminal};
use eyre::Result;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use crate::config::{ChatConfig, OutputFormat};
use crate::response_provider::ResponseProvider;

const WELCOME_TEXT: &str = "
Welcome to Centurion University GPT. Ask me anything about CUTM.
";

const HELP_TEXT: &str = "
CUTM GPT

/1 .. /4      Pick a suggested question (before the conversation starts)
/clear        Start a new conversation
/help         Show this help dialogue
/quit         Quit the application
";

/// Whether the REPL keeps reading after handling a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Terminal front end driving a [`ConversationController`].
///
/// When `interactive` is false (output is not a terminal) the welcome banner
/// and the typing indicator are left out.
pub struct ChatContext {
    output: Box<dyn Write>,
    input: Option<String>,
    interactive: bool,
    config: ChatConfig,
    provider: Arc<dyn ResponseProvider>,
    controller: ConversationController,
}

impl ChatContext {
    pub fn new(
        output: Box<dyn Write>,
        input: Option<String>,
        interactive: bool,
        config: ChatConfig,
        provider: Arc<dyn ResponseProvider>,
    ) -> Self {
        let controller =
            ConversationController::new(Arc::clone(&provider), config.failure_policy);
        Self {
            output,
            input,
            interactive,
            config,
            provider,
            controller,
        }
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        // Handle non-interactive mode (single query)
        if let Some(input) = self.input.take() {
            return self.run_once(input).await;
        }

        if self.interactive {
            self.print_welcome()?;
        }
        self.run_interactive().await?;

        Ok(ExitCode::SUCCESS)
    }

    async fn run_once(&mut self, input: String) -> Result<ExitCode> {
        self.controller.set_pending_input(input);
        if self.controller.submit() != SubmitOutcome::Accepted {
            writeln!(self.output, "Nothing to send.")?;
            return Ok(ExitCode::FAILURE);
        }

        let outcome = self.controller.await_reply().await;

        match self.config.format {
            OutputFormat::Plain => {
                for message in self.controller.state().transcript() {
                    writeln!(self.output, "{}", format_message(message))?;
                }
            }
            OutputFormat::Json => {
                let snapshot = self.controller.snapshot();
                writeln!(self.output, "{}", serde_json::to_string_pretty(&snapshot)?)?;
            }
        }
        self.output.flush()?;

        Ok(match outcome {
            Some(TurnOutcome::Replied) => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        })
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(self.output, "{}", WELCOME_TEXT)?;
        if let Some(queries) = self.controller.suggested_queries() {
            writeln!(self.output, "Things to try")?;
            for (i, query) in queries.iter().enumerate() {
                let line = cformat!("  <bold>/{}</>  {}", i + 1, query);
                writeln!(self.output, "{}", line)?;
            }
        }
        writeln!(
            self.output,
            "\n/help         Show the help dialogue\n/quit         Quit the application\n"
        )?;
        Ok(())
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl()?;

        loop {
            let initial = self.controller.state().pending_input().to_string();
            match prompt::read_line(&mut rl, &initial) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str());
                    }

                    if self.handle_input(&line).await? == Flow::Quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    break;
                }
            }
        }

        let messages = self.controller.state().transcript().len();
        info!(messages, "Chat session ended");
        Ok(())
    }

    async fn handle_input(&mut self, line: &str) -> Result<Flow> {
        match line.trim() {
            "/quit" => return Ok(Flow::Quit),
            "/help" => {
                writeln!(self.output, "{}", HELP_TEXT)?;
            }
            "/clear" => {
                self.controller = ConversationController::new(
                    Arc::clone(&self.provider),
                    self.config.failure_policy,
                );
                writeln!(self.output, "Started a new conversation.")?;
                self.print_welcome()?;
            }
            command => {
                if let Some(position) = parse_suggestion(command) {
                    self.pick_suggestion(position)?;
                } else {
                    self.controller.set_pending_input(line);
                    return self.send().await;
                }
            }
        }

        Ok(Flow::Continue)
    }

    fn pick_suggestion(&mut self, position: usize) -> Result<()> {
        let selected = match position.checked_sub(1) {
            Some(index) => self.controller.select_suggestion(index),
            None => Err(ChatError::UnknownSuggestion(position)),
        };
        match selected {
            Ok(true) => {
                debug!(position, "Suggested query selected");
            }
            Ok(false) => {
                writeln!(
                    self.output,
                    "Suggestions are only offered before the conversation starts."
                )?;
            }
            Err(e) => {
                debug!(error = %e, "Unknown suggestion requested");
                let notice = cformat!("<red>There is no suggestion /{}</>", position);
                writeln!(self.output, "{}", notice)?;
            }
        }
        Ok(())
    }

    async fn send(&mut self) -> Result<Flow> {
        if self.controller.submit() != SubmitOutcome::Accepted {
            return Ok(Flow::Continue);
        }

        if self.interactive {
            write!(self.output, "{}", cformat!("<dim>CUTM GPT is typing...</>"))?;
            self.output.flush()?;
        }

        let waited = tokio::select! {
            outcome = self.controller.await_reply() => Some(outcome),
            _ = tokio::signal::ctrl_c() => None,
        };

        if self.interactive {
            execute!(
                self.output,
                cursor::MoveToColumn(0),
                terminal::Clear(terminal::ClearType::CurrentLine)
            )?;
        }

        let Some(outcome) = waited else {
            writeln!(self.output, "Session ended, the pending reply was discarded.")?;
            return Ok(Flow::Quit);
        };

        let replied = self
            .controller
            .state()
            .transcript()
            .last()
            .filter(|message| message.role() == Role::Assistant);
        match (outcome, replied) {
            (_, Some(message)) => {
                writeln!(self.output, "{}\n", format_message(message))?;
            }
            (Some(TurnOutcome::Failed(e)), None) => {
                let notice = cformat!("<red>No reply could be generated: {}</>", e);
                writeln!(self.output, "{}\n", notice)?;
            }
            _ => {}
        }

        Ok(Flow::Continue)
    }
}

/// Parses `/N` into the 1-based position `N`.
fn parse_suggestion(command: &str) -> Option<usize> {
    command.strip_prefix('/')?.parse().ok()
}

fn format_message(message: &Message) -> String {
    let time = message.timestamp().with_timezone(&Local).format("%H:%M");
    let content = message.content();
    match message.role() {
        Role::User => cformat!("<dim>[{}]</> <magenta><bold>You:</></> {}", time, content),
        Role::Assistant if message.is_error() => {
            cformat!("<dim>[{}]</> <red><bold>CUTM GPT:</></> <red>{}</>", time, content)
        }
        Role::Assistant => cformat!("<dim>[{}]</> <blue><bold>CUTM GPT:</></> {}", time, content),
    }
}
