use super::command::ShellCommand;
use super::context::ShellContext;
use reedline::{Completer, Span, Suggestion};

const MAX_SUGGESTIONS: usize = 50;

pub struct SchemascopeCompleter {
    pub commands: Vec<String>,
    pub context: ShellContext,
}

impl SchemascopeCompleter {
    pub fn new(commands: Vec<String>, context: ShellContext) -> Self {
        Self { commands, context }
    }
}

fn suggestion(value: String, span: Span) -> Suggestion {
    Suggestion {
        value,
        description: None,
        style: None,
        extra: None,
        span,
        append_whitespace: true,
        match_indices: None,
    }
}

impl Completer for SchemascopeCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line = &line[..pos.min(line.len())];
        let trimmed = line.trim_start();

        // 1. Command completion (at start of line)
        if !trimmed.contains(' ') {
            return self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(trimmed))
                .map(|cmd| {
                    suggestion(
                        cmd.clone(),
                        Span {
                            start: pos - trimmed.len(),
                            end: pos,
                        },
                    )
                })
                .collect();
        }

        // 2. Class path completion for commands that take one
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let Some(cmd) = parts.first() else {
            return vec![];
        };
        if !ShellCommand::takes_node(cmd) {
            return vec![];
        }

        let last_word = if line.ends_with(' ') {
            ""
        } else {
            parts.last().copied().unwrap_or("")
        };
        if last_word.starts_with('-') {
            return vec![];
        }
        let span = Span {
            start: pos - last_word.len(),
            end: pos,
        };

        self.context
            .complete_path(last_word, MAX_SUGGESTIONS)
            .into_iter()
            .map(|value| suggestion(value, span))
            .collect()
    }
}
