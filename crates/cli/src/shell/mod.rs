mod command;
mod completer;
mod context;
mod handlers;
mod highlighter;
mod prompt;
pub(crate) mod view;

use reedline::{
    default_emacs_keybindings, ColumnarMenu, DefaultHinter, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal,
};
use schemascope_core::config::BrowserConfig;
use std::sync::Arc;
use tracing::{error, info};

use self::command::{parse_shell_command, ShellCommand};
use self::completer::SchemascopeCompleter;
use self::context::ShellContext;
use self::highlighter::SchemascopeHighlighter;
use self::prompt::DefaultPrompt;

// Shell configuration constants
const SHELL_HISTORY_SIZE: usize = 500;

pub struct ReplServer {
    context: ShellContext,
}

impl ReplServer {
    pub fn new(
        config: BrowserConfig,
        rt_handle: tokio::runtime::Handle,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let browser = schemascope_runtime::build_default_browser(&config)?;
        let context = ShellContext::new(browser, Arc::new(config), rt_handle);
        Ok(Self { context })
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        println!(
            "Root: {} ({})",
            self.context.config.root, self.context.config.lookup.base_url
        );

        self.initialize_root();
        println!("Type 'help' for commands.");

        let line_editor = self.setup_line_editor()?;
        self.run_loop(line_editor)
    }

    /// A failed load keeps the shell alive; `reload` retries it.
    fn initialize_root(&self) {
        let start = std::time::Instant::now();
        match self.context.reload() {
            Ok(tree) => {
                info!(nodes = tree.node_count(), "Shell ready");
                println!(
                    "Loaded {} subclasses of {} in {:?}.",
                    tree.children(tree.root()).len(),
                    self.context.config.root,
                    start.elapsed()
                );
            }
            Err(e) => {
                error!("Failed to load hierarchy: {}", e);
                println!("Warning: could not load the hierarchy: {}", e);
                println!("Use 'reload' to try again.");
            }
        }
    }

    fn setup_line_editor(&self) -> Result<Reedline, Box<dyn std::error::Error>> {
        let commands = ShellCommand::command_names();

        let completer = Box::new(SchemascopeCompleter::new(
            commands.clone(),
            self.context.clone(),
        ));

        let completion_menu = Box::new(ColumnarMenu::default().with_name("completion_menu"));

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu("completion_menu".to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let history_file = schemascope_runtime::shell_history_path();
        if let Some(dir) = history_file.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        let history = match FileBackedHistory::with_file(SHELL_HISTORY_SIZE, history_file) {
            Ok(history) => history,
            Err(e) => {
                error!("Falling back to in-memory history: {}", e);
                FileBackedHistory::new(SHELL_HISTORY_SIZE)?
            }
        };

        let highlighter = Box::new(SchemascopeHighlighter::new(commands));

        Ok(Reedline::create()
            .with_history(Box::new(history))
            .with_completer(completer)
            .with_highlighter(highlighter)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_hinter(Box::new(
                DefaultHinter::default().with_style(
                    nu_ansi_term::Style::new()
                        .italic()
                        .fg(nu_ansi_term::Color::LightGray),
                ),
            ))
            .with_edit_mode(Box::new(Emacs::new(keybindings))))
    }

    fn run_loop(&self, mut line_editor: Reedline) -> Result<(), Box<dyn std::error::Error>> {
        let mut context = self.context.clone();

        loop {
            let prompt = DefaultPrompt::new(context.current_path());
            let sig = line_editor.read_line(&prompt);

            match sig {
                Ok(Signal::Success(buffer)) => {
                    let trimmed = buffer.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed == "exit" || trimmed == "quit" {
                        break;
                    }

                    match parse_shell_command(trimmed) {
                        Ok(Some(cmd)) => {
                            let handler = self::handlers::get_handler(&cmd);

                            match handler.handle(&cmd, &mut context) {
                                Ok(output) => {
                                    if !output.is_empty() {
                                        println!("{}", output);
                                    }
                                    if matches!(cmd, ShellCommand::Clear) {
                                        let _ = line_editor.clear_screen();
                                    }
                                }
                                Err(e) => eprintln!("Error: {}", e),
                            }
                        }
                        Ok(None) => {} // Help or handled by Clap
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                    println!("Bye!");
                    break;
                }
                x => println!("Event: {:?}", x),
            }
        }
        Ok(())
    }
}

/// Runs the shell on the calling thread; async work is driven through `rt_handle`.
pub fn run(
    config: BrowserConfig,
    rt_handle: tokio::runtime::Handle,
) -> Result<(), Box<dyn std::error::Error>> {
    let server = ReplServer::new(config, rt_handle)?;
    server.run()
}
