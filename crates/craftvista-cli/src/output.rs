//! Everything the CLI writes to stdout goes through [`OutputManager`].

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Auto becomes Human on a TTY, Plain when piped.
        let resolved_format = match args.output_format {
            OutputFormat::Auto if config.output.format == "json" => OutputFormat::Json,
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            explicit => explicit,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    /// Human-facing lines are dropped in quiet mode and when stdout is JSON.
    fn chatty(&self) -> bool {
        !self.quiet && self.resolved_format != OutputFormat::Json
    }

    fn emit(&self, line: impl FnOnce(bool) -> String) -> io::Result<()> {
        if self.chatty() {
            self.term.write_line(&line(!self.no_color))
        } else {
            Ok(())
        }
    }

    fn marked(&self, mark: char, msg: &str, style: Style) -> io::Result<()> {
        self.emit(|color| {
            if color {
                format!("{} {}", mark.style(style.bold()), msg.style(style))
            } else {
                format!("{mark} {msg}")
            }
        })
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.emit(|_| msg.to_owned())
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{2713}', msg, Style::new().green())
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked('!', msg, Style::new().yellow())
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{2139}', msg, Style::new().blue())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.emit(|color| {
            if color {
                text.cyan().bold().to_string()
            } else {
                text.to_owned()
            }
        })
    }

    /// One labelled field of the review, tagged with where it came from.
    pub fn field(&self, label: &str, value: &str, tag: &str) -> io::Result<()> {
        self.emit(|color| {
            let tag = format!("[{tag}]");
            if color {
                format!("  {:<17} {value}  {}", label.bold(), tag.dimmed())
            } else {
                format!("  {label:<17} {value}  {tag}")
            }
        })
    }

    /// Pretty JSON on stdout, printed in every mode.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Spinner shown while a collaborator call is in flight.
    ///
    /// Hidden unless the output is human-facing.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || self.resolved_format != OutputFormat::Human {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}") {
            spinner.set_style(style);
        }
        spinner.set_message(msg.to_owned());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Never [`OutputFormat::Auto`].
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color: false,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_print_is_ok() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.success("done").is_ok());
    }

    #[test]
    fn only_human_output_is_colored() {
        assert!(!make_manager(false, OutputFormat::Human).no_color);
        assert!(make_manager(false, OutputFormat::Plain).no_color);
        assert!(make_manager(false, OutputFormat::Json).no_color);
    }

    #[test]
    fn config_can_ask_for_json() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Auto,
        };
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        assert_eq!(OutputManager::new(&args, &config).format(), OutputFormat::Json);
    }

    #[test]
    fn spinner_is_hidden_when_piped() {
        assert!(make_manager(false, OutputFormat::Plain).spinner("x").is_hidden());
        assert!(make_manager(true, OutputFormat::Human).spinner("x").is_hidden());
    }
}
