use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto, // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }

    /// Apply `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE` to an `auto` choice.
    pub fn with_env(self) -> Self {
        if self != Self::Auto {
            return self;
        }

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            return Self::Never;
        }
        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                return Self::Always;
            }
        }
        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                return Self::Never;
            }
        }
        Self::Auto
    }
}

/// Styles user-facing messages and diffs.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(mode: ColorMode) -> Self {
        let color = mode.with_env().should_use_color();
        colored::control::set_override(color);
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Color a unified diff line by line.
    pub fn diff(&self, patch: &str) -> String {
        if !self.color {
            return patch.to_string();
        }
        patch
            .split_inclusive('\n')
            .map(|line| {
                let (body, newline) = match line.strip_suffix('\n') {
                    Some(body) => (body, "\n"),
                    None => (line, ""),
                };
                let styled = if body.starts_with("+++") || body.starts_with("---") {
                    body.bold().to_string()
                } else if body.starts_with('+') {
                    body.green().to_string()
                } else if body.starts_with('-') {
                    body.red().to_string()
                } else if body.starts_with("@@") {
                    body.cyan().to_string()
                } else {
                    body.to_string()
                };
                format!("{styled}{newline}")
            })
            .collect()
    }
}

fn detect_color_support() -> bool {
    // Check if we're in a dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    // Check if stdout is a TTY
    std::io::stdout().is_terminal()
}
