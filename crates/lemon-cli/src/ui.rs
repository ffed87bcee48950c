use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

/// Terminal capabilities resolved once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

/// What the environment looks like, separated out for tests.
#[derive(Clone, Copy, Debug)]
struct Terminal {
    tty: bool,
    no_color: bool,
    columns: Option<usize>,
}

impl Terminal {
    fn detect() -> Self {
        Self {
            tty: std::io::stdout().is_terminal(),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            columns: std::env::var("COLUMNS").ok().and_then(|v| v.parse().ok()),
        }
    }
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(flags, Terminal::detect()));
}

#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}

fn resolve(flags: &GlobalFlags, terminal: Terminal) -> UiPrefs {
    // Decoration only makes sense for humans reading a table.
    let human = flags.format == OutputFormat::Table && !flags.quiet;
    let table_color = match flags.color {
        ColorMode::Always => flags.format == OutputFormat::Table,
        ColorMode::Never => false,
        ColorMode::Auto => human && terminal.tty && !terminal.no_color,
    };
    UiPrefs {
        table_color,
        progress: human && terminal.tty,
        term_width: terminal.columns.filter(|width| *width >= 40),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn flags(format: OutputFormat, color: ColorMode) -> GlobalFlags {
        GlobalFlags {
            format,
            color,
            quiet: false,
            verbose: false,
        }
    }

    const TTY: Terminal = Terminal {
        tty: true,
        no_color: false,
        columns: Some(120),
    };

    #[test]
    fn interactive_table_gets_color_and_spinner() {
        let prefs = resolve(&flags(OutputFormat::Table, ColorMode::Auto), TTY);
        assert_eq!(
            prefs,
            UiPrefs {
                table_color: true,
                progress: true,
                term_width: Some(120),
            }
        );
    }

    #[test]
    fn json_and_pipes_stay_plain() {
        let json = resolve(&flags(OutputFormat::Json, ColorMode::Always), TTY);
        assert!(!json.table_color && !json.progress);

        let piped = Terminal { tty: false, ..TTY };
        let table = resolve(&flags(OutputFormat::Table, ColorMode::Auto), piped);
        assert!(!table.table_color && !table.progress);
    }

    #[test]
    fn no_color_and_tiny_widths_are_respected() {
        let terminal = Terminal {
            no_color: true,
            columns: Some(20),
            ..TTY
        };
        let prefs = resolve(&flags(OutputFormat::Table, ColorMode::Auto), terminal);
        assert!(!prefs.table_color);
        assert_eq!(prefs.term_width, None);
    }
}
