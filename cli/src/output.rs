use crossterm::style::{Color, Stylize};
use std::io::{self, IsTerminal, Write};
use tw_checker_core::{CheckResult, CheckStatus};

/// Visible width of the status column.
const LABEL_WIDTH: usize = 26;

fn status_color(status: CheckStatus) -> Color {
    match status {
        CheckStatus::Active => Color::DarkGreen,
        CheckStatus::NotFoundOrSuspended => Color::DarkRed,
        CheckStatus::Protected => Color::DarkYellow,
    }
}

pub fn render_line(result: &CheckResult<'_>, colored: bool) -> String {
    let label = format!("{:<LABEL_WIDTH$}", result.status);
    if colored {
        format!("{}{}", label.with(status_color(result.status)), result.username)
    } else {
        format!("{label}{}", result.username)
    }
}

/// Whether stdout should get ANSI colors. Honors `NO_COLOR`.
pub fn color_enabled() -> bool {
    !std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) && io::stdout().is_terminal()
}

pub fn print_result(result: &CheckResult<'_>, colored: bool) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{}", render_line(result, colored))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(CheckStatus::Active), Color::DarkGreen);
        assert_eq!(status_color(CheckStatus::NotFoundOrSuspended), Color::DarkRed);
        assert_eq!(status_color(CheckStatus::Protected), Color::DarkYellow);
    }

    #[test]
    fn test_render_plain_pads_label() {
        let line = render_line(
            &CheckResult {
                username: "alice",
                status: CheckStatus::Active,
            },
            false,
        );

        assert_eq!(line, format!("Active{}alice", " ".repeat(LABEL_WIDTH - 6)));
    }

    #[test]
    fn test_render_plain_columns_line_up() {
        let lines: Vec<String> = [
            CheckStatus::Active,
            CheckStatus::NotFoundOrSuspended,
            CheckStatus::Protected,
        ]
        .into_iter()
        .map(|status| {
            render_line(
                &CheckResult {
                    username: "bob",
                    status,
                },
                false,
            )
        })
        .collect();

        assert!(lines.iter().all(|l| l.find("bob") == Some(LABEL_WIDTH)));
    }

    #[test]
    fn test_render_colored_wraps_label() {
        let line = render_line(
            &CheckResult {
                username: "carol",
                status: CheckStatus::Protected,
            },
            true,
        );

        if !std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            assert!(line.starts_with('\u{1b}'));
        }
        assert!(line.contains("Protected"));
        assert!(line.ends_with("carol"));
    }
}
