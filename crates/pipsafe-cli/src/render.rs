use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};
use pipsafe_core::{PackageReference, Scope};
use pipsafe_installer::{InstallOutcome, ListedPackage, RemoveOutcome};

const TABLE_HEADERS: [&str; 2] = ["Package", "Version"];
const TABLE_MIN_PADDING: usize = 2;
const TABLE_GAP: &str = "  ";
const SYSTEM_MARKER: &str = "*";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn current_output_style() -> OutputStyle {
    resolve_output_style(std::io::stdout().is_terminal())
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let badge = format!("[{}]", status.to_ascii_uppercase());
            format!("{} {message}", colorize(status_style(status), &badge))
        }
    }
}

pub(crate) fn format_install_outcome_lines(
    outcome: &InstallOutcome,
    style: OutputStyle,
) -> Vec<String> {
    match outcome {
        InstallOutcome::Installed {
            key,
            executables,
            bin_dir,
            ..
        } => vec![render_status_line(
            style,
            "ok",
            &format!(
                "{key}: exposed {} in {}",
                executables.join(", "),
                bin_dir.display()
            ),
        )],
        InstallOutcome::NoExecutables { venv_dir, removed } => {
            let message = if *removed {
                format!("no executables; removed {}", venv_dir.display())
            } else {
                format!("no executables; kept {}", venv_dir.display())
            };
            vec![render_status_line(style, "warn", &message)]
        }
    }
}

pub(crate) fn format_remove_outcome_lines(
    reference: &PackageReference,
    outcome: &RemoveOutcome,
    style: OutputStyle,
) -> Vec<String> {
    match outcome {
        RemoveOutcome::NothingToDo => Vec::new(),
        RemoveOutcome::Cancelled => vec![render_status_line(
            style,
            "warn",
            &format!("kept {reference}"),
        )],
        RemoveOutcome::Removed { executables } if executables.is_empty() => {
            vec![render_status_line(style, "ok", &format!("removed {reference}"))]
        }
        RemoveOutcome::Removed { executables } => vec![render_status_line(
            style,
            "ok",
            &format!("removed {reference} ({})", executables.join(", ")),
        )],
    }
}

/// Two-column `Package`/`Version` table with a dashed rule under the header.
/// System-wide entries carry a `*` prefix.
pub(crate) fn format_package_table(packages: &[ListedPackage]) -> Vec<String> {
    let rows = packages
        .iter()
        .map(|package| {
            let name = match package.scope {
                Scope::User => package.name.clone(),
                Scope::System => format!("{SYSTEM_MARKER}{}", package.name),
            };
            [name, package.version.clone()]
        })
        .collect::<Vec<_>>();

    let mut widths = TABLE_HEADERS.map(|header| header.chars().count() + TABLE_MIN_PADDING);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(table_line(&TABLE_HEADERS, &widths));
    lines.push(table_line(&widths.map(|width| "-".repeat(width)), &widths));
    for row in &rows {
        lines.push(table_line(row, &widths));
    }
    lines
}

fn table_line<S: AsRef<str>>(cells: &[S; 2], widths: &[usize; 2]) -> String {
    let line = format!(
        "{:<first$}{TABLE_GAP}{:<second$}",
        cells[0].as_ref(),
        cells[1].as_ref(),
        first = widths[0],
        second = widths[1]
    );
    line.trim_end().to_string()
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "ok" => AnsiColor::BrightGreen,
        "warn" => AnsiColor::BrightYellow,
        "error" => AnsiColor::BrightRed,
        _ => AnsiColor::BrightBlue,
    };
    Style::new()
        .fg_color(Some(color.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
