use super::*;
use std::io::Cursor;
use std::path::PathBuf;

use clap::error::ErrorKind;
use pipsafe_core::{PackageKey, PackageReference, Scope};
use pipsafe_installer::{InstallOutcome, ListedPackage, RemoveOutcome, DAMAGED_NO_PIP};

use crate::completion::write_completions_script;
use crate::logging::event_prefix;
use crate::prompt::{ask, is_affirmative};
use crate::render::{
    format_install_outcome_lines, format_package_table, format_remove_outcome_lines,
    render_status_line, resolve_output_style, OutputStyle,
};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("must parse")
}

#[test]
fn cli_parses_install() {
    let cli = parse(&["pip-safe", "install", "httpie"]);
    assert!(matches!(cli.command, Some(Commands::Install { ref package }) if package == "httpie"));
    assert!(!cli.system);
    assert!(!cli.assumeyes);
    assert!(!cli.verbose);
}

#[test]
fn cli_parses_upgrade_as_update_alias() {
    let cli = parse(&["pip-safe", "upgrade", "black==24.1"]);
    assert!(
        matches!(cli.command, Some(Commands::Update { ref package }) if package == "black==24.1")
    );
}

#[test]
fn cli_accepts_global_flags_after_subcommand() {
    let cli = parse(&["pip-safe", "remove", "black", "-y", "--system", "-v"]);
    assert!(matches!(cli.command, Some(Commands::Remove { .. })));
    assert!(cli.assumeyes);
    assert!(cli.system);
    assert!(cli.verbose);
}

#[test]
fn cli_accepts_long_assumeyes_before_subcommand() {
    let cli = parse(&["pip-safe", "--assumeyes", "remove", "black"]);
    assert!(cli.assumeyes);
}

#[test]
fn cli_rejects_missing_package_name() {
    let err = Cli::try_parse_from(["pip-safe", "install"]).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn cli_rejects_unknown_command() {
    let err = Cli::try_parse_from(["pip-safe", "frobnicate", "x"]).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
}

#[test]
fn cli_version_flag_needs_no_command() {
    let cli = parse(&["pip-safe", "--version"]);
    assert!(cli.version);
    assert!(cli.command.is_none());
}

#[test]
fn cli_parses_completions_shell() {
    let cli = parse(&["pip-safe", "completions", "powershell"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Completions {
            shell: CliCompletionShell::Powershell
        })
    ));
}

#[test]
fn version_line_names_program_and_platform() {
    let line = version_line();
    assert!(line.starts_with(&format!("pip-safe {} (", env!("CARGO_PKG_VERSION"))));
    assert!(line.contains(std::env::consts::OS));
    assert!(line.ends_with(&format!("{})", std::env::consts::ARCH)));
}

#[test]
fn log_filter_switches_level_with_verbose() {
    assert_eq!(
        log_filter(false),
        "pip_safe=info,pipsafe_installer=info,pipsafe_core=info"
    );
    assert!(log_filter(true).contains("pipsafe_installer=debug"));
}

#[test]
fn event_prefix_is_level_only_by_default() {
    assert_eq!(
        event_prefix(&tracing::Level::WARN, "pipsafe_installer::lifecycle", false),
        "WARN: "
    );
    assert_eq!(event_prefix(&tracing::Level::ERROR, "pip_safe", false), "ERROR: ");
}

#[test]
fn event_prefix_names_target_when_verbose() {
    assert_eq!(
        event_prefix(&tracing::Level::DEBUG, "pipsafe_installer::process", true),
        "pipsafe_installer::process - DEBUG - "
    );
}

#[test]
fn completions_script_mentions_binary_name() {
    let mut output = Vec::new();
    write_completions_script(CliCompletionShell::Bash, &mut output).expect("must render");
    let script = String::from_utf8(output).expect("utf8");
    assert!(script.contains("pip-safe"));
    assert!(script.contains("install"));
}

#[test]
fn prompt_writes_question_with_choices() {
    let mut input = Cursor::new(b"y\n".to_vec());
    let mut output = Vec::new();

    assert!(ask("Are you sure", &mut input, &mut output));
    assert_eq!(String::from_utf8(output).expect("utf8"), "Are you sure (y/Nn): ");
}

#[test]
fn prompt_treats_empty_and_eof_as_no() {
    let mut output = Vec::new();
    assert!(!ask("Q", &mut Cursor::new(b"\n".to_vec()), &mut output));
    assert!(!ask("Q", &mut Cursor::new(Vec::new()), &mut output));
    assert!(!ask("Q", &mut Cursor::new(b"n\n".to_vec()), &mut output));
}

#[test]
fn affirmative_answers_start_with_y() {
    assert!(is_affirmative("y"));
    assert!(is_affirmative("Yes please\n"));
    assert!(is_affirmative("   yep"));
    assert!(!is_affirmative(""));
    assert!(!is_affirmative("   \n"));
    assert!(!is_affirmative("no"));
    assert!(!is_affirmative("okay y"));
}

#[test]
fn resolve_output_style_follows_stdout_tty() {
    assert_eq!(resolve_output_style(true), OutputStyle::Rich);
    assert_eq!(resolve_output_style(false), OutputStyle::Plain);
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "removed httpie"),
        "removed httpie"
    );
}

#[test]
fn render_status_line_rich_includes_badge() {
    let line = render_status_line(OutputStyle::Rich, "warn", "kept httpie");
    assert!(line.contains("[WARN]"));
    assert!(line.ends_with(" kept httpie"));
    assert!(line.contains('\u{1b}'));
}

#[test]
fn package_table_without_packages_has_header_and_rule() {
    assert_eq!(
        format_package_table(&[]),
        vec!["Package    Version", "---------  ---------"]
    );
}

#[test]
fn package_table_marks_system_entries() {
    let packages = vec![
        ListedPackage {
            name: "somecli".to_string(),
            version: "1.2.3".to_string(),
            scope: Scope::User,
        },
        ListedPackage {
            name: "broken".to_string(),
            version: DAMAGED_NO_PIP.to_string(),
            scope: Scope::System,
        },
    ];

    assert_eq!(
        format_package_table(&packages),
        vec![
            "Package    Version",
            "---------  ----------------------",
            "somecli    1.2.3",
            "*broken    damaged (no inner pip)",
        ]
    );
}

#[test]
fn package_table_widens_for_long_names() {
    let packages = vec![ListedPackage {
        name: "git+github.com_dvershinin_lastversion".to_string(),
        version: "3.5.0".to_string(),
        scope: Scope::User,
    }];

    let lines = format_package_table(&packages);
    assert_eq!(lines[1], format!("{}  ---------", "-".repeat(37)));
    assert_eq!(
        lines[2],
        "git+github.com_dvershinin_lastversion  3.5.0"
    );
}

#[test]
fn install_outcome_lines_list_executables() {
    let outcome = InstallOutcome::Installed {
        key: PackageKey::from_dir_name("black"),
        executables: vec!["black".to_string(), "blackd".to_string()],
        bin_dir: PathBuf::from("/home/dev/.local/bin"),
        on_path: true,
    };

    assert_eq!(
        format_install_outcome_lines(&outcome, OutputStyle::Plain),
        vec!["black: exposed black, blackd in /home/dev/.local/bin"]
    );
}

#[test]
fn install_outcome_lines_report_kept_environment() {
    let outcome = InstallOutcome::NoExecutables {
        venv_dir: PathBuf::from("/home/dev/.virtualenvs/emptylib"),
        removed: false,
    };

    assert_eq!(
        format_install_outcome_lines(&outcome, OutputStyle::Plain),
        vec!["no executables; kept /home/dev/.virtualenvs/emptylib"]
    );
}

#[test]
fn remove_outcome_lines() {
    let reference = PackageReference::new("black");
    assert!(
        format_remove_outcome_lines(&reference, &RemoveOutcome::NothingToDo, OutputStyle::Plain)
            .is_empty()
    );
    assert_eq!(
        format_remove_outcome_lines(&reference, &RemoveOutcome::Cancelled, OutputStyle::Plain),
        vec!["kept black"]
    );
    assert_eq!(
        format_remove_outcome_lines(
            &reference,
            &RemoveOutcome::Removed {
                executables: vec!["black".to_string()]
            },
            OutputStyle::Plain
        ),
        vec!["removed black (black)"]
    );
}
