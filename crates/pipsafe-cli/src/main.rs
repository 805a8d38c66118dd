use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

mod completion;
mod dispatch;
mod logging;
mod prompt;
mod render;

use completion::CliCompletionShell;
use dispatch::run_cli;
use logging::LevelPrefixFormat;

#[derive(Parser, Debug)]
#[command(name = "pip-safe")]
#[command(
    about = "Safely install and remove PyPI (pip) programs without breaking your system",
    long_about = None
)]
#[command(disable_version_flag = true, arg_required_else_help = true)]
struct Cli {
    /// Show debug output, including every line printed by pip
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Do not ask before removing a package
    #[arg(short = 'y', long = "assumeyes", global = true)]
    assumeyes: bool,
    /// Install for all users
    #[arg(long, global = true)]
    system: bool,
    /// Print version information and exit
    #[arg(long)]
    version: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install a package into its own virtualenv
    Install {
        #[arg(value_name = "package-name")]
        package: String,
    },
    /// Upgrade a package in place, creating its virtualenv if needed
    #[command(alias = "upgrade")]
    Update {
        #[arg(value_name = "package-name")]
        package: String,
    },
    /// List packages with their installed versions
    List,
    /// Remove a package, its virtualenv and its exposed executables
    Remove {
        #[arg(value_name = "package-name")]
        package: String,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: CliCompletionShell,
    },
}

fn version_line() -> String {
    format!(
        "pip-safe {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("pip_safe={level},pipsafe_installer={level},pipsafe_core={level}")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .event_format(LevelPrefixFormat::new(cli.verbose))
        .finish();

    tracing::subscriber::with_default(subscriber, || match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    })
}

#[cfg(test)]
mod tests;
