use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use pipsafe_core::{PackageReference, Scope};
use pipsafe_installer::{default_home, Lifecycle, PipInstaller, Settings, VirtualenvProvisioner};
use tracing::{debug, info};

use crate::completion::write_completions_script;
use crate::prompt::StdinPrompt;
use crate::render::{
    current_output_style, format_install_outcome_lines, format_package_table,
    format_remove_outcome_lines,
};
use crate::{Cli, Commands};

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        bail!("no command given. Possible: install, update, list, remove");
    };
    if cli.verbose {
        info!("Verbose output.");
    }

    if let Commands::Completions { shell } = command {
        let mut stdout = io::stdout().lock();
        return write_completions_script(shell, &mut stdout);
    }

    let home = default_home()?;
    let settings = Settings::load_default(Some(&home))?;
    debug!("provisioner settings: {:?}", settings.provisioner);

    let provisioner = VirtualenvProvisioner::new(&settings.provisioner);
    let installer = PipInstaller;
    let prompt = StdinPrompt;
    let lifecycle = Lifecycle::new(settings.layouts(&home), &provisioner, &installer, &prompt);

    let scope = Scope::from_system_flag(cli.system);
    let style = current_output_style();

    match command {
        Commands::Install { package } => {
            let outcome = lifecycle.install(&PackageReference::new(package), scope, false)?;
            print_lines(&format_install_outcome_lines(&outcome, style))
        }
        Commands::Update { package } => {
            let outcome = lifecycle.install(&PackageReference::new(package), scope, true)?;
            print_lines(&format_install_outcome_lines(&outcome, style))
        }
        Commands::List => {
            let packages = lifecycle.list()?;
            print_lines(&format_package_table(&packages))
        }
        Commands::Remove { package } => {
            let reference = PackageReference::new(package);
            let outcome = lifecycle.remove(&reference, scope, !cli.assumeyes, false)?;
            // Nothing-to-do and cancellation still exit successfully.
            print_lines(&format_remove_outcome_lines(&reference, &outcome, style))
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn print_lines(lines: &[String]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}").context("failed writing to stdout")?;
    }
    Ok(())
}

