mod error;
mod logging;

use crate::error::{ErrorKind, Result};
use clap::{Parser, Subcommand};
use exn::ResultExt;
use srm_config::{Configuration, Settings};
use srm_library::scan::scan;
use srm_library::{BatchResult, Context, classify};
use srm_steam::{AccountDirectory, NoAccounts, SteamDirectory, assign};
use srm_template::{Delimiters, highlight, parse};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "srm", version, about = "Turns directories of files into Steam shortcuts with artwork")]
struct Cli {
    /// Settings document (TOML, YAML or JSON). Defaults to the per-user config directory.
    #[arg(short, long, global = true, env = "SRM_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable). Overridden by `RUST_LOG`.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run enabled parsers and report what each would add to Steam.
    Test {
        /// Only run the parser with this title.
        #[arg(short, long)]
        parser: Option<String>,
    },
    /// List configured parsers.
    List,
    /// Load the settings and check every template in them.
    Validate,
    /// Print a template with its delimiters wrapped in markup tags.
    Highlight {
        template: String,
        #[arg(long, default_value = "span")]
        tag: String,
        #[arg(long, default_value = "${")]
        left: String,
        #[arg(long, default_value = "}")]
        right: String,
    },
    /// Print the Steam shortcut ids for an executable and title.
    Identity { executable: String, title: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Test { parser } => {
            let settings = load_settings(cli.config)?;
            let parsers: Vec<&Configuration> = settings
                .enabled_parsers()
                .filter(|config| parser.as_ref().is_none_or(|name| config.name() == *name))
                .collect();
            if let Some(name) = parser
                && parsers.is_empty()
            {
                exn::bail!(ErrorKind::UnknownParser(name));
            }
            let (batches, failures) = run_parsers(&parsers, &settings).await;
            for (name, batch) in &batches {
                report(name, batch);
            }
            if failures > 0 {
                exn::bail!(ErrorKind::ParsersFailed(failures));
            }
        },
        Command::List => {
            let settings = load_settings(cli.config)?;
            for config in &settings.parsers {
                let state = if config.disabled { "disabled" } else { "enabled" };
                println!(
                    "{}\t{}\t{}\t{}\t{state}",
                    config.parser_id,
                    config.name(),
                    config.parser_type,
                    config.rom_directory
                );
            }
        },
        Command::Validate => {
            let settings = load_settings(cli.config)?;
            println!("{} parser(s) valid", settings.parsers.len());
        },
        Command::Highlight {
            template,
            tag,
            left,
            right,
        } => {
            let delimiters = Delimiters::new(left, right).or_raise(|| ErrorKind::Template)?;
            parse(&template, &delimiters).or_raise(|| ErrorKind::Template)?;
            println!("{}", highlight(&template, &delimiters, &tag));
        },
        Command::Identity { executable, title } => {
            let identity = assign(&executable, &title);
            println!("{}\t{}", identity.short_id, identity.long_id);
        },
    }
    Ok(())
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    let path = match path {
        Some(path) => path,
        None => Settings::default_path().or_raise(|| ErrorKind::Settings)?,
    };
    Settings::load(path).or_raise(|| ErrorKind::Settings)
}

/// Runs every parser in turn. A parser that can't be run is logged and
/// counted; the others still run.
async fn run_parsers(parsers: &[&Configuration], settings: &Settings) -> (Vec<(String, BatchResult)>, usize) {
    let mut batches = Vec::with_capacity(parsers.len());
    let mut failures = 0;
    for config in parsers {
        match run_parser(config, settings).await {
            Ok(batch) => batches.push((config.name(), batch)),
            Err(e) => {
                tracing::error!("{e:?}");
                failures += 1;
            },
        }
    }
    (batches, failures)
}

async fn run_parser(config: &Configuration, settings: &Settings) -> Result<BatchResult> {
    let name = config.name();
    let ctx = Context::from_settings(config.clone(), settings).or_raise(|| ErrorKind::Parser(name.clone()))?;
    let files = scan(ctx.rom_directory(), &config.extensions).or_raise(|| ErrorKind::Parser(name.clone()))?;

    let accounts: Box<dyn AccountDirectory> = match ctx.steam_directory() {
        Some(root) => match SteamDirectory::open(root) {
            Ok(directory) => Box::new(directory),
            Err(e) => {
                tracing::warn!(parser = %name, error = %(*e), "Steam directory unusable; no accounts available");
                Box::new(NoAccounts)
            },
        },
        None => Box::new(NoAccounts),
    };
    Ok(classify(&ctx, files, accounts.as_ref()).await)
}

fn report(name: &str, batch: &BatchResult) {
    tracing::info!(
        parser = %name,
        accepted = batch.accepted.len(),
        failed = batch.failed.len(),
        excluded = batch.excluded.len(),
        "Parser finished"
    );
    for candidate in &batch.accepted {
        tracing::info!(
            title = %candidate.final_title,
            id = candidate.identity.short_id,
            executable = %candidate.modified_executable_location,
            path = %candidate.file_path.display(),
            "Accepted"
        );
    }
    for failed in &batch.failed {
        tracing::warn!(reason = %failed.reason, path = %failed.file_path.display(), "Failed");
    }
    for excluded in &batch.excluded {
        tracing::info!(key = %excluded.exclusion_key, path = %excluded.file_path.display(), "Excluded");
    }
    for account in &batch.missing_accounts {
        tracing::warn!(parser = %name, account = %account, "Specified Steam account not found");
    }
    if batch.has_no_usable_accounts {
        tracing::warn!(parser = %name, "No usable Steam accounts; nothing would be written");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use srm_config::ParserType;
    use tempfile::TempDir;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["srm", "-vv", "validate"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Validate));
    }

    #[tokio::test]
    async fn failing_parser_does_not_stop_the_others() {
        let roms = TempDir::new().unwrap();
        std::fs::write(roms.path().join("Tetris.gb"), b"").unwrap();
        let parser = |title: &str, rom_directory: String| Configuration {
            config_title: title.to_string(),
            parser_type: ParserType::FileName,
            rom_directory,
            ..Default::default()
        };
        let missing = parser("Missing", roms.path().join("nowhere").display().to_string());
        let present = parser("Present", roms.path().display().to_string());
        let settings = Settings::default();

        let (batches, failures) = run_parsers(&[&missing, &present], &settings).await;
        assert_eq!(failures, 1);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0, "Present");
        assert_eq!(batches[0].1.accepted[0].final_title, "Tetris");
    }
}
