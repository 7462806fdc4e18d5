mod config;
mod report;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use config::Config;
use nwn2::{
    batch::{self, StatusSink},
    mdb,
    resources::Resources,
};
use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "HairToHelm.ini")]
    config: PathBuf,

    /// File to write conversion errors into
    #[arg(short, long, default_value = "HairToHelm.log")]
    log: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every hair model of the module and convert it (default).
    /// `--report` needs the explicit `run` subcommand
    Run {
        /// Also write failures as CSV
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List the hair models that would be converted
    List,

    /// Convert .mdb files in place
    Patch {
        /// Model files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Name embossed into skin packets
        #[arg(short, long)]
        name: Box<str>,
    },
}

struct Console;

impl StatusSink for Console {
    fn status(&mut self, line: &str) {
        println!("{line}");
    }
}

fn load_resources(config: &Config, sink: &mut dyn StatusSink) -> anyhow::Result<Resources> {
    let resources =
        Resources::load_module(&config.module, &config.home, &config.install, &config.haks)
            .with_context(|| format!("Loading '{}' failed", config.module))?;
    sink.status(&format!("Loading '{}' ... success!", config.module));
    Ok(resources)
}

fn run(config_path: &Path, log_path: &Path, report_path: Option<&Path>) -> anyhow::Result<()> {
    let mut sink = Console;
    let config = Config::load(config_path)?;
    let resources = load_resources(&config, &mut sink)?;

    let result = batch::run(&resources, &config.output, &mut sink)?;

    report::save_error_log(log_path, &result.failures)
        .with_context(|| format!("Cannot write {}", log_path.display()))?;
    if let Some(path) = report_path {
        let file = fs::File::create(path)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        report::write_csv(file, &result.failures)?;
    }
    sink.status("Writing errors ... complete!");

    log::info!(
        "{} converted, {} failed",
        result.converted.len(),
        result.failures.len()
    );
    Ok(())
}

fn list(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let resources = load_resources(&config, &mut Console)?;

    for model in batch::find_hair_models(&resources) {
        println!("{} -> {}", model.name, model.helm_name);
    }
    Ok(())
}

fn patch(files: &[PathBuf], name: &str) -> anyhow::Result<()> {
    let mut failed = 0;
    for file in files {
        match mdb::convert(file, name) {
            Ok(summary) => println!(
                "{}: {} skin(s) embossed, {} hair packet(s) converted",
                file.display(),
                summary.skins_embossed,
                summary.hairs_converted
            ),
            Err(err) => {
                eprintln!("{err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files could not be converted", files.len());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match (cli.verbose, cli.quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command.unwrap_or(Commands::Run { report: None }) {
        Commands::Run { report } => run(&cli.config, &cli.log, report.as_deref()),
        Commands::List => list(&cli.config),
        Commands::Patch { files, name } => patch(&files, &name),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("ERROR: '{err:#}'");
            ExitCode::FAILURE
        }
    }
}
