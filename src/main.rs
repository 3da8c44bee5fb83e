use clap::{ArgAction, Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use syllabus::apply::{self, Mode};
use syllabus::assemble::Assembler;
use syllabus::display::ImportScanner;
use syllabus::group::GroupMode;
use syllabus::renumber::{self, PlanOptions};
use syllabus::types::Course;
use syllabus::{config, output};

#[derive(Parser)]
#[command(name = "syllabus")]
#[command(version, about = "Organize ranked lesson directories into course modules")]
#[command(long_about = "\
Organize ranked lesson directories into course modules

Lesson order lives in file names: a rank prefix (01_, 02_, 10a_) followed by
an underscore. Files sharing a base name pair up into one lesson.

Content structure:

  lessons/
  ├── syllabus.toml            # Optional config (run 'syllabus gen-config')
  ├── 01_basics/               # Module (ranked = managed by renumber)
  │   ├── README.md            # Module overview
  │   ├── 01_intro.md          # Lesson content   ┐ one lesson \"intro\"
  │   ├── 01_intro.ipynb       # Lesson exercise  ┘
  │   ├── 02_loops.py          # Exercise-only lesson
  │   └── images/              # Ignored
  └── drafts/                  # Unranked = never renumbered")]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Working directory (where syllabus.toml is looked up)
    #[arg(short, long, default_value = ".", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a module directory and print its lessons
    Import {
        module_dir: PathBuf,
        /// Do not pair files that share a base name
        #[arg(long)]
        no_group: bool,
        /// Treat every subdirectory as a module
        #[arg(short, long)]
        recursive: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Renumber rank prefixes under a directory
    Renumber {
        lesson_dir: PathBuf,
        /// Show the renames without performing them
        #[arg(short = 'n', long)]
        dryrun: bool,
        /// Step between consecutive ranks (overrides syllabus.toml)
        #[arg(short, long)]
        increment: Option<NonZeroU32>,
    },
    /// Fail if any rank prefix under a directory needs renumbering
    Check {
        lesson_dir: PathBuf,
        /// Step between consecutive ranks (overrides syllabus.toml)
        #[arg(short, long)]
        increment: Option<NonZeroU32>,
    },
    /// Print a stock syllabus.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if !cli.dir.is_dir() {
        return Err(format!("working directory {} does not exist", cli.dir.display()).into());
    }
    let config = config::load_config(&cli.dir)?;

    match cli.command {
        Command::Import {
            module_dir,
            no_group,
            recursive,
            json,
        } => {
            let module_dir = resolve(&cli.dir, &module_dir);
            let mode = if no_group {
                GroupMode::Ungrouped
            } else {
                GroupMode::Grouped
            };
            let probe = ImportScanner::from_config(&config.display);
            let assembler = Assembler::new(&config, &probe);

            let modules = if recursive {
                assembler.read_modules(&module_dir, mode)?
            } else {
                vec![assembler.read_module(&module_dir, mode)?]
            };

            if json {
                let name = module_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mut course = Course::new(name);
                modules.into_iter().for_each(|m| course.append(m));
                println!("{}", serde_json::to_string_pretty(&course)?);
            } else {
                for module in &modules {
                    let root = if recursive {
                        module_dir.join(&module.name)
                    } else {
                        module_dir.clone()
                    };
                    output::print_module(module, &root);
                }
            }
        }
        Command::Renumber {
            lesson_dir,
            dryrun,
            increment,
        } => {
            let lesson_dir = resolve(&cli.dir, &lesson_dir);
            let options = plan_options(&config, increment);
            let plan = renumber::plan_renumber(&lesson_dir, &options)?;
            let mode = if dryrun { Mode::DryRun } else { Mode::Apply };
            let report = apply::apply(plan, mode)?;
            output::print_report(&report);
            if !report.is_complete() {
                let failed = report.failures().count();
                return Err(format!("{failed} of {} renames failed", report.outcomes.len()).into());
            }
        }
        Command::Check {
            lesson_dir,
            increment,
        } => {
            let lesson_dir = resolve(&cli.dir, &lesson_dir);
            let options = plan_options(&config, increment);
            let plan = renumber::plan_renumber(&lesson_dir, &options)?;
            output::print_plan(&plan);
            if !plan.is_empty() {
                return Err(format!("{} needs renumbering", lesson_dir.display()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn plan_options(config: &config::SyllabusConfig, increment: Option<NonZeroU32>) -> PlanOptions {
    let options = PlanOptions::from_config(config);
    match increment {
        Some(step) => options.with_increment(step),
        None => options,
    }
}

/// Relative paths are taken from the working directory.
fn resolve(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}
