use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};

use vitae::build::{chrome_engine, run, BuildRequest, Mode};
use vitae::config::{init_default_config, load_config, locate_config, AppConfig, Overrides};
use vitae::docx::skeleton;
use vitae::pdf::PageSize;
use vitae::profile::Profile;
use vitae::progress::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(name = "vitae", version)]
#[command(about = "Render a JSON resume or cover letter to HTML, PDF or DOCX", long_about = None)]
struct Args {
    /// Generate a default vitae.toml, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config file when used with --init-config
    #[arg(long)]
    force: bool,

    /// Write the built-in DOCX skeleton package, then exit
    #[arg(long, value_name = "DOCX")]
    write_skeleton: Option<PathBuf>,

    /// Profile JSON (comments allowed)
    #[arg(value_name = "JSON")]
    input: Option<PathBuf>,

    /// Render a cover letter instead of a resume
    #[arg(long)]
    letter: bool,

    /// Plain DOCX resume instead of HTML/PDF
    #[arg(long)]
    boring: bool,

    /// A4 paper instead of US Letter
    #[arg(long)]
    a4: bool,

    /// Locale code (en, fr)
    #[arg(long, value_name = "LANG")]
    lang: Option<String>,

    /// PDF output path (default: next to the HTML)
    #[arg(long, value_name = "PDF")]
    pdf: Option<PathBuf>,

    /// Skip the PDF export
    #[arg(long, conflicts_with = "pdf")]
    no_pdf: bool,

    /// Output directory (default: the input's directory)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Output file stem (default: resume / cover-letter)
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Config file path (default: search for vitae.toml upwards, or VITAE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Less output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("VITAE_LOG", "warn")).init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help / --version
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Build failed: {}", e.render().to_string().trim_end());
            return ExitCode::from(1);
        }
    };
    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Build failed: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let progress = ConsoleProgress::new(!args.quiet);

    if args.init_config {
        let dir = match args.init_config_dir.clone() {
            Some(d) => d,
            None => std::env::current_dir().context("current dir")?,
        };
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        progress.artifact("Config", &cfg_path);
        return Ok(());
    }

    if let Some(path) = args.write_skeleton.as_ref() {
        let bytes = skeleton::generate()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("write skeleton: {}", path.display()))?;
        progress.artifact("Skeleton", path);
        return Ok(());
    }

    let input = match args.input.clone() {
        Some(p) => p,
        None => {
            let mut cmd = Args::command();
            cmd.print_help().context("print help")?;
            return Ok(());
        }
    };
    let mode = Mode::from_flags(args.letter, args.boring, args.pdf.is_some())?;

    let workdir = input
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let cfg = match locate_config(args.config.as_deref(), &workdir)? {
        Some(p) => {
            log::debug!("config: {}", p.display());
            load_config(&p)?
        }
        None => AppConfig::default(),
    };

    let profile = Profile::from_path(&input)?;
    let overrides = Overrides {
        language: args.lang.clone(),
        page_size: args.a4.then_some(PageSize::A4),
        no_pdf: args.no_pdf,
    };
    let settings = cfg.resolve(&overrides, profile.language().as_deref())?;

    let req = BuildRequest {
        input,
        mode,
        out_dir: args.out_dir.clone(),
        name: args.name.clone(),
        pdf_path: args.pdf.clone(),
    };
    run(&req, &profile, &settings, &chrome_engine(&settings), &progress)?;
    progress.done();
    Ok(())
}
