use amp_inject::models::ValidationStatus;
use amp_inject::pipeline;
use amp_inject::{CommandValidator, Config, HttpDocs, Resolver, ScriptUrlCache, Strategy};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "amp-inject", version, about = "Injects required AMP script tags into HTML pages")]
struct Cli {
    /// Config file (defaults to ./amp-inject.toml when present)
    #[arg(long, global = true, env = "AMP_INJECT_CONFIG")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve and inject a single file ("-" reads stdin)
    Inject {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,
    },
    /// Process every page under the source directory
    Build {
        #[arg(long)]
        src: Option<PathBuf>,
        #[arg(long)]
        dest: Option<PathBuf>,
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,
        /// Validate the written pages afterwards
        #[arg(long)]
        validate: bool,
    },
    /// Validate every page in a directory
    Validate { dir: Option<PathBuf> },
    /// Empty the output directory
    Clean { dir: Option<PathBuf> },
    /// List the elements a page needs, without injecting anything
    Elements { input: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::discover(cli.config.as_deref(), Path::new("."))?;

    match cli.command {
        Command::Inject {
            input,
            output,
            strategy,
        } => {
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            let raw = read_input(&input)?;
            let resolver = make_resolver(&config)?;
            let html = resolver
                .process(&raw)
                .await
                .with_context(|| format!("Failed to process {}", input.display()))?;
            match output {
                Some(path) => std::fs::write(&path, html)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{}", html),
            }
        }
        Command::Build {
            src,
            dest,
            strategy,
            concurrency,
            validate,
        } => {
            if let Some(src) = src {
                config.build.src = src;
            }
            if let Some(dest) = dest {
                config.build.dest = dest;
            }
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            if let Some(n) = concurrency {
                config.build.concurrency = n.max(1);
            }

            pipeline::copy_assets(
                &config.build.assets,
                &config.build.dest.join(&config.build.assets_dest),
            )
            .await?;
            let resolver = make_resolver(&config)?;
            let report = pipeline::build(
                &resolver,
                &config.build.src,
                &config.build.dest,
                config.build.concurrency,
            )
            .await?;
            for (page, err) in &report.failed {
                eprintln!("FAILED {}: {}", page.display(), err);
            }
            if !report.is_success() {
                bail!("{} page(s) failed to build", report.failed.len());
            }
            if validate {
                validate_dir(&config, &config.build.dest).await?;
            }
        }
        Command::Validate { dir } => {
            let dir = dir.unwrap_or_else(|| config.build.dest.clone());
            validate_dir(&config, &dir).await?;
        }
        Command::Clean { dir } => {
            let dir = dir.unwrap_or_else(|| config.build.dest.clone());
            pipeline::clean(&dir).await?;
        }
        Command::Elements { input } => {
            let raw = read_input(&input)?;
            let elements = amp_inject::resolver::required_elements(
                &amp_inject::dom::HtmlDocument::parse(&raw),
                &config.rules(),
            );
            for element in elements {
                println!("{}", element);
            }
        }
    }
    Ok(())
}

fn make_resolver(config: &Config) -> Result<Resolver<CommandValidator, HttpDocs>> {
    Ok(Resolver::new(
        config,
        CommandValidator::new(&config.scrape.validator),
        HttpDocs::new()?,
        ScriptUrlCache::new(),
    ))
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw).context("Failed to read stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

async fn validate_dir(config: &Config, dir: &Path) -> Result<()> {
    let validator = CommandValidator::new(&config.scrape.validator);
    let results = pipeline::validate_dir(&validator, dir).await?;
    let mut failed = 0;
    for file in &results {
        for err in &file.errors {
            println!("{}:{}:{} {}", file.path.display(), err.line, err.col, err.message);
        }
        if file.status != ValidationStatus::Pass {
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{} of {} page(s) failed validation", failed, results.len());
    }
    println!("{} page(s) passed validation", results.len());
    Ok(())
}
