use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use limn_config::CliOverrides;
use limn_engine::{BoaEngine, JsEngine};
use limn_exec::{DispatchError, ProgressMode, PromptSource};
use std::fs;
use std::path::{Path, PathBuf};

mod prompt_io;
mod repl;
mod runtime_context;

use prompt_io::{ScriptedPromptSource, StdinPromptSource};
use runtime_context::{
    build_run_options, build_service, parse_language, resolve_config, resolve_language,
};

#[derive(Debug, Parser)]
#[command(name = "limn", version, about = "limn code playground")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a source file: JavaScript in-process, everything else through
    /// the compile service.
    Run {
        file: PathBuf,
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        service_url: Option<String>,
        /// Pre-supplied interactive input values, in prompt order.
        #[arg(long = "input")]
        inputs: Vec<String>,
        /// Keep the selected language even when the source looks like
        /// another one.
        #[arg(long)]
        no_detect: bool,
        #[arg(long)]
        verbose: bool,
        #[arg(long)]
        no_progress: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Evaluate inline JavaScript.
    Eval { code: String },
    /// Print a file as highlighted markup.
    Highlight {
        file: PathBuf,
        #[arg(long)]
        lang: Option<String>,
    },
    /// Run the heuristic error scan over a file.
    Lint {
        file: PathBuf,
        #[arg(long)]
        lang: Option<String>,
        /// Also ask the compile service for findings (best-effort).
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        service_url: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a language's starter template.
    Template { lang: String },
    /// Ask the study helper a question about a file.
    Chat {
        question: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Start the interactive playground.
    Repl {
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        service_url: Option<String>,
        #[arg(long)]
        verbose: bool,
        #[arg(long)]
        no_progress: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed reading source file {}", path.display()))
}

fn run_command(
    file: PathBuf,
    lang: Option<String>,
    service_url: Option<String>,
    inputs: Vec<String>,
    no_detect: bool,
    verbose: bool,
    no_progress: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let overrides = CliOverrides {
        service_url,
        lang: lang.clone(),
        auto_detect: no_detect.then_some(false),
        verbose: verbose.then_some(true),
        no_progress: no_progress.then_some(true),
    };
    let resolved = resolve_config(config, &overrides)?;
    let source = read_source(&file)?;
    let language = resolve_language(
        lang.as_deref(),
        resolved.lang.as_deref(),
        Some(&file),
        &source,
    )?;

    let service = build_service(&resolved);
    let options = build_run_options(&resolved);
    let mut engine = BoaEngine::new();

    let mut stdin_prompts = StdinPromptSource;
    let mut scripted_prompts;
    let prompts: &mut dyn PromptSource = if inputs.is_empty() {
        &mut stdin_prompts
    } else {
        scripted_prompts = ScriptedPromptSource::new(inputs);
        &mut scripted_prompts
    };

    match limn_exec::dispatch(&mut engine, &service, prompts, &source, language, &options) {
        Ok(outcome) => {
            println!("{}", outcome.panel);
            if !outcome.error_lines.is_empty()
                && !matches!(options.progress_mode, ProgressMode::Silent)
            {
                let flagged: Vec<String> =
                    outcome.error_lines.iter().map(ToString::to_string).collect();
                eprintln!("[limn] flagged lines: {}", flagged.join(", "));
            }
            Ok(())
        }
        Err(err) => match err.downcast_ref::<DispatchError>() {
            Some(DispatchError::Cancelled) => {
                println!("Execution cancelled by user.");
                Ok(())
            }
            _ => Err(err),
        },
    }
}

fn eval_command(code: String) -> Result<()> {
    let mut engine = BoaEngine::new();
    let output = engine.eval_script(&code, "<eval>", &[])?;
    for line in &output.console {
        println!("{line}");
    }
    if let Some(value) = output.value {
        println!("{value}");
    }
    Ok(())
}

fn highlight_command(file: PathBuf, lang: Option<String>) -> Result<()> {
    let source = read_source(&file)?;
    let language = resolve_language(lang.as_deref(), None, Some(&file), &source)?;
    println!("{}", limn_highlight::highlight(&source, language));
    Ok(())
}

fn lint_command(
    file: PathBuf,
    lang: Option<String>,
    remote: bool,
    service_url: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let overrides = CliOverrides {
        service_url,
        lang: lang.clone(),
        ..CliOverrides::default()
    };
    let resolved = resolve_config(config, &overrides)?;
    let source = read_source(&file)?;
    let language = resolve_language(
        lang.as_deref(),
        resolved.lang.as_deref(),
        Some(&file),
        &source,
    )?;

    let mut flagged = limn_lint::scan(&source, language);
    if remote {
        let service = build_service(&resolved);
        let options = build_run_options(&resolved);
        if let Some(remote_lines) =
            limn_exec::remote_scan(&service, &source, language, options.progress_mode)
        {
            flagged.extend(remote_lines);
        }
    }

    if flagged.is_empty() {
        println!("no flagged lines");
    } else {
        let lines: Vec<String> = flagged.iter().map(ToString::to_string).collect();
        println!("flagged lines: {}", lines.join(", "));
    }
    Ok(())
}

fn template_command(lang: String) -> Result<()> {
    let language = parse_language(&lang)?;
    println!("{}", language.template());
    Ok(())
}

fn chat_command(question: String, file: Option<PathBuf>) -> Result<()> {
    let buffer = match file {
        Some(path) => read_source(&path)?,
        None => String::new(),
    };
    println!("{}", limn_chat::respond(&question, &buffer));
    Ok(())
}

fn repl_command(
    lang: Option<String>,
    service_url: Option<String>,
    verbose: bool,
    no_progress: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let overrides = CliOverrides {
        service_url,
        lang,
        auto_detect: None,
        verbose: verbose.then_some(true),
        no_progress: no_progress.then_some(true),
    };
    let resolved = resolve_config(config, &overrides)?;
    repl::repl(&resolved)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            lang,
            service_url,
            inputs,
            no_detect,
            verbose,
            no_progress,
            config,
        } => run_command(
            file,
            lang,
            service_url,
            inputs,
            no_detect,
            verbose,
            no_progress,
            config,
        ),
        Commands::Eval { code } => eval_command(code),
        Commands::Highlight { file, lang } => highlight_command(file, lang),
        Commands::Lint {
            file,
            lang,
            remote,
            service_url,
            config,
        } => lint_command(file, lang, remote, service_url, config),
        Commands::Template { lang } => template_command(lang),
        Commands::Chat { question, file } => chat_command(question, file),
        Commands::Repl {
            lang,
            service_url,
            verbose,
            no_progress,
            config,
        } => repl_command(lang, service_url, verbose, no_progress, config),
    }
}
