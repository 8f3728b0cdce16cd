use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;

use protoscript::config::{Args, Command, Config};
use protoscript::fixes::apply_safe_fixes;
use protoscript::registry::CommandRegistry;
use protoscript::transform::transform_document;
use protoscript::validation::{validate_document, Diagnostic};

fn main() -> ExitCode {
    let args = Args::parse();

    let level = log::LevelFilter::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = Config::from_args(args)?;
    let registry = config.build_registry();

    match &args.command {
        Command::Validate { script, json } => cmd_validate(script, *json, &registry),
        Command::Transform {
            script,
            seed,
            output,
        } => cmd_transform(script, *seed, output.as_deref(), &registry),
        Command::Fix {
            script,
            in_place,
            json,
        } => cmd_fix(script, *in_place, *json, &registry),
    }
}

fn cmd_validate(script: &Path, json: bool, registry: &CommandRegistry) -> Result<ExitCode> {
    let text = read_script(script)?;
    let diagnostics = validate_document(&text, registry);

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        print_findings(&diagnostics);
    }

    let errors = diagnostics.iter().filter(|d| d.has_error()).count();
    if errors > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_findings(diagnostics: &[Diagnostic]) {
    let mut errors = 0;
    let mut warnings = 0;
    for diagnostic in diagnostics {
        if diagnostic.has_error() {
            errors += 1;
            println!("line {}: error: {}", diagnostic.line_number, diagnostic.error);
        }
        if diagnostic.has_warning() {
            warnings += 1;
            println!(
                "line {}: warning: {}",
                diagnostic.line_number, diagnostic.warning
            );
        }
    }
    println!("{errors} error(s), {warnings} warning(s)");
}

fn cmd_transform(
    script: &Path,
    seed: u64,
    output: Option<&Path>,
    registry: &CommandRegistry,
) -> Result<ExitCode> {
    let text = read_script(script)?;
    let expanded = transform_document(&text, seed, registry);
    log::debug!("expanded {} logical line(s) with seed {seed}", expanded.len());

    let mut rendered = expanded.join("\n");
    rendered.push('\n');
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_fix(script: &Path, in_place: bool, json: bool, registry: &CommandRegistry) -> Result<ExitCode> {
    let text = read_script(script)?;
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    let report = apply_safe_fixes(&lines, registry);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (name, count) in &report.breakdown {
            println!("{name}: {count} change(s)");
        }
        println!("total: {} change(s)", report.total_changes);
    }

    let mut rendered = report.lines.join("\n");
    rendered.push('\n');
    if in_place {
        std::fs::write(script, rendered)
            .with_context(|| format!("writing {}", script.display()))?;
    } else if !json {
        print!("{rendered}");
    }
    Ok(ExitCode::SUCCESS)
}

fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
