//! Replays JSON scenario fixtures against the genform library.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use genform::interpret::leaf_paths;
use genform::session::{ChangeEvent, FormSession};
use genform::validate::Limits;
use genform::SchemaLoader;

static SCENARIO_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*\.json$").expect("valid scenario file regex"));

const DEFAULT_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios");

/// replay scenario fixtures and report which pass
#[derive(Parser, Debug)]
struct RunnerArgs {
    /// only run scenarios whose file name matches this regex
    #[arg(long)]
    filter: Option<Regex>,

    /// directory holding the *.json scenarios
    #[arg(default_value = DEFAULT_DIR)]
    dir: PathBuf,
}

// ————————————————————————————————————————————————————————————————————————————
// FIXTURE FORMAT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    #[serde(default)]
    description: String,
    /// A JSON string is loaded as raw text, anything else is serialized first.
    schema: Value,
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    events: Vec<ChangeEvent>,
    #[serde(default)]
    expect: Expect,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Expect {
    paths: Option<Vec<String>>,
    instructions: Option<Value>,
    data: Option<Value>,
    /// Regex the load error message must match; the scenario stops there.
    error: Option<String>,
    missing_required: Option<Vec<String>>,
}

// ————————————————————————————————————————————————————————————————————————————
// RUNNER
// ————————————————————————————————————————————————————————————————————————————

fn load_scenario(path: &Path) -> Result<Scenario> {
    let src = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&src);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let location = err.path().to_string();
        anyhow::anyhow!("{location}: {}", err.into_inner())
    })
}

fn run_scenario(scenario: &Scenario) -> Result<()> {
    let limits = Limits { strict: scenario.strict, ..Limits::default() };
    let mut session = FormSession::new(SchemaLoader::new().with_limits(limits));
    let src = match &scenario.schema {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    };

    match (session.load_str(&src), scenario.expect.error.as_deref()) {
        (Err(error), Some(pattern)) => {
            let re = Regex::new(pattern).with_context(|| format!("bad error pattern `{pattern}`"))?;
            let message = error.to_string();
            if !re.is_match(&message) {
                bail!("error `{message}` does not match `{pattern}`");
            }
            return Ok(());
        }
        (Err(error), None) => bail!("schema rejected: {error}"),
        (Ok(_), Some(pattern)) => bail!("expected a load error matching `{pattern}`"),
        (Ok(_), None) => {}
    }

    if let Some(expected) = &scenario.expect.paths {
        let actual: Vec<String> = leaf_paths(session.instructions()).iter().map(ToString::to_string).collect();
        if &actual != expected {
            bail!("paths: expected {expected:?}, got {actual:?}");
        }
    }
    if let Some(expected) = &scenario.expect.instructions {
        let actual = serde_json::to_value(session.instructions())?;
        if &actual != expected {
            bail!("instructions: expected {expected}, got {actual}");
        }
    }

    for event in &scenario.events {
        session
            .apply(event)
            .with_context(|| format!("event {}={:?}", event.path, event.value))?;
    }

    if let Some(expected) = &scenario.expect.data {
        let actual = session.data().to_json();
        if &actual != expected {
            bail!("data: expected {expected}, got {actual}");
        }
    }
    if let Some(expected) = &scenario.expect.missing_required {
        let actual: Vec<String> = session.missing_required().iter().map(ToString::to_string).collect();
        if &actual != expected {
            bail!("missing_required: expected {expected:?}, got {actual:?}");
        }
    }
    Ok(())
}

fn scenario_files(dir: &Path, filter: Option<&Regex>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        if !SCENARIO_FILE.is_match(name) {
            continue;
        }
        if filter.is_some_and(|re| !re.is_match(name)) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn main() -> ExitCode {
    let RunnerArgs { filter, dir } = RunnerArgs::parse();

    let files = match scenario_files(&dir, filter.as_ref()) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("{error:#}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0;
    for path in &files {
        let name = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let outcome = load_scenario(path).and_then(|scenario| {
            run_scenario(&scenario).map(|()| scenario.description)
        });
        match outcome {
            Ok(description) => eprintln!("✅ {name} {description}"),
            Err(error) => {
                failed += 1;
                eprintln!("❌ {name}: {error:#}");
            }
        }
    }
    eprintln!("{} scenarios, {failed} failed", files.len());
    if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
