//! CLI: schema → (render | fill | prompt), plus batch `check` and `sample`
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, Level};

use crate::config::Settings;
use crate::form_data::FormData;
use crate::interpret::leaf_paths;
use crate::load::SchemaLoader;
use crate::render::{write_tree, Palette, Prompter};
use crate::samples::Sample;
use crate::session::{ChangeEvent, FormSession};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// interpret JSON form schemas and build nested form data from dotted-path change events
#[derive(Parser, Debug)]
#[command(name = "genform", version)]
pub struct CommandLineInterface {
    /// settings file (defaults to ./genform.toml when present)
    #[arg(long, global = true, env = "GENFORM_CONFIG")]
    config: Option<PathBuf>,

    /// more logging: -v for debug, -vv for trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// disable colored output
    #[arg(long, global = true, default_value_t = false)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the render instructions of a schema as a tree or as JSON
    Render(RenderOut),
    /// replay change events into form data and print the result
    Fill(FillOut),
    /// fill a form interactively on the terminal
    Prompt(PromptOut),
    /// validate many schema files in parallel
    Check(CheckOut),
    /// print a built-in example schema
    Sample(SampleOut),
}

#[derive(Args, Debug, Clone)]
struct Preprocess {
    /// JSON Pointer selecting the schema inside the document (e.g. /data/form)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq filter applied after the pointer; its first output is the schema
    #[arg(long)]
    jq_expr: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct SchemaInput {
    /// schema file, or '-' for stdin
    schema: String,

    #[command(flatten)]
    preprocess: Preprocess,
}

#[derive(clap::Parser, Debug)]
struct RenderOut {
    #[command(flatten)]
    input: SchemaInput,

    /// emit the instructions as JSON instead of a text tree
    #[arg(long, default_value_t = false)]
    json: bool,

    /// form data file whose values are shown next to their fields
    #[arg(long)]
    data: Option<PathBuf>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct FillOut {
    #[command(flatten)]
    input: SchemaInput,

    /// NDJSON change events, one {"path": .., "value": ..} per line, or '-' for stdin
    #[arg(long)]
    events: Option<String>,

    /// a single change event; applied after --events, in order
    #[arg(long = "set", value_name = "PATH=VALUE")]
    set: Vec<ChangeEvent>,

    /// initial form data file
    #[arg(long)]
    data: Option<PathBuf>,

    /// fail unless every required field has a non-empty value
    #[arg(long, default_value_t = false)]
    submit: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct PromptOut {
    #[command(flatten)]
    input: SchemaInput,

    /// initial form data file
    #[arg(long)]
    data: Option<PathBuf>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(num_args = 1.., required = true)]
    inputs: Vec<String>,

    #[command(flatten)]
    preprocess: Preprocess,

    /// reject duplicate sibling names and names containing '.'
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(clap::Parser, Debug)]
struct SampleOut {
    #[arg(value_enum, default_value_t = Sample::Complex)]
    which: Sample,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Preprocess {
    fn loader(&self, settings: &Settings) -> SchemaLoader {
        let mut loader = SchemaLoader::new().with_limits(settings.limits());
        if let Some(pointer) = self.json_pointer.as_deref() {
            loader = loader.with_json_pointer(pointer);
        }
        if let Some(expr) = self.jq_expr.as_deref() {
            loader = loader.with_jq_expr(expr);
        }
        loader
    }
}

impl SchemaInput {
    fn open_session(&self, settings: &Settings) -> Result<FormSession> {
        let src = read_source(&self.schema)?;
        let mut session = FormSession::new(self.preprocess.loader(settings));
        if let Err(error) = session.load_str(&src) {
            let what = if error.is_invalid_schema() { "invalid schema" } else { "cannot select schema" };
            return Err(anyhow::Error::new(error).context(format!("{what} in {}", self.schema)));
        }
        Ok(session)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Settings file merged with the global flags.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if self.no_color {
            settings.output.color = false;
        }
        Ok(settings)
    }

    pub fn log_level(&self, settings: &Settings) -> Result<Level> {
        match self.verbose {
            0 => settings.log_level(),
            1 => Ok(Level::DEBUG),
            _ => Ok(Level::TRACE),
        }
    }

    pub fn run(&self, settings: &Settings) -> Result<()> {
        if !settings.output.color {
            colored::control::set_override(false);
        }
        let pretty = settings.output.pretty;
        match &self.cmd {
            Command::Render(target) => {
                let mut session = target.input.open_session(settings)?;
                if let Some(path) = target.data.as_deref() {
                    session.replace_data(load_data(path)?);
                }
                let text = if target.json {
                    to_json_string(session.instructions(), pretty)?
                } else {
                    let palette = Palette::new(settings.output.color && target.out.is_none());
                    let mut buf = Vec::new();
                    write_tree(&mut buf, session.instructions(), session.data(), palette)?;
                    String::from_utf8(buf).context("tree output is not UTF-8")?
                };
                emit(target.out.as_deref(), text.trim_end())
            }
            Command::Fill(target) => {
                if target.input.schema == "-" && target.events.as_deref() == Some("-") {
                    bail!("schema and events cannot both be read from stdin");
                }
                let mut session = target.input.open_session(settings)?;
                if let Some(path) = target.data.as_deref() {
                    session.replace_data(load_data(path)?);
                }

                let mut events = match target.events.as_deref() {
                    Some(name) => parse_events(&read_source(name)?)
                        .with_context(|| format!("invalid change events in {name}"))?,
                    None => Vec::new(),
                };
                events.extend(target.set.iter().cloned());

                let known = leaf_paths(session.instructions());
                for (index, event) in events.iter().enumerate() {
                    if !known.iter().any(|path| path.to_string() == event.path) {
                        debug!(path = %event.path, "change event does not address a schema field");
                    }
                    session
                        .apply(event)
                        .with_context(|| format!("change event #{} rejected", index + 1))?;
                }
                info!(events = events.len(), "change events applied");

                let data = if target.submit {
                    session.submit().context("submission rejected")?
                } else {
                    session.data().clone()
                };
                emit(target.out.as_deref(), &to_json_string(&data, pretty)?)
            }
            Command::Prompt(target) => {
                if target.input.schema == "-" {
                    bail!("the prompt reads answers from stdin; pass the schema as a file");
                }
                let mut session = target.input.open_session(settings)?;
                if let Some(path) = target.data.as_deref() {
                    session.replace_data(load_data(path)?);
                }
                let stdin = io::stdin();
                let stdout = io::stdout();
                let mut prompter =
                    Prompter::new(stdin.lock(), stdout.lock(), Palette::new(settings.output.color));
                let answered = prompter.run(&mut session).context("prompt aborted")?;
                drop(prompter);
                info!(answered, "prompt finished");
                emit(target.out.as_deref(), &to_json_string(session.data(), pretty)?)
            }
            Command::Check(target) => {
                let paths = resolve_file_path_patterns(&target.inputs)?;
                let mut settings = settings.clone();
                settings.schema.strict |= target.strict;
                let loader = target.preprocess.loader(&settings);

                let results: Vec<(PathBuf, Result<usize>)> = paths
                    .into_par_iter()
                    .map(|path| {
                        let result = check_file(&loader, &path);
                        (path, result)
                    })
                    .collect();

                let mut failed = 0;
                for (path, result) in &results {
                    match result {
                        Ok(fields) => {
                            println!("{} {} ({fields} fields)", "✅".green(), path.display());
                        }
                        Err(error) => {
                            failed += 1;
                            println!("{} {}: {error:#}", "❌".red(), path.display());
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} schema files failed", results.len());
                }
                Ok(())
            }
            Command::Sample(target) => {
                emit(target.out.as_deref(), &to_json_string(&target.which.schema(), pretty)?)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn check_file(loader: &SchemaLoader, path: &Path) -> Result<usize> {
    let name = path.to_string_lossy();
    let src = read_source(&name)?;
    let schema = loader.load_str(&src)?;
    Ok(leaf_paths(&crate::interpret::interpret(&schema)).len())
}

fn read_source(name: &str) -> Result<String> {
    if name == "-" {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src).context("failed to read stdin")?;
        return Ok(src);
    }
    std::fs::read_to_string(name).with_context(|| format!("failed to read {name}"))
}

fn load_data(path: &Path) -> Result<FormData> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form data {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&src)
        .with_context(|| format!("form data {} is not valid JSON", path.display()))?;
    FormData::from_json(value)
        .with_context(|| format!("form data {} must be an object of strings", path.display()))
}

/// One event per non-blank line.
fn parse_events(src: &str) -> Result<Vec<ChangeEvent>> {
    src.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", index + 1))
        })
        .collect()
}

fn to_json_string<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    text.context("failed to serialize output")
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
            }
            if out.len() == before {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = CommandLineInterface::try_parse_from([
            "genform", "fill", "form.json", "--set", "p.first=Alice", "--set", "p.last=", "-vv", "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        let Command::Fill(fill) = &cli.cmd else { panic!("expected fill") };
        assert_eq!(fill.set, vec![ChangeEvent::new("p.first", "Alice"), ChangeEvent::new("p.last", "")]);
        assert_eq!(cli.log_level(&Settings::default()).unwrap(), Level::TRACE);
    }

    #[test]
    fn rejects_assignment_without_equals() {
        assert!(CommandLineInterface::try_parse_from(["genform", "fill", "f.json", "--set", "p.first"]).is_err());
    }

    #[test]
    fn ndjson_events_skip_blank_lines() {
        let events = parse_events("{\"path\":\"a\",\"value\":\"1\"}\n\n{\"path\":\"b.c\",\"value\":\"2\"}\n").unwrap();
        assert_eq!(events, vec![ChangeEvent::new("a", "1"), ChangeEvent::new("b.c", "2")]);
        let err = parse_events("{\"path\":\"a\"}").unwrap_err();
        assert_eq!(err.to_string(), "line 1");
    }

    #[test]
    fn literal_paths_pass_through_globs_must_match() {
        let paths = resolve_file_path_patterns(["missing.json", "-"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("missing.json"), PathBuf::from("-")]);
        assert!(resolve_file_path_patterns(["no-such-dir-*/x.json"]).is_err());
    }
}
