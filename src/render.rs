//! Terminal drawing of render instructions: a static tree view and an
//! interactive line-based prompt that feeds answers back as change events.
use std::io::{self, BufRead, Write};

use colored::{ColoredString, Colorize};

use crate::error::PromptError;
use crate::form_data::FormData;
use crate::interpret::{walk, FieldInstruction, RenderInstruction, Widget};
use crate::path::FieldPath;
use crate::schema::SelectOption;
use crate::session::FormSession;

const INDENT: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color { style(text).to_string() } else { text.to_string() }
    }

    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.bold().cyan())
    }

    fn required(&self) -> String {
        self.paint("*", |t| t.red())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    fn value(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }
}

// ------------------------------- Tree view -------------------------------- //

pub fn write_tree<W: Write>(
    out: &mut W,
    instructions: &[RenderInstruction],
    data: &FormData,
    palette: Palette,
) -> io::Result<()> {
    for (depth, instruction) in walk(instructions) {
        let indent = INDENT.repeat(depth);
        match instruction {
            RenderInstruction::Section(section) => {
                let path = format!("({})", section.path);
                writeln!(out, "{indent}{} {}", palette.header(&section.label), palette.dim(&path))?;
            }
            RenderInstruction::Field(field) => {
                let widget = format!("[{}]", describe(&field.widget));
                write!(
                    out,
                    "{indent}{}{} {} {}",
                    field.label,
                    required_marker(field, palette),
                    palette.dim(&widget),
                    palette.dim(&field.path.to_string()),
                )?;
                if let Some(value) = data.get(&field.path) {
                    write!(out, " = {}", palette.value(&format!("{value:?}")))?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn describe(widget: &Widget) -> String {
    match widget {
        Widget::Select { options } => {
            let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
            format!("select: {}", values.join(" | "))
        }
        Widget::Textarea { rows, .. } => format!("textarea, {rows} rows"),
        other => other.type_name().to_string(),
    }
}

fn required_marker(field: &FieldInstruction, palette: Palette) -> String {
    if field.required { format!(" {}", palette.required()) } else { String::new() }
}

// -------------------------------- Prompt ---------------------------------- //

/// Asks for every leaf in document order. An empty answer leaves the field
/// untouched, except that required fields without a value are asked again.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    palette: Palette,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, palette: Palette) -> Self {
        Self { input, output, palette }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Returns how many fields received a change event.
    pub fn run(&mut self, session: &mut FormSession) -> Result<usize, PromptError> {
        let instructions = session.instructions().to_vec();
        let mut answered = 0;
        for (depth, instruction) in walk(&instructions) {
            let indent = INDENT.repeat(depth);
            match instruction {
                RenderInstruction::Section(section) => {
                    writeln!(self.output, "{indent}{}", self.palette.header(&section.label))?;
                }
                RenderInstruction::Field(field) => {
                    if let Some(answer) = self.ask(&indent, field, session.data())? {
                        session.change_path(&field.path, answer)?;
                        answered += 1;
                    }
                }
            }
        }
        self.output.flush()?;
        Ok(answered)
    }

    fn ask(
        &mut self,
        indent: &str,
        field: &FieldInstruction,
        data: &FormData,
    ) -> Result<Option<String>, PromptError> {
        let current = data.get(&field.path).filter(|v| !v.is_empty());

        if let Widget::Select { options } = &field.widget {
            if options.is_empty() {
                writeln!(self.output, "{indent}{} {}", field.label, self.palette.dim("(no options)"))?;
                return Ok(None);
            }
        }

        loop {
            self.write_question(indent, field, current)?;
            let answer = match &field.widget {
                Widget::Textarea { .. } => self.read_block(&field.path)?,
                _ => self.read_line(&field.path)?,
            };

            let answer = match &field.widget {
                Widget::Select { options } if !answer.is_empty() => match pick_option(options, &answer) {
                    Some(value) => value.to_string(),
                    None => {
                        let msg = self.palette.error("not one of the listed options");
                        writeln!(self.output, "{indent}{INDENT}{msg}")?;
                        continue;
                    }
                },
                _ => answer,
            };

            if !answer.is_empty() {
                return Ok(Some(answer));
            }
            if field.required && current.is_none() {
                let msg = self.palette.error("this field is required");
                writeln!(self.output, "{indent}{INDENT}{msg}")?;
                continue;
            }
            return Ok(None);
        }
    }

    fn write_question(
        &mut self,
        indent: &str,
        field: &FieldInstruction,
        current: Option<&str>,
    ) -> io::Result<()> {
        let mut hint = Vec::new();
        match &field.widget {
            Widget::Select { options } => {
                for (i, option) in options.iter().enumerate() {
                    writeln!(self.output, "{indent}{INDENT}{}) {}", i + 1, option.label)?;
                }
                hint.push(format!("1-{}", options.len()));
            }
            Widget::Textarea { rows, .. } => {
                hint.push(format!("{rows} rows, empty line ends"));
            }
            _ => {}
        }
        if let Some(placeholder) = field.widget.placeholder() {
            hint.push(placeholder.to_string());
        }
        if let Some(current) = current {
            hint.push(format!("current: {current}"));
        }

        write!(self.output, "{indent}{}{}", field.label, required_marker(field, self.palette))?;
        if !hint.is_empty() {
            write!(self.output, " {}", self.palette.dim(&format!("({})", hint.join("; "))))?;
        }
        write!(self.output, ": ")?;
        if matches!(field.widget, Widget::Textarea { .. }) {
            writeln!(self.output)?;
        }
        self.output.flush()
    }

    fn read_line(&mut self, path: &FieldPath) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::UnexpectedEof { path: path.clone() });
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_block(&mut self, path: &FieldPath) -> Result<String, PromptError> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                if lines.is_empty() {
                    return Err(PromptError::UnexpectedEof { path: path.clone() });
                }
                break;
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                break;
            }
            lines.push(line.to_string());
        }
        Ok(lines.join("\n"))
    }
}

/// Exact value, then 1-based index, then case-insensitive label.
fn pick_option<'a>(options: &'a [SelectOption], answer: &str) -> Option<&'a str> {
    let by_index = || {
        answer
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
    };
    options
        .iter()
        .find(|o| o.value == answer)
        .or_else(by_index)
        .or_else(|| options.iter().find(|o| o.label.eq_ignore_ascii_case(answer)))
        .map(|o| o.value.as_str())
}
