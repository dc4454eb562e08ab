//! Schema → render instructions.
//!
//! Walks the schema forest with an explicit work stack, so nesting depth costs
//! heap rather than call stack. Output stays hierarchical: a section
//! instruction owns the instructions of its children.
use serde::Serialize;
use tracing::trace;

use crate::path::FieldPath;
use crate::schema::{FieldNode, InputField, Schema, SelectOption};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderInstruction {
    Section(SectionInstruction),
    Field(FieldInstruction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionInstruction {
    pub path: FieldPath,
    pub label: String,
    pub children: Vec<RenderInstruction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInstruction {
    pub path: FieldPath,
    pub label: String,
    pub required: bool,
    #[serde(flatten)]
    pub widget: Widget,
}

/// What to draw for a leaf, with type-specific metadata already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Widget {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Email {
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Password {
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Select { options: Vec<SelectOption> },
    Textarea {
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        rows: u32,
    },
}

impl Widget {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Email { .. } => "email",
            Self::Password { .. } => "password",
            Self::Number { .. } => "number",
            Self::Select { .. } => "select",
            Self::Textarea { .. } => "textarea",
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Text { placeholder }
            | Self::Email { placeholder }
            | Self::Password { placeholder }
            | Self::Number { placeholder }
            | Self::Textarea { placeholder, .. } => placeholder.as_deref(),
            Self::Select { .. } => None,
        }
    }
}

impl RenderInstruction {
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Section(s) => &s.path,
            Self::Field(f) => &f.path,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Section(s) => &s.label,
            Self::Field(f) => &f.label,
        }
    }
}

// ------------------------------ Interpret --------------------------------- //

/// Interpret a schema from the root path.
pub fn interpret(schema: &Schema) -> Vec<RenderInstruction> {
    interpret_under(&schema.nodes, &FieldPath::root())
}

/// Interpret `nodes` as if they were nested under `base`.
pub fn interpret_under(nodes: &[FieldNode], base: &FieldPath) -> Vec<RenderInstruction> {
    struct Frame<'a> {
        path: FieldPath,
        label: Option<&'a str>, // None for the root frame
        pending: std::slice::Iter<'a, FieldNode>,
        out: Vec<RenderInstruction>,
    }

    let mut stack = vec![Frame {
        path: base.clone(),
        label: None,
        pending: nodes.iter(),
        out: Vec::new(),
    }];

    loop {
        let Some(frame) = stack.last_mut() else {
            return Vec::new();
        };

        if let Some(node) = frame.pending.next() {
            match node {
                FieldNode::Section(section) => {
                    let path = frame.path.child(&section.name);
                    stack.push(Frame {
                        path,
                        label: Some(&section.label),
                        pending: section.fields.iter(),
                        out: Vec::with_capacity(section.fields.len()),
                    });
                }
                FieldNode::Unknown => {
                    trace!(parent = %frame.path, "skipping field of unknown type");
                }
                leaf => {
                    if let Some(field) = lower_leaf(leaf, &frame.path) {
                        frame.out.push(RenderInstruction::Field(field));
                    }
                }
            }
            continue;
        }

        // frame exhausted: fold it into its parent, or finish at the root
        let Some(done) = stack.pop() else {
            return Vec::new();
        };
        match (stack.last_mut(), done.label) {
            (Some(parent), Some(label)) => {
                parent.out.push(RenderInstruction::Section(SectionInstruction {
                    path: done.path,
                    label: label.to_string(),
                    children: done.out,
                }));
            }
            _ => return done.out,
        }
    }
}

fn lower_leaf(node: &FieldNode, base: &FieldPath) -> Option<FieldInstruction> {
    fn input(f: &InputField, base: &FieldPath, widget: Widget) -> FieldInstruction {
        FieldInstruction {
            path: base.child(&f.name),
            label: f.label.clone(),
            required: f.required,
            widget,
        }
    }

    let field = match node {
        FieldNode::Text(f) => input(f, base, Widget::Text { placeholder: f.placeholder.clone() }),
        FieldNode::Email(f) => input(f, base, Widget::Email { placeholder: f.placeholder.clone() }),
        FieldNode::Password(f) => {
            input(f, base, Widget::Password { placeholder: f.placeholder.clone() })
        }
        FieldNode::Number(f) => input(f, base, Widget::Number { placeholder: f.placeholder.clone() }),
        FieldNode::Select(f) => FieldInstruction {
            path: base.child(&f.name),
            label: f.label.clone(),
            required: f.required,
            widget: Widget::Select { options: f.options.clone() },
        },
        FieldNode::Textarea(f) => FieldInstruction {
            path: base.child(&f.name),
            label: f.label.clone(),
            required: f.required,
            widget: Widget::Textarea {
                placeholder: f.placeholder.clone(),
                rows: f.resolved_rows(),
            },
        },
        FieldNode::Section(_) | FieldNode::Unknown => return None,
    };
    Some(field)
}

// ------------------------------- Queries ---------------------------------- //

/// Pre-order walk yielding each instruction with its section depth
/// (top level is 0). Sections come before their children.
pub fn walk(instructions: &[RenderInstruction]) -> Walk<'_> {
    Walk { stack: vec![instructions.iter()] }
}

pub struct Walk<'a> {
    stack: Vec<std::slice::Iter<'a, RenderInstruction>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a RenderInstruction);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(instruction) => {
                    if let RenderInstruction::Section(section) = instruction {
                        self.stack.push(section.children.iter());
                    }
                    return Some((depth, instruction));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Leaf instructions in document order.
pub fn leaves(instructions: &[RenderInstruction]) -> impl Iterator<Item = &FieldInstruction> {
    walk(instructions).filter_map(|(_, instruction)| match instruction {
        RenderInstruction::Field(field) => Some(field),
        RenderInstruction::Section(_) => None,
    })
}

pub fn leaf_paths(instructions: &[RenderInstruction]) -> Vec<FieldPath> {
    leaves(instructions).map(|f| f.path.clone()).collect()
}
