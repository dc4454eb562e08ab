//! Interpret JSON form schemas into render instructions and build nested
//! form data from dotted-path change events.
pub mod cli;
pub mod config;
pub mod error;
pub mod form_data;
pub mod interpret;
pub mod jq_exec;
pub mod load;
pub mod path;
pub mod path_de;
pub mod render;
pub mod samples;
pub mod schema;
pub mod session;
pub mod validate;

pub use error::{MalformedPathError, PromptError, SchemaError, SchemaShapeError, SubmitError};
pub use form_data::{FormData, FormValue};
pub use interpret::{interpret, FieldInstruction, RenderInstruction, SectionInstruction, Widget};
pub use load::SchemaLoader;
pub use path::FieldPath;
pub use schema::{FieldNode, Schema};
pub use session::{ChangeEvent, FormSession};
