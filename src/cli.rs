//! CLI domain: parse, route, output and presentation only.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_steps_json, format_steps_text, StepView, VertexView};
pub use route::RunContext;
