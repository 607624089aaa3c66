pub mod extract;
pub mod prompt;
pub mod types;

pub use extract::{definition_from_reply, failed_definition, is_failure_code};
pub use prompt::{build_generation_prompt, generation_request, render_components, GENERATE_MAX_TOKENS};
pub use types::{Component, Definition};
