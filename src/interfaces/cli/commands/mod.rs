//! CLI command implementations

mod config_gen;
mod templates;
mod users;

pub use config_gen::config_generate;
pub use templates::{TemplateSeed, import_templates, parse_template_seeds};
pub use users::{MIN_PASSWORD_LEN, add_user};
