//! Gossfile templating and include discovery.

mod go_template;
mod includes;
mod template;

pub use includes::IncludeResolver;
pub use template::TemplateFilter;
