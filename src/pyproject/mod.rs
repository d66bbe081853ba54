//! pyproject.toml defaults and section editing

pub mod defaults;
pub mod sections;

pub use defaults::{apply_default_tools, default_tool_names, default_tools, DEFAULT_TOOLS_TOML};
pub use sections::{
    add_section, diff_with_defaults, format_section_diff, list_sections, parse_assignment,
    remove_section, set_section, show_section, SectionScope,
};
