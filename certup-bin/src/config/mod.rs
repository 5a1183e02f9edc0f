mod parse;
mod toml;

pub use {
  parse::{build_settings, parse_opts, Opts, Settings, WorkflowKind},
  toml::ConfigToml,
};
