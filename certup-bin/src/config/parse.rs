use super::toml::ConfigToml;
use crate::{
  constants::{ALLOWED_KEY_SIZES, DEFAULT_KEY_SIZE, DEFAULT_RENEW_BEFORE_DAYS, DEFAULT_WORKING_DIR},
  error::{anyhow, ensure},
};
use certup_lib::{reexports::Url, EnvLayout, SubjectDnBuilder, WorkflowContext};
use clap::{Arg, Command};
use std::path::Path;
use tokio::time::Duration;

/* ----------------------- */
/// Requested workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
  Issue,
  Renew,
}

/// Parsed options
pub struct Opts {
  pub config_file_path: String,
  pub kind: WorkflowKind,
}

/// Parse arg values passed from cli
pub fn parse_opts() -> Result<Opts, anyhow::Error> {
  let _ = include_str!("../../Cargo.toml");
  let options = clap::command!()
    .arg(
      Arg::new("config_file")
        .long("config")
        .short('c')
        .value_name("FILE")
        .required(true)
        .help("Configuration file path like ./config.toml"),
    )
    .subcommand_required(true)
    .subcommand(Command::new("issue").about("Provision EAB credentials, register the ACME account and issue a certificate"))
    .subcommand(Command::new("renew").about("Renew the certificate if the expiration check triggers"));
  let matches = options.get_matches();

  ///////////////////////////////////
  let config_file_path = matches.get_one::<String>("config_file").unwrap().to_owned();
  let kind = match matches.subcommand_name() {
    Some("renew") => WorkflowKind::Renew,
    _ => WorkflowKind::Issue,
  };

  Ok(Opts { config_file_path, kind })
}

/* ----------------------- */
/// Fully validated runtime settings
#[derive(Debug)]
pub struct Settings {
  pub context: WorkflowContext,
  pub renew_before_days: u32,
}

/// Validate the raw configuration and build the workflow context. All
/// required fields are enumerated and checked here, once, before any step
/// runs; security-relevant fields get no silent defaults.
pub fn build_settings(config: &ConfigToml) -> Result<Settings, anyhow::Error> {
  let project_id = required_field(&config.project_id, "project_id")?;
  let user_email = required_field(&config.user_email, "user_email")?;
  let env = required_field(&config.env, "env")?;
  let acme_server_str = required_field(&config.acme_server, "acme_server")?;

  let subject = SubjectDnBuilder::default()
    .country(required_field(&config.country, "country")?)
    .state(required_field(&config.state, "state")?)
    .locality(required_field(&config.locality, "locality")?)
    .organization(required_field(&config.organization, "organization")?)
    .org_unit(required_field(&config.org_unit, "org_unit")?)
    .common_name(required_field(&config.common_name, "common_name")?)
    .email(user_email.clone())
    .build()?;

  let acme_server = Url::parse(&acme_server_str).map_err(|e| anyhow!("Invalid acme_server url: {e}"))?;

  let key_size = config.key_size.unwrap_or(DEFAULT_KEY_SIZE);
  ensure!(
    ALLOWED_KEY_SIZES.contains(&key_size),
    "key_size must be one of {ALLOWED_KEY_SIZES:?}"
  );

  let working_dir = config.working_dir.as_deref().unwrap_or(DEFAULT_WORKING_DIR);
  let layout = EnvLayout::new(Path::new(working_dir), &env);
  let challenge_timeout = config.challenge_timeout_secs.map(Duration::from_secs);

  Ok(Settings {
    context: WorkflowContext {
      project_id,
      user_email,
      subject,
      acme_server,
      key_size,
      layout,
      challenge_timeout,
    },
    renew_before_days: config.renew_before_days.unwrap_or(DEFAULT_RENEW_BEFORE_DAYS),
  })
}

fn required_field(value: &Option<String>, name: &'static str) -> Result<String, anyhow::Error> {
  let v = value.as_ref().ok_or_else(|| anyhow!("Missing required config field: {name}"))?;
  ensure!(!v.trim().is_empty(), "Config field {name} must not be empty");
  Ok(v.clone())
}

/* ----------------------- */
