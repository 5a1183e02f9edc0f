use serde::Deserialize;
use std::fs;

/// Raw configuration file contents. Everything is optional at this layer;
/// presence of required fields is enforced by `build_settings`.
#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct ConfigToml {
  pub project_id: Option<String>,
  pub user_email: Option<String>,
  pub country: Option<String>,
  pub state: Option<String>,
  pub locality: Option<String>,
  pub organization: Option<String>,
  pub org_unit: Option<String>,
  pub common_name: Option<String>,
  pub acme_server: Option<String>,
  pub env: Option<String>,
  pub key_size: Option<u32>,
  pub working_dir: Option<String>,
  pub renew_before_days: Option<u32>,
  pub challenge_timeout_secs: Option<u64>,
}

impl ConfigToml {
  pub fn new(config_file: &str) -> Result<Self, anyhow::Error> {
    let config_str = fs::read_to_string(config_file)?;
    ::toml::from_str(&config_str).map_err(|e| anyhow::anyhow!(e))
  }
}
