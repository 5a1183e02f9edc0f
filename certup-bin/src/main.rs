mod config;
mod constants;
mod error;
mod log;

use crate::{
  config::{build_settings, parse_opts, ConfigToml, Opts, WorkflowKind},
  error::{bail, Context},
  log::*,
};
use certup_lib::ExecRunner;
use std::path::Path;

fn main() {
  init_logger();

  let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
  runtime_builder.enable_all();
  runtime_builder.thread_name("certup");
  let runtime = runtime_builder.build().unwrap();

  runtime.block_on(async {
    let Ok(parsed_opts) = parse_opts() else {
      error!("Invalid command line arguments");
      std::process::exit(1);
    };

    if let Err(e) = certup_service(parsed_opts).await {
      error!("certup exited with error: {e}");
      std::process::exit(1);
    }
  });
}

async fn certup_service(opts: Opts) -> Result<(), anyhow::Error> {
  let config_toml = ConfigToml::new(&opts.config_file_path)
    .with_context(|| format!("Invalid config file: {}", opts.config_file_path))?;
  let settings = build_settings(&config_toml)?;
  let runner = ExecRunner;

  match opts.kind {
    WorkflowKind::Issue => {
      info!("Start certificate issuance workflow");
      let bundle = certup_lib::run_issuance(&runner, &settings.context).await?;
      info!("Issued certificate: {}", bundle.leaf.display());
      info!("Intermediate chain: {}", bundle.intermediate.display());
      info!("Full chain: {}", bundle.full_chain.display());
    }
    WorkflowKind::Renew => {
      info!("Start renewal check");
      let cert_path = settings.context.layout.certificate();
      match renewal_decision(&cert_path, settings.renew_before_days)? {
        RenewalDecision::MissingCertificate => {
          warn!(
            "No certificate at {}, the issue workflow must run first",
            cert_path.display()
          );
          bail!("nothing to renew: no certificate has been issued yet");
        }
        RenewalDecision::Renew => certup_lib::renew(&runner).await?,
        RenewalDecision::StillValid => {
          info!("Certificate at {} is still valid, nothing to do", cert_path.display());
        }
      }
    }
  }
  Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenewalDecision {
  MissingCertificate,
  Renew,
  StillValid,
}

/// A missing certificate means nothing was issued yet; forced renewal cannot
/// perform a first issuance, so that case is routed to the issue workflow
/// instead of invoking the ACME client's renew operation.
fn renewal_decision(cert_path: &Path, renew_before_days: u32) -> Result<RenewalDecision, anyhow::Error> {
  if !cert_path.exists() {
    return Ok(RenewalDecision::MissingCertificate);
  }
  if certup_certs::needs_renewal(cert_path, renew_before_days)? {
    Ok(RenewalDecision::Renew)
  } else {
    Ok(RenewalDecision::StillValid)
  }
}
