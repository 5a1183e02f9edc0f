use crate::{
  error::*,
  installer, issuer,
  issuer::CertBundle,
  keygen,
  keygen::SubjectDn,
  layout::EnvLayout,
  log::*,
  provisioner, registrar,
  runner::CommandRunner,
};
use tokio::time::Duration;
use url::Url;

/* ------------------------------------------------ */
/// Validated workflow inputs, assembled once by the front-end from its
/// configuration source and immutable afterwards
#[derive(Debug, Clone)]
pub struct WorkflowContext {
  pub project_id: String,
  pub user_email: String,
  pub subject: SubjectDn,
  pub acme_server: Url,
  pub key_size: u32,
  pub layout: EnvLayout,
  /// Optional bound on the dns-01 suspension point; `None` waits indefinitely
  pub challenge_timeout: Option<Duration>,
}

/* ------------------------------------------------ */
/// First issuance, strictly linear and fail-fast: prerequisites →
/// credential provisioning → key/CSR generation → account registration →
/// issuance. The first fatal error aborts the run; completed steps are not
/// rolled back.
pub async fn run_issuance(runner: &dyn CommandRunner, ctx: &WorkflowContext) -> Result<CertBundle> {
  installer::ensure_prerequisites(runner).await?;

  provisioner::grant_eab_permission(runner, &ctx.project_id, &ctx.user_email).await?;
  provisioner::enable_service(runner, &ctx.project_id).await?;
  let credential = provisioner::request_eab_key(runner, &ctx.project_id).await?;

  let (_key_path, csr_path) = keygen::generate_keypair(runner, &ctx.subject, ctx.key_size, &ctx.layout).await?;

  registrar::ensure_registered(runner, &ctx.acme_server, &ctx.user_email, &credential).await?;

  let bundle = issuer::issue(runner, &ctx.acme_server, &csr_path, &ctx.layout, ctx.challenge_timeout).await?;
  info!("Issuance workflow completed for environment {}", ctx.layout.env());
  Ok(bundle)
}

/* ------------------------------------------------ */
