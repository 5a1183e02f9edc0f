use crate::{
  constants::{EAB_KEY_CREATOR_ROLE, GCLOUD_BIN, PUBLIC_CA_SERVICE},
  error::*,
  log::*,
  runner::CommandRunner,
};
use base64::{
  alphabet,
  engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
  Engine,
};
use serde::Deserialize;

/// The remote service emits url-safe base64; padding varies, so accept both
const B64_MAC_KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
  &alphabet::URL_SAFE,
  GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/* ------------------------------------------------ */
/// EAB credential minted by the Public CA service. Never persisted: the key
/// is single-use for registration and is consumed in the same run.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EabCredential {
  /// EAB key id
  pub key_id: String,
  /// HMAC key, url-safe base64
  pub b64_mac_key: String,
}

/* ------------------------------------------------ */
/// Grant the executing identity permission to create EAB keys. Idempotent on
/// the remote side; a denied binding is fatal since no later step can work.
pub async fn grant_eab_permission(runner: &dyn CommandRunner, project: &str, member: &str) -> Result<()> {
  info!("Granting EAB key creation permission to {member} on {project}");
  let member_arg = format!("--member=user:{member}");
  let role_arg = format!("--role={EAB_KEY_CREATOR_ROLE}");
  let out = runner
    .run(
      GCLOUD_BIN,
      &["projects", "add-iam-policy-binding", project, &member_arg, &role_arg],
    )
    .await?;
  if !out.success {
    return Err(CertupError::PermissionDenied(out.stderr.trim().to_string()));
  }
  info!("IAM binding applied");
  Ok(())
}

/// Enable the Public CA service. Idempotent and best-effort: a failure is
/// surfaced as a warning and left to the EAB key request to report for real.
pub async fn enable_service(runner: &dyn CommandRunner, project: &str) -> Result<()> {
  info!("Enabling {PUBLIC_CA_SERVICE}");
  let project_arg = format!("--project={project}");
  let out = runner
    .run(GCLOUD_BIN, &["services", "enable", PUBLIC_CA_SERVICE, &project_arg])
    .await?;
  if !out.success {
    warn!("Enabling {PUBLIC_CA_SERVICE} reported: {}", out.stderr.trim());
  }
  Ok(())
}

/// Request a fresh EAB key pair from the Public CA service
pub async fn request_eab_key(runner: &dyn CommandRunner, project: &str) -> Result<EabCredential> {
  info!("Requesting a fresh EAB key pair");
  let project_arg = format!("--project={project}");
  let out = runner
    .run(
      GCLOUD_BIN,
      &[
        "publicca",
        "external-account-keys",
        "create",
        "--format=json",
        &project_arg,
      ],
    )
    .await?;
  if !out.success {
    return Err(CertupError::EabRequest(out.stderr.trim().to_string()));
  }
  parse_eab_credential(&out.stdout)
}

/// Parse the single JSON object returned by the key creation call. Both
/// `keyId` and `b64MacKey` are required and the MAC key must decode as
/// url-safe base64; anything else is a fatal parse error.
pub(crate) fn parse_eab_credential(raw: &str) -> Result<EabCredential> {
  let credential: EabCredential =
    serde_json::from_str(raw.trim()).map_err(|e| CertupError::CredentialParse(e.to_string()))?;
  if credential.key_id.is_empty() || credential.b64_mac_key.is_empty() {
    return Err(CertupError::CredentialParse(
      "keyId and b64MacKey must be non-empty".to_string(),
    ));
  }
  B64_MAC_KEY_ENGINE
    .decode(&credential.b64_mac_key)
    .map_err(|e| CertupError::CredentialParse(format!("b64MacKey is not valid base64: {e}")))?;
  Ok(credential)
}

/* ------------------------------------------------ */
#[cfg(test)]
mod tests {
  use super::*;
  use crate::runner::mock::{failed_output, ok_output, MockRunner};

  const VALID_REPLY: &str = r#"{
    "b64MacKey": "c2VjcmV0LW1hYy1rZXk",
    "keyId": "e08b1cbf6d1ceea2a6c77123b0123456",
    "name": "projects/example/locations/global/externalAccountKeys/e08b1cbf"
  }"#;

  #[test]
  fn parses_credential_and_ignores_extra_fields() {
    let credential = parse_eab_credential(VALID_REPLY).unwrap();
    assert_eq!(credential.key_id, "e08b1cbf6d1ceea2a6c77123b0123456");
    assert_eq!(credential.b64_mac_key, "c2VjcmV0LW1hYy1rZXk");
  }

  #[test]
  fn missing_key_id_is_a_parse_error() {
    let raw = r#"{"b64MacKey": "c2VjcmV0"}"#;
    assert!(matches!(
      parse_eab_credential(raw),
      Err(CertupError::CredentialParse(_))
    ));
  }

  #[test]
  fn missing_mac_key_is_a_parse_error() {
    let raw = r#"{"keyId": "abc123"}"#;
    assert!(matches!(
      parse_eab_credential(raw),
      Err(CertupError::CredentialParse(_))
    ));
  }

  #[test]
  fn padded_and_unpadded_mac_keys_both_parse() {
    let unpadded = r#"{"keyId": "abc123", "b64MacKey": "c2VjcmV0LW1hYy1rZXk"}"#;
    assert!(parse_eab_credential(unpadded).is_ok());
    let padded = r#"{"keyId": "abc123", "b64MacKey": "c2VjcmV0LW1hYy1rZXk="}"#;
    assert!(parse_eab_credential(padded).is_ok());
  }

  #[test]
  fn non_base64_mac_key_is_a_parse_error() {
    let raw = r#"{"keyId": "abc123", "b64MacKey": "not base64 !!"}"#;
    assert!(matches!(
      parse_eab_credential(raw),
      Err(CertupError::CredentialParse(_))
    ));
  }

  #[tokio::test]
  async fn denied_iam_binding_is_fatal() {
    let runner = MockRunner::new(|invocation| {
      if invocation.line().contains("add-iam-policy-binding") {
        Ok(failed_output("PERMISSION_DENIED"))
      } else {
        Ok(ok_output(""))
      }
    });
    let res = grant_eab_permission(&runner, "example-project", "ops@example.com").await;
    assert!(matches!(res, Err(CertupError::PermissionDenied(_))));
  }

  #[tokio::test]
  async fn request_parses_remote_reply() {
    let runner = MockRunner::new(|invocation| {
      assert_eq!(invocation.program, GCLOUD_BIN);
      Ok(ok_output(VALID_REPLY))
    });
    let credential = request_eab_key(&runner, "example-project").await.unwrap();
    assert_eq!(credential.key_id, "e08b1cbf6d1ceea2a6c77123b0123456");
  }
}
