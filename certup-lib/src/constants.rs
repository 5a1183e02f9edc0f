/// Cloud CLI binary provisioning EAB credentials
pub const GCLOUD_BIN: &str = "gcloud";
/// ACME client binary handling registration and issuance
pub const CERTBOT_BIN: &str = "certbot";
/// TLS toolkit binary generating key material
pub const OPENSSL_BIN: &str = "openssl";

/// IAM role allowing the executing identity to mint EAB keys
pub const EAB_KEY_CREATOR_ROLE: &str = "roles/publicca.externalAccountKeyCreator";

/// Remote service that must be enabled before EAB keys can be requested
pub const PUBLIC_CA_SERVICE: &str = "publicca.googleapis.com";

/// Marker the ACME client prints when no account is registered for a server
pub(crate) const NO_ACCOUNT_MARKER: &str = "Could not find an existing account";

/// Generic sequential filenames the issuance tool emits next to the CSR.
/// Renamed into the environment-tagged layout right after issuance.
pub(crate) const ISSUED_CERT_FILE: &str = "0000_cert.pem";
pub(crate) const ISSUED_CHAIN_FILE: &str = "0000_chain.pem";
pub(crate) const ISSUED_FULL_CHAIN_FILE: &str = "0001_chain.pem";
