/// Default RSA modulus size in bits
pub const DEFAULT_KEY_SIZE: u32 = 2048;

/// Accepted RSA modulus sizes
pub const ALLOWED_KEY_SIZES: &[u32] = &[2048, 4096];

/// Default base directory for per-environment output
pub const DEFAULT_WORKING_DIR: &str = ".";

/// Default renewal margin in days. Zero reproduces the strictly-after-expiry
/// rule; operators wanting pre-expiry renewal set `renew_before_days`.
pub const DEFAULT_RENEW_BEFORE_DAYS: u32 = 0;
