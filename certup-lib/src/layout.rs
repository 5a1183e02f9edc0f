use std::path::{Path, PathBuf};

/// Per-environment output layout. Every filename carries the environment tag
/// so multiple environments can share one working directory without
/// colliding. Single writer is assumed; there is no locking against a second
/// run mutating the same directory concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayout {
  env: String,
  dir: PathBuf,
}

impl EnvLayout {
  pub fn new(working_dir: &Path, env: &str) -> Self {
    Self {
      env: env.to_string(),
      dir: working_dir.join(env),
    }
  }

  pub fn env(&self) -> &str {
    &self.env
  }

  /// Environment directory holding all generated files
  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn private_key(&self) -> PathBuf {
    self.dir.join(format!("private_{}.key", self.env))
  }

  pub fn csr(&self) -> PathBuf {
    self.dir.join(format!("csr_{}.pem", self.env))
  }

  /// Issued leaf certificate
  pub fn certificate(&self) -> PathBuf {
    self.dir.join(format!("certificate_{}.pem", self.env))
  }

  /// Intermediate chain
  pub fn intermediate_cert(&self) -> PathBuf {
    self.dir.join(format!("intermediate_cert_{}.pem", self.env))
  }

  /// Full chain (leaf + intermediates)
  pub fn full_cert(&self) -> PathBuf {
    self.dir.join(format!("full_cert_{}.pem", self.env))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn env_tagged_paths() {
    let layout = EnvLayout::new(Path::new("/work"), "staging");
    assert_eq!(layout.dir(), Path::new("/work/staging"));
    assert_eq!(layout.private_key(), PathBuf::from("/work/staging/private_staging.key"));
    assert_eq!(layout.csr(), PathBuf::from("/work/staging/csr_staging.pem"));
    assert_eq!(layout.certificate(), PathBuf::from("/work/staging/certificate_staging.pem"));
    assert_eq!(
      layout.intermediate_cert(),
      PathBuf::from("/work/staging/intermediate_cert_staging.pem")
    );
    assert_eq!(layout.full_cert(), PathBuf::from("/work/staging/full_cert_staging.pem"));
  }

  #[test]
  fn environments_do_not_collide() {
    let staging = EnvLayout::new(Path::new("."), "staging");
    let production = EnvLayout::new(Path::new("."), "production");
    assert_ne!(staging.certificate(), production.certificate());
  }
}
