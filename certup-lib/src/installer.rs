use crate::{
  constants::{CERTBOT_BIN, GCLOUD_BIN},
  error::*,
  log::*,
  runner::CommandRunner,
};

/* ------------------------------------------------ */
/// One row of the installer strategy table: an external tool and its package
/// name under each supported package manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ToolSpec {
  pub(crate) binary: &'static str,
  pub(crate) apt_package: &'static str,
  pub(crate) brew_package: &'static str,
}

/// Tools every workflow step depends on
pub(crate) const REQUIRED_TOOLS: &[ToolSpec] = &[
  ToolSpec {
    binary: GCLOUD_BIN,
    apt_package: "google-cloud-cli",
    brew_package: "google-cloud-sdk",
  },
  ToolSpec {
    binary: CERTBOT_BIN,
    apt_package: "certbot",
    brew_package: "certbot",
  },
];

/* ------------------------------------------------ */
/// Host OS families with an installer strategy. Anything else is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
  Linux,
  MacOs,
}

impl PlatformFamily {
  /// Detect from the compile-target OS
  pub fn detect() -> Result<Self> {
    Self::from_os(std::env::consts::OS)
  }

  pub(crate) fn from_os(os: &str) -> Result<Self> {
    match os {
      "linux" => Ok(Self::Linux),
      "macos" => Ok(Self::MacOs),
      other => Err(CertupError::UnsupportedPlatform(other.to_string())),
    }
  }

  fn install_command(&self, spec: &ToolSpec) -> (&'static str, Vec<&'static str>) {
    match self {
      Self::Linux => ("apt-get", vec!["install", "-y", spec.apt_package]),
      Self::MacOs => ("brew", vec!["install", spec.brew_package]),
    }
  }
}

/* ------------------------------------------------ */
/// Ensure the required external tools are present, installing the missing
/// ones with the platform package manager. Running twice with everything
/// present performs no install calls.
pub async fn ensure_prerequisites(runner: &dyn CommandRunner) -> Result<()> {
  let platform = PlatformFamily::detect()?;
  ensure_tools(runner, platform, REQUIRED_TOOLS).await
}

pub(crate) async fn ensure_tools(
  runner: &dyn CommandRunner,
  platform: PlatformFamily,
  tools: &[ToolSpec],
) -> Result<()> {
  for spec in tools {
    if is_installed(runner, spec.binary).await? {
      info!("{} is already installed", spec.binary);
      continue;
    }
    info!("Installing {}", spec.binary);
    let (program, args) = platform.install_command(spec);
    let out = runner.run(program, &args).await?;
    if !out.success {
      // the package manager's own error is the only diagnostic we have
      return Err(CertupError::ToolInstall {
        tool: spec.binary.to_string(),
        detail: out.stderr.trim().to_string(),
      });
    }
  }
  Ok(())
}

async fn is_installed(runner: &dyn CommandRunner, binary: &str) -> Result<bool> {
  let probe = format!("command -v {binary}");
  let out = runner.run("sh", &["-c", &probe]).await?;
  Ok(out.success)
}

/* ------------------------------------------------ */
#[cfg(test)]
mod tests {
  use super::*;
  use crate::runner::mock::{failed_output, ok_output, MockRunner};

  #[test]
  fn platform_detection() {
    assert_eq!(PlatformFamily::from_os("linux").unwrap(), PlatformFamily::Linux);
    assert_eq!(PlatformFamily::from_os("macos").unwrap(), PlatformFamily::MacOs);
    assert!(matches!(
      PlatformFamily::from_os("windows"),
      Err(CertupError::UnsupportedPlatform(_))
    ));
  }

  #[tokio::test]
  async fn present_tools_trigger_no_install() {
    let runner = MockRunner::new(|_| Ok(ok_output("")));
    ensure_tools(&runner, PlatformFamily::Linux, REQUIRED_TOOLS)
      .await
      .unwrap();

    assert!(runner.calls_matching("apt-get").is_empty());
    assert!(runner.calls_matching("brew").is_empty());
    assert_eq!(runner.calls_matching("command -v").len(), REQUIRED_TOOLS.len());
  }

  #[tokio::test]
  async fn absent_tool_is_installed_with_platform_package() {
    let runner = MockRunner::new(|invocation| {
      if invocation.line().contains("command -v certbot") {
        Ok(failed_output(""))
      } else {
        Ok(ok_output(""))
      }
    });
    ensure_tools(&runner, PlatformFamily::MacOs, REQUIRED_TOOLS)
      .await
      .unwrap();

    assert_eq!(runner.calls_matching("brew install certbot").len(), 1);
    assert!(runner.calls_matching("brew install google-cloud-sdk").is_empty());
  }

  #[tokio::test]
  async fn failed_install_is_fatal() {
    let runner = MockRunner::new(|invocation| {
      if invocation.program == "sh" {
        Ok(failed_output(""))
      } else {
        Ok(failed_output("E: unable to locate package"))
      }
    });
    let res = ensure_tools(&runner, PlatformFamily::Linux, REQUIRED_TOOLS).await;
    assert!(matches!(res, Err(CertupError::ToolInstall { .. })));
    // fail-fast: the second tool is never attempted
    assert_eq!(runner.calls_matching("apt-get").len(), 1);
  }
}
