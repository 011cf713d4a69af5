#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(60);

/// Empty config file so a developer's own config never leaks into tests.
fn default_config() -> PathBuf {
    static CONFIG_DIR: OnceLock<TempDir> = OnceLock::new();
    let dir = CONFIG_DIR.get_or_init(|| {
        let dir = tempfile::tempdir().expect("failed to create config dir for tests");
        std::fs::write(dir.path().join("config.toml"), "").expect("failed to write test config");
        dir
    });
    dir.path().join("config.toml")
}

/// Create a configured `radiofind` command suitable for integration tests.
#[allow(dead_code)]
pub fn radiofind_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("radiofind"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("RADIOFIND_CONFIG", default_config());
    cmd.env_remove("RADIOFIND_OUTPUT_FORMAT");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write `content` as a config file inside `dir` and return its path.
#[allow(dead_code)]
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, content).expect("failed to write config");
    path
}
