use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Resolve the server home directory.
///
/// - `configured` wins when set; a leading `~` expands to the user's home.
/// - Otherwise `<platform base>/<default_subdir>` is used: `%APPDATA%` on
///   Windows, `$HOME` elsewhere.
/// - Relative results are made absolute against the current directory.
///
/// With `create` the directory is created when missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => expand_tilde(raw.trim())?,
        None => platform_base()?.join(default_subdir),
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home_dir '{}'", path.display()))?;
    }
    Ok(path)
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_home()?.join(rest));
    }
    Ok(Path::new(raw).to_path_buf())
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("cannot determine the user home directory"))
}

#[cfg(target_os = "windows")]
fn platform_base() -> Result<PathBuf> {
    std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .ok_or_else(|| anyhow!("APPDATA is not set"))
}

#[cfg(not(target_os = "windows"))]
fn platform_base() -> Result<PathBuf> {
    user_home()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let want = tmp.path().join("nested/home");
        let got = resolve_home_dir(Some(want.to_string_lossy().to_string()), ".x", true).unwrap();
        assert_eq!(got, want);
        assert!(got.is_dir());
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let got = resolve_home_dir(Some("some/rel".into()), ".x", false).unwrap();
        assert!(got.is_absolute());
        assert!(got.ends_with("some/rel"));
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn tilde_expands_to_user_home() {
        let got = resolve_home_dir(Some("~/.company_test".into()), ".x", false).unwrap();
        assert!(got.is_absolute());
        assert!(!got.to_string_lossy().starts_with('~'));
        assert!(got.ends_with(".company_test"));
    }
}
