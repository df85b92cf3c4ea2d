//! src/identity.rs
//!
//! Who and where the navigator runs, resolved once at startup and passed to
//! the path bar.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::fs::owner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub host: String,
    pub home: Option<PathBuf>,
}

impl Identity {
    #[must_use]
    pub fn resolve() -> Self {
        Self {
            user: owner::current_user_name().unwrap_or_else(|| "?".to_string()),
            host: owner::host_name().unwrap_or_else(|| "?".to_string()),
            home: BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
        }
    }

    /// `user@host:` prompt prefix.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("{}@{}:", self.user, self.host)
    }

    /// `path` with the home directory abbreviated to `~`.
    #[must_use]
    pub fn abbreviate(&self, path: &Path) -> String {
        if let Some(home) = &self.home {
            if let Ok(rest) = path.strip_prefix(home) {
                return if rest.as_os_str().is_empty() {
                    "~".to_string()
                } else {
                    format!("~/{}", rest.display())
                };
            }
        }
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident() -> Identity {
        Identity {
            user: "ann".into(),
            host: "box".into(),
            home: Some(PathBuf::from("/home/ann")),
        }
    }

    #[test]
    fn home_is_abbreviated() {
        let id = ident();
        assert_eq!(id.abbreviate(Path::new("/home/ann")), "~");
        assert_eq!(id.abbreviate(Path::new("/home/ann/src/x")), "~/src/x");
        assert_eq!(id.abbreviate(Path::new("/home/annie")), "/home/annie");
        assert_eq!(id.abbreviate(Path::new("/etc")), "/etc");
    }

    #[test]
    fn prompt_format() {
        assert_eq!(ident().prompt(), "ann@box:");
    }
}
