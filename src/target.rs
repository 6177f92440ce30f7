//! The program being rebuilt and restarted.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A resolved build target.
/// Only executable packages can be targets.
pub struct BuildTarget {
    pub import_path: String,
    pub package_name: String,
    pub binary: PathBuf,
}

impl BuildTarget {
    pub fn new<P: Into<PathBuf>>(
        import_path: &str,
        package_name: &str,
        binary: P,
    ) -> anyhow::Result<BuildTarget> {
        if package_name != "main" {
            anyhow::bail!(r#"expected package "main", got "{}""#, package_name);
        }
        Ok(BuildTarget {
            import_path: import_path.to_string(),
            package_name: package_name.to_string(),
            binary: binary.into(),
        })
    }

    /// Name of the installed executable, used in logs.
    pub fn name(&self) -> &str {
        self.binary
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.import_path)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[cfg(test)]
mod tests {
    use super::BuildTarget;
    use std::path::Path;

    #[test]
    fn only_main_packages() {
        let target = BuildTarget::new("example.com/hello", "main", "/go/bin/hello").unwrap();
        assert_eq!(target.name(), "hello");
        assert_eq!(target.binary(), Path::new("/go/bin/hello"));

        let err = BuildTarget::new("strings", "strings", "").unwrap_err();
        assert_eq!(err.to_string(), r#"expected package "main", got "strings""#);
    }
}
