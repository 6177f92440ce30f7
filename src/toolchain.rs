//! Everything that depends on the conventions of the build toolchain.
//!
//! The go tool prints the packages it rebuilds to stderr when installing with `-v`,
//! and its compile errors end up on stdout.
//! So an install with something on stdout failed, one with something on stderr
//! rebuilt the program, and one that printed nothing had nothing to do.
//! Any unrelated message on stderr is therefore taken for a rebuild.
//! Other toolchains can provide their own `classify`.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::target::BuildTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The program was rebuilt and installed.
    Success,
    /// The program does not compile.
    Failure,
    /// The installed program was already up to date.
    NoChange,
}

#[derive(Debug, Clone, Default)]
/// Raw output of one toolchain invocation.
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub success: bool,
}

pub trait Toolchain {
    /// Find the package behind an import path and where its binary is installed.
    fn resolve(&self, import_path: &str) -> anyhow::Result<BuildTarget>;

    /// Build and install the target.
    /// An error means the toolchain could not be run at all,
    /// compile errors are in the captured output.
    fn install(&self, target: &BuildTarget) -> anyhow::Result<Captured>;

    fn classify(&self, captured: &Captured) -> Outcome {
        classify_streams(captured)
    }
}

/// Classify an install only by which output streams are empty.
pub fn classify_streams(captured: &Captured) -> Outcome {
    if !captured.stdout.is_empty() {
        Outcome::Failure
    } else if !captured.stderr.is_empty() {
        Outcome::Success
    } else {
        Outcome::NoChange
    }
}

/// The go command.
pub struct GoToolchain {
    go: PathBuf,
}

impl GoToolchain {
    /// Find the go executable, either a path or a name in the PATH.
    pub fn new(compiler: &str) -> anyhow::Result<GoToolchain> {
        let go = which::which(compiler).context(format!(
            "Could not find {}. Are you sure it's in your PATH?",
            compiler
        ))?;
        log::debug!("Using go at {}", go.display());
        Ok(GoToolchain { go })
    }

    pub fn path(&self) -> &Path {
        &self.go
    }
}

impl Toolchain for GoToolchain {
    fn resolve(&self, import_path: &str) -> anyhow::Result<BuildTarget> {
        let output = Command::new(&self.go)
            .arg("list")
            .arg("-json")
            .arg(import_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .context(format!("Failed to run {} list", self.go.display()))?;
        if !output.status.success() {
            anyhow::bail!(
                "Could not resolve {}:\n{}",
                import_path,
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }
        parse_go_list(import_path, &output.stdout)
    }

    fn install(&self, target: &BuildTarget) -> anyhow::Result<Captured> {
        let output = Command::new(&self.go)
            .arg("install")
            .arg("-v")
            .arg(&target.import_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .context(format!("Failed to run {} install", self.go.display()))?;
        Ok(Captured {
            stdout: output.stdout,
            stderr: output.stderr,
            success: output.status.success(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackage {
    name: String,
    #[serde(default)]
    target: String,
}

fn parse_go_list(import_path: &str, json: &[u8]) -> anyhow::Result<BuildTarget> {
    let package: GoPackage = serde_json::from_slice(json)
        .context(format!("Invalid output of go list for {}", import_path))?;
    let target = BuildTarget::new(import_path, &package.name, &package.target)?;
    if package.target.is_empty() {
        anyhow::bail!("go does not know where to install {}", import_path);
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::{classify_streams, parse_go_list, Captured, Outcome};
    use std::path::Path;

    #[test]
    fn classification() {
        let helper = |stdout: &str, stderr: &str, expected: Outcome| {
            for success in [true, false] {
                let captured = Captured {
                    stdout: stdout.as_bytes().to_vec(),
                    stderr: stderr.as_bytes().to_vec(),
                    success,
                };
                assert_eq!(classify_streams(&captured), expected);
            }
        };

        helper("", "", Outcome::NoChange);
        helper("", "example.com/hello\n", Outcome::Success);
        helper("./main.go:4:1: syntax error\n", "", Outcome::Failure);
        helper("./main.go:4:1: syntax error\n", "example.com/hello\n", Outcome::Failure);
    }

    #[test]
    fn go_list_main_package() {
        let json = br#"{
            "Dir": "/home/gopher/hello",
            "ImportPath": "example.com/hello",
            "Name": "main",
            "Target": "/home/gopher/go/bin/hello",
            "GoFiles": ["main.go"]
        }"#;
        let target = parse_go_list("example.com/hello", json).unwrap();
        assert_eq!(target.import_path, "example.com/hello");
        assert_eq!(target.binary, Path::new("/home/gopher/go/bin/hello"));
    }

    #[test]
    fn go_list_errors() {
        let library = br#"{"ImportPath": "strings", "Name": "strings", "Target": ""}"#;
        let err = parse_go_list("strings", library).unwrap_err();
        assert!(err.to_string().contains(r#"expected package "main", got "strings""#));

        let no_target = br#"{"ImportPath": "example.com/hello", "Name": "main"}"#;
        assert!(parse_go_list("example.com/hello", no_target).is_err());

        assert!(parse_go_list("example.com/hello", b"can't load package").is_err());
    }
}
