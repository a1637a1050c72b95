//! Settings file loader.
//!
//! A settings file is a list of syntax directives, one per line, fed to a
//! [`ProfileBuilder`]:
//!
//! ```text
//! # infix arithmetic with symbolic spellings
//! (op)
//! add +
//! mult *
//! [op sub -]
//! left=
//! ```
//!
//! The first bad directive stops the load; its 1-based line number is
//! reported in the [`ConfigError`].

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

use crate::script::{EvalError, ProfileBuilder, SyntaxProfile};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("line {line}: {source}")]
    Directive {
        line: usize,
        #[source]
        source: EvalError,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Line of the offending directive, if the error came from one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::Directive { line, .. } => Some(*line),
            ConfigError::Io { .. } => None,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Build a profile from settings text.
pub fn load_str(s: &str) -> Result<SyntaxProfile, ConfigError> {
    let mut builder = ProfileBuilder::new();
    let mut last_line = 0;
    for (i, raw) in s.lines().enumerate() {
        last_line = i + 1;
        builder
            .apply(raw)
            .map_err(|source| ConfigError::Directive { line: i + 1, source })?;
    }
    // Ambiguities only show up once every spelling is known; blame the end of
    // the file.
    builder.build().map_err(|source| ConfigError::Directive {
        line: last_line.max(1),
        source,
    })
}

/// Read and parse a settings file from disk.
pub fn load_file(path: &Path) -> Result<SyntaxProfile, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    let profile = load_str(&s)?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(profile)
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Search for a settings file in the standard locations.
///
/// `./rebind.cfg` first, then `syntax.cfg` in the platform config directory.
/// Returns the first path that exists, or `None`.
pub fn find_settings() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from("./rebind.cfg")];
    if let Some(dirs) = ProjectDirs::from("", "", "rebind") {
        candidates.push(dirs.config_dir().join("syntax.cfg"));
    }
    candidates.into_iter().find(|p| p.exists())
}

/// Load `explicit` if given, else the first file [`find_settings`] finds,
/// else the default profile.
pub fn resolve_profile(explicit: Option<&Path>) -> Result<SyntaxProfile, ConfigError> {
    match explicit.map(Path::to_path_buf).or_else(find_settings) {
        Some(path) => load_file(&path),
        None => {
            tracing::debug!("no settings file, using the default profile");
            Ok(SyntaxProfile::default())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::script::{AssignDirection, BinaryMode, CanonicalOp, UnaryMode};

    #[test]
    fn empty_file_is_default_profile() {
        let profile = load_str("").unwrap();
        assert_eq!(profile.spelling_of(CanonicalOp::Add), "add");
        assert_eq!(profile.binary_mode(), BinaryMode::SpellingCall);
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let profile = load_str("# a comment\n\n   \n# another\nadd plus\n").unwrap();
        assert_eq!(profile.resolve_spelling("plus"), Some(CanonicalOp::Add));
    }

    #[test]
    fn realistic_settings() {
        let src = "\
# symbolic arithmetic\n\
(op)\n\
add +\n\
sub -\n\
mult *\n\
[op div /]\n\
\n\
right=\n\
= =>\n\
";
        let profile = load_str(src).unwrap();
        assert_eq!(profile.binary_mode(), BinaryMode::InfixSymbol);
        assert_eq!(profile.unary_mode(), UnaryMode::SpellingThenOperand);
        assert_eq!(profile.assign_direction(), AssignDirection::VariableRight);
        assert_eq!(profile.resolve_spelling("/"), Some(CanonicalOp::Div));
        assert_eq!(profile.spelling_of(CanonicalOp::Assign), "=>");
    }

    #[test]
    fn bad_directive_reports_line() {
        let err = load_str("add plus\n\nfrobnicate x\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(
            err,
            ConfigError::Directive { source: EvalError::ConfigConflict(_), .. }
        ));
        assert!(err.to_string().starts_with("line 3:"));
    }

    #[test]
    fn ambiguous_spellings_rejected() {
        let err = load_str("add x\nsub x\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Directive { source: EvalError::ConfigConflict(_), .. }
        ));
    }

    #[test]
    fn load_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "()op").unwrap();
        let profile = load_file(file.path()).unwrap();
        assert_eq!(profile.unary_mode(), UnaryMode::OperandThenSpelling);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.cfg")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn explicit_path_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not ~").unwrap();
        let profile = resolve_profile(Some(file.path())).unwrap();
        assert_eq!(profile.resolve_spelling("~"), Some(CanonicalOp::Not));
    }
}
