//! Failures while reading a `rowfit.toml`.

use std::path::PathBuf;

/// Why a legalizer configuration could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file is missing or unreadable.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was looked up.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Not valid TOML, or a key holds a value of the wrong type.
    #[error("malformed legalizer settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A well-typed setting outside its legal range.
    #[error("legalizer setting `{field}` {reason}")]
    Invalid {
        /// Dotted key, e.g. `legalizer.move_limit`.
        field: &'static str,
        /// The violated bound.
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_names_the_key() {
        let err = ConfigError::Invalid {
            field: "legalizer.move_limit",
            reason: "must be at least 2",
        };
        assert_eq!(
            err.to_string(),
            "legalizer setting `legalizer.move_limit` must be at least 2"
        );
    }

    #[test]
    fn read_error_keeps_path_and_source() {
        use std::error::Error as _;
        let err = ConfigError::Read {
            path: PathBuf::from("/work/rowfit.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "cannot read /work/rowfit.toml: no such file");
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_error_wraps_toml() {
        let toml_err = toml::from_str::<toml::Value>("seed = ").unwrap_err();
        let err = ConfigError::from(toml_err);
        assert!(err.to_string().starts_with("malformed legalizer settings:"));
    }
}
