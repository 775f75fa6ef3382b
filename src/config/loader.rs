//! Loading training specifications from YAML files

use super::schema::TrainSpec;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read and parse a YAML training specification.
///
/// The spec is not validated; call [`validate_spec`](super::validate_spec)
/// before training.
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<TrainSpec> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| {
        Error::io(format!("Failed to read config file {}", path.display()), e)
    })?;
    parse_spec(&yaml, path)
}

/// Parse YAML text; `path` is only used in error messages.
pub fn parse_spec(yaml: &str, path: &Path) -> Result<TrainSpec> {
    serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_spec_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "runtime:\n  backend: tf\ntraining:\n  epochs: 4").unwrap();

        let spec = load_spec(file.path()).unwrap();
        assert_eq!(spec.runtime.backend, "tf");
        assert_eq!(spec.training.epochs, 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_spec("/nonexistent/convnp.yaml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/convnp.yaml"));
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        let err = parse_spec("training: [unclosed", Path::new("bad.yaml")).unwrap_err();
        match err {
            Error::ConfigParse { path, .. } => assert_eq!(path, Path::new("bad.yaml")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = parse_spec("training:\n  epochs: many", Path::new("x.yaml")).unwrap_err();
        assert!(err.is_config_error());
    }
}
