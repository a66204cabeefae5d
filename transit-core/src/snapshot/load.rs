//! Reading network definitions from JSON files.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{LoadError, NetworkDefinition};

/// Read and parse a network definition file.
///
/// # Errors
///
/// Fails if the file cannot be read or is not a valid definition.
pub fn load_definition(path: impl AsRef<Path>) -> Result<NetworkDefinition, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let definition: NetworkDefinition =
        serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        path = %path.display(),
        stops = definition.stops.len(),
        trips = definition.trips.len(),
        transfers = definition.transfers.len(),
        "loaded network definition"
    );
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"config": {{"time_zone": "Europe/Oslo"}},
                "stops": [{{"id": "A", "name": "Alpha"}}], "routes": [], "trips": []}}"#
        )
        .unwrap();

        let def = load_definition(file.path()).unwrap();
        assert_eq!(def.stops.len(), 1);
        assert_eq!(def.config.time_zone, "Europe/Oslo");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_definition(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stops": [{{"id": ""}}]}}"#).unwrap();

        let err = load_definition(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }
}
