use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const REFRESH_TOKEN_VAR: &str = "SPOTIFY_REFRESH_TOKEN";

/// What the sync commands need to act on a user's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("Could not read credentials file at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Could not parse credentials file at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Could not write credentials file at {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// `~/.bbc-to-spotify/credentials.json`
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".bbc-to-spotify").join("credentials.json"))
}

/// Credentials from the environment, only if all three variables are set.
pub fn credentials_from_env() -> Option<Credentials> {
    credentials_from_vars(|name| std::env::var(name).ok())
}

fn credentials_from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Credentials> {
    Some(Credentials {
        client_id: var(CLIENT_ID_VAR)?,
        client_secret: var(CLIENT_SECRET_VAR)?,
        refresh_token: var(REFRESH_TOKEN_VAR)?,
    })
}

/// A missing file is `Ok(None)`; a file that exists but can't be read or
/// parsed is an error.
pub fn read_credentials_file(path: &Path) -> Result<Option<Credentials>, CredentialsError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            log::debug!("No credentials file found at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(CredentialsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let credentials = serde_json::from_str(&contents).map_err(|source| {
        log::error!("Error parsing credentials file");
        CredentialsError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(Some(credentials))
}

pub fn write_credentials_file(
    path: &Path,
    credentials: &Credentials,
) -> Result<(), CredentialsError> {
    let write_error = |source| CredentialsError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let contents = serde_json::to_string_pretty(credentials).map_err(|error| {
        write_error(io::Error::new(io::ErrorKind::InvalidData, error))
    })?;
    std::fs::write(path, contents).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(write_error)?;
    }

    Ok(())
}

/// Environment variables first, then the credentials file.
pub fn find_credentials(path: Option<&Path>) -> Result<Option<Credentials>, CredentialsError> {
    log::info!("Getting credentials");

    if let Some(credentials) = credentials_from_env() {
        log::info!("Read credentials from environment variables");
        return Ok(Some(credentials));
    }

    log::debug!("Environment variable credentials not found, checking for credentials file");

    let Some(path) = path else {
        log::debug!("No credentials file location available");
        return Ok(None);
    };

    let credentials = read_credentials_file(path)?;
    if credentials.is_some() {
        log::info!("Read credentials from {}", path.display());
    }

    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
            refresh_token: "refresh".into(),
        }
    }

    #[test]
    fn test_credentials_from_vars_requires_all_three() {
        let mut vars = HashMap::from([
            (CLIENT_ID_VAR, "id".to_string()),
            (CLIENT_SECRET_VAR, "secret".to_string()),
        ]);

        assert!(credentials_from_vars(|name| vars.get(name).cloned()).is_none());

        vars.insert(REFRESH_TOKEN_VAR, "refresh".to_string());
        assert_eq!(
            credentials_from_vars(|name| vars.get(name).cloned()),
            Some(credentials())
        );
    }

    #[test]
    fn test_write_then_read_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        write_credentials_file(&path, &credentials()).unwrap();

        assert_eq!(read_credentials_file(&path).unwrap(), Some(credentials()));
    }

    #[test]
    fn test_missing_credentials_file_is_none() {
        let dir = tempfile::tempdir().unwrap();

        let result = read_credentials_file(&dir.path().join("credentials.json")).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_credentials_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"client_id": "id"}"#).unwrap();

        let error = read_credentials_file(&path).unwrap_err();

        assert!(matches!(error, CredentialsError::Parse { .. }));
        assert!(error.to_string().contains("Could not parse credentials file"));
    }
}
