use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::DefaultPathProvider;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file does not contain valid utf8")]
    InvalidFileUtf8,

    #[error("failed to parse toml: {0}")]
    Parse(#[from] toml::de::Error),
}

pub trait FromToml: Sized {
    /// Parses the configuration from an in-memory TOML document.
    ///
    /// # Errors
    /// Returns `Error::Parse` if the document is not valid TOML for `Self`.
    fn from_toml_str(contents: &str) -> Result<Self, Error>
    where
        Self: DeserializeOwned,
    {
        Ok(toml::from_str(contents)?)
    }

    /// Reads a TOML file from the specified path, or the default path if none is provided.
    /// Returns the parsed configuration and the path used.
    ///
    /// # Errors
    /// Fails if the file is missing or unreadable, is not utf8, or does not parse.
    #[tracing::instrument]
    fn from_toml_path<P>(path: Option<P>) -> impl Future<Output = Result<(Self, P), Error>> + Send
    where
        P: std::fmt::Debug + AsRef<Path> + From<PathBuf> + Send,
        Self: DeserializeOwned + DefaultPathProvider,
    {
        async move {
            let path = match path {
                Some(path) => path,
                None => P::from(Self::default_path()),
            };

            info!(file = %path.as_ref().display(), "reading toml");

            let file_contents = tokio::fs::read(path.as_ref()).await.map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    Error::FileNotFound(path.as_ref().into())
                } else {
                    Error::Io {
                        path: path.as_ref().into(),
                        source: e,
                    }
                }
            })?;

            let contents = String::from_utf8(file_contents).map_err(|_| Error::InvalidFileUtf8)?;
            let result = Self::from_toml_str(&contents)?;
            Ok((result, path))
        }
    }

    /// Like [`FromToml::from_toml_path`], but a missing file yields `Self::default()`.
    /// Any other failure is still returned.
    ///
    /// # Errors
    /// Fails if the file exists but cannot be read or parsed.
    fn from_toml_path_or_default<P>(
        path: Option<P>,
    ) -> impl Future<Output = Result<Self, Error>> + Send
    where
        P: std::fmt::Debug + AsRef<Path> + From<PathBuf> + Send,
        Self: DeserializeOwned + DefaultPathProvider + Default,
    {
        async move {
            match Self::from_toml_path(path).await {
                Ok((config, _)) => Ok(config),
                Err(Error::FileNotFound(path)) => {
                    warn!(file = %path.display(), "config file missing, using defaults");
                    Ok(Self::default())
                }
                Err(e) => Err(e),
            }
        }
    }
}

impl<T> FromToml for T where T: DeserializeOwned + DefaultPathProvider {}

#[cfg(test)]
mod tests {
    use color_eyre::Result;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct TestConfig {
        name: String,
        rounds: i32,
    }

    impl DefaultPathProvider for TestConfig {
        const DEFAULT_FILENAME: &'static str = "test/config.toml";
    }

    #[tokio::test]
    async fn test_from_toml_path() -> Result<()> {
        let (config, path) = TestConfig::from_toml_path::<PathBuf>(None).await?;
        assert_eq!(config.name, "ratchet");
        assert_eq!(config.rounds, 3);
        assert_eq!(path, PathBuf::from("test/config.toml"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = TestConfig::from_toml_path(Some(PathBuf::from("test/missing.toml"))).await;
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_file_or_default() -> Result<()> {
        let config =
            TestConfig::from_toml_path_or_default(Some(PathBuf::from("test/missing.toml"))).await?;
        assert!(config.name.is_empty());
        assert_eq!(config.rounds, 0);
        Ok(())
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = TestConfig::from_toml_str("name = ");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
