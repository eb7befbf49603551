use std::io::Error as IoError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::prelude::*;
use xdg::{BaseDirectories, BaseDirectoriesError};

/// Helper for using XDG base directories.
pub struct Xdg {
    base: BaseDirectories,
}

impl Xdg {
    /// Create a [`Xdg`]. All subsequent file system operations in XDG base
    /// directories will be performed in a subdirectory named prefix.
    ///
    /// # Errors
    ///
    /// This function will return an error if XDG settings is missing.
    pub fn new<P: AsRef<Path>>(prefix: P) -> Result<Self, XdgError> {
        let base = BaseDirectories::with_prefix(prefix).context(InitSnafu)?;
        Ok(Self { base })
    }

    /// Resolve the absolute path of a configuration file, creating its
    /// leading directories if they didn't exist before.
    ///
    /// # Errors
    ///
    /// This function will return an error if creating directories fails.
    pub fn place_config<P: AsRef<Path>>(&self, file: P) -> Result<PathBuf, XdgError> {
        self.base
            .place_config_file(file)
            .context(FileSystemSnafu {
                message: "Could not create configuration directory for application",
            })
    }
}

/// An error for XDG-related operations.
#[derive(Debug, Snafu, Clone)]
pub enum XdgError {
    #[snafu(display("Could not get XDG settings"))]
    Init {
        #[snafu(source(from(BaseDirectoriesError, Arc::new)))]
        source: Arc<BaseDirectoriesError>,
    },
    #[snafu(display("File system error: {message}"))]
    FileSystem {
        message: String,
        #[snafu(source(from(IoError, Arc::new)))]
        source: Arc<IoError>,
    },
}
