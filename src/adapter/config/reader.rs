use std::fs::{self, File};
use std::io::{Error as IoError, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::prelude::*;

pub const DEFAULT_CONTENT: &str = r#"
# This configuration file is generated automatically. Feel free to do some
# modification. Every key is optional.

# The `duration` section specifies the duration of each phase in seconds.
[duration]
work = 1500
short_rest = 300
long_rest = 900

# The `cycle` section specifies how phases chain into each other. A long rest
# follows every `sequence_length` work phases, short rests follow the others.
[cycle]
sequence_length = 4
# Start a rest as soon as a work phase ends.
auto_start_rest = true
# Start working as soon as a rest ends.
auto_start_work = false
"#;

/// A reader which reads the configuration content and optionally writes the
/// default template first if the file is missing.
pub struct ContentReader {
    path: PathBuf,
    create_new: bool,
}

impl ContentReader {
    /// Creates a new [`ContentReader`].
    pub fn new<P: AsRef<Path>>(path: P, create_new: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create_new,
        }
    }

    /// Read content from the file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file is missing and may not
    /// be created, or any file system operation fails.
    pub fn read(self) -> Result<String, ReadContentError> {
        let Self { path, create_new } = self;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                ensure!(create_new, NotFoundSnafu { path });
                Self::create_configuration(&path)?;
                tracing::info!(path = %path.display(), "Created default configuration");
                Ok(DEFAULT_CONTENT.to_owned())
            }
            Err(err) => Err(err).context(FileSystemSnafu {
                when: "Reading configuration",
            }),
        }
    }

    /// Write the default template to `path`, failing if a file appeared in the
    /// meantime.
    fn create_configuration(path: &Path) -> Result<(), ReadContentError> {
        let mut file = File::options()
            .write(true)
            .create_new(true)
            .open(path)
            .context(FileSystemSnafu {
                when: "Creating configuration file",
            })?;

        file.write_all(DEFAULT_CONTENT.as_bytes())
            .context(FileSystemSnafu {
                when: "Writing default configuration content",
            })
    }
}

/// An error type for reading content from the configuration file.
#[derive(Debug, Snafu, Clone)]
#[non_exhaustive]
pub enum ReadContentError {
    #[snafu(display("Could not open inexistent file {}", path.display()))]
    NotFound { path: PathBuf },
    #[snafu(display("Could not access configuration: {when}"))]
    FileSystem {
        when: String,
        #[snafu(source(from(IoError, Arc::new)))]
        source: Arc<IoError>,
    },
}
