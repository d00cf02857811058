use std::{
    fs,
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use anyhow::{Context, Result};
use env_logger::Target;
use log::LevelFilter;

/// Logger setup for applications that render prompts.
///
/// Stdout carries the prompt and stderr usually shares the same terminal, so
/// log records go to a file. Without a file the logger writes to stderr,
/// which is only safe when nothing is being rendered.
#[derive(Default)]
pub struct Logging {
    file_name: Option<PathBuf>,
    debug_mode: bool,
}

impl Logging {
    #[must_use]
    pub fn new() -> Self {
        Self {
            file_name: None,
            debug_mode: false,
        }
    }

    #[must_use]
    pub fn with_file<P>(mut self, file_name: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.file_name = Some(file_name.into());
        self
    }

    /// Enable debug mode for verbose logging including key events and frames.
    ///
    /// Parameters:
    ///   - enable: true to enable debug mode
    ///
    /// Returns: Self for chaining
    #[must_use]
    pub fn with_debug_mode(mut self, enable: bool) -> Self {
        self.debug_mode = enable;
        self
    }

    fn level(&self) -> LevelFilter {
        if self.debug_mode {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn start(&self) -> Result<()> {
        let mut b = env_logger::builder();
        b.filter_level(self.level());

        if let Some(file_name) = &self.file_name {
            let fd = open_log_file(file_name)?;
            b.target(Target::Pipe(Box::new(fd)));
        }

        b.try_init().context("A logger is already installed")?;

        Ok(())
    }
}

/// Opens `path` for writing, truncating previous content.
///
/// On Unix a newly created file is readable by the owner only.
fn open_log_file(path: &Path) -> Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);

    #[cfg(unix)]
    options.mode(0o600);

    options
        .open(path)
        .with_context(|| format!("Unable to open {} for writing", path.display()))
}
