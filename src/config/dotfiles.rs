//! `.env` loading for the command line tool
//!
//! Variables already present in the environment are never overridden.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the dotfile looked up in the working directory and the home directory
pub const DOTFILE_NAME: &str = ".env";

/// Outcome of loading the dotfiles
///
/// Loading runs before logging is set up, so failures are collected here and
/// reported by the caller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dotfiles {
    /// Files that were read
    pub loaded: Vec<PathBuf>,
    /// Files that exist but could not be read, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// Candidate dotfile in the home directory
pub fn home_dotfile() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DOTFILE_NAME))
}

/// Load `.env` from the working directory (or a parent), then `~/.env`
pub fn load_dotfiles() -> Dotfiles {
    let mut dotfiles = Dotfiles::default();

    match dotenv::dotenv() {
        Ok(path) => dotfiles.loaded.push(path),
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => dotfiles
            .failed
            .push((PathBuf::from(DOTFILE_NAME), e.to_string())),
    }

    if let Some(home) = home_dotfile() {
        if !dotfiles.loaded.contains(&home) {
            dotfiles.record(&home, load_file(&home));
        }
    }

    dotfiles
}

/// Load one dotfile
///
/// `Ok(false)` when the file does not exist.
pub fn load_file(path: &Path) -> Result<bool, dotenv::Error> {
    if !path.is_file() {
        return Ok(false);
    }

    dotenv::from_path(path).map(|()| true)
}

impl Dotfiles {
    fn record(&mut self, path: &Path, result: Result<bool, dotenv::Error>) {
        match result {
            Ok(true) => self.loaded.push(path.to_path_buf()),
            Ok(false) => {}
            Err(e) => self.failed.push((path.to_path_buf(), e.to_string())),
        }
    }
}
