use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// The only fatal failures: problems with the input itself, raised before
/// lexing begins. Everything discovered later is a `Diagnostic`.
#[derive(Debug)]
pub enum InputError {
    FileNotFound(PathBuf),
    Io(PathBuf, std::io::Error),
}

impl Error for InputError {}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InputError::FileNotFound(path) => {
                write!(f, "FileNotFoundError: no such file: {}", path.display())
            }
            InputError::Io(path, err) => {
                write!(f, "IOError: cannot read {}: {}", path.display(), err)
            }
        }
    }
}
