//! Loads the Matasano exercise data set. Only the exercise keys matter for
//! routing; the content of each exercise is kept as an opaque JSON value for
//! whoever renders it.

use serde_json::{Map, Value};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A mapping of exercise keys (e.g., `1-1`) to exercise content, in the
/// order they appear in the source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Exercises(Map<String, Value>);

impl Exercises {
    /// Parses the exercises from a JSON document whose top level is an
    /// object.
    pub fn from_reader<R: Read>(r: R) -> Result<Exercises> {
        match serde_json::from_reader::<_, Value>(r)? {
            Value::Object(m) => Ok(Exercises(m)),
            _ => Err(Error::NotAnObject),
        }
    }

    /// Opens and parses the exercise file at `path`. Errors are annotated
    /// with the path.
    pub fn from_path(path: &Path) -> Result<Exercises> {
        let load = || -> Result<Exercises> {
            Exercises::from_reader(BufReader::new(File::open(path)?))
        };
        load().map_err(|e| {
            Error::Annotated(
                format!("loading exercises `{}`", path.display()),
                Box::new(e),
            )
        })
    }

    /// The exercise keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Represents the result of loading [`Exercises`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading [`Exercises`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the data file can't be read.
    Io(io::Error),

    /// Returned when the data file isn't valid JSON.
    Json(serde_json::Error),

    /// Returned when the data file's top level isn't a JSON object.
    NotAnObject,

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Json(err) => err.fmt(f),
            Error::NotAnObject => {
                write!(f, "exercise data must be a JSON object")
            }
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::NotAnObject => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts a [`io::Error`] into an [`Error`]. It allows us to use the `?`
    /// operator for fallible I/O functions.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_json`] deserialization functions.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keys_preserve_file_order() -> Result<()> {
        let exercises = Exercises::from_reader(
            r#"{
                "1-2": {"title": "Fixed XOR"},
                "1-1": {"title": "Convert hex to base64"},
                "1-10": {"title": "Implement CBC mode"}
            }"#
            .as_bytes(),
        )?;
        assert_eq!(
            vec!["1-2", "1-1", "1-10"],
            exercises.keys().collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_empty_object() -> Result<()> {
        let exercises = Exercises::from_reader("{}".as_bytes())?;
        assert_eq!(0, exercises.keys().count());
        Ok(())
    }

    #[test]
    fn test_not_an_object() {
        match Exercises::from_reader(r#"["1-1", "1-2"]"#.as_bytes()) {
            Err(Error::NotAnObject) => {}
            other => panic!("wanted NotAnObject; found {:?}", other),
        }
    }

    #[test]
    fn test_malformed() {
        match Exercises::from_reader(r#"{"1-1": "#.as_bytes()) {
            Err(Error::Json(_)) => {}
            other => panic!("wanted Json error; found {:?}", other),
        }
    }

    #[test]
    fn test_from_path() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("matasano.json");
        std::fs::write(&path, r#"{"1-1": {}, "1-2": {}}"#)?;
        let exercises = Exercises::from_path(&path)?;
        assert_eq!(vec!["1-1", "1-2"], exercises.keys().collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_from_path_missing_file_is_annotated() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("missing.json");
        match Exercises::from_path(&path) {
            Err(Error::Annotated(annotation, err)) => {
                assert!(annotation.contains("missing.json"));
                assert!(matches!(*err, Error::Io(_)));
            }
            other => panic!("wanted annotated Io error; found {:?}", other),
        }
        Ok(())
    }
}
