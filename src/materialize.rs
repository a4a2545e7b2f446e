//! Defines the [`Materializer`], which copies the production HTML template
//! into the output directory once per route so that a static file server can
//! answer any route with the single-page application's entry point.

use crate::route;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes a static entry point for each route in a route array.
pub struct Materializer<'a> {
    /// The root of the built site (e.g., `dist`). Routes are resolved
    /// relative to this directory.
    pub output_directory: &'a Path,

    /// The HTML file copied to every route.
    pub template: &'a Path,

    /// A path prefix which only exists when the site is served locally. It
    /// is removed from the front of each route before the route is resolved
    /// to a file path. An empty prefix disables stripping.
    pub dev_prefix: &'a str,

    /// Directories (relative to `output_directory`) which must exist before
    /// any route is written, so nested routes have a parent to land in.
    pub sections: &'a [String],
}

/// What [`Materializer::materialize`] did for a single route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The route resolved to a directory; the template was written to
    /// `index.html` inside it.
    WroteIndex(PathBuf),

    /// Nothing existed at the route's path; the template was copied there.
    Created(PathBuf),

    /// A non-directory already existed at the route's path and was left
    /// alone.
    Skipped(PathBuf),
}

impl Outcome {
    /// The file the outcome refers to.
    pub fn path(&self) -> &Path {
        match self {
            Outcome::WroteIndex(p) | Outcome::Created(p) | Outcome::Skipped(p) => p,
        }
    }
}

impl Materializer<'_> {
    /// Ensures every route in `routes` has a static entry point, processing
    /// them in order and stopping at the first failure. Existing directories
    /// get an `index.html` (overwriting any previous one), missing paths get
    /// a copy of the template, and existing plain files are never touched.
    /// Files for routes which are no longer present are not removed.
    pub fn materialize<S: AsRef<str>>(&self, routes: &[S]) -> Result<Vec<Outcome>> {
        self.check_template()?;
        self.create_sections()?;

        let mut outcomes = Vec::with_capacity(routes.len());
        for route in routes {
            let outcome = self.materialize_route(route.as_ref())?;
            debug!(route = route.as_ref(), outcome = ?outcome, "materialized route");
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Resolves a route to its location under the output directory, after
    /// removing the dev prefix.
    pub fn route_path(&self, route: &str) -> Result<PathBuf> {
        let mut path = self.output_directory.to_owned();
        for segment in route::segments(strip_dev_prefix(route, self.dev_prefix)) {
            match segment {
                "." => continue,
                ".." => return Err(Error::InvalidRoute(route.to_owned())),
                _ => path.push(segment),
            }
        }
        Ok(path)
    }

    fn materialize_route(&self, route: &str) -> Result<Outcome> {
        let full_path = self.route_path(route)?;
        match fs::symlink_metadata(&full_path) {
            Ok(metadata) if metadata.is_dir() => {
                let index = full_path.join("index.html");
                self.copy_template(&index)?;
                Ok(Outcome::WroteIndex(index))
            }
            // a dangling symlink counts as missing; the copy lands on its
            // target
            Ok(metadata) if metadata.file_type().is_symlink() && !full_path.exists() => {
                self.copy_template(&full_path)?;
                Ok(Outcome::Created(full_path))
            }
            Ok(_) => Ok(Outcome::Skipped(full_path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.copy_template(&full_path)?;
                Ok(Outcome::Created(full_path))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn copy_template(&self, to: &Path) -> Result<()> {
        match fs::copy(self.template, to) {
            Ok(_) => Ok(()),
            Err(err) => Err(Error::Copy {
                from: self.template.to_owned(),
                to: to.to_owned(),
                err,
            }),
        }
    }

    fn check_template(&self) -> Result<()> {
        let err = match fs::metadata(self.template) {
            Ok(metadata) if metadata.is_file() => return Ok(()),
            Ok(_) => io::Error::new(io::ErrorKind::Other, "not a regular file"),
            Err(err) => err,
        };
        Err(Error::OpenTemplateFile {
            path: self.template.to_owned(),
            err,
        })
    }

    fn create_sections(&self) -> Result<()> {
        for section in self.sections {
            let dir = self.output_directory.join(section);
            if dir.exists() {
                continue;
            }
            fs::create_dir_all(&dir)
                .map_err(|err| Error::CreateSection { path: dir.clone(), err })?;
            info!(path = %dir.display(), "created section directory");
        }
        Ok(())
    }
}

/// Removes `prefix` from the front of `route`. The prefix only matches whole
/// segments, so `/literate-cryptography` is left alone by `/literate-crypto`.
pub fn strip_dev_prefix<'r>(route: &'r str, prefix: &str) -> &'r str {
    if prefix.is_empty() {
        return route;
    }
    match route.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => route,
    }
}

/// The result of a fallible materialize operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error writing static entry points.
#[derive(Debug)]
pub enum Error {
    /// Returned when the template is missing or isn't a regular file.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned when a section directory can't be created.
    CreateSection { path: PathBuf, err: io::Error },

    /// Returned when the template can't be copied to a route's location.
    Copy {
        from: PathBuf,
        to: PathBuf,
        err: io::Error,
    },

    /// Returned when a route would resolve outside of the output directory.
    InvalidRoute(String),

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::CreateSection { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::Copy { from, to, err } => write!(
                f,
                "Copying '{}' to '{}': {}",
                from.display(),
                to.display(),
                err
            ),
            Error::InvalidRoute(route) => {
                write!(f, "route `{}` escapes the output directory", route)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::CreateSection { path: _, err } => Some(err),
            Error::Copy { err, .. } => Some(err),
            Error::InvalidRoute(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
