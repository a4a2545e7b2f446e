//! Exports the [`build_site`] function which stitches together the high-level
//! steps of materializing the site's routes: loading the exercises
//! ([`crate::exercises`]), building and flattening the route tree
//! ([`crate::route`]), and copying the template into place for every route
//! ([`crate::materialize`]).

use crate::config::Config;
use crate::exercises::{Error as ExercisesError, Exercises};
use crate::materialize::{Error as MaterializeError, Materializer, Outcome};
use crate::route::route_array;
use std::fmt;
use tracing::info;

/// Summarizes a [`build_site`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// The route array, in the order it was materialized.
    pub routes: Vec<String>,

    /// One outcome per route.
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn wrote_index(&self) -> usize {
        self.count(|o| matches!(o, Outcome::WroteIndex(_)))
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| f(o)).count()
    }
}

/// Loads the exercises named by [`Config::data_file`] and returns the site's
/// route array without touching the output directory.
pub fn routes(config: &Config) -> Result<Vec<String>> {
    let exercises = Exercises::from_path(&config.data_file)?;
    Ok(route_array(exercises.keys()))
}

/// Materializes every route of the site from a [`Config`] object.
pub fn build_site(config: &Config) -> Result<Report> {
    let routes = routes(config)?;
    info!(
        routes = routes.len(),
        output_directory = %config.output_directory.display(),
        "materializing routes"
    );

    let materializer = Materializer {
        output_directory: &config.output_directory,
        template: &config.template,
        dev_prefix: &config.dev_prefix,
        sections: &config.sections,
    };
    let outcomes = materializer.materialize(&routes)?;

    let report = Report { routes, outcomes };
    info!(
        wrote_index = report.wrote_index(),
        created = report.created(),
        skipped = report.skipped(),
        "materialized routes"
    );
    Ok(report)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can occur while loading the
/// exercise data or while writing the routes' entry points.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the exercise data.
    Exercises(ExercisesError),

    /// Returned for errors writing the routes' entry points.
    Materialize(MaterializeError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Exercises(err) => err.fmt(f),
            Error::Materialize(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Exercises(err) => Some(err),
            Error::Materialize(err) => Some(err),
        }
    }
}

impl From<ExercisesError> for Error {
    /// Converts [`ExercisesError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ExercisesError) -> Error {
        Error::Exercises(err)
    }
}

impl From<MaterializeError> for Error {
    /// Converts [`MaterializeError`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: MaterializeError) -> Error {
        Error::Materialize(err)
    }
}
