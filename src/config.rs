//! Defines the [`Config`] type. Configuration is read from an optional
//! `literate-crypto.yaml` project file; without one, the conventional project
//! layout is assumed (`src/data/matasano.json`, `index-production.html`, and
//! a `dist` output directory, all relative to the current directory).

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "literate-crypto.yaml";

const DEFAULT_DATA_FILE: &str = "src/data/matasano.json";
const DEFAULT_OUTPUT_DIRECTORY: &str = "dist";
const DEFAULT_TEMPLATE: &str = "index-production.html";
const DEFAULT_DEV_PREFIX: &str = "/literate-crypto";

// Every field is optional; missing fields take their defaults and relative
// paths are resolved against the directory containing the project file.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct Project {
    data_file: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    template: Option<PathBuf>,
    dev_prefix: Option<String>,
    sections: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The JSON file mapping exercise keys to exercise content.
    pub data_file: PathBuf,

    /// The built site's root directory.
    pub output_directory: PathBuf,

    /// The production HTML template copied to every route.
    pub template: PathBuf,

    /// The route prefix used only when serving locally.
    pub dev_prefix: String,

    /// Directories created under `output_directory` before any route is
    /// written.
    pub sections: Vec<String>,
}

impl Config {
    /// The default configuration for a project rooted at `root`.
    pub fn with_root(root: &Path) -> Config {
        Config::from_project(root, Project::default())
    }

    /// Searches `dir` and its ancestors for a [`PROJECT_FILE`] and loads the
    /// first one found. If there is none, returns the defaults rooted at
    /// `dir`.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        match dir.ancestors().map(|d| d.join(PROJECT_FILE)).find(|p| p.exists()) {
            Some(path) => match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            },
            None => Ok(Config::with_root(dir)),
        }
    }

    /// Loads the project file at `path`.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::from_project(project_root, project)),
        }
    }

    fn from_project(project_root: &Path, project: Project) -> Config {
        let resolve = |path: Option<PathBuf>, default: &str| {
            project_root.join(path.unwrap_or_else(|| PathBuf::from(default)))
        };
        Config {
            data_file: resolve(project.data_file, DEFAULT_DATA_FILE),
            output_directory: resolve(project.output_directory, DEFAULT_OUTPUT_DIRECTORY),
            template: resolve(project.template, DEFAULT_TEMPLATE),
            dev_prefix: project
                .dev_prefix
                .unwrap_or_else(|| DEFAULT_DEV_PREFIX.to_owned()),
            sections: project
                .sections
                .unwrap_or_else(|| vec![crate::route::MATASANO.to_owned()]),
        }
    }
}
