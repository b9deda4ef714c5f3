//! Resolves the run's [`Config`] from an optional `bitesize.yaml` project file
//! and a set of [`Overrides`] (command-line flags, which fall back to
//! environment variables).

use crate::post::Options;
use crate::rewrite;
use crate::util::{non_empty, open};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The name of the project file searched for in the working directory and
/// its parents.
pub const PROJECT_FILE: &str = "bitesize.yaml";

#[derive(Deserialize, Default)]
struct Project {
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default)]
    pub post_path: Option<String>,

    #[serde(default)]
    pub image_prefix: Option<String>,

    #[serde(default)]
    pub image_new_prefix: Option<String>,
}

/// Values that take precedence over the project file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub repository: Option<String>,
    pub post_path: Option<String>,
    pub access_token: Option<String>,
    pub image_prefix: Option<String>,
    pub image_new_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `owner/name` of the GitHub repository holding the posts.
    pub repository: String,

    /// The directory within the repository holding the posts. Empty means
    /// the repository root.
    pub post_path: String,

    /// Raises the API rate limit when present.
    pub access_token: Option<String>,

    pub image_prefix: Option<String>,
    pub image_new_prefix: Option<String>,
}

impl Config {
    /// Loads the configuration. `project_file` wins if given; otherwise
    /// [`PROJECT_FILE`] is searched for starting at `dir`. A missing project
    /// file is fine as long as the overrides name a repository.
    pub fn load(project_file: Option<&Path>, dir: &Path, overrides: Overrides) -> Result<Config> {
        match project_file
            .map(Path::to_owned)
            .or_else(|| Config::find_project_file(dir))
        {
            Some(path) => match Config::from_project_file(&path, overrides) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            },
            None => Config::resolve(Project::default(), overrides),
        }
    }

    /// Returns the path of the nearest [`PROJECT_FILE`] in `dir` or one of its
    /// ancestors.
    pub fn find_project_file(dir: &Path) -> Option<PathBuf> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            Some(path)
        } else {
            dir.parent().and_then(Config::find_project_file)
        }
    }

    pub fn from_project_file(path: &Path, overrides: Overrides) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        Config::resolve(project, overrides)
    }

    fn resolve(project: Project, overrides: Overrides) -> Result<Config> {
        let pick = |over: Option<String>, base: Option<String>| {
            non_empty(over).or_else(|| non_empty(base))
        };
        Ok(Config {
            repository: pick(overrides.repository, project.repository).ok_or_else(|| {
                anyhow!(
                    "No repository configured; pass `--repo owner/name`, set \
                     `BITESIZE_BLOG_GITHUB_REPO`, or add `repository` to `{}`",
                    PROJECT_FILE
                )
            })?,
            post_path: pick(overrides.post_path, project.post_path).unwrap_or_default(),
            access_token: non_empty(overrides.access_token),
            image_prefix: pick(overrides.image_prefix, project.image_prefix),
            image_new_prefix: pick(overrides.image_new_prefix, project.image_new_prefix),
        })
    }

    /// The post [`Options`] this configuration implies.
    pub fn options(&self) -> rewrite::Result<Options> {
        Options::with_image_prefix(
            self.image_prefix.as_deref(),
            self.image_new_prefix.as_deref(),
        )
    }
}
