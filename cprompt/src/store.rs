//! Filesystem-backed template lookup with variant-tag fallback.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use cprovider::{Role, Turn};
use serde::Deserialize;
use tracing::debug;

use crate::render::render;
use crate::{TemplateError, TemplateVars};

const TEMPLATE_EXTENSION: &str = "txt";
const EXAMPLES_EXTENSION: &str = "json";

/// Read-only view over a directory of prompt assets.
///
/// A template path such as `core/boss_wrapper` with tag `gpt4` resolves to
/// `<root>/core/boss_wrapper_gpt4.txt` when that file exists, otherwise to
/// `<root>/core/boss_wrapper.txt`.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
    default_tag: Option<String>,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(TemplateError::configuration(format!(
                "template root '{}' does not exist or is not a directory",
                root.display()
            )));
        }

        Ok(Self {
            root,
            default_tag: None,
        })
    }

    pub fn with_default_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.default_tag = (!tag.trim().is_empty()).then_some(tag);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn default_tag(&self) -> Option<&str> {
        self.default_tag.as_deref()
    }

    /// Picks the file a `(path, tag)` pair resolves to without reading it.
    pub fn locate(&self, path: &str, tag: Option<&str>) -> Result<PathBuf, TemplateError> {
        ensure_relative(path)?;

        let tag = tag
            .filter(|tag| !tag.trim().is_empty())
            .or(self.default_tag.as_deref());

        if let Some(tag) = tag {
            if is_safe_tag(tag) {
                let variant = self
                    .root
                    .join(format!("{path}_{tag}.{TEMPLATE_EXTENSION}"));
                if variant.is_file() {
                    debug!(template = path, tag, file = %variant.display(), "using tagged template variant");
                    return Ok(variant);
                }
            } else {
                debug!(template = path, tag, "ignoring variant tag with path characters");
            }
        }

        let base = self.root.join(format!("{path}.{TEMPLATE_EXTENSION}"));
        if base.is_file() {
            debug!(template = path, file = %base.display(), "using base template");
            return Ok(base);
        }

        Err(TemplateError::not_found(match tag {
            Some(tag) => format!(
                "template '{path}' not found (looked for '{path}_{tag}.{TEMPLATE_EXTENSION}' and '{path}.{TEMPLATE_EXTENSION}' under '{}')",
                self.root.display()
            ),
            None => format!(
                "template '{path}' not found under '{}'",
                self.root.display()
            ),
        }))
    }

    /// Raw template body, unrendered.
    pub fn load(&self, path: &str, tag: Option<&str>) -> Result<String, TemplateError> {
        let file = self.locate(path, tag)?;
        read_to_string(&file)
    }

    pub fn resolve(
        &self,
        path: &str,
        tag: Option<&str>,
        vars: &TemplateVars,
    ) -> Result<String, TemplateError> {
        let body = self.load(path, tag)?;
        render(path, &body, vars)
    }

    /// Few-shot turns from `<root>/<path>.json`, taken verbatim without templating.
    pub fn load_examples(&self, path: &str) -> Result<Vec<Turn>, TemplateError> {
        ensure_relative(path)?;
        let file = self.root.join(format!("{path}.{EXAMPLES_EXTENSION}"));
        if !file.is_file() {
            return Err(TemplateError::not_found(format!(
                "example set '{path}' not found under '{}'",
                self.root.display()
            )));
        }

        let body = read_to_string(&file)?;
        let examples = serde_json::from_str::<Vec<PersistedExample>>(&body).map_err(|error| {
            TemplateError::invalid_examples(format!("example set '{path}' is malformed: {error}"))
        })?;

        let turns = examples
            .into_iter()
            .enumerate()
            .map(|(index, example)| example.into_turn(path, index))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(examples = path, count = turns.len(), "loaded few-shot examples");
        Ok(turns)
    }
}

#[derive(Debug, Deserialize)]
struct PersistedExample {
    role: String,
    text: String,
}

impl PersistedExample {
    fn into_turn(self, path: &str, index: usize) -> Result<Turn, TemplateError> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            TemplateError::invalid_examples(format!(
                "example set '{path}' entry {index} has unknown role '{}'",
                self.role
            ))
        })?;
        Ok(Turn::new(role, self.text))
    }
}

fn ensure_relative(path: &str) -> Result<(), TemplateError> {
    let candidate = Path::new(path);
    let valid = !path.trim().is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

    if valid {
        Ok(())
    } else {
        Err(TemplateError::not_found(format!(
            "template path '{path}' must be a relative path inside the template root"
        )))
    }
}

fn is_safe_tag(tag: &str) -> bool {
    !tag.contains(['/', '\\']) && !tag.contains("..")
}

fn read_to_string(file: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(file).map_err(|error| match error.kind() {
        ErrorKind::NotFound => {
            TemplateError::not_found(format!("'{}' disappeared while reading", file.display()))
        }
        _ => TemplateError::io(format!("failed to read '{}': {error}", file.display())),
    })
}
