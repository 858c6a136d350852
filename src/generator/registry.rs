// src/generator/registry.rs
use crate::errors::{PipelineError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Artifact the extraction tool leaves in the workspace.
pub const REGISTRY_FILE: &str = "registry.json";

/// Documentation registry produced by the extraction stage: every
/// documented namespace with its methods and tag-derived types.
#[derive(Debug, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub objects: Vec<NamespaceDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceKind {
    Class,
    Module,
}

#[derive(Debug, Deserialize)]
pub struct NamespaceDoc {
    pub kind: NamespaceKind,
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub children: Vec<NamespaceDoc>,
    #[serde(default)]
    pub methods: Vec<MethodDoc>,
}

#[derive(Debug, Deserialize)]
pub struct MethodDoc {
    pub name: String,
    #[serde(default)]
    pub class_method: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub params: Vec<ParamDoc>,
    /// Documented parameter types, keyed by parameter name. Each value is
    /// the raw list of type expressions from the parameter's tag.
    #[serde(default)]
    pub param_types: BTreeMap<String, Vec<String>>,
    /// Raw type expressions from the return tag; empty when undocumented.
    #[serde(default)]
    pub return_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParamDoc {
    pub name: String,
    #[serde(default)]
    pub default: Option<String>,
}

impl Registry {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(REGISTRY_FILE);
        if !path.exists() {
            return Err(PipelineError::RegistryMissing(path));
        }
        let text = fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|e| PipelineError::RegistryInvalid(e.to_string()))
    }

    /// Names of every namespace defined in the registry, used to decide
    /// whether a documented type refers to something the submitted code
    /// itself defines.
    pub fn namespace_names(&self) -> HashSet<String> {
        fn walk(ns: &NamespaceDoc, out: &mut HashSet<String>) {
            out.insert(ns.name.clone());
            for child in &ns.children {
                walk(child, out);
            }
        }

        let mut names = HashSet::new();
        for ns in &self.objects {
            walk(ns, &mut names);
        }
        names
    }
}
