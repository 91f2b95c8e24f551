use std::path::{Path, PathBuf};

use crate::{error::PersistenceError, validate::GenerationResult};

pub const PROCEDURE_EXTENSION: &str = "sql";
pub const API_EXTENSION: &str = "js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}

impl Artifact {
    /// The procedure file followed by the access-function file.
    pub fn from_result(result: &GenerationResult) -> [Artifact; 2] {
        [
            Artifact {
                file_name: format!("{}.{PROCEDURE_EXTENSION}", result.procedure.name),
                content: result.procedure.sql.clone(),
            },
            Artifact {
                file_name: format!("{}.{API_EXTENSION}", result.api.name),
                content: result.api.code.clone(),
            },
        ]
    }
}

/// Writes artifacts into one flat directory, replacing files of the same name.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| PersistenceError {
            path: self.dir.clone(),
            source,
        })
    }

    pub fn write(&self, artifact: &Artifact) -> Result<PathBuf, PersistenceError> {
        let path = self.dir.join(&artifact.file_name);
        match std::fs::write(&path, &artifact.content) {
            Ok(()) => Ok(path),
            Err(source) => Err(PersistenceError { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Api, Procedure};

    fn result(sql: &str, code: &str) -> GenerationResult {
        GenerationResult {
            procedure: Procedure {
                name: "sp_get_orders".into(),
                sql: sql.into(),
            },
            api: Api {
                name: "getOrders".into(),
                code: code.into(),
            },
        }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn file_names_come_from_result_names() {
        let [procedure, api] = Artifact::from_result(&result("sql", "js"));
        assert_eq!(procedure.file_name, "sp_get_orders.sql");
        assert_eq!(procedure.content, "sql");
        assert_eq!(api.file_name, "getOrders.js");
        assert_eq!(api.content, "js");
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(root.path().join("generated").join("nested"));
        writer.ensure_dir().unwrap();
        writer.ensure_dir().unwrap();
        assert!(writer.dir().is_dir());
    }

    #[test]
    fn second_run_overwrites_first() {
        let root = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(root.path());
        writer.ensure_dir().unwrap();

        for run in [result("first sql", "first js"), result("second", "second js")] {
            for artifact in Artifact::from_result(&run) {
                writer.write(&artifact).unwrap();
            }
        }

        assert_eq!(file_names(root.path()), ["getOrders.js", "sp_get_orders.sql"]);
        let sql = std::fs::read_to_string(root.path().join("sp_get_orders.sql")).unwrap();
        let js = std::fs::read_to_string(root.path().join("getOrders.js")).unwrap();
        assert_eq!(sql, "second");
        assert_eq!(js, "second js");
    }

    #[test]
    fn write_without_directory_reports_path() {
        let root = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(root.path().join("absent"));
        let [procedure, _] = Artifact::from_result(&result("sql", "js"));
        let err = writer.write(&procedure).unwrap_err();
        assert_eq!(err.path, root.path().join("absent").join("sp_get_orders.sql"));
    }
}
