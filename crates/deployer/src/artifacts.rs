//! Compiled contract artifacts as emitted by the Solidity toolchain.
//!
//! Artifacts live in a directory tree mirroring the sources, e.g.
//! `artifacts/contracts/Token3.sol/Token3.json`. Debug files
//! (`*.dbg.json`) and the `build-info` directory are ignored.

use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        io::ErrorKind,
        path::{Path, PathBuf},
    },
    thiserror::Error,
    tokio::fs,
};

const BUILD_INFO: &str = "build-info";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(rename = "_format", default)]
    pub format: String,
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
    pub deployed_bytecode: Bytes,
    #[serde(default)]
    pub link_references: LinkReferences,
    #[serde(default)]
    pub deployed_link_references: LinkReferences,
}

/// Placeholders for library addresses in the bytecode, keyed by source file
/// and library name.
pub type LinkReferences = BTreeMap<String, BTreeMap<String, Vec<Offset>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub start: usize,
    pub length: usize,
}

impl Artifact {
    /// `path/to/Source.sol:Name`
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Libraries that need to be linked before the bytecode can be deployed.
    pub fn unlinked_libraries(&self) -> Vec<String> {
        self.link_references
            .iter()
            .flat_map(|(source, libraries)| {
                libraries
                    .keys()
                    .map(move |library| format!("{source}:{library}"))
            })
            .collect()
    }
}

/// Read access to the artifacts directory.
#[derive(Clone, Debug)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Looks up an artifact by contract name (`Token3`) or fully qualified
    /// name (`contracts/Token3.sol:Token3`). A bare name must be unique
    /// across all sources.
    pub async fn get(&self, name: &str) -> Result<Artifact, Error> {
        let path = match name.rsplit_once(':') {
            Some((source, contract)) => self.root.join(source).join(format!("{contract}.json")),
            None => {
                let mut candidates = find(&self.root, &format!("{name}.json")).await?;
                match candidates.len() {
                    0 => return Err(Error::NotFound(name.to_string())),
                    1 => candidates.remove(0),
                    _ => {
                        candidates.sort();
                        return Err(Error::Ambiguous {
                            name: name.to_string(),
                            candidates,
                        });
                    }
                }
            }
        };
        read(&path, name).await
    }
}

/// Walks the tree below `root` collecting files called `file_name`.
async fn find(root: &Path, file_name: &str) -> Result<Vec<PathBuf>, Error> {
    let io = |dir: &Path| {
        let dir = dir.to_owned();
        move |source: std::io::Error| Error::Io { path: dir, source }
    };

    let mut found = Vec::new();
    let mut dirs = vec![root.to_owned()];
    while let Some(dir) = dirs.pop() {
        let mut entries = fs::read_dir(&dir).await.map_err(io(&dir))?;
        while let Some(entry) = entries.next_entry().await.map_err(io(&dir))? {
            let file_type = entry.file_type().await.map_err(io(&dir))?;
            if file_type.is_dir() {
                if entry.file_name() != BUILD_INFO {
                    dirs.push(entry.path());
                }
            } else if entry.file_name() == file_name {
                found.push(entry.path());
            }
        }
    }
    Ok(found)
}

async fn read(path: &Path, name: &str) -> Result<Artifact, Error> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::NotFound(name.to_string()));
        }
        Err(source) => {
            return Err(Error::Io {
                path: path.to_owned(),
                source,
            });
        }
    };
    serde_json::from_slice(&data).map_err(|source| Error::Json {
        path: path.to_owned(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no artifact found for {0:?}")]
    NotFound(String),
    #[error("multiple artifacts found for {name:?}, use a fully qualified name: {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<PathBuf>,
    },
    #[error("I/O error while reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid artifact {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
