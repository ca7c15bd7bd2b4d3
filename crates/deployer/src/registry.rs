//! Deployment records, one JSON file per contract and network.
//!
//! ```text
//! deployments/
//!   sepolia/
//!     .chainId
//!     Token3.json
//! ```

use {
    crate::{artifacts::Artifact, chain::DeployedContract},
    alloy::primitives::{Address, B256},
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        io::ErrorKind,
        path::{Path, PathBuf},
    },
    thiserror::Error,
    tokio::fs,
};

const CHAIN_ID_FILE: &str = ".chainId";

/// Where and what was deployed. The artifact fields are stored inline next
/// to the address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub address: Address,
    #[serde(flatten)]
    pub artifact: Artifact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    /// How many times a contract was deployed under this name on this
    /// network. Maintained by the registry.
    #[serde(default = "one")]
    pub num_deployments: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub from: Address,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl Deployment {
    pub fn new(address: Address, artifact: Artifact) -> Self {
        Self {
            address,
            artifact,
            transaction_hash: None,
            receipt: None,
            num_deployments: 1,
        }
    }

    /// Records the creation transaction.
    pub fn with_transaction(self, contract: &DeployedContract) -> Self {
        Self {
            transaction_hash: Some(contract.transaction_hash),
            receipt: Some(Receipt {
                from: contract.from,
                block_number: contract.block_number,
                gas_used: contract.gas_used,
            }),
            ..self
        }
    }
}

/// Persistent store of deployment records of a single network.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync + 'static {
    /// Saves a record under `name`, replacing any previous one.
    async fn save(&self, name: &str, deployment: &Deployment) -> Result<(), Error>;

    async fn get(&self, name: &str) -> Result<Option<Deployment>, Error>;

    async fn all(&self) -> Result<BTreeMap<String, Deployment>, Error>;
}

/// Registry backed by a directory with one JSON file per record.
#[derive(Clone, Debug)]
pub struct Directory {
    dir: PathBuf,
    chain_id: u64,
}

impl Directory {
    /// Records of `network` are kept in `<root>/<network>/`.
    pub fn new(root: &Path, network: &str, chain_id: u64) -> Self {
        Self {
            dir: root.join(network),
            chain_id,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deletes all records of the network.
    pub async fn reset(&self) -> Result<(), Error> {
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => {
                tracing::info!(dir = ?self.dir, "deleted existing deployments");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Io {
                path: self.dir.clone(),
                source,
            }),
        }
    }

    fn path(&self, name: &str) -> Result<PathBuf, Error> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\', ':']);
        if !valid {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Makes sure the directory exists and belongs to the connected chain.
    /// Called before every save, and once before deploying anything so a
    /// foreign directory is rejected before transactions are sent.
    pub async fn open(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| Error::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(CHAIN_ID_FILE);
        match fs::read_to_string(&path).await {
            Ok(recorded) => {
                let recorded = recorded.trim();
                if recorded != self.chain_id.to_string() {
                    return Err(Error::ChainIdMismatch {
                        dir: self.dir.clone(),
                        recorded: recorded.to_string(),
                        actual: self.chain_id,
                    });
                }
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => fs::write(
                &path,
                self.chain_id.to_string(),
            )
            .await
            .map_err(|source| Error::Io { path, source }),
            Err(source) => Err(Error::Io { path, source }),
        }
    }
}

#[async_trait::async_trait]
impl Registry for Directory {
    async fn save(&self, name: &str, deployment: &Deployment) -> Result<(), Error> {
        let path = self.path(name)?;
        self.open().await?;

        let num_deployments = match self.get(name).await? {
            Some(previous) => previous.num_deployments + 1,
            None => 1,
        };
        let deployment = Deployment {
            num_deployments,
            ..deployment.clone()
        };
        let data = serde_json::to_vec_pretty(&deployment).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;

        // Write to a temporary file first so a crash never leaves a
        // truncated record behind.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(|source| Error::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).await.map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(?path, num_deployments, "saved deployment");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Deployment>, Error> {
        let path = self.path(name)?;
        read(&path).await
    }

    async fn all(&self) -> Result<BTreeMap<String, Deployment>, Error> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(Error::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut deployments = BTreeMap::new();
        while let Some(entry) = entries.next_entry().await.map_err(|source| Error::Io {
            path: self.dir.clone(),
            source,
        })? {
            let path = entry.path();
            if path.extension().is_none_or(|extension| extension != "json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let name = name.to_string();
            if let Some(deployment) = read(&path).await? {
                deployments.insert(name, deployment);
            }
        }
        Ok(deployments)
    }
}

async fn read(path: &Path) -> Result<Option<Deployment>, Error> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Io {
                path: path.to_owned(),
                source,
            });
        }
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| Error::Json {
            path: path.to_owned(),
            source,
        })
}

fn one() -> u64 {
    1
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid deployment record {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid deployment name {0:?}")]
    InvalidName(String),
    #[error("deployments in {dir:?} belong to chain {recorded}, connected to chain {actual}")]
    ChainIdMismatch {
        dir: PathBuf,
        recorded: String,
        actual: u64,
    },
}
