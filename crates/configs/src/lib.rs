//! File based configuration of a deployment run.
//!
//! The configuration is a single TOML file describing the networks that can
//! be deployed to, where compiled artifacts and deployment records live, the
//! compiler settings the artifacts were built with and a set of parameters
//! that deploy scripts read when constructing contracts.

pub mod accounts;
pub mod deploy_parameters;
mod load;
pub mod network;
pub mod solidity;

pub use {
    accounts::{AccountRef, NamedAccount},
    deploy_parameters::DeployParameters,
    load::{LoadError, load, parse},
    network::{Accounts, Mnemonic, Network, PrivateKey},
    solidity::Solidity,
};
use {
    serde::Deserialize,
    std::{collections::BTreeMap, path::PathBuf},
};

/// Networks that are considered local development chains unless a network
/// explicitly says otherwise.
pub const DEVELOPMENT_NETWORKS: &[&str] = &["hardhat", "localhost", "anvil"];

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Network used when none is given on the command line.
    #[serde(default = "default_network")]
    pub default_network: String,

    /// Human readable name of the project being deployed.
    #[serde(alias = "nome", default)]
    pub name: String,

    /// Whether deployed contracts should be verified on a block explorer.
    #[serde(default)]
    pub verify_contract: bool,

    /// Number of blocks to wait for after a deployment transaction was
    /// mined before it is considered confirmed.
    pub block_confirmations: Option<u64>,

    #[serde(default)]
    pub paths: Paths,

    /// Compiler settings the artifacts were produced with.
    pub solidity: Option<Solidity>,

    #[serde(default)]
    pub networks: BTreeMap<String, Network>,

    /// Role names (`deployer`, `admin`, ...) mapped to accounts.
    #[serde(default)]
    pub named_accounts: BTreeMap<String, NamedAccount>,

    pub deploy_parameters: DeployParameters,
}

impl Config {
    /// Looks up a configured network by name.
    pub fn network(&self, name: &str) -> Option<&Network> {
        self.networks.get(name)
    }

    /// Confirmations to wait for, at least one.
    pub fn confirmations(&self) -> u64 {
        self.block_confirmations.unwrap_or(1).max(1)
    }
}

/// Project layout. Relative paths are resolved against the directory the
/// configuration file is in when loading it.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Paths {
    #[serde(default = "default_sources")]
    pub sources: PathBuf,
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,
    #[serde(default = "default_cache")]
    pub cache: PathBuf,
    #[serde(default = "default_deployments")]
    pub deployments: PathBuf,
}

impl Paths {
    fn resolve_against(&mut self, root: &std::path::Path) {
        for path in [
            &mut self.sources,
            &mut self.artifacts,
            &mut self.cache,
            &mut self.deployments,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            artifacts: default_artifacts(),
            cache: default_cache(),
            deployments: default_deployments(),
        }
    }
}

fn default_network() -> String {
    "localhost".to_string()
}

fn default_sources() -> PathBuf {
    "contracts".into()
}

fn default_artifacts() -> PathBuf {
    "artifacts".into()
}

fn default_cache() -> PathBuf {
    "cache".into()
}

fn default_deployments() -> PathBuf {
    "deployments".into()
}
