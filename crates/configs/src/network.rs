use {
    alloy_primitives::B256,
    serde::Deserialize,
    std::{fmt, time::Duration},
    url::Url,
};

/// Connection settings of a single named network.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Network {
    /// The node RPC endpoint. Defaults to a node on localhost.
    #[serde(default = "default_url")]
    pub url: Url,

    /// Expected chain ID. The runner refuses to deploy if the connected
    /// node reports a different one.
    pub chain_id: Option<u64>,

    /// Accounts used to sign transactions on this network.
    #[serde(default)]
    pub accounts: Accounts,

    /// Whether this is a production network. Defaults to `false` for the
    /// well known development network names and `true` otherwise.
    pub live: Option<bool>,

    /// How often the node is polled for receipts and new blocks.
    #[serde(with = "humantime_serde", default = "default_polling_interval")]
    pub polling_interval: Duration,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            url: default_url(),
            chain_id: None,
            accounts: Accounts::default(),
            live: None,
            polling_interval: default_polling_interval(),
        }
    }
}

impl Network {
    pub fn is_live(&self, name: &str) -> bool {
        self.live
            .unwrap_or_else(|| !crate::DEVELOPMENT_NETWORKS.contains(&name))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Accounts {
    /// Accounts are managed and unlocked by the node.
    Remote(Remote),
    PrivateKeys(Vec<PrivateKey>),
    Mnemonic(Mnemonic),
}

impl Default for Accounts {
    fn default() -> Self {
        Self::Remote(Remote::Remote)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Remote {
    Remote,
}

/// A raw secp256k1 private key.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct PrivateKey(pub B256);

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(SECRET)")
    }
}

/// BIP-39 mnemonic from which `count` accounts are derived, starting at
/// `initial-index` of the standard Ethereum derivation path.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Mnemonic {
    pub mnemonic: String,
    #[serde(default)]
    pub initial_index: u32,
    #[serde(default = "default_mnemonic_count")]
    pub count: u32,
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("mnemonic", &"SECRET")
            .field("initial_index", &self.initial_index)
            .field("count", &self.count)
            .finish()
    }
}

fn default_url() -> Url {
    Url::parse("http://127.0.0.1:8545").expect("valid default URL")
}

fn default_polling_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_mnemonic_count() -> u32 {
    10
}
