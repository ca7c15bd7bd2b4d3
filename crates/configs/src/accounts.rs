use {
    alloy_primitives::Address,
    serde::Deserialize,
    std::collections::BTreeMap,
};

/// Key of the fallback entry in a per-network named account table.
pub const DEFAULT_KEY: &str = "default";

/// Configuration of a single named account.
///
/// ```toml
/// [named-accounts]
/// deployer = 0
/// treasury = "0x0000000000000000000000000000000000000001"
/// admin = { default = 1, sepolia = "0x...", 137 = 2 }
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NamedAccount {
    Fixed(AccountRef),
    /// Keyed by network name or chain ID, with an optional `default` entry.
    PerNetwork(BTreeMap<String, AccountRef>),
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AccountRef {
    /// Index into the accounts configured for the network.
    Index(usize),
    Address(Address),
}

impl NamedAccount {
    /// Picks the entry that applies to the given network. Network names take
    /// precedence over chain IDs, which take precedence over `default`.
    pub fn for_network(&self, network: &str, chain_id: u64) -> Option<AccountRef> {
        match self {
            Self::Fixed(account) => Some(*account),
            Self::PerNetwork(accounts) => accounts
                .get(network)
                .or_else(|| accounts.get(&chain_id.to_string()))
                .or_else(|| accounts.get(DEFAULT_KEY))
                .copied(),
        }
    }
}

impl AccountRef {
    /// Resolves to a concrete address given the network's accounts.
    pub fn resolve(&self, accounts: &[Address]) -> Option<Address> {
        match self {
            Self::Index(index) => accounts.get(*index).copied(),
            Self::Address(address) => Some(*address),
        }
    }
}
