use {
    alloy::primitives::Address,
    configs::NamedAccount,
    std::collections::BTreeMap,
    thiserror::Error,
};

/// Role names resolved to addresses on the active network.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedAccounts(BTreeMap<String, Address>);

impl NamedAccounts {
    /// Resolves the configured named accounts against the accounts available
    /// on the network. Entries that don't apply to the network, or point past
    /// the available accounts, are left out.
    pub fn resolve(
        config: &BTreeMap<String, NamedAccount>,
        network: &str,
        chain_id: u64,
        accounts: &[Address],
    ) -> Self {
        let resolved = config
            .iter()
            .filter_map(|(name, account)| {
                let address = account
                    .for_network(network, chain_id)
                    .and_then(|account| account.resolve(accounts));
                if address.is_none() {
                    tracing::warn!(
                        name,
                        network,
                        available = accounts.len(),
                        "named account not available on network"
                    );
                }
                Some((name.clone(), address?))
            })
            .collect();
        Self(resolved)
    }

    pub fn get(&self, name: &str) -> Result<Address, Error> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| Error::Unknown(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.0.iter().map(|(name, address)| (name.as_str(), *address))
    }
}

impl FromIterator<(String, Address)> for NamedAccounts {
    fn from_iter<T: IntoIterator<Item = (String, Address)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("named account {0:?} is not configured for this network")]
    Unknown(String),
}
