use {
    alloy_primitives::{
        Address,
        U256,
        utils::{UnitsError, parse_ether},
    },
    serde::Deserialize,
};

/// Parameters for the auction and governance contracts. Durations and
/// delays are in seconds, percentages are whole numbers.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeployParameters {
    /// How long before the auction end a bid still extends the auction.
    pub bid_time_tolerance: u64,
    pub auction_duration: u64,
    /// Opening bid in ether, as a decimal string (e.g. `"0.01"`).
    pub initial_bid: String,
    /// Minimum increment of a new bid over the current one.
    pub perc_increment: u64,
    /// Minimum delay of the timelock executing governance proposals.
    pub executor_min_delay: u64,
    #[serde(default)]
    pub executor_proposers: Vec<Address>,
    #[serde(default)]
    pub executors: Vec<Address>,
    pub quorum_percentage: u64,
    pub voting_period: u64,
    pub voting_delay: u64,
    pub veto_until: u64,
}

impl DeployParameters {
    /// The initial bid converted to wei.
    pub fn initial_bid_wei(&self) -> Result<U256, UnitsError> {
        parse_ether(&self.initial_bid)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy_primitives::address};

    fn parameters() -> DeployParameters {
        toml::from_str(
            r#"
            bid-time-tolerance = 300
            auction-duration = 86400
            initial-bid = "0.01"
            perc-increment = 5
            executor-min-delay = 3600
            executor-proposers = ["0x00000000000000000000000000000000000000aa"]
            quorum-percentage = 4
            voting-period = 45818
            voting-delay = 1
            veto-until = 1700000000
            "#,
        )
        .unwrap()
    }

    #[test]
    fn parses_all_fields() {
        let parameters = parameters();

        assert_eq!(parameters.bid_time_tolerance, 300);
        assert_eq!(parameters.auction_duration, 86400);
        assert_eq!(
            parameters.executor_proposers,
            vec![address!("0x00000000000000000000000000000000000000aa")]
        );
        assert!(parameters.executors.is_empty());
        assert_eq!(parameters.veto_until, 1_700_000_000);
    }

    #[test]
    fn initial_bid_in_wei() {
        assert_eq!(
            parameters().initial_bid_wei().unwrap(),
            U256::from(10_000_000_000_000_000u64)
        );

        let invalid = DeployParameters {
            initial_bid: "a lot".to_string(),
            ..parameters()
        };
        assert!(invalid.initial_bid_wei().is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = toml::from_str::<DeployParameters>(
            r#"
            bid-time-tolerance = 300
            auction-duration = 86400
            initial-bid = "0.01"
            perc-increment = 5
            executor-min-delay = 3600
            quorum-percentage = 4
            voting-period = 45818
            voting-delay = 1
            veto-until = 1700000000
            reserve-price = 1
            "#,
        );

        assert!(result.is_err());
    }
}
