//! # Config Commands

use tracing::debug;

use crate::state::ConfigState;

/// Current store configuration, for receipt headers and currency display.
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_is_a_copy() {
        let mut config = ConfigState::default();
        let snapshot = get_config(&config);
        config.tax_rate_bps = 1200;

        assert_eq!(snapshot.tax_rate_bps, 0);
        assert_eq!(snapshot.currency_symbol, "₱");
    }
}
