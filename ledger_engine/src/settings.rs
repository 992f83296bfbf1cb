use std::time::Duration;

use crate::commission::CommissionRate;

pub const DEFAULT_UNIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Business rules and limits injected into the ledger APIs.
#[derive(Debug, Clone, Copy)]
pub struct LedgerSettings {
    /// The fraction of each settled order that is credited to the platform wallet.
    pub commission_rate: CommissionRate,
    /// The user whose wallet receives commissions. If `None`, the lowest-id `ADMIN` user is used.
    pub platform_user_id: Option<i64>,
    /// Upper bound on the duration of a single atomic unit. Units that overrun are rolled back.
    pub unit_timeout: Duration,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            commission_rate: CommissionRate::default(),
            platform_user_id: None,
            unit_timeout: DEFAULT_UNIT_TIMEOUT,
        }
    }
}

impl LedgerSettings {
    pub fn with_commission_rate(mut self, rate: CommissionRate) -> Self {
        self.commission_rate = rate;
        self
    }

    pub fn with_platform_user(mut self, user_id: i64) -> Self {
        self.platform_user_id = Some(user_id);
        self
    }

    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        self.unit_timeout = timeout;
        self
    }
}
