pub mod expiry {
    /// Daily at midnight UTC
    pub const CRON_EXPRESSION: &str = "0 0 0 * * *";
}

pub mod uptime {
    /// Every 30 minutes on the hour and half hour
    pub const CRON_EXPRESSION: &str = "0 */30 * * * *";
}
