/// Plain-text password of every user inserted by the user fixtures
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Path of the mocked exchange rate endpoint
pub const EXCHANGE_RATE_PATH: &str = "/v4/latest/USD";
