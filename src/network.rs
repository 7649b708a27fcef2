//! Network URL constants for the quotation gateway.

/// Default base URL of a locally running AKTools gateway.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/public";

/// Endpoint serving the intraday spot quotation snapshot.
pub const SPOT_QUOTATIONS_ENDPOINT: &str = "spot_quotations_sge";

/// Endpoint serving the settled daily history series.
pub const DAILY_HISTORY_ENDPOINT: &str = "spot_hist_sge";
