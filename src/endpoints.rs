//! The API endpoints URIs.

/// The route for seeding the database from the remote dataset.
pub const SEED: &str = "/seed";
/// The route for listing transactions page by page.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the monthly sales statistics.
pub const STATISTICS: &str = "/statistics";
/// The route for the monthly price histogram.
pub const BAR_CHART: &str = "/barchart";
/// The route for the monthly category distribution.
pub const PIE_CHART: &str = "/piechart";
/// The route for the unfiltered overview of every transaction.
pub const COMBINED: &str = "/combined";
