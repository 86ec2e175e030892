pub mod leaderboard;
pub mod upload;

/// Every read goes back to the store.
pub const NO_STORE: &str = "no-cache, no-store, must-revalidate";
