pub mod leaderboard;
pub mod upload;
