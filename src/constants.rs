//! Application constants and configuration

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "spe_ed viewer";

pub const DEFAULT_SERVER_URL: &str = "wss://msoll.de/spe_ed";
pub const RULES_URL: &str = "https://github.com/informatiCup/InformatiCup2021/";

/// Anchor (central panel id) the root component is mounted into.
pub const MOUNT_ANCHOR: &str = "main";

// Game limits as enforced by the server
pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 10;
/// Every n-th step of a player may leave a hole in its trail.
pub const HOLES_EACH_STEP: u32 = 6;
/// Minimum speed at which holes occur.
pub const HOLE_SPEED: u8 = 3;

/// Cap on the on-screen message log
pub const MAX_MESSAGES: usize = 500;
/// Longest time the server gives for one round
pub const ROUND_TIMEOUT_MAX_SECS: i64 = 15;

/// Pixels per cell in board snapshots
pub const SNAPSHOT_SCALE: u32 = 8;
/// Largest snapshot edge in pixels
pub const MAX_SNAPSHOT_SIDE: u32 = 16_384;
/// Timeout for time endpoint requests
pub const CLOCK_SYNC_TIMEOUT_SECS: u64 = 5;
