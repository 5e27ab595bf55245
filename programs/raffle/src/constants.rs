// PDA seeds
// =========

/// Seed of the singleton raffle account.
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Seed prefix of the system-owned vault holding the pool: `["raffle-vault", raffle]`.
pub const VAULT_SEED: &[u8] = b"raffle-vault";

/// Seeds used by the VRF coordinator program for its own accounts.
pub const COORDINATOR_CONFIG_SEED: &[u8] = b"coordinator-config";
pub const SUBSCRIPTION_SEED: &[u8] = b"subscription";
pub const CONSUMER_SEED: &[u8] = b"consumer";
pub const REQUEST_SEED: &[u8] = b"request";

// Protocol limits
// ===============

/// Maximum number of entries a single round can hold.
/// The roster is stored inline in the raffle account (32 bytes per entry).
pub const MAX_PARTICIPANTS: usize = 128;

/// Random words requested per draw. Only the first is used for winner selection.
pub const NUM_WORDS: u32 = 1;

/// Round number of a freshly initialized raffle.
pub const INITIAL_ROUND: u64 = 1;

// Deployment defaults
// ===================

/// 0.01 SOL.
pub const DEFAULT_ENTRANCE_FEE: u64 = 10_000_000;

/// Seconds between draws.
pub const DEFAULT_INTERVAL_SECS: i64 = 30;

/// Compute unit budget the coordinator grants the winner-selection callback.
pub const DEFAULT_CALLBACK_COMPUTE_LIMIT: u32 = 500_000;

/// Confirmation depth (slots) the oracle waits before answering.
pub const DEFAULT_REQUEST_CONFIRMATIONS: u16 = 3;
