use anchor_lang::prelude::*;

/// Emitted once when the raffle account is created.
#[event]
pub struct RaffleInitialized {
    pub authority: Pubkey,
    pub entrance_fee: u64,
    pub interval: i64,
    pub coordinator_program: Pubkey,
    pub subscription_id: u64,
}

/// Emitted for every admitted entry.
#[event]
pub struct RaffleEntered {
    pub player: Pubkey,
    pub amount: u64,
    pub participant_index: u32,
    pub pool: u64,
    pub round: u64,
}

/// Emitted when a draw starts.
///
/// Off-chain monitors correlate this with the coordinator's `RandomWordsRequested`
/// event and, later, with [`WinnerPicked`].
#[event]
pub struct RequestedRaffleWinner {
    pub request_id: u64,
    pub round: u64,
}

/// Emitted when the coordinator's callback settles a round.
#[event]
pub struct WinnerPicked {
    pub winner: Pubkey,
    pub amount: u64,
    pub request_id: u64,
    pub round: u64,
    pub timestamp: i64,
}
