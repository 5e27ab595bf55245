use anchor_lang::prelude::*;

use crate::constants::{
    DEFAULT_CALLBACK_COMPUTE_LIMIT, DEFAULT_ENTRANCE_FEE, DEFAULT_INTERVAL_SECS,
    DEFAULT_REQUEST_CONFIRMATIONS, INITIAL_ROUND, MAX_PARTICIPANTS, NUM_WORDS,
};
use crate::coordinator;
use crate::errors::RaffleError;
use crate::utils::winner_index;

/// Lifecycle of the raffle. There is no terminal state; rounds cycle forever.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum RaffleState {
    /// Accepting entries; a draw may start once upkeep is needed.
    Open,
    /// Entries blocked, waiting for the coordinator to fulfill the pending request.
    Drawing,
}

/// Deployment parameters supplied to `initialize`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaffleParams {
    /// Minimum lamports per entry.
    pub entrance_fee: u64,
    /// Minimum seconds between the end of one round and the next draw.
    pub interval: i64,
    /// Coordinator subscription that pays for randomness requests.
    pub subscription_id: u64,
    /// Oracle key / tier identifier, mixed into the seed of every request.
    pub key_hash: [u8; 32],
    /// Slots the oracle waits after a request before answering.
    pub request_confirmations: u16,
    /// Compute budget the coordinator grants the fulfillment callback.
    pub callback_compute_limit: u32,
}

impl Default for RaffleParams {
    fn default() -> Self {
        Self {
            entrance_fee: DEFAULT_ENTRANCE_FEE,
            interval: DEFAULT_INTERVAL_SECS,
            subscription_id: 0,
            key_hash: [0u8; 32],
            request_confirmations: DEFAULT_REQUEST_CONFIRMATIONS,
            callback_compute_limit: DEFAULT_CALLBACK_COMPUTE_LIMIT,
        }
    }
}

impl RaffleParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.entrance_fee > 0, RaffleError::InvalidConfiguration);
        require!(self.interval > 0, RaffleError::InvalidConfiguration);
        require!(
            self.callback_compute_limit > 0,
            RaffleError::InvalidConfiguration
        );
        Ok(())
    }
}

/// Immutable configuration, fixed at initialization.
///
/// Coordinator PDAs are derived once from the coordinator program id and stored,
/// so later instructions only compare addresses.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct RaffleConfig {
    pub entrance_fee: u64,
    pub interval: i64,
    /// VRF coordinator program.
    pub coordinator_program: Pubkey,
    /// Coordinator config PDA. The coordinator signs the fulfillment callback with it,
    /// which makes it the only identity allowed to fulfill.
    pub coordinator_config: Pubkey,
    /// Coordinator subscription PDA for `subscription_id`.
    pub subscription: Pubkey,
    pub subscription_id: u64,
    pub key_hash: [u8; 32],
    pub request_confirmations: u16,
    pub callback_compute_limit: u32,
    pub num_words: u32,
}

impl RaffleConfig {
    pub fn from_params(params: &RaffleParams, coordinator_program: Pubkey) -> Self {
        Self {
            entrance_fee: params.entrance_fee,
            interval: params.interval,
            coordinator_program,
            coordinator_config: coordinator::config_address(&coordinator_program),
            subscription: coordinator::subscription_address(
                &coordinator_program,
                params.subscription_id,
            ),
            subscription_id: params.subscription_id,
            key_hash: params.key_hash,
            request_confirmations: params.request_confirmations,
            callback_compute_limit: params.callback_compute_limit,
            num_words: NUM_WORDS,
        }
    }
}

/// Outcome of the most recent draw.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct WinnerRecord {
    pub winner: Pubkey,
    pub timestamp: i64,
    /// Pool paid out to `winner`.
    pub amount: u64,
    pub round: u64,
    pub request_id: u64,
}

/// Breakdown of the upkeep predicate.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepStatus {
    pub is_open: bool,
    pub time_passed: bool,
    pub has_balance: bool,
    pub has_players: bool,
    pub upkeep_needed: bool,
}

/// Snapshot of the read surface, returned by `get_raffle_summary`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RaffleSummary {
    pub entrance_fee: u64,
    pub interval: i64,
    pub state: RaffleState,
    pub participant_count: u32,
    pub pool: u64,
    pub last_timestamp: i64,
    pub pending_request_id: Option<u64>,
    pub recent_winner: Option<WinnerRecord>,
    pub round: u64,
    pub num_words: u32,
    pub request_confirmations: u16,
}

/// The raffle singleton.
///
/// Seeds: `["raffle"]`
///
/// Invariants:
/// - entries are only admitted while `state == Open`;
/// - `pending_request_id.is_some()` exactly when `state == Drawing`;
/// - `pool` is the sum of the amounts of every entry in `participants`.
#[account]
#[derive(InitSpace)]
pub struct Raffle {
    /// Account that created the raffle. Has no privileges afterwards.
    pub authority: Pubkey,
    pub config: RaffleConfig,
    pub state: RaffleState,
    /// Entries of the current round in entry order. An address entering twice
    /// appears twice.
    #[max_len(MAX_PARTICIPANTS)]
    pub participants: Vec<Pubkey>,
    /// Lamports collected this round, held by the vault PDA.
    pub pool: u64,
    /// Unix timestamp of the last payout, or of initialization.
    pub last_timestamp: i64,
    pub pending_request_id: Option<u64>,
    pub recent_winner: Option<WinnerRecord>,
    /// Current round number, starting at 1.
    pub round: u64,
    pub bump: u8,
    pub vault_bump: u8,
}

impl Raffle {
    pub fn new(
        authority: Pubkey,
        config: RaffleConfig,
        now: i64,
        bump: u8,
        vault_bump: u8,
    ) -> Self {
        Self {
            authority,
            config,
            state: RaffleState::Open,
            participants: Vec::new(),
            pool: 0,
            last_timestamp: now,
            pending_request_id: None,
            recent_winner: None,
            round: INITIAL_ROUND,
            bump,
            vault_bump,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == RaffleState::Open
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn participant(&self, index: u64) -> Result<Pubkey> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.participants.get(index))
            .copied()
            .ok_or_else(|| error!(RaffleError::ParticipantIndexOutOfBounds))
    }

    /// Admit one entry of `amount` lamports. Returns the entry's index in the roster.
    ///
    /// The whole amount goes to the pool; anything above the fee is not refunded.
    pub fn enter(&mut self, player: Pubkey, amount: u64) -> Result<u32> {
        require!(
            amount >= self.config.entrance_fee,
            RaffleError::InsufficientEntranceFee
        );
        require!(self.is_open(), RaffleError::RaffleNotOpen);
        require!(
            self.participants.len() < MAX_PARTICIPANTS,
            RaffleError::RaffleFull
        );

        let pool = self
            .pool
            .checked_add(amount)
            .ok_or(RaffleError::ArithmeticOverflow)?;

        let index = self.participants.len() as u32;
        self.participants.push(player);
        self.pool = pool;
        Ok(index)
    }

    /// Evaluate the upkeep predicate at `now`. No side effects.
    pub fn upkeep_status(&self, now: i64) -> UpkeepStatus {
        let is_open = self.is_open();
        let time_passed = now.saturating_sub(self.last_timestamp) >= self.config.interval;
        let has_balance = self.pool > 0;
        let has_players = !self.participants.is_empty();

        UpkeepStatus {
            is_open,
            time_passed,
            has_balance,
            has_players,
            upkeep_needed: is_open && time_passed && has_balance && has_players,
        }
    }

    pub fn check_upkeep(&self, now: i64) -> bool {
        self.upkeep_status(now).upkeep_needed
    }

    pub fn ensure_upkeep_needed(&self, now: i64) -> Result<()> {
        let status = self.upkeep_status(now);
        if !status.upkeep_needed {
            msg!(
                "Upkeep not needed: open={} time_passed={} pool={} players={}",
                status.is_open,
                status.time_passed,
                self.pool,
                self.participants.len()
            );
            return err!(RaffleError::UpkeepNotNeeded);
        }
        Ok(())
    }

    /// Move to `Drawing` with `request_id` pending.
    ///
    /// This is the only place the predicate is enforced for a draw; whatever the
    /// keeper observed through `check_upkeep` is re-evaluated at `now`.
    pub fn begin_draw(&mut self, now: i64, request_id: u64) -> Result<()> {
        self.ensure_upkeep_needed(now)?;
        self.state = RaffleState::Drawing;
        self.pending_request_id = Some(request_id);
        Ok(())
    }

    /// Only the coordinator config PDA, signing, may deliver randomness.
    pub fn authorize_fulfiller(&self, caller: &Pubkey, caller_signed: bool) -> Result<()> {
        require!(
            caller_signed && *caller == self.config.coordinator_config,
            RaffleError::UnrecognizedRequest
        );
        Ok(())
    }

    pub fn ensure_pending(&self, request_id: u64) -> Result<()> {
        require!(
            self.state == RaffleState::Drawing && self.pending_request_id == Some(request_id),
            RaffleError::UnrecognizedRequest
        );
        Ok(())
    }

    /// Select the winner of the pending draw without mutating anything.
    ///
    /// `winner = participants[random_word mod participant_count]`.
    pub fn pick_winner(
        &self,
        request_id: u64,
        random_word: &[u8; 32],
        now: i64,
    ) -> Result<WinnerRecord> {
        self.ensure_pending(request_id)?;
        let index = winner_index(random_word, self.participants.len())
            .ok_or(RaffleError::UnrecognizedRequest)?;

        Ok(WinnerRecord {
            winner: self.participants[index],
            timestamp: now,
            amount: self.pool,
            round: self.round,
            request_id,
        })
    }

    /// Close the round after the pool has been paid out to `record.winner`.
    pub fn complete_round(&mut self, record: WinnerRecord) -> Result<()> {
        self.ensure_pending(record.request_id)?;
        let next_round = self
            .round
            .checked_add(1)
            .ok_or(RaffleError::ArithmeticOverflow)?;

        self.recent_winner = Some(record);
        self.participants.clear();
        self.pool = 0;
        self.last_timestamp = record.timestamp;
        self.pending_request_id = None;
        self.state = RaffleState::Open;
        self.round = next_round;
        Ok(())
    }

    pub fn summary(&self) -> RaffleSummary {
        RaffleSummary {
            entrance_fee: self.config.entrance_fee,
            interval: self.config.interval,
            state: self.state,
            participant_count: self.participants.len() as u32,
            pool: self.pool,
            last_timestamp: self.last_timestamp,
            pending_request_id: self.pending_request_id,
            recent_winner: self.recent_winner,
            round: self.round,
            num_words: self.config.num_words,
            request_confirmations: self.config.request_confirmations,
        }
    }
}
