use anchor_lang::prelude::*;

pub mod constants;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

pub use instructions::*;
use state::{RaffleParams, RaffleSummary, UpkeepStatus};

declare_id!("CZtojLwp8K6UiiuiQTMDVNEEZntunmLmY4QspJaVmF5p");

/// Self-operating raffle drawn with randomness from a VRF coordinator.
///
/// Players pay at least the entrance fee into a pool. Once the interval has
/// elapsed and the pool is non-empty, any keeper may start a draw; the coordinator
/// later calls back with a random word, the winner takes the whole pool and a
/// new round opens.
///
/// ## Round lifecycle
///
/// 1. **Enter**: `enter_raffle` appends the player and adds the amount to the pool
///    while the raffle is `Open`.
/// 2. **Upkeep**: keepers poll `check_upkeep`; `perform_upkeep` re-checks the
///    predicate, flips to `Drawing` and CPIs `request_random_words` into the coordinator.
/// 3. **Fulfill**: the coordinator CPIs `fulfill_random_words`, signed by its config
///    PDA. The winner is `participants[word mod count]`; the pool is transferred and the
///    raffle returns to `Open` with an empty roster.
#[program]
pub mod raffle {
    use super::*;

    /// Create the raffle singleton. Configuration cannot be changed afterwards.
    pub fn initialize(ctx: Context<Initialize>, params: RaffleParams) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Enter the current round with `amount` lamports (at least the entrance fee).
    pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
        instructions::enter_raffle::handler(ctx, amount)
    }

    /// Report whether a draw may start now. Read-only; `check_data` is ignored.
    pub fn check_upkeep(ctx: Context<ReadRaffle>, check_data: Vec<u8>) -> Result<UpkeepStatus> {
        instructions::views::check_upkeep(ctx, check_data)
    }

    /// Start a draw by requesting one random word from the coordinator.
    ///
    /// Fails with `UpkeepNotNeeded` unless the upkeep predicate holds at execution time.
    pub fn perform_upkeep(ctx: Context<PerformUpkeep>, perform_data: Vec<u8>) -> Result<()> {
        instructions::perform_upkeep::handler(ctx, perform_data)
    }

    /// Coordinator callback delivering the random words for `request_id`.
    ///
    /// Only callable through the coordinator, whose config PDA must sign.
    pub fn fulfill_random_words(
        ctx: Context<FulfillRandomWords>,
        request_id: u64,
        random_words: Vec<[u8; 32]>,
    ) -> Result<()> {
        instructions::fulfill_random_words::handler(ctx, request_id, random_words)
    }

    /// Return the entrant at `index` in the current round.
    pub fn get_participant(ctx: Context<ReadRaffle>, index: u64) -> Result<Pubkey> {
        instructions::views::get_participant(ctx, index)
    }

    /// Return a snapshot of the raffle's public state.
    pub fn get_raffle_summary(ctx: Context<ReadRaffle>) -> Result<RaffleSummary> {
        instructions::views::get_raffle_summary(ctx)
    }
}
