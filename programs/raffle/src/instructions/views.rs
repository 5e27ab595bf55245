use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::state::{Raffle, RaffleSummary, UpkeepStatus};

/// Accounts for the read-only instructions. Results are returned as return data.
#[derive(Accounts)]
pub struct ReadRaffle<'info> {
    #[account(
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,
}

/// Evaluate the upkeep predicate. The input blob is accepted and ignored.
pub fn check_upkeep(ctx: Context<ReadRaffle>, _check_data: Vec<u8>) -> Result<UpkeepStatus> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx.accounts.raffle.upkeep_status(now))
}

pub fn get_participant(ctx: Context<ReadRaffle>, index: u64) -> Result<Pubkey> {
    ctx.accounts.raffle.participant(index)
}

pub fn get_raffle_summary(ctx: Context<ReadRaffle>) -> Result<RaffleSummary> {
    Ok(ctx.accounts.raffle.summary())
}
