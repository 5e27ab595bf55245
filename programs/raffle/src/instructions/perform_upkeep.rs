use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::coordinator::{self, RandomWordsRequest, RequestRandomWordsAccounts};
use crate::errors::RaffleError;
use crate::events::RequestedRaffleWinner;
use crate::state::Raffle;

/// Accounts required to start a draw.
///
/// Anyone may submit this; the upkeep predicate is re-evaluated on-chain.
#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    /// The keeper triggering the draw; pays rent for the coordinator's request account.
    #[account(mut)]
    pub caller: Signer<'info>,

    #[account(
        mut,
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    /// CHECK: Pinned to the configured coordinator program.
    #[account(
        executable,
        address = raffle.config.coordinator_program @ RaffleError::InvalidCoordinatorAccount,
    )]
    pub coordinator_program: UncheckedAccount<'info>,

    /// Coordinator config PDA; read for the next request id, mutated by the coordinator.
    /// CHECK: Pinned to the configured address; owner and layout checked when read.
    #[account(
        mut,
        address = raffle.config.coordinator_config @ RaffleError::InvalidCoordinatorAccount,
    )]
    pub coordinator_config: UncheckedAccount<'info>,

    /// CHECK: Pinned to the configured subscription; balance is managed by the coordinator.
    #[account(
        mut,
        address = raffle.config.subscription @ RaffleError::InvalidCoordinatorAccount,
    )]
    pub subscription: UncheckedAccount<'info>,

    /// CHECK: Validated by the coordinator via PDA derivation.
    pub consumer_registration: UncheckedAccount<'info>,

    /// CHECK: Created by the coordinator at `["request", request_id]`.
    #[account(mut)]
    pub request: UncheckedAccount<'info>,

    pub raffle_program: Program<'info, crate::program::Raffle>,
    pub system_program: Program<'info, System>,
}

/// Start a draw: flip to `Drawing` and request one random word.
///
/// The state change and the coordinator request land in the same instruction, so a
/// rejected request leaves the raffle untouched.
pub fn handler(ctx: Context<PerformUpkeep>, _perform_data: Vec<u8>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let request_id = coordinator::read_next_request_id(
        &ctx.accounts.coordinator_config.to_account_info(),
        &ctx.accounts.coordinator_program.key(),
    )?;

    let raffle = &mut ctx.accounts.raffle;
    raffle.begin_draw(now, request_id)?;
    let round = raffle.round;
    let request = RandomWordsRequest::for_round(&raffle.config, round, request_id);

    coordinator::request_random_words(
        ctx.accounts.coordinator_program.to_account_info(),
        RequestRandomWordsAccounts {
            requester: ctx.accounts.caller.to_account_info(),
            config: ctx.accounts.coordinator_config.to_account_info(),
            subscription: ctx.accounts.subscription.to_account_info(),
            consumer_registration: ctx.accounts.consumer_registration.to_account_info(),
            consumer_program: ctx.accounts.raffle_program.to_account_info(),
            request: ctx.accounts.request.to_account_info(),
            system_program: ctx.accounts.system_program.to_account_info(),
        },
        &request,
    )?;

    emit!(RequestedRaffleWinner { request_id, round });

    msg!("Draw requested: round={} request_id={}", round, request_id);
    Ok(())
}
