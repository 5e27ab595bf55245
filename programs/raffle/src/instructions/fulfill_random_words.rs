use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::{RAFFLE_SEED, VAULT_SEED};
use crate::errors::RaffleError;
use crate::events::WinnerPicked;
use crate::state::Raffle;
use crate::utils::{can_pay_out, PayoutBalances};

/// Accounts of the coordinator's fulfillment callback.
///
/// The coordinator always passes its config PDA first, signed via `invoke_signed`;
/// the rest are the remaining accounts supplied by the fulfiller.
#[derive(Accounts)]
pub struct FulfillRandomWords<'info> {
    /// CHECK: Must be the configured coordinator config PDA and a signer; checked in the handler
    /// so that every spoofed caller is reported as an unrecognized request.
    pub coordinator_config: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(
        mut,
        seeds = [VAULT_SEED, raffle.key().as_ref()],
        bump = raffle.vault_bump,
    )]
    pub vault: SystemAccount<'info>,

    /// CHECK: Must equal the participant selected by the random word.
    #[account(mut)]
    pub winner: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Settle the pending draw: select the winner, pay out the pool and reopen.
///
/// If the payout fails the instruction fails, the raffle stays in `Drawing` with the
/// same pending id, and the coordinator's request stays pending so the fulfillment
/// can be resubmitted.
pub fn handler(
    ctx: Context<FulfillRandomWords>,
    request_id: u64,
    random_words: Vec<[u8; 32]>,
) -> Result<()> {
    let coordinator_config = &ctx.accounts.coordinator_config;
    let raffle = &ctx.accounts.raffle;
    raffle.authorize_fulfiller(&coordinator_config.key(), coordinator_config.is_signer)?;
    raffle.ensure_pending(request_id)?;

    let random_word = random_words.first().ok_or(RaffleError::MissingRandomWords)?;
    let now = Clock::get()?.unix_timestamp;
    let record = raffle.pick_winner(request_id, random_word, now)?;

    require_keys_eq!(
        ctx.accounts.winner.key(),
        record.winner,
        RaffleError::WinnerAccountMismatch
    );

    let rent = Rent::get()?;
    let winner = &ctx.accounts.winner;
    let balances = PayoutBalances {
        vault_lamports: ctx.accounts.vault.lamports(),
        vault_reserve: rent.minimum_balance(0),
        winner_lamports: winner.lamports(),
        winner_min_balance: rent.minimum_balance(winner.data_len()),
        winner_executable: winner.executable,
    };
    if !can_pay_out(record.amount, &balances) {
        msg!(
            "Payout of {} to {} refused by ledger: {:?}",
            record.amount,
            record.winner,
            balances
        );
        return err!(RaffleError::PayoutTransferFailed);
    }

    let raffle_key = raffle.key();
    let vault_bump = [raffle.vault_bump];
    let signer_seeds: &[&[u8]] = &[VAULT_SEED, raffle_key.as_ref(), &vault_bump];

    system_program::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.winner.to_account_info(),
            },
            &[signer_seeds],
        ),
        record.amount,
    )
    .map_err(|_| error!(RaffleError::PayoutTransferFailed))?;

    ctx.accounts.raffle.complete_round(record)?;

    emit!(WinnerPicked {
        winner: record.winner,
        amount: record.amount,
        request_id,
        round: record.round,
        timestamp: record.timestamp,
    });

    msg!(
        "Winner picked: round={} request_id={} winner={} amount={}",
        record.round,
        request_id,
        record.winner,
        record.amount
    );
    Ok(())
}
