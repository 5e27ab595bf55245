use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::{RAFFLE_SEED, VAULT_SEED};
use crate::events::RaffleEntered;
use crate::state::Raffle;

/// Accounts required to enter the current round.
#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    /// The entrant; pays `amount` into the vault.
    #[account(mut)]
    pub player: Signer<'info>,

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

    pub system_program: Program<'info, System>,
}

/// Admit the signer with `amount` lamports.
pub fn handler(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
    let player = ctx.accounts.player.key();
    let raffle = &mut ctx.accounts.raffle;
    let participant_index = raffle.enter(player, amount)?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.player.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(RaffleEntered {
        player,
        amount,
        participant_index,
        pool: raffle.pool,
        round: raffle.round,
    });

    msg!(
        "Entered round {}: player={} index={} pool={}",
        raffle.round,
        player,
        participant_index,
        raffle.pool
    );
    Ok(())
}
