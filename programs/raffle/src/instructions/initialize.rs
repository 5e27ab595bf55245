use anchor_lang::prelude::*;
use anchor_lang::solana_program::bpf_loader_upgradeable;
use anchor_lang::system_program;

use crate::constants::{RAFFLE_SEED, VAULT_SEED};
use crate::errors::RaffleError;
use crate::events::RaffleInitialized;
use crate::state::{Raffle, RaffleConfig, RaffleParams};

/// Accounts required to create the raffle singleton.
///
/// Only the program's upgrade authority may initialize, so whoever deploys the
/// program also chooses the coordinator.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Program upgrade authority. Pays for the raffle account and the vault's rent reserve.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// This program's `ProgramData` account, owned by the upgradeable loader at `[program_id]`.
    #[account(
        seeds = [crate::ID.as_ref()],
        bump,
        seeds::program = bpf_loader_upgradeable::ID,
        constraint = program_data.upgrade_authority_address == Some(authority.key()) @ RaffleError::Unauthorized,
    )]
    pub program_data: Account<'info, ProgramData>,

    /// Singleton raffle PDA. Seeds: `["raffle"]`.
    #[account(
        init,
        payer = authority,
        space = 8 + Raffle::INIT_SPACE,
        seeds = [RAFFLE_SEED],
        bump,
    )]
    pub raffle: Account<'info, Raffle>,

    /// System-owned vault holding the pool. Seeds: `["raffle-vault", raffle]`.
    #[account(
        mut,
        seeds = [VAULT_SEED, raffle.key().as_ref()],
        bump,
    )]
    pub vault: SystemAccount<'info>,

    /// The VRF coordinator program randomness is requested from.
    /// CHECK: Only its address is stored; must be executable.
    #[account(executable)]
    pub coordinator_program: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Create the raffle with immutable configuration.
pub fn handler(ctx: Context<Initialize>, params: RaffleParams) -> Result<()> {
    params.validate()?;

    let coordinator_program = ctx.accounts.coordinator_program.key();
    let config = RaffleConfig::from_params(&params, coordinator_program);

    // Keep the vault rent-exempt on its own so a payout can move the exact pool.
    let reserve = Rent::get()?.minimum_balance(0);
    let vault_lamports = ctx.accounts.vault.lamports();
    if vault_lamports < reserve {
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.authority.to_account_info(),
                    to: ctx.accounts.vault.to_account_info(),
                },
            ),
            reserve - vault_lamports,
        )?;
    }

    let now = Clock::get()?.unix_timestamp;
    let authority = ctx.accounts.authority.key();
    ctx.accounts.raffle.set_inner(Raffle::new(
        authority,
        config,
        now,
        ctx.bumps.raffle,
        ctx.bumps.vault,
    ));

    emit!(RaffleInitialized {
        authority,
        entrance_fee: params.entrance_fee,
        interval: params.interval,
        coordinator_program,
        subscription_id: params.subscription_id,
    });

    msg!(
        "Raffle initialized: fee={} interval={}s coordinator={}",
        params.entrance_fee,
        params.interval,
        coordinator_program
    );
    Ok(())
}
