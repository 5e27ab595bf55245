//! Client side of the VRF coordinator protocol.
//!
//! The coordinator is a separate program. The raffle only depends on its wire
//! format: the `request_random_words` instruction it invokes, the layout of the
//! coordinator config account (to learn the id the next request will receive) and
//! the PDA seeds the coordinator derives its accounts from.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program::invoke;
use sha2::{Digest, Sha256};

use crate::constants::{
    CONSUMER_SEED, COORDINATOR_CONFIG_SEED, RAFFLE_SEED, REQUEST_SEED, SUBSCRIPTION_SEED,
    VAULT_SEED,
};
use crate::errors::RaffleError;
use crate::state::RaffleConfig;

/// Byte offset of `request_counter` in the coordinator config account:
/// discriminator (8) + admin (32) + authority (32) + fee_per_word (8) + max_num_words (4).
pub const REQUEST_COUNTER_OFFSET: usize = 8 + 32 + 32 + 8 + 4;

/// Anchor instruction discriminator: `SHA256("global:<name>")[..8]`.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    sighash("global", name)
}

/// Anchor account discriminator: `SHA256("account:<Name>")[..8]`.
pub fn account_discriminator(name: &str) -> [u8; 8] {
    sighash("account", name)
}

fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let hash = hasher.finalize();
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash[..8]);
    disc
}

/// Expand the coordinator's base output into word `index`: `SHA256(base || index_le)`.
///
/// The coordinator delivers these expanded words to the callback, so an off-chain
/// fulfiller uses this to work out which participant will win before submitting.
pub fn expand_word(base_randomness: &[u8; 32], index: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(base_randomness);
    hasher.update(index.to_le_bytes());
    let hash = hasher.finalize();
    let mut word = [0u8; 32];
    word.copy_from_slice(&hash);
    word
}

pub fn config_address(coordinator_program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[COORDINATOR_CONFIG_SEED], coordinator_program).0
}

pub fn subscription_address(coordinator_program: &Pubkey, subscription_id: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[SUBSCRIPTION_SEED, subscription_id.to_le_bytes().as_ref()],
        coordinator_program,
    )
    .0
}

pub fn consumer_address(
    coordinator_program: &Pubkey,
    subscription_id: u64,
    consumer_program: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[
            CONSUMER_SEED,
            subscription_id.to_le_bytes().as_ref(),
            consumer_program.as_ref(),
        ],
        coordinator_program,
    )
    .0
}

pub fn request_address(coordinator_program: &Pubkey, request_id: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[REQUEST_SEED, request_id.to_le_bytes().as_ref()],
        coordinator_program,
    )
    .0
}

/// Read the id the coordinator will assign to its next request.
///
/// The coordinator hands out ids from a monotonically increasing counter in its
/// config account, so the value read here is the id of the request issued by the
/// CPI that follows in the same instruction.
pub fn read_next_request_id(config: &AccountInfo, coordinator_program: &Pubkey) -> Result<u64> {
    require_keys_eq!(
        *config.owner,
        *coordinator_program,
        RaffleError::InvalidCoordinatorAccount
    );
    let data = config.try_borrow_data()?;
    parse_next_request_id(&data)
}

/// Parse `request_counter` out of raw coordinator config account data.
pub fn parse_next_request_id(data: &[u8]) -> Result<u64> {
    require!(
        data.len() >= REQUEST_COUNTER_OFFSET + 8,
        RaffleError::InvalidCoordinatorAccount
    );
    require!(
        data[..8] == account_discriminator("CoordinatorConfig"),
        RaffleError::InvalidCoordinatorAccount
    );

    let mut counter = [0u8; 8];
    counter.copy_from_slice(&data[REQUEST_COUNTER_OFFSET..REQUEST_COUNTER_OFFSET + 8]);
    Ok(u64::from_le_bytes(counter))
}

/// Seed sent with a draw request: `SHA256(key_hash || round_le || request_id_le)`.
///
/// Binds the configured key/tier identifier to the round being drawn, so no two
/// requests from the raffle share a seed.
pub fn request_seed(key_hash: &[u8; 32], round: u64, request_id: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(key_hash);
    hasher.update(round.to_le_bytes());
    hasher.update(request_id.to_le_bytes());
    let hash = hasher.finalize();
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hash);
    seed
}

/// Arguments of the coordinator's `request_random_words` instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomWordsRequest {
    pub num_words: u32,
    pub seed: [u8; 32],
    pub callback_compute_limit: u32,
}

impl RandomWordsRequest {
    pub fn for_round(config: &RaffleConfig, round: u64, request_id: u64) -> Self {
        Self {
            num_words: config.num_words,
            seed: request_seed(&config.key_hash, round, request_id),
            callback_compute_limit: config.callback_compute_limit,
        }
    }

    /// Discriminator followed by the Borsh-encoded arguments
    /// `(num_words: u32, seed: [u8; 32], callback_compute_limit: u32)`.
    pub fn instruction_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(8 + 4 + 32 + 4);
        data.extend_from_slice(&instruction_discriminator("request_random_words"));
        data.extend_from_slice(&self.num_words.to_le_bytes());
        data.extend_from_slice(&self.seed);
        data.extend_from_slice(&self.callback_compute_limit.to_le_bytes());
        data
    }
}

/// Accounts of the coordinator's `request_random_words` instruction, in order.
pub struct RequestRandomWordsAccounts<'info> {
    /// Pays rent for the request account.
    pub requester: AccountInfo<'info>,
    pub config: AccountInfo<'info>,
    pub subscription: AccountInfo<'info>,
    pub consumer_registration: AccountInfo<'info>,
    /// This program; the coordinator checks it against the consumer registration.
    pub consumer_program: AccountInfo<'info>,
    pub request: AccountInfo<'info>,
    pub system_program: AccountInfo<'info>,
}

impl<'info> RequestRandomWordsAccounts<'info> {
    fn account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.requester.key, true),
            AccountMeta::new(*self.config.key, false),
            AccountMeta::new(*self.subscription.key, false),
            AccountMeta::new_readonly(*self.consumer_registration.key, false),
            AccountMeta::new_readonly(*self.consumer_program.key, false),
            AccountMeta::new(*self.request.key, false),
            AccountMeta::new_readonly(*self.system_program.key, false),
        ]
    }

    fn into_account_infos(self) -> Vec<AccountInfo<'info>> {
        vec![
            self.requester,
            self.config,
            self.subscription,
            self.consumer_registration,
            self.consumer_program,
            self.request,
            self.system_program,
        ]
    }
}

/// Issue a randomness request to the coordinator.
///
/// Any rejection by the coordinator (unfunded subscription, unregistered consumer, ...)
/// is returned as-is and aborts the calling instruction.
pub fn request_random_words<'info>(
    coordinator_program: AccountInfo<'info>,
    accounts: RequestRandomWordsAccounts<'info>,
    request: &RandomWordsRequest,
) -> Result<()> {
    let ix = Instruction {
        program_id: *coordinator_program.key,
        accounts: accounts.account_metas(),
        data: request.instruction_data(),
    };

    let mut account_infos = accounts.into_account_infos();
    account_infos.push(coordinator_program);

    invoke(&ix, &account_infos)?;
    Ok(())
}

pub fn raffle_address() -> Pubkey {
    Pubkey::find_program_address(&[RAFFLE_SEED], &crate::ID).0
}

pub fn vault_address(raffle: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[VAULT_SEED, raffle.as_ref()], &crate::ID).0
}

/// Remaining accounts a fulfiller appends to the coordinator's `fulfill_random_words`
/// so the callback can pay `winner`.
///
/// The coordinator prepends its own config PDA as signer, giving the callback:
/// 1. coordinator_config (signer)
/// 2. raffle (writable)
/// 3. vault (writable)
/// 4. winner (writable)
/// 5. system_program
pub fn callback_accounts(winner: &Pubkey) -> Vec<AccountMeta> {
    let raffle = raffle_address();
    vec![
        AccountMeta::new(raffle, false),
        AccountMeta::new(vault_address(&raffle), false),
        AccountMeta::new(*winner, false),
        AccountMeta::new_readonly(anchor_lang::system_program::ID, false),
    ]
}
