//! Full round lifecycle driven through the raffle's public state API, with a
//! simple in-memory ledger standing in for lamport balances.

use std::collections::HashMap;

use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use raffle::constants::{DEFAULT_ENTRANCE_FEE, INITIAL_ROUND, NUM_WORDS};
use raffle::coordinator::expand_word;
use raffle::errors::RaffleError;
use raffle::state::{Raffle, RaffleConfig, RaffleState};
use raffle::utils::{can_pay_out, winner_index, word_from_u64, PayoutBalances};

const FEE: u64 = DEFAULT_ENTRANCE_FEE;
const INTERVAL: i64 = 30;
const START: i64 = 1_700_000_000;
const RENT_RESERVE: u64 = 890_880;
const STARTING_BALANCE: u64 = 10_000_000_000;

struct Harness {
    raffle: Raffle,
    vault: Pubkey,
    balances: HashMap<Pubkey, u64>,
    next_request_id: u64,
}

impl Harness {
    fn new() -> Self {
        let config = RaffleConfig {
            entrance_fee: FEE,
            interval: INTERVAL,
            coordinator_program: Pubkey::new_unique(),
            coordinator_config: Pubkey::new_unique(),
            subscription: Pubkey::new_unique(),
            subscription_id: 1,
            key_hash: [0x11; 32],
            request_confirmations: 3,
            callback_compute_limit: 500_000,
            num_words: NUM_WORDS,
        };
        let vault = Pubkey::new_unique();
        let mut balances = HashMap::new();
        balances.insert(vault, RENT_RESERVE);

        Self {
            raffle: Raffle::new(Pubkey::new_unique(), config, START, 255, 254),
            vault,
            balances,
            next_request_id: 1,
        }
    }

    fn player(&mut self) -> Pubkey {
        let player = Pubkey::new_unique();
        self.balances.insert(player, STARTING_BALANCE);
        player
    }

    fn balance(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: Pubkey, to: Pubkey, amount: u64) {
        *self.balances.get_mut(&from).unwrap() -= amount;
        *self.balances.entry(to).or_insert(0) += amount;
    }

    fn enter(&mut self, player: Pubkey, amount: u64) -> Result<u32> {
        let index = self.raffle.enter(player, amount)?;
        self.transfer(player, self.vault, amount);
        Ok(index)
    }

    fn perform_upkeep(&mut self, now: i64) -> Result<u64> {
        let request_id = self.next_request_id;
        self.raffle.begin_draw(now, request_id)?;
        self.next_request_id += 1;
        Ok(request_id)
    }

    fn fulfill(&mut self, caller: Pubkey, request_id: u64, word: [u8; 32], now: i64) -> Result<Pubkey> {
        self.raffle.authorize_fulfiller(&caller, true)?;
        let record = self.raffle.pick_winner(request_id, &word, now)?;

        let balances = PayoutBalances {
            vault_lamports: self.balance(&self.vault),
            vault_reserve: RENT_RESERVE,
            winner_lamports: self.balance(&record.winner),
            winner_min_balance: RENT_RESERVE,
            winner_executable: false,
        };
        require!(
            can_pay_out(record.amount, &balances),
            RaffleError::PayoutTransferFailed
        );

        self.transfer(self.vault, record.winner, record.amount);
        self.raffle.complete_round(record)?;
        Ok(record.winner)
    }

    fn coordinator(&self) -> Pubkey {
        self.raffle.config.coordinator_config
    }
}

fn assert_raffle_error<T: std::fmt::Debug>(result: Result<T>, expected: RaffleError) {
    assert_eq!(result.unwrap_err(), Error::from(expected));
}

#[test]
fn underpaid_entry_is_rejected() {
    let mut h = Harness::new();
    let player = h.player();

    assert_raffle_error(h.enter(player, FEE / 2), RaffleError::InsufficientEntranceFee);
    assert_eq!(h.raffle.participant_count(), 0);
    assert_eq!(h.raffle.pool, 0);
    assert_eq!(h.balance(&player), STARTING_BALANCE);
}

#[test]
fn entry_is_recorded_but_upkeep_waits_for_interval() {
    let mut h = Harness::new();
    let player = h.player();

    h.enter(player, FEE).unwrap();
    assert_eq!(h.raffle.participant_count(), 1);
    assert_eq!(h.raffle.participant(0).unwrap(), player);
    assert_eq!(h.raffle.pool, FEE);
    assert_eq!(h.balance(&h.vault), RENT_RESERVE + FEE);

    assert!(!h.raffle.check_upkeep(START));
    assert_raffle_error(h.perform_upkeep(START + 5), RaffleError::UpkeepNotNeeded);
    assert_eq!(h.raffle.state, RaffleState::Open);
}

#[test]
fn draw_blocks_new_entries() {
    let mut h = Harness::new();
    let player = h.player();
    h.enter(player, FEE).unwrap();

    let now = START + INTERVAL + 1;
    assert!(h.raffle.check_upkeep(now));
    let request_id = h.perform_upkeep(now).unwrap();

    assert_eq!(h.raffle.state, RaffleState::Drawing);
    assert_eq!(h.raffle.pending_request_id, Some(request_id));
    assert!(!h.raffle.check_upkeep(now));

    let late = h.player();
    assert_raffle_error(h.enter(late, FEE), RaffleError::RaffleNotOpen);
    assert_eq!(h.balance(&late), STARTING_BALANCE);
}

#[test]
fn upkeep_not_needed_without_players() {
    let mut h = Harness::new();
    let now = START + INTERVAL * 10;

    let status = h.raffle.upkeep_status(now);
    assert!(status.is_open && status.time_passed);
    assert!(!status.upkeep_needed);
    assert_raffle_error(h.perform_upkeep(now), RaffleError::UpkeepNotNeeded);
}

#[test]
fn four_entrants_winner_takes_pool() {
    let mut h = Harness::new();
    let players: Vec<Pubkey> = (0..4).map(|_| h.player()).collect();
    for player in &players {
        h.enter(*player, FEE).unwrap();
    }
    assert_eq!(h.raffle.pool, FEE * 4);

    let now = START + INTERVAL + 1;
    let request_id = h.perform_upkeep(now).unwrap();
    let coordinator = h.coordinator();

    // 10 mod 4 == 2
    let winner = h
        .fulfill(coordinator, request_id, word_from_u64(10), now + 5)
        .unwrap();

    assert_eq!(winner, players[2]);
    assert_eq!(h.balance(&players[2]), STARTING_BALANCE - FEE + FEE * 4);
    for loser in [players[0], players[1], players[3]] {
        assert_eq!(h.balance(&loser), STARTING_BALANCE - FEE);
    }
    assert_eq!(h.balance(&h.vault), RENT_RESERVE);

    assert_eq!(h.raffle.state, RaffleState::Open);
    assert_eq!(h.raffle.participant_count(), 0);
    assert_eq!(h.raffle.pool, 0);
    assert_eq!(h.raffle.pending_request_id, None);
    assert_eq!(h.raffle.last_timestamp, now + 5);

    let record = h.raffle.recent_winner.unwrap();
    assert_eq!(record.winner, players[2]);
    assert_eq!(record.amount, FEE * 4);
    assert_eq!(record.round, INITIAL_ROUND);
    assert_eq!(h.raffle.round, INITIAL_ROUND + 1);
}

#[test]
fn unknown_request_leaves_state_unchanged() {
    let mut h = Harness::new();
    let coordinator = h.coordinator();

    // Nothing pending.
    assert_raffle_error(
        h.fulfill(coordinator, 99, [1u8; 32], START),
        RaffleError::UnrecognizedRequest,
    );
    assert_eq!(h.raffle.state, RaffleState::Open);

    let player = h.player();
    h.enter(player, FEE).unwrap();
    let request_id = h.perform_upkeep(START + INTERVAL).unwrap();

    assert_raffle_error(
        h.fulfill(coordinator, request_id + 1, [1u8; 32], START + INTERVAL),
        RaffleError::UnrecognizedRequest,
    );
    assert_eq!(h.raffle.state, RaffleState::Drawing);
    assert_eq!(h.raffle.pending_request_id, Some(request_id));
    assert_eq!(h.raffle.pool, FEE);
}

#[test]
fn spoofed_fulfiller_is_rejected() {
    let mut h = Harness::new();
    let player = h.player();
    h.enter(player, FEE).unwrap();
    let request_id = h.perform_upkeep(START + INTERVAL).unwrap();

    let impostor = h.player();
    assert_raffle_error(
        h.fulfill(impostor, request_id, [0u8; 32], START + INTERVAL),
        RaffleError::UnrecognizedRequest,
    );
    assert_eq!(h.raffle.state, RaffleState::Drawing);
    assert_eq!(h.balance(&player), STARTING_BALANCE - FEE);
}

#[test]
fn replayed_fulfillment_is_rejected_for_any_word() {
    let mut h = Harness::new();
    let player = h.player();
    h.enter(player, FEE).unwrap();
    let request_id = h.perform_upkeep(START + INTERVAL).unwrap();
    let coordinator = h.coordinator();

    h.fulfill(coordinator, request_id, [5u8; 32], START + INTERVAL)
        .unwrap();
    let paid = h.balance(&player);

    for word in [[5u8; 32], [0u8; 32], [0xffu8; 32]] {
        assert_raffle_error(
            h.fulfill(coordinator, request_id, word, START + INTERVAL + 1),
            RaffleError::UnrecognizedRequest,
        );
    }
    assert_eq!(h.balance(&player), paid);
    assert_eq!(h.raffle.round, INITIAL_ROUND + 1);
}

#[test]
fn failed_payout_keeps_draw_pending_until_retry() {
    let mut h = Harness::new();
    let player = h.player();
    h.enter(player, FEE).unwrap();
    let request_id = h.perform_upkeep(START + INTERVAL).unwrap();
    let coordinator = h.coordinator();

    // Drain the vault behind the raffle's back so the ledger refuses the payout.
    let vault = h.vault;
    let sink = Pubkey::new_unique();
    h.transfer(vault, sink, FEE);

    assert_raffle_error(
        h.fulfill(coordinator, request_id, [0u8; 32], START + INTERVAL),
        RaffleError::PayoutTransferFailed,
    );
    assert_eq!(h.raffle.state, RaffleState::Drawing);
    assert_eq!(h.raffle.pending_request_id, Some(request_id));
    assert_eq!(h.raffle.pool, FEE);
    assert_eq!(h.raffle.recent_winner, None);

    // Refill and resubmit the same fulfillment.
    h.transfer(sink, vault, FEE);
    let winner = h
        .fulfill(coordinator, request_id, [0u8; 32], START + INTERVAL + 60)
        .unwrap();
    assert_eq!(winner, player);
    assert_eq!(h.balance(&player), STARTING_BALANCE);
    assert_eq!(h.raffle.state, RaffleState::Open);
}

#[test]
fn consecutive_rounds_reuse_the_same_raffle() {
    let mut h = Harness::new();
    let coordinator = h.coordinator();
    let mut now = START;

    for round in 0..3u64 {
        let a = h.player();
        let b = h.player();
        h.enter(a, FEE).unwrap();
        h.enter(b, FEE * 2).unwrap();
        let pool = h.raffle.pool;
        assert_eq!(pool, FEE * 3);

        // The interval restarts from the previous payout.
        assert!(!h.raffle.check_upkeep(now + INTERVAL - 1));
        now += INTERVAL;
        let request_id = h.perform_upkeep(now).unwrap();

        let base = [round as u8; 32];
        let word = expand_word(&base, 0);
        let expected = [a, b][winner_index(&word, 2).unwrap()];
        let before = h.balance(&expected);

        let winner = h.fulfill(coordinator, request_id, word, now).unwrap();
        assert_eq!(winner, expected);
        assert_eq!(h.balance(&expected), before + pool);
        assert_eq!(h.raffle.round, INITIAL_ROUND + round + 1);
    }

    assert_eq!(h.balance(&h.vault), RENT_RESERVE);
}
