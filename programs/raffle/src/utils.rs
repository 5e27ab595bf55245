/// Reduce a random word, read as an unsigned 256-bit big-endian integer, modulo `modulus`.
///
/// The reduction is exact over all 256 bits. When `modulus` does not divide 2^256 the
/// low residues are very slightly more likely than the high ones; that bias is accepted.
/// Returns `None` for a zero modulus.
pub fn reduce_word(word: &[u8; 32], modulus: u64) -> Option<u64> {
    if modulus == 0 {
        return None;
    }
    let modulus = modulus as u128;
    let rem = word
        .iter()
        .fold(0u128, |acc, byte| (acc * 256 + *byte as u128) % modulus);
    Some(rem as u64)
}

/// Index into a roster of `count` entries selected by `word`.
pub fn winner_index(word: &[u8; 32], count: usize) -> Option<usize> {
    reduce_word(word, count as u64).map(|index| index as usize)
}

/// Build a random word holding `value` in its low-order bytes.
pub fn word_from_u64(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Lamport balances involved in paying out a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutBalances {
    pub vault_lamports: u64,
    /// Rent-exempt reserve the vault keeps after every payout.
    pub vault_reserve: u64,
    pub winner_lamports: u64,
    /// Minimum balance the winner needs if its account does not exist yet.
    pub winner_min_balance: u64,
    pub winner_executable: bool,
}

/// Whether the ledger would accept moving `amount` from the vault to the winner.
pub fn can_pay_out(amount: u64, balances: &PayoutBalances) -> bool {
    let spendable = balances
        .vault_lamports
        .saturating_sub(balances.vault_reserve);
    let winner_can_receive = balances.winner_lamports > 0 || amount >= balances.winner_min_balance;
    spendable >= amount && winner_can_receive && !balances.winner_executable
}
