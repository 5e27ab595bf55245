use anchor_lang::prelude::*;

/// Error codes for the raffle program.
///
/// Anchor encodes these as `6000 + variant index` in on-chain error responses.
#[error_code]
pub enum RaffleError {
    /// Entry amount is below the configured entrance fee.
    #[msg("Entry amount is below the entrance fee")]
    InsufficientEntranceFee,
    /// Entry attempted while a draw is in progress.
    #[msg("Raffle is not open")]
    RaffleNotOpen,
    /// `perform_upkeep` called while the upkeep predicate is false.
    #[msg("Upkeep not needed")]
    UpkeepNotNeeded,
    /// Fulfillment with an unknown or already consumed request id, or from a caller
    /// other than the coordinator.
    #[msg("Unrecognized randomness request")]
    UnrecognizedRequest,
    /// Transferring the pool to the winner failed; the draw stays pending.
    #[msg("Payout transfer to winner failed")]
    PayoutTransferFailed,
    /// The round already holds `MAX_PARTICIPANTS` entries.
    #[msg("Raffle is full")]
    RaffleFull,
    /// The winner account supplied by the fulfiller is not the selected participant.
    #[msg("Winner account does not match the selected participant")]
    WinnerAccountMismatch,
    /// The coordinator delivered no random words.
    #[msg("No random words delivered")]
    MissingRandomWords,
    /// Initialization parameters are out of range.
    #[msg("Invalid raffle configuration")]
    InvalidConfiguration,
    /// The coordinator config account is not owned by the coordinator or is malformed.
    #[msg("Invalid coordinator account")]
    InvalidCoordinatorAccount,
    /// `get_participant` asked for an index past the end of the roster.
    #[msg("Participant index out of bounds")]
    ParticipantIndexOutOfBounds,
    /// Pool accounting overflowed.
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    /// `initialize` signed by someone other than the program's upgrade authority.
    #[msg("Signer is not the program upgrade authority")]
    Unauthorized,
}
