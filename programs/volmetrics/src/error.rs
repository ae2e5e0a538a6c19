use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Input outside of the function domain")]
    InvalidInput,
    #[msg("Logarithm of a value below one is negative")]
    NegativeLogarithm,
    #[msg("Not enough positive samples to estimate metrics")]
    InsufficientSamples,
    #[msg("Signer is not the market authority")]
    InvalidAuthority,
    #[msg("Market account does not match its seeds")]
    InvalidMarket,
}
