use cosmwasm_std::{Addr, OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Price must be greater than zero")]
    InvalidPrice {},

    #[error("Token {token_id} of {nft_contract} is already listed")]
    AlreadyListed { nft_contract: Addr, token_id: String },

    #[error("Token {token_id} of {nft_contract} is not listed")]
    NotListed { nft_contract: Addr, token_id: String },

    #[error("Caller is not the owner")]
    NotOwner {},

    #[error("Marketplace is not approved to transfer the token")]
    NotApprovedForMarketplace {},

    #[error("Price not met: required {required}, supplied {supplied}")]
    PriceNotMet { required: Uint128, supplied: Uint128 },

    #[error("No proceeds to withdraw")]
    NoProceeds {},

    #[error("The reply ID {id} is unrecognized")]
    UnrecognizedReply { id: u64 },

    #[error("Semver parsing error: {0}")]
    SemVer(String),

    #[error("Cannot migrate from {stored_contract} {stored_version}")]
    CannotMigrate {
        stored_contract: String,
        stored_version: String,
    },
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        ContractError::SemVer(err.to_string())
    }
}
