use crate::state::Listing;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    /// Native denom listings are priced and paid in.
    pub denom: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Offer a token for sale. The caller must own it on the NFT contract
    /// and have approved this marketplace to transfer it.
    ListItem {
        nft_contract: String,
        token_id: String,
        price: Uint128,
    },
    CancelListing {
        nft_contract: String,
        token_id: String,
    },
    UpdateListing {
        nft_contract: String,
        token_id: String,
        new_price: Uint128,
    },
    /// Buy a listed token. The attached funds must match the listing
    /// price exactly.
    BuyItem {
        nft_contract: String,
        token_id: String,
    },
    /// Pay out the caller's accumulated sale revenue.
    WithdrawProceeds {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Active listing for the token, or None if it is not for sale.
    #[returns(Option<Listing>)]
    GetListing {
        nft_contract: String,
        token_id: String,
    },
    /// Withdrawable balance of a seller, zero if none.
    #[returns(Uint128)]
    GetProceeds { seller: String },
    #[returns(Vec<ListingInfo>)]
    GetListingsBySeller {
        seller: String,
        from_index: Option<u64>,
        limit: Option<u64>,
    },
    #[returns(Vec<ListingInfo>)]
    GetAllListings {
        from_index: Option<u64>,
        limit: Option<u64>,
    },
    #[returns(u128)]
    GetListingCount {},
}

/// Listing row with its key, for the enumeration queries.
#[cw_serde]
pub struct ListingInfo {
    pub nft_contract: Addr,
    pub token_id: String,
    pub price: Uint128,
    pub seller: Addr,
}

#[cw_serde]
pub struct MigrateMsg {}
