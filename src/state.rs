use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    /// Native denom all listings are priced and paid in.
    pub denom: String,
}

#[cw_serde]
pub struct Listing {
    pub price: Uint128,
    pub seller: Addr,
}

pub type TokenId = String;

pub const CONFIG: Item<Config> = Item::new("config");
pub const LISTINGS: Map<(Addr, TokenId), Listing> = Map::new("listings"); // (nft contract, token_id)
pub const PROCEEDS: Map<Addr, Uint128> = Map::new("proceeds"); // seller -> withdrawable balance
pub const LISTING_COUNTER: Item<u128> = Item::new("listing_counter");
