#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coins, to_json_binary, BankMsg, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Order,
    Reply, Response, StdResult, SubMsg, Uint128, WasmMsg,
};
use cw2::{get_contract_version, set_contract_version};
use cw721::{Cw721ExecuteMsg, Cw721QueryMsg, OwnerOfResponse};
use cw_utils::{may_pay, nonpayable};
use semver::Version;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, ListingInfo, MigrateMsg, QueryMsg};
use crate::state::{Config, Listing, CONFIG, LISTINGS, LISTING_COUNTER, PROCEEDS};

pub const CONTRACT_NAME: &str = "nft-marketplace";
pub const CONTRACT_VERSION: &str = "0.1.0";

pub const BUY_REPLY: u64 = 1;

const DEFAULT_LIMIT: u64 = 10;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config { denom: msg.denom };
    CONFIG.save(deps.storage, &config)?;
    LISTING_COUNTER.save(deps.storage, &0u128)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("denom", config.denom))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::ListItem {
            nft_contract,
            token_id,
            price,
        } => execute_list_item(deps, env, info, nft_contract, token_id, price),
        ExecuteMsg::CancelListing {
            nft_contract,
            token_id,
        } => execute_cancel_listing(deps, info, nft_contract, token_id),
        ExecuteMsg::UpdateListing {
            nft_contract,
            token_id,
            new_price,
        } => execute_update_listing(deps, info, nft_contract, token_id, new_price),
        ExecuteMsg::BuyItem {
            nft_contract,
            token_id,
        } => execute_buy_item(deps, info, nft_contract, token_id),
        ExecuteMsg::WithdrawProceeds {} => execute_withdraw_proceeds(deps, info),
    }
}

pub fn execute_list_item(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    nft_contract: String,
    token_id: String,
    price: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    if price.is_zero() {
        return Err(ContractError::InvalidPrice {});
    }

    let nft_contract = deps.api.addr_validate(&nft_contract)?;

    if LISTINGS
        .may_load(deps.storage, (nft_contract.clone(), token_id.clone()))?
        .is_some()
    {
        return Err(ContractError::AlreadyListed {
            nft_contract,
            token_id,
        });
    }

    // the NFT contract is the source of truth for ownership and approval
    let token_owner: OwnerOfResponse = deps.querier.query_wasm_smart(
        nft_contract.to_string(),
        &Cw721QueryMsg::OwnerOf {
            token_id: token_id.clone(),
            include_expired: Some(false),
        },
    )?;

    if token_owner.owner != info.sender {
        return Err(ContractError::NotOwner {});
    }

    if !token_owner
        .approvals
        .iter()
        .any(|approval| approval.spender == env.contract.address)
    {
        return Err(ContractError::NotApprovedForMarketplace {});
    }

    let listing = Listing {
        price,
        seller: info.sender.clone(),
    };

    LISTINGS.save(
        deps.storage,
        (nft_contract.clone(), token_id.clone()),
        &listing,
    )?;
    LISTING_COUNTER.update(deps.storage, |counter: u128| -> StdResult<u128> {
        Ok(counter.saturating_add(1))
    })?;

    Ok(Response::new()
        .add_attribute("action", "list_item")
        .add_attribute("nft_contract", nft_contract)
        .add_attribute("token_id", token_id)
        .add_attribute("seller", info.sender)
        .add_attribute("price", price.to_string()))
}

pub fn execute_cancel_listing(
    deps: DepsMut,
    info: MessageInfo,
    nft_contract: String,
    token_id: String,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let nft_contract = deps.api.addr_validate(&nft_contract)?;

    let listing = LISTINGS
        .may_load(deps.storage, (nft_contract.clone(), token_id.clone()))?
        .ok_or_else(|| ContractError::NotListed {
            nft_contract: nft_contract.clone(),
            token_id: token_id.clone(),
        })?;

    if listing.seller != info.sender {
        return Err(ContractError::NotOwner {});
    }

    LISTINGS.remove(deps.storage, (nft_contract.clone(), token_id.clone()));
    LISTING_COUNTER.update(deps.storage, |counter: u128| -> StdResult<u128> {
        Ok(counter.saturating_sub(1))
    })?;

    Ok(Response::new()
        .add_attribute("action", "cancel_listing")
        .add_attribute("nft_contract", nft_contract)
        .add_attribute("token_id", token_id)
        .add_attribute("seller", info.sender))
}

pub fn execute_update_listing(
    deps: DepsMut,
    info: MessageInfo,
    nft_contract: String,
    token_id: String,
    new_price: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    if new_price.is_zero() {
        return Err(ContractError::InvalidPrice {});
    }

    let nft_contract = deps.api.addr_validate(&nft_contract)?;

    let mut listing = LISTINGS
        .may_load(deps.storage, (nft_contract.clone(), token_id.clone()))?
        .ok_or_else(|| ContractError::NotListed {
            nft_contract: nft_contract.clone(),
            token_id: token_id.clone(),
        })?;

    if listing.seller != info.sender {
        return Err(ContractError::NotOwner {});
    }

    listing.price = new_price;
    LISTINGS.save(
        deps.storage,
        (nft_contract.clone(), token_id.clone()),
        &listing,
    )?;

    // a price update is observably a fresh listing
    Ok(Response::new()
        .add_attribute("action", "list_item")
        .add_attribute("nft_contract", nft_contract)
        .add_attribute("token_id", token_id)
        .add_attribute("seller", info.sender)
        .add_attribute("price", new_price.to_string()))
}

pub fn execute_buy_item(
    deps: DepsMut,
    info: MessageInfo,
    nft_contract: String,
    token_id: String,
) -> Result<Response, ContractError> {
    let nft_contract = deps.api.addr_validate(&nft_contract)?;

    let listing = LISTINGS
        .may_load(deps.storage, (nft_contract.clone(), token_id.clone()))?
        .ok_or_else(|| ContractError::NotListed {
            nft_contract: nft_contract.clone(),
            token_id: token_id.clone(),
        })?;

    let config = CONFIG.load(deps.storage)?;
    let supplied = may_pay(&info, &config.denom)?;
    if supplied != listing.price {
        return Err(ContractError::PriceNotMet {
            required: listing.price,
            supplied,
        });
    }

    // the listing is gone and the seller credited before the transfer
    // message executes; a nested buy of the same token fails with NotListed
    LISTINGS.remove(deps.storage, (nft_contract.clone(), token_id.clone()));
    LISTING_COUNTER.update(deps.storage, |counter: u128| -> StdResult<u128> {
        Ok(counter.saturating_sub(1))
    })?;
    PROCEEDS.update(
        deps.storage,
        listing.seller.clone(),
        |balance| -> Result<Uint128, ContractError> {
            Ok(balance.unwrap_or_default().checked_add(listing.price)?)
        },
    )?;

    let transfer = SubMsg::reply_on_success(
        WasmMsg::Execute {
            contract_addr: nft_contract.to_string(),
            msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
                recipient: info.sender.to_string(),
                token_id: token_id.clone(),
            })?,
            funds: vec![],
        },
        BUY_REPLY,
    );

    Ok(Response::new()
        .add_attribute("action", "buy_item")
        .add_attribute("nft_contract", nft_contract)
        .add_attribute("token_id", token_id)
        .add_attribute("seller", listing.seller)
        .add_attribute("buyer", info.sender)
        .add_attribute("price", listing.price.to_string())
        .add_submessage(transfer))
}

pub fn execute_withdraw_proceeds(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let amount = PROCEEDS
        .may_load(deps.storage, info.sender.clone())?
        .unwrap_or_default();
    if amount.is_zero() {
        return Err(ContractError::NoProceeds {});
    }

    let config = CONFIG.load(deps.storage)?;

    // balance hits zero before the bank send executes; a nested
    // withdrawal during the send fails with NoProceeds
    PROCEEDS.remove(deps.storage, info.sender.clone());

    let payment = CosmosMsg::Bank(BankMsg::Send {
        to_address: info.sender.to_string(),
        amount: coins(amount.u128(), config.denom),
    });

    Ok(Response::new()
        .add_attribute("action", "withdraw_proceeds")
        .add_attribute("seller", info.sender)
        .add_attribute("amount", amount.to_string())
        .add_message(payment))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, reply: Reply) -> Result<Response, ContractError> {
    match reply.id {
        BUY_REPLY => Ok(Response::new().add_attribute("operation", "nft_transfer")),
        id => Err(ContractError::UnrecognizedReply { id }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    let stored_version: Version = stored.version.parse()?;
    let version: Version = CONTRACT_VERSION.parse()?;

    if stored.contract != CONTRACT_NAME || stored_version >= version {
        return Err(ContractError::CannotMigrate {
            stored_contract: stored.contract,
            stored_version: stored.version,
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetListing {
            nft_contract,
            token_id,
        } => to_json_binary(&get_listing(deps, nft_contract, token_id)?),
        QueryMsg::GetProceeds { seller } => to_json_binary(&get_proceeds(deps, seller)?),
        QueryMsg::GetListingsBySeller {
            seller,
            from_index,
            limit,
        } => to_json_binary(&get_listings_by_seller(deps, seller, from_index, limit)?),
        QueryMsg::GetAllListings { from_index, limit } => {
            to_json_binary(&get_all_listings(deps, from_index, limit)?)
        }
        QueryMsg::GetListingCount {} => to_json_binary(&get_listing_count(deps)?),
    }
}

pub fn get_listing(
    deps: Deps,
    nft_contract: String,
    token_id: String,
) -> StdResult<Option<Listing>> {
    let nft_contract = deps.api.addr_validate(&nft_contract)?;
    LISTINGS.may_load(deps.storage, (nft_contract, token_id))
}

pub fn get_proceeds(deps: Deps, seller: String) -> StdResult<Uint128> {
    let seller = deps.api.addr_validate(&seller)?;
    Ok(PROCEEDS
        .may_load(deps.storage, seller)?
        .unwrap_or_default())
}

pub fn get_listings_by_seller(
    deps: Deps,
    seller: String,
    from_index: Option<u64>,
    limit: Option<u64>,
) -> StdResult<Vec<ListingInfo>> {
    let seller = deps.api.addr_validate(&seller)?;
    let from_index = from_index.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    LISTINGS
        .range(deps.storage, None, None, Order::Ascending)
        .filter(|item| match item {
            Ok((_, listing)) => listing.seller == seller,
            Err(_) => true,
        })
        .skip(from_index as usize)
        .take(limit as usize)
        .map(|item| {
            item.map(|((nft_contract, token_id), listing)| ListingInfo {
                nft_contract,
                token_id,
                price: listing.price,
                seller: listing.seller,
            })
        })
        .collect()
}

pub fn get_all_listings(
    deps: Deps,
    from_index: Option<u64>,
    limit: Option<u64>,
) -> StdResult<Vec<ListingInfo>> {
    let from_index = from_index.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    LISTINGS
        .range(deps.storage, None, None, Order::Ascending)
        .skip(from_index as usize)
        .take(limit as usize)
        .map(|item| {
            item.map(|((nft_contract, token_id), listing)| ListingInfo {
                nft_contract,
                token_id,
                price: listing.price,
                seller: listing.seller,
            })
        })
        .collect()
}

pub fn get_listing_count(deps: Deps) -> StdResult<u128> {
    LISTING_COUNTER.load(deps.storage)
}
