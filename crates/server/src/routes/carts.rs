//! Cart and item handlers.
//!
//! Each handler authenticates the caller, validates path and body input,
//! invokes one [`CartService`](cart_core::CartService) operation and maps
//! its outcome onto the JSON error envelope.

use std::num::NonZeroU32;
use std::str::FromStr;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use cart_core::{
    Cart, CartId, CartServiceError, CartStore, Item, ItemId, LinePrice, NewItem, ProductId,
};

use crate::error::{ApiError, Result};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// Request body for `POST /carts/{cart_id}/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Product to add.
    pub product_id: ProductId,
    /// Line total (unit price × quantity).
    pub price: LinePrice,
    /// Number of units; must be positive.
    pub quantity: NonZeroU32,
}

/// `POST /carts` - create an empty cart for the caller.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn create_cart<S: CartStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<(StatusCode, Json<Cart>)> {
    let cart = state
        .service()
        .create_cart(user_id)
        .await
        .map_err(|err| failure(&state, "createCart", "cannot create cart", err))?;

    tracing::info!(cart_id = %cart.id, "cart created");
    Ok((StatusCode::CREATED, Json(cart)))
}

/// `POST /carts/{cart_id}/items` - add a product line to a cart.
#[instrument(skip_all, fields(user_id = %user_id, cart_id = %cart_id))]
pub async fn add_item<S: CartStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(cart_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Item>)> {
    let cart_id: CartId = parse_id(&cart_id, "cart_id")?;
    let request: AddItemRequest = serde_json::from_slice(&body).map_err(|err| {
        tracing::debug!(error = %err, "rejected add-item body");
        ApiError::BadRequest("body has invalid json format".to_string())
    })?;

    let item = state
        .service()
        .add_item(
            user_id,
            NewItem {
                cart_id,
                product_id: request.product_id,
                quantity: request.quantity,
                price: request.price,
            },
        )
        .await
        .map_err(|err| failure(&state, "addItem", "could not add item to cart", err))?;

    tracing::info!(item_id = %item.id, product_id = %item.product_id, "item added");
    Ok((StatusCode::CREATED, Json(item)))
}

/// `DELETE /items/{item_id}` - remove one item.
#[instrument(skip_all, fields(user_id = %user_id, item_id = %item_id))]
pub async fn remove_item<S: CartStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(item_id): Path<String>,
) -> Result<StatusCode> {
    let item_id: ItemId = parse_id(&item_id, "item_id")?;

    state
        .service()
        .remove_item(user_id, item_id)
        .await
        .map_err(|err| failure(&state, "removeItem", "could not remove item", err))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /carts/{cart_id}/items` - remove every item from a cart.
#[instrument(skip_all, fields(user_id = %user_id, cart_id = %cart_id))]
pub async fn empty_cart<S: CartStore + 'static>(
    State(state): State<AppState<S>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(cart_id): Path<String>,
) -> Result<StatusCode> {
    let cart_id: CartId = parse_id(&cart_id, "cart_id")?;

    state
        .service()
        .empty_cart(user_id, cart_id)
        .await
        .map_err(|err| failure(&state, "emptyCart", "could not empty cart", err))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Parse a numeric path parameter.
fn parse_id<T: FromStr>(raw: &str, param: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| ApiError::InvalidParams(format!("{param} param is not a valid number")))
}

/// Map a service error onto the response envelope.
///
/// Storage failures are logged, counted and reported as `failure_message`;
/// their underlying cause is never sent to the client.
fn failure<S>(
    state: &AppState<S>,
    operation: &'static str,
    failure_message: &str,
    err: CartServiceError,
) -> ApiError {
    match err {
        CartServiceError::InvalidOwner => ApiError::InvalidParams("user is invalid".to_string()),
        CartServiceError::CartNotFound => ApiError::NotFound("cart does not exist".to_string()),
        CartServiceError::ItemNotFound => ApiError::NotFound("item does not exist".to_string()),
        CartServiceError::DuplicateProduct => ApiError::BadRequest(
            "an item with the same product exists in the cart".to_string(),
        ),
        CartServiceError::StorageFailure(source) => {
            tracing::error!(operation, error = %source, "{operation}: service failure");
            state.metrics().record_server_error(operation, "service");
            ApiError::Internal(failure_message.to_string())
        }
    }
}
