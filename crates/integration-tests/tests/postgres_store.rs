//! Integration tests for the `PostgreSQL` cart store.
//!
//! These tests require a migrated database:
//! - `CART_DATABASE_URL` pointing at a disposable database
//! - `cargo run -p cart-cli -- migrate`
//!
//! Every test truncates the cart tables first, so run them serially:
//! `cargo test -p cart-integration-tests --test postgres_store -- --ignored --test-threads=1`

#![allow(clippy::unwrap_used)]

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;

use cart_core::{
    CartId, CartService, CartServiceError, CartStore, ItemId, LinePrice, NewCart, NewItem,
    ProductId, StoreError, UserId,
};
use cart_server::db::{self, PgCartStore};

async fn fresh_store() -> PgCartStore {
    let url = std::env::var("CART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CART_DATABASE_URL must be set for postgres tests");
    let pool: PgPool = db::create_pool(&SecretString::from(url)).await.unwrap();
    db::MIGRATOR.run(&pool).await.unwrap();
    db::truncate_all(&pool).await.unwrap();
    PgCartStore::new(pool)
}

fn new_item(cart_id: CartId, product: i64, quantity: u32, cents: i64) -> NewItem {
    NewItem {
        cart_id,
        product_id: ProductId::new(product),
        quantity: NonZeroU32::new(quantity).unwrap(),
        price: LinePrice::new(Decimal::new(cents, 2)),
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CART_DATABASE_URL)"]
async fn test_cart_round_trip_is_scoped_to_owner() {
    let store = fresh_store().await;

    let cart = store
        .create_cart(NewCart::new(UserId::new(12)).unwrap())
        .await
        .unwrap();
    assert!(cart.id.as_i64() > 0);

    let fetched = store.get_cart(UserId::new(12), cart.id).await.unwrap();
    assert_eq!(fetched.id, cart.id);
    assert_eq!(fetched.user_id, UserId::new(12));

    let err = store.get_cart(UserId::new(20), cart.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CART_DATABASE_URL)"]
async fn test_item_persistence_and_uniqueness() {
    let store = fresh_store().await;
    let cart = store
        .create_cart(NewCart::new(UserId::new(1)).unwrap())
        .await
        .unwrap();

    let item = store.create_item(new_item(cart.id, 42, 2, 1998)).await.unwrap();
    assert_eq!(item.quantity.get(), 2);
    assert_eq!(item.price.amount(), Decimal::new(1998, 2));

    let found = store
        .find_item_by_product(cart.id, ProductId::new(42))
        .await
        .unwrap();
    assert_eq!(found.id, item.id);

    let err = store
        .create_item(new_item(cart.id, 42, 1, 100))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let missing = store
        .find_item_by_product(cart.id, ProductId::new(43))
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CART_DATABASE_URL)"]
async fn test_remove_item_and_empty_cart() {
    let store = fresh_store().await;
    let owner = NewCart::new(UserId::new(1)).unwrap();
    let a = store.create_cart(owner).await.unwrap();
    let b = store.create_cart(owner).await.unwrap();

    let first = store.create_item(new_item(a.id, 1, 1, 100)).await.unwrap();
    store.create_item(new_item(a.id, 2, 1, 100)).await.unwrap();
    let other = store.create_item(new_item(b.id, 1, 1, 100)).await.unwrap();

    store.remove_item(first.id).await.unwrap();
    assert!(store.get_item(first.id).await.unwrap_err().is_not_found());
    assert!(store.remove_item(first.id).await.unwrap_err().is_not_found());

    store.remove_items_by_cart(a.id).await.unwrap();
    assert!(
        store
            .find_item_by_product(a.id, ProductId::new(2))
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert_eq!(store.get_item(other.id).await.unwrap().cart_id, b.id);
    assert!(store.get_cart(UserId::new(1), a.id).await.is_ok());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CART_DATABASE_URL)"]
async fn test_service_over_postgres() {
    let service = CartService::new(fresh_store().await);
    let user = UserId::new(20);

    let cart = service.create_cart(user).await.unwrap();
    let item = service
        .add_item(user, new_item(cart.id, 9, 3, 2997))
        .await
        .unwrap();

    let dup = service
        .add_item(user, new_item(cart.id, 9, 1, 999))
        .await
        .unwrap_err();
    assert!(matches!(dup, CartServiceError::DuplicateProduct));

    let foreign = service
        .remove_item(UserId::new(1), item.id)
        .await
        .unwrap_err();
    assert!(matches!(foreign, CartServiceError::CartNotFound));

    service.remove_item(user, item.id).await.unwrap();
    let gone = service.remove_item(user, item.id).await.unwrap_err();
    assert!(matches!(gone, CartServiceError::ItemNotFound));

    let missing = service
        .remove_item(user, ItemId::new(i64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(missing, CartServiceError::ItemNotFound));

    service.empty_cart(user, cart.id).await.unwrap();
    assert!(service.store().health_check().await.is_ok());
}
