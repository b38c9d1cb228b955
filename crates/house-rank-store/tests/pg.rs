//! Postgres-backed integration tests. Enable with `--features pg-tests`
//! and point `DATABASE_URL` at a scratch database.

#![cfg(feature = "pg-tests")]

use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::json;

use house_rank_core::{DatabaseConfig, Error, Principal, Storage};
use house_rank_store::PgStore;

static SEQ: AtomicU32 = AtomicU32::new(0);

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!(
        "{prefix}-{}-{}-{}",
        std::process::id(),
        SEQ.fetch_add(1, Ordering::SeqCst),
        nanos
    )
}

async fn connect() -> PgStore {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a scratch database"),
        max_connections: 5,
        connect_timeout_ms: 2000,
    };
    PgStore::connect(&config).await.expect("connect")
}

fn principal(subject: &str) -> Principal {
    Principal {
        provider: "google".into(),
        subject: subject.into(),
        email: Some(format!("{subject}@example.com")),
        name: None,
        given_name: None,
        family_name: None,
        picture: None,
    }
}

#[tokio::test]
async fn user_creation_is_idempotent() {
    let store = connect().await;
    let subject = unique("sub");
    let first = store
        .create_user_from_principal(&principal(&subject))
        .await
        .unwrap();
    let second = store
        .create_user_from_principal(&principal(&subject))
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.provider, "google");
}

#[tokio::test]
async fn create_list_then_add_house_twice_yields_one_join_row() {
    let store = connect().await;
    let owner = store
        .create_user_from_principal(&principal(&unique("owner")))
        .await
        .unwrap();

    let list = store
        .create_house_list("Summer Homes", owner.id)
        .await
        .unwrap();
    assert_eq!(list.name, "Summer Homes");
    assert_eq!(list.owner_id, owner.id);

    let zpid = unique("zpid");
    let house = store.add_house_to_list(&zpid, list.id).await.unwrap();
    assert_eq!(house.zpid, zpid);
    assert!(house.zillow_pricing_info.is_none());
    assert!(house.zillow_pricing_updated_at.is_none());

    let again = store.add_house_to_list(&zpid, list.id).await.unwrap();
    assert_eq!(again.id, house.id);

    let houses = store.houses_via_membership(list.id).await.unwrap();
    assert_eq!(houses.len(), 1);
}

#[tokio::test]
async fn pricing_write_sets_blob_and_timestamp_together() {
    let store = connect().await;
    let owner = store
        .create_user_from_principal(&principal(&unique("owner")))
        .await
        .unwrap();
    let list = store.create_house_list("cache", owner.id).await.unwrap();
    let zpid = unique("zpid");
    store.add_house_to_list(&zpid, list.id).await.unwrap();

    store
        .update_house_pricing(&zpid, &json!({ "zpid": zpid }))
        .await
        .unwrap();
    let house = store.house_by_zpid(&zpid).await.unwrap().unwrap();
    assert!(house.zillow_pricing_info.is_some());
    assert!(house.zillow_pricing_updated_at.is_some());
    assert!(house.zillow_property_info.is_none());

    store
        .update_house_property(&zpid, &json!({ "render": true }))
        .await
        .unwrap();
    let house = store.house_by_zpid(&zpid).await.unwrap().unwrap();
    assert!(house.zillow_property_info.is_some());
    assert!(house.zillow_property_updated_at.is_some());
}

#[tokio::test]
async fn pricing_write_without_house_row_is_not_found() {
    let store = connect().await;
    let err = store
        .update_house_pricing(&unique("missing"), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn access_is_owner_or_edit_member_only() {
    let store = connect().await;
    let owner = store
        .create_user_from_principal(&principal(&unique("owner")))
        .await
        .unwrap();
    let member = store
        .create_user_from_principal(&principal(&unique("member")))
        .await
        .unwrap();
    let stranger = store
        .create_user_from_principal(&principal(&unique("stranger")))
        .await
        .unwrap();

    let list = store.create_house_list("shared", owner.id).await.unwrap();
    assert!(store
        .has_house_list_access_rw(list.id, owner.id)
        .await
        .unwrap());
    assert!(!store
        .has_house_list_access_rw(list.id, stranger.id)
        .await
        .unwrap());

    store
        .add_user_to_list(&member.email, list.id)
        .await
        .unwrap();
    assert!(store
        .has_house_list_access_rw(list.id, member.id)
        .await
        .unwrap());

    // Idempotent membership.
    store
        .add_user_to_list(&member.email, list.id)
        .await
        .unwrap();
    assert_eq!(store.users_via_membership(list.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_returns_pre_image_once() {
    let store = connect().await;
    let owner = store
        .create_user_from_principal(&principal(&unique("owner")))
        .await
        .unwrap();
    let list = store.create_house_list("doomed", owner.id).await.unwrap();

    let deleted = store.delete_house_list(list.id).await.unwrap();
    assert_eq!(deleted.id, list.id);
    assert_eq!(deleted.name, "doomed");

    let err = store.delete_house_list(list.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn remove_house_requires_existing_join_row() {
    let store = connect().await;
    let owner = store
        .create_user_from_principal(&principal(&unique("owner")))
        .await
        .unwrap();
    let list = store.create_house_list("joins", owner.id).await.unwrap();
    let other = store.create_house_list("other", owner.id).await.unwrap();
    let zpid = unique("zpid");
    store.add_house_to_list(&zpid, list.id).await.unwrap();

    // House exists but is not joined to this list.
    let err = store
        .remove_house_from_list(&zpid, other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let removed = store.remove_house_from_list(&zpid, list.id).await.unwrap();
    assert_eq!(removed.zpid, zpid);
    assert!(store
        .houses_via_membership(list.id)
        .await
        .unwrap()
        .is_empty());
}
