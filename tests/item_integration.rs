mod common;

use common::{create_item, create_list, create_user, grant_access, setup_app};
use wishlist_backend::errors::DomainError;

#[tokio::test]
async fn reserve_then_release_round_trip() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", Some("password1")).await;
    let list = create_list(&app, &user.id, "birthday").await;
    let item = create_item(&app, &list.id, &user.id, "book").await;

    let reserved = app
        .item_service
        .reserve(&item.id, &list.id, &user.id)
        .await
        .unwrap();
    assert!(reserved);

    // Invariant: reserved flag set and exactly this user holds it
    let item_after = app.item_service.find_by_id(&item.id).await.unwrap().unwrap();
    assert!(item_after.reserved);
    assert_eq!(item_after.reserved_by.as_deref(), Some(user.id.as_str()));
    let held = app.item_store.find_reserved_by_user(&user.id).await.unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].id, item.id);

    let released = app
        .item_service
        .release(&item.id, &list.id, &user.id)
        .await
        .unwrap();
    assert!(released);

    let item_after = app.item_service.find_by_id(&item.id).await.unwrap().unwrap();
    assert!(!item_after.reserved);
    assert_eq!(item_after.reserved_by, None);
    let held = app.item_store.find_reserved_by_user(&user.id).await.unwrap();
    assert!(held.is_empty());
}

#[tokio::test]
async fn reserve_fails_when_item_does_not_exist() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", Some("password1")).await;
    let list = create_list(&app, &user.id, "birthday").await;

    let err = app
        .item_service
        .reserve("no-such-item", &list.id, &user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert_eq!(err.to_string(), "Item does not exist");
}

#[tokio::test]
async fn reserve_fails_when_user_does_not_exist() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let list = create_list(&app, &owner.id, "birthday").await;
    let item = create_item(&app, &list.id, &owner.id, "book").await;

    let err = app
        .item_service
        .reserve(&item.id, &list.id, "no-such-user")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "User does not exist");
}

#[tokio::test]
async fn reserve_fails_when_list_does_not_exist() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let list = create_list(&app, &owner.id, "birthday").await;
    let item = create_item(&app, &list.id, &owner.id, "book").await;

    let err = app
        .item_service
        .reserve(&item.id, "no-such-list", &owner.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "ItemList does not exist");
}

#[tokio::test]
async fn reserving_already_reserved_item_conflicts_regardless_of_caller() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let other = create_user(&app, "Other", "other", Some("password1")).await;
    let list = create_list(&app, &owner.id, "birthday").await;
    let item = create_item(&app, &list.id, &owner.id, "book").await;
    grant_access(&app, &other.id, &list.id).await;

    assert!(app
        .item_service
        .reserve(&item.id, &list.id, &owner.id)
        .await
        .unwrap());

    // The original holder re-reserving conflicts
    let err = app
        .item_service
        .reserve(&item.id, &list.id, &owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(err.to_string(), "Item is already reserved");

    // Another user with access conflicts the same way
    let err = app
        .item_service
        .reserve(&item.id, &list.id, &other.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Item is already reserved");
}

#[tokio::test]
async fn reserve_fails_when_item_not_in_given_list() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let list_a = create_list(&app, &owner.id, "list-a").await;
    let list_b = create_list(&app, &owner.id, "list-b").await;
    let item = create_item(&app, &list_a.id, &owner.id, "book").await;

    let err = app
        .item_service
        .reserve(&item.id, &list_b.id, &owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(err.to_string(), "Item does not belong to itemlist");
}

#[tokio::test]
async fn reserve_fails_without_list_access() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let outsider = create_user(&app, "Outsider", "outsider", Some("password1")).await;
    let list = create_list(&app, &owner.id, "birthday").await;
    let item = create_item(&app, &list.id, &owner.id, "book").await;

    let err = app
        .item_service
        .reserve(&item.id, &list.id, &outsider.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(err.to_string(), "User does not have access to itemlist");
}

#[tokio::test]
async fn release_fails_when_caller_is_not_holder() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let other = create_user(&app, "Other", "other", Some("password1")).await;
    let list = create_list(&app, &owner.id, "birthday").await;
    let item = create_item(&app, &list.id, &owner.id, "book").await;
    grant_access(&app, &other.id, &list.id).await;

    assert!(app
        .item_service
        .reserve(&item.id, &list.id, &owner.id)
        .await
        .unwrap());

    let err = app
        .item_service
        .release(&item.id, &list.id, &other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(err.to_string(), "User has not reserved this item");

    // The reservation is untouched
    let item_after = app.item_service.find_by_id(&item.id).await.unwrap().unwrap();
    assert_eq!(item_after.reserved_by.as_deref(), Some(owner.id.as_str()));
}

#[tokio::test]
async fn release_fails_on_unreserved_item() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let list = create_list(&app, &owner.id, "birthday").await;
    let item = create_item(&app, &list.id, &owner.id, "book").await;

    let err = app
        .item_service
        .release(&item.id, &list.id, &owner.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "User has not reserved this item");
}

#[tokio::test]
async fn add_item_requires_list_ownership() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let other = create_user(&app, "Other", "other", Some("password1")).await;
    let list = create_list(&app, &owner.id, "birthday").await;

    let err = app
        .item_service
        .insert(&list.id, "book".to_string(), None, None, &other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(err.to_string(), "Only owner can add item to list");
}

#[tokio::test]
async fn add_item_fails_when_list_missing() {
    let app = setup_app().await;
    let user = create_user(&app, "Tester", "tester", Some("password1")).await;

    let err = app
        .item_service
        .insert("no-such-list", "book".to_string(), None, None, &user.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "ItemList does not exist");
}

#[tokio::test]
async fn remove_item_checks_membership_then_ownership() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let other = create_user(&app, "Other", "other", Some("password1")).await;
    let list_a = create_list(&app, &owner.id, "list-a").await;
    let list_b = create_list(&app, &owner.id, "list-b").await;
    let item = create_item(&app, &list_a.id, &owner.id, "book").await;

    // Wrong list: membership failure, not an ownership failure
    let err = app
        .item_service
        .remove(&item.id, &list_b.id, &owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert_eq!(err.to_string(), "Item not found in itemlist");

    // Right list, wrong caller
    let err = app
        .item_service
        .remove(&item.id, &list_a.id, &other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(err.to_string(), "Only list owner can remove an item");

    // Owner removes; the item is deleted
    assert!(app
        .item_service
        .remove(&item.id, &list_a.id, &owner.id)
        .await
        .unwrap());
    assert!(app.item_service.find_by_id(&item.id).await.unwrap().is_none());
}

#[tokio::test]
async fn find_all_filters_by_reservation_state() {
    let app = setup_app().await;
    let owner = create_user(&app, "Owner", "owner", Some("password1")).await;
    let list = create_list(&app, &owner.id, "birthday").await;
    let item_a = create_item(&app, &list.id, &owner.id, "book").await;
    let item_b = create_item(&app, &list.id, &owner.id, "kettle").await;

    assert!(app
        .item_service
        .reserve(&item_a.id, &list.id, &owner.id)
        .await
        .unwrap());

    let all = app.item_service.find_all(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let reserved = app.item_service.find_all(Some(true)).await.unwrap();
    assert_eq!(reserved.len(), 1);
    assert_eq!(reserved[0].id, item_a.id);

    let unreserved = app.item_service.find_all(Some(false)).await.unwrap();
    assert_eq!(unreserved.len(), 1);
    assert_eq!(unreserved[0].id, item_b.id);
}
