//! Profile reads and phone number updates.

#![allow(clippy::unwrap_used)]

use souk_client::ApiError;
use souk_core::{PhoneNumber, UserId};
use souk_integration_tests::FakeBackend;

#[tokio::test]
async fn test_profile_without_phone() {
    let backend = FakeBackend::start().await;
    let profile = backend.client().profile(&UserId::new("u1")).await.unwrap();

    assert_eq!(profile.username.as_deref(), Some("u1"));
    assert_eq!(profile.email.as_deref(), Some("u1@souk.tn"));
    assert_eq!(profile.phone, None);
}

#[tokio::test]
async fn test_update_phone_is_visible_on_next_read() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let user = UserId::new("u1");
    let phone = PhoneNumber::parse("98123456").unwrap();

    let updated = client.update_phone(&user, &phone).await.unwrap();
    assert_eq!(updated.phone.as_ref(), Some(&phone));

    let profile = client.profile(&user).await.unwrap();
    assert_eq!(profile.phone.unwrap().as_str(), "+21698123456");
    assert_eq!(backend.hits("/users/u1/profile"), 1);
    assert_eq!(backend.hits("/users/u1/phone"), 1);
}

#[tokio::test]
async fn test_profiles_are_never_cached() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let user = UserId::new("u1");

    client.profile(&user).await.unwrap();
    client.profile(&user).await.unwrap();

    assert_eq!(backend.hits("/users/u1/profile"), 2);
}

#[tokio::test]
async fn test_unknown_user_profile_is_not_found() {
    let backend = FakeBackend::start().await;
    let err = backend
        .client()
        .profile(&UserId::new("ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}
