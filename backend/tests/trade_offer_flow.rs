//! End-to-end lifecycle scenarios over the service layer with in-memory
//! persistence.

use std::sync::Arc;

use backend::domain::ports::{
    CreateTradeOfferCommand, TradeItemInput, TradeOfferUseCase, UserRepository,
};
use backend::domain::{ErrorCode, SteamId, TradeOfferService, TradeOfferStatus, User};
use backend::outbound::persistence::{InMemoryTradeOfferRepository, InMemoryUserRepository};

struct Harness {
    service: TradeOfferService<InMemoryTradeOfferRepository, InMemoryUserRepository>,
    alice: User,
    bob: User,
}

async fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let alice = users
        .create_new(
            SteamId::from_steam64("76561198000000001").expect("valid steam id"),
            "alice",
            "",
        )
        .await
        .expect("create alice");
    let bob = users
        .create_new(
            SteamId::from_steam64("76561198000000002").expect("valid steam id"),
            "bob",
            "",
        )
        .await
        .expect("create bob");

    let offers = Arc::new(InMemoryTradeOfferRepository::new());
    Harness {
        service: TradeOfferService::new(offers, users),
        alice,
        bob,
    }
}

fn item(asset_id: &str) -> TradeItemInput {
    TradeItemInput {
        asset_id: asset_id.to_owned(),
        app_id: 730,
        context_id: "2".to_owned(),
        amount: Some(1),
    }
}

fn offer_between(to: &User) -> CreateTradeOfferCommand {
    CreateTradeOfferCommand {
        to_user_id: to.id().to_string(),
        items_from: vec![item("A1")],
        items_to: vec![item("A2")],
    }
}

#[tokio::test]
async fn accepted_offers_cannot_be_declined_afterwards() {
    let h = harness().await;

    let offer = h
        .service
        .create(h.alice.id(), offer_between(&h.bob))
        .await
        .expect("create succeeds");
    assert_eq!(offer.status(), TradeOfferStatus::Pending);

    let accepted = h
        .service
        .accept(offer.id().as_str(), h.bob.id())
        .await
        .expect("recipient accepts");
    assert_eq!(accepted.status(), TradeOfferStatus::Accepted);

    let err = h
        .service
        .decline(offer.id().as_str(), h.bob.id())
        .await
        .expect_err("settled offers reject further transitions");
    assert_eq!(err.code(), ErrorCode::Conflict);

    let reloaded = h
        .service
        .get(offer.id().as_str())
        .await
        .expect("offer still readable");
    assert_eq!(reloaded.status(), TradeOfferStatus::Accepted);
}

#[tokio::test]
async fn recipients_cannot_cancel() {
    let h = harness().await;

    let offer = h
        .service
        .create(h.alice.id(), offer_between(&h.bob))
        .await
        .expect("create succeeds");

    let err = h
        .service
        .cancel(offer.id().as_str(), h.bob.id())
        .await
        .expect_err("only the creator may cancel");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let reloaded = h
        .service
        .get(offer.id().as_str())
        .await
        .expect("offer still readable");
    assert_eq!(reloaded.status(), TradeOfferStatus::Pending);
}

#[tokio::test]
async fn creators_can_withdraw_pending_offers() {
    let h = harness().await;

    let offer = h
        .service
        .create(h.alice.id(), offer_between(&h.bob))
        .await
        .expect("create succeeds");

    let cancelled = h
        .service
        .cancel(offer.id().as_str(), h.alice.id())
        .await
        .expect("creator cancels");
    assert_eq!(cancelled.status(), TradeOfferStatus::Cancelled);
}

#[tokio::test]
async fn offers_to_unknown_users_are_rejected() {
    let h = harness().await;

    let command = CreateTradeOfferCommand {
        to_user_id: "no-such-user".to_owned(),
        items_from: vec![item("A1")],
        items_to: vec![],
    };
    let err = h
        .service
        .create(h.alice.id(), command)
        .await
        .expect_err("unknown recipient must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn listings_include_both_parties_newest_first() {
    let h = harness().await;

    let first = h
        .service
        .create(h.alice.id(), offer_between(&h.bob))
        .await
        .expect("create succeeds");
    let second = h
        .service
        .create(h.bob.id(), offer_between(&h.alice))
        .await
        .expect("create succeeds");

    let listed = h
        .service
        .list_for_user(h.alice.id())
        .await
        .expect("list succeeds");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id(), second.id());
    assert_eq!(listed[1].id(), first.id());

    let bobs = h
        .service
        .list_for_user(h.bob.id())
        .await
        .expect("list succeeds");
    assert_eq!(bobs.len(), 2, "bob sees the same two offers");
}

#[tokio::test]
async fn empty_offers_are_rejected() {
    let h = harness().await;

    let command = CreateTradeOfferCommand {
        to_user_id: h.bob.id().to_string(),
        items_from: vec![],
        items_to: vec![],
    };
    let err = h
        .service
        .create(h.alice.id(), command)
        .await
        .expect_err("empty offers must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
