//! Trade offer orchestration.
//!
//! The service resolves identifiers, verifies both parties exist, and
//! persists what the aggregate decides. Authorization and state rules live in
//! [`TradeOffer`] itself; this layer only translates failures for the
//! transport.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::error::Error;
use super::ids::{TradeOfferId, UserId};
use super::ports::{
    CreateTradeOfferCommand, TradeItemInput, TradeOfferPersistenceError, TradeOfferRepository,
    TradeOfferUseCase, UserPersistenceError, UserRepository,
};
use super::trade_offer::{TradeOffer, TradeOfferAction, TradeOfferError};
use super::trade_offer_item::{TradeOfferItem, DEFAULT_ITEM_AMOUNT};

/// Trade offer service implementing the driving port.
#[derive(Clone)]
pub struct TradeOfferService<T, U> {
    offers: Arc<T>,
    users: Arc<U>,
}

impl<T, U> TradeOfferService<T, U> {
    /// Create a new service with the given repositories.
    pub fn new(offers: Arc<T>, users: Arc<U>) -> Self {
        Self { offers, users }
    }
}

fn map_offer_persistence_error(error: TradeOfferPersistenceError) -> Error {
    match error {
        TradeOfferPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("trade offer repository unavailable: {message}"))
        }
        TradeOfferPersistenceError::Query { message } => {
            Error::internal(format!("trade offer repository error: {message}"))
        }
        TradeOfferPersistenceError::StaleTransition { id } => {
            Error::conflict(format!("trade offer {id} was settled by a concurrent update"))
        }
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_offer_error(error: TradeOfferError) -> Error {
    match error {
        TradeOfferError::SelfTrade | TradeOfferError::EmptyTrade => {
            Error::invalid_request(error.to_string())
        }
        TradeOfferError::UnauthorizedAction { .. } => Error::forbidden(error.to_string()),
        TradeOfferError::InvalidStateTransition { .. } => Error::conflict(error.to_string()),
        TradeOfferError::Validation(inner) => inner.into(),
    }
}

fn build_items(inputs: Vec<TradeItemInput>) -> Result<Vec<TradeOfferItem>, Error> {
    inputs
        .into_iter()
        .map(|input| {
            TradeOfferItem::new(
                input.asset_id,
                input.app_id,
                input.context_id,
                input.amount.unwrap_or(DEFAULT_ITEM_AMOUNT),
            )
            .map_err(Error::from)
        })
        .collect()
}

impl<T, U> TradeOfferService<T, U>
where
    T: TradeOfferRepository,
    U: UserRepository,
{
    async fn require_user(&self, id: &UserId, role: &str) -> Result<(), Error> {
        let exists = self
            .users
            .exists(id)
            .await
            .map_err(map_user_persistence_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("{role} user not found")))
        }
    }

    async fn load(&self, id: &str) -> Result<TradeOffer, Error> {
        let id = TradeOfferId::new(id).map_err(Error::from)?;
        self.offers
            .find_by_id(&id)
            .await
            .map_err(map_offer_persistence_error)?
            .ok_or_else(|| Error::not_found("trade offer not found"))
    }

    /// Load, apply one aggregate transition, persist, return the result.
    async fn resolve(
        &self,
        id: &str,
        actor: &UserId,
        action: TradeOfferAction,
    ) -> Result<TradeOffer, Error> {
        let mut offer = self.load(id).await?;
        let outcome = match action {
            TradeOfferAction::Accept => offer.accept(actor),
            TradeOfferAction::Decline => offer.decline(actor),
            TradeOfferAction::Cancel => offer.cancel(actor),
        };
        outcome.map_err(map_offer_error)?;
        self.offers
            .save(&offer)
            .await
            .map_err(map_offer_persistence_error)?;
        info!(offer_id = %offer.id(), status = %offer.status(), "trade offer settled");
        Ok(offer)
    }
}

#[async_trait]
impl<T, U> TradeOfferUseCase for TradeOfferService<T, U>
where
    T: TradeOfferRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        actor: &UserId,
        command: CreateTradeOfferCommand,
    ) -> Result<TradeOffer, Error> {
        let to_user_id = UserId::new(command.to_user_id).map_err(Error::from)?;

        self.require_user(actor, "from").await?;
        self.require_user(&to_user_id, "to").await?;

        let items_from = build_items(command.items_from)?;
        let items_to = build_items(command.items_to)?;

        let offer = TradeOffer::create(
            TradeOfferId::random(),
            actor.clone(),
            to_user_id,
            items_from,
            items_to,
        )
        .map_err(map_offer_error)?;

        self.offers
            .save(&offer)
            .await
            .map_err(map_offer_persistence_error)?;
        info!(offer_id = %offer.id(), "trade offer created");
        Ok(offer)
    }

    async fn list_for_user(&self, actor: &UserId) -> Result<Vec<TradeOffer>, Error> {
        self.offers
            .find_by_user_id(actor)
            .await
            .map_err(map_offer_persistence_error)
    }

    async fn get(&self, id: &str) -> Result<TradeOffer, Error> {
        self.load(id).await
    }

    async fn accept(&self, id: &str, actor: &UserId) -> Result<TradeOffer, Error> {
        self.resolve(id, actor, TradeOfferAction::Accept).await
    }

    async fn decline(&self, id: &str, actor: &UserId) -> Result<TradeOffer, Error> {
        self.resolve(id, actor, TradeOfferAction::Decline).await
    }

    async fn cancel(&self, id: &str, actor: &UserId) -> Result<TradeOffer, Error> {
        self.resolve(id, actor, TradeOfferAction::Cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockTradeOfferRepository, MockUserRepository};
    use crate::domain::trade_offer_status::TradeOfferStatus;
    use crate::domain::ErrorCode;

    fn command(to: &str) -> CreateTradeOfferCommand {
        CreateTradeOfferCommand {
            to_user_id: to.to_owned(),
            items_from: vec![TradeItemInput {
                asset_id: "A1".to_owned(),
                app_id: 730,
                context_id: "2".to_owned(),
                amount: None,
            }],
            items_to: vec![],
        }
    }

    fn pending_offer(id: &str, from: &str, to: &str) -> TradeOffer {
        TradeOffer::create(
            TradeOfferId::new(id).expect("valid id"),
            UserId::new(from).expect("valid id"),
            UserId::new(to).expect("valid id"),
            vec![TradeOfferItem::new("A1", 730, "2", 1).expect("valid item")],
            vec![],
        )
        .expect("valid offer")
    }

    fn service(
        offers: MockTradeOfferRepository,
        users: MockUserRepository,
    ) -> TradeOfferService<MockTradeOfferRepository, MockUserRepository> {
        TradeOfferService::new(Arc::new(offers), Arc::new(users))
    }

    fn actor(id: &str) -> UserId {
        UserId::new(id).expect("valid id")
    }

    #[tokio::test]
    async fn create_persists_a_pending_offer() {
        let mut users = MockUserRepository::new();
        users.expect_exists().times(2).returning(|_| Ok(true));

        let mut offers = MockTradeOfferRepository::new();
        offers
            .expect_save()
            .withf(|offer: &TradeOffer| {
                offer.status() == TradeOfferStatus::Pending
                    && offer.from_user_id().as_str() == "u1"
                    && offer.to_user_id().as_str() == "u2"
                    && offer.items_from().len() == 1
                    && offer.items_from()[0].amount() == DEFAULT_ITEM_AMOUNT
            })
            .times(1)
            .return_once(|_| Ok(()));

        let offer = service(offers, users)
            .create(&actor("u1"), command("u2"))
            .await
            .expect("create succeeds");
        assert_eq!(offer.status(), TradeOfferStatus::Pending);
    }

    #[tokio::test]
    async fn create_fails_when_the_recipient_is_missing() {
        let mut users = MockUserRepository::new();
        users
            .expect_exists()
            .times(2)
            .returning(|id| Ok(id.as_str() == "u1"));

        let err = service(MockTradeOfferRepository::new(), users)
            .create(&actor("u1"), command("u2"))
            .await
            .expect_err("missing recipient must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "to user not found");
    }

    #[tokio::test]
    async fn create_propagates_item_validation_failures() {
        let mut users = MockUserRepository::new();
        users.expect_exists().times(2).returning(|_| Ok(true));

        let mut bad = command("u2");
        bad.items_from[0].amount = Some(0);

        let err = service(MockTradeOfferRepository::new(), users)
            .create(&actor("u1"), bad)
            .await
            .expect_err("invalid item must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "amount must be positive");
    }

    #[tokio::test]
    async fn create_rejects_self_trades() {
        let mut users = MockUserRepository::new();
        users.expect_exists().times(2).returning(|_| Ok(true));

        let err = service(MockTradeOfferRepository::new(), users)
            .create(&actor("u1"), command("u1"))
            .await
            .expect_err("self trade must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn accept_transitions_and_persists() {
        let mut offers = MockTradeOfferRepository::new();
        offers
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(pending_offer("t1", "u1", "u2"))));
        offers
            .expect_save()
            .withf(|offer: &TradeOffer| offer.status() == TradeOfferStatus::Accepted)
            .times(1)
            .return_once(|_| Ok(()));

        let offer = service(offers, MockUserRepository::new())
            .accept("t1", &actor("u2"))
            .await
            .expect("accept succeeds");
        assert_eq!(offer.status(), TradeOfferStatus::Accepted);
    }

    #[tokio::test]
    async fn accept_by_the_creator_is_forbidden_and_not_persisted() {
        let mut offers = MockTradeOfferRepository::new();
        offers
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(pending_offer("t1", "u1", "u2"))));
        offers.expect_save().times(0);

        let err = service(offers, MockUserRepository::new())
            .accept("t1", &actor("u1"))
            .await
            .expect_err("creator may not accept");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn settled_offers_surface_a_conflict() {
        let mut settled = pending_offer("t1", "u1", "u2");
        settled
            .accept(&actor("u2"))
            .expect("recipient may accept");

        let mut offers = MockTradeOfferRepository::new();
        offers
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(settled)));

        let err = service(offers, MockUserRepository::new())
            .decline("t1", &actor("u2"))
            .await
            .expect_err("settled offer must conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn lost_persistence_races_surface_a_conflict() {
        let mut offers = MockTradeOfferRepository::new();
        offers
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(pending_offer("t1", "u1", "u2"))));
        offers
            .expect_save()
            .times(1)
            .return_once(|_| Err(TradeOfferPersistenceError::stale_transition("t1")));

        let err = service(offers, MockUserRepository::new())
            .accept("t1", &actor("u2"))
            .await
            .expect_err("lost race must conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn missing_offers_are_not_found() {
        let mut offers = MockTradeOfferRepository::new();
        offers.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let err = service(offers, MockUserRepository::new())
            .get("t-missing")
            .await
            .expect_err("missing offer must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
