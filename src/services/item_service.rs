use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::errors::DomainError;
use crate::stores::{ItemListStore, ItemStore, UserStore};
use crate::types::db::{item, item_list, user};

/// Item domain service: CRUD scoped to a list plus the
/// reserve/release protocol.
///
/// This is the only place that touches item, user, and list state in
/// one operation. Validation precedence is fixed and observable
/// through the error messages: existence checks first (item, then
/// user, then list, each with its own message), then reservation
/// state, then membership/access. The writes that flip a reservation
/// run inside a single transaction; a write failure rolls everything
/// back and reports `Ok(false)` instead of raising, so callers never
/// observe a partially-applied reservation.
pub struct ItemService {
    db: DatabaseConnection,
    items: Arc<ItemStore>,
    users: Arc<UserStore>,
    lists: Arc<ItemListStore>,
}

impl ItemService {
    pub fn new(
        db: DatabaseConnection,
        items: Arc<ItemStore>,
        users: Arc<UserStore>,
        lists: Arc<ItemListStore>,
    ) -> Self {
        Self {
            db,
            items,
            users,
            lists,
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<item::Model>, DomainError> {
        self.items.find_by_id(id).await
    }

    pub async fn find_all(
        &self,
        reserved: Option<bool>,
    ) -> Result<Vec<item::Model>, DomainError> {
        self.items.find_all(reserved).await
    }

    /// Create an item inside a list. Only the list owner may add
    /// items; the item is never observably unattached to its list
    /// because membership is written with the item itself. The
    /// position read and the insert share a transaction so two
    /// concurrent adds cannot claim the same slot.
    pub async fn insert(
        &self,
        list_id: &str,
        title: String,
        description: Option<String>,
        url: Option<String>,
        caller_id: &str,
    ) -> Result<item::Model, DomainError> {
        let list = self.require_list(list_id).await?;
        if list.owner_id != caller_id {
            return Err(DomainError::forbidden("Only owner can add item to list"));
        }

        let txn = self.db.begin().await?;
        let position = self.items.next_position(&txn, &list.id).await?;
        let item = self
            .items
            .insert(&txn, list.id, position, title, description, url)
            .await?;
        txn.commit().await?;

        tracing::info!(item_id = %item.id, list_id, "item added to list");
        Ok(item)
    }

    /// Reserve an item for the caller.
    ///
    /// Check order per the observable contract: item exists, user
    /// exists, list exists, not already reserved (regardless of
    /// caller), item belongs to the list, caller has access to the
    /// list. The reservation write is guarded inside the transaction,
    /// so a concurrent reservation that slips between the read and
    /// the write still loses.
    pub async fn reserve(
        &self,
        item_id: &str,
        list_id: &str,
        caller_id: &str,
    ) -> Result<bool, DomainError> {
        let (item, user, list) = self.load_participants(item_id, caller_id, list_id).await?;

        if item.reserved {
            return Err(DomainError::conflict("Item is already reserved"));
        }
        self.check_membership_and_access(&item, &user, &list).await?;

        let Some(txn) = self.begin("reserve").await else {
            return Ok(false);
        };
        match self.items.mark_reserved(&txn, &item.id, &user.id).await {
            Ok(true) => {
                if let Err(e) = txn.commit().await {
                    tracing::error!(item_id, error = %e, "reserve commit failed");
                    return Ok(false);
                }
                tracing::info!(item_id, user_id = %user.id, "item reserved");
                Ok(true)
            }
            Ok(false) => {
                // Lost the race: someone reserved it after our read.
                let _ = txn.rollback().await;
                Err(DomainError::conflict("Item is already reserved"))
            }
            Err(e) => {
                let _ = txn.rollback().await;
                tracing::error!(item_id, error = %e, "reserve write failed");
                Ok(false)
            }
        }
    }

    /// Release a reservation. Mirrors `reserve`'s checks, plus: the
    /// caller must be the one currently holding the reservation.
    pub async fn release(
        &self,
        item_id: &str,
        list_id: &str,
        caller_id: &str,
    ) -> Result<bool, DomainError> {
        let (item, user, list) = self.load_participants(item_id, caller_id, list_id).await?;

        self.check_membership_and_access(&item, &user, &list).await?;
        if item.reserved_by.as_deref() != Some(caller_id) {
            return Err(DomainError::forbidden("User has not reserved this item"));
        }

        let Some(txn) = self.begin("release").await else {
            return Ok(false);
        };
        match self.items.clear_reservation(&txn, &item.id, &user.id).await {
            Ok(true) => {
                if let Err(e) = txn.commit().await {
                    tracing::error!(item_id, error = %e, "release commit failed");
                    return Ok(false);
                }
                tracing::info!(item_id, user_id = %user.id, "item released");
                Ok(true)
            }
            Ok(false) => {
                // Reservation changed hands after our read.
                let _ = txn.rollback().await;
                Ok(false)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                tracing::error!(item_id, error = %e, "release write failed");
                Ok(false)
            }
        }
    }

    /// Remove an item from its list and delete it. Only the list
    /// owner may remove items.
    pub async fn remove(
        &self,
        item_id: &str,
        list_id: &str,
        caller_id: &str,
    ) -> Result<bool, DomainError> {
        let list = self.require_list(list_id).await?;

        let item = self.items.find_by_id(item_id).await?;
        let item = match item {
            Some(item) if item.list_id == list.id => item,
            _ => return Err(DomainError::not_found("Item not found in itemlist")),
        };

        if list.owner_id != caller_id {
            return Err(DomainError::forbidden("Only list owner can remove an item"));
        }

        let Some(txn) = self.begin("remove").await else {
            return Ok(false);
        };
        match self.items.delete_by_id(&txn, &item.id).await {
            Ok(()) => {
                if let Err(e) = txn.commit().await {
                    tracing::error!(item_id, error = %e, "remove commit failed");
                    return Ok(false);
                }
                tracing::info!(item_id, list_id, "item removed from list");
                Ok(true)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                tracing::error!(item_id, error = %e, "remove write failed");
                Ok(false)
            }
        }
    }

    /// Load the three participants of a reserve/release. The reads are
    /// independent; only the error precedence (item, user, list) is
    /// fixed.
    async fn load_participants(
        &self,
        item_id: &str,
        user_id: &str,
        list_id: &str,
    ) -> Result<(item::Model, user::Model, item_list::Model), DomainError> {
        let (item, user, list) = tokio::join!(
            self.items.find_by_id(item_id),
            self.users.find_by_id(user_id),
            self.lists.find_by_id(list_id),
        );
        let item = item?.ok_or_else(|| DomainError::not_found("Item does not exist"))?;
        let user = user?.ok_or_else(|| DomainError::not_found("User does not exist"))?;
        let list = list?.ok_or_else(|| DomainError::not_found("ItemList does not exist"))?;
        Ok((item, user, list))
    }

    async fn check_membership_and_access(
        &self,
        item: &item::Model,
        user: &user::Model,
        list: &item_list::Model,
    ) -> Result<(), DomainError> {
        if item.list_id != list.id {
            return Err(DomainError::forbidden("Item does not belong to itemlist"));
        }
        if !self.users.has_list_access(&user.id, &list.id).await? {
            return Err(DomainError::forbidden(
                "User does not have access to itemlist",
            ));
        }
        Ok(())
    }

    async fn require_list(&self, list_id: &str) -> Result<item_list::Model, DomainError> {
        self.lists
            .find_by_id(list_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ItemList does not exist"))
    }

    async fn begin(&self, operation: &str) -> Option<DatabaseTransaction> {
        match self.db.begin().await {
            Ok(txn) => Some(txn),
            Err(e) => {
                tracing::error!(operation, error = %e, "failed to start transaction");
                None
            }
        }
    }
}
