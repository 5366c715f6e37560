use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::errors::DomainError;
use crate::stores::{ItemListStore, ItemStore, UserStore};
use crate::types::db::item_list;

/// ItemList domain service: list creation and the cascading delete.
pub struct ItemListService {
    db: DatabaseConnection,
    lists: Arc<ItemListStore>,
    items: Arc<ItemStore>,
    users: Arc<UserStore>,
}

impl ItemListService {
    pub fn new(
        db: DatabaseConnection,
        lists: Arc<ItemListStore>,
        items: Arc<ItemStore>,
        users: Arc<UserStore>,
    ) -> Self {
        Self {
            db,
            lists,
            items,
            users,
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<item_list::Model>, DomainError> {
        self.lists.find_by_id(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<item_list::Model>, DomainError> {
        self.lists.find_all().await
    }

    /// Create a list owned by the caller. The owner's access row is
    /// written in the same transaction as the list itself, so a list
    /// never exists without its owner being able to reserve against it.
    pub async fn insert(
        &self,
        name: String,
        identifier: String,
        caller_id: &str,
    ) -> Result<item_list::Model, DomainError> {
        let txn = self.db.begin().await?;
        let list = self
            .lists
            .insert(&txn, name, identifier, caller_id.to_owned())
            .await?;
        self.users.grant_list_access(&txn, caller_id, &list.id).await?;
        txn.commit().await?;

        tracing::info!(list_id = %list.id, owner_id = caller_id, "itemlist created");
        Ok(list)
    }

    /// Delete a list and all of its member items, all-or-nothing.
    /// Only the owner may delete. A write failure inside the cascade
    /// rolls everything back and reports `Ok(false)`.
    pub async fn delete(&self, list_id: &str, caller_id: &str) -> Result<bool, DomainError> {
        let list = self
            .lists
            .find_by_id(list_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Itemlist not found"))?;

        if list.owner_id != caller_id {
            return Err(DomainError::forbidden("Only owner can delete itemlist"));
        }

        let txn = match self.db.begin().await {
            Ok(txn) => txn,
            Err(e) => {
                tracing::error!(list_id, error = %e, "failed to start transaction");
                return Ok(false);
            }
        };

        let cascade = async {
            self.items.delete_by_list(&txn, &list.id).await?;
            self.users.revoke_list_access_for_list(&txn, &list.id).await?;
            self.lists.delete_by_id(&txn, &list.id).await?;
            Ok::<(), DomainError>(())
        };

        match cascade.await {
            Ok(()) => {
                if let Err(e) = txn.commit().await {
                    tracing::error!(list_id, error = %e, "itemlist delete commit failed");
                    return Ok(false);
                }
                tracing::info!(list_id, "itemlist deleted with items");
                Ok(true)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                tracing::error!(list_id, error = %e, "itemlist delete failed, rolled back");
                Ok(false)
            }
        }
    }
}
