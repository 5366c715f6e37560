use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::types::db::item_list::{self, Entity as ItemList};

/// ItemListStore is the typed query layer for the item_lists collection.
pub struct ItemListStore {
    db: DatabaseConnection,
}

impl ItemListStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<item_list::Model>, DomainError> {
        let found = ItemList::find_by_id(id).one(&self.db).await?;
        Ok(found)
    }

    pub async fn find_all(&self) -> Result<Vec<item_list::Model>, DomainError> {
        let lists = ItemList::find()
            .order_by_asc(item_list::Column::Created)
            .all(&self.db)
            .await?;
        Ok(lists)
    }

    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: String,
        identifier: String,
        owner_id: String,
    ) -> Result<item_list::Model, DomainError> {
        let new_list = item_list::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            identifier: Set(identifier),
            owner_id: Set(owner_id),
            created: Set(Utc::now().timestamp()),
        };

        let inserted = new_list.insert(conn).await?;
        Ok(inserted)
    }

    pub async fn delete_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        list_id: &str,
    ) -> Result<(), DomainError> {
        ItemList::delete_by_id(list_id).exec(conn).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ItemListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemListStore").field("db", &"<connection>").finish()
    }
}
