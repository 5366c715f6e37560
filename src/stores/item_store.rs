use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::types::db::item::{self, Entity as Item};

/// ItemStore is the typed query layer for the items collection.
///
/// The reserve/release updates are guarded: they only take effect when
/// the current reservation state still matches what the caller saw, so
/// two concurrent reservations of the same item cannot both succeed
/// even across server instances.
pub struct ItemStore {
    db: DatabaseConnection,
}

impl ItemStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<item::Model>, DomainError> {
        let found = Item::find_by_id(id).one(&self.db).await?;
        Ok(found)
    }

    /// All items, optionally filtered by reservation state.
    pub async fn find_all(
        &self,
        reserved: Option<bool>,
    ) -> Result<Vec<item::Model>, DomainError> {
        let mut query = Item::find().order_by_asc(item::Column::CreatedAt);
        if let Some(reserved) = reserved {
            query = query.filter(item::Column::Reserved.eq(reserved));
        }
        let items = query.all(&self.db).await?;
        Ok(items)
    }

    /// Items belonging to a list, in insertion order.
    pub async fn find_by_list(&self, list_id: &str) -> Result<Vec<item::Model>, DomainError> {
        let items = Item::find()
            .filter(item::Column::ListId.eq(list_id))
            .order_by_asc(item::Column::Position)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    /// Next free position in a list's insertion sequence. Must be read
    /// in the same transaction as the insert that uses it.
    pub async fn next_position<C: ConnectionTrait>(
        &self,
        conn: &C,
        list_id: &str,
    ) -> Result<i64, DomainError> {
        let last = Item::find()
            .filter(item::Column::ListId.eq(list_id))
            .order_by_desc(item::Column::Position)
            .one(conn)
            .await?;
        Ok(last.map_or(0, |item| item.position + 1))
    }

    /// The user's held-items set: items the user currently has reserved.
    pub async fn find_reserved_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<item::Model>, DomainError> {
        let items = Item::find()
            .filter(item::Column::ReservedBy.eq(user_id))
            .order_by_asc(item::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        list_id: String,
        position: i64,
        title: String,
        description: Option<String>,
        url: Option<String>,
    ) -> Result<item::Model, DomainError> {
        let new_item = item::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(title),
            description: Set(description),
            url: Set(url),
            reserved: Set(false),
            list_id: Set(list_id),
            position: Set(position),
            reserved_by: Set(None),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = new_item.insert(conn).await?;
        Ok(inserted)
    }

    /// Flip an item to reserved for `user_id`, but only if it is still
    /// unreserved. Returns whether a row changed; false means another
    /// caller won the race since the item was read.
    pub async fn mark_reserved<C: ConnectionTrait>(
        &self,
        conn: &C,
        item_id: &str,
        user_id: &str,
    ) -> Result<bool, DomainError> {
        let result = Item::update_many()
            .col_expr(item::Column::Reserved, Expr::value(true))
            .col_expr(item::Column::ReservedBy, Expr::value(user_id))
            .filter(item::Column::Id.eq(item_id))
            .filter(item::Column::Reserved.eq(false))
            .exec(conn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// Clear a reservation held by `user_id`. Returns whether a row
    /// changed; false means the caller no longer held the reservation.
    pub async fn clear_reservation<C: ConnectionTrait>(
        &self,
        conn: &C,
        item_id: &str,
        user_id: &str,
    ) -> Result<bool, DomainError> {
        let result = Item::update_many()
            .col_expr(item::Column::Reserved, Expr::value(false))
            .col_expr(item::Column::ReservedBy, Expr::value(Option::<String>::None))
            .filter(item::Column::Id.eq(item_id))
            .filter(item::Column::ReservedBy.eq(user_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    pub async fn delete_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        item_id: &str,
    ) -> Result<(), DomainError> {
        Item::delete_by_id(item_id).exec(conn).await?;
        Ok(())
    }

    /// Delete every item belonging to a list (cascading list delete).
    pub async fn delete_by_list<C: ConnectionTrait>(
        &self,
        conn: &C,
        list_id: &str,
    ) -> Result<u64, DomainError> {
        let result = Item::delete_many()
            .filter(item::Column::ListId.eq(list_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore").field("db", &"<connection>").finish()
    }
}
