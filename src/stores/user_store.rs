use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::types::db::list_access;
use crate::types::db::user::{self, Entity as User, Role};

/// UserStore is the typed query layer for the users collection and the
/// list_access relation.
///
/// Write methods take a `ConnectionTrait` so services can run them
/// inside a transaction; plain reads go through the store's own
/// connection.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Look a user up by id. Absence is a value, not an error.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, DomainError> {
        let found = User::find_by_id(id).one(&self.db).await?;
        Ok(found)
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, DomainError> {
        let found = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    pub async fn find_all(&self) -> Result<Vec<user::Model>, DomainError> {
        let users = User::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    /// Insert a new user.
    ///
    /// `password_hash` is the already-hashed password, or None when the
    /// user is created without one. Uniqueness violations on username
    /// propagate untranslated as a store error.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: String,
        username: String,
        role: Role,
        password_hash: Option<String>,
    ) -> Result<user::Model, DomainError> {
        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            username: Set(username),
            password_hash: Set(password_hash),
            role: Set(role),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = new_user.insert(conn).await?;
        Ok(inserted)
    }

    /// Set the password hash for a user that does not have one yet.
    /// Guarded on the hash still being unset; returns whether a row
    /// changed. False means the user already had a password (or does
    /// not exist), and the stored hash is untouched.
    pub async fn set_password_hash<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        password_hash: String,
    ) -> Result<bool, DomainError> {
        let result = User::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .filter(user::Column::Id.eq(user_id))
            .filter(user::Column::PasswordHash.is_null())
            .exec(conn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// Whether the user has the given list in their own itemLists set.
    pub async fn has_list_access(
        &self,
        user_id: &str,
        list_id: &str,
    ) -> Result<bool, DomainError> {
        let found = list_access::Entity::find_by_id((user_id.to_owned(), list_id.to_owned()))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    pub async fn grant_list_access<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        list_id: &str,
    ) -> Result<(), DomainError> {
        let access = list_access::ActiveModel {
            user_id: Set(user_id.to_owned()),
            list_id: Set(list_id.to_owned()),
        };
        access.insert(conn).await?;
        Ok(())
    }

    /// Remove every access row for a list (used by the cascading list
    /// delete).
    pub async fn revoke_list_access_for_list<C: ConnectionTrait>(
        &self,
        conn: &C,
        list_id: &str,
    ) -> Result<(), DomainError> {
        list_access::Entity::delete_many()
            .filter(list_access::Column::ListId.eq(list_id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Ids of the lists in a user's itemLists set.
    pub async fn list_ids_for_user(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        let rows = list_access::Entity::find()
            .filter(list_access::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|row| row.list_id).collect())
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore").field("db", &"<connection>").finish()
    }
}
