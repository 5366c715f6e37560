use chrono::DateTime;
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject};

use crate::errors::DomainError;
use crate::services::token_service;
use crate::types::db::{item, item_list, user};

use super::context::ApiContext;

#[derive(GraphQLEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    #[graphql(name = "ADMIN")]
    Admin,
    #[graphql(name = "USER")]
    User,
    #[graphql(name = "TESTUSER")]
    TestUser,
}

impl From<user::Role> for Role {
    fn from(role: user::Role) -> Self {
        match role {
            user::Role::Admin => Role::Admin,
            user::Role::User => Role::User,
            user::Role::TestUser => Role::TestUser,
        }
    }
}

impl From<Role> for user::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => user::Role::Admin,
            Role::User => user::Role::User,
            Role::TestUser => user::Role::TestUser,
        }
    }
}

/// A user, with their held items and accessible lists resolved on
/// demand.
pub struct User {
    model: user::Model,
}

impl User {
    pub fn new(model: user::Model) -> Self {
        Self { model }
    }
}

#[graphql_object(context = ApiContext)]
impl User {
    fn id(&self) -> &str {
        &self.model.id
    }

    fn name(&self) -> &str {
        &self.model.name
    }

    fn username(&self) -> &str {
        &self.model.username
    }

    fn role(&self) -> Role {
        self.model.role.into()
    }

    /// Items this user currently holds reserved.
    async fn items(&self, context: &ApiContext) -> Result<Vec<Item>, DomainError> {
        let items = context
            .app
            .item_store
            .find_reserved_by_user(&self.model.id)
            .await?;
        Ok(items.into_iter().map(Item::new).collect())
    }

    /// Lists this user owns or has access to.
    async fn item_lists(&self, context: &ApiContext) -> Result<Vec<ItemList>, DomainError> {
        let mut lists = Vec::new();
        for list_id in context
            .app
            .user_store
            .list_ids_for_user(&self.model.id)
            .await?
        {
            if let Some(list) = context.app.item_list_store.find_by_id(&list_id).await? {
                lists.push(ItemList::new(list));
            }
        }
        Ok(lists)
    }
}

pub struct Item {
    model: item::Model,
}

impl Item {
    pub fn new(model: item::Model) -> Self {
        Self { model }
    }
}

#[graphql_object(context = ApiContext)]
impl Item {
    fn id(&self) -> &str {
        &self.model.id
    }

    fn title(&self) -> &str {
        &self.model.title
    }

    fn description(&self) -> Option<&str> {
        self.model.description.as_deref()
    }

    fn url(&self) -> Option<&str> {
        self.model.url.as_deref()
    }

    fn reserved(&self) -> bool {
        self.model.reserved
    }

    /// The user holding the reservation, if any.
    async fn reserved_by(&self, context: &ApiContext) -> Result<Option<User>, DomainError> {
        let Some(user_id) = self.model.reserved_by.as_deref() else {
            return Ok(None);
        };
        let user = context.app.user_store.find_by_id(user_id).await?;
        Ok(user.map(User::new))
    }
}

pub struct ItemList {
    model: item_list::Model,
}

impl ItemList {
    pub fn new(model: item_list::Model) -> Self {
        Self { model }
    }
}

#[graphql_object(context = ApiContext)]
impl ItemList {
    fn id(&self) -> &str {
        &self.model.id
    }

    fn name(&self) -> &str {
        &self.model.name
    }

    fn identifier(&self) -> &str {
        &self.model.identifier
    }

    /// Creation timestamp, RFC 3339.
    fn created(&self) -> String {
        DateTime::from_timestamp(self.model.created, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default()
    }

    async fn owner(&self, context: &ApiContext) -> Result<Option<User>, DomainError> {
        let owner = context
            .app
            .user_store
            .find_by_id(&self.model.owner_id)
            .await?;
        Ok(owner.map(User::new))
    }

    /// Member items in insertion order.
    async fn items(&self, context: &ApiContext) -> Result<Vec<Item>, DomainError> {
        let items = context.app.item_store.find_by_list(&self.model.id).await?;
        Ok(items.into_iter().map(Item::new).collect())
    }
}

#[derive(GraphQLObject, Debug)]
pub struct Token {
    /// The bearer credential, of the form `Bearer <signed-token>`.
    pub value: String,
}

impl From<token_service::Token> for Token {
    fn from(token: token_service::Token) -> Self {
        Self { value: token.value }
    }
}

#[derive(GraphQLInputObject, Debug)]
pub struct ItemInput {
    pub list_id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

#[derive(GraphQLInputObject, Debug)]
pub struct RemoveItemInput {
    pub item_id: String,
    pub list_id: String,
}

#[derive(GraphQLInputObject, Debug)]
pub struct ReserveItemInput {
    pub item_id: String,
    pub list_id: String,
}

#[derive(GraphQLInputObject, Debug)]
pub struct ReleaseItemInput {
    pub item_id: String,
    pub list_id: String,
}

#[derive(GraphQLInputObject, Debug)]
pub struct ItemListInput {
    pub name: String,
    pub identifier: String,
}

#[derive(GraphQLInputObject, Debug)]
pub struct RemoveItemListInput {
    pub list_id: String,
}

#[derive(GraphQLInputObject, Debug)]
pub struct UserInput {
    pub name: String,
    pub username: String,
    pub role: Role,
    pub password: Option<String>,
}

#[derive(GraphQLInputObject, Debug)]
pub struct CreatePasswordInput {
    pub id: String,
    pub password: String,
}

#[derive(GraphQLInputObject, Debug)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}
