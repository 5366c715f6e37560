use juniper::{graphql_object, EmptySubscription, RootNode};

use crate::errors::DomainError;

use super::context::ApiContext;
use super::types::{
    CreatePasswordInput, Item, ItemInput, ItemList, ItemListInput, LoginInput, ReleaseItemInput,
    RemoveItemInput, RemoveItemListInput, ReserveItemInput, Token, User, UserInput,
};

/// Type of the API root node.
pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<ApiContext>>;

/// Creates and returns the API root node.
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

pub struct Query;

#[graphql_object(context = ApiContext)]
impl Query {
    /// Absence is a value: unknown ids resolve to null, not an error.
    async fn item(context: &ApiContext, id: String) -> Result<Option<Item>, DomainError> {
        let item = context.app.item_service.find_by_id(&id).await?;
        Ok(item.map(Item::new))
    }

    async fn all_items(
        context: &ApiContext,
        reserved: Option<bool>,
    ) -> Result<Vec<Item>, DomainError> {
        let items = context.app.item_service.find_all(reserved).await?;
        Ok(items.into_iter().map(Item::new).collect())
    }

    async fn item_list(context: &ApiContext, id: String) -> Result<Option<ItemList>, DomainError> {
        let list = context.app.item_list_service.find_by_id(&id).await?;
        Ok(list.map(ItemList::new))
    }

    async fn all_item_lists(context: &ApiContext) -> Result<Vec<ItemList>, DomainError> {
        let lists = context.app.item_list_service.find_all().await?;
        Ok(lists.into_iter().map(ItemList::new).collect())
    }

    async fn user(context: &ApiContext, id: String) -> Result<Option<User>, DomainError> {
        let user = context.app.user_service.find_by_id(&id).await?;
        Ok(user.map(User::new))
    }

    async fn me(context: &ApiContext, username: String) -> Result<Option<User>, DomainError> {
        let user = context.app.user_service.find_by_name(&username).await?;
        Ok(user.map(User::new))
    }

    async fn all_users(context: &ApiContext) -> Result<Vec<User>, DomainError> {
        let users = context.app.user_service.find_all().await?;
        Ok(users.into_iter().map(User::new).collect())
    }
}

pub struct Mutation;

#[graphql_object(context = ApiContext)]
impl Mutation {
    async fn add_item(
        context: &ApiContext,
        item_input: ItemInput,
    ) -> Result<Item, DomainError> {
        let caller = context.require_caller()?;
        let item = context
            .app
            .item_service
            .insert(
                &item_input.list_id,
                item_input.title,
                item_input.description,
                item_input.url,
                &caller.id,
            )
            .await?;
        Ok(Item::new(item))
    }

    async fn remove_item(
        context: &ApiContext,
        remove_item_input: RemoveItemInput,
    ) -> Result<bool, DomainError> {
        let caller = context.require_caller()?;
        context
            .app
            .item_service
            .remove(
                &remove_item_input.item_id,
                &remove_item_input.list_id,
                &caller.id,
            )
            .await
    }

    async fn reserve_item(
        context: &ApiContext,
        reserve_item_input: ReserveItemInput,
    ) -> Result<bool, DomainError> {
        let caller = context.require_caller()?;
        context
            .app
            .item_service
            .reserve(
                &reserve_item_input.item_id,
                &reserve_item_input.list_id,
                &caller.id,
            )
            .await
    }

    async fn release_item(
        context: &ApiContext,
        release_item_input: ReleaseItemInput,
    ) -> Result<bool, DomainError> {
        let caller = context.require_caller()?;
        context
            .app
            .item_service
            .release(
                &release_item_input.item_id,
                &release_item_input.list_id,
                &caller.id,
            )
            .await
    }

    async fn add_item_list(
        context: &ApiContext,
        item_list_input: ItemListInput,
    ) -> Result<ItemList, DomainError> {
        let caller = context.require_caller()?;
        let list = context
            .app
            .item_list_service
            .insert(item_list_input.name, item_list_input.identifier, &caller.id)
            .await?;
        Ok(ItemList::new(list))
    }

    async fn remove_item_list(
        context: &ApiContext,
        remove_item_list_input: RemoveItemListInput,
    ) -> Result<bool, DomainError> {
        let caller = context.require_caller()?;
        context
            .app
            .item_list_service
            .delete(&remove_item_list_input.list_id, &caller.id)
            .await
    }

    /// Signup does not require authentication.
    async fn add_user(context: &ApiContext, user_input: UserInput) -> Result<User, DomainError> {
        let user = context
            .app
            .user_service
            .insert(
                user_input.name,
                user_input.username,
                user_input.role.into(),
                user_input.password,
            )
            .await?;
        Ok(User::new(user))
    }

    async fn create_password(
        context: &ApiContext,
        create_password_input: CreatePasswordInput,
    ) -> Result<Token, DomainError> {
        let token = context
            .app
            .user_service
            .create_password(&create_password_input.id, &create_password_input.password)
            .await?;
        Ok(token.into())
    }

    async fn login(context: &ApiContext, login_input: LoginInput) -> Result<Token, DomainError> {
        let token = context
            .app
            .user_service
            .login(&login_input.username, &login_input.password)
            .await?;
        Ok(token.into())
    }
}
