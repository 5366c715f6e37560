use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users table. password_hash is nullable: a user may exist before
        // a password is set.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItemLists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemLists::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItemLists::Name).string().not_null())
                    .col(
                        ColumnDef::new(ItemLists::Identifier)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ItemLists::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(ItemLists::Created)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Items carry their list membership (exclusive) and the reserving
        // user (at most one) directly.
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::Title).string().not_null())
                    .col(ColumnDef::new(Items::Description).string().null())
                    .col(ColumnDef::new(Items::Url).string().null())
                    .col(
                        ColumnDef::new(Items::Reserved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Items::ListId).string().not_null())
                    .col(
                        ColumnDef::new(Items::Position)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Items::ReservedBy).string().null())
                    .col(
                        ColumnDef::new(Items::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_list_id")
                            .from(Items::Table, Items::ListId)
                            .to(ItemLists::Table, ItemLists::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // list_access: which lists a user may reserve/release against.
        // Owning a list implies an access row, written at list creation.
        manager
            .create_table(
                Table::create()
                    .table(ListAccess::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ListAccess::UserId).string().not_null())
                    .col(ColumnDef::new(ListAccess::ListId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(ListAccess::UserId)
                            .col(ListAccess::ListId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_list_id")
                    .table(Items::Table)
                    .col(Items::ListId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_reserved_by")
                    .table(Items::Table)
                    .col(Items::ReservedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListAccess::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItemLists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Username,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(Iden)]
enum ItemLists {
    Table,
    Id,
    Name,
    Identifier,
    OwnerId,
    Created,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    Title,
    Description,
    Url,
    Reserved,
    ListId,
    Position,
    ReservedBy,
    CreatedAt,
}

#[derive(Iden)]
enum ListAccess {
    Table,
    UserId,
    ListId,
}
