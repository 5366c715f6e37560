use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,

    // Invariant: reserved is true exactly when reserved_by is set.
    // Both columns change in the same statement.
    pub reserved: bool,
    pub list_id: String,

    // Per-list insertion sequence; a list's items are ordered by it.
    pub position: i64,

    pub reserved_by: Option<String>,

    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item_list::Entity",
        from = "Column::ListId",
        to = "super::item_list::Column::Id"
    )]
    ItemList,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReservedBy",
        to = "super::user::Column::Id"
    )]
    ReservingUser,
}

impl Related<super::item_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemList.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
