use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// External resource key; unique across the table.
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,

    pub password: String,

    #[sea_orm(column_name = "firstname")]
    pub first_name: String,

    #[sea_orm(column_name = "lastname")]
    pub last_name: String,

    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
