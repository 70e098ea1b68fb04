use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "produits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "nom")]
    pub name: String,
    pub description: String,
    #[sea_orm(column_name = "prix", column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_name = "quantite_stock")]
    pub stock_quantity: i32,
    #[sea_orm(column_name = "categorie")]
    pub category: String,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    #[sea_orm(column_name = "date_creation")]
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
