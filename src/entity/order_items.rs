use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lignes_commande")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "commande_id")]
    pub order_id: i32,
    #[sea_orm(column_name = "produit_id")]
    pub product_id: i32,
    #[sea_orm(column_name = "quantite")]
    pub quantity: i32,
    #[sea_orm(column_name = "prix_unitaire", column_type = "Decimal(Some((12, 2)))")]
    pub unit_price: Decimal,
    /// Product snapshot as text: JSON for new rows, Python repr for legacy ones.
    #[sea_orm(column_name = "produit", column_type = "Text")]
    pub product: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
