// ABOUTME: Payment method entity owned by a profile and rendered on its public page
// ABOUTME: Category-specific columns are mutually exclusive; only the category's own are non-null

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub category: String, // "bank" | "crypto" | "digital"
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub label: String,
    pub identifier: String,

    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub routing_number: Option<String>,

    pub coin_name: Option<String>,
    pub network: Option<String>,
    pub wallet_address: Option<String>,

    pub digital_wallet_type: Option<String>,
    pub digital_wallet_id: Option<String>,

    pub selected_color: String,
    pub icon_type: Option<String>,
    pub icon_value: Option<String>,
    pub tag: Option<String>,
    pub display_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::Id"
    )]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
