// ABOUTME: Profile entity keyed by the identity provider's opaque user id
// ABOUTME: Holds the public username, display info and unverified social links

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    #[sea_orm(unique)]
    pub username: Option<String>, // Lower-cased; NULL until claimed
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub social_links: String, // JSON array of {platform, value}
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payment_method::Entity")]
    PaymentMethods,
    #[sea_orm(has_many = "super::social_connection::Entity")]
    SocialConnections,
}

impl Related<super::payment_method::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl Related<super::social_connection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocialConnections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
