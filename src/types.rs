// ABOUTME: Type definitions for API requests and responses
// ABOUTME: Converts stored entity models into the JSON shapes the pages consume

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{payment_method, profile, social_connection};
use crate::payment::{
    display_info, CatalogOption, CategoryOption, ColorOption, PaymentDisplay,
};
use crate::social::SocialLink;

// Username and profile types
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckUsernameRequest {
    pub username: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckUsernameResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckUsernameResponse {
    pub fn available() -> Self {
        Self {
            available: true,
            error: None,
        }
    }

    pub fn unavailable(error: Option<&str>) -> Self {
        Self {
            available: false,
            error: error.map(str::to_string),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateProfileRequest {
    pub username: Option<String>,
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSocialLinksRequest {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(alias = "socialLinks")]
    pub social_links: Vec<SocialLink>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    #[serde(alias = "displayName")]
    pub display_name: Option<String>,
    pub bio: Option<String>,
    #[serde(alias = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(alias = "socialLinks")]
    pub social_links: Option<Vec<SocialLink>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub social_links: Vec<SocialLink>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<profile::Model> for ProfileResponse {
    fn from(model: profile::Model) -> Self {
        // Rows written by this service always hold a JSON array
        let social_links = serde_json::from_str(&model.social_links).unwrap_or_default();

        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            display_name: model.display_name,
            bio: model.bio,
            avatar_url: model.avatar_url,
            social_links,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: &str) -> Self {
        Self {
            data,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// Payment method types
#[derive(Debug, Default, Deserialize)]
pub struct PaymentMethodsQuery {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
}

/// Raw body so a non-array value can be answered with 400 instead of a rejection.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderRequest {
    #[serde(rename = "paymentMethodIds", alias = "payment_method_ids")]
    pub payment_method_ids: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodResponse {
    pub id: Uuid,
    pub user_id: String,
    pub category: String,
    #[serde(rename = "type")]
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
    pub display: PaymentDisplay,
}

impl From<payment_method::Model> for PaymentMethodResponse {
    fn from(model: payment_method::Model) -> Self {
        let display = display_info(&model);

        Self {
            id: model.id,
            user_id: model.user_id,
            category: model.category,
            kind: model.kind,
            label: model.label,
            identifier: model.identifier,
            bank_name: model.bank_name,
            account_number: model.account_number,
            account_name: model.account_name,
            routing_number: model.routing_number,
            coin_name: model.coin_name,
            network: model.network,
            wallet_address: model.wallet_address,
            digital_wallet_type: model.digital_wallet_type,
            digital_wallet_id: model.digital_wallet_id,
            selected_color: model.selected_color,
            icon_type: model.icon_type,
            icon_value: model.icon_value,
            tag: model.tag,
            display_order: model.display_order,
            created_at: model.created_at,
            updated_at: model.updated_at,
            display,
        }
    }
}

pub fn payment_method_responses(models: Vec<payment_method::Model>) -> Vec<PaymentMethodResponse> {
    models.into_iter().map(PaymentMethodResponse::from).collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicProfileResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    #[serde(rename = "paymentMethods")]
    pub payment_methods: Vec<PaymentMethodResponse>,
}

// Catalog types
#[derive(Debug, Default, Deserialize)]
pub struct BanksQuery {
    pub country: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BanksResponse {
    pub country: String,
    pub country_name: Option<&'static str>,
    pub banks: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct PaymentOptionsResponse {
    pub categories: &'static [CategoryOption],
    pub crypto_networks: &'static [CatalogOption],
    pub digital_wallets: &'static [CatalogOption],
    pub colors: &'static [ColorOption],
}

// Social connection types
#[derive(Debug, Serialize, Deserialize)]
pub struct SocialConnectionRequest {
    pub platform: String,
    pub platform_user_id: String,
    pub platform_username: String,
    #[serde(default)]
    pub platform_display_name: Option<String>,
    #[serde(default)]
    pub platform_avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SocialConnectionResponse {
    pub id: Uuid,
    pub platform: String,
    pub platform_user_id: String,
    pub platform_username: String,
    pub platform_display_name: Option<String>,
    pub platform_avatar_url: Option<String>,
    pub verified_at: i64,
}

impl From<social_connection::Model> for SocialConnectionResponse {
    fn from(model: social_connection::Model) -> Self {
        Self {
            id: model.id,
            platform: model.platform,
            platform_user_id: model.platform_user_id,
            platform_username: model.platform_username,
            platform_display_name: model.platform_display_name,
            platform_avatar_url: model.platform_avatar_url,
            verified_at: model.verified_at,
        }
    }
}

// Session types
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRequest {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user_id: String,
    pub email: String,
    pub username: Option<String>,
    pub needs_username: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigStatusResponse {
    pub configured: bool,
    pub demo_mode: bool,
}
