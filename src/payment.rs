// ABOUTME: Payment method rules: categories, option catalogs, input validation and derived fields
// ABOUTME: Builds the masked identifier on save and the public display block on read

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::payment_method;
use crate::error::AppError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const DEFAULT_COLOR: &str = "blue";
pub const ICON_TYPE_EMOJI: &str = "emoji";

const OTHER: &str = "other";
const BANK_ICON: &str = "🏦";
const CRYPTO_FALLBACK_ICON: &str = "💰";
const WALLET_FALLBACK_ICON: &str = "💳";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentCategory {
    Bank,
    Crypto,
    Digital,
}

impl PaymentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentCategory::Bank => "bank",
            PaymentCategory::Crypto => "crypto",
            PaymentCategory::Digital => "digital",
        }
    }
}

impl fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank" => Ok(PaymentCategory::Bank),
            "crypto" => Ok(PaymentCategory::Crypto),
            "digital" => Ok(PaymentCategory::Digital),
            other => Err(AppError::BadRequest(format!(
                "Unknown payment category: {}",
                other
            ))),
        }
    }
}

// Option catalogs offered by the add-payment form

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogOption {
    pub value: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColorOption {
    pub value: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoryOption {
    pub id: PaymentCategory,
    pub title: &'static str,
    pub description: &'static str,
}

const fn option(value: &'static str, label: &'static str, icon: &'static str) -> CatalogOption {
    CatalogOption { value, label, icon }
}

pub const CRYPTO_NETWORKS: &[CatalogOption] = &[
    option("bitcoin", "Bitcoin (BTC)", "₿"),
    option("ethereum", "Ethereum (ETH)", "⟠"),
    option("binance", "Binance Smart Chain (BSC)", "🟡"),
    option("polygon", "Polygon (MATIC)", "🟣"),
    option("solana", "Solana (SOL)", "🌌"),
    option("cardano", "Cardano (ADA)", "🔵"),
    option("xrpl", "XRP Ledger (XRP)", "💧"),
    option("stellar", "Stellar (XLM)", "⭐"),
    option("avalanche", "Avalanche (AVAX)", "🏔️"),
    option("algorand", "Algorand (ALGO)", "🔷"),
    option("cosmos", "Cosmos (ATOM)", "🌌"),
    option("polkadot", "Polkadot (DOT)", "🔴"),
    option("chainlink", "Chainlink (LINK)", "🔗"),
    option("litecoin", "Litecoin (LTC)", "🥈"),
    option("dogecoin", "Dogecoin (DOGE)", "🐕"),
    option("tron", "Tron (TRX)", "🎯"),
    option("near", "NEAR Protocol (NEAR)", "🔺"),
    option("fantom", "Fantom (FTM)", "👻"),
    option("harmony", "Harmony (ONE)", "🎵"),
    option("terra", "Terra Classic (LUNC)", "🌍"),
    option("other", "Other", "💰"),
];

pub const DIGITAL_WALLETS: &[CatalogOption] = &[
    option("paypal", "PayPal", "💳"),
    option("venmo", "Venmo", "💙"),
    option("cashapp", "Cash App", "💚"),
    option("zelle", "Zelle", "🏦"),
    option("applepay", "Apple Pay", "🍎"),
    option("googlepay", "Google Pay", "🔷"),
    option("mtnmomo", "MTN MoMo", "📱"),
    option("opay", "OPay", "🟢"),
    option("stripe", "Stripe", "🔷"),
    option("other", "Other", "📱"),
];

pub const COLOR_OPTIONS: &[ColorOption] = &[
    ColorOption { value: "blue", name: "Blue" },
    ColorOption { value: "green", name: "Green" },
    ColorOption { value: "orange", name: "Orange" },
    ColorOption { value: "purple", name: "Purple" },
    ColorOption { value: "emerald", name: "Emerald" },
    ColorOption { value: "pink", name: "Pink" },
    ColorOption { value: "indigo", name: "Indigo" },
    ColorOption { value: "red", name: "Red" },
];

pub const CATEGORIES: &[CategoryOption] = &[
    CategoryOption {
        id: PaymentCategory::Bank,
        title: "Bank Account",
        description: "Connect your bank account for direct transfers",
    },
    CategoryOption {
        id: PaymentCategory::Crypto,
        title: "Cryptocurrency",
        description: "Add crypto wallets for digital payments",
    },
    CategoryOption {
        id: PaymentCategory::Digital,
        title: "Digital Wallet",
        description: "PayPal, Venmo, Apple Pay and more",
    },
];

fn find_option(catalog: &'static [CatalogOption], value: &str) -> Option<&'static CatalogOption> {
    catalog
        .iter()
        .find(|entry| entry.value.eq_ignore_ascii_case(value))
}

pub fn crypto_icon(network: &str) -> &'static str {
    find_option(CRYPTO_NETWORKS, network)
        .map(|entry| entry.icon)
        .unwrap_or(CRYPTO_FALLBACK_ICON)
}

pub fn is_known_color(color: &str) -> bool {
    COLOR_OPTIONS.iter().any(|option| option.value == color)
}

/// Form submission for creating or updating a payment method.
/// Accepts the camelCase field names the form posts as well as the stored column names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentMethodInput {
    #[serde(alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub category: Option<String>,

    #[serde(alias = "bank_name")]
    pub bank_name: Option<String>,
    #[serde(alias = "custom_bank_name")]
    pub custom_bank_name: Option<String>,
    #[serde(alias = "account_number")]
    pub account_number: Option<String>,
    #[serde(alias = "account_name")]
    pub account_name: Option<String>,
    #[serde(alias = "routing_number")]
    pub routing_number: Option<String>,

    pub network: Option<String>,
    #[serde(alias = "custom_network")]
    pub custom_network: Option<String>,
    #[serde(alias = "wallet_address")]
    pub wallet_address: Option<String>,

    #[serde(alias = "digital_wallet_type")]
    pub digital_wallet_type: Option<String>,
    #[serde(alias = "custom_digital_wallet")]
    pub custom_digital_wallet: Option<String>,
    #[serde(alias = "digital_wallet_id")]
    pub digital_wallet_id: Option<String>,

    #[serde(alias = "selected_color")]
    pub selected_color: Option<String>,
    pub tag: Option<String>,
}

fn filled(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolve a select value, substituting the custom text when "Other" was chosen.
fn chosen(selected: &Option<String>, custom: &Option<String>) -> Option<String> {
    let selected = filled(selected)?;
    if selected.eq_ignore_ascii_case(OTHER) {
        filled(custom)
    } else {
        Some(selected)
    }
}

fn first_chars(value: &str, count: usize) -> String {
    value.chars().take(count).collect()
}

fn last_chars(value: &str, count: usize) -> String {
    let total = value.chars().count();
    value.chars().skip(total.saturating_sub(count)).collect()
}

pub fn mask_account_number(account_number: &str) -> String {
    format!("****{}", last_chars(account_number, 4))
}

pub fn shorten_address(address: &str) -> String {
    if address.chars().count() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", first_chars(address, 6), last_chars(address, 6))
}

/// Public-page rendering of a wallet address: long addresses are cut in the middle.
pub fn truncate_address(address: &str) -> String {
    if address.chars().count() <= 20 {
        return address.to_string();
    }
    format!("{}...{}", first_chars(address, 15), last_chars(address, 6))
}

/// Category-specific fields. Exactly one set is ever stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentDetails {
    Bank {
        bank_name: String,
        account_number: String,
        account_name: String,
        routing_number: Option<String>,
    },
    Crypto {
        network: String,
        network_label: String,
        wallet_address: String,
        icon: &'static str,
    },
    Digital {
        wallet_type: String,
        wallet_label: String,
        wallet_id: String,
        icon: &'static str,
    },
}

impl PaymentDetails {
    pub fn category(&self) -> PaymentCategory {
        match self {
            PaymentDetails::Bank { .. } => PaymentCategory::Bank,
            PaymentDetails::Crypto { .. } => PaymentCategory::Crypto,
            PaymentDetails::Digital { .. } => PaymentCategory::Digital,
        }
    }

    /// Stored as both `type` and `label`.
    pub fn title(&self) -> &str {
        match self {
            PaymentDetails::Bank { bank_name, .. } => bank_name,
            PaymentDetails::Crypto { network_label, .. } => network_label,
            PaymentDetails::Digital { wallet_label, .. } => wallet_label,
        }
    }

    pub fn identifier(&self) -> String {
        match self {
            PaymentDetails::Bank { account_number, .. } => mask_account_number(account_number),
            PaymentDetails::Crypto { wallet_address, .. } => shorten_address(wallet_address),
            PaymentDetails::Digital { wallet_id, .. } => wallet_id.clone(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PaymentDetails::Bank { .. } => BANK_ICON,
            PaymentDetails::Crypto { icon, .. } | PaymentDetails::Digital { icon, .. } => *icon,
        }
    }
}

/// A validated payment method ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodDraft {
    pub details: PaymentDetails,
    pub selected_color: String,
    pub tag: Option<String>,
}

impl PaymentMethodDraft {
    pub fn from_input(input: &PaymentMethodInput) -> Result<Self, AppError> {
        let category: PaymentCategory = filled(&input.category)
            .ok_or_else(|| AppError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string()))?
            .parse()?;

        let required = || AppError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string());

        let details = match category {
            PaymentCategory::Bank => {
                PaymentDetails::Bank {
                    bank_name: chosen(&input.bank_name, &input.custom_bank_name)
                        .ok_or_else(required)?,
                    account_number: filled(&input.account_number).ok_or_else(required)?,
                    account_name: filled(&input.account_name).ok_or_else(required)?,
                    routing_number: filled(&input.routing_number),
                }
            }
            PaymentCategory::Crypto => {
                let selected = filled(&input.network).ok_or_else(required)?;
                let network = chosen(&input.network, &input.custom_network).ok_or_else(required)?;
                let wallet_address = filled(&input.wallet_address).ok_or_else(required)?;

                let (network_label, icon) = if selected.eq_ignore_ascii_case(OTHER) {
                    (network.clone(), CRYPTO_FALLBACK_ICON)
                } else {
                    let label = find_option(CRYPTO_NETWORKS, &selected)
                        .map(|entry| entry.label.to_string())
                        .unwrap_or_else(|| selected.clone());
                    (label, crypto_icon(&selected))
                };

                PaymentDetails::Crypto {
                    network,
                    network_label,
                    wallet_address,
                    icon,
                }
            }
            PaymentCategory::Digital => {
                let selected = filled(&input.digital_wallet_type).ok_or_else(required)?;
                let wallet_type = chosen(&input.digital_wallet_type, &input.custom_digital_wallet)
                    .ok_or_else(required)?;
                let wallet_id = filled(&input.digital_wallet_id).ok_or_else(required)?;

                let (wallet_label, icon) = if selected.eq_ignore_ascii_case(OTHER) {
                    (wallet_type.clone(), WALLET_FALLBACK_ICON)
                } else {
                    match find_option(DIGITAL_WALLETS, &selected) {
                        Some(entry) => (entry.label.to_string(), entry.icon),
                        None => (selected.clone(), WALLET_FALLBACK_ICON),
                    }
                };

                PaymentDetails::Digital {
                    wallet_type,
                    wallet_label,
                    wallet_id,
                    icon,
                }
            }
        };

        let selected_color = filled(&input.selected_color).unwrap_or_else(|| DEFAULT_COLOR.to_string());
        if !is_known_color(&selected_color) {
            return Err(AppError::BadRequest(format!(
                "Unknown color option: {}",
                selected_color
            )));
        }

        Ok(Self {
            details,
            selected_color,
            tag: filled(&input.tag),
        })
    }

    /// Write every derived and category column, clearing the other categories' columns.
    pub fn apply_to(&self, active: &mut payment_method::ActiveModel) {
        let title = self.details.title().to_string();

        active.category = Set(self.details.category().as_str().to_string());
        active.kind = Set(title.clone());
        active.label = Set(title);
        active.identifier = Set(self.details.identifier());
        active.icon_type = Set(Some(ICON_TYPE_EMOJI.to_string()));
        active.icon_value = Set(Some(self.details.icon().to_string()));
        active.selected_color = Set(self.selected_color.clone());
        active.tag = Set(self.tag.clone());

        active.bank_name = Set(None);
        active.account_number = Set(None);
        active.account_name = Set(None);
        active.routing_number = Set(None);
        active.coin_name = Set(None);
        active.network = Set(None);
        active.wallet_address = Set(None);
        active.digital_wallet_type = Set(None);
        active.digital_wallet_id = Set(None);

        match &self.details {
            PaymentDetails::Bank {
                bank_name,
                account_number,
                account_name,
                routing_number,
            } => {
                active.bank_name = Set(Some(bank_name.clone()));
                active.account_number = Set(Some(account_number.clone()));
                active.account_name = Set(Some(account_name.clone()));
                active.routing_number = Set(routing_number.clone());
            }
            PaymentDetails::Crypto {
                network,
                network_label,
                wallet_address,
                ..
            } => {
                active.coin_name = Set(Some(network_label.clone()));
                active.network = Set(Some(network.clone()));
                active.wallet_address = Set(Some(wallet_address.clone()));
            }
            PaymentDetails::Digital {
                wallet_type,
                wallet_id,
                ..
            } => {
                active.digital_wallet_type = Set(Some(wallet_type.clone()));
                active.digital_wallet_id = Set(Some(wallet_id.clone()));
            }
        }
    }
}

/// What a visitor sees and copies for one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDisplay {
    pub title: String,
    pub subtitle: String,
    pub detail: Option<String>,
    pub copy_text: String,
    pub copy_label: String,
}

pub fn display_info(method: &payment_method::Model) -> PaymentDisplay {
    let fallback = || method.identifier.clone();

    match method.category.parse::<PaymentCategory>() {
        Ok(PaymentCategory::Bank) => {
            let number = method.account_number.clone().unwrap_or_else(fallback);
            PaymentDisplay {
                title: method.kind.clone(),
                subtitle: number.clone(),
                detail: method.account_name.clone(),
                copy_text: number,
                copy_label: "Account Number".to_string(),
            }
        }
        Ok(PaymentCategory::Crypto) => {
            let address = method.wallet_address.clone().unwrap_or_else(fallback);
            PaymentDisplay {
                title: method.kind.clone(),
                subtitle: truncate_address(&address),
                detail: None,
                copy_text: address,
                copy_label: "Wallet Address".to_string(),
            }
        }
        Ok(PaymentCategory::Digital) => {
            let wallet_id = method.digital_wallet_id.clone().unwrap_or_else(fallback);
            PaymentDisplay {
                title: method.kind.clone(),
                subtitle: wallet_id.clone(),
                detail: None,
                copy_text: wallet_id,
                copy_label: method.kind.clone(),
            }
        }
        Err(_) => PaymentDisplay {
            title: method.kind.clone(),
            subtitle: method.identifier.clone(),
            detail: None,
            copy_text: method.identifier.clone(),
            copy_label: method.kind.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const LONG_ADDRESS: &str = "0xABCDEF1234567890ABCDEF1234567890ABCDEF12";

    fn bank_input() -> PaymentMethodInput {
        PaymentMethodInput {
            category: Some("bank".to_string()),
            bank_name: Some("Chase Bank".to_string()),
            account_number: Some("000123456789".to_string()),
            account_name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        }
    }

    fn crypto_input() -> PaymentMethodInput {
        PaymentMethodInput {
            category: Some("crypto".to_string()),
            network: Some("ethereum".to_string()),
            wallet_address: Some(LONG_ADDRESS.to_string()),
            ..Default::default()
        }
    }

    fn stored(draft: &PaymentMethodDraft) -> payment_method::Model {
        let mut active = payment_method::ActiveModel::default();
        draft.apply_to(&mut active);

        payment_method::Model {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            category: active.category.unwrap(),
            kind: active.kind.unwrap(),
            label: active.label.unwrap(),
            identifier: active.identifier.unwrap(),
            bank_name: active.bank_name.unwrap(),
            account_number: active.account_number.unwrap(),
            account_name: active.account_name.unwrap(),
            routing_number: active.routing_number.unwrap(),
            coin_name: active.coin_name.unwrap(),
            network: active.network.unwrap(),
            wallet_address: active.wallet_address.unwrap(),
            digital_wallet_type: active.digital_wallet_type.unwrap(),
            digital_wallet_id: active.digital_wallet_id.unwrap(),
            selected_color: active.selected_color.unwrap(),
            icon_type: active.icon_type.unwrap(),
            icon_value: active.icon_value.unwrap(),
            tag: active.tag.unwrap(),
            display_order: 1,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_bank_identifier_masks_all_but_last_four() {
        let draft = PaymentMethodDraft::from_input(&bank_input()).unwrap();
        assert_eq!(draft.details.identifier(), "****6789");
        assert_eq!(draft.details.title(), "Chase Bank");
        assert_eq!(draft.selected_color, DEFAULT_COLOR);

        let method = stored(&draft);
        assert_eq!(method.identifier, "****6789");
        assert_eq!(method.icon_type.as_deref(), Some("emoji"));
        assert_eq!(method.icon_value.as_deref(), Some("🏦"));
        assert!(method.wallet_address.is_none());
    }

    #[test]
    fn test_bank_requires_account_name() {
        let input = PaymentMethodInput {
            account_name: Some("   ".to_string()),
            ..bank_input()
        };
        let err = PaymentMethodDraft::from_input(&input).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == REQUIRED_FIELDS_MESSAGE));
    }

    #[test]
    fn test_other_bank_uses_custom_name() {
        let input = PaymentMethodInput {
            bank_name: Some("Other".to_string()),
            custom_bank_name: Some("Credit Union of Somewhere".to_string()),
            ..bank_input()
        };
        let draft = PaymentMethodDraft::from_input(&input).unwrap();
        assert_eq!(draft.details.title(), "Credit Union of Somewhere");

        let missing_custom = PaymentMethodInput {
            bank_name: Some("Other".to_string()),
            ..bank_input()
        };
        assert!(PaymentMethodDraft::from_input(&missing_custom).is_err());
    }

    #[test]
    fn test_crypto_display_truncates_but_copies_full_address() {
        let draft = PaymentMethodDraft::from_input(&crypto_input()).unwrap();
        assert_eq!(draft.details.title(), "Ethereum (ETH)");
        assert_eq!(draft.details.identifier(), "0xABCD...CDEF12");
        assert_eq!(draft.details.icon(), "⟠");

        let display = display_info(&stored(&draft));
        assert_eq!(display.subtitle, "0xABCDEF1234567...CDEF12");
        assert_eq!(display.copy_text, LONG_ADDRESS);
        assert_eq!(display.copy_label, "Wallet Address");
        assert_eq!(display.detail, None);
    }

    #[test]
    fn test_short_crypto_address_kept_whole() {
        assert_eq!(shorten_address("abc123"), "abc123");
        assert_eq!(truncate_address("abc123"), "abc123");
    }

    #[test]
    fn test_crypto_requires_network_and_address() {
        let input = PaymentMethodInput {
            network: None,
            ..crypto_input()
        };
        assert!(PaymentMethodDraft::from_input(&input).is_err());

        let input = PaymentMethodInput {
            wallet_address: None,
            ..crypto_input()
        };
        assert!(PaymentMethodDraft::from_input(&input).is_err());
    }

    #[test]
    fn test_custom_network_falls_back_to_generic_icon() {
        let input = PaymentMethodInput {
            network: Some("other".to_string()),
            custom_network: Some("Kaspa".to_string()),
            ..crypto_input()
        };
        let draft = PaymentMethodDraft::from_input(&input).unwrap();
        assert_eq!(draft.details.title(), "Kaspa");
        assert_eq!(draft.details.icon(), "💰");
    }

    #[test]
    fn test_digital_wallet_display() {
        let input = PaymentMethodInput {
            category: Some("digital".to_string()),
            digital_wallet_type: Some("venmo".to_string()),
            digital_wallet_id: Some("@ada".to_string()),
            selected_color: Some("purple".to_string()),
            tag: Some("".to_string()),
            ..Default::default()
        };
        let draft = PaymentMethodDraft::from_input(&input).unwrap();
        assert_eq!(draft.details.identifier(), "@ada");
        assert_eq!(draft.tag, None);

        let display = display_info(&stored(&draft));
        assert_eq!(display.title, "Venmo");
        assert_eq!(display.copy_text, "@ada");
        assert_eq!(display.copy_label, "Venmo");
    }

    #[test]
    fn test_unknown_color_rejected() {
        let input = PaymentMethodInput {
            selected_color: Some("chartreuse".to_string()),
            ..bank_input()
        };
        assert!(matches!(
            PaymentMethodDraft::from_input(&input),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let input = PaymentMethodInput {
            category: Some("barter".to_string()),
            ..Default::default()
        };
        assert!(PaymentMethodDraft::from_input(&input).is_err());
    }

    #[test]
    fn test_input_accepts_column_names() {
        let input: PaymentMethodInput = serde_json::from_value(serde_json::json!({
            "category": "crypto",
            "network": "bitcoin",
            "wallet_address": "bc1qxyz",
            "selected_color": "orange"
        }))
        .unwrap();
        let draft = PaymentMethodDraft::from_input(&input).unwrap();
        assert_eq!(draft.selected_color, "orange");
        assert_eq!(draft.details.identifier(), "bc1qxyz");
    }
}
