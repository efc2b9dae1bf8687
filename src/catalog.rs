// ABOUTME: Read-only catalog endpoints backing the add-payment form
// ABOUTME: Bank suggestions by country and the fixed network, wallet, color and category options

use axum::{extract::Query, Json};

use crate::banks::{country_name, suggest_banks, DEFAULT_COUNTRY};
use crate::payment::{CATEGORIES, COLOR_OPTIONS, CRYPTO_NETWORKS, DIGITAL_WALLETS};
use crate::types::{BanksQuery, BanksResponse, PaymentOptionsResponse};

pub async fn list_banks(Query(query): Query<BanksQuery>) -> Json<BanksResponse> {
    let country = query
        .country
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

    let banks = suggest_banks(&country, query.q.as_deref());

    Json(BanksResponse {
        country_name: country_name(&country),
        country,
        banks,
    })
}

pub async fn payment_options() -> Json<PaymentOptionsResponse> {
    Json(PaymentOptionsResponse {
        categories: CATEGORIES,
        crypto_networks: CRYPTO_NETWORKS,
        digital_wallets: DIGITAL_WALLETS,
        colors: COLOR_OPTIONS,
    })
}
