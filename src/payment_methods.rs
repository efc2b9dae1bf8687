// ABOUTME: Payment method endpoints: list, create, update, delete and reorder
// ABOUTME: Writes are scoped to the session owner; the list read is keyed by user id

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::collections::HashSet;
use uuid::Uuid;

use crate::auth_helpers::{require_owner, validate_session};
use crate::error::{AppError, Result};
use crate::payment::{PaymentMethodDraft, PaymentMethodInput};
use crate::types::{
    payment_method_responses, DataResponse, PaymentMethodResponse, PaymentMethodsQuery,
    ReorderRequest, SuccessResponse,
};
use crate::AppState;

const INVALID_IDS_MESSAGE: &str = "Invalid payment method IDs";

pub async fn list_payment_methods(
    State(state): State<AppState>,
    Query(query): Query<PaymentMethodsQuery>,
) -> Result<Json<DataResponse<Vec<PaymentMethodResponse>>>> {
    let user_id = query
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("User ID required".to_string()))?;

    let methods = state.storage.list_payment_methods(&user_id).await?;
    Ok(Json(DataResponse::new(payment_method_responses(methods))))
}

pub async fn create_payment_method(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<PaymentMethodInput>,
) -> Result<Json<DataResponse<PaymentMethodResponse>>> {
    let session_data = require_owner(&jar, &state, input.user_id.as_deref())?;
    let draft = PaymentMethodDraft::from_input(&input)?;

    let method = state
        .storage
        .create_payment_method(&session_data.user_id, &draft)
        .await?;

    Ok(Json(DataResponse::new(method.into())))
}

pub async fn update_payment_method(
    State(state): State<AppState>,
    Path(method_id): Path<Uuid>,
    jar: CookieJar,
    Json(input): Json<PaymentMethodInput>,
) -> Result<Json<DataResponse<PaymentMethodResponse>>> {
    let session_data = require_owner(&jar, &state, input.user_id.as_deref())?;
    let draft = PaymentMethodDraft::from_input(&input)?;

    let method = state
        .storage
        .update_payment_method(&session_data.user_id, method_id, &draft)
        .await?;

    Ok(Json(DataResponse::new(method.into())))
}

pub async fn delete_payment_method(
    State(state): State<AppState>,
    Path(method_id): Path<Uuid>,
    jar: CookieJar,
) -> Result<Json<SuccessResponse>> {
    let session_data = validate_session(&jar, &state)?;

    state
        .storage
        .delete_payment_method(&session_data.user_id, method_id)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

fn parse_method_ids(value: &serde_json::Value) -> Result<Vec<Uuid>> {
    let invalid = || AppError::BadRequest(INVALID_IDS_MESSAGE.to_string());

    let ids = value.as_array().filter(|ids| !ids.is_empty()).ok_or_else(invalid)?;

    let parsed: Vec<Uuid> = ids
        .iter()
        .map(|id| {
            id.as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(invalid)
        })
        .collect::<Result<_>>()?;

    // A repeated id would leave two methods sharing one position
    let distinct: HashSet<&Uuid> = parsed.iter().collect();
    if distinct.len() != parsed.len() {
        return Err(invalid());
    }

    Ok(parsed)
}

/// Persist a drag-and-drop ordering. The list position becomes `display_order`.
pub async fn reorder_payment_methods(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<DataResponse<Vec<PaymentMethodResponse>>>> {
    let session_data = validate_session(&jar, &state)?;
    let method_ids = parse_method_ids(&req.payment_method_ids)?;

    let methods = state
        .storage
        .reorder_payment_methods(&session_data.user_id, &method_ids)
        .await?;

    Ok(Json(DataResponse::new(payment_method_responses(methods))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_method_ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_method_ids(&json!([id.to_string()])).unwrap(), vec![id]);

        let repeated = json!([id.to_string(), id.to_string()]);
        for bad in [json!([]), json!("not-a-list"), json!(null), json!(["nope"]), json!([1]), repeated] {
            assert!(matches!(
                parse_method_ids(&bad),
                Err(AppError::BadRequest(msg)) if msg == INVALID_IDS_MESSAGE
            ));
        }
    }
}
