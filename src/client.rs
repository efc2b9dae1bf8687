// ABOUTME: Client-side payment method list state over the HTTP API
// ABOUTME: Delete and reorder apply locally first and roll back if the server refuses

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::payment::PaymentMethodInput;
use crate::session::SESSION_COOKIE_NAME;
use crate::types::{DataResponse, PaymentMethodResponse};

#[async_trait]
pub trait PaymentMethodApi: Send + Sync {
    async fn list(&self, user_id: &str) -> Result<Vec<PaymentMethodResponse>>;
    async fn create(&self, input: &PaymentMethodInput) -> Result<PaymentMethodResponse>;
    async fn update(&self, id: Uuid, input: &PaymentMethodInput) -> Result<PaymentMethodResponse>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn reorder(&self, ids: &[Uuid]) -> Result<Vec<PaymentMethodResponse>>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

fn error_from_status(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::BAD_REQUEST => AppError::BadRequest(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        StatusCode::SERVICE_UNAVAILABLE => AppError::NotConfigured(message),
        _ => AppError::Upstream(format!("{}: {}", status, message)),
    }
}

/// Talks to the paylink API with the session cookie issued by `/api/auth/session`.
pub struct HttpPaymentMethodApi {
    client: reqwest::Client,
    base_url: String,
    session_id: Option<String>,
}

impl HttpPaymentMethodApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));

        match &self.session_id {
            Some(session_id) => builder.header(
                reqwest::header::COOKIE,
                format!("{}={}", SESSION_COOKIE_NAME, session_id),
            ),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(error_from_status(status, message));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PaymentMethodApi for HttpPaymentMethodApi {
    async fn list(&self, user_id: &str) -> Result<Vec<PaymentMethodResponse>> {
        let builder = self
            .request(Method::GET, "/api/payment-methods")
            .query(&[("userId", user_id)]);
        let body: DataResponse<Vec<PaymentMethodResponse>> = Self::send(builder).await?;
        Ok(body.data)
    }

    async fn create(&self, input: &PaymentMethodInput) -> Result<PaymentMethodResponse> {
        let builder = self.request(Method::POST, "/api/payment-methods").json(input);
        let body: DataResponse<PaymentMethodResponse> = Self::send(builder).await?;
        Ok(body.data)
    }

    async fn update(&self, id: Uuid, input: &PaymentMethodInput) -> Result<PaymentMethodResponse> {
        let builder = self
            .request(Method::PUT, &format!("/api/payment-methods/{}", id))
            .json(input);
        let body: DataResponse<PaymentMethodResponse> = Self::send(builder).await?;
        Ok(body.data)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("/api/payment-methods/{}", id));
        let _: serde_json::Value = Self::send(builder).await?;
        Ok(())
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<Vec<PaymentMethodResponse>> {
        let builder = self
            .request(Method::POST, "/api/payment-methods/reorder")
            .json(&json!({ "paymentMethodIds": ids }));
        let body: DataResponse<Vec<PaymentMethodResponse>> = Self::send(builder).await?;
        Ok(body.data)
    }
}

fn sort_by_display_order(methods: &mut [PaymentMethodResponse]) {
    methods.sort_by_key(|method| method.display_order);
}

/// The dashboard's list of the signed-in user's payment methods.
pub struct PaymentMethodList<A> {
    api: A,
    methods: Vec<PaymentMethodResponse>,
}

impl<A: PaymentMethodApi> PaymentMethodList<A> {
    pub fn new(api: A, mut initial: Vec<PaymentMethodResponse>) -> Self {
        sort_by_display_order(&mut initial);
        Self {
            api,
            methods: initial,
        }
    }

    pub fn methods(&self) -> &[PaymentMethodResponse] {
        &self.methods
    }

    pub async fn refresh(&mut self, user_id: &str) -> Result<()> {
        let mut methods = self.api.list(user_id).await?;
        sort_by_display_order(&mut methods);
        self.methods = methods;
        Ok(())
    }

    pub async fn add(&mut self, input: &PaymentMethodInput) -> Result<PaymentMethodResponse> {
        let created = self.api.create(input).await?;
        self.methods.push(created.clone());
        sort_by_display_order(&mut self.methods);
        Ok(created)
    }

    pub async fn update(
        &mut self,
        id: Uuid,
        input: &PaymentMethodInput,
    ) -> Result<PaymentMethodResponse> {
        let updated = self.api.update(id, input).await?;
        for method in self.methods.iter_mut().filter(|method| method.id == id) {
            *method = updated.clone();
        }
        sort_by_display_order(&mut self.methods);
        Ok(updated)
    }

    /// Removes the method immediately; the previous list comes back if the server fails.
    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        let snapshot = self.methods.clone();
        self.methods.retain(|method| method.id != id);

        if let Err(e) = self.api.delete(id).await {
            tracing::warn!("Delete of payment method {} failed, restoring list: {}", id, e);
            self.methods = snapshot;
            return Err(e);
        }

        Ok(())
    }

    /// Shows `new_order` immediately and renumbers it once the server accepts it.
    /// `new_order` must name every method in the list exactly once.
    pub async fn reorder(&mut self, new_order: &[Uuid]) -> Result<()> {
        let distinct: HashSet<Uuid> = new_order.iter().copied().collect();
        if new_order.len() != self.methods.len() || distinct.len() != new_order.len() {
            return Err(AppError::BadRequest("Invalid payment method IDs".to_string()));
        }

        let mut reordered = Vec::with_capacity(new_order.len());
        for id in new_order {
            let method = self
                .methods
                .iter()
                .find(|method| method.id == *id)
                .ok_or_else(|| AppError::BadRequest("Invalid payment method IDs".to_string()))?;
            reordered.push(method.clone());
        }

        let snapshot = std::mem::replace(&mut self.methods, reordered);

        match self.api.reorder(new_order).await {
            Ok(_) => {
                for (index, method) in self.methods.iter_mut().enumerate() {
                    method.display_order = index as i32 + 1;
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Reorder failed, restoring previous order: {}", e);
                self.methods = snapshot;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentDisplay;
    use std::sync::Mutex;

    fn method(label: &str, display_order: i32) -> PaymentMethodResponse {
        PaymentMethodResponse {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            category: "digital".to_string(),
            kind: label.to_string(),
            label: label.to_string(),
            identifier: format!("@{}", label),
            bank_name: None,
            account_number: None,
            account_name: None,
            routing_number: None,
            coin_name: None,
            network: None,
            wallet_address: None,
            digital_wallet_type: Some(label.to_lowercase()),
            digital_wallet_id: Some(format!("@{}", label)),
            selected_color: "blue".to_string(),
            icon_type: Some("emoji".to_string()),
            icon_value: Some("💳".to_string()),
            tag: None,
            display_order,
            created_at: 0,
            updated_at: 0,
            display: PaymentDisplay {
                title: label.to_string(),
                subtitle: format!("@{}", label),
                detail: None,
                copy_text: format!("@{}", label),
                copy_label: label.to_string(),
            },
        }
    }

    #[derive(Default)]
    struct FakeApi {
        fail: bool,
        deleted: Mutex<Vec<Uuid>>,
        created: Mutex<Option<PaymentMethodResponse>>,
    }

    impl FakeApi {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn check(&self) -> Result<()> {
            if self.fail {
                Err(AppError::Upstream("server unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl PaymentMethodApi for FakeApi {
        async fn list(&self, _user_id: &str) -> Result<Vec<PaymentMethodResponse>> {
            self.check()?;
            Ok(vec![method("Zelle", 2), method("Venmo", 1)])
        }

        async fn create(&self, _input: &PaymentMethodInput) -> Result<PaymentMethodResponse> {
            self.check()?;
            Ok(self
                .created
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| method("Stripe", 99)))
        }

        async fn update(&self, id: Uuid, _input: &PaymentMethodInput) -> Result<PaymentMethodResponse> {
            self.check()?;
            let mut updated = method("Cash App", 1);
            updated.id = id;
            Ok(updated)
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.check()?;
            self.deleted.lock().unwrap().push(id);
            Ok(())
        }

        async fn reorder(&self, _ids: &[Uuid]) -> Result<Vec<PaymentMethodResponse>> {
            self.check()?;
            Ok(Vec::new())
        }
    }

    fn three_methods() -> Vec<PaymentMethodResponse> {
        vec![method("PayPal", 1), method("Venmo", 2), method("Zelle", 3)]
    }

    #[tokio::test]
    async fn test_failed_delete_restores_list_exactly() {
        let initial = three_methods();
        let mut list = PaymentMethodList::new(FakeApi::failing(), initial.clone());

        let result = list.delete(initial[1].id).await;
        assert!(result.is_err());
        assert_eq!(list.methods(), initial.as_slice());
    }

    #[tokio::test]
    async fn test_successful_delete_removes_method() {
        let initial = three_methods();
        let mut list = PaymentMethodList::new(FakeApi::default(), initial.clone());

        list.delete(initial[0].id).await.unwrap();
        assert_eq!(list.methods().len(), 2);
        assert!(list.methods().iter().all(|m| m.id != initial[0].id));
        assert_eq!(list.api.deleted.lock().unwrap().as_slice(), &[initial[0].id]);
    }

    #[tokio::test]
    async fn test_reorder_renumbers_on_success() {
        let initial = three_methods();
        let mut list = PaymentMethodList::new(FakeApi::default(), initial.clone());

        let new_order = vec![initial[2].id, initial[0].id, initial[1].id];
        list.reorder(&new_order).await.unwrap();

        let ids: Vec<Uuid> = list.methods().iter().map(|m| m.id).collect();
        assert_eq!(ids, new_order);
        let orders: Vec<i32> = list.methods().iter().map(|m| m.display_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_reorder_restores_previous_order() {
        let initial = three_methods();
        let mut list = PaymentMethodList::new(FakeApi::failing(), initial.clone());

        let result = list
            .reorder(&[initial[2].id, initial[1].id, initial[0].id])
            .await;
        assert!(result.is_err());
        assert_eq!(list.methods(), initial.as_slice());
    }

    #[tokio::test]
    async fn test_reorder_with_unknown_id_changes_nothing() {
        let initial = three_methods();
        let mut list = PaymentMethodList::new(FakeApi::default(), initial.clone());

        let result = list.reorder(&[Uuid::new_v4()]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(list.methods(), initial.as_slice());
    }

    #[tokio::test]
    async fn test_reorder_with_repeated_id_changes_nothing() {
        let initial = three_methods();
        let mut list = PaymentMethodList::new(FakeApi::default(), initial.clone());

        let result = list
            .reorder(&[initial[0].id, initial[0].id, initial[1].id])
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(list.methods(), initial.as_slice());

        let result = list.reorder(&[initial[0].id, initial[0].id]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(list.methods(), initial.as_slice());
    }

    #[tokio::test]
    async fn test_partial_reorder_keeps_every_method() {
        let initial = three_methods();
        let mut list = PaymentMethodList::new(FakeApi::default(), initial.clone());

        let result = list.reorder(&[initial[2].id, initial[0].id]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(list.methods(), initial.as_slice());
    }

    #[tokio::test]
    async fn test_add_and_update_apply_server_result_in_order() {
        let api = FakeApi::default();
        *api.created.lock().unwrap() = Some(method("Stripe", 0));
        let mut list = PaymentMethodList::new(api, three_methods());

        list.add(&PaymentMethodInput::default()).await.unwrap();
        assert_eq!(list.methods()[0].label, "Stripe");

        let target = list.methods()[3].id;
        list.update(target, &PaymentMethodInput::default()).await.unwrap();
        assert!(list.methods().iter().any(|m| m.id == target && m.label == "Cash App"));
    }

    #[tokio::test]
    async fn test_refresh_sorts_server_list() {
        let mut list = PaymentMethodList::new(FakeApi::default(), Vec::new());
        list.refresh("user-1").await.unwrap();

        let labels: Vec<&str> = list.methods().iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Venmo", "Zelle"]);
    }

    #[test]
    fn test_error_from_status() {
        assert!(matches!(
            error_from_status(StatusCode::NOT_FOUND, "Profile not found".to_string()),
            AppError::NotFound(msg) if msg == "Profile not found"
        ));
        assert!(matches!(
            error_from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            AppError::Upstream(_)
        ));
    }
}
