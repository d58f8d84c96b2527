//! # Product Commands
//!
//! Submitting the product editor.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Submit Flow                                  │
//! │                                                                         │
//! │  User clicks "Save"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  submit_product(service, pipeline, toasts, config, request_id, draft)   │
//! │       │                                                                 │
//! │       ├── Stage A errors ──► FieldErrors { errors }   (inline)          │
//! │       ├── Stage B error ───► Blocked { message }      (toast queued)    │
//! │       ▼                                                                 │
//! │  ProductPayload::build (effective variant values baked in)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductService::create_product                                         │
//! │       │                                                                 │
//! │       ├── Ok(id) ──────────► Created { id }                             │
//! │       ├── 422 field map ───► FieldErrors { errors }   (inline)          │
//! │       └── other failure ───► Err(ApiError)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use meem_core::{
    is_blank, CoreError, CoverImage, DeliveryType, EffectiveVariant, FieldErrors, Money,
    PriceEntry, ProductSubmission, Reporter, SpecEntry, ValidationError, ValidationOutcome,
    ValidationPipeline, ValueSource,
};

use crate::error::{ApiError, ServiceError};
use crate::state::ConfigState;

// =============================================================================
// Payload
// =============================================================================

/// Variant as sent to the product service, with inheritance applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPayload {
    /// `None` for variants created in this session.
    pub id: Option<String>,
    pub variations: Vec<u32>,
    pub stock: i32,
    pub net_price_cents: Option<i64>,
    pub cost_price_cents: Option<i64>,
    /// True when the price above is the product's.
    pub inherits_price: bool,
    pub delivery_type: Option<DeliveryType>,
    pub delivery_cost_cents: Option<i64>,
    pub specs: Vec<SpecEntry>,
    pub shelf_id: Option<u32>,
    pub image: Option<CoverImage>,
}

/// Body of a create-product request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    /// Idempotency key chosen by the caller; retries of one editing
    /// session reuse it so the service can drop duplicates.
    pub request_id: Uuid,
    pub name: String,
    pub sku: String,
    pub slug: String,
    pub currency: String,
    pub net_price_cents: Option<i64>,
    pub cost_price_cents: Option<i64>,
    pub has_variants: bool,
    pub delivery_type: Option<DeliveryType>,
    pub delivery_cost_cents: Option<i64>,
    pub cover_image: Option<CoverImage>,
    pub specs: Vec<SpecEntry>,
    pub prices: Vec<PriceEntry>,
    pub variants: Vec<VariantPayload>,
}

/// Valid specification rows, trimmed.
fn clean_specs(specs: &[SpecEntry]) -> Vec<SpecEntry> {
    specs
        .iter()
        .filter(|s| s.is_valid())
        .map(|s| SpecEntry::new(s.name.trim(), s.value.trim()))
        .collect()
}

/// Parses an optional amount, treating blank as absent.
fn optional_amount(
    value: Option<&str>,
    label: &str,
    decimals: u8,
) -> Result<Option<Money>, ValidationError> {
    match value {
        Some(v) if !is_blank(v) => Money::parse(v, decimals)
            .map(Some)
            .map_err(|_| ValidationError::InvalidAmount {
                field: label.to_string(),
            }),
        _ => Ok(None),
    }
}

impl ProductPayload {
    /// Builds the payload from a submission that passed validation.
    ///
    /// `resolved` must be the effective values the pipeline returned for the
    /// same submission, in variant order. Building twice with the same
    /// `request_id` yields equal payloads.
    pub fn build(
        submission: &ProductSubmission,
        resolved: &[EffectiveVariant],
        config: &ConfigState,
        request_id: Uuid,
    ) -> Result<ProductPayload, CoreError> {
        let decimals = config.currency_decimals;
        let product = &submission.product;

        let net = optional_amount(Some(&product.net_price), "Net price", decimals)?;
        let cost = optional_amount(Some(&product.cost_price), "Cost price", decimals)?;
        let delivery_cost =
            optional_amount(product.delivery_cost.as_deref(), "Delivery cost", decimals)?;

        let mut variants = Vec::with_capacity(resolved.len());
        for (variant, effective) in submission.active_variants().iter().zip(resolved) {
            if let Some(price) = effective.price {
                debug!(
                    variant = %effective.variant_id,
                    net = %price.net.display(decimals),
                    cost = %price.cost.display(decimals),
                    source = ?effective.price_source,
                    "Variant price resolved"
                );
            }
            let variant_cost = optional_amount(
                effective.delivery_cost.as_deref(),
                "Variant delivery cost",
                decimals,
            )?;
            variants.push(VariantPayload {
                id: Some(variant.id.trim())
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
                variations: variant.variations.clone(),
                stock: variant.stock,
                net_price_cents: effective.price.map(|p| p.net.cents()),
                cost_price_cents: effective.price.map(|p| p.cost.cents()),
                inherits_price: effective.price_source == ValueSource::Inherited,
                delivery_type: effective.delivery_type,
                delivery_cost_cents: variant_cost.map(|m| m.cents()),
                specs: clean_specs(&variant.variant_specs),
                shelf_id: variant.shelf_id,
                image: variant.image.clone().filter(CoverImage::is_present),
            });
        }

        let cover_image = submission
            .main_image
            .clone()
            .filter(CoverImage::is_present)
            .or_else(|| product.cover_image.clone().filter(CoverImage::is_present));

        Ok(ProductPayload {
            request_id,
            name: product.name.trim().to_string(),
            sku: product.sku.trim().to_string(),
            slug: product.slug.trim().to_string(),
            currency: config.currency_code.clone(),
            net_price_cents: net.map(|m| m.cents()),
            cost_price_cents: cost.map(|m| m.cents()),
            has_variants: product.has_variants,
            delivery_type: product.delivery_type,
            delivery_cost_cents: delivery_cost.map(|m| m.cents()),
            cover_image,
            specs: clean_specs(&submission.specs),
            prices: submission.prices.clone(),
            variants,
        })
    }
}

// =============================================================================
// Product Service
// =============================================================================

/// The product REST service, as seen by the console.
pub trait ProductService {
    /// Creates the product, returning its new id.
    fn create_product(
        &self,
        payload: &ProductPayload,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Messages {
    Many(Vec<String>),
    One(String),
}

#[derive(Deserialize)]
struct UnprocessableBody {
    #[serde(default)]
    errors: BTreeMap<String, Messages>,
}

/// Parses a 422 body into inline field errors.
///
/// Accepts `{"errors": {"sku": ["taken"]}}` and `{"errors": {"sku": "taken"}}`.
pub fn parse_unprocessable(body: &str) -> Result<FieldErrors, serde_json::Error> {
    let parsed: UnprocessableBody = serde_json::from_str(body)?;
    let map = parsed
        .errors
        .into_iter()
        .map(|(key, messages)| {
            let messages = match messages {
                Messages::Many(list) => list,
                Messages::One(message) => vec![message],
            };
            (key, messages)
        })
        .collect::<BTreeMap<_, _>>();
    Ok(FieldErrors::from(map))
}

impl ServiceError {
    /// Classifies a non-success HTTP response.
    pub fn from_response(status: u16, body: &str) -> ServiceError {
        match status {
            422 => match parse_unprocessable(body) {
                Ok(errors) if !errors.is_empty() => ServiceError::Unprocessable(errors),
                _ => ServiceError::Server {
                    status,
                    message: body.to_string(),
                },
            },
            502..=504 => ServiceError::Unavailable(format!("HTTP {status}")),
            _ => ServiceError::Server {
                status,
                message: body.to_string(),
            },
        }
    }
}

// =============================================================================
// Submit Command
// =============================================================================

/// What the editor should do after a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmitResponse {
    /// Saved; navigate to the product.
    Created { id: String },
    /// Show inline errors (from Stage A or the service's 422).
    FieldErrors { errors: FieldErrors },
    /// A toast has been queued with this message.
    Blocked { message: String },
}

/// Validates and, if valid, creates the product.
///
/// `request_id` identifies the editing session's create request. Pass the
/// same id when retrying after a failure so the service can de-duplicate.
pub async fn submit_product<S: ProductService>(
    service: &S,
    pipeline: &ValidationPipeline,
    reporter: &dyn Reporter,
    config: &ConfigState,
    request_id: Uuid,
    submission: &ProductSubmission,
) -> Result<SubmitResponse, ApiError> {
    let sku = submission.product.sku.trim();
    debug!(%sku, %request_id, variants = submission.variants.len(), "Submitting product");

    let resolved = match pipeline.validate_and_report(submission, reporter) {
        ValidationOutcome::Invalid(errors) => {
            info!(%sku, fields = errors.len(), "Submission has field errors");
            return Ok(SubmitResponse::FieldErrors { errors });
        }
        ValidationOutcome::Blocked(error) => {
            return Ok(SubmitResponse::Blocked {
                message: error.to_string(),
            });
        }
        ValidationOutcome::Valid(resolved) => resolved,
    };

    let payload = ProductPayload::build(submission, &resolved, config, request_id)?;

    match service.create_product(&payload).await {
        Ok(id) => {
            info!(%sku, %id, "Product created");
            Ok(SubmitResponse::Created { id })
        }
        Err(ServiceError::Unprocessable(errors)) => {
            info!(%sku, fields = errors.len(), "Product service rejected fields");
            Ok(SubmitResponse::FieldErrors { errors })
        }
        Err(other) => Err(other.into()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::ToastQueue;
    use meem_core::{ProductDraft, VariantDelivery, VariantEntry, VariantPrices};
    use std::sync::Mutex;

    /// Fake service that records payloads and replays a canned result.
    struct FakeService {
        result: Result<String, ServiceError>,
        seen: Mutex<Vec<ProductPayload>>,
    }

    impl FakeService {
        fn returning(result: Result<String, ServiceError>) -> Self {
            FakeService {
                result,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl ProductService for FakeService {
        async fn create_product(&self, payload: &ProductPayload) -> Result<String, ServiceError> {
            self.seen.lock().unwrap().push(payload.clone());
            self.result.clone()
        }
    }

    fn specs() -> Vec<SpecEntry> {
        ["weight", "height", "width", "length"]
            .into_iter()
            .map(|n| SpecEntry::new(n, "1"))
            .collect()
    }

    fn shirt() -> ProductSubmission {
        ProductSubmission {
            product: ProductDraft {
                name: " Shirt ".into(),
                sku: "S1".into(),
                slug: "shirt".into(),
                net_price: "20".into(),
                cost_price: "8".into(),
                has_variants: true,
                delivery_type: Some(DeliveryType::Meemhome),
                delivery_cost: Some("15".into()),
                ..Default::default()
            },
            main_image: Some(CoverImage::Url {
                url: "https://cdn/shirt.png".into(),
            }),
            variants: vec![
                VariantEntry {
                    id: "v-1".into(),
                    variations: vec![1, 4],
                    stock: 2,
                    ..Default::default()
                },
                VariantEntry {
                    variations: vec![2, 4],
                    stock: 5,
                    delivery_type: VariantDelivery::Meemhome,
                    delivery_cost: Some("9.5".into()),
                    variant_prices: VariantPrices {
                        net_price: "25".into(),
                        cost: "10".into(),
                    },
                    ..Default::default()
                },
            ],
            specs: specs(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_created_with_resolved_variants() {
        let service = FakeService::returning(Ok("p-42".into()));
        let toasts = ToastQueue::new();
        let config = ConfigState::default();
        let pipeline = ValidationPipeline::new(config.validation_options());

        let request_id = Uuid::new_v4();
        let response = submit_product(&service, &pipeline, &toasts, &config, request_id, &shirt())
            .await
            .unwrap();
        assert_eq!(response, SubmitResponse::Created { id: "p-42".into() });
        assert!(toasts.is_empty());

        let payload = service.seen.lock().unwrap().remove(0);
        assert_eq!(payload.request_id, request_id);
        assert_eq!(payload.name, "Shirt");
        assert_eq!(payload.delivery_cost_cents, Some(1500));

        let first = &payload.variants[0];
        assert_eq!(first.id.as_deref(), Some("v-1"));
        assert!(first.inherits_price);
        assert_eq!(first.net_price_cents, Some(2000));
        assert_eq!(first.delivery_cost_cents, Some(1500));

        let second = &payload.variants[1];
        assert_eq!(second.id, None);
        assert!(!second.inherits_price);
        assert_eq!(second.cost_price_cents, Some(1000));
        assert_eq!(second.delivery_cost_cents, Some(950));
    }

    #[tokio::test]
    async fn test_field_errors_skip_service() {
        let service = FakeService::returning(Ok("unused".into()));
        let toasts = ToastQueue::new();
        let config = ConfigState::default();
        let mut submission = shirt();
        submission.product.sku = String::new();

        let response = submit_product(
            &service,
            &ValidationPipeline::default(),
            &toasts,
            &config,
            Uuid::new_v4(),
            &submission,
        )
        .await
        .unwrap();

        let SubmitResponse::FieldErrors { errors } = response else {
            panic!("expected field errors");
        };
        assert_eq!(errors.get("sku").unwrap(), &["SKU is required".to_string()]);
        assert_eq!(service.calls(), 0);
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_blocked_queues_toast() {
        let service = FakeService::returning(Ok("unused".into()));
        let toasts = ToastQueue::new();
        let config = ConfigState::default();
        let mut submission = shirt();
        submission.variants[0].stock = 0;

        let response = submit_product(
            &service,
            &ValidationPipeline::default(),
            &toasts,
            &config,
            Uuid::new_v4(),
            &submission,
        )
        .await
        .unwrap();

        assert_eq!(
            response,
            SubmitResponse::Blocked {
                message: "Variant 1 must have stock quantity greater than 0".into()
            }
        );
        assert_eq!(toasts.drain().len(), 1);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_422_uses_inline_path() {
        let errors = parse_unprocessable(r#"{"errors":{"slug":"Slug has already been taken"}}"#)
            .unwrap();
        let service = FakeService::returning(Err(ServiceError::Unprocessable(errors)));
        let config = ConfigState::default();

        let response = submit_product(
            &service,
            &ValidationPipeline::default(),
            &ToastQueue::new(),
            &config,
            Uuid::new_v4(),
            &shirt(),
        )
        .await
        .unwrap();

        let SubmitResponse::FieldErrors { errors } = response else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.get("slug").unwrap(),
            &["Slug has already been taken".to_string()]
        );
    }

    #[tokio::test]
    async fn test_service_outage_is_api_error() {
        let service = FakeService::returning(Err(ServiceError::Unavailable("timeout".into())));
        let config = ConfigState::default();

        let err = submit_product(
            &service,
            &ValidationPipeline::default(),
            &ToastQueue::new(),
            &config,
            Uuid::new_v4(),
            &shirt(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn test_unparseable_delivery_cost_stays_inline() {
        let service = FakeService::returning(Ok("unused".into()));
        let toasts = ToastQueue::new();
        let config = ConfigState::default();
        let mut submission = shirt();
        submission.product.delivery_cost = Some("fifteen".into());

        let response = submit_product(
            &service,
            &ValidationPipeline::default(),
            &toasts,
            &config,
            Uuid::new_v4(),
            &submission,
        )
        .await
        .unwrap();

        let SubmitResponse::FieldErrors { errors } = response else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.get("delivery_cost").unwrap(),
            &["Delivery cost must be a valid amount".to_string()]
        );
        assert_eq!(service.calls(), 0);
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_retry_keeps_request_id() {
        let service = FakeService::returning(Err(ServiceError::Unavailable("timeout".into())));
        let toasts = ToastQueue::new();
        let config = ConfigState::default();
        let pipeline = ValidationPipeline::default();
        let request_id = Uuid::new_v4();

        for _ in 0..2 {
            let result =
                submit_product(&service, &pipeline, &toasts, &config, request_id, &shirt()).await;
            assert!(result.is_err());
        }

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[0].request_id, request_id);
    }

    #[test]
    fn test_build_is_stable_for_one_request_id() {
        let config = ConfigState::default();
        let submission = shirt();
        let resolved = ValidationPipeline::default()
            .validate(&submission)
            .into_result()
            .unwrap();
        let request_id = Uuid::new_v4();

        let first = ProductPayload::build(&submission, &resolved, &config, request_id).unwrap();
        let second = ProductPayload::build(&submission, &resolved, &config, request_id).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_submit_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let service = FakeService::returning(Ok("p-1".into()));
        let toasts = ToastQueue::new();
        let config = ConfigState::default();
        let pipeline = ValidationPipeline::default();
        let submission = shirt();
        let future = submit_product(
            &service,
            &pipeline,
            &toasts,
            &config,
            Uuid::new_v4(),
            &submission,
        );
        assert_send(&future);
    }

    #[test]
    fn test_build_formats_at_configured_scale() {
        let config = ConfigState {
            currency_code: "KWD".into(),
            currency_decimals: 3,
            ..ConfigState::default()
        };
        let mut submission = shirt();
        submission.product.delivery_cost = Some("1.250".into());
        let resolved = ValidationPipeline::new(config.validation_options())
            .validate(&submission)
            .into_result()
            .unwrap();

        let payload =
            ProductPayload::build(&submission, &resolved, &config, Uuid::new_v4()).unwrap();
        assert_eq!(payload.currency, "KWD");
        assert_eq!(payload.net_price_cents, Some(20_000));
        assert_eq!(payload.delivery_cost_cents, Some(1250));
    }

    #[test]
    fn test_parse_unprocessable_shapes() {
        let errors =
            parse_unprocessable(r#"{"message":"invalid","errors":{"sku":["a","b"],"name":"c","x":[]}}"#)
                .unwrap();
        assert_eq!(errors.get("sku").unwrap().len(), 2);
        assert_eq!(errors.get("name").unwrap(), &["c".to_string()]);
        assert!(!errors.contains("x"));

        assert!(parse_unprocessable("not json").is_err());
    }

    #[test]
    fn test_from_response() {
        let err = ServiceError::from_response(422, r#"{"errors":{"sku":["taken"]}}"#);
        assert!(matches!(err, ServiceError::Unprocessable(_)));

        let err = ServiceError::from_response(422, "<html>");
        assert!(matches!(err, ServiceError::Server { status: 422, .. }));

        let err = ServiceError::from_response(503, "");
        assert!(matches!(err, ServiceError::Unavailable(_)));
    }

    #[test]
    fn test_submit_response_shape() {
        let json = serde_json::to_string(&SubmitResponse::Blocked {
            message: "Delivery method is required".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"status":"blocked","message":"Delivery method is required"}"#
        );
    }
}
