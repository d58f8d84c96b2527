//! # Validation Module (Stage A)
//!
//! Structural, per-field checks that run before any blocking rule.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Submit Pipeline                                    │
//! │                                                                         │
//! │  Stage A: THIS MODULE                                                   │
//! │  ├── validate_basics            name, sku, slug, prices, delivery cost  │
//! │  ├── validate_variants_presence "variants"                              │
//! │  └── validate_cover_image       "cover_image"                           │
//! │           │                                                             │
//! │           │  merged FieldErrors non-empty? ──► inline errors, STOP      │
//! │           ▼                                                             │
//! │  Stage B: checks module (first failure → toast)                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Backend 422 ──► merged into the same inline FieldErrors path           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every Stage A function collects exhaustively: one draft with a blank
//! name and a blank SKU reports both.
//!
//! ## Usage
//! ```rust
//! use meem_core::validation::{validate_sku, FieldKey};
//!
//! assert!(validate_sku("M1").is_ok());
//! assert_eq!(validate_sku("  ").unwrap_err().to_string(), "SKU is required");
//! assert_eq!(FieldKey::CoverImage.key(), "cover_image");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldErrors, ValidationError};
use crate::money::{Money, DEFAULT_DECIMALS};
use crate::types::{is_blank, CoverImage, ProductDraft, ProductSubmission, VariantEntry};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Options
// =============================================================================

/// Knobs shared by every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Fractional digits allowed in price strings.
    pub currency_decimals: u8,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            currency_decimals: DEFAULT_DECIMALS,
        }
    }
}

// =============================================================================
// Field Keys
// =============================================================================

/// Form fields Stage A can report on.
///
/// `key()` is the `data-field` attribute in the console and the field name
/// the backend uses in 422 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Name,
    Sku,
    Slug,
    NetPrice,
    CostPrice,
    DeliveryCost,
    Variants,
    CoverImage,
}

impl FieldKey {
    pub fn key(&self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::Sku => "sku",
            FieldKey::Slug => "slug",
            FieldKey::NetPrice => "net_price",
            FieldKey::CostPrice => "cost_price",
            FieldKey::DeliveryCost => "delivery_cost",
            FieldKey::Variants => "variants",
            FieldKey::CoverImage => "cover_image",
        }
    }

    /// Human label used at the start of messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::Name => "Name",
            FieldKey::Sku => "SKU",
            FieldKey::Slug => "Slug",
            FieldKey::NetPrice => "Net price",
            FieldKey::CostPrice => "Cost price",
            FieldKey::DeliveryCost => "Delivery cost",
            FieldKey::Variants => "Variants",
            FieldKey::CoverImage => "Cover image",
        }
    }
}

/// Message shown when variants are enabled but none were added.
pub const VARIANTS_REQUIRED_MESSAGE: &str =
    "Add at least one variant or disable \"Has variants\"";

// =============================================================================
// Single-Field Validators
// =============================================================================

/// Validates that a field is non-empty after trimming.
pub fn validate_required(value: &str, field: FieldKey) -> ValidationResult<()> {
    if is_blank(value) {
        return Err(ValidationError::Required {
            field: field.label().to_string(),
        });
    }
    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required(name, FieldKey::Name)
}

/// Validates a SKU (Stock Keeping Unit).
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    validate_required(sku, FieldKey::Sku)
}

/// Validates a URL slug.
pub fn validate_slug(slug: &str) -> ValidationResult<()> {
    validate_required(slug, FieldKey::Slug)
}

/// Validates a price string and returns the parsed amount.
///
/// ## Rules
/// - Must not be blank
/// - Must parse as a decimal with at most `decimals` fractional digits
/// - Must not be negative
pub fn validate_amount(value: &str, field: FieldKey, decimals: u8) -> ValidationResult<Money> {
    validate_required(value, field)?;

    let amount = Money::parse(value, decimals).map_err(|_| ValidationError::InvalidAmount {
        field: field.label().to_string(),
    })?;

    if amount.is_negative() {
        return Err(ValidationError::InvalidAmount {
            field: field.label().to_string(),
        });
    }

    Ok(amount)
}

// =============================================================================
// Stage A Checks
// =============================================================================

/// Required identity fields and, for simple products, both prices.
///
/// With variants enabled the product prices are optional here: they only
/// matter as a fallback, which Stage B decides. A price that is filled in is
/// still checked for format.
pub fn validate_basics(product: &ProductDraft, options: &ValidationOptions) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let identity = [
        (FieldKey::Name, product.name.as_str()),
        (FieldKey::Sku, product.sku.as_str()),
        (FieldKey::Slug, product.slug.as_str()),
    ];
    for (field, value) in identity {
        if let Err(e) = validate_required(value, field) {
            errors.push_error(field.key(), &e);
        }
    }

    let prices = [
        (FieldKey::NetPrice, product.net_price.as_str()),
        (FieldKey::CostPrice, product.cost_price.as_str()),
    ];
    for (field, value) in prices {
        if product.has_variants && is_blank(value) {
            continue;
        }
        if let Err(e) = validate_amount(value, field, options.currency_decimals) {
            errors.push_error(field.key(), &e);
        }
    }

    // Optional, but a filled-in cost must be a usable amount.
    if let Some(cost) = product.delivery_cost.as_deref().filter(|c| !is_blank(c)) {
        let field = FieldKey::DeliveryCost;
        if let Err(e) = validate_amount(cost, field, options.currency_decimals) {
            errors.push_error(field.key(), &e);
        }
    }

    errors
}

/// Variants switched on but the list is empty.
pub fn validate_variants_presence(product: &ProductDraft, variants: &[VariantEntry]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if product.has_variants && variants.is_empty() {
        errors.push(FieldKey::Variants.key(), VARIANTS_REQUIRED_MESSAGE);
    }
    errors
}

/// A cover image is needed unless one was picked now or is already stored.
pub fn validate_cover_image(image: Option<&CoverImage>, product: &ProductDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let picked = image.is_some_and(CoverImage::is_present);

    if !picked && !product.has_cover_image() {
        let e = ValidationError::Required {
            field: FieldKey::CoverImage.label().to_string(),
        };
        errors.push_error(FieldKey::CoverImage.key(), &e);
    }
    errors
}

/// Runs every Stage A check and merges the results.
pub fn validate_stage_a(submission: &ProductSubmission, options: &ValidationOptions) -> FieldErrors {
    let product = &submission.product;

    let mut errors = validate_basics(product, options);
    errors.merge(validate_variants_presence(product, &submission.variants));
    errors.merge(validate_cover_image(submission.main_image.as_ref(), product));

    debug!(
        sku = %product.sku,
        field_count = errors.len(),
        "Stage A finished"
    );
    errors
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Mug".into(),
            sku: "M1".into(),
            slug: "mug".into(),
            net_price: "10".into(),
            cost_price: "5".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_messages() {
        assert_eq!(
            validate_required("", FieldKey::NetPrice).unwrap_err().to_string(),
            "Net price is required"
        );
        assert!(validate_product_name("Mug").is_ok());
        assert!(validate_slug(" ").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount("10.5", FieldKey::NetPrice, 2).unwrap().cents(), 1050);
        assert_eq!(
            validate_amount("ten", FieldKey::NetPrice, 2).unwrap_err().to_string(),
            "Net price must be a valid amount"
        );
        assert!(validate_amount("-1", FieldKey::CostPrice, 2).is_err());
        assert!(validate_amount("1.005", FieldKey::CostPrice, 2).is_err());
    }

    #[test]
    fn test_basics_collects_every_field() {
        let product = ProductDraft::default();
        let errors = validate_basics(&product, &ValidationOptions::default());

        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get("name").unwrap(), &["Name is required".to_string()]);
        assert_eq!(errors.get("sku").unwrap(), &["SKU is required".to_string()]);
        assert_eq!(errors.get("slug").unwrap(), &["Slug is required".to_string()]);
        assert_eq!(
            errors.get("net_price").unwrap(),
            &["Net price is required".to_string()]
        );
        assert_eq!(
            errors.get("cost_price").unwrap(),
            &["Cost price is required".to_string()]
        );
    }

    #[test]
    fn test_prices_optional_with_variants() {
        let product = ProductDraft {
            net_price: String::new(),
            cost_price: String::new(),
            has_variants: true,
            ..draft()
        };
        assert!(validate_basics(&product, &ValidationOptions::default()).is_empty());

        let product = ProductDraft {
            net_price: "abc".into(),
            ..product
        };
        let errors = validate_basics(&product, &ValidationOptions::default());
        assert!(errors.contains("net_price"));
        assert!(!errors.contains("cost_price"));
    }

    #[test]
    fn test_delivery_cost_checked_when_filled() {
        let options = ValidationOptions::default();
        assert!(validate_basics(&draft(), &options).is_empty());

        let product = ProductDraft {
            delivery_cost: Some("  ".into()),
            ..draft()
        };
        assert!(validate_basics(&product, &options).is_empty());

        for bad in ["fifteen", "-15"] {
            let product = ProductDraft {
                delivery_cost: Some(bad.into()),
                ..draft()
            };
            let errors = validate_basics(&product, &options);
            assert_eq!(
                errors.get("delivery_cost").unwrap(),
                &["Delivery cost must be a valid amount".to_string()]
            );
        }
    }

    #[test]
    fn test_variants_presence() {
        let mut product = draft();
        assert!(validate_variants_presence(&product, &[]).is_empty());

        product.has_variants = true;
        let errors = validate_variants_presence(&product, &[]);
        assert_eq!(
            errors.get("variants").unwrap(),
            &[VARIANTS_REQUIRED_MESSAGE.to_string()]
        );
        assert!(validate_variants_presence(&product, &[VariantEntry::default()]).is_empty());
    }

    #[test]
    fn test_cover_image_sources() {
        let mut product = draft();
        let errors = validate_cover_image(None, &product);
        assert_eq!(
            errors.get("cover_image").unwrap(),
            &["Cover image is required".to_string()]
        );

        let upload = CoverImage::Upload {
            file_name: "mug.png".into(),
        };
        assert!(validate_cover_image(Some(&upload), &product).is_empty());

        product.cover_image = Some(CoverImage::Url {
            url: "https://cdn/mug.png".into(),
        });
        assert!(validate_cover_image(None, &product).is_empty());
    }

    #[test]
    fn test_stage_a_merges_all_checks() {
        let submission = ProductSubmission {
            product: ProductDraft {
                sku: String::new(),
                has_variants: true,
                ..draft()
            },
            ..Default::default()
        };
        let errors = validate_stage_a(&submission, &ValidationOptions::default());
        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["cover_image", "sku", "variants"]);
    }
}
