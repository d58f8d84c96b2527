//! # Error Types
//!
//! Domain-specific error types for meem-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meem-core errors (this file)                                           │
//! │  ├── ValidationError  - One field, one message (inline)                 │
//! │  ├── FieldErrors      - Stage A aggregate: field key → messages         │
//! │  ├── BlockingError    - Stage B first failure (toast)                   │
//! │  └── CoreError        - Either of the two channels, for `?` callers     │
//! │                                                                         │
//! │  meem-console errors (separate crate)                                   │
//! │  └── ApiError         - What the console frontend sees (serialized)     │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors ─┐                                 │
//! │                                       ├→ CoreError → ApiError           │
//! │        BlockingError ─────────────────┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` text of an error IS the user-facing message
//! 3. Indices in messages are 1-based, the way the form numbers rows
//! 4. Errors are enum variants, never free-form strings

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::RequiredSpec;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for a single field.
///
/// `field` holds the human label ("SKU", "Net price"), not the key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. a price that is not a decimal amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Amount could not be parsed at the configured currency scale.
    #[error("{field} must be a valid amount")]
    InvalidAmount { field: String },
}

// =============================================================================
// Field Errors (Stage A aggregate)
// =============================================================================

/// Inline field errors keyed by field name.
///
/// Every key maps to a non-empty, ordered list of messages. The map is
/// ordered by key, so two runs over the same draft serialize identically.
///
/// ```json
/// { "cover_image": ["Cover image is required"], "sku": ["SKU is required"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        FieldErrors(BTreeMap::new())
    }

    /// Appends a message under `key`.
    pub fn push(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    /// Appends the display text of a [`ValidationError`] under `key`.
    pub fn push_error(&mut self, key: impl Into<String>, error: &ValidationError) {
        self.push(key, error.to_string());
    }

    /// Merges another set into this one, keeping message order per key.
    pub fn merge(&mut self, other: FieldErrors) {
        for (key, messages) in other.0 {
            self.0.entry(key).or_default().extend(messages);
        }
    }

    /// Returns true when no field has an error.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one error.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Returns true when `key` has at least one message.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Field keys in map order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Picks the field the console should scroll to.
    ///
    /// `dom_order` lists field keys in the order their inputs are rendered.
    /// The first listed key that has an error wins; if none of the listed
    /// keys has one, the first key in map order is returned.
    pub fn first_in(&self, dom_order: &[&str]) -> Option<&str> {
        dom_order
            .iter()
            .find_map(|key| self.0.get_key_value(*key))
            .map(|(key, _)| key.as_str())
            .or_else(|| self.keys().next())
    }

    /// Consumes the set, returning the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl From<BTreeMap<String, Vec<String>>> for FieldErrors {
    /// Builds a set from a raw map, dropping keys with no messages.
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        FieldErrors(map.into_iter().filter(|(_, v)| !v.is_empty()).collect())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", key, messages.join(", "))?;
        }
        Ok(())
    }
}

// =============================================================================
// Blocking Error (Stage B)
// =============================================================================

/// A single cross-entity failure that halts submission.
///
/// Rendered as a toast, never inline. All `index` fields are 1-based.
///
/// ## Where Each Variant Comes From
/// ```text
/// check 1 delivery_method   → DeliveryMethodRequired
/// check 2 variant_details   → NoVariants, MissingAttributeValues,
///                             StockNotPositive, MissingFallbackPrices
/// check 3 specifications    → MissingSpecifications,
///                             MissingFallbackSpecifications
/// check 4 pricing           → NegativePriceEntry, PriceEntryBelowCost,
///                             InvalidVariantPrice, NegativeVariantPrice,
///                             VariantPriceBelowCost
/// check 5 variant_delivery  → CompanyDeliveryCostSet,
///                             MeemhomeDeliveryCostMissing,
///                             InvalidVariantDeliveryCost
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockingError {
    #[error("Delivery method is required")]
    DeliveryMethodRequired,

    #[error("At least one variant is required when \"Has variants\" is enabled")]
    NoVariants,

    #[error("Variant {index} must have at least one attribute value selected")]
    MissingAttributeValues { index: usize },

    #[error("Variant {index} must have stock quantity greater than 0")]
    StockNotPositive { index: usize },

    #[error(
        "Product prices are required as fallback for variants {} that don't have pricing",
        join_indices(.indices)
    )]
    MissingFallbackPrices { indices: Vec<usize> },

    #[error("Missing required specifications: {}", join_specs(.missing))]
    MissingSpecifications { missing: Vec<RequiredSpec> },

    #[error(
        "Product specifications must include {} as fallback for variants {}",
        join_specs(.missing),
        join_indices(.variants)
    )]
    MissingFallbackSpecifications {
        missing: Vec<RequiredSpec>,
        variants: Vec<usize>,
    },

    #[error("Price entry {index}: prices cannot be negative")]
    NegativePriceEntry { index: usize },

    #[error("Price entry {index}: net price must be greater than or equal to cost")]
    PriceEntryBelowCost { index: usize },

    #[error("Variant {index}: net price must be greater than or equal to cost")]
    VariantPriceBelowCost { index: usize },

    #[error("Variant {index} has an invalid price")]
    InvalidVariantPrice { index: usize },

    #[error("Variant {index}: prices cannot be negative")]
    NegativeVariantPrice { index: usize },

    #[error("Variant {index}: delivery cost cannot be set for company delivery type")]
    CompanyDeliveryCostSet { index: usize },

    #[error("Variant {index}: delivery cost is required for meemhome delivery type")]
    MeemhomeDeliveryCostMissing { index: usize },

    #[error("Variant {index} has an invalid delivery cost")]
    InvalidVariantDeliveryCost { index: usize },
}

impl BlockingError {
    /// Stable machine-readable code, used in logs and by the console.
    pub fn code(&self) -> &'static str {
        match self {
            BlockingError::DeliveryMethodRequired => "delivery_method_required",
            BlockingError::NoVariants => "no_variants",
            BlockingError::MissingAttributeValues { .. } => "missing_attribute_values",
            BlockingError::StockNotPositive { .. } => "stock_not_positive",
            BlockingError::MissingFallbackPrices { .. } => "missing_fallback_prices",
            BlockingError::MissingSpecifications { .. } => "missing_specifications",
            BlockingError::MissingFallbackSpecifications { .. } => {
                "missing_fallback_specifications"
            }
            BlockingError::NegativePriceEntry { .. } => "negative_price_entry",
            BlockingError::PriceEntryBelowCost { .. } => "price_entry_below_cost",
            BlockingError::VariantPriceBelowCost { .. } => "variant_price_below_cost",
            BlockingError::InvalidVariantPrice { .. } => "invalid_variant_price",
            BlockingError::NegativeVariantPrice { .. } => "negative_variant_price",
            BlockingError::CompanyDeliveryCostSet { .. } => "company_delivery_cost_set",
            BlockingError::MeemhomeDeliveryCostMissing { .. } => {
                "meemhome_delivery_cost_missing"
            }
            BlockingError::InvalidVariantDeliveryCost { .. } => "invalid_variant_delivery_cost",
        }
    }
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_specs(specs: &[RequiredSpec]) -> String {
    specs
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of one Stage B check.
pub type CheckResult = Result<(), BlockingError>;

/// Wire shape of a Stage B check result.
///
/// ```json
/// { "isValid": false, "message": "Delivery method is required" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckReport {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&CheckResult> for CheckReport {
    fn from(result: &CheckResult) -> Self {
        match result {
            Ok(()) => CheckReport {
                is_valid: true,
                message: None,
            },
            Err(e) => CheckReport {
                is_valid: false,
                message: Some(e.to_string()),
            },
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Top-level engine error.
///
/// Produced by [`crate::pipeline::ValidationOutcome::into_result`] so callers
/// can use `?` while still telling the two reporting channels apart.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// Stage A rejected the draft; render inline.
    #[error("Invalid fields: {0}")]
    Fields(FieldErrors),

    /// Stage B rejected the draft; render as a toast.
    #[error("{0}")]
    Blocked(#[from] BlockingError),

    /// A single field failed outside the pipeline (e.g. amount parsing).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
