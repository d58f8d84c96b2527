//! # Domain Types
//!
//! The draft entities the product editor builds on every submit attempt.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────────────┐                 │
//! │  │  ProductDraft   │ 1    * │     VariantEntry        │                 │
//! │  │  ─────────────  │───────►│  ─────────────────────  │                 │
//! │  │  name/sku/slug  │        │  variations (attr ids)  │                 │
//! │  │  net/cost price │◄ ─ ─ ─ │  variant_prices         │ falls back to   │
//! │  │  delivery_type  │◄ ─ ─ ─ │  delivery_type/cost     │ product values  │
//! │  │  cover_image    │        │  variant_specs          │                 │
//! │  └─────────────────┘        └─────────────────────────┘                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │   PriceEntry    │   │   SpecEntry     │   │  RequiredSpec   │        │
//! │  │  net_price ≥    │   │  name, value    │   │  weight height  │        │
//! │  │  cost (Money)   │   │  (trimmed)      │   │  width length   │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entities carry data plus small predicates. They are rebuilt from form
//! state on each submit and never mutated by the engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Identifier of a selected attribute value (e.g. "Red" of "Color").
pub type AttributeValueId = u32;

/// Returns true when the string is empty after trimming.
#[inline]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns true when an optional string is present and not blank.
#[inline]
pub fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !is_blank(v))
}

// =============================================================================
// Delivery
// =============================================================================

/// Who delivers the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    /// Delivered by the selling company; no delivery cost may be set.
    Company,
    /// Delivered by Meem Home; a delivery cost is required.
    Meemhome,
}

/// A variant's delivery setting: its own type, or the product's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum VariantDelivery {
    #[default]
    Inherit,
    Company,
    Meemhome,
}

impl VariantDelivery {
    /// The variant's own delivery type, `None` when it inherits.
    pub fn override_type(&self) -> Option<DeliveryType> {
        match self {
            VariantDelivery::Inherit => None,
            VariantDelivery::Company => Some(DeliveryType::Company),
            VariantDelivery::Meemhome => Some(DeliveryType::Meemhome),
        }
    }
}

// =============================================================================
// Images
// =============================================================================

/// A cover or variant image: a fresh upload or an already-hosted URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CoverImage {
    Upload {
        #[serde(rename = "fileName")]
        file_name: String,
    },
    Url { url: String },
}

impl CoverImage {
    /// An upload without a file name or a blank URL counts as no image.
    pub fn is_present(&self) -> bool {
        match self {
            CoverImage::Upload { file_name } => !is_blank(file_name),
            CoverImage::Url { url } => !is_blank(url),
        }
    }
}

// =============================================================================
// Product Draft
// =============================================================================

/// The product being created or edited.
///
/// Prices stay strings here because they are exactly what the user typed;
/// they are parsed into [`Money`] by the checks that compare them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub slug: String,
    /// Product-level selling price; fallback for variants without pricing.
    pub net_price: String,
    /// Product-level cost price; fallback for variants without pricing.
    pub cost_price: String,
    pub has_variants: bool,
    pub delivery_type: Option<DeliveryType>,
    pub delivery_cost: Option<String>,
    /// Image already stored on the product (edit flow).
    pub cover_image: Option<CoverImage>,
}

impl ProductDraft {
    /// Both product-level prices are filled in.
    pub fn has_prices(&self) -> bool {
        !is_blank(&self.net_price) && !is_blank(&self.cost_price)
    }

    /// The product has a non-blank delivery cost.
    pub fn has_delivery_cost(&self) -> bool {
        is_filled(self.delivery_cost.as_deref())
    }

    /// The product already has a stored cover image.
    pub fn has_cover_image(&self) -> bool {
        self.cover_image.as_ref().is_some_and(CoverImage::is_present)
    }
}

// =============================================================================
// Price Entry
// =============================================================================

/// Price for one pricing context (e.g. one country).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub net_price: Money,
    pub cost: Money,
}

impl PriceEntry {
    /// Selling price does not undercut cost.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.net_price >= self.cost
    }
}

// =============================================================================
// Specifications
// =============================================================================

/// A free-form specification row, e.g. `{ name: "weight", value: "1kg" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpecEntry {
    pub name: String,
    pub value: String,
}

impl SpecEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        SpecEntry {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Both name and value are non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        !is_blank(&self.name) && !is_blank(&self.value)
    }

    /// Trimmed name equals the required name, ignoring ASCII case.
    pub fn matches(&self, required: RequiredSpec) -> bool {
        self.name.trim().eq_ignore_ascii_case(required.as_str())
    }
}

/// Physical specifications every purchasable unit must declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RequiredSpec {
    Weight,
    Height,
    Width,
    Length,
}

impl RequiredSpec {
    /// All required specifications, in the order messages list them.
    pub const ALL: [RequiredSpec; 4] = [
        RequiredSpec::Weight,
        RequiredSpec::Height,
        RequiredSpec::Width,
        RequiredSpec::Length,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredSpec::Weight => "weight",
            RequiredSpec::Height => "height",
            RequiredSpec::Width => "width",
            RequiredSpec::Length => "length",
        }
    }

    /// Required specifications with no valid entry in `specs`, canonical order.
    pub fn missing_from(specs: &[SpecEntry]) -> Vec<RequiredSpec> {
        RequiredSpec::ALL
            .into_iter()
            .filter(|required| !specs.iter().any(|s| s.is_valid() && s.matches(*required)))
            .collect()
    }
}

// =============================================================================
// Variant Entry
// =============================================================================

/// Variant-level price override.
///
/// Both fields blank means "use the product's prices".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantPrices {
    pub net_price: String,
    pub cost: String,
}

impl VariantPrices {
    /// Both price fields are filled in.
    pub fn has_own_pricing(&self) -> bool {
        !is_blank(&self.net_price) && !is_blank(&self.cost)
    }

    /// Neither price field is filled in.
    pub fn lacks_pricing(&self) -> bool {
        is_blank(&self.net_price) && is_blank(&self.cost)
    }
}

/// One purchasable combination of attribute values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantEntry {
    /// Server id for stored variants, client id for new rows.
    pub id: String,
    /// Selected attribute values, one per attribute.
    pub variations: Vec<AttributeValueId>,
    pub stock: i32,
    pub variant_prices: VariantPrices,
    pub variant_specs: Vec<SpecEntry>,
    pub delivery_type: VariantDelivery,
    pub delivery_cost: Option<String>,
    pub shelf_id: Option<u32>,
    pub image: Option<CoverImage>,
}

impl VariantEntry {
    /// The variant sets a non-blank delivery cost of its own.
    pub fn has_own_delivery_cost(&self) -> bool {
        is_filled(self.delivery_cost.as_deref())
    }

    /// The variant's own specs cover every required specification.
    pub fn covers_required_specs(&self) -> bool {
        RequiredSpec::missing_from(&self.variant_specs).is_empty()
    }
}

// =============================================================================
// Submission
// =============================================================================

/// Everything the product editor hands to the engine on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSubmission {
    pub product: ProductDraft,
    /// Image chosen in this editing session, if any.
    pub main_image: Option<CoverImage>,
    pub variants: Vec<VariantEntry>,
    /// Product-level specifications.
    pub specs: Vec<SpecEntry>,
    pub prices: Vec<PriceEntry>,
}

impl ProductSubmission {
    /// Variants that take part in validation.
    ///
    /// A product with "Has variants" switched off ignores any rows left over
    /// in the form.
    pub fn active_variants(&self) -> &[VariantEntry] {
        if self.product.has_variants {
            &self.variants
        } else {
            &[]
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
