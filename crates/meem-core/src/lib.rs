//! # meem-core: Product Variant Validation Engine
//!
//! Decides whether a product draft (with zero or more variants) may be
//! submitted, and which values each variant inherits from its product.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Operations Console                                  │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Product editor (forms, modals)                     │   │
//! │  │   inline field errors ◄──┐        ┌──► toast                    │   │
//! │  └──────────────────────────┼────────┼─────────────────────────────┘   │
//! │                             │        │                                  │
//! │  ┌──────────────────────────┴────────┴─────────────────────────────┐   │
//! │  │                meem-console (submit_product)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meem-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │validation │ │ checks  │ │ resolve │ │pipeline│  │   │
//! │  │   │ drafts  │ │ Stage A   │ │ Stage B │ │inherit- │ │ A → B  │  │   │
//! │  │   │ money   │ │ inline    │ │ toast   │ │ ance    │ │ → done │  │   │
//! │  │   └─────────┘ └───────────┘ └─────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Draft entities (ProductDraft, VariantEntry, SpecEntry, ...)
//! - [`money`] - Integer money and decimal-string parsing
//! - [`error`] - FieldErrors, BlockingError, CoreError
//! - [`validation`] - Stage A structural field checks
//! - [`checks`] - Stage B blocking cross-entity checks
//! - [`resolve`] - Effective (inherited) variant values
//! - [`pipeline`] - Stage ordering and the reporter seam
//!
//! ## Example Usage
//!
//! ```rust
//! use meem_core::pipeline::ValidationPipeline;
//! use meem_core::types::{CoverImage, DeliveryType, ProductDraft, ProductSubmission, SpecEntry};
//!
//! let submission = ProductSubmission {
//!     product: ProductDraft {
//!         name: "Mug".into(),
//!         sku: "M1".into(),
//!         slug: "mug".into(),
//!         net_price: "10".into(),
//!         cost_price: "5".into(),
//!         delivery_type: Some(DeliveryType::Company),
//!         ..Default::default()
//!     },
//!     main_image: Some(CoverImage::Url { url: "https://cdn/mug.png".into() }),
//!     specs: vec![
//!         SpecEntry::new("weight", "1kg"),
//!         SpecEntry::new("height", "10cm"),
//!         SpecEntry::new("width", "5cm"),
//!         SpecEntry::new("length", "5cm"),
//!     ],
//!     ..Default::default()
//! };
//!
//! assert!(ValidationPipeline::default().validate(&submission).is_valid());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checks;
pub mod error;
pub mod money;
pub mod pipeline;
pub mod resolve;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{BlockingError, CheckReport, CoreError, CoreResult, FieldErrors, ValidationError};
pub use money::Money;
pub use pipeline::{Reporter, ValidationOutcome, ValidationPipeline};
pub use resolve::{EffectiveVariant, ValueSource};
pub use types::*;
pub use validation::{FieldKey, ValidationOptions};
