//! # Commands Module
//!
//! Entry points invoked by the console frontend.
//!
//! ## Command Categories
//! - `product`: validate and submit the product editor

pub mod product;

pub use product::{
    parse_unprocessable, submit_product, ProductPayload, ProductService, SubmitResponse,
    VariantPayload,
};
