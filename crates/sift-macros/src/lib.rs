//! Proc macros for Sift.
//!
//! # Derive Macros
//!
//! - [`Record`] - Generate named attribute access for plain structs
//!
//! These macros are re-exported by `sift` behind its `derive` feature;
//! depend on `sift` rather than on this crate directly.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for plain structs.
///
/// Every named field is exposed as an attribute under its own name. Field
/// types must implement `sift::AttributeValue`, which covers strings,
/// numbers, booleans, `Timestamp`, `Literal` and `Option`s of those.
///
/// # Field Attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `#[record(skip)]` | Leave the field out |
/// | `#[record(rename = "name")]` | Expose the field under another attribute name |
///
/// # Generated Code
///
/// 1. One `pub const` per exposed field holding its attribute name, in
///    SCREAMING_SNAKE_CASE (`published_at` becomes `PUBLISHED_AT`)
/// 2. Implementation of `Record::attribute()`; unknown names read as
///    `Value::Null`
///
/// # Example
///
/// ```ignore
/// use sift::{Filter, Query, Record};
///
/// #[derive(Record)]
/// struct Book {
///     title: String,
///     #[record(rename = "published")]
///     year: u16,
///     series: Option<String>,
///     #[record(skip)]
///     cover: Vec<u8>,
/// }
///
/// let books: Vec<Book> = load_books();
/// let query = Query::new(&books)
///     .filter_with(|ops| Filter::new().with(Book::PUBLISHED, ops.gte(1970)))?
///     .order(Book::TITLE)?;
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
