//! Procedural macros for colonnade.
//!
//! Provides `#[derive(Record)]`, which generates a struct-of-arrays layout for
//! a struct with a fixed field list.

use proc_macro::TokenStream;

/// Record derive macro implementation.
mod record;

/// Derives a columnar layout and the `Record` impl for a struct.
///
/// ```ignore
/// #[derive(Clone, Debug, PartialEq, Record)]
/// pub struct Person {
///     age: i32,
///     #[record(rename = "full_name")]
///     name: String,
/// }
/// ```
///
/// Generates:
/// * `PersonColumns`, holding one `Box<[T]>` per field
/// * `Columnar` and `StaticLayout` impls for `PersonColumns`
/// * `Record` impl for `Person`, with its shape built once and cached
///
/// # Attributes
///
/// - `#[record(columns = Name)]` on the struct - Optional: name of the layout type
/// - `#[record(rename = "name")]` on a field - Optional: field name in the shape
///
/// Every field type must implement `Scalar`. Tuple structs, enums, unions and
/// generic structs are rejected.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
	record::derive_record(input)
}
