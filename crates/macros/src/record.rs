//! Record derive macro implementation.
//!
//! Expands every extension point of the container blueprints field by field,
//! producing the compile-time counterpart of a runtime specialization.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Type, parse_macro_input};

/// One stored field of the record.
struct FieldSpec<'a> {
	ident: &'a Ident,
	ty: &'a Type,
	/// Name of the field in the shape.
	name: String,
}

/// Entry point for the `#[derive(Record)]` macro.
pub fn derive_record(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	match expand(&input) {
		Ok(tokens) => tokens.into(),
		Err(e) => e.to_compile_error().into(),
	}
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
	let name = &input.ident;
	let vis = &input.vis;

	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(
			&input.generics,
			"Record cannot be derived for generic structs",
		));
	}

	let Data::Struct(data) = &input.data else {
		return Err(syn::Error::new_spanned(input, "Record can only be derived for structs"));
	};

	let fields = match &data.fields {
		Fields::Named(named) => named
			.named
			.iter()
			.map(|field| {
				let ident = field.ident.as_ref().ok_or_else(|| {
					syn::Error::new_spanned(field, "Record fields must be named")
				})?;
				let name = parse_rename(&field.attrs)?.unwrap_or_else(|| ident.unraw().to_string());
				Ok(FieldSpec {
					ident,
					ty: &field.ty,
					name,
				})
			})
			.collect::<syn::Result<Vec<_>>>()?,
		Fields::Unit => Vec::new(),
		Fields::Unnamed(unnamed) => {
			return Err(syn::Error::new_spanned(
				unnamed,
				"Record cannot be derived for tuple structs; name the fields",
			));
		}
	};

	for (i, field) in fields.iter().enumerate() {
		if let Some(prev) = fields[..i].iter().find(|f| f.name == field.name) {
			return Err(syn::Error::new_spanned(
				field.ident,
				format!("field name '{}' is already used by '{}'", field.name, prev.ident),
			));
		}
	}

	let columns = parse_columns(&input.attrs)?.unwrap_or_else(|| format_ident!("{}Columns", name));

	let idents: Vec<_> = fields.iter().map(|f| f.ident).collect();
	let types: Vec<_> = fields.iter().map(|f| f.ty).collect();
	let names: Vec<_> = fields.iter().map(|f| &f.name).collect();
	let indices: Vec<_> = (0..fields.len()).collect();

	let doc = format!("Struct-of-arrays storage for [`{name}`].");

	Ok(quote! {
		#[doc = #doc]
		#[derive(Clone, Debug)]
		#vis struct #columns {
			__capacity: usize,
			#(#idents: ::std::boxed::Box<[#types]>,)*
		}

		#[allow(unused_variables)]
		impl ::colonnade::Columnar for #columns {
			type Item = #name;

			#[inline]
			fn capacity(&self) -> usize {
				self.__capacity
			}

			fn pack(&self, index: usize) -> #name {
				#name {
					#(#idents: ::std::clone::Clone::clone(&self.#idents[index]),)*
				}
			}

			fn unpack(&mut self, index: usize, item: &#name) {
				#(self.#idents[index] = ::std::clone::Clone::clone(&item.#idents);)*
			}

			fn copy_element(&mut self, to: usize, from: usize) {
				#(self.#idents[to] = ::std::clone::Clone::clone(&self.#idents[from]);)*
			}

			fn clear_element(&mut self, index: usize) {
				#(
					if <#types as ::colonnade::Scalar>::FIELD_TYPE.is_reference() {
						self.#idents[index] = ::std::default::Default::default();
					}
				)*
			}

			fn grow_all(&mut self, capacity: usize) {
				#(::colonnade::__private::regrow(&mut self.#idents, capacity);)*
				self.__capacity = capacity;
			}

			fn equals_at(&self, index: usize, item: &#name) -> bool {
				true #(&& ::colonnade::Scalar::same(&self.#idents[index], &item.#idents))*
			}

			fn declare(&self, capacity: usize) -> Self {
				<Self as ::colonnade::StaticLayout>::with_capacity(capacity)
			}

			fn shift_left(&mut self, at: usize, len: usize) {
				if at < len {
					#(self.#idents[at..len].rotate_left(1);)*
				}
			}
		}

		impl ::colonnade::StaticLayout for #columns {
			fn with_capacity(capacity: usize) -> Self {
				Self {
					__capacity: capacity,
					#(#idents: ::colonnade::__private::declare_slots(capacity),)*
				}
			}
		}

		#[allow(unused_variables)]
		impl ::colonnade::Record for #name {
			type Columns = #columns;

			fn shape() -> &'static ::colonnade::Shape {
				static SHAPE: ::std::sync::OnceLock<::colonnade::Shape> = ::std::sync::OnceLock::new();
				SHAPE.get_or_init(|| {
					::colonnade::Shape::__from_derive(::std::vec![
						#(::colonnade::FieldDef::new(#names, <#types as ::colonnade::Scalar>::FIELD_TYPE),)*
					])
				})
			}

			fn to_aggregate(&self) -> ::colonnade::Aggregate {
				::colonnade::Aggregate::__assemble(
					::std::clone::Clone::clone(<Self as ::colonnade::Record>::shape()),
					::std::vec![#(::colonnade::Scalar::to_value(&self.#idents),)*].into_boxed_slice(),
				)
			}

			fn from_aggregate(
				aggregate: &::colonnade::Aggregate,
			) -> ::std::result::Result<Self, ::colonnade::ShapeError> {
				::colonnade::__private::__check_shape::<Self>(aggregate)?;
				::std::result::Result::Ok(Self {
					#(#idents: ::colonnade::__private::__extract(aggregate, #indices)?,)*
				})
			}
		}
	})
}

/// Parses `#[record(rename = "...")]` on a field.
fn parse_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
	let mut rename = None;
	for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("rename") {
				let value: LitStr = meta.value()?.parse()?;
				if value.value().is_empty() {
					return Err(meta.error("rename must not be empty"));
				}
				rename = Some(value.value());
				Ok(())
			} else {
				Err(meta.error("unknown field attribute; expected `rename`"))
			}
		})?;
	}
	Ok(rename)
}

/// Parses `#[record(columns = Name)]` on the struct.
fn parse_columns(attrs: &[Attribute]) -> syn::Result<Option<Ident>> {
	let mut columns = None;
	for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("columns") {
				columns = Some(meta.value()?.parse::<Ident>()?);
				Ok(())
			} else {
				Err(meta.error("unknown struct attribute; expected `columns`"))
			}
		})?;
	}
	Ok(columns)
}
