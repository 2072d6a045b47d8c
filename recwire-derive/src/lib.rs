//! # Recwire Derive Macros
//!
//! This crate provides `#[derive(Record)]`, which generates the full
//! `recwire::Record` capability set (serialize, deserialize, compare,
//! equals, hash, signature) plus a `Display` impl for a plain struct with
//! named fields. It plays the role of a schema compiler: the struct
//! declaration is the schema, and field order is the wire order.
//!
//! Field classification is by type:
//!
//! | Rust type                | Wire type | Signature code |
//! |--------------------------|-----------|----------------|
//! | `bool`                   | bool      | `z`            |
//! | `i32`                    | int       | `i`            |
//! | `i64`                    | long      | `l`            |
//! | `f32`                    | float     | `f`            |
//! | `f64`                    | double    | `d`            |
//! | `String`                 | string    | `s`            |
//! | `Vec<u8>` / `Option<Vec<u8>>` | buffer | `B`          |
//! | `Vec<T>`                 | vector    | `[T]`          |
//! | `BTreeMap<K, V>`         | map       | `{KV}`         |
//! | anything else            | nested record | its own signature |
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, PathArguments, Type};

/// Derives `recwire::Record` and `Display` for a struct with named fields.
#[proc_macro_derive(Record)]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    if !input.generics.params.is_empty() {
        return syn::Error::new(name.span(), "Record does not support generic structs")
            .to_compile_error()
            .into();
    }

    let data_struct = match input.data {
        Data::Struct(ds) => ds,
        _ => {
            return syn::Error::new(name.span(), "Record only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let named = match data_struct.fields {
        Fields::Named(named) => named.named,
        _ => {
            return syn::Error::new(name.span(), "Record requires named fields")
                .to_compile_error()
                .into();
        }
    };

    let mut fields = Vec::new();
    for field in named {
        let ident = match field.ident {
            Some(ident) => ident,
            None => {
                return syn::Error::new(name.span(), "Record requires named fields")
                    .to_compile_error()
                    .into();
            }
        };
        let spec = match classify(&field.ty) {
            Ok(spec) => spec,
            Err(e) => return e.to_compile_error().into(),
        };
        fields.push(RecordField { ident, spec });
    }

    let impl_serialize = generate_serialize(&fields);
    let impl_deserialize = generate_deserialize(&fields);
    let impl_compare = generate_compare(&name, &fields);
    let impl_equals = generate_equals(&fields);
    let impl_hash = generate_hash(&fields);
    let impl_signature = generate_signature(&name, &fields);

    let expanded = quote! {
        impl recwire::Record for #name {
            #impl_serialize
            #impl_deserialize
            #impl_compare
            #impl_equals
            #impl_hash

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #impl_signature
        }

        impl ::core::fmt::Display for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let text = recwire::Recwire::debug_string(self);
                f.write_str(text.trim_end_matches('\n'))
            }
        }
    };

    TokenStream::from(expanded)
}

// --- Internal Data Structures ---

struct RecordField {
    ident: syn::Ident,
    spec: FieldSpec,
}

struct FieldSpec {
    kind: FieldKind,
    ty: Type,
}

enum FieldKind {
    Bool,
    Int,
    Long,
    Float,
    Double,
    Str,
    /// `optional` distinguishes `Option<Vec<u8>>` from plain `Vec<u8>`.
    Buffer { optional: bool },
    Vector(Box<FieldSpec>),
    Map(Box<FieldSpec>, Box<FieldSpec>),
    Nested,
}

// --- Classification ---

/// Maps a Rust field type to its wire type.
fn classify(ty: &Type) -> syn::Result<FieldSpec> {
    let path = match ty {
        Type::Path(tp) if tp.qself.is_none() => &tp.path,
        _ => {
            return Err(syn::Error::new_spanned(
                ty,
                "Record fields must be plain path types",
            ));
        }
    };
    let segment = path
        .segments
        .last()
        .ok_or_else(|| syn::Error::new_spanned(ty, "empty type path"))?;

    let kind = match segment.ident.to_string().as_str() {
        "bool" => FieldKind::Bool,
        "i32" => FieldKind::Int,
        "i64" => FieldKind::Long,
        "f32" => FieldKind::Float,
        "f64" => FieldKind::Double,
        "String" => FieldKind::Str,
        "Vec" => {
            let elem = generic_args(segment, 1)?.remove(0);
            if is_u8(&elem) {
                FieldKind::Buffer { optional: false }
            } else {
                FieldKind::Vector(Box::new(classify(&elem)?))
            }
        }
        "Option" => {
            let inner = generic_args(segment, 1)?.remove(0);
            if is_vec_u8(&inner) {
                FieldKind::Buffer { optional: true }
            } else {
                return Err(syn::Error::new_spanned(
                    ty,
                    "Option is only supported around Vec<u8> buffer fields",
                ));
            }
        }
        "BTreeMap" => {
            let mut args = generic_args(segment, 2)?;
            let value = args.remove(1);
            let key = args.remove(0);
            FieldKind::Map(Box::new(classify(&key)?), Box::new(classify(&value)?))
        }
        _ => FieldKind::Nested,
    };

    Ok(FieldSpec {
        kind,
        ty: ty.clone(),
    })
}

fn generic_args(segment: &syn::PathSegment, expected: usize) -> syn::Result<Vec<Type>> {
    let args = match &segment.arguments {
        PathArguments::AngleBracketed(ab) => &ab.args,
        _ => {
            return Err(syn::Error::new_spanned(
                segment,
                "expected angle-bracketed type arguments",
            ));
        }
    };
    let types: Vec<Type> = args
        .iter()
        .filter_map(|a| match a {
            GenericArgument::Type(t) => Some(t.clone()),
            _ => None,
        })
        .collect();
    if types.len() != expected {
        return Err(syn::Error::new_spanned(
            segment,
            format!("expected {expected} type argument(s)"),
        ));
    }
    Ok(types)
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(tp) if tp.qself.is_none() && tp.path.is_ident("u8"))
}

fn is_vec_u8(ty: &Type) -> bool {
    if let Type::Path(tp) = ty {
        if let Some(seg) = tp.path.segments.last() {
            if seg.ident == "Vec" {
                if let Ok(args) = generic_args(seg, 1) {
                    return is_u8(&args[0]);
                }
            }
        }
    }
    false
}

// --- Generator: serialize ---

fn generate_serialize(fields: &[RecordField]) -> proc_macro2::TokenStream {
    let writes = fields.iter().map(|f| {
        let ident = &f.ident;
        let tag = ident.to_string();
        gen_write(&f.spec, quote! { (&self.#ident) }, &tag, 0)
    });

    quote! {
        fn serialize(
            &self,
            archive: &mut dyn recwire::OutputArchive,
            tag: &str,
        ) -> recwire::Result<()> {
            archive.start_record(tag)?;
            #(#writes)*
            archive.end_record(tag)?;
            Ok(())
        }
    }
}

/// Emits the write statements for one value. `val` evaluates to a shared
/// reference of the field type.
fn gen_write(
    spec: &FieldSpec,
    val: proc_macro2::TokenStream,
    tag: &str,
    depth: usize,
) -> proc_macro2::TokenStream {
    match &spec.kind {
        FieldKind::Bool => quote! { archive.write_bool(*#val, #tag)?; },
        FieldKind::Int => quote! { archive.write_int(*#val, #tag)?; },
        FieldKind::Long => quote! { archive.write_long(*#val, #tag)?; },
        FieldKind::Float => quote! { archive.write_float(*#val, #tag)?; },
        FieldKind::Double => quote! { archive.write_double(*#val, #tag)?; },
        FieldKind::Str => quote! { archive.write_string(#val, #tag)?; },
        FieldKind::Buffer { optional: true } => {
            quote! { archive.write_buffer(#val.as_deref(), #tag)?; }
        }
        FieldKind::Buffer { optional: false } => {
            quote! { archive.write_buffer(::core::option::Option::Some(#val.as_slice()), #tag)?; }
        }
        FieldKind::Nested => quote! { archive.write_record(#val, #tag)?; },
        FieldKind::Vector(elem) => {
            let item = format_ident!("__item{}", depth);
            let inner = gen_write(elem, quote! { #item }, tag, depth + 1);
            quote! {
                archive.start_vector(#val.len(), #tag)?;
                for #item in #val.iter() {
                    #inner
                }
                archive.end_vector(#tag)?;
            }
        }
        FieldKind::Map(key, value) => {
            let k = format_ident!("__key{}", depth);
            let v = format_ident!("__val{}", depth);
            let k_write = gen_write(key, quote! { #k }, tag, depth + 1);
            let v_write = gen_write(value, quote! { #v }, tag, depth + 1);
            quote! {
                archive.start_map(#val.len(), #tag)?;
                for (#k, #v) in #val.iter() {
                    #k_write
                    #v_write
                }
                archive.end_map(#tag)?;
            }
        }
    }
}

// --- Generator: deserialize ---

fn generate_deserialize(fields: &[RecordField]) -> proc_macro2::TokenStream {
    let reads = fields.iter().map(|f| {
        let ident = &f.ident;
        let tag = ident.to_string();
        let expr = gen_read(&f.spec, &tag, 0);
        quote! { self.#ident = #expr; }
    });

    quote! {
        fn deserialize(
            &mut self,
            archive: &mut dyn recwire::InputArchive,
            tag: &str,
        ) -> recwire::Result<()> {
            archive.start_record(tag)?;
            #(#reads)*
            archive.end_record(tag)?;
            Ok(())
        }
    }
}

/// Emits an expression producing one decoded value of the field type.
fn gen_read(spec: &FieldSpec, tag: &str, depth: usize) -> proc_macro2::TokenStream {
    match &spec.kind {
        FieldKind::Bool => quote! { archive.read_bool(#tag)? },
        FieldKind::Int => quote! { archive.read_int(#tag)? },
        FieldKind::Long => quote! { archive.read_long(#tag)? },
        FieldKind::Float => quote! { archive.read_float(#tag)? },
        FieldKind::Double => quote! { archive.read_double(#tag)? },
        FieldKind::Str => quote! { archive.read_string(#tag)? },
        // The wire has no null marker, so a nullable buffer always decodes
        // as present (possibly empty).
        FieldKind::Buffer { optional: true } => {
            quote! { ::core::option::Option::Some(archive.read_buffer(#tag)?) }
        }
        FieldKind::Buffer { optional: false } => quote! { archive.read_buffer(#tag)? },
        FieldKind::Nested => {
            let ty = &spec.ty;
            let nested = format_ident!("__nested{}", depth);
            quote! {
                {
                    let mut #nested: #ty = ::core::default::Default::default();
                    archive.read_record(&mut #nested, #tag)?;
                    #nested
                }
            }
        }
        FieldKind::Vector(elem) => {
            let len = format_ident!("__len{}", depth);
            let out = format_ident!("__vec{}", depth);
            let elem_expr = gen_read(elem, tag, depth + 1);
            quote! {
                {
                    let #len = archive.start_vector(#tag)?;
                    let mut #out = ::std::vec::Vec::with_capacity(#len.min(1024));
                    for _ in 0..#len {
                        #out.push(#elem_expr);
                    }
                    archive.end_vector(#tag)?;
                    #out
                }
            }
        }
        FieldKind::Map(key, value) => {
            let len = format_ident!("__len{}", depth);
            let out = format_ident!("__map{}", depth);
            let k = format_ident!("__key{}", depth);
            let v = format_ident!("__val{}", depth);
            let k_expr = gen_read(key, tag, depth + 1);
            let v_expr = gen_read(value, tag, depth + 1);
            quote! {
                {
                    let #len = archive.start_map(#tag)?;
                    let mut #out = ::std::collections::BTreeMap::new();
                    for _ in 0..#len {
                        let #k = #k_expr;
                        let #v = #v_expr;
                        #out.insert(#k, #v);
                    }
                    archive.end_map(#tag)?;
                    #out
                }
            }
        }
    }
}

// --- Generator: compare_record ---

fn generate_compare(name: &syn::Ident, fields: &[RecordField]) -> proc_macro2::TokenStream {
    let name_str = name.to_string();
    let steps = fields.iter().map(|f| {
        let ident = &f.ident;
        let expr = gen_cmp(&f.spec, quote! { (&self.#ident) }, quote! { (&peer.#ident) }, 0);
        quote! {
            let __ord = #expr;
            if __ord != ::core::cmp::Ordering::Equal {
                return Ok(__ord);
            }
        }
    });

    quote! {
        fn compare_record(
            &self,
            peer: &dyn recwire::Record,
        ) -> recwire::Result<::core::cmp::Ordering> {
            let Some(peer) = peer.as_any().downcast_ref::<Self>() else {
                return Err(recwire::RecwireError::TypeMismatch(format!(
                    "comparing different types of records: expected {}",
                    #name_str
                )));
            };
            #(#steps)*
            Ok(::core::cmp::Ordering::Equal)
        }
    }
}

/// Emits an `Ordering` expression over two references of the field type.
/// May use `?` for nested record comparison.
fn gen_cmp(
    spec: &FieldSpec,
    a: proc_macro2::TokenStream,
    b: proc_macro2::TokenStream,
    depth: usize,
) -> proc_macro2::TokenStream {
    match &spec.kind {
        FieldKind::Bool | FieldKind::Int | FieldKind::Long | FieldKind::Str => {
            quote! { #a.cmp(#b) }
        }
        // Floats order by total_cmp so the order stays total even with NaN.
        FieldKind::Float | FieldKind::Double => quote! { #a.total_cmp(#b) },
        FieldKind::Buffer { optional: true } => {
            quote! { recwire::codec::buffer_cmp(#a.as_deref(), #b.as_deref()) }
        }
        FieldKind::Buffer { optional: false } => {
            quote! { recwire::codec::compare_bytes(#a.as_slice(), #b.as_slice()) }
        }
        FieldKind::Nested => quote! { recwire::Record::compare_record(#a, #b)? },
        FieldKind::Vector(elem) => {
            let (ia, ib) = (format_ident!("__ia{}", depth), format_ident!("__ib{}", depth));
            let (xa, xb) = (format_ident!("__xa{}", depth), format_ident!("__xb{}", depth));
            let ord = format_ident!("__vord{}", depth);
            let step = format_ident!("__vstep{}", depth);
            let elem_cmp = gen_cmp(elem, quote! { #xa }, quote! { #xb }, depth + 1);
            quote! {
                {
                    let mut #ord = ::core::cmp::Ordering::Equal;
                    let mut #ia = #a.iter();
                    let mut #ib = #b.iter();
                    loop {
                        match (#ia.next(), #ib.next()) {
                            (Some(#xa), Some(#xb)) => {
                                let #step = #elem_cmp;
                                if #step != ::core::cmp::Ordering::Equal {
                                    #ord = #step;
                                    break;
                                }
                            }
                            (Some(_), None) => {
                                #ord = ::core::cmp::Ordering::Greater;
                                break;
                            }
                            (None, Some(_)) => {
                                #ord = ::core::cmp::Ordering::Less;
                                break;
                            }
                            (None, None) => break,
                        }
                    }
                    #ord
                }
            }
        }
        FieldKind::Map(key, value) => {
            let (ia, ib) = (format_ident!("__ia{}", depth), format_ident!("__ib{}", depth));
            let (ka, va) = (format_ident!("__ka{}", depth), format_ident!("__va{}", depth));
            let (kb, vb) = (format_ident!("__kb{}", depth), format_ident!("__vb{}", depth));
            let ord = format_ident!("__mord{}", depth);
            let step = format_ident!("__mstep{}", depth);
            let k_cmp = gen_cmp(key, quote! { #ka }, quote! { #kb }, depth + 1);
            let v_cmp = gen_cmp(value, quote! { #va }, quote! { #vb }, depth + 1);
            quote! {
                {
                    let mut #ord = ::core::cmp::Ordering::Equal;
                    let mut #ia = #a.iter();
                    let mut #ib = #b.iter();
                    loop {
                        match (#ia.next(), #ib.next()) {
                            (Some((#ka, #va)), Some((#kb, #vb))) => {
                                let #step = #k_cmp;
                                if #step != ::core::cmp::Ordering::Equal {
                                    #ord = #step;
                                    break;
                                }
                                let #step = #v_cmp;
                                if #step != ::core::cmp::Ordering::Equal {
                                    #ord = #step;
                                    break;
                                }
                            }
                            (Some(_), None) => {
                                #ord = ::core::cmp::Ordering::Greater;
                                break;
                            }
                            (None, Some(_)) => {
                                #ord = ::core::cmp::Ordering::Less;
                                break;
                            }
                            (None, None) => break,
                        }
                    }
                    #ord
                }
            }
        }
    }
}

// --- Generator: record_equals ---

fn generate_equals(fields: &[RecordField]) -> proc_macro2::TokenStream {
    let steps = fields.iter().map(|f| {
        let ident = &f.ident;
        let expr = gen_eq(&f.spec, quote! { (&self.#ident) }, quote! { (&peer.#ident) }, 0);
        quote! {
            if !(#expr) {
                return false;
            }
        }
    });

    quote! {
        fn record_equals(&self, peer: &dyn recwire::Record) -> bool {
            let Some(peer) = peer.as_any().downcast_ref::<Self>() else {
                return false;
            };
            #(#steps)*
            true
        }
    }
}

/// Emits a `bool` expression over two references of the field type. Never
/// uses `?`, so it is safe inside closures.
fn gen_eq(
    spec: &FieldSpec,
    a: proc_macro2::TokenStream,
    b: proc_macro2::TokenStream,
    depth: usize,
) -> proc_macro2::TokenStream {
    match &spec.kind {
        FieldKind::Bool
        | FieldKind::Int
        | FieldKind::Long
        | FieldKind::Float
        | FieldKind::Double
        | FieldKind::Str => quote! { #a == #b },
        FieldKind::Buffer { optional: true } => {
            quote! { recwire::codec::buffer_eq(#a.as_deref(), #b.as_deref()) }
        }
        FieldKind::Buffer { optional: false } => {
            quote! {
                recwire::codec::buffer_eq(
                    ::core::option::Option::Some(#a.as_slice()),
                    ::core::option::Option::Some(#b.as_slice()),
                )
            }
        }
        FieldKind::Nested => quote! { recwire::Record::record_equals(#a, #b) },
        FieldKind::Vector(elem) => {
            let (xa, xb) = (format_ident!("__xa{}", depth), format_ident!("__xb{}", depth));
            let elem_eq = gen_eq(elem, quote! { #xa }, quote! { #xb }, depth + 1);
            quote! {
                (#a.len() == #b.len()
                    && #a.iter().zip(#b.iter()).all(|(#xa, #xb)| #elem_eq))
            }
        }
        FieldKind::Map(key, value) => {
            let (ka, va) = (format_ident!("__ka{}", depth), format_ident!("__va{}", depth));
            let (kb, vb) = (format_ident!("__kb{}", depth), format_ident!("__vb{}", depth));
            let k_eq = gen_eq(key, quote! { #ka }, quote! { #kb }, depth + 1);
            let v_eq = gen_eq(value, quote! { #va }, quote! { #vb }, depth + 1);
            quote! {
                (#a.len() == #b.len()
                    && #a.iter()
                        .zip(#b.iter())
                        .all(|((#ka, #va), (#kb, #vb))| #k_eq && #v_eq))
            }
        }
    }
}

// --- Generator: record_hash ---

fn generate_hash(fields: &[RecordField]) -> proc_macro2::TokenStream {
    let folds = fields.iter().map(|f| {
        let ident = &f.ident;
        let expr = gen_hash(&f.spec, quote! { (&self.#ident) }, 0);
        quote! {
            __result = recwire::codec::hash_combine(__result, #expr);
        }
    });

    quote! {
        fn record_hash(&self) -> i32 {
            let mut __result: i32 = recwire::codec::HASH_SEED;
            #(#folds)*
            __result
        }
    }
}

/// Emits an `i32` hash expression over a reference of the field type.
fn gen_hash(
    spec: &FieldSpec,
    val: proc_macro2::TokenStream,
    depth: usize,
) -> proc_macro2::TokenStream {
    match &spec.kind {
        FieldKind::Bool => quote! { recwire::codec::hash_bool(*#val) },
        FieldKind::Int => quote! { recwire::codec::hash_int(*#val) },
        FieldKind::Long => quote! { recwire::codec::hash_long(*#val) },
        FieldKind::Float => quote! { recwire::codec::hash_float(*#val) },
        FieldKind::Double => quote! { recwire::codec::hash_double(*#val) },
        FieldKind::Str => quote! { recwire::codec::hash_string(#val) },
        FieldKind::Buffer { optional: true } => {
            quote! { recwire::codec::hash_buffer(#val.as_deref()) }
        }
        FieldKind::Buffer { optional: false } => {
            quote! { recwire::codec::hash_buffer(::core::option::Option::Some(#val.as_slice())) }
        }
        FieldKind::Nested => quote! { recwire::Record::record_hash(#val) },
        FieldKind::Vector(elem) => {
            let h = format_ident!("__h{}", depth);
            let x = format_ident!("__x{}", depth);
            let elem_hash = gen_hash(elem, quote! { #x }, depth + 1);
            quote! {
                {
                    let mut #h: i32 = recwire::codec::HASH_SEED;
                    for #x in #val.iter() {
                        #h = recwire::codec::hash_combine(#h, #elem_hash);
                    }
                    #h
                }
            }
        }
        FieldKind::Map(key, value) => {
            let h = format_ident!("__h{}", depth);
            let (k, v) = (format_ident!("__k{}", depth), format_ident!("__v{}", depth));
            let k_hash = gen_hash(key, quote! { #k }, depth + 1);
            let v_hash = gen_hash(value, quote! { #v }, depth + 1);
            quote! {
                {
                    let mut #h: i32 = recwire::codec::HASH_SEED;
                    for (#k, #v) in #val.iter() {
                        #h = recwire::codec::hash_combine(#h, #k_hash);
                        #h = recwire::codec::hash_combine(#h, #v_hash);
                    }
                    #h
                }
            }
        }
    }
}

// --- Generator: signature ---

fn generate_signature(name: &syn::Ident, fields: &[RecordField]) -> proc_macro2::TokenStream {
    let name_str = name.to_string();
    let mut stmts = Vec::new();
    for field in fields {
        gen_sig(&field.spec, &mut stmts);
    }

    quote! {
        fn signature() -> ::std::string::String {
            let mut __sig = ::std::string::String::from(concat!("L", #name_str, "("));
            #(#stmts)*
            __sig.push(')');
            __sig
        }
    }
}

fn gen_sig(spec: &FieldSpec, stmts: &mut Vec<proc_macro2::TokenStream>) {
    match &spec.kind {
        FieldKind::Bool => stmts.push(quote! { __sig.push('z'); }),
        FieldKind::Int => stmts.push(quote! { __sig.push('i'); }),
        FieldKind::Long => stmts.push(quote! { __sig.push('l'); }),
        FieldKind::Float => stmts.push(quote! { __sig.push('f'); }),
        FieldKind::Double => stmts.push(quote! { __sig.push('d'); }),
        FieldKind::Str => stmts.push(quote! { __sig.push('s'); }),
        FieldKind::Buffer { .. } => stmts.push(quote! { __sig.push('B'); }),
        FieldKind::Nested => {
            let ty = &spec.ty;
            stmts.push(quote! {
                __sig.push_str(&<#ty as recwire::Record>::signature());
            });
        }
        FieldKind::Vector(elem) => {
            stmts.push(quote! { __sig.push('['); });
            gen_sig(elem, stmts);
            stmts.push(quote! { __sig.push(']'); });
        }
        FieldKind::Map(key, value) => {
            stmts.push(quote! { __sig.push('{'); });
            gen_sig(key, stmts);
            gen_sig(value, stmts);
            stmts.push(quote! { __sig.push('}'); });
        }
    }
}
