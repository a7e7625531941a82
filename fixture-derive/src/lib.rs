//! Derive macros for fixture.
//!
//! `#[derive(Reflect)]` writes the schema, value conversions and
//! construction path that the fixture engine needs for a type.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, Generics, Ident, LitStr,
    Path, Type,
};

/// Derive macro implementing `fixture::Reflect`.
///
/// Supported on structs (named, tuple and unit) and on enums whose
/// variants carry no data.
///
/// # Attributes
///
/// On the type:
/// - `#[fixture(constructor = "path::to::fn")]` builds default instances
///   with `fn() -> Self` instead of constructing every member.
/// - `#[fixture(no_constructor)]` marks the type as having no
///   parameterless construction path.
/// - `#[fixture(opaque)]` carries the type as-is; it is never synthesized.
///   Requires `Clone + Debug + Send + Sync`, and `Default` unless a
///   constructor is given.
///
/// On a member or variant:
/// - `#[fixture(readonly)]` (members only) leaves the member alone when
///   populating or copying.
/// - `#[fixture(rename = "name")]` uses another name when matching members
///   or variants.
///
/// # Example
///
/// ```rust,ignore
/// use fixture::Reflect;
///
/// #[derive(Reflect, Debug, Clone, PartialEq)]
/// struct User {
///     name: String,
///     age: u32,
///     #[fixture(readonly)]
///     id: u64,
/// }
///
/// let user: User = fixture::Fixture::new().populate().unwrap();
/// ```
#[proc_macro_derive(Reflect, attributes(fixture))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match reflect_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Options set on the type itself.
#[derive(Default)]
struct ContainerAttrs {
    constructor: Option<Path>,
    no_constructor: bool,
    opaque: bool,
}

/// Options set on a member or variant.
#[derive(Default)]
struct MemberAttrs {
    readonly: bool,
    rename: Option<String>,
}

fn container_attrs(attrs: &[Attribute]) -> Result<ContainerAttrs, syn::Error> {
    let mut parsed = ContainerAttrs::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("fixture")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("constructor") {
                let path: LitStr = meta.value()?.parse()?;
                parsed.constructor = Some(path.parse()?);
            } else if meta.path.is_ident("no_constructor") {
                parsed.no_constructor = true;
            } else if meta.path.is_ident("opaque") {
                parsed.opaque = true;
            } else {
                return Err(meta.error("unknown fixture attribute on a type"));
            }
            Ok(())
        })?;

        if parsed.constructor.is_some() && parsed.no_constructor {
            return Err(syn::Error::new_spanned(
                attr,
                "`constructor` and `no_constructor` cannot be combined",
            ));
        }
    }
    Ok(parsed)
}

fn member_attrs(attrs: &[Attribute]) -> Result<MemberAttrs, syn::Error> {
    let mut parsed = MemberAttrs::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("fixture")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("readonly") {
                parsed.readonly = true;
            } else if meta.path.is_ident("rename") {
                let name: LitStr = meta.value()?.parse()?;
                parsed.rename = Some(name.value());
            } else {
                return Err(meta.error("unknown fixture attribute on a member"));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

/// Generate the `Reflect` implementation.
fn reflect_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let generics = with_reflect_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let attrs = container_attrs(&input.attrs)?;

    let body = if attrs.opaque {
        opaque_impl(&attrs)
    } else {
        match &input.data {
            Data::Struct(data) => struct_impl(&data.fields, &attrs)?,
            Data::Enum(data) => enum_impl(data, &attrs)?,
            Data::Union(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Reflect derive macro does not support unions",
                ));
            }
        }
    };

    Ok(quote! {
        impl #impl_generics ::fixture::Reflect for #name #ty_generics #where_clause {
            #body
        }
    })
}

/// Every type parameter must itself be `Reflect`.
fn with_reflect_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::fixture::Reflect));
    }
    generics
}

/// Body of `construct` when the type overrides member-wise construction.
fn custom_construct(attrs: &ContainerAttrs) -> Option<TokenStream2> {
    if let Some(path) = &attrs.constructor {
        return Some(quote! { ::std::result::Result::Ok(#path()) });
    }
    if attrs.no_constructor {
        return Some(quote! {
            ::std::result::Result::Err(::fixture::ConstructionError::NoConstructor {
                type_name: ::std::any::type_name::<Self>(),
            })
        });
    }
    None
}

fn opaque_impl(attrs: &ContainerAttrs) -> TokenStream2 {
    let construct = custom_construct(attrs)
        .unwrap_or_else(|| quote! { ::std::result::Result::Ok(::std::default::Default::default()) });

    quote! {
        fn type_info() -> ::fixture::TypeInfo {
            ::fixture::TypeInfo::of::<Self>(::fixture::Shape::Opaque)
        }

        fn to_value(&self) -> ::fixture::Value {
            ::fixture::Value::Opaque(::fixture::Opaque::new(self))
        }

        fn from_value(value: ::fixture::Value) -> ::std::result::Result<Self, ::fixture::ReflectError> {
            let type_name = ::std::any::type_name::<Self>();
            match &value {
                ::fixture::Value::Opaque(opaque) => opaque
                    .downcast::<Self>()
                    .ok_or_else(|| ::fixture::ReflectError::unexpected(type_name, "opaque", &value)),
                other => ::std::result::Result::Err(::fixture::ReflectError::unexpected(type_name, "opaque", other)),
            }
        }

        fn construct() -> ::std::result::Result<Self, ::fixture::ConstructionError> {
            #construct
        }
    }
}

/// One struct member as seen by the generated code.
struct MemberData {
    /// `name` for named fields, `0`, `1`, ... for tuple fields.
    access: TokenStream2,
    /// Binding used when rebuilding the struct.
    var: Ident,
    /// Name the member is matched by.
    name: String,
    ty: Type,
    writable: bool,
}

fn collect_members(fields: &Fields) -> Result<Vec<MemberData>, syn::Error> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let attrs = member_attrs(&field.attrs)?;
            let (access, default_name) = match &field.ident {
                Some(ident) => (quote! { #ident }, ident.to_string()),
                None => {
                    let index = syn::Index::from(i);
                    (quote! { #index }, i.to_string())
                }
            };
            Ok(MemberData {
                access,
                var: format_ident!("member_{}", i),
                name: attrs.rename.unwrap_or(default_name),
                ty: field.ty.clone(),
                writable: !attrs.readonly,
            })
        })
        .collect()
}

/// Generate implementation for structs.
fn struct_impl(fields: &Fields, attrs: &ContainerAttrs) -> Result<TokenStream2, syn::Error> {
    let members = collect_members(fields)?;

    let member_infos = members.iter().map(|member| {
        let MemberData { name, ty, writable, .. } = member;
        quote! {
            ::fixture::MemberInfo {
                name: #name,
                ty: <#ty as ::fixture::Reflect>::type_info,
                writable: #writable,
            }
        }
    });

    let to_value_members = members.iter().map(|member| {
        let MemberData { access, name, .. } = member;
        quote! {
            .with(#name, ::fixture::Reflect::to_value(&self.#access))
        }
    });

    let take_bindings = members.iter().map(|member| {
        let MemberData { var, name, ty, .. } = member;
        quote! {
            let #var = object.take_as::<#ty>(#name)?;
        }
    });

    let construct_bindings = members.iter().map(|member| {
        let MemberData { var, name, ty, .. } = member;
        quote! {
            let #var = <#ty as ::fixture::Reflect>::construct().map_err(|source| {
                ::fixture::ConstructionError::Member {
                    type_name: ::std::any::type_name::<Self>(),
                    member: #name,
                    source: ::std::boxed::Box::new(source),
                }
            })?;
        }
    });

    let vars: Vec<&Ident> = members.iter().map(|member| &member.var).collect();
    let build = match fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|field| &field.ident);
            quote! { Self { #(#idents: #vars),* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#vars),*) },
        Fields::Unit => quote! { Self },
    };

    let from_value = if members.is_empty() {
        quote! {
            ::fixture::expect_object(value, ::std::any::type_name::<Self>())?;
            ::std::result::Result::Ok(#build)
        }
    } else {
        quote! {
            let mut object = ::fixture::expect_object(value, ::std::any::type_name::<Self>())?;
            #(#take_bindings)*
            ::std::result::Result::Ok(#build)
        }
    };

    let construct = custom_construct(attrs).unwrap_or_else(|| {
        quote! {
            #(#construct_bindings)*
            ::std::result::Result::Ok(#build)
        }
    });

    Ok(quote! {
        fn type_info() -> ::fixture::TypeInfo {
            ::fixture::TypeInfo::of::<Self>(::fixture::Shape::Struct(::fixture::StructInfo {
                members: ::std::vec![#(#member_infos),*],
                construct: ::fixture::construct_value::<Self>,
            }))
        }

        fn to_value(&self) -> ::fixture::Value {
            ::fixture::Value::Object(
                ::fixture::Object::new(::std::any::type_name::<Self>())
                    #(#to_value_members)*
            )
        }

        fn from_value(value: ::fixture::Value) -> ::std::result::Result<Self, ::fixture::ReflectError> {
            #from_value
        }

        fn construct() -> ::std::result::Result<Self, ::fixture::ConstructionError> {
            #construct
        }
    })
}

/// Generate implementation for enums.
fn enum_impl(data: &syn::DataEnum, attrs: &ContainerAttrs) -> Result<TokenStream2, syn::Error> {
    let variants = data
        .variants
        .iter()
        .map(|variant| {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Reflect can only be derived for enums whose variants carry no data",
                ));
            }
            let name = member_attrs(&variant.attrs)?
                .rename
                .unwrap_or_else(|| variant.ident.to_string());
            Ok((variant.ident.clone(), name))
        })
        .collect::<Result<Vec<_>, syn::Error>>()?;

    let idents: Vec<&Ident> = variants.iter().map(|(ident, _)| ident).collect();
    let names: Vec<&String> = variants.iter().map(|(_, name)| name).collect();

    let construct = custom_construct(attrs).unwrap_or_else(|| match idents.first() {
        Some(first) => quote! { ::std::result::Result::Ok(Self::#first) },
        None => quote! {
            ::std::result::Result::Err(::fixture::ConstructionError::Uninhabited {
                type_name: ::std::any::type_name::<Self>(),
            })
        },
    });

    Ok(quote! {
        fn type_info() -> ::fixture::TypeInfo {
            ::fixture::TypeInfo::of::<Self>(::fixture::Shape::Enum(&[#(#names),*]))
        }

        fn to_value(&self) -> ::fixture::Value {
            match *self {
                #(Self::#idents => ::fixture::Value::Enum(::std::string::String::from(#names)),)*
            }
        }

        fn from_value(value: ::fixture::Value) -> ::std::result::Result<Self, ::fixture::ReflectError> {
            let type_name = ::std::any::type_name::<Self>();
            match value {
                ::fixture::Value::Enum(variant) => match variant.as_str() {
                    #(#names => ::std::result::Result::Ok(Self::#idents),)*
                    _ => ::std::result::Result::Err(::fixture::ReflectError::UnknownVariant {
                        type_name,
                        variant,
                    }),
                },
                other => ::std::result::Result::Err(::fixture::ReflectError::unexpected(type_name, "enum", &other)),
            }
        }

        fn construct() -> ::std::result::Result<Self, ::fixture::ConstructionError> {
            #construct
        }
    })
}
