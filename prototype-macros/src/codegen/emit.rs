//! Emission entry and the token pieces shared by the form, settings and view emitters.
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{GenericParam, Generics, Lifetime, LifetimeParam};

use super::args::{GenerationKind, PrototypeArguments};
use super::emit_form::emit_form;
use super::emit_registry::emit_registration;
use super::emit_settings::emit_settings;
use super::emit_view::emit_view;
use super::layout::{Entry, Layout, Rendering};
use super::member::MemberAttribute;
use super::spec::TypeSpec;

/// Every requested kind in the order form, settings, view, then the registration.
pub fn emit(spec: &TypeSpec, args: &PrototypeArguments) -> TokenStream {
    let items = args.kinds.iter().map(|kind| {
        let layout = Layout::plan(spec, kind, args.style);
        match kind {
            GenerationKind::Form => emit_form(spec, &layout),
            GenerationKind::Settings => emit_settings(spec, &layout),
            GenerationKind::View => emit_view(spec, &layout),
        }
    });
    let registration = emit_registration(spec, args);
    quote! {
        #(#items)*
        #registration
    }
}

/// Struct generics with a leading `'model` lifetime for borrowed models.
pub fn with_model_lifetime(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    let lifetime = Lifetime::new("'model", proc_macro2::Span::call_site());
    generics
        .params
        .insert(0, GenericParam::Lifetime(LifetimeParam::new(lifetime)));
    generics
}

pub fn labeled(entry: &Entry<'_>, node: TokenStream) -> TokenStream {
    match &entry.label {
        Some(label) => quote!(::prototype::ui::Node::labeled(#label, #node)),
        None => node,
    }
}

/// Which number formatter a numeric field falls back to.
pub enum NumberSource {
    /// The `number_format` local of the generated body.
    Local,
    /// `NumberFormat::default()`
    Default,
}

/// Display text of `value` (a `&FieldTy` binding), `None` when the plain
/// value description is enough.
///
/// A custom formatter only applies to text, date and numeric leaves; booleans
/// always show their plain description.
pub fn formatted_text(entry: &Entry<'_>, optional: bool, numbers: NumberSource) -> Option<TokenStream> {
    let formatter = match (&entry.member.format, entry.rendering) {
        (
            Some(custom),
            Rendering::TextField | Rendering::DatePicker | Rendering::NumberField,
        ) => quote!(&(#custom)),
        (_, Rendering::DatePicker) => quote!(&::prototype::format::DateFormat::default()),
        (_, Rendering::NumberField) => match numbers {
            NumberSource::Local => quote!(number_format),
            NumberSource::Default => quote!(&::prototype::format::NumberFormat::default()),
        },
        _ => return None,
    };
    Some(if optional {
        quote! {
            value
                .as_ref()
                .map(|value| ::prototype::format::Format::format(#formatter, value))
                .unwrap_or_default()
        }
    } else {
        quote!(::prototype::format::Format::format(#formatter, value))
    })
}

/// Editable control for a leaf entry; `read_only` is a `bool` expression.
pub fn control(entry: &Entry<'_>, optional: bool, read_only: TokenStream) -> TokenStream {
    let key = &entry.key;
    let path = entry.member.name_str();
    let widget = format_ident!("{}", entry.rendering.widget().unwrap_or("TextField"));
    // 密文字段始终显示掩码
    let text = (entry.rendering != Rendering::SecureField)
        .then(|| formatted_text(entry, optional, NumberSource::Local))
        .flatten()
        .map(|text| quote!(.with_text(#text)));
    labeled(
        entry,
        quote! {
            ::prototype::ui::Node::Control(
                ::prototype::ui::Control::new(
                    #key,
                    #path,
                    ::prototype::ui::Widget::#widget,
                    ::prototype::value::FieldValue::to_value(value),
                )
                #text
                .read_only(#read_only)
            )
        },
    )
}

/// `read_only` for modifiable members, `true` otherwise.
pub fn read_only_flag(entry: &Entry<'_>, inherited: TokenStream) -> TokenStream {
    if entry.member.is(MemberAttribute::Modifiable) {
        inherited
    } else {
        quote!(true)
    }
}

/// `path` as an owned field path, for error values.
pub fn error_path() -> TokenStream {
    quote!(::prototype::ui::FieldPath::from_segments(path))
}

pub fn leaf_guard() -> TokenStream {
    let path = error_path();
    quote! {
        if !rest.is_empty() {
            return ::core::result::Result::Err(::prototype::PrototypeError::UnknownField(#path));
        }
    }
}

pub fn composite_guard() -> TokenStream {
    let path = error_path();
    quote! {
        if rest.is_empty() {
            return ::core::result::Result::Err(::prototype::PrototypeError::NotALeaf(#path));
        }
    }
}
