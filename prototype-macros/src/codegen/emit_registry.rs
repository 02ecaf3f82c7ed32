use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;

use super::args::{GenerationKind, GenerationStyle, PrototypeArguments};
use super::emit_settings::storage_key;
use super::member::{MemberAttribute, MemberSpec};
use super::spec::TypeSpec;

fn optional_str(value: Option<&String>) -> TokenStream {
    match value {
        Some(v) => quote!(::core::option::Option::Some(#v)),
        None => quote!(::core::option::Option::None),
    }
}

fn field_info(spec: &TypeSpec, member: &MemberSpec) -> TokenStream {
    let name = member.name_str();
    let type_name = &member.ty.name;
    let kind = format_ident!("{}", member.kind().registry_variant());
    let optional = member.ty.is_optional;
    let visible = member.is(MemberAttribute::Visible);
    let modifiable = member.is(MemberAttribute::Modifiable);
    let secure = member.is(MemberAttribute::Secure);
    let starts_section = member.is(MemberAttribute::Section);
    let has_description = member.is(MemberAttribute::Description);
    let section = optional_str(member.section_title.as_ref());
    let description = optional_str(member.description_title.as_ref());
    let key = storage_key(spec, member);
    quote! {
        ::prototype::registry::FieldInfo {
            name: #name,
            type_name: #type_name,
            kind: ::prototype::registry::TypeKind::#kind,
            optional: #optional,
            visible: #visible,
            modifiable: #modifiable,
            secure: #secure,
            starts_section: #starts_section,
            section: #section,
            has_description: #has_description,
            description: #description,
            storage_key: #key,
        }
    }
}

/// `inventory` entry describing the annotated type and what was generated for it.
pub fn emit_registration(spec: &TypeSpec, args: &PrototypeArguments) -> TokenStream {
    let type_name = spec.name.unraw().to_string();
    let kinds = args.kinds.iter().map(|kind| {
        let variant = format_ident!(
            "{}",
            match kind {
                GenerationKind::Form => "Form",
                GenerationKind::Settings => "Settings",
                GenerationKind::View => "View",
            }
        );
        quote!(::prototype::registry::Kind::#variant)
    });
    let style = match args.style {
        GenerationStyle::Inline => quote!(::prototype::registry::Style::Inline),
        GenerationStyle::Labeled => quote!(::prototype::registry::Style::Labeled),
    };
    let fields = spec.members.iter().map(|m| field_info(spec, m));
    quote! {
        #[doc(hidden)]
        const _: () = {
            ::prototype::__private::inventory::submit! {
                ::prototype::registry::Registration {
                    type_name: #type_name,
                    kinds: &[#(#kinds),*],
                    style: #style,
                    fields: &[#(#fields),*],
                }
            }
        };
    }
}
