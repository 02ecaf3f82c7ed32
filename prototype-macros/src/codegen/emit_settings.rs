use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::Ident;

use super::args::GenerationKind;
use super::emit::{composite_guard, control, error_path, labeled, leaf_guard, read_only_flag};
use super::layout::{companion_path, Block, Entry, Layout, Rendering};
use super::member::{MemberAttribute, MemberSpec};
use super::spec::TypeSpec;

/// Persisted key of a member, `<Type>.<field>`.
pub fn storage_key(spec: &TypeSpec, member: &MemberSpec) -> String {
    format!("{}.{}", spec.name.unraw(), member.name_str())
}

fn binding_ident(member: &MemberSpec) -> Ident {
    format_ident!("{}_binding", member.name.unraw())
}

pub fn emit_settings(spec: &TypeSpec, layout: &Layout<'_>) -> TokenStream {
    let vis = &spec.vis;
    let name = &spec.name;
    let ident = &layout.ident;
    let generics = &spec.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let members: Vec<&MemberSpec> = layout.entries().map(|e| e.member).collect();
    let fields = members.iter().map(|m| {
        let field = &m.name;
        let ty = &m.ty.ty;
        quote!(#field: ::prototype::settings::Storage<#ty>)
    });
    let inits = members.iter().map(|m| {
        let field = &m.name;
        let key = storage_key(spec, m);
        let default = match (&m.initializer, m.ty.is_optional) {
            (Some(initial), _) => quote!(#initial),
            (None, true) => quote!(::core::option::Option::None),
            (None, false) => m.kind().default_value(),
        };
        quote! {
            #field: ::prototype::settings::Storage::new(::std::sync::Arc::clone(&store), #key, #default)
        }
    });
    let adapters = members.iter().filter(|m| m.ty.is_optional).map(|m| {
        let field = &m.name;
        let inner = &m.ty.inner;
        let adapter = binding_ident(m);
        let zero = m.kind().default_value();
        let doc = format!("`{}` with absent values read as the zero value.", m.name_str());
        let binding = if m.is(MemberAttribute::Modifiable) {
            quote! {
                ::prototype::binding::Binding::new(
                    move || storage.get().unwrap_or_else(|| #zero),
                    move |value| storage.set(::core::option::Option::Some(value)),
                )
            }
        } else {
            quote!(::prototype::binding::Binding::read_only(move || storage.get().unwrap_or_else(|| #zero)))
        };
        quote! {
            #[doc = #doc]
            pub fn #adapter(&self) -> ::prototype::binding::Binding<'_, #inner> {
                let storage = &self.#field;
                #binding
            }
        }
    });

    let blocks = layout.blocks.iter().map(settings_block);
    let arms = layout.entries().map(update_arm);
    let unknown = error_path();
    let doc = format!("Settings screen persisting the members of [`{name}`].");

    quote! {
        #[doc = #doc]
        #vis struct #ident #generics #where_clause {
            #(#fields,)*
            footer: ::core::option::Option<::prototype::ui::Node>,
            number_format: ::prototype::format::NumberFormat,
            _model: ::core::marker::PhantomData<fn() -> #name #ty_generics>,
        }

        impl #impl_generics #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            pub fn new(store: ::prototype::settings::SharedStore) -> Self {
                Self {
                    #(#inits,)*
                    footer: ::core::option::Option::None,
                    number_format: ::prototype::format::NumberFormat::default(),
                    _model: ::core::marker::PhantomData,
                }
            }

            pub fn with_footer(mut self, footer: ::prototype::ui::Node) -> Self {
                self.footer = ::core::option::Option::Some(footer);
                self
            }

            pub fn with_number_format(mut self, number_format: ::prototype::format::NumberFormat) -> Self {
                self.number_format = number_format;
                self
            }

            #(#adapters)*

            #[allow(unused_variables)]
            pub fn body(&self) -> ::prototype::ui::Node {
                let number_format = &self.number_format;
                let mut children: ::std::vec::Vec<::prototype::ui::Node> = ::std::vec![#(#blocks),*];
                if let ::core::option::Option::Some(footer) = &self.footer {
                    children.push(footer.clone());
                }
                ::prototype::ui::Node::Form { children }
            }

            /// Persists `value` under the member addressed by `path`.
            #[allow(unused_variables)]
            pub fn update(
                &self,
                path: &::prototype::ui::FieldPath,
                value: ::prototype::value::Value,
            ) -> ::prototype::Result {
                let path = path.segments();
                let ::core::option::Option::Some((head, rest)) = path.split_first() else {
                    return ::core::result::Result::Err(::prototype::PrototypeError::NotALeaf(
                        ::prototype::ui::FieldPath::root(),
                    ));
                };
                match head.as_str() {
                    #(#arms)*
                    _ => ::core::result::Result::Err(::prototype::PrototypeError::UnknownField(#unknown)),
                }
            }
        }
    }
}

fn settings_block(block: &Block<'_>) -> TokenStream {
    match block {
        Block::Entry(entry) => settings_entry(entry),
        Block::Section { header, entries } => {
            let header = match header {
                Some(h) => quote!(::core::option::Option::Some(#h)),
                None => quote!(::core::option::Option::None),
            };
            let children = entries.iter().map(settings_entry);
            quote!(::prototype::ui::Node::section(#header, ::std::vec![#(#children),*]))
        }
    }
}

/// Optional members read through their adapter, so `value` is never an `Option` here.
fn settings_entry(entry: &Entry<'_>) -> TokenStream {
    let member = entry.member;
    let field = &member.name;
    let source = if member.ty.is_optional {
        let adapter = binding_ident(member);
        quote!(self.#adapter().get())
    } else {
        quote!(self.#field.get())
    };
    let read_only = read_only_flag(entry, quote!(false));
    let node = if entry.rendering == Rendering::Composite {
        let companion = companion_path(member, GenerationKind::Form);
        let segment = member.name_str();
        labeled(
            entry,
            quote! {
                ::prototype::ui::Node::Form {
                    children: #companion::render(value, #read_only, number_format),
                }
                .scoped(#segment)
            },
        )
    } else {
        control(entry, false, read_only)
    };
    quote! {{
        let value = &#source;
        #node
    }}
}

fn update_arm(entry: &Entry<'_>) -> TokenStream {
    let member = entry.member;
    let field = &member.name;
    let segment = member.name_str();
    let path = error_path();
    if !entry.modifiable() {
        return quote! {
            #segment => ::core::result::Result::Err(::prototype::PrototypeError::ReadOnly(#path)),
        };
    }
    if entry.rendering != Rendering::Composite {
        let guard = leaf_guard();
        // Option<T> 的 FieldValue 接受 Null，可清空已保存的值
        return quote! {
            #segment => {
                #guard
                self.#field.set(::prototype::value::FieldValue::from_value(value)?)
            }
        };
    }
    let companion = companion_path(member, GenerationKind::Form);
    let guard = composite_guard();
    let (current, store) = if member.ty.is_optional {
        let adapter = binding_ident(member);
        (
            quote!(self.#adapter().get()),
            quote!(self.#field.set(::core::option::Option::Some(current))),
        )
    } else {
        (quote!(self.#field.get()), quote!(self.#field.set(current)))
    };
    quote! {
        #segment => {
            #guard
            let mut current = #current;
            #companion::apply(&mut current, rest, value).map_err(|error| error.scoped(#segment))?;
            #store
        }
    }
}
