use proc_macro2::TokenStream;
use quote::quote;

use super::args::GenerationKind;
use super::emit::{formatted_text, labeled, with_model_lifetime, NumberSource};
use super::layout::{companion_path, Block, Entry, Layout, Rendering};
use super::spec::TypeSpec;

pub fn emit_view(spec: &TypeSpec, layout: &Layout<'_>) -> TokenStream {
    let vis = &spec.vis;
    let name = &spec.name;
    let ident = &layout.ident;
    let (_, model_generics, _) = spec.generics.split_for_impl();
    let model = quote!(#name #model_generics);
    let generics = with_model_lifetime(&spec.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let rendered = if layout.is_empty() {
        quote!(::prototype::ui::Node::Empty)
    } else {
        let blocks = layout.blocks.iter().map(view_block);
        quote! {
            ::prototype::ui::Node::Stack {
                children: ::std::vec![#(#blocks),*],
            }
        }
    };
    let doc = format!("Read-only presentation of [`{name}`].");

    quote! {
        #[doc = #doc]
        #vis struct #ident #generics #where_clause {
            model: &'model #model,
        }

        impl #impl_generics #ident #ty_generics #where_clause {
            pub fn new(model: &'model #model) -> Self {
                Self { model }
            }

            pub fn body(&self) -> ::prototype::ui::Node {
                Self::render(self.model)
            }

            #[doc(hidden)]
            #[allow(unused_variables)]
            pub fn render(model: &#model) -> ::prototype::ui::Node {
                #rendered
            }
        }
    }
}

fn view_block(block: &Block<'_>) -> TokenStream {
    match block {
        Block::Entry(entry) => view_entry(entry),
        Block::Section { header, entries } => {
            let header = match header {
                Some(h) => quote!(::core::option::Option::Some(#h)),
                None => quote!(::core::option::Option::None),
            };
            let children = entries.iter().map(view_entry);
            quote!(::prototype::ui::Node::group(#header, ::std::vec![#(#children),*]))
        }
    }
}

fn view_entry(entry: &Entry<'_>) -> TokenStream {
    let field = &entry.member.name;
    let segment = entry.member.name_str();
    let optional = entry.member.ty.is_optional;
    let node = match entry.rendering {
        Rendering::Composite => {
            let companion = companion_path(entry.member, GenerationKind::View);
            let nested = quote!(#companion::render(value).scoped(#segment));
            if optional {
                quote! {
                    match value {
                        ::core::option::Option::Some(value) => #nested,
                        ::core::option::Option::None => ::prototype::ui::Node::Empty,
                    }
                }
            } else {
                nested
            }
        }
        rendering => {
            let key = &entry.key;
            let text = if rendering == Rendering::SecureField {
                quote!(::prototype::ui::REDACTED)
            } else {
                formatted_text(entry, optional, NumberSource::Default).unwrap_or_else(|| {
                    quote!(::prototype::value::FieldValue::to_value(value).to_string())
                })
            };
            quote!(::prototype::ui::Node::text(#key, #segment, #text))
        }
    };
    let node = labeled(entry, node);
    quote! {{
        let value = &model.#field;
        #node
    }}
}
