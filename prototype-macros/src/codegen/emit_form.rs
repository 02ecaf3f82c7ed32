use proc_macro2::TokenStream;
use quote::quote;

use super::args::GenerationKind;
use super::emit::{
    composite_guard, control, error_path, labeled, leaf_guard, read_only_flag, with_model_lifetime,
};
use super::layout::{companion_path, Block, Entry, Layout, Rendering};
use super::spec::{Capability, TypeSpec};

pub fn emit_form(spec: &TypeSpec, layout: &Layout<'_>) -> TokenStream {
    let vis = &spec.vis;
    let name = &spec.name;
    let ident = &layout.ident;
    let (_, model_generics, _) = spec.generics.split_for_impl();
    let model = quote!(#name #model_generics);

    let generics = match spec.capability {
        Capability::PlainValue => with_model_lifetime(&spec.generics),
        Capability::ObservableReference => spec.generics.clone(),
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // 值类型借用 &mut T；可观察引用类型共享 Observed<T>
    let (holder, rendered, applied) = match spec.capability {
        Capability::PlainValue => (
            quote!(&'model mut #model),
            quote!(Self::render(&*self.model, false, &self.number_format)),
            quote!(Self::apply(&mut *self.model, path.segments(), value)),
        ),
        Capability::ObservableReference => (
            quote!(::prototype::observe::Observed<#model>),
            quote! {{
                let model = self.model.read();
                Self::render(&model, false, &self.number_format)
            }},
            quote!(self.model.update(|model| Self::apply(model, path.segments(), value))),
        ),
    };

    let blocks = layout.blocks.iter().map(form_block);
    let arms = layout.entries().map(apply_arm);
    let unknown = error_path();
    let doc = format!("Editable form over [`{name}`].");

    quote! {
        #[doc = #doc]
        #vis struct #ident #generics #where_clause {
            model: #holder,
            footer: ::core::option::Option<::prototype::ui::Node>,
            number_format: ::prototype::format::NumberFormat,
        }

        impl #impl_generics #ident #ty_generics #where_clause {
            pub fn new(model: #holder) -> Self {
                Self {
                    model,
                    footer: ::core::option::Option::None,
                    number_format: ::prototype::format::NumberFormat::default(),
                }
            }

            /// Node appended after the generated members.
            pub fn with_footer(mut self, footer: ::prototype::ui::Node) -> Self {
                self.footer = ::core::option::Option::Some(footer);
                self
            }

            pub fn with_number_format(mut self, number_format: ::prototype::format::NumberFormat) -> Self {
                self.number_format = number_format;
                self
            }

            pub fn body(&self) -> ::prototype::ui::Node {
                let mut children = #rendered;
                if let ::core::option::Option::Some(footer) = &self.footer {
                    children.push(footer.clone());
                }
                ::prototype::ui::Node::Form { children }
            }

            /// Writes `value` into the member addressed by `path`.
            pub fn update(
                &mut self,
                path: &::prototype::ui::FieldPath,
                value: ::prototype::value::Value,
            ) -> ::prototype::Result {
                #applied
            }

            #[doc(hidden)]
            #[allow(unused_variables)]
            pub fn render(
                model: &#model,
                read_only: bool,
                number_format: &::prototype::format::NumberFormat,
            ) -> ::std::vec::Vec<::prototype::ui::Node> {
                ::std::vec![#(#blocks),*]
            }

            #[doc(hidden)]
            #[allow(unused_variables)]
            pub fn apply(
                model: &mut #model,
                path: &[::std::string::String],
                value: ::prototype::value::Value,
            ) -> ::prototype::Result {
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

fn form_block(block: &Block<'_>) -> TokenStream {
    match block {
        Block::Entry(entry) => form_entry(entry),
        Block::Section { header, entries } => {
            let header = match header {
                Some(h) => quote!(::core::option::Option::Some(#h)),
                None => quote!(::core::option::Option::None),
            };
            let children = entries.iter().map(form_entry);
            quote!(::prototype::ui::Node::section(#header, ::std::vec![#(#children),*]))
        }
    }
}

fn form_entry(entry: &Entry<'_>) -> TokenStream {
    let field = &entry.member.name;
    let optional = entry.member.ty.is_optional;
    let read_only = read_only_flag(entry, quote!(read_only));
    let node = if entry.rendering == Rendering::Composite {
        let companion = companion_path(entry.member, GenerationKind::Form);
        let segment = entry.member.name_str();
        let nested = quote! {
            ::prototype::ui::Node::Form {
                children: #companion::render(value, #read_only, number_format),
            }
            .scoped(#segment)
        };
        let nested = if optional {
            quote! {
                match value {
                    ::core::option::Option::Some(value) => #nested,
                    ::core::option::Option::None => ::prototype::ui::Node::Empty,
                }
            }
        } else {
            nested
        };
        labeled(entry, nested)
    } else {
        control(entry, optional, read_only)
    };
    quote! {{
        let value = &model.#field;
        #node
    }}
}

fn apply_arm(entry: &Entry<'_>) -> TokenStream {
    let field = &entry.member.name;
    let segment = entry.member.name_str();
    let path = error_path();
    if !entry.modifiable() {
        return quote! {
            #segment => ::core::result::Result::Err(::prototype::PrototypeError::ReadOnly(#path)),
        };
    }
    if entry.rendering != Rendering::Composite {
        let guard = leaf_guard();
        return quote! {
            #segment => {
                #guard
                model.#field = ::prototype::value::FieldValue::from_value(value)?;
                ::core::result::Result::Ok(())
            }
        };
    }
    let companion = companion_path(entry.member, GenerationKind::Form);
    let guard = composite_guard();
    let nested = quote! {
        #companion::apply(nested, rest, value).map_err(|error| error.scoped(#segment))
    };
    if entry.member.ty.is_optional {
        quote! {
            #segment => {
                #guard
                match model.#field.as_mut() {
                    ::core::option::Option::Some(nested) => #nested,
                    ::core::option::Option::None => ::core::result::Result::Err(
                        ::prototype::PrototypeError::UnknownField(#path),
                    ),
                }
            }
        }
    } else {
        quote! {
            #segment => {
                #guard
                let nested = &mut model.#field;
                #nested
            }
        }
    }
}
