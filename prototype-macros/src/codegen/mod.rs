mod args;
mod emit;
mod emit_form;
mod emit_registry;
mod emit_settings;
mod emit_view;
mod error;
mod flags;
mod kind;
mod layout;
mod member;
mod parse;
mod spec;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, Item};

use args::PrototypeArguments;
use error::{Attachment, MacroName, PrototypeMacrosError, Result};
use parse::attr_name;
use spec::{Record, TypeSpec};

/// `#[prototype(...)]`: the annotated struct followed by its generated companions.
pub fn entrypoint(args: TokenStream, input: TokenStream) -> TokenStream {
    let item: Item = match syn::parse2(input) {
        Ok(item) => item,
        Err(err) => return err.to_compile_error(),
    };
    match expand(args, &item) {
        Ok(tokens) => tokens,
        Err(err) => {
            // 出错时原样保留声明（去掉字段注解），只报告一条诊断
            let err = err.into_syn_error().to_compile_error();
            let item = strip_helpers(item);
            quote! {
                #item
                #err
            }
        }
    }
}

fn expand(args: TokenStream, item: &Item) -> Result<TokenStream> {
    let record = Record::from_item(item)?;
    let arguments = PrototypeArguments::parse(args)?;
    let spec = TypeSpec::parse(&record)?;
    let generated = emit::emit(&spec, &arguments);
    let item = strip_helpers(item.clone());
    Ok(quote! {
        #item
        #generated
    })
}

/// Removes the field annotations, which only mean something to `#[prototype]`.
fn strip_helpers(item: Item) -> Item {
    let Item::Struct(mut decl) = item else {
        return item;
    };
    let fields = match &mut decl.fields {
        Fields::Named(named) => named.named.iter_mut().collect::<Vec<_>>(),
        Fields::Unnamed(unnamed) => unnamed.unnamed.iter_mut().collect(),
        Fields::Unit => Vec::new(),
    };
    for field in fields {
        field
            .attrs
            .retain(|attr| MacroName::helper(&attr_name(attr)).is_none());
    }
    Item::Struct(decl)
}

/// A field annotation expanded on its own was attached to something other than a field.
pub fn misplaced(macro_name: &'static str, input: TokenStream) -> TokenStream {
    let name = MacroName::helper(macro_name).unwrap_or(MacroName::Field);
    let err = PrototypeMacrosError::Attachment {
        macro_name: name,
        attachment: Attachment::Field,
    }
    .into_syn_error()
    .to_compile_error();
    quote! {
        #input
        #err
    }
}

/// `#[derive(Observable)]`
pub fn derive_observable(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };
    if !matches!(input.data, syn::Data::Struct(_)) {
        return syn::Error::new_spanned(&input.ident, "Observable can only be derived for structs")
            .to_compile_error();
    }
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    quote! {
        impl #impl_generics ::prototype::observe::Observable for #name #ty_generics #where_clause {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pretty(tokens: TokenStream) -> String {
        let file: syn::File = syn::parse2(tokens).expect("generated code parses as a file");
        prettyplease::unparse(&file)
    }

    fn expand_ok(args: TokenStream, item: TokenStream) -> String {
        let item: Item = syn::parse2(item).unwrap();
        pretty(expand(args, &item).unwrap_or_else(|e| panic!("expansion failed: {e}")))
    }

    fn expand_err(args: TokenStream, item: TokenStream) -> String {
        let item: Item = syn::parse2(item).unwrap();
        match expand(args, &item) {
            Ok(_) => panic!("expansion unexpectedly succeeded"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn structural_rejection_comes_first() {
        let err = expand_err(quote!(), quote!(enum Mode { A }));
        assert_eq!(
            err,
            "Macro `prototype` can only be attached to `struct` declaration."
        );
    }

    #[test]
    fn duplicate_kinds_message() {
        let err = expand_err(
            quote!(kinds = view, form, form, view),
            quote!(struct Article { title: String }),
        );
        assert_eq!(
            err,
            "Duplicate argument `form, view` given for argument `kinds` of `prototype` macro"
        );
    }

    #[test]
    fn secure_on_integer_is_rejected() {
        let err = expand_err(
            quote!(kinds = form),
            quote!(struct Login { #[field(secure)] pin: i32 }),
        );
        assert_eq!(
            err,
            "Macro `field` can only be attached to field declaration of type `String`."
        );
    }

    #[test]
    fn kinds_emit_in_fixed_order() {
        let out = expand_ok(
            quote!(kinds = view, settings, form),
            quote!(struct Article { title: String }),
        );
        let form = out.find("struct ArticleForm").unwrap();
        let settings = out.find("struct ArticleSettingsView").unwrap();
        let view = out.find("struct ArticleView").unwrap();
        assert!(form < settings && settings < view);
    }

    #[test]
    fn helper_attributes_are_stripped() {
        let out = expand_ok(
            quote!(kinds = form),
            quote!(struct Article { #[section("Main")] #[field(readonly)] #[serde(default)] title: String }),
        );
        assert!(!out.contains("#[section"));
        assert!(!out.contains("#[field"));
        assert!(out.contains("#[serde(default)]"));
    }

    #[test]
    fn inline_form_keeps_source_order() {
        let out = expand_ok(
            quote!(kinds = form, style = inline),
            quote!(struct Article { title: String, views: u32, published: bool }),
        );
        let title = out.find("\"ArticleForm.title\"").unwrap();
        let views = out.find("\"ArticleForm.views\"").unwrap();
        let published = out.find("\"ArticleForm.published\"").unwrap();
        assert!(title < views && views < published);
        assert!(!out.contains(".label"));
        assert!(out.contains("Widget::NumberField"));
        assert!(out.contains("Widget::Toggle"));
    }

    #[test]
    fn labeled_style_wraps_members() {
        let out = expand_ok(quote!(kinds = form), quote!(struct Article { title: String }));
        assert!(out.contains("\"ArticleForm.title.label\""));
        assert!(out.contains("Node::labeled"));
    }

    #[test]
    fn hidden_members_produce_empty_view() {
        let out = expand_ok(
            quote!(kinds = view),
            quote!(pub struct Account { token: String, #[field(hidden)] pub id: u64 }),
        );
        assert!(out.contains("Node::Empty"));
        assert!(!out.contains("\"AccountView.token\""));
        assert!(!out.contains("\"AccountView.id\""));
    }

    #[test]
    fn secure_view_is_redacted() {
        let out = expand_ok(
            quote!(kinds = view),
            quote!(struct Login { user: String, #[field(secure)] password: String }),
        );
        assert!(out.contains("REDACTED"));
    }

    #[test]
    fn settings_optional_members_get_adapter() {
        let out = expand_ok(
            quote!(kinds = settings),
            quote!(struct General {
                #[initial(true)]
                enabled: bool,
                limit: Option<i64>,
                #[field(readonly)]
                nickname: Option<String>,
            }),
        );
        assert!(out.contains("\"General.enabled\""));
        assert!(out.contains("\"General.limit\""));
        assert!(out.contains("pub fn limit_binding(&self)"));
        assert!(out.contains("pub fn nickname_binding(&self)"));
        assert!(out.contains("Binding::read_only"));
        assert!(!out.contains("enabled_binding"));
    }

    #[test]
    fn observable_form_binds_through_observed() {
        let out = expand_ok(
            quote!(kinds = form),
            quote!(#[derive(Observable)] struct Session { user: String }),
        );
        assert!(out.contains("model: ::prototype::observe::Observed<Session>"));
        let plain = expand_ok(quote!(kinds = form), quote!(struct Session { user: String }));
        assert!(plain.contains("model: &'model mut Session"));
    }

    #[test]
    fn generics_are_propagated() {
        let out = expand_ok(
            quote!(kinds = form, view),
            quote!(struct Wrapper<T: Clone> where T: Default {
                label: String,
                #[field(hidden)]
                marker: PhantomData<T>,
            }),
        );
        assert!(out.contains("struct WrapperForm<'model, T: Clone>"));
        assert!(out.contains("impl<'model, T: Clone> WrapperView<'model, T>"));
        assert!(out.contains("where\n    T: Default"));
    }

    #[test]
    fn generic_parameter_members_are_rejected() {
        let err = expand_err(
            quote!(kinds = form),
            quote!(struct Wrapper<T> { value: T }),
        );
        assert_eq!(
            err,
            "`prototype` macro doesn't support type `T` for member `value`"
        );
    }

    #[test]
    fn qualified_composites_keep_their_module() {
        let out = expand_ok(
            quote!(kinds = form, view),
            quote!(struct Post { author: models::Author }),
        );
        assert!(out.contains("models::AuthorForm::render("));
        assert!(out.contains("models::AuthorForm::apply("));
        assert!(out.contains("models::AuthorView::render("));
    }

    #[test]
    fn only_requested_kinds_are_emitted() {
        let out = expand_ok(quote!(kinds = form), quote!(struct Article { title: String }));
        assert!(out.contains("struct ArticleForm"));
        assert!(!out.contains("struct ArticleView"));
        assert!(!out.contains("SettingsView"));

        let out = expand_ok(quote!(kinds = settings), quote!(struct Article { title: String }));
        assert!(out.contains("struct ArticleSettingsView"));
        assert!(!out.contains("struct ArticleForm"));
        assert!(!out.contains("struct ArticleView"));
    }

    #[test]
    fn less_visible_members_are_left_out_of_every_kind() {
        let out = expand_ok(
            quote!(kinds = form, settings, view),
            quote!(pub struct Account { pub name: String, secret: String }),
        );
        for key in ["AccountForm", "AccountSettingsView", "AccountView"] {
            assert!(out.contains(&format!("\"{key}.name\"")), "{key}");
            assert!(!out.contains(&format!("\"{key}.secret\"")), "{key}");
        }
        assert!(out.contains("name: ::prototype::settings::Storage<String>"));
        assert!(!out.contains("secret: ::prototype::settings::Storage"));
        assert!(!out.contains("\"secret\" =>"));
    }

    #[test]
    fn boolean_members_ignore_custom_formats() {
        let out = expand_ok(
            quote!(kinds = form, view),
            quote!(struct Flags {
                #[format(using = |v: &bool| String::from("yes"))]
                enabled: bool,
            }),
        );
        assert!(!out.contains("Format::format"));
        assert!(!out.contains("String::from(\"yes\")"));
    }

    #[test]
    fn output_is_deterministic() {
        let args = quote!(kinds = form, settings, view);
        let item = quote!(struct Article {
            title: String,
            #[section("Meta")]
            views: u32,
            rating: Option<f64>,
        });
        assert_eq!(
            expand_ok(args.clone(), item.clone()),
            expand_ok(args, item)
        );
    }

    #[test]
    fn registration_is_submitted() {
        let out = expand_ok(quote!(kinds = view), quote!(struct Article { title: String }));
        assert!(out.contains("inventory::submit!"));
        assert!(out.contains("\"Article\""));
    }

    #[test]
    fn misplaced_annotation_reports_attachment() {
        let out = misplaced("section", quote!(fn helper() {})).to_string();
        assert!(out.contains("can only be attached to field declaration"));
    }

    #[test]
    fn derive_emits_marker_impl() {
        let out = derive_observable(quote!(struct Session<T> { user: T })).to_string();
        assert!(out.contains("Observable for Session < T >"));
    }
}
