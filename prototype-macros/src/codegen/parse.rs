//! Token-level helpers shared by the argument parser and the extractors.
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::parse::{Parse, ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Ident, Token, Type, TypePath};

/// One entry of an annotation argument list: `label = expr` or `expr`.
#[derive(Clone)]
pub struct Argument {
    pub label: Option<Ident>,
    pub expr: Expr,
}

impl Parse for Argument {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let labeled = input.peek(Ident) && input.peek2(Token![=]) && !input.peek2(Token![==]);
        let label = if labeled {
            let label: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            Some(label)
        } else {
            None
        };
        let expr: Expr = input.parse()?;
        Ok(Argument { label, expr })
    }
}

impl Argument {
    pub fn has_label(&self, name: &str) -> bool {
        self.label.as_ref().is_some_and(|l| l == name)
    }

    /// Source text used in diagnostics; labeled arguments keep their label.
    pub fn text(&self) -> String {
        match &self.label {
            Some(label) => format!("{label} = {}", expr_text(&self.expr)),
            None => expr_text(&self.expr),
        }
    }

    /// Bare identifier value, e.g. `form` in `kinds = form`.
    pub fn identifier(&self) -> Option<String> {
        match &self.expr {
            Expr::Path(p) if p.qself.is_none() && p.attrs.is_empty() => {
                p.path.get_ident().map(Ident::to_string)
            }
            _ => None,
        }
    }

    /// String literal value, e.g. `"Metadata"` in `#[section("Metadata")]`.
    pub fn string_literal(&self) -> Option<String> {
        match &self.expr {
            Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => Some(s.value()),
            _ => None,
        }
    }
}

pub fn parse_arguments(tokens: TokenStream) -> syn::Result<Vec<Argument>> {
    let list = Punctuated::<Argument, Token![,]>::parse_terminated.parse2(tokens)?;
    Ok(list.into_iter().collect())
}

/// Arguments of a field helper attribute; `#[section]` yields an empty list.
pub fn attribute_arguments(attr: &Attribute) -> syn::Result<Option<Vec<Argument>>> {
    match &attr.meta {
        syn::Meta::Path(_) => Ok(None),
        syn::Meta::List(list) => parse_arguments(list.tokens.clone()).map(Some),
        syn::Meta::NameValue(nv) => Ok(Some(vec![Argument {
            label: None,
            expr: nv.value.clone(),
        }])),
    }
}

/// Last path segment of an attribute, e.g. `section` for `#[prototype::attrs::section]`.
pub fn attr_name(attr: &Attribute) -> String {
    attr.path()
        .segments
        .last()
        .map(|s| s.ident.to_string())
        .unwrap_or_default()
}

pub fn expr_text(expr: &Expr) -> String {
    expr.to_token_stream().to_string()
}

pub fn type_text(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}

/// Plain `a::b::C<..>` path, looking through invisible groups and parentheses.
pub fn plain_path(ty: &Type) -> Option<&TypePath> {
    match ty {
        Type::Path(p) if p.qself.is_none() => Some(p),
        Type::Group(g) => plain_path(&g.elem),
        Type::Paren(p) => plain_path(&p.elem),
        _ => None,
    }
}
