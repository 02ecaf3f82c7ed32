//! Whole struct declaration to a type descriptor.
use syn::punctuated::Punctuated;
use syn::{Fields, Generics, Ident, Item, ItemStruct, Path, Token, Visibility};

use super::error::{Attachment, MacroName, PrototypeMacrosError, Result};
use super::member::{AccessLevel, MemberAttribute, MemberSpec};
use super::parse::attr_name;

/// How the generated form reaches the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `&mut T`
    PlainValue,
    /// `prototype::Observed<T>`
    ObservableReference,
}

/// Supported declarations; a struct deriving `Observable` is a reference record.
pub enum Record<'a> {
    Value(&'a ItemStruct),
    Reference(&'a ItemStruct),
}

impl<'a> Record<'a> {
    pub fn from_item(item: &'a Item) -> Result<Self> {
        match item {
            Item::Struct(s) if derives_observable(s) => Ok(Record::Reference(s)),
            Item::Struct(s) => Ok(Record::Value(s)),
            _ => Err(PrototypeMacrosError::Attachment {
                macro_name: MacroName::Prototype,
                attachment: Attachment::Struct,
            }),
        }
    }

    pub fn declaration(&self) -> &'a ItemStruct {
        match self {
            Record::Value(s) | Record::Reference(s) => s,
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            Record::Value(_) => Capability::PlainValue,
            Record::Reference(_) => Capability::ObservableReference,
        }
    }
}

fn derives_observable(item: &ItemStruct) -> bool {
    item.attrs
        .iter()
        .filter(|a| attr_name(a) == "derive")
        .filter_map(|a| {
            a.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .any(|p| p.segments.last().is_some_and(|s| s.ident == "Observable"))
}

pub struct TypeSpec {
    pub access: AccessLevel,
    pub vis: Visibility,
    pub name: Ident,
    pub generics: Generics,
    pub capability: Capability,
    pub members: Vec<MemberSpec>,
}

impl TypeSpec {
    pub fn parse(record: &Record<'_>) -> Result<Self> {
        let decl = record.declaration();
        let access = AccessLevel::of(&decl.vis);
        let params: Vec<Ident> = decl
            .generics
            .type_params()
            .map(|p| p.ident.clone())
            .collect();
        let members = match &decl.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .enumerate()
                .map(|(index, field)| MemberSpec::parse(field, index, access, &params))
                .collect::<Result<Vec<_>>>()?,
            Fields::Unnamed(unnamed) => unnamed
                .unnamed
                .iter()
                .enumerate()
                .map(|(index, field)| MemberSpec::parse(field, index, access, &params))
                .collect::<Result<Vec<_>>>()?,
            Fields::Unit => Vec::new(),
        };
        Ok(TypeSpec {
            access,
            vis: decl.vis.clone(),
            name: decl.ident.clone(),
            generics: decl.generics.clone(),
            capability: record.capability(),
            members,
        })
    }

    pub fn visible_members(&self) -> impl Iterator<Item = &MemberSpec> {
        self.members
            .iter()
            .filter(|m| m.is(MemberAttribute::Visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn plain_struct_is_value_record() {
        let item: Item = parse_quote! {
            pub struct Article<T: Clone> where T: Default {
                pub title: String,
                pub extra: T,
                internal: u32,
            }
        };
        let record = Record::from_item(&item).unwrap();
        let spec = TypeSpec::parse(&record).unwrap();
        assert_eq!(spec.capability, Capability::PlainValue);
        assert_eq!(spec.access, AccessLevel::Public);
        assert_eq!(spec.members.len(), 3);
        assert_eq!(spec.generics.params.len(), 1);
        assert!(spec.generics.where_clause.is_some());
        let visible: Vec<String> = spec.visible_members().map(|m| m.name_str()).collect();
        assert_eq!(visible, vec!["title", "extra"]);
    }

    #[test]
    fn observable_derive_marks_reference() {
        let item: Item = parse_quote! {
            #[derive(Debug, prototype::Observable)]
            struct Session { user: String }
        };
        let record = Record::from_item(&item).unwrap();
        assert_eq!(record.capability(), Capability::ObservableReference);
    }

    #[test]
    fn tuple_struct_fails_on_first_field() {
        let item: Item = parse_quote!(struct Pair(i32, i32););
        let record = Record::from_item(&item).unwrap();
        let err = TypeSpec::parse(&record).err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Unsupported pattern binding `0` given in member list of `prototype` macro")
        );
    }

    #[test]
    fn enums_are_rejected() {
        let item: Item = parse_quote!(enum Mode { A, B });
        let err = Record::from_item(&item).err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Macro `prototype` can only be attached to `struct` declaration.")
        );
    }
}
