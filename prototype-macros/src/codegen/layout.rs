//! Section grouping and per-field widget choice shared by every emitter.
use quote::format_ident;
use syn::ext::IdentExt;
use syn::{Ident, Path, PathArguments};

use super::args::{GenerationKind, GenerationStyle};
use super::kind::TypeKind;
use super::member::{MemberAttribute, MemberSpec};
use super::parse::plain_path;
use super::spec::TypeSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    Toggle,
    TextField,
    SecureField,
    DatePicker,
    NumberField,
    /// Delegates to the generated companion of the field's own type.
    Composite,
}

impl Rendering {
    pub fn of(member: &MemberSpec) -> Rendering {
        match member.kind() {
            TypeKind::Bool => Rendering::Toggle,
            TypeKind::String if member.is(MemberAttribute::Secure) => Rendering::SecureField,
            TypeKind::String => Rendering::TextField,
            TypeKind::Date => Rendering::DatePicker,
            TypeKind::Numeric => Rendering::NumberField,
            TypeKind::Other => Rendering::Composite,
        }
    }

    /// Variant of `prototype::ui::Widget`; composites have none.
    pub fn widget(self) -> Option<&'static str> {
        match self {
            Rendering::Toggle => Some("Toggle"),
            Rendering::TextField => Some("TextField"),
            Rendering::SecureField => Some("SecureField"),
            Rendering::DatePicker => Some("DatePicker"),
            Rendering::NumberField => Some("NumberField"),
            Rendering::Composite => None,
        }
    }
}

pub struct Entry<'a> {
    pub member: &'a MemberSpec,
    pub key: String,
    pub label: Option<String>,
    pub rendering: Rendering,
}

impl Entry<'_> {
    pub fn modifiable(&self) -> bool {
        self.member.is(MemberAttribute::Modifiable)
    }
}

pub enum Block<'a> {
    Entry(Entry<'a>),
    Section {
        header: Option<String>,
        entries: Vec<Entry<'a>>,
    },
}

pub struct Layout<'a> {
    /// Generated type name, e.g. `ArticleForm`; prefix of every key.
    pub ident: Ident,
    pub blocks: Vec<Block<'a>>,
}

impl<'a> Layout<'a> {
    pub fn plan(spec: &'a TypeSpec, kind: GenerationKind, style: GenerationStyle) -> Self {
        let ident = generated_ident(&spec.name, kind);
        let prefix = ident.to_string();
        let mut blocks = Vec::new();
        let mut open: Option<(Option<String>, Vec<Entry<'a>>)> = None;

        for member in spec.visible_members() {
            if member.is(MemberAttribute::Section) {
                if let Some((header, entries)) = open.take() {
                    blocks.push(Block::Section { header, entries });
                }
                let header = member
                    .section_title
                    .as_ref()
                    .map(|title| format!("{prefix}.{title}"));
                open = Some((header, Vec::new()));
            }
            let name = member.name_str();
            let entry = Entry {
                member,
                key: format!("{prefix}.{name}"),
                label: (style == GenerationStyle::Labeled).then(|| format!("{prefix}.{name}.label")),
                rendering: Rendering::of(member),
            };
            match open.as_mut() {
                Some((_, entries)) => entries.push(entry),
                None => blocks.push(Block::Entry(entry)),
            }
        }
        if let Some((header, entries)) = open {
            blocks.push(Block::Section { header, entries });
        }
        Layout { ident, blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry<'a>> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Entry(entry) => std::slice::from_ref(entry).iter(),
            Block::Section { entries, .. } => entries.iter(),
        })
    }
}

pub fn generated_ident(name: &Ident, kind: GenerationKind) -> Ident {
    format_ident!("{}{}", name, kind.suffix())
}

/// `FooForm` for a composite field of type `Foo`; leading segments are kept,
/// so `models::Author` yields `models::AuthorForm`. Generic arguments are left
/// to inference.
pub fn companion_path(member: &MemberSpec, kind: GenerationKind) -> Path {
    let mut path = match plain_path(&member.ty.inner) {
        Some(p) => p.path.clone(),
        None => Path::from(format_ident!("{}", member.ty.name)),
    };
    if let Some(last) = path.segments.last_mut() {
        last.ident = format_ident!("{}{}", last.ident.unraw(), kind.suffix());
        last.arguments = PathArguments::None;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::spec::Record;
    use syn::{parse_quote, Item};

    fn spec(item: Item) -> TypeSpec {
        TypeSpec::parse(&Record::from_item(&item).unwrap()).unwrap()
    }

    fn describe(layout: &Layout<'_>) -> Vec<String> {
        layout
            .blocks
            .iter()
            .map(|block| match block {
                Block::Entry(e) => e.key.clone(),
                Block::Section { header, entries } => format!(
                    "[{}] {}",
                    header.as_deref().unwrap_or("-"),
                    entries.iter().map(|e| e.key.as_str()).collect::<Vec<_>>().join(" ")
                ),
            })
            .collect()
    }

    #[test]
    fn sections_capture_following_members() {
        let spec = spec(parse_quote! {
            struct Article {
                title: String,
                #[section("Metadata")]
                views: u32,
                published: bool,
                #[section]
                rating: f64,
            }
        });
        let layout = Layout::plan(&spec, GenerationKind::Form, GenerationStyle::Inline);
        assert_eq!(
            describe(&layout),
            vec![
                "ArticleForm.title".to_owned(),
                "[ArticleForm.Metadata] ArticleForm.views ArticleForm.published".to_owned(),
                "[-] ArticleForm.rating".to_owned(),
            ]
        );
        assert!(layout.entries().all(|e| e.label.is_none()));
    }

    #[test]
    fn labeled_style_and_widgets() {
        let spec = spec(parse_quote! {
            struct Account {
                #[field(secure)]
                password: String,
                joined: Date,
                author: Option<Author>,
                #[field(hidden)]
                token: String,
            }
        });
        let layout = Layout::plan(&spec, GenerationKind::Settings, GenerationStyle::Labeled);
        let entries: Vec<_> = layout.entries().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].rendering, Rendering::SecureField);
        assert_eq!(
            entries[0].label.as_deref(),
            Some("AccountSettingsView.password.label")
        );
        assert_eq!(entries[1].rendering, Rendering::DatePicker);
        assert_eq!(entries[2].rendering, Rendering::Composite);
        let companion = companion_path(entries[2].member, GenerationKind::View);
        assert_eq!(quote::quote!(#companion).to_string(), "AuthorView");
    }

    #[test]
    fn companion_keeps_module_prefix() {
        let spec = spec(parse_quote! {
            struct Post {
                author: crate::models::Author,
                editor: Option<models::Author<u8>>,
            }
        });
        let layout = Layout::plan(&spec, GenerationKind::Form, GenerationStyle::Inline);
        let paths: Vec<_> = layout
            .entries()
            .map(|e| {
                let path = companion_path(e.member, GenerationKind::Form);
                quote::quote!(#path).to_string()
            })
            .collect();
        assert_eq!(
            paths,
            ["crate :: models :: AuthorForm", "models :: AuthorForm"]
        );
    }

    #[test]
    fn nothing_visible_is_empty() {
        let spec = spec(parse_quote! {
            pub struct Hidden { secret: String }
        });
        assert!(Layout::plan(&spec, GenerationKind::View, GenerationStyle::Inline).is_empty());
    }
}
