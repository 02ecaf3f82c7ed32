//! One struct field to a member descriptor.
use syn::ext::IdentExt;
use syn::{Attribute, Expr, Field, GenericArgument, Ident, PathArguments, Type, Visibility};

use super::args::{parse_initial, parse_title, FieldArguments, FieldAttribute, FormatArguments};
use super::error::{Attachment, MacroName, PrototypeMacrosError, Result};
use super::flags::{Flag, FlagSet};
use super::kind::TypeKind;
use super::parse::{attr_name, plain_path, type_text};

/// Ordered from most to least restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessLevel {
    Private,
    Module,
    Crate,
    Public,
}

impl AccessLevel {
    pub fn of(vis: &Visibility) -> AccessLevel {
        match vis {
            Visibility::Public(_) => AccessLevel::Public,
            Visibility::Inherited => AccessLevel::Private,
            Visibility::Restricted(r) => {
                let path = &r.path;
                if path.is_ident("crate") {
                    AccessLevel::Crate
                } else if path.is_ident("self") {
                    AccessLevel::Private
                } else {
                    // pub(super) / pub(in path)
                    AccessLevel::Module
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAttribute {
    Visible,
    Modifiable,
    Secure,
    Section,
    Description,
}

impl Flag for MemberAttribute {
    const ALL: &'static [Self] = &[
        MemberAttribute::Visible,
        MemberAttribute::Modifiable,
        MemberAttribute::Secure,
        MemberAttribute::Section,
        MemberAttribute::Description,
    ];
}

pub type MemberAttributes = FlagSet<MemberAttribute>;

/// Field type with one level of `Option` unwrapped.
#[derive(Clone)]
pub struct FieldType {
    /// Last path segment of the unwrapped type, e.g. `Decimal`.
    pub name: String,
    pub is_optional: bool,
    /// Declared type, verbatim.
    pub ty: Type,
    /// `T` for `Option<T>`, otherwise the declared type.
    pub inner: Type,
}

impl FieldType {
    pub fn resolve(ty: &Type) -> Option<FieldType> {
        let path = plain_path(ty)?;
        let last = path.path.segments.last()?;
        if last.ident != "Option" {
            return Some(FieldType {
                name: last.ident.to_string(),
                is_optional: false,
                ty: ty.clone(),
                inner: ty.clone(),
            });
        }
        let PathArguments::AngleBracketed(args) = &last.arguments else {
            return None;
        };
        let mut types = args.args.iter().filter_map(|a| match a {
            GenericArgument::Type(t) => Some(t),
            _ => None,
        });
        let inner = types.next()?;
        if types.next().is_some() {
            return None;
        }
        let inner_last = plain_path(inner)?.path.segments.last()?;
        // 仅展开一层 Option
        if inner_last.ident == "Option" {
            return None;
        }
        Some(FieldType {
            name: inner_last.ident.to_string(),
            is_optional: true,
            ty: ty.clone(),
            inner: inner.clone(),
        })
    }

    pub fn kind(&self) -> TypeKind {
        TypeKind::classify(&self.name)
    }

    /// `T` or `Option<T>` where `T` is one of the struct's own type parameters.
    fn is_type_parameter(&self, params: &[Ident]) -> bool {
        plain_path(&self.inner)
            .and_then(|p| p.path.get_ident())
            .is_some_and(|ident| params.contains(ident))
    }
}

#[derive(Clone)]
pub struct MemberSpec {
    pub access: AccessLevel,
    pub name: Ident,
    pub ty: FieldType,
    pub initializer: Option<Expr>,
    pub attributes: MemberAttributes,
    pub format: Option<Expr>,
    pub section_title: Option<String>,
    pub description_title: Option<String>,
}

/// Helper annotations found on one field, at most one of each.
#[derive(Default)]
struct Helpers<'a> {
    field: Option<&'a Attribute>,
    section: Option<&'a Attribute>,
    description: Option<&'a Attribute>,
    format: Option<&'a Attribute>,
    initial: Option<&'a Attribute>,
}

impl<'a> Helpers<'a> {
    fn collect(attrs: &'a [Attribute], member: &str) -> Result<Self> {
        let mut helpers = Helpers::default();
        for attr in attrs {
            let Some(name) = MacroName::helper(&attr_name(attr)) else {
                continue;
            };
            let slot = match name {
                MacroName::Field => &mut helpers.field,
                MacroName::Section => &mut helpers.section,
                MacroName::Description => &mut helpers.description,
                MacroName::Format => &mut helpers.format,
                MacroName::Initial => &mut helpers.initial,
                MacroName::Prototype => continue,
            };
            if slot.replace(attr).is_some() {
                return Err(PrototypeMacrosError::DuplicateAttribute {
                    attribute: name,
                    member: member.to_owned(),
                });
            }
        }
        Ok(helpers)
    }
}

impl MemberSpec {
    /// `index` is the field position, `owner` the access level of the enclosing type
    /// and `params` its declared type parameters.
    pub fn parse(field: &Field, index: usize, owner: AccessLevel, params: &[Ident]) -> Result<Self> {
        let Some(name) = field.ident.clone() else {
            return Err(PrototypeMacrosError::UnsupportedPatternBinding {
                pattern: index.to_string(),
            });
        };
        let member = name.to_string();
        if matches!(field.ty, Type::Infer(_)) {
            return Err(PrototypeMacrosError::MissingTypeAnnotation { member });
        }
        // 泛型参数没有可委托的生成类型
        let ty = FieldType::resolve(&field.ty)
            .filter(|ty| !ty.is_type_parameter(params))
            .ok_or_else(|| PrototypeMacrosError::UnsupportedType {
                ty: type_text(&field.ty),
                member: member.clone(),
            })?;
        let helpers = Helpers::collect(&field.attrs, &member)?;

        let access = AccessLevel::of(&field.vis);
        let mut attributes = MemberAttributes::empty();
        attributes.insert(MemberAttribute::Modifiable);
        if access >= owner {
            attributes.insert(MemberAttribute::Visible);
        }

        if let Some(attr) = helpers.field {
            let parsed = FieldArguments::parse(attr)?;
            for attribute in parsed.attributes.iter() {
                match attribute {
                    FieldAttribute::Hidden => attributes.remove(MemberAttribute::Visible),
                    FieldAttribute::Readonly => attributes.remove(MemberAttribute::Modifiable),
                    FieldAttribute::Secure => attributes.insert(MemberAttribute::Secure),
                }
            }
        }

        let mut section_title = None;
        if let Some(attr) = helpers.section {
            attributes.insert(MemberAttribute::Section);
            section_title = parse_title(attr, MacroName::Section)?;
        }
        let mut description_title = None;
        if let Some(attr) = helpers.description {
            attributes.insert(MemberAttribute::Description);
            description_title = parse_title(attr, MacroName::Description)?;
        }
        let format = helpers
            .format
            .map(FormatArguments::parse)
            .transpose()?
            .map(|f| f.formatter);
        let initializer = helpers.initial.map(parse_initial).transpose()?;

        if attributes.contains(MemberAttribute::Secure) && !ty.kind().is_string() {
            return Err(PrototypeMacrosError::Attachment {
                macro_name: MacroName::Field,
                attachment: Attachment::FieldOfType("String"),
            });
        }

        Ok(MemberSpec {
            access,
            name,
            ty,
            initializer,
            attributes,
            format,
            section_title,
            description_title,
        })
    }

    pub fn is(&self, attribute: MemberAttribute) -> bool {
        self.attributes.contains(attribute)
    }

    pub fn kind(&self) -> TypeKind {
        self.ty.kind()
    }

    /// Field name without a raw-identifier prefix.
    pub fn name_str(&self) -> String {
        self.name.unraw().to_string()
    }
}
