//! Diagnostics raised while reading a `#[prototype]` declaration.
//!
//! Errors are plain values; the entrypoint turns the first one into a
//! `compile_error!` anchored at the annotation.
use std::fmt;

use proc_macro2::Span;

/// Annotation names as they appear in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroName {
    Prototype,
    Field,
    Section,
    Description,
    Format,
    Initial,
}

impl MacroName {
    pub const HELPERS: &'static [MacroName] = &[
        MacroName::Field,
        MacroName::Section,
        MacroName::Description,
        MacroName::Format,
        MacroName::Initial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MacroName::Prototype => "prototype",
            MacroName::Field => "field",
            MacroName::Section => "section",
            MacroName::Description => "description",
            MacroName::Format => "format",
            MacroName::Initial => "initial",
        }
    }

    /// Helper annotation matching an attribute's last path segment.
    pub fn helper(name: &str) -> Option<MacroName> {
        Self::HELPERS.iter().copied().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for MacroName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument labels known to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentName {
    Kinds,
    Attributes,
    Using,
    Title,
    Value,
}

impl fmt::Display for ArgumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgumentName::Kinds => "kinds",
            ArgumentName::Attributes => "attributes",
            ArgumentName::Using => "using",
            ArgumentName::Title => "title",
            ArgumentName::Value => "value",
        })
    }
}

/// Declarations an annotation can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Struct,
    Field,
    /// Field declaration restricted to a named type, e.g. `String` for `secure`.
    FieldOfType(&'static str),
}

#[derive(Debug, Clone)]
pub enum PrototypeMacrosError {
    Attachment {
        macro_name: MacroName,
        attachment: Attachment,
    },
    InvalidArgument {
        argument: String,
        given_for: ArgumentName,
        macro_name: MacroName,
    },
    MissingArgument {
        argument: ArgumentName,
        macro_name: MacroName,
    },
    DuplicateArgument {
        argument: String,
        given_for: ArgumentName,
        macro_name: MacroName,
    },
    UnexpectedArgument {
        argument: String,
        macro_name: MacroName,
    },
    DuplicateAttribute {
        attribute: MacroName,
        member: String,
    },
    MissingTypeAnnotation {
        member: String,
    },
    UnsupportedPatternBinding {
        pattern: String,
    },
    UnsupportedType {
        ty: String,
        member: String,
    },
    /// Token-level failure reported by `syn` while reading an argument list.
    Syntax(syn::Error),
}

impl fmt::Display for PrototypeMacrosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attachment {
                macro_name,
                attachment,
            } => match attachment {
                Attachment::Struct => write!(
                    f,
                    "Macro `{macro_name}` can only be attached to `struct` declaration."
                ),
                Attachment::Field => write!(
                    f,
                    "Macro `{macro_name}` can only be attached to field declaration."
                ),
                Attachment::FieldOfType(ty) => write!(
                    f,
                    "Macro `{macro_name}` can only be attached to field declaration of type `{ty}`."
                ),
            },
            Self::InvalidArgument {
                argument,
                given_for,
                macro_name,
            } => write!(
                f,
                "Invalid argument `{argument}` given for argument `{given_for}` of `{macro_name}` macro"
            ),
            Self::MissingArgument {
                argument,
                macro_name,
            } => write!(f, "Missing argument `{argument}` for macro `{macro_name}`"),
            Self::DuplicateArgument {
                argument,
                given_for,
                macro_name,
            } => write!(
                f,
                "Duplicate argument `{argument}` given for argument `{given_for}` of `{macro_name}` macro"
            ),
            Self::UnexpectedArgument {
                argument,
                macro_name,
            } => write!(f, "Unexpected argument `{argument}` given for macro `{macro_name}`"),
            Self::DuplicateAttribute { attribute, member } => write!(
                f,
                "Duplicate attribute `{attribute}` given for member `{member}` of `prototype` macro"
            ),
            Self::MissingTypeAnnotation { member } => write!(
                f,
                "`prototype` macro expected `type-annotation` for member `{member}`."
            ),
            Self::UnsupportedPatternBinding { pattern } => write!(
                f,
                "Unsupported pattern binding `{pattern}` given in member list of `prototype` macro"
            ),
            Self::UnsupportedType { ty, member } => write!(
                f,
                "`prototype` macro doesn't support type `{ty}` for member `{member}`"
            ),
            Self::Syntax(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PrototypeMacrosError {}

impl From<syn::Error> for PrototypeMacrosError {
    fn from(err: syn::Error) -> Self {
        PrototypeMacrosError::Syntax(err)
    }
}

impl PrototypeMacrosError {
    /// Diagnostic anchored at the annotation; syntax errors keep their own span.
    pub fn into_syn_error(self) -> syn::Error {
        match self {
            PrototypeMacrosError::Syntax(err) => err,
            other => syn::Error::new(Span::call_site(), other),
        }
    }
}

pub type Result<T> = std::result::Result<T, PrototypeMacrosError>;
