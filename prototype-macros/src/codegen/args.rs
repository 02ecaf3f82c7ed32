//! Argument lists of `#[prototype(...)]` and the field annotations.
use proc_macro2::TokenStream;
use syn::{Attribute, Expr};

use super::error::{ArgumentName, MacroName, PrototypeMacrosError, Result};
use super::flags::{duplicates, Flag, FlagSet};
use super::parse::{attribute_arguments, parse_arguments, Argument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Form,
    Settings,
    View,
}

impl Flag for GenerationKind {
    const ALL: &'static [Self] = &[
        GenerationKind::Form,
        GenerationKind::Settings,
        GenerationKind::View,
    ];
}

impl GenerationKind {
    pub fn from_identifier(name: &str) -> Option<Self> {
        match name {
            "form" => Some(GenerationKind::Form),
            "settings" => Some(GenerationKind::Settings),
            "view" => Some(GenerationKind::View),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationKind::Form => "form",
            GenerationKind::Settings => "settings",
            GenerationKind::View => "view",
        }
    }

    /// Suffix of the generated type name.
    pub fn suffix(self) -> &'static str {
        match self {
            GenerationKind::Form => "Form",
            GenerationKind::Settings => "SettingsView",
            GenerationKind::View => "View",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationStyle {
    Inline,
    #[default]
    Labeled,
}

impl GenerationStyle {
    pub fn from_identifier(name: &str) -> Option<Self> {
        match name {
            "inline" => Some(GenerationStyle::Inline),
            "labeled" => Some(GenerationStyle::Labeled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PrototypeArguments {
    pub kinds: FlagSet<GenerationKind>,
    pub style: GenerationStyle,
}

impl PrototypeArguments {
    pub fn parse(tokens: TokenStream) -> Result<Self> {
        let arguments = parse_arguments(tokens)?;
        let missing_kinds = || PrototypeMacrosError::MissingArgument {
            argument: ArgumentName::Kinds,
            macro_name: MacroName::Prototype,
        };
        if arguments.is_empty() {
            return Err(missing_kinds());
        }

        // 无法识别的 style 回落到默认值
        let style = arguments
            .iter()
            .find(|a| a.has_label("style"))
            .and_then(Argument::identifier)
            .and_then(|s| GenerationStyle::from_identifier(&s))
            .unwrap_or_default();

        let first = arguments
            .iter()
            .position(|a| a.has_label("kinds"))
            .ok_or_else(missing_kinds)?;
        let run = arguments[first + 1..]
            .iter()
            .take_while(|a| a.label.is_none())
            .count();
        let kinds_args = &arguments[first..=first + run];

        let mut kinds = Vec::with_capacity(kinds_args.len());
        for arg in kinds_args {
            let kind = arg
                .identifier()
                .and_then(|s| GenerationKind::from_identifier(&s))
                .ok_or_else(|| PrototypeMacrosError::InvalidArgument {
                    argument: arg.text(),
                    given_for: ArgumentName::Kinds,
                    macro_name: MacroName::Prototype,
                })?;
            kinds.push(kind);
        }
        let repeated = duplicates(&kinds);
        if !repeated.is_empty() {
            return Err(PrototypeMacrosError::DuplicateArgument {
                argument: join(repeated.iter().map(|k| k.as_str())),
                given_for: ArgumentName::Kinds,
                macro_name: MacroName::Prototype,
            });
        }

        let style_index = arguments.iter().position(|a| a.has_label("style"));
        for (index, arg) in arguments.iter().enumerate() {
            let in_kinds = (first..=first + run).contains(&index);
            if !in_kinds && Some(index) != style_index {
                return Err(PrototypeMacrosError::UnexpectedArgument {
                    argument: arg.text(),
                    macro_name: MacroName::Prototype,
                });
            }
        }

        Ok(PrototypeArguments {
            kinds: kinds.into_iter().collect(),
            style,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAttribute {
    Readonly,
    Hidden,
    Secure,
}

impl Flag for FieldAttribute {
    const ALL: &'static [Self] = &[
        FieldAttribute::Readonly,
        FieldAttribute::Hidden,
        FieldAttribute::Secure,
    ];
}

impl FieldAttribute {
    pub fn from_identifier(name: &str) -> Option<Self> {
        match name {
            "readonly" => Some(FieldAttribute::Readonly),
            "hidden" => Some(FieldAttribute::Hidden),
            "secure" => Some(FieldAttribute::Secure),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldAttribute::Readonly => "readonly",
            FieldAttribute::Hidden => "hidden",
            FieldAttribute::Secure => "secure",
        }
    }
}

/// `#[field(readonly, hidden, secure)]`
#[derive(Debug, Clone, Copy)]
pub struct FieldArguments {
    pub attributes: FlagSet<FieldAttribute>,
}

impl FieldArguments {
    pub fn parse(attr: &Attribute) -> Result<Self> {
        let arguments = attribute_arguments(attr)?.unwrap_or_default();
        if arguments.is_empty() {
            return Err(PrototypeMacrosError::MissingArgument {
                argument: ArgumentName::Attributes,
                macro_name: MacroName::Field,
            });
        }
        let mut attributes = Vec::with_capacity(arguments.len());
        for arg in &arguments {
            let attribute = arg
                .label
                .is_none()
                .then(|| arg.identifier())
                .flatten()
                .and_then(|s| FieldAttribute::from_identifier(&s))
                .ok_or_else(|| PrototypeMacrosError::InvalidArgument {
                    argument: arg.text(),
                    given_for: ArgumentName::Attributes,
                    macro_name: MacroName::Field,
                })?;
            attributes.push(attribute);
        }
        let repeated = duplicates(&attributes);
        if !repeated.is_empty() {
            return Err(PrototypeMacrosError::DuplicateArgument {
                argument: join(repeated.iter().map(|a| a.as_str())),
                given_for: ArgumentName::Attributes,
                macro_name: MacroName::Field,
            });
        }
        Ok(FieldArguments {
            attributes: attributes.into_iter().collect(),
        })
    }
}

/// `#[format(using = expr)]`; the formatter expression stays opaque.
#[derive(Clone)]
pub struct FormatArguments {
    pub formatter: Expr,
}

impl FormatArguments {
    pub fn parse(attr: &Attribute) -> Result<Self> {
        let arguments = attribute_arguments(attr)?.unwrap_or_default();
        let mut formatter = None;
        for arg in arguments {
            if arg.has_label("using") && formatter.is_none() {
                formatter = Some(arg.expr);
            } else {
                return Err(PrototypeMacrosError::UnexpectedArgument {
                    argument: arg.text(),
                    macro_name: MacroName::Format,
                });
            }
        }
        formatter
            .map(|formatter| FormatArguments { formatter })
            .ok_or(PrototypeMacrosError::MissingArgument {
                argument: ArgumentName::Using,
                macro_name: MacroName::Format,
            })
    }
}

/// Optional string title of `#[section]` / `#[description]`.
pub fn parse_title(attr: &Attribute, macro_name: MacroName) -> Result<Option<String>> {
    let arguments = attribute_arguments(attr)?.unwrap_or_default();
    let invalid = |arg: &Argument| PrototypeMacrosError::InvalidArgument {
        argument: arg.text(),
        given_for: ArgumentName::Title,
        macro_name,
    };
    match arguments.as_slice() {
        [] => Ok(None),
        [arg] if arg.label.is_none() => arg.string_literal().map(Some).ok_or_else(|| invalid(arg)),
        [arg] => Err(invalid(arg)),
        [arg, extra, ..] => Err(if arg.label.is_some() {
            invalid(arg)
        } else {
            PrototypeMacrosError::UnexpectedArgument {
                argument: extra.text(),
                macro_name,
            }
        }),
    }
}

/// `#[initial(expr)]`: exactly one opaque expression.
pub fn parse_initial(attr: &Attribute) -> Result<Expr> {
    let arguments = attribute_arguments(attr)?.unwrap_or_default();
    let mut iter = arguments.into_iter();
    let value = iter.next().ok_or(PrototypeMacrosError::MissingArgument {
        argument: ArgumentName::Value,
        macro_name: MacroName::Initial,
    })?;
    if let Some(extra) = iter.next() {
        return Err(PrototypeMacrosError::UnexpectedArgument {
            argument: extra.text(),
            macro_name: MacroName::Initial,
        });
    }
    if value.label.is_some() {
        return Err(PrototypeMacrosError::InvalidArgument {
            argument: value.text(),
            given_for: ArgumentName::Value,
            macro_name: MacroName::Initial,
        });
    }
    Ok(value.expr)
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}
