//! Primitive kind classification of field types.
use proc_macro2::TokenStream;
use quote::quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Bool,
    String,
    Date,
    Numeric,
    Other,
}

// 按类型名最后一段精确匹配
const NUMERIC: &[&str] = &[
    "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "f32", "f64",
    "Decimal",
];
const DATE: &[&str] = &["Date", "NaiveDate", "NaiveDateTime"];

impl TypeKind {
    pub fn classify(name: &str) -> TypeKind {
        if NUMERIC.contains(&name) {
            TypeKind::Numeric
        } else if DATE.contains(&name) {
            TypeKind::Date
        } else if name == "bool" {
            TypeKind::Bool
        } else if name == "String" {
            TypeKind::String
        } else {
            TypeKind::Other
        }
    }

    pub fn is_numeric(self) -> bool {
        self == TypeKind::Numeric
    }

    pub fn is_string(self) -> bool {
        self == TypeKind::String
    }

    pub fn is_bool(self) -> bool {
        self == TypeKind::Bool
    }

    /// Zero value used when a settings entry has no initializer.
    pub fn default_value(self) -> TokenStream {
        match self {
            TypeKind::Bool => quote!(false),
            TypeKind::String => quote!(::std::string::String::new()),
            TypeKind::Date | TypeKind::Numeric | TypeKind::Other => {
                quote!(::core::default::Default::default())
            }
        }
    }

    /// Variant name of `prototype::registry::TypeKind`.
    pub fn registry_variant(self) -> &'static str {
        match self {
            TypeKind::Bool => "Bool",
            TypeKind::String => "String",
            TypeKind::Date => "Date",
            TypeKind::Numeric => "Numeric",
            TypeKind::Other => "Composite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_exact_name() {
        assert_eq!(TypeKind::classify("u16"), TypeKind::Numeric);
        assert_eq!(TypeKind::classify("Decimal"), TypeKind::Numeric);
        assert_eq!(TypeKind::classify("NaiveDate"), TypeKind::Date);
        assert_eq!(TypeKind::classify("bool"), TypeKind::Bool);
        assert_eq!(TypeKind::classify("String"), TypeKind::String);
        assert_eq!(TypeKind::classify("string"), TypeKind::Other);
        assert_eq!(TypeKind::classify("Author"), TypeKind::Other);
    }

    #[test]
    fn zero_values() {
        assert_eq!(TypeKind::Bool.default_value().to_string(), "false");
        assert!(TypeKind::String
            .default_value()
            .to_string()
            .contains("String :: new"));
        assert!(TypeKind::Numeric
            .default_value()
            .to_string()
            .contains("Default :: default"));
    }
}
