use proc_macro::TokenStream;

mod codegen;

/// Generates `<Type>Form`, `<Type>SettingsView` and/or `<Type>View` next to a struct.
///
/// ```ignore
/// #[prototype(kinds = form, view, style = inline)]
/// struct Article {
///     title: String,
///     #[section("Metadata")]
///     #[field(readonly)]
///     views: u32,
/// }
/// ```
#[proc_macro_attribute]
pub fn prototype(args: TokenStream, input: TokenStream) -> TokenStream {
    codegen::entrypoint(args.into(), input.into()).into()
}

/// Marks a struct as an observable reference; its form binds through `Observed<T>`.
#[proc_macro_derive(Observable)]
pub fn derive_observable(input: TokenStream) -> TokenStream {
    codegen::derive_observable(input.into()).into()
}

// 字段注解只在 #[prototype] 展开时被读取并移除；单独展开说明挂错了位置。

/// `#[field(readonly, hidden, secure)]` on a field of a `#[prototype]` struct.
#[proc_macro_attribute]
pub fn field(_args: TokenStream, input: TokenStream) -> TokenStream {
    codegen::misplaced("field", input.into()).into()
}

/// `#[section]` or `#[section("title")]`: starts a new section at this field.
#[proc_macro_attribute]
pub fn section(_args: TokenStream, input: TokenStream) -> TokenStream {
    codegen::misplaced("section", input.into()).into()
}

#[proc_macro_attribute]
pub fn description(_args: TokenStream, input: TokenStream) -> TokenStream {
    codegen::misplaced("description", input.into()).into()
}

/// `#[format(using = formatter)]`
#[proc_macro_attribute]
pub fn format(_args: TokenStream, input: TokenStream) -> TokenStream {
    codegen::misplaced("format", input.into()).into()
}

/// `#[initial(expr)]`: default value of the persisted setting.
///
/// The expression has the member's full type, so an `Option<T>` member takes an
/// `Option` expression such as `#[initial(Some(5))]`, not a bare `5`.
#[proc_macro_attribute]
pub fn initial(_args: TokenStream, input: TokenStream) -> TokenStream {
    codegen::misplaced("initial", input.into()).into()
}
