pub mod binding;
pub mod error;
pub mod format;
pub mod observe;
pub mod registry;
pub mod settings;
pub mod ui;
pub mod value;

// 允许在本 crate 内通过 `prototype::...` 自引用（供 proc-macro 展开使用）
extern crate self as prototype;

pub use binding::Binding;
pub use error::{PrototypeError, Result};
pub use format::{DateFormat, Format, NumberFormat};
pub use observe::{Observable, Observed};
pub use settings::{JsonFileStore, MemoryStore, SettingsStore, SharedStore, Storage};
pub use ui::{BindingMode, Control, FieldPath, Node, Widget, REDACTED};
pub use value::{Date, FieldValue, Value};

pub use prototype_macros::{prototype, Observable};

/// Field annotations read by `#[prototype]`.
///
/// They never need importing inside an annotated struct; applied anywhere else
/// they report a misplaced annotation.
pub mod attrs {
    pub use prototype_macros::{description, field, format, initial, section};
}

/// Everything a model module usually needs; field annotations stay in [`attrs`]
/// so that `format!` keeps resolving.
pub mod prelude {
    pub use crate::format::{DateFormat, NumberFormat};
    pub use crate::observe::{Observable, Observed};
    pub use crate::settings::{MemoryStore, SharedStore};
    pub use crate::ui::{FieldPath, Node};
    pub use crate::value::{Date, Value};
    pub use prototype_macros::{prototype, Observable};
}

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
