use serde::Serialize;

/// Companion kinds `#[prototype]` can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Form,
    Settings,
    View,
}

impl Kind {
    pub fn suffix(self) -> &'static str {
        match self {
            Kind::Form => "Form",
            Kind::Settings => "SettingsView",
            Kind::View => "View",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Inline,
    Labeled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Bool,
    String,
    Date,
    Numeric,
    /// Delegates to the companion generated for the field's own type.
    Composite,
}

/// Metadata of one declared field, hidden ones included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    /// Unwrapped type name, e.g. `f64` for `Option<f64>`.
    pub type_name: &'static str,
    pub kind: TypeKind,
    pub optional: bool,
    pub visible: bool,
    pub modifiable: bool,
    pub secure: bool,
    pub starts_section: bool,
    pub section: Option<&'static str>,
    pub has_description: bool,
    pub description: Option<&'static str>,
    pub storage_key: &'static str,
}

/// Registration info for an annotated type collected via inventory.
#[derive(Debug, Serialize)]
pub struct Registration {
    pub type_name: &'static str,
    pub kinds: &'static [Kind],
    pub style: Style,
    pub fields: &'static [FieldInfo],
}

inventory::collect!(Registration);

impl Registration {
    pub fn generates(&self, kind: Kind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Name of the generated companion, e.g. `ArticleSettingsView`.
    pub fn generated_name(&self, kind: Kind) -> Option<String> {
        self.generates(kind)
            .then(|| format!("{}{}", self.type_name, kind.suffix()))
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &'static FieldInfo> {
        self.fields.iter().filter(|f| f.visible)
    }
}

/// Iterate all registrations, ordered by type name
pub fn all() -> Vec<&'static Registration> {
    let mut regs: Vec<_> = inventory::iter::<Registration>.into_iter().collect();
    regs.sort_by_key(|r| r.type_name);
    regs
}

/// Registration of the type called `type_name`; names are not module-qualified.
pub fn find(type_name: &str) -> Option<&'static Registration> {
    let found = inventory::iter::<Registration>
        .into_iter()
        .find(|r| r.type_name == type_name);
    if found.is_none() {
        tracing::debug!(type_name, "no prototype registered under this name");
    }
    found
}
