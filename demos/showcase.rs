//! 示例：同一份记录生成表单、设置页与只读视图，并打印描述树
use std::sync::Arc;

use prototype::prelude::*;
use prototype::registry;
use serde::{Deserialize, Serialize};

#[prototype(kinds = form, view)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Address {
    city: String,
    zip: Option<String>,
}

#[prototype(kinds = form, settings, view)]
#[derive(Debug, Clone)]
struct Customer {
    name: String,
    #[field(secure)]
    api_key: String,
    #[section("Billing")]
    #[format(using = |v: &f64| format!("{v:.2} EUR"))]
    balance: f64,
    #[initial(Address { city: "Berlin".into(), zip: None })]
    address: Address,
    #[section("Activity")]
    #[field(readonly)]
    signed_up: Option<Date>,
    #[field(hidden)]
    internal_score: i32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let mut customer = Customer {
        name: "Ada".into(),
        api_key: "sk-123".into(),
        balance: 1234.5,
        address: Address {
            city: "London".into(),
            zip: Some("N1".into()),
        },
        signed_up: Some(chrono::Utc::now()),
        internal_score: 7,
    };

    // 表单：按路径写回模型
    {
        let mut form = CustomerForm::new(&mut customer)
            .with_number_format(NumberFormat::new().fraction_digits(2).grouping(true));
        form.update(&FieldPath::from("address.city"), Value::Text("Paris".into()))?;
        if let Err(e) = form.update(&FieldPath::from("signed_up"), Value::Null) {
            tracing::info!(error = %e, "rejected as expected");
        }
        println!("{}", serde_json::to_string_pretty(&form.body())?);
    }

    // 只读视图：密文字段被遮蔽
    let view = CustomerView::new(&customer).body();
    println!("{}", serde_json::to_string_pretty(&view)?);

    // 设置页：每个成员一个持久化键
    let store = Arc::new(prototype::JsonFileStore::open(
        std::env::temp_dir().join("prototype-showcase.json"),
    )?);
    let settings = CustomerSettingsView::new(store);
    settings.update(&FieldPath::from("balance"), Value::Float(99.0))?;
    settings.update(&FieldPath::from("address.zip"), Value::Text("75001".into()))?;
    println!("{}", serde_json::to_string_pretty(&settings.body())?);

    for reg in registry::all() {
        tracing::info!(
            type_name = reg.type_name,
            fields = reg.fields.len(),
            "registered prototype"
        );
    }
    Ok(())
}
