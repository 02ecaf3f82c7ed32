#[prototype::prototype(kinds = view)]
#[derive(prototype::Observable)]
struct Status {
    #[prototype::attrs::field(readonly)]
    state: String,
    #[prototype::attrs::section("Details")]
    #[prototype::attrs::format(using = |v: &bool| format!("{v}"))]
    healthy: bool,
}

fn main() {
    let status = Status {
        state: "ok".into(),
        healthy: true,
    };
    let _ = StatusView::new(&status).body();
    let _ = prototype::Observed::new(status);
}
