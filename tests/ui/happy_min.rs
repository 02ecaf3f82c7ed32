use prototype::prelude::*;

#[prototype(kinds = form, settings, view)]
struct Prefs {
    #[initial(String::from("light"))]
    theme: String,
    volume: Option<u8>,
}

fn main() {
    let mut prefs = Prefs {
        theme: "dark".into(),
        volume: None,
    };
    let _ = PrefsForm::new(&mut prefs).body();
    let _ = PrefsView::new(&prefs).body();
    let settings = PrefsSettingsView::new(MemoryStore::shared());
    let _ = settings.volume_binding().get();
}
