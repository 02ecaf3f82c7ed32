use std::marker::PhantomData;

use prototype::prelude::*;

#[prototype(kinds = form, view)]
struct Tagged<T>
where
    T: Send,
{
    label: String,
    r#type: u32,
    #[field(hidden)]
    tag: PhantomData<T>,
}

fn main() {
    let mut tagged = Tagged::<u8> {
        label: "x".into(),
        r#type: 1,
        tag: PhantomData,
    };
    let mut form = TaggedForm::new(&mut tagged);
    form.update(&FieldPath::from("type"), Value::UInt(2)).unwrap();
    let _ = TaggedView::new(&tagged).body();
}
