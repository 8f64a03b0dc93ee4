#![no_main]

use libfuzzer_sys::fuzz_target;
use veneer_core::{Key, Object, Value};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let key = Key::from(text);
    if let Some(index) = key.as_index() {
        assert_eq!(index.to_string(), text);
    }
    let object = Object::plain();
    object.set(&key, Value::from(text));
    assert_eq!(object.get(&key), Value::from(text));
    assert!(object.delete(&key));
});
