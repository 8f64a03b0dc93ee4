//! Diagnostic events emitted while normalizing and installing.

use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use veneer_core::{Object, Value};
use veneer_registrar::{DefinitionChain, Depth, RegistrationConfig, Registrar};

#[derive(Default, Clone)]
struct MessageCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MessageCapture {
    fn count(&self, needle: &str) -> usize {
        self.messages
            .lock()
            .expect("capture lock")
            .iter()
            .filter(|message| message.as_str() == needle)
            .count()
    }
}

impl<S> Layer<S> for MessageCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct V {
            message: Option<String>,
        }
        impl tracing::field::Visit for V {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}"));
                }
            }
        }
        let mut visitor = V { message: None };
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            self.messages.lock().expect("capture lock").push(message);
        }
    }
}

fn capture<F: FnOnce()>(body: F) -> MessageCapture {
    let capture = MessageCapture::default();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("trace"))
        .with(capture.clone());
    tracing::subscriber::with_default(subscriber, body);
    capture
}

#[test]
fn install_is_traced_per_key() {
    let capture = capture(|| {
        let registrar = Registrar::with_config(RegistrationConfig::new()).unwrap();
        registrar.register(["a", "b", "c"], 1).unwrap();
    });
    assert_eq!(capture.count("installing accessor"), 3);
    assert_eq!(capture.count("normalized registration config"), 1);
}

#[test]
fn sub_tree_rebuild_is_logged_per_qualifying_write() {
    let capture = capture(|| {
        let registrar = Registrar::with_config(RegistrationConfig::new().with_depth(Depth::Levels(1))).unwrap();
        registrar.register("k", Value::object([("x", 1)])).unwrap();
        registrar.set("k", Value::object([("y", 2)]));
        registrar.set("k", 3);
    });
    assert_eq!(capture.count("rebuilding reactive sub-tree"), 2);
}

#[test]
fn vetoed_write_is_traced() {
    let capture = capture(|| {
        let registrar = Registrar::with_config(RegistrationConfig::new().with_on_set(|_| true)).unwrap();
        registrar.register("k", 1).unwrap();
    });
    assert_eq!(capture.count("setter hook handled the write"), 1);
}

#[test]
fn chain_normalization_reports_discarded_backing() {
    let capture = capture(|| {
        DefinitionChain::new(vec![
            RegistrationConfig::new().with_backing_store(Object::plain()),
            RegistrationConfig::new(),
        ])
        .unwrap();
    });
    assert_eq!(
        capture.count("discarding backing store declared on a non-terminal layer"),
        1
    );
    assert_eq!(capture.count("normalized definition chain"), 1);
}
