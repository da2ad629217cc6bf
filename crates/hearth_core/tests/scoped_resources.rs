use std::sync::{Arc, Mutex};

use hearth_core::{Context, ContextScope, FetchError, Resource, Signal};
use pollster::block_on;

/// A provider that serves greetings fetched per language.
struct Greeter {
    language: Signal<String>,
    greeting: Resource<String>,
}

impl Context for Greeter {
    const NAME: &'static str = "GreeterContext";
}

impl Greeter {
    fn new() -> Self {
        Self {
            language: Signal::new(String::new()),
            greeting: Resource::new(
                |language: &str| {
                    let result = match language {
                        "eo" => Ok("saluton".to_string()),
                        "en" => Ok("hello".to_string()),
                        other => Err(FetchError::NotFound(other.to_string())),
                    };
                    async move { result }
                },
                None,
            ),
        }
    }

    fn switch(&self, language: &str) {
        self.language.set(language.to_string());
        block_on(self.greeting.load(language));
    }
}

#[test]
fn providers_are_found_from_nested_scopes() {
    let root = ContextScope::new();
    let page = root.child();
    let widget = page.child();
    assert!(widget.use_context::<Greeter>().is_err());

    root.provide(Arc::new(Greeter::new()));
    let greeter = widget.use_context::<Greeter>().unwrap();
    greeter.switch("eo");
    assert_eq!(greeter.greeting.value().as_deref(), Some("saluton"));

    // A closer provider shadows the root one.
    page.provide(Arc::new(Greeter::new()));
    let nearest = widget.use_context::<Greeter>().unwrap();
    assert_eq!(nearest.greeting.value(), None);
    assert!(root.use_context::<Greeter>().unwrap().greeting.value().is_some());
}

#[test]
fn observers_track_language_and_resource() {
    let greeter = Greeter::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let log_language = log.clone();
    let _language = greeter
        .language
        .subscribe(move |l| log_language.lock().unwrap().push(format!("language {l}")));
    let log_greeting = log.clone();
    let _greeting = greeter.greeting.subscribe(move |s| {
        if !s.is_loading() {
            let text = s.value().cloned().unwrap_or_default();
            log_greeting.lock().unwrap().push(format!("greeting {text}"));
        }
    });

    greeter.switch("en");
    greeter.switch("xx");

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "language en",
            "greeting hello",
            "language xx",
            "greeting hello",
        ]
    );
    assert_eq!(greeter.greeting.error(), Some(FetchError::NotFound("xx".into())));
}
