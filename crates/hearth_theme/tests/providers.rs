use std::sync::Arc;

use hearth_core::{ContextScope, FetchError, Signal};
use hearth_theme::{
    classes, use_color_scheme, use_styles, ColorScheme, ColorSchemeProvider, ManualMediaSource,
    MediaQuery, Styles, Theme, ThemeProvider,
};
use pollster::block_on;

const LIGHT: &str = r#"
[Card]
root = "card card-light"
title = "card-title"
"#;

const DARK: &str = r#"
[Card]
root = "card card-dark"
title = "card-title"
"#;

fn theme_for(id: &str) -> Result<Theme, FetchError> {
    let source = match id {
        "light" => LIGHT,
        "dark" => DARK,
        other => return Err(FetchError::NotFound(other.to_string())),
    };
    Theme::from_toml_str(source).map_err(|e| FetchError::Failed(e.to_string()))
}

#[test]
fn theme_follows_detected_color_scheme() {
    let media = Arc::new(ManualMediaSource::new());
    let scheme = ColorSchemeProvider::auto_detect(media.clone(), None, Some(ColorScheme::Light));
    let theme = ThemeProvider::fetched(
        |id: &str| {
            let result = theme_for(id);
            async move { result }
        },
        None,
    );

    let scope = ContextScope::new();
    scope.provide(Arc::new(scheme.clone()));
    scope.provide(Arc::new(theme.clone()));

    // Drive the theme off the resolved scheme, as a host would.
    let driver = theme.clone();
    let _sync = scheme.subscribe(move |s| {
        if let Some(s) = s {
            block_on(driver.set_theme(s.as_str()));
        }
    });
    block_on(theme.set_theme(scheme.color_scheme().unwrap().as_str()));
    scheme.mount();

    let defaults = Styles::from([("root".to_string(), "shadow".to_string())]);
    let card = use_styles(&scope, "Card", Some(defaults)).unwrap();
    assert_eq!(card.resolve(classes!["root", "title"]), "shadow card card-light card-title");

    media.emit(MediaQuery::PrefersDark, true);
    assert_eq!(
        use_color_scheme(&scope).unwrap().color_scheme(),
        Some(ColorScheme::Dark)
    );
    assert_eq!(card.resolve("root"), "shadow card card-dark");
}

#[test]
fn controlled_scheme_is_read_only_through_context() {
    let owner = Signal::new(None);
    let scope = ContextScope::new();
    scope.provide(Arc::new(ColorSchemeProvider::controlled(owner.clone())));

    let provider = use_color_scheme(&scope.child()).unwrap();
    assert_eq!(provider.color_scheme(), None);
    assert!(provider.toggle().is_err());

    owner.set(Some(ColorScheme::Custom("sepia".into())));
    assert_eq!(provider.color_scheme().unwrap().to_string(), "sepia");
}

#[test]
fn theme_loaded_from_json_resolves_like_toml() {
    let from_toml = theme_for("light").unwrap();
    let from_json = Theme::from_json_str(
        r#"{"Card": {"root": "card card-light", "title": "card-title"}}"#,
    )
    .unwrap();
    assert_eq!(from_toml, from_json);
}
