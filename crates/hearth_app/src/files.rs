//! File-backed fetchers
//!
//! Dictionaries live in `<dir>/<language>.{yaml,yml,json}`, themes in
//! `<dir>/<id>.{toml,json}`. Identifiers are restricted to ASCII letters,
//! digits, `-` and `_`, so a fetch can never leave its directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hearth_core::{FetchError, FetchFuture};
use hearth_i18n::RawDictionary;
use hearth_theme::Theme;
use tracing::debug;

const DICTIONARY_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];
const THEME_EXTENSIONS: &[&str] = &["toml", "json"];

/// Fetcher reading dictionaries from `dir`
///
/// Text entries become templates, so `{name}` placeholders take parameters.
pub fn dictionary_fetcher(
    dir: impl Into<PathBuf>,
) -> impl Fn(&str) -> FetchFuture<RawDictionary> + Send + Sync + 'static {
    let dir = dir.into();
    move |language: &str| -> FetchFuture<RawDictionary> {
        let dir = dir.clone();
        let language = language.to_string();
        Box::pin(async move {
            let (path, src) = read_first(&dir, &language, DICTIONARY_EXTENSIONS).await?;
            let raw = if has_extension(&path, "json") {
                RawDictionary::from_json_str(&src)
            } else {
                RawDictionary::from_yaml_str(&src)
            }
            .map_err(|e| FetchError::Failed(format!("{}: {e}", path.display())))?;
            Ok(raw.templated())
        })
    }
}

/// Fetcher reading themes from `dir`
pub fn theme_fetcher(
    dir: impl Into<PathBuf>,
) -> impl Fn(&str) -> FetchFuture<Theme> + Send + Sync + 'static {
    let dir = dir.into();
    move |id: &str| -> FetchFuture<Theme> {
        let dir = dir.clone();
        let id = id.to_string();
        Box::pin(async move {
            let (path, src) = read_first(&dir, &id, THEME_EXTENSIONS).await?;
            let theme = if has_extension(&path, "json") {
                Theme::from_json_str(&src)
            } else {
                Theme::from_toml_str(&src)
            };
            theme.map_err(|e| FetchError::Failed(format!("{}: {e}", path.display())))
        })
    }
}

fn valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

/// Read `<dir>/<id>.<ext>` for the first extension that exists
async fn read_first(
    dir: &Path,
    id: &str,
    extensions: &[&str],
) -> Result<(PathBuf, String), FetchError> {
    if !valid_id(id) {
        return Err(FetchError::NotFound(id.to_string()));
    }
    for ext in extensions {
        let path = dir.join(format!("{id}.{ext}"));
        match tokio::fs::read_to_string(&path).await {
            Ok(src) => {
                debug!(path = %path.display(), "read resource file");
                return Ok((path, src));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(FetchError::Failed(format!("{}: {e}", path.display()))),
        }
    }
    Err(FetchError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_i18n::Dictionary;
    use hearth_core::params;
    use std::fs;

    #[tokio::test]
    async fn reads_yaml_dictionaries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("eo.yaml"),
            "hello: Saluton\ngreet: \"Saluton, {name}!\"\nmenu:\n  open: Malfermi\n",
        )
        .unwrap();

        let fetch = dictionary_fetcher(dir.path());
        let dict = Dictionary::normalize(fetch("eo").await.unwrap());
        assert_eq!(dict.translate("hello", &params!()).as_deref(), Some("Saluton"));
        assert_eq!(dict.translate("menu.open", &params!()).as_deref(), Some("Malfermi"));
        assert_eq!(
            dict.translate("greet", &params!(name: "Ada")).as_deref(),
            Some("Saluton, Ada!")
        );
    }

    #[tokio::test]
    async fn falls_back_to_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"hello": "Hello"}"#).unwrap();

        let fetch = dictionary_fetcher(dir.path());
        assert_eq!(fetch("en").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_and_invalid_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetch = theme_fetcher(dir.path());

        assert_eq!(fetch("absent").await.unwrap_err(), FetchError::NotFound("absent".into()));
        assert_eq!(
            fetch("../secrets").await.unwrap_err(),
            FetchError::NotFound("../secrets".into())
        );
    }

    #[tokio::test]
    async fn malformed_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.toml"), "[Hello\n").unwrap();

        let fetch = theme_fetcher(dir.path());
        assert!(matches!(fetch("broken").await, Err(FetchError::Failed(_))));
    }

    #[tokio::test]
    async fn reads_toml_themes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("forest.toml"), "[Hello]\ncontent = \"green\"\n").unwrap();

        let theme = theme_fetcher(dir.path())("forest").await.unwrap();
        assert_eq!(theme.styles("Hello").unwrap()["content"], "green");
    }
}
