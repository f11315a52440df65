#[allow(dead_code)]
#[macro_use]
mod common;

use std::io::Write;

use color_eyre::Result;
use common::harness::{TestHarness, parse_options};
use ratatui::backend::TestBackend;
use typeahead::{Typeahead, TypeaheadOptionsBuilder};

fn catalog_file(contents: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[tokio::test(start_paused = true)]
async fn catalog_file_replaces_the_demo() -> Result<()> {
    let file = catalog_file(
        r#"[
            (id: "a", title: "Borrow Checker Deep Dive", category: "Rust"),
            (id: "b", title: "Async Rust in Practice", category: "Rust"),
            (id: "c", title: "React Server Components", category: "Frontend"),
        ]"#,
    )?;
    let path = file.path().to_string_lossy().into_owned();
    let options = parse_options(&["--page", "search", "--catalog", &path]);
    let mut typeahead = Typeahead::<TestBackend>::init(options, None)?;
    typeahead.init_tui_with(TestBackend::new(80, 24))?;
    let mut h = TestHarness {
        typeahead,
        final_event: None,
    };

    h.type_str("rust")?;
    h.advance(200).await?;
    assert_eq!(h.result_ids(), ["a", "b"]);
    Ok(())
}

#[test]
fn duplicate_ids_are_rejected() -> Result<()> {
    let file = catalog_file(r#"[(id: "1", title: "One", category: "x"), (id: "1", title: "Uno", category: "y")]"#)?;
    let path = file.path().to_string_lossy().into_owned();
    let options = parse_options(&["--catalog", &path]);
    let err = Typeahead::<TestBackend>::init(options, None).err().expect("init fails");
    assert!(err.to_string().contains("duplicate result id `1`"));
    Ok(())
}

#[test]
fn missing_catalog_is_an_error() {
    let options = parse_options(&["--catalog", "/nonexistent/typeahead/catalog.ron"]);
    assert!(Typeahead::<TestBackend>::init(options, None).is_err());
}

#[test]
fn invalid_height_is_an_error() {
    let options = TypeaheadOptionsBuilder::default()
        .height(String::from("120%"))
        .build()
        .unwrap();
    assert!(Typeahead::<TestBackend>::init(options, None).is_err());
}

#[test]
fn default_options_env_style_args() {
    let options = parse_options(&["--debounce", "75", "--no-mouse", "--color", "light,focused:#ff0000"]);
    assert_eq!(options.debounce, 75);
    assert!(options.no_mouse);
    assert_eq!(options.color.as_deref(), Some("light,focused:#ff0000"));
}

#[tokio::test(start_paused = true)]
async fn no_mouse_leaves_capture_off() -> Result<()> {
    let options = parse_options(&["--no-mouse"]);
    let mut typeahead = Typeahead::<TestBackend>::init(options, None)?;
    typeahead.init_tui_with(TestBackend::new(80, 24))?;
    assert!(!typeahead.tui_ref().mouse);
    Ok(())
}
