//! Integration test for the common Lokyn workflow through the root crate.
//!
//! The global translator is shared by the whole test binary, so the flow
//! lives in a single test.

use lokyn::log::{Level, capture};
use lokyn::*;
use std::fs;

#[test]
fn test_translation_directory_workflow() {
    let translator = Translator::builder()
        .language_env(None::<String>)
        .locale_source(StaticLocales::new(["pt_BR.UTF-8", "en_US.UTF-8"]))
        .build();
    assert!(install(translator).is_ok());

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("active.en.json"),
        r#"{"inbox": {"title": "Inbox", "unread": {"one": "{{count}} unread message", "other": "{{count}} unread messages"}}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("active.pt.json"),
        r#"{"inbox": {"title": "Caixa de entrada", "unread": {"one": "{{.Count}} mensagem", "other": "{{.Count}} mensagens"}}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("active.es.json"), "not json").unwrap();
    fs::write(dir.path().join("README.md"), "# translations").unwrap();

    init();
    assert_eq!(get_current_language(), "und");

    let (report, records) = capture(|| add_translation_dir(dir.path()));
    let report = report.unwrap();

    assert_eq!(report.registered.len(), 2);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(
        records
            .iter()
            .filter(|r| r.level == Level::Warn && r.target == "lokyn::registry")
            .count(),
        2
    );

    let supported: Vec<String> = lokyn::translator()
        .supported_languages()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(supported, vec!["en", "en", "pt"]);

    // pt-BR has no catalog of its own; negotiation lands on pt.
    assert_eq!(get_current_language(), "pt");
    assert_eq!(l("inbox.title"), "Caixa de entrada");
    assert_eq!(p("inbox.unread", 0), "0 mensagem");
    assert_eq!(p("inbox.unread", 3), "3 mensagens");

    set_language("en");
    assert_eq!(p("inbox.unread", 1), "1 unread message");
    assert_eq!(p("inbox.unread", 12), "12 unread messages");
    assert_eq!(l("inbox.archive"), "inbox.archive");

    let missing = dir.path().join("missing");
    assert!(matches!(
        add_translation_dir(&missing),
        Err(I18nError::DirectoryUnreadable { .. })
    ));
    assert_eq!(lokyn::translator().supported_languages().len(), 3);
    assert_eq!(get_current_language(), "en");
}
