use super::*;

#[tokio::test]
async fn test_preset_answers_are_consumed_once() {
    let prompter = HeadlessPrompter::new(SaveChoice::Discard);
    prompter.set_open_id(Some(StorageId::path("/tmp/a.notebook")));
    prompter.set_save_as_id(Some(StorageId::path("/tmp/b.notebook")));

    assert_eq!(prompter.confirm_save("a").await, SaveChoice::Discard);
    assert_eq!(
        prompter.pick_open_id().await,
        Some(StorageId::path("/tmp/a.notebook"))
    );
    assert_eq!(prompter.pick_open_id().await, None);

    let current = StorageId::untitled(1);
    assert_eq!(
        prompter.pick_save_as_id(&current).await,
        Some(StorageId::path("/tmp/b.notebook"))
    );
    assert_eq!(prompter.pick_save_as_id(&current).await, None);
}

#[test]
fn test_notices_recorded_in_order() {
    let prompter = HeadlessPrompter::default();
    prompter.show_warning("capped");
    prompter.show_error("boom");

    assert_eq!(
        prompter.take_notices(),
        vec![
            Notice::Warning("capped".to_string()),
            Notice::Error("boom".to_string())
        ]
    );
    assert!(prompter.notices().is_empty());
}
