use ara_core::{
    NoteDocument, ReadingSession, Section, Sq3rStage, Store, StoreConfig, StoreError,
    UpsertOutcome, EXAMPLE_CHAPTER_ID, UNTITLED_SECTION,
};

#[test]
fn session_loads_saved_notes_and_saves_edits() {
    let mut store = Store::connect_with(&StoreConfig::in_memory());
    store
        .save_notes(
            "alice",
            &NoteDocument::new("Chapter 2", "Processes").with_section("Overview", "old"),
        )
        .unwrap();

    {
        let mut session = ReadingSession::open(&mut store, "alice", "Chapter 2", 10).unwrap();
        assert_eq!(session.document().chapter_title, "Processes");
        assert_eq!(session.document().sections.len(), 1);

        session.add_section("  ", "blank title");
        assert_eq!(session.prompts().stage(), Sq3rStage::Recite);
        assert_eq!(session.save().unwrap(), UpsertOutcome::ReplacedEntry);
    }

    let fetched = store.fetch_notes("alice", "Chapter 2").unwrap().unwrap();
    assert_eq!(
        fetched.sections,
        vec![
            Section::new("Overview", "old"),
            Section::new(UNTITLED_SECTION, "blank title")
        ]
    );
}

#[test]
fn example_chapter_starts_prefilled_unless_notes_exist() {
    let mut store = Store::connect_with(&StoreConfig::in_memory());
    {
        let session = ReadingSession::open(&mut store, "bob", EXAMPLE_CHAPTER_ID, 3).unwrap();
        assert_eq!(session.document(), &NoteDocument::example_chapter());
    }

    store
        .save_notes("bob", &NoteDocument::new(EXAMPLE_CHAPTER_ID, "Mine"))
        .unwrap();
    let session = ReadingSession::open(&mut store, "bob", EXAMPLE_CHAPTER_ID, 3).unwrap();
    assert_eq!(session.document().chapter_title, "Mine");
    assert!(session.document().sections.is_empty());
}

#[test]
fn paging_rotates_prompts_and_clamps_to_bounds() {
    let mut store = Store::connect_with(&StoreConfig::in_memory());
    let mut session = ReadingSession::open(&mut store, "alice", "Chapter 6", 3).unwrap();
    assert_eq!(session.prompts().stage(), Sq3rStage::Survey);

    assert_eq!(session.next_page(), 1);
    assert_eq!(session.prompts().stage(), Sq3rStage::Read);
    assert_eq!(session.next_page(), 2);
    assert_eq!(session.prompts().stage(), Sq3rStage::Question);
    assert_eq!(session.next_page(), 2);
    assert_eq!(session.prompts().stage(), Sq3rStage::Question);

    assert_eq!(session.prev_page(), 1);
    assert_eq!(session.prompts().stage(), Sq3rStage::Read);
    assert_eq!(session.prev_page(), 0);
    assert_eq!(session.prompts().stage(), Sq3rStage::Survey);
    assert_eq!(session.prev_page(), 0);

    session.request_exit();
    assert_eq!(session.prompts().stage(), Sq3rStage::Review);
    assert!(!session.toggle_prompts());
    assert_eq!(session.prompts().current_prompt(), None);

    session.record_typing();
    assert_eq!(session.prompts().stage(), Sq3rStage::Recite);
    assert_eq!(
        session.prompts().current_prompt(),
        Some(Sq3rStage::Recite.prompt())
    );
}

#[test]
fn delete_section_applies_locally_and_in_store() {
    let mut store = Store::connect_with(&StoreConfig::in_memory());
    store
        .save_notes(
            "alice",
            &NoteDocument::new("Chapter 3", "Agile")
                .with_section("Scrum", "a")
                .with_section("XP", "b"),
        )
        .unwrap();

    {
        let mut session = ReadingSession::open(&mut store, "alice", "Chapter 3", 5).unwrap();
        assert_eq!(session.delete_section("Scrum").unwrap(), 1);
        assert_eq!(session.document().sections, vec![Section::new("XP", "b")]);
    }

    let stored = store.fetch_notes("alice", "Chapter 3").unwrap().unwrap();
    assert_eq!(stored.sections, vec![Section::new("XP", "b")]);
}

#[test]
fn offline_session_keeps_edits_but_refuses_to_save() {
    let mut store = Store::connect("mongodb://localhost:27017/", "active_reading_assistant");
    let mut session = ReadingSession::open(&mut store, "alice", "Chapter 2", 4).unwrap();
    assert!(!session.is_online());

    session.set_chapter_title("Offline");
    session.add_section("Draft", "kept in memory");
    assert_eq!(session.delete_section("Draft").unwrap(), 1);
    session.add_section("Draft", "again");

    assert!(matches!(session.save(), Err(StoreError::NotConnected)));
    assert_eq!(session.document().chapter_title, "Offline");
    assert_eq!(session.document().sections.len(), 1);
    session.close().unwrap();
}

#[test]
fn close_saves_when_online() {
    let mut store = Store::connect_with(&StoreConfig::in_memory());
    {
        let mut session = ReadingSession::open(&mut store, "alice", "Chapter 6", 2).unwrap();
        session.set_chapter_title("Architecture");
        session.add_section("Views", "4+1");
        assert_ne!(session.id(), uuid_nil());
        session.close().unwrap();
    }

    let saved = store.fetch_notes("alice", "Chapter 6").unwrap().unwrap();
    assert_eq!(saved.chapter_title, "Architecture");
    assert_eq!(saved.sections, vec![Section::new("Views", "4+1")]);
}

fn uuid_nil() -> uuid::Uuid {
    uuid::Uuid::nil()
}
