use barlo_catalog::{
    CatalogSource, Completion, InMemorySink, JsonDocumentSource, LookupConfig, LookupSession,
    RawRecord, SourceKind, StaticSource,
};
use barlo_core::{LookupError, ProductField, ViewKind};
use barlo_scanner::{ManualBackend, ManualTrigger};
use serde_json::json;

fn catalog_rows() -> Vec<RawRecord> {
    let value = json!([
        {
            "Artikel": "Coca-Cola 0.5l",
            "Barcode": 5449000131836u64,
            "Beschreibung": "PET Flasche",
            "Warenwert \npro Stk. [CHF]": 1.5
        },
        {
            "Artikel": "Café Crème",
            "Barcode": "7610000000011",
            "Beschreibung": "Kapseln, 10 Stk.",
            "Warenwert \npro Stk. [CHF]": "4.9"
        },
        {
            "Artikel": "Schraube M4",
            "Barcode": "123",
            "Beschreibung": "Edelstahl",
            "Warenwert \npro Stk. [CHF]": "1.50"
        },
        {
            "Artikel": "Kabelbinder",
            "Barcode": "9990001",
            "Beschreibung": "",
            "Warenwert \npro Stk. [CHF]": ""
        }
    ]);
    serde_json::from_value(value).unwrap()
}

async fn loaded_session() -> (LookupSession<ManualBackend>, ManualTrigger) {
    barlo_observability::init();

    let (backend, trigger) = ManualBackend::new();
    let mut session = LookupSession::new(&LookupConfig::default(), backend);
    let source = StaticSource::new(catalog_rows());
    assert_eq!(session.load(&source).await, Ok(Completion::Applied(4)));
    (session, trigger)
}

#[tokio::test]
async fn exact_barcode_lookup() {
    let (mut session, _) = loaded_session().await;

    let hits = session.set_barcode_query("5449000131836").to_vec();
    assert_eq!(hits.len(), 1);
    assert_eq!(session.display_price(&hits[0]), "CHF 1.50");

    assert!(session.set_barcode_query("5449000131837").is_empty());
    assert!(session.engine().no_results(ViewKind::Barcode));
}

#[tokio::test]
async fn article_search_ignores_accents_and_case() {
    let (mut session, _) = loaded_session().await;

    let hits = session.set_article_query("cafe");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].article, "Café Crème");

    assert_eq!(session.set_article_query("CRÈME").len(), 1);
    assert!(session.set_article_query("").is_empty());
}

#[tokio::test]
async fn unparseable_price_renders_placeholder() {
    let (mut session, _) = loaded_session().await;

    let hits = session.set_barcode_query("9990001").to_vec();
    assert_eq!(session.display_price(&hits[0]), "CHF –");
}

#[tokio::test]
async fn price_edit_is_saved_and_shown() {
    let (mut session, _) = loaded_session().await;
    let sink = InMemorySink::new();

    session.set_barcode_query("123");
    session.select(ViewKind::Barcode, 0).unwrap();
    session.update_field(ProductField::Price, "2.00").unwrap();

    assert_eq!(session.save(&sink).await, Ok(Completion::Applied(1)));

    let shown = session.engine().barcode_matches()[0].clone();
    assert_eq!(session.display_price(&shown), "CHF 2.00");
    let stored = session.store().find_by_barcode("123").next().unwrap().clone();
    assert_eq!(stored.price, "2.00");

    let (barcode, patch) = &sink.accepted()[0];
    assert_eq!(barcode, "123");
    assert_eq!(patch.price.as_deref(), Some("2.00"));

    // A fresh search reads the store, not the patched view.
    session.set_barcode_query("");
    let hits = session.set_barcode_query("123").to_vec();
    assert_eq!(hits.len(), 1);
    assert_eq!(session.display_price(&hits[0]), "CHF 2.00");
}

#[tokio::test]
async fn rejected_save_keeps_the_edit_open() {
    let (mut session, _) = loaded_session().await;
    let sink = InMemorySink::new();
    sink.set_rejection(Some("permission denied for table produkte".to_string()));

    session.set_barcode_query("123");
    let store_before = session.store().products().to_vec();
    let view_before = session.engine().barcode_matches().to_vec();

    session.select(ViewKind::Barcode, 0).unwrap();
    session.update_field(ProductField::Price, "2.00").unwrap();

    let err = session.save(&sink).await.unwrap_err();
    assert!(matches!(err, LookupError::SaveFailure(ref msg) if msg.contains("permission denied")));

    assert_eq!(session.edit_buffer().map(|p| p.price.as_str()), Some("2.00"));
    assert!(session.reconciler().is_editing());
    assert_eq!(session.store().products(), store_before.as_slice());
    assert_eq!(session.engine().barcode_matches(), view_before.as_slice());
    assert_eq!(session.display_price(&view_before[0]), "CHF 1.50");

    // Retry once the service accepts again.
    sink.set_rejection(None);
    assert_eq!(session.save(&sink).await, Ok(Completion::Applied(1)));
    assert_eq!(session.engine().barcode_matches()[0].price, "2.00");
}

#[tokio::test]
async fn description_edit_reaches_both_views() {
    let (mut session, _) = loaded_session().await;
    let sink = InMemorySink::new();

    session.set_barcode_query("7610000000011");
    session.set_article_query("café");
    session.select(ViewKind::Article, 0).unwrap();
    session
        .update_field(ProductField::Description, "Kapseln, 30 Stk.")
        .unwrap();
    session.save(&sink).await.unwrap();

    assert_eq!(
        session.engine().barcode_matches()[0].description,
        "Kapseln, 30 Stk."
    );
    assert_eq!(
        session.engine().article_matches()[0].description,
        "Kapseln, 30 Stk."
    );

    session.set_article_query("");
    let hits = session.set_article_query("creme").to_vec();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].description, "Kapseln, 30 Stk.");
    let hits = session.set_barcode_query("7610000000011").to_vec();
    assert_eq!(hits[0].description, "Kapseln, 30 Stk.");
}

#[tokio::test]
async fn table_sessions_map_patches_to_table_columns() {
    let config = LookupConfig {
        source: SourceKind::Table,
        ..LookupConfig::default()
    };
    let (backend, _) = ManualBackend::new();
    let mut session = LookupSession::new(&config, backend);
    let rows: Vec<RawRecord> = serde_json::from_value(json!([
        { "artikel": "Schraube M4", "barcode": "123", "beschreibung": "Edelstahl", "preis": "1.50" }
    ]))
    .unwrap();
    session.load(&StaticSource::new(rows)).await.unwrap();

    session.set_barcode_query("123");
    session.select(ViewKind::Barcode, 0).unwrap();
    session.update_field(ProductField::Price, "2.00").unwrap();
    let sink = InMemorySink::new();
    session.save(&sink).await.unwrap();

    let (_, patch) = &sink.accepted()[0];
    let row = session.field_mapping().patch_record(patch);
    assert_eq!(row.get("preis"), Some(&json!("2.00")));
    assert_eq!(row.get("artikel"), Some(&json!("Schraube M4")));
    assert!(!row.contains_key("price"));
}

#[tokio::test]
async fn cancelled_edit_writes_nothing() {
    let (mut session, _) = loaded_session().await;

    session.set_barcode_query("123");
    session.select(ViewKind::Barcode, 0).unwrap();
    session.update_field(ProductField::Article, "Mutter M4").unwrap();
    session.cancel_edit().unwrap();

    assert_eq!(session.edit_buffer(), None);
    assert_eq!(session.engine().barcode_matches()[0].article, "Schraube M4");
    assert!(matches!(
        session.save(&InMemorySink::new()).await,
        Err(LookupError::NotEditing)
    ));
}

#[tokio::test]
async fn scan_then_edit() {
    let (mut session, trigger) = loaded_session().await;

    session.activate_scanner().unwrap();
    assert!(trigger.emit("5449000131836"));
    assert_eq!(session.pump_scanner().as_deref(), Some("5449000131836"));
    assert_eq!(session.engine().barcode_matches().len(), 1);

    session.select(ViewKind::Barcode, 0).unwrap();
    assert_eq!(
        session.edit_buffer().map(|p| p.article.as_str()),
        Some("Coca-Cola 0.5l")
    );
}

#[tokio::test]
async fn json_document_source_reads_exported_file() {
    let path = std::env::temp_dir().join(format!("barlo-catalog-{}.json", std::process::id()));
    let text = serde_json::to_string(&catalog_rows()).unwrap();
    tokio::fs::write(&path, text).await.unwrap();

    let source = JsonDocumentSource::new(&path);
    let rows = source.fetch().await.unwrap();
    assert_eq!(rows.len(), 4);

    let (backend, _) = ManualBackend::new();
    let mut session = LookupSession::new(&LookupConfig::default(), backend);
    assert_eq!(session.load(&source).await, Ok(Completion::Applied(4)));
    assert_eq!(session.set_barcode_query("123").len(), 1);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn missing_document_is_a_load_failure() {
    let (mut session, _) = loaded_session().await;
    let source = JsonDocumentSource::new("/nonexistent/produkte.json");

    let err = session.load(&source).await.unwrap_err();
    assert!(matches!(err, LookupError::LoadFailure(ref msg) if msg.contains("produkte.json")));
    assert_eq!(session.store().len(), 4);
}
