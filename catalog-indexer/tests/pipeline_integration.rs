//! Integration tests for the sync pipeline.
//!
//! These tests use the real Orchestrator with the real detector, expander,
//! builder and indexer, but mock the catalog, checkpoint store, and search
//! engine behind their traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use catalog_indexer::builder::DocumentBuilder;
use catalog_indexer::detector::ChangeDetector;
use catalog_indexer::expander::ImpactExpander;
use catalog_indexer::indexer::BulkIndexer;
use catalog_indexer::orchestrator::{Orchestrator, OrchestratorConfig};
use catalog_indexer_repository::{
    BulkDocument, BulkItemFailure, BulkSummary, CatalogError, CatalogReader, ChangedRow,
    CheckpointError, CheckpointRepository, JoinedRow, RelationEdge, SearchIndexError,
    SearchIndexProvider,
};
use catalog_indexer_shared::{Checkpoint, EntityKind};

fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

fn joined_row(movie_id: Uuid) -> JoinedRow {
    JoinedRow {
        movie_id,
        title: "M1".to_string(),
        description: Some("A film".to_string()),
        rating: Some(8.0),
        movie_type: Some("movie".to_string()),
        created: ts(1),
        modified: ts(1),
        role: None,
        person_id: None,
        person_name: None,
        person_created: None,
        person_modified: None,
        genre_id: None,
        genre_name: None,
        genre_description: None,
        genre_created: None,
        genre_modified: None,
    }
}

/// Mock catalog. Change feeds honor the bound checkpoint the way the real
/// queries do, so detection against an advanced checkpoint comes up empty.
#[derive(Default)]
struct MockCatalog {
    movie_changes: Vec<ChangedRow>,
    genre_changes: Vec<ChangedRow>,
    person_changes: Vec<ChangedRow>,
    impacted: Vec<ChangedRow>,
    rows: Vec<JoinedRow>,
    impact_calls: AtomicUsize,
    row_calls: AtomicUsize,
}

#[async_trait]
impl CatalogReader for MockCatalog {
    async fn modified_since(
        &self,
        kind: EntityKind,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ChangedRow>, CatalogError> {
        let feed = match kind {
            EntityKind::Movie => &self.movie_changes,
            EntityKind::Genre => &self.genre_changes,
            EntityKind::Person => &self.person_changes,
        };
        Ok(feed
            .iter()
            .filter(|r| r.modified > since)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn impacted_movies(
        &self,
        _edge: RelationEdge,
        since: DateTime<Utc>,
        related_ids: &[Uuid],
    ) -> Result<Vec<ChangedRow>, CatalogError> {
        assert!(
            !related_ids.is_empty(),
            "impact query must never run with an empty id set"
        );
        self.impact_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .impacted
            .iter()
            .filter(|r| r.modified > since)
            .cloned()
            .collect())
    }

    async fn movie_rows(&self, movie_ids: &[Uuid]) -> Result<Vec<JoinedRow>, CatalogError> {
        self.row_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .iter()
            .filter(|r| movie_ids.contains(&r.movie_id))
            .cloned()
            .collect())
    }
}

/// Mock checkpoint store keeping the last saved state in memory.
#[derive(Default)]
struct MockCheckpoints {
    saved: Mutex<Option<Checkpoint>>,
    save_calls: AtomicUsize,
}

#[async_trait]
impl CheckpointRepository for MockCheckpoints {
    async fn load(&self) -> Result<Checkpoint, CheckpointError> {
        Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
    }

    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        *self.saved.lock().unwrap() = Some(checkpoint.clone());
        Ok(())
    }
}

/// Mock search engine recording every bulk page; optionally rejects one
/// document id per page like a mapping error would.
#[derive(Default)]
struct MockSearch {
    calls: Mutex<Vec<(String, Vec<BulkDocument>)>>,
    reject_id: Option<Uuid>,
}

impl MockSearch {
    fn rejecting(id: Uuid) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reject_id: Some(id),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchIndexProvider for MockSearch {
    async fn ensure_index_exists(
        &self,
        _index: &str,
        _settings: &serde_json::Value,
    ) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkSummary, SearchIndexError> {
        self.calls
            .lock()
            .unwrap()
            .push((index.to_string(), documents.to_vec()));

        let failures: Vec<BulkItemFailure> = documents
            .iter()
            .filter(|d| Some(d.id) == self.reject_id)
            .map(|d| BulkItemFailure {
                id: d.id.to_string(),
                reason: "mapper_parsing_exception".to_string(),
            })
            .collect();

        Ok(BulkSummary {
            total: documents.len(),
            indexed: documents.len() - failures.len(),
            failures,
        })
    }
}

fn orchestrator(
    catalog: Arc<MockCatalog>,
    search: Arc<MockSearch>,
    checkpoints: Arc<MockCheckpoints>,
) -> Orchestrator {
    Orchestrator::new(
        ChangeDetector::new(catalog.clone(), 100),
        ImpactExpander::new(catalog.clone()),
        DocumentBuilder::new(),
        BulkIndexer::new(search, 100),
        catalog,
        checkpoints,
        Checkpoint::new(),
        OrchestratorConfig {
            sync_interval: Duration::from_millis(10),
            ..OrchestratorConfig::default()
        },
    )
}

#[tokio::test]
async fn test_movie_flow_end_to_end() {
    let movie_id = Uuid::new_v4();
    let genre_id = Uuid::new_v4();
    let director_id = Uuid::new_v4();

    let mut row = joined_row(movie_id);
    row.role = Some("director".to_string());
    row.person_id = Some(director_id);
    row.person_name = Some("A. Director".to_string());
    row.person_created = Some(ts(1));
    row.person_modified = Some(ts(1));
    row.genre_id = Some(genre_id);
    row.genre_name = Some("Drama".to_string());
    row.genre_created = Some(ts(1));
    row.genre_modified = Some(ts(1));

    let catalog = Arc::new(MockCatalog {
        movie_changes: vec![ChangedRow {
            id: movie_id,
            modified: ts(1),
        }],
        rows: vec![row],
        ..MockCatalog::default()
    });
    let search = Arc::new(MockSearch::default());
    let checkpoints = Arc::new(MockCheckpoints::default());
    let mut orchestrator = orchestrator(catalog, search.clone(), checkpoints.clone());

    let summary = orchestrator.run_flow(EntityKind::Movie).await.unwrap();

    assert_eq!(summary.indexed, 1);
    assert_eq!(summary.failed(), 0);

    let calls = search.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (index, documents) = &calls[0];
    assert_eq!(index, "movies");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, movie_id);
    let source = &documents[0].source;
    assert_eq!(source["title"], "M1");
    assert_eq!(source["genres"][0]["id"], serde_json::json!(genre_id));
    assert_eq!(source["genres"][0]["name"], "Drama");
    assert_eq!(source["directors"][0]["name"], "A. Director");
    drop(calls);

    // Checkpoint committed to the row's modification time and persisted.
    assert_eq!(orchestrator.checkpoint().get(EntityKind::Movie), ts(1));
    assert_eq!(checkpoints.save_calls.load(Ordering::SeqCst), 1);
    let saved = checkpoints.saved.lock().unwrap().clone().unwrap();
    assert_eq!(saved.get(EntityKind::Movie), ts(1));
}

#[tokio::test]
async fn test_up_to_date_flows_short_circuit() {
    // No genre or person changes: both flows must stop after detection.
    let catalog = Arc::new(MockCatalog::default());
    let search = Arc::new(MockSearch::default());
    let checkpoints = Arc::new(MockCheckpoints::default());
    let mut orchestrator = orchestrator(catalog.clone(), search.clone(), checkpoints.clone());

    orchestrator.run_flow(EntityKind::Genre).await.unwrap();
    orchestrator.run_flow(EntityKind::Person).await.unwrap();

    assert_eq!(catalog.impact_calls.load(Ordering::SeqCst), 0);
    assert_eq!(catalog.row_calls.load(Ordering::SeqCst), 0);
    assert_eq!(search.call_count(), 0);
    assert_eq!(checkpoints.save_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_genre_flow_expands_to_movies_and_builds_genre_documents() {
    let movie_id = Uuid::new_v4();
    let genre_id = Uuid::new_v4();

    let mut row = joined_row(movie_id);
    row.genre_id = Some(genre_id);
    row.genre_name = Some("Drama".to_string());
    row.genre_description = Some("Serious stuff".to_string());
    row.genre_created = Some(ts(1));
    row.genre_modified = Some(ts(5));

    let catalog = Arc::new(MockCatalog {
        genre_changes: vec![ChangedRow {
            id: genre_id,
            modified: ts(5),
        }],
        impacted: vec![ChangedRow {
            id: movie_id,
            modified: ts(3),
        }],
        rows: vec![row],
        ..MockCatalog::default()
    });
    let search = Arc::new(MockSearch::default());
    let checkpoints = Arc::new(MockCheckpoints::default());
    let mut orchestrator = orchestrator(catalog.clone(), search.clone(), checkpoints.clone());

    let summary = orchestrator.run_flow(EntityKind::Genre).await.unwrap();

    assert_eq!(summary.indexed, 2);
    assert_eq!(catalog.impact_calls.load(Ordering::SeqCst), 1);

    let calls = search.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "movies");
    assert_eq!(calls[1].0, "genres");
    let genre_doc = &calls[1].1[0];
    assert_eq!(genre_doc.id, genre_id);
    assert_eq!(genre_doc.source["name"], "Drama");
    assert_eq!(genre_doc.source["movie_ids"][0], serde_json::json!(movie_id));
    drop(calls);

    // The genre checkpoint advances to the genre's own modification time.
    assert_eq!(orchestrator.checkpoint().get(EntityKind::Genre), ts(5));
    assert_eq!(orchestrator.checkpoint().get(EntityKind::Movie), Checkpoint::sentinel());
}

#[tokio::test]
async fn test_partial_bulk_failure_still_commits() {
    let rejected = Uuid::new_v4();
    let mut movie_changes = Vec::new();
    let mut rows = Vec::new();
    for i in 1..=5 {
        let id = if i == 3 { rejected } else { Uuid::new_v4() };
        movie_changes.push(ChangedRow {
            id,
            modified: ts(i),
        });
        rows.push(joined_row(id));
    }

    let catalog = Arc::new(MockCatalog {
        movie_changes,
        rows,
        ..MockCatalog::default()
    });
    let search = Arc::new(MockSearch::rejecting(rejected));
    let checkpoints = Arc::new(MockCheckpoints::default());
    let mut orchestrator = orchestrator(catalog, search, checkpoints.clone());

    let summary = orchestrator.run_flow(EntityKind::Movie).await.unwrap();

    assert_eq!(summary.total, 5);
    assert_eq!(summary.indexed, 4);
    assert_eq!(summary.failed(), 1);

    // The flow proceeded to commit despite the rejected document.
    assert_eq!(orchestrator.checkpoint().get(EntityKind::Movie), ts(5));
    assert_eq!(checkpoints.save_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_second_tick_is_idempotent_and_monotonic() {
    let movie_id = Uuid::new_v4();
    let catalog = Arc::new(MockCatalog {
        movie_changes: vec![ChangedRow {
            id: movie_id,
            modified: ts(2),
        }],
        rows: vec![joined_row(movie_id)],
        ..MockCatalog::default()
    });
    let search = Arc::new(MockSearch::default());
    let checkpoints = Arc::new(MockCheckpoints::default());
    let mut orchestrator = orchestrator(catalog, search.clone(), checkpoints.clone());

    orchestrator.run_tick().await;
    let after_first = orchestrator.checkpoint().get(EntityKind::Movie);
    let calls_after_first = search.call_count();

    orchestrator.run_tick().await;

    // Nothing changed at the source: no new bulk calls, no checkpoint
    // movement, no extra commit.
    assert_eq!(after_first, ts(2));
    assert_eq!(orchestrator.checkpoint().get(EntityKind::Movie), ts(2));
    assert_eq!(search.call_count(), calls_after_first);
    assert_eq!(checkpoints.save_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_changed_genre_with_no_impacted_movies_still_advances() {
    // A genre changed but no movie past the checkpoint references it: the
    // flow indexes nothing, yet the genre checkpoint must advance or the
    // same delta would be re-scanned forever.
    let genre_id = Uuid::new_v4();
    let catalog = Arc::new(MockCatalog {
        genre_changes: vec![ChangedRow {
            id: genre_id,
            modified: ts(4),
        }],
        ..MockCatalog::default()
    });
    let search = Arc::new(MockSearch::default());
    let checkpoints = Arc::new(MockCheckpoints::default());
    let mut orchestrator = orchestrator(catalog.clone(), search.clone(), checkpoints.clone());

    let summary = orchestrator.run_flow(EntityKind::Genre).await.unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(catalog.impact_calls.load(Ordering::SeqCst), 1);
    assert_eq!(search.call_count(), 0);
    assert_eq!(orchestrator.checkpoint().get(EntityKind::Genre), ts(4));
    assert_eq!(checkpoints.save_calls.load(Ordering::SeqCst), 1);
}
