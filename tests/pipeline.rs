//! End-to-end tests of the ingestion pipeline against an on-disk database.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use newsroll::aggregate::PaperAggregator;
use newsroll::binder::PersistenceBinder;
use newsroll::config::{CountPolicy, IngestConfig};
use newsroll::registry::ObjectTypeRegistry;
use newsroll::scanner;
use newsroll::store::{SqliteStore, Store};
use newsroll::types::{LabelCounts, NewNewspaper, Newspaper, PubDate};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    store: SqliteStore,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = SqliteStore::new(dir.path().join("newsroll.db")).expect("failed to open store");
        store.initialize().expect("failed to initialize store");
        Self { dir, store }
    }

    fn paper_root(&self) -> PathBuf {
        self.dir.path().join("decompressed").join("WaPo")
    }

    fn archive(&self, name: &str, articles: &[(&str, &str)]) -> PathBuf {
        let dir = self.paper_root().join(name);
        fs::create_dir_all(&dir).unwrap();
        for (i, (object_type, date)) in articles.iter().enumerate() {
            let xml = format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Record>\n  <RecordID>{i}</RecordID>\n  \
                 <ObjectType>{object_type}</ObjectType>\n  <NumericPubDate>{date}</NumericPubDate>\n</Record>\n"
            );
            fs::write(dir.join(format!("{name}_{i:04}.xml")), xml).unwrap();
        }
        dir
    }

    fn register(&self) -> Newspaper {
        PersistenceBinder::new(&self.store, CountPolicy::default())
            .register_newspaper(&NewNewspaper {
                paper_identifier: "WaPo".to_string(),
                start_year: 2010,
                end_year: 2012,
                compressed_folder_path: Some(self.dir.path().join("compressed").join("WaPo")),
                uncompressed_folder_path: Some(self.paper_root()),
                ..NewNewspaper::default()
            })
            .unwrap()
            .into_inner()
    }
}

fn counts(pairs: &[(&str, i64)]) -> LabelCounts {
    pairs.iter().map(|(l, c)| (l.to_string(), *c)).collect()
}

fn item_counts(store: &SqliteStore, archive_id: i64) -> Vec<i64> {
    let mut counts: Vec<i64> = store
        .list_archive_type_counts(archive_id)
        .unwrap()
        .iter()
        .map(|r| r.item_count)
        .collect();
    counts.sort_unstable();
    counts
}

#[test]
fn scan_then_bind_archive() {
    let fx = Fixture::new();
    let dir = fx.archive(
        "A1",
        &[
            ("Advertisement", "20100101"),
            ("Article", "20100102"),
            ("Advertisement", "20100103"),
        ],
    );
    let paper = fx.register();

    let scan = scanner::scan(&dir).unwrap();
    assert_eq!(scan.label_counts, counts(&[("Advertisement", 2), ("Article", 1)]));
    assert_eq!(scan.min_date, PubDate::from_numeric(20100101));
    assert_eq!(scan.max_date, PubDate::from_numeric(20100103));

    let mut binder = PersistenceBinder::new(&fx.store, CountPolicy::default());
    let bound = binder
        .bind_archive_counts(&paper, "A1", Some(&dir), &scan)
        .unwrap();

    assert_eq!(fx.store.list_archives(paper.id).unwrap().len(), 1);
    assert_eq!(item_counts(&fx.store, bound.archive.id), vec![1, 2]);
    assert_eq!(bound.archive.start_date, NaiveDate::from_ymd_opt(2010, 1, 1));
    assert_eq!(bound.archive.end_date, NaiveDate::from_ymd_opt(2010, 1, 3));
    assert_eq!(
        bound.archive.compressed_file_path,
        Some(fx.dir.path().join("compressed").join("WaPo").join("A1.zip"))
    );

    let before = fx.store.count_rows().unwrap();
    binder
        .bind_archive_counts(&paper, "A1", Some(&dir), &scan)
        .unwrap();
    assert_eq!(fx.store.count_rows().unwrap(), before);
}

#[test]
fn process_newspaper_end_to_end() {
    let fx = Fixture::new();
    fx.archive("WaPo_2011", &[("Article", "20111231"), ("Editorial", "20111230")]);
    fx.archive(
        "WaPo_2012",
        &[("Article", "20120101"), ("Article", "20120615"), ("Advertisement", "20120301")],
    );
    let broken = fx.archive("WaPo_2013", &[("Article", "20130101")]);
    fs::write(broken.join("corrupt.xml"), "<Record><ObjectType>Article").unwrap();
    let paper = fx.register();

    let mut aggregator = PaperAggregator::new(&fx.store, CountPolicy::default());
    let summary = aggregator.process_newspaper(&paper).unwrap();

    assert_eq!(
        summary.label_counts,
        counts(&[("Advertisement", 1), ("Article", 4), ("Editorial", 1)])
    );
    assert_eq!(summary.archives.len(), 3);
    assert_eq!(summary.archives[2].stats.failures.len(), 1);
    assert!(summary.failed_archives.is_empty());

    let archives = fx.store.list_archives(paper.id).unwrap();
    let wapo_2012 = archives
        .iter()
        .find(|a| a.archive_identifier == "WaPo_2012")
        .unwrap();
    assert_eq!(wapo_2012.start_date, NaiveDate::from_ymd_opt(2012, 1, 1));
    assert_eq!(wapo_2012.end_date, NaiveDate::from_ymd_opt(2012, 6, 15));

    let mut paper_counts: Vec<i64> = fx
        .store
        .list_paper_type_counts(paper.id)
        .unwrap()
        .iter()
        .map(|r| r.item_count)
        .collect();
    paper_counts.sort_unstable();
    assert_eq!(paper_counts, vec![1, 1, 4]);

    let registry = ObjectTypeRegistry::new(&fx.store);
    assert_eq!(
        registry.all_raw_values().unwrap(),
        vec!["Advertisement", "Article", "Editorial"]
    );
}

#[test]
fn synonyms_resolve_to_canonical_type() {
    let fx = Fixture::new();
    fx.archive("A1", &[("Article", "20100101")]);
    fx.archive("A2", &[("Feature Article", "20100102"), ("Article", "20100103")]);
    let paper = fx.register();

    let mut registry = ObjectTypeRegistry::new(&fx.store);
    registry.resolve("Article").unwrap();
    registry.alias("Feature Article", "Article").unwrap();

    let mut aggregator = PaperAggregator::new(&fx.store, CountPolicy::default());
    let summary = aggregator.process_newspaper(&paper).unwrap();

    // Both labels land on one type, so one paper row holds their sum.
    assert_eq!(summary.report.created, 1);
    assert_eq!(summary.report.kept, 0);
    let paper_rows = fx.store.list_paper_type_counts(paper.id).unwrap();
    assert_eq!(paper_rows.len(), 1);
    assert_eq!(paper_rows[0].item_count, 3);
    assert_eq!(fx.store.list_object_types().unwrap().len(), 1);

    let archive = &fx.store.find_archives(paper.id, "A2").unwrap()[0];
    let rows = fx.store.list_archive_type_counts(archive.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item_count, 2);
}

#[test]
fn refresh_policy_from_config() {
    let fx = Fixture::new();
    let mut config = IngestConfig::load(fx.dir.path()).unwrap();
    config.refresh_counts = true;
    config.save().unwrap();
    let config = IngestConfig::load(fx.dir.path()).unwrap();
    assert_eq!(config.count_policy(), CountPolicy::Refresh);

    let dir = fx.archive("A1", &[("Article", "20100101")]);
    let paper = fx.register();

    let mut aggregator = PaperAggregator::new(&fx.store, config.count_policy());
    aggregator.process_newspaper(&paper).unwrap();

    fs::write(
        dir.join("extra.xml"),
        "<Record><ObjectType>Article</ObjectType><NumericPubDate>20100105</NumericPubDate></Record>",
    )
    .unwrap();
    aggregator.reset_cache();
    let summary = aggregator.process_newspaper(&paper).unwrap();

    assert_eq!(summary.report.refreshed, 1);
    let rows = fx.store.list_paper_type_counts(paper.id).unwrap();
    assert_eq!(rows[0].item_count, 2);
    let archive = &fx.store.find_archives(paper.id, "A1").unwrap()[0];
    assert_eq!(item_counts(&fx.store, archive.id), vec![2]);
}

#[test]
fn reopened_store_keeps_data() {
    let fx = Fixture::new();
    fx.archive("A1", &[("Article", "20100101")]);
    let paper = fx.register();
    PaperAggregator::new(&fx.store, CountPolicy::default())
        .process_newspaper(&paper)
        .unwrap();

    let path: &Path = fx.dir.path();
    let reopened = SqliteStore::new(path.join("newsroll.db")).unwrap();
    reopened.initialize().unwrap();

    let counts = reopened.count_rows().unwrap();
    assert_eq!(counts.newspapers, 1);
    assert_eq!(counts.archives, 1);
    assert_eq!(counts.newspaper_object_types, 1);
}
