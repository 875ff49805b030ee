use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use policy_core::{ResourceLabel, SampleSeries};
use policy_rules::engine::{PolicyEngine, Shutdown};
use policy_rules::loader::PolicyLoader;
use policy_rules::report::{JsonSink, TextSink};
use policy_rules::validation::validate_document;
use policy_store::MemoryStore;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/policy.yaml")
}

fn store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.insert(
        "vm.rx",
        vec![
            SampleSeries::new(ResourceLabel::with_sub_resource("instance-00000001", "tap0"), vec![12.0, 4096.0]),
            SampleSeries::new(ResourceLabel::with_sub_resource("instance-00000002", "tap1"), vec![0.0]),
        ],
    );
    store.insert(
        "vm.instance-00000001.tapd21acb51-35.tx",
        vec![SampleSeries::new(
            ResourceLabel::with_sub_resource("instance-00000001", "tapd21acb51-35"),
            vec![100.0, 750.0],
        )],
    );
    store.insert(
        "vm.tx",
        vec![
            SampleSeries::new(ResourceLabel::with_sub_resource("instance-00000001", "tap0"), vec![3.0]),
            SampleSeries::new(ResourceLabel::with_sub_resource("instance-00000002", "tap1"), vec![0.0, 0.0]),
        ],
    );
    Arc::new(store)
}

#[test]
fn fixture_validates_with_one_error() {
    let doc = PolicyLoader::new(fixture()).load().unwrap();
    let result = validate_document(&doc);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "groups[1].rules[0].expr");
}

#[tokio::test]
async fn tick_writes_text_reports() {
    let sink = Arc::new(TextSink::new(Vec::new()));
    let engine = PolicyEngine::from_loader(PolicyLoader::new(fixture()), store(), sink.clone()).unwrap();

    let summary = engine.run_tick(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).await;
    assert_eq!(summary.groups, 2);
    assert_eq!(summary.evaluated, 3);
    assert_eq!(summary.fired, 3);
    assert_eq!(summary.failed, 1);

    drop(engine);
    let out = Arc::try_unwrap(sink).ok().expect("sink still shared").into_inner();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "transmit: network[0] high_rx: [instance-00000001/tap0]\n\
         transmit: network[1] tap_tx: [instance-00000001/tapd21acb51-35]\n\
         transmit: sanity[1] quiet: [instance-00000002/tap1]\n"
    );
}

#[tokio::test]
async fn tick_writes_json_reports() {
    let sink = Arc::new(JsonSink::new(Vec::new()));
    let engine = PolicyEngine::from_loader(PolicyLoader::new(fixture()), store(), sink.clone()).unwrap();
    engine.run_tick(Utc::now()).await;

    drop(engine);
    let out = Arc::try_unwrap(sink).ok().expect("sink still shared").into_inner();
    let reports: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["group"], "network");
    assert_eq!(reports[0]["annotations"], serde_json::json!(["tenant-a", "traffic"]));
    assert_eq!(reports[2]["record"], "quiet");
    assert_eq!(reports[2]["labels"][0]["sub_resource_id"], "tap1");
}

#[tokio::test]
async fn run_loop_ticks_until_shutdown() {
    let sink = Arc::new(TextSink::new(Vec::new()));
    let engine = Arc::new(
        PolicyEngine::from_loader(PolicyLoader::new(fixture()), store(), sink.clone())
            .unwrap()
            .with_tick(Duration::from_millis(10)),
    );

    let shutdown = Shutdown::new();
    let handle = tokio::spawn({
        let engine = Arc::clone(&engine);
        let shutdown = shutdown.clone();
        async move { engine.run(shutdown).await }
    });

    tokio::time::sleep(Duration::from_millis(55)).await;
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("engine did not stop")
        .unwrap();

    drop(engine);
    let out = String::from_utf8(Arc::try_unwrap(sink).ok().expect("sink still shared").into_inner()).unwrap();
    // The sanity group has no interval, so it reports on every tick.
    let ticks = out.lines().filter(|l| l.starts_with("transmit: sanity[1] quiet")).count();
    assert!(ticks >= 2, "only {} ticks:\n{}", ticks, out);
    assert!(out.lines().all(|l| l.starts_with("transmit: ")));
}
