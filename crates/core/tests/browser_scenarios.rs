mod common;

use common::{MockLookup, sample_hierarchy};
use schemascope_api::{BrowserError, LookupError, NodeId, SchemaNode};
use schemascope_core::{ExpandOutcome, SchemaBrowser};

fn browser(mock: MockLookup) -> (std::sync::Arc<MockLookup>, SchemaBrowser) {
    let (mock, service) = mock.into_service();
    (mock, SchemaBrowser::new(service, "Thing"))
}

fn fetched(name: &str, children: Vec<SchemaNode>) -> SchemaNode {
    SchemaNode {
        name: name.to_string(),
        has_children: !children.is_empty(),
        is_fetched: true,
        children,
    }
}

#[tokio::test]
async fn test_initialize_root_probes_children() {
    let (_, browser) = browser(sample_hierarchy());
    let tree = browser.initialize_root().await.unwrap();

    assert_eq!(
        tree.to_root_node(),
        fetched(
            "Thing",
            vec![
                SchemaNode::unfetched("Person", true),
                SchemaNode::unfetched("Place", false),
            ]
        )
    );
}

#[tokio::test]
async fn test_expand_splices_only_target() {
    let (_, browser) = browser(sample_hierarchy());
    let before = browser.initialize_root().await.unwrap();
    let person = before.find_by_name("Person")[0];
    let place = before.find_by_name("Place")[0];

    let result = browser.expand_node(person).await.unwrap();
    assert_eq!(result.outcome, ExpandOutcome::Expanded { added: 2 });

    let after = result.tree;
    assert_eq!(
        after.to_schema_node(person).unwrap(),
        fetched(
            "Person",
            vec![
                SchemaNode::unfetched("Athlete", false),
                SchemaNode::unfetched("Student", true),
            ]
        )
    );
    assert_eq!(
        after.to_schema_node(place),
        before.to_schema_node(place)
    );

    // The earlier snapshot is untouched
    assert!(before.children(person).is_empty());
    assert!(!before.node(person).unwrap().is_fetched);
}

#[tokio::test]
async fn test_expand_leaf_makes_no_calls() {
    let (mock, browser) = browser(sample_hierarchy());
    let tree = browser.initialize_root().await.unwrap();
    let place = tree.find_by_name("Place")[0];
    let calls = mock.total_calls();

    let result = browser.expand_node(place).await.unwrap();
    assert_eq!(result.outcome, ExpandOutcome::Leaf);
    assert!(result.tree.same_snapshot(&tree));
    assert_eq!(mock.total_calls(), calls);
}

#[tokio::test]
async fn test_expand_is_idempotent() {
    let (mock, browser) = browser(sample_hierarchy());
    let tree = browser.initialize_root().await.unwrap();
    let person = tree.find_by_name("Person")[0];

    let first = browser.expand_node(person).await.unwrap();
    let calls = mock.total_calls();
    let second = browser.expand_node(person).await.unwrap();

    assert_eq!(second.outcome, ExpandOutcome::AlreadyFetched);
    assert!(second.tree.same_snapshot(&first.tree));
    assert_eq!(second.tree.children(person).len(), 2);
    assert_eq!(mock.total_calls(), calls);
}

#[tokio::test]
async fn test_root_failure_stores_nothing() {
    let (_, browser) = browser(sample_hierarchy().failing("Thing"));

    let err = browser.initialize_root().await.unwrap_err();
    assert!(matches!(err, BrowserError::Lookup(LookupError::Transport(_))));
    assert!(!browser.is_initialized().await);
    assert!(matches!(
        browser.snapshot().await,
        Err(BrowserError::NotInitialized)
    ));
    assert!(matches!(
        browser.expand_node(NodeId(0)).await,
        Err(BrowserError::NotInitialized)
    ));
}

#[tokio::test]
async fn test_failed_expand_can_be_retried() {
    let (mock, browser) = browser(sample_hierarchy());
    let tree = browser.initialize_root().await.unwrap();
    let person = tree.find_by_name("Person")[0];

    mock.fail_times("Person", 1);
    let err = browser.expand_node(person).await.unwrap_err();
    assert!(matches!(err, BrowserError::Lookup(_)));

    let unchanged = browser.snapshot().await.unwrap();
    assert!(unchanged.same_snapshot(&tree));
    assert!(unchanged.node(person).unwrap().needs_fetch());

    let result = browser.expand_node(person).await.unwrap();
    assert_eq!(result.outcome, ExpandOutcome::Expanded { added: 2 });
}

#[tokio::test]
async fn test_probe_failure_marks_child_as_leaf() {
    let mock = MockLookup::new()
        .with_children("Thing", &["Y", "Z"])
        .with_children("Y", &["Y1"])
        .with_children("Z", &["Z1"])
        .failing("Z");
    let (_, browser) = browser(mock);

    let tree = browser.initialize_root().await.unwrap();
    let children: Vec<_> = tree
        .children(tree.root())
        .into_iter()
        .map(|c| tree.view(c).unwrap())
        .collect();

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].name, "Y");
    assert!(children[0].has_children);
    assert_eq!(children[1].name, "Z");
    assert!(!children[1].has_children);
}

#[tokio::test]
async fn test_probe_results_follow_each_child() {
    let (_, browser) = browser(sample_hierarchy());
    let tree = browser.initialize_root().await.unwrap();
    let person = tree.find_by_name("Person")[0];
    let tree = browser.expand_node(person).await.unwrap().tree;

    for child in tree.children(person) {
        let node = tree.node(child).unwrap();
        let expected = node.name() == "Student";
        assert_eq!(node.has_children, expected, "{}", node.name());
    }
}

#[tokio::test]
async fn test_fetched_flags_are_monotonic() {
    let (_, browser) = browser(sample_hierarchy());
    let tree = browser.initialize_root().await.unwrap();
    let person = tree.find_by_name("Person")[0];

    let tree = browser.expand_node(person).await.unwrap().tree;
    let student = tree.find_by_name("Student")[0];
    let tree = browser.expand_node(student).await.unwrap().tree;

    for id in [tree.root(), person, student] {
        assert!(tree.node(id).unwrap().is_fetched);
    }
    assert_eq!(tree.path(tree.find_by_name("Graduate")[0]).unwrap(), "/Thing/Person/Student/Graduate");
}

#[tokio::test]
async fn test_fetch_children_rejects_empty_name() {
    let (mock, browser) = browser(sample_hierarchy());
    let err = browser.fetch_children("").await.unwrap_err();
    assert!(matches!(err, LookupError::InvalidArgument(_)));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_expand_unknown_node() {
    let (_, browser) = browser(sample_hierarchy());
    browser.initialize_root().await.unwrap();
    let err = browser.expand_node(NodeId(999)).await.unwrap_err();
    assert_eq!(err, BrowserError::NodeNotFound(NodeId(999)));
}

#[tokio::test]
async fn test_expand_path() {
    let (_, browser) = browser(sample_hierarchy());
    browser.initialize_root().await.unwrap();

    let graduate = browser.expand_path("/Thing/Person/Student/Graduate").await.unwrap();
    let tree = browser.snapshot().await.unwrap();
    assert_eq!(tree.node(graduate).unwrap().name(), "Graduate");

    let same = browser.expand_path("Person/Student/Graduate").await.unwrap();
    assert_eq!(same, graduate);

    let err = browser.expand_path("/Person/Nobody").await.unwrap_err();
    assert_eq!(err, BrowserError::PathNotFound("/Person/Nobody".to_string()));
}

#[tokio::test]
async fn test_expand_to_depth() {
    let (_, browser) = browser(sample_hierarchy());
    let tree = browser.initialize_root().await.unwrap();
    let person = tree.find_by_name("Person")[0];

    // depth 1 only touches the node itself
    assert_eq!(browser.expand_to_depth(person, 1).await.unwrap(), 1);
    let tree = browser.snapshot().await.unwrap();
    let student = tree.find_by_name("Student")[0];
    assert!(tree.node(student).unwrap().needs_fetch());

    assert_eq!(browser.expand_to_depth(tree.root(), 3).await.unwrap(), 1);
    let tree = browser.snapshot().await.unwrap();
    assert!(tree.node(student).unwrap().is_fetched);
    assert_eq!(tree.find_by_name("Graduate").len(), 1);
}

#[tokio::test]
async fn test_expand_to_depth_skips_failures() {
    let mock = MockLookup::new()
        .with_children("Thing", &["A", "B"])
        .with_children("A", &["A1"])
        .with_children("B", &["B1"]);
    let (mock, browser) = browser(mock);
    let tree = browser.initialize_root().await.unwrap();
    let a = tree.find_by_name("A")[0];
    let b = tree.find_by_name("B")[0];

    mock.fail_times("A", 1);
    let expanded = browser.expand_to_depth(tree.root(), 2).await.unwrap();
    assert_eq!(expanded, 1);

    let tree = browser.snapshot().await.unwrap();
    assert!(tree.node(a).unwrap().needs_fetch());
    assert!(tree.node(b).unwrap().is_fetched);
}

#[tokio::test]
async fn test_reload_starts_a_new_session() {
    let (_, browser) = browser(sample_hierarchy());
    let first = browser.initialize_root().await.unwrap();
    let person = first.find_by_name("Person")[0];
    browser.expand_node(person).await.unwrap();

    let second = browser.initialize_root().await.unwrap();
    assert_ne!(first.session(), second.session());
    assert_eq!(second.node_count(), 3);
    assert!(second.node(person).unwrap().needs_fetch());
}
