use std::collections::HashSet;
use std::path::PathBuf;

use rustkube::{KubeConfig, Merger, ScriptedPrompter};

fn fixture(name: &str) -> KubeConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    KubeConfig::read_from(path).unwrap()
}

fn assert_consistent(kc: &KubeConfig) {
    let clusters: HashSet<_> = kc.cluster_names().collect();
    let users: HashSet<_> = kc.user_names().collect();
    let contexts: HashSet<_> = kc.context_names().collect();
    assert_eq!(clusters.len(), kc.clusters.len(), "duplicate cluster in {clusters:?}");
    assert_eq!(users.len(), kc.users.len(), "duplicate user in {users:?}");
    assert_eq!(contexts.len(), kc.contexts.len(), "duplicate context in {contexts:?}");

    for ctx in &kc.contexts {
        assert!(clusters.contains(ctx.context.cluster.as_str()), "{} has no cluster", ctx.name);
        assert!(users.contains(ctx.context.user.as_str()), "{} has no user", ctx.name);
    }
}

#[test]
fn merges_several_sources_in_order() {
    let mut dst = fixture("home.yaml");
    let mut merger = Merger::new(ScriptedPrompter::new(["prod-a", "admin-a", "   ", "staging-b"]));

    for source in ["team-a.yaml", "team-b.yaml", "minikube.yaml"] {
        merger.merge(&mut dst, fixture(source)).unwrap();
    }

    assert_eq!(
        dst.cluster_names().collect::<Vec<_>>(),
        ["prod", "prod-a", "staging", "staging-b", "minikube"]
    );
    assert_eq!(
        dst.user_names().collect::<Vec<_>>(),
        ["admin", "admin-a", "eks", "minikube"]
    );
    assert_eq!(
        dst.context_names().collect::<Vec<_>>(),
        ["admin@prod", "admin-a@prod-a", "admin-a@staging", "eks@staging-b", "minikube"]
    );
    assert_eq!(dst.current_context, "admin@prod");
    assert_consistent(&dst);

    let prompter = merger.into_prompter();
    assert_eq!(prompter.asked().len(), 4);
    assert_eq!(prompter.remaining(), 0);
    // the blank answer re-asked about the same cluster
    assert_eq!(prompter.asked()[2], prompter.asked()[3]);
    assert!(prompter.asked()[3].starts_with("Cluster name 'staging'"));
}

#[test]
fn renamed_entries_keep_their_payload() {
    let mut dst = fixture("home.yaml");
    let mut merger = Merger::new(ScriptedPrompter::new(["prod-a", "admin-a"]));

    let report = merger.merge(&mut dst, fixture("team-a.yaml")).unwrap();

    assert_eq!(report.renames(), 4);
    assert_eq!(
        report.renamed_contexts.get("admin@prod").map(String::as_str),
        Some("admin-a@prod-a")
    );
    assert_eq!(dst.clusters[1].cluster.server, "https://team-a.example:6443");
    assert_eq!(dst.users[1].user.token.as_deref(), Some("dGVhbS1h"));
    assert_eq!(dst.contexts[1].context.namespace.as_deref(), Some("team-a"));
    assert_eq!(dst.contexts[1].context.cluster, "prod-a");
    assert_eq!(dst.contexts[1].context.user, "admin-a");
}

#[test]
fn merging_a_config_into_itself_stays_unique() {
    let mut dst = fixture("team-a.yaml");
    let mut merger = Merger::new(ScriptedPrompter::new(["prod2", "staging2", "admin2"]));

    merger.merge(&mut dst, fixture("team-a.yaml")).unwrap();

    assert_eq!(dst.clusters.len(), 4);
    assert_eq!(
        dst.context_names().collect::<Vec<_>>(),
        ["admin@prod", "admin@staging", "admin2@prod2", "admin2@staging2"]
    );
    assert_consistent(&dst);
}

#[test]
fn merged_config_survives_a_write() {
    let mut dst = fixture("home.yaml");
    let mut merger = Merger::new(ScriptedPrompter::default());
    merger.merge(&mut dst, fixture("team-b.yaml")).unwrap();
    merger.merge(&mut dst, fixture("minikube.yaml")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    dst.write_to(&path).unwrap();

    let reread = KubeConfig::read_from(&path).unwrap();
    assert_eq!(reread, dst);
    let exec = reread.users[1].user.exec.as_ref().unwrap();
    assert_eq!(exec.provide_cluster_info, Some(true));
    assert_eq!(
        reread.clusters[2].cluster.certificate_authority,
        Some(PathBuf::from("/home/dev/.minikube/ca.crt"))
    );
}
