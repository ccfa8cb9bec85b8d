//! Integration tests for the sync engine against an in-memory store

mod common;

use common::MemoryStore;
use docsync_core::{FolderRef, ItemId, ResourceKind, Role};
use docsync_engine::{
    BatchProgress, DocumentSync, FolderChainResolver, LocalLayout, PathSpec, ShareOutcome,
    SyncError, SyncOptions, TransferScheduler, TreeEnumerator, DEFAULT_BATCH_SIZE,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn segs(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn options(documents: &Path) -> SyncOptions {
    SyncOptions {
        batch_size: DEFAULT_BATCH_SIZE,
        documents_dir: documents.to_path_buf(),
    }
}

// ============================================================================
// Folder chain
// ============================================================================

mod chain {
    use super::*;

    #[tokio::test]
    async fn test_creates_missing_folders_in_order() {
        let store = MemoryStore::new();
        let resolver = FolderChainResolver::new(&store);

        let chain = resolver
            .resolve(FolderRef::home(), &segs(&["a", "b", "c"]), true)
            .await
            .unwrap();

        assert_eq!(store.created_folders(), segs(&["a", "b", "c"]));
        assert_eq!(chain.path(), segs(&["a", "b", "c"]));
        assert_eq!(chain.created().count(), 3);

        // each folder sits under the previous one
        let leaf = store.lookup(&ItemId::home(), &["a", "b", "c"]).unwrap();
        assert_eq!(chain.leaf().id, leaf);
    }

    #[tokio::test]
    async fn test_rerun_creates_nothing() {
        let store = MemoryStore::new();
        let resolver = FolderChainResolver::new(&store);
        let path = segs(&["a", "b", "c"]);

        let first = resolver.resolve(FolderRef::home(), &path, true).await.unwrap();
        let second = resolver.resolve(FolderRef::home(), &path, true).await.unwrap();

        assert_eq!(store.created_folders().len(), 3);
        assert_eq!(second.created().count(), 0);
        assert_eq!(first.leaf().id, second.leaf().id);
    }

    #[tokio::test]
    async fn test_missing_segment_names_first_missing() {
        let store = MemoryStore::new();
        let a = store.add_folder(&ItemId::home(), "a");
        store.add_folder(&a, "b");
        let resolver = FolderChainResolver::new(&store);

        let err = resolver
            .resolve(FolderRef::home(), &segs(&["a", "x", "y"]), false)
            .await
            .unwrap_err();

        match err {
            SyncError::FolderNotFound { segment, path } => {
                assert_eq!(segment, "x");
                assert_eq!(path, "a/x/y");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.created_folders().is_empty());
    }

    #[tokio::test]
    async fn test_empty_chain_is_root() {
        let store = MemoryStore::new();
        let resolver = FolderChainResolver::new(&store);

        let chain = resolver.resolve(FolderRef::home(), &[], false).await.unwrap();
        assert!(chain.leaf().is_root);
        assert_eq!(chain.leaf().id, ItemId::home());
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_root_for_scoped_path() {
        let store = MemoryStore::new();
        let site = store.add_resource(ResourceKind::Site, "mySite");
        let resolver = FolderChainResolver::new(&store);

        let root = resolver
            .resolve_root(&PathSpec::parse("site:mySite/images").unwrap())
            .await
            .unwrap();
        assert_eq!(root.id, site);
        assert!(root.is_root);

        let err = resolver
            .resolve_root(&PathSpec::parse("theme:Missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::ResourceNotFound { kind: ResourceKind::Theme, .. }
        ));
        assert_eq!(err.to_string(), "invalid theme Missing");
    }

    #[tokio::test]
    async fn test_failed_creation_aborts_chain() {
        let store = MemoryStore::new();
        store.fail_folder_creation("b");
        let resolver = FolderChainResolver::new(&store);

        let result = resolver
            .resolve(FolderRef::home(), &segs(&["a", "b", "c"]), true)
            .await;

        assert!(matches!(result, Err(SyncError::Store(_))));
        assert_eq!(store.created_folders(), segs(&["a"]));
    }
}

// ============================================================================
// Tree enumeration
// ============================================================================

mod tree {
    use super::*;

    #[tokio::test]
    async fn test_counts_files_at_every_depth() {
        let store = MemoryStore::new();
        let root = store.add_folder(&ItemId::home(), "root");
        store.add_file(&root, "top.txt", b"1");
        let x = store.add_folder(&root, "x");
        store.add_file(&x, "x1.txt", b"2");
        store.add_file(&x, "x2.txt", b"3");
        let deep = store.add_folder(&x, "deep");
        store.add_file(&deep, "d.txt", b"4");
        let y = store.add_folder(&root, "y");
        store.add_file(&y, "x1.txt", b"5");
        store.add_folder(&root, "empty");
        store.add_other(&root, "link", "url");

        let files = TreeEnumerator::new(&store).enumerate(&root, &[]).await.unwrap();

        assert_eq!(files.len(), 5);
        // own files first
        assert_eq!(files[0].relative_path(), "top.txt");

        let mut paths: Vec<String> = files.iter().map(|f| f.relative_path()).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec!["top.txt", "x/deep/d.txt", "x/x1.txt", "x/x2.txt", "y/x1.txt"]
        );
    }

    #[tokio::test]
    async fn test_paths_start_from_given_prefix() {
        let store = MemoryStore::new();
        let root = store.add_folder(&ItemId::home(), "root");
        let sub = store.add_folder(&root, "sub");
        store.add_file(&sub, "a.txt", b"a");

        let files = TreeEnumerator::new(&store)
            .enumerate(&root, &segs(&["base"]))
            .await
            .unwrap();
        assert_eq!(files[0].remote_folder_path, segs(&["base", "sub"]));
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let store = MemoryStore::new();
        let result = TreeEnumerator::new(&store)
            .enumerate(&ItemId::new("missing"), &[])
            .await;
        assert!(result.is_err());
    }
}

// ============================================================================
// Batch scheduling
// ============================================================================

mod scheduler {
    use super::*;

    #[tokio::test]
    async fn test_download_runs_in_bounded_groups() {
        let store = MemoryStore::new();
        let root = store.add_folder(&ItemId::home(), "root");
        for i in 0..40 {
            store.add_file(&root, &format!("f{i:02}.txt"), format!("{i}").as_bytes());
        }
        let files = TreeEnumerator::new(&store).enumerate(&root, &[]).await.unwrap();
        let temp = TempDir::new().unwrap();
        let layout = LocalLayout::new(temp.path());

        let mut ticks: Vec<BatchProgress> = Vec::new();
        let report = TransferScheduler::new(&store, DEFAULT_BATCH_SIZE)
            .download(&files, &layout, |tick| ticks.push(tick))
            .await
            .unwrap();

        assert_eq!(report.succeeded.len(), 40);
        assert!(report.failed.is_empty());
        assert_eq!(ticks.len(), 3);
        assert_eq!(
            ticks.iter().map(|t| t.completed).collect::<Vec<_>>(),
            vec![16, 32, 40]
        );
        assert!(ticks.iter().all(|t| t.groups == 3 && t.total == 40));
        assert_eq!(store.max_concurrent_reads(), DEFAULT_BATCH_SIZE);
        assert_eq!(fs::read(temp.path().join("f07.txt")).unwrap(), b"7");
    }

    #[tokio::test]
    async fn test_small_batch_limit() {
        let store = MemoryStore::new();
        let root = store.add_folder(&ItemId::home(), "root");
        for i in 0..7 {
            store.add_file(&root, &format!("{i}.bin"), &[i as u8]);
        }
        let files = TreeEnumerator::new(&store).enumerate(&root, &[]).await.unwrap();
        let temp = TempDir::new().unwrap();

        let mut groups = 0;
        TransferScheduler::new(&store, 3)
            .download(&files, &LocalLayout::new(temp.path()), |_| groups += 1)
            .await
            .unwrap();

        assert_eq!(groups, 3);
        assert!(store.max_concurrent_reads() <= 3);
    }

    #[tokio::test]
    async fn test_failed_read_does_not_stop_batch() {
        let store = MemoryStore::new();
        let root = store.add_folder(&ItemId::home(), "root");
        store.add_file(&root, "ok1.txt", b"1");
        let bad = store.add_file(&root, "bad.txt", b"2");
        store.add_file(&root, "ok2.txt", b"3");
        store.fail_reads_of(&bad);

        let files = TreeEnumerator::new(&store).enumerate(&root, &[]).await.unwrap();
        let temp = TempDir::new().unwrap();
        let report = TransferScheduler::new(&store, DEFAULT_BATCH_SIZE)
            .download(&files, &LocalLayout::new(temp.path()), |_| {})
            .await
            .unwrap();

        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].item, "bad.txt");
        assert!(report.is_success());
        assert!(!temp.path().join("bad.txt").exists());
    }

    #[tokio::test]
    async fn test_fatal_error_stops_download() {
        let store = MemoryStore::new();
        let root = store.add_folder(&ItemId::home(), "root");
        for i in 0..40 {
            store.add_file(&root, &format!("f{i:02}.txt"), b"x");
        }
        let files = TreeEnumerator::new(&store).enumerate(&root, &[]).await.unwrap();
        store.deny_reads();

        let temp = TempDir::new().unwrap();
        let mut ticks = 0;
        let calls_before = store.calls();
        let result = TransferScheduler::new(&store, DEFAULT_BATCH_SIZE)
            .download(&files, &LocalLayout::new(temp.path()), |_| ticks += 1)
            .await;

        let err = result.unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(ticks, 0);
        // only the first group was attempted
        assert_eq!(store.calls() - calls_before, DEFAULT_BATCH_SIZE);
    }

    #[tokio::test]
    async fn test_upload_groups_create_folder_once() {
        let store = MemoryStore::new();
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.txt"), b"b").unwrap();
        fs::write(temp.path().join("sub/c.txt"), b"c").unwrap();

        let files = docsync_engine::layout::collect_files(temp.path()).unwrap();
        let groups = docsync_engine::layout::group_files(temp.path(), &files).unwrap();
        assert_eq!(groups.len(), 2);

        let resolver = FolderChainResolver::new(&store);
        let report = TransferScheduler::new(&store, DEFAULT_BATCH_SIZE)
            .upload(&groups, &resolver, &FolderRef::home(), &segs(&["dest"]), |_| {})
            .await
            .unwrap();

        assert_eq!(report.files.succeeded.len(), 3);
        assert_eq!(store.created_folders(), segs(&["dest", "sub"]));
        assert_eq!(report.created_folders.len(), 2);

        let b = store.lookup(&ItemId::home(), &["dest", "sub", "b.txt"]).unwrap();
        assert_eq!(store.data_of(&b), b"b");
    }

    #[tokio::test]
    async fn test_upload_group_with_failed_folder() {
        let store = MemoryStore::new();
        store.fail_folder_creation("broken");
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(temp.path().join("broken")).unwrap();
        fs::write(temp.path().join("broken/b.txt"), b"b").unwrap();
        fs::create_dir(temp.path().join("fine")).unwrap();
        fs::write(temp.path().join("fine/c.txt"), b"c").unwrap();

        let files = docsync_engine::layout::collect_files(temp.path()).unwrap();
        let groups = docsync_engine::layout::group_files(temp.path(), &files).unwrap();

        let resolver = FolderChainResolver::new(&store);
        let report = TransferScheduler::new(&store, DEFAULT_BATCH_SIZE)
            .upload(&groups, &resolver, &FolderRef::home(), &[], |_| {})
            .await
            .unwrap();

        assert_eq!(report.files.succeeded.len(), 2);
        assert_eq!(report.files.failed.len(), 1);
        assert_eq!(report.files.failed[0].item, "broken/b.txt");
        assert!(store.lookup(&ItemId::home(), &["fine", "c.txt"]).is_some());
    }
}

// ============================================================================
// Command operations
// ============================================================================

mod ops {
    use super::*;

    #[tokio::test]
    async fn test_delete_root_is_rejected_without_remote_calls() {
        let store = MemoryStore::new();
        let sync = DocumentSync::new(&store, SyncOptions::default());

        let err = sync.delete_folder("/").await.unwrap_err();
        assert!(matches!(err, SyncError::NoFolderSpecified));
        assert_eq!(err.to_string(), "no folder specified");
        assert_eq!(store.calls(), 0);

        let err = sync.delete_folder("site:").await.unwrap_err();
        assert!(matches!(err, SyncError::MissingResourceName(ResourceKind::Site)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_then_delete_folder() {
        let store = MemoryStore::new();
        let sync = DocumentSync::new(&store, SyncOptions::default());

        let chain = sync.create_folder("projects/2024").await.unwrap();
        assert_eq!(chain.created().count(), 2);

        let deleted = sync.delete_folder("/projects/2024/").await.unwrap();
        assert_eq!(deleted.id, chain.leaf().id);
        assert_eq!(store.deleted(), vec![chain.leaf().id.clone()]);
        assert!(store.children_of(&ItemId::home()).contains(&"projects".to_string()));

        let missing = sync.delete_folder("projects/2024").await.unwrap_err();
        assert!(matches!(missing, SyncError::FolderNotFound { .. }));
    }

    #[tokio::test]
    async fn test_download_file_default_layout() {
        let store = MemoryStore::new();
        let site = store.add_resource(ResourceKind::Site, "mySite");
        let images = store.add_folder(&site, "images");
        store.add_file(&images, "banner.png", b"PNG");

        let project = TempDir::new().unwrap();
        let documents = project.path().join("documents");
        let sync = DocumentSync::new(&store, options(&documents));

        let download = sync
            .download_file("site:mySite/images/banner.png", None)
            .await
            .unwrap();

        let expected = documents.join("mySite/images/banner.png");
        assert_eq!(download.file.local_path, expected);
        assert_eq!(fs::read(&expected).unwrap(), b"PNG");
        assert_eq!(download.source, "Sites > mySite > images");
    }

    #[tokio::test]
    async fn test_download_file_errors() {
        let store = MemoryStore::new();
        store.add_resource(ResourceKind::Site, "mySite");
        let temp = TempDir::new().unwrap();
        let sync = DocumentSync::new(&store, options(temp.path()));

        let err = sync
            .download_file("site:mySite/images/banner.png", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::FolderNotFound { ref segment, .. } if segment == "images"));

        let err = sync.download_file("site:mySite/none.txt", None).await.unwrap_err();
        assert!(matches!(err, SyncError::FileNotFound(_)));

        let calls = store.calls();
        let err = sync
            .download_file("a.txt", Some(&temp.path().join("missing")))
            .await
            .unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(store.calls(), calls);
    }

    #[tokio::test]
    async fn test_upload_file_versions() {
        let store = MemoryStore::new();
        let docs = store.add_folder(&ItemId::home(), "docs");
        let temp = TempDir::new().unwrap();
        let local = temp.path().join("notes.txt");
        fs::write(&local, b"v1").unwrap();

        let sync = DocumentSync::new(&store, SyncOptions::default());
        let first = sync.upload_file(&local, "docs").await.unwrap();
        assert_eq!(first.created.version, "1");
        assert_eq!(first.target, "Documents > docs");

        fs::write(&local, b"v2").unwrap();
        let second = sync.upload_file(&local, "docs").await.unwrap();
        assert_eq!(second.created.version, "2");
        assert_eq!(second.created.id, first.created.id);

        let id = store.lookup(&docs, &["notes.txt"]).unwrap();
        assert_eq!(store.data_of(&id), b"v2");
        assert_eq!(store.version_of(&id), 2);

        let err = sync.upload_file(&local, "missing").await.unwrap_err();
        assert!(matches!(err, SyncError::FolderNotFound { .. }));
        assert!(store.lookup(&ItemId::home(), &["missing"]).is_none());

        let calls = store.calls();
        let err = sync
            .upload_file(&temp.path().join("nope.txt"), "docs")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidLocalPath { .. }));
        assert_eq!(store.calls(), calls);
    }

    #[tokio::test]
    async fn test_download_then_upload_round_trip() {
        let store = MemoryStore::new();
        let source = store.add_folder(&ItemId::home(), "source");
        store.add_file(&source, "readme.md", b"# hi");
        let img = store.add_folder(&source, "img");
        store.add_file(&img, "logo.svg", b"<svg/>");
        let icons = store.add_folder(&img, "icons");
        store.add_file(&icons, "x.ico", b"ICO");

        let temp = TempDir::new().unwrap();
        let sync = DocumentSync::new(&store, options(&temp.path().join("documents")));

        let download = sync.download_folder("source", None, |_| {}).await.unwrap();
        assert_eq!(download.report.succeeded.len(), 3);
        assert_eq!(download.target, temp.path().join("documents/source"));

        let upload = sync
            .upload_folder(&download.target, "copy/", true, |_| {})
            .await
            .unwrap();
        assert_eq!(upload.report.files.succeeded.len(), 3);
        assert!(upload.report.is_success());

        let copy = store.lookup(&ItemId::home(), &["copy"]).unwrap();
        let x = store.lookup(&copy, &["img", "icons", "x.ico"]).unwrap();
        assert_eq!(store.data_of(&x), b"ICO");
        assert!(store.lookup(&copy, &["readme.md"]).is_some());
        assert!(store.lookup(&copy, &["img", "logo.svg"]).is_some());
    }

    #[tokio::test]
    async fn test_upload_folder_includes_directory_name() {
        let store = MemoryStore::new();
        let site = store.add_resource(ResourceKind::Site, "mySite");
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("assets");
        fs::create_dir_all(assets.join("css")).unwrap();
        fs::write(assets.join("css/site.css"), b"body{}").unwrap();

        let sync = DocumentSync::new(&store, SyncOptions::default());
        let upload = sync
            .upload_folder(&assets, "site:mySite/static", false, |_| {})
            .await
            .unwrap();

        assert_eq!(upload.target, "Sites > mySite > static > assets");
        assert_eq!(store.created_folders(), segs(&["static", "assets", "css"]));
        assert_eq!(upload.report.created_folders.len(), 3);
        assert!(store
            .lookup(&site, &["static", "assets", "css", "site.css"])
            .is_some());
    }

    #[tokio::test]
    async fn test_download_folder_partial_failure() {
        let store = MemoryStore::new();
        let root = store.add_folder(&ItemId::home(), "root");
        store.add_file(&root, "good.txt", b"g");
        let bad = store.add_file(&root, "bad.txt", b"b");
        store.fail_reads_of(&bad);

        let temp = TempDir::new().unwrap();
        let sync = DocumentSync::new(&store, SyncOptions::default());
        let download = sync
            .download_folder("root", Some(temp.path()), |_| {})
            .await
            .unwrap();

        assert_eq!(download.report.succeeded.len(), 1);
        assert_eq!(download.report.failed.len(), 1);
        assert!(download.report.is_success());
        assert!(temp.path().join("good.txt").exists());
    }

    #[tokio::test]
    async fn test_share_and_unshare() {
        let store = MemoryStore::new();
        let team = store.add_folder(&ItemId::home(), "team");
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        store.add_user("carol");
        store.add_member(&team, &bob, Role::Viewer);

        let sync = DocumentSync::new(&store, SyncOptions::default());
        let report = sync
            .share_folder("team", &segs(&["Alice", "bob"]), Role::Contributor)
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].0, alice);
        assert_eq!(report.outcomes[0].1, ShareOutcome::Granted(Role::Contributor));
        assert_eq!(
            report.outcomes[1].1,
            ShareOutcome::RoleUpdated {
                from: Some(Role::Viewer),
                to: Role::Contributor
            }
        );
        let mut grants = store.grants();
        grants.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            grants,
            vec![
                (alice.id.clone(), Role::Contributor, true),
                (bob.id.clone(), Role::Contributor, false),
            ]
        );

        let report = sync
            .unshare_folder("team", &segs(&["alice", "carol"]))
            .await
            .unwrap();
        assert_eq!(report.outcomes[0].1, ShareOutcome::Revoked);
        assert_eq!(report.outcomes[1].1, ShareOutcome::NoAccess);
        assert_eq!(store.revokes(), vec![alice.id.clone()]);
    }

    #[tokio::test]
    async fn test_share_unknown_user_changes_nothing() {
        let store = MemoryStore::new();
        store.add_folder(&ItemId::home(), "team");
        store.add_user("alice");

        let sync = DocumentSync::new(&store, SyncOptions::default());
        let err = sync
            .share_folder("team", &segs(&["alice", "mallory"]), Role::Viewer)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "user mallory does not exist");
        assert!(store.grants().is_empty());
    }
}
