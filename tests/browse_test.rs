use std::path::PathBuf;

use webhook_notifier::{BrowseError, DirectoryBrowser, EnumerationOptions};

async fn fixture() -> (tempfile::TempDir, DirectoryBrowser, PathBuf) {
    let root = tempfile::tempdir().expect("tempdir");
    let downloads = root.path().join("downloads");
    let incomplete = root.path().join("incomplete");

    tokio::fs::create_dir_all(downloads.join("movies")).await.unwrap();
    tokio::fs::create_dir_all(downloads.join("books")).await.unwrap();
    tokio::fs::write(downloads.join("archive.tar"), b"x").await.unwrap();
    tokio::fs::write(downloads.join("notes.txt"), b"x").await.unwrap();
    tokio::fs::write(downloads.join(".hidden"), b"x").await.unwrap();
    tokio::fs::create_dir_all(&incomplete).await.unwrap();

    let browser = DirectoryBrowser::new(vec![downloads.clone(), incomplete]);
    (root, browser, downloads)
}

#[tokio::test]
async fn path_outside_permitted_roots_is_rejected() {
    let (_root, browser, _downloads) = fixture().await;

    let err = browser
        .list_files(std::path::Path::new("/etc"), &EnumerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, BrowseError::InvalidDirectory(path) if path == PathBuf::from("/etc")));
}

#[tokio::test]
async fn files_under_a_permitted_root_are_listed_sorted() {
    let (_root, browser, downloads) = fixture().await;

    let files = browser
        .list_files(&downloads, &EnumerationOptions::default())
        .await
        .expect("listing");

    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["archive.tar", "notes.txt"]);
}

#[tokio::test]
async fn subdirectory_of_a_permitted_root_is_allowed() {
    let (_root, browser, downloads) = fixture().await;

    let files = browser
        .list_files(&downloads.join("movies"), &EnumerationOptions::default())
        .await
        .expect("listing");

    assert!(files.is_empty());
}

#[tokio::test]
async fn directories_and_files_are_listed_separately() {
    let (_root, browser, downloads) = fixture().await;

    let dirs = browser
        .list_directories(&downloads, &EnumerationOptions::default())
        .await
        .expect("listing");

    let names: Vec<&str> = dirs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["books", "movies"]);
}

#[tokio::test]
async fn hidden_entries_are_filtered_unless_requested() {
    let (_root, browser, downloads) = fixture().await;

    let default = browser
        .list_files(&downloads, &EnumerationOptions::default())
        .await
        .unwrap();
    assert!(default.iter().all(|f| f.name != ".hidden"));

    let with_hidden = browser
        .list_files(&downloads, &EnumerationOptions { include_hidden: true })
        .await
        .unwrap();
    assert!(with_hidden.iter().any(|f| f.name == ".hidden"));
}
