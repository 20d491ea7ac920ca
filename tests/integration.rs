use blobber::{
    app::{App, AppServices},
    cdn::{build_url, CdnUrlBuilder},
    identity::{ClientIdResolver, ClientIdSource},
    models::{Config, FileBuffer, FileMetadata, Fit, Format, UrlOptions},
    preview::PreviewStore,
    session::{UploadSession, UploadState},
    upload::{MockUploadClient, UploadClient, UploadService},
    Error,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tokio::sync::Notify;
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver(configured: Option<&str>) -> ClientIdResolver {
    ClientIdResolver::new(vec![ClientIdSource::fixed(
        "BLOBBER_CLIENT_ID",
        configured,
    )])
}

fn png(name: &str) -> FileBuffer {
    FileBuffer::new(name, vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
}

fn f1() -> FileMetadata {
    FileMetadata {
        id: "f1".to_string(),
        name: "a.png".to_string(),
        extension: "png".to_string(),
        mimetype: "image/png".to_string(),
        size: 1024,
    }
}

#[test]
fn test_build_url_is_deterministic() {
    let builder = CdnUrlBuilder::new(resolver(None));
    let opts = UrlOptions::new()
        .fit(Fit::Fill)
        .height(90)
        .width(160)
        .format(Format::Jpg);

    let first = builder.build_url("abc", Some("C1"), &opts).unwrap();
    let second = builder.build_url("abc", Some("C1"), &opts).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        "https://cdn.blobber.dev/C1/fit-fill,height-90,width-160/abc.jpg"
    );
}

#[test]
fn test_build_url_path_segment_grammar() {
    let opts = UrlOptions::new().width(200).format(Format::Webp);
    let url = build_url("https://cdn.blobber.dev", "f1", "C1", &opts).unwrap();
    assert_eq!(url, "https://cdn.blobber.dev/C1/width-200/f1.webp");
}

#[test]
fn test_build_url_empty_id_is_configuration_error() {
    let builder = CdnUrlBuilder::new(resolver(Some("C1")));
    for opts in [
        UrlOptions::default(),
        UrlOptions::new().width(1).height(1).fit(Fit::Cover).format(Format::Png),
    ] {
        let err = builder.build_url("", None, &opts).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}

#[test]
fn test_identity_resolution_order() {
    let configured = resolver(Some("B"));
    assert_eq!(configured.resolve(Some("A"), "getUrl").unwrap(), "A");
    assert_eq!(configured.resolve(None, "getUrl").unwrap(), "B");

    let err = resolver(None).resolve(None, "getUrl").unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[tokio::test]
async fn test_zero_files_never_reach_network() {
    let mock = MockUploadClient::new();

    let err = mock.upload(&[], "C1").await.unwrap_err();

    assert!(matches!(err, Error::NoFiles));
    assert_eq!(mock.get_call_count(), 0);
}

#[tokio::test]
async fn test_upload_success_against_http_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-blobber-client-id", "C1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"id":"f1","name":"a.png","extension":"png","mimetype":"image/png","size":1024}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = UploadClient::new().with_upload_url(server.uri());
    let files = client.upload(&[png("a.png")], "C1").await.unwrap();

    assert_eq!(files, vec![f1()]);
}

#[tokio::test]
async fn test_upload_failure_ends_in_failed_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uploader = UploadClient::new().with_upload_url(server.uri());
    let session = UploadSession::new(
        Arc::new(uploader),
        resolver(Some("C1")),
        Arc::new(PreviewStore::new()),
    );

    let err = session.handle_upload(vec![png("a.png")]).await.unwrap_err();

    assert!(matches!(err, Error::Upload { status: 500, .. }));
    assert!(!session.is_loading());
    assert!(session.error().is_some());
    assert!(session.file().is_none());
}

#[tokio::test]
async fn test_preview_handles_do_not_leak() {
    let previews = Arc::new(PreviewStore::new());
    let gate = Arc::new(Notify::new());
    let mock = MockUploadClient::new().with_gate(gate.clone());
    let session = UploadSession::new(Arc::new(mock.clone()), resolver(Some("C1")), previews.clone());

    // X is selected, then Y while X's upload is still in flight.
    let select_x = session.handle_upload(vec![png("x.png")]);
    let select_y = session.handle_upload(vec![png("y.png")]);
    let check = async {
        assert_eq!(mock.get_call_count(), 2);
        assert_eq!(previews.outstanding(), 1);
        let current = session.preview_url().unwrap();
        assert_eq!(previews.get(&current).unwrap().name, "y.png");
        gate.notify_waiters();
    };

    let (x, y, _) = tokio::join!(select_x, select_y, check);
    assert!(x.is_ok());
    assert!(y.is_ok());
    assert!(matches!(session.state(), UploadState::Succeeded(_)));

    drop(session);
    assert_eq!(previews.outstanding(), 0);
}

#[tokio::test]
async fn test_app_upload_paths_attaches_urls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.png");
    std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47]).unwrap();

    let mock = MockUploadClient::new().with_files(vec![f1()]);
    let app = App::with_services(
        AppServices {
            uploader: Arc::new(mock.clone()),
        },
        Config {
            client_ids: resolver(Some("C1")),
            ..Config::default()
        },
    );

    let uploaded = app
        .upload_paths(&[path], None, &UrlOptions::new().width(200).format(Format::Webp))
        .await
        .unwrap();

    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].file.id, "f1");
    assert_eq!(uploaded[0].url, "https://cdn.blobber.dev/C1/width-200/f1.webp");
    assert_eq!(mock.get_client_ids(), vec!["C1".to_string()]);

    let json = serde_json::to_value(&uploaded[0]).unwrap();
    assert_eq!(json["id"], "f1");
    assert_eq!(json["url"], "https://cdn.blobber.dev/C1/width-200/f1.webp");
}

#[tokio::test]
async fn test_settled_after_upload() {
    let mock = MockUploadClient::new().with_files(vec![f1()]);
    let session = UploadSession::new(
        Arc::new(mock),
        resolver(Some("C1")),
        Arc::new(PreviewStore::new()),
    );

    session.handle_upload(vec![png("a.png")]).await.unwrap();

    assert_eq!(session.settled().await, UploadState::Succeeded(f1()));
}
