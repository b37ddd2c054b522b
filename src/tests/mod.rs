use std::collections::BTreeMap;
use std::time::Duration;

use httpmock::prelude::*;

use crate::output::Reporter;
use crate::runner::{Options, ProbeRecord, Runner, RunnerError};

const APACHE_INDEX: &str = "<html><head><title>Index of /a/b</title></head><body><h1>Index of /a/b</h1></body></html>";

fn options(url: String) -> Options {
    Options {
        url,
        timeout: Duration::from_secs(5),
        ..Options::default()
    }
}

#[tokio::test]
async fn walk_probes_target_then_each_parent_in_order() {
    let server = MockServer::start_async().await;
    let target = server
        .mock_async(|when, then| {
            when.method(GET).path("/a/b/c.html");
            then.status(200).body("<html>just a page</html>");
        })
        .await;
    let parent = server
        .mock_async(|when, then| {
            when.method(GET).path("/a/b/");
            then.status(200)
                .header("content-type", "text/html;charset=UTF-8")
                .body(APACHE_INDEX);
        })
        .await;
    let grandparent = server
        .mock_async(|when, then| {
            when.method(GET).path("/a/");
            then.status(403).body("Forbidden");
        })
        .await;
    let root = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("<html>home</html>");
        })
        .await;

    let runner = Runner::new(options(server.url("/a/b/c.html"))).unwrap();
    let result = runner.run(&Reporter::quiet()).await.unwrap();

    let urls: Vec<&str> = result.records.iter().map(|r| r.url()).collect();
    assert_eq!(
        urls,
        vec![
            server.url("/a/b/c.html"),
            server.url("/a/b/"),
            server.url("/a/"),
            server.url("/"),
        ]
    );
    assert_eq!(result.findings(), vec![server.url("/a/b/")]);
    assert!(result.failures().is_empty());

    match &result.records[1] {
        ProbeRecord::Outcome(o) => {
            assert!(o.is_listing);
            assert_eq!(o.content_type.as_deref(), Some("text/html;charset=UTF-8"));
            assert_eq!(
                o.content_length.as_deref(),
                Some(APACHE_INDEX.len().to_string().as_str())
            );
        }
        other => panic!("expected an outcome, got {other:?}"),
    }

    target.assert_hits_async(1).await;
    parent.assert_hits_async(1).await;
    grandparent.assert_hits_async(1).await;
    root.assert_hits_async(1).await;
}

#[tokio::test]
async fn timeout_on_one_candidate_does_not_stop_the_walk() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/a/b/");
            then.status(200).body(APACHE_INDEX).delay(Duration::from_secs(3));
        })
        .await;
    let parent = server
        .mock_async(|when, then| {
            when.method(GET).path("/a/");
            then.status(200).body("<a href=1><a href=2><a href=3><a href=4><a href=5><a href=6>");
        })
        .await;
    let root = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("welcome");
        })
        .await;

    let runner = Runner::new(Options {
        timeout: Duration::from_millis(300),
        ..options(server.url("/a/b/"))
    })
    .unwrap();
    let result = runner.run(&Reporter::quiet()).await.unwrap();

    assert_eq!(result.records.len(), 3);
    assert!(matches!(
        &result.records[0],
        ProbeRecord::Failed { url, .. } if *url == server.url("/a/b/")
    ));
    assert_eq!(result.findings(), vec![server.url("/a/")]);
    parent.assert_hits_async(1).await;
    root.assert_hits_async(1).await;
}

#[tokio::test]
async fn sends_user_agent_and_custom_headers() {
    let server = MockServer::start_async().await;
    let root = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/")
                .header("user-agent", "dirChecker/1.3")
                .header("x-api-key", "secret");
            then.status(200).body("Directory Listing For /");
        })
        .await;

    let runner = Runner::new(Options {
        headers: BTreeMap::from([("X-Api-Key".to_string(), "secret".to_string())]),
        ..options(server.url("/"))
    })
    .unwrap();
    assert!(runner.candidates().is_empty());

    let result = runner.run(&Reporter::quiet()).await.unwrap();
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.findings(), vec![server.url("/")]);
    root.assert_hits_async(1).await;
}

#[tokio::test]
async fn listing_behind_error_status_is_reported_but_not_a_finding() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/");
            then.status(404).body("Parent Directory");
        })
        .await;

    let runner = Runner::new(options(server.url("/files/"))).unwrap();
    let result = runner.run(&Reporter::quiet()).await.unwrap();

    match &result.records[0] {
        ProbeRecord::Outcome(o) => {
            assert_eq!(o.status, 404);
            assert!(o.is_listing);
        }
        other => panic!("expected an outcome, got {other:?}"),
    }
    assert!(result.findings().is_empty());
}

#[tokio::test]
async fn unreachable_host_records_every_failure() {
    let runner = Runner::new(Options {
        timeout: Duration::from_secs(2),
        ..options("http://127.0.0.1:1/x/".to_string())
    })
    .unwrap();
    let result = runner.run(&Reporter::quiet()).await.unwrap();

    let urls: Vec<&str> = result.records.iter().map(|r| r.url()).collect();
    assert_eq!(urls, vec!["http://127.0.0.1:1/x/", "http://127.0.0.1:1/"]);
    assert_eq!(result.failures().len(), 2);
}

#[tokio::test]
async fn spinner_is_cleared_when_the_run_fails_early() {
    let runner = Runner::new(Options {
        headers: BTreeMap::from([("Bad Header".to_string(), "x".to_string())]),
        ..options("http://127.0.0.1:1/a/".to_string())
    })
    .unwrap();

    let (reporter, pb) = Reporter::with_hidden_spinner(BTreeMap::new());
    let result = runner.run(&reporter).await;
    drop(reporter);

    assert!(matches!(result, Err(RunnerError::Prober(_))));
    assert!(pb.is_finished());
}
