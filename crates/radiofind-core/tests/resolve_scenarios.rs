//! End-to-end resolution scenarios against local mock stations.
#![allow(missing_docs, clippy::unwrap_used)]

use radiofind_core::{Config, ResolutionRequest, ResolutionSource, Resolver};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> Resolver {
    Resolver::new(&Config::default()).unwrap()
}

async fn serve_audio(server: &MockServer, at: &str, content_type: &str) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", content_type))
        .mount(server)
        .await;
}

async fn serve_html(server: &MockServer, at: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(html.to_string()),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn direct_stream_hint_resolves_to_itself() -> anyhow::Result<()> {
    let station = MockServer::start().await;
    serve_audio(&station, "/stream", "audio/mpeg").await;
    let hint = format!("{}/stream", station.uri());

    let result = resolver()
        .resolve(ResolutionRequest::new("", &hint, "Example FM"))
        .await;

    assert!(result.ok);
    assert_eq!(result.url.as_deref(), Some(hint.as_str()));
    assert_eq!(result.source, Some(ResolutionSource::Direct));
    assert_eq!(result.tried_urls.first(), Some(&hint));
    assert_eq!(result.name, "Example FM");
    Ok(())
}

#[tokio::test]
async fn homepage_playlist_link_resolves_to_inner_entry() -> anyhow::Result<()> {
    let homepage = MockServer::start().await;
    let cdn = MockServer::start().await;

    serve_html(
        &homepage,
        "/",
        r#"<html><body><a href="/station.m3u8">Listen live</a></body></html>"#,
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/station.m3u8"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&homepage)
        .await;
    Mock::given(method("GET"))
        .and(path("/station.m3u8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("#EXTM3U\n#EXTINF:-1,Example\n{}/live.aac\n", cdn.uri())),
        )
        .mount(&homepage)
        .await;
    serve_audio(&cdn, "/live.aac", "audio/aac").await;

    let result = resolver()
        .resolve(ResolutionRequest::new(&homepage.uri(), "", "Example"))
        .await;

    assert!(result.ok, "tried: {:?}", result.tried_urls);
    assert_eq!(result.url, Some(format!("{}/live.aac", cdn.uri())));
    assert_eq!(result.source, Some(ResolutionSource::Playlist));
    Ok(())
}

#[tokio::test]
async fn icecast_status_listen_url_is_verified() -> anyhow::Result<()> {
    let station = MockServer::start().await;
    serve_html(&station, "/", "<html><body>We are on air.</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/status-json.xsl"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"icestats":{{"source":{{"listenurl":"{}/live","server_name":"Example"}}}}}}"#,
            station.uri()
        )))
        .mount(&station)
        .await;
    serve_audio(&station, "/live", "audio/ogg").await;

    let result = resolver()
        .resolve(ResolutionRequest::new(&station.uri(), "", "Example"))
        .await;

    assert!(result.ok, "tried: {:?}", result.tried_urls);
    assert_eq!(result.url, Some(format!("{}/live", station.uri())));
    assert_eq!(result.source, Some(ResolutionSource::IcecastStatus));
    Ok(())
}

#[tokio::test]
async fn everything_failing_is_a_normal_not_found() -> anyhow::Result<()> {
    let station = MockServer::start().await;
    serve_html(
        &station,
        "/",
        r#"<a href="/listen">Listen</a> <a href="/radio.pls">PLS</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/radio.pls"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&station)
        .await;
    let hint = format!("{}/dead-mount", station.uri());

    let result = resolver()
        .resolve(ResolutionRequest::new(&format!("{}/", station.uri()), &hint, "Gone FM"))
        .await;

    assert!(!result.ok);
    assert_eq!(result.url, None);
    assert_eq!(result.source, None);
    assert_eq!(result.reason.as_deref(), Some(radiofind_core::NO_STREAM_REASON));
    assert_eq!(result.tried_urls.first(), Some(&hint));
    assert!(result.tried_urls.len() <= 20);
    Ok(())
}

#[tokio::test]
async fn malformed_inputs_never_fault() -> anyhow::Result<()> {
    let resolver = resolver();
    for (homepage, stream) in [
        ("", ""),
        ("not a url", "also not"),
        ("http://", "http://[::1"),
        ("javascript:alert(1)", "file:///etc/passwd"),
        ("http://%zz/", "data:audio/mpeg;base64,AAAA"),
    ] {
        let result = resolver
            .resolve(ResolutionRequest::new(homepage, stream, ""))
            .await;
        assert!(!result.ok, "{homepage:?} / {stream:?}");
        assert!(result.tried_urls.is_empty(), "{homepage:?} / {stream:?}");
    }
    Ok(())
}

#[tokio::test]
async fn higher_priority_candidate_wins_over_later_ones() -> anyhow::Result<()> {
    // Given: both the hint and a mountpoint would verify
    let station = MockServer::start().await;
    serve_audio(&station, "/hint", "audio/ogg").await;
    serve_audio(&station, "/stream", "audio/mpeg").await;
    let hint = format!("{}/hint", station.uri());

    // When
    let result = resolver()
        .resolve(ResolutionRequest::new(&station.uri(), &hint, ""))
        .await;

    // Then: the explicit hint wins
    assert!(result.ok);
    assert_eq!(result.url.as_deref(), Some(hint.as_str()));
    assert_eq!(result.tried_urls, vec![hint]);
    Ok(())
}

#[tokio::test]
async fn hung_homepage_only_costs_its_timeout() -> anyhow::Result<()> {
    let homepage = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(std::time::Duration::from_secs(30)),
        )
        .mount(&homepage)
        .await;
    let station = MockServer::start().await;
    serve_audio(&station, "/stream", "audio/mpeg").await;

    let mut config = Config::default();
    config.resolver.homepage_timeout_ms = 200;
    let resolver = Resolver::new(&config)?;

    let started = std::time::Instant::now();
    let hint = format!("{}/stream", station.uri());
    let result = resolver
        .resolve(ResolutionRequest::new(&homepage.uri(), &hint, ""))
        .await;

    assert!(result.ok);
    assert_eq!(result.url.as_deref(), Some(hint.as_str()));
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
    Ok(())
}
