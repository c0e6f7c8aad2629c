use std::sync::Arc;
use std::time::Duration;

use edge_sdk::prelude::*;
use http::{HeaderMap, StatusCode};

const BROWSER: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
const CRAWLER: &str = "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)";

fn product_page() -> Page {
    let shell = Shell::new(HeadContent::new("Trail Runner")).with_body_class("css-page");

    Page::with_shell(move |styles| async move {
        styles.insert("page", "margin:0");
        Ok(shell)
    })
    .section(Section::new("hero"), |styles| async move {
        let class = styles.insert("hero", "padding:2rem");
        Ok(format!(r#"<section class="{class}"><h1>Trail Runner</h1></section>"#))
    })
    .section(
        Section::builder("reviews")
            .with_fallback("<p>Reviews unavailable</p>")
            .build(),
        |_| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(r#"<ul class="reviews"><li>Great</li></ul>"#.to_string())
        },
    )
}

fn renderer() -> StreamingRenderer<ShellEngine> {
    StreamingRenderer::new(ShellEngine)
        .with_log(Arc::new(StructuredLogger::new().with_format(LogFormat::Human)))
}

#[tokio::test(start_paused = true)]
async fn browser_gets_shell_first_response() {
    let request = RenderRequest::new("/products/trail-runner").with_user_agent(BROWSER);
    let start = tokio::time::Instant::now();

    let response = renderer()
        .handle(&request, StatusCode::OK, HeaderMap::new(), product_page())
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_millis(200));
    assert_eq!(response.strategy, RenderStrategy::WaitForShell);
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type(), Some("text/html"));

    let html = response.into_string().await;
    assert!(html.starts_with("<!DOCTYPE html>"));

    let page_style = html.find(r#"<style data-style="css page">"#).unwrap();
    let body = html.find(r#"<body class="css-page">"#).unwrap();
    let hero_style = html.find(r#"<style data-style="css hero">"#).unwrap();
    let hero = html.find("<h1>Trail Runner</h1>").unwrap();

    assert!(page_style < html.find("</head>").unwrap());
    assert!(page_style < body);
    assert!(hero_style < hero);
    assert!(html.contains("<li>Great</li>"));
    assert!(html.ends_with("</html>"));
}

#[tokio::test(start_paused = true)]
async fn crawler_gets_complete_document() {
    let request = RenderRequest::new("/products/trail-runner").with_user_agent(CRAWLER);
    let start = tokio::time::Instant::now();

    let response = renderer()
        .handle(&request, StatusCode::OK, HeaderMap::new(), product_page())
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(200));
    assert_eq!(response.strategy, RenderStrategy::WaitForFull);
    assert!(response.into_string().await.contains("<li>Great</li>"));
}

#[tokio::test(start_paused = true)]
async fn failing_section_degrades_crawler_status() {
    let request = RenderRequest::new("/products/trail-runner").with_user_agent(CRAWLER);
    let page = Page::new(Shell::new(HeadContent::new("Broken"))).section(
        Section::builder("price").with_fallback("<p>-</p>").build(),
        |_| async { Err(anyhow::anyhow!("pricing unavailable")) },
    );

    let response = renderer()
        .handle(&request, StatusCode::OK, HeaderMap::new(), page)
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.into_string().await.contains("<p>-</p>"));
}

#[tokio::test(start_paused = true)]
async fn failing_shell_rejects() {
    let request = RenderRequest::new("/").with_user_agent(BROWSER);
    let page = Page::with_shell(|_| async { Err(anyhow::anyhow!("layout missing")) });

    let err = renderer()
        .handle(&request, StatusCode::OK, HeaderMap::new(), page)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Shell(_)));
    assert!(err.is_before_output());
}

#[tokio::test(start_paused = true)]
async fn stalled_page_is_cut_off_at_abort_delay() {
    let request = RenderRequest::new("/").with_user_agent(BROWSER);
    let page = Page::new(Shell::new(HeadContent::new("Slow"))).section(
        Section::new("stalled"),
        |_| async {
            stall().await;
            Ok(String::new())
        },
    );

    let response = renderer()
        .handle(&request, StatusCode::OK, HeaderMap::new(), page)
        .await
        .unwrap();
    let html = response.into_string().await;

    assert!(html.contains("<title>Slow</title>"));
    assert!(!html.ends_with("</html>"));
}

#[tokio::test(start_paused = true)]
async fn stalled_page_times_out_for_crawler() {
    let request = RenderRequest::new("/").with_user_agent(CRAWLER);
    let config = RenderConfig::from_toml_str("abort_delay_ms = 1000").unwrap();
    let page = Page::new(Shell::new(HeadContent::new("Slow"))).section(
        Section::new("stalled"),
        |_| async {
            stall().await;
            Ok(String::new())
        },
    );

    let err = StreamingRenderer::from_config(ShellEngine, config)
        .handle(&request, StatusCode::OK, HeaderMap::new(), page)
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Timeout(d) if d == Duration::from_secs(1)));
}

#[tokio::test(start_paused = true)]
async fn configured_bot_pattern_selects_full_strategy() {
    let request = RenderRequest::new("/").with_user_agent("AcmeUptime/2.0");
    let config = RenderConfig::new().with_bot_pattern("acmeuptime");

    let response = StreamingRenderer::from_config(ShellEngine, config)
        .handle(
            &request,
            StatusCode::OK,
            HeaderMap::new(),
            Page::new(Shell::new(HeadContent::new("Ok"))),
        )
        .await
        .unwrap();

    assert_eq!(response.strategy, RenderStrategy::WaitForFull);
}

#[tokio::test]
async fn ui_helpers_compose_with_pages() {
    let tag = colour_for(random_int(0, 1) as usize);
    let class = class_names!("badge", tag.classes(), ("badge-new", true), false);

    assert_eq!(class, "badge bg-green-50 text-green-700 badge-new");
}

async fn stall() {
    std::future::pending::<()>().await
}
