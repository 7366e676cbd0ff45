use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::IntoResponse,
};
use inscribo::{
    AppConfig, AppState, MockPersistence, OpenGate, create_router,
    handlers::is_local_path,
    shell::{DOCUMENT_LANG, Page, SITE_METADATA, document, render_document},
};
use maud::{PreEscaped, html};
use std::sync::Arc;
use tower::ServiceExt;

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn test_document_declares_language_and_metadata() {
    let html = render_document("");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"<html lang="pt-BR">"#));
    assert_eq!(DOCUMENT_LANG, "pt-BR");
    assert!(html.contains(&format!("<title>{}</title>", SITE_METADATA.title)));
    assert!(html.contains(&format!(
        r#"<meta name="description" content="{}">"#,
        SITE_METADATA.description
    )));
}

#[test]
fn test_children_are_inserted_verbatim() {
    let children = r#"<section id="x"><p>Olá & "bem-vindo"</p><script>1<2</script></section>"#;
    let html = render_document(children);
    assert!(html.contains(children));

    let body_start = html.find("<body").unwrap();
    let body_end = html.find("</body>").unwrap();
    assert!(html[body_start..body_end].ends_with(children));
}

#[test]
fn test_document_links_stylesheet_and_font() {
    let html = render_document("<p>x</p>");
    assert!(html.contains(r#"<link rel="stylesheet" href="/_next/static/css/globals.css">"#));
    assert!(html.contains("font-family:'Open Sans'"));
    assert!(html.contains("url('/_next/static/media/open-sans.woff2')"));
    assert!(html.contains(r#"class="font-sans antialiased""#));
}

#[test]
fn test_markup_children_match_raw_children() {
    let children = html! { main { h1 { "Matrículas" } } };
    assert_eq!(
        document(children.clone()).into_string(),
        render_document(&children.into_string())
    );
    assert_eq!(
        document(PreEscaped("<b>x</b>".to_string())).into_string(),
        render_document("<b>x</b>")
    );
}

#[test]
fn test_local_path_check() {
    assert!(is_local_path("/"));
    assert!(is_local_path("/super-admin/leads?page=2"));
    assert!(!is_local_path(""));
    assert!(!is_local_path("super-admin"));
    assert!(!is_local_path("//evil.example"));
    assert!(!is_local_path("/\\evil.example"));
    assert!(!is_local_path("https://evil.example"));
    assert!(!is_local_path("/\tevil"));
}

#[tokio::test]
async fn test_page_response_is_html() {
    let response = Page(html! { p { "conteúdo" } }).into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert_eq!(body_text(response).await, render_document("<p>conteúdo</p>"));
}

#[tokio::test]
async fn test_login_page_escapes_next_parameter() {
    let app = create_router(AppState {
        db: Arc::new(MockPersistence::new()),
        gate: Arc::new(OpenGate),
        config: AppConfig::default(),
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/login?next=%2Fsuper-admin%22%3E%3Cscript%3E")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"value="/super-admin&quot;&gt;&lt;script&gt;""#));
}

#[tokio::test]
async fn test_login_page_ignores_offsite_next() {
    let app = create_router(AppState {
        db: Arc::new(MockPersistence::new()),
        gate: Arc::new(OpenGate),
        config: AppConfig::default(),
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/login?next=%2F%2Fevil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains(r#"name="next" value="/""#));
}

#[tokio::test]
async fn test_login_page_ignores_backslash_next() {
    let app = create_router(AppState {
        db: Arc::new(MockPersistence::new()),
        gate: Arc::new(OpenGate),
        config: AppConfig::default(),
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/login?next=%2F%5Cevil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let html = body_text(response).await;
    assert!(html.contains(r#"name="next" value="/""#));
    assert!(!html.contains("evil.example"));
}

#[tokio::test]
async fn test_admin_section_name_is_escaped() {
    let app = create_router(AppState {
        db: Arc::new(MockPersistence::new()),
        gate: Arc::new(OpenGate),
        config: AppConfig::default(),
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/super-admin/%3Cscript%3Ealert(1)%3C%2Fscript%3E")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>alert(1)"));
}
