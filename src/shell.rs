//! Root document shell shared by every rendered page.

use axum::response::{Html, IntoResponse, Response};
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Static metadata declared for every page.
#[derive(Debug, Clone, Copy)]
pub struct SiteMetadata {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SITE_METADATA: SiteMetadata = SiteMetadata {
    title: "Inscribo",
    description: "Gestão de matrículas e leads para instituições de ensino",
};

pub const DOCUMENT_LANG: &str = "pt-BR";

/// Global stylesheet, served from the static asset directory.
pub const GLOBAL_STYLESHEET: &str = "/_next/static/css/globals.css";

/// Self-hosted font files under the static asset directory.
pub const FONT_REGULAR: &str = "/_next/static/media/open-sans.woff2";
pub const FONT_SEMIBOLD: &str = "/_next/static/media/open-sans-600.woff2";

/// Only `'self'` and `data:` fonts pass the CSP, so the font is never loaded from a CDN.
const FONT_FACE: &str = "@font-face{font-family:'Open Sans';font-style:normal;font-weight:400;font-display:swap;src:url('/_next/static/media/open-sans.woff2') format('woff2');}\
@font-face{font-family:'Open Sans';font-style:normal;font-weight:600;font-display:swap;src:url('/_next/static/media/open-sans-600.woff2') format('woff2');}\
body.font-sans{font-family:'Open Sans',system-ui,sans-serif;}";

/// document
///
/// The full HTML document around `children`. Children are already markup and are
/// emitted as-is; everything else maud escapes.
pub fn document(children: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(DOCUMENT_LANG) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (SITE_METADATA.title) }
                meta name="description" content=(SITE_METADATA.description);
                link rel="preload" href=(FONT_REGULAR) as="font" type="font/woff2" crossorigin;
                link rel="stylesheet" href=(GLOBAL_STYLESHEET);
                style { (PreEscaped(FONT_FACE)) }
            }
            body class="font-sans antialiased" { (children) }
        }
    }
}

/// render_document
///
/// Wraps a raw markup fragment in the shell. The fragment is inserted verbatim.
pub fn render_document(children: &str) -> String {
    document(PreEscaped(children.to_string())).into_string()
}

/// Page
///
/// Page content that renders through the shell when returned from a handler.
#[derive(Debug, Clone)]
pub struct Page(pub Markup);

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        Html(document(self.0).into_string()).into_response()
    }
}
