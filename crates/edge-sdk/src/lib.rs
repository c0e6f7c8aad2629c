//! Public SDK for the streaming SSR entry.
//!
//! ```ignore
//! use edge_sdk::prelude::*;
//!
//! let renderer = StreamingRenderer::from_config(ShellEngine, RenderConfig::load("render.toml")?)
//!     .with_log(Arc::new(StructuredLogger::new().with_service("storefront")));
//!
//! let page = Page::new(Shell::new(HeadContent::new("Product")))
//!     .section(Section::new("hero"), |styles| async move {
//!         let class = styles.insert("hero", "padding:2rem");
//!         Ok(format!(r#"<section class="{class}">...</section>"#))
//!     });
//!
//! let response = renderer
//!     .handle(&request, StatusCode::OK, HeaderMap::new(), page)
//!     .await?
//!     .into_http();
//! ```

pub use edge_core;
pub use edge_observability;
pub use edge_security;
pub use edge_streaming;
pub use edge_ui;

/// Prelude for convenient imports.
pub mod prelude {
    pub use edge_core::*;
    pub use edge_observability::*;
    pub use edge_security::*;
    pub use edge_streaming::*;
    pub use edge_ui::*;
}
