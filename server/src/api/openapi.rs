//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, namespaces};
use crate::api::routes::namespaces::types::{
    FieldCapabilityDto, NamespaceDetailDto, QueryNamespaceRequest,
};
use crate::store::types::{NamespaceList, NamespaceSummary};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Puffboard API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Vector store namespace dashboard"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "namespaces", description = "Namespace browsing and querying")
    ),
    paths(
        health::health,
        namespaces::list_namespaces,
        namespaces::get_namespace,
        namespaces::query_namespace,
    ),
    components(schemas(
        NamespaceList,
        NamespaceSummary,
        NamespaceDetailDto,
        FieldCapabilityDto,
        QueryNamespaceRequest,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Puffboard API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;
