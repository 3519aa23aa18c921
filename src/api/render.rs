use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::PathBuf;

use super::ApiError;
use crate::config::TemplateConfig;

/// Which HTML view a payload is rendered with outside JSON mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Show,
}

/// Picks the representation of a response: JSON when the caller's content
/// type is `application/json`, a Handlebars template otherwise.
pub struct Renderer {
    registry: Handlebars<'static>,
    template_dir: PathBuf,
    list_template: String,
    show_template: String,
}

impl Renderer {
    #[must_use]
    pub fn new(config: &TemplateConfig) -> Self {
        Self {
            registry: Handlebars::new(),
            template_dir: PathBuf::from(&config.path),
            list_template: config.list.clone(),
            show_template: config.show.clone(),
        }
    }

    #[must_use]
    pub fn template_path(&self, view: View) -> PathBuf {
        let name = match view {
            View::List => &self.list_template,
            View::Show => &self.show_template,
        };
        self.template_dir.join(name)
    }

    pub async fn render<T>(
        &self,
        content_type: Option<&str>,
        data: &T,
        view: View,
    ) -> Result<Response, ApiError>
    where
        T: Serialize + Sync,
    {
        if wants_json(content_type) {
            let body = serde_json::to_vec(data).map_err(|e| ApiError::Render(e.to_string()))?;
            return Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response());
        }

        let path = self.template_path(view);
        // Loaded per request, never cached.
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|_| ApiError::TemplateNotFound(path.display().to_string()))?;

        let html = self
            .registry
            .render_template(&source, data)
            .map_err(|e| ApiError::Render(e.to_string()))?;

        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response())
    }
}

/// True when the media type (ignoring parameters) is `application/json`.
#[must_use]
pub fn wants_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}
