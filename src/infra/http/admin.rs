//! Admin form submissions. Pages themselves render through the dispatcher.

use axum::{
    Form,
    extract::State,
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Redirect, Response},
};

use crate::application::{
    admin::{AdminError, AdminSection, AgentForm, CategoryForm, ToolForm},
    error::HttpError,
    render::{RenderError, RenderedPage},
};

use super::{HttpState, public::document_response, repo_error_to_http};

const SOURCE: &str = "infra::http::admin";

pub(super) async fn save_tool(
    State(state): State<HttpState>,
    Form(form): Form<ToolForm>,
) -> Response {
    match state.admin.save_tool(form.clone()).await {
        Ok(_) => saved(AdminSection::Tools),
        Err(AdminError::Invalid(errors)) => {
            rejected(&state, state.site.tool_form(form, &errors).await)
        }
        Err(err) => admin_error_response(err),
    }
}

pub(super) async fn save_category(
    State(state): State<HttpState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    match state.admin.save_category(form.clone()).await {
        Ok(_) => saved(AdminSection::Categories),
        Err(AdminError::Invalid(errors)) => {
            rejected(&state, state.site.category_form(form, &errors))
        }
        Err(err) => admin_error_response(err),
    }
}

pub(super) async fn save_agent(
    State(state): State<HttpState>,
    Form(form): Form<AgentForm>,
) -> Response {
    match state.admin.save_agent(form.clone()).await {
        Ok(_) => saved(AdminSection::Agents),
        Err(AdminError::Invalid(errors)) => rejected(&state, state.site.agent_form(form, &errors)),
        Err(err) => admin_error_response(err),
    }
}

fn saved(section: AdminSection) -> Response {
    Redirect::to(&section.list_path()).into_response()
}

/// Re-render the submitted form with its validation errors.
fn rejected(state: &HttpState, page: Result<RenderedPage, RenderError>) -> Response {
    let mut response = match page {
        Ok(page) => match document_response(&state.chrome, &page) {
            Ok(response) => response,
            Err(err) => HttpError::from(err).into_response(),
        },
        Err(err) => HttpError::from_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            &err,
        )
        .into_response(),
    };
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn admin_error_response(err: AdminError) -> Response {
    match err {
        AdminError::NotFound { entity } => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Resource not found",
            format!("{entity} not found"),
        )
        .into_response(),
        AdminError::Repo(err) => repo_error_to_http(SOURCE, err).into_response(),
        AdminError::Invalid(errors) => HttpError::new(
            SOURCE,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid submission",
            errors.to_string(),
        )
        .into_response(),
    }
}
