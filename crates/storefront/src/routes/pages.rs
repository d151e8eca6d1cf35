//! Static service pages.
//!
//! Fabrication and assembly are presentation-only: quoting happens with the
//! sales team, and the funnel position (`fabrication_status`) is maintained
//! entirely by manual admin action, never from these pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;

/// Fabrication service page template.
#[derive(Template, WebTemplate)]
#[template(path = "fabrication.html")]
pub struct FabricationTemplate;

/// Assembly service page template.
#[derive(Template, WebTemplate)]
#[template(path = "assembly.html")]
pub struct AssemblyTemplate;

/// Display the PCB fabrication service page.
pub async fn fabrication() -> impl IntoResponse {
    FabricationTemplate
}

/// Display the assembly service page.
pub async fn assembly() -> impl IntoResponse {
    AssemblyTemplate
}
