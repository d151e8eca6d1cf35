//! Customer funnel screens.
//!
//! Lists come from the backend per fabrication status; the search filter is
//! a pure in-memory substring match recomputed per keystroke (the search box
//! re-queries the rows fragment). Status updates are a single-field PUT: on
//! success the whole list is reloaded - no optimistic update - and on
//! failure a non-2xx snippet is returned, which HTMX leaves un-swapped so
//! the rendered list stays unchanged.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use circuitfab_core::{FabricationStatus, UserId};

use crate::backend::types::BackendUser;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::ErrorTemplate;
use crate::services::TokenStore;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// One funnel stage on the overview page.
pub struct FunnelStage {
    pub label: &'static str,
    pub status_value: u8,
    pub count: usize,
}

/// The "advance" action available for a customer, if any.
#[derive(Clone, Copy)]
pub struct StatusAction {
    pub value: u8,
    pub label: &'static str,
}

/// Customer display data for templates.
#[derive(Clone)]
pub struct CustomerView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub status_label: &'static str,
    pub advance: Option<StatusAction>,
}

impl From<&BackendUser> for CustomerView {
    fn from(user: &BackendUser) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.full_name.clone(),
            email: user.email.to_string(),
            company: user.company.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            status_label: user.fabrication_status.label(),
            advance: user.fabrication_status.next().map(|next| StatusAction {
                value: next.as_u8(),
                label: next.label(),
            }),
        }
    }
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Target fabrication status (defaults to the top of the funnel).
    pub status: Option<u8>,
    /// Case-insensitive search over name, email, and company.
    pub q: Option<String>,
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusForm {
    pub user_id: UserId,
    pub status: u8,
    /// The list currently on screen, reloaded after the update.
    pub view_status: u8,
    pub q: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Funnel overview template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/overview.html")]
pub struct AdminOverviewTemplate {
    pub admin_name: String,
    pub stages: Vec<FunnelStage>,
}

/// Customer list page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/customers.html")]
pub struct AdminCustomersTemplate {
    pub admin_name: String,
    pub status_value: u8,
    pub status_label: &'static str,
    pub query: String,
    pub customers: Vec<CustomerView>,
    pub total: usize,
}

/// Customer rows fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/customer_rows.html")]
pub struct CustomerRowsTemplate {
    pub status_value: u8,
    pub query: String,
    pub customers: Vec<CustomerView>,
}

// =============================================================================
// Filtering
// =============================================================================

/// Case-insensitive substring filter over name, email, and company.
///
/// Pure: returns references into the loaded list without mutating it.
fn filter_customers<'a>(customers: &'a [BackendUser], query: &str) -> Vec<&'a BackendUser> {
    if query.is_empty() {
        return customers.iter().collect();
    }

    let needle = query.to_lowercase();
    customers
        .iter()
        .filter(|customer| {
            customer.full_name.to_lowercase().contains(&needle)
                || customer.email.as_str().to_lowercase().contains(&needle)
                || customer
                    .company
                    .as_deref()
                    .is_some_and(|company| company.to_lowercase().contains(&needle))
        })
        .collect()
}

fn parse_status(value: u8) -> Result<FabricationStatus, Response> {
    FabricationStatus::try_from(value).map_err(|e| {
        (StatusCode::BAD_REQUEST, e.to_string()).into_response()
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Funnel overview: customer count per stage.
#[instrument(skip(state, session, admin))]
pub async fn overview(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Response {
    let Some(token) = TokenStore::new(&session).get().await else {
        return AppError::Unauthorized("no backend token in session".to_string()).into_response();
    };

    let mut stages = Vec::with_capacity(FabricationStatus::ALL.len());
    for status in FabricationStatus::ALL {
        match state
            .backend()
            .users_by_fabrication_status(&token, status)
            .await
        {
            Ok(users) => stages.push(FunnelStage {
                label: status.label(),
                status_value: status.as_u8(),
                count: users.len(),
            }),
            Err(e) => {
                tracing::error!(error = %e, status = %status, "failed to load funnel counts");
                return (
                    StatusCode::BAD_GATEWAY,
                    ErrorTemplate {
                        message: "Could not load the customer funnel right now.".to_string(),
                        retry_path: "/admin".to_string(),
                    },
                )
                    .into_response();
            }
        }
    }

    AdminOverviewTemplate {
        admin_name: admin.full_name,
        stages,
    }
    .into_response()
}

/// Customer list page for one funnel stage.
#[instrument(skip(state, session, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Query(params): Query<ListQuery>,
) -> Response {
    let status = match parse_status(params.status.unwrap_or(0)) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let query = params.q.unwrap_or_default();

    let Some(token) = TokenStore::new(&session).get().await else {
        return AppError::Unauthorized("no backend token in session".to_string()).into_response();
    };

    match state
        .backend()
        .users_by_fabrication_status(&token, status)
        .await
    {
        Ok(users) => {
            let customers = filter_customers(&users, &query)
                .into_iter()
                .map(CustomerView::from)
                .collect();

            AdminCustomersTemplate {
                admin_name: admin.full_name,
                status_value: status.as_u8(),
                status_label: status.label(),
                query,
                customers,
                total: users.len(),
            }
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, status = %status, "failed to load customers");
            (
                StatusCode::BAD_GATEWAY,
                ErrorTemplate {
                    message: "Could not load customers right now.".to_string(),
                    retry_path: format!("/admin/customers?status={status}"),
                },
            )
                .into_response()
        }
    }
}

/// Filtered customer rows fragment (HTMX, re-queried per keystroke).
#[instrument(skip(state, session, _admin))]
pub async fn rows(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Query(params): Query<ListQuery>,
) -> Response {
    let status = match parse_status(params.status.unwrap_or(0)) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let query = params.q.unwrap_or_default();

    let Some(token) = TokenStore::new(&session).get().await else {
        return AppError::Unauthorized("no backend token in session".to_string()).into_response();
    };

    match state
        .backend()
        .users_by_fabrication_status(&token, status)
        .await
    {
        Ok(users) => CustomerRowsTemplate {
            status_value: status.as_u8(),
            query: query.clone(),
            customers: filter_customers(&users, &query)
                .into_iter()
                .map(CustomerView::from)
                .collect(),
        }
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, status = %status, "failed to reload customer rows");
            (
                StatusCode::BAD_GATEWAY,
                Html("<tr><td colspan=\"5\" class=\"error\">Could not load customers</td></tr>"),
            )
                .into_response()
        }
    }
}

/// Update one customer's fabrication status (HTMX).
///
/// On success the full list is reloaded and returned as fresh rows. On
/// failure the error snippet rides a non-2xx status, so the client keeps
/// the list it had.
#[instrument(skip(state, session, _admin, form))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Form(form): Form<UpdateStatusForm>,
) -> Response {
    let status = match parse_status(form.status) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let view_status = match parse_status(form.view_status) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let query = form.q.unwrap_or_default();

    let Some(token) = TokenStore::new(&session).get().await else {
        return AppError::Unauthorized("no backend token in session".to_string()).into_response();
    };

    if let Err(e) = state
        .backend()
        .update_fabrication_status(&token, &form.user_id, status)
        .await
    {
        tracing::error!(error = %e, user_id = %form.user_id, "failed to update fabrication status");
        return (
            StatusCode::BAD_GATEWAY,
            Html("<span class=\"error\">Could not update customer status</span>"),
        )
            .into_response();
    }

    // Reload the list being viewed; no optimistic patch of local state.
    match state
        .backend()
        .users_by_fabrication_status(&token, view_status)
        .await
    {
        Ok(users) => (
            AppendHeaders([("HX-Trigger", "status-updated")]),
            CustomerRowsTemplate {
                status_value: view_status.as_u8(),
                query: query.clone(),
                customers: filter_customers(&users, &query)
                    .into_iter()
                    .map(CustomerView::from)
                    .collect(),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "status updated but list reload failed");
            (
                StatusCode::BAD_GATEWAY,
                Html("<tr><td colspan=\"5\" class=\"error\">Updated, but the list could not be reloaded</td></tr>"),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use circuitfab_core::{Email, UserRole};

    fn customer(name: &str, email: &str, company: Option<&str>) -> BackendUser {
        BackendUser {
            id: UserId::new(name.to_lowercase()),
            email: Email::parse(email).unwrap(),
            full_name: name.to_string(),
            company: company.map(String::from),
            phone: None,
            role: UserRole::Customer,
            is_active: true,
            fabrication_status: FabricationStatus::Visited,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_filter_matches_name_email_and_company() {
        let customers = vec![
            customer("Alice Chen", "alice@acme.io", Some("Acme Robotics")),
            customer("Bob Ray", "bob@example.com", None),
        ];

        let by_name = filter_customers(&customers, "alice");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].full_name, "Alice Chen");

        let by_email = filter_customers(&customers, "EXAMPLE.COM");
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].full_name, "Bob Ray");

        let by_company = filter_customers(&customers, "robotics");
        assert_eq!(by_company.len(), 1);
        assert_eq!(by_company[0].full_name, "Alice Chen");
    }

    #[test]
    fn test_filter_no_match_yields_empty_without_mutating_source() {
        let customers = vec![customer("Alice Chen", "alice@acme.io", None)];

        let filtered = filter_customers(&customers, "zzz");
        assert!(filtered.is_empty());
        // The loaded list is untouched.
        assert_eq!(customers.len(), 1);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let customers = vec![
            customer("Alice Chen", "alice@acme.io", None),
            customer("Bob Ray", "bob@example.com", None),
        ];
        assert_eq!(filter_customers(&customers, "").len(), 2);
    }

    #[test]
    fn test_customer_view_advance_action() {
        let mut user = customer("Alice Chen", "alice@acme.io", None);

        user.fabrication_status = FabricationStatus::New;
        let view = CustomerView::from(&user);
        assert_eq!(view.advance.unwrap().value, 1);

        user.fabrication_status = FabricationStatus::InCart;
        let view = CustomerView::from(&user);
        assert!(view.advance.is_none());
    }
}
