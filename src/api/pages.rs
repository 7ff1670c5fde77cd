//! HTML pages: public check-in form and admin dashboard

use axum::{extract::State, response::Html};

use crate::{error::AppResult, models::visitor::Visitor, AppState};

const CHECKIN_PAGE: &str = include_str!("../../templates/checkin.html");
const ADMIN_PAGE: &str = include_str!("../../templates/admin.html");

/// Render the visitor check-in form
pub async fn checkin_form() -> Html<&'static str> {
    Html(CHECKIN_PAGE)
}

/// Render the admin dashboard with every visitor record
pub async fn admin_dashboard(State(state): State<AppState>) -> AppResult<Html<String>> {
    let visitors = state.services.visitors.list().await?;
    Ok(Html(render_admin(&visitors)))
}

fn render_admin(visitors: &[Visitor]) -> String {
    let rows: String = visitors.iter().map(render_row).collect();
    ADMIN_PAGE.replace("{{rows}}", &rows)
}

fn render_row(visitor: &Visitor) -> String {
    format!(
        concat!(
            "            <tr data-id=\"{id}\">",
            "<td>{name}</td><td>{purpose}</td><td>{time_in}</td>",
            "<td class=\"status-{status}\">{status}</td>",
            "<td><button onclick=\"decide('{id}', 'approve')\">Approve</button> ",
            "<button onclick=\"decide('{id}', 'reject')\">Reject</button></td>",
            "</tr>\n"
        ),
        id = visitor.id,
        name = escape_html(&visitor.name),
        purpose = escape_html(&visitor.purpose),
        time_in = visitor.time_in.format("%Y-%m-%d %H:%M:%S"),
        status = visitor.status,
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
