use std::fmt::Write;

use crawlwatch_core::{AnalysisResult, AppViewModel, NoticeKind, RowView, SessionState};

/// Renders the whole view as plain text, one row per URL.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    match view.session {
        SessionState::SignedOut => {
            out.push_str("Signed out. Use `login <user> <password>` to continue.\n");
        }
        SessionState::SigningIn => out.push_str("Signing in...\n"),
        SessionState::SignedIn => render_table(&mut out, view),
    }

    if let Some(notice) = &view.notice {
        let marker = match notice.kind {
            NoticeKind::Info => "*",
            NoticeKind::AuthFailure | NoticeKind::LoadFailure | NoticeKind::ActionFailure => "!",
        };
        let _ = writeln!(out, "{marker} {}", notice.text);
    }
    out
}

fn render_table(out: &mut String, view: &AppViewModel) {
    let sort = match view.sort_field {
        Some(field) => format!("{} {}", field.as_query(), view.sort_order.as_query()),
        None => "default".to_string(),
    };
    let _ = write!(
        out,
        "Page {}/{} | {} URLs | {} per page | sort: {} | selected: {} | tracking: {}",
        view.page,
        view.total_pages,
        format_with_commas(view.total),
        view.limit,
        sort,
        view.selected_count,
        view.tracked_jobs
    );
    if view.loading {
        out.push_str(" | loading");
    }
    if view.busy {
        out.push_str(" | working");
    }
    out.push('\n');

    if view.rows.is_empty() {
        out.push_str("  (no URLs)\n");
        return;
    }
    for row in &view.rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
}

fn format_row(row: &RowView) -> String {
    let mark = if row.selected { "[x]" } else { "[ ]" };
    let status = row.status.map(|status| status.as_str()).unwrap_or("-");
    let mut line = format!("{mark} {:>6}  {:<9}  {}", row.id, status, row.url);
    if let Some(error) = &row.job_error {
        let _ = write!(line, "  ({error})");
    }
    if let Some(result) = &row.result {
        line.push_str("\n             ");
        line.push_str(&format_result(result));
    }
    line
}

fn format_result(result: &AnalysisResult) -> String {
    let headings = result
        .headings()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{} | {} | h1-h6 {} | links int {} ext {} broken {} | login form: {}",
        result.title.as_deref().unwrap_or("(untitled)"),
        result.html_version.as_deref().unwrap_or("?"),
        headings,
        result.internal_links_count,
        result.external_links_count,
        result.inaccessible_links_count,
        if result.has_login_form { "yes" } else { "no" }
    )
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
