//! Plain-text views of widgets for the CLI.

use crate::api::dto::{PaginatedResponse, WidgetAResponse, WidgetBResponse};

const DESCRIPTION_COLUMN_CHARS: usize = 40;

/// Something that can be shown as a table row.
pub trait Row {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn optional(text: Option<&str>) -> String {
    text.unwrap_or("-").to_string()
}

impl Row for WidgetAResponse {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "DESCRIPTION"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            truncate(&optional(self.description.as_deref()), DESCRIPTION_COLUMN_CHARS),
        ]
    }
}

impl Row for WidgetBResponse {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "DESCRIPTION", "WIDGET A"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            truncate(&optional(self.description.as_deref()), DESCRIPTION_COLUMN_CHARS),
            self.widget_a_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

pub fn render_table<T: Row>(rows: &[T]) -> String {
    let headers = T::headers();
    let cells: Vec<Vec<String>> = rows.iter().map(Row::cells).collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers.to_vec())];
    lines.extend(
        cells
            .iter()
            .map(|row| format_row(row.iter().map(String::as_str).collect())),
    );
    lines.join("\n")
}

pub fn render_footer<T>(page: &PaginatedResponse<T>) -> String {
    if page.total == 0 {
        return "No items found".to_string();
    }
    format!(
        "Page {} of {} ({} items, {} per page)",
        page.page, page.total_pages, page.total, page.page_size
    )
}

pub fn render_list<T: Row>(page: &PaginatedResponse<T>) -> String {
    if page.items.is_empty() {
        return render_footer(page);
    }
    format!("{}\n\n{}", render_table(&page.items), render_footer(page))
}

pub fn render_widget_a(widget: &WidgetAResponse) -> String {
    [
        format!("ID:          {}", widget.id),
        format!("Name:        {}", widget.name),
        format!("Description: {}", optional(widget.description.as_deref())),
        format!("Created:     {}", widget.created_at),
        format!("Updated:     {}", widget.updated_at),
    ]
    .join("\n")
}

pub fn render_widget_b(widget: &WidgetBResponse) -> String {
    [
        format!("ID:          {}", widget.id),
        format!("Name:        {}", widget.name),
        format!("Description: {}", optional(widget.description.as_deref())),
        format!(
            "WidgetA:     {}",
            widget
                .widget_a_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
        format!("Created:     {}", widget.created_at),
        format!("Updated:     {}", widget.updated_at),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_a(id: i32, name: &str, description: Option<&str>) -> WidgetAResponse {
        let now = jiff::Timestamp::UNIX_EPOCH;
        WidgetAResponse {
            id,
            name: name.to_string(),
            description: description.map(String::from),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_table_aligns_columns() {
        let rows = vec![widget_a(1, "gear", None), widget_a(12, "sprocket", Some("teeth"))];
        let table = render_table(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "ID  NAME      DESCRIPTION");
        assert_eq!(lines[1], "1   gear      -");
        assert_eq!(lines[2], "12  sprocket  teeth");
    }

    #[test]
    fn test_long_description_truncated() {
        let long = "x".repeat(60);
        let cells = widget_a(1, "gear", Some(&long)).cells();
        assert_eq!(cells[2].chars().count(), DESCRIPTION_COLUMN_CHARS);
        assert!(cells[2].ends_with("..."));
    }

    #[test]
    fn test_list_footer() {
        let page = PaginatedResponse {
            items: vec![widget_a(1, "gear", None)],
            total: 11,
            page: 2,
            page_size: 10,
            total_pages: 2,
        };
        assert!(render_list(&page).ends_with("Page 2 of 2 (11 items, 10 per page)"));

        let empty = PaginatedResponse::<WidgetAResponse> {
            items: vec![],
            total: 0,
            page: 1,
            page_size: 10,
            total_pages: 0,
        };
        assert_eq!(render_list(&empty), "No items found");
    }

    #[test]
    fn test_detail_shows_missing_parent() {
        let now = jiff::Timestamp::UNIX_EPOCH;
        let widget = WidgetBResponse {
            id: 3,
            name: "cog".to_string(),
            description: None,
            widget_a_id: None,
            created_at: now,
            updated_at: now,
        };
        let text = render_widget_b(&widget);
        assert!(text.contains("WidgetA:     -"));
        assert!(text.contains("Created:     1970-01-01T00:00:00Z"));
    }
}
