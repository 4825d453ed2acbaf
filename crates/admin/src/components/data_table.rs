//! Static layout of the admin tables: header columns, header filters and
//! the empty-state copy. Row data lives in [`super::TableState`].

use winter_gifts_core::DonationStatus;

/// A header cell.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    /// Right-aligned, used for money.
    pub numeric: bool,
}

const fn text(key: &'static str, label: &'static str) -> Column {
    Column {
        key,
        label,
        numeric: false,
    }
}

const fn amount(key: &'static str, label: &'static str) -> Column {
    Column {
        key,
        label,
        numeric: true,
    }
}

const DONATION_COLUMNS: &[Column] = &[
    text("donor", "Donor"),
    text("project", "Project"),
    amount("amount", "Amount"),
    text("status", "Status"),
    text("history", "History"),
    text("created", "Received"),
];

const PROJECT_COLUMNS: &[Column] = &[
    text("title", "Project"),
    text("slug", "Slug"),
    amount("goal", "Goal"),
    amount("raised", "Raised"),
    text("published", "Published"),
];

#[derive(Debug, Clone, Copy)]
pub struct FilterOption {
    /// Query value; empty means no filtering.
    pub value: &'static str,
    pub label: &'static str,
}

/// A `<select>` in the table header, submitted as `?key=value`.
#[derive(Debug, Clone)]
pub struct TableFilter {
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<FilterOption>,
}

/// Layout for one admin table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Prefix of the HTMX swap target id (`{table_id}-table`).
    pub table_id: &'static str,
    pub columns: &'static [Column],
    pub filters: Vec<TableFilter>,
    pub empty_title: &'static str,
    pub empty_description: Option<&'static str>,
}

impl DataTableConfig {
    /// Data columns plus the trailing actions column.
    #[must_use]
    pub const fn colspan(&self) -> usize {
        self.columns.len() + 1
    }
}

fn status_filter() -> TableFilter {
    let any = FilterOption {
        value: "",
        label: "All statuses",
    };
    let options = std::iter::once(any)
        .chain(DonationStatus::ALL.iter().map(|status| FilterOption {
            value: status.as_str(),
            label: status.label(),
        }))
        .collect();

    TableFilter {
        key: "status",
        label: "Status",
        options,
    }
}

#[must_use]
pub fn donations_table_config() -> DataTableConfig {
    DataTableConfig {
        table_id: "donations",
        columns: DONATION_COLUMNS,
        filters: vec![status_filter()],
        empty_title: "No donations found",
        empty_description: Some("Try a different status filter"),
    }
}

#[must_use]
pub fn projects_table_config() -> DataTableConfig {
    DataTableConfig {
        table_id: "projects",
        columns: PROJECT_COLUMNS,
        filters: Vec::new(),
        empty_title: "No projects yet",
        empty_description: Some("Create the first project above"),
    }
}
