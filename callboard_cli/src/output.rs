use callboard_client::{CallRecord, LayoutPreferences, SyncState};

pub fn print_calls(records: &[CallRecord]) {
    if records.is_empty() {
        println!("No calls.");
        return;
    }
    for record in records {
        println!("{}", call_line(record));
    }
}

fn call_line(record: &CallRecord) -> String {
    let star = if record.is_starred { "*" } else { " " };
    let who = record
        .caller_name
        .as_deref()
        .or(record.from_number.as_deref())
        .unwrap_or("unknown caller");
    let when = record
        .started_at
        .as_deref()
        .or(record.created_at.as_deref())
        .unwrap_or("-");
    let duration = record
        .duration_seconds
        .map(|secs| format!("{}m{:02}s", secs / 60, secs % 60))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{star} #{:<6} {:<12} {:<24} {:<22} {}",
        record.id, record.status, who, when, duration
    )
}

pub fn print_footer(state: &SyncState, next_cursor: Option<&str>) {
    println!(
        "{} call(s) held, more available: {}, next cursor: {}",
        state.items.len(),
        state.has_more(),
        next_cursor.unwrap_or("none")
    );
}

pub fn print_layout(layout: &LayoutPreferences) {
    if layout.section_order.is_empty() {
        println!("Section order: (default)");
    } else {
        println!("Section order: {}", layout.section_order.join(", "));
    }
    let collapsed: Vec<&str> = layout
        .collapsed_sections
        .iter()
        .filter(|(_, collapsed)| **collapsed)
        .map(|(name, _)| name.as_str())
        .collect();
    if collapsed.is_empty() {
        println!("Collapsed: none");
    } else {
        println!("Collapsed: {}", collapsed.join(", "));
    }
}
