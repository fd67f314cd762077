//! Output formatting for the `copyx` commands.
//!
//! Status lines go to stderr so stdout stays free for the OSC 52
//! sequences the legacy copy path emits.

use copyx::{CopyError, CopyFormat, CopyState, CopyValue};

/// Print a one-line confirmation of a finished copy.
pub fn print_copied(value: &CopyValue, format: CopyFormat) {
    eprintln!("Copied {} as {format}", describe_value(value));
}

/// Print a demo button's label, outcome and the resulting state.
pub fn print_button(label: &str, result: &Result<(), CopyError>, state: &CopyState) {
    let status = match result {
        Ok(()) => "Copied!".to_string(),
        Err(e) => format!("failed: {e}"),
    };
    eprintln!("[{label}] {status}");
    print_state(state);
}

/// Print the observable adapter state.
pub fn print_state(state: &CopyState) {
    eprintln!("  {}", describe_state(state));
}

/// Print the copy history, most recent first.
pub fn print_history(state: &CopyState) {
    if state.history.is_empty() {
        eprintln!("No copies in history");
        return;
    }

    eprintln!("{:<16} VALUE", "TIMESTAMP");
    eprintln!("{}", "-".repeat(60));
    for entry in &state.history {
        eprintln!("{:<16} {}", entry.timestamp, describe_value(&entry.value));
    }
}

/// Human summary of a copied value.
fn describe_value(value: &CopyValue) -> String {
    match value {
        CopyValue::Text(s) | CopyValue::Markup(s) => {
            format!("{} ({} bytes)", value.shape(), s.len())
        }
        CopyValue::Record(_) => "record".to_string(),
        CopyValue::Blob(blob) => format!(
            "{} blob ({} bytes)",
            blob.mime().unwrap_or("untyped"),
            blob.data().len()
        ),
    }
}

fn describe_state(state: &CopyState) -> String {
    format!(
        "copying={} copies={} last={}",
        if state.is_copying { "yes" } else { "no" },
        state.copy_count,
        state
            .last_copied
            .as_ref()
            .map_or("-".to_string(), |e| describe_value(&e.value)),
    )
}
