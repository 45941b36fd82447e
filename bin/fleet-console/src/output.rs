//! Command output: pretty JSON with `--json`, aligned text otherwise.

use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints `value` as JSON, or the lines produced by `render`.
    pub fn show<T, F>(&self, value: &T, render: F) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> Vec<String>,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            for line in render(value) {
                println!("{line}");
            }
        }
        Ok(())
    }

    /// Prints a list, or `empty` when there is nothing to show in text mode.
    pub fn list<T, F>(&self, items: &[T], empty: &str, row: F) -> anyhow::Result<()>
    where
        T: Serialize,
        F: Fn(&T) -> String,
    {
        self.show(items, |items| {
            if items.is_empty() {
                vec![empty.to_string()]
            } else {
                items.iter().map(&row).collect()
            }
        })
    }

    /// A one-line acknowledgement (`{"ok": .., "message": ..}` in JSON mode).
    pub fn status(&self, ok: bool, message: &str) -> anyhow::Result<()> {
        self.show(&serde_json::json!({ "ok": ok, "message": message }), |_| {
            vec![message.to_string()]
        })
    }
}

/// Placeholder for absent optional fields in text output.
pub fn opt(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
