//! Command modules
//!
//! Modules:
//! - playground: rendering of loaded functions and operation outcomes
//! - usdc: fixed USDC balance viewer

pub mod playground;
pub mod usdc;

/// Titled list of labelled values shown after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub content: Vec<(String, String)>, // (label, value) pairs
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    pub fn add(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.content.push((label.into(), value.into()));
        self
    }

    /// Value of the first entry with `label`
    pub fn get(&self, label: &str) -> Option<&str> {
        self.content
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Render as a title line followed by indented `label: value` lines
    ///
    /// Multi-line values continue on their own indented lines.
    pub fn render(&self) -> String {
        let mut out = self.title.clone();
        for (label, value) in &self.content {
            out.push('\n');
            if value.contains('\n') {
                out.push_str(&format!("  {}:", label));
                for line in value.lines() {
                    out.push_str(&format!("\n    {}", line));
                }
            } else {
                out.push_str(&format!("  {}: {}", label, value));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_multiline() {
        let report = Report::new("Result")
            .add("status", "ok")
            .add("value", "[\n  \"1\"\n]");
        assert_eq!(
            report.render(),
            "Result\n  status: ok\n  value:\n    [\n      \"1\"\n    ]"
        );
        assert_eq!(report.get("status"), Some("ok"));
    }
}
