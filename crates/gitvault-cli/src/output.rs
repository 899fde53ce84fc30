//! CLI output formatting
//!
//! One formatter covering both human and JSON output. Human mode prints
//! checkmark/cross prefixed lines; JSON mode emits structured objects and
//! swallows informational chatter.

/// Output sink for command results
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
    quiet: bool,
}

impl Output {
    pub fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        if self.json {
            println!("{}", serde_json::json!({"success": true, "message": message}));
        } else {
            println!("\u{2713} {}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({"success": false, "error": message}));
        } else {
            eprintln!("\u{2717} Error: {}", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.json {
            return;
        }
        eprintln!("\u{26a0} Warning: {}", message);
    }

    pub fn info(&self, message: &str) {
        if self.json || self.quiet {
            return;
        }
        println!("  {}", message);
    }

    pub fn print_json(&self, value: &serde_json::Value) {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
        }
    }
}
