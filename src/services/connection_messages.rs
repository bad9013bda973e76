// src/services/connection_messages.rs
//
// User-facing text of a failed resolution.
//
// FORMAT:
//   <count-sensitive prefix>
//
//   <unreachable header>:
//   · https://candidate-a
//   · http://candidate-b
//
//   <incompatible header>:
//   · https://candidate-c
//
// Each section is present only when it has entries.

use serde::{Deserialize, Serialize};

use crate::domain::ProbeResult;

const BULLET: &str = "\u{00b7}";

/// Localizable building blocks of the failure message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionMessages {
    pub prefix_one: String,
    /// `{count}` is replaced with the number of failed candidates
    pub prefix_many: String,
    pub unreachable_header: String,
    pub incompatible_header: String,
}

impl Default for ConnectionMessages {
    fn default() -> Self {
        Self {
            prefix_one: "Could not connect to the server address.".to_string(),
            prefix_many: "Could not connect to any of the {count} server addresses.".to_string(),
            unreachable_header: "Unable to reach server".to_string(),
            incompatible_header: "Unsupported server version or product".to_string(),
        }
    }
}

impl ConnectionMessages {
    pub fn prefix(&self, count: usize) -> String {
        if count == 1 {
            self.prefix_one.clone()
        } else {
            self.prefix_many.replace("{count}", &count.to_string())
        }
    }

    /// Itemized failure message, or `None` when nothing was attempted
    pub fn failure_message(&self, bad: &[ProbeResult]) -> Option<String> {
        if bad.is_empty() {
            return None;
        }

        let (unreachable, incompatible): (Vec<&ProbeResult>, Vec<&ProbeResult>) =
            bad.iter().partition(|result| !result.is_reachable());

        let mut message = self.prefix(bad.len());
        append_section(&mut message, &self.unreachable_header, &unreachable);
        append_section(&mut message, &self.incompatible_header, &incompatible);

        Some(message)
    }
}

fn append_section(message: &mut String, header: &str, results: &[&ProbeResult]) {
    if results.is_empty() {
        return;
    }

    message.push_str("\n\n");
    message.push_str(header);
    message.push_str(":\n");

    let lines: Vec<String> = results
        .iter()
        .map(|result| format!("{} {}", BULLET, result.address))
        .collect();
    message.push_str(&lines.join("\n"));
}
