//! Text-level gold scanning and patching for extracted `.lsx` level data.
//!
//! The level file is only ever edited line by line so that everything outside
//! the patched attribute values stays byte-identical; a structural XML
//! rewrite would churn the whole document and risk upsetting the repacker.

use tracing::debug;

use super::BackendError;
use crate::domain::{GoldItem, GoldState};

/// Sum every gold stack in the level data
///
/// Gold lives in `ItemList` nodes whose `Item` child carries a `LOOT_Gold` or
/// `OBJ_Gold` stat reference. A stack with a missing or unparseable `Amount`
/// counts as 1.
pub fn scan_gold(content: &str) -> GoldState {
    let mut items = Vec::new();
    let mut total_gold = 0;

    let sections: Vec<&str> = content.split("<node id=\"ItemList\">").collect();
    debug!(sections = sections.len() - 1, "scanning ItemList sections for gold");

    for section in sections.iter().skip(1) {
        // Limit scope to this list's first item entry
        let end = section.find("</node>").unwrap_or(section.len());
        let section = &section[..end];

        for item in section.split("<node id=\"Item\">").skip(1) {
            if !is_gold_item(item) {
                continue;
            }

            let amount = attribute_value(item, "Amount")
                .map(|v| parse_amount(&v))
                .unwrap_or(1);
            let name = attribute_value(item, "ItemName").unwrap_or_else(|| "Gold".to_string());

            debug!(%name, amount, "found gold stack");
            total_gold += amount;
            items.push(GoldItem { name, amount });
        }
    }

    debug!(total_gold, stacks = items.len(), "gold scan complete");
    GoldState { total_gold, items }
}

/// Rewrite the gold total in the level data
///
/// Consolidates the whole amount into the first gold stack and collapses the
/// remaining stacks to 1 coin each, returning the patched document.
pub fn rewrite_gold(content: &str, new_amount: i32) -> Result<String, BackendError> {
    if new_amount < 0 {
        return Err(BackendError::InvalidValue(
            "Gold amount cannot be negative".to_string(),
        ));
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut result_lines = Vec::with_capacity(lines.len());
    let mut patched_stacks = 0;
    let mut first_patched = false;
    let mut in_item_node = false;
    let mut item_is_gold = false;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("<node id=\"Item\">") {
            in_item_node = true;
            item_is_gold = gold_marker_ahead(&lines, i);
        }

        if in_item_node && item_is_gold && is_amount_attribute(trimmed) {
            patched_stacks += 1;
            let amount = if first_patched {
                1 // keep secondary stacks minimal
            } else {
                first_patched = true;
                new_amount
            };

            if let Some(patched) = set_attribute_value(line, amount) {
                result_lines.push(patched);
                continue;
            }
        }

        if in_item_node && trimmed == "</node>" {
            in_item_node = false;
            item_is_gold = false;
        }

        result_lines.push(line.to_string());
    }

    if patched_stacks == 0 {
        return Err(BackendError::MissingArtifact(
            "No gold inventory items found in save file".to_string(),
        ));
    }

    debug!(patched_stacks, new_amount, "rewrote gold stacks");
    Ok(result_lines.join("\n"))
}

/// Extract an attribute value by id, e.g. `id="Amount" ... value="123"`
fn attribute_value(text: &str, attr_id: &str) -> Option<String> {
    let id_marker = format!("id=\"{}\"", attr_id);
    let id_idx = text.find(&id_marker)?;

    let value_marker = "value=\"";
    let value_idx = text[id_idx..].find(value_marker)?;
    let value_start = id_idx + value_idx + value_marker.len();

    let value_end = text[value_start..].find('"')?;
    Some(text[value_start..value_start + value_end].to_string())
}

fn is_gold_item(item_text: &str) -> bool {
    item_text.contains("LOOT_Gold") || item_text.contains("OBJ_Gold")
}

fn parse_amount(value: &str) -> i32 {
    value.parse::<i32>().unwrap_or(1)
}

/// Look ahead from an opening Item node for a gold marker
///
/// Gives up at the node's closing tag or after 50 lines, whichever comes
/// first.
fn gold_marker_ahead(lines: &[&str], start_idx: usize) -> bool {
    for line in lines
        .iter()
        .take(std::cmp::min(start_idx + 50, lines.len()))
        .skip(start_idx + 1)
    {
        if line.trim().starts_with("</node>") {
            return false;
        }
        if line.contains("LOOT_Gold") || line.contains("OBJ_Gold") {
            return true;
        }
    }
    false
}

fn is_amount_attribute(line: &str) -> bool {
    line.contains("id=\"Amount\"") && line.contains("type=\"int32\"") && line.contains("value=\"")
}

/// Swap the first `value="..."` on the line for `new_value`
fn set_attribute_value(line: &str, new_value: i32) -> Option<String> {
    let marker = "value=\"";
    let value_start = line.find(marker)? + marker.len();
    let value_end = line[value_start..].find('"')?;

    Some(format!(
        "{}{}{}",
        &line[..value_start],
        new_value,
        &line[value_start + value_end..]
    ))
}
