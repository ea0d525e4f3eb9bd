//! CSV rendering of the claim rows.

use claimdex_common::ClaimRow;

const ITEM_JOIN: &str = "; ";

/// Render rows as flat CSV text: a header line, then one line per
/// claimant with their sorted item list joined by `"; "`. Every field is
/// quoted, embedded quotes doubled.
pub fn to_csv(rows: &[ClaimRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("{},{}", quote("claimant_url"), quote("item_urls")));
    for row in rows {
        let items = row
            .items
            .iter()
            .map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join(ITEM_JOIN);
        lines.push(format!("{},{}", quote(row.claimant.as_str()), quote(&items)));
    }
    lines.join("\n")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
