use phdigest_core::{ResultRow, COLUMNS};

/// Plain-text table with every row, columns padded to their widest cell.
///
/// `upvotes` is right-aligned, everything else left-aligned.
#[must_use]
pub fn format_table(rows: &[ResultRow]) -> String {
    let cells: Vec<[String; 5]> = rows.iter().map(ResultRow::cells).collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |values: [&str; 5]| -> String {
        let mut line = String::new();
        for (i, (value, width)) in values.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let pad = " ".repeat(width - value.chars().count());
            if i == 3 {
                line.push_str(&pad);
                line.push_str(value);
            } else {
                line.push_str(value);
                line.push_str(&pad);
            }
        }
        line.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(render(COLUMNS));
    for row in &cells {
        lines.push(render([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ]));
    }
    lines.join("\n")
}
