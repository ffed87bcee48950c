//! Plain aligned tables for `--format table`.

const MIN_COLUMN: usize = 6;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render `rows` under `headers`, shrinking the widest columns first when
/// the table exceeds `options.max_width`.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain([header.chars().count(), MIN_COLUMN])
                .max()
                .unwrap_or(MIN_COLUMN)
        })
        .collect::<Vec<_>>();
    if let Some(max) = options.max_width {
        shrink(&mut widths, max);
    }

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(text, width)| pad(&clip(text, *width), *width, false))
        .collect::<Vec<_>>()
        .join(GAP);
    let mut lines = vec![header.trim_end().to_string(), "-".repeat(header.trim_end().chars().count())];

    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = clip(row.get(index).map_or("-", String::as_str), *width);
                let numeric = is_numeric(&cell);
                let padded = pad(&cell, *width, numeric);
                if options.color {
                    paint(&padded, &cell)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(GAP);
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn shrink(widths: &mut [usize], max: usize) {
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    while widths.iter().sum::<usize>() + gaps > max {
        let Some(widest) = widths
            .iter_mut()
            .filter(|w| **w > MIN_COLUMN)
            .max_by_key(|w| **w)
        else {
            break;
        };
        *widest -= 1;
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out = text.chars().take(width.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.chars().count()));
    if right_align {
        format!("{fill}{text}")
    } else {
        format!("{text}{fill}")
    }
}

fn is_numeric(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
}

/// Color known status words; padding stays outside the escape codes.
fn paint(padded: &str, cell: &str) -> String {
    let code = match cell.trim() {
        "completed" | "authenticated" | "true" => "32",
        "pending" | "processing" | "anonymous" => "33",
        "failed" | "unidentified" | "not_found" => "31",
        _ => return padded.to_string(),
    };
    padded.replacen(cell, &format!("\u{1b}[{code}m{cell}\u{1b}[0m"), 1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["r-1".into(), "2018 Honda Civic".into(), "60000".into()],
            vec!["r-22".into(), "2021 Toyota Corolla Hybrid".into(), "1200".into()],
        ]
    }

    #[test]
    fn columns_align_and_numbers_right_justify() {
        let out = render(&["id", "vehicle", "mileage"], &rows(), TableOptions::default());
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].ends_with("60000"));
        assert!(lines[3].ends_with(" 1200"));
        assert_eq!(lines[2].find("2018"), lines[3].find("2021"));
    }

    #[test]
    fn narrow_terminal_clips_the_widest_column() {
        let options = TableOptions {
            max_width: Some(30),
            color: false,
        };
        let out = render(&["id", "vehicle", "mileage"], &rows(), options);
        assert!(out.lines().all(|line| line.chars().count() <= 30));
        assert!(out.contains('…'));
    }

    #[test]
    fn status_words_are_colored_only_when_asked() {
        let rows = vec![vec!["failed".to_string()]];
        let plain = render(&["status"], &rows, TableOptions::default());
        assert!(!plain.contains('\u{1b}'));
        let colored = render(
            &["status"],
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(colored.contains("\u{1b}[31mfailed\u{1b}[0m"));
    }
}
