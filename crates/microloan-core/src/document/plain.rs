use crate::document::block::{column_alignment, Alignment, Block, BlockKind};
use crate::document::sink::DocumentSink;
use crate::layout::metrics::words;
use crate::MicroloanResult;

/// Line width of the text export, in characters.
pub const DEFAULT_WIDTH: usize = 80;
const MIN_WIDTH: usize = 32;
const LABEL_COLUMN: usize = 26;
const SIGNATURE_COLUMN: usize = 30;
const SIGNATURE_BLANK: &str = "___________________";

/// Renders blocks as a fixed-width UTF-8 text document with box-drawn tables.
#[derive(Debug)]
pub struct PlainTextSink {
    width: usize,
    out: String,
    table: Vec<(Vec<String>, bool)>,
    last: Option<BlockKind>,
}

impl Default for PlainTextSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainTextSink {
    pub fn new() -> Self {
        Self::with_width(DEFAULT_WIDTH)
    }

    pub fn with_width(width: usize) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            out: String::new(),
            table: Vec::new(),
            last: None,
        }
    }

    // Blank line between blocks, except inside a run of labeled values.
    fn separate(&mut self, kind: BlockKind) {
        if let Some(last) = self.last {
            if !(last == BlockKind::LabeledValue && kind == BlockKind::LabeledValue) {
                self.out.push('\n');
            }
        }
        self.last = Some(kind);
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text.trim_end());
        self.out.push('\n');
    }

    fn aligned(&mut self, text: &str, align: Alignment) {
        let padded = pad(text, self.width, align);
        self.line(&padded);
    }

    fn flush_table(&mut self) {
        if self.table.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.table);
        let columns = rows.iter().map(|(cells, _)| cells.len()).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for (cells, _) in &rows {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let border = |left: char, mid: char, right: char| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}", inner.join(&mid.to_string()))
        };

        let top = border('┌', '┬', '┐');
        self.line(&top);
        let mut header_open = true;
        for (cells, header) in &rows {
            if header_open && !header {
                if rows.first().is_some_and(|(_, h)| *h) {
                    let divider = border('├', '┼', '┤');
                    self.line(&divider);
                }
                header_open = false;
            }
            let rendered: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    format!(" {} ", pad(cell, *w, column_alignment(i)))
                })
                .collect();
            let row = format!("│{}│", rendered.join("│"));
            self.line(&row);
        }
        let bottom = border('└', '┴', '┘');
        self.line(&bottom);
    }
}

impl DocumentSink for PlainTextSink {
    type Output = String;

    fn write_block(&mut self, block: &Block) -> MicroloanResult<()> {
        if let Block::TableRow { cells, header } = block {
            if self.table.is_empty() {
                self.separate(BlockKind::TableRow);
            }
            self.table.push((cells.clone(), *header));
            return Ok(());
        }

        self.flush_table();
        self.separate(block.kind());

        match block {
            Block::Heading { text, level } => {
                let rule = match level {
                    1 => Some("═"),
                    2 => Some("─"),
                    _ => None,
                };
                if let Some(r) = rule {
                    let line = r.repeat(self.width);
                    self.line(&line);
                }
                for l in wrap_chars(text, self.width) {
                    self.aligned(&l, Alignment::Center);
                }
                if let Some(r) = rule {
                    let line = r.repeat(self.width);
                    self.line(&line);
                }
            }
            Block::Paragraph { text, align } => {
                for l in wrap_chars(text, self.width) {
                    self.aligned(&l, *align);
                }
            }
            Block::LabeledValue { label, value } => {
                let label_len = label.chars().count();
                if label_len < LABEL_COLUMN {
                    let lines = wrap_chars(value, self.width - LABEL_COLUMN);
                    for (i, l) in lines.iter().enumerate() {
                        let head = if i == 0 { label.as_str() } else { "" };
                        let row = format!("{head:<LABEL_COLUMN$}{l}");
                        self.line(&row);
                    }
                } else {
                    for l in wrap_chars(&format!("{label} {value}"), self.width) {
                        self.line(&l);
                    }
                }
            }
            Block::SignatureLine {
                role,
                caption,
                signer,
            } => {
                let first = format!("{role:<SIGNATURE_COLUMN$}{SIGNATURE_BLANK}");
                let blank_width = SIGNATURE_BLANK.chars().count();
                let second = format!("{:SIGNATURE_COLUMN$}{caption:^blank_width$}", "");
                match signer.as_deref().filter(|s| !s.is_empty()) {
                    Some(name) if first.chars().count() + 2 + name.chars().count() <= self.width => {
                        let line = format!("{first}  {name}");
                        self.line(&line);
                    }
                    Some(name) => {
                        self.line(&first);
                        self.aligned(name, Alignment::Right);
                    }
                    None => self.line(&first),
                }
                self.line(&second);
            }
            Block::Rule => {
                let line = "_".repeat(self.width);
                self.line(&line);
            }
            Block::Spacer => self.line(""),
            Block::Bitmap(bitmap) => {
                let note = format!("[изображение {}×{}]", bitmap.width(), bitmap.height());
                self.aligned(&note, Alignment::Center);
            }
            // Buffered above.
            Block::TableRow { .. } => {}
        }
        Ok(())
    }

    fn finish(mut self) -> MicroloanResult<String> {
        self.flush_table();
        Ok(self.out)
    }
}

/// Pad `text` to `width` characters according to `align`.
fn pad(text: &str, width: usize, align: Alignment) -> String {
    match align {
        Alignment::Left => format!("{text:<width$}"),
        Alignment::Center => format!("{text:^width$}"),
        Alignment::Right => format!("{text:>width$}"),
    }
}

/// Greedy word wrap by character count. Explicit newlines are kept and words
/// longer than `width` are split.
pub fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in words(paragraph) {
            let mut word: Vec<char> = word.chars().collect();
            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                }
                current.extend(word.iter());
                current_len = needed;
                continue;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            while word.len() > width {
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            current_len = word.len();
            current = word.into_iter().collect();
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::sink::emit;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap_chars("один два три четыре пять", 9);
        assert_eq!(lines, vec!["один два", "три", "четыре", "пять"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn test_wrap_splits_long_words_and_keeps_newlines() {
        let lines = wrap_chars("abcdefghij\nxy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_table_gets_box_borders() {
        let blocks = vec![
            Block::table_header(["День", "Платёж"]),
            Block::table_row(["1", "2 667 ₽"]),
            Block::table_row(["30", "2 657 ₽"]),
        ];
        let text = emit(&blocks, PlainTextSink::new()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "┌──────┬─────────┐");
        assert_eq!(lines[1], "│ День │  Платёж │");
        assert_eq!(lines[2], "├──────┼─────────┤");
        assert_eq!(lines[3], "│ 1    │ 2 667 ₽ │");
        assert_eq!(lines[4], "│ 30   │ 2 657 ₽ │");
        assert_eq!(lines[5], "└──────┴─────────┘");
    }

    #[test]
    fn test_labeled_values_stay_together() {
        let blocks = vec![
            Block::labeled("Сумма займа:", "50 000 рублей"),
            Block::labeled("Срок займа:", "30 дней"),
            Block::paragraph("Текст"),
        ];
        let text = emit(&blocks, PlainTextSink::new()).unwrap();
        assert_eq!(
            text,
            "Сумма займа:              50 000 рублей\nСрок займа:               30 дней\n\nТекст\n"
        );
    }

    #[test]
    fn test_title_is_centered_between_rules() {
        let text = emit(&[Block::title("ГРАФИК")], PlainTextSink::with_width(40)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "═".repeat(40));
        assert_eq!(lines[1], format!("{}ГРАФИК", " ".repeat(17)));
        assert_eq!(lines[2], "═".repeat(40));
    }

    #[test]
    fn test_no_line_exceeds_width() {
        let long = "слово ".repeat(100);
        let text = emit(
            &[Block::paragraph(long.clone()), Block::labeled("Адрес:", long)],
            PlainTextSink::new(),
        )
        .unwrap();
        assert!(text.lines().all(|l| l.chars().count() <= DEFAULT_WIDTH));
    }
}
