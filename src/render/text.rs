//! Description layout.
//!
//! Two wrapping strategies are supported. `EvenSlices` cuts the description
//! into equal character-count slices based on how far its rendered width
//! overshoots the cutoff; glyph widths are not taken into account, so lines
//! can come out visually uneven. `DisplayColumns` wraps by terminal-style
//! column width where CJK characters count double.

use serde::{Deserialize, Serialize};

const TAB_WIDTH: usize = 4;

/// Anything that can report the rendered pixel width of a string.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> u32;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapPolicy {
    #[default]
    EvenSlices,
    DisplayColumns,
}

/// Splits a description into the lines to draw.
///
/// Text whose measured width fits within `cutoff` is returned untouched as a
/// single line.
pub fn describe_lines<M: TextMeasure + ?Sized>(
    text: &str,
    measure: &M,
    cutoff: u32,
    policy: WrapPolicy,
    columns: usize,
) -> Vec<String> {
    let width = measure.text_width(text);
    if cutoff == 0 || width <= cutoff {
        return vec![text.to_string()];
    }

    match policy {
        WrapPolicy::EvenSlices => even_slices(text, (width / cutoff) as usize),
        WrapPolicy::DisplayColumns => wrap_columns(text, columns)
            .lines()
            .map(str::to_string)
            .collect(),
    }
}

/// `cutter` equal slices of `len / cutter` chars, plus whatever is left over
/// on one extra line. Each slice is trimmed.
fn even_slices(text: &str, cutter: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let cutter = cutter.max(1);
    let length = chars.len() / cutter;

    let slice = |start: usize, end: usize| -> String {
        chars[start..end].iter().collect::<String>().trim().to_string()
    };

    let mut lines: Vec<String> = (0..cutter)
        .map(|i| slice(i * length, (i + 1) * length))
        .collect();
    lines.push(slice(cutter * length, chars.len()));
    lines
}

/// Display width of a single character: 3-byte UTF-8 sequences (the CJK
/// ideograph range) take two columns.
pub fn char_columns(ch: char) -> usize {
    if ch.len_utf8() == 3 {
        2
    } else {
        1
    }
}

/// Inserts a line break whenever the running column count reaches `width`.
/// Tabs expand to the next multiple of four columns. The result always ends
/// with exactly one newline.
pub fn wrap_columns(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / width.max(1) + 1);
    let mut column = 0;

    for ch in text.chars() {
        match ch {
            '\n' => {
                out.push('\n');
                column = 0;
                continue;
            }
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            _ => {
                out.push(ch);
                column += char_columns(ch);
            }
        }

        if width > 0 && column >= width {
            out.push('\n');
            column = 0;
        }
    }

    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
