// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text layout and label drawing.
//!
//! All indices are byte offsets into the UTF-8 text. With
//! [`TextFlags::recolor`] set, `#RRGGBB text#` switches the color of `text`;
//! the command characters take no space and are never drawn. `##` inside a
//! command parameter draws a literal `#`.

use tessera_core::area::{Area, Coord, Point};
use tessera_core::color::{Opa, Rgb};
use tessera_core::font::Font;
use tessera_core::painter::TextFlags;
use tessera_core::style::Style;

use crate::canvas::Canvas;
use crate::raster::letter;

/// Opens and closes a recolor command.
pub const CMD_CHAR: char = '#';

/// Characters after which a line may wrap.
const BREAK_CHARS: &[char] = &[' ', ',', '.', ';', ':', '-', '_'];

/// Recolor parser state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CmdState {
    /// Plain text.
    #[default]
    Wait,
    /// Reading the color parameter up to the first space.
    Par,
    /// Inside recolored text.
    In,
}

/// Advances the recolor parser by `ch`.
///
/// Returns `true` when `ch` belongs to a command and must not be drawn.
pub fn is_cmd(state: &mut CmdState, ch: char) -> bool {
    if ch == CMD_CHAR {
        return match *state {
            CmdState::Wait => {
                *state = CmdState::Par;
                true
            }
            // `##`: the second one is drawn.
            CmdState::Par => {
                *state = CmdState::Wait;
                false
            }
            CmdState::In => {
                *state = CmdState::Wait;
                true
            }
        };
    }
    if *state == CmdState::Par {
        if ch == ' ' {
            *state = CmdState::In;
        }
        return true;
    }
    false
}

fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Length in bytes of the first line of `text` when wrapped at `max_width`.
///
/// A `\n` or `\r` ends the line and is included in it; `\r\n` and `\n\r`
/// count as one break. When the line overflows it is cut after the last
/// break character, or before the overflowing character if there was none,
/// and spaces at the cut are moved to the end of the line. A non-empty text
/// always yields at least one character.
#[must_use]
pub fn next_line(
    text: &str,
    font: &dyn Font,
    letter_space: Coord,
    max_width: Coord,
    flags: TextFlags,
) -> usize {
    let max_width = if flags.expand { Coord::MAX } else { max_width };
    let mut state = CmdState::Wait;
    let mut width: Coord = 0;
    let mut last_break = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        let next = i + ch.len_utf8();
        if flags.recolor && is_cmd(&mut state, ch) {
            continue;
        }
        if !flags.no_break && is_line_break(ch) {
            return match chars.peek() {
                Some(&(_, n)) if is_line_break(n) && n != ch => next + n.len_utf8(),
                _ => next,
            };
        }

        width = width.saturating_add(font.glyph_width(ch));
        if width > max_width {
            let cut = if BREAK_CHARS.contains(&ch) {
                next
            } else if let Some(b) = last_break {
                b
            } else if i == 0 {
                next
            } else {
                i
            };
            let spaces = text[cut..].bytes().take_while(|b| *b == b' ').count();
            return cut + spaces;
        }
        if BREAK_CHARS.contains(&ch) {
            last_break = Some(next);
        }
        width = width.saturating_add(letter_space);
    }
    text.len()
}

/// Rendered width of one line.
///
/// Trailing spaces are not counted, nor is spacing after the last glyph.
#[must_use]
pub fn text_width(text: &str, font: &dyn Font, letter_space: Coord, flags: TextFlags) -> Coord {
    let mut state = CmdState::Wait;
    let mut width = 0;
    let mut glyphs = 0_usize;
    for ch in text.chars() {
        if flags.recolor && is_cmd(&mut state, ch) {
            continue;
        }
        if is_line_break(ch) {
            continue;
        }
        width += font.glyph_width(ch) + letter_space;
        glyphs += 1;
    }
    let trailing = text
        .trim_end_matches(is_line_break)
        .chars()
        .rev()
        .take(glyphs.saturating_sub(1))
        .take_while(|c| *c == ' ')
        .count();
    for _ in 0..trailing {
        width -= font.glyph_width(' ') + letter_space;
    }
    if glyphs > 0 {
        width -= letter_space;
    }
    width.max(0)
}

/// Size of `text` wrapped at `max_width`.
#[must_use]
pub fn text_size(
    text: &str,
    font: &dyn Font,
    letter_space: Coord,
    line_space: Coord,
    max_width: Coord,
    flags: TextFlags,
) -> Point {
    let line_height = font.height();
    let mut size = Point::new(0, 0);
    let mut start = 0;
    while start < text.len() {
        let len = next_line(&text[start..], font, letter_space, max_width, flags);
        size.y += line_height + line_space;
        let w = text_width(&text[start..start + len], font, letter_space, flags);
        size.x = size.x.max(w);
        start += len;
    }
    if text.ends_with(is_line_break) {
        size.y += line_height + line_space;
    }
    if size.y == 0 {
        size.y = line_height;
    } else {
        size.y -= line_space;
    }
    size
}

/// Parses a recolor parameter: exactly six hex digits.
fn parse_color(par: &str) -> Option<Rgb> {
    if par.len() != 6 || !par.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(par, 16).ok().map(Rgb::hex)
}

/// Draws `text` inside `area` with the text style of `style`.
pub fn draw_label(
    canvas: &mut Canvas,
    area: &Area,
    mask: &Area,
    style: &Style,
    opa: Opa,
    text: &str,
    flags: TextFlags,
) {
    let Some(font) = style.text.font.as_deref() else {
        return;
    };
    let ts = &style.text;
    let width = if flags.expand {
        text_size(text, font, ts.letter_space, ts.line_space, Coord::MAX, flags).x
    } else {
        area.width()
    };
    let line_x = |line: &str| {
        if flags.center {
            area.x1 + (width - text_width(line, font, ts.letter_space, flags)) / 2
        } else {
            area.x1
        }
    };

    let mut state = CmdState::Wait;
    let mut par_start = 0;
    let mut recolor = ts.color;
    let mut start = 0;
    let mut pos = area.origin();
    while start < text.len() {
        let end = start + next_line(&text[start..], font, ts.letter_space, width, flags);
        let line = &text[start..end];
        pos.x = line_x(line);
        for (i, ch) in line.char_indices() {
            let at = start + i;
            if flags.recolor {
                let before = state;
                if is_cmd(&mut state, ch) {
                    if before == CmdState::Wait {
                        par_start = at + ch.len_utf8();
                    } else if before == CmdState::Par && state == CmdState::In {
                        recolor = parse_color(&text[par_start..at])
                            .map_or(ts.color, |rgb| ts.color.depth().make(rgb));
                    }
                    continue;
                }
            }
            let color = if state == CmdState::In { recolor } else { ts.color };
            letter(canvas, pos, mask, font, ch, color, opa);
            pos.x += font.glyph_width(ch) + ts.letter_space;
        }
        pos.y += font.height() + ts.line_space;
        if pos.y > mask.y2 {
            return;
        }
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;

    use super::*;
    use tessera_core::color::{Color, ColorDepth, OPA_COVER, mix};
    use tessera_core::font::FixedFont;

    fn font() -> FixedFont {
        FixedFont::new(6, 8)
    }

    fn lines(text: &str, max: Coord) -> alloc::vec::Vec<&str> {
        let f = font();
        let mut out = alloc::vec::Vec::new();
        let mut start = 0;
        while start < text.len() {
            let len = next_line(&text[start..], &f, 0, max, TextFlags::default());
            assert!(len > 0, "line at {start} of {text:?} is empty");
            out.push(&text[start..start + len]);
            start += len;
        }
        out
    }

    #[test]
    fn breaks_after_the_space_that_overflows() {
        let n = next_line("hello world", &font(), 0, 35, TextFlags::default());
        assert_eq!(n, 6, "next line starts at 'w'");
    }

    #[test]
    fn backs_up_to_the_last_break_char() {
        assert_eq!(lines("ab cd", 27), ["ab ", "cd"]);
        assert_eq!(lines("one,two", 30), ["one,", "two"]);
        assert_eq!(lines("ab:cd", 27), ["ab:", "cd"]);
    }

    #[test]
    fn forces_a_break_without_break_chars() {
        assert_eq!(lines("abcdefgh", 20), ["abc", "def", "gh"]);
    }

    #[test]
    fn spaces_at_a_cut_stay_on_the_first_line() {
        assert_eq!(lines("abcde   fg", 24), ["abcd", "e   ", "fg"]);
    }

    #[test]
    fn newline_pairs_fold_into_one_break() {
        assert_eq!(lines("ab\r\ncd\n\ref", 100), ["ab\r\n", "cd\n\r", "ef"]);
        assert_eq!(lines("ab\n\ncd", 100), ["ab\n", "\n", "cd"]);
    }

    #[test]
    fn lines_reconstruct_the_text() {
        let samples = [
            "hello world",
            "a much longer sentence, with punctuation; and-dashes_too",
            "   leading spaces",
            "x",
            "multi\nline\r\ntext with trailing  ",
            "größe über alles",
        ];
        for text in samples {
            for max in [6, 7, 13, 35, 60, 1000] {
                let joined: String = lines(text, max).concat();
                assert_eq!(joined, text, "max width {max}");
            }
        }
    }

    #[test]
    fn expand_never_wraps() {
        let flags = TextFlags {
            expand: true,
            ..TextFlags::default()
        };
        assert_eq!(next_line("hello world", &font(), 0, 10, flags), 11);
    }

    #[test]
    fn recolor_commands_take_no_width() {
        let flags = TextFlags {
            recolor: true,
            ..TextFlags::default()
        };
        let f = font();
        assert_eq!(text_width("#ff0000 ab#", &f, 0, flags), 12);
        assert_eq!(text_width("a##", &f, 0, flags), 12, "escaped hash is drawn");
    }

    #[test]
    fn width_ignores_trailing_spaces_and_spacing() {
        let f = font();
        assert_eq!(text_width("ab ", &f, 1, TextFlags::default()), 13);
        assert_eq!(text_width("", &f, 1, TextFlags::default()), 0);
    }

    #[test]
    fn size_counts_lines() {
        let f = font();
        let flags = TextFlags::default();
        assert_eq!(text_size("ab\ncd", &f, 1, 2, 100, flags), Point::new(13, 18));
        assert_eq!(text_size("", &f, 1, 2, 100, flags), Point::new(0, 8));
        assert_eq!(text_size("ab\n", &f, 0, 2, 100, flags), Point::new(12, 18));
    }

    #[test]
    fn cmd_parser_states() {
        let mut s = CmdState::Wait;
        assert!(is_cmd(&mut s, '#'));
        assert_eq!(s, CmdState::Par);
        assert!(is_cmd(&mut s, 'f'));
        assert!(is_cmd(&mut s, ' '));
        assert_eq!(s, CmdState::In);
        assert!(!is_cmd(&mut s, 'x'), "recolored text is drawn");
        assert!(is_cmd(&mut s, '#'));
        assert_eq!(s, CmdState::Wait);
    }

    #[test]
    fn recolor_parameter_must_be_six_hex_digits() {
        assert_eq!(parse_color("ff8000"), Some(Rgb(0xFF, 0x80, 0x00)));
        assert_eq!(parse_color("ff80"), None);
        assert_eq!(parse_color("+f8000"), None);
        assert_eq!(parse_color("gg0000"), None);
    }

    fn label_style(depth: ColorDepth) -> Style {
        let mut s = Style::screen(depth, 100, Some(Arc::new(font())));
        s.text.letter_space = 0;
        s.text.line_space = 0;
        s.text.color = depth.make(Rgb::WHITE);
        s
    }

    #[test]
    fn label_recolors_inline() {
        let depth = ColorDepth::Rgb888;
        let s = label_style(depth);
        let area = Area::new(0, 0, 99, 19);
        let mut c = Canvas::new(area, depth);
        let flags = TextFlags {
            recolor: true,
            ..TextFlags::default()
        };
        draw_label(&mut c, &area, &area, &s, OPA_COVER, "#ff0000 a# b #12 c#", flags);
        let black = Color::black(depth);
        let on = |rgb| mix(depth.make(rgb), black, 255);
        assert_eq!(c.pixel(0, 0), Some(on(Rgb::RED)), "recolored glyph");
        assert_eq!(c.pixel(12, 0), Some(on(Rgb::WHITE)), "back to base color");
        assert_eq!(c.pixel(24, 0), Some(on(Rgb::WHITE)), "bad parameter uses base color");
    }

    #[test]
    fn label_wraps_to_the_next_row() {
        let depth = ColorDepth::Rgb888;
        let s = label_style(depth);
        let area = Area::new(0, 0, 35, 19);
        let mut c = Canvas::new(Area::new(0, 0, 99, 19), depth);
        draw_label(&mut c, &area, &area, &s, OPA_COVER, "hello world", TextFlags::default());
        let black = Color::black(depth);
        assert_ne!(c.pixel(0, 8), Some(black), "'w' starts the second row");
        assert_eq!(c.pixel(36, 0), Some(black), "nothing past the area");
    }

    #[test]
    fn label_without_font_draws_nothing() {
        let depth = ColorDepth::Rgb888;
        let mut s = label_style(depth);
        s.text.font = None;
        let area = Area::new(0, 0, 9, 9);
        let mut c = Canvas::new(area, depth);
        draw_label(&mut c, &area, &area, &s, OPA_COVER, "x", TextFlags::default());
        assert_eq!(c.pixel(0, 0), Some(Color::black(depth)));
    }
}
