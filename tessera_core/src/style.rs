// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing styles.
//!
//! A [`Style`] bundles every parameter the shape renderers read: body colors,
//! radius and border, padding, text font and spacing, image recoloring, and
//! line width. Styles are plain values.
//!
//! Nodes reference styles through [`StyleRef`]. Most nodes share one of the
//! [`BuiltinStyles`] presets via `Arc`; a node that needs its own tweaks
//! isolates the style into a node-owned `Box` first. Shared styles are never
//! mutated in place.

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::area::Coord;
use crate::color::{Color, ColorDepth, OPA_COVER, OPA_TRANSP, Opa, Rgb, mix};
use crate::font::FontRef;

/// Border parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderStyle {
    /// Border color.
    pub color: Color,
    /// Border thickness in pixels. `0` disables the border.
    pub width: Coord,
    /// Border opacity in percent (`0..=100`) of the object opacity.
    pub opa: u8,
}

/// Inner spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    /// Left and right padding.
    pub hor: Coord,
    /// Top and bottom padding.
    pub ver: Coord,
    /// Spacing between children.
    pub inner: Coord,
}

/// Background rectangle parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyStyle {
    /// Color at the top of the vertical gradient.
    pub main_color: Color,
    /// Color at the bottom of the vertical gradient.
    pub grad_color: Color,
    /// Corner radius.
    pub radius: Coord,
    /// Skip the body fill (the border is still drawn).
    pub empty: bool,
    /// Border.
    pub border: BorderStyle,
    /// Padding.
    pub padding: Padding,
}

/// Text parameters.
#[derive(Clone, Debug)]
pub struct TextStyle {
    /// Glyph color.
    pub color: Color,
    /// Font; `None` draws no text.
    pub font: Option<FontRef>,
    /// Extra space after each glyph.
    pub letter_space: Coord,
    /// Extra space after each line.
    pub line_space: Coord,
}

impl PartialEq for TextStyle {
    fn eq(&self, other: &Self) -> bool {
        let same_font = match (&self.font, &other.font) {
            (Some(a), Some(b)) => Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>(),
            (None, None) => true,
            _ => false,
        };
        same_font
            && self.color == other.color
            && self.letter_space == other.letter_space
            && self.line_space == other.line_space
    }
}

/// Image parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageStyle {
    /// Tint color.
    pub recolor: Color,
    /// Tint strength; `0` leaves pixels untouched.
    pub intensity: Opa,
}

/// Line parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineStyle {
    /// Line color.
    pub color: Color,
    /// Nominal line width.
    pub width: Coord,
}

/// A complete set of drawing parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// Not inherited by descendants without a style of their own.
    pub glass: bool,
    /// Background rectangle.
    pub body: BodyStyle,
    /// Labels.
    pub text: TextStyle,
    /// Images.
    pub image: ImageStyle,
    /// Lines.
    pub line: LineStyle,
}

impl Style {
    /// The screen preset: white body, dark text, no border or radius.
    #[must_use]
    pub fn screen(depth: ColorDepth, dpi: Coord, font: Option<FontRef>) -> Self {
        let white = depth.make(Rgb::WHITE);
        Self {
            glass: false,
            body: BodyStyle {
                main_color: white,
                grad_color: white,
                radius: 0,
                empty: false,
                border: BorderStyle {
                    color: white,
                    width: 0,
                    opa: 100,
                },
                padding: Padding {
                    hor: dpi / 4,
                    ver: dpi / 6,
                    inner: dpi / 6,
                },
            },
            text: TextStyle {
                color: depth.make(Rgb::hex(0x20_2020)),
                font,
                letter_space: 1,
                line_space: 5,
            },
            image: ImageStyle {
                recolor: depth.make(Rgb::BLACK),
                intensity: OPA_TRANSP,
            },
            line: LineStyle {
                color: depth.make(Rgb::BLACK),
                width: 1,
            },
        }
    }
}

/// Returns the highlighted variant of `base` used for the focused node.
///
/// Body and text colors are pulled toward orange. The border becomes opaque
/// orange with a width of at least two pixels.
#[must_use]
pub fn activated_style(base: &Style) -> Style {
    const RATIO: u16 = 178;
    let mut s = base.clone();
    let orange = base.body.main_color.depth().make(Rgb::ORANGE);
    s.body.main_color = mix(base.body.main_color, orange, RATIO);
    s.body.grad_color = mix(base.body.grad_color, orange, RATIO);
    s.text.color = mix(base.text.color, orange, RATIO);
    s.body.border.color = orange;
    s.body.border.opa = 100;
    s.body.border.width = s.body.border.width.max(2);
    s
}

/// A node's style: a shared preset or a node-owned copy.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleRef {
    /// Shared, never mutated.
    Shared(Arc<Style>),
    /// Owned by exactly one node.
    Owned(Box<Style>),
}

impl StyleRef {
    /// The referenced style.
    #[must_use]
    pub fn get(&self) -> &Style {
        match self {
            Self::Shared(s) => s,
            Self::Owned(s) => s,
        }
    }

    /// Whether this reference owns its style.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Copies a shared style into owned storage and returns it for mutation.
    ///
    /// Calling this on an owned style returns the existing copy unchanged.
    pub fn isolate(&mut self) -> &mut Style {
        if let Self::Shared(s) = self {
            *self = Self::Owned(Box::new(Style::clone(s)));
        }
        match self {
            Self::Owned(s) => s,
            Self::Shared(_) => unreachable!("style was isolated above"),
        }
    }
}

impl From<Arc<Style>> for StyleRef {
    fn from(s: Arc<Style>) -> Self {
        Self::Shared(s)
    }
}

impl From<Style> for StyleRef {
    fn from(s: Style) -> Self {
        Self::Owned(Box::new(s))
    }
}

/// Names of the built-in presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinStyle {
    /// Screen background.
    Screen,
    /// Plain white rectangle.
    Plain,
    /// Plain colored rectangle.
    PlainColor,
    /// Rounded rectangle with gradient and border.
    Pretty,
    /// Colored variant of [`Pretty`](Self::Pretty).
    PrettyColor,
    /// No body, no border.
    Transp,
    /// [`Transp`](Self::Transp) without padding.
    TranspTight,
    /// Released button.
    ButtonReleased,
    /// Pressed button.
    ButtonPressed,
    /// Released toggled button.
    ButtonToggleReleased,
    /// Pressed toggled button.
    ButtonTogglePressed,
    /// Inactive button.
    ButtonInactive,
}

/// The preset styles, created once per render context.
#[derive(Clone, Debug)]
pub struct BuiltinStyles {
    /// Screen background.
    pub scr: Arc<Style>,
    /// Plain white rectangle.
    pub plain: Arc<Style>,
    /// Plain colored rectangle.
    pub plain_color: Arc<Style>,
    /// Rounded rectangle with gradient and border.
    pub pretty: Arc<Style>,
    /// Colored variant of `pretty`.
    pub pretty_color: Arc<Style>,
    /// No body, no border.
    pub transp: Arc<Style>,
    /// `transp` without padding.
    pub transp_tight: Arc<Style>,
    /// Released button.
    pub btn_rel: Arc<Style>,
    /// Pressed button.
    pub btn_pr: Arc<Style>,
    /// Released toggled button.
    pub btn_trel: Arc<Style>,
    /// Pressed toggled button.
    pub btn_tpr: Arc<Style>,
    /// Inactive button.
    pub btn_ina: Arc<Style>,
}

impl BuiltinStyles {
    /// Builds the presets for a display.
    #[must_use]
    pub fn new(depth: ColorDepth, dpi: Coord, font: Option<FontRef>) -> Self {
        let c = |rgb: Rgb| depth.make(rgb);

        let scr = Style::screen(depth, dpi, font);
        let plain = scr.clone();

        let mut plain_color = plain.clone();
        plain_color.text.color = c(Rgb::RED);
        plain_color.body.main_color = c(Rgb::hex(0x40_6080));
        plain_color.body.grad_color = c(Rgb::hex(0x40_6080));

        let mut pretty = plain.clone();
        pretty.body.main_color = c(Rgb::WHITE);
        pretty.body.grad_color = c(Rgb::SILVER);
        pretty.body.border.color = c(Rgb::GRAY);
        pretty.body.radius = dpi / 10;
        pretty.body.border.width = 1;

        let mut pretty_color = pretty.clone();
        pretty_color.text.color = c(Rgb::RED);
        pretty_color.body.grad_color = c(Rgb::CYAN);

        let mut transp = plain.clone();
        transp.body.empty = true;
        transp.body.border.width = 0;

        let mut transp_tight = transp.clone();
        transp_tight.body.padding.hor = 0;
        transp_tight.body.padding.ver = 0;

        let mut btn_rel = plain.clone();
        btn_rel.body.main_color = c(Rgb::WHITE);
        btn_rel.body.grad_color = c(Rgb::GRAY);

        let mut btn_pr = btn_rel.clone();
        btn_pr.body.main_color = c(Rgb::BLACK);
        btn_pr.text.color = c(Rgb::SILVER);

        let mut btn_trel = btn_rel.clone();
        btn_trel.body.main_color = c(Rgb::LIME);

        let mut btn_tpr = btn_rel.clone();
        btn_tpr.body.main_color = c(Rgb::GREEN);

        let mut btn_ina = btn_rel.clone();
        btn_ina.body.main_color = c(Rgb::YELLOW);

        Self {
            scr: Arc::new(scr),
            plain: Arc::new(plain),
            plain_color: Arc::new(plain_color),
            pretty: Arc::new(pretty),
            pretty_color: Arc::new(pretty_color),
            transp: Arc::new(transp),
            transp_tight: Arc::new(transp_tight),
            btn_rel: Arc::new(btn_rel),
            btn_pr: Arc::new(btn_pr),
            btn_trel: Arc::new(btn_trel),
            btn_tpr: Arc::new(btn_tpr),
            btn_ina: Arc::new(btn_ina),
        }
    }

    /// Looks up a preset by name.
    #[must_use]
    pub fn get(&self, which: BuiltinStyle) -> &Arc<Style> {
        match which {
            BuiltinStyle::Screen => &self.scr,
            BuiltinStyle::Plain => &self.plain,
            BuiltinStyle::PlainColor => &self.plain_color,
            BuiltinStyle::Pretty => &self.pretty,
            BuiltinStyle::PrettyColor => &self.pretty_color,
            BuiltinStyle::Transp => &self.transp,
            BuiltinStyle::TranspTight => &self.transp_tight,
            BuiltinStyle::ButtonReleased => &self.btn_rel,
            BuiltinStyle::ButtonPressed => &self.btn_pr,
            BuiltinStyle::ButtonToggleReleased => &self.btn_trel,
            BuiltinStyle::ButtonTogglePressed => &self.btn_tpr,
            BuiltinStyle::ButtonInactive => &self.btn_ina,
        }
    }
}

/// Full opacity for a border given in percent.
pub const BORDER_OPA_FULL: u8 = 100;

/// Opacity of a border drawn on an object with opacity `opa`.
#[inline]
#[must_use]
pub fn border_opa(opa: Opa, border_percent: u8) -> Opa {
    let v = u16::from(opa) * u16::from(border_percent.min(BORDER_OPA_FULL)) / 100;
    // At most `opa`, which fits in a byte.
    v.min(u16::from(OPA_COVER)) as Opa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FixedFont;

    fn presets() -> BuiltinStyles {
        BuiltinStyles::new(ColorDepth::Rgb565, 100, Some(Arc::new(FixedFont::default())))
    }

    #[test]
    fn presets_derive_from_plain() {
        let s = presets();
        assert_eq!(*s.scr, *s.plain, "plain starts as the screen style");
        assert!(s.transp.body.empty, "transparent style has no body");
        assert_eq!(s.transp_tight.body.padding.hor, 0, "tight has no padding");
        assert_eq!(s.pretty.body.radius, 10, "pretty radius is dpi / 10");
        assert_eq!(
            s.get(BuiltinStyle::ButtonInactive).body.main_color,
            ColorDepth::Rgb565.make(Rgb::YELLOW)
        );
    }

    #[test]
    fn isolate_copies_once() {
        let s = presets();
        let mut r = StyleRef::from(Arc::clone(&s.pretty));
        assert!(!r.is_owned(), "starts shared");

        r.isolate().body.radius = 3;
        assert!(r.is_owned(), "isolated");
        assert_eq!(s.pretty.body.radius, 10, "shared preset untouched");

        // A second isolate keeps the existing copy.
        assert_eq!(r.isolate().body.radius, 3, "isolate is idempotent");
    }

    #[test]
    fn text_style_compares_fonts_by_identity() {
        let font: FontRef = Arc::new(FixedFont::default());
        let a = Style::screen(ColorDepth::Rgb565, 100, Some(Arc::clone(&font)));
        let b = Style::screen(ColorDepth::Rgb565, 100, Some(font));
        let c = Style::screen(ColorDepth::Rgb565, 100, Some(Arc::new(FixedFont::default())));
        assert_eq!(a, b, "same font instance");
        assert_ne!(a, c, "equal metrics but a different font instance");
    }

    #[test]
    fn activated_style_is_pure() {
        let s = presets();
        let before = (*s.plain).clone();
        let active = activated_style(&s.plain);
        assert_eq!(*s.plain, before, "base style untouched");
        assert_eq!(active.body.border.color, ColorDepth::Rgb565.make(Rgb::ORANGE));
        assert_eq!(active.body.border.width, 2, "border forced visible");
        assert_ne!(active.body.main_color, before.body.main_color, "body tinted");
    }

    #[test]
    fn border_opacity_is_percent_of_object_opacity() {
        assert_eq!(border_opa(255, 100), 255);
        assert_eq!(border_opa(255, 50), 127);
        assert_eq!(border_opa(200, 0), 0);
    }
}
