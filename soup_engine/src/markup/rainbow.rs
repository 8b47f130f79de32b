//! Delimiter colouring by nesting depth
//!
//! Depth comes from the token stream (computed during extraction), so colouring
//! happens before rendering and never re-reads markup. The palette index is
//! `(base_depth + depth) mod palette_size`.

use crate::config::compile_time::render::{RAINBOW_CLASS_COUNT, RAINBOW_COLOR_COUNT};
use crate::config::runtime::{PaletteVariant, RenderPreferences};
use crate::tokens::Token;
use std::collections::HashMap;

const RAINBOW_COLORS: [(u8, u8, u8); RAINBOW_COLOR_COUNT] = [
    (220, 50, 47),
    (203, 75, 22),
    (181, 137, 0),
    (133, 153, 0),
    (42, 161, 152),
    (38, 139, 210),
    (108, 113, 196),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// `rainbow-0` .. `rainbow-9`
    Classes,
    /// Inline RGB colours
    Colors,
}

impl Palette {
    pub fn size(&self) -> usize {
        match self {
            Palette::Classes => RAINBOW_CLASS_COUNT,
            Palette::Colors => RAINBOW_COLOR_COUNT,
        }
    }
}

impl From<PaletteVariant> for Palette {
    fn from(variant: PaletteVariant) -> Self {
        match variant {
            PaletteVariant::Classes => Palette::Classes,
            PaletteVariant::Colors => Palette::Colors,
        }
    }
}

/// Colour assigned to one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Class(usize),
    Rgb(u8, u8, u8),
}

impl Paint {
    /// Extra class name, if this paint is class-based
    pub fn class(&self) -> Option<String> {
        match self {
            Paint::Class(index) => Some(format!("rainbow-{}", index)),
            Paint::Rgb(..) => None,
        }
    }

    /// Inline style, if this paint is colour-based
    pub fn style(&self) -> Option<String> {
        match self {
            Paint::Class(_) => None,
            Paint::Rgb(r, g, b) => Some(format!("color: rgb({}, {}, {});", r, g, b)),
        }
    }
}

/// Token id to paint
pub type Coloring = HashMap<usize, Paint>;

#[derive(Debug, Clone, Copy)]
pub struct DelimiterColorer {
    palette: Palette,
    base_depth: i32,
}

impl DelimiterColorer {
    pub fn new(palette: Palette, base_depth: i32) -> Self {
        Self {
            palette,
            base_depth,
        }
    }

    pub fn from_preferences(preferences: &RenderPreferences) -> Self {
        Self::new(preferences.palette.into(), preferences.base_depth)
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn paint_for_depth(&self, depth: usize) -> Paint {
        let size = self.palette.size() as i64;
        let index = (self.base_depth as i64 + depth as i64).rem_euclid(size) as usize;
        match self.palette {
            Palette::Classes => Paint::Class(index),
            Palette::Colors => {
                let (r, g, b) = RAINBOW_COLORS[index];
                Paint::Rgb(r, g, b)
            }
        }
    }

    /// Paint every collection token; leaves get nothing
    pub fn colorize(&self, tokens: &[Token]) -> Coloring {
        tokens
            .iter()
            .filter(|token| token.is_collection())
            .map(|token| (token.id, self.paint_for_depth(token.depth)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_all;
    use crate::tokens::extract_all;

    #[test]
    fn test_periodic_in_palette_size() {
        for palette in [Palette::Classes, Palette::Colors] {
            let colorer = DelimiterColorer::new(palette, 0);
            let size = palette.size();
            for depth in 0..3 * size {
                assert_eq!(
                    colorer.paint_for_depth(depth),
                    colorer.paint_for_depth(depth + size)
                );
            }
        }
    }

    #[test]
    fn test_negative_base_depth_wraps() {
        let colorer = DelimiterColorer::new(Palette::Classes, -1);
        assert_eq!(colorer.paint_for_depth(0), Paint::Class(RAINBOW_CLASS_COUNT - 1));
        assert_eq!(colorer.paint_for_depth(1), Paint::Class(0));
    }

    #[test]
    fn test_only_collections_painted() {
        let text = "(foo [1 2] :bar)";
        let stream = extract_all(text, &read_all(text));
        let coloring = DelimiterColorer::new(Palette::Classes, 0).colorize(&stream.tokens);

        assert_eq!(coloring.len(), 2);
        assert_eq!(coloring[&0], Paint::Class(0));
        assert_eq!(coloring[&2], Paint::Class(1));
    }

    #[test]
    fn test_paint_rendering() {
        assert_eq!(Paint::Class(3).class().as_deref(), Some("rainbow-3"));
        assert_eq!(
            Paint::Rgb(1, 2, 3).style().as_deref(),
            Some("color: rgb(1, 2, 3);")
        );
        assert!(Paint::Rgb(1, 2, 3).class().is_none());
    }
}
