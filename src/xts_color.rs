use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Resolve a sampled RGB color against the current terminal's capabilities:
/// truecolor where supported, a stable 256-color index otherwise, and a basic
/// ANSI variant as the last resort.
fn resolve(rgb: (u8, u8, u8), index256: u8, basic: Color) -> Color {
    let support = ColorSupport::stdout();
    if support.has_16m {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    } else if support.has_256 {
        Color::Indexed(index256)
    } else {
        basic
    }
}

/// Token color for a player index: tomato, steel blue, lime green, gold
pub fn player_color(index: usize) -> Color {
    match index % 4 {
        0 => resolve((255, 99, 71), 203, Color::LightRed),
        1 => resolve((70, 130, 180), 67, Color::LightBlue),
        2 => resolve((50, 205, 50), 76, Color::LightGreen),
        _ => resolve((255, 215, 0), 220, Color::LightYellow),
    }
}

/// Ladder markers draw blue
pub fn ladder_color() -> Color {
    resolve((0, 102, 204), 26, Color::Blue)
}

/// Snake markers draw red
pub fn snake_color() -> Color {
    resolve((204, 0, 0), 160, Color::Red)
}

/// A trait to extend Ratatui's Color with cross-platform consistency methods.
pub trait WTMatch {
    /// Adjusts the color to match the Windows Terminal (Campbell) visual style
    /// based on the current terminal's color capabilities.
    fn wtmatch(self) -> Color;
}

impl WTMatch for Color {
    fn wtmatch(self) -> Color {
        // Mapping table based on Windows Terminal "Campbell" RGB values.
        // Format: Some(((R, G, B), ANSI_256_Index))
        let mapping = match self {
            Color::Black => Some(((12, 12, 12), 232)),
            Color::Red => Some(((197, 15, 31), 160)),
            Color::Green => Some(((19, 161, 14), 28)),
            Color::Yellow => Some(((193, 156, 0), 178)),
            Color::Blue => Some(((0, 55, 218), 20)),
            Color::Magenta => Some(((136, 23, 152), 90)),
            Color::Cyan => Some(((58, 150, 221), 38)),
            Color::Gray => Some(((204, 204, 204), 250)),
            Color::DarkGray => Some(((118, 118, 118), 243)),
            Color::LightRed => Some(((231, 72, 86), 203)),
            Color::LightGreen => Some(((22, 198, 12), 46)),
            Color::LightYellow => Some(((249, 241, 165), 229)),
            Color::LightBlue => Some(((59, 120, 255), 63)),
            Color::LightMagenta => Some(((180, 0, 158), 163)),
            Color::LightCyan => Some(((97, 214, 214), 116)),
            Color::White => Some(((242, 242, 242), 255)),
            _ => None, // Custom RGB or Indexed colors are returned as-is
        };

        match mapping {
            Some((rgb, index256)) => resolve(rgb, index256, self),
            None => self,
        }
    }
}
