//! dryrun palette: semantic color roles for surfaces, borders, text, states,
//! tab chrome and the code editor.

use super::Appearance;
use super::rgb::Rgb;

#[derive(Clone, Debug, PartialEq)]
pub struct DryrunPalette {
    // --- Surfaces
    pub background: Rgb,
    pub surface_background: Rgb,
    pub status_bar_background: Rgb,

    // --- Borders
    pub border: Rgb,
    pub border_focused: Rgb,

    // --- Text
    pub text: Rgb,
    pub text_muted: Rgb,
    pub text_placeholder: Rgb,
    pub text_disabled: Rgb,

    // --- Semantic
    pub accent: Rgb,
    pub danger: Rgb,
    pub success: Rgb,
    pub warning: Rgb,
    pub info: Rgb,

    // --- Chrome
    pub tab_active_background: Rgb,
    pub tab_inactive_background: Rgb,
    pub scrollbar_track_background: Rgb,
    pub scrollbar_thumb_background: Rgb,

    // --- Editor
    pub editor_background: Rgb,
    pub editor_foreground: Rgb,
    pub editor_line_number: Rgb,
    pub editor_active_line: Rgb,
    pub code_keyword: Rgb,
    pub code_string: Rgb,
    pub code_number: Rgb,
    pub code_comment: Rgb,
}

impl DryrunPalette {
    pub fn dark() -> Self {
        Self {
            background: Rgb(12, 13, 18),
            surface_background: Rgb(18, 20, 27),
            status_bar_background: Rgb(18, 20, 27),
            border: Rgb(38, 41, 54),
            border_focused: Rgb(255, 160, 122),
            text: Rgb(214, 218, 232),
            text_muted: Rgb(96, 103, 128),
            text_placeholder: Rgb(78, 84, 106),
            text_disabled: Rgb(62, 66, 86),
            accent: Rgb(255, 160, 122),
            danger: Rgb(242, 99, 110),
            success: Rgb(152, 251, 152),
            warning: Rgb(240, 190, 100),
            info: Rgb(135, 206, 250),
            tab_active_background: Rgb(34, 37, 50),
            tab_inactive_background: Rgb(18, 20, 27),
            scrollbar_track_background: Rgb(20, 22, 30),
            scrollbar_thumb_background: Rgb(70, 76, 98),
            editor_background: Rgb(14, 15, 21),
            editor_foreground: Rgb(214, 218, 232),
            editor_line_number: Rgb(72, 78, 100),
            editor_active_line: Rgb(24, 26, 36),
            code_keyword: Rgb(221, 160, 221),
            code_string: Rgb(152, 251, 152),
            code_number: Rgb(240, 190, 100),
            code_comment: Rgb(96, 103, 128),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Rgb(252, 252, 250),
            surface_background: Rgb(255, 255, 255),
            status_bar_background: Rgb(244, 244, 241),
            border: Rgb(222, 222, 216),
            border_focused: Rgb(214, 110, 72),
            text: Rgb(32, 34, 44),
            text_muted: Rgb(110, 114, 130),
            text_placeholder: Rgb(150, 152, 164),
            text_disabled: Rgb(180, 182, 190),
            accent: Rgb(214, 110, 72),
            danger: Rgb(200, 54, 72),
            success: Rgb(46, 140, 70),
            warning: Rgb(176, 120, 20),
            info: Rgb(36, 120, 190),
            tab_active_background: Rgb(255, 255, 255),
            tab_inactive_background: Rgb(236, 236, 232),
            scrollbar_track_background: Rgb(240, 240, 236),
            scrollbar_thumb_background: Rgb(190, 190, 184),
            editor_background: Rgb(255, 255, 255),
            editor_foreground: Rgb(32, 34, 44),
            editor_line_number: Rgb(160, 162, 172),
            editor_active_line: Rgb(246, 243, 236),
            code_keyword: Rgb(140, 60, 160),
            code_string: Rgb(46, 140, 70),
            code_number: Rgb(176, 120, 20),
            code_comment: Rgb(150, 152, 164),
        }
    }

    pub fn for_appearance(appearance: Appearance) -> Self {
        match appearance {
            Appearance::Dark => Self::dark(),
            Appearance::Light => Self::light(),
        }
    }
}

impl Default for DryrunPalette {
    fn default() -> Self {
        Self::dark()
    }
}
