use termimad::{
    Alignment, MadSkin,
    crossterm::style::{Attribute, Color},
};

/// Colors for `wl` output. Headings carry the date, tables the numbers,
/// inline code the task names pulled out of wikilinks.
pub struct Palette;

impl Palette {
    pub const TEXT: Color = Color::Rgb {
        r: 0xD8,
        g: 0xDE,
        b: 0xE9,
    };
    pub const HEADING: Color = Color::Rgb {
        r: 0x88,
        g: 0xC0,
        b: 0xD0,
    };
    pub const SUBHEADING: Color = Color::Rgb {
        r: 0xA3,
        g: 0xBE,
        b: 0x8C,
    };
    pub const TABLE: Color = Color::Rgb {
        r: 0x81,
        g: 0xA1,
        b: 0xC1,
    };
    pub const TASK: Color = Color::Rgb {
        r: 0xEB,
        g: 0xCB,
        b: 0x8B,
    };
    pub const WARNING: Color = Color::Rgb {
        r: 0xD0,
        g: 0x87,
        b: 0x70,
    };
    pub const MUTED: Color = Color::Rgb {
        r: 0x61,
        g: 0x6E,
        b: 0x88,
    };

    pub fn skin() -> MadSkin {
        let mut skin = MadSkin::default();

        skin.paragraph.set_fg(Palette::TEXT);
        skin.bold.set_fg(Palette::TASK);

        // `# date` in schedule and summary views
        skin.headers[0].set_fg(Palette::HEADING);
        skin.headers[0].add_attr(Attribute::Bold);
        skin.headers[0].align = Alignment::Left;

        // `### HH:MM-HH:MM slot`
        skin.headers[2].set_fg(Palette::SUBHEADING);
        skin.headers[2].add_attr(Attribute::Bold);

        skin.table.set_fg(Palette::TABLE);
        skin.bullet.set_fg(Palette::MUTED);
        skin.horizontal_rule.set_fg(Palette::MUTED);
        skin.inline_code.set_fg(Palette::TASK);

        skin
    }
}
