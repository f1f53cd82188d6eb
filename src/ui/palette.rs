use ratatui::style::Color;

/// A speed range and how it is shown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBand {
    /// exclusive upper bound in wpm; None for the open-ended top band
    pub below: Option<f64>,
    pub color: Color,
    pub label: &'static str,
}

pub const SPEED_BANDS: [SpeedBand; 7] = [
    SpeedBand {
        below: Some(30.0),
        color: Color::Rgb(0xf0, 0x62, 0x92),
        label: "<30 WPM",
    },
    SpeedBand {
        below: Some(50.0),
        color: Color::Rgb(0xff, 0x8a, 0x65),
        label: "40 WPM",
    },
    SpeedBand {
        below: Some(60.0),
        color: Color::Rgb(0xff, 0xb7, 0x4d),
        label: "50 WPM",
    },
    SpeedBand {
        below: Some(70.0),
        color: Color::Rgb(0xff, 0xf1, 0x76),
        label: "60 WPM",
    },
    SpeedBand {
        below: Some(80.0),
        color: Color::Rgb(0xae, 0xd5, 0x81),
        label: "70 WPM",
    },
    SpeedBand {
        below: Some(90.0),
        color: Color::Rgb(0x3d, 0xc1, 0xb4),
        label: "80 WPM",
    },
    SpeedBand {
        below: None,
        color: Color::Rgb(0x76, 0xd2, 0xf1),
        label: ">90 WPM",
    },
];

pub fn speed_band(wpm: f64) -> &'static SpeedBand {
    SPEED_BANDS
        .iter()
        .find(|band| band.below.map_or(true, |limit| wpm < limit))
        .unwrap_or(&SPEED_BANDS[SPEED_BANDS.len() - 1])
}
