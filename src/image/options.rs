//! Closed enumerations for the image command choice lists.
//!
//! Each enum pairs a display name (shown in command choices and embeds) with
//! the value sent to the backing API. Parsing rejects values outside the
//! enumeration with a descriptive error instead of passing them through.

use crate::error::{ImageError, UnknownVariant};

/// Generation models for the primary image backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Deliberate,
    V41,
    MajicMix,
    Disney,
    Rpg,
    Lyriel,
    OrangeMix,
    Creative,
    V4Beta,
    V3,
    V1,
    Portrait,
    Realistic,
    Anime,
}

impl Model {
    pub const ALL: &[Model] = &[
        Model::Deliberate,
        Model::V41,
        Model::MajicMix,
        Model::Disney,
        Model::Rpg,
        Model::Lyriel,
        Model::OrangeMix,
        Model::Creative,
        Model::V4Beta,
        Model::V3,
        Model::V1,
        Model::Portrait,
        Model::Realistic,
        Model::Anime,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Model::Deliberate => "🚧 Deliberate v2 (NSFW / SFW)",
            Model::V41 => "🚀 V4.1",
            Model::MajicMix => "⚗️ Magic Mix",
            Model::Disney => "🐭 Disney",
            Model::Rpg => "⚔️ RPG",
            Model::Lyriel => "🎶 Lyriel",
            Model::OrangeMix => "🍊 Orange mix",
            Model::Creative => "🎨 V4 Creative",
            Model::V4Beta => "🚀 V4 beta",
            Model::V3 => "🌟 Imagine V3",
            Model::V1 => "📸 Imagine V1",
            Model::Portrait => "👩‍🎨 Portrait",
            Model::Realistic => "🌎 Realistic",
            Model::Anime => "🎌 Anime",
        }
    }

    /// Stable token used as the command choice value.
    pub fn token(self) -> &'static str {
        match self {
            Model::Deliberate => "DELIBERATE",
            Model::V41 => "V4_1",
            Model::MajicMix => "MAJIC_MIX",
            Model::Disney => "DISNEY",
            Model::Rpg => "RPG",
            Model::Lyriel => "LYRIEL",
            Model::OrangeMix => "ORANGE_MIX",
            Model::Creative => "CREATIVE",
            Model::V4Beta => "V4_BETA",
            Model::V3 => "V3",
            Model::V1 => "V1",
            Model::Portrait => "PORTRAIT",
            Model::Realistic => "REALISTIC",
            Model::Anime => "ANIME",
        }
    }

    /// Model version number on the generation API.
    pub fn api_value(self) -> &'static str {
        match self {
            Model::V1 => "27",
            Model::V3 => "28",
            Model::V4Beta => "29",
            Model::Creative => "30",
            Model::V41 => "31",
            Model::MajicMix => "32",
            Model::Deliberate => "33",
            Model::Disney => "34",
            Model::Rpg => "35",
            Model::Lyriel => "36",
            Model::OrangeMix => "37",
            Model::Portrait => "38",
            Model::Realistic => "39",
            Model::Anime => "40",
        }
    }
}

impl std::str::FromStr for Model {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .iter()
            .copied()
            .find(|model| model.token() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "model",
                value: value.to_string(),
            })
    }
}

/// Style presets for the primary image backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    NoStyle,
    Architecture,
    Vibrant,
    AnimeV2,
    Disney,
    StudioGhibli,
    Graffiti,
    Medieval,
    Fantasy,
    Neon,
    Cyberpunk,
    Landscape,
    Gta,
    Steampunk,
    Sketch,
    ComicBook,
    Cosmic,
    Logo,
    PixelArt,
    Interior,
    Mystical,
    Surrealism,
    Minecraft,
    Dystopian,
}

impl Style {
    pub const ALL: &[Style] = &[
        Style::NoStyle,
        Style::Architecture,
        Style::Vibrant,
        Style::AnimeV2,
        Style::Disney,
        Style::StudioGhibli,
        Style::Graffiti,
        Style::Medieval,
        Style::Fantasy,
        Style::Neon,
        Style::Cyberpunk,
        Style::Landscape,
        Style::Gta,
        Style::Steampunk,
        Style::Sketch,
        Style::ComicBook,
        Style::Cosmic,
        Style::Logo,
        Style::PixelArt,
        Style::Interior,
        Style::Mystical,
        Style::Surrealism,
        Style::Minecraft,
        Style::Dystopian,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Style::NoStyle => "❌ No style",
            Style::Architecture => "🏗️ Architecture",
            Style::Vibrant => "🌈 Vibrant",
            Style::AnimeV2 => "🎎 Anime",
            Style::Disney => "🐭 Disney",
            Style::StudioGhibli => "🐉 Studio Ghibli",
            Style::Graffiti => "🎨 Graffiti",
            Style::Medieval => "🏰 Medieval",
            Style::Fantasy => "🧙 Fantasy",
            Style::Neon => "💡 Neon",
            Style::Cyberpunk => "🌆 Cyberpunk",
            Style::Landscape => "🌄 Landscape",
            Style::Gta => "🎮 GTA",
            Style::Steampunk => "⚙️ Steampunk",
            Style::Sketch => "✏️ Sketch",
            Style::ComicBook => "📚 Comic Book",
            Style::Cosmic => "🌌 Cosmic",
            Style::Logo => "🖋️ Logo",
            Style::PixelArt => "🎮 Pixel art",
            Style::Interior => "🏠 Interior",
            Style::Mystical => "🔮 Mystical",
            Style::Surrealism => "🎨 Super realism",
            Style::Minecraft => "🎮 Minecraft",
            Style::Dystopian => "🏙️ Dystopian",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Style::NoStyle => "NO_STYLE",
            Style::Architecture => "ARCHITECTURE",
            Style::Vibrant => "VIBRANT",
            Style::AnimeV2 => "ANIME_V2",
            Style::Disney => "DISNEY",
            Style::StudioGhibli => "STUDIO_GHIBLI",
            Style::Graffiti => "GRAFFITI",
            Style::Medieval => "MEDIEVAL",
            Style::Fantasy => "FANTASY",
            Style::Neon => "NEON",
            Style::Cyberpunk => "CYBERPUNK",
            Style::Landscape => "LANDSCAPE",
            Style::Gta => "GTA",
            Style::Steampunk => "STEAMPUNK",
            Style::Sketch => "SKETCH",
            Style::ComicBook => "COMIC_BOOK",
            Style::Cosmic => "COSMIC",
            Style::Logo => "LOGO",
            Style::PixelArt => "PIXEL_ART",
            Style::Interior => "INTERIOR",
            Style::Mystical => "MYSTICAL",
            Style::Surrealism => "SURREALISM",
            Style::Minecraft => "MINECRAFT",
            Style::Dystopian => "DYSTOPIAN",
        }
    }

    /// Style id on the generation API.
    pub fn api_value(self) -> &'static str {
        match self {
            Style::NoStyle => "1",
            Style::Architecture => "2",
            Style::Vibrant => "3",
            Style::AnimeV2 => "4",
            Style::Disney => "5",
            Style::StudioGhibli => "6",
            Style::Graffiti => "7",
            Style::Medieval => "8",
            Style::Fantasy => "9",
            Style::Neon => "10",
            Style::Cyberpunk => "11",
            Style::Landscape => "12",
            Style::Gta => "13",
            Style::Steampunk => "14",
            Style::Sketch => "15",
            Style::ComicBook => "16",
            Style::Cosmic => "17",
            Style::Logo => "18",
            Style::PixelArt => "19",
            Style::Interior => "20",
            Style::Mystical => "21",
            Style::Surrealism => "22",
            Style::Minecraft => "23",
            Style::Dystopian => "24",
        }
    }
}

impl std::str::FromStr for Style {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .iter()
            .copied()
            .find(|style| style.token() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "style",
                value: value.to_string(),
            })
    }
}

/// Aspect ratios for the primary image backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ratio {
    Square,
    Vertical9x16,
    Horizontal16x9,
    Standard4x3,
    Classic3x2,
    Tall2x3,
    Wide5x4,
    Narrow4x5,
    Banner3x1,
    Portrait3x4,
}

impl Ratio {
    pub const ALL: &[Ratio] = &[
        Ratio::Square,
        Ratio::Vertical9x16,
        Ratio::Horizontal16x9,
        Ratio::Standard4x3,
        Ratio::Classic3x2,
        Ratio::Tall2x3,
        Ratio::Wide5x4,
        Ratio::Narrow4x5,
        Ratio::Banner3x1,
        Ratio::Portrait3x4,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Ratio::Square => "⬛ Square (1:1)",
            Ratio::Vertical9x16 => "📱 Vertical (9:16)",
            Ratio::Horizontal16x9 => "🖥️ Horizontal (16:9)",
            Ratio::Standard4x3 => "📺 Standard (4:3)",
            Ratio::Classic3x2 => "📸 Classic (3:2)",
            Ratio::Tall2x3 => "🔳 2:3",
            Ratio::Wide5x4 => "🔳 5:4",
            Ratio::Narrow4x5 => "🔳 4:5",
            Ratio::Banner3x1 => "🔳 3:1",
            Ratio::Portrait3x4 => "🔳 3:4",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Ratio::Square => "RATIO_1X1",
            Ratio::Vertical9x16 => "RATIO_9X16",
            Ratio::Horizontal16x9 => "RATIO_16X9",
            Ratio::Standard4x3 => "RATIO_4X3",
            Ratio::Classic3x2 => "RATIO_3X2",
            Ratio::Tall2x3 => "RATIO_2X3",
            Ratio::Wide5x4 => "RATIO_5X4",
            Ratio::Narrow4x5 => "RATIO_4X5",
            Ratio::Banner3x1 => "RATIO_3X1",
            Ratio::Portrait3x4 => "RATIO_3X4",
        }
    }

    /// Aspect ratio string on the generation API.
    pub fn api_value(self) -> &'static str {
        match self {
            Ratio::Square => "1:1",
            Ratio::Vertical9x16 => "9:16",
            Ratio::Horizontal16x9 => "16:9",
            Ratio::Standard4x3 => "4:3",
            Ratio::Classic3x2 => "3:2",
            Ratio::Tall2x3 => "2:3",
            Ratio::Wide5x4 => "5:4",
            Ratio::Narrow4x5 => "4:5",
            Ratio::Banner3x1 => "3:1",
            Ratio::Portrait3x4 => "3:4",
        }
    }
}

impl std::str::FromStr for Ratio {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ratio::ALL
            .iter()
            .copied()
            .find(|ratio| ratio.token() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "ratio",
                value: value.to_string(),
            })
    }
}

/// Models on the Prodia backend, mapped to their checkpoint uids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProdiaModel {
    ElldrethVividMix,
    Deliberate,
    Dreamshaper6,
    LyrielV16,
    AnythingV4,
    Openjourney,
    RealisticVsV20,
    Portrait,
    RevAnimated,
    Analog,
    AbyssOrangeMix,
    DreamlikeV1,
    DreamlikeV2,
    Dreamshaper5,
    MechaMix,
    MeinaMix,
    SdV14,
    SdV15,
    Sbp,
    TheAllysMix,
    Timeless,
}

impl ProdiaModel {
    pub const ALL: &[ProdiaModel] = &[
        ProdiaModel::ElldrethVividMix,
        ProdiaModel::Deliberate,
        ProdiaModel::Dreamshaper6,
        ProdiaModel::LyrielV16,
        ProdiaModel::AnythingV4,
        ProdiaModel::Openjourney,
        ProdiaModel::RealisticVsV20,
        ProdiaModel::Portrait,
        ProdiaModel::RevAnimated,
        ProdiaModel::Analog,
        ProdiaModel::AbyssOrangeMix,
        ProdiaModel::DreamlikeV1,
        ProdiaModel::DreamlikeV2,
        ProdiaModel::Dreamshaper5,
        ProdiaModel::MechaMix,
        ProdiaModel::MeinaMix,
        ProdiaModel::SdV14,
        ProdiaModel::SdV15,
        ProdiaModel::Sbp,
        ProdiaModel::TheAllysMix,
        ProdiaModel::Timeless,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ProdiaModel::ElldrethVividMix => {
                "🌈 Elldreth vivid mix (Landscapes, Stylized characters, nsfw)"
            }
            ProdiaModel::Deliberate => "💪 Deliberate v2 (Anything you want, nsfw)",
            ProdiaModel::Dreamshaper6 => "🔮 Dreamshaper",
            ProdiaModel::LyrielV16 => "🎼 Lyriel",
            ProdiaModel::AnythingV4 => "💥 Anything diffusion (Good for anime)",
            ProdiaModel::Openjourney => "🌅 Openjourney (Midjourney alternative)",
            ProdiaModel::RealisticVsV20 => "🏞️ Realistic (Lifelike pictures)",
            ProdiaModel::Portrait => "👨‍🎨 Portrait (For headshots)",
            ProdiaModel::RevAnimated => "🌟 Rev animated (Illustration, Anime)",
            ProdiaModel::Analog => "🤖 Analog",
            ProdiaModel::AbyssOrangeMix => "🌌 AbyssOrangeMix",
            ProdiaModel::DreamlikeV1 => "🌌 Dreamlike v1",
            ProdiaModel::DreamlikeV2 => "🌌 Dreamlike v2",
            ProdiaModel::Dreamshaper5 => "🌌 Dreamshaper 5",
            ProdiaModel::MechaMix => "🌌 MechaMix",
            ProdiaModel::MeinaMix => "🌌 MeinaMix",
            ProdiaModel::SdV14 => "🌌 Stable Diffusion v1",
            ProdiaModel::SdV15 => "🌌 Stable Diffusion v2",
            ProdiaModel::Sbp => "🌌 Shonin's Beautiful People",
            ProdiaModel::TheAllysMix => "🌌 TheAlly's Mix II",
            ProdiaModel::Timeless => "🌌 Timeless",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            ProdiaModel::ElldrethVividMix => "ELLDRETHVIVIDMIX",
            ProdiaModel::Deliberate => "DELIBERATE",
            ProdiaModel::Dreamshaper6 => "DREAMSHAPER_6",
            ProdiaModel::LyrielV16 => "LYRIEL_V16",
            ProdiaModel::AnythingV4 => "ANYTHING_V4",
            ProdiaModel::Openjourney => "OPENJOURNEY",
            ProdiaModel::RealisticVsV20 => "REALISTICVS_V20",
            ProdiaModel::Portrait => "PORTRAIT",
            ProdiaModel::RevAnimated => "REV_ANIMATED",
            ProdiaModel::Analog => "ANALOG",
            ProdiaModel::AbyssOrangeMix => "ABYSSORANGEMIX",
            ProdiaModel::DreamlikeV1 => "DREAMLIKE_V1",
            ProdiaModel::DreamlikeV2 => "DREAMLIKE_V2",
            ProdiaModel::Dreamshaper5 => "DREAMSHAPER_5",
            ProdiaModel::MechaMix => "MECHAMIX",
            ProdiaModel::MeinaMix => "MEINAMIX",
            ProdiaModel::SdV14 => "SD_V14",
            ProdiaModel::SdV15 => "SD_V15",
            ProdiaModel::Sbp => "SBP",
            ProdiaModel::TheAllysMix => "THEALLYSMIX",
            ProdiaModel::Timeless => "TIMELESS",
        }
    }

    /// Checkpoint uid sent to the Prodia API.
    pub fn uid(self) -> &'static str {
        match self {
            ProdiaModel::ElldrethVividMix => "elldreths-vivid-mix.safetensors [342d9d26]",
            ProdiaModel::Deliberate => "deliberate_v2.safetensors [10ec4b29]",
            ProdiaModel::Dreamshaper6 => "dreamshaper_6BakedVae.safetensors [114c8abb]",
            ProdiaModel::LyrielV16 => "lyriel_v16.safetensors [68fceea2]",
            ProdiaModel::AnythingV4 => "anything-v4.5-pruned.ckpt [65745d25]",
            ProdiaModel::Openjourney => "openjourney_V4.ckpt [ca2f377f]",
            ProdiaModel::RealisticVsV20 => "realisticVisionV20_v20.safetensors [79587710]",
            ProdiaModel::Portrait => "portraitplus_V1.0.safetensors [1400e684]",
            ProdiaModel::RevAnimated => "revAnimated_v122.safetensors [3f4fefd9]",
            ProdiaModel::Analog => "analog-diffusion-1.0.ckpt [9ca13f02]",
            ProdiaModel::AbyssOrangeMix => "AOM3A3_orangemixs.safetensors [9600da17]",
            ProdiaModel::DreamlikeV1 => "dreamlike-diffusion-1.0.safetensors [5c9fd6e0]",
            ProdiaModel::DreamlikeV2 => "dreamlike-diffusion-2.0.safetensors [fdcf65e7]",
            ProdiaModel::Dreamshaper5 => "dreamshaper_5BakedVae.safetensors [a3fbf318]",
            ProdiaModel::MechaMix => "mechamix_v10.safetensors [ee685731]",
            ProdiaModel::MeinaMix => "meinamix_meinaV9.safetensors [2ec66ab0]",
            ProdiaModel::SdV14 => "sdv1_4.ckpt [7460a6fa]",
            ProdiaModel::SdV15 => "v1-5-pruned-emaonly.ckpt [81761151]",
            ProdiaModel::Sbp => "shoninsBeautiful_v10.safetensors [25d8c546]",
            ProdiaModel::TheAllysMix => "theallys-mix-ii-churned.safetensors [5d9225a4]",
            ProdiaModel::Timeless => "timeless-1.0.ckpt [7c4971d4]",
        }
    }
}

impl std::str::FromStr for ProdiaModel {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ProdiaModel::ALL
            .iter()
            .copied()
            .find(|model| model.token() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "prodia model",
                value: value.to_string(),
            })
    }
}

/// Denoising samplers on the Prodia backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampler {
    Euler,
    EulerA,
    Heun,
    DpmPlusPlus2mKarras,
    Ddim,
}

impl Sampler {
    pub const ALL: &[Sampler] = &[
        Sampler::Euler,
        Sampler::EulerA,
        Sampler::Heun,
        Sampler::DpmPlusPlus2mKarras,
        Sampler::Ddim,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Sampler::Euler => "📏 Euler (Recommended)",
            Sampler::EulerA => "📏 Euler a",
            Sampler::Heun => "📐 Heun",
            Sampler::DpmPlusPlus2mKarras => "💥 DPM++ 2M Karras",
            Sampler::Ddim => "🔍 DDIM",
        }
    }

    /// Sampler name on the Prodia API; doubles as the choice value.
    pub fn api_value(self) -> &'static str {
        match self {
            Sampler::Euler => "Euler",
            Sampler::EulerA => "Euler a",
            Sampler::Heun => "Heun",
            Sampler::DpmPlusPlus2mKarras => "DPM++ 2M Karras",
            Sampler::Ddim => "DDIM",
        }
    }
}

impl std::str::FromStr for Sampler {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Sampler::ALL
            .iter()
            .copied()
            .find(|sampler| sampler.api_value() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "sampler",
                value: value.to_string(),
            })
    }
}

/// Controlnet guidance modes for the remix flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Scribble,
    Pose,
    LineArt,
    Canny,
    Depth,
}

impl ControlMode {
    pub const ALL: &[ControlMode] = &[
        ControlMode::Scribble,
        ControlMode::Pose,
        ControlMode::LineArt,
        ControlMode::Canny,
        ControlMode::Depth,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ControlMode::Scribble => "✏️ Scribble (default)",
            ControlMode::Pose => "🧍 Openpose",
            ControlMode::LineArt => "🖊️ Line art",
            ControlMode::Canny => "🔍 Canny",
            ControlMode::Depth => "🌌 Depth",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            ControlMode::Scribble => "SCRIBBLE",
            ControlMode::Pose => "POSE",
            ControlMode::LineArt => "LINE_ART",
            ControlMode::Canny => "CANNY",
            ControlMode::Depth => "DEPTH",
        }
    }

    pub fn api_value(self) -> &'static str {
        match self {
            ControlMode::Scribble => "scribble",
            ControlMode::Pose => "openpose",
            ControlMode::LineArt => "lineart",
            ControlMode::Canny => "canny",
            ControlMode::Depth => "depth",
        }
    }
}

impl std::str::FromStr for ControlMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ControlMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.token() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "control mode",
                value: value.to_string(),
            })
    }
}

/// Validate a CFG scale at the command boundary.
pub fn validate_cfg(value: f32) -> Result<f32, ImageError> {
    if !(0.0..=16.0).contains(&value) {
        return Err(ImageError::InvalidParameter(format!(
            "cfg scale must be in 0.0..=16.0, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_token_round_trip() {
        for model in Model::ALL {
            assert_eq!(model.token().parse::<Model>().ok(), Some(*model));
        }
    }

    #[test]
    fn test_unknown_model_rejected_with_description() {
        let error = "SDXL".parse::<Model>().expect_err("SDXL is not a variant");
        assert_eq!(error.to_string(), "unknown model variant: SDXL");
    }

    #[test]
    fn test_style_and_ratio_round_trip() {
        for style in Style::ALL {
            assert_eq!(style.token().parse::<Style>().ok(), Some(*style));
        }
        for ratio in Ratio::ALL {
            assert_eq!(ratio.token().parse::<Ratio>().ok(), Some(*ratio));
        }
    }

    #[test]
    fn test_ratio_api_values() {
        assert_eq!(Ratio::Square.api_value(), "1:1");
        assert_eq!(Ratio::Vertical9x16.api_value(), "9:16");
    }

    #[test]
    fn test_prodia_model_uid_mapping() {
        assert_eq!(
            ProdiaModel::Deliberate.uid(),
            "deliberate_v2.safetensors [10ec4b29]"
        );
        for model in ProdiaModel::ALL {
            assert!(!model.uid().is_empty());
        }
    }

    #[test]
    fn test_sampler_parses_by_api_value() {
        assert_eq!("Euler a".parse::<Sampler>().ok(), Some(Sampler::EulerA));
        assert!("Lanczos".parse::<Sampler>().is_err());
    }

    #[test]
    fn test_control_mode_round_trip() {
        for mode in ControlMode::ALL {
            assert_eq!(mode.token().parse::<ControlMode>().ok(), Some(*mode));
        }
    }

    #[test]
    fn test_cfg_bounds() {
        assert!(validate_cfg(9.5).is_ok());
        assert!(validate_cfg(0.0).is_ok());
        assert!(validate_cfg(16.0).is_ok());
        assert!(validate_cfg(-0.1).is_err());
        assert!(validate_cfg(16.1).is_err());
    }
}
