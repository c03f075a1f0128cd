//! Icon and color selection for display labels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::label::Category;

/// Icon shown next to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Sun,
    Moon,
    NightSky,
    Today,
    Calendar,
    /// Used for absolute dates and anything unrecognized.
    Clock,
}

impl Icon {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::NightSky => "night_sky",
            Self::Today => "today",
            Self::Calendar => "calendar",
            Self::Clock => "clock",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color tag for the label chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    #[default]
    Default,
}

/// An icon together with its color tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSpec {
    pub icon: Icon,
    pub color: ColorTag,
}

impl IconSpec {
    const fn plain(icon: Icon) -> Self {
        Self {
            icon,
            color: ColorTag::Default,
        }
    }
}

/// Returns the icon for a category. Total over [`Category`].
#[must_use]
pub const fn icon_for(category: Category) -> IconSpec {
    let icon = match category {
        Category::Daytime => Icon::Sun,
        Category::Evening => Icon::Moon,
        Category::Night => Icon::NightSky,
        Category::Yesterday => Icon::Today,
        Category::Weekday => Icon::Calendar,
        Category::Fallback => Icon::Clock,
    };
    IconSpec::plain(icon)
}

/// Returns the icon for a category tag string.
///
/// Unrecognized tags get the clock icon.
pub fn icon_for_tag(tag: &str) -> IconSpec {
    tag.parse::<Category>()
        .map_or(IconSpec::plain(Icon::Clock), icon_for)
}
