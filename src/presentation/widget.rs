// Home-screen widget families
use super::raster::ImageSize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetFamily {
    Small,
    Medium,
}

impl WidgetFamily {
    pub const ALL: [WidgetFamily; 2] = [WidgetFamily::Small, WidgetFamily::Medium];

    pub fn size(&self) -> ImageSize {
        match self {
            WidgetFamily::Small => ImageSize::new(158, 158),
            WidgetFamily::Medium => ImageSize::new(338, 158),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetFamily::Small => "small",
            WidgetFamily::Medium => "medium",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_sizes() {
        assert_eq!(WidgetFamily::Small.size(), ImageSize::new(158, 158));
        assert_eq!(WidgetFamily::Medium.size(), ImageSize::new(338, 158));
    }
}
