use serde::{Deserialize, Serialize};

/// A gallery photo. Ids are unique within a gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub thumbnail: String,
    pub full_size: String,
    pub photographer: String,
    #[serde(default)]
    pub photographer_link: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub venue: String,
}

impl Photo {
    pub fn alt_text(&self) -> String {
        format!("{} - Photo by {}", self.venue, self.photographer)
    }

    /// Caption shown under the lightbox image
    pub fn caption(&self) -> String {
        let mut parts = vec![format!("Photo by {}", self.photographer)];
        parts.extend(
            [&self.venue, &self.date]
                .into_iter()
                .filter(|s| !s.is_empty())
                .cloned(),
        );
        parts.join(" · ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> Photo {
        Photo {
            id: "thomas-egan-1".to_string(),
            thumbnail: "/photos/thumbnails/egan-1.jpg".to_string(),
            full_size: "/photos/egan-1.jpg".to_string(),
            photographer: "Thomas Egan".to_string(),
            photographer_link: "https://www.instagram.com/thomaseganphotography".to_string(),
            date: "January 30, 2026".to_string(),
            venue: "Chess Club".to_string(),
        }
    }

    #[test]
    fn test_alt_text() {
        assert_eq!(photo().alt_text(), "Chess Club - Photo by Thomas Egan");
    }

    #[test]
    fn test_caption() {
        assert_eq!(
            photo().caption(),
            "Photo by Thomas Egan · Chess Club · January 30, 2026"
        );
    }

    #[test]
    fn test_caption_skips_missing_fields() {
        let mut photo = photo();
        photo.venue.clear();
        assert_eq!(photo.caption(), "Photo by Thomas Egan · January 30, 2026");
    }
}
