//! Page compositions: which sections each page shows, in order.
//!
//! Pages are plain data so the terminal renderer only decides how a section
//! looks, never what a page contains.

use super::{Kit, Link, Member};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    PressKit,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::PressKit => "Press Kit",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Page::Home => Page::PressKit,
            Page::PressKit => Page::Home,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Heading { title: String, subtitle: String },
    Text(String),
    Bio(Vec<String>),
    Members(Vec<Member>),
    /// Photo shown by gallery index
    FeaturedPhoto(usize),
    Player,
    Gallery,
    Links(Vec<LinkItem>),
}

/// A link as it is displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkItem {
    pub label: String,
    pub href: String,
}

pub fn compose(page: Page, kit: &Kit) -> Vec<Section> {
    match page {
        Page::Home => home(kit),
        Page::PressKit => press_kit(kit),
    }
}

pub fn home(kit: &Kit) -> Vec<Section> {
    let mut sections = vec![Section::Heading {
        title: kit.name.clone(),
        subtitle: kit.tagline.clone(),
    }];

    if let Some(id) = kit.featured_photo.as_deref()
        && let Some(index) = kit.photos.iter().position(|p| p.id == id)
    {
        sections.push(Section::FeaturedPhoto(index));
    }

    if !kit.links.is_empty() {
        sections.push(Section::Links(
            kit.links.iter().map(|l| link_item(l, false)).collect(),
        ));
    }
    sections
}

pub fn press_kit(kit: &Kit) -> Vec<Section> {
    let mut sections = vec![Section::Heading {
        title: kit.name.clone(),
        subtitle: "Electronic Press Kit".to_string(),
    }];

    if !kit.tagline.is_empty() {
        sections.push(Section::Text(kit.tagline.clone()));
    }
    if !kit.bio.is_empty() {
        sections.push(Section::Bio(kit.bio.clone()));
    }
    if !kit.members.is_empty() {
        sections.push(Section::Members(kit.members.clone()));
    }
    if !kit.tracks.is_empty() {
        sections.push(Section::Player);
    }
    if !kit.photos.is_empty() {
        sections.push(Section::Gallery);
    }
    if !kit.links.is_empty() {
        sections.push(Section::Links(
            kit.links.iter().map(|l| link_item(l, true)).collect(),
        ));
    }
    sections
}

fn link_item(link: &Link, show_address: bool) -> LinkItem {
    let label = match link.email() {
        Some(address) if show_address => address.to_string(),
        _ => link.label.clone(),
    };
    LinkItem {
        label,
        href: link.href.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::Photo;
    use crate::playback::Track;

    fn kit() -> Kit {
        let mut kit = Kit::parse("name = \"so many cults\"\ntagline = \"Psych Rock\"").unwrap();
        kit.links = vec![
            Link {
                label: "Instagram".to_string(),
                href: "https://instagram.com/somanycults".to_string(),
            },
            Link {
                label: "Contact".to_string(),
                href: "mailto:somanycults@gmail.com".to_string(),
            },
        ];
        kit.tracks = vec![Track::new("Arcade", "/arcade.mp3")];
        kit.photos = vec![Photo {
            id: "egan-2".to_string(),
            thumbnail: "/t.jpg".to_string(),
            full_size: "/f.jpg".to_string(),
            photographer: "Thomas Egan".to_string(),
            photographer_link: String::new(),
            date: String::new(),
            venue: String::new(),
        }];
        kit
    }

    #[test]
    fn test_home_page() {
        let mut kit = kit();
        kit.featured_photo = Some("egan-2".to_string());
        let sections = home(&kit);

        assert_eq!(
            sections[0],
            Section::Heading {
                title: "so many cults".to_string(),
                subtitle: "Psych Rock".to_string()
            }
        );
        assert_eq!(sections[1], Section::FeaturedPhoto(0));
        let Section::Links(links) = &sections[2] else {
            panic!("expected links");
        };
        assert_eq!(links[1].label, "Contact");
    }

    #[test]
    fn test_home_without_featured_photo() {
        let sections = home(&kit());
        assert!(!sections.iter().any(|s| matches!(s, Section::FeaturedPhoto(_))));
    }

    #[test]
    fn test_press_kit_page() {
        let sections = press_kit(&kit());
        assert!(matches!(
            &sections[0],
            Section::Heading { subtitle, .. } if subtitle == "Electronic Press Kit"
        ));
        assert!(sections.contains(&Section::Player));
        assert!(sections.contains(&Section::Gallery));

        let Some(Section::Links(links)) = sections.last() else {
            panic!("expected links last");
        };
        assert_eq!(links[1].label, "somanycults@gmail.com");
        assert_eq!(links[1].href, "mailto:somanycults@gmail.com");
    }

    #[test]
    fn test_empty_kit_press_kit_has_heading_only() {
        let kit = Kit::parse("name = \"x\"").unwrap();
        assert_eq!(press_kit(&kit).len(), 1);
    }

    #[test]
    fn test_page_cycle() {
        assert_eq!(Page::Home.next(), Page::PressKit);
        assert_eq!(Page::PressKit.next(), Page::Home);
        assert_eq!(compose(Page::Home, &kit()), home(&kit()));
    }
}
