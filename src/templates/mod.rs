/// Starting `epk.toml` for a new press kit.
///
/// The name is written as a TOML string, so any display name is safe.
pub fn generate_kit_template(name: &str) -> String {
    let name = toml::Value::String(name.to_string());

    format!(
        r#"# Electronic press kit
name = {name}
tagline = ""
public_dir = "public"
# featured_photo = "photo-id"

bio = [
    "Who you are, where you play, what you sound like.",
]

# [[members]]
# name = ""
# role = ""

# [[links]]
# label = "Contact"
# href = "mailto:band@example.com"

# Tracks play in the order listed; files live under public/.
# [[tracks]]
# title = ""
# file = "/track.mp3"

# Run `epk thumbnails` after adding photos to public/ and list them here.
# [[photos]]
# id = ""
# thumbnail = "/photos/thumbnails/photo.jpg"
# full_size = "/photos/photo.jpg"
# photographer = ""
# photographer_link = ""
# date = ""
# venue = ""
"#
    )
}
