use uuid::Uuid;

/// Image name: the explicit tag, or the input's file stem.
pub fn image_name(tag: Option<&str>, stem: &str) -> String {
    tag.map_or_else(|| stem.to_string(), str::to_string)
}

/// Container name: the explicit name, or `prefix` plus a random UUID.
///
/// A v4 UUID carries 122 random bits, so parallel renders sharing one
/// engine daemon do not collide.
pub fn container_name(name: Option<&str>, prefix: &str) -> String {
    match name {
        Some(n) => n.to_string(),
        None => format!("{prefix}{}", Uuid::new_v4().simple()),
    }
}
