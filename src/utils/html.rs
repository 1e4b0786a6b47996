use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Assignment comments and grading feedback are free text that gets
/// rendered back in tutor and student dashboards, so they are whitelist
/// sanitized on the way in: safe tags (like <b>, <p>) survive, dangerous
/// tags (like <script>, <iframe>) and attributes (like onclick) do not.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
