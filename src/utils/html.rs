use ammonia;

/// Clean user-supplied free text (bios, session descriptions, comments)
/// using the ammonia library.
///
/// Whitelist-based sanitization: safe inline tags survive, <script>/<iframe>
/// and event-handler attributes are stripped. Fail-safe against stored XSS.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
