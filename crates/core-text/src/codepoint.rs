//! Code point classes that drive composition.

pub const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';
pub const ZERO_WIDTH_JOINER: char = '\u{200D}';
pub const COMBINING_ENCLOSING_KEYCAP: char = '\u{20E3}';
/// Terminals draw this base with regional-indicator style rendering.
pub const WAVING_WHITE_FLAG: char = '\u{1F3F3}';

/// Unicode `Join_Control` property (ZWNJ and ZWJ).
#[inline]
pub fn is_join_control(c: char) -> bool {
    c == ZERO_WIDTH_NON_JOINER || c == ZERO_WIDTH_JOINER
}

/// Variation selectors plus the keycap combiner, which attaches the same way.
#[inline]
pub fn is_variation_selector_like(c: char) -> bool {
    c == COMBINING_ENCLOSING_KEYCAP
        || ('\u{FE00}'..='\u{FE0F}').contains(&c)
        || ('\u{E0100}'..='\u{E01EF}').contains(&c)
}

/// Fitzpatrick skin tone modifiers.
#[inline]
pub fn is_emoji_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

#[inline]
pub fn is_flag_base(c: char) -> bool {
    c == WAVING_WHITE_FLAG
}
