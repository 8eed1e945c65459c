use core_render::{PrintUnit, RenderMode, Renderer};
use core_terminal::TerminalCapabilities;
use core_text::{Composer, Unit};

fn compose_one(text: &str) -> Unit {
    let mut units = Composer::new(&TerminalCapabilities::all()).compose(text);
    assert_eq!(units.len(), 1);
    units.remove(0)
}

fn printed(u: &Unit) -> Vec<u8> {
    let mut out = Vec::new();
    u.print_to(&mut out).unwrap();
    out
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

fn anchor(width: usize, body: &str) -> Vec<u8> {
    let mut v = vec![b' '; width];
    v.extend_from_slice(b"\x1b7");
    v.extend(std::iter::repeat_n(0x08u8, width));
    v.extend_from_slice(body.as_bytes());
    v.extend_from_slice(b"\x1b8");
    v
}

#[test]
fn keycap_print_exact_sequence() {
    let u = compose_one("1\u{FE0F}");
    assert_eq!(u.width(), 2);
    assert_eq!(printed(&u), anchor(2, "1\u{FE0F}"));
}

#[test]
fn family_is_bracketed_once() {
    let text = "👨\u{200D}👩\u{200D}👧\u{200D}👦";
    let u = compose_one(text);
    let out = printed(&u);
    assert_eq!(out, anchor(u.width(), text));
    assert_eq!(count(&out, b"\x1b7"), 1);
    assert_eq!(count(&out, b"\x1b8"), 1);
}

#[test]
fn variation_over_deep_composite_brackets_outermost_only() {
    // ((a ZWJ b) VS16) + keycap: three composite levels.
    let text = "a\u{200D}b\u{FE0F}\u{20E3}";
    let u = compose_one(text);
    let out = printed(&u);
    assert_eq!(count(&out, b"\x1b7"), 1);
    assert_eq!(out, anchor(u.width(), text));
}

#[test]
fn waving_white_flag_join_uses_single_bracket() {
    // white flag + VS16 + ZWJ + rainbow
    let text = "\u{1F3F3}\u{FE0F}\u{200D}\u{1F308}";
    let u = compose_one(text);
    let out = printed(&u);
    assert_eq!(count(&out, b"\x1b7"), 1);
    assert_eq!(out, anchor(u.width(), text));
}

#[test]
fn modifier_sequence_is_not_anchored() {
    let u = compose_one("👍\u{1F3FD}");
    assert_eq!(printed(&u), "👍\u{1F3FD}".as_bytes());
}

#[test]
fn renderer_mixes_paths_per_unit() {
    let r = Renderer::new(&TerminalCapabilities::all(), RenderMode::Interactive);
    let mut out = Vec::new();
    r.render_str("hi 1\u{FE0F}!", &mut out).unwrap();
    let mut expected = b"hi ".to_vec();
    expected.extend(anchor(2, "1\u{FE0F}"));
    expected.push(b'!');
    assert_eq!(out, expected);
}
