use super::*;

#[test]
fn patch_overrides_colors_and_unions_mods() {
    let base = Style::default().fg(Color::Indexed(1)).add_mod(Mod::BOLD);
    let over = Style::default().fg(Color::Rgb(1, 2, 3)).add_mod(Mod::DIM);
    let merged = base.patch(over);
    assert_eq!(merged.fg, Some(Color::Rgb(1, 2, 3)));
    assert_eq!(merged.bg, None);
    assert!(merged.mods.contains(Mod::BOLD | Mod::DIM));
}

#[test]
fn patch_keeps_base_when_other_is_empty() {
    let base = Style::default().bg(Color::Indexed(4));
    assert_eq!(base.patch(Style::default()), base);
}

#[test]
fn mod_contains_requires_all_bits() {
    let m = Mod::BOLD | Mod::REVERSE;
    assert!(m.contains(Mod::BOLD));
    assert!(!m.contains(Mod::BOLD | Mod::ITALIC));
    assert!(Mod::NONE.is_empty());
}
