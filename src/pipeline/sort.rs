//! Perceptual ordering for extracted colours: hue progression, light to dark within a
//! hue, greys last.

use std::cmp::Ordering;

use crate::color::Color;

/// LCh chroma below which a colour counts as grey.
pub const LOW_CHROMA_THRESHOLD: f32 = 4.1;
/// Width of a hue bucket in degrees.
pub const HUE_STEP: f32 = 20.0;
/// Width of a lightness bucket in L* units.
pub const LIGHTNESS_STEP: f32 = 15.0;

#[derive(Debug, Clone, Copy)]
struct SortKey {
    is_grey: bool,
    hue_bucket: i32,
    lightness_bucket: i32,
    chroma: f32,
}

impl SortKey {
    fn of(color: Color) -> Self {
        let lch = color.to_lch();
        let hue = lch.hue.into_positive_degrees();
        Self {
            is_grey: lch.chroma < LOW_CHROMA_THRESHOLD,
            hue_bucket: (hue / HUE_STEP).ceil() as i32,
            lightness_bucket: (lch.l / LIGHTNESS_STEP).round() as i32,
            chroma: lch.chroma,
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        self.is_grey
            .cmp(&other.is_grey)
            .then(self.hue_bucket.cmp(&other.hue_bucket))
            .then(other.lightness_bucket.cmp(&self.lightness_bucket))
            .then(self.chroma.total_cmp(&other.chroma))
    }
}

/// Stable sort of `items` by the perceptual ordering of the colour `color_of` picks.
pub fn sort_perceptually_by<T>(items: &mut Vec<T>, color_of: impl Fn(&T) -> Color) {
    let mut keyed: Vec<(SortKey, T)> = items
        .drain(..)
        .map(|item| (SortKey::of(color_of(&item)), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    items.extend(keyed.into_iter().map(|(_, item)| item));
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Lch;

    fn perceptual_cmp(a: Color, b: Color) -> Ordering {
        SortKey::of(a).cmp(&SortKey::of(b))
    }

    fn sort_perceptually(colors: &mut Vec<Color>) {
        sort_perceptually_by(colors, |c| *c);
    }

    fn lch(l: f32, chroma: f32, hue: f32) -> Color {
        Color::from_lch(Lch::new(l, chroma, hue))
    }

    #[test]
    fn near_grey_sorts_last() {
        let grey = Color::new(128, 128, 130);
        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);
        let mut colors = vec![grey, blue, red];
        sort_perceptually(&mut colors);
        assert_eq!(colors, vec![red, blue, grey]);
    }

    #[test]
    fn lighter_first_within_same_hue() {
        let light = lch(70.0, 30.0, 150.0);
        let dark = lch(30.0, 30.0, 150.0);
        let mut colors = vec![dark, light];
        sort_perceptually(&mut colors);
        assert_eq!(colors, vec![light, dark]);
    }

    #[test]
    fn lower_chroma_first_within_same_hue_and_lightness() {
        let muted = lch(60.0, 20.0, 250.0);
        let vivid = lch(60.0, 40.0, 250.0);
        assert_eq!(perceptual_cmp(muted, vivid), Ordering::Less);
        assert_eq!(perceptual_cmp(vivid, muted), Ordering::Greater);
    }

    #[test]
    fn hue_buckets_ascend() {
        let orange = lch(60.0, 40.0, 70.0);
        let green = lch(60.0, 40.0, 150.0);
        let purple = lch(60.0, 40.0, 310.0);
        let mut colors = vec![purple, green, orange];
        sort_perceptually(&mut colors);
        assert_eq!(colors, vec![orange, green, purple]);
    }

    #[test]
    fn hue_beats_lightness() {
        let dark_orange = lch(30.0, 30.0, 70.0);
        let light_green = lch(80.0, 30.0, 150.0);
        assert_eq!(perceptual_cmp(dark_orange, light_green), Ordering::Less);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let a = ("a", Color::new(10, 10, 10));
        let b = ("b", Color::new(10, 10, 10));
        let mut items = vec![a, b];
        sort_perceptually_by(&mut items, |(_, c)| *c);
        assert_eq!(items[0].0, "a");
        assert_eq!(items[1].0, "b");
    }
}
