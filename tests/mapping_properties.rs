//! 座標変換のプロパティテスト
//!
//! 公開APIだけを使って、行の間引き・ビューポート矩形・ポインタ変換の
//! 性質を確認する。

use codemap::config::Palette;
use codemap::document::{Document, DocumentLine, StyleRun};
use codemap::geometry::{line_index, MinimapGeometry};
use codemap::render::{render, DrawCommand};
use codemap::scroll::ScrollState;
use codemap::viewport::{scroll_command_for_y, viewport_rect, MIN_INDICATOR_HEIGHT};
use codemap::color::Rgba;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn scroll_strategy() -> impl Strategy<Value = (usize, ScrollState)> {
    (1usize..50_000, 1u64..400, any::<u64>()).prop_map(|(lines, extent, seed)| {
        let total = lines as u64;
        let extent = extent.min(total);
        let max = total - extent;
        let position = if max == 0 { 0 } else { seed % (max + 1) };
        (lines, ScrollState::new(position, extent, total))
    })
}

fn geometry_strategy() -> impl Strategy<Value = MinimapGeometry> {
    (1u32..300, 0u32..800, 1u32..5, 0u32..10)
        .prop_map(|(width, height, line_height, margin)| MinimapGeometry::new(width, height, line_height, margin))
}

fn line_strategy() -> impl Strategy<Value = DocumentLine> {
    ("[ a-z_=()]{0,60}", proptest::collection::vec((0usize..60, 1usize..20, any::<u8>()), 0..4)).prop_map(
        |(text, runs)| {
            let runs = runs
                .into_iter()
                .map(|(start, len, shade)| StyleRun::new(start, len, Rgba::rgb(shade, 128, 255 - shade)))
                .collect();
            DocumentLine::with_runs(text, runs)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn fitting_documents_map_one_to_one(total in 1usize..500, extra in 0usize..500) {
        let rows = total + extra;
        for row in 0..rows {
            let expected = if row < total { Some(row) } else { None };
            prop_assert_eq!(line_index(row, total, rows), expected);
        }
    }

    #[test]
    fn subsampling_is_monotone_with_fixed_endpoints(rows in 2usize..400, extra in 1usize..100_000) {
        let total = rows + extra;
        prop_assert_eq!(line_index(0, total, rows), Some(0));
        prop_assert_eq!(line_index(rows - 1, total, rows), Some(total - 1));

        let mut previous = 0;
        for row in 0..rows {
            let index = line_index(row, total, rows).unwrap();
            prop_assert!(index >= previous);
            prop_assert!(index < total);
            previous = index;
        }
        prop_assert_eq!(line_index(rows, total, rows), None);
    }

    #[test]
    fn viewport_stays_inside_usable_height(
        (lines, scroll) in scroll_strategy(),
        geometry in geometry_strategy(),
    ) {
        let usable = geometry.usable_height(lines);
        let rect = viewport_rect(lines, &scroll, &geometry).unwrap();
        prop_assert!(rect.bottom() <= usable);
        prop_assert!(rect.height >= MIN_INDICATOR_HEIGHT.min(usable));
        prop_assert_eq!(rect.x, geometry.margin);
    }

    #[test]
    fn pointer_round_trips_within_a_few_pixels(
        (lines, scroll) in scroll_strategy(),
        geometry in geometry_strategy(),
    ) {
        let usable = geometry.usable_height(lines);
        prop_assume!(usable > 0);

        let rect = viewport_rect(lines, &scroll, &geometry).unwrap();
        let command = scroll_command_for_y(rect.y as f64, lines, &scroll, &geometry, false).unwrap();

        // 丸めと最小高さによる押し上げで最大3ピクセルずれる
        let per_pixel = scroll.total as f64 / usable as f64;
        let tolerance = (3.0 * per_pixel).ceil() as u64 + 1;
        prop_assert!(
            command.position.abs_diff(scroll.position) <= tolerance,
            "position {} -> {} (tolerance {})",
            scroll.position,
            command.position,
            tolerance
        );
        prop_assert!(command.position <= scroll.maximum());
    }

    #[test]
    fn centered_pointer_round_trips_within_one_row(
        (lines, scroll) in scroll_strategy(),
        geometry in geometry_strategy(),
    ) {
        let usable = geometry.usable_height(lines);
        prop_assume!(usable > 0);
        // 最小高さで引き伸ばされたインジケータは中心がずれる
        let natural_height = (scroll.height_ratio() * usable as f64).round() as u32;
        prop_assume!(natural_height >= MIN_INDICATOR_HEIGHT);

        let rect = viewport_rect(lines, &scroll, &geometry).unwrap();
        let y = rect.y as f64 + rect.height as f64 / 2.0;
        let command = scroll_command_for_y(y, lines, &scroll, &geometry, true).unwrap();

        let tolerance = (geometry.line_height as f64 * scroll.total as f64 / usable as f64).ceil() as u64;
        prop_assert!(
            command.position.abs_diff(scroll.position) <= tolerance,
            "position {} -> {} (tolerance {})",
            scroll.position,
            command.position,
            tolerance
        );
    }

    #[test]
    fn pointer_commands_are_always_in_range(
        (lines, scroll) in scroll_strategy(),
        geometry in geometry_strategy(),
        y in -1_000.0f64..2_000.0,
        center in any::<bool>(),
    ) {
        if let Some(command) = scroll_command_for_y(y, lines, &scroll, &geometry, center) {
            prop_assert!(command.position >= scroll.minimum());
            prop_assert!(command.position <= scroll.maximum());
        }
    }

    #[test]
    fn render_is_idempotent_and_stays_on_canvas(
        lines in proptest::collection::vec(line_strategy(), 0..200),
        geometry in geometry_strategy(),
        seed in any::<u64>(),
    ) {
        let document = Document::from_lines(lines);
        let total = document.line_count() as u64;
        let extent = total.min(30);
        let max = total - extent;
        let position = if max == 0 { 0 } else { seed % (max + 1) };
        let scroll = ScrollState::new(position, extent, total);
        let palette = Palette::default();

        let first = render(&document, &scroll, &geometry, &palette);
        let second = render(&document, &scroll, &geometry, &palette);
        prop_assert_eq!(&first, &second);

        for command in &first.commands {
            let rect = match command {
                DrawCommand::Fill { rect, .. } => rect,
                DrawCommand::Viewport { rect, .. } => rect,
            };
            prop_assert!(rect.right() <= geometry.width);
            prop_assert!(rect.bottom() <= geometry.height);
        }
    }
}
