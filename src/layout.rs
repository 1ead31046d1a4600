//! Flow layout engine.
//!
//! Deterministic left-to-right, top-to-bottom shelf packing: tokens fill a
//! row until one would overflow, then the cursor drops to a fresh row and
//! the container grows. A trailing edit field (when the source is editable)
//! takes the remainder of the last row, or a row of its own when too little
//! space is left.
//!
//! # Purity
//!
//! [`compute_flow`] is a pure function of its inputs. Height growth is not
//! reported through callbacks from in here - each growth step is collected
//! into [`FlowLayout::height_events`] so the caller controls ordering
//! relative to rendering.

use crate::measure::TextMeasure;
use crate::settings::TokenFieldSettings;
use crate::types::Rect;

/// Probe string measured once per pass to obtain the reference line-height
/// unit: the height of an obvious one-liner.
const LINE_PROBE: &str = "O";

// =============================================================================
// Results
// =============================================================================

/// Where one token landed.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPlacement {
    /// Position in the input sequence (0-based, stable).
    pub index: usize,
    /// Frame relative to the margin origin.
    pub rect: Rect,
    /// Row this token starts on. Non-decreasing across the sequence.
    pub line: usize,
    /// Wrapped text lines inside the token (1 for ordinary tokens).
    pub line_count: usize,
}

/// Output of one full layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    /// One placement per input string, in input order.
    pub placements: Vec<TokenPlacement>,
    /// Frame of the edit field, present only when laid out editable.
    pub field: Option<Rect>,
    /// Total container height after growth.
    pub container_height: f32,
    /// Running container height at each row advance, in the order the rows
    /// were opened. Empty when everything fit on the initial row.
    pub height_events: Vec<f32>,
}

// =============================================================================
// Engine
// =============================================================================

/// Lay out `contents` as wrapping pill tokens inside `available_width`,
/// followed by the edit field when `editable`.
///
/// `line_height` is the container's base (single-row) height; the returned
/// `container_height` starts from it and grows by `row height + row gap`
/// for every extra row opened.
pub fn compute_flow(
    contents: &[String],
    settings: &TokenFieldSettings,
    available_width: f32,
    line_height: f32,
    editable: bool,
    measure: &dyn TextMeasure,
) -> FlowLayout {
    let settings = settings.sanitized();

    let usable_line_height = line_height - settings.margins.vertical();
    let usable_width = available_width - settings.margins.horizontal();
    let token_row_height = settings.token_height.min(usable_line_height);

    let probe_height = measure.height(LINE_PROBE, &settings.font, usable_width);

    let mut x = 0.0_f32;
    let mut y = (usable_line_height - token_row_height) / 2.0;
    let mut line = 0_usize;
    let mut container_height = line_height;
    let mut prev_row_height = settings.token_height;

    let mut placements = Vec::with_capacity(contents.len());
    let mut height_events = Vec::new();

    for (index, content) in contents.iter().enumerate() {
        let single_line_width =
            measure.width(content, &settings.font) + settings.text_margin * 2.0;

        // Estimate wrapped lines by dividing the measured height by the
        // one-liner probe height. Imprecise for irregular line spacing;
        // kept as the compatibility contract.
        let measured_height = measure.height(content, &settings.font, usable_width);
        let line_count = if probe_height > 0.0 {
            ((measured_height / probe_height).round() as usize).max(1)
        } else {
            1
        };

        // A multi-line token takes the full usable width, which also forces
        // it onto a row of its own below.
        let (token_width, token_height) = if line_count > 1 {
            (usable_width, settings.token_height * line_count as f32)
        } else {
            (single_line_width, settings.token_height)
        };

        if x + token_width >= usable_width {
            // Needs next row. Note this fires even at x == 0: an over-wide
            // single-line token opens a row and then still overflows it.
            x = 0.0;
            y += prev_row_height + settings.token_y_margin;
            line += 1;
            container_height += token_height + settings.token_y_margin;
            height_events.push(container_height);
        }

        placements.push(TokenPlacement {
            index,
            rect: Rect::new(x, y, token_width, token_height),
            line,
            line_count,
        });

        x += token_width + settings.token_x_margin;
        prev_row_height = token_height;
    }

    let field = if editable {
        // If less than a third of the usable width remains, the field gets
        // a fresh row of plain token height.
        if x + usable_width / 3.0 > usable_width {
            x = 0.0;
            y += prev_row_height + settings.token_y_margin;
            container_height += settings.token_height + settings.token_y_margin;
            height_events.push(container_height);
        }
        Some(Rect::new(x, y, usable_width - x, settings.token_height))
    } else {
        None
    };

    FlowLayout {
        placements,
        field,
        container_height,
        height_events,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::CellMeasure;

    fn settings() -> TokenFieldSettings {
        TokenFieldSettings::default()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn layout(contents: &[&str], width: f32, editable: bool) -> FlowLayout {
        compute_flow(
            &strings(contents),
            &settings(),
            width,
            40.0,
            editable,
            &CellMeasure::default(),
        )
    }

    #[test]
    fn test_two_tokens_share_first_row() {
        // "A" measures 1 cell; width = 1 + 2 * 16 = 33.
        let result = layout(&["A", "B"], 200.0, false);

        assert_eq!(result.placements.len(), 2);
        assert_eq!(result.placements[0].line, 0);
        assert_eq!(result.placements[1].line, 0);
        assert_eq!(result.placements[0].rect.x, 0.0);
        // Second token starts after the first token's width plus the gap.
        assert_eq!(
            result.placements[1].rect.x,
            result.placements[0].rect.width + 4.0
        );
        assert_eq!(result.container_height, 40.0);
        assert!(result.height_events.is_empty());
    }

    #[test]
    fn test_multiline_token_takes_full_width() {
        // 20 cells at 12 usable -> 2 wrapped lines.
        let result = layout(&["AAAAAAAAAAAAAAAAAAAA"], 12.0, false);

        assert_eq!(result.placements.len(), 1);
        let p = &result.placements[0];
        assert_eq!(p.line_count, 2);
        assert_eq!(p.rect.width, 12.0);
        assert_eq!(p.rect.height, 60.0); // token_height * 2
        // Full-width token always opens its own row.
        assert_eq!(p.line, 1);
        assert_eq!(p.rect.x, 0.0);
    }

    #[test]
    fn test_editable_empty_places_only_field() {
        let result = layout(&[], 200.0, true);

        assert!(result.placements.is_empty());
        let field = result.field.expect("field placed");
        assert_eq!(field.x, 0.0);
        assert_eq!(field.width, 200.0);
        assert_eq!(field.height, 30.0);
        // Vertically centered on the initial row: (40 - 30) / 2.
        assert_eq!(field.y, 5.0);
        assert_eq!(result.container_height, 40.0);
        assert!(result.height_events.is_empty());
    }

    #[test]
    fn test_not_editable_places_no_field() {
        let result = layout(&["A"], 200.0, false);
        assert!(result.field.is_none());
    }

    #[test]
    fn test_row_wrap_grows_container() {
        // Each token: 2 cells + 32 = 34 wide. Three of them at 80 usable:
        // first two fit (34 + 4 + 34 = 72 < 80), third wraps (76 + 34 >= 80).
        let result = layout(&["aa", "bb", "cc"], 80.0, false);

        assert_eq!(result.placements[0].line, 0);
        assert_eq!(result.placements[1].line, 0);
        assert_eq!(result.placements[2].line, 1);
        assert_eq!(result.placements[2].rect.x, 0.0);
        // y advances by previous row height + gap.
        assert_eq!(
            result.placements[2].rect.y,
            result.placements[0].rect.y + 30.0 + 4.0
        );
        assert_eq!(result.container_height, 40.0 + 30.0 + 4.0);
        assert_eq!(result.height_events, vec![74.0]);
    }

    #[test]
    fn test_order_preserved_and_lines_monotonic() {
        let contents = ["one", "two", "three", "four", "five", "six"];
        let result = layout(&contents, 90.0, false);

        assert_eq!(result.placements.len(), contents.len());
        for (i, p) in result.placements.iter().enumerate() {
            assert_eq!(p.index, i);
        }
        for pair in result.placements.windows(2) {
            assert!(pair[1].line >= pair[0].line);
        }
    }

    #[test]
    fn test_no_overlap_within_row() {
        let contents = ["alpha", "beta", "gamma", "delta", "epsilon"];
        let result = layout(&contents, 120.0, false);

        for (i, a) in result.placements.iter().enumerate() {
            for b in result.placements.iter().skip(i + 1) {
                if a.line == b.line {
                    assert!(a.rect.max_x() <= b.rect.x || b.rect.max_x() <= a.rect.x);
                }
            }
        }
    }

    #[test]
    fn test_height_consistency() {
        let contents = ["aa", "bb", "cc", "dd", "ee"];
        let result = layout(&contents, 80.0, true);

        // container height = line_height + sum over extra rows of
        // (row height + row gap), which the events record step by step.
        let mut expected = 40.0;
        let mut events = result.height_events.iter();
        for pair in result.placements.windows(2) {
            if pair[1].line > pair[0].line {
                expected += pair[1].rect.height + 4.0;
                assert_eq!(events.next().copied(), Some(expected));
            }
        }
        // Any remaining event is the field opening its own row.
        if let Some(&e) = events.next() {
            expected += 30.0 + 4.0;
            assert_eq!(e, expected);
        }
        assert_eq!(result.container_height, expected);
    }

    #[test]
    fn test_field_wraps_when_row_nearly_full() {
        // One token of width 2 + 32 = 34 at 48 usable: cursor lands at 38,
        // remaining 10 < 48 / 3, so the field opens a new row.
        let result = layout(&["aa"], 48.0, true);

        let field = result.field.expect("field placed");
        assert_eq!(field.x, 0.0);
        assert_eq!(field.width, 48.0);
        assert!(field.y > result.placements[0].rect.y);
        assert_eq!(result.container_height, 40.0 + 30.0 + 4.0);
        assert_eq!(result.height_events, vec![74.0]);
    }

    #[test]
    fn test_field_shares_row_when_space_remains() {
        // One token of width 34 at 200 usable leaves plenty of room.
        let result = layout(&["aa"], 200.0, true);

        let field = result.field.expect("field placed");
        assert_eq!(field.x, 34.0 + 4.0);
        assert_eq!(field.width, 200.0 - 38.0);
        assert_eq!(field.y, result.placements[0].rect.y);
        assert_eq!(result.container_height, 40.0);
    }

    #[test]
    fn test_overwide_single_line_token_overflows() {
        // 10 cells + 32 = 42 wide at 40 usable, but only one measured line
        // (40 columns fit 10 chars). The token opens a row and still
        // overflows it - the multi-line branch is the only wrap path.
        let result = layout(&["AAAAAAAAAA"], 40.0, false);

        let p = &result.placements[0];
        assert_eq!(p.line_count, 1);
        assert_eq!(p.rect.x, 0.0);
        assert_eq!(p.line, 1);
        assert!(p.rect.max_x() > 40.0);
    }

    #[test]
    fn test_margins_shrink_usable_area() {
        let mut s = settings();
        s.margins = crate::types::EdgeInsets::new(2.0, 10.0, 2.0, 10.0);
        let result = compute_flow(
            &strings(&["A"]),
            &s,
            200.0,
            40.0,
            true,
            &CellMeasure::default(),
        );

        // usable width 180, usable line height 36, row height min(30, 36).
        assert_eq!(result.placements[0].rect.y, (36.0 - 30.0) / 2.0);
        let field = result.field.expect("field placed");
        assert_eq!(field.max_x(), 180.0);
    }

    #[test]
    fn test_empty_and_not_editable_is_empty_layout() {
        let result = layout(&[], 200.0, false);
        assert!(result.placements.is_empty());
        assert!(result.field.is_none());
        assert_eq!(result.container_height, 40.0);
        assert!(result.height_events.is_empty());
    }
}
