//! Trim, untrim and activation against the in-memory host.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{Fixture, HEADERS};
use tabletrim::dom::memory::{MemoryElement, MemoryHost};
use tabletrim::dom::Element;
use tabletrim::{classes, ControlKind, Hooks, Options, TableTrim, TabletrimError, TrimState};
use test_case::test_case;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_wide_table_starts_untrimmed() {
    let fx = Fixture::wide();
    let tt = fx.build(Options::default());

    let state = tt.state().unwrap();
    assert_eq!(state.state, TrimState::Untrimmed);
    assert_eq!(state.active, None);
    assert_eq!(state.columns, 4);
    assert!(fx.table.has_class(classes::TABLE));
    assert!(!fx.table.has_class(classes::TRIMMED));
    assert!(!fx.any_cell_has(classes::ACTIVE));
    assert!(!fx.any_cell_has(classes::STICKY));
    assert!(fx.controls().is_none());
}

#[test_case(0, 1; "no sticky")]
#[test_case(1, 2; "default pair")]
#[test_case(2, 1; "init before sticky")]
#[test_case(4, 3; "sticky last")]
#[test_case(3, 4; "init last")]
fn test_wide_construction_leaves_cells_untagged(sticky: usize, init: usize) {
    let fx = Fixture::wide();
    let tt = fx.build(Options {
        sticky_index: sticky,
        init_index: init,
        ..Options::default()
    });

    let state = tt.state().unwrap();
    assert_eq!(state.state, TrimState::Untrimmed);
    assert_eq!(state.active, None);
    assert_eq!(state.sticky, sticky);
    assert!(!fx.any_cell_has(classes::ACTIVE));
    assert!(!fx.any_cell_has(classes::STICKY));
    assert!(fx.controls().is_none());
    for (col, title) in HEADERS.iter().enumerate() {
        assert_eq!(fx.header_cell(col + 1).inner_html(), *title);
    }
}

#[test]
fn test_narrow_table_trims_on_construction() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options::default());

    let state = tt.state().unwrap();
    assert!(state.is_trimmed());
    assert_eq!(state.active, Some(2));
    assert!(fx.table.has_class(classes::TRIMMED));
    assert!(fx.table.has_class(classes::LTR));
    assert_eq!(fx.active_columns(), vec![2]);
    assert!(fx.column(1).iter().all(|c| c.has_class(classes::STICKY)));
    assert_eq!(fx.controls_column(), Some(2));
}

#[test]
fn test_table_at_breakpoint_trims() {
    let fx = Fixture::new(640.0);
    let tt = fx.build(Options::default());
    assert!(tt.state().unwrap().is_trimmed());
}

#[test]
fn test_table_gets_unique_ids() {
    let host = MemoryHost::new();
    let first = host.table(&HEADERS, &[vec!["a", "b", "c", "d"]]);
    let second = host.table(&HEADERS, &[vec!["a", "b", "c", "d"]]);
    let a = TableTrim::new(host.clone(), first.clone(), Options::default(), Hooks::new()).unwrap();
    let b = TableTrim::new(host, second.clone(), Options::default(), Hooks::new()).unwrap();

    let (a_id, b_id) = (a.id().unwrap(), b.id().unwrap());
    assert_ne!(a_id, b_id);
    assert_eq!(first.attribute(classes::ID_ATTRIBUTE), Some(a_id));
    assert_eq!(second.attribute(classes::ID_ATTRIBUTE), Some(b_id));
}

#[test]
fn test_rejects_non_table_element() {
    let host = MemoryHost::new();
    let div = MemoryElement::new("div");
    let result = TableTrim::new(host, div.clone(), Options::default(), Hooks::new());
    assert!(matches!(result, Err(TabletrimError::Configuration(_))));
    assert!(!div.has_class(classes::TABLE));
}

#[test]
fn test_rejects_table_without_header() {
    let host = MemoryHost::new();
    let table = MemoryElement::new("table");
    let tbody = MemoryElement::new("tbody");
    table.append_child(&tbody);
    let result = TableTrim::new(host, table, Options::default(), Hooks::new());
    assert!(matches!(result, Err(TabletrimError::Configuration(_))));
}

#[test]
fn test_rejects_single_column_table() {
    let host = MemoryHost::new();
    let table = host.table(&["Only"], &[vec!["x"]]);
    let result = TableTrim::new(host, table, Options::default(), Hooks::new());
    assert!(matches!(result, Err(TabletrimError::Configuration(_))));
}

#[test]
fn test_rejects_init_equal_to_sticky() {
    let fx = Fixture::narrow();
    let before = fx.table.outer_html();
    let options = Options {
        sticky_index: 2,
        init_index: 2,
        ..Options::default()
    };
    let result = TableTrim::new(fx.host.clone(), fx.table.clone(), options, Hooks::new());
    assert!(matches!(result, Err(TabletrimError::Configuration(_))));
    assert_eq!(fx.table.outer_html(), before);
}

#[test]
fn test_rejects_out_of_range_init() {
    let fx = Fixture::wide();
    let options = Options {
        init_index: 5,
        ..Options::default()
    };
    let result = TableTrim::new(fx.host.clone(), fx.table.clone(), options, Hooks::new());
    assert!(matches!(result, Err(TabletrimError::Configuration(_))));
}

// ============================================================================
// Trim / untrim
// ============================================================================

#[test]
fn test_trim_untrim_round_trip() {
    let fx = Fixture::wide();
    let tt = fx.build(Options::default());

    assert!(tt.trim(None).unwrap());
    assert!(!tt.trim(None).unwrap());
    assert!(tt.untrim().unwrap());
    assert!(!tt.untrim().unwrap());

    let state = tt.state().unwrap();
    assert_eq!(state.state, TrimState::Untrimmed);
    assert_eq!(state.active, None);
    assert!(!fx.table.has_class(classes::TRIMMED));
    assert!(!fx.table.has_class(classes::LTR));
    assert!(!fx.table.has_class(classes::RTL));
    assert!(!fx.any_cell_has(classes::ACTIVE));
    // The sticky marker survives untrim.
    assert!(fx.is_sticky(1));
    for (col, title) in HEADERS.iter().enumerate() {
        assert_eq!(fx.header_cell(col + 1).inner_html(), *title);
    }
}

#[test]
fn test_trim_tags_sticky_and_init_columns_only() {
    let fx = Fixture::wide();
    let tt = fx.build(Options::default());
    tt.trim(None).unwrap();

    assert!(fx.column(1).iter().all(|c| c.has_class(classes::STICKY)));
    assert!(fx.column(2).iter().all(|c| c.has_class(classes::ACTIVE)));
    for col in [3, 4] {
        assert!(fx.column(col).iter().all(|c| c.classes().is_empty()));
    }
    assert_eq!(fx.controls_column(), Some(2));
}

#[test]
fn test_trim_to_specific_column() {
    let fx = Fixture::wide();
    let tt = fx.build(Options::default());
    tt.trim(Some(4)).unwrap();
    assert_eq!(tt.state().unwrap().active, Some(4));
    assert_eq!(fx.active_columns(), vec![4]);
    assert_eq!(fx.controls_column(), Some(4));
}

#[test]
fn test_trim_with_invalid_column_leaves_table_untrimmed() {
    let fx = Fixture::wide();
    let tt = fx.build(Options::default());
    assert_eq!(
        tt.trim(Some(7)),
        Err(TabletrimError::InvalidColumn { index: 7, count: 4 })
    );
    assert!(!tt.state().unwrap().is_trimmed());
    assert!(!fx.table.has_class(classes::TRIMMED));
}

#[test]
fn test_check_follows_width() {
    let fx = Fixture::wide();
    let tt = fx.build(Options::default());

    tt.check().unwrap();
    assert!(!tt.state().unwrap().is_trimmed());

    fx.table.set_width(400.0);
    tt.check().unwrap();
    assert!(tt.state().unwrap().is_trimmed());

    tt.activate(3).unwrap();
    tt.check().unwrap();
    assert_eq!(tt.state().unwrap().active, Some(3));

    fx.table.set_width(700.0);
    tt.check().unwrap();
    assert!(!tt.state().unwrap().is_trimmed());
}

// ============================================================================
// Activation
// ============================================================================

#[test]
fn test_activate_moves_controls_and_restores_previous_header() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options::default());
    assert!(fx.header_cell(2).inner_html().contains(classes::CONTROLS));

    tt.activate(3).unwrap();

    assert_eq!(fx.active_columns(), vec![3]);
    assert_eq!(fx.header_cell(2).inner_html(), "Alpha");
    assert_eq!(fx.controls_column(), Some(3));
    assert_eq!(fx.widget(classes::SELECT).value(), "3");

    let state = tt.state().unwrap();
    assert_eq!((state.next, state.prev), (4, 2));
}

#[test]
fn test_header_markup_restored_byte_for_byte() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options::default());
    tt.activate(3).unwrap();
    assert_ne!(fx.header_cell(3).inner_html(), HEADERS[2]);

    tt.activate(4).unwrap();
    assert_eq!(fx.header_cell(3).inner_html(), HEADERS[2]);

    tt.untrim().unwrap();
    assert_eq!(fx.header_cell(4).inner_html(), HEADERS[3]);
}

#[test]
fn test_activate_while_untrimmed_trims_to_column() {
    let fx = Fixture::wide();
    let tt = fx.build(Options::default());
    tt.activate(4).unwrap();

    let state = tt.state().unwrap();
    assert!(state.is_trimmed());
    assert_eq!(state.active, Some(4));
    assert_eq!((state.next, state.prev), (2, 3));
}

#[test]
fn test_activate_sticky_changes_nothing() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options::default());
    tt.activate(3).unwrap();
    let before = tt.state().unwrap();

    tt.activate(1).unwrap();

    assert_eq!(tt.state().unwrap(), before);
    assert_eq!(fx.active_columns(), vec![3]);
    assert!(fx.is_sticky(1));
    assert!(!fx.column(1).iter().any(|c| c.has_class(classes::ACTIVE)));
    assert_eq!(fx.controls_column(), Some(3));
    assert_eq!(fx.header_cell(1).inner_html(), "Name");
}

#[test]
fn test_activate_invalid_column_changes_nothing() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options::default());
    let before = tt.state().unwrap();
    let markup = fx.table.outer_html();

    assert_eq!(
        tt.activate(0),
        Err(TabletrimError::InvalidColumn { index: 0, count: 4 })
    );
    assert!(tt.activate(5).is_err());
    assert_eq!(tt.state().unwrap(), before);
    assert_eq!(fx.table.outer_html(), markup);
}

#[test]
fn test_direction_classes_follow_sticky_position() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options {
        sticky_index: 2,
        init_index: 3,
        ..Options::default()
    });
    assert!(fx.table.has_class(classes::LTR));
    assert!(!fx.table.has_class(classes::RTL));

    tt.activate(1).unwrap();
    assert!(fx.table.has_class(classes::RTL));
    assert!(!fx.table.has_class(classes::LTR));
    assert!(fx.is_sticky(2));

    tt.activate(4).unwrap();
    assert!(fx.table.has_class(classes::LTR));
    assert!(!fx.table.has_class(classes::RTL));
}

#[test]
fn test_no_sticky_column() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options {
        sticky_index: 0,
        init_index: 1,
        ..Options::default()
    });
    let state = tt.state().unwrap();
    assert_eq!(state.active, Some(1));
    assert_eq!(state.sticky, 0);
    assert!(!fx.any_cell_has(classes::STICKY));
    assert!(fx.table.has_class(classes::LTR));
}

// ============================================================================
// Controls
// ============================================================================

#[test]
fn test_controls_markup() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options {
        controls: vec![
            ControlKind::Label,
            ControlKind::Select,
            ControlKind::Prev,
            ControlKind::Title,
            ControlKind::Next,
        ],
        ..Options::default()
    });
    let id = tt.id().unwrap();

    let container = fx.controls().unwrap();
    let tags: Vec<String> = container.children().iter().map(MemoryElement::tag).collect();
    assert_eq!(tags, vec!["label", "select", "button", "span", "button"]);

    let select = fx.widget(classes::SELECT);
    assert_eq!(select.attribute("id"), Some(classes::select_id(&id)));
    let options = select.children();
    assert_eq!(options.len(), 4);
    assert_eq!(options[0].attribute("disabled").as_deref(), Some("disabled"));
    assert_eq!(options[2].inner_html(), HEADERS[2]);

    let label = fx.widget(classes::LABEL);
    assert_eq!(label.attribute("for"), Some(classes::select_id(&id)));
    assert_eq!(label.inner_html(), "Column: ");

    assert_eq!(fx.widget(classes::TITLE).inner_html(), "Alpha");
    assert_eq!(fx.widget(classes::PREV).inner_html(), "&lsaquo;");
    assert_eq!(fx.widget(classes::NEXT).attribute("type").as_deref(), Some("button"));
}

#[test]
fn test_empty_controls_list_builds_no_container() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options {
        controls: Vec::new(),
        ..Options::default()
    });
    assert!(tt.state().unwrap().is_trimmed());
    assert!(fx.controls().is_none());
    assert_eq!(fx.header_cell(2).inner_html(), "Alpha");

    tt.activate(3).unwrap();
    assert_eq!(fx.active_columns(), vec![3]);
    assert_eq!(fx.header_cell(3).inner_html(), HEADERS[2]);
}

// ============================================================================
// Dispose
// ============================================================================

#[test]
fn test_dispose_restores_table() {
    let fx = Fixture::narrow();
    let tt = fx.build(Options::default());
    tt.activate(4).unwrap();

    tt.dispose().unwrap();

    assert!(!fx.table.has_class(classes::TABLE));
    assert!(!fx.table.has_class(classes::TRIMMED));
    assert!(fx.table.attribute(classes::ID_ATTRIBUTE).is_none());
    assert!(!fx.any_cell_has(classes::STICKY));
    assert!(!fx.any_cell_has(classes::ACTIVE));
    assert!(fx.controls().is_none());
    assert_eq!(fx.host.window_listener_count(), 0);
    for (col, title) in HEADERS.iter().enumerate() {
        assert_eq!(fx.header_cell(col + 1).inner_html(), *title);
    }
}
