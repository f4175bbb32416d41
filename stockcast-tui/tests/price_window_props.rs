//! Property tests for the price-chart range window.

use proptest::prelude::*;

use stockcast_tui::app::PriceWindow;

#[derive(Debug, Clone, Copy)]
enum Op {
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::ZoomIn),
        Just(Op::ZoomOut),
        Just(Op::PanLeft),
        Just(Op::PanRight),
        Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn window_stays_inside_table(total in 0usize..5_000, ops in prop::collection::vec(op(), 0..40)) {
        let mut w = PriceWindow::default();
        for op in ops {
            match op {
                Op::ZoomIn => w.zoom_in(total),
                Op::ZoomOut => w.zoom_out(total),
                Op::PanLeft => w.pan_left(total),
                Op::PanRight => w.pan_right(total),
                Op::Reset => w.reset(),
            }
            let b = w.bounds(total);
            prop_assert!(b.start <= b.end);
            prop_assert!(b.end <= total);
            prop_assert!(b.len() >= PriceWindow::MIN_LEN.min(total));
        }
    }

    #[test]
    fn pan_right_after_pan_left_returns_to_latest(total in 40usize..5_000) {
        let mut w = PriceWindow::default();
        w.zoom_in(total);
        w.pan_left(total);
        for _ in 0..total {
            w.pan_right(total);
        }
        prop_assert_eq!(w.bounds(total).end, total);
    }
}
