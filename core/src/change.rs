//! Change breakdown: what the cashier hands back, and where it lies.

use till_types::{Cents, ChangePolicy, Denomination, Point, Rect, Size, SizeClass};

use crate::payment::TokenSizes;
use crate::random::RandomSource;

/// Offset applied to the owed amount when the shown change is meant to be wrong.
pub const PERTURBATION: Cents = Cents::new(20);

/// Largest-first breakdown of `amount`.
///
/// Each denomination in the set divides the next larger one's value into a
/// greedy-optimal system, so this is also the fewest-pieces breakdown.
#[must_use]
pub fn greedy_breakdown(amount: Cents) -> Vec<Denomination> {
    let mut remaining = amount;
    let mut pieces = Vec::new();
    for denomination in Denomination::DESCENDING {
        while remaining >= denomination.value() {
            pieces.push(denomination);
            remaining = remaining - denomination.value();
        }
    }
    pieces
}

/// Decide whether this attempt's change is correct.
pub fn decide_correct(policy: ChangePolicy, rng: &mut dyn RandomSource) -> bool {
    match policy {
        ChangePolicy::AlwaysRight => true,
        ChangePolicy::AlwaysWrong => false,
        ChangePolicy::FiftyFifty => rng.coin_flip(),
    }
}

/// Amount actually handed back. Wrong change is off by exactly 20 cents in a
/// random direction, never negative.
pub fn shown_amount(owed: Cents, correct: bool, rng: &mut dyn RandomSource) -> Cents {
    if correct {
        return owed;
    }
    let raised = owed + PERTURBATION;
    let lowered = owed - PERTURBATION;
    if rng.coin_flip() && !lowered.is_negative() {
        lowered
    } else {
        raised
    }
}

/// Geometry of the box the change is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeLayout {
    pub area: Rect,
    /// Height reserved for the box title.
    pub header: i32,
    pub spacing: Size,
    pub sizes: TokenSizes,
}

/// Bills stack down a column from the left edge, coins down a column from the
/// right edge. A column wraps when the next piece would cross the bottom
/// margin: bills wrap rightwards, coins leftwards. Coin columns never cut into
/// the bill columns; once they would, they continue to the right of the
/// rightmost column instead, past the box edge if need be.
#[must_use]
pub fn layout_breakdown(pieces: &[Denomination], layout: &ChangeLayout) -> Vec<(Denomination, Point)> {
    let area = layout.area;
    let spacing = layout.spacing;
    let start_y = area.y + layout.header + spacing.height;
    let max_y = area.bottom() - spacing.height;

    let bill = layout.sizes.bill;
    let coin = layout.sizes.coin;

    let mut placed = Vec::with_capacity(pieces.len());

    let mut col_x = area.x + spacing.width;
    let mut col_y = start_y;
    let mut bills_right = None;
    for &piece in pieces.iter().filter(|p| p.size_class() == SizeClass::Bill) {
        if col_y + bill.height > max_y {
            col_y = start_y;
            col_x += bill.width + spacing.width;
        }
        placed.push((piece, Point::new(col_x, col_y)));
        bills_right = Some(col_x + bill.width);
        col_y += bill.height + spacing.height;
    }

    let coin_floor = bills_right.map_or(area.x + spacing.width, |right| right + spacing.width);
    let step = coin.width + spacing.width;
    let mut col_x = (area.right() - spacing.width - coin.width).max(coin_floor);
    let mut rightmost = col_x;
    let mut leftward = true;
    let mut col_y = start_y;
    for &piece in pieces.iter().filter(|p| p.size_class() == SizeClass::Coin) {
        if col_y + coin.height > max_y {
            col_y = start_y;
            if leftward && col_x - step >= coin_floor {
                col_x -= step;
            } else {
                leftward = false;
                rightmost += step;
                col_x = rightmost;
            }
        }
        placed.push((piece, Point::new(col_x, col_y)));
        col_y += coin.height + spacing.height;
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::{
        ChangeLayout, decide_correct, greedy_breakdown, layout_breakdown, shown_amount,
    };
    use crate::payment::TokenSizes;
    use crate::random::SequenceRandom;
    use till_types::{Cents, ChangePolicy, Denomination, Point, Rect, Size, SizeClass};

    fn total(pieces: &[Denomination]) -> Cents {
        pieces.iter().map(|d| d.value()).sum()
    }

    /// Fewest pieces by exhaustive dynamic programming, for comparison.
    fn min_pieces(amount: i64) -> usize {
        let mut best = vec![usize::MAX; (amount + 1) as usize];
        best[0] = 0;
        for value in 1..=amount {
            for d in Denomination::DESCENDING {
                let v = d.value().as_i64();
                if v <= value && best[(value - v) as usize] != usize::MAX {
                    best[value as usize] = best[value as usize].min(best[(value - v) as usize] + 1);
                }
            }
        }
        best[amount as usize]
    }

    #[test]
    fn breakdown_sums_exactly_and_is_minimal() {
        for cents in 0..=1200 {
            let pieces = greedy_breakdown(Cents::new(cents));
            assert_eq!(total(&pieces), Cents::new(cents), "sum for {cents}");
            assert_eq!(pieces.len(), min_pieces(cents), "count for {cents}");
            assert!(pieces.windows(2).all(|w| w[0] >= w[1]), "order for {cents}");
        }
    }

    #[test]
    fn owed_three_seventy_five_uses_quarters() {
        let owed = Cents::from_dollars(5.00) - Cents::from_dollars(1.25);
        assert_eq!(owed, Cents::new(375));
        let pieces = greedy_breakdown(owed);
        assert_eq!(
            pieces,
            vec![
                Denomination::OneDollar,
                Denomination::OneDollar,
                Denomination::OneDollar,
                Denomination::Quarter,
                Denomination::Quarter,
                Denomination::Quarter,
            ]
        );
    }

    #[test]
    fn lowered_perturbation_of_four_twenty_five() {
        // First flip chooses the lowered amount.
        let mut rng = SequenceRandom::new([0.1]);
        let shown = shown_amount(Cents::new(425), false, &mut rng);
        assert_eq!(shown, Cents::new(405));
        let pieces = greedy_breakdown(shown);
        assert_eq!(total(&pieces), Cents::new(405));
        assert_eq!(pieces.iter().filter(|d| **d == Denomination::OneDollar).count(), 4);
        assert_eq!(pieces.len(), 5);
    }

    #[test]
    fn raised_perturbation_and_negative_guard() {
        let mut rng = SequenceRandom::new([0.9]);
        assert_eq!(shown_amount(Cents::new(375), false, &mut rng), Cents::new(395));

        let mut rng = SequenceRandom::new([0.1]);
        assert_eq!(shown_amount(Cents::new(10), false, &mut rng), Cents::new(30));
    }

    #[test]
    fn correct_change_is_untouched() {
        let mut rng = SequenceRandom::new([0.1]);
        assert_eq!(shown_amount(Cents::new(375), true, &mut rng), Cents::new(375));
    }

    #[test]
    fn policy_decides_correctness() {
        let mut rng = SequenceRandom::new([0.2, 0.8]);
        assert!(decide_correct(ChangePolicy::AlwaysRight, &mut rng));
        assert!(!decide_correct(ChangePolicy::AlwaysWrong, &mut rng));
        assert!(decide_correct(ChangePolicy::FiftyFifty, &mut rng));
        assert!(!decide_correct(ChangePolicy::FiftyFifty, &mut rng));
    }

    #[test]
    fn columns_wrap_inside_the_box() {
        let layout = ChangeLayout {
            area: Rect::new(0, 0, 600, 400),
            header: 40,
            spacing: Size::new(20, 20),
            sizes: TokenSizes::new(Size::new(260, 130), Size::new(60, 60)),
        };
        // Two bills fit per column (60 + 130 + 20 + 130 <= 380), the third wraps.
        let pieces = [
            Denomination::OneDollar,
            Denomination::OneDollar,
            Denomination::OneDollar,
            Denomination::Quarter,
        ];
        let placed = layout_breakdown(&pieces, &layout);
        assert_eq!(placed[0].1, Point::new(20, 60));
        assert_eq!(placed[1].1, Point::new(20, 210));
        assert_eq!(placed[2].1, Point::new(300, 60));
        assert_eq!(placed[3], (Denomination::Quarter, Point::new(580, 60)));
    }

    fn assert_disjoint(placed: &[(Denomination, Point)], sizes: TokenSizes) {
        let rects: Vec<Rect> = placed
            .iter()
            .map(|(d, at)| {
                let size = sizes.for_class(d.size_class());
                Rect::new(at.x, at.y, size.width, size.height)
            })
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn many_bills_push_coins_clear_of_the_bill_columns() {
        let sizes = TokenSizes::new(Size::new(260, 130), Size::new(60, 60));
        let layout = ChangeLayout {
            area: Rect::new(0, 20, 600, 550),
            header: 40,
            spacing: Size::new(20, 20),
            sizes,
        };
        let pieces = greedy_breakdown(Cents::new(1875));
        let placed = layout_breakdown(&pieces, &layout);
        assert_eq!(placed.len(), pieces.len());
        assert_disjoint(&placed, sizes);
    }

    #[test]
    fn coin_columns_turn_right_when_they_reach_the_bills() {
        let sizes = TokenSizes::new(Size::new(260, 130), Size::new(60, 60));
        let layout = ChangeLayout {
            area: Rect::new(0, 0, 460, 240),
            header: 40,
            spacing: Size::new(20, 20),
            sizes,
        };
        // One bill, then nine coins two to a column.
        let pieces = greedy_breakdown(Cents::new(199));
        let placed = layout_breakdown(&pieces, &layout);
        assert_disjoint(&placed, sizes);
        let coin_xs: Vec<i32> = placed
            .iter()
            .filter(|(d, _)| d.size_class() == SizeClass::Coin)
            .map(|(_, at)| at.x)
            .collect();
        assert_eq!(coin_xs[..4], [380, 380, 300, 300]);
        assert_eq!(coin_xs[4], 460);
        assert!(coin_xs.iter().all(|x| *x >= 300));
    }
}
