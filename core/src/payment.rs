//! Token arena and zone-total evaluation.
//!
//! Tokens live in a flat arena indexed by [`TokenId`]. Spawn order is draw
//! order, so the last spawned token under a point is the one on top. The zone
//! total is only recomputed at drag release and at autonomous commits; moving
//! a token never touches it.

use till_types::{Cents, Denomination, MonetaryUnit, Point, Rect, Size, SizeClass, TokenId};

use crate::catalog::{AssetCatalog, AssetError};

/// On-screen footprint per size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSizes {
    pub bill: Size,
    pub coin: Size,
}

impl TokenSizes {
    #[must_use]
    pub const fn new(bill: Size, coin: Size) -> Self {
        Self { bill, coin }
    }

    #[must_use]
    pub const fn for_class(&self, class: SizeClass) -> Size {
        match class {
            SizeClass::Bill => self.bill,
            SizeClass::Coin => self.coin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: TokenId,
    unit: MonetaryUnit,
    rect: Rect,
    home: Point,
    drag_offset: Point,
    dragging: bool,
    in_zone: bool,
    highlighted: bool,
}

impl Token {
    #[must_use]
    pub fn id(&self) -> TokenId {
        self.id
    }

    #[must_use]
    pub fn unit(&self) -> MonetaryUnit {
        self.unit
    }

    #[must_use]
    pub fn denomination(&self) -> Denomination {
        self.unit.denomination()
    }

    #[must_use]
    pub fn face_value(&self) -> Cents {
        self.unit.face_value()
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub fn home(&self) -> Point {
        self.home
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub fn in_zone(&self) -> bool {
        self.in_zone
    }

    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

/// What happened when a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    pub token: TokenId,
    /// Membership after the drop.
    pub in_zone: bool,
    /// The token was in the zone before the drag and is not anymore.
    pub left_zone: bool,
    /// Zone total after the single post-release recomputation.
    pub total: Cents,
}

#[derive(Debug, Clone)]
pub struct PaymentEngine {
    zone: Rect,
    tokens: Vec<Token>,
    dragged: Option<TokenId>,
    total: Cents,
}

impl PaymentEngine {
    #[must_use]
    pub fn new(zone: Rect) -> Self {
        Self {
            zone,
            tokens: Vec::new(),
            dragged: None,
            total: Cents::ZERO,
        }
    }

    #[must_use]
    pub fn zone(&self) -> Rect {
        self.zone
    }

    #[must_use]
    pub fn total(&self) -> Cents {
        self.total
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.index())
    }

    /// Create a token whose top-left corner (and home) is `top_left`.
    pub fn spawn(
        &mut self,
        catalog: &AssetCatalog,
        face_value: Cents,
        top_left: Point,
        sizes: TokenSizes,
    ) -> Result<TokenId, AssetError> {
        let unit = catalog.unit(face_value)?;
        let id = TokenId::new(self.tokens.len());
        self.tokens.push(Token {
            id,
            unit,
            rect: Rect::from_origin(top_left, sizes.for_class(unit.size_class())),
            home: top_left,
            drag_offset: Point::default(),
            dragging: false,
            in_zone: false,
            highlighted: false,
        });
        Ok(id)
    }

    /// Sum of face values of tokens in the zone. Stores and returns the result.
    pub fn recompute_total(&mut self) -> Cents {
        self.total = self
            .tokens
            .iter()
            .filter(|t| t.in_zone)
            .map(Token::face_value)
            .sum();
        self.total
    }

    /// Set membership from the token's current overlap with the zone.
    pub fn mark_zone_membership(&mut self, id: TokenId) -> bool {
        let zone = self.zone;
        match self.tokens.get_mut(id.index()) {
            Some(token) => {
                token.in_zone = token.rect.intersects(&zone);
                token.in_zone
            }
            None => false,
        }
    }

    /// Topmost token under `point`.
    #[must_use]
    pub fn token_at(&self, point: Point) -> Option<TokenId> {
        self.tokens
            .iter()
            .rev()
            .find(|t| t.rect.contains(point))
            .map(Token::id)
    }

    /// Start dragging the topmost token under `point`. Misses are a no-op.
    pub fn begin_drag(&mut self, point: Point) -> Option<TokenId> {
        let id = self.token_at(point)?;
        let token = &mut self.tokens[id.index()];
        token.dragging = true;
        token.drag_offset = Point::new(point.x - token.rect.x, point.y - token.rect.y);
        self.dragged = Some(id);
        Some(id)
    }

    #[must_use]
    pub fn dragged(&self) -> Option<TokenId> {
        self.dragged
    }

    /// Move the dragged token so the grab point follows the pointer.
    pub fn drag_to(&mut self, point: Point) {
        let Some(id) = self.dragged else {
            return;
        };
        let token = &mut self.tokens[id.index()];
        let offset = token.drag_offset;
        token
            .rect
            .move_to(Point::new(point.x - offset.x, point.y - offset.y));
    }

    /// End the current drag: update membership, then recompute the total once.
    pub fn release(&mut self) -> Option<Release> {
        let id = self.dragged.take()?;
        let was_in = {
            let token = &mut self.tokens[id.index()];
            token.dragging = false;
            token.in_zone
        };
        let in_zone = self.mark_zone_membership(id);
        let total = self.recompute_total();
        Some(Release {
            token: id,
            in_zone,
            left_zone: was_in && !in_zone,
            total,
        })
    }

    pub fn set_center(&mut self, id: TokenId, center: Point) {
        if let Some(token) = self.tokens.get_mut(id.index()) {
            token.rect.set_center(center);
        }
    }

    pub fn snap_home(&mut self, id: TokenId) {
        if let Some(token) = self.tokens.get_mut(id.index()) {
            token.rect.move_to(token.home);
        }
    }

    /// Place a token in the zone on the user's behalf and recompute.
    pub fn commit_to_zone(&mut self, id: TokenId) -> Cents {
        if let Some(token) = self.tokens.get_mut(id.index()) {
            token.in_zone = true;
        }
        self.recompute_total()
    }

    /// Every token back home and out of the zone; total back to zero.
    pub fn reset_all(&mut self) {
        for token in &mut self.tokens {
            token.rect.move_to(token.home);
            token.dragging = false;
            token.in_zone = false;
        }
        self.dragged = None;
        self.total = Cents::ZERO;
    }

    /// Exchange current positions and homes of two tokens.
    pub fn swap_places(&mut self, a: TokenId, b: TokenId) {
        if a == b || a.index() >= self.tokens.len() || b.index() >= self.tokens.len() {
            return;
        }
        let (pos_a, home_a) = (self.tokens[a.index()].rect.top_left(), self.tokens[a.index()].home);
        let (pos_b, home_b) = (self.tokens[b.index()].rect.top_left(), self.tokens[b.index()].home);
        let token_a = &mut self.tokens[a.index()];
        token_a.rect.move_to(pos_b);
        token_a.home = home_b;
        let token_b = &mut self.tokens[b.index()];
        token_b.rect.move_to(pos_a);
        token_b.home = home_a;
    }

    pub fn set_highlight(&mut self, id: TokenId, on: bool) {
        if let Some(token) = self.tokens.get_mut(id.index()) {
            token.highlighted = on;
        }
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<TokenId> {
        self.tokens.iter().find(|t| t.highlighted).map(Token::id)
    }

    /// First token of `denomination` that sits outside the zone and is not held.
    #[must_use]
    pub fn find_available(&self, denomination: Denomination) -> Option<TokenId> {
        self.tokens
            .iter()
            .find(|t| t.denomination() == denomination && !t.in_zone && !t.dragging)
            .map(Token::id)
    }

    /// Available token of the largest denomination that does not exceed `owed`.
    #[must_use]
    pub fn best_fit(&self, owed: Cents) -> Option<TokenId> {
        Denomination::DESCENDING
            .into_iter()
            .filter(|d| d.value() <= owed)
            .find_map(|d| self.find_available(d))
    }

    /// Outside-zone token whose center is closest to the zone center.
    /// Ties go to the earlier token.
    #[must_use]
    pub fn nearest_outside_zone(&self, exclude: TokenId) -> Option<TokenId> {
        let target = self.zone.center();
        self.tokens
            .iter()
            .filter(|t| t.id != exclude && !t.in_zone && !t.dragging)
            .min_by_key(|t| (t.rect.center().distance_sq(target), t.id))
            .map(Token::id)
    }
}
