//! Land map: the SVG overview with one marker per land, a few clickable coins and
//! the portal. Pure state; the DOM layer renders it.

/// Static land descriptor.
#[derive(Debug)]
pub struct LandDesc {
    pub name: &'static str,
    pub desc: &'static str,
    /// x coordinate of the Mario marker on the map (y is fixed).
    pub marker_x: u32,
}

impl LandDesc {
    /// SVG `transform` for the marker standing on this land.
    pub fn marker_transform(&self) -> String {
        format!("translate({},{})", self.marker_x, MARKER_Y)
    }
}

pub const MARKER_Y: u32 = 230;

// Land definitions live in separate files:
mod land_castle;
mod land_meadows;
mod land_plateau;

static LANDS: [&LandDesc; 3] = [&land_meadows::LAND1, &land_castle::LAND2, &land_plateau::LAND3];

pub fn lands() -> &'static [&'static LandDesc] {
    &LANDS
}

#[derive(Debug)]
pub struct MapState {
    current: usize,
    coins: Vec<bool>,
    portal_threshold: usize,
}

impl MapState {
    pub fn new(coin_count: usize, portal_threshold: usize) -> Self {
        Self { current: 0, coins: vec![false; coin_count], portal_threshold }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &'static LandDesc {
        lands()[self.current]
    }

    /// Jump to land `idx`; out-of-range indices are ignored.
    pub fn select(&mut self, idx: usize) -> bool {
        if idx < lands().len() {
            self.current = idx;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % lands().len();
    }

    pub fn prev(&mut self) {
        self.current = (self.current + lands().len() - 1) % lands().len();
    }

    pub fn coins(&self) -> &[bool] {
        &self.coins
    }

    /// Flip one map coin; returns its new collected flag.
    pub fn toggle_coin(&mut self, idx: usize) -> Option<bool> {
        let coin = self.coins.get_mut(idx)?;
        *coin = !*coin;
        Some(*coin)
    }

    pub fn collect_all(&mut self) {
        self.coins.iter_mut().for_each(|c| *c = true);
    }

    pub fn collected_count(&self) -> usize {
        self.coins.iter().filter(|c| **c).count()
    }

    pub fn portal_active(&self) -> bool {
        crate::sim::portal_active(self.collected_count(), self.portal_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps_both_ways() {
        let mut map = MapState::new(3, 3);
        assert_eq!(map.current().name, "Mushroom Meadows");
        map.prev();
        assert_eq!(map.current().name, "Power-Up Plateau");
        map.next();
        map.next();
        assert_eq!(map.current().name, "Koopa Castle");
        assert!(!map.select(7));
        assert!(map.select(2));
        assert_eq!(map.current_index(), 2);
    }

    #[test]
    fn marker_transform_uses_land_x() {
        assert_eq!(lands()[1].marker_transform(), "translate(500,230)");
    }

    #[test]
    fn portal_follows_coin_toggles() {
        let mut map = MapState::new(4, 3);
        assert_eq!(map.toggle_coin(0), Some(true));
        assert_eq!(map.toggle_coin(1), Some(true));
        assert!(!map.portal_active());
        assert_eq!(map.toggle_coin(2), Some(true));
        assert!(map.portal_active());
        assert_eq!(map.toggle_coin(1), Some(false));
        assert!(!map.portal_active());
        assert_eq!(map.toggle_coin(9), None);
    }

    #[test]
    fn collect_all_opens_portal_and_toggle_closes_it() {
        let mut map = MapState::new(3, 3);
        map.collect_all();
        assert_eq!(map.collected_count(), 3);
        assert!(map.portal_active());
        map.toggle_coin(0);
        assert!(!map.portal_active());
    }
}
